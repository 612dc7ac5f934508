//! Catalog loading and snapshot management.
//!
//! Product data lives in JSON files, one array of records per configured
//! source. The loader builds a complete immutable snapshot up front; the
//! running service replaces it atomically on reload, so in-flight searches
//! keep the snapshot they started with.
//!
//! A malformed record is skipped with a warning — one bad export row must
//! never take the rest of the catalog offline.

use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::CatalogConfig;
use crate::models::{Catalog, CatalogEntry, ProductRecord};

/// Load every configured source into a fresh catalog snapshot.
pub fn load_catalog(config: &CatalogConfig) -> Result<Catalog> {
    let mut entries = Vec::new();

    for source in &config.sources {
        if source.optional && !source.path.exists() {
            warn!(
                source = %source.name,
                path = %source.path.display(),
                "catalog file missing, skipping optional source"
            );
            continue;
        }

        let raw = std::fs::read_to_string(&source.path)
            .with_context(|| format!("Failed to read catalog file: {}", source.path.display()))?;
        let values: Vec<serde_json::Value> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse catalog file: {}", source.path.display()))?;

        let mut kept = 0usize;
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<ProductRecord>(value) {
                Ok(record) => {
                    entries.push(CatalogEntry {
                        record,
                        source: source.name.clone(),
                    });
                    kept += 1;
                }
                Err(err) => {
                    warn!(
                        source = %source.name,
                        index,
                        %err,
                        "skipping malformed catalog record"
                    );
                }
            }
        }
        info!(source = %source.name, records = kept, "catalog source loaded");
    }

    Ok(Catalog { entries })
}

/// Holds the serving snapshot.
///
/// Readers clone the `Arc` and never block each other; a reload builds a new
/// snapshot first and then swaps the pointer, with the write lock held only
/// for the swap itself.
#[derive(Debug)]
pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// The current snapshot. Holders keep it valid across a swap.
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the serving snapshot.
    pub fn swap(&self, catalog: Catalog) {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = Arc::new(catalog);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogSourceConfig;
    use std::fs;
    use tempfile::TempDir;

    fn source(name: &str, path: &std::path::Path, optional: bool) -> CatalogSourceConfig {
        CatalogSourceConfig {
            name: name.to_string(),
            path: path.to_path_buf(),
            optional,
        }
    }

    #[test]
    fn test_loads_and_tags_sources_in_order() {
        let tmp = TempDir::new().unwrap();
        let combined = tmp.path().join("combined.json");
        let page = tmp.path().join("page.json");
        fs::write(&combined, r#"[{"nombre": "A"}, {"nombre": "B"}]"#).unwrap();
        fs::write(&page, r#"[{"nombre": "C"}]"#).unwrap();

        let catalog = load_catalog(&CatalogConfig {
            sources: vec![
                source("combined", &combined, false),
                source("page", &page, false),
            ],
        })
        .unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.entries[0].source, "combined");
        assert_eq!(catalog.entries[2].source, "page");
        assert_eq!(catalog.entries[2].record.name.as_deref(), Some("C"));
    }

    #[test]
    fn test_skips_malformed_records() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("combined.json");
        fs::write(&path, r#"[{"nombre": "A"}, 42, {"nombre": "B"}]"#).unwrap();

        let catalog = load_catalog(&CatalogConfig {
            sources: vec![source("combined", &path, false)],
        })
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries[1].record.name.as_deref(), Some("B"));
    }

    #[test]
    fn test_missing_required_file_fails() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.json");
        let err = load_catalog(&CatalogConfig {
            sources: vec![source("combined", &missing, false)],
        })
        .unwrap_err();
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_missing_optional_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let present = tmp.path().join("combined.json");
        fs::write(&present, r#"[{"nombre": "A"}]"#).unwrap();
        let missing = tmp.path().join("meli.json");

        let catalog = load_catalog(&CatalogConfig {
            sources: vec![
                source("combined", &present, false),
                source("meli", &missing, true),
            ],
        })
        .unwrap();

        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_store_swap_preserves_old_snapshot_for_holders() {
        let store = CatalogStore::new(Catalog::default());
        let before = store.snapshot();

        let mut replacement = Catalog::default();
        replacement.entries.push(CatalogEntry {
            record: ProductRecord::default(),
            source: "combined".to_string(),
        });
        store.swap(replacement);

        // The holder of the old snapshot still sees the old data; new
        // readers see the replacement.
        assert!(before.is_empty());
        assert_eq!(store.snapshot().len(), 1);
    }
}
