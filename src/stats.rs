//! Catalog statistics and coverage overview.
//!
//! Gives a quick summary of what's loaded: record counts per source and how
//! many records actually carry the fields the scorer and formatter rely on.
//! Used by `catx stats` to sanity-check a catalog export before serving it.

use anyhow::Result;

use crate::catalog::load_catalog;
use crate::config::Config;
use crate::models::Catalog;

struct FieldCoverage {
    named: usize,
    described: usize,
    priced: usize,
    with_benefits: usize,
    with_detail: usize,
}

fn coverage(catalog: &Catalog) -> FieldCoverage {
    let mut c = FieldCoverage {
        named: 0,
        described: 0,
        priced: 0,
        with_benefits: 0,
        with_detail: 0,
    };
    for entry in &catalog.entries {
        let r = &entry.record;
        if r.name.as_deref().is_some_and(|s| !s.trim().is_empty()) {
            c.named += 1;
        }
        if r.description.as_deref().is_some_and(|s| !s.trim().is_empty()) {
            c.described += 1;
        }
        if r.price.is_some() {
            c.priced += 1;
        }
        if r.benefits.as_deref().is_some_and(|s| !s.trim().is_empty()) {
            c.with_benefits += 1;
        }
        if r.detail.as_deref().is_some_and(|s| !s.trim().is_empty()) {
            c.with_detail += 1;
        }
    }
    c
}

/// Run the stats command: load the catalog and print a summary.
pub fn run_stats(config: &Config) -> Result<()> {
    let catalog = load_catalog(&config.catalog)?;
    let total = catalog.len();
    let c = coverage(&catalog);

    println!("Catalog Context — Catalog Stats");
    println!("===============================");
    println!();
    println!("  Records:       {}", total);
    println!("  Named:         {} / {}", c.named, total);
    println!("  Described:     {} / {}", c.described, total);
    println!("  Priced:        {} / {}", c.priced, total);
    println!("  With benefits: {} / {}", c.with_benefits, total);
    println!("  With detail:   {} / {}", c.with_detail, total);
    println!();

    println!("{:<12} {:>8}", "SOURCE", "RECORDS");
    for (source, count) in catalog.source_counts() {
        println!("{:<12} {:>8}", source, count);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogEntry, Price, ProductRecord};

    #[test]
    fn test_coverage_counts() {
        let catalog = Catalog {
            entries: vec![
                CatalogEntry {
                    record: ProductRecord {
                        name: Some("A".to_string()),
                        description: Some("desc".to_string()),
                        price: Some(Price::Amount(1.0)),
                        ..Default::default()
                    },
                    source: "combined".to_string(),
                },
                CatalogEntry {
                    record: ProductRecord {
                        name: Some("  ".to_string()),
                        ..Default::default()
                    },
                    source: "page".to_string(),
                },
            ],
        };
        let c = coverage(&catalog);
        assert_eq!(c.named, 1);
        assert_eq!(c.described, 1);
        assert_eq!(c.priced, 1);
        assert_eq!(c.with_benefits, 0);
    }
}
