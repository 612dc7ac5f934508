//! Core data models used throughout catalog-context.
//!
//! These types represent the product records, tagged catalog snapshot, and
//! scored matches that flow through the relevance pipeline.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

/// A single product as found in a catalog export.
///
/// Every field is optional: the exports are inconsistent about which fields
/// they carry, and the scoring engine treats anything missing as an empty
/// string rather than failing. Aliases accept the Spanish keys used by the
/// upstream catalog files (`nombre`, `descripcion`, `detalle_prod`, ...).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductRecord {
    #[serde(default, alias = "nombre")]
    pub name: Option<String>,
    #[serde(default, alias = "descripcion")]
    pub description: Option<String>,
    #[serde(default, alias = "detalle_prod")]
    pub detail: Option<String>,
    #[serde(default, alias = "beneficios")]
    pub benefits: Option<String>,
    #[serde(default, alias = "precio")]
    pub price: Option<Price>,
    #[serde(default, alias = "presentacion")]
    pub presentation: Option<String>,
    #[serde(default, alias = "categorias")]
    pub categories: Vec<String>,
}

impl ProductRecord {
    /// Concatenation of the descriptive fields searched by the keyword
    /// catch-all tier: description, detail, benefits, and the category list.
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for field in [&self.description, &self.detail, &self.benefits] {
            if let Some(text) = field {
                parts.push(text);
            }
        }
        parts.extend(self.categories.iter().map(String::as_str));
        parts.join(" ")
    }
}

/// A product price as it appears in catalog exports: sometimes a number,
/// sometimes free text ("consultar disponibilidad").
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Amount(f64),
    Text(String),
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Amount(amount) => write!(f, "${:.2}", amount),
            Price::Text(text) => write!(f, "{}", text),
        }
    }
}

/// A product record tagged with the catalog source it came from.
///
/// The tag is an open set (`combined`, `page`, `meli`, ...) and is carried
/// for reporting only — scoring never branches on it.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub record: ProductRecord,
    pub source: String,
}

/// Immutable in-memory snapshot of every configured catalog source.
///
/// Built once by the loader and handed to the engine by reference; a reload
/// produces a whole new snapshot instead of mutating this one.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record count per source tag.
    pub fn source_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.source.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// A catalog record paired with its aggregate relevance score and source tag.
///
/// Borrows from the catalog snapshot; lives only for the duration of one
/// search.
#[derive(Debug, Clone)]
pub struct ScoredMatch<'a> {
    pub record: &'a ProductRecord,
    pub score: f64,
    pub source: &'a str,
}
