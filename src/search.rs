//! Catalog search: one scoring pass, ranking, dedup, top-K selection.
//!
//! Every record in the snapshot goes through the same scoring function
//! regardless of which source it came from; the tag only travels along for
//! reporting. Ranking is deterministic: stable sort by score descending, so
//! ties keep catalog-scan order, then the first occurrence of each
//! normalized name wins.

use std::collections::HashSet;

use anyhow::Result;

use crate::catalog::load_catalog;
use crate::config::{Config, ScoringConfig};
use crate::context;
use crate::models::{Catalog, ScoredMatch};
use crate::normalize::normalize;
use crate::score::{score_record, QueryTerms};

/// Score every record against the query and return the deduplicated top
/// matches, at most `cfg.limit` of them.
pub fn search_catalog<'a>(
    catalog: &'a Catalog,
    query: &str,
    cfg: &ScoringConfig,
) -> Vec<ScoredMatch<'a>> {
    let terms = QueryTerms::prepare(query, cfg);

    let mut matches: Vec<ScoredMatch<'a>> = Vec::new();
    for entry in &catalog.entries {
        let score = score_record(&terms, &entry.record, cfg);
        if score > cfg.min_score {
            matches.push(ScoredMatch {
                record: &entry.record,
                score,
                source: &entry.source,
            });
        }
    }

    rank(matches, cfg.limit)
}

/// Stable-sort by score descending, keep the first occurrence of each
/// normalized name, truncate to the limit.
fn rank(mut matches: Vec<ScoredMatch<'_>>, limit: usize) -> Vec<ScoredMatch<'_>> {
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut seen: HashSet<String> = HashSet::new();
    let mut ranked = Vec::new();
    for m in matches {
        let key = normalize(m.record.name.as_deref().unwrap_or(""));
        if seen.insert(key) {
            ranked.push(m);
            if ranked.len() == limit {
                break;
            }
        }
    }
    ranked
}

/// Run the search command: load the catalog, score it, print results.
pub fn run_search(
    config: &Config,
    query: &str,
    source_filter: Option<String>,
    limit: Option<usize>,
    as_context: bool,
) -> Result<()> {
    if query.trim().is_empty() {
        anyhow::bail!("query must not be empty");
    }

    let mut catalog = load_catalog(&config.catalog)?;
    if let Some(tag) = source_filter {
        catalog.entries.retain(|e| e.source == tag);
    }

    let mut scoring = config.scoring.clone();
    if let Some(limit) = limit {
        scoring.limit = limit;
    }

    let matches = search_catalog(&catalog, query, &scoring);

    if as_context {
        let digest = context::build_context(&matches, &config.format);
        if digest.trim().is_empty() {
            println!("{}", context::GENERAL_INFO);
        } else {
            println!("{}", digest);
        }
        return Ok(());
    }

    if matches.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, m) in matches.iter().enumerate() {
        let name = m.record.name.as_deref().unwrap_or("(sin nombre)");
        println!("{}. [{:.2}] {} / {}", i + 1, m.score, m.source, name);
        if let Some(price) = &m.record.price {
            println!("    precio: {}", price);
        }
        if let Some(description) = m.record.description.as_deref() {
            let snippet = context::clip(
                &description.replace('\n', " "),
                config.format.description_budget,
                crate::config::EllipsisMode::Overflow,
            );
            println!("    descripcion: \"{}\"", snippet.trim());
        }
        println!();
    }

    Ok(())
}
