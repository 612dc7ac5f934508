//! Relevance scoring: lexical similarity, keyword containment, aggregation.
//!
//! All three scoring passes are pure functions over normalized text. Absent
//! record fields score as empty strings, so a sparse record degrades to zero
//! signal instead of an error. Every threshold and weight comes from
//! [`ScoringConfig`]; nothing here is hard-coded policy.

use similar::TextDiff;

use crate::config::ScoringConfig;
use crate::models::ProductRecord;
use crate::normalize::normalize;

// ============ Similarity ============

/// Lexical similarity between two strings, in [0, 1].
///
/// Both inputs are normalized, then compared with a longest-matching-blocks
/// sequence ratio (`2 * matched_chars / total_chars`). Symmetric. Two empty
/// strings score 0.0 so a record without the field contributes no signal.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    f64::from(TextDiff::from_chars(a.as_str(), b.as_str()).ratio())
}

// ============ Query preparation ============

/// A query prepared once per search: its normalized form plus the tokens
/// that participate in keyword matching.
#[derive(Debug, Clone)]
pub struct QueryTerms {
    pub normalized: String,
    pub tokens: Vec<String>,
}

impl QueryTerms {
    /// Normalize the query and keep the tokens longer than
    /// `min_token_len` chars; shorter ones ("de", "el", "con") are noise for
    /// containment matching, though they still weigh into similarity.
    pub fn prepare(query: &str, cfg: &ScoringConfig) -> Self {
        let normalized = normalize(query);
        let tokens = normalized
            .split_whitespace()
            .filter(|t| t.chars().count() > cfg.min_token_len)
            .map(str::to_string)
            .collect();
        Self { normalized, tokens }
    }
}

// ============ Keyword containment ============

/// Keyword containment score for one record, always ≥ 0.
///
/// Each token is awarded at most once, by field priority: name, then
/// description, then a catch-all over description, detail, benefits, and
/// categories. Containment direction is token-in-field: the token "comales"
/// does not hit a name of "comal".
pub fn keyword_score(terms: &QueryTerms, record: &ProductRecord, cfg: &ScoringConfig) -> f64 {
    if terms.tokens.is_empty() {
        return 0.0;
    }

    let name = normalize(record.name.as_deref().unwrap_or(""));
    let description = normalize(record.description.as_deref().unwrap_or(""));
    let catch_all = normalize(&record.searchable_text());

    let mut score = 0.0;
    for token in &terms.tokens {
        if name.contains(token.as_str()) {
            score += cfg.name_hit;
        } else if description.contains(token.as_str()) {
            score += cfg.description_hit;
        } else if catch_all.contains(token.as_str()) {
            score += cfg.any_field_hit;
        }
    }
    score
}

// ============ Aggregation ============

/// Aggregate relevance of one record for a prepared query.
///
/// Name and description similarity contribute only above their gates; keyword
/// containment is always added. Callers retain the record only when the total
/// is strictly above `min_score`.
pub fn score_record(terms: &QueryTerms, record: &ProductRecord, cfg: &ScoringConfig) -> f64 {
    let mut score = 0.0;

    let name_sim = similarity(&terms.normalized, record.name.as_deref().unwrap_or(""));
    if name_sim > cfg.name_sim_gate {
        score += name_sim * cfg.name_weight;
    }

    let desc_sim = similarity(&terms.normalized, record.description.as_deref().unwrap_or(""));
    if desc_sim > cfg.description_sim_gate {
        score += desc_sim * cfg.description_weight;
    }

    score + keyword_score(terms, record, cfg)
}
