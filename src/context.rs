//! Context digest formatting.
//!
//! Turns ranked matches into the compact text block handed to the chat flow
//! that consumes this service. Output copy stays in Spanish, matching the
//! audience of the catalog. The formatter returns an empty string for an
//! empty result; substituting the generic fallback is the caller's job.

use crate::config::{EllipsisMode, FormatConfig};
use crate::models::ScoredMatch;

/// Header introducing the product digest.
const HEADER: &str = "=== PRODUCTOS RELEVANTES ===";

/// Fallback copy used by callers when nothing clears the score threshold.
pub const GENERAL_INFO: &str = "=== PRODUCTOS DISPONIBLES ===\n\
Contamos con una amplia gama de productos para tortillerias y panaderias.\n\
Por favor, se mas especifico en tu consulta para ayudarte mejor.\n\
Puedes preguntar sobre productos, precios, beneficios o caracteristicas especificas.";

/// Render ranked matches into the digest text.
///
/// Emits one block per match in rank order: index and name, price when
/// present, then the budgeted description, benefits, and detail lines, and
/// the presentation when present.
pub fn build_context(matches: &[ScoredMatch<'_>], cfg: &FormatConfig) -> String {
    if matches.is_empty() {
        return String::new();
    }

    let mut parts: Vec<String> = Vec::new();
    parts.push(HEADER.to_string());

    for (i, m) in matches.iter().enumerate() {
        let record = m.record;
        parts.push(format!(
            "PRODUCTO {}: {}",
            i + 1,
            record.name.as_deref().unwrap_or("Sin nombre")
        ));
        if let Some(price) = &record.price {
            parts.push(format!("Precio: {}", price));
        }
        parts.push(format!(
            "Descripcion: {}",
            clip(
                record.description.as_deref().unwrap_or(""),
                cfg.description_budget,
                cfg.ellipsis
            )
        ));
        if let Some(benefits) = non_empty(record.benefits.as_deref()) {
            parts.push(format!(
                "Beneficios: {}",
                clip(benefits, cfg.benefits_budget, cfg.ellipsis)
            ));
        }
        if let Some(detail) = non_empty(record.detail.as_deref()) {
            parts.push(format!(
                "Detalles: {}",
                clip(detail, cfg.detail_budget, cfg.ellipsis)
            ));
        }
        if let Some(presentation) = non_empty(record.presentation.as_deref()) {
            parts.push(format!("Presentacion: {}", presentation));
        }
        parts.push(String::new());
    }

    parts.join("\n")
}

/// Truncate text to a character budget.
///
/// In `Always` mode the `...` marker is appended whether or not anything was
/// cut, which reproduces the historical digest output; `Overflow` appends it
/// only on real truncation. Budgets count chars, not bytes, so accented text
/// never splits mid-character.
pub fn clip(text: &str, budget: usize, mode: EllipsisMode) -> String {
    let mut chars = text.char_indices();
    let clipped = match chars.nth(budget) {
        Some((idx, _)) => &text[..idx],
        None => text,
    };
    let truncated = clipped.len() < text.len();
    match mode {
        EllipsisMode::Always => format!("{}...", clipped),
        EllipsisMode::Overflow if truncated => format!("{}...", clipped),
        EllipsisMode::Overflow => clipped.to_string(),
    }
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.filter(|s| !s.trim().is_empty())
}
