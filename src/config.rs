use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub format: FormatConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub sources: Vec<CatalogSourceConfig>,
}

/// One catalog JSON file and the tag its records carry.
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogSourceConfig {
    pub name: String,
    pub path: PathBuf,
    /// Skip this source with a warning when the file is missing instead of
    /// failing the whole load.
    #[serde(default)]
    pub optional: bool,
}

/// Relevance policy. The defaults were carried over from the tuned values of
/// the original deployment; they are policy, not invariants, so every one of
/// them is overridable from the config file.
#[derive(Debug, Deserialize, Clone)]
pub struct ScoringConfig {
    /// Name similarity contributes only above this ratio.
    #[serde(default = "default_name_sim_gate")]
    pub name_sim_gate: f64,
    /// Description similarity contributes only above this ratio.
    #[serde(default = "default_description_sim_gate")]
    pub description_sim_gate: f64,
    /// Multiplier for name similarity.
    #[serde(default = "default_name_weight")]
    pub name_weight: f64,
    /// Multiplier for description similarity.
    #[serde(default = "default_description_weight")]
    pub description_weight: f64,
    /// Keyword award for a token contained in the name.
    #[serde(default = "default_name_hit")]
    pub name_hit: f64,
    /// Keyword award for a token contained in the description.
    #[serde(default = "default_description_hit")]
    pub description_hit: f64,
    /// Keyword award for a token contained anywhere else.
    #[serde(default = "default_any_field_hit")]
    pub any_field_hit: f64,
    /// Tokens must be strictly longer than this many chars to participate in
    /// keyword matching.
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,
    /// A record is kept only when its total score strictly exceeds this.
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    /// Maximum number of results returned per query.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_name_sim_gate() -> f64 {
    0.3
}
fn default_description_sim_gate() -> f64 {
    0.2
}
fn default_name_weight() -> f64 {
    3.0
}
fn default_description_weight() -> f64 {
    1.5
}
fn default_name_hit() -> f64 {
    2.0
}
fn default_description_hit() -> f64 {
    1.0
}
fn default_any_field_hit() -> f64 {
    0.5
}
fn default_min_token_len() -> usize {
    3
}
fn default_min_score() -> f64 {
    0.5
}
fn default_limit() -> usize {
    5
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            name_sim_gate: default_name_sim_gate(),
            description_sim_gate: default_description_sim_gate(),
            name_weight: default_name_weight(),
            description_weight: default_description_weight(),
            name_hit: default_name_hit(),
            description_hit: default_description_hit(),
            any_field_hit: default_any_field_hit(),
            min_token_len: default_min_token_len(),
            min_score: default_min_score(),
            limit: default_limit(),
        }
    }
}

/// Context digest formatting budgets.
#[derive(Debug, Deserialize, Clone)]
pub struct FormatConfig {
    /// Character budget for the description line.
    #[serde(default = "default_description_budget")]
    pub description_budget: usize,
    /// Character budget for the benefits line.
    #[serde(default = "default_benefits_budget")]
    pub benefits_budget: usize,
    /// Character budget for the detail line.
    #[serde(default = "default_detail_budget")]
    pub detail_budget: usize,
    /// When to append the `...` marker to budgeted fields. `always`
    /// reproduces the historical output (marker even on fields that fit);
    /// `overflow` appends it only on real truncation.
    #[serde(default = "default_ellipsis")]
    pub ellipsis: EllipsisMode,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EllipsisMode {
    Always,
    Overflow,
}

fn default_description_budget() -> usize {
    200
}
fn default_benefits_budget() -> usize {
    150
}
fn default_detail_budget() -> usize {
    150
}
fn default_ellipsis() -> EllipsisMode {
    EllipsisMode::Always
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            description_budget: default_description_budget(),
            benefits_budget: default_benefits_budget(),
            detail_budget: default_detail_budget(),
            ellipsis: default_ellipsis(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.catalog.sources.is_empty() {
        anyhow::bail!("catalog.sources must list at least one source");
    }
    for source in &config.catalog.sources {
        if source.name.trim().is_empty() {
            anyhow::bail!("catalog source names must not be empty");
        }
    }
    for (i, a) in config.catalog.sources.iter().enumerate() {
        if config.catalog.sources[i + 1..].iter().any(|b| b.name == a.name) {
            anyhow::bail!("duplicate catalog source name: '{}'", a.name);
        }
    }

    let scoring = &config.scoring;
    if !(0.0..=1.0).contains(&scoring.name_sim_gate) {
        anyhow::bail!("scoring.name_sim_gate must be in [0.0, 1.0]");
    }
    if !(0.0..=1.0).contains(&scoring.description_sim_gate) {
        anyhow::bail!("scoring.description_sim_gate must be in [0.0, 1.0]");
    }
    for (key, value) in [
        ("scoring.name_weight", scoring.name_weight),
        ("scoring.description_weight", scoring.description_weight),
        ("scoring.name_hit", scoring.name_hit),
        ("scoring.description_hit", scoring.description_hit),
        ("scoring.any_field_hit", scoring.any_field_hit),
        ("scoring.min_score", scoring.min_score),
    ] {
        if value < 0.0 {
            anyhow::bail!("{} must be >= 0", key);
        }
    }
    if scoring.limit < 1 {
        anyhow::bail!("scoring.limit must be >= 1");
    }

    let format = &config.format;
    if format.description_budget < 1 || format.benefits_budget < 1 || format.detail_budget < 1 {
        anyhow::bail!("format budgets must be >= 1");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> Result<Config> {
        let config: Config = toml::from_str(toml_str)?;
        validate(&config)?;
        Ok(config)
    }

    const MINIMAL: &str = r#"
        [[catalog.sources]]
        name = "combined"
        path = "combined.json"

        [server]
        bind = "127.0.0.1:5000"
    "#;

    #[test]
    fn test_minimal_config_gets_defaults() {
        let config = parse(MINIMAL).unwrap();
        assert_eq!(config.scoring.name_sim_gate, 0.3);
        assert_eq!(config.scoring.description_sim_gate, 0.2);
        assert_eq!(config.scoring.name_weight, 3.0);
        assert_eq!(config.scoring.description_weight, 1.5);
        assert_eq!(config.scoring.min_token_len, 3);
        assert_eq!(config.scoring.min_score, 0.5);
        assert_eq!(config.scoring.limit, 5);
        assert_eq!(config.format.description_budget, 200);
        assert_eq!(config.format.benefits_budget, 150);
        assert_eq!(config.format.detail_budget, 150);
        assert_eq!(config.format.ellipsis, EllipsisMode::Always);
    }

    #[test]
    fn test_scoring_overrides() {
        let config = parse(
            r#"
            [[catalog.sources]]
            name = "combined"
            path = "combined.json"

            [scoring]
            min_score = 0.2
            limit = 10
            min_token_len = 2

            [format]
            ellipsis = "overflow"

            [server]
            bind = "127.0.0.1:5000"
        "#,
        )
        .unwrap();
        assert_eq!(config.scoring.min_score, 0.2);
        assert_eq!(config.scoring.limit, 10);
        assert_eq!(config.scoring.min_token_len, 2);
        assert_eq!(config.format.ellipsis, EllipsisMode::Overflow);
        // Untouched keys keep their defaults.
        assert_eq!(config.scoring.name_weight, 3.0);
    }

    #[test]
    fn test_rejects_empty_sources() {
        let err = parse(
            r#"
            [catalog]
            sources = []

            [server]
            bind = "127.0.0.1:5000"
        "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("at least one source"));
    }

    #[test]
    fn test_rejects_duplicate_source_names() {
        let err = parse(
            r#"
            [[catalog.sources]]
            name = "combined"
            path = "a.json"

            [[catalog.sources]]
            name = "combined"
            path = "b.json"

            [server]
            bind = "127.0.0.1:5000"
        "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate catalog source"));
    }

    #[test]
    fn test_rejects_gate_out_of_range() {
        let err = parse(&format!(
            "{}\n[scoring]\nname_sim_gate = 1.5\n",
            r#"
            [[catalog.sources]]
            name = "combined"
            path = "combined.json"

            [server]
            bind = "127.0.0.1:5000"
        "#
        ))
        .unwrap_err();
        assert!(err.to_string().contains("name_sim_gate"));
    }

    #[test]
    fn test_rejects_zero_limit() {
        let err = parse(&format!(
            "{}\n[scoring]\nlimit = 0\n",
            r#"
            [[catalog.sources]]
            name = "combined"
            path = "combined.json"

            [server]
            bind = "127.0.0.1:5000"
        "#
        ))
        .unwrap_err();
        assert!(err.to_string().contains("limit"));
    }
}
