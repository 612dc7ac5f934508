//! # Catalog Context CLI (`catx`)
//!
//! The `catx` binary is the primary interface for Catalog Context. It
//! provides commands for searching the product catalog, inspecting the
//! configured sources, and starting the HTTP context service.
//!
//! ## Usage
//!
//! ```bash
//! catx --config ./config/catx.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `catx search "<query>"` | Score the catalog and print ranked matches |
//! | `catx sources` | List configured catalog sources and record counts |
//! | `catx stats` | Print record counts and field coverage |
//! | `catx serve` | Start the HTTP context service |
//!
//! ## Examples
//!
//! ```bash
//! # Ranked matches with scores and source tags
//! catx search "mejorador para tortillas de maiz" --config ./config/catx.toml
//!
//! # The formatted digest a chat flow would receive
//! catx search "conservador para pan" --context
//!
//! # Restrict scoring to a single catalog source
//! catx search "antiadherente" --source page --limit 3
//!
//! # Start the service
//! catx serve --config ./config/catx.toml
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use catalog_context::{config, search, server, sources, stats};

/// Catalog Context CLI — an in-memory product catalog relevance engine and
/// context service for chat assistants.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file holding the catalog sources, scoring policy, and server settings.
#[derive(Parser)]
#[command(
    name = "catx",
    about = "Catalog Context — product catalog relevance scoring and context service",
    version,
    long_about = "Catalog Context loads product records from JSON catalog exports, ranks them \
    against free-text queries with a deterministic lexical scoring pipeline, and serves the \
    formatted context over a small HTTP API."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/catx.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Search the product catalog.
    ///
    /// Scores every record against the query, deduplicates by normalized
    /// name, and prints the top matches with scores and source tags.
    Search {
        /// The search query string.
        query: String,

        /// Restrict scoring to a single catalog source (e.g. `combined`,
        /// `page`, `meli`).
        #[arg(long)]
        source: Option<String>,

        /// Maximum number of results (overrides `scoring.limit`).
        #[arg(long)]
        limit: Option<usize>,

        /// Print the formatted context digest instead of the result list.
        #[arg(long)]
        context: bool,
    },

    /// List configured catalog sources and their record counts.
    Sources,

    /// Print catalog statistics (record counts, field coverage).
    Stats,

    /// Start the HTTP context service.
    ///
    /// Loads the catalog once and binds to the address configured in
    /// `[server].bind`. The catalog can be reloaded at runtime via
    /// `POST /reload`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Search {
            query,
            source,
            limit,
            context,
        } => {
            search::run_search(&cfg, &query, source, limit, context)?;
        }
        Commands::Sources => {
            sources::list_sources(&cfg)?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg)?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
