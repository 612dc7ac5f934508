//! HTTP service shell.
//!
//! Exposes the relevance engine over a small JSON API for the conversational
//! flow that consumes it (historically an n8n webhook calling `/consultar`).
//! The shell does no scoring of its own: it validates the query, hands the
//! current catalog snapshot to the engine, and marshals the result.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/consultar` | Query the catalog, returns context + match count |
//! | `GET`  | `/` | Service banner with endpoints and source counts |
//! | `GET`  | `/health` | Health check (version + per-source counts) |
//! | `POST` | `/reload` | Rebuild the catalog snapshot and swap it in |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "message must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser-based chat
//! widgets can call the service directly.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::catalog::{self, CatalogStore};
use crate::config::Config;
use crate::context;
use crate::search::search_catalog;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    catalog: Arc<CatalogStore>,
}

/// Starts the HTTP context service.
///
/// Loads the catalog once, binds to the address configured in
/// `[server].bind`, and serves until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();

    let catalog = catalog::load_catalog(&config.catalog)?;
    info!(records = catalog.len(), "catalog loaded");

    let state = AppState {
        config: Arc::new(config.clone()),
        catalog: Arc::new(CatalogStore::new(catalog)),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(handle_index))
        .route("/consultar", post(handle_consultar))
        .route("/health", get(handle_health))
        .route("/reload", post(handle_reload))
        .layer(cors)
        .with_state(state);

    info!("catalog context service listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"bad_request"`).
    code: String,
    /// Human-readable error message.
    message: String,
}

/// Internal error type that converts into an HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 400 Bad Request error.
fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

/// Constructs a 500 Internal error.
fn internal_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

// ============ POST /consultar ============

#[derive(Deserialize)]
struct ConsultaRequest {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct ConsultaResponse {
    contexto: String,
    productos_encontrados: usize,
}

/// Handler for `POST /consultar`.
///
/// Validates the query, runs the scoring pipeline against the current
/// snapshot, and returns the formatted context. When nothing clears the
/// threshold the generic informational copy is substituted, so the caller
/// always receives usable text.
async fn handle_consultar(
    State(state): State<AppState>,
    Json(request): Json<ConsultaRequest>,
) -> Result<Json<ConsultaResponse>, AppError> {
    let message = request.message.as_deref().map(str::trim).unwrap_or("");
    if message.is_empty() {
        return Err(bad_request("message must not be empty"));
    }

    info!(query = message, "consulta received");

    let snapshot = state.catalog.snapshot();
    let matches = search_catalog(&snapshot, message, &state.config.scoring);

    let mut contexto = context::build_context(&matches, &state.config.format);
    if contexto.trim().is_empty() {
        contexto = context::GENERAL_INFO.to_string();
    }

    info!(
        chars = contexto.len(),
        matches = matches.len(),
        "context generated"
    );

    Ok(Json(ConsultaResponse {
        productos_encontrados: matches.len(),
        contexto,
    }))
}

// ============ GET / ============

#[derive(Serialize)]
struct IndexResponse {
    mensaje: String,
    endpoints_disponibles: Vec<String>,
    fuentes_cargadas: BTreeMap<String, usize>,
}

/// Handler for `GET /`. A human-readable banner confirming the service is up
/// and which catalog sources are loaded.
async fn handle_index(State(state): State<AppState>) -> Json<IndexResponse> {
    let snapshot = state.catalog.snapshot();
    Json(IndexResponse {
        mensaje: "Servicio de consultas de catálogo funcionando correctamente".to_string(),
        endpoints_disponibles: vec![
            "/consultar".to_string(),
            "/health".to_string(),
            "/reload".to_string(),
        ],
        fuentes_cargadas: snapshot.source_counts(),
    })
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    /// Always `"ok"` when the server is running.
    status: String,
    /// The crate version from `Cargo.toml`.
    version: String,
    /// Record counts per catalog source.
    sources: BTreeMap<String, usize>,
}

/// Handler for `GET /health`. Used by load balancers and monitoring.
async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.catalog.snapshot();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sources: snapshot.source_counts(),
    })
}

// ============ POST /reload ============

#[derive(Serialize)]
struct ReloadResponse {
    status: String,
    sources: BTreeMap<String, usize>,
}

/// Handler for `POST /reload`.
///
/// Rebuilds the catalog from the configured files and swaps it in only on
/// success; a failed reload keeps the current snapshot serving.
async fn handle_reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, AppError> {
    match catalog::load_catalog(&state.config.catalog) {
        Ok(catalog) => {
            let sources = catalog.source_counts();
            info!(records = catalog.len(), "catalog reloaded");
            state.catalog.swap(catalog);
            Ok(Json(ReloadResponse {
                status: "reloaded".to_string(),
                sources,
            }))
        }
        Err(err) => {
            error!(error = %err, "catalog reload failed, keeping current snapshot");
            Err(internal_error(format!("reload failed: {:#}", err)))
        }
    }
}
