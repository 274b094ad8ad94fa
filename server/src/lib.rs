//! # HTTP Server
//!
//! The externally observable contract of raglite:
//!
//! - `GET /search?query=<string>&k=<int, default 3>`: top-k matches as
//!   `{"matches": [{"file", "score", "content"}, ...]}`, ordered descending
//!   by score
//! - `GET /health`: service status
//!
//! The engine is built once at startup and shared read-only behind an
//! [`Arc`]; handlers never mutate it.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use raglite_search::{DEFAULT_TOP_K, EmbeddingError, ScoredMatch, SearchEngine, SearchError};

/// Shared server state.
pub struct AppState {
    /// The search engine, immutable after startup.
    pub engine: SearchEngine,
}

/// Query parameters for `GET /search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Free-text query. Required; a missing value is rejected with 400 by
    /// the query extractor.
    pub query: String,

    /// Number of results to return.
    #[serde(default = "default_k")]
    pub k: usize,
}

fn default_k() -> usize {
    DEFAULT_TOP_K
}

/// Response body for `GET /search`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Matches ordered descending by score.
    pub matches: Vec<ScoredMatch>,
}

/// Error body returned on failures.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Build the router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/search", get(search))
        .route("/health", get(health))
        .with_state(state)
}

/// GET /search - rank the corpus against the query.
async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorBody>)> {
    debug!("Search request: k={}", params.k);

    let matches = state
        .engine
        .search(&params.query, params.k)
        .await
        .map_err(into_http_error)?;

    Ok(Json(SearchResponse { matches }))
}

/// GET /health - service status.
async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "documents": state.engine.corpus().len(),
        "backend": state.engine.backend_name(),
    }))
}

fn into_http_error(err: SearchError) -> (StatusCode, Json<ErrorBody>) {
    let status = match &err {
        SearchError::Embedding(EmbeddingError::DimensionMismatch { .. })
        | SearchError::Embedding(EmbeddingError::DegenerateVector) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    error!("Search request failed: {err}");
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}
