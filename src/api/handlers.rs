//! HTTP request handlers for the chunking service.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::router::{ChunkError, ChunkingRouter};
use crate::types::{
    ChunkRequest, ChunkResponse, ChunkingConfig, ChunkingProfile, SemanticSettings, ServiceConfig, Strategy,
    MARKDOWN_SEPARATORS,
};

/// Application state shared across handlers.
pub struct AppState {
    pub router: ChunkingRouter,
    pub config: ServiceConfig,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Chunk a single document.
pub async fn chunk_document(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChunkRequest>,
) -> Result<Json<ChunkResponse>, ChunkError> {
    let config = request_config(&state.config, &request)?;
    let chunks = state.router.chunk(request.strategy, &request.text, &config).await?;
    Ok(Json(ChunkResponse::new(request.strategy, chunks)))
}

/// Build the per-call config for a request.
///
/// Fields given in the request's `config` win over the named profile, which
/// wins over the service defaults. Without a profile, the markdown strategy
/// starts from the markdown separator ordering.
fn request_config(service: &ServiceConfig, request: &ChunkRequest) -> Result<ChunkingConfig, ChunkError> {
    let base = match &request.profile {
        Some(name) => ChunkingProfile::find(name)
            .map(|p| p.to_config())
            .ok_or_else(|| ChunkError::UnknownProfile(name.clone()))?,
        None if request.strategy == Strategy::Markdown => {
            service.chunking_config().with_separators(MARKDOWN_SEPARATORS)
        }
        None => service.chunking_config(),
    };

    let mut config = request.config.clone().unwrap_or_default().apply(base);
    inherit_semantic(&mut config.semantic, &service.semantic);
    Ok(config)
}

/// Fill semantic fields the request left empty from the service settings.
///
/// The service key is only handed out for the service's own endpoint: a
/// request that names a different `base_url` must bring its own key.
fn inherit_semantic(semantic: &mut SemanticSettings, defaults: &SemanticSettings) {
    if semantic.provider != defaults.provider {
        return;
    }

    let same_endpoint = semantic.base_url.is_none() || semantic.base_url == defaults.base_url;
    if same_endpoint {
        semantic.api_key = semantic.api_key.take().or_else(|| defaults.api_key.clone());
    }
    semantic.base_url = semantic.base_url.take().or_else(|| defaults.base_url.clone());
    semantic.model = semantic.model.take().or_else(|| defaults.model.clone());
}

/// List available profiles.
pub async fn list_profiles() -> Json<Vec<ChunkingProfile>> {
    Json(ChunkingProfile::defaults())
}

/// A chunking strategy and what it does.
#[derive(Debug, Serialize)]
pub struct StrategyInfo {
    name: String,
    description: String,
}

/// List available strategies.
pub async fn list_strategies(State(state): State<Arc<AppState>>) -> Json<Vec<StrategyInfo>> {
    let strategies: Vec<StrategyInfo> = state
        .router
        .list_strategies()
        .into_iter()
        .map(|(name, desc)| StrategyInfo {
            name: name.to_string(),
            description: desc.to_string(),
        })
        .collect();

    Json(strategies)
}

impl IntoResponse for ChunkError {
    fn into_response(self) -> Response {
        let status = match &self {
            ChunkError::UnknownProfile(_) => StatusCode::NOT_FOUND,
            ChunkError::Semantic(e) if e.is_configuration() => StatusCode::BAD_REQUEST,
            ChunkError::Semantic(_) => StatusCode::BAD_GATEWAY,
        };
        warn!(status = %status, error = %self, "Chunk request failed");

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
