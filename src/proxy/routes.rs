use anyhow::Result;
use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use reqwest::Client;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ProxyConfig;

const API_MOUNT: &str = "/api";

#[derive(Clone)]
pub struct ProxyState {
    pub client: Client,
    pub upstream_origin: String,
    pub upstream_name: String,
}

impl ProxyState {
    pub fn from_config(config: &ProxyConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            upstream_origin: config.upstream_origin.trim_end_matches('/').to_string(),
            upstream_name: config.upstream_name.clone(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("{name} API error: {status}")]
    Upstream { name: String, status: u16 },
    #[error("Proxy failed: {0}")]
    Failed(String),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            ProxyError::Upstream { ref name, status } => {
                let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                let body = Json(json!({ "error": format!("{} API error: {}", name, status) }));
                (code, body).into_response()
            }
            ProxyError::Failed(message) => {
                let body = Json(json!({ "error": "Proxy failed", "message": message }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(e: reqwest::Error) -> Self {
        ProxyError::Failed(e.to_string())
    }
}

pub fn create_router(state: ProxyState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(API_MOUNT, any(forward))
        .route("/api/", any(forward))
        .route("/api/*path", any(forward))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

/// Upstream target for a request under the mount: same path minus `/api`, same raw query.
pub(crate) fn upstream_url(origin: &str, uri: &Uri) -> String {
    let rest = uri.path().strip_prefix(API_MOUNT).unwrap_or(uri.path());
    let path = if rest.is_empty() { "/" } else { rest };
    match uri.query() {
        Some(q) => format!("{}{}?{}", origin, path, q),
        None => format!("{}{}", origin, path),
    }
}

async fn forward(
    State(state): State<ProxyState>,
    method: Method,
    uri: Uri,
) -> Result<(StatusCode, Json<Value>), ProxyError> {
    let url = upstream_url(&state.upstream_origin, &uri);
    tracing::info!("Proxying: {} {}", method, url);

    relay(&state, method, &url).await.map_err(|e| {
        match &e {
            ProxyError::Failed(msg) => tracing::error!("Proxy error for {}: {}", url, msg),
            ProxyError::Upstream { status, .. } => tracing::warn!("Upstream returned {} for {}", status, url),
        }
        e
    })
}

async fn relay(state: &ProxyState, method: Method, url: &str) -> Result<(StatusCode, Json<Value>), ProxyError> {
    let response = state.client.request(method, url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProxyError::Upstream {
            name: state.upstream_name.clone(),
            status: status.as_u16(),
        });
    }
    let data: Value = response.json().await?;
    Ok((status, Json(data)))
}
