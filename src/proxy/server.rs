use anyhow::{Context, Result};
use tokio::net::TcpListener;

use super::routes::{create_router, ProxyState};
use crate::config::ProxyConfig;

pub async fn serve(config: &ProxyConfig) -> Result<()> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    serve_with_listener(listener, config).await
}

/// Runs on an already-bound listener until the server stops.
pub async fn serve_with_listener(listener: TcpListener, config: &ProxyConfig) -> Result<()> {
    let app = create_router(ProxyState::from_config(config)?);
    tracing::info!(
        "Proxy server running on {} -> {}",
        listener.local_addr()?,
        config.upstream_origin
    );
    axum::serve(listener, app).await?;
    Ok(())
}
