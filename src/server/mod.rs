// HTTP transport
//
// Thin JSON layer over discovery, the wipe engine and the verifier. Each
// request runs the synchronous core to completion on the blocking pool.

pub mod routes;

use crate::bridge::{AdbBridge, BridgeExecutor};
use crate::discovery::TargetDiscovery;
use crate::erase::HostFs;
use crate::{WipeConfig, WipeOrchestrator};
use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Shared, read-only handler state. Holds no per-request data.
pub struct AppState {
    pub discovery: TargetDiscovery,
    pub orchestrator: WipeOrchestrator,
}

impl AppState {
    pub fn new(config: WipeConfig) -> Self {
        let bridge: Arc<dyn BridgeExecutor> = Arc::new(AdbBridge::from_config(&config));
        Self::with_bridge(config, bridge)
    }

    pub fn with_bridge(config: WipeConfig, bridge: Arc<dyn BridgeExecutor>) -> Self {
        Self {
            discovery: TargetDiscovery::new(config.clone(), bridge.clone()),
            orchestrator: WipeOrchestrator::with_parts(config, bridge, Arc::new(HostFs)),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health_check))
        .route("/devices", get(routes::list_devices))
        .route("/wipe/safe/*target_id", post(routes::safe_wipe))
        .route("/wipe/full/*target_id", post(routes::full_wipe))
        .route("/verify/*target_id", get(routes::verify))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, config: WipeConfig) -> Result<()> {
    let state = Arc::new(AppState::new(config));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(%addr, "Listening");
    axum::serve(listener, app).await.context("server terminated")?;
    Ok(())
}
