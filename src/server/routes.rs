use super::AppState;
use crate::discovery::DeviceListing;
use crate::verification::Verifier;
use crate::{VerifyResult, WipeError, WipeLevel, WipeRequest, WipeResult};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// Error surfaced to HTTP clients. Core operations never fail; this only
/// covers a blocking task that could not complete.
#[derive(Debug)]
pub struct ApiError(WipeError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "Request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "status": "error", "message": self.0.to_string() })),
        )
            .into_response()
    }
}

async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError(WipeError::Server(e.to_string())))
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn list_devices(State(state): State<Arc<AppState>>) -> Result<Json<DeviceListing>, ApiError> {
    let listing = blocking(move || state.discovery.listing()).await?;
    Ok(Json(listing))
}

pub async fn safe_wipe(
    State(state): State<Arc<AppState>>,
    Path(target_id): Path<String>,
) -> Result<Json<WipeResult>, ApiError> {
    run_wipe(state, target_id, WipeLevel::Safe).await
}

pub async fn full_wipe(
    State(state): State<Arc<AppState>>,
    Path(target_id): Path<String>,
) -> Result<Json<WipeResult>, ApiError> {
    run_wipe(state, target_id, WipeLevel::Full).await
}

async fn run_wipe(
    state: Arc<AppState>,
    target_id: String,
    level: WipeLevel,
) -> Result<Json<WipeResult>, ApiError> {
    let request = WipeRequest { target_id, level };
    let result = blocking(move || state.orchestrator.execute(&request)).await?;
    Ok(Json(result))
}

pub async fn verify(Path(target_id): Path<String>) -> Result<Json<VerifyResult>, ApiError> {
    let result = blocking(move || Verifier::verify(&target_id)).await?;
    Ok(Json(result))
}
