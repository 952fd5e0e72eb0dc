//! Service health handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Liveness payload with collaborator status
#[derive(Serialize)]
pub struct ServiceHealth {
    pub status: &'static str,
    pub collaborator_configured: bool,
    pub collaborator_available: bool,
    pub collaborator: String,
}

/// GET /api/health - Service liveness and collaborator availability
pub async fn service_health(State(state): State<Arc<AppState>>) -> Json<ServiceHealth> {
    let configured = state.ai.configured();
    let available = state.ai.available().await;
    Json(ServiceHealth {
        status: "ok",
        collaborator_configured: configured,
        collaborator_available: available,
        collaborator: state.ai.describe(),
    })
}
