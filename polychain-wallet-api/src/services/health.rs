//! Health check handler

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use polychain_wallet::Network;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub network: Network,
}

pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: polychain_wallet::VERSION.to_string(),
        network: state.network,
    })
}
