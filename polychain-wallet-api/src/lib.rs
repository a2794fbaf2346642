//! Polychain Wallet API
//!
//! HTTP front end for the polychain multi-chain wallet.

pub mod config;
pub mod error;
pub mod extract;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(services::health::check))
        .route("/create-wallet", get(services::wallet::create_wallet))
        .route("/restore-wallet", post(services::wallet::restore_wallet))
        .route("/ethereum/enrichment", get(services::ethereum::enrichment))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
