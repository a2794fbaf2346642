//! Ethereum enrichment handler

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use polychain_wallet::rpc::Enrichment;
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::QueryParams;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct EnrichmentQuery {
    /// Address to read the native balance of; the watch address when absent
    pub address: Option<String>,
}

/// Read the native balance and token supply
///
/// Unlike enrichment attached to a restored wallet set, a failed lookup here
/// is reported as an error.
pub async fn enrichment(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<EnrichmentQuery>,
) -> Result<Json<Enrichment>, ApiError> {
    let enrichment = state.rpc.enrich(query.address.as_deref()).await?;

    tracing::info!(address = %enrichment.address, "ethereum enrichment read");
    Ok(Json(enrichment))
}
