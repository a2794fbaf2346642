//! Wallet generation and restoration handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use polychain_wallet::crypto::mnemonic::{generate_mnemonic, parse_mnemonic, MnemonicStrength};
use polychain_wallet::{assemble, Chain, Mnemonic, Network, WalletSet};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::{JsonBody, QueryParams};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateWalletQuery {
    /// Mnemonic length in words
    pub words: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RestoreWalletRequest {
    pub mnemonic: String,
    #[serde(default)]
    pub passphrase: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RestoreWalletQuery {
    /// Attach Ethereum enrichment to the restored set
    #[serde(default)]
    pub enrich: bool,
}

/// Wallet set plus the mnemonic it was derived from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletResponse {
    pub mnemonic: String,
    #[serde(flatten)]
    pub wallet_set: WalletSet,
    pub addresses: BTreeMap<Chain, String>,
}

/// Generate a fresh mnemonic and derive its wallet set
pub async fn create_wallet(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<CreateWalletQuery>,
) -> Result<Json<WalletResponse>, ApiError> {
    let strength = match query.words {
        Some(words) => MnemonicStrength::from_word_count(words)?,
        None => MnemonicStrength::default(),
    };
    let mnemonic = generate_mnemonic(strength)?;

    let response = derive(mnemonic, None, state.network).await?;

    tracing::info!(
        network = %state.network,
        words = strength.word_count(),
        failures = response.wallet_set.failures().len(),
        "wallet set created"
    );
    Ok(Json(response))
}

/// Derive the wallet set of a caller-supplied mnemonic
pub async fn restore_wallet(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<RestoreWalletQuery>,
    JsonBody(request): JsonBody<RestoreWalletRequest>,
) -> Result<Json<WalletResponse>, ApiError> {
    let mnemonic = parse_mnemonic(&request.mnemonic)?;

    let mut response = derive(mnemonic, request.passphrase, state.network).await?;

    if query.enrich {
        let address = response.wallet_set.record(Chain::Ethereum).map(|record| record.address.clone());
        if let Some(address) = address {
            let status = state.rpc.enrichment_status(&address).await;
            if let Some(record) = response.wallet_set.record_mut(Chain::Ethereum) {
                record.balance = Some(status);
            }
        }
    }

    tracing::info!(
        network = %state.network,
        enrich = query.enrich,
        failures = response.wallet_set.failures().len(),
        "wallet set restored"
    );
    Ok(Json(response))
}

/// Run the CPU-bound assembly on the blocking pool
async fn derive(mnemonic: Mnemonic, passphrase: Option<String>, network: Network) -> Result<WalletResponse, ApiError> {
    tokio::task::spawn_blocking(move || {
        let wallet_set = assemble(&mnemonic, passphrase.as_deref(), network);
        WalletResponse {
            mnemonic: mnemonic.to_string(),
            addresses: wallet_set.addresses(),
            wallet_set,
        }
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Wallet derivation task failed: {}", e)))
}
