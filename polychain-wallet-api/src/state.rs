//! Application state management

use std::sync::Arc;

use polychain_wallet::rpc::EthereumRpc;
use polychain_wallet::{Network, Result};

use crate::config::Config;

/// Application state shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// Network every wallet set is derived on
    pub network: Network,
    /// Ethereum enrichment client, built once at startup
    pub rpc: Arc<EthereumRpc>,
}

impl AppState {
    /// Create a new application state
    pub fn new(network: Network, rpc: EthereumRpc) -> Self {
        Self {
            network,
            rpc: Arc::new(rpc),
        }
    }

    /// Build the state described by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let rpc = EthereumRpc::new(&config.provider)?;
        Ok(Self::new(config.network, rpc))
    }
}
