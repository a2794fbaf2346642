//! RPC provider configuration

use std::time::Duration;

/// Ethereum mainnet JSON-RPC endpoint used when none is configured
pub const DEFAULT_RPC_URL: &str = "https://rpc.ankr.com/eth";

/// USDC on Ethereum mainnet
pub const DEFAULT_TOKEN_ADDRESS: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";

/// Default bound on a single enrichment round trip
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Provider URL
    pub url: String,
    /// ERC-20 contract whose supply is reported
    pub token_address: String,
    /// Address whose native balance is reported when the caller names none
    pub watch_address: Option<String>,
    /// Timeout in seconds
    pub timeout: u64,
}

impl ProviderConfig {
    /// Timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RPC_URL.to_string(),
            token_address: DEFAULT_TOKEN_ADDRESS.to_string(),
            watch_address: None,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}
