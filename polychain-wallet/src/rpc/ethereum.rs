//! Ethereum balance and ERC-20 supply lookups

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use ethers::contract::abigen;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, U256};
use ethers::utils::{format_units, to_checksum};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use super::provider::ProviderConfig;

// Generate type-safe bindings for the ERC20 reads we need
abigen!(
    IERC20,
    r#"[
        function totalSupply() external view returns (uint256)
        function decimals() external view returns (uint8)
    ]"#,
);

/// Decimals of ether
const NATIVE_DECIMALS: u8 = 18;

/// On-chain data read for one Ethereum address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrichment {
    /// Address whose balance was read
    pub address: String,
    /// Native balance in ether
    pub native_balance: String,
    /// Token contract address
    pub token_address: String,
    /// Token `totalSupply()` scaled by `decimals()`
    pub token_total_supply: String,
    /// Token `decimals()`
    pub token_decimals: u8,
}

/// Best-effort enrichment result attached to a wallet record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum EnrichmentStatus {
    Available(Enrichment),
    Unavailable { reason: String },
}

/// Long-lived handle on the configured Ethereum JSON-RPC endpoint
#[derive(Debug, Clone)]
pub struct EthereumRpc {
    /// Provider
    provider: Arc<Provider<Http>>,
    /// ERC-20 contract reported on
    token_address: Address,
    /// Default balance address
    watch_address: Address,
    /// Bound on one enrichment round trip
    timeout: Duration,
}

impl EthereumRpc {
    /// Create the RPC handle; no network traffic happens here
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let provider = Provider::<Http>::try_from(config.url.as_str())
            .map_err(|e| Error::Provider(format!("Failed to create provider: {}", e)))?;

        let token_address = parse_address(&config.token_address)?;
        let watch_address = match &config.watch_address {
            Some(address) => parse_address(address)?,
            None => token_address,
        };

        Ok(Self {
            provider: Arc::new(provider),
            token_address,
            watch_address,
            timeout: config.timeout(),
        })
    }

    /// The ERC-20 contract reported on
    pub fn token_address(&self) -> Address {
        self.token_address
    }

    /// Get the native balance of `address` in wei
    pub async fn native_balance(&self, address: Address) -> Result<U256> {
        self.provider
            .get_balance(address, None)
            .await
            .map_err(|e| Error::RemoteUnavailable(format!("Failed to get ETH balance: {}", e)))
    }

    /// Get the raw token supply and the token's decimals
    pub async fn token_supply(&self) -> Result<(U256, u8)> {
        let token = IERC20::new(self.token_address, self.provider.clone());
        let total_supply = token.total_supply();
        let decimals = token.decimals();

        tokio::try_join!(total_supply.call(), decimals.call())
            .map_err(|e| Error::RemoteUnavailable(format!("Failed to read token supply: {}", e)))
    }

    /// Read balance and token supply, bounded by the configured timeout
    ///
    /// Without an explicit `address` the configured watch address is used.
    pub async fn enrich(&self, address: Option<&str>) -> Result<Enrichment> {
        let address = match address {
            Some(address) => parse_address(address)?,
            None => self.watch_address,
        };

        let lookup = async {
            let (balance, (supply, decimals)) =
                tokio::try_join!(self.native_balance(address), self.token_supply())?;

            Ok(Enrichment {
                address: to_checksum(&address, None),
                native_balance: format_amount(balance, NATIVE_DECIMALS)?,
                token_address: to_checksum(&self.token_address, None),
                token_total_supply: format_amount(supply, decimals)?,
                token_decimals: decimals,
            })
        };

        tokio::time::timeout(self.timeout, lookup)
            .await
            .map_err(|_| {
                Error::RemoteUnavailable(format!("RPC call timed out after {}s", self.timeout.as_secs()))
            })?
    }

    /// Enrich `address`, turning any failure into an unavailable marker
    pub async fn enrichment_status(&self, address: &str) -> EnrichmentStatus {
        match self.enrich(Some(address)).await {
            Ok(enrichment) => EnrichmentStatus::Available(enrichment),
            Err(e) => {
                tracing::warn!(error = %e, "ethereum enrichment unavailable");
                EnrichmentStatus::Unavailable { reason: e.to_string() }
            }
        }
    }
}

/// Render a raw integer amount scaled by `decimals` as a decimal string
pub fn format_amount(value: U256, decimals: u8) -> Result<String> {
    let formatted = format_units(value, i32::from(decimals))
        .map_err(|e| Error::Encoding(format!("Failed to format amount: {}", e)))?;

    if !formatted.contains('.') {
        return Ok(formatted);
    }
    Ok(formatted.trim_end_matches('0').trim_end_matches('.').to_string())
}

fn parse_address(address: &str) -> Result<Address> {
    Address::from_str(address.trim())
        .map_err(|e| Error::InvalidInput(format!("Invalid Ethereum address {}: {}", address, e)))
}
