//! Server configuration read from the environment

use std::net::{IpAddr, SocketAddr};

use polychain_wallet::rpc::{ProviderConfig, DEFAULT_RPC_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_ADDRESS};
use polychain_wallet::Network;
use thiserror::Error;

/// Default listen port
pub const DEFAULT_PORT: u16 = 3001;

/// Default listen host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Configuration error, fatal at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Network every wallet set is derived on
    pub network: Network,
    /// Ethereum enrichment endpoint
    pub provider: ProviderConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(port) => port.parse().map_err(|e| ConfigError::InvalidValue {
                key: "PORT",
                reason: format!("{}", e),
            })?,
            None => DEFAULT_PORT,
        };

        let network = match get("WALLET_NETWORK") {
            Some(network) => network.parse().map_err(|e| ConfigError::InvalidValue {
                key: "WALLET_NETWORK",
                reason: format!("{}", e),
            })?,
            None => Network::default(),
        };

        let timeout = match get("RPC_TIMEOUT_SECS") {
            Some(secs) => secs.parse().map_err(|e| ConfigError::InvalidValue {
                key: "RPC_TIMEOUT_SECS",
                reason: format!("{}", e),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout == 0 {
            return Err(ConfigError::InvalidValue {
                key: "RPC_TIMEOUT_SECS",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            network,
            provider: ProviderConfig {
                url: get("ETHEREUM_RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
                token_address: get("ETHEREUM_TOKEN_ADDRESS").unwrap_or_else(|| DEFAULT_TOKEN_ADDRESS.to_string()),
                watch_address: get("ETHEREUM_WATCH_ADDRESS"),
                timeout,
            },
        })
    }

    /// Socket address to bind
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|e| ConfigError::InvalidValue {
            key: "HOST",
            reason: format!("{}", e),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Host (and port) of the Ethereum endpoint, safe to log
    ///
    /// Credentials, path and query are dropped since providers often carry
    /// an API key in them.
    pub fn rpc_host(&self) -> &str {
        let url = self.provider.url.as_str();
        let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
        let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
        authority.rsplit_once('@').map_or(authority, |(_, host)| host)
    }
}
