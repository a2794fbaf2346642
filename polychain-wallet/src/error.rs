//! Error types for the polychain-wallet library

use thiserror::Error;

/// Custom error type for wallet derivation and enrichment
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Entropy source failure: {0}")]
    Entropy(String),

    #[error("Invalid derivation path: {0}")]
    InvalidDerivationPath(String),

    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// A single chain failed to derive; sibling chains are unaffected.
    #[error("Derivation failed for {chain}: {reason}")]
    DerivationFailure { chain: String, reason: String },

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Remote endpoint unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not supported: {0}")]
    NotSupported(String),
}

impl Error {
    /// Whether the caller can fix the error by resubmitting different input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMnemonic(_)
                | Self::InvalidDerivationPath(_)
                | Self::Encoding(_)
                | Self::InvalidInput(_)
        )
    }
}

/// Result type for polychain-wallet operations
pub type Result<T> = std::result::Result<T, Error>;
