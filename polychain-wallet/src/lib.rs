//! Polychain Wallet - deterministic multi-chain HD wallet derivation
//!
//! This library derives Ethereum, Bitcoin, Litecoin, Bitcoin Cash and Dogecoin
//! wallets from a single BIP-39 mnemonic using BIP-32/BIP-44 key derivation,
//! and optionally enriches the Ethereum wallet with on-chain data read over
//! JSON-RPC.

pub mod error;
pub mod chain;
pub mod crypto;
pub mod account;
pub mod rpc;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use chain::{Chain, ChainParameters, Network};
pub use account::{assemble, ChainOutcome, WalletRecord, WalletSet};
pub use bip39::Mnemonic;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
