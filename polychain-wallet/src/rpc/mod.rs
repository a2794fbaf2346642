//! Remote chain-RPC enrichment
//!
//! Reads the Ethereum native balance and ERC-20 supply data after derivation.
//! Enrichment never fails wallet derivation: callers receive an explicit
//! [`EnrichmentStatus::Unavailable`] marker instead.

pub mod provider;
mod ethereum;

pub use ethereum::*;
pub use provider::*;
