//! Account management functionality
//!
//! This module assembles the per-chain wallet records derived from one
//! mnemonic and validates addresses against the chain parameter table.

mod address;
mod wallet;

pub use address::*;
pub use wallet::*;
