//! Key derivation and management
//!
//! This module provides the generic BIP-32 engine and the encoders that turn
//! derived keys into chain-native addresses and private-key strings.

pub mod bip32;
pub mod ethereum;
pub mod p2pkh;
mod derivation;

pub use bip32::{ChildNumber, DerivationPath, ExtendedKey};
pub use derivation::*;
