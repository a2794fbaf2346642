//! Cryptographic primitives and operations
//!
//! This module provides mnemonic generation and validation, seed expansion,
//! BIP-32 key derivation and the per-chain address encoders.

pub mod mnemonic;
pub mod encoding;
pub mod keys;

pub use mnemonic::*;
pub use keys::*;
