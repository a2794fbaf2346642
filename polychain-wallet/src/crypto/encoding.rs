//! Hashing and base58check helpers shared by the address encoders

use bitcoin::hashes::{hash160, Hash};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// RIPEMD160(SHA256(data))
pub fn hash160(data: &[u8]) -> [u8; 20] {
    hash160::Hash::hash(data).to_byte_array()
}

/// SHA256(SHA256(data))
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

/// First four bytes of the double SHA-256 of `payload`
pub fn checksum(payload: &[u8]) -> [u8; 4] {
    let hash = double_sha256(payload);
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Base58-encode `payload` followed by its 4-byte checksum
pub fn base58check_encode(payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + 4);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum(payload));
    bs58::encode(data).into_string()
}

/// Decode a base58check string and verify its checksum, returning the payload
pub fn base58check_decode(encoded: &str) -> Result<Vec<u8>> {
    let mut data = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| Error::Encoding(format!("Invalid base58: {}", e)))?;

    if data.len() < 5 {
        return Err(Error::Encoding("Base58check payload too short".to_string()));
    }

    let expected = data.split_off(data.len() - 4);
    if checksum(&data)[..] != expected[..] {
        return Err(Error::Encoding("Base58check checksum mismatch".to_string()));
    }

    Ok(data)
}
