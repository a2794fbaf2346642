//! Pay-to-public-key-hash addresses and WIF private keys
//!
//! Bitcoin, Litecoin, Bitcoin Cash (legacy format) and Dogecoin all share
//! these encodings and differ only in their version bytes.

use crate::chain::ChainParameters;
use crate::crypto::encoding::{base58check_decode, base58check_encode, hash160};
use crate::error::{Error, Result};
use super::derivation::{derive_key_pair, KeyPair, PrivateKey, PublicKey, PublicKeyFormat};

/// Flag appended to WIF payloads whose public key is compressed
const WIF_COMPRESSED_FLAG: u8 = 0x01;

/// A decoded WIF private key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedWif {
    /// WIF version byte
    pub prefix: u8,
    /// The private key
    pub private_key: PrivateKey,
    /// Whether the key is meant for a compressed public key
    pub compressed: bool,
}

/// Derive the compressed key pair of a P2PKH chain at its BIP-44 path
pub fn derive_p2pkh_key_pair(seed: &[u8], params: &ChainParameters) -> Result<KeyPair> {
    let path = params.derivation_path()?;
    derive_key_pair(seed, &path, PublicKeyFormat::Compressed)
}

/// Base58check(version || HASH160(public key))
pub fn public_key_to_address(public_key: &PublicKey, version: u8) -> Result<String> {
    if public_key.format() != PublicKeyFormat::Compressed {
        return Err(Error::InvalidInput("P2PKH addresses require a compressed public key".to_string()));
    }

    let mut payload = Vec::with_capacity(21);
    payload.push(version);
    payload.extend_from_slice(&hash160(public_key.as_bytes()));

    Ok(base58check_encode(&payload))
}

/// P2PKH address of `public_key` on the chain described by `params`
pub fn to_p2pkh_address(public_key: &PublicKey, params: &ChainParameters) -> Result<String> {
    let version = params.pubkey_hash_prefix().ok_or_else(|| {
        Error::NotSupported(format!("{} does not use P2PKH addresses", params.chain))
    })?;
    public_key_to_address(public_key, version)
}

/// Decode a P2PKH address into its version byte and public key hash
pub fn decode_p2pkh_address(address: &str) -> Result<(u8, [u8; 20])> {
    let payload = base58check_decode(address)?;
    if payload.len() != 21 {
        return Err(Error::Encoding(format!("Invalid P2PKH payload length: {}", payload.len())));
    }

    let mut hash = [0u8; 20];
    hash.copy_from_slice(&payload[1..]);
    Ok((payload[0], hash))
}

/// Serialize a private key as WIF under `prefix`
pub fn private_key_to_wif(private_key: &PrivateKey, prefix: u8, compressed: bool) -> String {
    let mut payload = Vec::with_capacity(34);
    payload.push(prefix);
    payload.extend_from_slice(private_key.as_bytes());
    if compressed {
        payload.push(WIF_COMPRESSED_FLAG);
    }

    base58check_encode(&payload)
}

/// WIF of `private_key` on the chain described by `params`
pub fn to_wif(private_key: &PrivateKey, params: &ChainParameters, compressed: bool) -> Result<String> {
    let prefix = params.wif_prefix().ok_or_else(|| {
        Error::NotSupported(format!("{} does not use WIF private keys", params.chain))
    })?;
    Ok(private_key_to_wif(private_key, prefix, compressed))
}

/// Decode a WIF string back into its private key
pub fn wif_to_private_key(wif: &str) -> Result<DecodedWif> {
    let payload = base58check_decode(wif)?;

    let compressed = match payload.len() {
        33 => false,
        34 if payload[33] == WIF_COMPRESSED_FLAG => true,
        34 => return Err(Error::Encoding("Invalid WIF compression flag".to_string())),
        len => return Err(Error::Encoding(format!("Invalid WIF payload length: {}", len))),
    };

    Ok(DecodedWif {
        prefix: payload[0],
        private_key: PrivateKey::from_slice(&payload[1..33])?,
        compressed,
    })
}
