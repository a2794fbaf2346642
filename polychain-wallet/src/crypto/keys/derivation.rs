//! Common key pair types and the seed-to-key-pair entry point

use std::fmt;

use secp256k1::{PublicKey as Secp256k1PublicKey, Secp256k1, SecretKey};

use crate::error::{Error, Result};
use super::bip32::{DerivationPath, ExtendedKey};

/// Serialization of a secp256k1 public key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicKeyFormat {
    /// 33 bytes, `0x02`/`0x03` prefix
    Compressed,
    /// 65 bytes, `0x04` prefix
    Uncompressed,
}

/// A 32-byte secp256k1 private key
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    bytes: [u8; 32],
}

impl PrivateKey {
    /// Create a private key from bytes, rejecting values outside the curve order
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let secret_key = SecretKey::from_slice(bytes)
            .map_err(|e| Error::KeyDerivation(format!("Invalid secret key: {}", e)))?;
        Ok(Self { bytes: secret_key.secret_bytes() })
    }

    /// Get the raw private key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

/// A serialized secp256k1 public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    /// The raw public key bytes
    bytes: Vec<u8>,
    /// Compressed or uncompressed encoding
    format: PublicKeyFormat,
}

impl PublicKey {
    /// Create a public key from its serialized bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let format = match bytes.len() {
            33 => PublicKeyFormat::Compressed,
            65 => PublicKeyFormat::Uncompressed,
            len => {
                return Err(Error::KeyDerivation(format!("Invalid public key length: {}", len)))
            }
        };
        Secp256k1PublicKey::from_slice(bytes)
            .map_err(|e| Error::KeyDerivation(format!("Invalid public key: {}", e)))?;

        Ok(Self { bytes: bytes.to_vec(), format })
    }

    /// Get the raw public key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get the encoding of the key
    pub fn format(&self) -> PublicKeyFormat {
        self.format
    }

    /// Lowercase hex of the serialized key
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

/// A terminal derived key pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    /// The private key
    private_key: PrivateKey,
    /// The public key
    public_key: PublicKey,
}

impl KeyPair {
    /// Build a key pair from a private key, serializing the public key in `format`
    pub fn from_private_key(private_key: PrivateKey, format: PublicKeyFormat) -> Result<Self> {
        let secp = Secp256k1::signing_only();
        let secret_key = SecretKey::from_slice(private_key.as_bytes())
            .map_err(|e| Error::KeyDerivation(format!("Invalid secret key: {}", e)))?;
        let public_key = Secp256k1PublicKey::from_secret_key(&secp, &secret_key);

        let bytes = match format {
            PublicKeyFormat::Compressed => public_key.serialize().to_vec(),
            PublicKeyFormat::Uncompressed => public_key.serialize_uncompressed().to_vec(),
        };

        Ok(Self {
            private_key,
            public_key: PublicKey { bytes, format },
        })
    }

    /// Get the private key
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Get the public key
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

/// Derive a key pair from a seed along a BIP-32 path
pub fn derive_key_pair(seed: &[u8], path: &DerivationPath, format: PublicKeyFormat) -> Result<KeyPair> {
    let secp = Secp256k1::new();
    let master = ExtendedKey::new_master(seed)?;
    let leaf = master.derive_path(&secp, path)?;
    leaf.to_key_pair(format)
}

/// Serialize the extended public key of the node at `path` under `version`
pub fn derive_extended_public_key(seed: &[u8], path: &DerivationPath, version: [u8; 4]) -> Result<String> {
    let secp = Secp256k1::new();
    let node = ExtendedKey::new_master(seed)?.derive_path(&secp, path)?;
    Ok(node.to_extended_public(&secp, version))
}
