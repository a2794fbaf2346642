//! BIP-32 hierarchical deterministic key derivation over secp256k1

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use secp256k1::{PublicKey as Secp256k1PublicKey, Scalar, Secp256k1, SecretKey, Signing};
use sha2::Sha512;

use crate::crypto::encoding::{base58check_encode, hash160};
use crate::error::{Error, Result};
use super::derivation::{KeyPair, PrivateKey, PublicKeyFormat};

/// First hardened child index
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// HMAC key used to derive the master node
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// A single step in a derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildNumber(u32);

impl ChildNumber {
    /// Non-hardened child `index`
    pub fn normal(index: u32) -> Result<Self> {
        if index >= HARDENED_OFFSET {
            return Err(Error::InvalidDerivationPath(format!("Child index out of range: {}", index)));
        }
        Ok(Self(index))
    }

    /// Hardened child `index'`
    pub fn hardened(index: u32) -> Result<Self> {
        if index >= HARDENED_OFFSET {
            return Err(Error::InvalidDerivationPath(format!("Child index out of range: {}'", index)));
        }
        Ok(Self(index | HARDENED_OFFSET))
    }

    /// Whether the child is derived from the parent private key
    pub fn is_hardened(&self) -> bool {
        self.0 >= HARDENED_OFFSET
    }

    /// Index without the hardened bit
    pub fn index(&self) -> u32 {
        self.0 & !HARDENED_OFFSET
    }

    /// The serialized 32-bit child number
    pub fn to_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_hardened() {
            write!(f, "{}'", self.index())
        } else {
            write!(f, "{}", self.index())
        }
    }
}

impl FromStr for ChildNumber {
    type Err = Error;

    fn from_str(segment: &str) -> Result<Self> {
        let (digits, hardened) = match segment.strip_suffix(['\'', 'h', 'H']) {
            Some(digits) => (digits, true),
            None => (segment, false),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidDerivationPath(format!("Invalid path component: {}", segment)));
        }

        let index = digits
            .parse::<u32>()
            .map_err(|_| Error::InvalidDerivationPath(format!("Invalid path component: {}", segment)))?;

        if hardened {
            Self::hardened(index)
        } else {
            Self::normal(index)
        }
    }
}

/// A parsed BIP-32 derivation path such as `m/44'/0'/0'/0/0`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<ChildNumber>);

impl DerivationPath {
    /// The BIP-44 path `m/44'/coin_type'/account'/change/index`
    pub fn bip44(coin_type: u32, account: u32, change: u32, index: u32) -> Result<Self> {
        let mut path = Self::bip44_account(coin_type, account)?;
        path.0.push(ChildNumber::normal(change)?);
        path.0.push(ChildNumber::normal(index)?);
        Ok(path)
    }

    /// The BIP-44 account node `m/44'/coin_type'/account'`
    pub fn bip44_account(coin_type: u32, account: u32) -> Result<Self> {
        Ok(Self(vec![
            ChildNumber::hardened(44)?,
            ChildNumber::hardened(coin_type)?,
            ChildNumber::hardened(account)?,
        ]))
    }

    /// The steps of the path, root first
    pub fn as_slice(&self) -> &[ChildNumber] {
        &self.0
    }

    /// Number of steps below the master node
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path is the master node itself
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for child in &self.0 {
            write!(f, "/{}", child)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        let mut segments = path.trim().split('/');
        match segments.next() {
            Some("m") | Some("M") => {}
            _ => return Err(Error::InvalidDerivationPath(format!("Path must start with m: {}", path))),
        }

        segments
            .map(ChildNumber::from_str)
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}

/// An intermediate node of the derivation tree
#[derive(Clone)]
pub struct ExtendedKey {
    secret_key: SecretKey,
    chain_code: [u8; 32],
    depth: u8,
    child_number: u32,
    parent_fingerprint: [u8; 4],
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("depth", &self.depth)
            .field("child_number", &self.child_number)
            .field("parent_fingerprint", &hex::encode(self.parent_fingerprint))
            .finish_non_exhaustive()
    }
}

impl ExtendedKey {
    /// Derive the master node: HMAC-SHA512(key = "Bitcoin seed", data = seed)
    pub fn new_master(seed: &[u8]) -> Result<Self> {
        if !(16..=64).contains(&seed.len()) {
            return Err(Error::KeyDerivation(format!("Invalid seed length: {}", seed.len())));
        }

        let mut hmac = Hmac::<Sha512>::new_from_slice(MASTER_HMAC_KEY)
            .map_err(|_| Error::KeyDerivation("HMAC error".to_string()))?;
        hmac.update(seed);
        let result = hmac.finalize().into_bytes();

        let secret_key = SecretKey::from_slice(&result[0..32])
            .map_err(|e| Error::KeyDerivation(format!("Invalid master key: {}", e)))?;
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&result[32..64]);

        Ok(Self {
            secret_key,
            chain_code,
            depth: 0,
            child_number: 0,
            parent_fingerprint: [0u8; 4],
        })
    }

    /// CKDpriv: derive one child of this node
    pub fn derive_child<C: Signing>(&self, secp: &Secp256k1<C>, child: ChildNumber) -> Result<Self> {
        let depth = self
            .depth
            .checked_add(1)
            .ok_or_else(|| Error::KeyDerivation("Maximum derivation depth exceeded".to_string()))?;

        let mut hmac = Hmac::<Sha512>::new_from_slice(&self.chain_code)
            .map_err(|_| Error::KeyDerivation("HMAC error".to_string()))?;

        if child.is_hardened() {
            hmac.update(&[0]);
            hmac.update(&self.secret_key.secret_bytes());
        } else {
            hmac.update(&self.public_key(secp).serialize());
        }
        hmac.update(&child.to_u32().to_be_bytes());
        let result = hmac.finalize().into_bytes();

        let mut tweak = [0u8; 32];
        tweak.copy_from_slice(&result[0..32]);
        let tweak = Scalar::from_be_bytes(tweak)
            .map_err(|_| Error::KeyDerivation(format!("Derived tweak out of range at child {}", child)))?;

        // k_child = IL + k_par (mod n)
        let secret_key = self
            .secret_key
            .add_tweak(&tweak)
            .map_err(|e| Error::KeyDerivation(format!("Invalid child key at {}: {}", child, e)))?;

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&result[32..64]);

        Ok(Self {
            secret_key,
            chain_code,
            depth,
            child_number: child.to_u32(),
            parent_fingerprint: self.fingerprint(secp),
        })
    }

    /// Walk every step of `path` starting from this node
    pub fn derive_path<C: Signing>(&self, secp: &Secp256k1<C>, path: &DerivationPath) -> Result<Self> {
        path.as_slice()
            .iter()
            .try_fold(self.clone(), |node, child| node.derive_child(secp, *child))
    }

    /// The node's public key
    pub fn public_key<C: Signing>(&self, secp: &Secp256k1<C>) -> Secp256k1PublicKey {
        Secp256k1PublicKey::from_secret_key(secp, &self.secret_key)
    }

    /// First four bytes of HASH160 of the compressed public key
    pub fn fingerprint<C: Signing>(&self, secp: &Secp256k1<C>) -> [u8; 4] {
        let id = hash160(&self.public_key(secp).serialize());
        [id[0], id[1], id[2], id[3]]
    }

    /// The node's private key bytes
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret_key.secret_bytes()
    }

    /// The node's chain code
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Distance from the master node
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Terminal key pair of this node
    pub fn to_key_pair(&self, format: PublicKeyFormat) -> Result<KeyPair> {
        let private_key = PrivateKey::from_slice(&self.secret_key.secret_bytes())?;
        KeyPair::from_private_key(private_key, format)
    }

    /// Serialize as an extended private key under `version`
    pub fn to_extended_private(&self, version: [u8; 4]) -> String {
        let mut key = [0u8; 33];
        key[1..].copy_from_slice(&self.secret_key.secret_bytes());
        self.serialize(version, &key)
    }

    /// Serialize as an extended public key under `version`
    pub fn to_extended_public<C: Signing>(&self, secp: &Secp256k1<C>, version: [u8; 4]) -> String {
        self.serialize(version, &self.public_key(secp).serialize())
    }

    fn serialize(&self, version: [u8; 4], key: &[u8; 33]) -> String {
        let mut payload = Vec::with_capacity(78);
        payload.extend_from_slice(&version);
        payload.push(self.depth);
        payload.extend_from_slice(&self.parent_fingerprint);
        payload.extend_from_slice(&self.child_number.to_be_bytes());
        payload.extend_from_slice(&self.chain_code);
        payload.extend_from_slice(key);
        base58check_encode(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XPRV: [u8; 4] = [0x04, 0x88, 0xad, 0xe4];
    const XPUB: [u8; 4] = [0x04, 0x88, 0xb2, 0x1e];

    fn vector_one_seed() -> Vec<u8> {
        hex::decode("000102030405060708090a0b0c0d0e0f").unwrap()
    }

    #[test]
    fn test_parse_derivation_path() {
        let path: DerivationPath = "m/44'/0'/0'/0/0".parse().unwrap();
        assert_eq!(path.len(), 5);
        assert!(path.as_slice()[0].is_hardened());
        assert_eq!(path.as_slice()[0].index(), 44);
        assert!(!path.as_slice()[4].is_hardened());
        assert_eq!(path.to_string(), "m/44'/0'/0'/0/0");
        assert_eq!(path, DerivationPath::bip44(0, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_alternative_hardened_markers() {
        let path: DerivationPath = "m/44h/60H/0'/0/1".parse().unwrap();
        assert_eq!(path.to_string(), "m/44'/60'/0'/0/1");

        let master: DerivationPath = "m".parse().unwrap();
        assert!(master.is_empty());
    }

    #[test]
    fn test_reject_malformed_paths() {
        for path in ["", "44'/0'", "m/", "m//0", "m/x", "m/-1", "m/1''", "m/2147483648", "m/2147483648'", "m/ 1"] {
            assert!(
                matches!(path.parse::<DerivationPath>(), Err(Error::InvalidDerivationPath(_))),
                "path {:?} should be rejected",
                path
            );
        }
    }

    #[test]
    fn test_bip32_vector_one_master() {
        let secp = Secp256k1::new();
        let master = ExtendedKey::new_master(&vector_one_seed()).unwrap();

        assert_eq!(
            master.to_extended_private(XPRV),
            "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi"
        );
        assert_eq!(
            master.to_extended_public(&secp, XPUB),
            "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8"
        );
    }

    #[test]
    fn test_bip32_vector_one_hardened_child() {
        let secp = Secp256k1::new();
        let master = ExtendedKey::new_master(&vector_one_seed()).unwrap();
        let child = master.derive_path(&secp, &"m/0'".parse().unwrap()).unwrap();

        assert_eq!(child.depth(), 1);
        assert_eq!(
            child.to_extended_private(XPRV),
            "xprv9uHRZZhk6KAJC1avXpDAp4MDc3sQKNxDiPvvkX8Br5ngLNv1TxvUxt4cV1rGL5hj6KCesnDYUhd7oWgT11eZG7XnxHrnYeSvkzY7d2bhkJ7"
        );
        assert_eq!(
            child.to_extended_public(&secp, XPUB),
            "xpub68Gmy5EdvgibQVfPdqkBBCHxA5htiqg55crXYuXoQRKfDBFA1WEjWgP6LHhwBZeNK1VTsfTFUHCdrfp1bgwQ9xv5ski8PX9rL2dZXvgGDnw"
        );
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let secp = Secp256k1::new();
        let path: DerivationPath = "m/44'/2'/0'/0/7".parse().unwrap();
        let a = ExtendedKey::new_master(&[42u8; 64]).unwrap().derive_path(&secp, &path).unwrap();
        let b = ExtendedKey::new_master(&[42u8; 64]).unwrap().derive_path(&secp, &path).unwrap();

        assert_eq!(a.secret_bytes(), b.secret_bytes());
        assert_eq!(a.chain_code(), b.chain_code());
        assert_eq!(a.depth(), 5);
    }

    #[test]
    fn test_rejects_bad_seed_length() {
        assert!(ExtendedKey::new_master(&[1u8; 8]).is_err());
        assert!(ExtendedKey::new_master(&[1u8; 65]).is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let master = ExtendedKey::new_master(&vector_one_seed()).unwrap();
        let debug = format!("{:?}", master);
        assert!(!debug.contains(&hex::encode(master.secret_bytes())));
    }
}
