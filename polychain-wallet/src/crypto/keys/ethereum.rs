//! Ethereum accounts and address encoding

use bip39::Mnemonic;
use ethers::signers::{coins_bip39::English, LocalWallet, MnemonicBuilder};
use sha3::{Digest, Keccak256};

use crate::error::{Error, Result};
use super::bip32::DerivationPath;
use super::derivation::{KeyPair, PrivateKey, PublicKey, PublicKeyFormat};

/// Default account path `m/44'/60'/0'/0/0`
pub const ETHEREUM_DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

/// A signing account derived through the ethers mnemonic helper
#[derive(Debug, Clone)]
pub struct EthereumAccount {
    wallet: LocalWallet,
    key_pair: KeyPair,
}

impl EthereumAccount {
    /// Derive the account at `path` straight from the mnemonic
    pub fn from_mnemonic(mnemonic: &Mnemonic, passphrase: Option<&str>, path: &DerivationPath) -> Result<Self> {
        let phrase = mnemonic.to_string();
        let mut builder = MnemonicBuilder::<English>::default()
            .phrase(phrase.as_str())
            .derivation_path(&path.to_string())
            .map_err(|e| Error::KeyDerivation(format!("Invalid Ethereum derivation path: {}", e)))?;

        if let Some(passphrase) = passphrase.filter(|p| !p.is_empty()) {
            builder = builder.password(passphrase);
        }

        let wallet = builder
            .build()
            .map_err(|e| Error::KeyDerivation(format!("Failed to derive Ethereum account: {}", e)))?;

        Self::from_wallet(wallet)
    }

    fn from_wallet(wallet: LocalWallet) -> Result<Self> {
        let private_key = PrivateKey::from_slice(wallet.signer().to_bytes().as_slice())?;
        let key_pair = KeyPair::from_private_key(private_key, PublicKeyFormat::Uncompressed)?;
        Ok(Self { wallet, key_pair })
    }

    /// The underlying ethers signer
    pub fn signer(&self) -> &LocalWallet {
        &self.wallet
    }

    /// The account key pair, public key uncompressed
    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    /// EIP-55 checksummed account address
    pub fn address(&self) -> Result<String> {
        public_key_to_address(self.key_pair.public_key())
    }

    /// `0x`-prefixed lowercase hex private key
    pub fn private_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.key_pair.private_key().as_bytes()))
    }
}

/// Get the Ethereum address from an uncompressed public key
pub fn public_key_to_address(public_key: &PublicKey) -> Result<String> {
    if public_key.format() != PublicKeyFormat::Uncompressed {
        return Err(Error::InvalidInput("Ethereum addresses require an uncompressed public key".to_string()));
    }

    // Skip the first byte (0x04) and hash the rest
    let key_hash = keccak256(&public_key.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&key_hash[12..]);
    Ok(to_checksum_address(&address))
}

/// Render 20 address bytes with EIP-55 mixed-case checksum
pub fn to_checksum_address(address: &[u8; 20]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 { hash[i / 2] >> 4 } else { hash[i / 2] & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }
    checksummed
}

/// Whether `address` is `0x` + 40 hex digits carrying a correct EIP-55 casing
pub fn is_valid_checksum_address(address: &str) -> bool {
    let Some(digits) = address.strip_prefix("0x") else {
        return false;
    };
    if digits.len() != 40 {
        return false;
    }

    let mut bytes = [0u8; 20];
    if hex::decode_to_slice(digits, &mut bytes).is_err() {
        return false;
    }

    to_checksum_address(&bytes) == address
}

/// Calculate the Keccak-256 hash of data
fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::signers::Signer;
    use crate::crypto::mnemonic::parse_mnemonic;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_eip55_reference_addresses() {
        for address in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            assert!(is_valid_checksum_address(address), "{}", address);
            assert!(!is_valid_checksum_address(&address.to_lowercase()));
        }
    }

    #[test]
    fn test_checksum_rejects_malformed() {
        assert!(!is_valid_checksum_address("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
        assert!(!is_valid_checksum_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAe"));
        assert!(!is_valid_checksum_address("0xZZAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
    }

    #[test]
    fn test_account_from_mnemonic() {
        let mnemonic = parse_mnemonic(ABANDON).unwrap();
        let path: DerivationPath = ETHEREUM_DERIVATION_PATH.parse().unwrap();
        let account = EthereumAccount::from_mnemonic(&mnemonic, None, &path).unwrap();

        assert_eq!(account.address().unwrap(), "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
        assert_eq!(
            account.private_key_hex(),
            "0x1ab42cc412b618bdea3a599e3c9bae199ebf030895b039e9db1e30dafb12b727"
        );
    }

    #[test]
    fn test_encoder_agrees_with_signer() {
        let mnemonic = parse_mnemonic(ABANDON).unwrap();
        let path: DerivationPath = "m/44'/60'/0'/0/3".parse().unwrap();
        let account = EthereumAccount::from_mnemonic(&mnemonic, Some("extra"), &path).unwrap();

        let signer_address = ethers::utils::to_checksum(&account.signer().address(), None);
        assert_eq!(account.address().unwrap(), signer_address);
    }

    #[test]
    fn test_compressed_key_is_rejected() {
        let pair = KeyPair::from_private_key(PrivateKey::from_slice(&[1u8; 32]).unwrap(), PublicKeyFormat::Compressed).unwrap();
        assert!(public_key_to_address(pair.public_key()).is_err());
    }
}
