//! Mnemonic phrase generation, validation and seed expansion

use std::fmt;

use bip39::{Language, Mnemonic};
use rand::{rngs::OsRng, RngCore};

use crate::error::{Error, Result};

/// Supported mnemonic strengths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MnemonicStrength {
    /// 12 words (128 bits)
    #[default]
    Words12,
    /// 15 words (160 bits)
    Words15,
    /// 18 words (192 bits)
    Words18,
    /// 21 words (224 bits)
    Words21,
    /// 24 words (256 bits)
    Words24,
}

impl MnemonicStrength {
    /// Get entropy length in bytes
    fn entropy_bytes(&self) -> usize {
        match self {
            Self::Words12 => 16,
            Self::Words15 => 20,
            Self::Words18 => 24,
            Self::Words21 => 28,
            Self::Words24 => 32,
        }
    }

    /// Number of words in a phrase of this strength
    pub fn word_count(&self) -> usize {
        self.entropy_bytes() * 3 / 4
    }

    /// Strength for a word count
    pub fn from_word_count(words: usize) -> Result<Self> {
        match words {
            12 => Ok(Self::Words12),
            15 => Ok(Self::Words15),
            18 => Ok(Self::Words18),
            21 => Ok(Self::Words21),
            24 => Ok(Self::Words24),
            other => Err(Error::InvalidInput(format!(
                "Unsupported mnemonic length: {} words (expected 12, 15, 18, 21 or 24)",
                other
            ))),
        }
    }
}

/// Generate a new random mnemonic with the specified strength
pub fn generate_mnemonic(strength: MnemonicStrength) -> Result<Mnemonic> {
    let mut entropy = vec![0u8; strength.entropy_bytes()];
    OsRng
        .try_fill_bytes(&mut entropy)
        .map_err(|e| Error::Entropy(e.to_string()))?;

    Mnemonic::from_entropy_in(Language::English, &entropy)
        .map_err(|e| Error::Entropy(e.to_string()))
}

/// Parse and validate a caller-supplied mnemonic phrase
///
/// Words are lowercased and runs of whitespace collapsed before the word
/// list and checksum are checked.
pub fn parse_mnemonic(phrase: &str) -> Result<Mnemonic> {
    let normalized = phrase
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");

    if normalized.is_empty() {
        return Err(Error::InvalidMnemonic("empty phrase".to_string()));
    }

    Mnemonic::parse_in_normalized(Language::English, &normalized)
        .map_err(|e| Error::InvalidMnemonic(e.to_string()))
}

/// A 64-byte BIP-39 seed
#[derive(Clone, PartialEq, Eq)]
pub struct Seed([u8; 64]);

impl Seed {
    /// Wrap raw seed bytes
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get the raw seed bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}

/// Expand a mnemonic and optional passphrase into a seed
///
/// PBKDF2-HMAC-SHA512 with 2048 rounds, salted with `"mnemonic" + passphrase`.
pub fn mnemonic_to_seed(mnemonic: &Mnemonic, passphrase: Option<&str>) -> Seed {
    Seed(mnemonic.to_seed(passphrase.unwrap_or("")))
}
