//! Supported chains and their static parameter table
//!
//! Every chain is described by data only: adding a chain means adding rows
//! to [`CHAIN_PARAMETERS`], not writing a new derivation routine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::crypto::keys::DerivationPath;
use crate::error::{Error, Result};

/// The five chains a wallet set always covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Chain {
    Ethereum,
    Bitcoin,
    Litecoin,
    BitcoinCash,
    Dogecoin,
}

impl Chain {
    /// All supported chains, in response order
    pub const ALL: [Chain; 5] = [
        Chain::Ethereum,
        Chain::Bitcoin,
        Chain::Litecoin,
        Chain::BitcoinCash,
        Chain::Dogecoin,
    ];

    /// Human-readable chain name
    pub fn name(self) -> &'static str {
        match self {
            Self::Ethereum => "Ethereum",
            Self::Bitcoin => "Bitcoin",
            Self::Litecoin => "Litecoin",
            Self::BitcoinCash => "Bitcoin Cash",
            Self::Dogecoin => "Dogecoin",
        }
    }

    /// Registered SLIP-44 coin type used in the BIP-44 path
    pub fn coin_type(self) -> u32 {
        match self {
            Self::Ethereum => 60,
            Self::Bitcoin => 0,
            Self::Litecoin => 2,
            Self::BitcoinCash => 145,
            Self::Dogecoin => 3,
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which set of version bytes a chain uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    #[default]
    Testnet,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => f.write_str("mainnet"),
            Self::Testnet => f.write_str("testnet"),
        }
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "main" | "bitcoin" => Ok(Self::Mainnet),
            "testnet" | "test" => Ok(Self::Testnet),
            other => Err(Error::InvalidInput(format!("Unknown network: {}", other))),
        }
    }
}

/// How a chain turns a key pair into an address and a private-key string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFormat {
    /// Base58check pay-to-public-key-hash with WIF private keys
    P2pkh {
        /// Version byte prepended to the HASH160
        pubkey_hash: u8,
        /// Version byte prepended to WIF private keys
        wif: u8,
    },
    /// Keccak-256 account address with EIP-55 casing and hex private keys
    Ethereum,
}

/// BIP-32 extended key version bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendedKeyVersions {
    pub private: [u8; 4],
    pub public: [u8; 4],
}

impl ExtendedKeyVersions {
    const fn new(private: u32, public: u32) -> Self {
        Self {
            private: private.to_be_bytes(),
            public: public.to_be_bytes(),
        }
    }
}

const XPRV_MAINNET: ExtendedKeyVersions = ExtendedKeyVersions::new(0x0488_ade4, 0x0488_b21e);
const XPRV_TESTNET: ExtendedKeyVersions = ExtendedKeyVersions::new(0x0435_8394, 0x0435_87cf);

/// Immutable per-chain, per-network configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainParameters {
    pub chain: Chain,
    pub network: Network,
    /// Label reported next to every derived record
    pub network_label: &'static str,
    pub coin_type: u32,
    pub address_format: AddressFormat,
    pub bip32: ExtendedKeyVersions,
}

/// Static table of all supported chain and network combinations
pub static CHAIN_PARAMETERS: [ChainParameters; 10] = [
    ChainParameters {
        chain: Chain::Ethereum,
        network: Network::Mainnet,
        network_label: "ethereum",
        coin_type: 60,
        address_format: AddressFormat::Ethereum,
        bip32: XPRV_MAINNET,
    },
    ChainParameters {
        chain: Chain::Ethereum,
        network: Network::Testnet,
        network_label: "ethereum-testnet",
        coin_type: 60,
        address_format: AddressFormat::Ethereum,
        bip32: XPRV_TESTNET,
    },
    ChainParameters {
        chain: Chain::Bitcoin,
        network: Network::Mainnet,
        network_label: "bitcoin",
        coin_type: 0,
        address_format: AddressFormat::P2pkh { pubkey_hash: 0x00, wif: 0x80 },
        bip32: XPRV_MAINNET,
    },
    ChainParameters {
        chain: Chain::Bitcoin,
        network: Network::Testnet,
        network_label: "bitcoin-testnet",
        coin_type: 0,
        address_format: AddressFormat::P2pkh { pubkey_hash: 0x6f, wif: 0xef },
        bip32: XPRV_TESTNET,
    },
    ChainParameters {
        chain: Chain::Litecoin,
        network: Network::Mainnet,
        network_label: "litecoin",
        coin_type: 2,
        address_format: AddressFormat::P2pkh { pubkey_hash: 0x30, wif: 0xb0 },
        bip32: ExtendedKeyVersions::new(0x019d_9cfe, 0x019d_a462),
    },
    ChainParameters {
        chain: Chain::Litecoin,
        network: Network::Testnet,
        network_label: "litecoin-testnet",
        coin_type: 2,
        address_format: AddressFormat::P2pkh { pubkey_hash: 0x6f, wif: 0xef },
        bip32: ExtendedKeyVersions::new(0x0436_ef7d, 0x0436_f6e1),
    },
    ChainParameters {
        chain: Chain::BitcoinCash,
        network: Network::Mainnet,
        network_label: "bitcoincash",
        coin_type: 145,
        address_format: AddressFormat::P2pkh { pubkey_hash: 0x00, wif: 0x80 },
        bip32: XPRV_MAINNET,
    },
    ChainParameters {
        chain: Chain::BitcoinCash,
        network: Network::Testnet,
        network_label: "bitcoincash-testnet",
        coin_type: 145,
        address_format: AddressFormat::P2pkh { pubkey_hash: 0x6f, wif: 0xef },
        bip32: XPRV_TESTNET,
    },
    ChainParameters {
        chain: Chain::Dogecoin,
        network: Network::Mainnet,
        network_label: "dogecoin",
        coin_type: 3,
        address_format: AddressFormat::P2pkh { pubkey_hash: 0x1e, wif: 0x9e },
        bip32: ExtendedKeyVersions::new(0x02fa_c398, 0x02fa_cafd),
    },
    ChainParameters {
        chain: Chain::Dogecoin,
        network: Network::Testnet,
        network_label: "dogecoin-testnet",
        coin_type: 3,
        address_format: AddressFormat::P2pkh { pubkey_hash: 0x71, wif: 0xf1 },
        bip32: XPRV_TESTNET,
    },
];

impl ChainParameters {
    /// Look up the parameters of a chain on a network
    pub fn lookup(chain: Chain, network: Network) -> &'static ChainParameters {
        let chain_row = match chain {
            Chain::Ethereum => 0,
            Chain::Bitcoin => 1,
            Chain::Litecoin => 2,
            Chain::BitcoinCash => 3,
            Chain::Dogecoin => 4,
        };
        let network_row = match network {
            Network::Mainnet => 0,
            Network::Testnet => 1,
        };
        // Rows are ordered by chain, mainnet before testnet
        &CHAIN_PARAMETERS[chain_row * 2 + network_row]
    }

    /// Parameters of all five chains on a network, in [`Chain::ALL`] order
    pub fn for_network(network: Network) -> Vec<&'static ChainParameters> {
        Chain::ALL
            .iter()
            .map(|chain| Self::lookup(*chain, network))
            .collect()
    }

    /// The fixed BIP-44 path `m/44'/<coin type>'/0'/0/0`
    pub fn derivation_path(&self) -> Result<DerivationPath> {
        DerivationPath::bip44(self.coin_type, 0, 0, 0)
    }

    /// The BIP-44 account node `m/44'/<coin type>'/0'`
    pub fn account_path(&self) -> Result<DerivationPath> {
        DerivationPath::bip44_account(self.coin_type, 0)
    }

    /// P2PKH version byte, if the chain uses P2PKH addresses
    pub fn pubkey_hash_prefix(&self) -> Option<u8> {
        match self.address_format {
            AddressFormat::P2pkh { pubkey_hash, .. } => Some(pubkey_hash),
            AddressFormat::Ethereum => None,
        }
    }

    /// WIF version byte, if the chain serializes private keys as WIF
    pub fn wif_prefix(&self) -> Option<u8> {
        match self.address_format {
            AddressFormat::P2pkh { wif, .. } => Some(wif),
            AddressFormat::Ethereum => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_chain_has_both_networks() {
        for chain in Chain::ALL {
            for network in [Network::Mainnet, Network::Testnet] {
                let params = ChainParameters::lookup(chain, network);
                assert_eq!(params.chain, chain);
                assert_eq!(params.network, network);
                assert_eq!(params.coin_type, chain.coin_type());
            }
        }
    }

    #[test]
    fn test_derivation_path_template() {
        let params = ChainParameters::lookup(Chain::BitcoinCash, Network::Testnet);
        assert_eq!(params.derivation_path().unwrap().to_string(), "m/44'/145'/0'/0/0");

        let params = ChainParameters::lookup(Chain::Ethereum, Network::Mainnet);
        assert_eq!(params.derivation_path().unwrap().to_string(), "m/44'/60'/0'/0/0");
    }

    #[test]
    fn test_prefixes() {
        let doge = ChainParameters::lookup(Chain::Dogecoin, Network::Mainnet);
        assert_eq!(doge.pubkey_hash_prefix(), Some(0x1e));
        assert_eq!(doge.wif_prefix(), Some(0x9e));

        let eth = ChainParameters::lookup(Chain::Ethereum, Network::Testnet);
        assert_eq!(eth.pubkey_hash_prefix(), None);
        assert_eq!(eth.wif_prefix(), None);
    }

    #[test]
    fn test_account_path_and_versions() {
        let ltc = ChainParameters::lookup(Chain::Litecoin, Network::Mainnet);
        assert_eq!(ltc.account_path().unwrap().to_string(), "m/44'/2'/0'");
        assert_eq!(ltc.bip32.public, [0x01, 0x9d, 0xa4, 0x62]);

        let btc = ChainParameters::lookup(Chain::Bitcoin, Network::Testnet);
        assert_eq!(btc.bip32.public, [0x04, 0x35, 0x87, 0xcf]);
    }

    #[test]
    fn test_network_parsing() {
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!(" Testnet ".parse::<Network>().unwrap(), Network::Testnet);
        assert!("regtest".parse::<Network>().is_err());
        assert_eq!(Network::default(), Network::Testnet);
    }
}
