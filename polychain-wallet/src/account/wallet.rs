//! Wallet set assembly
//!
//! One mnemonic is expanded once, then every chain is derived on its own
//! scoped thread. A chain that fails to derive is reported as a failure
//! marker next to the chains that succeeded.

use std::collections::BTreeMap;
use std::thread;

use bip39::Mnemonic;
use serde::{Deserialize, Serialize};

use crate::chain::{AddressFormat, Chain, ChainParameters, Network};
use crate::crypto::keys::{derive_extended_public_key, ethereum::EthereumAccount, p2pkh};
use crate::crypto::mnemonic::{mnemonic_to_seed, Seed};
use crate::error::{Error, Result};
use crate::rpc::EnrichmentStatus;

/// The externally visible result for one chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRecord {
    /// Human-readable chain name
    pub name: String,
    /// Network label of the parameter set used
    pub network: String,
    /// BIP-44 path the key was derived at
    pub derivation_path: String,
    /// Chain-native address
    pub address: String,
    /// WIF for P2PKH chains, `0x` hex for Ethereum
    pub private_key: String,
    /// Hex of the serialized public key
    pub public_key: String,
    /// Extended public key of the BIP-44 account node, under the chain's version bytes
    pub account_xpub: String,
    /// On-chain data, only ever attached to the Ethereum record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<EnrichmentStatus>,
}

/// Per-chain derivation outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ChainOutcome {
    Derived(WalletRecord),
    Failed { error: String },
}

impl ChainOutcome {
    /// The record, if derivation succeeded
    pub fn record(&self) -> Option<&WalletRecord> {
        match self {
            Self::Derived(record) => Some(record),
            Self::Failed { .. } => None,
        }
    }
}

/// All wallets derived from one mnemonic, keyed by chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSet {
    pub network: Network,
    pub wallets: BTreeMap<Chain, ChainOutcome>,
}

impl WalletSet {
    /// The record for `chain`, if it derived successfully
    pub fn record(&self, chain: Chain) -> Option<&WalletRecord> {
        self.wallets.get(&chain).and_then(ChainOutcome::record)
    }

    /// Mutable access to the record for `chain`
    pub fn record_mut(&mut self, chain: Chain) -> Option<&mut WalletRecord> {
        match self.wallets.get_mut(&chain) {
            Some(ChainOutcome::Derived(record)) => Some(record),
            _ => None,
        }
    }

    /// Chains that failed, with their error messages
    pub fn failures(&self) -> Vec<(Chain, &str)> {
        self.wallets
            .iter()
            .filter_map(|(chain, outcome)| match outcome {
                ChainOutcome::Failed { error } => Some((*chain, error.as_str())),
                ChainOutcome::Derived(_) => None,
            })
            .collect()
    }

    /// Whether every supported chain derived successfully
    pub fn is_complete(&self) -> bool {
        Chain::ALL.iter().all(|chain| self.record(*chain).is_some())
    }

    /// Address of every chain that derived successfully
    pub fn addresses(&self) -> BTreeMap<Chain, String> {
        self.wallets
            .iter()
            .filter_map(|(chain, outcome)| outcome.record().map(|r| (*chain, r.address.clone())))
            .collect()
    }
}

/// Derive the wallet set of all five chains on `network`
pub fn assemble(mnemonic: &Mnemonic, passphrase: Option<&str>, network: Network) -> WalletSet {
    assemble_with(mnemonic, passphrase, network, &ChainParameters::for_network(network))
}

/// Derive one wallet per entry of `chains`
pub fn assemble_with(
    mnemonic: &Mnemonic,
    passphrase: Option<&str>,
    network: Network,
    chains: &[&ChainParameters],
) -> WalletSet {
    let seed = mnemonic_to_seed(mnemonic, passphrase);
    let seed = &seed;

    let wallets: BTreeMap<Chain, ChainOutcome> = thread::scope(|scope| {
        let handles: Vec<_> = chains
            .iter()
            .map(|params| {
                let params: &ChainParameters = params;
                let handle = scope.spawn(move || derive_wallet_record(mnemonic, passphrase, seed, params));
                (params.chain, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(chain, handle)| {
                let outcome = match handle.join() {
                    Ok(Ok(record)) => ChainOutcome::Derived(record),
                    Ok(Err(e)) => {
                        tracing::warn!(chain = %chain, error = %e, "wallet derivation failed");
                        ChainOutcome::Failed { error: e.to_string() }
                    }
                    Err(_) => {
                        tracing::error!(chain = %chain, "wallet derivation panicked");
                        ChainOutcome::Failed { error: format!("Derivation failed for {}: worker panicked", chain) }
                    }
                };
                (chain, outcome)
            })
            .collect()
    });

    WalletSet { network, wallets }
}

/// Derive the record of a single chain
pub fn derive_wallet_record(
    mnemonic: &Mnemonic,
    passphrase: Option<&str>,
    seed: &Seed,
    params: &ChainParameters,
) -> Result<WalletRecord> {
    let failure = |e: Error| Error::DerivationFailure {
        chain: params.chain.name().to_string(),
        reason: e.to_string(),
    };

    let path = params.derivation_path().map_err(failure)?;
    let account_path = params.account_path().map_err(failure)?;
    let account_xpub =
        derive_extended_public_key(seed.as_bytes(), &account_path, params.bip32.public).map_err(failure)?;

    let (address, private_key, public_key) = match params.address_format {
        AddressFormat::Ethereum => {
            let account = EthereumAccount::from_mnemonic(mnemonic, passphrase, &path).map_err(failure)?;
            (
                account.address().map_err(failure)?,
                account.private_key_hex(),
                account.key_pair().public_key().to_hex(),
            )
        }
        AddressFormat::P2pkh { .. } => {
            let key_pair = p2pkh::derive_p2pkh_key_pair(seed.as_bytes(), params).map_err(failure)?;
            (
                p2pkh::to_p2pkh_address(key_pair.public_key(), params).map_err(failure)?,
                p2pkh::to_wif(key_pair.private_key(), params, true).map_err(failure)?,
                key_pair.public_key().to_hex(),
            )
        }
    };

    Ok(WalletRecord {
        name: params.chain.name().to_string(),
        network: params.network_label.to_string(),
        derivation_path: path.to_string(),
        address,
        private_key,
        public_key,
        account_xpub,
        balance: None,
    })
}
