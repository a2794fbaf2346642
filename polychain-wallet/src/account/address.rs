//! Address validation

use crate::chain::{AddressFormat, Chain, ChainParameters, Network};
use crate::crypto::keys::{ethereum, p2pkh};

/// Validate an address for a specific chain and network
///
/// P2PKH addresses must carry a valid base58check checksum and the chain's
/// version byte; Ethereum addresses must carry a correct EIP-55 casing.
pub fn validate_address(address: &str, chain: Chain, network: Network) -> bool {
    let params = ChainParameters::lookup(chain, network);
    match params.address_format {
        AddressFormat::Ethereum => ethereum::is_valid_checksum_address(address),
        AddressFormat::P2pkh { pubkey_hash, .. } => match p2pkh::decode_p2pkh_address(address) {
            Ok((version, _)) => version == pubkey_hash,
            Err(_) => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ethereum_address() {
        // Valid Ethereum address
        assert!(validate_address("0x9858EfFD232B4033E47d90003D41EC34EcaEda94", Chain::Ethereum, Network::Mainnet));

        // Invalid Ethereum addresses
        assert!(!validate_address("0x9858EfFD232B4033E47d90003D41EC34EcaEda9", Chain::Ethereum, Network::Mainnet)); // Too short
        assert!(!validate_address("0x9858EfFD232B4033E47d90003D41EC34EcaEda941", Chain::Ethereum, Network::Mainnet)); // Too long
        assert!(!validate_address("9858EfFD232B4033E47d90003D41EC34EcaEda94", Chain::Ethereum, Network::Mainnet)); // Missing 0x
        assert!(!validate_address("0x9858efFD232B4033E47d90003D41EC34EcaEda94", Chain::Ethereum, Network::Mainnet)); // Wrong casing
    }

    #[test]
    fn test_validate_bitcoin_address() {
        assert!(validate_address("1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA", Chain::Bitcoin, Network::Mainnet));
        assert!(validate_address("1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA", Chain::BitcoinCash, Network::Mainnet));

        // Right checksum, wrong network or chain
        assert!(!validate_address("1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA", Chain::Bitcoin, Network::Testnet));
        assert!(!validate_address("1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA", Chain::Dogecoin, Network::Mainnet));

        // Broken checksum
        assert!(!validate_address("1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabB", Chain::Bitcoin, Network::Mainnet));
    }
}
