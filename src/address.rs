//! Address decoding
//!
//! Swap scripts embed the 20-byte public-key-hash of a P2PKH address.

use bitcoin::address::NetworkUnchecked;
use bitcoin::{Address, Network, PubkeyHash};
use std::str::FromStr;

use crate::error::{Result, SwapScriptError};

/// Decode a P2PKH address for `network` into its public-key-hash
pub fn decode_pubkey_hash(address: &str, network: Network) -> Result<PubkeyHash> {
    let invalid = |reason: String| SwapScriptError::InvalidAddress {
        address: address.to_string(),
        reason,
    };

    let unchecked = Address::<NetworkUnchecked>::from_str(address.trim())
        .map_err(|e| invalid(e.to_string()))?;
    let checked = unchecked
        .require_network(network)
        .map_err(|e| invalid(e.to_string()))?;

    checked
        .pubkey_hash()
        .ok_or_else(|| invalid("not a pay-to-pubkey-hash address".to_string()))
}

/// P2PKH address string for a public-key-hash
pub fn pubkey_hash_address(pkh: PubkeyHash, network: Network) -> String {
    Address::p2pkh(pkh, network).to_string()
}
