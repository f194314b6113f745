//! Swap payment outputs
//!
//! A locking script can be funded as legacy P2SH, native P2WSH, or P2WSH
//! nested in P2SH. The funding side only needs the script_pubkey / address;
//! the spending side picks scriptSig or witness accordingly.

use bitcoin::{Address, Amount, Network, Script, ScriptBuf, Transaction};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SwapScriptError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwapOutputKind {
    P2sh,
    P2wsh,
    P2shP2wsh,
}

impl SwapOutputKind {
    pub const ALL: [SwapOutputKind; 3] = [
        SwapOutputKind::P2wsh,
        SwapOutputKind::P2shP2wsh,
        SwapOutputKind::P2sh,
    ];

    pub fn script_pubkey(self, locking_script: &Script) -> ScriptBuf {
        match self {
            SwapOutputKind::P2sh => locking_script.to_p2sh(),
            SwapOutputKind::P2wsh => locking_script.to_p2wsh(),
            SwapOutputKind::P2shP2wsh => locking_script.to_p2wsh().to_p2sh(),
        }
    }
}

impl fmt::Display for SwapOutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SwapOutputKind::P2sh => "p2sh",
            SwapOutputKind::P2wsh => "p2wsh",
            SwapOutputKind::P2shP2wsh => "p2sh-p2wsh",
        };
        f.write_str(name)
    }
}

impl FromStr for SwapOutputKind {
    type Err = SwapScriptError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "p2sh" => Ok(SwapOutputKind::P2sh),
            "p2wsh" => Ok(SwapOutputKind::P2wsh),
            "p2sh-p2wsh" | "p2shp2wsh" => Ok(SwapOutputKind::P2shP2wsh),
            other => Err(SwapScriptError::Config(format!(
                "unknown output kind '{other}' (expected p2sh, p2wsh or p2sh-p2wsh)"
            ))),
        }
    }
}

/// Where to send the funds that lock a swap
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapOutput {
    pub kind: SwapOutputKind,
    pub script_pubkey: ScriptBuf,
    pub address: Address,
}

pub fn swap_output(
    locking_script: &Script,
    kind: SwapOutputKind,
    network: Network,
) -> Result<SwapOutput> {
    let address = match kind {
        SwapOutputKind::P2sh => Address::p2sh(locking_script, network)
            .map_err(|e| SwapScriptError::UnrecognizedScript(e.to_string()))?,
        SwapOutputKind::P2wsh => Address::p2wsh(locking_script, network),
        SwapOutputKind::P2shP2wsh => Address::p2shwsh(locking_script, network),
    };

    Ok(SwapOutput {
        kind,
        script_pubkey: kind.script_pubkey(locking_script),
        address,
    })
}

/// Locate the output of a funding transaction that pays `value` to the swap.
///
/// Returns the output index and the variant it was funded as.
pub fn find_initiation_output(
    tx: &Transaction,
    locking_script: &Script,
    value: Amount,
) -> Option<(u32, SwapOutputKind)> {
    let candidates: Vec<(SwapOutputKind, ScriptBuf)> = SwapOutputKind::ALL
        .iter()
        .map(|kind| (*kind, kind.script_pubkey(locking_script)))
        .collect();

    tx.output.iter().enumerate().find_map(|(vout, out)| {
        if out.value != value {
            return None;
        }
        candidates
            .iter()
            .find(|(_, spk)| *spk == out.script_pubkey)
            .map(|(kind, _)| (vout as u32, *kind))
    })
}
