//! Atomic Swap Scripts
//!
//! This module builds and spends the HTLC output of a Bitcoin atomic swap:
//!
//! - **locking**: the locking script and its recognition
//! - **spend**: redeem / refund scriptSig and witness assembly
//! - **output**: P2SH / P2WSH / P2SH-P2WSH funding outputs
//! - **secret**: secret generation and verification

pub mod locking;
pub mod output;
pub mod secret;
pub mod spend;

pub use locking::{build_locking_script, HtlcTerms, LockingScriptParams};
pub use output::{find_initiation_output, swap_output, SwapOutput, SwapOutputKind};
pub use secret::{generate_secret, secret_hash, verify_secret, Secret};
pub use spend::{
    build_spend_script, build_spend_witness, extract_secret_from_script_sig,
    extract_secret_from_witness, SpendInputs, SpendParams, SpendPath,
};
