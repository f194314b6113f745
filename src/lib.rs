//! Bitcoin atomic swap script engine
//!
//! Builds the HTLC locking script for a swap and assembles the unlocking data
//! for its redeem and refund paths. Everything here is pure byte
//! construction: no network access and no key handling beyond the bytes the
//! caller supplies.

pub mod address;
pub mod config;
pub mod error;
pub mod logging;
pub mod script;
pub mod swap;

pub use error::{Result, SwapScriptError};
pub use swap::{
    build_locking_script, build_spend_script, build_spend_witness, HtlcTerms,
    LockingScriptParams, SpendParams,
};
