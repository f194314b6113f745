//! Script Primitives
//!
//! - **num**: minimal script-number encoding
//! - [`push_bytes`]: owned data for `Builder::push_slice`

pub mod num;

use bitcoin::script::PushBytesBuf;

use crate::error::{Result, SwapScriptError};

/// Wrap caller data for a script push.
///
/// `Builder::push_slice` picks the direct, PUSHDATA1, PUSHDATA2 or PUSHDATA4
/// prefix from the length. Empty data is pushed as `OP_0`.
pub fn push_bytes(data: &[u8]) -> Result<PushBytesBuf> {
    PushBytesBuf::try_from(data.to_vec())
        .map_err(|_| SwapScriptError::PushTooLarge(data.len()))
}
