//! Error types for script construction and recognition

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapScriptError {
    /// Address does not decode to a P2PKH public-key-hash for the network
    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Secret hash must be 32 bytes, got {0}")]
    InvalidHashLength(usize),

    #[error("Expiration {0} is not a valid CHECKLOCKTIMEVERIFY operand")]
    InvalidExpiration(i64),

    #[error("Redeem spend requires a secret")]
    MissingSecret,

    #[error("Signature and public key must not be empty")]
    EmptySignatureOrKey,

    #[error("Invalid hex in {field}: {reason}")]
    InvalidHex { field: &'static str, reason: String },

    /// Data too long for a single script push
    #[error("Push of {0} bytes exceeds the script push limit")]
    PushTooLarge(usize),

    #[error("Not a swap script: {0}")]
    UnrecognizedScript(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SwapScriptError {
    pub(crate) fn hex(field: &'static str, err: hex::FromHexError) -> Self {
        SwapScriptError::InvalidHex {
            field,
            reason: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SwapScriptError>;
