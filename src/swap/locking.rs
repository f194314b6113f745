//! HTLC Locking Script
//!
//! Builds and recognizes the swap's locking (redeem) script:
//!
//! ```text
//! OP_IF
//!     OP_SIZE 32 OP_EQUALVERIFY
//!     OP_SHA256 <secret_hash> OP_EQUALVERIFY
//!     OP_DUP OP_HASH160 <recipient_pkh>
//! OP_ELSE
//!     <expiration> OP_CHECKLOCKTIMEVERIFY OP_DROP
//!     OP_DUP OP_HASH160 <refund_pkh>
//! OP_ENDIF
//! OP_EQUALVERIFY OP_CHECKSIG
//! ```
//!
//! The redeem branch needs the 32-byte preimage and the recipient's key; the
//! refund branch needs a transaction locked past `expiration` and the refund
//! party's key. Both branches share the trailing `EQUALVERIFY CHECKSIG`.

use bitcoin::absolute::LockTime;
use bitcoin::hashes::Hash;
use bitcoin::opcodes::all::*;
use bitcoin::opcodes::Opcode;
use bitcoin::script::{Builder, Instruction, Instructions};
use bitcoin::{Network, PubkeyHash, Script, ScriptBuf};
use tracing::debug;

use crate::address::decode_pubkey_hash;
use crate::error::{Result, SwapScriptError};
use crate::script::num;

/// Preimage and hash size enforced by the script
pub const SECRET_SIZE: usize = 32;

/// Decoded parameters of a swap locking script
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HtlcTerms {
    /// SHA256 of the secret
    pub secret_hash: [u8; 32],
    /// Can spend with the secret
    pub recipient_pkh: PubkeyHash,
    /// Can spend after `expiration`
    pub refund_pkh: PubkeyHash,
    /// Unix timestamp (or block height below 500,000,000)
    pub expiration: i64,
}

/// String inputs for [`build_locking_script`]
#[derive(Clone, Debug)]
pub struct LockingScriptParams<'a> {
    pub recipient_address: &'a str,
    pub refund_address: &'a str,
    pub secret_hash_hex: &'a str,
    pub expiration: i64,
    pub network: Network,
}

impl LockingScriptParams<'_> {
    /// Decode addresses and the secret hash into typed terms
    pub fn resolve(&self) -> Result<HtlcTerms> {
        let recipient_pkh = decode_pubkey_hash(self.recipient_address, self.network)?;
        let refund_pkh = decode_pubkey_hash(self.refund_address, self.network)?;
        let secret_hash = parse_secret_hash(self.secret_hash_hex)?;
        HtlcTerms::new(secret_hash, recipient_pkh, refund_pkh, self.expiration)
    }
}

/// Build the locking script from address strings and a hex secret hash
pub fn build_locking_script(params: &LockingScriptParams) -> Result<ScriptBuf> {
    params.resolve()?.to_locking_script()
}

/// Decode a hex secret hash, requiring exactly 32 bytes
pub fn parse_secret_hash(hex_str: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(hex_str.trim()).map_err(|e| SwapScriptError::hex("secret hash", e))?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| SwapScriptError::InvalidHashLength(len))
}

/// Reject expirations CHECKLOCKTIMEVERIFY cannot take as an operand
pub fn validate_expiration(expiration: i64) -> Result<()> {
    if (0..=num::MAX_LOCKTIME_OPERAND).contains(&expiration) {
        Ok(())
    } else {
        Err(SwapScriptError::InvalidExpiration(expiration))
    }
}

impl HtlcTerms {
    pub fn new(
        secret_hash: [u8; 32],
        recipient_pkh: PubkeyHash,
        refund_pkh: PubkeyHash,
        expiration: i64,
    ) -> Result<Self> {
        validate_expiration(expiration)?;
        Ok(Self {
            secret_hash,
            recipient_pkh,
            refund_pkh,
            expiration,
        })
    }

    pub fn to_locking_script(&self) -> Result<ScriptBuf> {
        validate_expiration(self.expiration)?;

        let script = Builder::new()
            .push_opcode(OP_IF)
            .push_opcode(OP_SIZE)
            .push_int(SECRET_SIZE as i64)
            .push_opcode(OP_EQUALVERIFY)
            .push_opcode(OP_SHA256)
            .push_slice(&self.secret_hash)
            .push_opcode(OP_EQUALVERIFY)
            .push_opcode(OP_DUP)
            .push_opcode(OP_HASH160)
            .push_slice(self.recipient_pkh.as_byte_array())
            .push_opcode(OP_ELSE)
            .push_int(self.expiration)
            .push_opcode(OP_CLTV)
            .push_opcode(OP_DROP)
            .push_opcode(OP_DUP)
            .push_opcode(OP_HASH160)
            .push_slice(self.refund_pkh.as_byte_array())
            .push_opcode(OP_ENDIF)
            .push_opcode(OP_EQUALVERIFY)
            .push_opcode(OP_CHECKSIG)
            .into_script();

        debug!(
            len = script.len(),
            expiration = self.expiration,
            "built swap locking script"
        );
        Ok(script)
    }

    /// Recognize a script produced by [`HtlcTerms::to_locking_script`]
    pub fn from_locking_script(script: &Script) -> Result<Self> {
        let mut reader = TemplateReader {
            instructions: script.instructions(),
        };

        reader.op(OP_IF)?;
        reader.op(OP_SIZE)?;
        let size = reader.number()?;
        if size != SECRET_SIZE as i64 {
            return Err(unrecognized(format!("secret size check is {size}, expected 32")));
        }
        reader.op(OP_EQUALVERIFY)?;
        reader.op(OP_SHA256)?;
        let secret_hash = reader.data::<32>()?;
        reader.op(OP_EQUALVERIFY)?;
        reader.op(OP_DUP)?;
        reader.op(OP_HASH160)?;
        let recipient = reader.data::<20>()?;
        reader.op(OP_ELSE)?;
        let expiration = reader.number()?;
        reader.op(OP_CLTV)?;
        reader.op(OP_DROP)?;
        reader.op(OP_DUP)?;
        reader.op(OP_HASH160)?;
        let refund = reader.data::<20>()?;
        reader.op(OP_ENDIF)?;
        reader.op(OP_EQUALVERIFY)?;
        reader.op(OP_CHECKSIG)?;
        reader.end()?;

        Self::new(
            secret_hash,
            PubkeyHash::from_byte_array(recipient),
            PubkeyHash::from_byte_array(refund),
            expiration,
        )
    }

    /// nLockTime a refund transaction must carry to pass CHECKLOCKTIMEVERIFY
    pub fn refund_lock_time(&self) -> Result<LockTime> {
        let value = u32::try_from(self.expiration)
            .map_err(|_| SwapScriptError::InvalidExpiration(self.expiration))?;
        Ok(LockTime::from_consensus(value))
    }
}

fn unrecognized(reason: String) -> SwapScriptError {
    SwapScriptError::UnrecognizedScript(reason)
}

struct TemplateReader<'a> {
    instructions: Instructions<'a>,
}

impl<'a> TemplateReader<'a> {
    fn next(&mut self) -> Result<Instruction<'a>> {
        match self.instructions.next() {
            Some(Ok(instruction)) => Ok(instruction),
            Some(Err(e)) => Err(unrecognized(e.to_string())),
            None => Err(unrecognized("script ended early".to_string())),
        }
    }

    fn op(&mut self, expected: Opcode) -> Result<()> {
        match self.next()? {
            Instruction::Op(op) if op == expected => Ok(()),
            other => Err(unrecognized(format!("expected {expected}, found {other:?}"))),
        }
    }

    fn data<const N: usize>(&mut self) -> Result<[u8; N]> {
        match self.next()? {
            Instruction::PushBytes(bytes) => bytes.as_bytes().try_into().map_err(|_| {
                unrecognized(format!("expected {N}-byte push, found {}", bytes.len()))
            }),
            other => Err(unrecognized(format!("expected {N}-byte push, found {other:?}"))),
        }
    }

    fn number(&mut self) -> Result<i64> {
        match self.next()? {
            Instruction::PushBytes(bytes) => {
                num::decode(bytes.as_bytes(), num::LOCKTIME_OPERAND_LEN)
                    .ok_or_else(|| unrecognized("non-minimal number".to_string()))
            }
            Instruction::Op(op) if op == OP_PUSHNUM_NEG1 => Ok(-1),
            Instruction::Op(op)
                if (OP_PUSHNUM_1.to_u8()..=OP_PUSHNUM_16.to_u8()).contains(&op.to_u8()) =>
            {
                Ok((op.to_u8() - OP_PUSHNUM_1.to_u8() + 1) as i64)
            }
            other => Err(unrecognized(format!("expected number, found {other:?}"))),
        }
    }

    fn end(&mut self) -> Result<()> {
        match self.instructions.next() {
            None => Ok(()),
            Some(_) => Err(unrecognized("trailing data after OP_CHECKSIG".to_string())),
        }
    }
}
