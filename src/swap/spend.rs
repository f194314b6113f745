//! Swap Spend Assembly
//!
//! Unlocking data for the two ways out of a funded swap output.
//!
//! Legacy scriptSig layout:
//!
//! ```text
//! redeem: <sig||sighash> <secret> OP_1 <pubkey>
//! refund: <sig||sighash> OP_0     OP_0 <pubkey>
//! ```
//!
//! Segwit witness stack (witness script last):
//!
//! ```text
//! redeem: <sig||sighash> <pubkey> <secret> 0x01 <script>
//! refund: <sig||sighash> <pubkey> <>            <script>
//! ```

use bitcoin::opcodes::all::OP_PUSHNUM_1;
use bitcoin::opcodes::OP_0;
use bitcoin::script::{Builder, Instruction};
use bitcoin::sighash::EcdsaSighashType;
use bitcoin::{Script, ScriptBuf, Witness};
use tracing::debug;

use crate::error::{Result, SwapScriptError};
use crate::script::push_bytes;

use super::secret::Secret;

/// Which branch of the locking script a spend takes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpendPath {
    /// Reveal the secret (recipient)
    Redeem { secret: Secret },
    /// Reclaim after expiration (refund party)
    Refund,
}

impl SpendPath {
    pub fn is_redeem(&self) -> bool {
        matches!(self, SpendPath::Redeem { .. })
    }
}

/// Hex inputs for [`build_spend_script`]
#[derive(Clone, Debug)]
pub struct SpendParams<'a> {
    /// DER signature
    pub signature_hex: &'a str,
    pub public_key_hex: &'a str,
    pub is_redeem: bool,
    /// Required when `is_redeem`; ignored otherwise. Empty is not absent.
    pub secret_hex: Option<&'a str>,
    /// Appended to the signature before pushing
    pub sighash: EcdsaSighashType,
}

/// Decoded spend inputs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpendInputs {
    pub signature: Vec<u8>,
    pub public_key: Vec<u8>,
    pub path: SpendPath,
}

impl SpendParams<'_> {
    pub fn resolve(&self) -> Result<SpendInputs> {
        let signature = hex::decode(self.signature_hex.trim())
            .map_err(|e| SwapScriptError::hex("signature", e))?;
        let public_key = hex::decode(self.public_key_hex.trim())
            .map_err(|e| SwapScriptError::hex("public key", e))?;

        let path = if self.is_redeem {
            let secret_hex = self.secret_hex.ok_or(SwapScriptError::MissingSecret)?;
            SpendPath::Redeem {
                secret: Secret::from_hex(secret_hex)?,
            }
        } else {
            SpendPath::Refund
        };

        SpendInputs::new(signature, public_key, path)
    }
}

/// Build the scriptSig for a redeem or refund spend
pub fn build_spend_script(params: &SpendParams) -> Result<ScriptBuf> {
    params.resolve()?.to_script_sig(params.sighash)
}

/// Build the witness for a P2WSH (or P2SH-P2WSH) redeem or refund spend
pub fn build_spend_witness(params: &SpendParams, locking_script: &Script) -> Result<Witness> {
    params
        .resolve()?
        .to_witness(params.sighash, locking_script)
}

impl SpendInputs {
    pub fn new(signature: Vec<u8>, public_key: Vec<u8>, path: SpendPath) -> Result<Self> {
        if signature.is_empty() || public_key.is_empty() {
            return Err(SwapScriptError::EmptySignatureOrKey);
        }
        Ok(Self {
            signature,
            public_key,
            path,
        })
    }

    fn signature_with_sighash(&self, sighash: EcdsaSighashType) -> Vec<u8> {
        let mut sig = Vec::with_capacity(self.signature.len() + 1);
        sig.extend_from_slice(&self.signature);
        sig.push(sighash.to_u32() as u8);
        sig
    }

    pub fn to_script_sig(&self, sighash: EcdsaSighashType) -> Result<ScriptBuf> {
        if self.signature.is_empty() || self.public_key.is_empty() {
            return Err(SwapScriptError::EmptySignatureOrKey);
        }

        let builder = Builder::new()
            .push_slice(push_bytes(&self.signature_with_sighash(sighash))?);
        let builder = match &self.path {
            SpendPath::Redeem { secret } => builder
                .push_slice(push_bytes(secret.as_bytes())?)
                .push_opcode(OP_PUSHNUM_1),
            SpendPath::Refund => builder.push_opcode(OP_0).push_opcode(OP_0),
        };
        let script = builder
            .push_slice(push_bytes(&self.public_key)?)
            .into_script();

        debug!(
            len = script.len(),
            redeem = self.path.is_redeem(),
            "built swap spend script"
        );
        Ok(script)
    }

    pub fn to_witness(
        &self,
        sighash: EcdsaSighashType,
        locking_script: &Script,
    ) -> Result<Witness> {
        if self.signature.is_empty() || self.public_key.is_empty() {
            return Err(SwapScriptError::EmptySignatureOrKey);
        }

        let mut witness = Witness::new();
        witness.push(self.signature_with_sighash(sighash));
        witness.push(&self.public_key);
        match &self.path {
            SpendPath::Redeem { secret } => {
                witness.push(secret.as_bytes());
                witness.push([0x01u8]);
            }
            SpendPath::Refund => witness.push([0u8; 0]),
        }
        witness.push(locking_script.as_bytes());

        debug!(
            items = witness.len(),
            redeem = self.path.is_redeem(),
            "built swap spend witness"
        );
        Ok(witness)
    }
}

/// Recover the secret revealed by a redeem scriptSig.
///
/// Returns `None` for refund spends and scripts of any other shape. A
/// trailing push (the P2SH redeem script) is tolerated.
pub fn extract_secret_from_script_sig(script_sig: &Script) -> Option<Secret> {
    let instructions: Vec<Instruction> = script_sig
        .instructions()
        .collect::<std::result::Result<_, _>>()
        .ok()?;

    match instructions.as_slice() {
        [
            Instruction::PushBytes(_),
            Instruction::PushBytes(secret),
            Instruction::Op(op),
            Instruction::PushBytes(_),
            rest @ ..,
        ] if *op == OP_PUSHNUM_1 && rest.len() <= 1 => {
            Some(Secret::from_bytes(secret.as_bytes().to_vec()))
        }
        _ => None,
    }
}

/// Recover the secret revealed by a redeem witness
pub fn extract_secret_from_witness(witness: &Witness) -> Option<Secret> {
    if witness.len() != 5 || witness.nth(3)? != [0x01] {
        return None;
    }
    witness.nth(2).map(|secret| Secret::from_bytes(secret.to_vec()))
}
