//! CLI commands
//!
//! Each `*_core` function returns a [`CommandResult`]: readable output plus a
//! single JSON line for copy-pasting into the transaction assembler.

use anyhow::{Context, Result};
use bitcoin::hashes::Hash;
use bitcoin::{ScriptBuf, Witness};
use serde::{Deserialize, Serialize};
use tracing::warn;

use swapscript::address::pubkey_hash_address;
use swapscript::config::EngineConfig;
use swapscript::swap::{
    build_locking_script, build_spend_script, build_spend_witness, generate_secret, swap_output,
    verify_secret, HtlcTerms, LockingScriptParams, SpendParams, SwapOutputKind,
};
use swapscript::swap::locking::parse_secret_hash;

/// Result from a command, separating explanatory output from the JSON result
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub output: String,
    pub result: String,
}

impl CommandResult {
    pub fn print(&self) {
        println!("{}", self.output);
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("{}\n", self.result);
    }
}

// ============================================================================
// Output Types
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LockingScriptOutput {
    pub locking_script: String,
    pub output_kind: SwapOutputKind,
    pub script_pubkey: String,
    pub address: String,
    pub network: String,
    #[serde(rename = "type")]
    pub event_type: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SpendScriptOutput {
    pub script_sig: String,
    pub redeem: bool,
    #[serde(rename = "type")]
    pub event_type: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SpendWitnessOutput {
    pub witness: Vec<String>,
    pub redeem: bool,
    #[serde(rename = "type")]
    pub event_type: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InspectOutput {
    pub secret_hash: String,
    pub recipient_address: String,
    pub refund_address: String,
    pub expiration: i64,
    pub p2sh_address: String,
    pub p2wsh_address: String,
    pub p2sh_p2wsh_address: String,
    #[serde(rename = "type")]
    pub event_type: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SecretOutput {
    pub secret: String,
    pub secret_hash: String,
    #[serde(rename = "type")]
    pub event_type: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VerifySecretOutput {
    pub valid: bool,
    #[serde(rename = "type")]
    pub event_type: String,
}

// ============================================================================
// Helpers
// ============================================================================

fn network_name(config: &EngineConfig) -> String {
    config.network.to_string()
}

fn parse_script_hex(script_hex: &str) -> Result<ScriptBuf> {
    let bytes = hex::decode(script_hex.trim()).context("Invalid hex for script")?;
    Ok(ScriptBuf::from_bytes(bytes))
}

fn witness_hex(witness: &Witness) -> Vec<String> {
    witness.iter().map(hex::encode).collect()
}

// ============================================================================
// Locking Script
// ============================================================================

pub fn lock_script_core(
    config: &EngineConfig,
    recipient: &str,
    refund: &str,
    secret_hash: &str,
    expiration: i64,
) -> Result<CommandResult> {
    let mut out = String::new();

    let params = LockingScriptParams {
        recipient_address: recipient,
        refund_address: refund,
        secret_hash_hex: secret_hash,
        expiration,
        network: config.network,
    };
    let script = build_locking_script(&params)
        .inspect_err(|e| warn!("lock-script rejected: {e}"))?;
    let output = swap_output(&script, config.output_kind, config.network)?;

    out.push_str("Swap Locking Script\n\n");
    out.push_str(&format!("Recipient (redeems with secret): {}\n", recipient));
    out.push_str(&format!("Refund (reclaims after expiry):  {}\n", refund));
    out.push_str(&format!("Secret hash: {}\n", secret_hash));
    out.push_str(&format!("Expiration:  {}\n\n", expiration));
    out.push_str(&format!("Script ({} bytes): {}\n", script.len(), hex::encode(script.as_bytes())));
    out.push_str(&format!("Fund {} address: {}", output.kind, output.address));

    let result = serde_json::to_string(&LockingScriptOutput {
        locking_script: hex::encode(script.as_bytes()),
        output_kind: output.kind,
        script_pubkey: hex::encode(output.script_pubkey.as_bytes()),
        address: output.address.to_string(),
        network: network_name(config),
        event_type: "swap_locking_script".to_string(),
    })?;

    Ok(CommandResult { output: out, result })
}

// ============================================================================
// Spends
// ============================================================================

pub fn spend_script_core(
    config: &EngineConfig,
    signature: &str,
    public_key: &str,
    secret: Option<&str>,
) -> Result<CommandResult> {
    let is_redeem = secret.is_some();
    let params = SpendParams {
        signature_hex: signature,
        public_key_hex: public_key,
        is_redeem,
        secret_hex: secret,
        sighash: config.sighash()?,
    };
    let script = build_spend_script(&params)
        .inspect_err(|e| warn!("spend rejected: {e}"))?;

    let mut out = String::new();
    if is_redeem {
        out.push_str("Swap Redeem scriptSig\n\n");
        out.push_str("Reveals the secret and takes the OP_IF branch.\n");
    } else {
        out.push_str("Swap Refund scriptSig\n\n");
        out.push_str("Takes the OP_ELSE branch; the spending transaction must be\n");
        out.push_str("locked at or past the swap expiration.\n");
    }
    out.push_str(&format!(
        "\nscriptSig ({} bytes): {}",
        script.len(),
        hex::encode(script.as_bytes())
    ));

    let result = serde_json::to_string(&SpendScriptOutput {
        script_sig: hex::encode(script.as_bytes()),
        redeem: is_redeem,
        event_type: "swap_spend_script".to_string(),
    })?;

    Ok(CommandResult { output: out, result })
}

pub fn spend_witness_core(
    config: &EngineConfig,
    signature: &str,
    public_key: &str,
    secret: Option<&str>,
    locking_script: &str,
) -> Result<CommandResult> {
    let script = parse_script_hex(locking_script)?;
    HtlcTerms::from_locking_script(&script).context("Locking script is not a swap script")?;

    let is_redeem = secret.is_some();
    let params = SpendParams {
        signature_hex: signature,
        public_key_hex: public_key,
        is_redeem,
        secret_hex: secret,
        sighash: config.sighash()?,
    };
    let witness = build_spend_witness(&params, &script)
        .inspect_err(|e| warn!("spend rejected: {e}"))?;
    let items = witness_hex(&witness);

    let mut out = String::new();
    out.push_str(if is_redeem {
        "Swap Redeem Witness\n\n"
    } else {
        "Swap Refund Witness\n\n"
    });
    for (i, item) in items.iter().enumerate() {
        let shown = if item.is_empty() {
            "<empty>"
        } else {
            item.as_str()
        };
        out.push_str(&format!("[{}] {}\n", i, shown));
    }

    let result = serde_json::to_string(&SpendWitnessOutput {
        witness: items,
        redeem: is_redeem,
        event_type: "swap_spend_witness".to_string(),
    })?;

    Ok(CommandResult { output: out, result })
}

// ============================================================================
// Inspection
// ============================================================================

pub fn inspect_script_core(config: &EngineConfig, locking_script: &str) -> Result<CommandResult> {
    let script = parse_script_hex(locking_script)?;
    let terms = HtlcTerms::from_locking_script(&script)?;

    let recipient = pubkey_hash_address(terms.recipient_pkh, config.network);
    let refund = pubkey_hash_address(terms.refund_pkh, config.network);
    let p2sh = swap_output(&script, SwapOutputKind::P2sh, config.network)?;
    let p2wsh = swap_output(&script, SwapOutputKind::P2wsh, config.network)?;
    let nested = swap_output(&script, SwapOutputKind::P2shP2wsh, config.network)?;

    let mut out = String::new();
    out.push_str("Swap Script\n\n");
    out.push_str(&format!("Secret hash: {}\n", hex::encode(terms.secret_hash)));
    out.push_str(&format!(
        "Recipient:   {} ({})\n",
        recipient,
        hex::encode(terms.recipient_pkh.to_byte_array())
    ));
    out.push_str(&format!(
        "Refund:      {} ({})\n",
        refund,
        hex::encode(terms.refund_pkh.to_byte_array())
    ));
    out.push_str(&format!("Expiration:  {}\n", terms.expiration));
    if let Ok(lock_time) = terms.refund_lock_time() {
        out.push_str(&format!("Refund nLockTime: {}\n", lock_time));
    }
    out.push_str(&format!("\np2sh:       {}\n", p2sh.address));
    out.push_str(&format!("p2wsh:      {}\n", p2wsh.address));
    out.push_str(&format!("p2sh-p2wsh: {}", nested.address));

    let result = serde_json::to_string(&InspectOutput {
        secret_hash: hex::encode(terms.secret_hash),
        recipient_address: recipient,
        refund_address: refund,
        expiration: terms.expiration,
        p2sh_address: p2sh.address.to_string(),
        p2wsh_address: p2wsh.address.to_string(),
        p2sh_p2wsh_address: nested.address.to_string(),
        event_type: "swap_script_terms".to_string(),
    })?;

    Ok(CommandResult { output: out, result })
}

pub fn swap_address_core(
    config: &EngineConfig,
    locking_script: &str,
) -> Result<CommandResult> {
    let script = parse_script_hex(locking_script)?;
    let output = swap_output(&script, config.output_kind, config.network)?;

    let out = format!(
        "Swap {} output\n\nAddress:       {}\nscript_pubkey: {}",
        output.kind,
        output.address,
        hex::encode(output.script_pubkey.as_bytes())
    );
    let result = serde_json::to_string(&LockingScriptOutput {
        locking_script: hex::encode(script.as_bytes()),
        output_kind: output.kind,
        script_pubkey: hex::encode(output.script_pubkey.as_bytes()),
        address: output.address.to_string(),
        network: network_name(config),
        event_type: "swap_address".to_string(),
    })?;

    Ok(CommandResult { output: out, result })
}

// ============================================================================
// Secrets
// ============================================================================

pub fn generate_secret_core() -> Result<CommandResult> {
    let secret = generate_secret();
    let hash = hex::encode(secret.hash());

    let mut out = String::new();
    out.push_str("Swap Secret\n\n");
    out.push_str("Keep the secret private until redeeming. Share only the hash.\n\n");
    out.push_str(&format!("Secret hash: {}", hash));

    let result = serde_json::to_string(&SecretOutput {
        secret: secret.to_hex(),
        secret_hash: hash,
        event_type: "swap_secret".to_string(),
    })?;

    Ok(CommandResult { output: out, result })
}

pub fn verify_secret_core(secret: &str, secret_hash: &str) -> Result<CommandResult> {
    let secret = hex::decode(secret.trim()).context("Invalid hex for secret")?;
    let hash = parse_secret_hash(secret_hash)?;
    let valid = verify_secret(&secret, &hash);

    let out = if valid {
        "Secret matches hash".to_string()
    } else {
        "Secret does NOT match hash (or is not 32 bytes)".to_string()
    };
    let result = serde_json::to_string(&VerifySecretOutput {
        valid,
        event_type: "swap_secret_check".to_string(),
    })?;

    Ok(CommandResult { output: out, result })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const ADDRESS: &str = "n3F7jE262SfYXBRTvi54HyyYmWnrWisRV9";
    const SIGNATURE: &str = "3045022041b51d5980e4d319ff05291fcf9049a10b86cc54c5836f2de8ea6bb8ecf419a60221006013a4da68758f2738bfbb9598697758c51dfb96c60a3182517ed8751c603c0c01";
    const PUBKEY: &str = "04edde15dab6b611928fd34406dd465e369a616d789ee42a97f69fe0dcac6399871e7085925dcd012da78ecda5836f616c010afbcd3a8292b62ea6963281a65a9d";

    fn lock_script_hex(config: &EngineConfig) -> String {
        let res =
            lock_script_core(config, ADDRESS, ADDRESS, &"ff".repeat(32), 1468194353).unwrap();
        let json: Value = serde_json::from_str(&res.result).unwrap();
        json["locking_script"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_lock_script_result() {
        let config = EngineConfig::default();
        let res =
            lock_script_core(&config, ADDRESS, ADDRESS, &"ff".repeat(32), 1468194353).unwrap();
        let json: Value = serde_json::from_str(&res.result).unwrap();
        assert_eq!(json["type"], "swap_locking_script");
        assert_eq!(json["output_kind"], "p2wsh");
        assert!(json["address"].as_str().unwrap().starts_with("tb1q"));
        assert!(json["locking_script"].as_str().unwrap().starts_with("6382012088a820"));
    }

    #[test]
    fn test_lock_script_rejects_short_hash() {
        let config = EngineConfig::default();
        assert!(lock_script_core(&config, ADDRESS, ADDRESS, "ffff", 1468194353).is_err());
    }

    #[test]
    fn test_inspect_roundtrip() {
        let config = EngineConfig::default();
        let script = lock_script_hex(&config);
        let res = inspect_script_core(&config, &script).unwrap();
        let json: Value = serde_json::from_str(&res.result).unwrap();
        assert_eq!(json["recipient_address"], ADDRESS);
        assert_eq!(json["refund_address"], ADDRESS);
        assert_eq!(json["expiration"], 1468194353);
        assert_eq!(json["secret_hash"], "ff".repeat(32));
    }

    #[test]
    fn test_spend_witness_requires_swap_script() {
        let config = EngineConfig::default();
        assert!(spend_witness_core(&config, SIGNATURE, PUBKEY, None, "51").is_err());

        let script = lock_script_hex(&config);
        let res = spend_witness_core(&config, SIGNATURE, PUBKEY, None, &script).unwrap();
        let json: Value = serde_json::from_str(&res.result).unwrap();
        assert_eq!(json["witness"].as_array().unwrap().len(), 4);
        assert_eq!(json["redeem"], false);
    }

    #[test]
    fn test_refund_script_result() {
        let config = EngineConfig::default();
        let res = spend_script_core(&config, SIGNATURE, PUBKEY, None).unwrap();
        let json: Value = serde_json::from_str(&res.result).unwrap();
        assert_eq!(
            json["script_sig"],
            format!("49{SIGNATURE}01000041{PUBKEY}")
        );
    }

    #[test]
    fn test_secret_generate_then_verify() {
        let res = generate_secret_core().unwrap();
        let json: Value = serde_json::from_str(&res.result).unwrap();
        let secret = json["secret"].as_str().unwrap();
        let hash = json["secret_hash"].as_str().unwrap();

        let check = verify_secret_core(secret, hash).unwrap();
        assert!(check.result.contains("\"valid\":true"));

        let check = verify_secret_core("00", hash).unwrap();
        assert!(check.result.contains("\"valid\":false"));
    }
}
