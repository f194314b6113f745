//! Engine configuration
//!
//! Network and signature settings shared by every command. Loaded from a
//! JSON file, with CLI flags layered on top.

use bitcoin::sighash::EcdsaSighashType;
use bitcoin::Network;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, SwapScriptError};
use crate::swap::SwapOutputKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Network addresses are decoded for
    pub network: Network,
    /// Sighash byte appended to spend signatures
    pub sighash_type: u8,
    /// Output variant used when deriving swap addresses
    pub output_kind: SwapOutputKind,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            sighash_type: EcdsaSighashType::All.to_u32() as u8,
            output_kind: SwapOutputKind::P2wsh,
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| SwapScriptError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| SwapScriptError::Config(format!("{}: {}", path.display(), e)))?;
        config.sighash()?;
        Ok(config)
    }

    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    pub fn with_output_kind(mut self, kind: SwapOutputKind) -> Self {
        self.output_kind = kind;
        self
    }

    pub fn sighash(&self) -> Result<EcdsaSighashType> {
        EcdsaSighashType::from_standard(self.sighash_type as u32)
            .map_err(|e| SwapScriptError::Config(e.to_string()))
    }
}

/// Parse a network name (`bitcoin`, `testnet`, `signet`, `regtest`, `mainnet`)
pub fn parse_network(name: &str) -> Result<Network> {
    match name.trim().to_ascii_lowercase().as_str() {
        "mainnet" => Ok(Network::Bitcoin),
        other => other
            .parse::<Network>()
            .map_err(|e| SwapScriptError::Config(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.sighash().unwrap(), EcdsaSighashType::All);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"network": "regtest", "output_kind": "p2sh-p2wsh"}}"#).unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.network, Network::Regtest);
        assert_eq!(config.output_kind, SwapOutputKind::P2shP2wsh);
        assert_eq!(config.sighash_type, 0x01);
    }

    #[test]
    fn test_load_rejects_nonstandard_sighash() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"sighash_type": 5}}"#).unwrap();
        assert!(matches!(
            EngineConfig::load(file.path()),
            Err(SwapScriptError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load(Path::new("/nonexistent/swapscript.json")).unwrap_err();
        assert!(matches!(err, SwapScriptError::Config(_)));
    }

    #[test]
    fn test_parse_network() {
        assert_eq!(parse_network("mainnet").unwrap(), Network::Bitcoin);
        assert_eq!(parse_network("Testnet").unwrap(), Network::Testnet);
        assert_eq!(parse_network("signet").unwrap(), Network::Signet);
        assert!(parse_network("moon").is_err());
    }
}
