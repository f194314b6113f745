use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use swapscript::config::{parse_network, EngineConfig};
use swapscript::logging::init_logging;
use swapscript::swap::SwapOutputKind;

mod commands;

#[derive(Parser)]
#[command(name = "swapscript")]
#[command(about = "Bitcoin atomic swap HTLC scripts: build, redeem, refund", long_about = None)]
struct Cli {
    /// JSON config file (network, sighash_type, output_kind)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Network override (bitcoin/mainnet, testnet, signet, regtest)
    #[arg(long, global = true)]
    network: Option<String>,

    /// Output kind override for derived addresses (p2sh, p2wsh, p2sh-p2wsh)
    #[arg(long, global = true)]
    output_kind: Option<SwapOutputKind>,

    /// Debug logging to stderr
    #[arg(long, short, global = true, default_value = "false")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the swap locking script
    LockScript {
        /// Address that redeems with the secret (P2PKH)
        #[arg(long)]
        recipient: String,

        /// Address that reclaims after expiration (P2PKH)
        #[arg(long)]
        refund: String,

        /// SHA256 of the secret (32 bytes / 64 hex chars)
        #[arg(long)]
        secret_hash: String,

        /// Expiration as Unix timestamp (or block height)
        #[arg(long)]
        expiration: i64,
    },

    /// Build the redeem scriptSig (reveals the secret)
    RedeemScript {
        /// DER signature hex (sighash byte is appended)
        #[arg(long)]
        signature: String,

        /// Public key hex (33 or 65 bytes)
        #[arg(long)]
        public_key: String,

        /// Secret preimage hex
        #[arg(long)]
        secret: String,
    },

    /// Build the refund scriptSig (after expiration)
    RefundScript {
        /// DER signature hex (sighash byte is appended)
        #[arg(long)]
        signature: String,

        /// Public key hex (33 or 65 bytes)
        #[arg(long)]
        public_key: String,
    },

    /// Build the redeem witness for a segwit swap output
    RedeemWitness {
        #[arg(long)]
        signature: String,

        #[arg(long)]
        public_key: String,

        #[arg(long)]
        secret: String,

        /// Locking script hex
        #[arg(long)]
        script: String,
    },

    /// Build the refund witness for a segwit swap output
    RefundWitness {
        #[arg(long)]
        signature: String,

        #[arg(long)]
        public_key: String,

        /// Locking script hex
        #[arg(long)]
        script: String,
    },

    /// Decode a locking script into its swap terms
    InspectScript {
        /// Locking script hex
        #[arg(long)]
        script: String,
    },

    /// Derive the funding address for a locking script
    SwapAddress {
        /// Locking script hex
        #[arg(long)]
        script: String,
    },

    /// Generate a random 32-byte secret and its hash
    GenerateSecret,

    /// Check a secret against a secret hash
    VerifySecret {
        #[arg(long)]
        secret: String,

        #[arg(long)]
        secret_hash: String,
    },
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(name) = &cli.network {
        config = config.with_network(parse_network(name)?);
    }
    if let Some(kind) = cli.output_kind {
        config = config.with_output_kind(kind);
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(&cli)?;

    let result = match cli.command {
        Commands::LockScript {
            recipient,
            refund,
            secret_hash,
            expiration,
        } => {
            commands::lock_script_core(&config, &recipient, &refund, &secret_hash, expiration)?
        }
        Commands::RedeemScript {
            signature,
            public_key,
            secret,
        } => {
            commands::spend_script_core(&config, &signature, &public_key, Some(secret.as_str()))?
        }
        Commands::RefundScript {
            signature,
            public_key,
        } => commands::spend_script_core(&config, &signature, &public_key, None)?,
        Commands::RedeemWitness {
            signature,
            public_key,
            secret,
            script,
        } => commands::spend_witness_core(
            &config,
            &signature,
            &public_key,
            Some(secret.as_str()),
            &script,
        )?,
        Commands::RefundWitness {
            signature,
            public_key,
            script,
        } => commands::spend_witness_core(&config, &signature, &public_key, None, &script)?,
        Commands::InspectScript { script } => commands::inspect_script_core(&config, &script)?,
        Commands::SwapAddress { script } => commands::swap_address_core(&config, &script)?,
        Commands::GenerateSecret => commands::generate_secret_core()?,
        Commands::VerifySecret {
            secret,
            secret_hash,
        } => commands::verify_secret_core(&secret, &secret_hash)?,
    };

    result.print();
    Ok(())
}
