//! XRPL Multi-Sign Console CLI
//!
//! Offline tooling around the multi-sign core: validate action inputs,
//! preview drafts, and manage the persisted signer registry.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use xrpl_multisign::cli;
use xrpl_multisign::config::ConsoleConfig;

#[derive(Parser)]
#[command(name = "xrpl-multisign")]
#[command(version = "0.1.0")]
#[command(about = "Multi-signature coordination and input validation for the XRP Ledger", long_about = None)]
struct Cli {
    /// Data directory holding the signer store
    #[arg(short, long, default_value = ".xrpl_multisign_data")]
    data_dir: PathBuf,

    /// Console configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an inputs file for an action
    Validate {
        /// Action name (e.g. setMultiSign, createTicket)
        #[arg(short, long)]
        action: String,

        /// JSON file with the form inputs
        #[arg(short, long)]
        inputs: PathBuf,
    },

    /// Preview the transactions an action would send
    Draft {
        #[arg(short, long)]
        action: String,

        #[arg(short, long)]
        inputs: PathBuf,
    },

    /// Clamp a quorum against signer weights
    Quorum {
        /// Comma-separated signer weights
        #[arg(short, long)]
        weights: String,

        #[arg(short, long)]
        requested: u32,
    },

    /// Compute the fee of a multi-signed transaction
    Fee {
        /// Number of signatures
        #[arg(short, long)]
        signers: usize,

        /// Base fee in drops
        #[arg(short, long, default_value = "10")]
        base: u64,
    },

    /// Stored signer operations
    Signers {
        #[command(subcommand)]
        action: SignersCommands,
    },

    /// Inspect a seed
    Seed {
        #[arg(short, long)]
        value: String,
    },

    /// Show the effective configuration
    Config,
}

#[derive(Subcommand)]
enum SignersCommands {
    /// List stored signers
    List {
        /// Multi-signed account
        #[arg(short, long)]
        address: String,
    },

    /// Add a signer
    Add {
        #[arg(short, long)]
        address: String,

        /// Signer account
        #[arg(long)]
        signer: String,

        /// Signer seed
        #[arg(long, default_value = "")]
        seed: String,

        #[arg(short, long, default_value = "1")]
        weight: u16,
    },

    /// Remove a signer by position
    Remove {
        #[arg(short, long)]
        address: String,

        #[arg(short, long)]
        index: usize,
    },

    /// Forget every stored signer
    Clear {
        #[arg(short, long)]
        address: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.data_dir.join("config.json"));
    let config = ConsoleConfig::load(&config_path)?.with_data_dir(&cli.data_dir);

    match cli.command {
        Commands::Validate { action, inputs } => {
            let errors = cli::cmd_validate(&action, &inputs)?;
            if !errors.is_empty() {
                std::process::exit(1);
            }
        }

        Commands::Draft { action, inputs } => {
            cli::cmd_draft(&action, &inputs)?;
        }

        Commands::Quorum { weights, requested } => {
            cli::cmd_quorum(&weights, requested)?;
        }

        Commands::Fee { signers, base } => {
            cli::cmd_fee(signers, base)?;
        }

        Commands::Signers { action } => match action {
            SignersCommands::List { address } => {
                cli::cmd_signers_list(&config, &address)?;
            }
            SignersCommands::Add {
                address,
                signer,
                seed,
                weight,
            } => {
                cli::cmd_signers_add(&config, &address, &signer, &seed, weight)?;
            }
            SignersCommands::Remove { address, index } => {
                cli::cmd_signers_remove(&config, &address, index)?;
            }
            SignersCommands::Clear { address } => {
                cli::cmd_signers_clear(&config, &address)?;
            }
        },

        Commands::Seed { value } => {
            cli::cmd_seed(&value)?;
        }

        Commands::Config => {
            cli::cmd_config_show(&config)?;
        }
    }

    Ok(())
}
