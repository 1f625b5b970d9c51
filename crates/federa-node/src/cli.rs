use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Federa - quorum-set tooling for federated Byzantine agreement
#[derive(Parser)]
#[command(name = "federa")]
#[command(about = "Inspect and evaluate federated quorum configurations")]
#[command(version)]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new node configuration
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "config.json")]
        output: PathBuf,
    },

    /// Generate a new keypair
    Keygen {
        /// Output file for secret key
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check the configured quorum set and print its canonical form
    Check {
        /// Path to configuration file
        #[arg(short, long, default_value = "config.json")]
        config: PathBuf,
    },

    /// Print the weight of every node in the canonical quorum set
    Weights {
        /// Path to configuration file
        #[arg(short, long, default_value = "config.json")]
        config: PathBuf,
    },

    /// Evaluate a snapshot of peer statements against the local node
    Evaluate {
        /// Path to configuration file
        #[arg(short, long, default_value = "config.json")]
        config: PathBuf,

        /// Peer statements JSON file
        #[arg(short, long)]
        statements: PathBuf,
    },
}
