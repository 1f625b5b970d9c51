use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Parser;
use federa_quorum::{check_well_formed, for_all_nodes, node_weight, LocalNode};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod cli;
mod config;
mod snapshot;

use cli::{Cli, Commands};
use config::{generate_sample_config, NodeConfig, QuorumSetFile};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init { output } => {
            init_config(output)?;
        }
        Commands::Keygen { output } => {
            generate_keypair(output)?;
        }
        Commands::Check { config } => {
            check_config(&config)?;
        }
        Commands::Weights { config } => {
            show_weights(&config)?;
        }
        Commands::Evaluate { config, statements } => {
            evaluate_statements(&config, &statements)?;
        }
    }

    Ok(())
}

fn load_config(config_path: &Path) -> Result<NodeConfig> {
    info!("Loading configuration from {:?}", config_path);

    if !config_path.exists() {
        error!(
            "Configuration file not found: {:?}. Run 'federa init' to create one.",
            config_path
        );
        bail!("Configuration file not found: {}", config_path.display());
    }

    NodeConfig::load(config_path)
}

/// Load the config and refuse to go on with a quorum set that is not sane
fn load_local_node(config_path: &Path) -> Result<LocalNode> {
    let config = load_config(config_path)?;
    let local = config.to_local_node()?;

    // the configured set may hide problems that canonicalization removes
    let configured = config.quorum_set.to_quorum_set()?;
    check_well_formed(&configured, local.limits(), &mut BTreeSet::new())?;
    local.check_quorum_set(local.node_id(), local.quorum_set())?;

    Ok(local)
}

/// Initialize a new configuration file
fn init_config(output: PathBuf) -> Result<()> {
    info!("Generating sample configuration");

    let config = generate_sample_config();
    config.save(&output)?;

    info!("Configuration saved to {:?}", output);

    println!("\nConfiguration file created: {}", output.display());
    println!("Replace the sample peers with the validators this node should trust.");
    println!("\nTo check the quorum set, run:");
    println!("  federa check --config {}", output.display());

    Ok(())
}

/// Generate a new keypair
fn generate_keypair(output: Option<PathBuf>) -> Result<()> {
    let keypair = federa_core::KeyPair::generate();

    println!("Generated new keypair:");
    println!("  Node ID:     {}", keypair.public.to_hex());
    println!("  Secret key:  {}", keypair.secret.to_hex());

    if let Some(path) = output {
        std::fs::write(&path, keypair.secret.to_hex())?;
        info!("Secret key saved to {:?}", path);
    }

    println!("\nWARNING: Keep your secret key safe! Do not share it with anyone.");

    Ok(())
}

/// Check the configured quorum set and show its canonical form
fn check_config(config_path: &Path) -> Result<()> {
    let local = match load_local_node(config_path) {
        Ok(local) => local,
        Err(e) => {
            error!("Quorum set rejected: {}", e);
            return Err(e);
        }
    };

    println!("Node ID:        {}", local.node_id());
    println!("Validator:      {}", local.is_validator());
    println!("Quorum set:     {}", local.render(local.quorum_set()));
    println!("Quorum set hash: {}", local.quorum_set_hash());
    println!("\nCanonical quorum set, in configuration form:");
    let canonical = QuorumSetFile::from_quorum_set(local.quorum_set());
    println!("{}", serde_json::to_string_pretty(&canonical)?);

    Ok(())
}

/// Show the weight of each node in the canonical quorum set
fn show_weights(config_path: &Path) -> Result<()> {
    let local = load_local_node(config_path)?;
    let qset = local.quorum_set();

    println!("Node weights in {}:", local.render(qset));
    for_all_nodes(qset, |node| {
        let weight = node_weight(node, qset);
        let percent = weight as f64 / u64::MAX as f64 * 100.0;
        println!("  {}  {:>20}  {:>7.3}%", node, weight, percent);
    });

    Ok(())
}

/// Evaluate peer statements against the local quorum set
fn evaluate_statements(config_path: &Path, statements_path: &Path) -> Result<()> {
    let local = load_local_node(config_path)?;

    info!("Loading statements from {:?}", statements_path);
    let entries = snapshot::load_statements(statements_path)?;
    let snapshot = snapshot::build_snapshot(&local, entries)?;

    let evaluation = snapshot::evaluate(&local, &snapshot);
    info!(
        "Quorum: {}, v-blocking: {}",
        evaluation.is_quorum, evaluation.is_v_blocking
    );

    println!("{}", serde_json::to_string_pretty(&evaluation)?);

    Ok(())
}
