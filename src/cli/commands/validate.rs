//! `peerplan validate` command - check the configuration without planning

use std::path::PathBuf;

use console::style;
use miette::Result;

use crate::cli::commands::load_registry;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Path to the peering configuration
    #[arg(short, long, default_value = "peering.yaml")]
    pub config: PathBuf,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let registry = load_registry(&args.config)?;

    if registry.is_empty() {
        println!(
            "{} {} - no peers defined, nothing to plan",
            style("!").yellow(),
            args.config.display(),
        );
        return Ok(());
    }

    let edge_count: usize = registry.matrix().values().map(Vec::len).sum();
    println!(
        "{} {} - {} peer(s), {} matrix source(s), {} edge(s)",
        style("✓").green(),
        args.config.display(),
        registry.len(),
        registry.matrix().len(),
        edge_count,
    );
    for peer in registry.iter() {
        println!("  {} {} ({})", style(&peer.name).bold(), peer.vpc_id, peer.region);
    }

    Ok(())
}
