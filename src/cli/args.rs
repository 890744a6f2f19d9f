//! Top-level CLI definition

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{edges::EdgesArgs, plan::PlanArgs, validate::ValidateArgs};

#[derive(Parser, Debug)]
#[command(
    name = "peerplan",
    version,
    about = "Expand a declarative VPC peering config into an ordered resource plan"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the full resource plan for the selected edges
    Plan(PlanArgs),
    /// List the peering edges the configuration expands to
    Edges(EdgesArgs),
    /// Check the configuration for missing fields and dangling references
    Validate(ValidateArgs),
}

/// Plan output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Summary,
    Json,
    Yaml,
}
