//! `peerplan plan` command - build and print the resource plan

use std::path::PathBuf;

use console::style;
use miette::Result;
use serde::Serialize;
use tracing::info;

use crate::cli::commands::{effective_filter, load_registry};
use crate::cli::OutputFormat;
use crate::graph::{expand, EdgeOutputs, EdgeResources, GraphBuilder, PlanRecorder, ResourceNode};

#[derive(clap::Args, Debug)]
pub struct PlanArgs {
    /// Path to the peering configuration
    #[arg(short, long, default_value = "peering.yaml")]
    pub config: PathBuf,

    /// Only expand matrix entries with this exact source name
    #[arg(short, long, env = "PEERPLAN_SOURCE")]
    pub source: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    pub format: OutputFormat,
}

/// The fully-specified plan: every node in declaration order plus the
/// published outputs
#[derive(Debug, Serialize)]
pub struct PlanDoc {
    pub nodes: Vec<ResourceNode>,
    pub outputs: Vec<EdgeOutputs>,
}

pub fn run(args: PlanArgs) -> Result<()> {
    let registry = load_registry(&args.config)?;
    let edges = expand(&registry, effective_filter(&args.source))?;

    let mut recorder = PlanRecorder::new();
    let built = GraphBuilder::new().build(&mut recorder, &edges)?;
    let outputs = EdgeOutputs::project(&built);
    info!(edges = built.len(), nodes = recorder.nodes().len(), "plan built");

    let plan = PlanDoc {
        nodes: recorder.into_nodes(),
        outputs,
    };

    match args.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&plan).map_err(|e| miette::miette!("{e}"))?
        ),
        OutputFormat::Yaml => print!(
            "{}",
            serde_yml::to_string(&plan).map_err(|e| miette::miette!("{e}"))?
        ),
        OutputFormat::Summary => print_summary(&built, &plan),
    }

    Ok(())
}

fn print_summary(built: &[EdgeResources], plan: &PlanDoc) {
    println!(
        "{} Planned {} edge(s), {} resource node(s)\n",
        style("→").blue(),
        built.len(),
        plan.nodes.len()
    );

    for resources in built {
        let edge = &resources.edge;
        let acceptance = if resources.accepter.is_some() {
            "accepter + options"
        } else {
            "options"
        };
        println!(
            "{} {}  {} → {}  [{}]  {} route(s), {}",
            style("✓").green(),
            style(edge.key()).bold(),
            edge.source.region,
            edge.peer.region,
            edge.mode,
            2 + resources.subnet_routes.len(),
            acceptance,
        );
    }

    println!("\n{}", style("Outputs:").bold());
    for output in &plan.outputs {
        for (name, value) in output.entries() {
            println!("  {} = {}", name, value);
        }
    }
}
