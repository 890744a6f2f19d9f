//! `peerplan edges` command - list expanded peering edges

use std::path::PathBuf;

use miette::Result;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::commands::{effective_filter, load_registry};
use crate::graph::{expand, PeeringEdge};

#[derive(clap::Args, Debug)]
pub struct EdgesArgs {
    /// Path to the peering configuration
    #[arg(short, long, default_value = "peering.yaml")]
    pub config: PathBuf,

    /// Only expand matrix entries with this exact source name
    #[arg(short, long, env = "PEERPLAN_SOURCE")]
    pub source: Option<String>,
}

#[derive(Tabled)]
struct EdgeRow {
    #[tabled(rename = "#")]
    index: usize,
    source: String,
    target: String,
    #[tabled(rename = "source region")]
    source_region: String,
    #[tabled(rename = "peer region")]
    peer_region: String,
    mode: String,
    dns: bool,
    #[tabled(rename = "subnet routes")]
    subnet_routes: bool,
}

impl From<&PeeringEdge> for EdgeRow {
    fn from(edge: &PeeringEdge) -> Self {
        Self {
            index: edge.index,
            source: edge.source.name.clone(),
            target: edge.peer.name.clone(),
            source_region: edge.source.region.clone(),
            peer_region: edge.peer.region.clone(),
            mode: edge.mode.to_string(),
            dns: edge.peer.dns_resolution,
            subnet_routes: edge.peer.has_additional_routes,
        }
    }
}

pub fn run(args: EdgesArgs) -> Result<()> {
    let registry = load_registry(&args.config)?;
    let edges = expand(&registry, effective_filter(&args.source))?;

    let rows: Vec<EdgeRow> = edges.iter().map(EdgeRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    Ok(())
}
