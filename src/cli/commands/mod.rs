//! Command implementations

pub mod edges;
pub mod plan;
pub mod validate;

use std::path::Path;

use miette::Result;

use crate::config::{PeeringDoc, PeerRegistry};
use crate::yaml::parse_yaml_file;

/// Load and validate the peering configuration at `path`
pub(crate) fn load_registry(path: &Path) -> Result<PeerRegistry> {
    let doc: PeeringDoc = parse_yaml_file(path)?;
    Ok(PeerRegistry::load(doc)?)
}

/// Treat an empty or unset filter as "expand all sources"
pub(crate) fn effective_filter(source: &Option<String>) -> Option<&str> {
    source.as_deref().filter(|s| !s.is_empty())
}
