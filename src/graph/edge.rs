//! Edge expansion - adjacency matrix to ordered peering edges

use serde::Serialize;
use tracing::debug;

use crate::config::{ConfigError, PeerRecord, PeerRegistry};

/// How a peering link gets confirmed.
///
/// Computed once per edge and threaded through the builder; never re-derived
/// from the regions downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkMode {
    /// Same-region link; the provider confirms it in one step
    AutoAccepted,
    /// Cross-region link; the peer side must accept explicitly
    RequiresAcceptance,
}

impl LinkMode {
    /// Auto-accept is only valid within a single region
    pub fn for_regions(source_region: &str, peer_region: &str) -> Self {
        if source_region == peer_region {
            LinkMode::AutoAccepted
        } else {
            LinkMode::RequiresAcceptance
        }
    }

    pub fn auto_accept(self) -> bool {
        matches!(self, LinkMode::AutoAccepted)
    }
}

impl std::fmt::Display for LinkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkMode::AutoAccepted => write!(f, "auto-accept"),
            LinkMode::RequiresAcceptance => write!(f, "explicit-accept"),
        }
    }
}

/// A directed source→target peering relationship
#[derive(Debug, Clone)]
pub struct PeeringEdge {
    /// Position in expansion order; drives presentation labels only
    pub index: usize,
    /// Display name, the target peer's name
    pub name: String,
    pub source: PeerRecord,
    pub peer: PeerRecord,
    pub mode: LinkMode,
}

impl PeeringEdge {
    /// Stable identity for this edge, independent of position
    pub fn key(&self) -> String {
        format!("{}/{}", self.source.name, self.peer.name)
    }
}

/// Expand the adjacency matrix into concrete edges, in document order.
///
/// A non-empty `filter` keeps only matrix entries whose source name matches
/// exactly. Zero resulting edges is a configuration error, not an empty
/// success: there is nothing to plan for.
pub fn expand(
    registry: &PeerRegistry,
    filter: Option<&str>,
) -> Result<Vec<PeeringEdge>, ConfigError> {
    let filter = filter.unwrap_or("");
    debug!(filter, "expanding peering matrix");

    let mut edges = Vec::new();
    for (source, targets) in registry.matrix() {
        if !filter.is_empty() && source.as_str() != filter {
            continue;
        }
        debug!(source = %source, targets = targets.len(), "considering source");

        let source_record = registry
            .get(source)
            .ok_or_else(|| ConfigError::UnknownSource {
                name: source.clone(),
            })?;

        for target in targets {
            let peer_record = registry.get(target).ok_or_else(|| ConfigError::UnknownPeer {
                source_name: source.clone(),
                name: target.clone(),
            })?;

            edges.push(PeeringEdge {
                index: edges.len(),
                name: target.clone(),
                source: source_record.clone(),
                peer: peer_record.clone(),
                mode: LinkMode::for_regions(&source_record.region, &peer_record.region),
            });
        }
    }

    if edges.is_empty() {
        return Err(ConfigError::NoEdgesMatched {
            filter: filter.to_string(),
        });
    }

    debug!(edges = edges.len(), "expansion complete");
    Ok(edges)
}
