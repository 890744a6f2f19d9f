//! Peer registry - normalizes document entries into typed peer records

use indexmap::IndexMap;
use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

use crate::config::arn::account_id_from_role_arn;
use crate::config::types::PeeringDoc;

/// Region applied when a peer entry leaves `region` unset
pub const DEFAULT_REGION: &str = "us-west-2";

/// Configuration errors - all fatal, surfaced with the offending key
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("peer {peer:?} is missing a vpc_id")]
    #[diagnostic(code(peerplan::config::missing_vpc_id))]
    MissingVpcId { peer: String },

    #[error("peering_matrix source {name:?} has no entry in peers")]
    #[diagnostic(code(peerplan::config::unknown_source))]
    UnknownSource { name: String },

    #[error("peering_matrix target {name:?} (under source {source_name:?}) has no entry in peers")]
    #[diagnostic(code(peerplan::config::unknown_peer))]
    UnknownPeer { source_name: String, name: String },

    #[error("peering_matrix source {source_name:?} lists target {target:?} more than once")]
    #[diagnostic(code(peerplan::config::duplicate_edge))]
    DuplicateEdge { source_name: String, target: String },

    #[error("peer {peer:?} has a role_arn without a parseable account id: {role_arn:?}")]
    #[diagnostic(
        code(peerplan::config::malformed_role_arn),
        help("role ARNs look like arn:aws:iam::123456789012:role/Name")
    )]
    MalformedRoleArn { peer: String, role_arn: String },

    #[error("no peering edges matched source filter {filter:?}")]
    #[diagnostic(
        code(peerplan::config::no_edges_matched),
        help("the filter must exactly match a source name in peering_matrix")
    )]
    NoEdgesMatched { filter: String },
}

/// A normalized, immutable peer record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerRecord {
    pub name: String,
    pub vpc_id: String,
    pub region: String,
    pub role_arn: String,
    pub dns_resolution: bool,
    pub has_additional_routes: bool,
}

/// Registry of peer records plus the adjacency matrix, keyed by peer name.
///
/// Records are immutable once loaded. Key uniqueness is an invariant,
/// enforced when the document is parsed (duplicate names fail the load).
#[derive(Debug, Clone, Default)]
pub struct PeerRegistry {
    peers: IndexMap<String, PeerRecord>,
    matrix: IndexMap<String, Vec<String>>,
}

impl PeerRegistry {
    /// Validate and normalize a parsed document.
    ///
    /// Fails when a peer lacks a vpc_id, when its role ARN does not yield an
    /// account id, when the matrix references an undefined peer name, or
    /// when a source lists the same target twice.
    pub fn load(doc: PeeringDoc) -> Result<Self, ConfigError> {
        let mut peers = IndexMap::with_capacity(doc.peers.len());

        for (name, entry) in doc.peers {
            if entry.vpc_id.is_empty() {
                return Err(ConfigError::MissingVpcId { peer: name });
            }
            if account_id_from_role_arn(&entry.role_arn).is_none() {
                return Err(ConfigError::MalformedRoleArn {
                    peer: name,
                    role_arn: entry.role_arn,
                });
            }

            let region = if entry.region.is_empty() {
                DEFAULT_REGION.to_string()
            } else {
                entry.region
            };

            peers.insert(
                name.clone(),
                PeerRecord {
                    name,
                    vpc_id: entry.vpc_id,
                    region,
                    role_arn: entry.role_arn,
                    dns_resolution: entry.dns_resolution,
                    has_additional_routes: entry.has_additional_routes,
                },
            );
        }

        for (source, targets) in &doc.peering_matrix {
            if !peers.contains_key(source) {
                return Err(ConfigError::UnknownSource {
                    name: source.clone(),
                });
            }
            let mut seen = std::collections::HashSet::new();
            for target in targets {
                if !peers.contains_key(target) {
                    return Err(ConfigError::UnknownPeer {
                        source_name: source.clone(),
                        name: target.clone(),
                    });
                }
                if !seen.insert(target.as_str()) {
                    return Err(ConfigError::DuplicateEdge {
                        source_name: source.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        debug!(peers = peers.len(), sources = doc.peering_matrix.len(), "registry loaded");

        Ok(Self {
            peers,
            matrix: doc.peering_matrix,
        })
    }

    /// Look up a peer record by name
    pub fn get(&self, name: &str) -> Option<&PeerRecord> {
        self.peers.get(name)
    }

    /// The adjacency matrix, in document order
    pub fn matrix(&self) -> &IndexMap<String, Vec<String>> {
        &self.matrix
    }

    /// Number of registered peers
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// True when no peers are registered
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Iterate records in document order
    pub fn iter(&self) -> impl Iterator<Item = &PeerRecord> {
        self.peers.values()
    }
}
