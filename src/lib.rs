//! Peerplan: declarative VPC peering plans
//!
//! Expands a plain-text YAML description of network zones and their peering
//! matrix into an ordered graph of resource declarations: credential
//! contexts, network lookups, the peering link, conditional acceptance,
//! options, and bidirectional routes.

pub mod cli;
pub mod config;
pub mod graph;
pub mod yaml;
