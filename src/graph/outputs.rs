//! Output projection - externally visible identifiers per edge

use serde::Serialize;
use serde_json::Value;

use crate::graph::builder::EdgeResources;

/// Published identifiers for one processed edge
#[derive(Debug, Clone, Serialize)]
pub struct EdgeOutputs {
    pub index: usize,
    /// Edge identity, `source/target`
    pub edge: String,
    pub vpc_peering_connection_id: String,
    pub source_main_route_table_id: String,
    pub peer_main_route_table_id: String,
    pub dns_resolution_enabled: bool,
}

impl EdgeOutputs {
    /// Project outputs for every built edge, in edge order
    pub fn project(resources: &[EdgeResources]) -> Vec<EdgeOutputs> {
        resources
            .iter()
            .map(|r| EdgeOutputs {
                index: r.edge.index,
                edge: r.edge.key(),
                vpc_peering_connection_id: r.link.id(),
                source_main_route_table_id: r.source_main_rt.id(),
                peer_main_route_table_id: r.peer_main_rt.id(),
                dns_resolution_enabled: r.edge.peer.dns_resolution,
            })
            .collect()
    }

    /// Flat index-suffixed entries, stable across re-runs of the same
    /// configuration
    pub fn entries(&self) -> Vec<(String, Value)> {
        vec![
            (
                format!("VpcPeeringConnectionId_{}", self.index),
                Value::String(self.vpc_peering_connection_id.clone()),
            ),
            (
                format!("SourceMainRouteTableId_{}", self.index),
                Value::String(self.source_main_route_table_id.clone()),
            ),
            (
                format!("PeerMainRouteTableId_{}", self.index),
                Value::String(self.peer_main_route_table_id.clone()),
            ),
            (
                format!("DnsResolutionEnabled_{}", self.index),
                Value::Bool(self.dns_resolution_enabled),
            ),
        ]
    }
}
