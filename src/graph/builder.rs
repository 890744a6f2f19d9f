//! Resource graph builder - derives the full node set for each edge
//!
//! For every peering edge, in edge order: credential contexts, network and
//! main route table lookups, the link, conditional acceptance, options, both
//! main routes, and (when flagged) one route per route table of every tagged
//! subnet. Dependency edges are ordered by construction; the result is a DAG
//! without any cycle detection.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::config::account_id_from_role_arn;
use crate::graph::edge::PeeringEdge;
use crate::graph::engine::{EngineError, ResourceEngine};
use crate::graph::node::{
    Cardinality, Handle, LookupFilter, LookupSpec, NodeKey, ResourceKind, ResourceSpec,
};

/// Tag that marks source-side subnets as peering participants
pub const SOURCE_SUBNET_TAG: &str = "tag:peerplan-source-rt";

/// Tag that marks peer-side subnets as peering participants.
/// Intentionally distinct from [`SOURCE_SUBNET_TAG`]: source- and peer-side
/// operators tag with different conventions.
pub const PEER_SUBNET_TAG: &str = "tag:peerplan-peer-rt";

/// Everything declared for one edge, in declaration order
#[derive(Debug, Clone)]
pub struct EdgeResources {
    pub edge: PeeringEdge,
    pub source_ctx: Handle,
    pub peer_ctx: Handle,
    pub source_vpc: Handle,
    pub peer_vpc: Handle,
    pub source_main_rt: Handle,
    pub peer_main_rt: Handle,
    pub link: Handle,
    /// Present only for cross-region links
    pub accepter: Option<Handle>,
    pub options: Handle,
    pub source_main_route: Handle,
    pub peer_main_route: Handle,
    pub subnet_routes: Vec<Handle>,
}

/// Builds the per-edge resource graph against a [`ResourceEngine`].
///
/// The subnet tag filters are configurable but default to the two fixed
/// conventions above.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    source_subnet_tag: String,
    peer_subnet_tag: String,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self {
            source_subnet_tag: SOURCE_SUBNET_TAG.to_string(),
            peer_subnet_tag: PEER_SUBNET_TAG.to_string(),
        }
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build all edges, strictly in order, collecting one
    /// [`EdgeResources`] per edge. Any engine error aborts the whole pass;
    /// there is no partial-success mode.
    pub fn build<E: ResourceEngine>(
        &self,
        engine: &mut E,
        edges: &[PeeringEdge],
    ) -> Result<Vec<EdgeResources>, EngineError> {
        let mut built = Vec::with_capacity(edges.len());
        for edge in edges {
            built.push(self.build_edge(engine, edge)?);
        }
        Ok(built)
    }

    /// Build the full resource set for a single edge
    pub fn build_edge<E: ResourceEngine>(
        &self,
        engine: &mut E,
        edge: &PeeringEdge,
    ) -> Result<EdgeResources, EngineError> {
        let i = edge.index;
        let key = edge.key();
        debug!(edge = %key, mode = %edge.mode, "building edge");

        // Credential contexts, one per side, index-aliased so the same zone
        // can appear in multiple edges without collisions.
        let source_ctx = engine.declare(ResourceSpec {
            key: NodeKey::new(&key, "source-provider"),
            label: format!("SourceAWS{i}"),
            kind: ResourceKind::ProviderContext,
            context: None,
            params: obj(json!({
                "region": edge.source.region,
                "alias": format!("source{i}"),
                "assume_role": { "role_arn": edge.source.role_arn },
            })),
            depends_on: vec![],
        })?;
        let peer_ctx = engine.declare(ResourceSpec {
            key: NodeKey::new(&key, "peer-provider"),
            label: format!("PeerAWS{i}"),
            kind: ResourceKind::ProviderContext,
            context: None,
            params: obj(json!({
                "region": edge.peer.region,
                "alias": format!("peer{i}"),
                "assume_role": { "role_arn": edge.peer.role_arn },
            })),
            depends_on: vec![],
        })?;

        // Network lookups, each under its own context, for the cidr blocks
        let source_vpc_key = NodeKey::new(&key, "source-vpc");
        let source_vpc = engine.lookup(LookupSpec {
            key: source_vpc_key.clone(),
            label: format!("SourceVpcData{i}"),
            kind: ResourceKind::VpcLookup,
            context: Some(source_ctx.clone()),
            filters: vec![LookupFilter::new("id", &edge.source.vpc_id)],
            expect: Cardinality::ExactlyOne,
        })?;
        let source_vpc = expect_one(&source_vpc_key, source_vpc)?;

        let peer_vpc_key = NodeKey::new(&key, "peer-vpc");
        let peer_vpc = engine.lookup(LookupSpec {
            key: peer_vpc_key.clone(),
            label: format!("PeerVpcData{i}"),
            kind: ResourceKind::VpcLookup,
            context: Some(peer_ctx.clone()),
            filters: vec![LookupFilter::new("id", &edge.peer.vpc_id)],
            expect: Cardinality::ExactlyOne,
        })?;
        let peer_vpc = expect_one(&peer_vpc_key, peer_vpc)?;

        // Main route tables; exactly one default table must exist per
        // network, and anything else is the engine's inconsistency to report
        let source_rt_key = NodeKey::new(&key, "source-main-rt");
        let source_main_rt = engine.lookup(LookupSpec {
            key: source_rt_key.clone(),
            label: format!("SourceMainRouteTable{i}"),
            kind: ResourceKind::RouteTableLookup,
            context: Some(source_ctx.clone()),
            filters: vec![
                LookupFilter::new("vpc-id", &edge.source.vpc_id),
                LookupFilter::new("association.main", "true"),
            ],
            expect: Cardinality::ExactlyOne,
        })?;
        let source_main_rt = expect_one(&source_rt_key, source_main_rt)?;

        let peer_rt_key = NodeKey::new(&key, "peer-main-rt");
        let peer_main_rt = engine.lookup(LookupSpec {
            key: peer_rt_key.clone(),
            label: format!("PeerMainRouteTable{i}"),
            kind: ResourceKind::RouteTableLookup,
            context: Some(peer_ctx.clone()),
            filters: vec![
                LookupFilter::new("vpc-id", &edge.peer.vpc_id),
                LookupFilter::new("association.main", "true"),
            ],
            expect: Cardinality::ExactlyOne,
        })?;
        let peer_main_rt = expect_one(&peer_rt_key, peer_main_rt)?;

        // The peering link, always under the requester's context. The peer
        // account id is supplied explicitly: cross-account links need it set
        // independently of which account created which side. A malformed
        // peer ARN degrades to an unknown (empty) owner id.
        let auto_accept = edge.mode.auto_accept();
        let mut link_params = obj(json!({
            "vpc_id": edge.source.vpc_id,
            "peer_vpc_id": edge.peer.vpc_id,
            "peer_owner_id": account_id_from_role_arn(&edge.peer.role_arn).unwrap_or(""),
            "auto_accept": auto_accept,
            "tags": {
                "Name": format!("Connection to {}", edge.name),
                "ManagedBy": "peerplan",
                "SourceVpcId": edge.source.vpc_id,
                "PeerVpcId": edge.peer.vpc_id,
            },
        }));
        if !auto_accept {
            link_params.insert("peer_region".to_string(), json!(edge.peer.region));
        }
        let link = engine.declare(ResourceSpec {
            key: NodeKey::new(&key, "link"),
            label: format!("VpcPeering{i}"),
            kind: ResourceKind::PeeringConnection,
            context: Some(source_ctx.clone()),
            params: link_params,
            depends_on: vec![],
        })?;

        // Cross-region links need the target-region owner to confirm
        // acceptance out-of-band from the requester
        let accepter = if auto_accept {
            None
        } else {
            Some(engine.declare(ResourceSpec {
                key: NodeKey::new(&key, "accepter"),
                label: format!("VpcPeeringAccepter{i}"),
                kind: ResourceKind::PeeringAccepter,
                context: Some(peer_ctx.clone()),
                params: obj(json!({
                    "vpc_peering_connection_id": link.id(),
                    "auto_accept": true,
                    "tags": {
                        "Name": format!("Connection to {}", edge.name),
                        "ManagedBy": "peerplan",
                        "SourceVpcId": edge.source.vpc_id,
                        "PeerVpcId": edge.peer.vpc_id,
                    },
                })),
                depends_on: vec![link.clone()],
            })?)
        };

        // Downstream resources must wait for an active link: the link plus,
        // when present, its accepter
        let mut link_deps = vec![link.clone()];
        if let Some(accepter) = &accepter {
            link_deps.push(accepter.clone());
        }

        // Options are written after acceptance, or the write can race the
        // link's confirmed state on explicit-accept links
        let options = engine.declare(ResourceSpec {
            key: NodeKey::new(&key, "options"),
            label: format!("VpcPeeringOptions{i}"),
            kind: ResourceKind::PeeringOptions,
            context: Some(source_ctx.clone()),
            params: obj(json!({
                "vpc_peering_connection_id": link.id(),
                "requester": {
                    "allow_remote_vpc_dns_resolution": edge.peer.dns_resolution,
                },
            })),
            depends_on: link_deps.clone(),
        })?;

        // Main routes, both directions, each under its own context. A
        // one-sided route leaves the link unusable from one direction.
        let source_main_route = engine.declare(route_spec(
            NodeKey::new(&key, "source-main-route"),
            format!("SourceToPeerMainRoute{i}"),
            source_ctx.clone(),
            source_main_rt.id(),
            peer_vpc.attr("cidr_block"),
            &link,
            link_deps.clone(),
        ))?;
        let peer_main_route = engine.declare(route_spec(
            NodeKey::new(&key, "peer-main-route"),
            format!("PeerToSourceMainRoute{i}"),
            peer_ctx.clone(),
            peer_main_rt.id(),
            source_vpc.attr("cidr_block"),
            &link,
            link_deps.clone(),
        ))?;

        // Subnets discovered by tag on each side, then each subnet's own
        // route table, then one route per table. Zero discovered subnets is
        // a no-op.
        let mut subnet_routes = Vec::new();
        if edge.peer.has_additional_routes {
            let source_subnets = engine.lookup(LookupSpec {
                key: NodeKey::new(&key, "source-subnets"),
                label: format!("SourceSubnets{i}"),
                kind: ResourceKind::SubnetLookup,
                context: Some(source_ctx.clone()),
                filters: vec![
                    LookupFilter::new("vpc-id", &edge.source.vpc_id),
                    LookupFilter::new(&self.source_subnet_tag, ""),
                ],
                expect: Cardinality::Any,
            })?;
            for (j, subnet) in source_subnets.iter().enumerate() {
                let rt_key = NodeKey::new(&key, format!("source-subnet-rt-{j}"));
                let table = engine.lookup(LookupSpec {
                    key: rt_key.clone(),
                    label: format!("SourceSubnetRouteTable{i}_{j}"),
                    kind: ResourceKind::RouteTableLookup,
                    context: Some(source_ctx.clone()),
                    filters: vec![LookupFilter::new("association.subnet-id", subnet.id())],
                    expect: Cardinality::ExactlyOne,
                })?;
                let table = expect_one(&rt_key, table)?;
                subnet_routes.push(engine.declare(route_spec(
                    NodeKey::new(&key, format!("source-subnet-route-{j}")),
                    format!("SourceSubnetToPeerRoute{i}_{j}"),
                    source_ctx.clone(),
                    table.id(),
                    peer_vpc.attr("cidr_block"),
                    &link,
                    link_deps.clone(),
                ))?);
            }

            let peer_subnets = engine.lookup(LookupSpec {
                key: NodeKey::new(&key, "peer-subnets"),
                label: format!("PeerSubnets{i}"),
                kind: ResourceKind::SubnetLookup,
                context: Some(peer_ctx.clone()),
                filters: vec![
                    LookupFilter::new("vpc-id", &edge.peer.vpc_id),
                    LookupFilter::new(&self.peer_subnet_tag, ""),
                ],
                expect: Cardinality::Any,
            })?;
            for (j, subnet) in peer_subnets.iter().enumerate() {
                let rt_key = NodeKey::new(&key, format!("peer-subnet-rt-{j}"));
                let table = engine.lookup(LookupSpec {
                    key: rt_key.clone(),
                    label: format!("PeerSubnetRouteTable{i}_{j}"),
                    kind: ResourceKind::RouteTableLookup,
                    context: Some(peer_ctx.clone()),
                    filters: vec![LookupFilter::new("association.subnet-id", subnet.id())],
                    expect: Cardinality::ExactlyOne,
                })?;
                let table = expect_one(&rt_key, table)?;
                subnet_routes.push(engine.declare(route_spec(
                    NodeKey::new(&key, format!("peer-subnet-route-{j}")),
                    format!("PeerSubnetToSourceRoute{i}_{j}"),
                    peer_ctx.clone(),
                    table.id(),
                    source_vpc.attr("cidr_block"),
                    &link,
                    link_deps.clone(),
                ))?);
            }
        }

        Ok(EdgeResources {
            edge: edge.clone(),
            source_ctx,
            peer_ctx,
            source_vpc,
            peer_vpc,
            source_main_rt,
            peer_main_rt,
            link,
            accepter,
            options,
            source_main_route,
            peer_main_route,
            subnet_routes,
        })
    }
}

/// Route declarations differ only in table, destination, and context
fn route_spec(
    key: NodeKey,
    label: String,
    context: Handle,
    route_table_id: String,
    destination_cidr: String,
    link: &Handle,
    depends_on: Vec<Handle>,
) -> ResourceSpec {
    ResourceSpec {
        key,
        label,
        kind: ResourceKind::Route,
        context: Some(context),
        params: obj(json!({
            "route_table_id": route_table_id,
            "destination_cidr_block": destination_cidr,
            "vpc_peering_connection_id": link.id(),
        })),
        depends_on,
    }
}

/// Unwrap a single-result lookup, surfacing anything else as an
/// inconsistency
fn expect_one(key: &NodeKey, mut handles: Vec<Handle>) -> Result<Handle, EngineError> {
    if handles.len() != 1 {
        return Err(EngineError::LookupInconsistency {
            key: key.clone(),
            got: handles.len(),
        });
    }
    Ok(handles.remove(0))
}

fn obj(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => unreachable!("params literals are always objects"),
    }
}
