//! Resource node types - the vocabulary of the declaration interface

use serde::Serialize;
use serde_json::{Map, Value};

/// Kind of a declared resource or read-only lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Credential context: region + assumed role
    ProviderContext,
    /// Read-only lookup of a network's identity (cidr block)
    VpcLookup,
    /// Read-only lookup of a single route table
    RouteTableLookup,
    /// Read-only discovery of tagged subnets, [`Cardinality::Any`]
    SubnetLookup,
    /// The peering link itself
    PeeringConnection,
    /// Explicit acceptance step for cross-region links
    PeeringAccepter,
    /// Link options (remote DNS resolution)
    PeeringOptions,
    /// A routing entry through the link
    Route,
}

impl ResourceKind {
    /// Whether this kind is a read-only lookup rather than a declaration
    pub fn is_lookup(self) -> bool {
        matches!(
            self,
            ResourceKind::VpcLookup | ResourceKind::RouteTableLookup | ResourceKind::SubnetLookup
        )
    }

    /// Wire-format type name, used in symbolic attribute tokens
    pub fn type_name(self) -> &'static str {
        match self {
            ResourceKind::ProviderContext => "provider.aws",
            ResourceKind::VpcLookup => "data.aws_vpc",
            ResourceKind::RouteTableLookup => "data.aws_route_table",
            ResourceKind::SubnetLookup => "data.aws_subnets",
            ResourceKind::PeeringConnection => "aws_vpc_peering_connection",
            ResourceKind::PeeringAccepter => "aws_vpc_peering_connection_accepter",
            ResourceKind::PeeringOptions => "aws_vpc_peering_connection_options",
            ResourceKind::Route => "aws_route",
        }
    }
}

/// Stable composite identity of a node: edge key plus role within the edge.
///
/// Renaming or reordering configuration entries changes labels (positional)
/// but never silently reuses a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NodeKey {
    /// Edge identity, `source/target`
    pub edge: String,
    /// Role within the edge, e.g. `link`, `source-main-rt`
    pub role: String,
}

impl NodeKey {
    pub fn new(edge: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            edge: edge.into(),
            role: role.into(),
        }
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.edge, self.role)
    }
}

/// Handle returned by the engine for a declared or looked-up node.
///
/// `attr` tokens are symbolic: resolution is deferred to the external
/// engine's execution phase, the way data-source attributes resolve at
/// apply time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handle {
    pub key: NodeKey,
    pub label: String,
    pub kind: ResourceKind,
}

impl Handle {
    /// Symbolic reference to an attribute of this node
    pub fn attr(&self, name: &str) -> String {
        format!("${{{}.{}.{}}}", self.kind.type_name(), self.label, name)
    }

    /// Symbolic reference to this node's id
    pub fn id(&self) -> String {
        self.attr("id")
    }
}

/// A fully-specified resource declaration handed to the engine
#[derive(Debug, Clone)]
pub struct ResourceSpec {
    pub key: NodeKey,
    /// Presentation label, index-suffixed for uniqueness across edges
    pub label: String,
    pub kind: ResourceKind,
    /// Credential context this resource is evaluated under
    pub context: Option<Handle>,
    pub params: Map<String, Value>,
    pub depends_on: Vec<Handle>,
}

/// A name/values filter applied to a lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupFilter {
    pub name: String,
    pub values: Vec<String>,
}

impl LookupFilter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: vec![value.into()],
        }
    }
}

/// Expected result cardinality of a lookup.
///
/// `ExactlyOne` violations are external-state inconsistencies; the engine
/// reports them and the builder propagates without retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    ExactlyOne,
    Any,
}

/// A read-only lookup handed to the engine
#[derive(Debug, Clone)]
pub struct LookupSpec {
    pub key: NodeKey,
    pub label: String,
    pub kind: ResourceKind,
    pub context: Option<Handle>,
    pub filters: Vec<LookupFilter>,
    pub expect: Cardinality,
}

/// A node as recorded in the plan: declaration parameters plus the
/// dependency edges that order it.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceNode {
    pub key: NodeKey,
    pub label: String,
    pub kind: ResourceKind,
    pub lookup: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_attr_token() {
        let handle = Handle {
            key: NodeKey::new("a/b", "link"),
            label: "VpcPeering0".to_string(),
            kind: ResourceKind::PeeringConnection,
        };
        assert_eq!(
            handle.id(),
            "${aws_vpc_peering_connection.VpcPeering0.id}"
        );
        assert_eq!(
            handle.attr("accept_status"),
            "${aws_vpc_peering_connection.VpcPeering0.accept_status}"
        );
    }

    #[test]
    fn test_node_key_display() {
        assert_eq!(NodeKey::new("a/b", "link").to_string(), "a/b:link");
    }

    #[test]
    fn test_lookup_kinds() {
        assert!(ResourceKind::VpcLookup.is_lookup());
        assert!(ResourceKind::RouteTableLookup.is_lookup());
        assert!(ResourceKind::SubnetLookup.is_lookup());
        assert!(!ResourceKind::PeeringConnection.is_lookup());
    }
}
