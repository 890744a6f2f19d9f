//! Resource graph construction
//!
//! The graph is built in a single synchronous pass, one edge at a time, in
//! edge order. Resource identity is a stable composite key (edge name +
//! role); positional index-suffixed labels are presentation only.

pub mod builder;
pub mod edge;
pub mod engine;
pub mod node;
pub mod outputs;

pub use builder::{EdgeResources, GraphBuilder, PEER_SUBNET_TAG, SOURCE_SUBNET_TAG};
pub use edge::{expand, LinkMode, PeeringEdge};
pub use engine::{EngineError, PlanRecorder, ResourceEngine};
pub use node::{
    Cardinality, Handle, LookupFilter, LookupSpec, NodeKey, ResourceKind, ResourceNode,
    ResourceSpec,
};
pub use outputs::EdgeOutputs;
