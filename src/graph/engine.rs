//! Declaration interface - the sole boundary to the external engine
//!
//! The builder never performs I/O itself; it declares resources and requests
//! lookups through [`ResourceEngine`] and propagates whatever the engine
//! fails with. [`PlanRecorder`] is the in-crate implementation: it records
//! every call in order and answers with symbolic handles whose attribute
//! resolution is deferred to the execution phase.

use std::collections::{HashMap, HashSet};

use miette::Diagnostic;
use serde_json::{json, Map};
use thiserror::Error;

use crate::graph::node::{
    Cardinality, Handle, LookupSpec, NodeKey, ResourceNode, ResourceSpec,
};

/// Errors raised at the engine boundary - all fatal, never retried
#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("resource key {key} declared twice")]
    #[diagnostic(code(peerplan::engine::duplicate_node))]
    DuplicateNode { key: NodeKey },

    #[error("lookup {key} expected exactly one match, got {got}")]
    #[diagnostic(code(peerplan::engine::lookup_inconsistency))]
    LookupInconsistency { key: NodeKey, got: usize },
}

/// The external declaration/lookup interface.
///
/// Implementations are not assumed reentrant; the builder calls them from a
/// single strictly-ordered pass.
pub trait ResourceEngine {
    /// Declare a resource, returning a handle to reference it by
    fn declare(&mut self, spec: ResourceSpec) -> Result<Handle, EngineError>;

    /// Perform a read-only lookup, returning zero or more matching handles.
    /// Cardinality violations for [`Cardinality::ExactlyOne`] are the
    /// engine's to report.
    fn lookup(&mut self, spec: LookupSpec) -> Result<Vec<Handle>, EngineError>;
}

/// Records declarations and lookups, in call order, into a plan.
///
/// Single lookups answer with one symbolic handle (resolution deferred, the
/// way data-source attributes resolve at apply time). `Any` lookups answer
/// with seeded fixture handles, or none when unseeded - a dry-run plan
/// records the discovery step itself but cannot know how many subnets exist.
#[derive(Debug, Default)]
pub struct PlanRecorder {
    nodes: Vec<ResourceNode>,
    keys: HashSet<NodeKey>,
    seeds: HashMap<NodeKey, usize>,
}

impl PlanRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an `Any` lookup with a fixed number of results (test fixture)
    pub fn seed_lookup(&mut self, key: NodeKey, count: usize) {
        self.seeds.insert(key, count);
    }

    /// Nodes recorded so far, in declaration order
    pub fn nodes(&self) -> &[ResourceNode] {
        &self.nodes
    }

    /// Consume the recorder, yielding the ordered plan
    pub fn into_nodes(self) -> Vec<ResourceNode> {
        self.nodes
    }

    fn reserve(&mut self, key: &NodeKey) -> Result<(), EngineError> {
        if !self.keys.insert(key.clone()) {
            return Err(EngineError::DuplicateNode { key: key.clone() });
        }
        Ok(())
    }
}

impl ResourceEngine for PlanRecorder {
    fn declare(&mut self, spec: ResourceSpec) -> Result<Handle, EngineError> {
        self.reserve(&spec.key)?;

        let handle = Handle {
            key: spec.key.clone(),
            label: spec.label.clone(),
            kind: spec.kind,
        };
        self.nodes.push(ResourceNode {
            key: spec.key,
            label: spec.label,
            kind: spec.kind,
            lookup: spec.kind.is_lookup(),
            context: spec.context.map(|c| c.label),
            params: spec.params,
            depends_on: spec.depends_on.iter().map(|h| h.label.clone()).collect(),
        });
        Ok(handle)
    }

    fn lookup(&mut self, spec: LookupSpec) -> Result<Vec<Handle>, EngineError> {
        self.reserve(&spec.key)?;

        let mut params = Map::new();
        params.insert("filters".to_string(), json!(spec.filters));
        params.insert("expect".to_string(), json!(spec.expect));

        self.nodes.push(ResourceNode {
            key: spec.key.clone(),
            label: spec.label.clone(),
            kind: spec.kind,
            lookup: spec.kind.is_lookup(),
            context: spec.context.map(|c| c.label),
            params,
            depends_on: Vec::new(),
        });

        let handles = match spec.expect {
            Cardinality::ExactlyOne => vec![Handle {
                key: spec.key,
                label: spec.label,
                kind: spec.kind,
            }],
            Cardinality::Any => {
                let count = self.seeds.get(&spec.key).copied().unwrap_or(0);
                (0..count)
                    .map(|j| Handle {
                        key: NodeKey::new(spec.key.edge.clone(), format!("{}[{j}]", spec.key.role)),
                        label: format!("{}[{j}]", spec.label),
                        kind: spec.kind,
                    })
                    .collect()
            }
        };
        Ok(handles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::{LookupFilter, ResourceKind};

    fn spec(edge: &str, role: &str, label: &str) -> ResourceSpec {
        ResourceSpec {
            key: NodeKey::new(edge, role),
            label: label.to_string(),
            kind: ResourceKind::PeeringConnection,
            context: None,
            params: Map::new(),
            depends_on: Vec::new(),
        }
    }

    #[test]
    fn test_declare_records_in_order() {
        let mut recorder = PlanRecorder::new();
        recorder.declare(spec("a/b", "link", "VpcPeering0")).unwrap();
        recorder.declare(spec("a/c", "link", "VpcPeering1")).unwrap();
        let labels: Vec<&str> = recorder.nodes().iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, ["VpcPeering0", "VpcPeering1"]);
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let mut recorder = PlanRecorder::new();
        recorder.declare(spec("a/b", "link", "VpcPeering0")).unwrap();
        let err = recorder.declare(spec("a/b", "link", "VpcPeering9")).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateNode { .. }));
    }

    #[test]
    fn test_unseeded_any_lookup_is_empty() {
        let mut recorder = PlanRecorder::new();
        let handles = recorder
            .lookup(LookupSpec {
                key: NodeKey::new("a/b", "source-subnets"),
                label: "SourceSubnets0".to_string(),
                kind: ResourceKind::SubnetLookup,
                context: None,
                filters: vec![LookupFilter::new("vpc-id", "vpc-1")],
                expect: Cardinality::Any,
            })
            .unwrap();
        assert!(handles.is_empty());
        // The discovery step itself is still part of the plan
        assert_eq!(recorder.nodes().len(), 1);
        assert!(recorder.nodes()[0].lookup);
    }

    #[test]
    fn test_seeded_any_lookup_fans_out() {
        let mut recorder = PlanRecorder::new();
        recorder.seed_lookup(NodeKey::new("a/b", "source-subnets"), 2);
        let handles = recorder
            .lookup(LookupSpec {
                key: NodeKey::new("a/b", "source-subnets"),
                label: "SourceSubnets0".to_string(),
                kind: ResourceKind::SubnetLookup,
                context: None,
                filters: vec![],
                expect: Cardinality::Any,
            })
            .unwrap();
        assert_eq!(handles.len(), 2);
        assert_eq!(handles[0].label, "SourceSubnets0[0]");
        assert_eq!(handles[1].key.role, "source-subnets[1]");
    }
}
