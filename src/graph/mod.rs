//! Component B: the immutable typed application graph (spec §4.B).
//!
//! Nodes and edge metadata live in plain `BTreeMap`s/`Vec`s so iteration is
//! lexicographic by construction (spec §3 invariant 4). `supertypesOf` and
//! `implementersOf` walk `outgoing`/`incoming` directly and cache the
//! resulting closures; `petgraph` is used elsewhere in this crate (the audit
//! engine's `ddd:aggregate-cycles` rule builds its own `DiGraph` over
//! classified aggregate roots to run `tarjan_scc`), but this struct itself
//! keeps no petgraph mirror of its own.

pub mod builder;
pub mod edge;
pub mod node;
pub mod query;

pub use builder::GraphBuilder;
pub use edge::{Edge, EdgeKind, EdgeOrigin};
pub use node::{MemberKind, MemberNode, NodeId, NodeKindTag, TypeNode};
pub use query::{GraphQuery, PortInfo};

use crate::style::{PackageOrganizationStyle, StyleConfidence};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Metadata attached to the graph at build time (spec §3 invariant 5).
#[derive(Debug, Clone)]
pub struct GraphMetadata {
    pub base_package: String,
    pub language_version: u32,
    pub build_timestamp: chrono::DateTime<chrono::Utc>,
    pub source_count: usize,
    pub style: PackageOrganizationStyle,
    pub style_confidence: StyleConfidence,
    pub pattern_matches: BTreeMap<String, u32>,
}

/// The sealed, read-only application graph.
pub struct ApplicationGraph {
    pub(crate) types: BTreeMap<String, TypeNode>,
    pub(crate) members: BTreeMap<NodeId, MemberNode>,
    /// Members owned by a type, in declaration order (for `methodsOf` etc,
    /// which preserve source order rather than NodeId order).
    pub(crate) members_of: BTreeMap<String, Vec<NodeId>>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) outgoing_idx: BTreeMap<NodeId, Vec<usize>>,
    pub(crate) incoming_idx: BTreeMap<NodeId, Vec<usize>>,
    pub(crate) metadata: GraphMetadata,
    supertypes_cache: RwLock<BTreeMap<String, Vec<String>>>,
    implementers_cache: RwLock<BTreeMap<String, Vec<String>>>,
}

impl ApplicationGraph {
    pub fn types(&self) -> impl Iterator<Item = &TypeNode> {
        self.types.values()
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &TypeNode> {
        self.types.values().filter(|t| t.form == crate::model::TypeForm::Interface)
    }

    pub fn node(&self, qualified_name: &str) -> Option<&TypeNode> {
        self.types.get(qualified_name)
    }

    pub fn member(&self, id: &NodeId) -> Option<&MemberNode> {
        self.members.get(id)
    }

    fn members_of_kind(&self, qualified_name: &str, kind: MemberKind) -> Vec<&MemberNode> {
        self.members_of
            .get(qualified_name)
            .into_iter()
            .flatten()
            .filter_map(|id| self.members.get(id))
            .filter(|m| m.kind == kind)
            .collect()
    }

    pub fn fields_of(&self, qualified_name: &str) -> Vec<&MemberNode> {
        self.members_of_kind(qualified_name, MemberKind::Field)
    }

    pub fn methods_of(&self, qualified_name: &str) -> Vec<&MemberNode> {
        self.members_of_kind(qualified_name, MemberKind::Method)
    }

    pub fn constructors_of(&self, qualified_name: &str) -> Vec<&MemberNode> {
        self.members_of_kind(qualified_name, MemberKind::Constructor)
    }

    /// Ordered outgoing edges, optionally filtered by kind. Ordered by
    /// `(edge kind name, to)` per spec §3 invariant 4.
    pub fn outgoing(&self, node: &NodeId, kind: Option<EdgeKind>) -> Vec<&Edge> {
        let mut out: Vec<&Edge> = self
            .outgoing_idx
            .get(node)
            .into_iter()
            .flatten()
            .map(|&i| &self.edges[i])
            .filter(|e| kind.map(|k| k == e.kind).unwrap_or(true))
            .collect();
        out.sort_by(|a, b| (a.kind.name(), &a.to).cmp(&(b.kind.name(), &b.to)));
        out
    }

    pub fn incoming(&self, node: &NodeId, kind: Option<EdgeKind>) -> Vec<&Edge> {
        let mut out: Vec<&Edge> = self
            .incoming_idx
            .get(node)
            .into_iter()
            .flatten()
            .map(|&i| &self.edges[i])
            .filter(|e| kind.map(|k| k == e.kind).unwrap_or(true))
            .collect();
        out.sort_by(|a, b| (a.kind.name(), &a.from).cmp(&(b.kind.name(), &b.from)));
        out
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_count(&self) -> usize {
        self.types.len() + self.members.len()
    }

    pub fn metadata(&self) -> &GraphMetadata {
        &self.metadata
    }

    /// Transitive closure of `EXTENDS`/`IMPLEMENTS` edges starting at `type`,
    /// i.e. every ancestor class and interface. Cached under a
    /// double-checked read/write lock: readers never observe a partial
    /// cache, and the computed closure is sorted so repeated calls are
    /// byte-identical regardless of access interleaving (spec §5).
    pub fn supertypes_of(&self, qualified_name: &str) -> Vec<String> {
        if let Some(cached) = self.supertypes_cache.read().unwrap().get(qualified_name) {
            return cached.clone();
        }
        let mut out = Vec::new();
        let mut seen = std::collections::BTreeSet::new();
        let mut frontier = vec![qualified_name.to_string()];
        while let Some(current) = frontier.pop() {
            let id = NodeId::for_type(&current);
            for edge in self.outgoing(&id, None) {
                if matches!(edge.kind, EdgeKind::Extends | EdgeKind::Implements) {
                    let parent = edge.to.qualified.clone();
                    if seen.insert(parent.clone()) {
                        out.push(parent.clone());
                        frontier.push(parent);
                    }
                }
            }
        }
        out.sort();
        let mut cache = self.supertypes_cache.write().unwrap();
        cache.entry(qualified_name.to_string()).or_insert_with(|| out.clone());
        out
    }

    /// Transitive closure of every type that implements `interface_qualified_name`
    /// directly or via a sub-interface (through `EXTENDS` between interfaces).
    pub fn implementers_of(&self, interface_qualified_name: &str) -> Vec<String> {
        if let Some(cached) = self.implementers_cache.read().unwrap().get(interface_qualified_name) {
            return cached.clone();
        }
        let mut out = std::collections::BTreeSet::new();
        // direct and transitive sub-interfaces of the target
        let mut interface_frontier = vec![interface_qualified_name.to_string()];
        let mut interfaces_of_interest = std::collections::BTreeSet::new();
        interfaces_of_interest.insert(interface_qualified_name.to_string());
        while let Some(current) = interface_frontier.pop() {
            let id = NodeId::for_type(&current);
            for edge in self.incoming(&id, Some(EdgeKind::Extends)) {
                let child = edge.from.qualified.clone();
                if interfaces_of_interest.insert(child.clone()) {
                    interface_frontier.push(child);
                }
            }
        }
        for iface in &interfaces_of_interest {
            let id = NodeId::for_type(iface);
            for edge in self.incoming(&id, Some(EdgeKind::Implements)) {
                out.insert(edge.from.qualified.clone());
            }
        }
        let out: Vec<String> = out.into_iter().collect();
        let mut cache = self.implementers_cache.write().unwrap();
        cache
            .entry(interface_qualified_name.to_string())
            .or_insert_with(|| out.clone());
        out
    }
}
