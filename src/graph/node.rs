//! Node identity and node payloads (spec §3: identifiers, type nodes, members).

use crate::error::SourceLocation;
use crate::model::{AnnotationRef, Modifier, Parameter, TypeForm, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKindTag {
    Type,
    Field,
    Method,
    Constructor,
}

impl NodeKindTag {
    /// Stable string form; node ordering is lexicographic on `(tag, qualified)`
    /// and this is the string the comparison actually runs against.
    pub fn tag_str(&self) -> &'static str {
        match self {
            NodeKindTag::Type => "TYPE",
            NodeKindTag::Field => "FIELD",
            NodeKindTag::Method => "METHOD",
            NodeKindTag::Constructor => "CONSTRUCTOR",
        }
    }
}

/// `NodeId = (kind-tag, qualified-string)` — stable and globally unique
/// within a run (spec §3). Ordering is lexicographic on the tag string then
/// the qualified string, independent of enum declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub kind: NodeKindTag,
    pub qualified: String,
}

impl NodeId {
    pub fn new(kind: NodeKindTag, qualified: impl Into<String>) -> Self {
        Self {
            kind,
            qualified: qualified.into(),
        }
    }

    pub fn for_type(qualified_name: &str) -> Self {
        Self::new(NodeKindTag::Type, qualified_name)
    }

    /// Members are qualified as `OwnerType#member` so distinct owners never
    /// collide and identical member names stay globally unique.
    pub fn for_member(kind: NodeKindTag, owner_qualified_name: &str, member_name: &str, disambiguator: usize) -> Self {
        Self::new(
            kind,
            format!("{owner_qualified_name}#{member_name}@{disambiguator}"),
        )
    }
}

impl PartialOrd for NodeId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.kind.tag_str(), &self.qualified).cmp(&(other.kind.tag_str(), &other.qualified))
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind.tag_str(), self.qualified)
    }
}

/// A materialized type node. Immutable after the graph is built.
#[derive(Debug, Clone)]
pub struct TypeNode {
    pub id: NodeId,
    pub qualified_name: String,
    pub simple_name: String,
    pub package: String,
    pub form: TypeForm,
    pub modifiers: Vec<Modifier>,
    pub supertype: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub annotations: Vec<AnnotationRef>,
    pub location: Option<SourceLocation>,
    pub documentation: Option<String>,
}

impl TypeNode {
    pub fn has_annotation(&self, qualified_name: &str) -> bool {
        self.annotations.iter().any(|a| a.qualified_name == qualified_name)
    }

    pub fn is_final(&self) -> bool {
        self.modifiers.contains(&Modifier::Final)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Method,
    Constructor,
}

/// A materialized member node (field, method, or constructor).
#[derive(Debug, Clone)]
pub struct MemberNode {
    pub id: NodeId,
    pub owner: NodeId,
    pub kind: MemberKind,
    pub name: String,
    /// Field type for fields, return type for methods. `None` for constructors.
    pub type_ref: Option<TypeRef>,
    pub parameters: Vec<Parameter>,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<AnnotationRef>,
    pub complexity: Option<u32>,
}

impl MemberNode {
    pub fn is_final(&self) -> bool {
        self.modifiers.contains(&Modifier::Final)
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(&Modifier::Static)
    }

    pub fn has_annotation(&self, qualified_name: &str) -> bool {
        self.annotations.iter().any(|a| a.qualified_name == qualified_name)
    }
}
