//! Component C: two-pass graph population plus derived-edge computation
//! (spec §4.C).

use super::edge::{Edge, EdgeKind, EdgeOrigin};
use super::node::{MemberKind, MemberNode, NodeId, NodeKindTag, TypeNode};
use super::{ApplicationGraph, GraphMetadata};
use crate::config::Config;
use crate::error::{AnalysisError, Diagnostic, DiagnosticLevel};
use crate::model::{AnnotationRef, JavaType, Method, Modifier, Parameter, SemanticModelProvider, TypeRef};
use crate::style::StyleDetector;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

const STAGE: &str = "graph_builder";

pub struct GraphBuilder<'a> {
    config: &'a Config,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn build(
        &self,
        provider: &dyn SemanticModelProvider,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<ApplicationGraph, AnalysisError> {
        let raw_types = provider.types()?;

        // Pass 1 — materialize type nodes, defensively re-applying the scope
        // filter the provider contract already requires.
        let mut types: BTreeMap<String, TypeNode> = BTreeMap::new();
        for jt in &raw_types {
            if !self.in_scope(&jt.package) {
                continue;
            }
            if !self.config.include_generated
                && jt
                    .annotations
                    .iter()
                    .any(|a| crate::model::GENERATOR_MARKERS.contains(&a.qualified_name.as_str()))
            {
                continue;
            }
            types.insert(
                jt.qualified_name.clone(),
                TypeNode {
                    id: NodeId::for_type(&jt.qualified_name),
                    qualified_name: jt.qualified_name.clone(),
                    simple_name: jt.simple_name.clone(),
                    package: jt.package.clone(),
                    form: jt.form,
                    modifiers: jt.modifiers.clone(),
                    supertype: jt.supertype.clone(),
                    interfaces: jt.interfaces.clone(),
                    annotations: jt.annotations.clone(),
                    location: jt.location.clone(),
                    documentation: jt.documentation.clone(),
                },
            );
        }

        // Pass 1.5 — style detection over the populated type set.
        let type_values: Vec<&TypeNode> = types.values().collect();
        let style_result = StyleDetector::detect(&type_values, &self.config.base_package);

        // Pass 2 — members and raw edges.
        let mut members: BTreeMap<NodeId, MemberNode> = BTreeMap::new();
        let mut members_of: BTreeMap<String, Vec<NodeId>> = BTreeMap::new();
        let mut edges: Vec<Edge> = Vec::new();

        for jt in &raw_types {
            if !types.contains_key(&jt.qualified_name) {
                continue;
            }
            self.emit_type_edges(jt, &types, &mut edges, diagnostics)?;
            self.emit_members(jt, &types, &mut members, &mut members_of, &mut edges, diagnostics)?;
        }

        // Pass 3 — derived edges (optional).
        if self.config.compute_derived_edges {
            self.compute_derived_edges(&types, &members, &members_of, &mut edges);
        }

        dedup_edges(&mut edges);
        edges.sort_by(|a, b| {
            (a.kind.name(), &a.from, &a.to).cmp(&(b.kind.name(), &b.from, &b.to))
        });

        let (outgoing_idx, incoming_idx) = build_adjacency(&edges);

        Ok(ApplicationGraph {
            types,
            members,
            members_of,
            edges,
            outgoing_idx,
            incoming_idx,
            metadata: GraphMetadata {
                base_package: self.config.base_package.clone(),
                language_version: self.config.language_version,
                build_timestamp: chrono::Utc::now(),
                source_count: raw_types.len(),
                style: style_result.style,
                style_confidence: style_result.confidence,
                pattern_matches: style_result.pattern_matches,
            },
            supertypes_cache: RwLock::new(BTreeMap::new()),
            implementers_cache: RwLock::new(BTreeMap::new()),
        })
    }

    fn in_scope(&self, package: &str) -> bool {
        package == self.config.base_package
            || package.starts_with(&format!("{}.", self.config.base_package))
    }

    fn emit_type_edges(
        &self,
        jt: &JavaType,
        types: &BTreeMap<String, TypeNode>,
        edges: &mut Vec<Edge>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<(), AnalysisError> {
        let from = NodeId::for_type(&jt.qualified_name);

        if let Some(supertype) = &jt.supertype {
            if types.contains_key(&supertype.qualified_name) {
                edges.push(Edge::new(
                    from.clone(),
                    NodeId::for_type(&supertype.qualified_name),
                    EdgeKind::Extends,
                    EdgeOrigin::Raw,
                ));
            } else {
                self.drop_reference(diagnostics, &jt.qualified_name, &supertype.qualified_name)?;
            }
        }

        for iface in &jt.interfaces {
            if types.contains_key(&iface.qualified_name) {
                edges.push(Edge::new(
                    from.clone(),
                    NodeId::for_type(&iface.qualified_name),
                    EdgeKind::Implements,
                    EdgeOrigin::Raw,
                ));
            } else {
                self.drop_reference(diagnostics, &jt.qualified_name, &iface.qualified_name)?;
            }
        }

        for ann in &jt.annotations {
            if types.contains_key(&ann.qualified_name) {
                edges.push(Edge::new(
                    from.clone(),
                    NodeId::for_type(&ann.qualified_name),
                    EdgeKind::AnnotatedBy,
                    EdgeOrigin::Raw,
                ));
            }
        }
        Ok(())
    }

    fn emit_members(
        &self,
        jt: &JavaType,
        types: &BTreeMap<String, TypeNode>,
        members: &mut BTreeMap<NodeId, MemberNode>,
        members_of: &mut BTreeMap<String, Vec<NodeId>>,
        edges: &mut Vec<Edge>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<(), AnalysisError> {
        let owner = NodeId::for_type(&jt.qualified_name);
        let mut order: Vec<NodeId> = Vec::new();
        let mut counter = 0usize;

        for field in &jt.fields {
            let id = NodeId::for_member(NodeKindTag::Field, &jt.qualified_name, &field.name, counter);
            counter += 1;
            edges.push(Edge::new(owner.clone(), id.clone(), EdgeKind::Declares, EdgeOrigin::Raw));
            self.emit_type_ref_edges(&id, &field.type_ref, EdgeKind::FieldType, types, edges, diagnostics, &jt.qualified_name)?;
            self.emit_annotation_edges(&id, &field.annotations, types, edges);
            members.insert(
                id.clone(),
                MemberNode {
                    id: id.clone(),
                    owner: owner.clone(),
                    kind: MemberKind::Field,
                    name: field.name.clone(),
                    type_ref: Some(field.type_ref.clone()),
                    parameters: Vec::new(),
                    modifiers: field.modifiers.clone(),
                    annotations: field.annotations.clone(),
                    complexity: None,
                },
            );
            order.push(id);
        }

        for method in &jt.methods {
            let id = NodeId::for_member(NodeKindTag::Method, &jt.qualified_name, &method.name, counter);
            counter += 1;
            edges.push(Edge::new(owner.clone(), id.clone(), EdgeKind::Declares, EdgeOrigin::Raw));
            if !method.return_type.is_void() {
                self.emit_type_ref_edges(&id, &method.return_type, EdgeKind::ReturnType, types, edges, diagnostics, &jt.qualified_name)?;
            }
            for param in &method.parameters {
                self.emit_type_ref_edges(&id, &param.type_ref, EdgeKind::ParameterType, types, edges, diagnostics, &jt.qualified_name)?;
            }
            self.emit_annotation_edges(&id, &method.annotations, types, edges);
            members.insert(
                id.clone(),
                MemberNode {
                    id: id.clone(),
                    owner: owner.clone(),
                    kind: MemberKind::Method,
                    name: method.name.clone(),
                    type_ref: Some(method.return_type.clone()),
                    parameters: method.parameters.clone(),
                    modifiers: method.modifiers.clone(),
                    annotations: method.annotations.clone(),
                    // The front-end is the only thing that ever sees a method
                    // body; we just thread its cached value through unchanged.
                    complexity: complexity_for(method),
                },
            );
            order.push(id);
        }

        for (i, ctor) in jt.constructors.iter().enumerate() {
            let id = NodeId::for_member(NodeKindTag::Constructor, &jt.qualified_name, "<init>", counter + i);
            edges.push(Edge::new(owner.clone(), id.clone(), EdgeKind::Declares, EdgeOrigin::Raw));
            for param in &ctor.parameters {
                self.emit_type_ref_edges(&id, &param.type_ref, EdgeKind::ParameterType, types, edges, diagnostics, &jt.qualified_name)?;
            }
            self.emit_annotation_edges(&id, &ctor.annotations, types, edges);
            members.insert(
                id.clone(),
                MemberNode {
                    id: id.clone(),
                    owner: owner.clone(),
                    kind: MemberKind::Constructor,
                    name: "<init>".to_string(),
                    type_ref: None,
                    parameters: ctor.parameters.clone(),
                    modifiers: ctor.modifiers.clone(),
                    annotations: ctor.annotations.clone(),
                    complexity: None,
                },
            );
            order.push(id);
        }

        members_of.insert(jt.qualified_name.clone(), order);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_type_ref_edges(
        &self,
        from: &NodeId,
        type_ref: &TypeRef,
        kind: EdgeKind,
        types: &BTreeMap<String, TypeNode>,
        edges: &mut Vec<Edge>,
        diagnostics: &mut Vec<Diagnostic>,
        owner_name: &str,
    ) -> Result<(), AnalysisError> {
        if types.contains_key(&type_ref.qualified_name) {
            edges.push(Edge::new(from.clone(), NodeId::for_type(&type_ref.qualified_name), kind, EdgeOrigin::Raw));
        } else if !type_ref.type_arguments.is_empty() || type_ref.is_array {
            // Wrapper itself may be out of scope (e.g. java.util.List) while
            // its arguments are in scope; that's expected, not a dropped ref.
        } else {
            self.drop_reference(diagnostics, owner_name, &type_ref.qualified_name)?;
        }
        // TYPE_ARGUMENT recursively follows nested generic arguments.
        for arg in &type_ref.type_arguments {
            if types.contains_key(&arg.qualified_name) {
                edges.push(Edge::new(from.clone(), NodeId::for_type(&arg.qualified_name), EdgeKind::TypeArgument, EdgeOrigin::Raw));
            }
            self.emit_type_ref_edges(from, arg, EdgeKind::TypeArgument, types, edges, diagnostics, owner_name)?;
        }
        Ok(())
    }

    fn emit_annotation_edges(
        &self,
        from: &NodeId,
        annotations: &[AnnotationRef],
        types: &BTreeMap<String, TypeNode>,
        edges: &mut Vec<Edge>,
    ) {
        for ann in annotations {
            if types.contains_key(&ann.qualified_name) {
                edges.push(Edge::new(from.clone(), NodeId::for_type(&ann.qualified_name), EdgeKind::AnnotatedBy, EdgeOrigin::Raw));
            }
        }
    }

    /// A reference to a type the provider never emitted. In tolerant mode
    /// (the default) this is treated as an ordinary out-of-scope reference
    /// and silently dropped; in strict mode it is an unresolved reference
    /// (spec §6 `tolerantResolution`, §7 `ReferenceError`) and aborts the
    /// build.
    fn drop_reference(&self, diagnostics: &mut Vec<Diagnostic>, from: &str, to: &str) -> Result<(), AnalysisError> {
        if !self.config.tolerant_resolution {
            return Err(AnalysisError::Reference(format!(
                "unresolved reference from {from} to {to}"
            )));
        }
        diagnostics.push(Diagnostic::new(
            DiagnosticLevel::Debug,
            STAGE,
            format!("dropped out-of-scope reference from {from} to {to}"),
        ));
        Ok(())
    }

    /// Derived-edge rules (spec §4.C pass 3). All four kinds are computed
    /// structurally from the raw graph, at type granularity:
    ///
    /// - `USES`: owner type references another in-scope type via any
    ///   FIELD_TYPE/RETURN_TYPE/PARAMETER_TYPE/TYPE_ARGUMENT edge.
    /// - `CONSUMES`: owner type has a method or constructor parameter typed
    ///   as another in-scope type.
    /// - `PRODUCES`: owner type has a non-void method returning another
    ///   in-scope type.
    /// - `DEPENDS_ON`: owner type has a field or constructor-parameter typed
    ///   as another in-scope **interface** — the structural signature of
    ///   field/constructor injection, upgraded from a plain `USES`.
    fn compute_derived_edges(
        &self,
        types: &BTreeMap<String, TypeNode>,
        members: &BTreeMap<NodeId, MemberNode>,
        members_of: &BTreeMap<String, Vec<NodeId>>,
        edges: &mut Vec<Edge>,
    ) {
        let mut derived: Vec<Edge> = Vec::new();
        for (owner_name, member_ids) in members_of {
            let owner = NodeId::for_type(owner_name);
            for member_id in member_ids {
                let Some(member) = members.get(member_id) else { continue };
                let referenced: Vec<(String, bool)> = match member.kind {
                    MemberKind::Field => member
                        .type_ref
                        .as_ref()
                        .map(|t| vec![(t.innermost_qualified_name().to_string(), true)])
                        .unwrap_or_default(),
                    MemberKind::Method => {
                        let mut v: Vec<(String, bool)> = member
                            .parameters
                            .iter()
                            .map(|p| (p.type_ref.innermost_qualified_name().to_string(), false))
                            .collect();
                        if let Some(rt) = &member.type_ref {
                            if !rt.is_void() {
                                v.push((rt.innermost_qualified_name().to_string(), false));
                            }
                        }
                        v
                    }
                    MemberKind::Constructor => member
                        .parameters
                        .iter()
                        .map(|p| (p.type_ref.innermost_qualified_name().to_string(), true))
                        .collect(),
                };

                for (target_name, is_injection_site) in referenced {
                    if target_name == *owner_name {
                        continue;
                    }
                    let Some(target) = types.get(&target_name) else { continue };
                    derived.push(Edge::new(owner.clone(), target.id.clone(), EdgeKind::Uses, EdgeOrigin::Derived));

                    match member.kind {
                        MemberKind::Method if member.parameters.iter().any(|p| p.type_ref.innermost_qualified_name() == target_name) => {
                            derived.push(Edge::new(owner.clone(), target.id.clone(), EdgeKind::Consumes, EdgeOrigin::Derived));
                        }
                        MemberKind::Method => {
                            derived.push(Edge::new(owner.clone(), target.id.clone(), EdgeKind::Produces, EdgeOrigin::Derived));
                        }
                        _ => {}
                    }

                    if is_injection_site && target.form == crate::model::TypeForm::Interface {
                        derived.push(Edge::new(owner.clone(), target.id.clone(), EdgeKind::DependsOn, EdgeOrigin::Derived));
                    }
                }
            }
        }
        edges.extend(derived);
    }
}

fn complexity_for(method: &Method) -> Option<u32> {
    if method.is_abstract() {
        None
    } else {
        method.complexity
    }
}

/// Dedup by `(from, to, kind)`, preferring `RAW` over `DERIVED` (invariant 2).
fn dedup_edges(edges: &mut Vec<Edge>) {
    let mut best: BTreeMap<(NodeId, NodeId, EdgeKind), EdgeOrigin> = BTreeMap::new();
    for e in edges.iter() {
        let key = e.dedup_key();
        best.entry(key)
            .and_modify(|origin| {
                if *origin == EdgeOrigin::Derived && e.origin == EdgeOrigin::Raw {
                    *origin = EdgeOrigin::Raw;
                }
            })
            .or_insert(e.origin);
    }
    let mut seen: BTreeSet<(NodeId, NodeId, EdgeKind)> = BTreeSet::new();
    let mut out = Vec::with_capacity(edges.len());
    for e in edges.drain(..) {
        let key = e.dedup_key();
        if seen.contains(&key) {
            continue;
        }
        seen.insert(key.clone());
        let origin = *best.get(&key).unwrap();
        out.push(Edge::new(key.0, key.1, key.2, origin));
    }
    *edges = out;
}

fn build_adjacency(edges: &[Edge]) -> (BTreeMap<NodeId, Vec<usize>>, BTreeMap<NodeId, Vec<usize>>) {
    let mut outgoing: BTreeMap<NodeId, Vec<usize>> = BTreeMap::new();
    let mut incoming: BTreeMap<NodeId, Vec<usize>> = BTreeMap::new();
    for (i, e) in edges.iter().enumerate() {
        outgoing.entry(e.from.clone()).or_default().push(i);
        incoming.entry(e.to.clone()).or_default().push(i);
    }
    (outgoing, incoming)
}

