//! Structural helpers shared by the layering, DDD and hexagonal rule
//! families — mirrors the role `crate::criteria::support` plays for
//! criteria: keep "what does this type reach" defined once.

use crate::graph::{ApplicationGraph, EdgeKind, MemberKind, NodeId};
use std::collections::BTreeSet;

/// Every type `type_qn` references via an annotation, field, return type, or
/// parameter type — at type granularity, de-duplicated and sorted. Covers
/// the edge kinds layering rules are defined over in spec §4.H.
pub(crate) fn dependency_targets(graph: &ApplicationGraph, type_qn: &str) -> Vec<String> {
    let mut out: BTreeSet<String> = BTreeSet::new();
    let type_id = NodeId::for_type(type_qn);
    for e in graph.outgoing(&type_id, Some(EdgeKind::AnnotatedBy)) {
        out.insert(e.to.qualified.clone());
    }

    let members = graph
        .fields_of(type_qn)
        .into_iter()
        .chain(graph.methods_of(type_qn))
        .chain(graph.constructors_of(type_qn));
    for m in members {
        let kinds: &[EdgeKind] = match m.kind {
            MemberKind::Field => &[EdgeKind::FieldType, EdgeKind::AnnotatedBy],
            MemberKind::Method => &[EdgeKind::ReturnType, EdgeKind::ParameterType, EdgeKind::AnnotatedBy],
            MemberKind::Constructor => &[EdgeKind::ParameterType, EdgeKind::AnnotatedBy],
        };
        for kind in kinds {
            for e in graph.outgoing(&m.id, Some(*kind)) {
                out.insert(e.to.qualified.clone());
            }
        }
    }
    out.into_iter().collect()
}
