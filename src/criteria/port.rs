//! The 10 port criteria (spec §4.F), each a `Criterion<PortKind>` evaluated
//! with the subject set to an interface's qualified name. Ports are
//! classified before domain kinds (spec §4.F "Output"), so nothing here may
//! read a domain classification — criteria that need "application service
//! shaped" behavior re-derive it structurally instead.

use super::markers::{PRIMARY_PORT_MARKER, REPOSITORY_MARKER, SECONDARY_PORT_MARKER};
use super::result::{Evidence, EvidenceKind};
use super::support::is_aggregate_like;
use super::{Confidence, Criterion, CriterionError, MatchResult, PortKind};
use crate::graph::GraphQuery;

fn type_of<'a>(query: &'a GraphQuery, subject: &str) -> Result<&'a crate::graph::TypeNode, CriterionError> {
    query
        .graph()
        .node(subject)
        .ok_or_else(|| CriterionError(format!("unknown subject {subject}")))
}

macro_rules! explicit_marker_port {
    ($struct_name:ident, $name:literal, $kind:expr, $marker:expr) => {
        pub struct $struct_name;

        impl Criterion<PortKind> for $struct_name {
            fn name(&self) -> &'static str {
                $name
            }
            fn priority(&self) -> u32 {
                100
            }
            fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<PortKind>>, CriterionError> {
                let t = type_of(query, subject)?;
                if t.has_annotation($marker) {
                    Ok(Some(MatchResult {
                        kind: $kind,
                        confidence: Confidence::Explicit,
                        justification: format!("annotated with {}", $marker),
                        evidence: vec![Evidence::new(EvidenceKind::Annotation, format!("{} on {subject}", $marker))],
                    }))
                } else {
                    Ok(None)
                }
            }
        }
    };
}

explicit_marker_port!(ExplicitRepository, "explicit-repository", PortKind::Repository, REPOSITORY_MARKER);
explicit_marker_port!(ExplicitPrimaryPort, "explicit-primary-port", PortKind::UseCase, PRIMARY_PORT_MARKER);
explicit_marker_port!(ExplicitSecondaryPort, "explicit-secondary-port", PortKind::Gateway, SECONDARY_PORT_MARKER);

/// A class "looks like" an orchestrating application service without
/// needing the (not-yet-run) domain pass: it implements `interface` and
/// depends on at least one *other* interface by field or constructor
/// parameter.
fn implementers_look_like_services(query: &GraphQuery, interface: &str) -> bool {
    query.graph().implementers_of(interface).iter().any(|implementer| {
        query
            .injected_interface_dependencies(implementer)
            .iter()
            .any(|dep| dep != interface)
    })
}

pub struct SemanticDriving;

impl Criterion<PortKind> for SemanticDriving {
    fn name(&self) -> &'static str {
        "semantic-driving"
    }
    fn priority(&self) -> u32 {
        85
    }
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<PortKind>>, CriterionError> {
        let t = type_of(query, subject)?;
        if t.form != crate::model::TypeForm::Interface {
            return Ok(None);
        }
        if implementers_look_like_services(query, subject) {
            Ok(Some(MatchResult {
                kind: PortKind::UseCase,
                confidence: Confidence::Medium,
                justification: "implemented by a class that also depends on another interface".into(),
                evidence: vec![Evidence::new(EvidenceKind::Structure, format!("{subject} is implemented by a service-shaped class"))],
            }))
        } else {
            Ok(None)
        }
    }
}

pub struct SemanticDriven;

impl Criterion<PortKind> for SemanticDriven {
    fn name(&self) -> &'static str {
        "semantic-driven"
    }
    fn priority(&self) -> u32 {
        85
    }
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<PortKind>>, CriterionError> {
        let t = type_of(query, subject)?;
        if t.form != crate::model::TypeForm::Interface {
            return Ok(None);
        }
        if !query.graph().implementers_of(subject).is_empty() {
            return Ok(None);
        }
        let used_by_service_candidate = query.graph().types().any(|candidate| {
            query
                .injected_interface_dependencies(&candidate.qualified_name)
                .iter()
                .any(|dep| dep == subject)
        });
        if used_by_service_candidate {
            Ok(Some(MatchResult {
                kind: PortKind::Generic,
                confidence: Confidence::Medium,
                justification: "depended on by a service-shaped class but has no in-scope implementation".into(),
                evidence: vec![Evidence::new(EvidenceKind::Dependency, format!("{subject} has a missing or external implementation"))],
            }))
        } else {
            Ok(None)
        }
    }
}

pub struct CommandPattern;

impl Criterion<PortKind> for CommandPattern {
    fn name(&self) -> &'static str {
        "command-pattern"
    }
    fn priority(&self) -> u32 {
        75
    }
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<PortKind>>, CriterionError> {
        let matched = query.graph().methods_of(subject).iter().any(|m| {
            matches!(m.name.as_str(), "execute" | "handle")
                && m.parameters
                    .iter()
                    .any(|p| crate::criteria::support::simple_name_of(&p.type_ref.qualified_name).ends_with("Command"))
        });
        if matched {
            Ok(Some(MatchResult {
                kind: PortKind::Command,
                confidence: Confidence::High,
                justification: "exposes execute(Command) or handle(Command)".into(),
                evidence: vec![Evidence::new(EvidenceKind::Structure, format!("{subject} follows the command pattern"))],
            }))
        } else {
            Ok(None)
        }
    }
}

pub struct QueryPattern;

impl Criterion<PortKind> for QueryPattern {
    fn name(&self) -> &'static str {
        "query-pattern"
    }
    fn priority(&self) -> u32 {
        75
    }
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<PortKind>>, CriterionError> {
        let matched = query.graph().methods_of(subject).iter().any(|m| {
            (m.name == "query"
                && m.parameters
                    .iter()
                    .any(|p| crate::criteria::support::simple_name_of(&p.type_ref.qualified_name).ends_with("Query")))
                || (m.name.starts_with("get")
                    && m.parameters.is_empty()
                    && m.type_ref.as_ref().map(|t| !t.is_void()).unwrap_or(false))
        });
        if matched {
            Ok(Some(MatchResult {
                kind: PortKind::Query,
                confidence: Confidence::High,
                justification: "exposes query(Query) or a no-arg projection getter".into(),
                evidence: vec![Evidence::new(EvidenceKind::Structure, format!("{subject} follows the query pattern"))],
            }))
        } else {
            Ok(None)
        }
    }
}

pub struct InjectedAsDependency;

impl Criterion<PortKind> for InjectedAsDependency {
    fn name(&self) -> &'static str {
        "injected-as-dependency"
    }
    fn priority(&self) -> u32 {
        75
    }
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<PortKind>>, CriterionError> {
        let dependents = query
            .graph()
            .types()
            .filter(|t| query.injected_interface_dependencies(&t.qualified_name).iter().any(|d| d == subject))
            .count();
        if dependents > 0 {
            Ok(Some(MatchResult {
                kind: PortKind::Repository,
                confidence: Confidence::Low,
                justification: "injected as a field or constructor dependency".into(),
                evidence: vec![Evidence::new(EvidenceKind::Dependency, format!("{subject} is injected in {dependents} class(es)"))],
            }))
        } else {
            Ok(None)
        }
    }
}

fn aggregate_like_references(query: &GraphQuery, subject: &str) -> Vec<String> {
    let mut out = std::collections::BTreeSet::new();
    for m in query.graph().methods_of(subject) {
        if let Some(t) = &m.type_ref {
            let inner = t.innermost_qualified_name();
            if let Some(node) = query.graph().node(inner) {
                if is_aggregate_like(query, node) {
                    out.insert(inner.to_string());
                }
            }
        }
        for p in &m.parameters {
            let inner = p.type_ref.innermost_qualified_name();
            if let Some(node) = query.graph().node(inner) {
                if is_aggregate_like(query, node) {
                    out.insert(inner.to_string());
                }
            }
        }
    }
    out.into_iter().collect()
}

pub struct SignatureBasedGateway;

impl Criterion<PortKind> for SignatureBasedGateway {
    fn name(&self) -> &'static str {
        "signature-based-gateway"
    }
    fn priority(&self) -> u32 {
        72
    }
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<PortKind>>, CriterionError> {
        let refs = aggregate_like_references(query, subject);
        if refs.len() >= 2 {
            Ok(Some(MatchResult {
                kind: PortKind::Gateway,
                confidence: Confidence::Medium,
                justification: "signatures reference 2 or more aggregate-like types".into(),
                evidence: vec![Evidence::new(EvidenceKind::Structure, format!("{subject} references {}", refs.join(",")))],
            }))
        } else {
            Ok(None)
        }
    }
}

pub struct SignatureBasedDriven;

impl Criterion<PortKind> for SignatureBasedDriven {
    fn name(&self) -> &'static str {
        "signature-based-driven"
    }
    fn priority(&self) -> u32 {
        70
    }
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<PortKind>>, CriterionError> {
        let refs = aggregate_like_references(query, subject);
        if !refs.is_empty() {
            Ok(Some(MatchResult {
                kind: PortKind::Repository,
                confidence: Confidence::Low,
                justification: "signatures reference an aggregate-like type".into(),
                evidence: vec![Evidence::new(EvidenceKind::Structure, format!("{subject} references {}", refs.join(",")))],
            }))
        } else {
            Ok(None)
        }
    }
}

pub fn all() -> Vec<Box<dyn Criterion<PortKind>>> {
    vec![
        Box::new(ExplicitRepository),
        Box::new(ExplicitPrimaryPort),
        Box::new(ExplicitSecondaryPort),
        Box::new(SemanticDriving),
        Box::new(SemanticDriven),
        Box::new(CommandPattern),
        Box::new(QueryPattern),
        Box::new(InjectedAsDependency),
        Box::new(SignatureBasedGateway),
        Box::new(SignatureBasedDriven),
    ]
}
