//! The 19 domain criteria (spec §4.F), each a `Criterion<DomainKind>`
//! evaluated with the subject set to a type's qualified name.

use super::markers::{
    AGGREGATE_ROOT_MARKER, DOMAIN_EVENT_MARKER, ENTITY_MARKER, EXTERNALIZED_EVENT_MARKER, IDENTITY_MARKER,
    JMOLECULES_DOMAIN_INTERFACES, VALUE_OBJECT_MARKER,
};
use super::result::{Evidence, EvidenceKind};
use super::support::{has_identity_field, is_aggregate_like, is_immutable, referencing_owners};
use super::{Confidence, Criterion, CriterionError, DomainKind, MatchResult};
use crate::graph::GraphQuery;
use crate::model::TypeForm;

fn type_of<'a>(query: &'a GraphQuery, subject: &str) -> Result<&'a crate::graph::TypeNode, CriterionError> {
    query
        .graph()
        .node(subject)
        .ok_or_else(|| CriterionError(format!("unknown subject {subject}")))
}

fn kind_from_name(name: &str) -> Option<DomainKind> {
    match name {
        "AGGREGATE_ROOT" => Some(DomainKind::AggregateRoot),
        "ENTITY" => Some(DomainKind::Entity),
        "VALUE_OBJECT" => Some(DomainKind::ValueObject),
        "IDENTIFIER" => Some(DomainKind::Identifier),
        "DOMAIN_EVENT" => Some(DomainKind::DomainEvent),
        "EXTERNALIZED_EVENT" => Some(DomainKind::ExternalizedEvent),
        "DOMAIN_SERVICE" => Some(DomainKind::DomainService),
        _ => None,
    }
}

fn has_mutable_field(query: &GraphQuery, subject: &str) -> bool {
    query.graph().fields_of(subject).iter().any(|f| !f.is_final() && !f.is_static())
}

macro_rules! explicit_marker_criterion {
    ($struct_name:ident, $name:literal, $kind:expr, $marker:expr) => {
        pub struct $struct_name;

        impl Criterion<DomainKind> for $struct_name {
            fn name(&self) -> &'static str {
                $name
            }
            fn priority(&self) -> u32 {
                100
            }
            fn evaluate(
                &self,
                subject: &str,
                query: &GraphQuery,
            ) -> Result<Option<MatchResult<DomainKind>>, CriterionError> {
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

explicit_marker_criterion!(ExplicitAggregateRoot, "explicit-aggregate-root", DomainKind::AggregateRoot, AGGREGATE_ROOT_MARKER);
explicit_marker_criterion!(ExplicitEntity, "explicit-entity", DomainKind::Entity, ENTITY_MARKER);
explicit_marker_criterion!(ExplicitValueObject, "explicit-value-object", DomainKind::ValueObject, VALUE_OBJECT_MARKER);
explicit_marker_criterion!(ExplicitDomainEvent, "explicit-domain-event", DomainKind::DomainEvent, DOMAIN_EVENT_MARKER);
explicit_marker_criterion!(
    ExplicitExternalizedEvent,
    "explicit-externalized-event",
    DomainKind::ExternalizedEvent,
    EXTERNALIZED_EVENT_MARKER
);

pub struct ExplicitIdentifier;

impl Criterion<DomainKind> for ExplicitIdentifier {
    fn name(&self) -> &'static str {
        "explicit-identifier"
    }
    fn priority(&self) -> u32 {
        100
    }
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<DomainKind>>, CriterionError> {
        let t = type_of(query, subject)?;
        if t.has_annotation(IDENTITY_MARKER) {
            return Ok(Some(MatchResult {
                kind: DomainKind::Identifier,
                confidence: Confidence::Explicit,
                justification: format!("type annotated with {IDENTITY_MARKER}"),
                evidence: vec![Evidence::new(EvidenceKind::Annotation, format!("{IDENTITY_MARKER} on {subject}"))],
            }));
        }
        let marked_field = query
            .graph()
            .fields_of(subject)
            .iter()
            .find(|f| f.has_annotation(IDENTITY_MARKER))
            .map(|f| f.name.clone());
        if let Some(field_name) = marked_field {
            return Ok(Some(MatchResult {
                kind: DomainKind::Identifier,
                confidence: Confidence::Explicit,
                justification: format!("field `{field_name}` annotated with {IDENTITY_MARKER}"),
                evidence: vec![Evidence::new(
                    EvidenceKind::Annotation,
                    format!("{IDENTITY_MARKER} on {subject}#{field_name}"),
                )],
            }));
        }
        Ok(None)
    }
}

pub struct ImplementsJMoleculesInterface;

impl Criterion<DomainKind> for ImplementsJMoleculesInterface {
    fn name(&self) -> &'static str {
        "implements-jmolecules-interface"
    }
    fn priority(&self) -> u32 {
        100
    }
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<DomainKind>>, CriterionError> {
        let directly_implemented = query.implemented_interfaces(subject);
        let supertypes = query.graph().supertypes_of(subject);
        for (interface, kind_name) in JMOLECULES_DOMAIN_INTERFACES {
            if directly_implemented.iter().any(|i| i == interface) || supertypes.iter().any(|s| s == interface) {
                if let Some(kind) = kind_from_name(kind_name) {
                    return Ok(Some(MatchResult {
                        kind,
                        confidence: Confidence::Explicit,
                        justification: format!("implements {interface}"),
                        evidence: vec![Evidence::new(EvidenceKind::Inheritance, format!("{subject} implements {interface}"))],
                    }));
                }
            }
        }
        Ok(None)
    }
}

pub struct RepositoryDominant;

impl Criterion<DomainKind> for RepositoryDominant {
    fn name(&self) -> &'static str {
        "repository-dominant"
    }
    fn priority(&self) -> u32 {
        80
    }
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<DomainKind>>, CriterionError> {
        if !has_identity_field(query, subject) {
            return Ok(None);
        }
        let appears_in_repository_signature = query.graph().types().any(|iface| {
            iface.form == TypeForm::Interface
                && query
                    .port_info(&iface.qualified_name)
                    .map(|p| p.kind == super::PortKind::Repository)
                    .unwrap_or(false)
                && query.graph().methods_of(&iface.qualified_name).iter().any(|m| {
                    m.type_ref.as_ref().map(|t| t.innermost_qualified_name() == subject).unwrap_or(false)
                        || m.parameters.iter().any(|p| p.type_ref.innermost_qualified_name() == subject)
                })
        });
        if appears_in_repository_signature {
            Ok(Some(MatchResult {
                kind: DomainKind::AggregateRoot,
                confidence: Confidence::High,
                justification: "appears in a repository interface signature and owns an identity field".into(),
                evidence: vec![Evidence::new(EvidenceKind::Dependency, format!("{subject} managed by a REPOSITORY port"))],
            }))
        } else {
            Ok(None)
        }
    }
}

pub struct RecordSingleId;

impl Criterion<DomainKind> for RecordSingleId {
    fn name(&self) -> &'static str {
        "record-single-id"
    }
    fn priority(&self) -> u32 {
        80
    }
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<DomainKind>>, CriterionError> {
        let t = type_of(query, subject)?;
        if t.form != TypeForm::Record {
            return Ok(None);
        }
        let fields = query.graph().fields_of(subject);
        if fields.len() == 1 && t.simple_name.ends_with("Id") {
            Ok(Some(MatchResult {
                kind: DomainKind::Identifier,
                confidence: Confidence::High,
                justification: "single-component record whose name ends with Id".into(),
                evidence: vec![Evidence::new(EvidenceKind::Structure, format!("{subject} is a single-field record"))],
            }))
        } else {
            Ok(None)
        }
    }
}

pub struct InheritedClassification;

impl Criterion<DomainKind> for InheritedClassification {
    fn name(&self) -> &'static str {
        "inherited-classification"
    }
    fn priority(&self) -> u32 {
        75
    }
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<DomainKind>>, CriterionError> {
        // Re-derives the supertype's explicit marker directly rather than
        // reading another criterion's decision, keeping criteria pure and
        // order-independent (spec §4.E evaluation model).
        const EXPLICIT_MARKERS: &[(&str, DomainKind)] = &[
            (AGGREGATE_ROOT_MARKER, DomainKind::AggregateRoot),
            (ENTITY_MARKER, DomainKind::Entity),
            (VALUE_OBJECT_MARKER, DomainKind::ValueObject),
            (IDENTITY_MARKER, DomainKind::Identifier),
            (DOMAIN_EVENT_MARKER, DomainKind::DomainEvent),
            (EXTERNALIZED_EVENT_MARKER, DomainKind::ExternalizedEvent),
        ];
        for supertype in query.graph().supertypes_of(subject) {
            if let Some(node) = query.graph().node(&supertype) {
                for (marker, kind) in EXPLICIT_MARKERS {
                    if node.has_annotation(marker) {
                        return Ok(Some(MatchResult {
                            kind: *kind,
                            confidence: Confidence::High,
                            justification: format!("supertype {supertype} is explicitly marked"),
                            evidence: vec![Evidence::new(
                                EvidenceKind::Inheritance,
                                format!("{subject} extends/implements {supertype}"),
                            )],
                        }));
                    }
                }
            }
        }
        Ok(None)
    }
}

pub struct FlexibleApplicationService;

impl Criterion<DomainKind> for FlexibleApplicationService {
    fn name(&self) -> &'static str {
        "flexible-application-service"
    }
    fn priority(&self) -> u32 {
        74
    }
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<DomainKind>>, CriterionError> {
        let driving = query.driving_ports_implemented(subject);
        let driven = query.driven_ports_depended_on(subject);
        if !driving.is_empty() && !driven.is_empty() {
            Ok(Some(MatchResult {
                kind: DomainKind::ApplicationService,
                confidence: Confidence::Medium,
                justification: "implements a driving port and depends on a driven port".into(),
                evidence: vec![Evidence::new(
                    EvidenceKind::Dependency,
                    format!("{subject} implements {} and depends on {}", driving.join(","), driven.join(",")),
                )],
            }))
        } else {
            Ok(None)
        }
    }
}

pub struct DomainEnum;

impl Criterion<DomainKind> for DomainEnum {
    fn name(&self) -> &'static str {
        "domain-enum"
    }
    fn priority(&self) -> u32 {
        72
    }
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<DomainKind>>, CriterionError> {
        let t = type_of(query, subject)?;
        if t.form == TypeForm::Enum {
            Ok(Some(MatchResult {
                kind: DomainKind::ValueObject,
                confidence: Confidence::Medium,
                justification: "enum type".into(),
                evidence: vec![Evidence::new(EvidenceKind::Structure, format!("{subject} is an enum"))],
            }))
        } else {
            Ok(None)
        }
    }
}

/// `saga_eligible` is shared with [`FlexibleOutboundOnly`] so the two
/// criteria never disagree about which structural shape belongs to which —
/// without it, a class matching both would raise an unintended `CONFLICT`
/// (see the scenario discussion in the crate's design notes).
fn saga_eligible(query: &GraphQuery, subject: &str) -> bool {
    query.driving_ports_implemented(subject).is_empty()
        && query.driven_ports_depended_on(subject).len() >= 2
        && has_mutable_field(query, subject)
}

pub struct FlexibleSaga;

impl Criterion<DomainKind> for FlexibleSaga {
    fn name(&self) -> &'static str {
        "flexible-saga"
    }
    fn priority(&self) -> u32 {
        72
    }
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<DomainKind>>, CriterionError> {
        if saga_eligible(query, subject) {
            Ok(Some(MatchResult {
                kind: DomainKind::Saga,
                confidence: Confidence::Medium,
                justification: "depends on 2+ driven ports, implements no driving port, owns mutable state".into(),
                evidence: vec![Evidence::new(EvidenceKind::Dependency, format!("{subject} coordinates multiple driven ports"))],
            }))
        } else {
            Ok(None)
        }
    }
}

pub struct ContainedEntity;

impl Criterion<DomainKind> for ContainedEntity {
    fn name(&self) -> &'static str {
        "contained-entity"
    }
    fn priority(&self) -> u32 {
        70
    }
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<DomainKind>>, CriterionError> {
        if !has_identity_field(query, subject) {
            return Ok(None);
        }
        let owned_by_aggregate = query.graph().types().any(|owner| {
            is_aggregate_like(query, owner)
                && query.graph().fields_of(&owner.qualified_name).iter().any(|f| {
                    f.type_ref
                        .as_ref()
                        .map(|t| t.is_collection_like() && t.innermost_qualified_name() == subject)
                        .unwrap_or(false)
                })
        });
        if owned_by_aggregate {
            Ok(Some(MatchResult {
                kind: DomainKind::Entity,
                confidence: Confidence::Medium,
                justification: "owns an identity field and is held in a collection field of an aggregate root".into(),
                evidence: vec![Evidence::new(EvidenceKind::Structure, format!("{subject} is contained by an aggregate"))],
            }))
        } else {
            Ok(None)
        }
    }
}

pub struct EmbeddedValueObject;

impl Criterion<DomainKind> for EmbeddedValueObject {
    fn name(&self) -> &'static str {
        "embedded-value-object"
    }
    fn priority(&self) -> u32 {
        70
    }
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<DomainKind>>, CriterionError> {
        let t = type_of(query, subject)?;
        if has_identity_field(query, subject) || !is_immutable(query, t) {
            return Ok(None);
        }
        let referenced_by_aggregate = query
            .graph()
            .types()
            .any(|owner| is_aggregate_like(query, owner) && super::support::is_referenced_via_field(query, &owner.qualified_name, subject));
        if referenced_by_aggregate {
            Ok(Some(MatchResult {
                kind: DomainKind::ValueObject,
                confidence: Confidence::Medium,
                justification: "immutable, identity-less, referenced from an aggregate root".into(),
                evidence: vec![Evidence::new(EvidenceKind::Structure, format!("{subject} is embedded in an aggregate"))],
            }))
        } else {
            Ok(None)
        }
    }
}

pub struct FlexibleInboundOnly;

impl Criterion<DomainKind> for FlexibleInboundOnly {
    fn name(&self) -> &'static str {
        "flexible-inbound-only"
    }
    fn priority(&self) -> u32 {
        70
    }
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<DomainKind>>, CriterionError> {
        if !query.driving_ports_implemented(subject).is_empty() && query.driven_ports_depended_on(subject).is_empty() {
            Ok(Some(MatchResult {
                kind: DomainKind::InboundOnly,
                confidence: Confidence::Medium,
                justification: "implements a driving port and depends on no driven port".into(),
                evidence: vec![Evidence::new(EvidenceKind::Dependency, format!("{subject} only receives calls"))],
            }))
        } else {
            Ok(None)
        }
    }
}

pub struct DomainEventNaming;

impl Criterion<DomainKind> for DomainEventNaming {
    fn name(&self) -> &'static str {
        "domain-event-naming"
    }
    fn priority(&self) -> u32 {
        68
    }
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<DomainKind>>, CriterionError> {
        let t = type_of(query, subject)?;
        if t.simple_name.ends_with("Event") && t.simple_name != "Event" {
            Ok(Some(MatchResult {
                kind: DomainKind::DomainEvent,
                confidence: Confidence::Low,
                justification: "type name ends with Event".into(),
                evidence: vec![Evidence::new(EvidenceKind::Naming, format!("{subject} is named *Event"))],
            }))
        } else {
            Ok(None)
        }
    }
}

pub struct FlexibleOutboundOnly;

impl Criterion<DomainKind> for FlexibleOutboundOnly {
    fn name(&self) -> &'static str {
        "flexible-outbound-only"
    }
    fn priority(&self) -> u32 {
        68
    }
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<DomainKind>>, CriterionError> {
        let driven = query.driven_ports_depended_on(subject);
        let driving = query.driving_ports_implemented(subject);
        if driven.is_empty() || !driving.is_empty() {
            return Ok(None);
        }
        // Structurally excludes the flexible-saga shape so the two never
        // contribute incompatible kinds for the same subject; priority
        // (72 > 68) alone is not enough because SAGA/OUTBOUND_ONLY are a
        // strictly incompatible pair under the default policy.
        if saga_eligible(query, subject) {
            return Ok(None);
        }
        Ok(Some(MatchResult {
            kind: DomainKind::OutboundOnly,
            confidence: Confidence::Medium,
            justification: "depends on driven port(s), implements no driving port".into(),
            evidence: vec![Evidence::new(EvidenceKind::Dependency, format!("{subject} only calls out"))],
        }))
    }
}

pub struct DomainRecordValueObject;

impl Criterion<DomainKind> for DomainRecordValueObject {
    fn name(&self) -> &'static str {
        "domain-record-value-object"
    }
    fn priority(&self) -> u32 {
        65
    }
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<DomainKind>>, CriterionError> {
        let t = type_of(query, subject)?;
        if t.form != TypeForm::Record || has_identity_field(query, subject) || t.simple_name.ends_with("Id") {
            return Ok(None);
        }
        let referencing = referencing_owners(query, subject);
        if referencing.is_empty() {
            return Ok(None);
        }
        Ok(Some(MatchResult {
            kind: DomainKind::ValueObject,
            confidence: Confidence::Low,
            justification: "immutable record without identity, referenced by other in-scope types".into(),
            evidence: vec![Evidence::new(
                EvidenceKind::Structure,
                format!("referenced by {}", referencing.join(",")),
            )],
        }))
    }
}

/// All domain criteria in priority order (informational only — the decision
/// policy sorts by priority regardless of registration order).
pub fn all() -> Vec<Box<dyn Criterion<DomainKind>>> {
    vec![
        Box::new(ExplicitAggregateRoot),
        Box::new(ExplicitEntity),
        Box::new(ExplicitValueObject),
        Box::new(ExplicitIdentifier),
        Box::new(ExplicitDomainEvent),
        Box::new(ExplicitExternalizedEvent),
        Box::new(ImplementsJMoleculesInterface),
        Box::new(RepositoryDominant),
        Box::new(RecordSingleId),
        Box::new(InheritedClassification),
        Box::new(FlexibleApplicationService),
        Box::new(DomainEnum),
        Box::new(FlexibleSaga),
        Box::new(ContainedEntity),
        Box::new(EmbeddedValueObject),
        Box::new(FlexibleInboundOnly),
        Box::new(DomainEventNaming),
        Box::new(FlexibleOutboundOnly),
        Box::new(DomainRecordValueObject),
    ]
}
