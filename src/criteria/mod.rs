//! Component E+F: the generic criteria engine plus the concrete domain and
//! port criteria plugged into it (spec §4.E, §4.F).

pub mod domain;
pub mod markers;
pub mod port;
pub mod result;
pub mod support;

pub use result::{
    to_outcome, Classification, ClassificationOutcome, ClassificationTarget, Conflict, ConflictSeverity,
    Evidence, EvidenceKind,
};

use crate::graph::GraphQuery;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
    Explicit,
}

impl Confidence {
    /// `confidenceRank(EXPLICIT)=3, HIGH=2, MEDIUM=1, LOW=0` (spec §4.E step 2).
    pub fn rank(&self) -> u8 {
        match self {
            Confidence::Explicit => 3,
            Confidence::High => 2,
            Confidence::Medium => 1,
            Confidence::Low => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum DomainKind {
    AggregateRoot,
    Entity,
    ValueObject,
    Identifier,
    DomainEvent,
    ExternalizedEvent,
    DomainService,
    ApplicationService,
    Saga,
    InboundOnly,
    OutboundOnly,
}

impl DomainKind {
    pub fn name(&self) -> &'static str {
        match self {
            DomainKind::AggregateRoot => "AGGREGATE_ROOT",
            DomainKind::Entity => "ENTITY",
            DomainKind::ValueObject => "VALUE_OBJECT",
            DomainKind::Identifier => "IDENTIFIER",
            DomainKind::DomainEvent => "DOMAIN_EVENT",
            DomainKind::ExternalizedEvent => "EXTERNALIZED_EVENT",
            DomainKind::DomainService => "DOMAIN_SERVICE",
            DomainKind::ApplicationService => "APPLICATION_SERVICE",
            DomainKind::Saga => "SAGA",
            DomainKind::InboundOnly => "INBOUND_ONLY",
            DomainKind::OutboundOnly => "OUTBOUND_ONLY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum PortKind {
    Repository,
    UseCase,
    Gateway,
    Command,
    Query,
    Generic,
}

impl PortKind {
    pub fn name(&self) -> &'static str {
        match self {
            PortKind::Repository => "REPOSITORY",
            PortKind::UseCase => "USE_CASE",
            PortKind::Gateway => "GATEWAY",
            PortKind::Command => "COMMAND",
            PortKind::Query => "QUERY",
            PortKind::Generic => "GENERIC",
        }
    }

    pub fn canonical_direction(&self) -> PortDirection {
        match self {
            PortKind::Repository | PortKind::Gateway | PortKind::Generic => PortDirection::Driven,
            PortKind::UseCase | PortKind::Command | PortKind::Query => PortDirection::Driving,
        }
    }

    /// Inverse of [`PortKind::name`]. Used to turn a classification's
    /// `kind_name` string — possibly rewritten by the `GENERIC` refinement
    /// pass — back into a [`PortKind`] for [`crate::graph::PortInfo`].
    pub fn from_name(name: &str) -> Option<PortKind> {
        match name {
            "REPOSITORY" => Some(PortKind::Repository),
            "USE_CASE" => Some(PortKind::UseCase),
            "GATEWAY" => Some(PortKind::Gateway),
            "COMMAND" => Some(PortKind::Command),
            "QUERY" => Some(PortKind::Query),
            "GENERIC" => Some(PortKind::Generic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum PortDirection {
    Driving,
    Driven,
}

/// A criterion's positive match for `subject`.
#[derive(Debug, Clone)]
pub struct MatchResult<K> {
    pub kind: K,
    pub confidence: Confidence,
    pub justification: String,
    pub evidence: Vec<Evidence>,
}

/// A criterion failed during evaluation (spec §7 `CriterionError`). Caught
/// at the call site and folded into a diagnostic; never propagated.
#[derive(Debug, Clone)]
pub struct CriterionError(pub String);

impl std::fmt::Display for CriterionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub trait Criterion<K>: Send + Sync {
    fn name(&self) -> &'static str;
    fn priority(&self) -> u32;
    fn evaluate(&self, subject: &str, query: &GraphQuery) -> Result<Option<MatchResult<K>>, CriterionError>;
}

/// A criterion's contribution to the decision for one subject.
#[derive(Debug, Clone)]
pub struct Contribution<K> {
    pub criterion_name: &'static str,
    pub priority: u32,
    pub kind: K,
    pub confidence: Confidence,
    pub justification: String,
    pub evidence: Vec<Evidence>,
}

pub trait CompatibilityPolicy<K>: Send + Sync {
    fn compatible(&self, a: &K, b: &K) -> bool;
}

/// Domain default: the only compatible pair is `AGGREGATE_ROOT <-> ENTITY`.
pub struct DomainCompatibilityPolicy;

impl CompatibilityPolicy<DomainKind> for DomainCompatibilityPolicy {
    fn compatible(&self, a: &DomainKind, b: &DomainKind) -> bool {
        a == b
            || matches!(
                (a, b),
                (DomainKind::AggregateRoot, DomainKind::Entity) | (DomainKind::Entity, DomainKind::AggregateRoot)
            )
    }
}

/// Port default: all kinds are mutually incompatible.
pub struct PortCompatibilityPolicy;

impl CompatibilityPolicy<PortKind> for PortCompatibilityPolicy {
    fn compatible(&self, a: &PortKind, b: &PortKind) -> bool {
        a == b
    }
}

/// Lets the generic decision/conversion code print a kind without knowing
/// whether it is a `DomainKind` or a `PortKind`.
pub trait KindName {
    fn kind_name(&self) -> &'static str;
}

impl KindName for DomainKind {
    fn kind_name(&self) -> &'static str {
        self.name()
    }
}

impl KindName for PortKind {
    fn kind_name(&self) -> &'static str {
        self.name()
    }
}

pub enum Decision<K> {
    Classified {
        winner: Contribution<K>,
        conflicts: Vec<Contribution<K>>,
    },
    Unclassified,
    Conflict(Vec<Contribution<K>>),
}

/// Default decision policy (spec §4.E): deterministic tie-break over a set
/// of contributions for a single subject.
pub fn decide<K: Clone + PartialEq>(
    mut contributions: Vec<Contribution<K>>,
    policy: &dyn CompatibilityPolicy<K>,
) -> Decision<K> {
    if contributions.is_empty() {
        return Decision::Unclassified;
    }

    // Step 1 is a documented no-op: nothing is actually filtered out here —
    // every contribution is retained so the conflict scan below can see it.

    // Step 2: sort by (-priority, -confidenceRank, name ASC).
    contributions.sort_by(priority_order);

    let winner = contributions[0].clone();
    let mut conflicts = Vec::new();
    let mut incompatible = false;

    for c in &contributions[1..] {
        if c.kind != winner.kind {
            if !policy.compatible(&winner.kind, &c.kind) {
                incompatible = true;
            }
            conflicts.push(c.clone());
        }
    }

    if incompatible {
        let mut all = vec![winner];
        all.extend(conflicts);
        all.sort_by(priority_order);
        Decision::Conflict(all)
    } else {
        Decision::Classified { winner, conflicts }
    }
}

pub(crate) fn priority_order<K>(a: &Contribution<K>, b: &Contribution<K>) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| b.confidence.rank().cmp(&a.confidence.rank()))
        .then_with(|| a.criterion_name.cmp(b.criterion_name))
}

/// Every contribution a criterion set produces for one subject, plus any
/// [`CriterionError`]s raised along the way (spec §7: local, non-fatal).
fn contributions_for<K: Clone>(
    subject: &str,
    criteria: &[Box<dyn Criterion<K>>],
    query: &GraphQuery,
) -> (Vec<Contribution<K>>, Vec<CriterionError>) {
    let mut contributions = Vec::new();
    let mut errors = Vec::new();
    for c in criteria {
        match c.evaluate(subject, query) {
            Ok(Some(m)) => contributions.push(Contribution {
                criterion_name: c.name(),
                priority: c.priority(),
                kind: m.kind,
                confidence: m.confidence,
                justification: m.justification,
                evidence: m.evidence,
            }),
            Ok(None) => {}
            Err(e) => errors.push(e),
        }
    }
    (contributions, errors)
}

/// Evaluates `criteria` against every subject and decides a winner for
/// each, independently and in parallel (spec §5: "work over independent
/// subjects ... may execute in parallel worker threads"). `rayon`'s
/// `par_iter().map().collect::<Vec<_>>()` preserves the input ordering of
/// `subjects` regardless of which worker finishes first, so the result is
/// already in the order the later stages require — no re-sort needed.
pub fn classify_all<K>(
    target: ClassificationTarget,
    subjects: &[String],
    criteria: &[Box<dyn Criterion<K>>],
    policy: &(dyn CompatibilityPolicy<K> + Sync),
    query: &GraphQuery,
) -> (Vec<(String, ClassificationOutcome)>, Vec<crate::error::Diagnostic>)
where
    K: Clone + PartialEq + KindName + Send + Sync,
{
    use rayon::prelude::*;

    let per_subject: Vec<(String, ClassificationOutcome, Vec<CriterionError>)> = subjects
        .par_iter()
        .map(|subject| {
            let (contributions, errors) = contributions_for(subject, criteria, query);
            let decision = decide(contributions, policy);
            (subject.clone(), to_outcome(target, decision), errors)
        })
        .collect();

    let mut diagnostics = Vec::with_capacity(per_subject.len());
    let mut out = Vec::with_capacity(per_subject.len());
    for (subject, outcome, errors) in per_subject {
        for e in errors {
            diagnostics.push(crate::error::Diagnostic::error(
                "criteria",
                format!("criterion failed on {subject}: {e}"),
            ));
        }
        out.push((subject, outcome));
    }
    (out, diagnostics)
}

/// The Open-Questions `GENERIC` refinement pass (spec §4.F note, SPEC_FULL
/// §4.F "[ADDED]"): for every port the default decision crowned `GENERIC`
/// via `semantic-driven`, re-evaluate the two `signature-based-*` criteria
/// directly. If either would also have matched, its kind replaces `GENERIC`
/// in the result and the justification is amended — the original winning
/// criterion, priority and confidence are untouched, so this can never turn
/// a loser into a winner, only annotate the winner more precisely.
pub fn refine_generic_ports(results: &mut [(String, ClassificationOutcome)], query: &GraphQuery) {
    let gateway = port::SignatureBasedGateway;
    let driven = port::SignatureBasedDriven;

    for (subject, outcome) in results.iter_mut() {
        let ClassificationOutcome::Classified(c) = outcome else {
            continue;
        };
        if c.kind_name != "GENERIC" || c.criterion_name != "semantic-driven" {
            continue;
        }
        let refined = gateway
            .evaluate(subject, query)
            .ok()
            .flatten()
            .map(|m| (PortKind::Gateway, m))
            .or_else(|| driven.evaluate(subject, query).ok().flatten().map(|m| (PortKind::Repository, m)));
        if let Some((kind, m)) = refined {
            c.kind_name = kind.name().to_string();
            c.justification = format!(
                "{} (refined from GENERIC: {})",
                c.justification, m.justification
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::graph::GraphBuilder;
    use crate::model::{FixtureModel, TypeForm};

    fn classification(kind_name: &str, criterion_name: &'static str) -> ClassificationOutcome {
        ClassificationOutcome::Classified(Classification {
            target: ClassificationTarget::Port,
            kind_name: kind_name.to_string(),
            confidence: Confidence::Medium,
            criterion_name: criterion_name.to_string(),
            priority: 85,
            justification: "injected as a dependency with no in-scope implementer".to_string(),
            evidence: vec![],
            conflicts: vec![],
        })
    }

    /// Builds a graph with one aggregate-like class (has an `id` field) and
    /// one interface whose single method's signature references it twice —
    /// exactly the shape `signature-based-gateway` requires.
    fn gateway_shaped_graph() -> crate::graph::ApplicationGraph {
        use crate::model::{Field, Method, Modifier, Parameter, TypeRef};

        let order = crate::model::JavaType {
            qualified_name: "com.example.refine.Order".to_string(),
            simple_name: "Order".to_string(),
            package: "com.example.refine".to_string(),
            form: TypeForm::Class,
            modifiers: vec![],
            supertype: None,
            interfaces: vec![],
            annotations: vec![],
            fields: vec![Field {
                name: "id".to_string(),
                type_ref: TypeRef::simple("java.util.UUID"),
                modifiers: vec![Modifier::Final],
                annotations: vec![],
            }],
            methods: vec![],
            constructors: vec![],
            location: None,
            documentation: None,
        };
        let repository = crate::model::JavaType {
            qualified_name: "com.example.refine.OrderGateway".to_string(),
            simple_name: "OrderGateway".to_string(),
            package: "com.example.refine".to_string(),
            form: TypeForm::Interface,
            modifiers: vec![],
            supertype: None,
            interfaces: vec![],
            annotations: vec![],
            fields: vec![],
            methods: vec![Method {
                name: "reconcile".to_string(),
                parameters: vec![Parameter {
                    name: "existing".to_string(),
                    type_ref: TypeRef::simple("com.example.refine.Order"),
                    annotations: vec![],
                }],
                return_type: TypeRef::simple("com.example.refine.Order"),
                modifiers: vec![],
                annotations: vec![],
                complexity: Some(1),
            }],
            constructors: vec![],
            location: None,
            documentation: None,
        };

        let provider = FixtureModel::new("com.example.refine").with_type(order).with_type(repository);
        let mut cfg = Config::new("com.example.refine");
        cfg.source_roots = vec![std::path::PathBuf::from(".")];
        let mut diagnostics = Vec::new();
        GraphBuilder::new(&cfg).build(&provider, &mut diagnostics).expect("graph builds")
    }

    #[test]
    fn refine_generic_ports_promotes_gateway_on_matching_signature() {
        let graph = gateway_shaped_graph();
        let query = GraphQuery::new(&graph);
        let mut results = vec![(
            "com.example.refine.OrderGateway".to_string(),
            classification("GENERIC", "semantic-driven"),
        )];

        refine_generic_ports(&mut results, &query);

        match &results[0].1 {
            ClassificationOutcome::Classified(c) => {
                assert_eq!(c.kind_name, "GATEWAY");
                assert!(c.justification.contains("refined from GENERIC"));
                assert_eq!(c.criterion_name, "semantic-driven", "winner attribution is untouched");
                assert_eq!(c.priority, 85, "winner priority is untouched");
            }
            other => panic!("expected Classified, got {other:?}"),
        }
    }

    #[test]
    fn refine_generic_ports_leaves_non_generic_winners_alone() {
        let graph = gateway_shaped_graph();
        let query = GraphQuery::new(&graph);
        let mut results = vec![(
            "com.example.refine.OrderGateway".to_string(),
            classification("REPOSITORY", "injected-as-dependency"),
        )];

        refine_generic_ports(&mut results, &query);

        match &results[0].1 {
            ClassificationOutcome::Classified(c) => assert_eq!(c.kind_name, "REPOSITORY"),
            other => panic!("expected Classified, got {other:?}"),
        }
    }

    #[test]
    fn refine_generic_ports_leaves_generic_unrefined_when_no_signature_matches() {
        let graph = gateway_shaped_graph();
        let query = GraphQuery::new(&graph);
        // "Notifier" isn't in the graph at all, so neither signature-based
        // criterion can find any aggregate-like reference for it.
        let mut results = vec![("com.example.refine.Notifier".to_string(), classification("GENERIC", "semantic-driven"))];

        refine_generic_ports(&mut results, &query);

        match &results[0].1 {
            ClassificationOutcome::Classified(c) => assert_eq!(c.kind_name, "GENERIC"),
            other => panic!("expected Classified, got {other:?}"),
        }
    }
}
