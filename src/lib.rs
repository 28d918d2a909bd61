//! `archlens` — a deterministic DDD / hexagonal architectural classification
//! engine. Consumes a [`model::SemanticModelProvider`] and produces an
//! immutable [`EngineResult`]: the application graph, a classification per
//! type/interface, an enriched snapshot of behavioral labels, and an audit
//! report of rule violations.
//!
//! The pipeline is a pure function of `(provider, config)` (spec §2, §5):
//! graph build → style detection → port classification → domain
//! classification → `GENERIC` refinement → enrichment → audit, each stage
//! reading only what prior stages produced.

pub mod audit;
pub mod config;
pub mod criteria;
pub mod enrich;
pub mod error;
pub mod graph;
pub mod layer;
pub mod model;
pub mod style;

use config::Config;
use criteria::{ClassificationOutcome, ClassificationTarget, DomainCompatibilityPolicy, PortCompatibilityPolicy, PortKind};
use enrich::{BuiltinEnricher, EnrichedSnapshot, Enricher, EnrichmentContext};
use error::{AnalysisError, Diagnostic};
use graph::{ApplicationGraph, GraphBuilder, GraphQuery, PortInfo};
use layer::{Layer, LayerClassifier};
use model::{SemanticModelProvider, TypeForm};
use std::collections::BTreeMap;

/// The immutable output of one analysis run (spec §6 "Engine entry point").
#[derive(Debug)]
pub struct EngineResult {
    pub graph: ApplicationGraph,
    pub classifications: BTreeMap<String, ClassificationOutcome>,
    pub enriched: EnrichedSnapshot,
    pub audit: audit::AuditReport,
    pub diagnostics: Vec<Diagnostic>,
}

impl std::fmt::Debug for ApplicationGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationGraph")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}

/// Runs the full pipeline with only the built-in criteria, enrichers and
/// rules. Equivalent to `analyze_with_plugins(config, provider, vec![], vec![])`.
pub fn analyze(config: &Config, provider: &dyn SemanticModelProvider) -> Result<EngineResult, AnalysisError> {
    analyze_with_plugins(config, provider, Vec::new(), Vec::new())
}

/// Runs the full pipeline, additionally merging in third-party enrichers
/// and audit rules (spec §4.G, §4.H: both families are externally
/// extensible without touching the built-in set). Criteria are not
/// pluggable here — spec §4.F's priority table is part of the documented
/// behavioral contract and changing it is a breaking change by design.
pub fn analyze_with_plugins(
    config: &Config,
    provider: &dyn SemanticModelProvider,
    external_enrichers: Vec<Box<dyn Enricher>>,
    external_rules: Vec<Box<dyn audit::AuditRule>>,
) -> Result<EngineResult, AnalysisError> {
    config.validate()?;
    let mut diagnostics = Vec::new();

    tracing::info!(base_package = %config.base_package, "starting analysis");

    let graph = GraphBuilder::new(config).build(provider, &mut diagnostics)?;
    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        style = ?graph.metadata().style,
        style_confidence = ?graph.metadata().style_confidence,
        "application graph built"
    );

    // Port pass first: domain criteria like flexible-application-service
    // key off already-decided port direction (spec §4.F "Output").
    let port_query = GraphQuery::new(&graph);
    let interfaces: Vec<String> = graph.interfaces().map(|t| t.qualified_name.clone()).collect();
    let port_policy = PortCompatibilityPolicy;
    let (mut port_results, mut port_diag) =
        criteria::classify_all(ClassificationTarget::Port, &interfaces, &criteria::port::all(), &port_policy, &port_query);
    diagnostics.append(&mut port_diag);

    criteria::refine_generic_ports(&mut port_results, &port_query);

    let port_info: BTreeMap<String, PortInfo> = port_results
        .iter()
        .filter_map(|(name, outcome)| match outcome {
            ClassificationOutcome::Classified(c) => PortKind::from_name(&c.kind_name).map(|kind| {
                (
                    name.clone(),
                    PortInfo {
                        kind,
                        direction: kind.canonical_direction(),
                    },
                )
            }),
            _ => None,
        })
        .collect();

    let domain_query = GraphQuery::with_ports(&graph, &port_info);
    let domain_subjects: Vec<String> = graph
        .types()
        .filter(|t| t.form != TypeForm::Interface)
        .map(|t| t.qualified_name.clone())
        .collect();
    let domain_policy = DomainCompatibilityPolicy;
    let (domain_results, mut domain_diag) = criteria::classify_all(
        ClassificationTarget::Domain,
        &domain_subjects,
        &criteria::domain::all(),
        &domain_policy,
        &domain_query,
    );
    diagnostics.append(&mut domain_diag);

    let mut classifications: BTreeMap<String, ClassificationOutcome> = BTreeMap::new();
    classifications.extend(port_results);
    classifications.extend(domain_results);
    tracing::info!(classified = classifications.len(), "classification complete");

    let layers: BTreeMap<String, Layer> = graph.types().map(|t| (t.qualified_name.clone(), LayerClassifier::classify(t))).collect();

    let enrich_query = GraphQuery::with_ports(&graph, &port_info);
    let enrich_ctx = EnrichmentContext {
        graph: &graph,
        query: &enrich_query,
        classifications: &classifications,
    };
    let enriched = enrich::run(&enrich_ctx, &BuiltinEnricher, &external_enrichers, &mut diagnostics);
    tracing::debug!(labeled = enriched.labels.len(), "enrichment complete");

    let audit_query = GraphQuery::with_ports(&graph, &port_info);
    let audit_ctx = audit::AuditContext {
        graph: &graph,
        query: &audit_query,
        classifications: &classifications,
        layers: &layers,
    };
    let mut rules = audit::builtin_rules();
    rules.extend(external_rules);
    let report = audit::run(
        &rules,
        &audit_ctx,
        |id| config.is_rule_enabled(id),
        |id, default| config.severity_for(id, default),
        &mut diagnostics,
    );
    tracing::info!(status = report.status_str(), violations = report.violations.len(), "audit complete");

    Ok(EngineResult {
        graph,
        classifications,
        enriched,
        audit: report,
        diagnostics,
    })
}

/// CLI-style exit code mapping (spec §6 "Exit codes"): `0` PASSED, `1`
/// FAILED, reserved `2` for a fatal error the caller observed itself
/// (`analyze` returning `Err` — there is no result to derive a code from).
pub fn exit_code(result: &EngineResult) -> i32 {
    match result.audit.status() {
        audit::AuditStatus::Passed => 0,
        audit::AuditStatus::Failed => 1,
    }
}
