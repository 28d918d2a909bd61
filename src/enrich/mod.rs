//! Component G: the enrichment engine (spec §4.G). Runs the built-in
//! behavioral enricher, then every registered external enricher, merging
//! their contributions into one immutable [`EnrichedSnapshot`].

pub mod builtin;
pub mod labels;

pub use builtin::BuiltinEnricher;
pub use labels::SemanticLabel;

use crate::error::Diagnostic;
use crate::graph::{ApplicationGraph, GraphQuery};
use std::collections::{BTreeMap, BTreeSet};

/// An enricher failed during evaluation (spec §7 `EnricherError`). Caught
/// at the call site, logged as a diagnostic, and the contribution discarded.
#[derive(Debug, Clone)]
pub struct EnricherError(pub String);

impl std::fmt::Display for EnricherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read-only view an enricher evaluates against: the graph plus each
/// subject's already-decided classification.
pub struct EnrichmentContext<'a> {
    pub graph: &'a ApplicationGraph,
    pub query: &'a GraphQuery<'a>,
    pub classifications: &'a BTreeMap<String, crate::criteria::ClassificationOutcome>,
}

/// One enricher's output for the whole graph.
#[derive(Debug, Clone, Default)]
pub struct Contribution {
    pub id: String,
    pub labels: BTreeMap<String, BTreeSet<SemanticLabel>>,
    pub properties: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

pub trait Enricher: Send + Sync {
    fn id(&self) -> &'static str;
    fn enrich(&self, ctx: &EnrichmentContext) -> Result<Contribution, EnricherError>;
}

/// Pairs the classification result with the merged label/property maps
/// (spec §3 "Enriched snapshot"). Immutable once built.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EnrichedSnapshot {
    pub classifications: BTreeMap<String, crate::criteria::ClassificationOutcome>,
    pub labels: BTreeMap<String, BTreeSet<SemanticLabel>>,
    pub properties: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

/// Runs `builtin` then every `external` enricher in order, merging
/// contributions (label union, last-write-wins properties) and folding any
/// failure into `diagnostics` rather than aborting (spec §4.G, §7).
pub fn run(
    ctx: &EnrichmentContext,
    builtin: &dyn Enricher,
    external: &[Box<dyn Enricher>],
    diagnostics: &mut Vec<Diagnostic>,
) -> EnrichedSnapshot {
    let mut labels: BTreeMap<String, BTreeSet<SemanticLabel>> = BTreeMap::new();
    let mut properties: BTreeMap<String, BTreeMap<String, serde_json::Value>> = BTreeMap::new();

    let mut apply = |contribution: Contribution| {
        for (qname, new_labels) in contribution.labels {
            labels.entry(qname).or_default().extend(new_labels);
        }
        for (qname, new_props) in contribution.properties {
            let entry = properties.entry(qname).or_default();
            for (key, value) in new_props {
                entry.insert(key, value);
            }
        }
    };

    match builtin.enrich(ctx) {
        Ok(contribution) => apply(contribution),
        Err(e) => diagnostics.push(Diagnostic::error("enrich", format!("builtin enricher failed: {e}"))),
    }

    for enricher in external {
        match enricher.enrich(ctx) {
            Ok(contribution) => apply(contribution),
            Err(e) => diagnostics.push(Diagnostic::error(
                "enrich",
                format!("enricher `{}` failed, contribution discarded: {e}", enricher.id()),
            )),
        }
    }

    EnrichedSnapshot {
        classifications: ctx.classifications.clone(),
        labels,
        properties,
    }
}
