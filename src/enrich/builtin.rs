//! The built-in behavioral enricher (spec §4.G). Every label here is a pure
//! structural observation about a type or one of its methods — it never
//! reads classification results, so it runs identically regardless of what
//! the criteria engine decided.

use super::labels::SemanticLabel;
use super::{Contribution, EnricherError, EnrichmentContext};
use crate::criteria::support::is_immutable;
use crate::graph::{MemberNode, TypeNode};
use std::collections::BTreeSet;

const LIFECYCLE_NAMES: &[&str] = &[
    "activate", "deactivate", "enable", "disable", "cancel", "complete", "submit", "approve", "reject",
];
const VALIDATOR_PREFIXES: &[&str] = &["validate", "check", "ensure", "verify", "assert"];
const COLLECTION_PREFIXES: &[&str] = &["add", "remove", "delete", "clear"];

pub struct BuiltinEnricher;

impl super::Enricher for BuiltinEnricher {
    fn id(&self) -> &'static str {
        "builtin"
    }

    fn enrich(&self, ctx: &EnrichmentContext) -> Result<Contribution, EnricherError> {
        let mut labels = std::collections::BTreeMap::new();

        for t in ctx.graph.types() {
            let mut type_labels = BTreeSet::new();
            if is_immutable(ctx.query, t) {
                type_labels.insert(SemanticLabel::ImmutableType);
            }
            if t.form == crate::model::TypeForm::Record || is_immutable(ctx.query, t) {
                type_labels.insert(SemanticLabel::SideEffectFree);
            }
            if ctx
                .graph
                .methods_of(&t.qualified_name)
                .iter()
                .any(|m| method_publishes_event(m))
            {
                type_labels.insert(SemanticLabel::EventPublisher);
            }
            if !type_labels.is_empty() {
                labels.insert(t.qualified_name.clone(), type_labels);
            }

            for m in ctx.graph.methods_of(&t.qualified_name) {
                let method_labels = method_labels(t, m);
                if !method_labels.is_empty() {
                    labels.insert(m.id.to_string(), method_labels);
                }
            }
        }

        Ok(Contribution {
            id: self.id().to_string(),
            labels,
            properties: std::collections::BTreeMap::new(),
        })
    }
}

fn method_publishes_event(m: &MemberNode) -> bool {
    m.type_ref
        .as_ref()
        .map(|t| {
            let simple = crate::criteria::support::simple_name_of(&t.qualified_name);
            simple.contains("Event") || simple.contains("DomainEvent")
        })
        .unwrap_or(false)
}

fn method_labels(owner: &TypeNode, m: &MemberNode) -> BTreeSet<SemanticLabel> {
    let mut out = BTreeSet::new();
    let is_static = m.is_static();
    let returns_void = m.type_ref.as_ref().map(|t| t.is_void()).unwrap_or(true);
    let returns_owner = m
        .type_ref
        .as_ref()
        .map(|t| t.innermost_qualified_name() == owner.qualified_name)
        .unwrap_or(false);

    if is_static && returns_owner {
        out.insert(SemanticLabel::FactoryMethod);
    }
    if VALIDATOR_PREFIXES.iter().any(|p| m.name.starts_with(p))
        && m.type_ref
            .as_ref()
            .map(|t| t.is_void() || t.qualified_name == "boolean" || t.qualified_name == "java.lang.Boolean")
            .unwrap_or(true)
    {
        out.insert(SemanticLabel::InvariantValidator);
    }
    if COLLECTION_PREFIXES.iter().any(|p| m.name.starts_with(p)) && !m.parameters.is_empty() {
        out.insert(SemanticLabel::CollectionManager);
    }
    if LIFECYCLE_NAMES.contains(&m.name.as_str()) {
        out.insert(SemanticLabel::LifecycleMethod);
    }
    if (m.name.starts_with("get") || m.name.starts_with("is")) && m.parameters.is_empty() && !returns_void {
        out.insert(SemanticLabel::Getter);
    }
    if m.name.starts_with("set") && m.parameters.len() == 1 && returns_void {
        out.insert(SemanticLabel::Setter);
    }
    if m.annotations.iter().any(|a| a.qualified_name.ends_with("CommandHandler")) || m.name.starts_with("handle") {
        out.insert(SemanticLabel::CommandHandler);
    }
    if m.annotations
        .iter()
        .any(|a| a.qualified_name.ends_with("EventHandler") || a.qualified_name.ends_with("EventListener"))
    {
        out.insert(SemanticLabel::EventHandler);
    }
    out
}
