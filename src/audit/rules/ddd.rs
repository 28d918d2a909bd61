//! DDD rule family (spec §4.H "DDD"): entity identity, aggregate repository
//! coverage, value-object immutability, aggregate cycles, and aggregate
//! reference consistency.

use crate::audit::{AuditContext, AuditRule, RuleError, Violation};
use crate::config::Severity;
use crate::criteria::support::{has_identity_field, has_setter};
use crate::graph::TypeNode;
use petgraph::graph::DiGraph;
use std::collections::BTreeMap;

pub struct EntityIdentity;

impl AuditRule for EntityIdentity {
    fn id(&self) -> &'static str {
        "ddd:entity-identity"
    }
    fn name(&self) -> &'static str {
        "entities and aggregate roots must expose an identity field"
    }
    fn default_severity(&self) -> Severity {
        Severity::Major
    }
    fn check(&self, unit: &TypeNode, ctx: &AuditContext) -> Result<Vec<Violation>, RuleError> {
        let kind = ctx.classification_kind(&unit.qualified_name);
        if !matches!(kind, Some("ENTITY") | Some("AGGREGATE_ROOT")) {
            return Ok(vec![]);
        }
        if has_identity_field(ctx.query, &unit.qualified_name) {
            return Ok(vec![]);
        }
        Ok(vec![Violation {
            rule_id: self.id().to_string(),
            severity: self.default_severity(),
            message: format!(
                "{} is classified {} but exposes no identity field",
                unit.qualified_name,
                kind.unwrap_or("?")
            ),
            location: unit.location.clone(),
        }])
    }
}

pub struct AggregateRepository;

impl AuditRule for AggregateRepository {
    fn id(&self) -> &'static str {
        "ddd:aggregate-repository"
    }
    fn name(&self) -> &'static str {
        "every aggregate root must have a corresponding repository port"
    }
    fn default_severity(&self) -> Severity {
        Severity::Major
    }
    fn check(&self, unit: &TypeNode, ctx: &AuditContext) -> Result<Vec<Violation>, RuleError> {
        if ctx.classification_kind(&unit.qualified_name) != Some("AGGREGATE_ROOT") {
            return Ok(vec![]);
        }
        let has_repository = ctx.graph.interfaces().any(|iface| {
            ctx.classification_kind(&iface.qualified_name) == Some("REPOSITORY")
                && ctx.graph.methods_of(&iface.qualified_name).iter().any(|m| {
                    m.type_ref
                        .as_ref()
                        .map(|t| t.innermost_qualified_name() == unit.qualified_name)
                        .unwrap_or(false)
                        || m.parameters
                            .iter()
                            .any(|p| p.type_ref.innermost_qualified_name() == unit.qualified_name)
                })
        });
        if has_repository {
            return Ok(vec![]);
        }
        Ok(vec![Violation {
            rule_id: self.id().to_string(),
            severity: self.default_severity(),
            message: format!("aggregate root {} has no repository port managing it", unit.qualified_name),
            location: unit.location.clone(),
        }])
    }
}

pub struct ValueObjectImmutability;

impl AuditRule for ValueObjectImmutability {
    fn id(&self) -> &'static str {
        "ddd:value-object-immutable"
    }
    fn name(&self) -> &'static str {
        "value objects must have no setters and no mutable fields"
    }
    fn default_severity(&self) -> Severity {
        Severity::Critical
    }
    fn check(&self, unit: &TypeNode, ctx: &AuditContext) -> Result<Vec<Violation>, RuleError> {
        if ctx.classification_kind(&unit.qualified_name) != Some("VALUE_OBJECT") {
            return Ok(vec![]);
        }
        let has_setter = has_setter(ctx.query, &unit.qualified_name);
        let has_mutable_field = ctx
            .graph
            .fields_of(&unit.qualified_name)
            .iter()
            .any(|f| !f.is_final() && !f.is_static());
        if !has_setter && !has_mutable_field {
            return Ok(vec![]);
        }
        Ok(vec![Violation {
            rule_id: self.id().to_string(),
            severity: self.default_severity(),
            message: format!("value object {} exposes a setter or a mutable field", unit.qualified_name),
            location: unit.location.clone(),
        }])
    }
}

/// Builds the directed graph of `AGGREGATE_ROOT -> AGGREGATE_ROOT`
/// references (field types and raw USES edges) and returns the strongly
/// connected components with more than one member — those are cycles.
/// Recomputed per call: rules are stateless (spec §4.H), and audit runs
/// once per analysis, so there is no cache to keep coherent.
fn aggregate_cycle_members(ctx: &AuditContext) -> std::collections::BTreeSet<String> {
    let roots: Vec<&TypeNode> = ctx
        .graph
        .types()
        .filter(|t| ctx.classification_kind(&t.qualified_name) == Some("AGGREGATE_ROOT"))
        .collect();

    let mut pg = DiGraph::<String, ()>::new();
    let mut index = BTreeMap::new();
    for r in &roots {
        index.insert(r.qualified_name.clone(), pg.add_node(r.qualified_name.clone()));
    }
    for r in &roots {
        for field in ctx.graph.fields_of(&r.qualified_name) {
            let Some(target) = field.type_ref.as_ref().map(|t| t.innermost_qualified_name().to_string()) else {
                continue;
            };
            if target != r.qualified_name {
                if let (Some(&a), Some(&b)) = (index.get(&r.qualified_name), index.get(&target)) {
                    pg.add_edge(a, b, ());
                }
            }
        }
    }

    let mut cyclic = std::collections::BTreeSet::new();
    for scc in petgraph::algo::tarjan_scc(&pg) {
        if scc.len() > 1 {
            for idx in scc {
                cyclic.insert(pg[idx].clone());
            }
        }
    }
    cyclic
}

pub struct AggregateCycles;

impl AuditRule for AggregateCycles {
    fn id(&self) -> &'static str {
        "ddd:aggregate-cycles"
    }
    fn name(&self) -> &'static str {
        "no dependency cycle between aggregate roots"
    }
    fn default_severity(&self) -> Severity {
        Severity::Major
    }
    fn check(&self, unit: &TypeNode, ctx: &AuditContext) -> Result<Vec<Violation>, RuleError> {
        if ctx.classification_kind(&unit.qualified_name) != Some("AGGREGATE_ROOT") {
            return Ok(vec![]);
        }
        if !aggregate_cycle_members(ctx).contains(&unit.qualified_name) {
            return Ok(vec![]);
        }
        Ok(vec![Violation {
            rule_id: self.id().to_string(),
            severity: self.default_severity(),
            message: format!("aggregate root {} participates in a reference cycle with another aggregate root", unit.qualified_name),
            location: unit.location.clone(),
        }])
    }
}

pub struct AggregateConsistency;

impl AuditRule for AggregateConsistency {
    fn id(&self) -> &'static str {
        "ddd:aggregate-consistency"
    }
    fn name(&self) -> &'static str {
        "no direct field reference from one aggregate root to another"
    }
    fn default_severity(&self) -> Severity {
        Severity::Major
    }
    fn check(&self, unit: &TypeNode, ctx: &AuditContext) -> Result<Vec<Violation>, RuleError> {
        if ctx.classification_kind(&unit.qualified_name) != Some("AGGREGATE_ROOT") {
            return Ok(vec![]);
        }
        let offending: Vec<String> = ctx
            .graph
            .fields_of(&unit.qualified_name)
            .iter()
            .filter_map(|f| f.type_ref.as_ref().map(|t| t.innermost_qualified_name().to_string()))
            .filter(|target| target != &unit.qualified_name && ctx.classification_kind(target) == Some("AGGREGATE_ROOT"))
            .collect();
        if offending.is_empty() {
            return Ok(vec![]);
        }
        Ok(offending
            .into_iter()
            .map(|target| Violation {
                rule_id: self.id().to_string(),
                severity: self.default_severity(),
                message: format!("aggregate root {} directly references aggregate root {target}", unit.qualified_name),
                location: unit.location.clone(),
            })
            .collect())
    }
}

pub fn all() -> Vec<Box<dyn AuditRule>> {
    vec![
        Box::new(EntityIdentity),
        Box::new(AggregateRepository),
        Box::new(ValueObjectImmutability),
        Box::new(AggregateCycles),
        Box::new(AggregateConsistency),
    ]
}
