//! Hexagonal rule family (spec §4.H "Hexagonal"): ports must be interfaces,
//! dependency direction, and layer isolation.

use super::support::dependency_targets;
use crate::audit::{AuditContext, AuditRule, RuleError, Violation};
use crate::config::Severity;
use crate::criteria::{ClassificationOutcome, ClassificationTarget};
use crate::graph::TypeNode;
use crate::layer::Layer;
use crate::model::TypeForm;

pub struct PortsMustBeInterfaces;

impl AuditRule for PortsMustBeInterfaces {
    fn id(&self) -> &'static str {
        "hexagonal:ports-must-be-interfaces"
    }
    fn name(&self) -> &'static str {
        "types classified as ports must be interfaces"
    }
    fn default_severity(&self) -> Severity {
        Severity::Critical
    }
    fn check(&self, unit: &TypeNode, ctx: &AuditContext) -> Result<Vec<Violation>, RuleError> {
        let Some(ClassificationOutcome::Classified(c)) = ctx.classifications.get(&unit.qualified_name) else {
            return Ok(vec![]);
        };
        if c.target != ClassificationTarget::Port || unit.form == TypeForm::Interface {
            return Ok(vec![]);
        }
        Ok(vec![Violation {
            rule_id: self.id().to_string(),
            severity: self.default_severity(),
            message: format!("{} is classified as port kind {} but is not an interface", unit.qualified_name, c.kind_name),
            location: unit.location.clone(),
        }])
    }
}

pub struct DependencyDirection;

impl AuditRule for DependencyDirection {
    fn id(&self) -> &'static str {
        "hexagonal:dependency-direction"
    }
    fn name(&self) -> &'static str {
        "domain must not depend on concrete infrastructure implementations"
    }
    fn default_severity(&self) -> Severity {
        Severity::Critical
    }
    fn check(&self, unit: &TypeNode, ctx: &AuditContext) -> Result<Vec<Violation>, RuleError> {
        if ctx.layer_of(&unit.qualified_name) != Layer::Domain {
            return Ok(vec![]);
        }
        let violations = dependency_targets(ctx.graph, &unit.qualified_name)
            .into_iter()
            .filter(|target| {
                ctx.layer_of(target) == Layer::Infrastructure
                    && ctx
                        .graph
                        .node(target)
                        .map(|t| t.form != TypeForm::Interface)
                        .unwrap_or(false)
            })
            .map(|target| Violation {
                rule_id: self.id().to_string(),
                severity: self.default_severity(),
                message: format!(
                    "{} (domain) depends directly on concrete infrastructure type {target} instead of a port",
                    unit.qualified_name
                ),
                location: unit.location.clone(),
            })
            .collect();
        Ok(violations)
    }
}

pub struct LayerIsolation;

impl AuditRule for LayerIsolation {
    fn id(&self) -> &'static str {
        "hexagonal:layer-isolation"
    }
    fn name(&self) -> &'static str {
        "presentation must reach domain only through application"
    }
    fn default_severity(&self) -> Severity {
        Severity::Major
    }
    fn check(&self, unit: &TypeNode, ctx: &AuditContext) -> Result<Vec<Violation>, RuleError> {
        if ctx.layer_of(&unit.qualified_name) != Layer::Presentation {
            return Ok(vec![]);
        }
        let violations = dependency_targets(ctx.graph, &unit.qualified_name)
            .into_iter()
            .filter(|target| ctx.layer_of(target) == Layer::Domain)
            .map(|target| Violation {
                rule_id: self.id().to_string(),
                severity: self.default_severity(),
                message: format!(
                    "{} (presentation) depends directly on domain type {target}, bypassing the application layer",
                    unit.qualified_name
                ),
                location: unit.location.clone(),
            })
            .collect();
        Ok(violations)
    }
}

pub fn all() -> Vec<Box<dyn AuditRule>> {
    vec![Box::new(PortsMustBeInterfaces), Box::new(DependencyDirection), Box::new(LayerIsolation)]
}
