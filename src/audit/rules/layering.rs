//! Layering rule family (spec §4.H "Layering"): coarse-layer dependency
//! direction, independent of any DDD/hexagonal classification.

use super::support::dependency_targets;
use crate::audit::{AuditContext, AuditRule, RuleError, Violation};
use crate::config::Severity;
use crate::graph::TypeNode;
use crate::layer::Layer;

pub struct ApplicationNotDependsOnPresentation;

impl AuditRule for ApplicationNotDependsOnPresentation {
    fn id(&self) -> &'static str {
        "layering:application-not-depends-on-presentation"
    }
    fn name(&self) -> &'static str {
        "application must not depend on presentation"
    }
    fn default_severity(&self) -> Severity {
        Severity::Major
    }
    fn check(&self, unit: &TypeNode, ctx: &AuditContext) -> Result<Vec<Violation>, RuleError> {
        if ctx.layer_of(&unit.qualified_name) != Layer::Application {
            return Ok(vec![]);
        }
        let violations = dependency_targets(ctx.graph, &unit.qualified_name)
            .into_iter()
            .filter(|target| ctx.layer_of(target) == Layer::Presentation)
            .map(|target| Violation {
                rule_id: self.id().to_string(),
                severity: self.default_severity(),
                message: format!("{} (application) depends on presentation type {target}", unit.qualified_name),
                location: unit.location.clone(),
            })
            .collect();
        Ok(violations)
    }
}

pub struct DomainNotDependsOnInfrastructure;

impl AuditRule for DomainNotDependsOnInfrastructure {
    fn id(&self) -> &'static str {
        "layering:domain-not-depends-on-infrastructure"
    }
    fn name(&self) -> &'static str {
        "domain must not depend on infrastructure"
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
            .filter(|target| ctx.layer_of(target) == Layer::Infrastructure)
            .map(|target| Violation {
                rule_id: self.id().to_string(),
                severity: self.default_severity(),
                message: format!("{} (domain) depends on infrastructure type {target}", unit.qualified_name),
                location: unit.location.clone(),
            })
            .collect();
        Ok(violations)
    }
}

pub struct PresentationNotDependedOnByDomain;

impl AuditRule for PresentationNotDependedOnByDomain {
    fn id(&self) -> &'static str {
        "layering:presentation-not-depended-on-by-domain"
    }
    fn name(&self) -> &'static str {
        "presentation must not be depended on by domain"
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
            .filter(|target| ctx.layer_of(target) == Layer::Presentation)
            .map(|target| Violation {
                rule_id: self.id().to_string(),
                severity: self.default_severity(),
                message: format!("presentation type {target} is depended on by domain type {}", unit.qualified_name),
                location: unit.location.clone(),
            })
            .collect();
        Ok(violations)
    }
}

pub fn all() -> Vec<Box<dyn AuditRule>> {
    vec![
        Box::new(ApplicationNotDependsOnPresentation),
        Box::new(DomainNotDependsOnInfrastructure),
        Box::new(PresentationNotDependedOnByDomain),
    ]
}
