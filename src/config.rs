//! Typed configuration surface (spec §6).

use crate::error::AnalysisError;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Ordinal severity used by violations and severity overrides. Ordering is
/// `Info < Minor < Major < Critical < Blocker`, matching spec §3/§8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum Severity {
    Info,
    Minor,
    Major,
    Critical,
    Blocker,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Minor => "MINOR",
            Severity::Major => "MAJOR",
            Severity::Critical => "CRITICAL",
            Severity::Blocker => "BLOCKER",
        }
    }
}

/// Engine configuration. A pure value; `analyze` takes it by reference and
/// never mutates it.
#[derive(Debug, Clone)]
pub struct Config {
    pub source_roots: Vec<PathBuf>,
    pub base_package: String,
    pub language_version: u32,
    pub tolerant_resolution: bool,
    pub classpath_entries: Vec<PathBuf>,
    pub include_generated: bool,
    pub compute_derived_edges: bool,
    /// Empty means "all rules enabled".
    pub enabled_rules: BTreeSet<String>,
    pub severity_overrides: BTreeMap<String, Severity>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_roots: Vec::new(),
            base_package: String::new(),
            language_version: 17,
            tolerant_resolution: true,
            classpath_entries: Vec::new(),
            include_generated: false,
            compute_derived_edges: true,
            enabled_rules: BTreeSet::new(),
            severity_overrides: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn new(base_package: impl Into<String>) -> Self {
        Self {
            base_package: base_package.into(),
            ..Self::default()
        }
    }

    /// Validate fields that can be checked without touching the semantic
    /// model. `analyze` calls this before invoking the provider.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.base_package.trim().is_empty() {
            return Err(AnalysisError::Configuration(
                "basePackage must not be empty".to_string(),
            ));
        }
        if self.source_roots.is_empty() {
            return Err(AnalysisError::Configuration(
                "sourceRoots must contain at least one entry".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        self.enabled_rules.is_empty() || self.enabled_rules.contains(rule_id)
    }

    pub fn severity_for(&self, rule_id: &str, default: Severity) -> Severity {
        self.severity_overrides
            .get(rule_id)
            .copied()
            .unwrap_or(default)
    }
}
