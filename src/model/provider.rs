//! The semantic model provider contract (spec §4.A) and a deterministic
//! in-memory fixture used by tests. Real front-ends are external
//! collaborators; nothing in this module parses source files.

use super::types::JavaType;
use crate::error::AnalysisError;

/// Canonical annotations marking code emitted by a downstream generator.
/// Types carrying one of these are excluded unless `includeGenerated` is set.
pub const GENERATOR_MARKERS: &[&str] = &[
    "org.hexaglue.generated.Generated",
    "javax.annotation.processing.Generated",
    "jakarta.annotation.Generated",
];

/// Streams an ordered sequence of [`JavaType`] values. Implementations must
/// filter to the configured base package, exclude generator-marked types
/// (unless asked not to), and emit in ascending qualified-name order.
pub trait SemanticModelProvider {
    fn types(&self) -> Result<Vec<JavaType>, AnalysisError>;
}

/// An in-memory, test-only provider. Applies the same base-package and
/// generator-marker filtering real providers are required to perform, so
/// tests exercise the actual contract rather than a shortcut.
#[derive(Debug, Default, Clone)]
pub struct FixtureModel {
    base_package: String,
    include_generated: bool,
    types: Vec<JavaType>,
}

impl FixtureModel {
    pub fn new(base_package: impl Into<String>) -> Self {
        Self {
            base_package: base_package.into(),
            include_generated: false,
            types: Vec::new(),
        }
    }

    pub fn include_generated(mut self, include: bool) -> Self {
        self.include_generated = include;
        self
    }

    pub fn with_type(mut self, t: JavaType) -> Self {
        self.types.push(t);
        self
    }

    fn in_scope(&self, t: &JavaType) -> bool {
        let pkg = &t.package;
        (pkg == &self.base_package || pkg.starts_with(&format!("{}.", self.base_package)))
            && (self.include_generated
                || !t
                    .annotations
                    .iter()
                    .any(|a| GENERATOR_MARKERS.contains(&a.qualified_name.as_str())))
    }
}

impl SemanticModelProvider for FixtureModel {
    fn types(&self) -> Result<Vec<JavaType>, AnalysisError> {
        let mut out: Vec<JavaType> = self.types.iter().filter(|t| self.in_scope(t)).cloned().collect();
        out.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));
        out.dedup_by(|a, b| a.qualified_name == b.qualified_name);
        Ok(out)
    }
}
