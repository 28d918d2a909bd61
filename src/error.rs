//! Error taxonomy for the analysis pipeline (spec §7).
//!
//! Fatal kinds are represented as `AnalysisError` variants and abort the
//! pipeline. Local failures (a criterion, enricher, or rule throwing) are
//! never represented here — they are caught at the call site and folded
//! into a [`Diagnostic`] instead, per the propagation policy.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal error kinds. Any variant here aborts `analyze` with no result.
#[derive(Error, Debug, Clone)]
pub enum AnalysisError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("semantic model provider failed: {0}")]
    Parse(String),

    #[error("unresolved reference in strict mode: {0}")]
    Reference(String),
}

/// Severity of a non-fatal [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// A non-fatal event surfaced alongside an `EngineResult`. Every local
/// failure in §7 (`CriterionError`, `EnricherError`, `RuleError`) and every
/// silently-dropped out-of-scope reference in §4.C ends up here instead of
/// unwinding the pipeline.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub stage: &'static str,
    pub message: String,
}

impl Diagnostic {
    pub fn new(level: DiagnosticLevel, stage: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            stage,
            message: message.into(),
        }
    }

    pub fn debug(stage: &'static str, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Debug, stage, message)
    }

    pub fn warning(stage: &'static str, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warning, stage, message)
    }

    pub fn error(stage: &'static str, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, stage, message)
    }
}

/// Location of a declaration or violation in source, carried optionally on
/// nodes and required on every [`crate::audit::Violation`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
}
