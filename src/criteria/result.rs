//! Type-erased classification results (spec §3). Domain and port passes
//! work with their own `K` (`DomainKind`/`PortKind`); once a decision is
//! reached it is converted into this kind-name-based representation so
//! both passes share one `ClassificationResult`-shaped output, matching
//! spec §3's abstract description.

use super::{Confidence, Contribution};
use crate::graph::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum ClassificationTarget {
    Domain,
    Port,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum EvidenceKind {
    Annotation,
    Structure,
    Naming,
    Dependency,
    Inheritance,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Evidence {
    pub kind: EvidenceKind,
    pub description: String,
    #[serde(skip)]
    pub references: Vec<NodeId>,
}

impl Evidence {
    pub fn new(kind: EvidenceKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            references: Vec::new(),
        }
    }

    pub fn with_references(mut self, references: Vec<NodeId>) -> Self {
        self.references = references;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum ConflictSeverity {
    Warning,
    Error,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Conflict {
    pub kind_name: String,
    pub criterion_name: String,
    pub confidence: Confidence,
    pub priority: u32,
    pub justification: String,
    pub severity: ConflictSeverity,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Classification {
    pub target: ClassificationTarget,
    pub kind_name: String,
    pub confidence: Confidence,
    pub criterion_name: String,
    pub priority: u32,
    pub justification: String,
    pub evidence: Vec<Evidence>,
    pub conflicts: Vec<Conflict>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum ClassificationOutcome {
    Classified(Classification),
    Unclassified {
        target: ClassificationTarget,
        reason: Option<String>,
    },
    Conflict {
        target: ClassificationTarget,
        conflicts: Vec<Conflict>,
    },
}

impl ClassificationOutcome {
    pub fn kind_name(&self) -> Option<&str> {
        match self {
            ClassificationOutcome::Classified(c) => Some(&c.kind_name),
            _ => None,
        }
    }
}

/// Converts a generic `Decision<K>` into the type-erased representation
/// spec §3 describes. Advisory conflicts on the `Classified` path are
/// always `WARNING` (the only severity the default policy can produce
/// there); a `Conflict` decision carries every involved contribution at
/// `ERROR`.
pub fn to_outcome<K: super::KindName>(
    target: ClassificationTarget,
    decision: super::Decision<K>,
) -> ClassificationOutcome {
    match decision {
        super::Decision::Unclassified => ClassificationOutcome::Unclassified { target, reason: None },
        super::Decision::Classified { winner, conflicts } => {
            let conflicts: Vec<Conflict> = conflicts
                .iter()
                .map(|c| contribution_to_conflict(c, ConflictSeverity::Warning))
                .collect();
            ClassificationOutcome::Classified(Classification {
                target,
                kind_name: winner.kind.kind_name().to_string(),
                confidence: winner.confidence,
                criterion_name: winner.criterion_name.to_string(),
                priority: winner.priority,
                justification: winner.justification,
                evidence: winner.evidence,
                conflicts,
            })
        }
        super::Decision::Conflict(all) => {
            let conflicts = all
                .iter()
                .map(|c| contribution_to_conflict(c, ConflictSeverity::Error))
                .collect();
            ClassificationOutcome::Conflict { target, conflicts }
        }
    }
}

/// Converts a generic `Contribution<K>` into its type-erased `Conflict`
/// form, always `WARNING` — the default policy can only ever produce
/// compatible advisory conflicts on the `Classified` path (spec §4.E step 6).
pub(super) fn contribution_to_conflict<K: super::KindName>(
    c: &Contribution<K>,
    severity: ConflictSeverity,
) -> Conflict {
    Conflict {
        kind_name: c.kind.kind_name().to_string(),
        criterion_name: c.criterion_name.to_string(),
        confidence: c.confidence,
        priority: c.priority,
        justification: c.justification.clone(),
        severity,
    }
}
