use serde::{Deserialize, Serialize};

use crate::core::types::{CategoryFilter, CountKind, DiagnosticRecord, Severity};
use crate::parsing::lines::TextEncoding;
use crate::validation::duplicates::SequenceHashEntry;
use crate::validation::tracker::{detailed_record, DiagnosticCounts, IndexOutOfBounds};

/// Size figures gathered during the pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub entries: u64,
    pub lines: u64,
    pub residues: u64,
    pub bytes: u64,
    pub distinct_sequences: u64,
    pub encoding: TextEncoding,
}

/// Result of one validation run. Immutable once built.
///
/// `succeeded` means the whole input was read; content defects do not clear
/// it. Only I/O failures, unusable configuration and cancellation do, and in
/// that case the report carries no diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub succeeded: bool,
    pub counts: DiagnosticCounts,
    pub errors: Vec<DiagnosticRecord>,
    pub warnings: Vec<DiagnosticRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fatal_error_message: Option<String>,
    pub summary: RunSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sequence_hashes: Vec<SequenceHashEntry>,
}

impl ValidationReport {
    /// Report for a run that could not complete
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            counts: DiagnosticCounts::default(),
            errors: Vec::new(),
            warnings: Vec::new(),
            fatal_error_message: Some(message.into()),
            summary: RunSummary::default(),
            sequence_hashes: Vec::new(),
        }
    }

    #[must_use]
    pub fn error_count(&self, kind: CountKind) -> u64 {
        self.counts.count(Severity::Error, CategoryFilter::All, kind)
    }

    #[must_use]
    pub fn warning_count(&self, kind: CountKind) -> u64 {
        self.counts.count(Severity::Warning, CategoryFilter::All, kind)
    }

    #[must_use]
    pub fn total_count(&self, severity: Severity, filter: CategoryFilter) -> u64 {
        self.counts.total(severity, filter)
    }

    #[must_use]
    pub fn records(&self, severity: Severity) -> &[DiagnosticRecord] {
        match severity {
            Severity::Error => &self.errors,
            Severity::Warning => &self.warnings,
        }
    }

    /// Retained record of `severity` at `index`, in discovery order
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfBounds` if the index is past the retained records.
    pub fn detailed_record(
        &self,
        severity: Severity,
        index: usize,
    ) -> Result<&DiagnosticRecord, IndexOutOfBounds> {
        detailed_record(self.records(severity), severity, index)
    }

    /// Present only when the run did not succeed
    #[must_use]
    pub fn fatal_error_message(&self) -> Option<&str> {
        self.fatal_error_message.as_deref()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count(CountKind::Total) > 0
    }
}
