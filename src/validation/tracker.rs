//! Bounded diagnostic bookkeeping.
//!
//! Two counters per category: the exact number of occurrences and the number
//! of records retained in detail. Retention stops at the per-category cap;
//! the total never does. Records beyond the cap are dropped from the detail
//! lists only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{Category, CategoryFilter, CountKind, DiagnosticRecord, Severity};

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Index out of bounds: {severity} record {index} requested, {available} retained")]
pub struct IndexOutOfBounds {
    pub severity: Severity,
    pub index: usize,
    pub available: usize,
}

/// Occurrence and retention counters for one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTally {
    pub total: u64,
    pub retained: u64,
}

/// Exact counts per category, independent of how many records were kept
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticCounts {
    by_category: BTreeMap<Category, CategoryTally>,
}

impl DiagnosticCounts {
    /// Count for one severity, restricted to one category or summed over all
    #[must_use]
    pub fn count(&self, severity: Severity, filter: CategoryFilter, kind: CountKind) -> u64 {
        self.by_category
            .iter()
            .filter(|(category, _)| category.severity() == severity)
            .filter(|(category, _)| match filter {
                CategoryFilter::All => true,
                CategoryFilter::Only(only) => **category == only,
            })
            .map(|(_, tally)| match kind {
                CountKind::Total => tally.total,
                CountKind::Tracked => tally.retained,
            })
            .sum()
    }

    #[must_use]
    pub fn total(&self, severity: Severity, filter: CategoryFilter) -> u64 {
        self.count(severity, filter, CountKind::Total)
    }

    #[must_use]
    pub fn tally(&self, category: Category) -> CategoryTally {
        self.by_category.get(&category).copied().unwrap_or_default()
    }

    /// Categories with at least one occurrence, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Category, CategoryTally)> + '_ {
        self.by_category.iter().map(|(c, t)| (*c, *t))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty()
    }
}

#[derive(Debug)]
pub struct DiagnosticTracker {
    max_detailed_per_category: usize,
    counts: DiagnosticCounts,
    errors: Vec<DiagnosticRecord>,
    warnings: Vec<DiagnosticRecord>,
}

impl DiagnosticTracker {
    pub fn new(max_detailed_per_category: usize) -> Self {
        Self {
            max_detailed_per_category,
            counts: DiagnosticCounts::default(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Count a record and keep it in detail if its category is under the cap
    pub fn record(&mut self, record: DiagnosticRecord) {
        let tally = self
            .counts
            .by_category
            .entry(record.category())
            .or_default();
        tally.total += 1;

        if tally.retained < self.max_detailed_per_category as u64 {
            tally.retained += 1;
            match record.severity() {
                Severity::Error => self.errors.push(record),
                Severity::Warning => self.warnings.push(record),
            }
        }
    }

    /// Count `occurrences` of `category` that were already dropped from detail
    pub fn count_unretained(&mut self, category: Category, occurrences: u64) {
        if occurrences > 0 {
            self.counts.by_category.entry(category).or_default().total += occurrences;
        }
    }

    #[must_use]
    pub fn total_count(&self, severity: Severity, filter: CategoryFilter) -> u64 {
        self.counts.total(severity, filter)
    }

    #[must_use]
    pub fn retained_count(&self, category: Category) -> u64 {
        self.counts.tally(category).retained
    }

    /// Retained record of `severity` at `index`, in discovery order
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfBounds` if fewer than `index + 1` records of that
    /// severity were retained.
    pub fn detailed_record(
        &self,
        severity: Severity,
        index: usize,
    ) -> Result<&DiagnosticRecord, IndexOutOfBounds> {
        detailed_record(self.records(severity), severity, index)
    }

    #[must_use]
    pub fn records(&self, severity: Severity) -> &[DiagnosticRecord] {
        match severity {
            Severity::Error => &self.errors,
            Severity::Warning => &self.warnings,
        }
    }

    #[must_use]
    pub fn counts(&self) -> &DiagnosticCounts {
        &self.counts
    }

    /// Consume the tracker, returning the counts and the retained errors and warnings
    #[must_use]
    pub fn into_parts(
        self,
    ) -> (
        DiagnosticCounts,
        Vec<DiagnosticRecord>,
        Vec<DiagnosticRecord>,
    ) {
        (self.counts, self.errors, self.warnings)
    }
}

pub(crate) fn detailed_record(
    records: &[DiagnosticRecord],
    severity: Severity,
    index: usize,
) -> Result<&DiagnosticRecord, IndexOutOfBounds> {
    records.get(index).ok_or(IndexOutOfBounds {
        severity,
        index,
        available: records.len(),
    })
}
