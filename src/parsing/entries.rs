//! Groups scanned lines into FASTA entries.
//!
//! The parser yields one [`ProteinEntry`] at a time. Structural findings
//! (text before the first header, missing names, empty entries, blank lines)
//! are buffered and drained by the caller after each entry, so the detailed
//! records can be merged with the rule findings in line order.
//!
//! At most `detail_cap` records are buffered per category. Later findings are
//! only counted and handed over through [`EntryParser::drain_unretained`].

use std::collections::BTreeMap;
use std::io::BufRead;
use std::ops::RangeInclusive;

use tracing::trace;

use crate::core::entry::ProteinEntry;
use crate::core::types::{Category, DiagnosticRecord};
use crate::parsing::lines::{LineScanner, ScanError, TextEncoding};
use crate::utils::validation::{is_blank_line, HEADER_MARKER};

pub struct EntryParser<R> {
    scanner: LineScanner<R>,
    warn_on_blank_lines: bool,
    current: Option<ProteinEntry>,
    /// Run of blank lines since the last non-blank line of the current entry
    pending_blank_lines: Option<RangeInclusive<u64>>,
    reported_text_before_first_entry: bool,
    detail_cap: u64,
    buffered: BTreeMap<Category, u64>,
    unretained: BTreeMap<Category, u64>,
    diagnostics: Vec<DiagnosticRecord>,
    entries_parsed: u64,
}

impl<R: BufRead> EntryParser<R> {
    pub fn new(scanner: LineScanner<R>, warn_on_blank_lines: bool) -> Self {
        Self {
            scanner,
            warn_on_blank_lines,
            current: None,
            pending_blank_lines: None,
            reported_text_before_first_entry: false,
            detail_cap: u64::MAX,
            buffered: BTreeMap::new(),
            unretained: BTreeMap::new(),
            diagnostics: Vec::new(),
            entries_parsed: 0,
        }
    }

    /// Buffer at most `cap` records per category; later ones are only counted
    #[must_use]
    pub fn with_detail_cap(mut self, cap: usize) -> Self {
        self.detail_cap = cap as u64;
        self
    }

    /// Read lines until an entry is complete.
    ///
    /// Returns `Ok(None)` once the input is exhausted and the final entry has
    /// been handed out.
    ///
    /// # Errors
    ///
    /// Returns `ScanError` if the underlying stream fails.
    pub fn next_entry(&mut self) -> Result<Option<ProteinEntry>, ScanError> {
        while let Some(line) = self.scanner.next_line()? {
            if line.text.starts_with(HEADER_MARKER) {
                let finished = self.finish_current();
                self.flush_blank_lines();
                self.start_entry(&line.text, line.number);
                if finished.is_some() {
                    return Ok(finished);
                }
                continue;
            }

            if is_blank_line(&line.text) {
                if self.current.is_some() {
                    // Pending blank lines are always consecutive
                    let first = self
                        .pending_blank_lines
                        .take()
                        .map_or(line.number, |run| *run.start());
                    self.pending_blank_lines = Some(first..=line.number);
                }
                continue;
            }

            if self.current.is_none() {
                if !self.reported_text_before_first_entry {
                    self.reported_text_before_first_entry = true;
                    self.report(
                        Category::TextBeforeFirstEntry,
                        line.number,
                        "line does not start with '>' and precedes the first entry",
                    );
                }
                continue;
            }

            self.flag_blank_lines_within_sequence();
            if let Some(entry) = self.current.as_mut() {
                entry.push_line(line.number, line.text);
            }
        }

        let finished = self.finish_current();
        self.flush_blank_lines();
        Ok(finished)
    }

    /// Take the structural findings gathered so far
    pub fn drain_diagnostics(&mut self) -> std::vec::Drain<'_, DiagnosticRecord> {
        self.diagnostics.drain(..)
    }

    /// Take the per-category counts of findings past the detail cap
    pub fn drain_unretained(&mut self) -> BTreeMap<Category, u64> {
        std::mem::take(&mut self.unretained)
    }

    #[must_use]
    pub fn entries_parsed(&self) -> u64 {
        self.entries_parsed
    }

    #[must_use]
    pub fn scanner(&self) -> &LineScanner<R> {
        &self.scanner
    }

    #[must_use]
    pub fn encoding(&self) -> TextEncoding {
        self.scanner.encoding()
    }

    fn start_entry(&mut self, header: &str, line_number: u64) {
        let entry = ProteinEntry::from_header(header, line_number);
        if entry.name.is_empty() {
            self.report(
                Category::MissingProteinName,
                line_number,
                "header has no protein name after '>'",
            );
        }
        self.current = Some(entry);
    }

    fn finish_current(&mut self) -> Option<ProteinEntry> {
        let entry = self.current.take()?;
        if !entry.has_residues() && self.admit(Category::EmptySequence) {
            self.diagnostics.push(DiagnosticRecord::new(
                Category::EmptySequence,
                entry.header_line_number,
                format!("entry '{}' has no residues", entry.name),
            ));
        }
        self.entries_parsed += 1;
        trace!(
            name = %entry.name,
            line = entry.header_line_number,
            "parsed entry"
        );
        Some(entry)
    }

    fn flush_blank_lines(&mut self) {
        let Some(blanks) = self.pending_blank_lines.take() else {
            return;
        };
        if !self.warn_on_blank_lines {
            return;
        }
        for number in blanks {
            self.report(
                Category::BlankLineBetweenEntries,
                number,
                "blank line between entries",
            );
        }
    }

    /// Blank lines followed by more residues sit inside the sequence
    fn flag_blank_lines_within_sequence(&mut self) {
        let Some(blanks) = self.pending_blank_lines.take() else {
            return;
        };
        let name = self
            .current
            .as_ref()
            .map(|entry| entry.name.clone())
            .unwrap_or_default();
        for number in blanks {
            if self.admit(Category::BlankLineWithinSequence) {
                self.diagnostics.push(DiagnosticRecord::new(
                    Category::BlankLineWithinSequence,
                    number,
                    format!("blank line inside the sequence of '{name}'"),
                ));
            }
        }
    }

    fn report(&mut self, category: Category, line_number: u64, message: &'static str) {
        if self.admit(category) {
            self.diagnostics
                .push(DiagnosticRecord::new(category, line_number, message));
        }
    }

    /// Whether a finding of `category` still fits under the detail cap
    fn admit(&mut self, category: Category) -> bool {
        let buffered = self.buffered.entry(category).or_default();
        if *buffered < self.detail_cap {
            *buffered += 1;
            true
        } else {
            *self.unretained.entry(category).or_default() += 1;
            false
        }
    }
}
