//! Validation run driver.
//!
//! A [`FastaValidator`] owns everything one run accumulates: the rule engine
//! and its name set, the duplicate detector and the diagnostic tracker. Runs
//! over different files use separate validators and never share that state.
//!
//! Memory stays flat in the size of individual entries, but the name set and
//! the sequence hash map grow with the number of entries in the file. That
//! is the ceiling for very large databases.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use flate2::read::MultiGzDecoder;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::options::{OptionsError, ValidationOptions};
use crate::core::types::{Category, CountKind, DiagnosticRecord, Severity};
use crate::parsing::entries::EntryParser;
use crate::parsing::lines::{LineScanner, ScanError};
use crate::utils::validation::is_gzipped;
use crate::validation::duplicates::DuplicateSequenceDetector;
use crate::validation::report::{RunSummary, ValidationReport};
use crate::validation::rules::{RuleEngine, RuleSettings};
use crate::validation::tracker::{DiagnosticTracker, IndexOutOfBounds};

#[derive(Error, Debug)]
pub enum ValidateError {
    #[error("Cannot open input file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("Invalid options: {0}")]
    Options(#[from] OptionsError),

    #[error("cancelled")]
    Cancelled,
}

/// Cooperative cancellation flag, checked between entries
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Open a FASTA file, decompressing `.gz`/`.bgz` inputs
///
/// # Errors
///
/// Returns `ValidateError::Open` if the file cannot be opened.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>, ValidateError> {
    let file = File::open(path).map_err(|source| ValidateError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Validate a FASTA stream in a single pass.
///
/// Content defects end up in the returned report; only stream failures,
/// invalid options and cancellation are errors.
///
/// # Errors
///
/// Returns `ValidateError::Options` for inconsistent options,
/// `ValidateError::Scan` on read failure or unsupported encoding, and
/// `ValidateError::Cancelled` if `cancel` was triggered.
pub fn validate_reader<R: BufRead>(
    reader: R,
    options: &ValidationOptions,
    cancel: &CancellationToken,
) -> Result<ValidationReport, ValidateError> {
    options.validate()?;

    let scanner = LineScanner::new(reader)?;
    debug!(encoding = %scanner.encoding(), "detected text encoding");

    let mut parser = EntryParser::new(scanner, options.warn_on_blank_lines_between_entries)
        .with_detail_cap(options.maximum_detailed_records_per_category);
    let mut rules = RuleEngine::new(RuleSettings::from(options));
    let mut duplicates = DuplicateSequenceDetector::new();
    let mut tracker = DiagnosticTracker::new(options.maximum_detailed_records_per_category);
    let mut batch: Vec<DiagnosticRecord> = Vec::new();
    let mut residues = 0u64;

    loop {
        if cancel.is_cancelled() {
            warn!(entries = parser.entries_parsed(), "validation cancelled");
            return Err(ValidateError::Cancelled);
        }

        let Some(entry) = parser.next_entry()? else {
            break;
        };

        batch.extend(parser.drain_diagnostics());
        rules.check(&entry, &mut batch);
        batch.extend(duplicates.observe(&entry));
        residues += entry.residue_count();

        // Parser findings can trail the rule findings of an earlier line
        batch.sort_by_key(DiagnosticRecord::line_number);
        for record in batch.drain(..) {
            tracker.record(record);
        }
        for (category, occurrences) in parser.drain_unretained() {
            tracker.count_unretained(category, occurrences);
        }
    }

    for record in parser.drain_diagnostics() {
        tracker.record(record);
    }
    for (category, occurrences) in parser.drain_unretained() {
        tracker.count_unretained(category, occurrences);
    }

    let scanner = parser.scanner();
    if let Some(line) = scanner.missing_final_terminator() {
        if options.add_missing_line_feed_at_end_of_file {
            debug!(line, "final line terminator missing; treated as corrected");
        } else {
            tracker.record(DiagnosticRecord::new(
                Category::MissingFinalLineTerminator,
                line,
                "last line of the file has no line terminator",
            ));
        }
    }

    let summary = RunSummary {
        entries: parser.entries_parsed(),
        lines: scanner.lines_read(),
        residues,
        bytes: scanner.bytes_read(),
        distinct_sequences: duplicates.len() as u64,
        encoding: scanner.encoding(),
    };

    let sequence_hashes = if options.save_sequence_hash_info {
        duplicates.into_entries()
    } else {
        Vec::new()
    };

    let (counts, errors, warnings) = tracker.into_parts();
    let report = ValidationReport {
        succeeded: true,
        counts,
        errors,
        warnings,
        fatal_error_message: None,
        summary,
        sequence_hashes,
    };

    info!(
        entries = summary.entries,
        errors = report.error_count(CountKind::Total),
        warnings = report.warning_count(CountKind::Total),
        "validation complete"
    );

    Ok(report)
}

/// Validate a FASTA file on disk
///
/// # Errors
///
/// Same as [`validate_reader`], plus `ValidateError::Open` if the file
/// cannot be opened.
pub fn validate_path(
    path: &Path,
    options: &ValidationOptions,
    cancel: &CancellationToken,
) -> Result<ValidationReport, ValidateError> {
    debug!(path = %path.display(), "validating");
    let reader = open_input(path)?;
    validate_reader(reader, options, cancel)
}

/// One validation run context with the query surface over its result.
///
/// ```rust,no_run
/// use fasta_validator::{CountKind, FastaValidator, Severity, ValidationOptions};
/// use std::path::Path;
///
/// let mut validator = FastaValidator::new(ValidationOptions::default());
/// if validator.process_file(Path::new("proteins.fasta"), None) {
///     println!("{} errors", validator.error_count(CountKind::Total));
///     if let Ok(message) = validator.detailed_record(Severity::Error, 0) {
///         println!("{message}");
///     }
/// } else {
///     eprintln!("{}", validator.fatal_error_message().unwrap_or_default());
/// }
/// ```
#[derive(Debug)]
pub struct FastaValidator {
    options: ValidationOptions,
    effective_options: ValidationOptions,
    cancel: CancellationToken,
    report: Option<ValidationReport>,
}

impl FastaValidator {
    pub fn new(options: ValidationOptions) -> Self {
        Self {
            effective_options: options.clone(),
            options,
            cancel: CancellationToken::new(),
            report: None,
        }
    }

    /// Use an externally owned cancellation token
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that cancels runs of this validator
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Options as set by the caller
    #[must_use]
    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Options used by the last run, after applying any parameter file
    #[must_use]
    pub fn effective_options(&self) -> &ValidationOptions {
        &self.effective_options
    }

    /// Validate `input`, applying `parameter_file` over the caller's options.
    ///
    /// Returns true when the whole file was read, whatever defects it has.
    /// On false, [`fatal_error_message`](Self::fatal_error_message) says why.
    pub fn process_file(&mut self, input: &Path, parameter_file: Option<&Path>) -> bool {
        let report = match self.run(input, parameter_file) {
            Ok(report) => report,
            Err(e) => {
                warn!(path = %input.display(), "validation failed: {e}");
                ValidationReport::fatal(e.to_string())
            }
        };
        let succeeded = report.succeeded;
        self.report = Some(report);
        succeeded
    }

    fn run(
        &mut self,
        input: &Path,
        parameter_file: Option<&Path>,
    ) -> Result<ValidationReport, ValidateError> {
        self.effective_options = self.options.clone();
        if let Some(path) = parameter_file {
            self.effective_options = self.options.with_parameter_file(path)?;
        }
        validate_path(input, &self.effective_options, &self.cancel)
    }

    /// Report of the last run
    #[must_use]
    pub fn report(&self) -> Option<&ValidationReport> {
        self.report.as_ref()
    }

    /// Take ownership of the last report
    pub fn take_report(&mut self) -> Option<ValidationReport> {
        self.report.take()
    }

    #[must_use]
    pub fn error_count(&self, kind: CountKind) -> u64 {
        self.report.as_ref().map_or(0, |r| r.error_count(kind))
    }

    #[must_use]
    pub fn warning_count(&self, kind: CountKind) -> u64 {
        self.report.as_ref().map_or(0, |r| r.warning_count(kind))
    }

    /// Formatted detailed record of `severity` at `index`
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfBounds` if no such record was retained, including
    /// when no run has happened yet.
    pub fn detailed_record(
        &self,
        severity: Severity,
        index: usize,
    ) -> Result<String, IndexOutOfBounds> {
        match &self.report {
            Some(report) => report
                .detailed_record(severity, index)
                .map(ToString::to_string),
            None => Err(IndexOutOfBounds {
                severity,
                index,
                available: 0,
            }),
        }
    }

    /// Why the last run failed; `None` if it succeeded or none has run
    #[must_use]
    pub fn fatal_error_message(&self) -> Option<&str> {
        self.report.as_ref().and_then(ValidationReport::fatal_error_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CategoryFilter;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    fn validate(input: &str, options: &ValidationOptions) -> ValidationReport {
        validate_reader(
            Cursor::new(input.as_bytes().to_vec()),
            options,
            &CancellationToken::new(),
        )
        .unwrap()
    }

    fn lines_of(report: &ValidationReport, severity: Severity) -> Vec<(Category, u64)> {
        report
            .records(severity)
            .iter()
            .map(|r| (r.category(), r.line_number()))
            .collect()
    }

    #[test]
    fn test_clean_file() {
        let report = validate(
            ">PROT1 first\nACDEFGHIK\nLMNPQ\n>PROT2 second\nRSTVWY\n",
            &ValidationOptions::default(),
        );
        assert!(report.succeeded);
        assert_eq!(report.error_count(CountKind::Total), 0);
        assert_eq!(report.warning_count(CountKind::Total), 0);
        assert_eq!(report.summary.entries, 2);
        assert_eq!(report.summary.lines, 5);
        assert_eq!(report.summary.residues, 20);
        assert_eq!(report.summary.distinct_sequences, 2);
    }

    #[test]
    fn test_records_follow_line_order() {
        let input = ">PRO1\nAC1\n\n>PRO2\nAC2\n";
        let report = validate(input, &ValidationOptions::default());
        assert_eq!(
            lines_of(&report, Severity::Error),
            vec![
                (Category::InvalidResidueCharacter, 2),
                (Category::InvalidResidueCharacter, 5)
            ]
        );
        assert_eq!(
            lines_of(&report, Severity::Warning),
            vec![(Category::BlankLineBetweenEntries, 3)]
        );
    }

    #[test]
    fn test_missing_final_terminator() {
        let options = ValidationOptions::default();
        let report = validate(">PRO1\nACDE", &options);
        assert_eq!(
            lines_of(&report, Severity::Warning),
            vec![(Category::MissingFinalLineTerminator, 2)]
        );

        let options = ValidationOptions {
            add_missing_line_feed_at_end_of_file: true,
            ..ValidationOptions::default()
        };
        let report = validate(">PRO1\nACDE", &options);
        assert_eq!(report.warning_count(CountKind::Total), 0);
    }

    #[test]
    fn test_cancelled_before_start() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = validate_reader(
            Cursor::new(b">PRO1\nACDE\n".to_vec()),
            &ValidationOptions::default(),
            &cancel,
        );
        assert!(matches!(result, Err(ValidateError::Cancelled)));
    }

    /// Reader that trips a cancellation token once `trip_at` bytes are consumed
    struct CancelAfter {
        inner: Cursor<Vec<u8>>,
        trip_at: u64,
        cancel: CancellationToken,
    }

    impl std::io::Read for CancelAfter {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = std::io::Read::read(&mut self.inner, buf)?;
            self.trip();
            Ok(n)
        }
    }

    impl CancelAfter {
        fn trip(&self) {
            if self.inner.position() >= self.trip_at {
                self.cancel.cancel();
            }
        }
    }

    impl BufRead for CancelAfter {
        fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
            self.inner.fill_buf()
        }

        fn consume(&mut self, amt: usize) {
            self.inner.consume(amt);
            self.trip();
        }
    }

    #[test]
    fn test_cancelled_between_entries() {
        let input = b">PRO1\nACDE\n>PRO2\nFGHI\n>PRO3\nKLMN\n".to_vec();
        let cancel = CancellationToken::new();
        let reader = CancelAfter {
            inner: Cursor::new(input),
            // Just past the first entry's residue line
            trip_at: 11,
            cancel: cancel.clone(),
        };

        let result = validate_reader(reader, &ValidationOptions::default(), &cancel);
        assert!(matches!(result, Err(ValidateError::Cancelled)));
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn test_parser_overflow_reaches_totals() {
        let mut input = String::from(">PRO1\nACDE\n");
        input.push_str(&"\n".repeat(5_000));
        input.push_str(">PRO2\nFGHI\n");

        let options = ValidationOptions {
            maximum_detailed_records_per_category: 1,
            ..ValidationOptions::default()
        };
        let report = validate(&input, &options);
        let tally = report.counts.tally(Category::BlankLineBetweenEntries);
        assert_eq!(tally.total, 5_000);
        assert_eq!(tally.retained, 1);
        assert_eq!(
            lines_of(&report, Severity::Warning),
            vec![(Category::BlankLineBetweenEntries, 3)]
        );
    }

    #[test]
    fn test_invalid_options_are_fatal() {
        let options = ValidationOptions {
            minimum_name_length: 9,
            maximum_name_length: 2,
            ..ValidationOptions::default()
        };
        let result = validate_reader(Cursor::new(Vec::new()), &options, &CancellationToken::new());
        assert!(matches!(result, Err(ValidateError::Options(_))));
    }

    #[test]
    fn test_hash_info_only_when_requested() {
        let input = ">PRO1\nACDE\n>PRO2\nACDE\n";
        let report = validate(input, &ValidationOptions::default());
        assert!(report.sequence_hashes.is_empty());

        let options = ValidationOptions {
            save_sequence_hash_info: true,
            ..ValidationOptions::default()
        };
        let report = validate(input, &options);
        assert_eq!(report.sequence_hashes.len(), 1);
        assert_eq!(report.sequence_hashes[0].additional_names, vec!["PRO2"]);
    }

    #[test]
    fn test_process_file_with_gzip_input() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let mut temp = NamedTempFile::with_suffix(".fasta.gz").unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b">PRO1\nACDE\n>PRO1\nFGHI\n").unwrap();
        temp.write_all(&encoder.finish().unwrap()).unwrap();
        temp.flush().unwrap();

        let mut validator = FastaValidator::new(ValidationOptions::default());
        assert!(validator.process_file(temp.path(), None));
        assert_eq!(validator.error_count(CountKind::Total), 1);
        assert_eq!(
            validator
                .report()
                .unwrap()
                .total_count(Severity::Error, Category::DuplicateProteinName.into()),
            1
        );
    }

    #[test]
    fn test_process_file_missing_input() {
        let mut validator = FastaValidator::new(ValidationOptions::default());
        assert!(!validator.process_file(Path::new("/nonexistent/input.fasta"), None));
        let message = validator.fatal_error_message().unwrap();
        assert!(message.contains("/nonexistent/input.fasta"));
        assert_eq!(validator.error_count(CountKind::Total), 0);
        assert_eq!(validator.warning_count(CountKind::Total), 0);
    }

    #[test]
    fn test_process_file_applies_parameter_file() {
        let mut input = NamedTempFile::with_suffix(".fasta").unwrap();
        input.write_all(b">PRO1\nACDE*\n").unwrap();
        input.flush().unwrap();

        let mut params = NamedTempFile::with_suffix(".json").unwrap();
        params
            .write_all(br#"{"allow_asterisk_in_residues": true}"#)
            .unwrap();
        params.flush().unwrap();

        let mut validator = FastaValidator::new(ValidationOptions::default());
        assert!(validator.process_file(input.path(), None));
        assert_eq!(validator.error_count(CountKind::Total), 1);

        assert!(validator.process_file(input.path(), Some(params.path())));
        assert_eq!(validator.error_count(CountKind::Total), 0);
        assert!(validator.effective_options().allow_asterisk_in_residues);
        assert!(!validator.options().allow_asterisk_in_residues);
    }

    #[test]
    fn test_process_file_bad_parameter_file() {
        let mut input = NamedTempFile::with_suffix(".fasta").unwrap();
        input.write_all(b">PRO1\nACDE\n").unwrap();
        input.flush().unwrap();

        let mut params = NamedTempFile::with_suffix(".json").unwrap();
        params.write_all(b"not json").unwrap();
        params.flush().unwrap();

        let mut validator = FastaValidator::new(ValidationOptions::default());
        assert!(!validator.process_file(input.path(), Some(params.path())));
        assert!(validator
            .fatal_error_message()
            .unwrap()
            .contains("parameter file"));
    }

    #[test]
    fn test_bad_parameter_file_resets_effective_options() {
        let mut input = NamedTempFile::with_suffix(".fasta").unwrap();
        input.write_all(b">PRO1\nACDE\n").unwrap();
        input.flush().unwrap();

        let mut good = NamedTempFile::with_suffix(".json").unwrap();
        good.write_all(br#"{"allow_asterisk_in_residues": true}"#).unwrap();
        good.flush().unwrap();

        let mut bad = NamedTempFile::with_suffix(".json").unwrap();
        bad.write_all(b"{ broken").unwrap();
        bad.flush().unwrap();

        let mut validator = FastaValidator::new(ValidationOptions::default());
        assert!(validator.process_file(input.path(), Some(good.path())));
        assert!(validator.effective_options().allow_asterisk_in_residues);

        assert!(!validator.process_file(input.path(), Some(bad.path())));
        assert_eq!(validator.effective_options(), validator.options());
    }

    #[test]
    fn test_detailed_record_formatting_and_bounds() {
        let mut input = NamedTempFile::with_suffix(".fasta").unwrap();
        input.write_all(b">PRO1\n").unwrap();
        input.flush().unwrap();

        let mut validator = FastaValidator::new(ValidationOptions::default());
        assert!(validator.detailed_record(Severity::Error, 0).is_err());

        assert!(validator.process_file(input.path(), None));
        let message = validator.detailed_record(Severity::Error, 0).unwrap();
        assert!(message.starts_with("Error at line 1: empty sequence"));
        assert!(validator.detailed_record(Severity::Error, 1).is_err());
        assert_eq!(
            validator
                .report()
                .unwrap()
                .total_count(Severity::Error, CategoryFilter::All),
            1
        );
    }

    #[test]
    fn test_cancelled_process_file() {
        let mut input = NamedTempFile::with_suffix(".fasta").unwrap();
        input.write_all(b">PRO1\nACDE\n").unwrap();
        input.flush().unwrap();

        let mut validator = FastaValidator::new(ValidationOptions::default());
        validator.cancellation_token().cancel();
        assert!(!validator.process_file(input.path(), None));
        assert_eq!(validator.fatal_error_message(), Some("cancelled"));
    }
}
