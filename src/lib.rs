//! # fasta-validator
//!
//! A library for validating FASTA protein and nucleotide databases.
//!
//! Database files can hold millions of entries and run to many gigabytes, so
//! validation happens in one streaming pass: lines are read one at a time,
//! grouped into entries, checked, and dropped. Findings are classified by
//! category and severity and kept in a tracker that caps the retained detail
//! per category while keeping exact totals.
//!
//! ## Checks
//!
//! - **Structure**: text before the first entry, missing protein names, empty
//!   entries, blank lines, missing final line terminator
//! - **Names**: length bounds and uniqueness across the whole file
//! - **Residues**: letters and `-`, with `*` optionally allowed
//! - **Headers**: control characters and undecodable bytes
//! - **Duplicate sequences**: MD5 of the normalized residues
//!
//! ## Example
//!
//! ```rust,no_run
//! use fasta_validator::{CountKind, FastaValidator, Severity, ValidationOptions};
//! use std::path::Path;
//!
//! let options = ValidationOptions {
//!     allow_asterisk_in_residues: true,
//!     ..ValidationOptions::default()
//! };
//!
//! let mut validator = FastaValidator::new(options);
//! let succeeded = validator.process_file(Path::new("uniprot.fasta"), None);
//! assert!(succeeded);
//!
//! for i in 0..validator.error_count(CountKind::Tracked) as usize {
//!     println!("{}", validator.detailed_record(Severity::Error, i).unwrap());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Entries, options, severities and categories
//! - [`parsing`]: Line scanner and entry parser
//! - [`validation`]: Rules, duplicate detection, tracking and reports
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod parsing;
pub mod utils;
pub mod validation;

// Re-export commonly used types for convenience
pub use crate::core::entry::ProteinEntry;
pub use crate::core::options::ValidationOptions;
pub use crate::core::types::*;
pub use crate::validation::engine::{CancellationToken, FastaValidator, ValidateError};
pub use crate::validation::report::ValidationReport;
