//! The validation engine.
//!
//! - [`rules`]: Per-entry name, header and residue rules
//! - [`duplicates`]: Duplicate sequence detection by content hash
//! - [`tracker`]: Bounded diagnostic bookkeeping with exact totals
//! - [`report`]: The finished, queryable result of a run
//! - [`engine`]: The single-pass driver and the `process_file` entry point

pub mod duplicates;
pub mod engine;
pub mod report;
pub mod rules;
pub mod tracker;

pub use engine::{
    open_input, validate_path, validate_reader, CancellationToken, FastaValidator, ValidateError,
};
pub use report::{RunSummary, ValidationReport};
