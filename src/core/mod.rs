//! Core data types for FASTA validation.
//!
//! - [`types`]: Severities, defect categories and diagnostic records
//! - [`entry`]: A single FASTA entry as handed from the parser to the rules
//! - [`options`]: Run configuration and parameter file overrides

pub mod entry;
pub mod options;
pub mod types;
