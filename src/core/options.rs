//! Run configuration and the optional JSON parameter file.
//!
//! A parameter file holds any subset of the option keys. Keys that are present
//! replace the value set by the caller; absent keys leave it alone.
//!
//! ```json
//! {
//!   "allow_asterisk_in_residues": true,
//!   "maximum_name_length": 60
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_MAXIMUM_DETAILED_RECORDS: usize = 100;
pub const DEFAULT_MINIMUM_NAME_LENGTH: usize = 3;
pub const DEFAULT_MAXIMUM_NAME_LENGTH: usize = 34;

#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Failed to read parameter file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse parameter file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Minimum name length {minimum} exceeds maximum name length {maximum}")]
    InvalidNameLengthBounds { minimum: usize, maximum: usize },
}

/// Configuration for one validation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Harness writes a statistics file; no effect on validation itself
    pub output_to_stats_file: bool,

    /// Treat a missing final line terminator as auto-corrected instead of reporting it
    pub add_missing_line_feed_at_end_of_file: bool,

    /// Accept `*` as a residue character
    pub allow_asterisk_in_residues: bool,

    /// Warn about blank lines between entries
    pub warn_on_blank_lines_between_entries: bool,

    /// Keep the hash to names mapping in the report so the harness can save it
    pub save_sequence_hash_info: bool,

    /// Cap on detailed records retained per category. Totals are always exact.
    pub maximum_detailed_records_per_category: usize,

    pub minimum_name_length: usize,
    pub maximum_name_length: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            output_to_stats_file: false,
            add_missing_line_feed_at_end_of_file: false,
            allow_asterisk_in_residues: false,
            warn_on_blank_lines_between_entries: true,
            save_sequence_hash_info: false,
            maximum_detailed_records_per_category: DEFAULT_MAXIMUM_DETAILED_RECORDS,
            minimum_name_length: DEFAULT_MINIMUM_NAME_LENGTH,
            maximum_name_length: DEFAULT_MAXIMUM_NAME_LENGTH,
        }
    }
}

impl ValidationOptions {
    /// Check that the options are usable for a run
    ///
    /// # Errors
    ///
    /// Returns `OptionsError::InvalidNameLengthBounds` if the minimum name
    /// length is greater than the maximum.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.minimum_name_length > self.maximum_name_length {
            return Err(OptionsError::InvalidNameLengthBounds {
                minimum: self.minimum_name_length,
                maximum: self.maximum_name_length,
            });
        }
        Ok(())
    }

    /// Apply a parameter file on top of these options
    ///
    /// # Errors
    ///
    /// Returns `OptionsError::Read` or `OptionsError::Parse` if the file cannot
    /// be loaded, or `OptionsError::InvalidNameLengthBounds` if the merged
    /// options are inconsistent.
    pub fn with_parameter_file(&self, path: &Path) -> Result<Self, OptionsError> {
        let overrides = OptionOverrides::load_from_file(path)?;
        let merged = overrides.apply(self);
        merged.validate()?;
        Ok(merged)
    }
}

/// Contents of a parameter file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_to_stats_file: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_missing_line_feed_at_end_of_file: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_asterisk_in_residues: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warn_on_blank_lines_between_entries: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_sequence_hash_info: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_detailed_records_per_category: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_name_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_name_length: Option<usize>,
}

impl OptionOverrides {
    /// Load overrides from a JSON parameter file
    ///
    /// # Errors
    ///
    /// Returns `OptionsError::Read` if the file cannot be read or
    /// `OptionsError::Parse` if it is not a valid parameter object.
    pub fn load_from_file(path: &Path) -> Result<Self, OptionsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse overrides from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `OptionsError::Parse` on malformed JSON or unknown keys.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Every key set to the value in `options`; used to export a template
    #[must_use]
    pub fn from_options(options: &ValidationOptions) -> Self {
        Self {
            output_to_stats_file: Some(options.output_to_stats_file),
            add_missing_line_feed_at_end_of_file: Some(options.add_missing_line_feed_at_end_of_file),
            allow_asterisk_in_residues: Some(options.allow_asterisk_in_residues),
            warn_on_blank_lines_between_entries: Some(options.warn_on_blank_lines_between_entries),
            save_sequence_hash_info: Some(options.save_sequence_hash_info),
            maximum_detailed_records_per_category: Some(
                options.maximum_detailed_records_per_category,
            ),
            minimum_name_length: Some(options.minimum_name_length),
            maximum_name_length: Some(options.maximum_name_length),
        }
    }

    /// Merge onto `base`: present keys win, absent keys keep the base value
    #[must_use]
    pub fn apply(&self, base: &ValidationOptions) -> ValidationOptions {
        ValidationOptions {
            output_to_stats_file: self
                .output_to_stats_file
                .unwrap_or(base.output_to_stats_file),
            add_missing_line_feed_at_end_of_file: self
                .add_missing_line_feed_at_end_of_file
                .unwrap_or(base.add_missing_line_feed_at_end_of_file),
            allow_asterisk_in_residues: self
                .allow_asterisk_in_residues
                .unwrap_or(base.allow_asterisk_in_residues),
            warn_on_blank_lines_between_entries: self
                .warn_on_blank_lines_between_entries
                .unwrap_or(base.warn_on_blank_lines_between_entries),
            save_sequence_hash_info: self
                .save_sequence_hash_info
                .unwrap_or(base.save_sequence_hash_info),
            maximum_detailed_records_per_category: self
                .maximum_detailed_records_per_category
                .unwrap_or(base.maximum_detailed_records_per_category),
            minimum_name_length: self.minimum_name_length.unwrap_or(base.minimum_name_length),
            maximum_name_length: self.maximum_name_length.unwrap_or(base.maximum_name_length),
        }
    }
}
