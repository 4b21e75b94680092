//! Per-entry content rules.
//!
//! Every rule runs on every entry; one entry can produce several findings.
//! The set of names seen so far belongs to the rule engine of a single run.

use std::collections::HashSet;

use crate::core::entry::{ProteinEntry, ResidueLine};
use crate::core::options::ValidationOptions;
use crate::core::types::{Category, DiagnosticRecord};
use crate::utils::validation::{
    describe_char, is_malformed_header_char, is_residue_whitespace, is_valid_residue,
};

/// Name length bounds and residue alphabet settings used by the rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSettings {
    pub minimum_name_length: usize,
    pub maximum_name_length: usize,
    pub allow_asterisk: bool,
}

impl From<&ValidationOptions> for RuleSettings {
    fn from(options: &ValidationOptions) -> Self {
        Self {
            minimum_name_length: options.minimum_name_length,
            maximum_name_length: options.maximum_name_length,
            allow_asterisk: options.allow_asterisk_in_residues,
        }
    }
}

#[derive(Debug)]
pub struct RuleEngine {
    settings: RuleSettings,
    seen_names: HashSet<String>,
}

impl RuleEngine {
    pub fn new(settings: RuleSettings) -> Self {
        Self {
            settings,
            seen_names: HashSet::new(),
        }
    }

    /// Number of distinct names seen in this run
    #[must_use]
    pub fn distinct_names(&self) -> usize {
        self.seen_names.len()
    }

    /// Apply every rule to `entry`, appending findings to `out`
    pub fn check(&mut self, entry: &ProteinEntry, out: &mut Vec<DiagnosticRecord>) {
        self.check_header(entry, out);
        self.check_name_length(entry, out);
        // Empty names are reported by the parser and never collide
        if !entry.name.is_empty() {
            self.check_name_uniqueness(entry, out);
        }
        for line in &entry.sequence_lines {
            self.check_residue_line(entry, line, out);
        }
    }

    fn check_header(&self, entry: &ProteinEntry, out: &mut Vec<DiagnosticRecord>) {
        let control = entry
            .name
            .chars()
            .chain(entry.description.chars())
            .find(|c| is_malformed_header_char(*c));

        if let Some(c) = control {
            out.push(DiagnosticRecord::new(
                Category::MalformedHeader,
                entry.header_line_number,
                format!(
                    "header of '{}' contains invalid character {}",
                    entry.name,
                    describe_char(c)
                ),
            ));
        }
    }

    fn check_name_length(&self, entry: &ProteinEntry, out: &mut Vec<DiagnosticRecord>) {
        let length = entry.name.chars().count();
        let RuleSettings {
            minimum_name_length: min,
            maximum_name_length: max,
            ..
        } = self.settings;

        if length < min || length > max {
            out.push(DiagnosticRecord::new(
                Category::ProteinNameLengthOutOfRange,
                entry.header_line_number,
                format!(
                    "protein name '{}' has {length} characters; expected {min} to {max}",
                    entry.name
                ),
            ));
        }
    }

    fn check_name_uniqueness(&mut self, entry: &ProteinEntry, out: &mut Vec<DiagnosticRecord>) {
        if self.seen_names.contains(&entry.name) {
            out.push(DiagnosticRecord::new(
                Category::DuplicateProteinName,
                entry.header_line_number,
                format!("protein name '{}' was already used", entry.name),
            ));
        } else {
            self.seen_names.insert(entry.name.clone());
        }
    }

    fn check_residue_line(
        &self,
        entry: &ProteinEntry,
        line: &ResidueLine,
        out: &mut Vec<DiagnosticRecord>,
    ) {
        let mut invalid: Vec<char> = Vec::new();
        let mut first_column = None;
        let mut has_whitespace = false;

        for (idx, c) in line.residues.chars().enumerate() {
            if is_residue_whitespace(c) {
                has_whitespace = true;
            } else if !is_valid_residue(c, self.settings.allow_asterisk) {
                first_column.get_or_insert(idx + 1);
                if !invalid.contains(&c) {
                    invalid.push(c);
                }
            }
        }

        if let Some(column) = first_column {
            let listed = invalid
                .iter()
                .map(|c| describe_char(*c))
                .collect::<Vec<_>>()
                .join(", ");
            out.push(DiagnosticRecord::new(
                Category::InvalidResidueCharacter,
                line.line_number,
                format!(
                    "invalid residue {listed} in '{}' (first at column {column})",
                    entry.name
                ),
            ));
        }

        if has_whitespace {
            out.push(DiagnosticRecord::new(
                Category::WhitespaceInResidues,
                line.line_number,
                format!("residue line of '{}' contains spaces or tabs", entry.name),
            ));
        }
    }
}
