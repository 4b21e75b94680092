//! Centralized character-class and path helpers.

use std::ffi::OsStr;
use std::path::Path;

/// Header line marker
pub const HEADER_MARKER: char = '>';

/// Gap character accepted in residue lines
pub const GAP_RESIDUE: char = '-';

/// Stop/terminator character, accepted only when enabled
pub const STOP_RESIDUE: char = '*';

/// Check whether a character is a legal residue.
///
/// Letters cover the amino-acid and IUPAC nucleotide codes in either case.
///
/// # Examples
///
/// ```
/// use fasta_validator::utils::validation::is_valid_residue;
///
/// assert!(is_valid_residue('M', false));
/// assert!(is_valid_residue('-', false));
/// assert!(!is_valid_residue('*', false));
/// assert!(is_valid_residue('*', true));
/// assert!(!is_valid_residue('1', true));
/// ```
#[must_use]
pub fn is_valid_residue(c: char, allow_asterisk: bool) -> bool {
    c.is_ascii_alphabetic() || c == GAP_RESIDUE || (allow_asterisk && c == STOP_RESIDUE)
}

/// Spaces and tabs inside a residue line
#[must_use]
pub fn is_residue_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Control characters other than tab, and the replacement character left
/// behind by bytes that were not valid UTF-8
#[must_use]
pub fn is_malformed_header_char(c: char) -> bool {
    (c.is_control() && c != '\t') || c == char::REPLACEMENT_CHARACTER
}

/// A line made only of spaces and tabs counts as blank
#[must_use]
pub fn is_blank_line(line: &str) -> bool {
    line.chars().all(is_residue_whitespace)
}

/// Render a character for a message, escaping anything non-printable
#[must_use]
pub fn describe_char(c: char) -> String {
    if c.is_control() || c == char::REPLACEMENT_CHARACTER {
        format!("U+{:04X}", u32::from(c))
    } else {
        format!("'{c}'")
    }
}

/// Check if the path has a FASTA extension
pub fn is_fasta_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();

    // Check for gzipped FASTA
    if [".fa", ".fasta", ".fna", ".faa"]
        .iter()
        .any(|ext| path_str.ends_with(&format!("{ext}.gz")) || path_str.ends_with(&format!("{ext}.bgz")))
    {
        return true;
    }

    matches!(
        path.extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .as_deref(),
        Some("fa" | "fasta" | "fna" | "faa")
    )
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}
