use std::ops::RangeInclusive;

/// One residue line of an entry, kept as read so diagnostics can point at it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidueLine {
    pub line_number: u64,
    pub residues: String,
}

/// A header line plus the residue lines that follow it.
///
/// Entries are transient: the parser hands out one at a time and they are
/// dropped once the rules and the duplicate detector have seen them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProteinEntry {
    /// Header token up to the first whitespace. Empty only for a malformed header.
    pub name: String,

    /// Remainder of the header line, may be empty
    pub description: String,

    /// 1-based line number of the header
    pub header_line_number: u64,

    /// Residue lines in file order, not concatenated
    pub sequence_lines: Vec<ResidueLine>,
}

impl ProteinEntry {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        header_line_number: u64,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            header_line_number,
            sequence_lines: Vec::new(),
        }
    }

    /// Build an entry from a header line (with or without the leading `>`)
    #[must_use]
    pub fn from_header(header: &str, header_line_number: u64) -> Self {
        let (name, description) = split_header(header);
        Self::new(name, description, header_line_number)
    }

    pub fn push_line(&mut self, line_number: u64, residues: impl Into<String>) {
        self.sequence_lines.push(ResidueLine {
            line_number,
            residues: residues.into(),
        });
    }

    /// First and last residue line numbers, `None` for an empty entry
    #[must_use]
    pub fn sequence_line_range(&self) -> Option<RangeInclusive<u64>> {
        let first = self.sequence_lines.first()?;
        let last = self.sequence_lines.last()?;
        Some(first.line_number..=last.line_number)
    }

    #[must_use]
    pub fn has_residues(&self) -> bool {
        !self.sequence_lines.is_empty()
    }

    /// Number of residues, not counting whitespace
    #[must_use]
    pub fn residue_count(&self) -> u64 {
        self.sequence_lines
            .iter()
            .map(|l| l.residues.chars().filter(|c| !c.is_whitespace()).count() as u64)
            .sum()
    }
}

/// Split a header line into name and description.
///
/// The name runs up to the first whitespace character; the description is
/// whatever follows, with leading whitespace removed. A header with no
/// separator has an empty description.
#[must_use]
pub fn split_header(header: &str) -> (&str, &str) {
    let body = header.strip_prefix('>').unwrap_or(header);
    match body.find(char::is_whitespace) {
        Some(idx) => (&body[..idx], body[idx..].trim_start()),
        None => (body, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_header() {
        assert_eq!(split_header(">P12345 Some protein"), ("P12345", "Some protein"));
        assert_eq!(split_header(">P12345"), ("P12345", ""));
        assert_eq!(split_header(">P1\tdesc  here"), ("P1", "desc  here"));
        assert_eq!(split_header(">P1   spaced"), ("P1", "spaced"));
    }

    #[test]
    fn test_split_header_unicode_whitespace() {
        assert_eq!(split_header(">PRO1\u{00A0}desc"), ("PRO1", "desc"));
        assert_eq!(
            split_header(">PRO1\u{2003}\u{00A0} wide gap"),
            ("PRO1", "wide gap")
        );
    }

    #[test]
    fn test_split_header_missing_name() {
        assert_eq!(split_header(">"), ("", ""));
        assert_eq!(split_header("> described"), ("", "described"));
    }

    #[test]
    fn test_sequence_line_range() {
        let mut entry = ProteinEntry::from_header(">P1 desc", 4);
        assert_eq!(entry.sequence_line_range(), None);
        assert!(!entry.has_residues());

        entry.push_line(5, "ACDE");
        entry.push_line(6, "FG H");
        assert_eq!(entry.sequence_line_range(), Some(5..=6));
        assert_eq!(entry.residue_count(), 7);
    }
}
