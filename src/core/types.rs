use serde::{Deserialize, Serialize};

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Content judged non-conformant
    Error,
    /// Content judged stylistically or configuration-relative suspect
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "Error"),
            Self::Warning => write!(f, "Warning"),
        }
    }
}

/// The kind of defect a diagnostic describes.
///
/// Every category has exactly one severity, see [`Category::severity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Non-blank text appears before the first header line
    TextBeforeFirstEntry,
    /// Header marker followed directly by whitespace or end of line
    MissingProteinName,
    /// Entry with no residue lines
    EmptySequence,
    /// Same protein name used by an earlier entry
    DuplicateProteinName,
    /// Residue line contains a character outside the allowed alphabet
    InvalidResidueCharacter,
    /// Header line contains control characters or undecodable bytes
    MalformedHeader,
    /// Last line of the file has no line terminator
    MissingFinalLineTerminator,
    /// Blank line between the end of one entry and the next header
    BlankLineBetweenEntries,
    /// Blank line followed by more residues of the same entry
    BlankLineWithinSequence,
    /// Name shorter than the minimum or longer than the maximum length
    ProteinNameLengthOutOfRange,
    /// Residues identical to an earlier entry
    DuplicateSequenceContent,
    /// Spaces or tabs inside a residue line
    WhitespaceInResidues,
}

impl Category {
    /// All categories, errors first
    pub const ALL: [Category; 12] = [
        Category::TextBeforeFirstEntry,
        Category::MissingProteinName,
        Category::EmptySequence,
        Category::DuplicateProteinName,
        Category::InvalidResidueCharacter,
        Category::MalformedHeader,
        Category::MissingFinalLineTerminator,
        Category::BlankLineBetweenEntries,
        Category::BlankLineWithinSequence,
        Category::ProteinNameLengthOutOfRange,
        Category::DuplicateSequenceContent,
        Category::WhitespaceInResidues,
    ];

    /// Severity is fixed per category
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::TextBeforeFirstEntry
            | Self::MissingProteinName
            | Self::EmptySequence
            | Self::DuplicateProteinName
            | Self::InvalidResidueCharacter
            | Self::MalformedHeader => Severity::Error,
            Self::MissingFinalLineTerminator
            | Self::BlankLineBetweenEntries
            | Self::BlankLineWithinSequence
            | Self::ProteinNameLengthOutOfRange
            | Self::DuplicateSequenceContent
            | Self::WhitespaceInResidues => Severity::Warning,
        }
    }

    /// Human-readable label used in reports
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TextBeforeFirstEntry => "text before first entry",
            Self::MissingProteinName => "missing protein name",
            Self::EmptySequence => "empty sequence",
            Self::DuplicateProteinName => "duplicate protein name",
            Self::InvalidResidueCharacter => "invalid residue character",
            Self::MalformedHeader => "malformed header",
            Self::MissingFinalLineTerminator => "missing final line terminator",
            Self::BlankLineBetweenEntries => "blank line between entries",
            Self::BlankLineWithinSequence => "blank line within sequence",
            Self::ProteinNameLengthOutOfRange => "protein name length out of range",
            Self::DuplicateSequenceContent => "duplicate sequence content",
            Self::WhitespaceInResidues => "whitespace in residues",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Selects one category or every category when querying counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(Category),
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        Self::Only(category)
    }
}

/// Whether a count refers to every occurrence or only the retained details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountKind {
    /// Exact number of occurrences
    #[default]
    Total,
    /// Occurrences retained as detailed records
    Tracked,
}

/// A single classified finding. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    severity: Severity,
    category: Category,
    line_number: u64,
    message: String,
}

impl DiagnosticRecord {
    /// Create a record; the severity is taken from the category.
    pub fn new(category: Category, line_number: u64, message: impl Into<String>) -> Self {
        Self {
            severity: category.severity(),
            category,
            line_number,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// 1-based line number the finding is attributed to
    #[must_use]
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for DiagnosticRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at line {}: {}: {}",
            self.severity, self.line_number, self.category, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_split() {
        let errors: Vec<_> = Category::ALL
            .iter()
            .filter(|c| c.severity() == Severity::Error)
            .collect();
        assert_eq!(errors.len(), 6);
        assert_eq!(
            Category::ProteinNameLengthOutOfRange.severity(),
            Severity::Warning
        );
        assert_eq!(Category::DuplicateProteinName.severity(), Severity::Error);
        assert_eq!(
            Category::MissingFinalLineTerminator.severity(),
            Severity::Warning
        );
    }

    #[test]
    fn test_record_takes_category_severity() {
        let record = DiagnosticRecord::new(Category::MalformedHeader, 7, "control character");
        assert_eq!(record.severity(), Severity::Error);
        assert_eq!(record.line_number(), 7);
        assert_eq!(
            record.to_string(),
            "Error at line 7: malformed header: control character"
        );
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&Category::DuplicateSequenceContent).unwrap();
        assert_eq!(json, "\"duplicate_sequence_content\"");
    }
}
