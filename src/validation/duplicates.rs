//! Duplicate sequence detection by content hash.
//!
//! Residues are normalized (whitespace dropped, uppercased) and streamed into
//! an MD5 context line by line, so no sequence is ever stored. Equal digests
//! are taken as equal sequences; a collision between distinct sequences
//! would surface as a false duplicate warning.
//!
//! Memory grows with the number of distinct sequences in the file: one
//! 16-byte digest plus the names that share it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::entry::ProteinEntry;
use crate::core::types::{Category, DiagnosticRecord};

/// MD5 digest of a normalized sequence
pub type SequenceDigest = [u8; 16];

/// Names sharing one sequence hash, as exported to the hash info file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceHashEntry {
    /// Lowercase hex MD5 of the normalized residues
    pub hash: String,
    pub sequence_length: u64,
    pub first_seen_name: String,
    pub additional_names: Vec<String>,
}

#[derive(Debug)]
struct HashSlot {
    order: usize,
    sequence_length: u64,
    first_seen_name: String,
    additional_names: Vec<String>,
}

#[derive(Debug, Default)]
pub struct DuplicateSequenceDetector {
    slots: HashMap<SequenceDigest, HashSlot>,
}

impl DuplicateSequenceDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct sequences seen
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Record an entry's sequence; returns a warning if it was seen before.
    ///
    /// Entries without residues are skipped.
    pub fn observe(&mut self, entry: &ProteinEntry) -> Option<DiagnosticRecord> {
        let (digest, sequence_length) = digest_residues(entry)?;

        if let Some(slot) = self.slots.get_mut(&digest) {
            slot.additional_names.push(entry.name.clone());
            return Some(DiagnosticRecord::new(
                Category::DuplicateSequenceContent,
                entry.header_line_number,
                format!(
                    "sequence of '{}' is identical to '{}'",
                    entry.name, slot.first_seen_name
                ),
            ));
        }

        let order = self.slots.len();
        self.slots.insert(
            digest,
            HashSlot {
                order,
                sequence_length,
                first_seen_name: entry.name.clone(),
                additional_names: Vec::new(),
            },
        );
        None
    }

    /// Hash entries in order of first appearance
    #[must_use]
    pub fn into_entries(self) -> Vec<SequenceHashEntry> {
        let mut slots: Vec<(SequenceDigest, HashSlot)> = self.slots.into_iter().collect();
        slots.sort_unstable_by_key(|(_, slot)| slot.order);
        slots
            .into_iter()
            .map(|(digest, slot)| SequenceHashEntry {
                hash: format!("{:x}", md5::Digest(digest)),
                sequence_length: slot.sequence_length,
                first_seen_name: slot.first_seen_name,
                additional_names: slot.additional_names,
            })
            .collect()
    }
}

/// Digest and residue count of the normalized sequence, `None` when empty
fn digest_residues(entry: &ProteinEntry) -> Option<(SequenceDigest, u64)> {
    let mut context = md5::Context::new();
    let mut normalized = Vec::new();
    let mut length = 0u64;

    for line in &entry.sequence_lines {
        normalized.clear();
        for c in line.residues.chars().filter(|c| !c.is_whitespace()) {
            for u in c.to_uppercase() {
                let mut utf8 = [0u8; 4];
                normalized.extend_from_slice(u.encode_utf8(&mut utf8).as_bytes());
            }
            length += 1;
        }
        context.consume(&normalized);
    }

    if length == 0 {
        return None;
    }
    Some((context.compute().0, length))
}
