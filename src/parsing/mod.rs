//! Streaming FASTA readers.
//!
//! - [`lines`]: Forward-only line scanner with encoding detection
//! - [`entries`]: Groups lines into entries and reports structural defects
//!
//! ## Example
//!
//! ```rust
//! use fasta_validator::parsing::entries::EntryParser;
//! use fasta_validator::parsing::lines::LineScanner;
//! use std::io::Cursor;
//!
//! let scanner = LineScanner::new(Cursor::new(b">P1 desc\nACDE\n".to_vec())).unwrap();
//! let mut parser = EntryParser::new(scanner, true);
//!
//! let entry = parser.next_entry().unwrap().unwrap();
//! assert_eq!(entry.name, "P1");
//! assert!(parser.next_entry().unwrap().is_none());
//! ```

pub mod entries;
pub mod lines;
