//! Forward-only line reader.
//!
//! Reads raw bytes with `read_until`, so a file of any size is processed one
//! line at a time. Each line records its 1-based number, byte offset and
//! whether it ended with a terminator.

use std::io::BufRead;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF32_LE_BOM: &[u8] = &[0xFF, 0xFE, 0x00, 0x00];
const UTF32_BE_BOM: &[u8] = &[0x00, 0x00, 0xFE, 0xFF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported text encoding: {0}")]
    UnsupportedEncoding(&'static str),
}

/// Text encoding detected from the start of the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    /// No byte-order mark; read as UTF-8 (ASCII included)
    #[default]
    Plain,
    /// UTF-8 with a byte-order mark, which is skipped
    Utf8Bom,
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "utf-8"),
            Self::Utf8Bom => write!(f, "utf-8-bom"),
        }
    }
}

/// One line of input without its terminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number
    pub number: u64,
    /// Byte offset of the first byte of the line
    pub offset: u64,
    pub text: String,
    pub had_terminator: bool,
}

#[derive(Debug)]
pub struct LineScanner<R> {
    reader: R,
    buf: Vec<u8>,
    encoding: TextEncoding,
    line_number: u64,
    offset: u64,
    last_had_terminator: bool,
    exhausted: bool,
}

impl<R: BufRead> LineScanner<R> {
    /// Wrap a reader, consuming a UTF-8 byte-order mark if present.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::UnsupportedEncoding` if the stream starts with a
    /// UTF-16 or UTF-32 byte-order mark, or `ScanError::Io` on read failure.
    pub fn new(mut reader: R) -> Result<Self, ScanError> {
        let encoding = detect_encoding(&mut reader)?;
        let offset = if encoding == TextEncoding::Utf8Bom {
            reader.consume(UTF8_BOM.len());
            UTF8_BOM.len() as u64
        } else {
            0
        };

        Ok(Self {
            reader,
            buf: Vec::new(),
            encoding,
            line_number: 0,
            offset,
            last_had_terminator: true,
            exhausted: false,
        })
    }

    #[must_use]
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Lines handed out so far
    #[must_use]
    pub fn lines_read(&self) -> u64 {
        self.line_number
    }

    /// Bytes consumed so far, including any byte-order mark
    #[must_use]
    pub fn bytes_read(&self) -> u64 {
        self.offset
    }

    /// Line number of the final line if it lacked a terminator.
    ///
    /// Only meaningful once the scanner is exhausted.
    #[must_use]
    pub fn missing_final_terminator(&self) -> Option<u64> {
        if self.exhausted && self.line_number > 0 && !self.last_had_terminator {
            Some(self.line_number)
        } else {
            None
        }
    }

    /// Read the next line.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::Io` if the underlying reader fails.
    pub fn next_line(&mut self) -> Result<Option<Line>, ScanError> {
        if self.exhausted {
            return Ok(None);
        }

        self.buf.clear();
        let read = self.reader.read_until(b'\n', &mut self.buf)?;
        if read == 0 {
            self.exhausted = true;
            return Ok(None);
        }

        let offset = self.offset;
        self.offset += read as u64;
        self.line_number += 1;

        let had_terminator = self.buf.last() == Some(&b'\n');
        let mut content = self.buf.as_slice();
        if had_terminator {
            content = &content[..content.len() - 1];
            if content.last() == Some(&b'\r') {
                content = &content[..content.len() - 1];
            }
        }
        self.last_had_terminator = had_terminator;

        Ok(Some(Line {
            number: self.line_number,
            offset,
            text: String::from_utf8_lossy(content).into_owned(),
            had_terminator,
        }))
    }
}

impl<R: BufRead> Iterator for LineScanner<R> {
    type Item = Result<Line, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}

fn detect_encoding<R: BufRead>(reader: &mut R) -> Result<TextEncoding, ScanError> {
    let head = reader.fill_buf()?;
    // UTF-32 LE shares its first two bytes with UTF-16 LE, so test it first
    if head.starts_with(UTF32_LE_BOM) || head.starts_with(UTF32_BE_BOM) {
        return Err(ScanError::UnsupportedEncoding("UTF-32"));
    }
    if head.starts_with(UTF16_LE_BOM) || head.starts_with(UTF16_BE_BOM) {
        return Err(ScanError::UnsupportedEncoding("UTF-16"));
    }
    if head.starts_with(UTF8_BOM) {
        return Ok(TextEncoding::Utf8Bom);
    }
    Ok(TextEncoding::Plain)
}
