//! Parse adapter: bytes to [`XmlDocument`]
//!
//! Input bytes are decoded with each candidate encoding in order; the first
//! candidate that both decodes and yields a document with a root element wins.
//! Decoding happens here rather than inside libxml2 so that "does this
//! encoding fit" is an explicit, testable decision.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::XmlDocument;
use crate::error::{ExtractError, Result};
use crate::error_reporter::{ExtractionReporter, ExtractionWarning};
use crate::libxml2::LibXml2Wrapper;
use crate::normalize::normalize;

/// Candidate text encodings understood by [`XmlParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Encoding {
    Utf8,
    /// Byte order from the BOM, little endian without one
    Utf16,
    Utf16Le,
    Utf16Be,
    Latin1,
    Windows1252,
}

/// Default candidate order.
pub const DEFAULT_ENCODINGS: [Encoding; 3] = [Encoding::Utf8, Encoding::Utf16, Encoding::Latin1];

/// Code points for bytes 0x80..=0x9F in windows-1252; `None` marks undefined bytes.
const WINDOWS_1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'), None, Some('\u{201A}'), Some('\u{0192}'),
    Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None, Some('\u{017D}'), None,
    None, Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
    Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
    Some('\u{0153}'), None, Some('\u{017E}'), Some('\u{0178}'),
];

impl Encoding {
    pub fn label(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Utf16 => "utf-16",
            Encoding::Utf16Le => "utf-16le",
            Encoding::Utf16Be => "utf-16be",
            Encoding::Latin1 => "latin-1",
            Encoding::Windows1252 => "cp1252",
        }
    }

    /// Decode `bytes`, or `None` if they are not valid in this encoding.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Encoding::Utf8 => {
                let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                std::str::from_utf8(bytes).ok().map(str::to_owned)
            }
            Encoding::Utf16 => match bytes {
                [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
                [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
                _ => decode_utf16(bytes, u16::from_le_bytes),
            },
            Encoding::Utf16Le => {
                let bytes = bytes.strip_prefix(&[0xFF, 0xFE]).unwrap_or(bytes);
                decode_utf16(bytes, u16::from_le_bytes)
            }
            Encoding::Utf16Be => {
                let bytes = bytes.strip_prefix(&[0xFE, 0xFF]).unwrap_or(bytes);
                decode_utf16(bytes, u16::from_be_bytes)
            }
            Encoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            Encoding::Windows1252 => bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => WINDOWS_1252_HIGH[usize::from(b - 0x80)],
                    _ => Some(char::from(b)),
                })
                .collect(),
        }
    }

    /// Parse a comma-separated list such as `utf-8,utf-16,latin-1`.
    pub fn parse_list(list: &str) -> std::result::Result<Vec<Encoding>, String> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
    char::decode_utf16(units).collect::<std::result::Result<String, _>>().ok()
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match normalize(s.trim()).as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "utf-16" | "utf16" => Ok(Encoding::Utf16),
            "utf-16le" | "utf-16-le" => Ok(Encoding::Utf16Le),
            "utf-16be" | "utf-16-be" => Ok(Encoding::Utf16Be),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(Encoding::Latin1),
            "cp1252" | "windows-1252" => Ok(Encoding::Windows1252),
            _ => Err(format!("Unsupported encoding: {}", s)),
        }
    }
}

impl TryFrom<String> for Encoding {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Encoding> for String {
    fn from(encoding: Encoding) -> Self {
        encoding.label().to_string()
    }
}

/// Encoding-aware, error-recovering XML parser.
pub struct XmlParser {
    wrapper: LibXml2Wrapper,
    encodings: Vec<Encoding>,
}

impl XmlParser {
    pub fn new() -> Self {
        Self::with_encodings(DEFAULT_ENCODINGS.to_vec())
    }

    pub fn with_encodings(encodings: Vec<Encoding>) -> Self {
        Self {
            wrapper: LibXml2Wrapper::new(),
            encodings,
        }
    }

    pub fn encodings(&self) -> &[Encoding] {
        &self.encodings
    }

    /// Read and parse a file.
    ///
    /// # Errors
    ///
    /// `FileNotFound`, `NotAFile` or `Read` when the file cannot be read;
    /// `ParseFailure` when no candidate encoding produced a document.
    pub fn parse_file(
        &self,
        path: &Path,
        reporter: &dyn ExtractionReporter,
    ) -> Result<XmlDocument> {
        if !path.exists() {
            return Err(ExtractError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        if !path.is_file() {
            return Err(ExtractError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let bytes = std::fs::read(path).map_err(|source| ExtractError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        self.parse_bytes(&bytes, &path.display().to_string(), reporter)
    }

    /// Parse in-memory bytes, trying each candidate encoding in order.
    pub fn parse_bytes(
        &self,
        bytes: &[u8],
        source_name: &str,
        reporter: &dyn ExtractionReporter,
    ) -> Result<XmlDocument> {
        let mut failures = Vec::new();

        for &encoding in &self.encodings {
            let Some(text) = encoding.decode(bytes) else {
                tracing::debug!(%encoding, source = source_name, "input does not decode");
                failures.push(format!("{}: undecodable", encoding));
                continue;
            };

            match self.wrapper.parse_document(text.as_bytes(), source_name) {
                Ok(parsed) => {
                    tracing::debug!(%encoding, source = source_name, "parsed document");
                    if let Some(error) = parsed.recovered_error {
                        reporter.warning(&ExtractionWarning::RecoveredMalformedXml {
                            line: error.line,
                            details: error.message,
                        });
                    }
                    return Ok(parsed.document);
                }
                Err(e) if !e.is_document_error() => return Err(e.into()),
                Err(e) => {
                    tracing::debug!(%encoding, source = source_name, error = %e, "parse attempt failed");
                    failures.push(format!("{}: {}", encoding, e));
                }
            }
        }

        let details = if failures.is_empty() {
            "no candidate encodings configured".to_string()
        } else {
            failures.join("; ")
        };
        Err(ExtractError::ParseFailure {
            source_name: source_name.to_string(),
            details,
        })
    }
}

impl Default for XmlParser {
    fn default() -> Self {
        Self::new()
    }
}
