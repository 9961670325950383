//! Output formatting for extracted doc-numbers.

use std::io::Write;

use crate::cli::OutputFormat;
use crate::error::{ExtractError, Result};

/// Formatter for the final, ordered doc-number list
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render the list. `Lines` yields one number per line, each newline
    /// terminated; `Json` yields a pretty-printed array and a final newline.
    pub fn format_doc_numbers(&self, doc_numbers: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Lines => Ok(doc_numbers
                .iter()
                .map(|number| format!("{}\n", number))
                .collect()),
            OutputFormat::Json => {
                let mut json = serde_json::to_string_pretty(doc_numbers).map_err(|e| {
                    ExtractError::Output {
                        details: e.to_string(),
                    }
                })?;
                json.push('\n');
                Ok(json)
            }
        }
    }

    pub fn write_to<W: Write>(&self, writer: &mut W, doc_numbers: &[String]) -> Result<()> {
        let rendered = self.format_doc_numbers(doc_numbers)?;
        writer
            .write_all(rendered.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| ExtractError::Output {
                details: e.to_string(),
            })
    }
}
