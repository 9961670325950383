//! Extraction pipeline
//!
//! Walker output is classified, filtered and stable-sorted by
//! `(priority, discovery_order)`. Per-element problems are reported and
//! skipped; only reading or parsing the input can fail.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::{Priority, classify};
use crate::config::Config;
use crate::document::XmlDocument;
use crate::error::Result;
use crate::error_reporter::{ExtractionEvent, ExtractionReporter, ExtractionWarning};
use crate::parser::{Encoding, XmlParser};
use crate::walker::{DocNumberField, walk};

/// One doc-number ready for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionRecord {
    pub doc_number: String,
    pub priority: Priority,
    pub discovery_order: usize,
}

/// What to do with records whose priority is [`Priority::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownPriorityPolicy {
    /// Drop them, reporting each one
    #[default]
    Exclude,
    /// Keep them after all known-priority records
    Include,
}

impl UnknownPriorityPolicy {
    pub fn from_include(include_unknown: bool) -> Self {
        if include_unknown {
            UnknownPriorityPolicy::Include
        } else {
            UnknownPriorityPolicy::Exclude
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractionOptions {
    pub unknown_policy: UnknownPriorityPolicy,
}

/// Ordered doc-numbers of `document`.
pub fn extract(
    document: &XmlDocument,
    options: &ExtractionOptions,
    reporter: &dyn ExtractionReporter,
) -> Vec<String> {
    extract_records(document, options, reporter)
        .into_iter()
        .map(|record| record.doc_number)
        .collect()
}

/// Ordered records of `document`, before projection to strings.
pub fn extract_records(
    document: &XmlDocument,
    options: &ExtractionOptions,
    reporter: &dyn ExtractionReporter,
) -> Vec<ExtractionRecord> {
    let walked = walk(document, reporter);
    reporter.event(&ExtractionEvent::ApplicationReferencesFound {
        count: walked.application_references,
    });
    if walked.application_references == 0 {
        reporter.warning(&ExtractionWarning::NoApplicationReference);
    }

    let found = walked.candidates.len();
    let mut records = Vec::with_capacity(found);

    for candidate in walked.candidates {
        let order = candidate.order;

        let priority = classify(candidate.load_source.as_deref());
        match &candidate.load_source {
            None => reporter.warning(&ExtractionWarning::MissingLoadSource { order }),
            Some(value) if priority == Priority::Unknown => {
                reporter.warning(&ExtractionWarning::UnknownLoadSource {
                    order,
                    value: value.clone(),
                })
            }
            Some(_) => {}
        }

        let doc_number = match candidate.doc_number {
            DocNumberField::Missing => {
                reporter.warning(&ExtractionWarning::MissingDocNumber { order });
                continue;
            }
            DocNumberField::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    reporter.warning(&ExtractionWarning::EmptyDocNumber { order });
                    continue;
                }
                trimmed.to_string()
            }
        };

        if priority == Priority::Unknown
            && options.unknown_policy == UnknownPriorityPolicy::Exclude
        {
            reporter.warning(&ExtractionWarning::UnknownPriorityExcluded { order, doc_number });
            continue;
        }

        reporter.event(&ExtractionEvent::RecordExtracted {
            order,
            doc_number: doc_number.clone(),
            priority,
        });
        records.push(ExtractionRecord {
            doc_number,
            priority,
            discovery_order: order,
        });
    }

    // Vec::sort_by_key is stable; discovery_order keeps the tie-break explicit.
    records.sort_by_key(|record| (record.priority, record.discovery_order));

    reporter.event(&ExtractionEvent::Completed {
        returned: records.len(),
        skipped: found - records.len(),
    });
    records
}

/// Parser plus pipeline options: the file and bytes entry points.
pub struct DocNumberExtractor {
    parser: XmlParser,
    options: ExtractionOptions,
}

impl DocNumberExtractor {
    pub fn new(options: ExtractionOptions) -> Self {
        Self {
            parser: XmlParser::new(),
            options,
        }
    }

    pub fn with_encodings(mut self, encodings: Vec<Encoding>) -> Self {
        self.parser = XmlParser::with_encodings(encodings);
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(ExtractionOptions {
            unknown_policy: UnknownPriorityPolicy::from_include(config.extraction.include_unknown),
        })
        .with_encodings(config.extraction.encodings.clone())
    }

    pub fn options(&self) -> &ExtractionOptions {
        &self.options
    }

    pub fn parser(&self) -> &XmlParser {
        &self.parser
    }

    pub fn extract_file(
        &self,
        path: &Path,
        reporter: &dyn ExtractionReporter,
    ) -> Result<Vec<String>> {
        reporter.event(&ExtractionEvent::Started {
            source_name: path.display().to_string(),
        });
        let document = self.parser.parse_file(path, reporter)?;
        Ok(extract(&document, &self.options, reporter))
    }

    pub fn extract_bytes(
        &self,
        bytes: &[u8],
        source_name: &str,
        reporter: &dyn ExtractionReporter,
    ) -> Result<Vec<String>> {
        reporter.event(&ExtractionEvent::Started {
            source_name: source_name.to_string(),
        });
        let document = self.parser.parse_bytes(bytes, source_name, reporter)?;
        Ok(extract(&document, &self.options, reporter))
    }
}

impl Default for DocNumberExtractor {
    fn default() -> Self {
        Self::new(ExtractionOptions::default())
    }
}
