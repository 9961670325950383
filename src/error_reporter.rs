//! Reporting collaborator for the extraction pipeline
//!
//! The pipeline never decides how problems are surfaced. It hands
//! [`ExtractionWarning`]s, [`ExtractionEvent`]s and fatal errors to an
//! [`ExtractionReporter`]; [`ErrorReporter`] is the production implementation
//! backed by `tracing` and stderr.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::classify::Priority;
use crate::cli::VerbosityLevel;
use crate::error::ExtractError;

/// Recoverable, per-element problems. Never abort an extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionWarning {
    /// `document-id` has no `load-source` attribute; classified as unknown
    MissingLoadSource { order: usize },
    /// `load-source` value matches no known format; classified as unknown
    UnknownLoadSource { order: usize, value: String },
    /// `document-id` has no `doc-number` child; skipped
    MissingDocNumber { order: usize },
    /// `doc-number` text is empty after trimming; skipped
    EmptyDocNumber { order: usize },
    /// Unknown-priority record dropped by the configured policy
    UnknownPriorityExcluded { order: usize, doc_number: String },
    /// `application-reference` nested in another one
    NestedApplicationReference { depth: usize },
    /// Document contains no `application-reference` at all
    NoApplicationReference,
    /// The parser recovered from malformed XML; results may be partial
    RecoveredMalformedXml { line: i32, details: String },
}

impl ExtractionWarning {
    /// Whether the warning means a `document-id` did not make it into the output.
    pub fn drops_record(&self) -> bool {
        matches!(
            self,
            ExtractionWarning::MissingDocNumber { .. }
                | ExtractionWarning::EmptyDocNumber { .. }
                | ExtractionWarning::UnknownPriorityExcluded { .. }
        )
    }
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionWarning::MissingLoadSource { order } => {
                write!(f, "document-id #{} has no load-source attribute", order)
            }
            ExtractionWarning::UnknownLoadSource { order, value } => {
                write!(f, "document-id #{} has unrecognized load-source '{}'", order, value)
            }
            ExtractionWarning::MissingDocNumber { order } => {
                write!(f, "document-id #{} has no doc-number element; skipped", order)
            }
            ExtractionWarning::EmptyDocNumber { order } => {
                write!(f, "document-id #{} has an empty doc-number; skipped", order)
            }
            ExtractionWarning::UnknownPriorityExcluded { order, doc_number } => write!(
                f,
                "document-id #{} ({}) has unknown priority; excluded",
                order, doc_number
            ),
            ExtractionWarning::NestedApplicationReference { depth } => write!(
                f,
                "application-reference nested {} level(s) inside another; merged into the outer block",
                depth
            ),
            ExtractionWarning::NoApplicationReference => {
                write!(f, "no application-reference elements found")
            }
            ExtractionWarning::RecoveredMalformedXml { line, details } => {
                write!(f, "recovered from malformed XML near line {}: {}", line, details)
            }
        }
    }
}

/// Informational progress of one extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionEvent {
    Started { source_name: String },
    ApplicationReferencesFound { count: usize },
    RecordExtracted {
        order: usize,
        doc_number: String,
        priority: Priority,
    },
    Completed { returned: usize, skipped: usize },
}

/// Receiver of everything the pipeline wants surfaced.
#[cfg_attr(test, mockall::automock)]
pub trait ExtractionReporter {
    fn warning(&self, warning: &ExtractionWarning);
    fn event(&self, event: &ExtractionEvent);
    fn fatal(&self, error: &ExtractError);
}

/// Reporter that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ExtractionReporter for SilentReporter {
    fn warning(&self, _warning: &ExtractionWarning) {}
    fn event(&self, _event: &ExtractionEvent) {}
    fn fatal(&self, _error: &ExtractError) {}
}

/// Error reporter with configurable verbosity
///
/// At `Verbose` and `Debug` every warning becomes a `tracing` warning. At
/// `Normal` they are logged at debug level and summarized once by
/// [`ErrorReporter::report_summary`]. `Quiet` only prints fatal errors.
pub struct ErrorReporter {
    verbosity: VerbosityLevel,
    warnings: AtomicUsize,
    skipped: AtomicUsize,
}

impl ErrorReporter {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            warnings: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.load(Ordering::Relaxed)
    }

    /// Emit a single summary line for warnings that were not shown individually.
    pub fn report_summary(&self) {
        let warnings = self.warning_count();
        if self.verbosity != VerbosityLevel::Normal || warnings == 0 {
            return;
        }
        tracing::warn!(
            warnings,
            skipped = self.skipped_count(),
            "{} warning(s) while extracting, {} document-id element(s) skipped; rerun with --verbose for details",
            warnings,
            self.skipped_count()
        );
    }

    /// Format a fatal error for stderr according to verbosity.
    pub fn format_error(&self, error: &ExtractError) -> String {
        match self.verbosity {
            VerbosityLevel::Quiet | VerbosityLevel::Normal => format!("Error: {}", error),
            VerbosityLevel::Verbose => self.format_error_verbose(error),
            VerbosityLevel::Debug => self.format_error_debug(error),
        }
    }

    fn format_error_verbose(&self, error: &ExtractError) -> String {
        let mut output = format!("Error: {}", error);

        match error {
            ExtractError::FileNotFound { .. } | ExtractError::NotAFile { .. } => {
                output.push_str("\nSuggestion: Check that the path names an existing XML file");
            }
            ExtractError::Read { .. } => {
                output.push_str("\nSuggestion: Check file permissions");
            }
            ExtractError::ParseFailure { .. } => {
                output.push_str(
                    "\nSuggestion: Try a different --encodings list or check that the file is XML",
                );
            }
            ExtractError::Config(_) => {
                output.push_str("\nSuggestion: Check the configuration file and PATENT_EXTRACT_* variables");
            }
            _ => {}
        }

        output
    }

    fn format_error_debug(&self, error: &ExtractError) -> String {
        let mut output = self.format_error_verbose(error);
        output.push_str(&format!("\nDebug Info: {:?}", error));

        output.push_str("\nError Chain:");
        let mut current_error: &dyn std::error::Error = error;
        let mut level = 0;
        while let Some(source) = current_error.source() {
            output.push_str(&format!("\n  {}: {}", level + 1, source));
            current_error = source;
            level += 1;
        }

        output
    }
}

impl ExtractionReporter for ErrorReporter {
    fn warning(&self, warning: &ExtractionWarning) {
        self.warnings.fetch_add(1, Ordering::Relaxed);
        if warning.drops_record() {
            self.skipped.fetch_add(1, Ordering::Relaxed);
        }

        match self.verbosity {
            VerbosityLevel::Quiet => {}
            VerbosityLevel::Normal => tracing::debug!("{}", warning),
            VerbosityLevel::Verbose | VerbosityLevel::Debug => tracing::warn!("{}", warning),
        }
    }

    fn event(&self, event: &ExtractionEvent) {
        match event {
            ExtractionEvent::Started { source_name } => {
                tracing::info!(source = %source_name, "extracting doc-numbers")
            }
            ExtractionEvent::ApplicationReferencesFound { count } => {
                tracing::debug!(count, "found application-reference element(s)")
            }
            ExtractionEvent::RecordExtracted {
                order,
                doc_number,
                priority,
            } => tracing::debug!(order, %doc_number, %priority, "extracted doc-number"),
            ExtractionEvent::Completed { returned, skipped } => {
                tracing::info!(returned, skipped, "extraction finished")
            }
        }
    }

    fn fatal(&self, error: &ExtractError) {
        tracing::debug!(error = ?error, category = ?error.category(), "extraction aborted");
        eprintln!("{}", self.format_error(error));
    }
}
