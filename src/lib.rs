//! # patent-extract Library
//!
//! Extracts `doc-number` identifiers from the `application-reference` blocks of
//! patent XML and orders them by document-format priority: EPO/docdb first,
//! patent-office second, unknown sources last (or dropped). Parsing is
//! error-recovering, encoding-tolerant and built on libxml2.
//!
//! ```no_run
//! use patent_extract::{DocNumberExtractor, SilentReporter};
//!
//! let extractor = DocNumberExtractor::default();
//! let numbers = extractor.extract_file(std::path::Path::new("patent.xml"), &SilentReporter)?;
//! # Ok::<(), patent_extract::ExtractError>(())
//! ```

pub mod classify;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod error_reporter;
pub mod libxml2;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod walker;

pub use classify::{Priority, classify};
pub use cli::{Cli, OutputFormat, VerbosityLevel};
pub use config::{Config, ConfigError, ConfigManager, EnvProvider, SystemEnvProvider};
pub use document::{XmlAttribute, XmlDocument, XmlElement, XmlNode};
pub use error::{ErrorCategory, ExtractError, LibXml2Error};
pub use error_reporter::{
    ErrorReporter, ExtractionEvent, ExtractionReporter, ExtractionWarning, SilentReporter,
};
pub use libxml2::{LibXml2Wrapper, ParsedDocument};
pub use normalize::{NormalizedKey, local_name, normalize};
pub use output::Output;
pub use parser::{DEFAULT_ENCODINGS, Encoding, XmlParser};
pub use pipeline::{
    DocNumberExtractor, ExtractionOptions, ExtractionRecord, UnknownPriorityPolicy, extract,
    extract_records,
};
pub use walker::{DocNumberField, DocumentIdCandidate, WalkOutput, walk};
