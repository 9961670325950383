use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::parser::Encoding;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Only show fatal errors
    Quiet,
    /// Show a summary of skipped elements
    #[default]
    Normal,
    /// Show every warning and progress event
    Verbose,
    /// Show all available debugging information
    Debug,
}

/// How extracted doc-numbers are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One doc-number per line
    #[default]
    Lines,
    /// A JSON array of strings
    Json,
}

/// Extract application doc-numbers from patent XML, ordered by source priority
#[derive(Parser, Debug, Clone)]
#[command(name = "patent-extract")]
#[command(
    about = "Extract doc-numbers from application-reference elements of a patent XML file"
)]
#[command(version)]
pub struct Cli {
    /// Path to the XML file
    #[arg(value_name = "XML_FILE", help = "Patent XML file to read")]
    pub path: PathBuf,

    /// Output format (overrides configuration)
    #[arg(long = "output-format", value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", help = "Log every warning and extracted record")]
    pub verbose: bool,

    /// Enable quiet mode (fatal errors only)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Quiet mode",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Enable debug output (error details and internal tracing)
    #[arg(long = "debug", conflicts_with = "quiet")]
    pub debug: bool,

    /// Keep doc-numbers whose load-source is missing or unrecognized
    #[arg(long = "include-unknown")]
    pub include_unknown: bool,

    /// Encodings to try, in order (comma-separated)
    #[arg(
        long = "encodings",
        value_name = "LIST",
        help = "Encodings to try in order (e.g., 'utf-8,utf-16,latin-1')"
    )]
    pub encodings: Option<String>,

    /// Configuration file (TOML or JSON)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Encodings requested on the command line, if any.
    pub fn get_encodings(&self) -> Result<Option<Vec<Encoding>>, String> {
        self.encodings
            .as_deref()
            .map(Encoding::parse_list)
            .transpose()
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.debug {
            VerbosityLevel::Debug
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_cli_parsing() {
        let cli = Cli::try_parse_from(["patent-extract", "patent.xml"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("patent.xml"));
        assert_eq!(cli.output_format, None);
        assert!(!cli.verbose);
        assert!(!cli.include_unknown);
        assert_eq!(cli.get_encodings().unwrap(), None);
        assert_eq!(cli.verbosity(), VerbosityLevel::Normal);
    }

    #[test]
    fn test_all_options() {
        let cli = Cli::try_parse_from([
            "patent-extract",
            "--output-format",
            "json",
            "-v",
            "--include-unknown",
            "--encodings",
            "latin-1, utf-8",
            "--config",
            "conf.toml",
            "patent.xml",
        ])
        .unwrap();

        assert_eq!(cli.output_format, Some(OutputFormat::Json));
        assert_eq!(cli.verbosity(), VerbosityLevel::Verbose);
        assert!(cli.include_unknown);
        assert_eq!(
            cli.get_encodings().unwrap(),
            Some(vec![Encoding::Latin1, Encoding::Utf8])
        );
        assert_eq!(cli.config, Some(PathBuf::from("conf.toml")));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["patent-extract", "-q", "-v", "a.xml"]).is_err());
        let cli = Cli::try_parse_from(["patent-extract", "-q", "a.xml"]).unwrap();
        assert_eq!(cli.verbosity(), VerbosityLevel::Quiet);
    }

    #[test]
    fn test_debug_flag() {
        let cli = Cli::try_parse_from(["patent-extract", "--debug", "a.xml"]).unwrap();
        assert_eq!(cli.verbosity(), VerbosityLevel::Debug);

        let cli = Cli::try_parse_from(["patent-extract", "--debug", "-v", "a.xml"]).unwrap();
        assert_eq!(cli.verbosity(), VerbosityLevel::Debug);

        assert!(Cli::try_parse_from(["patent-extract", "--debug", "-q", "a.xml"]).is_err());
    }

    #[test]
    fn test_invalid_output_format_rejected() {
        let result = Cli::try_parse_from(["patent-extract", "--output-format", "xml", "a.xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_path_rejected() {
        assert!(Cli::try_parse_from(["patent-extract"]).is_err());
    }

    #[test]
    fn test_unknown_encoding_reported() {
        let cli =
            Cli::try_parse_from(["patent-extract", "--encodings", "ebcdic", "a.xml"]).unwrap();
        assert!(cli.get_encodings().is_err());
    }
}
