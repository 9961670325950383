use crate::cli::{Cli, OutputFormat, VerbosityLevel};
use crate::parser::{DEFAULT_ENCODINGS, Encoding};
use crate::pipeline::UnknownPriorityPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

const CONFIG_NAMES: [&str; 4] = [
    "patent-extract.toml",
    "patent-extract.json",
    ".patent-extract.toml",
    ".patent-extract.json",
];

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub output: OutputConfig,
}

/// Extraction-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Keep doc-numbers whose load-source is missing or unrecognized
    pub include_unknown: bool,
    /// Encodings to try, in order
    pub encodings: Vec<Encoding>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormatConfig,
    /// Verbose output
    pub verbose: bool,
    /// Quiet mode (errors only)
    pub quiet: bool,
    /// Debug output
    pub debug: bool,
}

/// Output format configuration (serializable version of CLI OutputFormat)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormatConfig {
    #[default]
    Lines,
    Json,
}

impl From<OutputFormat> for OutputFormatConfig {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Lines => OutputFormatConfig::Lines,
            OutputFormat::Json => OutputFormatConfig::Json,
        }
    }
}

impl From<OutputFormatConfig> for OutputFormat {
    fn from(format: OutputFormatConfig) -> Self {
        match format {
            OutputFormatConfig::Lines => OutputFormat::Lines,
            OutputFormatConfig::Json => OutputFormat::Json,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            include_unknown: false,
            encodings: DEFAULT_ENCODINGS.to_vec(),
        }
    }
}

impl Config {
    pub fn verbosity(&self) -> VerbosityLevel {
        if self.output.quiet {
            VerbosityLevel::Quiet
        } else if self.output.debug {
            VerbosityLevel::Debug
        } else if self.output.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }

    pub fn unknown_policy(&self) -> UnknownPriorityPolicy {
        UnknownPriorityPolicy::from_include(self.extraction.include_unknown)
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output.format.into()
    }
}

/// Configuration manager for loading and merging configurations
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration with precedence: defaults -> file -> environment -> CLI
    pub fn load_config(cli: &Cli) -> Result<Config> {
        Self::load_config_with(cli, &SystemEnvProvider)
    }

    pub fn load_config_with(cli: &Cli, env: &impl EnvProvider) -> Result<Config> {
        let mut config = match &cli.config {
            Some(config_path) => Self::load_from_file(config_path)?,
            None => Self::find_config_file()?.unwrap_or_default(),
        };

        config = Self::apply_environment_overrides_with(env, config)?;
        config = Self::merge_with_cli(config, cli)?;

        Self::validate_config(&config)?;

        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Load configuration from a file (TOML or JSON)
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => {
                // Try to parse as TOML first, then JSON
                if let Ok(config) = toml::from_str::<Config>(&content) {
                    Ok(config)
                } else {
                    Ok(serde_json::from_str(&content)?)
                }
            }
        }
    }

    /// Find configuration file in the current directory, then the user config directory
    pub fn find_config_file() -> Result<Option<Config>> {
        let app_config_dir = dirs::config_dir().map(|dir| dir.join("patent-extract"));
        Self::find_config_file_in(Path::new("."), app_config_dir.as_deref())
    }

    pub fn find_config_file_in(
        current_dir: &Path,
        app_config_dir: Option<&Path>,
    ) -> Result<Option<Config>> {
        let search_dirs = std::iter::once(current_dir).chain(app_config_dir);
        for dir in search_dirs {
            for name in &CONFIG_NAMES {
                let path = dir.join(name);
                if path.is_file() {
                    tracing::debug!(path = %path.display(), "using configuration file");
                    return Ok(Some(Self::load_from_file(&path)?));
                }
            }
        }

        Ok(None)
    }

    /// Apply environment variable overrides with a custom environment provider
    pub fn apply_environment_overrides_with(
        env: &impl EnvProvider,
        mut config: Config,
    ) -> Result<Config> {
        if let Some(include_unknown) = env.get("PATENT_EXTRACT_INCLUDE_UNKNOWN") {
            config.extraction.include_unknown = parse_bool(
                "PATENT_EXTRACT_INCLUDE_UNKNOWN",
                &include_unknown,
            )?;
        }

        if let Some(encodings) = env.get("PATENT_EXTRACT_ENCODINGS") {
            config.extraction.encodings = Encoding::parse_list(&encodings).map_err(|e| {
                ConfigError::Environment(format!(
                    "Invalid PATENT_EXTRACT_ENCODINGS value: {} ({})",
                    encodings, e
                ))
            })?;
        }

        if let Some(verbose) = env.get("PATENT_EXTRACT_VERBOSE") {
            config.output.verbose = parse_bool("PATENT_EXTRACT_VERBOSE", &verbose)?;
        }

        if let Some(quiet) = env.get("PATENT_EXTRACT_QUIET") {
            config.output.quiet = parse_bool("PATENT_EXTRACT_QUIET", &quiet)?;
        }

        if let Some(debug) = env.get("PATENT_EXTRACT_DEBUG") {
            config.output.debug = parse_bool("PATENT_EXTRACT_DEBUG", &debug)?;
        }

        if let Some(format) = env.get("PATENT_EXTRACT_FORMAT") {
            config.output.format = match format.to_lowercase().as_str() {
                "lines" => OutputFormatConfig::Lines,
                "json" => OutputFormatConfig::Json,
                _ => {
                    return Err(ConfigError::Environment(format!(
                        "Invalid PATENT_EXTRACT_FORMAT value: {}",
                        format
                    )));
                }
            };
        }

        Ok(config)
    }

    /// Merge CLI arguments with configuration. Only flags actually given override.
    pub fn merge_with_cli(mut config: Config, cli: &Cli) -> Result<Config> {
        if let Some(format) = cli.output_format {
            config.output.format = format.into();
        }

        if cli.verbose {
            config.output.verbose = true;
            config.output.quiet = false;
        }
        if cli.debug {
            config.output.debug = true;
            config.output.quiet = false;
        }
        if cli.quiet {
            config.output.quiet = true;
            config.output.verbose = false;
            config.output.debug = false;
        }

        if cli.include_unknown {
            config.extraction.include_unknown = true;
        }

        if let Some(encodings) = cli.get_encodings().map_err(ConfigError::Validation)? {
            config.extraction.encodings = encodings;
        }

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate_config(config: &Config) -> Result<()> {
        if config.output.verbose && config.output.quiet {
            return Err(ConfigError::Validation(
                "Cannot enable both verbose and quiet modes".to_string(),
            ));
        }

        if config.output.debug && config.output.quiet {
            return Err(ConfigError::Validation(
                "Cannot enable both debug and quiet modes".to_string(),
            ));
        }

        if config.extraction.encodings.is_empty() {
            return Err(ConfigError::Validation(
                "At least one encoding must be specified".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::Environment(format!(
            "Invalid {} value: {}",
            key, value
        ))),
    }
}
