//! Logging setup for the binary.
//!
//! `RUST_LOG` wins when set; otherwise the filter follows the CLI verbosity.
//! Log output always goes to stderr so stdout stays machine readable.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::VerbosityLevel;

/// Default filter directive for a verbosity level.
pub fn default_filter(verbosity: VerbosityLevel) -> &'static str {
    match verbosity {
        VerbosityLevel::Quiet => "error",
        VerbosityLevel::Normal => "warn",
        VerbosityLevel::Verbose => "info,patent_extract=debug",
        VerbosityLevel::Debug => "debug",
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(verbosity: VerbosityLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(verbosity).into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters() {
        assert_eq!(default_filter(VerbosityLevel::Quiet), "error");
        assert_eq!(default_filter(VerbosityLevel::Normal), "warn");
        assert!(default_filter(VerbosityLevel::Verbose).contains("patent_extract=debug"));
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logging(VerbosityLevel::Quiet);
        init_logging(VerbosityLevel::Debug);
    }
}
