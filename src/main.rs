use std::process::ExitCode;

use patent_extract::config::ConfigManager;
use patent_extract::error::{ExtractError, Result};
use patent_extract::error_reporter::{ErrorReporter, ExtractionReporter};
use patent_extract::logging::init_logging;
use patent_extract::{Cli, Config, DocNumberExtractor, Output};

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let config = match ConfigManager::load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            init_logging(cli.verbosity());
            let reporter = ErrorReporter::new(cli.verbosity());
            reporter.fatal(&ExtractError::from(e));
            return ExitCode::FAILURE;
        }
    };

    init_logging(config.verbosity());
    let reporter = ErrorReporter::new(config.verbosity());

    match run(&cli, &config, &reporter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            reporter.fatal(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &Config, reporter: &ErrorReporter) -> Result<()> {
    let extractor = DocNumberExtractor::from_config(config);
    let doc_numbers = extractor.extract_file(&cli.path, reporter)?;
    reporter.report_summary();

    let output = Output::new(config.output_format());
    output.write_to(&mut std::io::stdout().lock(), &doc_numbers)
}
