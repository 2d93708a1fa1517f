//! PanOptions - command-line front end for viewer option resolution

use clap::Parser;
use panoptions::{
    cli::{PanOptionsCli, PanOptionsCliExecutor},
    logging::{init_logging, LogConfig, LogLevel},
    PanOptionsError, Result,
};
use tracing::{debug, error};

fn run(cli: PanOptionsCli) -> Result<()> {
    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }
    init_logging(&log_config)
        .map_err(|e| PanOptionsError::Logging(format!("Failed to initialize logging: {}", e)))?;

    debug!("PanOptions v{}", env!("CARGO_PKG_VERSION"));

    let executor = PanOptionsCliExecutor::new(cli.json);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    executor.execute(cli.command, &mut out)
}

fn main() {
    let cli = PanOptionsCli::parse();

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
