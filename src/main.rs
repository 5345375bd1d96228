//! rankbook - command stream driver
//!
//! Reads `+ <price> <size>`, `- <rank>` and `= <shares>` records from stdin,
//! then prints the cost of one closing market buy to stdout.
//!
//! Logs go to stderr; set `RUST_LOG=debug` for replay statistics.

use std::io::{self, BufReader, Write};
use std::process::ExitCode;

use rankbook::driver::{self, config::USAGE, ConfigError, DriverConfig};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Read buffer for stdin
const BUF_SIZE: usize = 1 << 20;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match DriverConfig::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(ConfigError::HelpRequested) => {
            eprintln!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            error!(%err, "bad arguments");
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };
    debug!(?config, "starting replay");

    let stdin = io::stdin();
    let reader = BufReader::with_capacity(BUF_SIZE, stdin.lock());

    match driver::run(reader, &config) {
        Ok(report) => {
            debug!(state_root = %report.state_root_hex(), "book state");
            let mut stdout = io::stdout().lock();
            if let Err(err) = writeln!(stdout, "{}", report.final_cost) {
                error!(%err, "failed to write result");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "replay failed");
            ExitCode::FAILURE
        }
    }
}
