//! Command driver: replay a command stream against an order book.
//!
//! ## Flow
//!
//! 1. Read raw records line by line, skipping blank lines
//! 2. Apply up to `max_commands` records; malformed ones (bad syntax or
//!    bytes that are not UTF-8) are skipped but still count against the
//!    budget
//! 3. Issue one final market buy of `final_buy` shares
//! 4. Report its cost together with replay statistics and the state root
//!
//! ## Example
//!
//! ```
//! use rankbook::driver::{run, DriverConfig};
//!
//! let input = "+ 10 5\n+ 10 3\n= 4\n";
//! let config = DriverConfig { final_buy: 2, ..DriverConfig::default() };
//! let report = run(input.as_bytes(), &config).unwrap();
//!
//! assert_eq!(report.records, 3);
//! assert_eq!(report.final_cost, 20);
//! ```

pub mod command;
pub mod config;

use std::io::BufRead;

use thiserror::Error;
use tracing::{debug, trace};

use crate::orderbook::{BookError, OrderBook};
use crate::types::Execution;

pub use command::{Command, CommandError};
pub use config::{ConfigError, DriverConfig};

/// Failures that abort a replay
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to read command stream: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Book(#[from] BookError),
}

/// Summary of one replay.
///
/// `final_cost` is the program's answer; the rest is for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunReport {
    /// Non-blank records consumed, malformed ones included
    pub records: usize,

    /// Records that failed to parse
    pub ignored: usize,

    pub adds: usize,
    pub cancels: usize,
    pub buys: usize,

    /// The closing market buy
    pub final_execution: Execution,

    /// Cost of the closing market buy
    pub final_cost: i128,

    /// Orders still resting after the closing buy
    pub resting_orders: usize,

    /// SHA-256 state root of the book after the closing buy
    pub state_root: [u8; 32],
}

impl RunReport {
    /// Get the state root as a hex string
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root)
    }

    /// Records that parsed and were applied
    pub fn applied(&self) -> usize {
        self.records - self.ignored
    }
}

/// Replay `reader` against a fresh book built from `config`.
///
/// # Errors
///
/// [`DriverError::Io`] if the reader itself fails. Malformed records,
/// including ones that are not UTF-8, never fail the replay.
pub fn run<R: BufRead>(reader: R, config: &DriverConfig) -> Result<RunReport, DriverError> {
    let mut book = OrderBook::for_side(config.side, config.seed);
    let mut report = replay(reader, &mut book, config.max_commands)?;

    report.final_execution = book.execute_market(config.final_buy);
    report.final_cost = report.final_execution.cost;
    report.resting_orders = book.len();
    report.state_root = book.state_root()?;

    debug!(
        records = report.records,
        ignored = report.ignored,
        final_cost = %report.final_cost,
        filled = report.final_execution.filled,
        resting = report.resting_orders,
        "replay finished"
    );
    Ok(report)
}

/// Apply at most `max_commands` records from `reader` to `book`.
///
/// Only the counting fields of the returned report are filled in.
pub fn replay<R: BufRead>(
    reader: R,
    book: &mut OrderBook,
    max_commands: usize,
) -> Result<RunReport, DriverError> {
    let mut report = RunReport::default();
    let mut lines = reader.split(b'\n');

    while report.records < max_commands {
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let Some(parsed) = Command::parse_record(&line) else {
            continue;
        };
        report.records += 1;

        match parsed {
            Ok(command) => {
                match command {
                    Command::Add { .. } => report.adds += 1,
                    Command::Cancel { .. } => report.cancels += 1,
                    Command::Buy { .. } => report.buys += 1,
                }
                command.apply(book);
            }
            Err(err) => {
                report.ignored += 1;
                trace!(record = %String::from_utf8_lossy(&line), %err, "ignoring malformed record");
            }
        }
    }

    debug!(records = report.records, resting = book.len(), "stream applied");
    Ok(report)
}
