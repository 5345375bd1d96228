//! Command stream records.
//!
//! ```text
//! + <price> <size>    rest a new order
//! - <rank>            cancel the order at that rank
//! = <shares>          market buy, cost discarded
//! ```
//!
//! The operator may be followed directly by its first field (`+10 5`).
//! Prices are signed. A negative size, rank or share count is malformed, as
//! are a zero size, missing or extra fields and bytes that are not UTF-8.

use std::num::ParseIntError;
use std::str::{FromStr, Utf8Error};

use thiserror::Error;

use crate::orderbook::OrderBook;

/// One parsed record of the command stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `+ <price> <size>`
    Add { price: i64, size: u64 },
    /// `- <rank>`
    Cancel { rank: usize },
    /// `= <shares>`
    Buy { shares: u64 },
}

/// Why a record could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty record")]
    Empty,

    #[error("record is not UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),

    #[error("unknown operator {0:?}")]
    UnknownOperator(char),

    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("invalid {field} {value:?}: {source}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        source: ParseIntError,
    },

    #[error("order size must be positive")]
    ZeroSize,

    #[error("unexpected trailing input {0:?}")]
    TrailingInput(String),
}

impl Command {
    /// Apply this command to `book`.
    ///
    /// # Returns
    ///
    /// The cost for `Buy`, `None` for the others
    pub fn apply(self, book: &mut OrderBook) -> Option<i128> {
        match self {
            Command::Add { price, size } => {
                book.add(price, size);
                None
            }
            Command::Cancel { rank } => {
                book.cancel_at_rank(rank);
                None
            }
            Command::Buy { shares } => Some(book.execute_market_buy(shares)),
        }
    }

    /// Parse one raw line of the stream, `None` if it is blank.
    ///
    /// # Example
    ///
    /// ```
    /// use rankbook::driver::{Command, CommandError};
    ///
    /// assert_eq!(Command::parse_record(b"+ -5 10\r"), Some(Ok(Command::Add { price: -5, size: 10 })));
    /// assert_eq!(Command::parse_record(b"  "), None);
    /// assert!(matches!(Command::parse_record(b"\xff"), Some(Err(CommandError::InvalidUtf8(_)))));
    /// ```
    pub fn parse_record(bytes: &[u8]) -> Option<Result<Self, CommandError>> {
        let text = match std::str::from_utf8(bytes) {
            Ok(text) => text.trim(),
            Err(err) => return Some(Err(err.into())),
        };
        if text.is_empty() {
            return None;
        }
        Some(text.parse())
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(record: &str) -> Result<Self, Self::Err> {
        let record = record.trim_start();
        let mut chars = record.chars();
        let operator = chars.next().ok_or(CommandError::Empty)?;
        let mut fields = chars.as_str().split_whitespace();

        let command = match operator {
            '+' => {
                let price: i64 = number(&mut fields, "price")?;
                let size: u64 = number(&mut fields, "size")?;
                if size == 0 {
                    return Err(CommandError::ZeroSize);
                }
                Command::Add { price, size }
            }
            '-' => Command::Cancel {
                rank: number(&mut fields, "rank")?,
            },
            '=' => Command::Buy {
                shares: number(&mut fields, "shares")?,
            },
            other => return Err(CommandError::UnknownOperator(other)),
        };

        match fields.next() {
            Some(extra) => Err(CommandError::TrailingInput(extra.to_string())),
            None => Ok(command),
        }
    }
}

fn number<'a, T, I>(fields: &mut I, field: &'static str) -> Result<T, CommandError>
where
    T: FromStr<Err = ParseIntError>,
    I: Iterator<Item = &'a str>,
{
    let value = fields.next().ok_or(CommandError::MissingField(field))?;
    value.parse().map_err(|source| CommandError::InvalidNumber {
        field,
        value: value.to_string(),
        source,
    })
}
