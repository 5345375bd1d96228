//! Driver configuration and command-line parsing.
//!
//! ```text
//! rankbook [--commands N] [--final-buy N] [--seed N] [--side buy|sell]
//! ```
//!
//! Numbers are decimal; `--seed` also accepts `0x`-prefixed hex.

use thiserror::Error;

use crate::orderbook::DEFAULT_SEED;
use crate::types::Side;

/// Records applied before the final buy
pub const DEFAULT_MAX_COMMANDS: usize = 1_000_000;

/// Size of the market buy issued after the stream
pub const DEFAULT_FINAL_BUY: u64 = 1_000;

pub const USAGE: &str = "usage: rankbook [--commands N] [--final-buy N] [--seed N] [--side buy|sell]";

/// Settings for one replay of a command stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Maximum number of non-blank records to apply
    pub max_commands: usize,

    /// Shares bought once the stream is done
    pub final_buy: u64,

    /// Seed for the tree's balancing priorities
    pub seed: u64,

    /// Side the resting orders belong to
    pub side: Side,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_commands: DEFAULT_MAX_COMMANDS,
            final_buy: DEFAULT_FINAL_BUY,
            seed: DEFAULT_SEED,
            side: Side::Sell,
        }
    }
}

/// Command-line problems
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("help requested")]
    HelpRequested,

    #[error("unknown flag {0:?}")]
    UnknownFlag(String),

    #[error("{0} needs a value")]
    MissingValue(&'static str),

    #[error("invalid value {value:?} for {flag}")]
    InvalidValue { flag: &'static str, value: String },
}

impl DriverConfig {
    /// Build a config from command-line arguments (program name excluded).
    ///
    /// # Example
    ///
    /// ```
    /// use rankbook::driver::DriverConfig;
    ///
    /// let args = ["--commands", "10", "--seed", "0xff"].map(String::from);
    /// let config = DriverConfig::from_args(args).unwrap();
    ///
    /// assert_eq!(config.max_commands, 10);
    /// assert_eq!(config.seed, 255);
    /// assert_eq!(config.final_buy, 1_000);
    /// ```
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Err(ConfigError::HelpRequested),
                "--commands" => {
                    let value = value_for(&mut args, "--commands")?;
                    config.max_commands = value
                        .parse()
                        .map_err(|_| invalid("--commands", &value))?;
                }
                "--final-buy" => {
                    let value = value_for(&mut args, "--final-buy")?;
                    config.final_buy = value
                        .parse()
                        .map_err(|_| invalid("--final-buy", &value))?;
                }
                "--seed" => {
                    let value = value_for(&mut args, "--seed")?;
                    config.seed = parse_seed(&value).ok_or_else(|| invalid("--seed", &value))?;
                }
                "--side" => {
                    let value = value_for(&mut args, "--side")?;
                    config.side = Side::from_name(&value).ok_or_else(|| invalid("--side", &value))?;
                }
                _ => return Err(ConfigError::UnknownFlag(arg)),
            }
        }

        Ok(config)
    }
}

fn value_for<I>(args: &mut I, flag: &'static str) -> Result<String, ConfigError>
where
    I: Iterator<Item = String>,
{
    args.next().ok_or(ConfigError::MissingValue(flag))
}

fn invalid(flag: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        flag,
        value: value.to_string(),
    }
}

fn parse_seed(value: &str) -> Option<u64> {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<DriverConfig, ConfigError> {
        DriverConfig::from_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap();

        assert_eq!(config, DriverConfig::default());
        assert_eq!(config.max_commands, 1_000_000);
        assert_eq!(config.final_buy, 1_000);
        assert_eq!(config.seed, 0xDEAD_BEEF);
        assert_eq!(config.side, Side::Sell);
    }

    #[test]
    fn test_all_flags() {
        let config = parse(&[
            "--commands", "5", "--final-buy", "7", "--seed", "99", "--side", "bid",
        ])
        .unwrap();

        assert_eq!(config.max_commands, 5);
        assert_eq!(config.final_buy, 7);
        assert_eq!(config.seed, 99);
        assert_eq!(config.side, Side::Buy);
    }

    #[test]
    fn test_hex_seed() {
        assert_eq!(parse(&["--seed", "0xDEADBEEF"]).unwrap().seed, 0xDEAD_BEEF);
        assert_eq!(parse(&["--seed", "0X10"]).unwrap().seed, 16);
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse(&["--help"]), Err(ConfigError::HelpRequested));
        assert_eq!(
            parse(&["--verbose"]),
            Err(ConfigError::UnknownFlag("--verbose".to_string()))
        );
        assert_eq!(
            parse(&["--commands"]),
            Err(ConfigError::MissingValue("--commands"))
        );
        assert_eq!(
            parse(&["--final-buy", "-3"]),
            Err(ConfigError::InvalidValue {
                flag: "--final-buy",
                value: "-3".to_string()
            })
        );
        assert!(parse(&["--side", "both"]).is_err());
        assert!(parse(&["--seed", "0xZZ"]).is_err());
    }
}
