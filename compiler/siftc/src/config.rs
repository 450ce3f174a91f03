//! Command-line configuration.

use std::path::PathBuf;

use sift_value::MapMode;
use thiserror::Error;

/// Bad command line.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("option {0} requires a value")]
    MissingValue(&'static str),

    #[error("option {flag} expects a number, got '{value}'")]
    BadNumber { flag: &'static str, value: String },

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("no expression given (try -h)")]
    NoExpression,
}

/// Everything a run needs besides the input itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Expression operands joined with spaces.
    pub expression: String,
    /// `-f`: file whose code is prepended to the expression.
    pub program_file: Option<PathBuf>,
    /// `-i`: input file; stdin when absent.
    pub input: Option<PathBuf>,
    /// `-r`: seed for randomized builtins.
    pub seed: Option<u64>,
    /// `-s`: key-ordered maps.
    pub map_mode: MapMode,
    /// `-t N`: scatter workers. Zero is treated as one.
    pub workers: Option<usize>,
    /// Number of `v`s given with `-v`.
    pub verbosity: u8,
    /// `-h [section]`.
    pub help: Option<String>,
}

impl Config {
    /// Parse arguments, not including the program name.
    pub fn from_args<I>(args: I) -> Result<Config, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut operands = Vec::new();
        let mut args = args.into_iter().peekable();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-i" => config.input = Some(value(&mut args, "-i")?.into()),
                "-f" => config.program_file = Some(value(&mut args, "-f")?.into()),
                "-r" => config.seed = Some(number(&mut args, "-r")?),
                "-t" => config.workers = Some(number::<usize>(&mut args, "-t")?.max(1)),
                "-s" => config.map_mode = MapMode::Ordered,
                "-h" | "--help" => {
                    let section = args.next_if(|next| !next.starts_with('-'));
                    config.help = Some(section.unwrap_or_else(|| "usage".to_string()));
                }
                "--" => operands.extend(args.by_ref()),
                flag if is_verbose(flag) => {
                    let level = u8::try_from(flag.len() - 1).unwrap_or(u8::MAX);
                    config.verbosity = config.verbosity.saturating_add(level);
                }
                flag if flag.len() > 1 && flag.starts_with('-') && !is_negative_number(flag) => {
                    return Err(ConfigError::UnknownOption(flag.to_string()));
                }
                operand => operands.push(operand.to_string()),
            }
        }

        config.expression = operands.join(" ");
        if config.help.is_none() && config.expression.trim().is_empty() && config.program_file.is_none() {
            return Err(ConfigError::NoExpression);
        }
        Ok(config)
    }

    /// Program text: the `-f` file's code, a `,`, then the expression.
    pub fn source(&self) -> std::io::Result<String> {
        let Some(path) = &self.program_file else {
            return Ok(self.expression.clone());
        };
        let code = std::fs::read_to_string(path)?;
        let code = code.trim_end();
        if self.expression.trim().is_empty() {
            return Ok(code.to_string());
        }
        Ok(format!("{code},{}", self.expression))
    }

    /// True when the program runs through scatter/gather.
    pub fn is_parallel(&self, source: &str) -> bool {
        self.workers.is_some() || source.contains(crate::parallel::SPLIT)
    }
}

fn is_verbose(flag: &str) -> bool {
    flag.len() > 1 && flag.starts_with('-') && flag[1..].bytes().all(|b| b == b'v')
}

/// `-1` and `-2.5` are expression operands, not flags.
fn is_negative_number(arg: &str) -> bool {
    arg[1..].starts_with(|c: char| c.is_ascii_digit())
}

fn value<I: Iterator<Item = String>>(args: &mut I, flag: &'static str) -> Result<String, ConfigError> {
    args.next().ok_or(ConfigError::MissingValue(flag))
}

fn number<N: std::str::FromStr>(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<N, ConfigError> {
    let text = value(args, flag)?;
    text.parse()
        .map_err(|_| ConfigError::BadNumber { flag, value: text })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
