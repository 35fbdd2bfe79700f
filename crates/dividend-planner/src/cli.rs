use anyhow::{anyhow, bail, Context, Result};
use portfolio_store::PositionField;
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: dividend-planner [--file PATH] <command>

Commands:
  add <SYMBOL> [--shares N] [--contribution C]   look up a stock and add it
  remove <SYMBOL>                                remove a position
  set <SYMBOL> <FIELD> <VALUE>                   edit one field of a position
  show                                           print the holdings and summary
  project [--years N] [--allowance A]            print the yearly projection

Fields: name, shares, cost_basis, price, yield, div_growth, price_growth,
        contribution, frequency (1, 2, 4, 12), reinvest (true/false)";

/// Flags that take a value.
const VALUE_FLAGS: &[&str] = &["--file", "--shares", "--contribution", "--years", "--allowance"];

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add {
        symbol: String,
        shares: f64,
        contribution: f64,
    },
    Remove {
        symbol: String,
    },
    Set {
        symbol: String,
        field: PositionField,
        value: String,
    },
    Show,
    Project {
        years: Option<u32>,
        allowance: Option<f64>,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    pub file: Option<PathBuf>,
    pub command: Command,
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

fn parse_flag<T>(args: &[String], name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    flag_value(args, name)
        .map(|v| v.parse::<T>().with_context(|| format!("invalid value for {}: '{}'", name, v)))
        .transpose()
}

/// Positional arguments, with flags and their values removed.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}

/// Parse the arguments after the program name.
pub fn parse_args(args: &[String]) -> Result<Cli> {
    let file = flag_value(args, "--file").map(PathBuf::from);
    if args.iter().any(|a| a == "--help" || a == "-h") {
        return Ok(Cli { file, command: Command::Help });
    }

    let positional = positionals(args);
    let command = match positional.as_slice() {
        [] | ["help"] => Command::Help,
        ["add", symbol] => Command::Add {
            symbol: symbol.to_string(),
            shares: parse_flag(args, "--shares")?.unwrap_or(0.0),
            contribution: parse_flag(args, "--contribution")?.unwrap_or(0.0),
        },
        ["remove", symbol] => Command::Remove {
            symbol: symbol.to_string(),
        },
        ["set", symbol, field, value] => Command::Set {
            symbol: symbol.to_string(),
            field: field.parse()?,
            value: value.to_string(),
        },
        ["show"] => Command::Show,
        ["project"] => Command::Project {
            years: parse_flag(args, "--years")?,
            allowance: parse_flag(args, "--allowance")?,
        },
        [cmd, ..] => bail!("unexpected arguments for '{}'\n\n{}", cmd, USAGE),
    };

    if let Command::Add { shares, contribution, .. } = &command {
        if !(shares.is_finite() && *shares >= 0.0 && contribution.is_finite() && *contribution >= 0.0)
        {
            return Err(anyhow!("--shares and --contribution must be non-negative numbers"));
        }
    }

    Ok(Cli { file, command })
}
