pub mod config;
pub mod error;

pub use config::Config;
pub use error::{Error, Result};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The financial statement functions fetched from AlphaVantage.
///
/// Variant order is the canonical processing order used when statements are
/// merged: later statements overwrite fields of earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementFunction {
  IncomeStatement,
  BalanceSheet,
  CashFlow,
}

impl StatementFunction {
  /// Every statement function in canonical order
  pub const ALL: [StatementFunction; 3] =
    [StatementFunction::IncomeStatement, StatementFunction::BalanceSheet, StatementFunction::CashFlow];

  /// Value of the `function` query parameter, also used as the data subdirectory name
  pub fn as_str(&self) -> &'static str {
    match self {
      StatementFunction::IncomeStatement => "INCOME_STATEMENT",
      StatementFunction::BalanceSheet => "BALANCE_SHEET",
      StatementFunction::CashFlow => "CASH_FLOW",
    }
  }
}

impl std::fmt::Display for StatementFunction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for StatementFunction {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
      "INCOME_STATEMENT" | "INCOME" => Ok(StatementFunction::IncomeStatement),
      "BALANCE_SHEET" | "BALANCE" => Ok(StatementFunction::BalanceSheet),
      "CASH_FLOW" | "CASHFLOW" => Ok(StatementFunction::CashFlow),
      other => Err(Error::Config(format!("Unknown statement function: {}", other))),
    }
  }
}

/// Sort functions into canonical order and drop duplicates
pub fn canonical_functions(functions: &[StatementFunction]) -> Vec<StatementFunction> {
  let mut out = functions.to_vec();
  out.sort();
  out.dedup();
  out
}

/// Trim and uppercase a ticker. Returns `Ok(None)` for blank input.
///
/// Tickers become file names, so only ASCII letters, digits, `.` and `-` are
/// accepted and the first character must be a letter or digit.
pub fn normalize_symbol(raw: &str) -> Result<Option<String>> {
  let symbol = raw.trim();
  if symbol.is_empty() {
    return Ok(None);
  }

  let symbol = symbol.to_ascii_uppercase();
  let valid_start = symbol.starts_with(|c: char| c.is_ascii_alphanumeric());
  let valid_chars = symbol.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
  if !(valid_start && valid_chars) {
    return Err(Error::Config(format!("Invalid symbol: {:?}", raw.trim())));
  }

  Ok(Some(symbol))
}

/// Normalise a list of tickers, dropping blanks and repeated symbols while
/// keeping first-seen order. The first invalid ticker is an error.
pub fn normalize_universe<I, S>(raw: I) -> Result<Vec<String>>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut universe: Vec<String> = Vec::new();
  for raw_symbol in raw {
    if let Some(symbol) = normalize_symbol(raw_symbol.as_ref())? {
      if !universe.contains(&symbol) {
        universe.push(symbol);
      }
    }
  }
  Ok(universe)
}

/// Base URL for AlphaVantage API. Requests go to `{base}/query`.
pub const ALPHA_VANTAGE_BASE_URL: &str = "https://www.alphavantage.co";

/// API rate limit, requests per minute on the free tier
pub const DEFAULT_RATE_LIMIT: u32 = 5;

/// Free tier request budget per day
pub const DEFAULT_DAILY_LIMIT: usize = 25;

/// Universe used when none is configured
pub const DEFAULT_UNIVERSE: [&str; 6] = ["AAPL", "GOOGL", "MSFT", "TSLA", "V", "AMZN"];
