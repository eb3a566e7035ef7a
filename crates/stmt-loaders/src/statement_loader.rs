/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Downloads every configured statement for one symbol and stores it on disk

use async_trait::async_trait;
use std::path::PathBuf;
use stmt_core::StatementFunction;
use tracing::{info, warn};

use crate::{DataLoader, LoaderContext, LoaderError, LoaderResult, storage};

/// Result of a single (symbol, function) request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
  /// Statement written to the given file
  Saved(PathBuf),
  /// Request failed or the API returned no statement; the reason was logged
  Failed(String),
}

impl FetchOutcome {
  pub fn is_saved(&self) -> bool {
    matches!(self, FetchOutcome::Saved(_))
  }
}

/// Fetch one statement and write it to `{data_dir}/{FUNCTION}/{symbol}.json`.
///
/// Transport failures and responses without statement data are logged and
/// returned as [`FetchOutcome::Failed`]. Only a failure to write the file is
/// an error, since that would repeat for every remaining symbol.
pub async fn fetch_one(
  context: &LoaderContext,
  symbol: &str,
  function: StatementFunction,
) -> LoaderResult<FetchOutcome> {
  match context.source.fetch_statement(symbol, function).await {
    Ok(document) => {
      let path = context.layout.statement_path(function, symbol);
      storage::write_json_pretty(&path, &document).await?;
      info!("{} for {} saved to {}", function, symbol, path.display());
      Ok(FetchOutcome::Saved(path))
    }
    Err(e) => {
      warn!("Error fetching {} for {}: {}", function, symbol, e);
      Ok(FetchOutcome::Failed(e.to_string()))
    }
  }
}

/// Loader for the statements of one symbol
#[derive(Debug, Default, Clone)]
pub struct StatementLoader;

impl StatementLoader {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl DataLoader for StatementLoader {
  type Input = StatementLoaderInput;
  type Output = StatementLoaderOutput;

  async fn load(&self, context: &LoaderContext, input: Self::Input) -> LoaderResult<Self::Output> {
    self.validate_input(&input).await?;

    let mut outcomes = Vec::with_capacity(input.functions.len());
    for function in &input.functions {
      let outcome = fetch_one(context, &input.symbol, *function).await?;
      outcomes.push((*function, outcome));
    }

    Ok(StatementLoaderOutput { symbol: input.symbol, outcomes })
  }

  async fn validate_input(&self, input: &Self::Input) -> LoaderResult<()> {
    if input.symbol.trim().is_empty() {
      return Err(LoaderError::InvalidData("Empty symbol".to_string()));
    }
    if input.functions.is_empty() {
      return Err(LoaderError::ConfigurationError("No statement functions to fetch".to_string()));
    }
    Ok(())
  }
}

#[derive(Debug, Clone)]
pub struct StatementLoaderInput {
  pub symbol: String,
  /// Functions in the order they are requested
  pub functions: Vec<StatementFunction>,
}

#[derive(Debug, Clone)]
pub struct StatementLoaderOutput {
  pub symbol: String,
  pub outcomes: Vec<(StatementFunction, FetchOutcome)>,
}

impl StatementLoaderOutput {
  pub fn saved_count(&self) -> usize {
    self.outcomes.iter().filter(|(_, o)| o.is_saved()).count()
  }

  pub fn failed_count(&self) -> usize {
    self.outcomes.len() - self.saved_count()
  }
}
