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

//! Daily-quota scheduler
//!
//! Each run fetches the next slice of the symbol universe that fits in the
//! daily request budget, then records the processed symbols so the following
//! run picks up where this one stopped. Once every symbol has been fetched the
//! record is cleared and the cycle starts again from the top of the universe.

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use stmt_core::{StatementFunction, canonical_functions, normalize_universe};
use tracing::{error, info};

use crate::{
  DataLayout, DataLoader, FetchedProgress, LoaderContext, LoaderError, LoaderResult, ProgressStore,
  StatementLoader, StatementLoaderInput,
};

/// Symbols that fit in one run: one request per configured function.
pub fn symbols_per_run(daily_limit: usize, function_count: usize) -> usize {
  if function_count == 0 { 0 } else { daily_limit / function_count }
}

/// What the next run will fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
  /// Symbols to fetch, in universe order
  pub symbols: Vec<String>,
  /// Every universe symbol was already fetched; the record starts over
  pub reset: bool,
  /// Symbols still pending after this batch
  pub remaining_after: usize,
}

/// Select the next batch.
///
/// Pending symbols are the universe entries missing from `fetched`, in
/// universe order. When none are pending the whole universe becomes pending
/// again and the plan is flagged as a reset. The batch is the first `limit`
/// pending symbols.
pub fn compute_batch(universe: &[String], fetched: &FetchedProgress, limit: usize) -> BatchPlan {
  let mut remaining: Vec<&String> = universe.iter().filter(|s| !fetched.contains(s)).collect();

  let reset = remaining.is_empty();
  if reset {
    remaining = universe.iter().collect();
  }

  let take = limit.min(remaining.len());
  BatchPlan {
    symbols: remaining[..take].iter().map(|s| s.to_string()).collect(),
    reset,
    remaining_after: remaining.len() - take,
  }
}

/// Universe, budget and functions for the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
  pub universe: Vec<String>,
  pub daily_limit: usize,
  /// Functions in canonical order
  pub functions: Vec<StatementFunction>,
}

impl SchedulerConfig {
  /// Normalise the universe and functions and check that the budget covers
  /// at least one symbol.
  pub fn new<I, S>(
    universe: I,
    daily_limit: usize,
    functions: &[StatementFunction],
  ) -> LoaderResult<Self>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let universe = normalize_universe(universe)?;
    if universe.is_empty() {
      return Err(LoaderError::ConfigurationError("Symbol universe is empty".to_string()));
    }

    let functions = canonical_functions(functions);
    if functions.is_empty() {
      return Err(LoaderError::ConfigurationError("No statement functions configured".to_string()));
    }

    let config = Self { universe, daily_limit, functions };
    if config.symbols_per_run() == 0 {
      return Err(LoaderError::ConfigurationError(format!(
        "Daily limit {} is smaller than the {} requests needed per symbol",
        daily_limit,
        config.functions.len()
      )));
    }

    Ok(config)
  }

  pub fn symbols_per_run(&self) -> usize {
    symbols_per_run(self.daily_limit, self.functions.len())
  }
}

/// Progress snapshot used by `status`
#[derive(Debug, Clone)]
pub struct SchedulerStatus {
  /// Universe symbols already fetched this cycle
  pub fetched: usize,
  /// Universe symbols not yet fetched this cycle
  pub pending: usize,
  pub next: BatchPlan,
}

/// Outcome of one scheduler run
#[derive(Debug, Clone)]
pub struct FetchRunReport {
  /// Symbols processed in this run, in order
  pub symbols: Vec<String>,
  pub processed: usize,
  pub remaining: usize,
  pub reset: bool,
  /// Statement files written
  pub saved: usize,
  /// Requests that produced no file
  pub failed: usize,
  pub started_at: DateTime<Utc>,
  pub finished_at: DateTime<Utc>,
}

/// Runs one quota-bounded fetch pass
pub struct QuotaScheduler {
  config: SchedulerConfig,
  loader: StatementLoader,
}

impl QuotaScheduler {
  pub fn new(config: SchedulerConfig) -> Self {
    Self { config, loader: StatementLoader::new() }
  }

  pub fn config(&self) -> &SchedulerConfig {
    &self.config
  }

  /// Report progress and the next batch without fetching anything
  pub async fn status(&self, layout: &DataLayout) -> LoaderResult<SchedulerStatus> {
    let fetched = ProgressStore::new(&layout.progress_file).load().await?;
    let done = self.config.universe.iter().filter(|s| fetched.contains(s)).count();
    let next = compute_batch(&self.config.universe, &fetched, self.config.symbols_per_run());

    Ok(SchedulerStatus { fetched: done, pending: self.config.universe.len() - done, next })
  }

  /// Fetch the next batch and persist the updated progress record.
  ///
  /// A corrupt progress file aborts before any request is made. Failed
  /// requests are logged and the symbol is still recorded as fetched. An
  /// error writing a statement file stops the run; symbols completed before
  /// it are saved to the record before the error is returned.
  pub async fn run(&self, context: &LoaderContext) -> LoaderResult<FetchRunReport> {
    let started_at = Utc::now();
    let store = ProgressStore::new(&context.layout.progress_file);
    let mut progress = store.load().await?;

    let plan = compute_batch(&self.config.universe, &progress, self.config.symbols_per_run());
    if plan.reset {
      info!("All {} symbols fetched, starting a new cycle", self.config.universe.len());
      progress.clear();
    }

    info!(
      "Fetching {} symbols ({} functions each, daily limit {})",
      plan.symbols.len(),
      self.config.functions.len(),
      self.config.daily_limit
    );

    let bar = if context.config.show_progress {
      let pb = ProgressBar::new(plan.symbols.len() as u64);
      if let Ok(style) =
        ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
      {
        pb.set_style(style.progress_chars("##-"));
      }
      Some(pb)
    } else {
      None
    };

    let mut saved = 0;
    let mut failed = 0;
    let mut processed = Vec::with_capacity(plan.symbols.len());

    for symbol in &plan.symbols {
      if let Some(pb) = &bar {
        pb.set_message(symbol.clone());
      }

      let input =
        StatementLoaderInput { symbol: symbol.clone(), functions: self.config.functions.clone() };
      match self.loader.load(context, input).await {
        Ok(output) => {
          saved += output.saved_count();
          failed += output.failed_count();
        }
        Err(e) => {
          error!("Stopping run at {}: {}", symbol, e);
          if let Some(pb) = &bar {
            pb.abandon();
          }
          if let Err(save_err) = store.save(&progress).await {
            error!("Could not save progress after stopping: {}", save_err);
          }
          return Err(e);
        }
      }

      progress.push(symbol.clone());
      processed.push(symbol.clone());
      if let Some(pb) = &bar {
        pb.inc(1);
      }
    }

    store.save(&progress).await?;
    if let Some(pb) = bar {
      pb.finish_with_message("done");
    }

    info!("Fetched {} symbols this run. Remaining: {}", processed.len(), plan.remaining_after);

    Ok(FetchRunReport {
      processed: processed.len(),
      symbols: processed,
      remaining: plan.remaining_after,
      reset: plan.reset,
      saved,
      failed,
      started_at,
      finished_at: Utc::now(),
    })
  }
}
