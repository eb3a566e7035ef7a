//! # stmt-loaders
//!
//! Fetching and merging of financial statements.
//!
//! This crate provides:
//! - A quota scheduler that fetches the next slice of a symbol universe per run
//!   and remembers which symbols were already fetched
//! - A loader that downloads every configured statement of one symbol
//! - A merger that combines the per-statement files into one summary per symbol

pub mod error;
pub mod layout;
pub mod loader;
pub mod merger;
pub mod progress;
pub mod scheduler;
pub mod source;
pub mod statement_loader;
pub mod storage;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use error::{LoaderError, LoaderResult};
pub use layout::DataLayout;
pub use loader::{DataLoader, LoaderConfig, LoaderContext};
pub use progress::{FetchedProgress, ProgressStore};
pub use source::StatementSource;

// Re-export loaders
pub use merger::{SourceDocument, StatementMerger, SummaryRunReport, merge_documents};
pub use scheduler::{
  BatchPlan, FetchRunReport, QuotaScheduler, SchedulerConfig, SchedulerStatus, compute_batch,
  symbols_per_run,
};
pub use statement_loader::{
  FetchOutcome, StatementLoader, StatementLoaderInput, StatementLoaderOutput, fetch_one,
};

