//! # stmt-client
//!
//! AlphaVantage client for the financial statement endpoints, with no
//! filesystem or database dependencies.
//!
//! ## Features
//!
//! - **Raw or typed**: fetch a statement verbatim as JSON, or as a `RawStatement`
//! - **Rate Limiting**: per-minute quota enforced before every request
//! - **Bounded requests**: every request carries a timeout, failures are never retried
//! - **Configurable**: environment-based configuration via stmt-core
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stmt_client::AlphaVantageClient;
//! use stmt_core::{Config, StatementFunction};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let client = AlphaVantageClient::new(config)?;
//!
//!     let doc = client.fundamentals().statement("AAPL", StatementFunction::BalanceSheet).await?;
//!     println!("{}", doc["symbol"]);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Rate Limiting
//!
//! The free tier allows 5 requests per minute and 25 per day. The per-minute
//! limit is enforced here (`AV_RATE_LIMIT`); the daily budget is the caller's
//! concern.
//!
//! ## Error Handling
//!
//! All methods return `Result<T, stmt_core::Error>`.

#![deny(missing_docs)]
#![warn(clippy::all)]

/// The top level API client
pub mod client;
/// Endpoint groups exposed by the client
pub mod endpoints;
pub mod transport;

pub use client::AlphaVantageClient;
pub use endpoints::fundamentals::FundamentalsEndpoints;
pub use stmt_core::{Config, Error, Result, StatementFunction};
