//! # stmt-models
//!
//! Data models for AlphaVantage financial statement responses.
//!
//! - [`RawStatement`]: the envelope shared by INCOME_STATEMENT, BALANCE_SHEET
//!   and CASH_FLOW responses
//! - [`Report`]: one fiscal period's line items, kept as an ordered field map
//! - [`Summary`]: every statement of a symbol merged by fiscal date
//!
//! ## Usage
//!
//! ```ignore
//! use stmt_models::RawStatement;
//!
//! let statement: RawStatement = serde_json::from_str(&response_json)?;
//! for report in &statement.annual_reports {
//!     println!("{:?}", report.fiscal_date_ending());
//! }
//! ```

#![warn(clippy::all)]

pub mod fundamentals;
pub mod summary;

pub use fundamentals::*;
pub use summary::Summary;
