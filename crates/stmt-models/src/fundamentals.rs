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

//! Financial statement models for INCOME_STATEMENT, BALANCE_SHEET and CASH_FLOW
//!
//! The three statement endpoints share one envelope (`symbol`, `annualReports`,
//! `quarterlyReports`) but every report carries a different set of line items,
//! and AlphaVantage adds fields over time. Reports are therefore kept as
//! ordered field maps rather than fixed structs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key that identifies a report within its statement and period
pub const FISCAL_DATE_KEY: &str = "fiscalDateEnding";

/// Annual or quarterly report collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
  Annual,
  Quarterly,
}

impl Period {
  pub const ALL: [Period; 2] = [Period::Annual, Period::Quarterly];

  /// JSON key of the report collection
  pub fn key(&self) -> &'static str {
    match self {
      Period::Annual => "annualReports",
      Period::Quarterly => "quarterlyReports",
    }
  }
}

/// One period's line items, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report(Map<String, Value>);

impl Report {
  pub fn new() -> Self {
    Self(Map::new())
  }

  /// The `fiscalDateEnding` value, if present and a string
  pub fn fiscal_date_ending(&self) -> Option<&str> {
    self.0.get(FISCAL_DATE_KEY).and_then(Value::as_str)
  }

  pub fn get(&self, field: &str) -> Option<&Value> {
    self.0.get(field)
  }

  pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
    self.0.insert(field.into(), value)
  }

  /// Overlay `other` onto this report field by field.
  ///
  /// Fields present in `other` replace existing values; fields missing from
  /// `other` are left untouched. Existing fields keep their position, new
  /// ones are appended.
  pub fn merge(&mut self, other: Report) {
    for (field, value) in other.0 {
      self.0.insert(field, value);
    }
  }

  pub fn fields(&self) -> &Map<String, Value> {
    &self.0
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl From<Map<String, Value>> for Report {
  fn from(map: Map<String, Value>) -> Self {
    Self(map)
  }
}

impl FromIterator<(String, Value)> for Report {
  fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
    Self(iter.into_iter().collect())
  }
}

/// A statement document as returned by the API and stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStatement {
  /// Stock symbol, empty when the document did not carry one
  #[serde(default)]
  pub symbol: String,

  #[serde(rename = "annualReports", default)]
  pub annual_reports: Vec<Report>,

  #[serde(rename = "quarterlyReports", default)]
  pub quarterly_reports: Vec<Report>,
}

impl RawStatement {
  /// Returns the non-empty `symbol` of a raw API response, which is what
  /// distinguishes statement data from quota notes and error payloads.
  pub fn symbol_of(response: &Value) -> Option<&str> {
    response.get("symbol").and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty())
  }

  pub fn reports(&self, period: Period) -> &[Report] {
    match period {
      Period::Annual => &self.annual_reports,
      Period::Quarterly => &self.quarterly_reports,
    }
  }

  /// Take the report collection for `period`, leaving it empty
  pub fn take_reports(&mut self, period: Period) -> Vec<Report> {
    match period {
      Period::Annual => std::mem::take(&mut self.annual_reports),
      Period::Quarterly => std::mem::take(&mut self.quarterly_reports),
    }
  }
}
