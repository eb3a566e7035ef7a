//! Consolidated per-symbol statement summary

use crate::fundamentals::{Period, Report};
use serde::{Deserialize, Serialize};

/// All statements of one symbol merged by fiscal date
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
  pub symbol: String,

  /// Annual reports ordered by fiscal date ascending
  #[serde(rename = "annualReports")]
  pub annual_reports: Vec<Report>,

  /// Quarterly reports ordered by fiscal date ascending
  #[serde(rename = "quarterlyReports")]
  pub quarterly_reports: Vec<Report>,
}

impl Summary {
  pub fn reports(&self, period: Period) -> &[Report] {
    match period {
      Period::Annual => &self.annual_reports,
      Period::Quarterly => &self.quarterly_reports,
    }
  }

  /// Find the merged report for a fiscal date
  pub fn report_for(&self, period: Period, fiscal_date: &str) -> Option<&Report> {
    self.reports(period).iter().find(|r| r.fiscal_date_ending() == Some(fiscal_date))
  }
}
