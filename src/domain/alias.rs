//! Canonical metric names and their field-name aliases.
//!
//! Records come from two historical schemas that name the same metric
//! differently. Each canonical metric lists its candidate field names in
//! preference order. The first candidate *present* in a record wins, even
//! when its value is null; a present null is never skipped in favour of a
//! later candidate.

use crate::domain::record::Record;
use crate::domain::value::FieldValue;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Cagr,
    Roe,
    Roi,
    Sharpe,
    Volatility,
    DividendYield,
    Industry,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::Cagr,
        Metric::Roe,
        Metric::Roi,
        Metric::Sharpe,
        Metric::Volatility,
        Metric::DividendYield,
        Metric::Industry,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Cagr => "CAGR",
            Metric::Roe => "ROE",
            Metric::Roi => "ROI",
            Metric::Sharpe => "Sharpe",
            Metric::Volatility => "Volatility",
            Metric::DividendYield => "Dividend Yield",
            Metric::Industry => "Industry",
        }
    }

    /// Candidate field names, most preferred first. Never empty.
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            Metric::Cagr => &["CAGR"],
            Metric::Roe => &["Return on Equity (ttm)", "Return_on_Equity"],
            Metric::Roi => &["Return_on_Investment", "ROI"],
            Metric::Sharpe => &["Sharpe Ratio"],
            Metric::Volatility => &["Annualized Volatility (%)", "Volatility"],
            Metric::DividendYield => &["Dividend_Yield", "Trailing Annual Dividend Yield"],
            Metric::Industry => &["Stock Industry"],
        }
    }

    /// Looks up a metric by canonical name, ignoring case.
    pub fn from_name(name: &str) -> Option<Metric> {
        Metric::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value of the first candidate field present in `record`, if any.
pub fn resolve(record: &Record, metric: Metric) -> Option<&FieldValue> {
    metric
        .candidates()
        .iter()
        .find_map(|candidate| record.get(candidate))
}

/// Like [`resolve`], falling back to `default` when no candidate is present.
pub fn resolve_or<'a>(record: &'a Record, metric: Metric, default: &'a FieldValue) -> &'a FieldValue {
    resolve(record, metric).unwrap_or(default)
}
