//! Filter engine.
//!
//! Both query shapes run over one primitive, [`select`], which walks the
//! record set in load order and stops as soon as `limit` matches are
//! collected. Records after that point are never evaluated.

use crate::domain::alias::{resolve_or, Metric};
use crate::domain::condition::{ComparisonOp, Condition};
use crate::domain::condition_eval::evaluate;
use crate::domain::condition_parser::parse;
use crate::domain::record::{Match, Record, RecordSet};
use crate::domain::value::FieldValue;

pub const DEFAULT_LIMIT: i64 = 20;

/// Converts a caller-supplied limit to a count. Non-positive means no results.
pub fn effective_limit(limit: i64) -> usize {
    usize::try_from(limit).unwrap_or(0)
}

pub fn select<'a, F>(records: &'a RecordSet, limit: i64, mut predicate: F) -> Vec<Match<'a>>
where
    F: FnMut(&Record) -> bool,
{
    let limit = effective_limit(limit);
    let mut matches = Vec::new();
    if limit == 0 {
        return matches;
    }

    for (symbol, record) in records.iter() {
        if predicate(record) {
            matches.push(Match { symbol, record });
            if matches.len() >= limit {
                break;
            }
        }
    }
    matches
}

/// Records satisfying every condition string, in load order.
pub fn filter_by_conditions<'a, S: AsRef<str>>(
    records: &'a RecordSet,
    conditions: &[S],
    limit: i64,
) -> Vec<Match<'a>> {
    let parsed: Vec<Condition> = conditions.iter().map(|c| parse(c.as_ref())).collect();
    select(records, limit, |record| {
        parsed.iter().all(|condition| evaluate(record, condition))
    })
}

/// A bound on one canonical metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPredicate {
    pub metric: Metric,
    pub op: ComparisonOp,
    pub bound: f64,
}

impl ThresholdPredicate {
    pub fn new(metric: Metric, op: ComparisonOp, bound: f64) -> Self {
        Self { metric, op, bound }
    }

    /// Missing metrics resolve to `0`. A present null, or a value with no
    /// numeric form, rejects the record.
    pub fn accepts(&self, record: &Record) -> bool {
        let zero = FieldValue::Number(0.0);
        match resolve_or(record, self.metric, &zero).as_number() {
            Some(value) => self.op.compare(value, self.bound),
            None => false,
        }
    }
}

/// Records passing every threshold, in load order.
pub fn screen<'a>(
    records: &'a RecordSet,
    predicates: &[ThresholdPredicate],
    limit: i64,
) -> Vec<Match<'a>> {
    select(records, limit, |record| predicates.iter().all(|p| p.accepts(record)))
}

/// Optional inclusive bounds for the range screen. Unset bounds impose nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Thresholds {
    pub cagr_min: Option<f64>,
    pub roe_min: Option<f64>,
    pub roi_min: Option<f64>,
    pub sharpe_min: Option<f64>,
    pub volatility_max: Option<f64>,
    pub dividend_min: Option<f64>,
}

impl Thresholds {
    pub fn predicates(&self) -> Vec<ThresholdPredicate> {
        [
            (Metric::Cagr, ComparisonOp::Ge, self.cagr_min),
            (Metric::Roe, ComparisonOp::Ge, self.roe_min),
            (Metric::Roi, ComparisonOp::Ge, self.roi_min),
            (Metric::Sharpe, ComparisonOp::Ge, self.sharpe_min),
            (Metric::Volatility, ComparisonOp::Le, self.volatility_max),
            (Metric::DividendYield, ComparisonOp::Ge, self.dividend_min),
        ]
        .into_iter()
        .filter_map(|(metric, op, bound)| bound.map(|b| ThresholdPredicate::new(metric, op, b)))
        .collect()
    }
}

/// High CAGR and high ROE. Bounds are strict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthScreen {
    pub cagr_min: f64,
    pub roe_min: f64,
}

impl Default for GrowthScreen {
    fn default() -> Self {
        Self {
            cagr_min: 15.0,
            roe_min: 20.0,
        }
    }
}

impl GrowthScreen {
    pub fn predicates(&self) -> Vec<ThresholdPredicate> {
        vec![
            ThresholdPredicate::new(Metric::Cagr, ComparisonOp::Gt, self.cagr_min),
            ThresholdPredicate::new(Metric::Roe, ComparisonOp::Gt, self.roe_min),
        ]
    }
}

/// Good risk-adjusted return, low volatility, paying dividends. Bounds are strict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefensiveScreen {
    pub sharpe_min: f64,
    pub volatility_max: f64,
    pub dividend_min: f64,
}

impl Default for DefensiveScreen {
    fn default() -> Self {
        Self {
            sharpe_min: 1.2,
            volatility_max: 20.0,
            dividend_min: 3.0,
        }
    }
}

impl DefensiveScreen {
    pub fn predicates(&self) -> Vec<ThresholdPredicate> {
        vec![
            ThresholdPredicate::new(Metric::Sharpe, ComparisonOp::Gt, self.sharpe_min),
            ThresholdPredicate::new(Metric::Volatility, ComparisonOp::Lt, self.volatility_max),
            ThresholdPredicate::new(Metric::DividendYield, ComparisonOp::Gt, self.dividend_min),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn symbols(matches: &[Match<'_>]) -> Vec<String> {
        matches.iter().map(|m| m.symbol.to_string()).collect()
    }

    fn sample_set() -> RecordSet {
        RecordSet::new()
            .with(
                "AAA",
                Record::new()
                    .with("CAGR", 18.0)
                    .with("Return on Equity (ttm)", 25.0),
            )
            .with("BBB", Record::new().with("CAGR", 10.0))
            .with(
                "CCC",
                Record::new()
                    .with("CAGR", 30.0)
                    .with("Return_on_Equity", 22.0),
            )
            .with(
                "DDD",
                Record::new()
                    .with("CAGR", 40.0)
                    .with("Return on Equity (ttm)", FieldValue::Null)
                    .with("Return_on_Equity", 50.0),
            )
    }

    #[test]
    fn effective_limit_clamps_non_positive() {
        assert_eq!(effective_limit(20), 20);
        assert_eq!(effective_limit(0), 0);
        assert_eq!(effective_limit(-5), 0);
    }

    #[test]
    fn conditions_are_conjunctive_and_ordered() {
        let set = sample_set();
        let result = filter_by_conditions(&set, &["CAGR > 15", "CAGR < 35"], 20);
        assert_eq!(symbols(&result), vec!["AAA", "CCC"]);
    }

    #[test]
    fn empty_condition_list_matches_all() {
        let set = sample_set();
        let none: [&str; 0] = [];
        assert_eq!(filter_by_conditions(&set, &none, 20).len(), 4);
    }

    #[test]
    fn limit_truncates_in_order() {
        let set = sample_set();
        let result = filter_by_conditions(&set, &["CAGR > 5"], 2);
        assert_eq!(symbols(&result), vec!["AAA", "BBB"]);
    }

    #[test]
    fn non_positive_limit_returns_nothing_and_evaluates_nothing() {
        let set = sample_set();
        let calls = Cell::new(0);
        let result = select(&set, 0, |_| {
            calls.set(calls.get() + 1);
            true
        });
        assert!(result.is_empty());
        assert_eq!(calls.get(), 0);
        assert!(filter_by_conditions(&set, &["CAGR > 5"], -1).is_empty());
    }

    #[test]
    fn early_exit_stops_evaluation() {
        let set = sample_set();
        let calls = Cell::new(0);
        let result = select(&set, 1, |_| {
            calls.set(calls.get() + 1);
            true
        });
        assert_eq!(result.len(), 1);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn threshold_screen_scenario() {
        let set = RecordSet::new()
            .with(
                "AAA",
                Record::new()
                    .with("CAGR", 18.0)
                    .with("Return on Equity (ttm)", 25.0),
            )
            .with("BBB", Record::new().with("CAGR", 10.0));
        let thresholds = Thresholds {
            cagr_min: Some(15.0),
            roe_min: Some(20.0),
            ..Default::default()
        };
        let result = screen(&set, &thresholds.predicates(), 20);
        assert_eq!(symbols(&result), vec!["AAA"]);
    }

    #[test]
    fn threshold_uses_alias_and_rejects_present_null() {
        let set = sample_set();
        let thresholds = Thresholds {
            roe_min: Some(20.0),
            ..Default::default()
        };
        // DDD has a null primary ROE key; the 50.0 alias is not consulted.
        let result = screen(&set, &thresholds.predicates(), 20);
        assert_eq!(symbols(&result), vec!["AAA", "CCC"]);
    }

    #[test]
    fn threshold_bounds_are_inclusive() {
        let set = sample_set();
        let thresholds = Thresholds {
            cagr_min: Some(18.0),
            ..Default::default()
        };
        let result = screen(&set, &thresholds.predicates(), 20);
        assert_eq!(symbols(&result), vec!["AAA", "CCC", "DDD"]);
    }

    #[test]
    fn missing_metric_defaults_to_zero() {
        let set = RecordSet::new()
            .with("LOW", Record::new().with("Volatility", 12.0))
            .with("NONE", Record::new())
            .with("HIGH", Record::new().with("Annualized Volatility (%)", 35.0));
        let thresholds = Thresholds {
            volatility_max: Some(20.0),
            ..Default::default()
        };
        let result = screen(&set, &thresholds.predicates(), 20);
        assert_eq!(symbols(&result), vec!["LOW", "NONE"]);

        let thresholds = Thresholds {
            roi_min: Some(0.0),
            ..Default::default()
        };
        assert_eq!(screen(&set, &thresholds.predicates(), 20).len(), 3);
    }

    #[test]
    fn unset_thresholds_match_everything() {
        let set = sample_set();
        assert!(Thresholds::default().predicates().is_empty());
        assert_eq!(screen(&set, &[], 20).len(), 4);
    }

    #[test]
    fn non_numeric_metric_rejected() {
        let set = RecordSet::new().with("TXT", Record::new().with("CAGR", "n/a"));
        let thresholds = Thresholds {
            cagr_min: Some(-100.0),
            ..Default::default()
        };
        assert!(screen(&set, &thresholds.predicates(), 20).is_empty());
    }

    #[test]
    fn growth_preset_is_strict() {
        let set = RecordSet::new()
            .with(
                "EDGE",
                Record::new()
                    .with("CAGR", 15.0)
                    .with("Return on Equity (ttm)", 25.0),
            )
            .with(
                "GROW",
                Record::new()
                    .with("CAGR", 16.0)
                    .with("Return_on_Equity", 21.0),
            );
        let result = screen(&set, &GrowthScreen::default().predicates(), 20);
        assert_eq!(symbols(&result), vec!["GROW"]);
    }

    #[test]
    fn defensive_preset() {
        let set = RecordSet::new()
            .with(
                "UTIL",
                Record::new()
                    .with("Sharpe Ratio", 1.5)
                    .with("Volatility", 12.0)
                    .with("Trailing Annual Dividend Yield", 4.2),
            )
            .with(
                "TECH",
                Record::new()
                    .with("Sharpe Ratio", 2.0)
                    .with("Annualized Volatility (%)", 35.0)
                    .with("Dividend_Yield", 0.5),
            )
            .with(
                "NODATA",
                Record::new().with("Sharpe Ratio", 1.5).with("Volatility", 10.0),
            );
        let result = screen(&set, &DefensiveScreen::default().predicates(), 20);
        assert_eq!(symbols(&result), vec!["UTIL"]);
    }
}
