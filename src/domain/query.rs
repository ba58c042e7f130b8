//! Lookups and paged listings over one record-set snapshot.

use crate::domain::alias::{resolve, Metric};
use crate::domain::error::ScreenerError;
use crate::domain::filter::effective_limit;
use crate::domain::record::{Match, Record, RecordSet};

pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// Looks up a symbol. Input is upper-cased first.
pub fn get<'a>(records: &'a RecordSet, symbol: &str) -> Result<Match<'a>, ScreenerError> {
    let key = symbol.trim().to_uppercase();
    records
        .get_match(&key)
        .ok_or(ScreenerError::NotFound { symbol: key })
}

pub fn list(records: &RecordSet, skip: usize, limit: i64) -> Vec<Match<'_>> {
    records
        .iter()
        .skip(skip)
        .take(effective_limit(limit))
        .map(|(symbol, record)| Match { symbol, record })
        .collect()
}

fn in_industry(record: &Record, industry: &str) -> bool {
    resolve(record, Metric::Industry)
        .and_then(|v| v.as_text())
        .is_some_and(|text| text.to_lowercase() == industry.to_lowercase())
}

/// Records whose industry equals `industry`, ignoring case.
///
/// Fails with `IndustryNotFound` only when no record at all is in the
/// industry; a `skip` past the end yields an empty page.
pub fn by_industry<'a>(
    records: &'a RecordSet,
    industry: &str,
    skip: usize,
    limit: i64,
) -> Result<Vec<Match<'a>>, ScreenerError> {
    let industry = industry.trim();
    let mut matching = records
        .iter()
        .filter(|(_, record)| in_industry(record, industry))
        .peekable();

    if matching.peek().is_none() {
        return Err(ScreenerError::IndustryNotFound {
            industry: industry.to_string(),
        });
    }

    Ok(matching
        .skip(skip)
        .take(effective_limit(limit))
        .map(|(symbol, record)| Match { symbol, record })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::FieldValue;

    fn sample_set() -> RecordSet {
        RecordSet::new()
            .with("AAA", Record::new().with("Stock Industry", "Tech"))
            .with("BBB", Record::new().with("Stock Industry", "Energy"))
            .with("CCC", Record::new().with("Stock Industry", "tech"))
            .with("DDD", Record::new().with("Stock Industry", FieldValue::Null))
            .with("EEE", Record::new())
    }

    fn symbols(matches: &[Match<'_>]) -> Vec<String> {
        matches.iter().map(|m| m.symbol.to_string()).collect()
    }

    #[test]
    fn get_upper_cases_symbol() {
        let set = sample_set();
        assert_eq!(get(&set, "aaa").unwrap().symbol, "AAA");
        assert_eq!(get(&set, " BBB ").unwrap().symbol, "BBB");
    }

    #[test]
    fn get_unknown_symbol() {
        let set = sample_set();
        let err = get(&set, "zzz").unwrap_err();
        assert!(matches!(err, ScreenerError::NotFound { ref symbol } if symbol == "ZZZ"));
    }

    #[test]
    fn list_pages_in_order() {
        let set = sample_set();
        assert_eq!(symbols(&list(&set, 1, 2)), vec!["BBB", "CCC"]);
        assert_eq!(list(&set, 0, 100).len(), 5);
        assert!(list(&set, 10, 100).is_empty());
        assert!(list(&set, 0, 0).is_empty());
    }

    #[test]
    fn industry_match_ignores_case() {
        let set = sample_set();
        let result = by_industry(&set, "TECH", 0, 100).unwrap();
        assert_eq!(symbols(&result), vec!["AAA", "CCC"]);
    }

    #[test]
    fn industry_match_is_exact() {
        let set = sample_set();
        assert!(by_industry(&set, "Tec", 0, 100).is_err());
    }

    #[test]
    fn industry_pagination() {
        let set = sample_set();
        assert_eq!(symbols(&by_industry(&set, "tech", 1, 100).unwrap()), vec!["CCC"]);
        assert!(by_industry(&set, "tech", 5, 100).unwrap().is_empty());
    }

    #[test]
    fn unknown_industry_is_not_found() {
        let set = sample_set();
        let err = by_industry(&set, "Mining", 0, 100).unwrap_err();
        assert!(err.is_not_found());
    }
}
