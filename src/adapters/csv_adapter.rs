//! Tabular CSV record source.
//!
//! The first column holds the symbol; every other header names a field.
//! Missing cells are normalized to null.

use crate::domain::error::ScreenerError;
use crate::domain::record::{Record, RecordSet};
use crate::domain::value::{parse_number, FieldValue};
use crate::ports::record_source::RecordSource;
use std::fs;
use std::path::PathBuf;

/// Cell texts read as missing, compared ignoring case. Matches the default
/// NA set of common spreadsheet and dataframe exports.
const MISSING_MARKERS: [&str; 14] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "1.#IND", "1.#QNAN", "<NA>", "N/A",
    "NA", "NULL", "NaN", "None",
];

pub struct CsvRecordSource {
    path: PathBuf,
}

impl CsvRecordSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load_error(&self, reason: impl Into<String>) -> ScreenerError {
        ScreenerError::DataLoad {
            source_name: self.path.display().to_string(),
            reason: reason.into(),
        }
    }

    pub fn parse(&self, content: &str) -> Result<RecordSet, ScreenerError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = rdr
            .headers()
            .map_err(|e| self.load_error(format!("CSV header error: {}", e)))?
            .clone();
        if headers.is_empty() {
            return Err(self.load_error("missing header row"));
        }

        let mut records = RecordSet::new();
        for (row, result) in rdr.records().enumerate() {
            let row_data = result.map_err(|e| self.load_error(format!("CSV parse error: {}", e)))?;

            let symbol = row_data.get(0).map(str::trim).unwrap_or_default();
            if symbol.is_empty() {
                tracing::debug!(row = row + 1, "skipping row without symbol");
                continue;
            }

            let record: Record = headers
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, field)| {
                    let value = row_data.get(i).map_or(FieldValue::Null, parse_cell);
                    (field.trim().to_string(), value)
                })
                .collect();
            records.insert(symbol, record);
        }
        Ok(records)
    }
}

/// Normalizes one cell: blanks and missing-value markers become null.
pub fn parse_cell(cell: &str) -> FieldValue {
    let trimmed = cell.trim();
    if trimmed.is_empty()
        || MISSING_MARKERS
            .iter()
            .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    {
        return FieldValue::Null;
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return FieldValue::Boolean(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return FieldValue::Boolean(false);
    }
    match parse_number(trimmed) {
        Some(n) => FieldValue::Number(n),
        None => FieldValue::Text(trimmed.to_string()),
    }
}

impl RecordSource for CsvRecordSource {
    fn load(&self) -> Result<RecordSet, ScreenerError> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| self.load_error(format!("failed to read file: {}", e)))?;
        self.parse(&content)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::filter_by_conditions;
    use tempfile::TempDir;

    const SAMPLE: &str = "Symbol,CAGR,Return_on_Equity,Stock Industry,Is Profitable\n\
        BHP,12.5,18,Mining,true\n\
        CBA,,22.1,Banking,FALSE\n\
        ,1,2,3,true\n\
        WBC,NaN,N/A,Banking\n";

    fn source() -> CsvRecordSource {
        CsvRecordSource::new(PathBuf::from("stocks.csv"))
    }

    #[test]
    fn parses_rows_keyed_by_first_column() {
        let set = source().parse(SAMPLE).unwrap();
        let symbols: Vec<&str> = set.iter().map(|(s, _)| s).collect();
        assert_eq!(symbols, vec!["BHP", "CBA", "WBC"]);

        let bhp = set.get("BHP").unwrap();
        assert_eq!(bhp.get("CAGR"), Some(&FieldValue::Number(12.5)));
        assert_eq!(bhp.get("Stock Industry"), Some(&FieldValue::from("Mining")));
        assert_eq!(bhp.get("Is Profitable"), Some(&FieldValue::Boolean(true)));
        assert!(!bhp.contains("Symbol"));
    }

    #[test]
    fn missing_cells_become_null() {
        let set = source().parse(SAMPLE).unwrap();
        let cba = set.get("CBA").unwrap();
        assert_eq!(cba.get("CAGR"), Some(&FieldValue::Null));
        assert_eq!(cba.get("Is Profitable"), Some(&FieldValue::Boolean(false)));

        let wbc = set.get("WBC").unwrap();
        assert_eq!(wbc.get("CAGR"), Some(&FieldValue::Null));
        assert_eq!(wbc.get("Return_on_Equity"), Some(&FieldValue::Null));
        assert_eq!(wbc.get("Is Profitable"), Some(&FieldValue::Null));
    }

    #[test]
    fn parse_cell_kinds() {
        assert_eq!(parse_cell(" 3.5 "), FieldValue::Number(3.5));
        assert_eq!(parse_cell("-2"), FieldValue::Number(-2.0));
        assert_eq!(parse_cell("True"), FieldValue::Boolean(true));
        assert_eq!(parse_cell("Oil & Gas"), FieldValue::from("Oil & Gas"));
        assert_eq!(parse_cell(""), FieldValue::Null);
        assert_eq!(parse_cell("nan"), FieldValue::Null);
    }

    #[test]
    fn spreadsheet_missing_markers_become_null() {
        for cell in ["#N/A", "None", "-nan", "<NA>", "#NA", "-NaN", "1.#IND", " NULL ", "#n/a n/a"] {
            assert_eq!(parse_cell(cell), FieldValue::Null, "{cell}");
        }
    }

    #[test]
    fn missing_markers_never_match_negative_conditions() {
        let set = source()
            .parse("Symbol,CAGR\nAAA,#N/A\nBBB,None\nCCC,-nan\nDDD,7\n")
            .unwrap();
        let matches = filter_by_conditions(&set, &["CAGR != 5"], 20);
        let found: Vec<&str> = matches.iter().map(|m| m.symbol).collect();
        assert_eq!(found, vec!["DDD"]);
    }

    #[test]
    fn empty_file_has_no_records() {
        let err = source().parse("").unwrap_err();
        assert!(err.to_string().contains("header"));
    }

    #[test]
    fn load_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stocks.csv");
        fs::write(&path, SAMPLE).unwrap();
        let set = CsvRecordSource::new(path).load().unwrap();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn load_missing_file_fails() {
        let result = CsvRecordSource::new(PathBuf::from("/nonexistent/stocks.csv")).load();
        assert!(matches!(result, Err(ScreenerError::DataLoad { .. })));
    }
}
