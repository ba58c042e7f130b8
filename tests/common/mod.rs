#![allow(dead_code)]

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use stockscreen::domain::error::ScreenerError;
use stockscreen::domain::record::{Record, RecordSet};
use stockscreen::ports::record_source::RecordSource;

/// Record source serving a queue of prepared results, repeating the last.
pub struct MockRecordSource {
    results: Mutex<Vec<Result<RecordSet, String>>>,
    pub loads: AtomicUsize,
}

impl MockRecordSource {
    pub fn new(records: RecordSet) -> Self {
        Self {
            results: Mutex::new(vec![Ok(records)]),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn then(self, records: RecordSet) -> Self {
        self.results.lock().unwrap().push(Ok(records));
        self
    }

    pub fn then_fail(self, reason: &str) -> Self {
        self.results.lock().unwrap().push(Err(reason.to_string()));
        self
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl RecordSource for MockRecordSource {
    fn load(&self) -> Result<RecordSet, ScreenerError> {
        let n = self.loads.fetch_add(1, Ordering::SeqCst);
        let results = self.results.lock().unwrap();
        let index = n.min(results.len() - 1);
        results[index].clone().map_err(|reason| ScreenerError::DataLoad {
            source_name: "mock".to_string(),
            reason,
        })
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

pub fn stock(cagr: f64, roe: f64, industry: &str) -> Record {
    Record::new()
        .with("CAGR", cagr)
        .with("Return on Equity (ttm)", roe)
        .with("Stock Industry", industry)
}

/// Small universe mixing both schemas.
pub fn sample_records() -> RecordSet {
    RecordSet::new()
        .with(
            "AAA",
            stock(20.0, 25.0, "Tech")
                .with("Sharpe Ratio", 1.5)
                .with("Annualized Volatility (%)", 15.0)
                .with("Dividend_Yield", 4.0),
        )
        .with("BBB", stock(10.0, 30.0, "Banking").with("Sharpe Ratio", 0.8))
        .with(
            "CCC",
            Record::new()
                .with("CAGR", 18.0)
                .with("Return_on_Equity", 22.0)
                .with("Volatility", 12.0)
                .with("Trailing Annual Dividend Yield", 3.5)
                .with("Sharpe Ratio", 1.3)
                .with("Stock Industry", "tech"),
        )
        .with(
            "DDD",
            Record::new()
                .with("CAGR", stockscreen::domain::value::FieldValue::Null)
                .with("Stock Industry", "Mining"),
        )
}

pub const SAMPLE_JSON: &str = r#"{
  "AAA": {"CAGR": 20, "Return on Equity (ttm)": 25, "Stock Industry": "Tech"},
  "BBB": {"CAGR": 10, "Return on Equity (ttm)": 30, "Stock Industry": "Banking"},
  "CCC": {"CAGR": null, "Stock Industry": "Tech"}
}"#;

pub const SAMPLE_CSV: &str = "Symbol,CAGR,Return_on_Equity,Stock Industry\n\
    AAA,20,25,Tech\n\
    BBB,10,30,Banking\n\
    CCC,N/A,,Tech\n";

pub fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub fn symbols<T: AsRef<str>>(items: impl IntoIterator<Item = T>) -> Vec<String> {
    items.into_iter().map(|s| s.as_ref().to_string()).collect()
}
