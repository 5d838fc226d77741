//! Test fixtures: in-memory tables and throwaway SQLite databases

use std::path::Path;
use std::sync::Arc;
use arrow::array::{ArrayRef, StringArray};
use arrow::record_batch::RecordBatch;
use cfpb_core::{raw_schema, COLUMNS};
use rusqlite::Connection;

/// One raw complaint row with sensible defaults for the columns a test
/// does not care about
#[derive(Debug, Clone)]
pub struct FixtureRow {
    pub date: Option<String>,
    pub product: Option<String>,
    pub sub_product: Option<String>,
    pub issue: Option<String>,
    pub company: Option<String>,
    pub state: Option<String>,
    pub submitted_via: Option<String>,
    pub company_response: Option<String>,
    pub timely: Option<String>,
    pub consumer_disputed: Option<String>,
}

impl FixtureRow {
    pub fn new(date: &str, company: &str, product: &str) -> Self {
        Self {
            date: Some(date.to_string()),
            product: Some(product.to_string()),
            sub_product: None,
            issue: Some("Billing dispute".to_string()),
            company: Some(company.to_string()),
            state: Some("CA".to_string()),
            submitted_via: Some("Web".to_string()),
            company_response: Some("Closed with explanation".to_string()),
            timely: Some("Yes".to_string()),
            consumer_disputed: Some("No".to_string()),
        }
    }

    pub fn raw_date(mut self, date: Option<&str>) -> Self {
        self.date = date.map(str::to_string);
        self
    }

    pub fn timely(mut self, timely: &str) -> Self {
        self.timely = Some(timely.to_string());
        self
    }

    pub fn no_timely(mut self) -> Self {
        self.timely = None;
        self
    }

    pub fn disputed(mut self, disputed: Option<&str>) -> Self {
        self.consumer_disputed = disputed.map(str::to_string);
        self
    }

    pub fn issue(mut self, issue: &str) -> Self {
        self.issue = Some(issue.to_string());
        self
    }

    pub fn state(mut self, state: &str) -> Self {
        self.state = Some(state.to_string());
        self
    }

    pub fn via(mut self, via: &str) -> Self {
        self.submitted_via = Some(via.to_string());
        self
    }

    fn values(&self) -> [Option<&str>; 10] {
        [
            self.date.as_deref(),
            self.product.as_deref(),
            self.sub_product.as_deref(),
            self.issue.as_deref(),
            self.company.as_deref(),
            self.state.as_deref(),
            self.submitted_via.as_deref(),
            self.company_response.as_deref(),
            self.timely.as_deref(),
            self.consumer_disputed.as_deref(),
        ]
    }
}

/// Build a raw (all-text) table
pub fn raw_batch(rows: &[FixtureRow]) -> RecordBatch {
    let columns: Vec<ArrayRef> = (0..COLUMNS.len())
        .map(|idx| {
            let values: StringArray = rows.iter().map(|row| row.values()[idx]).collect();
            Arc::new(values) as ArrayRef
        })
        .collect();

    RecordBatch::try_new(raw_schema(), columns).unwrap()
}

/// Build a normalized table
pub fn normalized(rows: &[FixtureRow]) -> RecordBatch {
    crate::preprocess::normalize(&raw_batch(rows)).unwrap()
}

/// Write rows into a fresh SQLite database at `path`
pub fn write_database(path: &Path, table: &str, rows: &[FixtureRow]) {
    let mut conn = Connection::open(path).unwrap();
    let columns = COLUMNS
        .iter()
        .map(|c| format!("{} TEXT", c))
        .collect::<Vec<_>>()
        .join(", ");
    conn.execute_batch(&format!("CREATE TABLE {} ({});", table, columns)).unwrap();

    let tx = conn.transaction().unwrap();
    {
        let placeholders = (1..=COLUMNS.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let mut stmt = tx
            .prepare(&format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table,
                COLUMNS.join(", "),
                placeholders
            ))
            .unwrap();
        for row in rows {
            stmt.execute(rusqlite::params_from_iter(row.values())).unwrap();
        }
    }
    tx.commit().unwrap();
}

/// `count` rows for one company, spread over 2020
pub fn company_rows(company: &str, count: usize) -> Vec<FixtureRow> {
    (0..count)
        .map(|i| {
            let date = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
                + chrono::Duration::days((i % 366) as i64);
            FixtureRow::new(&date.format("%Y-%m-%d").to_string(), company, "Mortgage")
        })
        .collect()
}
