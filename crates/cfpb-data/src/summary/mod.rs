//! Figures behind the dashboard's cards and charts

use std::cmp::Reverse;
use std::collections::BTreeMap;
use ahash::AHashMap;
use arrow::array::{Array, StringArray};
use arrow::record_batch::RecordBatch;
use chrono::Datelike;
use cfpb_core::columns::{
    COMPANY, COMPANY_RESPONSE, CONSUMER_DISPUTED, ISSUE, PRODUCT, STATE, SUBMITTED_VIA,
};
use cfpb_core::dates::days_to_date;
use serde::Serialize;

use crate::table::{date_column, string_column, timely_column};
use crate::DataError;

/// A category value and how many complaints carry it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Aggregates over a (filtered) complaints table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_complaints: usize,

    /// Share of complaints answered in time, in [0, 1]
    pub timely_rate: Option<f64>,

    /// Share of "Yes" among complaints with a dispute answer, in [0, 1]
    pub disputed_rate: Option<f64>,

    pub top_company: Option<CategoryCount>,
    pub top_product: Option<CategoryCount>,
    pub top_issue: Option<CategoryCount>,

    /// Complaints per calendar month (`YYYY-MM`), oldest first
    pub by_month: Vec<CategoryCount>,

    /// Complaints per state, most first
    pub by_state: Vec<CategoryCount>,

    /// Complaints per submission channel, most first
    pub by_channel: Vec<CategoryCount>,

    /// Complaints per company response, most first
    pub by_response: Vec<CategoryCount>,
}

impl Summary {
    /// Summarize a normalized table. An empty table yields zero totals and
    /// empty breakdowns.
    pub fn from_table(table: &RecordBatch) -> Result<Self, DataError> {
        let total_complaints = table.num_rows();
        let timely = timely_column(table)?;

        let timely_rate = (total_complaints > 0).then(|| {
            let on_time: usize = timely.values().iter().map(|v| *v as usize).sum();
            on_time as f64 / total_complaints as f64
        });

        Ok(Self {
            total_complaints,
            timely_rate,
            disputed_rate: disputed_rate(string_column(table, CONSUMER_DISPUTED)?),
            top_company: value_counts(string_column(table, COMPANY)?).into_iter().next(),
            top_product: value_counts(string_column(table, PRODUCT)?).into_iter().next(),
            top_issue: value_counts(string_column(table, ISSUE)?).into_iter().next(),
            by_month: monthly_counts(table)?,
            by_state: value_counts(string_column(table, STATE)?),
            by_channel: value_counts(string_column(table, SUBMITTED_VIA)?),
            by_response: value_counts(string_column(table, COMPANY_RESPONSE)?),
        })
    }
}

/// Count non-null values, most frequent first, ties by value
pub fn value_counts(values: &StringArray) -> Vec<CategoryCount> {
    let mut counts: AHashMap<&str, usize> = AHashMap::new();
    for row in 0..values.len() {
        if values.is_valid(row) {
            *counts.entry(values.value(row)).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(value, count)| CategoryCount {
            value: value.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| (Reverse(a.count), &a.value).cmp(&(Reverse(b.count), &b.value)));
    ranked
}

fn disputed_rate(values: &StringArray) -> Option<f64> {
    let answered = values.len() - values.null_count();
    if answered == 0 {
        return None;
    }
    let disputed = (0..values.len())
        .filter(|&row| values.is_valid(row) && values.value(row) == "Yes")
        .count();
    Some(disputed as f64 / answered as f64)
}

fn monthly_counts(table: &RecordBatch) -> Result<Vec<CategoryCount>, DataError> {
    let dates = date_column(table)?;
    let mut months: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for row in 0..dates.len() {
        if let Some(date) = dates.is_valid(row).then(|| days_to_date(dates.value(row))).flatten() {
            *months.entry((date.year(), date.month())).or_insert(0) += 1;
        }
    }

    Ok(months
        .into_iter()
        .map(|((year, month), count)| CategoryCount {
            value: format!("{:04}-{:02}", year, month),
            count,
        })
        .collect())
}
