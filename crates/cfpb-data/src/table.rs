//! Typed column access over normalized complaint tables

use arrow::array::{Array, Date32Array, Int8Array, StringArray};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use cfpb_core::columns::{
    COMPANY, COMPANY_RESPONSE, CONSUMER_DISPUTED, DATE_RECEIVED, ISSUE, PRODUCT, STATE,
    SUBMITTED_VIA, SUB_PRODUCT, TIMELY,
};
use cfpb_core::dates::days_to_date;
use cfpb_core::ComplaintRecord;

use crate::DataError;

fn column<'a, T: Array + 'static>(table: &'a RecordBatch, name: &str, expected: &str) -> Result<&'a T, DataError> {
    let column = table
        .column_by_name(name)
        .ok_or_else(|| DataError::Schema(format!("missing column '{}'", name)))?;

    column.as_any().downcast_ref::<T>().ok_or_else(|| {
        DataError::Schema(format!(
            "column '{}' is {} (expected {})",
            name,
            column.data_type(),
            expected
        ))
    })
}

/// Get a text column
pub fn string_column<'a>(table: &'a RecordBatch, name: &str) -> Result<&'a StringArray, DataError> {
    column(table, name, "Utf8")
}

/// Get the `date_received` column
pub fn date_column(table: &RecordBatch) -> Result<&Date32Array, DataError> {
    column(table, DATE_RECEIVED, "Date32")
}

/// Get the `timely` column
pub fn timely_column(table: &RecordBatch) -> Result<&Int8Array, DataError> {
    column(table, TIMELY, "Int8")
}

/// Earliest and latest `date_received`, or `None` on an empty table
pub fn date_bounds(table: &RecordBatch) -> Result<Option<(NaiveDate, NaiveDate)>, DataError> {
    let dates = date_column(table)?;
    let min = arrow::compute::min(dates).and_then(days_to_date);
    let max = arrow::compute::max(dates).and_then(days_to_date);
    Ok(min.zip(max))
}

fn text(array: &StringArray, row: usize) -> Option<String> {
    if array.is_null(row) {
        None
    } else {
        Some(array.value(row).to_string())
    }
}

/// Read a normalized table back into typed records
pub fn to_records(table: &RecordBatch) -> Result<Vec<ComplaintRecord>, DataError> {
    let dates = date_column(table)?;
    let timely = timely_column(table)?;
    let product = string_column(table, PRODUCT)?;
    let sub_product = string_column(table, SUB_PRODUCT)?;
    let issue = string_column(table, ISSUE)?;
    let company = string_column(table, COMPANY)?;
    let state = string_column(table, STATE)?;
    let submitted_via = string_column(table, SUBMITTED_VIA)?;
    let company_response = string_column(table, COMPANY_RESPONSE)?;
    let consumer_disputed = string_column(table, CONSUMER_DISPUTED)?;

    (0..table.num_rows())
        .map(|row| -> Result<ComplaintRecord, DataError> {
            let date_received = days_to_date(dates.value(row)).ok_or_else(|| DataError::DateParse {
                row,
                value: Some(dates.value(row).to_string()),
            })?;

            Ok(ComplaintRecord {
                date_received,
                product: text(product, row),
                sub_product: text(sub_product, row),
                issue: text(issue, row),
                company: text(company, row),
                state: text(state, row),
                submitted_via: text(submitted_via, row),
                company_response: text(company_response, row),
                timely: timely.value(row) as u8,
                consumer_disputed: text(consumer_disputed, row),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{normalized, FixtureRow};

    #[test]
    fn test_to_records() {
        let table = normalized(&[
            FixtureRow::new("2020-06-01", "A", "Mortgage"),
            FixtureRow::new("2021-01-15", "B", "Credit card").timely("No").disputed(None),
        ]);

        let records = to_records(&table).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date_received, NaiveDate::from_ymd_opt(2020, 6, 1).unwrap());
        assert_eq!(records[0].company.as_deref(), Some("A"));
        assert!(records[0].is_timely());
        assert_eq!(records[1].timely, 0);
        assert_eq!(records[1].consumer_disputed, None);
    }

    #[test]
    fn test_date_bounds() {
        let table = normalized(&[
            FixtureRow::new("2020-06-01", "A", "Mortgage"),
            FixtureRow::new("2019-12-31", "A", "Mortgage"),
            FixtureRow::new("2021-01-15", "B", "Mortgage"),
        ]);

        let (min, max) = date_bounds(&table).unwrap().unwrap();
        assert_eq!(min, NaiveDate::from_ymd_opt(2019, 12, 31).unwrap());
        assert_eq!(max, NaiveDate::from_ymd_opt(2021, 1, 15).unwrap());

        let empty = RecordBatch::new_empty(cfpb_core::complaint_schema());
        assert_eq!(date_bounds(&empty).unwrap(), None);
    }

    #[test]
    fn test_wrong_column_type_is_schema_error() {
        let raw = crate::fixtures::raw_batch(&[FixtureRow::new("2020-06-01", "A", "Mortgage")]);
        let err = date_column(&raw).unwrap_err();
        assert!(matches!(err, DataError::Schema(_)));
    }
}
