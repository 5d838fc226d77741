//! Row normalization for freshly loaded tables
//!
//! Turns the all-text table produced by a source into the normalized layout:
//! `date_received` parsed into a calendar date and `timely` binarized to 0/1.

use std::sync::Arc;
use arrow::array::{Array, ArrayRef, Date32Array, Int8Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use cfpb_core::columns::{DATE_RECEIVED, TIMELY};
use cfpb_core::dates::{date_to_days, parse_date};
use cfpb_core::{complaint_schema, COLUMNS};
use tracing::debug;

use crate::DataError;

/// The only source value that counts as a timely response
const TIMELY_YES: &str = "Yes";

/// Normalize a raw complaints table.
///
/// Every expected column must be present as text; extra columns are dropped.
/// A missing or non-text column is a `Schema` error, an unparseable or null
/// date is a `DateParse` error naming the first offending row.
pub fn normalize(raw: &RecordBatch) -> Result<RecordBatch, DataError> {
    let schema = raw.schema();
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(COLUMNS.len());

    for name in COLUMNS {
        let idx = schema
            .index_of(name)
            .map_err(|_| DataError::Schema(format!("missing column '{}'", name)))?;
        let text = as_text(raw.column(idx), name)?;
        let text = text
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| DataError::Schema(format!("column '{}' is not text", name)))?;

        let normalized: ArrayRef = match name {
            DATE_RECEIVED => Arc::new(parse_dates(text)?),
            TIMELY => Arc::new(binarize_timely(text)),
            _ => Arc::new(text.clone()),
        };
        columns.push(normalized);
    }

    let table = RecordBatch::try_new(complaint_schema(), columns)?;
    debug!("Normalized {} rows", table.num_rows());
    Ok(table)
}

/// Accept `Utf8` as is and `LargeUtf8` via a cast; reject everything else
fn as_text(column: &ArrayRef, name: &str) -> Result<ArrayRef, DataError> {
    match column.data_type() {
        DataType::Utf8 => Ok(column.clone()),
        DataType::LargeUtf8 => Ok(arrow::compute::cast(column, &DataType::Utf8)?),
        other => Err(DataError::Schema(format!(
            "column '{}' is {} (expected text)",
            name, other
        ))),
    }
}

fn parse_dates(values: &StringArray) -> Result<Date32Array, DataError> {
    let days = (0..values.len())
        .map(|row| {
            let value = (!values.is_null(row)).then(|| values.value(row));
            value
                .and_then(parse_date)
                .map(date_to_days)
                .ok_or_else(|| DataError::DateParse {
                    row,
                    value: value.map(str::to_string),
                })
        })
        .collect::<Result<Vec<i32>, DataError>>()?;

    Ok(Date32Array::from(days))
}

fn binarize_timely(values: &StringArray) -> Int8Array {
    let flags: Vec<i8> = (0..values.len())
        .map(|row| (!values.is_null(row) && values.value(row) == TIMELY_YES) as i8)
        .collect();
    Int8Array::from(flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::LargeStringArray;
    use arrow::datatypes::{Field, Schema};
    use cfpb_core::columns::COMPANY;
    use crate::fixtures::{raw_batch, FixtureRow};
    use crate::table::{date_column, string_column, timely_column};

    #[test]
    fn test_timely_is_binary_and_exact() {
        let raw = raw_batch(&[
            FixtureRow::new("2020-01-01", "A", "Mortgage").timely("Yes"),
            FixtureRow::new("2020-01-02", "A", "Mortgage").timely("No"),
            FixtureRow::new("2020-01-03", "A", "Mortgage").timely("yes"),
            FixtureRow::new("2020-01-04", "A", "Mortgage").timely("Yes "),
            FixtureRow::new("2020-01-05", "A", "Mortgage").no_timely(),
        ]);

        let table = normalize(&raw).unwrap();
        let timely = timely_column(&table).unwrap();

        assert_eq!(timely.values().to_vec(), vec![1, 0, 0, 0, 0]);
        assert_eq!(timely.null_count(), 0);
    }

    #[test]
    fn test_dates_are_parsed_and_time_dropped() {
        let raw = raw_batch(&[
            FixtureRow::new("2020-06-01", "A", "Mortgage"),
            FixtureRow::new("2020-06-01 17:45:00", "A", "Mortgage"),
        ]);

        let table = normalize(&raw).unwrap();
        let dates = date_column(&table).unwrap();

        assert_eq!(dates.value(0), dates.value(1));
        assert_eq!(dates.value(0), 18414);
    }

    #[test]
    fn test_unparseable_date_fails() {
        let raw = raw_batch(&[
            FixtureRow::new("2020-06-01", "A", "Mortgage"),
            FixtureRow::new("last tuesday", "A", "Mortgage"),
        ]);

        match normalize(&raw) {
            Err(DataError::DateParse { row, value }) => {
                assert_eq!(row, 1);
                assert_eq!(value.as_deref(), Some("last tuesday"));
            }
            other => panic!("expected DateParse, got {:?}", other),
        }
    }

    #[test]
    fn test_null_date_fails() {
        let raw = raw_batch(&[FixtureRow::new("2020-06-01", "A", "Mortgage").raw_date(None)]);

        let err = normalize(&raw).unwrap_err();
        assert!(matches!(err, DataError::DateParse { row: 0, value: None }));
        assert!(err.is_data_unavailable());
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let raw = raw_batch(&[FixtureRow::new("2020-06-01", "A", "Mortgage")]);
        let without_timely = raw
            .project(&(0..raw.num_columns()).filter(|i| COLUMNS[*i] != TIMELY).collect::<Vec<_>>())
            .unwrap();

        let err = normalize(&without_timely).unwrap_err();
        assert!(matches!(err, DataError::Schema(_)));
        assert!(!err.is_data_unavailable());
    }

    #[test]
    fn test_passthrough_columns_and_large_utf8() {
        let raw = raw_batch(&[
            FixtureRow::new("2020-06-01", "A", "Mortgage").disputed(Some("Yes")),
            FixtureRow::new("2020-06-02", "B", "Mortgage").disputed(None),
        ]);

        // Swap the company column for a LargeUtf8 copy
        let company_idx = raw.schema().index_of(COMPANY).unwrap();
        let mut fields: Vec<Field> = raw.schema().fields().iter().map(|f| f.as_ref().clone()).collect();
        fields[company_idx] = Field::new(COMPANY, DataType::LargeUtf8, true);
        let mut columns = raw.columns().to_vec();
        columns[company_idx] = Arc::new(LargeStringArray::from(vec!["A", "B"]));
        let raw = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).unwrap();

        let table = normalize(&raw).unwrap();
        assert_eq!(table.schema(), complaint_schema());

        let company = string_column(&table, COMPANY).unwrap();
        assert_eq!(company.value(1), "B");

        let disputed = string_column(&table, cfpb_core::columns::CONSUMER_DISPUTED).unwrap();
        assert_eq!(disputed.value(0), "Yes");
        assert!(disputed.is_null(1));
    }

    #[test]
    fn test_empty_table_keeps_schema() {
        let table = normalize(&RecordBatch::new_empty(cfpb_core::raw_schema())).unwrap();
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.schema(), complaint_schema());
    }
}
