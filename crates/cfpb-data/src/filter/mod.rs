//! Selection filtering over the normalized table
//!
//! Each row is tested independently against one predicate:
//!
//! ```text
//! start <= date_received <= end
//!     AND (companies empty OR company in companies)
//!     AND (products empty OR product in products)
//! ```
//!
//! Matching rows are returned as a new batch in their original order; the
//! input table is never modified.

use arrow::array::{Array, BooleanArray, StringArray};
use arrow::compute::filter_record_batch;
use arrow::record_batch::RecordBatch;
use cfpb_core::columns::{COMPANY, PRODUCT};
use cfpb_core::dates::date_to_days;
use cfpb_core::Selection;
use tracing::debug;

use crate::table::{date_bounds, date_column, string_column};
use crate::DataError;

/// Apply a selection to a normalized table.
///
/// Unset date bounds default to the table's own earliest/latest date. A start
/// after the end matches nothing. An empty table comes back unchanged.
pub fn apply(table: &RecordBatch, selection: &Selection) -> Result<RecordBatch, DataError> {
    let dates = date_column(table)?;
    let companies = string_column(table, COMPANY)?;
    let products = string_column(table, PRODUCT)?;

    let (min_date, max_date) = match date_bounds(table)? {
        Some(bounds) => bounds,
        None => return Ok(table.clone()),
    };
    let (start, end) = selection.resolve_bounds(min_date, max_date);
    let (start, end) = (date_to_days(start), date_to_days(end));

    let mask: BooleanArray = (0..table.num_rows())
        .map(|row| {
            let in_range = !dates.is_null(row) && (start..=end).contains(&dates.value(row));
            Some(
                in_range
                    && selection.allows_company(text_at(companies, row))
                    && selection.allows_product(text_at(products, row)),
            )
        })
        .collect();

    let filtered = filter_record_batch(table, &mask)?;
    debug!(
        "Selection kept {} of {} rows",
        filtered.num_rows(),
        table.num_rows()
    );
    Ok(filtered)
}

fn text_at(array: &StringArray, row: usize) -> Option<&str> {
    (!array.is_null(row)).then(|| array.value(row))
}
