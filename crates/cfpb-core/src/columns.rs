//! Column layout of the complaints table

use std::sync::Arc;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};

pub const DATE_RECEIVED: &str = "date_received";
pub const PRODUCT: &str = "product";
pub const SUB_PRODUCT: &str = "sub_product";
pub const ISSUE: &str = "issue";
pub const COMPANY: &str = "company";
pub const STATE: &str = "state";
pub const SUBMITTED_VIA: &str = "submitted_via";
pub const COMPANY_RESPONSE: &str = "company_response";
pub const TIMELY: &str = "timely";
pub const CONSUMER_DISPUTED: &str = "consumer_disputed";

/// The ten loaded columns, in canonical order
pub const COLUMNS: [&str; 10] = [
    DATE_RECEIVED,
    PRODUCT,
    SUB_PRODUCT,
    ISSUE,
    COMPANY,
    STATE,
    SUBMITTED_VIA,
    COMPANY_RESPONSE,
    TIMELY,
    CONSUMER_DISPUTED,
];

/// Schema of the table as it comes out of the database: every column is text.
pub fn raw_schema() -> SchemaRef {
    let fields: Vec<Field> = COLUMNS
        .iter()
        .map(|name| Field::new(*name, DataType::Utf8, true))
        .collect();
    Arc::new(Schema::new(fields))
}

/// Schema of the normalized table.
///
/// `date_received` becomes a non-null `Date32` and `timely` a non-null `Int8`
/// holding 0 or 1. The remaining columns stay nullable text.
pub fn complaint_schema() -> SchemaRef {
    let fields: Vec<Field> = COLUMNS
        .iter()
        .map(|name| match *name {
            DATE_RECEIVED => Field::new(*name, DataType::Date32, false),
            TIMELY => Field::new(*name, DataType::Int8, false),
            _ => Field::new(*name, DataType::Utf8, true),
        })
        .collect();
    Arc::new(Schema::new(fields))
}
