//! Choices offered by the sidebar filters

use std::cmp::Reverse;
use ahash::AHashMap;
use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use cfpb_core::columns::{COMPANY, PRODUCT};
use cfpb_core::Selection;
use indexmap::IndexSet;
use serde::Serialize;

use crate::table::{date_bounds, string_column};
use crate::DataError;

/// Date bounds and category choices derived from the loaded table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    /// Earliest selectable date
    pub min_date: Option<NaiveDate>,

    /// Latest selectable date
    pub max_date: Option<NaiveDate>,

    /// Most frequent companies, most complaints first
    pub top_companies: Vec<String>,

    /// Distinct products in order of first appearance
    pub products: Vec<String>,
}

impl FilterOptions {
    /// Build the options for a normalized table, keeping at most
    /// `top_companies` companies
    pub fn from_table(table: &RecordBatch, top_companies: usize) -> Result<Self, DataError> {
        let bounds = date_bounds(table)?;
        let companies = string_column(table, COMPANY)?;
        let products = string_column(table, PRODUCT)?;

        let mut counts: AHashMap<&str, usize> = AHashMap::new();
        for row in 0..companies.len() {
            if companies.is_valid(row) {
                *counts.entry(companies.value(row)).or_insert(0) += 1;
            }
        }
        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_by_key(|&(name, count)| (Reverse(count), name));

        let mut distinct_products: IndexSet<&str> = IndexSet::new();
        for row in 0..products.len() {
            if products.is_valid(row) {
                distinct_products.insert(products.value(row));
            }
        }

        Ok(Self {
            min_date: bounds.map(|(min, _)| min),
            max_date: bounds.map(|(_, max)| max),
            top_companies: ranked
                .into_iter()
                .take(top_companies)
                .map(|(name, _)| name.to_string())
                .collect(),
            products: distinct_products.into_iter().map(str::to_string).collect(),
        })
    }

    /// Whether there is anything to choose from
    pub fn is_empty(&self) -> bool {
        self.min_date.is_none()
    }

    /// Selection matching the sidebar's initial state: full date range,
    /// nothing picked in either multi-select
    pub fn default_selection(&self) -> Selection {
        match (self.min_date, self.max_date) {
            (Some(min), Some(max)) => Selection::new().with_date_range(min, max),
            _ => Selection::new(),
        }
    }
}
