//! User filter selection
//!
//! A selection holds inclusive date bounds plus company and product sets.
//! An empty set places no restriction on its column: an empty multi-select
//! shows every company (or product), never none.

use std::collections::BTreeSet;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Filter configuration chosen in the sidebar
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    /// Inclusive lower bound; the table's earliest date when unset
    pub start_date: Option<NaiveDate>,

    /// Inclusive upper bound; the table's latest date when unset
    pub end_date: Option<NaiveDate>,

    /// Companies to keep; empty keeps all
    pub companies: BTreeSet<String>,

    /// Products to keep; empty keeps all
    pub products: BTreeSet<String>,
}

impl Selection {
    /// Create a selection that keeps everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both date bounds
    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Set the lower date bound
    pub fn with_start_date(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    /// Set the upper date bound
    pub fn with_end_date(mut self, end: NaiveDate) -> Self {
        self.end_date = Some(end);
        self
    }

    /// Restrict to the given companies
    pub fn with_companies<I, S>(mut self, companies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.companies = companies.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict to the given products
    pub fn with_products<I, S>(mut self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.products = products.into_iter().map(Into::into).collect();
        self
    }

    /// True when no bound and no set is configured
    pub fn is_unrestricted(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.companies.is_empty()
            && self.products.is_empty()
    }

    /// Resolve the date bounds against the table's own min/max dates
    pub fn resolve_bounds(&self, min_date: NaiveDate, max_date: NaiveDate) -> (NaiveDate, NaiveDate) {
        (
            self.start_date.unwrap_or(min_date),
            self.end_date.unwrap_or(max_date),
        )
    }

    /// Whether a row with this company passes the company filter
    pub fn allows_company(&self, company: Option<&str>) -> bool {
        Self::allows(&self.companies, company)
    }

    /// Whether a row with this product passes the product filter
    pub fn allows_product(&self, product: Option<&str>) -> bool {
        Self::allows(&self.products, product)
    }

    fn allows(set: &BTreeSet<String>, value: Option<&str>) -> bool {
        if set.is_empty() {
            return true;
        }
        value.map(|v| set.contains(v)).unwrap_or(false)
    }
}
