//! Typed row of the normalized complaints table

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single consumer complaint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintRecord {
    pub date_received: NaiveDate,
    pub product: Option<String>,
    pub sub_product: Option<String>,
    pub issue: Option<String>,
    pub company: Option<String>,
    pub state: Option<String>,
    pub submitted_via: Option<String>,
    pub company_response: Option<String>,
    /// 1 when the company responded in time, 0 otherwise
    pub timely: u8,
    pub consumer_disputed: Option<String>,
}

impl ComplaintRecord {
    /// Whether the company responded in time
    pub fn is_timely(&self) -> bool {
        self.timely == 1
    }
}
