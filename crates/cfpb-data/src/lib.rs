//! Data loading, caching and filtering for the complaints dashboard

pub mod cache;
pub mod config;
pub mod export;
pub mod filter;
pub mod options;
pub mod preprocess;
pub mod sources;
pub mod summary;
pub mod table;

#[cfg(test)]
pub(crate) mod fixtures;

use arrow::error::ArrowError;
use thiserror::Error;

// Re-exports
pub use cache::{Clock, ComplaintCache, ManualClock, SystemClock};
pub use config::DashboardConfig;
pub use filter::apply;
pub use options::FilterOptions;
pub use preprocess::normalize;
pub use sources::{ComplaintSource, SqliteStore};
pub use summary::{CategoryCount, Summary};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    /// Database missing, unreadable, or the query failed
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Unparseable date_received at row {row}: {value:?}")]
    DateParse { row: usize, value: Option<String> },

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DataError {
    /// Failures of the underlying data rather than of the program.
    ///
    /// These are recovered as an empty table; everything else propagates.
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, DataError::DataUnavailable(_) | DataError::DateParse { .. })
    }
}

impl From<rusqlite::Error> for DataError {
    fn from(error: rusqlite::Error) -> Self {
        use rusqlite::Error::*;
        match error {
            InvalidColumnIndex(_)
            | InvalidColumnName(_)
            | InvalidColumnType(..)
            | InvalidParameterCount(..)
            | InvalidParameterName(_) => DataError::Schema(error.to_string()),
            _ => DataError::DataUnavailable(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(error: serde_json::Error) -> Self {
        DataError::Config(error.to_string())
    }
}
