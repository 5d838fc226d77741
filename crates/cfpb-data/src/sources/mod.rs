pub mod sqlite_store;

pub use sqlite_store::SqliteStore;

use arrow::record_batch::RecordBatch;
use crate::DataError;

/// Trait for complaint table sources
///
/// `load` is fail-soft for data availability: a missing file or a failed
/// query yields an empty raw table rather than an error. Only failures that
/// indicate a bug (e.g. a malformed batch) are returned as `Err`.
pub trait ComplaintSource: Send + Sync {
    /// Load the raw (all-text) complaints table
    fn load(&self) -> Result<RecordBatch, DataError>;

    /// Get the source name/path
    fn source_name(&self) -> &str;
}
