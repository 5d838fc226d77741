//! Core types for the complaints dashboard
//!
//! This crate provides the table layout, the typed row model, date handling
//! and the user selection shared by the data layer and the front end.

pub mod columns;
pub mod dates;
pub mod record;
pub mod selection;

// Re-export commonly used types
pub use columns::{complaint_schema, raw_schema, COLUMNS};
pub use record::ComplaintRecord;
pub use selection::Selection;
