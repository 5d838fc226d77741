//! SQLite complaints store

use std::path::{Path, PathBuf};
use arrow::array::{ArrayRef, StringBuilder};
use arrow::record_batch::RecordBatch;
use cfpb_core::{raw_schema, COLUMNS};
use rusqlite::{types::ValueRef, Connection, OpenFlags};
use tracing::{info, warn};

use crate::config::{DashboardConfig, DEFAULT_COMPANY_THRESHOLD};
use crate::sources::ComplaintSource;
use crate::DataError;

/// Read-only store over a complaints table in a SQLite file.
///
/// The file must be a SQLite database. Any other file format, a DuckDB file
/// included, is reported as unavailable data and loads as an empty table.
pub struct SqliteStore {
    path: PathBuf,
    table_name: String,
    company_threshold: u32,
}

impl SqliteStore {
    /// Create a store for `table_name` in the database at `path`.
    ///
    /// The table name may be schema-qualified (`main.cfpb_complaints`) and must
    /// otherwise be a plain identifier.
    pub fn new<P: AsRef<Path>>(path: P, table_name: impl Into<String>) -> Result<Self, DataError> {
        let table_name = table_name.into();
        if !is_valid_table_name(&table_name) {
            return Err(DataError::Config(format!("invalid table name '{}'", table_name)));
        }

        Ok(Self {
            path: path.as_ref().to_path_buf(),
            table_name,
            company_threshold: DEFAULT_COMPANY_THRESHOLD,
        })
    }

    /// Create a store from the dashboard configuration
    pub fn from_config(config: &DashboardConfig) -> Result<Self, DataError> {
        Ok(Self::new(&config.db_path, config.table_name.clone())?
            .with_company_threshold(config.company_threshold))
    }

    /// Set the minimum number of complaints a company needs to be loaded
    pub fn with_company_threshold(mut self, threshold: u32) -> Self {
        self.company_threshold = threshold;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn company_threshold(&self) -> u32 {
        self.company_threshold
    }

    /// Load the table, surfacing every failure.
    ///
    /// `load` wraps this with the fail-soft policy.
    pub fn try_load(&self) -> Result<RecordBatch, DataError> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            DataError::DataUnavailable(format!("failed to open {}: {}", self.path.display(), e))
        })?;

        self.check_columns(&conn)?;

        let mut stmt = conn.prepare(&self.query())?;
        let mut builders: Vec<StringBuilder> = COLUMNS.iter().map(|_| StringBuilder::new()).collect();
        let mut invalid_text = 0usize;

        let mut rows = stmt.query([self.company_threshold])?;
        while let Some(row) = rows.next()? {
            for (col_idx, builder) in builders.iter_mut().enumerate() {
                match row.get_ref(col_idx)? {
                    ValueRef::Text(bytes) => {
                        if !append_text(builder, bytes) {
                            invalid_text += 1;
                        }
                    }
                    ValueRef::Integer(i) => builder.append_value(i.to_string()),
                    ValueRef::Real(f) => builder.append_value(f.to_string()),
                    ValueRef::Null | ValueRef::Blob(_) => builder.append_null(),
                }
            }
        }

        if invalid_text > 0 {
            warn!(
                "{} text values in {} were not valid UTF-8; invalid bytes replaced with U+FFFD",
                invalid_text,
                self.source_name()
            );
        }

        let arrays: Vec<ArrayRef> = builders
            .into_iter()
            .map(|mut builder| std::sync::Arc::new(builder.finish()) as ArrayRef)
            .collect();

        Ok(RecordBatch::try_new(raw_schema(), arrays)?)
    }

    /// Fail with a schema error when the table lacks an expected column
    fn check_columns(&self, conn: &Connection) -> Result<(), DataError> {
        let stmt = conn.prepare(&format!("SELECT * FROM {} LIMIT 0", quote_table_name(&self.table_name)))?;
        let present = stmt.column_names();

        let missing: Vec<&str> = COLUMNS
            .iter()
            .copied()
            .filter(|expected| !present.iter().any(|name| name.eq_ignore_ascii_case(expected)))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DataError::Schema(format!(
                "table '{}' is missing columns: {}",
                self.table_name,
                missing.join(", ")
            )))
        }
    }

    /// Rows of every company with at least `?1` complaints, in storage order
    fn query(&self) -> String {
        let table = quote_table_name(&self.table_name);
        format!(
            "SELECT {columns}
             FROM {table}
             WHERE company IN (
                 SELECT company
                 FROM {table}
                 GROUP BY company
                 HAVING COUNT(*) >= ?1
                 ORDER BY COUNT(*) DESC
             )",
            columns = COLUMNS.join(", "),
            table = table,
        )
    }
}

impl ComplaintSource for SqliteStore {
    fn load(&self) -> Result<RecordBatch, DataError> {
        match self.try_load() {
            Ok(batch) => {
                info!(
                    "Loaded {} complaints from {} (companies with >= {} complaints)",
                    batch.num_rows(),
                    self.source_name(),
                    self.company_threshold
                );
                Ok(batch)
            }
            Err(e) if e.is_data_unavailable() => {
                warn!("{}; continuing with an empty table", e);
                Ok(RecordBatch::new_empty(raw_schema()))
            }
            Err(e) => Err(e),
        }
    }

    fn source_name(&self) -> &str {
        self.path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.db")
    }
}

/// Append a TEXT cell; returns false when its bytes were not valid UTF-8
fn append_text(builder: &mut StringBuilder, bytes: &[u8]) -> bool {
    match std::str::from_utf8(bytes) {
        Ok(text) => {
            builder.append_value(text);
            true
        }
        Err(_) => {
            builder.append_value(String::from_utf8_lossy(bytes));
            false
        }
    }
}

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_valid_table_name(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();
    parts.len() <= 2 && parts.iter().all(|p| is_identifier(p))
}

fn quote_table_name(name: &str) -> String {
    name.split('.')
        .map(|part| format!("\"{}\"", part))
        .collect::<Vec<_>>()
        .join(".")
}
