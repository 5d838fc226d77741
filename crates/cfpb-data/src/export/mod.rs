//! CSV export of filtered views

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use arrow::csv::WriterBuilder;
use arrow::record_batch::RecordBatch;
use tracing::info;

use crate::DataError;

/// Write a table as CSV with a header row; dates as `YYYY-MM-DD`
pub fn write_csv<W: Write>(table: &RecordBatch, writer: W) -> Result<(), DataError> {
    let mut writer = WriterBuilder::new()
        .with_header(true)
        .with_date_format("%Y-%m-%d".to_string())
        .build(writer);
    writer.write(table)?;
    Ok(())
}

/// Write a table to a CSV file, replacing any existing file
pub fn export_csv<P: AsRef<Path>>(table: &RecordBatch, path: P) -> Result<(), DataError> {
    let path = path.as_ref();
    let mut file = BufWriter::new(File::create(path)?);
    write_csv(table, &mut file)?;
    file.flush()?;
    info!("Exported {} rows to {}", table.num_rows(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use crate::fixtures::{normalized, FixtureRow};

    #[test]
    fn test_write_csv() {
        let table = normalized(&[
            FixtureRow::new("2020-06-01 09:30:00", "A", "Mortgage"),
            FixtureRow::new("2020-06-02", "B", "Credit card").timely("No"),
        ]);

        let mut out = Vec::new();
        write_csv(&table, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date_received,product,sub_product,issue,company"));
        assert!(lines[1].starts_with("2020-06-01,Mortgage,,Billing dispute,A,"));
        assert!(lines[2].contains(",B,"));
        assert!(lines[2].ends_with(",0,No"));
    }

    #[test]
    fn test_export_csv_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("filtered.csv");
        let table = normalized(&[FixtureRow::new("2020-06-01", "A", "Mortgage")]);

        export_csv(&table, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
