// CSV data loaders
// Two contracts: the strict loader propagates any failure, the lenient
// loader keeps well-formed rows and reports a warning instead of failing.

use anyhow::{Context, Result};
use std::path::Path;

use crate::table::{Cell, Table};

// ============================================================================
// STRICT LOADER
// ============================================================================

/// Load a CSV file with a header row into a table.
/// Any open or parse failure (missing file, ragged rows, bad encoding)
/// propagates to the caller. No schema validation.
pub fn load_table(path: &Path) -> Result<Table> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let headers = rdr
        .headers()
        .with_context(|| format!("Failed to read CSV header row: {}", path.display()))?
        .clone();

    let mut table = Table::new(headers.iter().map(|h| h.trim().to_string()).collect());

    for result in rdr.records() {
        let record = result
            .with_context(|| format!("Failed to parse CSV record: {}", path.display()))?;
        table.push_row(record.iter().map(Cell::parse).collect());
    }

    Ok(table)
}

// ============================================================================
// LENIENT LOADER
// ============================================================================

/// Load a CSV file, tolerating malformed rows.
///
/// Rows with more fields than the header are skipped, short rows are padded
/// with missing values. A failure to open or read the file at all yields an
/// empty table plus a user-visible warning instead of an error.
pub fn load_table_lenient(path: &Path) -> (Table, Option<String>) {
    let mut rdr = match csv::ReaderBuilder::new().flexible(true).from_path(path) {
        Ok(rdr) => rdr,
        Err(e) => return (Table::empty(), Some(e.to_string())),
    };

    let headers = match rdr.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => return (Table::empty(), Some(e.to_string())),
    };

    let mut table = Table::new(headers.iter().map(|h| h.trim().to_string()).collect());

    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            // Unreadable stream (e.g. invalid encoding): give up on the file
            Err(e) => return (Table::empty(), Some(e.to_string())),
        };

        // Overlong rows are the malformed case; short rows get padded
        if record.len() > table.column_count() {
            continue;
        }
        table.push_row(record.iter().map(Cell::parse).collect());
    }

    (table, None)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(content.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn test_strict_loader_preserves_rows_and_columns() {
        let file = write_csv(
            "Source,Year,Amount\n\
             Corporation Tax,2020,445000\n\
             Income Tax,2020,638000\n\
             Customs,2021,138000\n",
        );

        let table = load_table(file.path()).expect("well-formed file loads");

        assert_eq!(table.columns, vec!["Source", "Year", "Amount"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows[0][0], Cell::Text("Corporation Tax".to_string()));
        assert_eq!(table.rows[1][2], Cell::Number(638000.0));
    }

    #[test]
    fn test_strict_loader_fails_on_missing_file() {
        let result = load_table(Path::new("/nonexistent/budget.csv"));
        assert!(result.is_err());
    }

    #[test]
    fn test_strict_loader_fails_on_ragged_rows() {
        let file = write_csv(
            "A,B\n\
             1,2\n\
             1,2,3,4\n",
        );

        let result = load_table(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_lenient_loader_skips_overlong_rows() {
        let file = write_csv(
            "Category,Rate\n\
             Salaried,30\n\
             broken,row,with,extras\n\
             Business,25\n",
        );

        let (table, warning) = load_table_lenient(file.path());

        assert!(warning.is_none());
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0][0], Cell::Text("Salaried".to_string()));
        assert_eq!(table.rows[1][0], Cell::Text("Business".to_string()));
    }

    #[test]
    fn test_lenient_loader_pads_short_rows() {
        let file = write_csv(
            "Category,Rate,Notes\n\
             Salaried,30\n",
        );

        let (table, warning) = load_table_lenient(file.path());

        assert!(warning.is_none());
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows[0][2], Cell::Empty);
    }

    #[test]
    fn test_lenient_loader_reports_missing_file() {
        let (table, warning) = load_table_lenient(Path::new("/nonexistent/income_tax.csv"));

        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
        assert!(warning.is_some());
    }
}
