// Row filtering
// Equality filter on one categorical column, with a sentinel option that
// means "no filter". Matching rows are returned unchanged and in order.

use anyhow::{anyhow, Result};

use crate::table::Table;

/// Dropdown sentinel meaning "no filter"
pub const SHOW_FULL_TABLE: &str = "Show Full Table";

/// Dropdown options for a filter column: the distinct values of the column,
/// preceded by the whole-table sentinel when offered. Options are derived
/// from the table itself, so a selectable value always exists in the data.
pub fn filter_options(table: &Table, column_index: usize, include_full_table: bool) -> Vec<String> {
    let mut options = Vec::new();
    if include_full_table {
        options.push(SHOW_FULL_TABLE.to_string());
    }
    options.extend(table.distinct_values(column_index));
    options
}

/// Rows whose filter-column value equals the selection.
///
/// `None` or the sentinel returns the whole table. Duplicate matches are
/// kept, nothing is reordered. An out-of-range column index is an error.
pub fn apply_filter(table: &Table, column_index: usize, selection: Option<&str>) -> Result<Table> {
    let selection = match selection {
        None => return Ok(table.clone()),
        Some(SHOW_FULL_TABLE) => return Ok(table.clone()),
        Some(value) => value,
    };

    if column_index >= table.column_count() {
        return Err(anyhow!(
            "Filter column index {} out of range ({} columns)",
            column_index,
            table.column_count()
        ));
    }

    let rows = table
        .rows
        .iter()
        .filter(|row| row[column_index].display() == selection)
        .cloned()
        .collect();

    Ok(Table {
        columns: table.columns.clone(),
        rows,
    })
}

// ============================================================================
// TESTS
// ============================================================================
