// In-memory tabular dataset
// Dynamic columns: the three source CSVs share no schema, so rows are
// vectors of typed cells rather than a fixed struct.

use serde::{Deserialize, Serialize};

// ============================================================================
// CELL
// ============================================================================

/// One value of a row: numeric, text, or missing.
///
/// Serializes untagged so API payloads and chart traces carry bare JSON
/// scalars (number / string / null).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// Parse a raw CSV field into a typed cell.
    /// Empty/whitespace-only fields are missing values; anything that parses
    /// as f64 is numeric; the rest stays text.
    pub fn parse(raw: &str) -> Cell {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::Text(trimmed.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Display form used for dropdown options, equality filtering, and the
    /// plain-text rendering. Numbers print minimally ("42", "1.5").
    pub fn display(&self) -> String {
        match self {
            Cell::Number(n) => format!("{}", n),
            Cell::Text(s) => s.clone(),
            Cell::Empty => String::new(),
        }
    }
}

// ============================================================================
// TABLE
// ============================================================================

/// Tabular dataset: ordered column names plus row-major cells.
/// Every row has exactly one cell per column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    /// Empty table with no columns (lenient-loader fallback).
    pub fn empty() -> Self {
        Table::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Exact-name column lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Append a row, padding or truncating to the column count so the
    /// one-cell-per-column invariant holds.
    pub fn push_row(&mut self, mut cells: Vec<Cell>) {
        cells.resize(self.columns.len(), Cell::Empty);
        self.rows.push(cells);
    }

    /// Unique non-empty values of a column, in first-appearance order.
    pub fn distinct_values(&self, column_index: usize) -> Vec<String> {
        let mut seen = Vec::new();
        for row in &self.rows {
            if let Some(cell) = row.get(column_index) {
                if cell.is_empty() {
                    continue;
                }
                let value = cell.display();
                if !seen.contains(&value) {
                    seen.push(value);
                }
            }
        }
        seen
    }

    /// First `n` rows (preview for the CLI).
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Plain-text rendering: header line, then one line per row, columns
    /// padded to a shared width. This is the form fed to the hosted model
    /// as question context.
    pub fn render_text(&self) -> String {
        if self.columns.is_empty() {
            return String::new();
        }

        // Column widths from header and cell display forms
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        let rendered_rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.display()).collect())
            .collect();
        for row in &rendered_rows {
            for (i, value) in row.iter().enumerate() {
                if value.chars().count() > widths[i] {
                    widths[i] = value.chars().count();
                }
            }
        }

        let mut out = String::new();
        let header: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:width$}", c, width = widths[i]))
            .collect();
        out.push_str(header.join(" ").trim_end());
        out.push('\n');

        for row in &rendered_rows {
            let line: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, v)| format!("{:width$}", v, width = widths[i]))
                .collect();
            out.push_str(line.join(" ").trim_end());
            out.push('\n');
        }

        out
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_parse_types() {
        assert_eq!(Cell::parse("42"), Cell::Number(42.0));
        assert_eq!(Cell::parse(" 3.5 "), Cell::Number(3.5));
        assert_eq!(Cell::parse("Health"), Cell::Text("Health".to_string()));
        assert_eq!(Cell::parse("2019-20"), Cell::Text("2019-20".to_string()));
        assert_eq!(Cell::parse(""), Cell::Empty);
        assert_eq!(Cell::parse("   "), Cell::Empty);
    }

    #[test]
    fn test_cell_display_roundtrip() {
        assert_eq!(Cell::Number(42.0).display(), "42");
        assert_eq!(Cell::Number(1.5).display(), "1.5");
        assert_eq!(Cell::Text("Defence".to_string()).display(), "Defence");
        assert_eq!(Cell::Empty.display(), "");
    }

    #[test]
    fn test_cell_serializes_as_bare_scalar() {
        assert_eq!(serde_json::to_string(&Cell::Number(7.0)).unwrap(), "7.0");
        assert_eq!(
            serde_json::to_string(&Cell::Text("ok".to_string())).unwrap(),
            "\"ok\""
        );
        assert_eq!(serde_json::to_string(&Cell::Empty).unwrap(), "null");
    }

    #[test]
    fn test_distinct_values_order_and_dropna() {
        let mut table = Table::new(vec!["Source".to_string(), "Amount".to_string()]);
        table.push_row(vec![Cell::Text("B".to_string()), Cell::Number(1.0)]);
        table.push_row(vec![Cell::Text("A".to_string()), Cell::Number(2.0)]);
        table.push_row(vec![Cell::Empty, Cell::Number(3.0)]);
        table.push_row(vec![Cell::Text("B".to_string()), Cell::Number(4.0)]);

        // First-appearance order, empties dropped, duplicates collapsed
        assert_eq!(table.distinct_values(0), vec!["B", "A"]);
    }

    #[test]
    fn test_push_row_pads_short_rows() {
        let mut table = Table::new(vec!["A".to_string(), "B".to_string(), "C".to_string()]);
        table.push_row(vec![Cell::Number(1.0)]);

        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.rows[0][1], Cell::Empty);
        assert_eq!(table.rows[0][2], Cell::Empty);
    }

    #[test]
    fn test_render_text_has_header_and_rows() {
        let mut table = Table::new(vec!["Source".to_string(), "Amount".to_string()]);
        table.push_row(vec![Cell::Text("Tax".to_string()), Cell::Number(100.0)]);
        table.push_row(vec![Cell::Text("Duty".to_string()), Cell::Number(50.0)]);

        let text = table.render_text();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Source"));
        assert!(lines[0].contains("Amount"));
        assert!(lines[1].starts_with("Tax"));
        assert!(lines[2].starts_with("Duty"));
    }

    #[test]
    fn test_head_limits_rows() {
        let mut table = Table::new(vec!["X".to_string()]);
        for i in 0..10 {
            table.push_row(vec![Cell::Number(i as f64)]);
        }

        let preview = table.head(3);
        assert_eq!(preview.row_count(), 3);
        assert_eq!(preview.columns, table.columns);
    }
}
