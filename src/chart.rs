// Chart builder
// Produces Plotly-shaped figure JSON (one trace per figure) for the browser
// to render. Values pass through exactly as stored: no reordering, no
// aggregation, and no check that a pie values column is numeric - a bad
// column fails in the charting library, client-side.

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::table::{Cell, Table};

// ============================================================================
// CHART KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Bar, ChartKind::Line, ChartKind::Pie];

    /// Display label shown in the chart-type dropdown
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar Chart",
            ChartKind::Line => "Line Chart",
            ChartKind::Pie => "Pie Chart",
        }
    }

    /// Accepts both the dropdown label and the short form ("bar", "line", "pie").
    pub fn from_name(name: &str) -> Option<ChartKind> {
        match name.trim().to_lowercase().as_str() {
            "bar" | "bar chart" => Some(ChartKind::Bar),
            "line" | "line chart" => Some(ChartKind::Line),
            "pie" | "pie chart" => Some(ChartKind::Pie),
            _ => None,
        }
    }
}

// ============================================================================
// FIGURE
// ============================================================================

/// One Plotly trace. Bar and line traces carry x/y, pie traces labels/values.
#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub trace_type: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Vec<Cell>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Vec<Cell>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<Cell>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Cell>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: String,
}

/// Renderable chart: what the dashboard page hands to Plotly unchanged.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

// ============================================================================
// BUILDER
// ============================================================================

/// Build a figure from two columns of a table.
///
/// The first column feeds x (bar/line) or labels (pie), the second feeds y
/// or values. Series match the table rows one-to-one. Unknown column names
/// are an error; column content is not validated.
pub fn build_figure(
    table: &Table,
    kind: ChartKind,
    x_column: &str,
    y_column: &str,
    title: &str,
) -> Result<Figure> {
    let x_values = column_cells(table, x_column)?;
    let y_values = column_cells(table, y_column)?;

    let trace = match kind {
        ChartKind::Bar => Trace {
            trace_type: "bar",
            mode: None,
            x: Some(x_values),
            y: Some(y_values),
            labels: None,
            values: None,
        },
        ChartKind::Line => Trace {
            trace_type: "scatter",
            mode: Some("lines"),
            x: Some(x_values),
            y: Some(y_values),
            labels: None,
            values: None,
        },
        ChartKind::Pie => Trace {
            trace_type: "pie",
            mode: None,
            x: None,
            y: None,
            labels: Some(x_values),
            values: Some(y_values),
        },
    };

    Ok(Figure {
        data: vec![trace],
        layout: Layout {
            title: title.to_string(),
        },
    })
}

fn column_cells(table: &Table, column: &str) -> Result<Vec<Cell>> {
    let index = table
        .column_index(column)
        .ok_or_else(|| anyhow!("No such column: {}", column))?;
    Ok(table
        .rows
        .iter()
        .map(|row| row[index].clone())
        .collect())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let mut table = Table::new(vec!["Sector".to_string(), "Spend".to_string()]);
        table.push_row(vec![Cell::Text("Health".to_string()), Cell::Number(40.0)]);
        table.push_row(vec![Cell::Text("Education".to_string()), Cell::Number(25.0)]);
        table.push_row(vec![Cell::Text("Defence".to_string()), Cell::Number(60.0)]);
        table
    }

    #[test]
    fn test_bar_chart_series_match_rows() {
        let table = sample_table();
        let figure =
            build_figure(&table, ChartKind::Bar, "Sector", "Spend", "Bar Chart for Kerala")
                .expect("bar chart builds");

        assert_eq!(figure.data.len(), 1);
        let trace = &figure.data[0];
        assert_eq!(trace.trace_type, "bar");
        assert_eq!(
            trace.x.as_ref().expect("x present"),
            &vec![
                Cell::Text("Health".to_string()),
                Cell::Text("Education".to_string()),
                Cell::Text("Defence".to_string()),
            ]
        );
        assert_eq!(
            trace.y.as_ref().expect("y present"),
            &vec![Cell::Number(40.0), Cell::Number(25.0), Cell::Number(60.0)]
        );
        assert_eq!(figure.layout.title, "Bar Chart for Kerala");
    }

    #[test]
    fn test_line_chart_is_a_lines_scatter() {
        let table = sample_table();
        let figure = build_figure(&table, ChartKind::Line, "Sector", "Spend", "Line Chart")
            .expect("line chart builds");

        let trace = &figure.data[0];
        assert_eq!(trace.trace_type, "scatter");
        assert_eq!(trace.mode, Some("lines"));
        assert!(trace.labels.is_none());
    }

    #[test]
    fn test_pie_chart_uses_labels_and_values() {
        let table = sample_table();
        let figure = build_figure(&table, ChartKind::Pie, "Sector", "Spend", "Pie Chart")
            .expect("pie chart builds");

        let trace = &figure.data[0];
        assert_eq!(trace.trace_type, "pie");
        assert!(trace.x.is_none());
        assert_eq!(trace.labels.as_ref().expect("labels present").len(), 3);
        assert_eq!(trace.values.as_ref().expect("values present").len(), 3);
    }

    #[test]
    fn test_unknown_column_is_an_error() {
        let table = sample_table();
        assert!(build_figure(&table, ChartKind::Bar, "Nope", "Spend", "t").is_err());
        assert!(build_figure(&table, ChartKind::Bar, "Sector", "Nope", "t").is_err());
    }

    #[test]
    fn test_serialized_shape_is_plotly_compatible() {
        let table = sample_table();
        let figure = build_figure(&table, ChartKind::Bar, "Sector", "Spend", "Spend by Sector")
            .expect("bar chart builds");

        let json = serde_json::to_value(&figure).expect("figure serializes");
        assert_eq!(json["data"][0]["type"], "bar");
        assert_eq!(json["data"][0]["x"][0], "Health");
        assert_eq!(json["data"][0]["y"][2], 60.0);
        assert_eq!(json["layout"]["title"], "Spend by Sector");
        // Unused trace fields stay off the wire
        assert!(json["data"][0].get("labels").is_none());
    }

    #[test]
    fn test_chart_kind_parsing() {
        assert_eq!(ChartKind::from_name("bar"), Some(ChartKind::Bar));
        assert_eq!(ChartKind::from_name("Line Chart"), Some(ChartKind::Line));
        assert_eq!(ChartKind::from_name("PIE"), Some(ChartKind::Pie));
        assert_eq!(ChartKind::from_name("scatter"), None);
    }
}
