// Dataset catalog - process-wide read-only data state
// All three tables are loaded once at startup and shared immutably for the
// process lifetime; there is no invalidation and no write path.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::loader::{load_table, load_table_lenient};
use crate::table::Table;

/// Directory holding the three CSV files (relative to the working directory)
pub const DEFAULT_DATA_DIR: &str = "data";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "POLICY_ANALYZER_DATA_DIR";

/// Resolve the data directory from the environment, falling back to the default.
pub fn data_dir() -> PathBuf {
    env::var(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR))
}

// ============================================================================
// DATASET KIND
// ============================================================================

/// The three datasets the dashboard serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetKind {
    Budget,
    Expenditure,
    IncomeTax,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [
        DatasetKind::Budget,
        DatasetKind::Expenditure,
        DatasetKind::IncomeTax,
    ];

    /// Display label shown in the dataset dropdown
    pub fn label(&self) -> &'static str {
        match self {
            DatasetKind::Budget => "Budget Data",
            DatasetKind::Expenditure => "Expenditure Data",
            DatasetKind::IncomeTax => "Income Tax Data",
        }
    }

    /// URL path segment for API routes
    pub fn slug(&self) -> &'static str {
        match self {
            DatasetKind::Budget => "budget",
            DatasetKind::Expenditure => "expenditure",
            DatasetKind::IncomeTax => "income-tax",
        }
    }

    pub fn from_slug(slug: &str) -> Option<DatasetKind> {
        DatasetKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == slug)
    }

    /// Source CSV file name inside the data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            DatasetKind::Budget => "Combined_Financial_Data.csv",
            DatasetKind::Expenditure => "Expenditure.csv",
            DatasetKind::IncomeTax => "Income Tax.csv",
        }
    }

    /// Whether the filter dropdown offers the whole-table option.
    /// The budget view filters by source only.
    pub fn offers_full_table(&self) -> bool {
        !matches!(self, DatasetKind::Budget)
    }
}

// ============================================================================
// DATASET
// ============================================================================

/// One loaded dataset plus any warning its loader produced.
/// Only the income-tax loader ever sets a warning.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub kind: DatasetKind,
    pub table: Table,
    pub load_warning: Option<String>,
}

impl Dataset {
    /// The categorical column rows are filtered by: the "Source" column for
    /// budget data (looked up by exact name), the first column otherwise.
    /// Returns (index, name).
    pub fn filter_column(&self) -> Result<(usize, String)> {
        match self.kind {
            DatasetKind::Budget => {
                let index = self
                    .table
                    .column_index("Source")
                    .ok_or_else(|| anyhow!("Budget data has no 'Source' column"))?;
                Ok((index, "Source".to_string()))
            }
            DatasetKind::Expenditure | DatasetKind::IncomeTax => {
                let name = self
                    .table
                    .columns
                    .first()
                    .ok_or_else(|| anyhow!("{} has no columns", self.kind.label()))?;
                Ok((0, name.clone()))
            }
        }
    }
}

// ============================================================================
// CATALOG
// ============================================================================

/// All three datasets, loaded once. Budget and expenditure load strictly
/// (a failure aborts startup); income tax loads leniently and keeps its
/// warning for display.
#[derive(Debug, Clone)]
pub struct Catalog {
    datasets: Vec<Dataset>,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    pub fn load(data_dir: &Path) -> Result<Catalog> {
        let mut datasets = Vec::with_capacity(DatasetKind::ALL.len());

        for kind in DatasetKind::ALL {
            let path = data_dir.join(kind.file_name());
            let dataset = match kind {
                DatasetKind::Budget | DatasetKind::Expenditure => {
                    let table = load_table(&path)
                        .with_context(|| format!("Failed to load {}", kind.label()))?;
                    Dataset {
                        kind,
                        table,
                        load_warning: None,
                    }
                }
                DatasetKind::IncomeTax => {
                    let (table, warning) = load_table_lenient(&path);
                    Dataset {
                        kind,
                        table,
                        load_warning: warning
                            .map(|msg| format!("Error loading {}: {}", kind.label(), msg)),
                    }
                }
            };
            datasets.push(dataset);
        }

        Ok(Catalog {
            datasets,
            loaded_at: Utc::now(),
        })
    }

    pub fn get(&self, kind: DatasetKind) -> &Dataset {
        // datasets holds one entry per kind, in ALL order
        let index = match kind {
            DatasetKind::Budget => 0,
            DatasetKind::Expenditure => 1,
            DatasetKind::IncomeTax => 2,
        };
        &self.datasets[index]
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// All tables rendered as text and concatenated in catalog order.
    /// This is the context blob sent with every question; its length is
    /// unbounded, oversize handling is the remote model's concern.
    pub fn combined_context(&self) -> String {
        let mut context = String::new();
        for dataset in &self.datasets {
            context.push_str(&dataset.table.render_text());
            context.push('\n');
        }
        context
    }
}

// ============================================================================
// TESTS
// ============================================================================
