// Policy Impact Analyzer - Core Library
// Exposes all modules for use in the CLI, the API server, and tests

pub mod catalog;
pub mod chart;
pub mod filter;
pub mod inference;
pub mod loader;
pub mod table;

// Re-export commonly used types
pub use catalog::{data_dir, Catalog, Dataset, DatasetKind, DATA_DIR_ENV, DEFAULT_DATA_DIR};
pub use chart::{build_figure, ChartKind, Figure, Layout, Trace};
pub use filter::{apply_filter, filter_options, SHOW_FULL_TABLE};
pub use inference::{
    InferenceClient, API_TOKEN_ENV, DEFAULT_ENDPOINT, MODEL_REPO_ID, NO_ANSWER_FALLBACK,
};
pub use loader::{load_table, load_table_lenient};
pub use table::{Cell, Table};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
