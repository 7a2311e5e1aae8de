// Policy Impact Analyzer - Web Server
// Dashboard REST API with Axum

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use policy_analyzer::{
    apply_filter, build_figure, data_dir, filter_options, Catalog, ChartKind, Dataset,
    DatasetKind, InferenceClient, Table, SHOW_FULL_TABLE,
};

/// Bind address override
const ADDR_ENV: &str = "POLICY_ANALYZER_ADDR";
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Shared application state: the catalog is loaded once at startup and
/// shared read-only across all requests.
#[derive(Clone)]
struct AppState {
    catalog: Arc<Catalog>,
    inference: Arc<InferenceClient>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message.into()),
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::err(message))).into_response()
}

/// Dataset summary for the dropdown
#[derive(Serialize)]
struct DatasetSummary {
    slug: &'static str,
    label: &'static str,
    rows: usize,
    columns: Vec<String>,
    filter_column: Option<String>,
    offers_full_table: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    load_warning: Option<String>,
}

impl From<&Dataset> for DatasetSummary {
    fn from(dataset: &Dataset) -> Self {
        Self {
            slug: dataset.kind.slug(),
            label: dataset.kind.label(),
            rows: dataset.table.row_count(),
            columns: dataset.table.columns.clone(),
            filter_column: dataset.filter_column().ok().map(|(_, name)| name),
            offers_full_table: dataset.kind.offers_full_table(),
            load_warning: dataset.load_warning.clone(),
        }
    }
}

/// Filter dropdown options for one dataset
#[derive(Serialize)]
struct FilterOptions {
    column: String,
    options: Vec<String>,
}

#[derive(Deserialize)]
struct ChartParams {
    chart: String,
    x: String,
    y: String,
    value: Option<String>,
}

#[derive(Deserialize)]
struct AskRequest {
    question: String,
}

#[derive(Serialize)]
struct AskResponse {
    question: String,
    answer: String,
}

// ============================================================================
// API Handlers
// ============================================================================

fn lookup_dataset<'a>(state: &'a AppState, slug: &str) -> Result<&'a Dataset, Response> {
    let kind = DatasetKind::from_slug(slug)
        .ok_or_else(|| error_response(StatusCode::BAD_REQUEST, format!("Unknown dataset: {}", slug)))?;
    Ok(state.catalog.get(kind))
}

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/datasets - List the three datasets
async fn list_datasets(State(state): State<AppState>) -> impl IntoResponse {
    let summaries: Vec<DatasetSummary> = state
        .catalog
        .datasets()
        .iter()
        .map(DatasetSummary::from)
        .collect();
    Json(ApiResponse::ok(summaries))
}

/// GET /api/datasets/:kind - Full table for one dataset
async fn get_dataset(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match lookup_dataset(&state, &slug) {
        Ok(dataset) => Json(ApiResponse::ok(dataset.table.clone())).into_response(),
        Err(response) => response,
    }
}

/// GET /api/datasets/:kind/options - Filter dropdown options
async fn get_filter_options(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let dataset = match lookup_dataset(&state, &slug) {
        Ok(dataset) => dataset,
        Err(response) => return response,
    };

    match dataset.filter_column() {
        Ok((index, column)) => {
            let options =
                filter_options(&dataset.table, index, dataset.kind.offers_full_table());
            Json(ApiResponse::ok(FilterOptions { column, options })).into_response()
        }
        Err(e) => {
            eprintln!("Error deriving filter options for {}: {}", slug, e);
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

/// GET /api/datasets/:kind/filter/:value - Filtered table
async fn filter_dataset(
    State(state): State<AppState>,
    Path((slug, value)): Path<(String, String)>,
) -> Response {
    let dataset = match lookup_dataset(&state, &slug) {
        Ok(dataset) => dataset,
        Err(response) => return response,
    };

    // Decode URL-encoded filter value
    let decoded_value = urlencoding::decode(&value)
        .unwrap_or_else(|_| value.clone().into())
        .into_owned();

    match filtered_view(dataset, Some(&decoded_value)) {
        Ok(table) => Json(ApiResponse::ok(table)).into_response(),
        Err(e) => {
            eprintln!("Error filtering {} by {}: {}", slug, decoded_value, e);
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

/// GET /api/datasets/:kind/chart?chart=bar&x=..&y=..&value=.. - Figure JSON
async fn chart_dataset(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<ChartParams>,
) -> Response {
    let dataset = match lookup_dataset(&state, &slug) {
        Ok(dataset) => dataset,
        Err(response) => return response,
    };

    let kind = match ChartKind::from_name(&params.chart) {
        Some(kind) => kind,
        None => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Unknown chart type: {}", params.chart),
            )
        }
    };

    let table = match filtered_view(dataset, params.value.as_deref()) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Error filtering {} for chart: {}", slug, e);
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    let subject = match params.value.as_deref() {
        Some(SHOW_FULL_TABLE) | None => "Complete Data".to_string(),
        Some(value) => value.to_string(),
    };
    let title = format!("{} for {}", kind.label(), subject);

    match build_figure(&table, kind, &params.x, &params.y, &title) {
        Ok(figure) => Json(ApiResponse::ok(figure)).into_response(),
        Err(e) => {
            eprintln!("Error building chart for {}: {}", slug, e);
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

/// The dataset's rows under the requested filter selection.
fn filtered_view(dataset: &Dataset, selection: Option<&str>) -> anyhow::Result<Table> {
    match selection {
        None => Ok(dataset.table.clone()),
        Some(value) => {
            let (index, _) = dataset.filter_column()?;
            apply_filter(&dataset.table, index, Some(value))
        }
    }
}

/// POST /api/ask - Answer a question over all loaded datasets
async fn ask_question(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Response {
    let question = request.question.trim().to_string();
    if question.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Question must not be empty");
    }

    let context = state.catalog.combined_context();
    let client = state.inference.clone();
    let question_for_model = question.clone();

    // The inference client is blocking; keep it off the async workers
    let result = tokio::task::spawn_blocking(move || client.ask(&question_for_model, &context))
        .await;

    match result {
        Ok(Ok(answer)) => Json(ApiResponse::ok(AskResponse { question, answer })).into_response(),
        Ok(Err(e)) => {
            eprintln!("Error querying hosted model: {}", e);
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
        Err(e) => {
            eprintln!("Inference task failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// GET / - Serve the dashboard page
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🤖 Policy Impact Analyzer - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Load all datasets once; they stay immutable for the process lifetime
    let dir = data_dir();
    let catalog = match Catalog::load(&dir) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("❌ Failed to load datasets from {:?}: {:#}", dir, e);
            eprintln!("   Set {} to the directory holding the CSV files.", policy_analyzer::DATA_DIR_ENV);
            std::process::exit(1);
        }
    };

    for dataset in catalog.datasets() {
        println!(
            "✓ {}: {} rows, {} columns",
            dataset.kind.label(),
            dataset.table.row_count(),
            dataset.table.column_count()
        );
        if let Some(warning) = &dataset.load_warning {
            eprintln!("⚠️  {}", warning);
        }
    }

    let state = AppState {
        catalog: Arc::new(catalog),
        inference: Arc::new(InferenceClient::new()),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/datasets", get(list_datasets))
        .route("/datasets/:kind", get(get_dataset))
        .route("/datasets/:kind/options", get(get_filter_options))
        .route("/datasets/:kind/filter/:value", get(filter_dataset))
        .route("/datasets/:kind/chart", get(chart_dataset))
        .route("/ask", post(ask_question))
        .with_state(state.clone());

    // Build main router
    let app = Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = std::env::var(ADDR_ENV).unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/datasets", addr);
    println!("   UI:  http://{}", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
