//! Dashboard HTTP server.
//!
//! Exposes the project table, category aggregation, sync trigger, and
//! assistant over a JSON HTTP API. This is the surface a dashboard
//! front-end consumes; widget rendering itself lives outside this crate.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/projects` | Filtered project table (`?status=`, `?q=`) |
//! | `GET`  | `/categories` | Category → project count pairs |
//! | `POST` | `/ask` | Ask the assistant a question about the dataset |
//! | `POST` | `/sync` | Re-run the fetch-and-normalize cycle |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! All error responses share one schema:
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "question must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `sync_error`
//! (500), `internal` (500). Assistant failures are not errors: per the
//! bridge contract they come back as a normal `answer` string.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support
//! browser-based dashboard clients.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::assistant;
use crate::config::Config;
use crate::models::ProjectRow;
use crate::query;
use crate::store;
use crate::sync;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
}

/// Starts the dashboard HTTP server.
///
/// Ensures a snapshot exists (fetching one when missing), binds to the
/// address configured in `[server].bind`, and serves until the process
/// is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();

    // Consumers read the snapshot on every request; make sure one exists
    // before accepting traffic.
    sync::ensure_snapshot(config).await?;

    let state = AppState {
        config: Arc::new(config.clone()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/projects", get(handle_projects))
        .route("/categories", get(handle_categories))
        .route("/ask", post(handle_ask))
        .route("/sync", post(handle_sync))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    println!("Dashboard API listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"bad_request"`, `"not_found"`).
    code: String,
    /// Human-readable error message.
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 400 Bad Request error.
fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

/// Constructs a 404 Not Found error.
fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

/// Constructs a 500 error with the given code.
fn internal_error(code: &str, message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: code.to_string(),
        message: message.into(),
    }
}

/// Load the flat project table, mapping failures to HTTP errors.
fn load_rows(state: &AppState) -> Result<Vec<ProjectRow>, AppError> {
    let path = &state.config.storage.snapshot_path;

    if !path.exists() {
        return Err(not_found(format!(
            "no snapshot at {}; POST /sync to fetch data",
            path.display()
        )));
    }

    store::read_rows(path).map_err(|e| internal_error("internal", e.to_string()))
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    /// Always `"ok"` when the server is running.
    status: String,
    /// The crate version from `Cargo.toml`.
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /projects ============

/// Query parameters for `GET /projects`.
#[derive(Deserialize)]
struct ProjectsQuery {
    /// Equality filter on the status column.
    status: Option<String>,
    /// Case-insensitive keyword searched across all text columns.
    q: Option<String>,
}

/// JSON response body for `GET /projects`.
#[derive(Serialize)]
struct ProjectsResponse {
    count: usize,
    projects: Vec<ProjectRow>,
}

/// Handler for `GET /projects`.
///
/// Applies the status filter first, then the keyword search over the
/// survivors — the same composition the CLI uses.
async fn handle_projects(
    State(state): State<AppState>,
    Query(params): Query<ProjectsQuery>,
) -> Result<Json<ProjectsResponse>, AppError> {
    let mut rows = load_rows(&state)?;

    if let Some(ref status) = params.status {
        rows = query::filter_by_status(status, &rows);
    }

    if let Some(ref keyword) = params.q {
        if !keyword.trim().is_empty() {
            rows = query::search(keyword, &rows);
        }
    }

    Ok(Json(ProjectsResponse {
        count: rows.len(),
        projects: rows,
    }))
}

// ============ GET /categories ============

/// One category count pair.
#[derive(Serialize)]
struct CategoryCount {
    category: String,
    count: usize,
}

/// JSON response body for `GET /categories`.
#[derive(Serialize)]
struct CategoriesResponse {
    categories: Vec<CategoryCount>,
}

async fn handle_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let rows = load_rows(&state)?;

    let categories = query::group_by_category(&rows)
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect();

    Ok(Json(CategoriesResponse { categories }))
}

// ============ POST /ask ============

/// JSON request body for `POST /ask`.
#[derive(Deserialize)]
struct AskRequest {
    question: String,
}

/// JSON response body for `POST /ask`.
#[derive(Serialize)]
struct AskResponse {
    answer: String,
}

/// Handler for `POST /ask`.
///
/// Assistant failures come back with status 200 as a descriptive
/// `answer` string, matching the bridge contract.
async fn handle_ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    if request.question.trim().is_empty() {
        return Err(bad_request("question must not be empty"));
    }

    let answer = assistant::ask(&state.config, &request.question).await;
    Ok(Json(AskResponse { answer }))
}

// ============ POST /sync ============

/// Handler for `POST /sync`.
///
/// Re-runs the full fetch-and-normalize cycle and returns the report.
async fn handle_sync(State(state): State<AppState>) -> Result<Json<sync::SyncReport>, AppError> {
    sync::sync_projects(&state.config, None)
        .await
        .map(Json)
        .map_err(|e| internal_error("sync_error", e.to_string()))
}
