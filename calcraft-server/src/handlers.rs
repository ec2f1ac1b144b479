use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use calcraft_core::{
    CalendarSource, MonthConfig, PageOptions,
    compose::{compose_month, compose_year},
    sources::SourceLibrary,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub library: Arc<RwLock<SourceLibrary>>,
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

/// A calendar source without its event bodies
#[derive(Serialize)]
struct SourceSummary {
    id: Uuid,
    name: String,
    color: String,
    active: bool,
    event_count: usize,
}

impl From<&CalendarSource> for SourceSummary {
    fn from(source: &CalendarSource) -> Self {
        Self {
            id: source.id,
            name: source.name.clone(),
            color: source.color.clone(),
            active: source.active,
            event_count: source.events.len(),
        }
    }
}

/// Calendar upload parameters
#[derive(Deserialize)]
struct UploadQuery {
    /// Display name; defaults to "calendar"
    name: Option<String>,
}

/// Page composition parameters
#[derive(Deserialize)]
struct PagesQuery {
    year: i32,
    month: Option<u32>, // 1-12; omit for the whole year
    rows: Option<u32>,  // row policy, default 0 (standard weekly grid)
}

pub fn create_app() -> Router {
    let state = AppState {
        library: Arc::new(RwLock::new(SourceLibrary::new())),
    };

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/calendars", get(list_calendars_handler))
        .route("/calendars", post(upload_calendar_handler))
        .route("/calendars/{id}/toggle", post(toggle_calendar_handler))
        .route("/calendars/{id}", delete(delete_calendar_handler))
        .route("/pages", get(get_pages_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// Root path handler
async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "CalCraft Page Service",
        "version": "0.1.0",
        "description": "Calendar page composition with ICS event overlay",
        "endpoints": {
            "health": "/health",
            "calendars": "/calendars",
            "pages": "/pages"
        }
    }))
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// List imported calendar sources
async fn list_calendars_handler(State(state): State<AppState>) -> impl IntoResponse {
    let library = state.library.read().await;
    let summaries: Vec<SourceSummary> = library.iter().map(SourceSummary::from).collect();
    Json(summaries)
}

/// Import an ICS payload as a new calendar source
async fn upload_calendar_handler(
    Query(params): Query<UploadQuery>,
    State(state): State<AppState>,
    body: String,
) -> impl IntoResponse {
    let name = params.name.unwrap_or_else(|| "calendar".to_string());

    let mut library = state.library.write().await;
    let source = library.import(&name, &body);
    tracing::info!(
        "Imported calendar '{}' with {} events",
        source.name,
        source.events.len()
    );

    (StatusCode::CREATED, Json(SourceSummary::from(source)))
}

/// Flip a source's active flag
async fn toggle_calendar_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mut library = state.library.write().await;
    if !library.toggle(id) {
        return Err(AppError(calcraft_core::Error::SourceNotFound(id)));
    }
    let source = library
        .get(id)
        .ok_or_else(|| AppError(calcraft_core::Error::SourceNotFound(id)))?;
    Ok(Json(SourceSummary::from(source)))
}

/// Remove a calendar source
async fn delete_calendar_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mut library = state.library.write().await;
    if !library.remove(id) {
        return Err(AppError(calcraft_core::Error::SourceNotFound(id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Compose month pages with the active events overlaid
async fn get_pages_handler(
    Query(params): Query<PagesQuery>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let options = PageOptions {
        grid_rows: params.rows.unwrap_or(0),
        ..PageOptions::default()
    };

    let library = state.library.read().await;
    let events = library.active_events();

    match params.month {
        Some(month) => {
            if !(1..=12).contains(&month) {
                return Err(AppError(calcraft_core::Error::Config(format!(
                    "month must be between 1 and 12, got {}",
                    month
                ))));
            }
            let config = MonthConfig {
                month: month - 1,
                year: params.year,
                image: None,
                quote: None,
            };
            Ok(Json(compose_month(&config, &options, &events)).into_response())
        }
        None => {
            let configs = MonthConfig::year_set(params.year);
            Ok(Json(compose_year(&configs, &options, &events)).into_response())
        }
    }
}

/// Application error type
#[derive(Debug)]
struct AppError(calcraft_core::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self.0 {
            calcraft_core::Error::Config(_) => (StatusCode::BAD_REQUEST, "invalid request"),
            calcraft_core::Error::SourceNotFound(_) => (StatusCode::NOT_FOUND, "unknown calendar"),
            calcraft_core::Error::Export(_) => (StatusCode::INTERNAL_SERVER_ERROR, "export failed"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal server error"),
        };

        let body = Json(ErrorResponse {
            error: error_message.to_string(),
            message: self.0.to_string(),
        });

        (status, body).into_response()
    }
}
