use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use utoipa::OpenApi;

use super::{
    dto::{
        DashboardRequestDto, DashboardResponseDto, MergeOutcomeDto, NewReadingRequest, RawValue,
        ReadingDto,
    },
    errors::AppError,
};
use crate::{
    dashboard::{DashboardError, DashboardRequest, DashboardService},
    dataset::{DatasetBounds, FieldSummary, FilterCriteria, Reading, ResolvedCriteria, Summary},
};

pub const EXPORT_FILE_NAME: &str = "filtered_temperature_data.csv";

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Fetch the full record set.
#[utoipa::path(
    get,
    path = "/readings",
    responses(
        (status = 200, description = "Every reading in the dataset", body = Vec<ReadingDto>),
        (status = 404, description = "No dataset available"),
        (status = 502, description = "Remote dataset unreachable or unparsable"),
    ),
    tag = "readings"
)]
pub async fn get_readings(
    State(service): State<DashboardService>,
) -> Result<Json<Vec<ReadingDto>>, AppError> {
    let records = service.records().await?;
    Ok(Json(records.iter().cloned().map(Into::into).collect()))
}

/// Filtered view with bounds and summary statistics. Unset bounds default to
/// the dataset's date and temperature range; all bounds are inclusive.
#[utoipa::path(
    get,
    path = "/readings/view",
    params(
        ("start_date" = Option<String>, Query, description = "First date (YYYY-MM-DD)"),
        ("end_date"   = Option<String>, Query, description = "Last date (YYYY-MM-DD)"),
        ("ac_only"    = Option<bool>,   Query, description = "Only readings with the AC on"),
        ("fan_only"   = Option<bool>,   Query, description = "Only readings with the fan on"),
        ("temp_min"   = Option<f64>,    Query, description = "Lowest temperature (°C)"),
        ("temp_max"   = Option<f64>,    Query, description = "Highest temperature (°C)"),
    ),
    responses(
        (status = 200, description = "Filtered view", body = DashboardResponseDto),
        (status = 404, description = "No dataset available"),
        (status = 502, description = "Remote dataset unreachable or unparsable"),
    ),
    tag = "readings"
)]
pub async fn get_view(
    State(service): State<DashboardService>,
    Query(criteria): Query<FilterCriteria>,
) -> Result<Json<DashboardResponseDto>, AppError> {
    let response = service.view(&criteria).await?;
    Ok(Json(response.into()))
}

/// Download the filtered view as CSV in the dataset layout.
#[utoipa::path(
    get,
    path = "/readings/export",
    params(
        ("start_date" = Option<String>, Query, description = "First date (YYYY-MM-DD)"),
        ("end_date"   = Option<String>, Query, description = "Last date (YYYY-MM-DD)"),
        ("ac_only"    = Option<bool>,   Query, description = "Only readings with the AC on"),
        ("fan_only"   = Option<bool>,   Query, description = "Only readings with the fan on"),
        ("temp_min"   = Option<f64>,    Query, description = "Lowest temperature (°C)"),
        ("temp_max"   = Option<f64>,    Query, description = "Highest temperature (°C)"),
    ),
    responses(
        (status = 200, description = "CSV export", content_type = "text/csv", body = String),
        (status = 404, description = "No dataset available"),
    ),
    tag = "readings"
)]
pub async fn export_view(
    State(service): State<DashboardService>,
    Query(criteria): Query<FilterCriteria>,
) -> Result<impl IntoResponse, AppError> {
    let csv = service.export_csv(&criteria).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        csv,
    ))
}

/// Add one reading. An existing reading with the same timestamp is kept and
/// the new one is ignored.
#[utoipa::path(
    post,
    path = "/readings",
    request_body = NewReadingRequest,
    responses(
        (status = 201, description = "Reading merged into the dataset", body = MergeOutcomeDto),
        (status = 409, description = "Dataset has invalid rows and was left untouched"),
        (status = 422, description = "Invalid timestamp, temperature or status"),
        (status = 500, description = "Dataset could not be written"),
    ),
    tag = "readings"
)]
pub async fn add_reading(
    State(service): State<DashboardService>,
    Json(body): Json<NewReadingRequest>,
) -> Result<(StatusCode, Json<MergeOutcomeDto>), AppError> {
    let reading = Reading::try_from(body).map_err(DashboardError::from)?;
    let outcome = service.add_reading(reading).await?;
    Ok((StatusCode::CREATED, Json(outcome.into())))
}

/// One dashboard interaction: optionally add a reading, then filter.
#[utoipa::path(
    post,
    path = "/dashboard",
    request_body = DashboardRequestDto,
    responses(
        (status = 200, description = "View after applying the request", body = DashboardResponseDto),
        (status = 409, description = "Dataset has invalid rows and was left untouched"),
        (status = 422, description = "Invalid new reading"),
    ),
    tag = "readings"
)]
pub async fn dashboard(
    State(service): State<DashboardService>,
    Json(body): Json<DashboardRequestDto>,
) -> Result<Json<DashboardResponseDto>, AppError> {
    let new_reading = body
        .new_reading
        .map(Reading::try_from)
        .transpose()
        .map_err(DashboardError::from)?;

    let response = service
        .handle(DashboardRequest {
            criteria: body.criteria,
            new_reading,
        })
        .await?;
    Ok(Json(response.into()))
}

/// Drop cached record sets so the next request re-reads the source.
#[utoipa::path(
    post,
    path = "/cache/invalidate",
    responses(
        (status = 204, description = "Cache cleared"),
    ),
    tag = "system"
)]
pub async fn invalidate_cache(State(service): State<DashboardService>) -> StatusCode {
    service.invalidate_cache().await;
    StatusCode::NO_CONTENT
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(
        get_readings,
        get_view,
        export_view,
        add_reading,
        dashboard,
        invalidate_cache,
        health
    ),
    components(schemas(
        ReadingDto,
        NewReadingRequest,
        RawValue,
        MergeOutcomeDto,
        DashboardRequestDto,
        DashboardResponseDto,
        FilterCriteria,
        ResolvedCriteria,
        DatasetBounds,
        Summary,
        FieldSummary
    )),
    tags(
        (name = "readings", description = "Temperature dataset endpoints"),
        (name = "system",   description = "System endpoints"),
    ),
    info(
        title = "Hourly Temperature API",
        version = "0.1.0",
        description = "Filter, summarize, export and extend the hourly temperature dataset"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
