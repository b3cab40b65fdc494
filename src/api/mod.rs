pub mod dto;
pub mod errors;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::dashboard::DashboardService;
use handlers::ApiDoc;

pub fn router(service: DashboardService) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route(
            "/readings",
            get(handlers::get_readings).post(handlers::add_reading),
        )
        .route("/readings/view", get(handlers::get_view))
        .route("/readings/export", get(handlers::export_view))
        .route("/dashboard", post(handlers::dashboard))
        .route("/cache/invalidate", post(handlers::invalidate_cache))
        .with_state(service)
        .split_for_parts();

    router
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
}
