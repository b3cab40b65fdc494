use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{dashboard::DashboardError, error::LoadError};

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<DashboardError>() {
            Some(DashboardError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Some(DashboardError::InvalidRows { .. }) => StatusCode::CONFLICT,
            Some(DashboardError::Load(LoadError::NotFound { .. })) => StatusCode::NOT_FOUND,
            Some(DashboardError::Load(LoadError::Network { .. } | LoadError::Parse { .. })) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self.0, "Request failed");
        }
        let body = Json(json!({ "error": format!("{:#}", self.0) }));
        (status, body).into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::error::ValidationError;

    fn status_of(e: DashboardError) -> StatusCode {
        AppError::from(e).status()
    }

    #[test]
    fn maps_dashboard_errors_to_status_codes() {
        assert_eq!(
            status_of(ValidationError::BadStatus("x".into()).into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(LoadError::NotFound { path: PathBuf::from("d.csv") }.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(
                LoadError::Parse {
                    source_id: "d.csv".into(),
                    reason: "bad".into()
                }
                .into()
            ),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(DashboardError::InvalidRows {
                dropped: 2,
                first_line: 3
            }),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn unknown_errors_are_internal() {
        let err = AppError::from(anyhow::anyhow!("boom"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
