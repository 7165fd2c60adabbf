use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use salesanalytics_analytics::AnalyticsError;
use salesanalytics_infra::StoreError;

/// Request failure, rendered as a `json_error` body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    InvalidQuery(String),
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidQuery(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let message = self.to_string();
        match self {
            ApiError::Analytics(AnalyticsError::InvalidDate(_)) => {
                json_error(StatusCode::BAD_REQUEST, "invalid_date", message)
            }
            ApiError::Analytics(AnalyticsError::InvalidPeriod { .. }) => {
                json_error(StatusCode::BAD_REQUEST, "invalid_period", message)
            }
            ApiError::InvalidQuery(_) => {
                json_error(StatusCode::BAD_REQUEST, "invalid_query", message)
            }
            ApiError::Store(e) if e.is_unavailable() => {
                tracing::error!(error = %e, "sales store unavailable");
                json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", message)
            }
            ApiError::Store(e) => {
                tracing::error!(error = %e, "sales store query failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", message)
            }
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
