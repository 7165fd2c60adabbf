use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use crate::app::dto::{DatabaseHealthResponse, HealthResponse, UnhealthyResponse};
use crate::app::services::AppServices;

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        message: "API is running!",
    })
}

/// GET /api/health/database
///
/// 503 when the store cannot be reached, 500 when it is reachable but the
/// counts fail.
pub async fn database_health(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    if let Err(e) = services.ping().await {
        tracing::warn!(error = %e, "database health check failed");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(UnhealthyResponse {
                status: "unhealthy",
                message: "Cannot connect to database",
                error: None,
            }),
        )
            .into_response();
    }

    match services.record_counts().await {
        Ok(records) => (
            StatusCode::OK,
            Json(DatabaseHealthResponse {
                status: "healthy",
                database: "connected",
                timestamp: Utc::now(),
                records,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "record counts failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(UnhealthyResponse {
                    status: "unhealthy",
                    message: "Database error",
                    error: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}
