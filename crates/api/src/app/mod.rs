//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and the report pipelines
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: query parameters and response shapes
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use salesanalytics_infra::{AppConfig, StoreResult};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> StoreResult<Router> {
    let services = services::build_services(config).await?;
    Ok(router(Arc::new(services)))
}

/// Router over already-built services. All endpoints live under `/api`.
pub fn router(services: Arc<AppServices>) -> Router {
    Router::new()
        .nest("/api", routes::router())
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_id))
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use salesanalytics_infra::InMemorySalesStore;
    use tower::ServiceExt;

    fn app() -> Router {
        router(Arc::new(AppServices::new(Arc::new(InMemorySalesStore::new()))))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_running() {
        let response = app()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["message"], "API is running!");
    }

    #[tokio::test]
    async fn request_id_is_generated_or_echoed() {
        let response = app()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let generated = response.headers().get(middleware::REQUEST_ID_HEADER).unwrap();
        assert!(uuid::Uuid::parse_str(generated.to_str().unwrap()).is_ok());

        let response = app()
            .oneshot(
                Request::get("/api/health")
                    .header(middleware::REQUEST_ID_HEADER, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[middleware::REQUEST_ID_HEADER], "abc-123");
    }

    #[tokio::test]
    async fn malformed_dates_are_bad_requests() {
        let response = app()
            .oneshot(
                Request::get("/api/sales/summary?startDate=yesterday")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "invalid_date");
    }

    #[tokio::test]
    async fn non_numeric_top_is_a_bad_request() {
        let response = app()
            .oneshot(Request::get("/api/products/top?top=many").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "invalid_query");
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() {
        let response = app()
            .oneshot(Request::get("/sales/summary").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
