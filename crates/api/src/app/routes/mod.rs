use axum::{routing::get, Router};

pub mod customers;
pub mod products;
pub mod sales;
pub mod system;

/// Router for every `/api` endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/health/database", get(system::database_health))
        .nest("/customers", customers::router())
        .nest("/products", products::router())
        .nest("/sales", sales::router())
}
