use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    routing::get,
    Json, Router,
};

use salesanalytics_analytics::TopProduct;

use crate::app::dto::{ProductCountResponse, TopQuery};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/top", get(top_products))
        .route("/count", get(product_count))
}

/// GET /api/products/top?top=10&startDate=&endDate=
pub async fn top_products(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<TopQuery>, QueryRejection>,
) -> Result<Json<Vec<TopProduct>>, ApiError> {
    let Query(query) = query?;
    let range = query.range()?;
    Ok(Json(services.top_products(&range, query.top()).await?))
}

/// GET /api/products/count
pub async fn product_count(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<ProductCountResponse>, ApiError> {
    let counts = services.record_counts().await?;
    Ok(Json(ProductCountResponse {
        total_products: counts.products,
    }))
}
