use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    routing::get,
    Json, Router,
};

use salesanalytics_analytics::{CustomerAnalytics, TopCustomer};

use crate::app::dto::{CustomerCountResponse, DateRangeQuery, TopQuery};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/top", get(top_customers))
        .route("/analytics", get(customer_analytics))
        .route("/count", get(customer_count))
}

/// GET /api/customers/top?top=10&startDate=&endDate=
pub async fn top_customers(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<TopQuery>, QueryRejection>,
) -> Result<Json<Vec<TopCustomer>>, ApiError> {
    let Query(query) = query?;
    let range = query.range()?;
    Ok(Json(services.top_customers(&range, query.top()).await?))
}

/// GET /api/customers/analytics?startDate=&endDate=
pub async fn customer_analytics(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Result<Json<CustomerAnalytics>, ApiError> {
    let Query(query) = query?;
    let range = query.range()?;
    Ok(Json(services.customer_analytics(&range).await?))
}

/// GET /api/customers/count
///
/// Counts customer rows, including customers without sales.
pub async fn customer_count(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<CustomerCountResponse>, ApiError> {
    let counts = services.record_counts().await?;
    Ok(Json(CustomerCountResponse {
        total_customers: counts.customers,
    }))
}
