use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    routing::get,
    Json, Router,
};

use salesanalytics_analytics::{
    HourlySales, MonthlySales, RecentSale, RegionalSales, SalesComparison, SalesSummary,
    WeekdaySales,
};

use crate::app::dto::{ComparisonQuery, DateRangeQuery, RecentQuery, TopQuery};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/summary", get(summary))
        .route("/by-month", get(by_month))
        .route("/by-region", get(by_region))
        .route("/by-day-of-week", get(by_day_of_week))
        .route("/by-hour", get(by_hour))
        .route("/comparison", get(comparison))
        .route("/recent", get(recent))
}

type Services = Extension<Arc<AppServices>>;

/// GET /api/sales/summary?startDate=&endDate=
pub async fn summary(
    Extension(services): Services,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Result<Json<SalesSummary>, ApiError> {
    let Query(query) = query?;
    Ok(Json(services.sales_summary(&query.range()?).await?))
}

/// GET /api/sales/by-month?startDate=&endDate=
pub async fn by_month(
    Extension(services): Services,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Result<Json<Vec<MonthlySales>>, ApiError> {
    let Query(query) = query?;
    Ok(Json(services.sales_by_month(&query.range()?).await?))
}

/// GET /api/sales/by-region?startDate=&endDate=&top=10
pub async fn by_region(
    Extension(services): Services,
    query: Result<Query<TopQuery>, QueryRejection>,
) -> Result<Json<Vec<RegionalSales>>, ApiError> {
    let Query(query) = query?;
    let range = query.range()?;
    Ok(Json(services.sales_by_region(&range, query.top()).await?))
}

/// GET /api/sales/by-day-of-week?startDate=&endDate=
pub async fn by_day_of_week(
    Extension(services): Services,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Result<Json<Vec<WeekdaySales>>, ApiError> {
    let Query(query) = query?;
    Ok(Json(services.sales_by_day_of_week(&query.range()?).await?))
}

/// GET /api/sales/by-hour?startDate=&endDate=
pub async fn by_hour(
    Extension(services): Services,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Result<Json<Vec<HourlySales>>, ApiError> {
    let Query(query) = query?;
    Ok(Json(services.sales_by_hour(&query.range()?).await?))
}

/// GET /api/sales/comparison?year=&month=
pub async fn comparison(
    Extension(services): Services,
    query: Result<Query<ComparisonQuery>, QueryRejection>,
) -> Result<Json<SalesComparison>, ApiError> {
    let Query(query) = query?;
    Ok(Json(services.sales_comparison(query.period()?).await?))
}

/// GET /api/sales/recent?limit=10
pub async fn recent(
    Extension(services): Services,
    query: Result<Query<RecentQuery>, QueryRejection>,
) -> Result<Json<Vec<RecentSale>>, ApiError> {
    let Query(query) = query?;
    Ok(Json(services.recent_sales(query.limit()).await?))
}
