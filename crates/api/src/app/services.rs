//! Service wiring: the sales store plus the report pipelines that run on it.

use std::sync::Arc;

use chrono::Utc;

use salesanalytics_analytics::report::{
    self, HourlySales, MonthlySales, RecentSale, RegionalSales, TopCustomer, TopProduct,
    WeekdaySales,
};
use salesanalytics_analytics::{
    CustomerAnalytics, DateRange, MonthRef, PeriodSnapshot, SalesComparison, SalesSummary, TopN,
};
use salesanalytics_infra::{
    AppConfig, InMemorySalesStore, PostgresSalesStore, RecordCounts, SalesRepository, StoreError,
    StoreResult,
};

use crate::app::errors::ApiError;

/// Shared application services, one instance per process.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn SalesRepository>,
}

impl AppServices {
    pub fn new(store: Arc<dyn SalesRepository>) -> Self {
        Self { store }
    }

    pub async fn sales_summary(&self, range: &DateRange) -> StoreResult<SalesSummary> {
        let records = self.store.load_sales(range).await?;
        Ok(SalesSummary::from_records(&records))
    }

    pub async fn sales_by_month(&self, range: &DateRange) -> StoreResult<Vec<MonthlySales>> {
        let records = self.store.load_sales(range).await?;
        Ok(report::monthly_trend(&records))
    }

    pub async fn sales_by_region(
        &self,
        range: &DateRange,
        top: TopN,
    ) -> StoreResult<Vec<RegionalSales>> {
        let records = self.store.load_sales(range).await?;
        Ok(report::regional_breakdown(&records, top))
    }

    pub async fn sales_by_day_of_week(&self, range: &DateRange) -> StoreResult<Vec<WeekdaySales>> {
        let records = self.store.load_sales(range).await?;
        Ok(report::weekday_pattern(&records))
    }

    pub async fn sales_by_hour(&self, range: &DateRange) -> StoreResult<Vec<HourlySales>> {
        let records = self.store.load_sales(range).await?;
        Ok(report::hourly_pattern(&records))
    }

    /// Compare `period` (or the month of the latest sale) with the month before.
    ///
    /// Each window is loaded by its own store pass. An empty dataset without an
    /// explicit period anchors on the current month.
    pub async fn sales_comparison(
        &self,
        period: Option<MonthRef>,
    ) -> Result<SalesComparison, ApiError> {
        let anchor = match period {
            Some(month) => month,
            None => {
                let latest = self.store.latest_invoice_date().await?;
                MonthRef::containing(latest.unwrap_or_else(|| Utc::now().naive_utc()))
            }
        };

        let current_window = anchor.window()?;
        let previous_window = anchor.previous()?.window()?;

        let current = self.store.load_sales(&current_window.range()).await?;
        let previous = self.store.load_sales(&previous_window.range()).await?;

        tracing::debug!(
            year = anchor.year(),
            month = anchor.month(),
            current = current.len(),
            previous = previous.len(),
            "loaded comparison windows"
        );

        Ok(SalesComparison::new(
            PeriodSnapshot::from_records(current_window, &current),
            PeriodSnapshot::from_records(previous_window, &previous),
        ))
    }

    pub async fn recent_sales(&self, limit: usize) -> StoreResult<Vec<RecentSale>> {
        let records = self.store.recent_sales(limit).await?;
        Ok(report::recent_sales(&records, limit))
    }

    pub async fn top_customers(
        &self,
        range: &DateRange,
        top: TopN,
    ) -> StoreResult<Vec<TopCustomer>> {
        let records = self.store.load_sales(range).await?;
        Ok(report::top_customers(&records, top))
    }

    pub async fn customer_analytics(&self, range: &DateRange) -> StoreResult<CustomerAnalytics> {
        let records = self.store.load_sales(range).await?;
        Ok(CustomerAnalytics::from_records(&records))
    }

    pub async fn top_products(&self, range: &DateRange, top: TopN) -> StoreResult<Vec<TopProduct>> {
        let records = self.store.load_sales(range).await?;
        Ok(report::top_products(&records, top))
    }

    pub async fn record_counts(&self) -> StoreResult<RecordCounts> {
        self.store.record_counts().await
    }

    pub async fn ping(&self) -> StoreResult<()> {
        self.store.ping().await
    }
}

/// Pick the store from configuration: Postgres when persistent stores are
/// enabled, otherwise an empty in-memory store.
pub async fn build_services(config: &AppConfig) -> StoreResult<AppServices> {
    if !config.use_persistent_stores {
        tracing::info!("USE_PERSISTENT_STORES is off; serving an empty in-memory sales store");
        return Ok(AppServices::new(Arc::new(InMemorySalesStore::new())));
    }

    let database_url = config.database_url.as_deref().ok_or_else(|| {
        StoreError::Unavailable(
            "DATABASE_URL must be set when USE_PERSISTENT_STORES=true".to_string(),
        )
    })?;

    let store = PostgresSalesStore::connect(database_url, config.database_max_connections).await?;
    store.migrate().await?;
    tracing::info!(
        max_connections = config.database_max_connections,
        "connected to Postgres sales store"
    );

    Ok(AppServices::new(Arc::new(store)))
}
