//! Data-access boundary for sale records.
//!
//! A store answers phase one of every report: the sale rows whose invoice date
//! falls in a range, already joined to product, customer and region. Grouping
//! and ranking happen in `salesanalytics-analytics`, so every implementation
//! shares the same aggregation semantics.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use salesanalytics_analytics::DateRange;
use salesanalytics_sales::SaleRecord;

pub use in_memory::InMemorySalesStore;
pub use postgres::PostgresSalesStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation error.
///
/// - **Unavailable**: the backing store cannot be reached (pool closed, I/O).
/// - **Query**: a query failed or returned rows that could not be decoded.
/// - **Integrity**: a write would break uniqueness or referential integrity.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("integrity violation: {0}")]
    Integrity(String),
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Row counts of the four tables, regardless of any date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordCounts {
    pub sales: u64,
    pub products: u64,
    pub customers: u64,
    pub regions: u64,
}

/// Read-only, queryable collection of joined sale records.
#[async_trait::async_trait]
pub trait SalesRepository: Send + Sync {
    /// Sales with `invoice_date` inside `range` (inclusive), in storage order.
    async fn load_sales(&self, range: &DateRange) -> StoreResult<Vec<SaleRecord>>;

    /// Latest invoice date over the whole dataset.
    async fn latest_invoice_date(&self) -> StoreResult<Option<NaiveDateTime>>;

    /// The `limit` most recent sales, newest first.
    async fn recent_sales(&self, limit: usize) -> StoreResult<Vec<SaleRecord>>;

    async fn record_counts(&self) -> StoreResult<RecordCounts>;

    /// Connectivity probe.
    async fn ping(&self) -> StoreResult<()>;
}

#[async_trait::async_trait]
impl<S> SalesRepository for Arc<S>
where
    S: SalesRepository + ?Sized,
{
    async fn load_sales(&self, range: &DateRange) -> StoreResult<Vec<SaleRecord>> {
        (**self).load_sales(range).await
    }

    async fn latest_invoice_date(&self) -> StoreResult<Option<NaiveDateTime>> {
        (**self).latest_invoice_date().await
    }

    async fn recent_sales(&self, limit: usize) -> StoreResult<Vec<SaleRecord>> {
        (**self).recent_sales(limit).await
    }

    async fn record_counts(&self) -> StoreResult<RecordCounts> {
        (**self).record_counts().await
    }

    async fn ping(&self) -> StoreResult<()> {
        (**self).ping().await
    }
}
