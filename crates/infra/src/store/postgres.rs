//! Postgres-backed sales store.
//!
//! The date filter, the three joins, ordering and `LIMIT` run in SQL; grouping
//! stays in-process.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Integrity` |
//! | Database (foreign key violation) | `23503` | `Integrity` |
//! | Database (check constraint violation) | `23514` | `Integrity` |
//! | Database (other) | Any other | `Query` |
//! | PoolClosed / PoolTimedOut / Io / Tls | N/A | `Unavailable` |
//! | Decode / ColumnDecode / RowNotFound / other | N/A | `Query` |

use std::sync::Arc;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Row};
use tracing::{instrument, Span};

use salesanalytics_analytics::DateRange;
use salesanalytics_core::{CustomerId, ProductId, RegionId, SaleId};
use salesanalytics_sales::SaleRecord;

use super::{RecordCounts, SalesRepository, StoreError, StoreResult};

const SELECT_SALE_RECORDS: &str = r#"
    SELECT
        s.sale_id,
        s.invoice_no,
        s.product_id,
        s.customer_id,
        s.region_id,
        p.stock_code,
        p.description,
        c.customer_code,
        r.country,
        s.quantity,
        s.unit_price,
        s.total_amount,
        s.invoice_date
    FROM sales s
    JOIN products p ON p.product_id = s.product_id
    JOIN customers c ON c.customer_id = s.customer_id
    JOIN regions r ON r.region_id = s.region_id
"#;

/// Postgres-backed sales store.
///
/// Uses SQLx connection pool which is thread-safe (Arc + Send + Sync).
#[derive(Debug, Clone)]
pub struct PostgresSalesStore {
    pool: Arc<PgPool>,
}

impl PostgresSalesStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    #[instrument(skip(database_url), err)]
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Apply the bundled schema migrations.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations")
            .run(&*self.pool)
            .await
            .map_err(|e| StoreError::Query(format!("migration failed: {e}")))
    }

    fn decode_rows(rows: Vec<PgRow>) -> StoreResult<Vec<SaleRecord>> {
        rows.iter()
            .map(|row| {
                SaleRecordRow::from_row(row)
                    .map(Into::into)
                    .map_err(|e| StoreError::Query(format!("failed to decode sale row: {e}")))
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl SalesRepository for PostgresSalesStore {
    #[instrument(
        skip(self),
        fields(start = ?range.start, end = ?range.end, record_count = tracing::field::Empty),
        err
    )]
    async fn load_sales(&self, range: &DateRange) -> StoreResult<Vec<SaleRecord>> {
        let sql = format!(
            "{SELECT_SALE_RECORDS}
             WHERE ($1::timestamp IS NULL OR s.invoice_date >= $1)
               AND ($2::timestamp IS NULL OR s.invoice_date <= $2)
             ORDER BY s.sale_id ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("load_sales", e))?;

        let records = Self::decode_rows(rows)?;
        Span::current().record("record_count", records.len());
        Ok(records)
    }

    #[instrument(skip(self), err)]
    async fn latest_invoice_date(&self) -> StoreResult<Option<NaiveDateTime>> {
        let row = sqlx::query("SELECT MAX(invoice_date) AS latest FROM sales")
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("latest_invoice_date", e))?;
        row.try_get::<Option<NaiveDateTime>, _>("latest")
            .map_err(|e| map_sqlx_error("latest_invoice_date", e))
    }

    #[instrument(skip(self), err)]
    async fn recent_sales(&self, limit: usize) -> StoreResult<Vec<SaleRecord>> {
        let sql = format!(
            "{SELECT_SALE_RECORDS}
             ORDER BY s.invoice_date DESC, s.sale_id DESC
             LIMIT $1"
        );
        let rows = sqlx::query(&sql)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("recent_sales", e))?;
        Self::decode_rows(rows)
    }

    #[instrument(skip(self), err)]
    async fn record_counts(&self) -> StoreResult<RecordCounts> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM sales) AS sales,
                (SELECT COUNT(*) FROM products) AS products,
                (SELECT COUNT(*) FROM customers) AS customers,
                (SELECT COUNT(*) FROM regions) AS regions
            "#,
        )
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("record_counts", e))?;

        let count = |column: &str| -> StoreResult<u64> {
            let n: i64 = row
                .try_get(column)
                .map_err(|e| map_sqlx_error("record_counts", e))?;
            Ok(n.max(0) as u64)
        };

        Ok(RecordCounts {
            sales: count("sales")?,
            products: count("products")?,
            customers: count("customers")?,
            regions: count("regions")?,
        })
    }

    #[instrument(skip(self), err)]
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&*self.pool)
            .await
            .map(|_| ())
            .map_err(|e| map_sqlx_error("ping", e))
    }
}

/// Map SQLx errors to `StoreError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505" | "23503" | "23514") => StoreError::Integrity(msg),
                _ => StoreError::Query(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("timed out acquiring a connection in {operation}"))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("i/o error in {operation}: {e}")),
        sqlx::Error::Tls(e) => StoreError::Unavailable(format!("tls error in {operation}: {e}")),
        _ => StoreError::Query(format!("sqlx error in {operation}: {err}")),
    }
}

// SQLx row types

#[derive(Debug)]
struct SaleRecordRow {
    sale_id: i32,
    invoice_no: String,
    product_id: i32,
    customer_id: i32,
    region_id: i32,
    stock_code: String,
    description: Option<String>,
    customer_code: String,
    country: String,
    quantity: i32,
    unit_price: Decimal,
    total_amount: Decimal,
    invoice_date: NaiveDateTime,
}

impl<'r> FromRow<'r, PgRow> for SaleRecordRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(SaleRecordRow {
            sale_id: row.try_get("sale_id")?,
            invoice_no: row.try_get("invoice_no")?,
            product_id: row.try_get("product_id")?,
            customer_id: row.try_get("customer_id")?,
            region_id: row.try_get("region_id")?,
            stock_code: row.try_get("stock_code")?,
            description: row.try_get("description")?,
            customer_code: row.try_get("customer_code")?,
            country: row.try_get("country")?,
            quantity: row.try_get("quantity")?,
            unit_price: row.try_get("unit_price")?,
            total_amount: row.try_get("total_amount")?,
            invoice_date: row.try_get("invoice_date")?,
        })
    }
}

impl From<SaleRecordRow> for SaleRecord {
    fn from(row: SaleRecordRow) -> Self {
        SaleRecord {
            sale_id: SaleId::new(row.sale_id),
            invoice_no: row.invoice_no,
            product_id: ProductId::new(row.product_id),
            customer_id: CustomerId::new(row.customer_id),
            region_id: RegionId::new(row.region_id),
            stock_code: row.stock_code,
            description: row.description,
            customer_code: row.customer_code,
            country: row.country,
            quantity: row.quantity,
            unit_price: row.unit_price,
            total_amount: row.total_amount,
            invoice_date: row.invoice_date,
        }
    }
}
