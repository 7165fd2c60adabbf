//! Whole-set totals.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use salesanalytics_core::ratio;
use salesanalytics_sales::SaleRecord;

use crate::aggregate::Metrics;
use crate::rank::TopN;
use crate::report::{top_customers, TopCustomer};

/// Headline KPIs of a filtered record set.
///
/// Distinct counts are the cardinality of the foreign keys that occur in the
/// set, so reference rows without sales in range are never counted.
/// `start_date`/`end_date` are `None` when the set is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_revenue: Decimal,
    pub total_transactions: u64,
    pub average_order_value: Decimal,
    pub unique_customers: u64,
    pub unique_products: u64,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

impl SalesSummary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a SaleRecord>,
    {
        let mut metrics = Metrics::default();
        let mut customers = HashSet::new();
        let mut products = HashSet::new();
        for record in records {
            metrics.record(record);
            customers.insert(record.customer_id);
            products.insert(record.product_id);
        }

        Self {
            total_revenue: metrics.revenue,
            total_transactions: metrics.transaction_count,
            average_order_value: metrics.average_order_value(),
            unique_customers: customers.len() as u64,
            unique_products: products.len() as u64,
            start_date: metrics.first_purchase,
            end_date: metrics.last_purchase,
        }
    }
}

/// Customer-centric KPIs of a filtered record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAnalytics {
    pub total_customers: u64,
    pub average_customer_value: Decimal,
    pub average_orders_per_customer: Decimal,
    pub top_customers: Vec<TopCustomer>,
}

impl CustomerAnalytics {
    /// Number of customers listed in `top_customers`.
    pub const TOP: TopN = TopN::new(10);

    pub fn from_records(records: &[SaleRecord]) -> Self {
        let summary = SalesSummary::from_records(records);
        let customers = Decimal::from(summary.unique_customers);

        Self {
            total_customers: summary.unique_customers,
            average_customer_value: ratio(summary.total_revenue, customers),
            average_orders_per_customer: ratio(
                Decimal::from(summary.total_transactions),
                customers,
            ),
            top_customers: top_customers(records, Self::TOP),
        }
    }
}
