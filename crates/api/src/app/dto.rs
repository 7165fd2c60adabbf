use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use salesanalytics_analytics::{AnalyticsResult, DateRange, MonthRef, TopN};
use salesanalytics_infra::RecordCounts;

// -------------------------
// Query parameters
// -------------------------

/// `?startDate=&endDate=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRangeQuery {
    pub fn range(&self) -> AnalyticsResult<DateRange> {
        DateRange::parse(self.start_date.as_deref(), self.end_date.as_deref())
    }
}

/// `?top=&startDate=&endDate=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopQuery {
    pub top: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl TopQuery {
    pub fn range(&self) -> AnalyticsResult<DateRange> {
        DateRange::parse(self.start_date.as_deref(), self.end_date.as_deref())
    }

    pub fn top(&self) -> TopN {
        TopN::from_param(self.top)
    }
}

/// `?year=&month=`
#[derive(Debug, Default, Deserialize)]
pub struct ComparisonQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl ComparisonQuery {
    /// The explicit anchor month, only when both parts are present.
    pub fn period(&self) -> AnalyticsResult<Option<MonthRef>> {
        match (self.year, self.month) {
            (Some(year), Some(month)) => MonthRef::new(year, month).map(Some),
            _ => Ok(None),
        }
    }
}

/// `?limit=`
#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

impl RecentQuery {
    pub fn limit(&self) -> usize {
        TopN::from_param(self.limit).get()
    }
}

// -------------------------
// Responses
// -------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCountResponse {
    pub total_customers: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCountResponse {
    pub total_products: u64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub timestamp: DateTime<Utc>,
    pub records: RecordCounts,
}

#[derive(Debug, Serialize)]
pub struct UnhealthyResponse {
    pub status: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
