//! Sales aggregation engine.
//!
//! Every report is the same pipeline: filter a record set by an inclusive date
//! range, group it by one dimension, compute metrics per group, then rank,
//! truncate and format. The functions here are pure; loading records is the
//! data-access layer's job.

pub mod aggregate;
pub mod comparison;
pub mod error;
pub mod filter;
pub mod format;
pub mod rank;
pub mod report;
pub mod summary;

#[cfg(test)]
pub(crate) mod fixtures;

pub use aggregate::{aggregate, Dimension, GroupKey, GroupResult, Metrics};
pub use comparison::{
    growth, GrowthMetrics, MonthRef, PeriodSnapshot, PeriodWindow, SalesComparison, Trend,
};
pub use error::{AnalyticsError, AnalyticsResult};
pub use filter::{build_filter_predicate, DateRange};
pub use format::{add_percentages, month_label, weekday_name};
pub use rank::{rank, Direction, RankMetric, TopN};
pub use report::{
    HourlySales, MonthlySales, RecentSale, RegionalSales, TopCustomer, TopProduct, WeekdaySales,
};
pub use summary::{CustomerAnalytics, SalesSummary};
