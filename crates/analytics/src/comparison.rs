//! Month-over-month comparison.
//!
//! A comparison is two independent snapshots, one per calendar month window,
//! plus the growth between them.

use std::collections::HashSet;

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use salesanalytics_core::percent_change;
use salesanalytics_sales::SaleRecord;

use crate::aggregate::Metrics;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::filter::DateRange;

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthRef {
    year: i32,
    month: u32,
}

impl MonthRef {
    /// Validate an explicit `(year, month)`.
    ///
    /// The month must be 1..=12 and both it and the month before it must be
    /// representable dates.
    pub fn new(year: i32, month: u32) -> AnalyticsResult<Self> {
        let candidate = Self { year, month };
        let valid = (1..=12).contains(&month)
            && candidate.first_day_opt().is_some()
            && candidate.last_day_opt().is_some()
            && candidate.previous_opt().is_some();
        if valid {
            Ok(candidate)
        } else {
            Err(AnalyticsError::InvalidPeriod { year, month })
        }
    }

    /// The month containing `at`.
    pub fn containing(at: NaiveDateTime) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The month before this one (December of the prior year for January).
    pub fn previous(&self) -> AnalyticsResult<Self> {
        self.previous_opt().ok_or(AnalyticsError::InvalidPeriod {
            year: self.year,
            month: self.month,
        })
    }

    /// Whole-day window from the first to the last day of the month.
    pub fn window(&self) -> AnalyticsResult<PeriodWindow> {
        match (self.first_day_opt(), self.last_day_opt()) {
            (Some(first), Some(last)) => Ok(PeriodWindow { first, last }),
            _ => Err(AnalyticsError::InvalidPeriod {
                year: self.year,
                month: self.month,
            }),
        }
    }

    fn previous_opt(&self) -> Option<Self> {
        match self.month {
            1 => self.year.checked_sub(1).map(|year| Self { year, month: 12 }),
            m => Some(Self {
                year: self.year,
                month: m - 1,
            }),
        }
    }

    fn first_day_opt(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    fn last_day_opt(&self) -> Option<NaiveDate> {
        self.first_day_opt()?
            .checked_add_months(Months::new(1))?
            .pred_opt()
    }
}

/// Inclusive calendar window `[first, last]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeriodWindow {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl PeriodWindow {
    pub fn range(&self) -> DateRange {
        DateRange::days(self.first, self.last)
    }
}

/// Aggregate summary of one period window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSnapshot {
    pub revenue: Decimal,
    pub transaction_count: u64,
    pub average_order_value: Decimal,
    pub unique_customers: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl PeriodSnapshot {
    /// Summarize `records` for `window`.
    ///
    /// Records outside the window are ignored, so the caller may pass an
    /// unfiltered set; an empty window yields an all-zero snapshot.
    pub fn from_records<'a, I>(window: PeriodWindow, records: I) -> Self
    where
        I: IntoIterator<Item = &'a SaleRecord>,
    {
        let range = window.range();
        let mut metrics = Metrics::default();
        let mut customers = HashSet::new();
        for record in records.into_iter().filter(|r| range.contains(r.invoice_date)) {
            metrics.record(record);
            customers.insert(record.customer_id);
        }

        Self {
            revenue: metrics.revenue,
            transaction_count: metrics.transaction_count,
            average_order_value: metrics.average_order_value(),
            unique_customers: customers.len() as u64,
            start_date: window.first,
            end_date: window.last,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    pub fn between(previous: Decimal, current: Decimal) -> Self {
        match current.cmp(&previous) {
            core::cmp::Ordering::Greater => Trend::Up,
            core::cmp::Ordering::Less => Trend::Down,
            core::cmp::Ordering::Equal => Trend::Neutral,
        }
    }
}

/// Percentage growth from `old` to `new`, rounded to two places.
///
/// A zero baseline reports 0 growth whatever the new value.
pub fn growth(old: Decimal, new: Decimal) -> Decimal {
    percent_change(old, new)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthMetrics {
    pub revenue_growth: Decimal,
    pub transaction_growth: Decimal,
    pub average_order_growth: Decimal,
    pub customer_growth: Decimal,
    pub trend: Trend,
}

impl GrowthMetrics {
    pub fn between(previous: &PeriodSnapshot, current: &PeriodSnapshot) -> Self {
        Self {
            revenue_growth: growth(previous.revenue, current.revenue),
            transaction_growth: growth(
                Decimal::from(previous.transaction_count),
                Decimal::from(current.transaction_count),
            ),
            average_order_growth: growth(previous.average_order_value, current.average_order_value),
            customer_growth: growth(
                Decimal::from(previous.unique_customers),
                Decimal::from(current.unique_customers),
            ),
            trend: Trend::between(previous.revenue, current.revenue),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesComparison {
    pub current_period: PeriodSnapshot,
    pub previous_period: PeriodSnapshot,
    pub growth: GrowthMetrics,
}

impl SalesComparison {
    pub fn new(current: PeriodSnapshot, previous: PeriodSnapshot) -> Self {
        let growth = GrowthMetrics::between(&previous, &current);
        Self {
            current_period: current,
            previous_period: previous,
            growth,
        }
    }
}
