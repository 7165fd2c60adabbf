//! Group-by and per-group metrics.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use rust_decimal::Decimal;

use salesanalytics_core::ratio;
use salesanalytics_sales::SaleRecord;

/// Dimension a record set can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    CustomerCode,
    /// `(stock_code, description)` pair.
    Product,
    /// `(year, month)` of the invoice date.
    Month,
    Country,
    DayOfWeek,
    /// Hour of day, 0..=23.
    HourOfDay,
}

/// Value of a [`Dimension`] for one group. Compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Customer(String),
    Product {
        stock_code: String,
        description: Option<String>,
    },
    Month {
        year: i32,
        month: u32,
    },
    Country(String),
    DayOfWeek(Weekday),
    Hour(u32),
}

impl Dimension {
    pub fn key_of(&self, record: &SaleRecord) -> GroupKey {
        let at = record.invoice_date;
        match self {
            Dimension::CustomerCode => GroupKey::Customer(record.customer_code.clone()),
            Dimension::Product => GroupKey::Product {
                stock_code: record.stock_code.clone(),
                description: record.description.clone(),
            },
            Dimension::Month => GroupKey::Month {
                year: at.year(),
                month: at.month(),
            },
            Dimension::Country => GroupKey::Country(record.country.clone()),
            Dimension::DayOfWeek => GroupKey::DayOfWeek(at.weekday()),
            Dimension::HourOfDay => GroupKey::Hour(at.hour()),
        }
    }

    /// Put groups into the dimension's presentation order.
    ///
    /// Months sort chronologically, weekdays Monday-first, hours ascending.
    /// Customer, product and country groups have no natural order and are
    /// left as they are (callers rank them).
    pub fn natural_order(&self, groups: &mut [GroupResult]) {
        match self {
            Dimension::Month | Dimension::DayOfWeek | Dimension::HourOfDay => {
                groups.sort_by_key(|g| g.key.sort_ordinal());
            }
            Dimension::CustomerCode | Dimension::Product | Dimension::Country => {}
        }
    }
}

impl GroupKey {
    fn sort_ordinal(&self) -> i64 {
        match self {
            GroupKey::Month { year, month } => i64::from(*year) * 12 + i64::from(*month),
            GroupKey::DayOfWeek(day) => i64::from(day.num_days_from_monday()),
            GroupKey::Hour(hour) => i64::from(*hour),
            GroupKey::Customer(_) | GroupKey::Product { .. } | GroupKey::Country(_) => 0,
        }
    }
}

/// Aggregates over one group of records.
///
/// `first_purchase`/`last_purchase` are `None` only for an empty group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics {
    pub revenue: Decimal,
    pub transaction_count: u64,
    pub units_sold: i64,
    pub first_purchase: Option<NaiveDateTime>,
    pub last_purchase: Option<NaiveDateTime>,
}

impl Metrics {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a SaleRecord>,
    {
        let mut metrics = Self::default();
        for record in records {
            metrics.record(record);
        }
        metrics
    }

    pub fn record(&mut self, record: &SaleRecord) {
        self.revenue += record.total_amount;
        self.transaction_count += 1;
        self.units_sold += i64::from(record.quantity);

        let at = record.invoice_date;
        self.first_purchase = Some(self.first_purchase.map_or(at, |first| first.min(at)));
        self.last_purchase = Some(self.last_purchase.map_or(at, |last| last.max(at)));
    }

    /// Mean `total_amount`, rounded to cents; zero for an empty group.
    pub fn average_order_value(&self) -> Decimal {
        ratio(self.revenue, Decimal::from(self.transaction_count))
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupResult {
    pub key: GroupKey,
    pub metrics: Metrics,
}

/// Group `records` by `dimension`.
///
/// Groups come out in order of first appearance in the input. Only keys that
/// occur in the input produce a group, so no group is ever empty.
pub fn aggregate<'a, I>(records: I, dimension: Dimension) -> Vec<GroupResult>
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    let mut slots: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<GroupResult> = Vec::new();

    for record in records {
        let key = dimension.key_of(record);
        let slot = *slots.entry(key.clone()).or_insert_with(|| {
            groups.push(GroupResult {
                key,
                metrics: Metrics::default(),
            });
            groups.len() - 1
        });
        groups[slot].metrics.record(record);
    }

    groups
}
