//! Report rows and the pipelines that build them.
//!
//! Each builder takes the already filtered record set (phase 1, done by the
//! data-access layer) and runs the in-process phase: group, order or rank,
//! format.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use salesanalytics_core::ValueObject;
use salesanalytics_sales::{SaleRecord, UNKNOWN_DESCRIPTION};

use crate::aggregate::{aggregate, Dimension, GroupKey, GroupResult};
use crate::format::{add_percentages, month_label, weekday_name};
use crate::rank::{rank, Direction, RankMetric, TopN};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCustomer {
    pub customer_code: String,
    pub total_revenue: Decimal,
    pub order_count: u64,
    pub average_order_value: Decimal,
    pub first_purchase: NaiveDateTime,
    pub last_purchase: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub stock_code: String,
    pub description: String,
    pub revenue: Decimal,
    pub units_sold: i64,
    pub transaction_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySales {
    pub year: i32,
    pub month: String,
    pub revenue: Decimal,
    pub transaction_count: u64,
    pub average_order_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalSales {
    pub country: String,
    pub revenue: Decimal,
    pub transaction_count: u64,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdaySales {
    pub day_of_week: String,
    pub revenue: Decimal,
    pub transaction_count: u64,
    pub average_order_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlySales {
    pub hour: u32,
    pub revenue: Decimal,
    pub transaction_count: u64,
    pub average_order_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentSale {
    pub invoice_no: String,
    pub invoice_date: NaiveDateTime,
    pub product_description: String,
    pub country: String,
    pub quantity: i32,
    pub total_amount: Decimal,
}

impl ValueObject for TopCustomer {}
impl ValueObject for TopProduct {}
impl ValueObject for MonthlySales {}
impl ValueObject for RegionalSales {}
impl ValueObject for WeekdaySales {}
impl ValueObject for HourlySales {}
impl ValueObject for RecentSale {}

fn ranked_by_revenue(records: &[SaleRecord], dimension: Dimension, top: TopN) -> Vec<GroupResult> {
    rank(
        aggregate(records, dimension),
        RankMetric::Revenue,
        Direction::Descending,
        top,
    )
}

fn in_natural_order(records: &[SaleRecord], dimension: Dimension) -> Vec<GroupResult> {
    let mut groups = aggregate(records, dimension);
    dimension.natural_order(&mut groups);
    groups
}

/// Map groups to report rows, keeping their order. Groups whose key does not
/// fit the row are skipped.
fn project<R, F>(groups: Vec<GroupResult>, to_row: F) -> Vec<R>
where
    R: ValueObject,
    F: FnMut(GroupResult) -> Option<R>,
{
    groups.into_iter().filter_map(to_row).collect()
}

/// Customers by revenue, highest first.
pub fn top_customers(records: &[SaleRecord], top: TopN) -> Vec<TopCustomer> {
    project(ranked_by_revenue(records, Dimension::CustomerCode, top), |g| {
        let GroupKey::Customer(customer_code) = g.key else {
            return None;
        };
        Some(TopCustomer {
            customer_code,
            total_revenue: g.metrics.revenue,
            order_count: g.metrics.transaction_count,
            average_order_value: g.metrics.average_order_value(),
            first_purchase: g.metrics.first_purchase?,
            last_purchase: g.metrics.last_purchase?,
        })
    })
}

/// Products by revenue, highest first.
pub fn top_products(records: &[SaleRecord], top: TopN) -> Vec<TopProduct> {
    project(ranked_by_revenue(records, Dimension::Product, top), |g| match g.key {
        GroupKey::Product { stock_code, description } => Some(TopProduct {
            stock_code,
            description: description.unwrap_or_else(|| UNKNOWN_DESCRIPTION.to_string()),
            revenue: g.metrics.revenue,
            units_sold: g.metrics.units_sold,
            transaction_count: g.metrics.transaction_count,
        }),
        _ => None,
    })
}

/// Revenue per calendar month, oldest first.
pub fn monthly_trend(records: &[SaleRecord]) -> Vec<MonthlySales> {
    project(in_natural_order(records, Dimension::Month), |g| match g.key {
        GroupKey::Month { year, month } => Some(MonthlySales {
            year,
            month: month_label(month),
            revenue: g.metrics.revenue,
            transaction_count: g.metrics.transaction_count,
            average_order_value: g.metrics.average_order_value(),
        }),
        _ => None,
    })
}

/// Top countries by revenue with their share of the whole filtered set.
pub fn regional_breakdown(records: &[SaleRecord], top: TopN) -> Vec<RegionalSales> {
    let grand_total: Decimal = records.iter().map(|r| r.total_amount).sum();
    let rows = project(ranked_by_revenue(records, Dimension::Country, top), |g| match g.key {
        GroupKey::Country(country) => Some(RegionalSales {
            country,
            revenue: g.metrics.revenue,
            transaction_count: g.metrics.transaction_count,
            percentage: Decimal::ZERO,
        }),
        _ => None,
    });
    add_percentages(rows, grand_total)
}

/// Days of the week that have sales, Monday first.
pub fn weekday_pattern(records: &[SaleRecord]) -> Vec<WeekdaySales> {
    project(in_natural_order(records, Dimension::DayOfWeek), |g| match g.key {
        GroupKey::DayOfWeek(day) => Some(WeekdaySales {
            day_of_week: weekday_name(day).to_string(),
            revenue: g.metrics.revenue,
            transaction_count: g.metrics.transaction_count,
            average_order_value: g.metrics.average_order_value(),
        }),
        _ => None,
    })
}

/// Hours of the day that have sales, ascending.
pub fn hourly_pattern(records: &[SaleRecord]) -> Vec<HourlySales> {
    project(in_natural_order(records, Dimension::HourOfDay), |g| match g.key {
        GroupKey::Hour(hour) => Some(HourlySales {
            hour,
            revenue: g.metrics.revenue,
            transaction_count: g.metrics.transaction_count,
            average_order_value: g.metrics.average_order_value(),
        }),
        _ => None,
    })
}

/// Newest `limit` sales, most recent first.
///
/// Stores usually hand over records already ordered and limited; sorting
/// again here keeps the contract for stores that do not.
pub fn recent_sales(records: &[SaleRecord], limit: usize) -> Vec<RecentSale> {
    let mut newest: Vec<&SaleRecord> = records.iter().collect();
    newest.sort_by(|a, b| b.invoice_date.cmp(&a.invoice_date));
    newest
        .into_iter()
        .take(limit)
        .map(|r| RecentSale {
            invoice_no: r.invoice_no.clone(),
            invoice_date: r.invoice_date,
            product_description: r.description_or_unknown().to_string(),
            country: r.country.clone(),
            quantity: r.quantity,
            total_amount: r.total_amount,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{dec, three_sales, ymd_hms, SaleBuilder};
    use proptest::prelude::*;

    #[test]
    fn rows_follow_group_order_and_skip_foreign_keys() {
        let records = three_sales();
        let groups = aggregate(&records, Dimension::CustomerCode);
        let expected: Vec<String> = groups
            .iter()
            .filter_map(|g| match &g.key {
                GroupKey::Customer(code) => Some(code.clone()),
                _ => None,
            })
            .collect();

        let rows = project(groups, |g| match g.key {
            GroupKey::Customer(customer_code) => Some(RegionalSales {
                country: customer_code,
                revenue: g.metrics.revenue,
                transaction_count: g.metrics.transaction_count,
                percentage: Decimal::ZERO,
            }),
            _ => None,
        });
        let codes: Vec<String> = rows.into_iter().map(|r| r.country).collect();
        assert_eq!(codes, expected);

        let by_month = aggregate(&records, Dimension::Month);
        let none: Vec<HourlySales> = project(by_month, |g| match g.key {
            GroupKey::Hour(hour) => Some(HourlySales {
                hour,
                revenue: g.metrics.revenue,
                transaction_count: g.metrics.transaction_count,
                average_order_value: g.metrics.average_order_value(),
            }),
            _ => None,
        });
        assert!(none.is_empty());
    }

    #[test]
    fn by_month_scenario() {
        let rows = monthly_trend(&three_sales());
        assert_eq!(
            rows,
            vec![
                MonthlySales {
                    year: 2024,
                    month: "01".into(),
                    revenue: dec("10.00"),
                    transaction_count: 1,
                    average_order_value: dec("10.00"),
                },
                MonthlySales {
                    year: 2024,
                    month: "02".into(),
                    revenue: dec("50.00"),
                    transaction_count: 2,
                    average_order_value: dec("25.00"),
                },
            ]
        );
    }

    #[test]
    fn months_order_across_years() {
        let records = vec![
            SaleBuilder::new("C1", "1.00", ymd_hms(2024, 1, 3, 8, 0, 0)).build(),
            SaleBuilder::new("C1", "1.00", ymd_hms(2023, 12, 3, 8, 0, 0)).build(),
            SaleBuilder::new("C1", "1.00", ymd_hms(2023, 2, 3, 8, 0, 0)).build(),
        ];
        let labels: Vec<_> = monthly_trend(&records)
            .into_iter()
            .map(|m| format!("{}-{}", m.year, m.month))
            .collect();
        assert_eq!(labels, vec!["2023-02", "2023-12", "2024-01"]);
    }

    #[test]
    fn top_products_fill_unknown_description() {
        let at = ymd_hms(2024, 3, 1, 10, 0, 0);
        let records = vec![
            SaleBuilder::new("C1", "3.00", at).product(1, "A1", None).quantity(3).build(),
            SaleBuilder::new("C1", "9.00", at).product(2, "B2", Some("Lamp")).quantity(1).build(),
        ];
        let rows = top_products(&records, TopN::DEFAULT);
        assert_eq!(rows[0].stock_code, "B2");
        assert_eq!(rows[1].description, UNKNOWN_DESCRIPTION);
        assert_eq!(rows[1].units_sold, 3);
    }

    #[test]
    fn regional_shares_use_grand_total_after_truncation() {
        let at = ymd_hms(2024, 3, 1, 10, 0, 0);
        let records = vec![
            SaleBuilder::new("C1", "60.00", at).country(1, "United Kingdom").build(),
            SaleBuilder::new("C1", "30.00", at).country(2, "France").build(),
            SaleBuilder::new("C1", "10.00", at).country(3, "Germany").build(),
        ];
        let rows = regional_breakdown(&records, TopN::new(2));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].country, "United Kingdom");
        assert_eq!(rows[0].percentage, dec("60.00"));
        assert_eq!(rows[1].percentage, dec("30.00"));
    }

    #[test]
    fn zero_revenue_regions_have_zero_share() {
        let at = ymd_hms(2024, 3, 1, 10, 0, 0);
        let records = vec![SaleBuilder::new("C1", "0.00", at).build()];
        let rows = regional_breakdown(&records, TopN::DEFAULT);
        assert_eq!(rows[0].percentage, Decimal::ZERO);
    }

    #[test]
    fn weekday_rows_use_day_names() {
        let rows = weekday_pattern(&three_sales());
        // 2024-01-15 Monday, 2024-02-10 Saturday, 2024-02-20 Tuesday.
        let days: Vec<_> = rows.iter().map(|r| r.day_of_week.as_str()).collect();
        assert_eq!(days, vec!["Monday", "Tuesday", "Saturday"]);
    }

    #[test]
    fn hourly_rows_ascend() {
        let rows = hourly_pattern(&three_sales());
        let hours: Vec<_> = rows.iter().map(|r| r.hour).collect();
        assert_eq!(hours, vec![9, 14, 16]);
    }

    #[test]
    fn recent_sales_newest_first_and_limited() {
        let rows = recent_sales(&three_sales(), 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].invoice_no, "INV-3");
        assert_eq!(rows[1].invoice_no, "INV-2");
        assert_eq!(rows[0].product_description, "Widget");
    }

    #[test]
    fn empty_inputs_produce_empty_reports() {
        assert!(top_customers(&[], TopN::DEFAULT).is_empty());
        assert!(monthly_trend(&[]).is_empty());
        assert!(regional_breakdown(&[], TopN::DEFAULT).is_empty());
        assert!(weekday_pattern(&[]).is_empty());
        assert!(hourly_pattern(&[]).is_empty());
    }

    proptest! {
        /// Property: regional shares lie in [0, 100] for non-negative amounts.
        #[test]
        fn regional_percentages_are_bounded(
            rows in prop::collection::vec((0usize..6, 0i64..1_000_000), 1..50),
            top in 1usize..8,
        ) {
            let at = ymd_hms(2024, 3, 1, 10, 0, 0);
            let records: Vec<_> = rows
                .iter()
                .map(|(country, cents)| {
                    SaleBuilder::new("C1", &Decimal::new(*cents, 2).to_string(), at)
                        .country(*country as i32, &format!("Country {country}"))
                        .build()
                })
                .collect();
            let out = regional_breakdown(&records, TopN::new(top));
            prop_assert!(out.len() <= top);
            for row in &out {
                prop_assert!(row.percentage >= Decimal::ZERO);
                prop_assert!(row.percentage <= Decimal::ONE_HUNDRED);
            }
        }
    }
}
