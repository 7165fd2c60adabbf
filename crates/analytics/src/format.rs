//! Presentation helpers: month labels, weekday names, revenue shares.

use chrono::Weekday;
use rust_decimal::Decimal;

use salesanalytics_core::percent_of;

use crate::report::RegionalSales;

/// Two-digit zero-padded month number: 3 -> "03".
pub fn month_label(month: u32) -> String {
    format!("{month:02}")
}

/// English day name as reported by the weekday breakdown.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Fill in each row's share of `grand_total`.
///
/// `grand_total` is the revenue of the whole filtered set, not of `rows`, so
/// the shares of a truncated list need not add up to 100.
pub fn add_percentages(rows: Vec<RegionalSales>, grand_total: Decimal) -> Vec<RegionalSales> {
    rows.into_iter()
        .map(|row| RegionalSales {
            percentage: percent_of(row.revenue, grand_total),
            ..row
        })
        .collect()
}
