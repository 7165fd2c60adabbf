//! Inclusive date-range filtering.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use salesanalytics_sales::SaleRecord;

use crate::error::{AnalyticsError, AnalyticsResult};

/// Inclusive `[start, end]` bounds on `invoice_date`. A missing bound is open.
///
/// A range whose start is after its end is valid and matches nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    /// The unbounded range (every record).
    pub const fn all() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    pub const fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        Self { start, end }
    }

    /// Whole days `first..=last`, from midnight to the last instant of `last`.
    pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            start: Some(start_of_day(first)),
            end: Some(end_of_day(last)),
        }
    }

    /// Build a range from raw request parameters.
    ///
    /// Accepts `YYYY-MM-DD`, a local ISO datetime, or an RFC 3339 instant
    /// (`Z` or `+HH:MM`), which is converted to UTC. A date-only end bound
    /// covers the whole of that day.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> AnalyticsResult<Self> {
        let start = non_empty(start).map(|s| parse_bound(s, start_of_day)).transpose()?;
        let end = non_empty(end).map(|s| parse_bound(s, end_of_day)).transpose()?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start.is_none_or(|start| at >= start) && self.end.is_none_or(|end| at <= end)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Predicate selecting the records whose `invoice_date` lies in `range`.
pub fn build_filter_predicate(range: &DateRange) -> impl Fn(&SaleRecord) -> bool + '_ {
    move |record| range.contains(record.invoice_date)
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bound(
    raw: &str,
    date_only: fn(NaiveDate) -> NaiveDateTime,
) -> AnalyticsResult<NaiveDateTime> {
    const DATETIME_FORMATS: [&str; 3] =
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date_only(date));
    }
    // Offset-qualified instants are compared in UTC.
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| AnalyticsError::InvalidDate(raw.to_string()))
}

pub(crate) fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

pub(crate) fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    // 23:59:59.999999999 always exists
    date.and_hms_nano_opt(23, 59, 59, 999_999_999)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{record_at, ymd_hms};

    #[test]
    fn unbounded_range_matches_everything() {
        let range = DateRange::all();
        assert!(range.is_unbounded());
        assert!(range.contains(ymd_hms(1990, 1, 1, 0, 0, 0)));
        assert!(range.contains(ymd_hms(2100, 12, 31, 23, 59, 59)));
    }

    #[test]
    fn bounds_are_inclusive() {
        let start = ymd_hms(2024, 1, 15, 0, 0, 0);
        let end = ymd_hms(2024, 2, 10, 12, 0, 0);
        let range = DateRange::new(Some(start), Some(end));

        assert!(range.contains(start));
        assert!(range.contains(end));
        assert!(!range.contains(ymd_hms(2024, 1, 14, 23, 59, 59)));
        assert!(!range.contains(ymd_hms(2024, 2, 10, 12, 0, 1)));
    }

    #[test]
    fn date_only_end_covers_the_whole_day() {
        let range = DateRange::parse(Some("2024-02-01"), Some("2024-02-20")).unwrap();
        assert!(range.contains(ymd_hms(2024, 2, 1, 0, 0, 0)));
        assert!(range.contains(ymd_hms(2024, 2, 20, 23, 59, 59)));
        assert!(!range.contains(ymd_hms(2024, 2, 21, 0, 0, 0)));
    }

    #[test]
    fn datetime_bounds_are_taken_literally() {
        let range = DateRange::parse(None, Some("2024-02-20T12:00:00")).unwrap();
        assert_eq!(range.start, None);
        assert!(range.contains(ymd_hms(2024, 2, 20, 12, 0, 0)));
        assert!(!range.contains(ymd_hms(2024, 2, 20, 12, 0, 1)));
    }

    #[test]
    fn offset_datetimes_are_converted_to_utc() {
        for raw in [
            "2024-02-20T12:00:00Z",
            "2024-02-20T12:00:00.000Z",
            "2024-02-20T12:00:00+00:00",
            "2024-02-20T14:00:00+02:00",
        ] {
            let range = DateRange::parse(None, Some(raw)).unwrap();
            assert_eq!(range.end, Some(ymd_hms(2024, 2, 20, 12, 0, 0)), "{raw}");
        }
    }

    #[test]
    fn blank_parameters_are_open_bounds() {
        let range = DateRange::parse(Some("  "), Some("")).unwrap();
        assert!(range.is_unbounded());
    }

    #[test]
    fn garbage_dates_are_rejected() {
        let err = DateRange::parse(Some("15/01/2024"), None).unwrap_err();
        assert_eq!(err, AnalyticsError::InvalidDate("15/01/2024".into()));
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let range = DateRange::parse(Some("2024-03-01"), Some("2024-02-01")).unwrap();
        assert!(!range.contains(ymd_hms(2024, 2, 15, 0, 0, 0)));
    }

    #[test]
    fn predicate_filters_records() {
        let records = vec![
            record_at("C1", "10.00", ymd_hms(2024, 1, 15, 10, 0, 0)),
            record_at("C1", "20.00", ymd_hms(2024, 2, 10, 10, 0, 0)),
        ];
        let range = DateRange::parse(Some("2024-02-01"), None).unwrap();
        let keep = build_filter_predicate(&range);
        let kept: Vec<_> = records.iter().filter(|r| keep(r)).collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].invoice_date, ymd_hms(2024, 2, 10, 10, 0, 0));
    }
}
