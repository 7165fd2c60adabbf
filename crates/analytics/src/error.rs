use thiserror::Error;

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Failures of the reporting engine itself (bad request parameters).
///
/// Empty inputs are never errors: they produce zero or empty results.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("invalid period {year}-{month}: month must be 1..=12 and the year representable")]
    InvalidPeriod { year: i32, month: u32 },

    #[error("invalid date '{0}': expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS")]
    InvalidDate(String),
}
