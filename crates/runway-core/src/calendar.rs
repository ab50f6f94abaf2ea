//! Calendar primitives
//!
//! `YearMonth` is the engine's time granularity. Every projection works on
//! whole months, so there is no day component anywhere in the engine.
//!
//! The current month is never read implicitly: callers pass it in directly or
//! through a [`Clock`], which keeps every computation deterministic in tests.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Earliest year the engine accepts
pub const MIN_YEAR: i32 = 2000;

/// Latest year the engine accepts
pub const MAX_YEAR: i32 = 9999;

/// A (year, month) calendar unit, ordered lexicographically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "YearMonthParts")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

/// Unvalidated wire shape; deserialization goes through `YearMonth::new`
#[derive(Deserialize)]
struct YearMonthParts {
    year: i32,
    month: u32,
}

impl TryFrom<YearMonthParts> for YearMonth {
    type Error = Error;

    fn try_from(parts: YearMonthParts) -> Result<Self> {
        YearMonth::new(parts.year, parts.month)
    }
}

impl YearMonth {
    pub const MIN: YearMonth = YearMonth {
        year: MIN_YEAR,
        month: 1,
    };

    pub const MAX: YearMonth = YearMonth {
        year: MAX_YEAR,
        month: 12,
    };

    /// Create a validated year/month (year 2000-9999, month 1-12)
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) || !(1..=12).contains(&month) {
            return Err(Error::InvalidYearMonth { year, month });
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Months since year 0, the unit all arithmetic works in
    fn index(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    fn from_index(index: i64) -> Option<Self> {
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return None;
        }
        Some(Self {
            year,
            month: index.rem_euclid(12) as u32 + 1,
        })
    }

    fn saturating_from_index(index: i64) -> Self {
        let index = index.clamp(Self::MIN.index(), Self::MAX.index());
        Self::from_index(index).unwrap_or(Self::MIN)
    }

    /// Add a signed number of months, or `None` when the result leaves 2000-01..=9999-12
    pub fn checked_add_months(self, n: i32) -> Option<Self> {
        Self::from_index(self.index() + i64::from(n))
    }

    /// Add a signed number of months, clamped to 2000-01..=9999-12
    pub fn add_months(self, n: i32) -> Self {
        Self::saturating_from_index(self.index() + i64::from(n))
    }

    pub fn next(self) -> Self {
        self.add_months(1)
    }

    pub fn previous(self) -> Self {
        self.add_months(-1)
    }

    /// Encode in the two-field persisted form, e.g. "2023 10"
    pub fn to_db_string(&self) -> String {
        format!("{} {}", self.year, self.month)
    }

    /// Decode the persisted form. An empty string is "no value", not an error.
    pub fn from_db_str(s: &str) -> Result<Option<Self>> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(None);
        }

        let mut parts = s.split_whitespace();
        let (Some(year), Some(month), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(Error::Validation(format!("Malformed year/month: {:?}", s)));
        };

        let year: i32 = year
            .parse()
            .map_err(|_| Error::Validation(format!("Malformed year in {:?}", s)))?;
        let month: u32 = month
            .parse()
            .map_err(|_| Error::Validation(format!("Malformed month in {:?}", s)))?;

        Self::new(year, month).map(Some)
    }

    /// Month containing the given timestamp, clamped to the supported range
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self::saturating_from_index(i64::from(dt.year()) * 12 + i64::from(dt.month0()))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    /// Parse the display form "YYYY-MM"
    fn from_str(s: &str) -> Result<Self> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| Error::Validation(format!("Expected YYYY-MM, got {:?}", s)))?;
        let year: i32 = year
            .parse()
            .map_err(|_| Error::Validation(format!("Expected YYYY-MM, got {:?}", s)))?;
        let month: u32 = month
            .parse()
            .map_err(|_| Error::Validation(format!("Expected YYYY-MM, got {:?}", s)))?;
        Self::new(year, month)
    }
}

/// True iff `current` lies inside the inclusive window. `None` bounds are open.
pub fn is_relevant(current: YearMonth, from: Option<YearMonth>, to: Option<YearMonth>) -> bool {
    from.map_or(true, |from| from <= current) && to.map_or(true, |to| current <= to)
}

/// Clock abstracts access to "now" so the engine stays deterministic in tests.
pub trait Clock: Send + Sync {
    /// Current UTC timestamp
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar month. Defaults to the month of `now()`.
    fn current_month(&self) -> YearMonth {
        YearMonth::from_datetime(self.now())
    }
}

/// Wall-clock time source
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a month, used for tests and the CLI `--month` override
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    month: YearMonth,
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(month: YearMonth) -> Self {
        let now = chrono::NaiveDate::from_ymd_opt(month.year(), month.month(), 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now);
        Self { month, now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn current_month(&self) -> YearMonth {
        self.month
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_new_validates_range() {
        assert!(YearMonth::new(2023, 10).is_ok());
        assert!(matches!(
            YearMonth::new(1999, 10),
            Err(Error::InvalidYearMonth { year: 1999, .. })
        ));
        assert!(YearMonth::new(2023, 13).is_err());
        assert!(YearMonth::new(2023, 0).is_err());
    }

    #[test]
    fn test_add_months() {
        assert_eq!(ym(2023, 1).add_months(5), ym(2023, 6));
        assert_eq!(ym(2023, 10).add_months(3), ym(2024, 1));
        assert_eq!(ym(2023, 1).add_months(25), ym(2025, 2));
        assert_eq!(ym(2023, 1).add_months(-1), ym(2022, 12));
        assert_eq!(ym(2023, 3).add_months(-15), ym(2021, 12));
        assert_eq!(ym(2023, 12).add_months(0), ym(2023, 12));
    }

    #[test]
    fn test_add_months_round_trip_every_month() {
        for year in [2000, 2023, 2099] {
            for month in 1..=12 {
                let start = ym(year, month);
                assert_eq!(start.add_months(12).add_months(-12), start);
                assert_eq!(start.next().previous(), start);
            }
        }
    }

    #[test]
    fn test_ordering() {
        assert!(ym(2023, 10) < ym(2023, 11));
        assert!(ym(2023, 11) > ym(2023, 10));
        assert!(ym(2023, 12) < ym(2024, 1));
        assert_eq!(ym(2023, 10).cmp(&ym(2023, 10)), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_is_relevant() {
        let from = Some(ym(2023, 1));
        let to = Some(ym(2023, 12));

        assert!(is_relevant(ym(2023, 6), from, to));
        assert!(is_relevant(ym(2023, 6), None, to));
        assert!(is_relevant(ym(2023, 6), from, None));
        assert!(is_relevant(ym(2023, 6), None, None));
        assert!(is_relevant(ym(2023, 1), from, to));
        assert!(is_relevant(ym(2023, 12), from, to));
        assert!(!is_relevant(ym(2022, 12), from, to));
        assert!(!is_relevant(ym(2024, 1), from, to));
    }

    #[test]
    fn test_db_encoding() {
        assert_eq!(ym(2023, 10).to_db_string(), "2023 10");
        assert_eq!(YearMonth::from_db_str("2023 10").unwrap(), Some(ym(2023, 10)));
        assert_eq!(YearMonth::from_db_str("").unwrap(), None);
        assert!(YearMonth::from_db_str("2023").is_err());
        assert!(YearMonth::from_db_str("2023 13").is_err());
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(ym(2023, 4).to_string(), "2023-04");
        assert_eq!("2024-02".parse::<YearMonth>().unwrap(), ym(2024, 2));
        assert!("2024/02".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_checked_add_months_rejects_out_of_range() {
        assert_eq!(ym(2024, 1).checked_add_months(2_147_483_647), None);
        assert_eq!(ym(2024, 1).checked_add_months(-2_147_483_648), None);
        assert_eq!(ym(2000, 1).checked_add_months(-1), None);
        assert_eq!(ym(9999, 12).checked_add_months(1), None);
        assert_eq!(ym(2023, 12).checked_add_months(1), Some(ym(2024, 1)));
        assert_eq!(ym(2001, 1).checked_add_months(-12), Some(ym(2000, 1)));
    }

    #[test]
    fn test_add_months_stays_in_range() {
        assert_eq!(ym(2000, 1).previous(), ym(2000, 1));
        assert_eq!(ym(9999, 12).next(), ym(9999, 12));
        assert_eq!(ym(2024, 1).add_months(i32::MAX), YearMonth::MAX);
        assert_eq!(ym(2024, 1).add_months(i32::MIN), YearMonth::MIN);
        assert!(YearMonth::new(10_000, 1).is_err());
    }

    #[test]
    fn test_from_datetime_clamps_to_supported_range() {
        let old = chrono::NaiveDate::from_ymd_opt(1995, 7, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc();
        assert_eq!(YearMonth::from_datetime(old), YearMonth::MIN);
    }

    #[test]
    fn test_json_shape_is_validated() {
        let json = serde_json::to_string(&ym(2023, 6)).unwrap();
        assert_eq!(json, r#"{"year":2023,"month":6}"#);
        assert_eq!(serde_json::from_str::<YearMonth>(&json).unwrap(), ym(2023, 6));
        assert!(serde_json::from_str::<YearMonth>(r#"{"year":2023,"month":14}"#).is_err());
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::new(ym(2024, 5));
        assert_eq!(clock.current_month(), ym(2024, 5));
        assert_eq!(YearMonth::from_datetime(clock.now()), ym(2024, 5));
    }
}
