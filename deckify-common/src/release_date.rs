//! Release date parsing
//!
//! Metadata providers report release dates at whatever precision they know:
//! `1994-05-12`, `1994-05` or just `1994`. [`ReleaseDate::parse`] tries those
//! formats in descending precision and yields a value that orders by calendar
//! date. Partial dates compare as the first day of the unspecified period, so
//! `1994` and `1994-01-01` are equal for ordering purposes.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;

static FULL_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("valid regex"));
static YEAR_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{1,2})$").expect("valid regex"));
static YEAR_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})$").expect("valid regex"));

/// Precision the date was reported at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePrecision {
    Day,
    Month,
    Year,
}

/// A parsed release date with its original precision
#[derive(Debug, Clone, Copy)]
pub struct ReleaseDate {
    date: NaiveDate,
    precision: DatePrecision,
}

impl ReleaseDate {
    /// Parse `YYYY-MM-DD`, then `YYYY-MM`, then `YYYY`.
    ///
    /// Returns `None` when the text matches none of the formats, or matches
    /// the shape of one but names an impossible date (`1994-02-30`, year 0).
    pub fn parse(text: &str) -> Option<Self> {
        if let Some(caps) = FULL_DATE.captures(text) {
            return Self::from_parts(&caps[1], &caps[2], &caps[3], DatePrecision::Day);
        }
        if let Some(caps) = YEAR_MONTH.captures(text) {
            return Self::from_parts(&caps[1], &caps[2], "1", DatePrecision::Month);
        }
        if let Some(caps) = YEAR_ONLY.captures(text) {
            return Self::from_parts(&caps[1], "1", "1", DatePrecision::Year);
        }
        None
    }

    fn from_parts(year: &str, month: &str, day: &str, precision: DatePrecision) -> Option<Self> {
        let year: i32 = year.parse().ok()?;
        let month: u32 = month.parse().ok()?;
        let day: u32 = day.parse().ok()?;
        if year < 1 {
            return None;
        }
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Some(Self { date, precision })
    }

    /// Calendar year of the release
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Precision the date was parsed at
    pub fn precision(&self) -> DatePrecision {
        self.precision
    }

    /// Date used for ordering (first day of the period for partial dates)
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl PartialEq for ReleaseDate {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
    }
}

impl Eq for ReleaseDate {}

impl PartialOrd for ReleaseDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ReleaseDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date.cmp(&other.date)
    }
}

impl fmt::Display for ReleaseDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.precision {
            DatePrecision::Day => write!(f, "{}", self.date.format("%Y-%m-%d")),
            DatePrecision::Month => write!(f, "{}", self.date.format("%Y-%m")),
            DatePrecision::Year => write!(f, "{:04}", self.date.year()),
        }
    }
}
