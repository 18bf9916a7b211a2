//! Date helper functions
//!
//! Post dates are written as `DD-MM-YYYY` in front-matter. They are parsed
//! into [`PublishedDate`] for ordering and rendered with a fixed month table
//! for display.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Month names used on the site. "June" and "Sept" are intentionally not
/// three-letter abbreviations.
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "June", "Jul", "Aug", "Sept", "Oct", "Nov", "Dec",
];

/// Errors produced when a `DD-MM-YYYY` string cannot be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("expected a date in DD-MM-YYYY form, got {0:?}")]
    Format(String),
    #[error("{0:?} is not a calendar date")]
    OutOfRange(String),
}

/// A post publication date
///
/// Ordering is chronological (year, then month, then day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublishedDate(NaiveDate);

impl PublishedDate {
    /// Parse a `DD-MM-YYYY` string
    pub fn parse(s: &str) -> Result<Self, DateError> {
        let parts: Vec<&str> = s.trim().split('-').collect();
        let [day, month, year] = parts.as_slice() else {
            return Err(DateError::Format(s.to_string()));
        };

        let day = parse_digits::<u32>(day).ok_or_else(|| DateError::Format(s.to_string()))?;
        let month = parse_digits::<u32>(month).ok_or_else(|| DateError::Format(s.to_string()))?;
        let year = parse_digits::<i32>(year).ok_or_else(|| DateError::Format(s.to_string()))?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| DateError::OutOfRange(s.to_string()))
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month name from [`MONTH_NAMES`]
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.0.month0() as usize]
    }

    /// Human readable form, e.g. `5 Mar 2021`
    pub fn display(&self) -> String {
        format!("{} {} {}", self.day(), self.month_name(), self.year())
    }

    /// Front-matter form, e.g. `05-03-2021`
    pub fn to_front_matter(&self) -> String {
        self.0.format("%d-%m-%Y").to_string()
    }

    /// ISO 8601 form for meta tags, e.g. `2021-03-05`
    pub fn to_iso(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl From<NaiveDate> for PublishedDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for PublishedDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PublishedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

fn parse_digits<T: FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Format a `DD-MM-YYYY` date for display
///
/// Strings that are not valid dates are returned unchanged.
///
/// # Examples
/// ```
/// assert_eq!(folio::helpers::format_display_date("05-03-2021"), "5 Mar 2021");
/// ```
pub fn format_display_date(date: &str) -> String {
    match PublishedDate::parse(date) {
        Ok(parsed) => parsed.display(),
        Err(e) => {
            tracing::warn!("Cannot format date: {}", e);
            date.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_display_date() {
        assert_eq!(format_display_date("05-03-2021"), "5 Mar 2021");
        assert_eq!(format_display_date("15-06-2021"), "15 June 2021");
        assert_eq!(format_display_date("01-09-2019"), "1 Sept 2019");
        assert_eq!(format_display_date("31-12-2020"), "31 Dec 2020");
    }

    #[test]
    fn test_malformed_dates_pass_through() {
        assert_eq!(format_display_date("2021-03-05x"), "2021-03-05x");
        assert_eq!(format_display_date("05-13-2021"), "05-13-2021");
        assert_eq!(format_display_date(""), "");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            PublishedDate::parse("5 March 2021"),
            Err(DateError::Format(_))
        ));
        assert!(matches!(
            PublishedDate::parse("a-b-c"),
            Err(DateError::Format(_))
        ));
        assert!(matches!(
            PublishedDate::parse("31-02-2021"),
            Err(DateError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_ordering_is_chronological() {
        let a: PublishedDate = "15-06-2021".parse().unwrap();
        let b: PublishedDate = "04-07-2020".parse().unwrap();
        let c: PublishedDate = "01-01-2020".parse().unwrap();
        assert!(a > b);
        assert!(b > c);
        // day-first strings would order these the other way round
        let d: PublishedDate = "31-01-2020".parse().unwrap();
        let e: PublishedDate = "01-02-2020".parse().unwrap();
        assert!(e > d);
    }

    #[test]
    fn test_front_matter_form() {
        let date = PublishedDate::from(NaiveDate::from_ymd_opt(2021, 3, 5).unwrap());
        assert_eq!(date.to_front_matter(), "05-03-2021");
        assert_eq!(date.to_iso(), "2021-03-05");
        assert_eq!(date.to_string(), "5 Mar 2021");
    }
}
