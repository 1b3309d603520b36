//! Display formatting for event and article dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Shown when no date is known.
pub const DATE_TBD: &str = "Date TBD";

/// Shown when a date cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

const LONG_FORMAT: &str = "%B %-d, %Y, %-I:%M %p %Z";

/// Formats dates for display in a fixed time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFormatter {
    tz: Tz,
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::new(chrono_tz::America::New_York)
    }
}

impl DateFormatter {
    /// Creates a formatter for the given zone.
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Long form, e.g. `April 12, 2025, 10:00 PM EDT`, or [`DATE_TBD`].
    #[must_use]
    pub fn format(&self, date: Option<DateTime<Utc>>) -> String {
        date.map_or_else(
            || DATE_TBD.to_string(),
            |date| date.with_timezone(&self.tz).format(LONG_FORMAT).to_string(),
        )
    }

    /// Formats a raw date string.
    ///
    /// Missing or empty input gives [`DATE_TBD`]; input that is not a date
    /// gives [`INVALID_DATE`].
    #[must_use]
    pub fn format_str(&self, raw: Option<&str>) -> String {
        match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
            None => DATE_TBD.to_string(),
            Some(raw) => parse_date(raw, self.tz)
                .map_or_else(|| INVALID_DATE.to_string(), |date| self.format(Some(date))),
        }
    }

    /// Date only, e.g. `April 12, 2025`.
    #[must_use]
    pub fn format_day(&self, date: Option<DateTime<Utc>>) -> String {
        date.map_or_else(
            || DATE_TBD.to_string(),
            |date| date.with_timezone(&self.tz).format("%B %-d, %Y").to_string(),
        )
    }
}

/// Formats a date in the default zone. See [`DateFormatter::format`].
#[must_use]
pub fn format_event_date(date: Option<DateTime<Utc>>) -> String {
    DateFormatter::default().format(date)
}

/// Formats a raw date string in the default zone. See
/// [`DateFormatter::format_str`].
#[must_use]
pub fn format_event_date_str(raw: Option<&str>) -> String {
    DateFormatter::default().format_str(raw)
}

/// Parses the date shapes found in content: RFC 3339, SQL timestamps,
/// plain dates and long-form dates such as `April 15, 2025`.
///
/// Values without an offset are read in `tz`.
#[must_use]
pub fn parse_date(raw: &str, tz: Tz) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%#z") {
        return Some(date.with_timezone(&Utc));
    }

    let naive = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%B %d, %Y %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            ["%Y-%m-%d", "%B %d, %Y"]
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|date| date.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn missing_date_is_tbd() {
        assert_eq!(format_event_date(None), "Date TBD");
        assert_eq!(format_event_date_str(None), "Date TBD");
        assert_eq!(format_event_date_str(Some("")), "Date TBD");
    }

    #[test_case("not-a-date")]
    #[test_case("2025-13-45")]
    #[test_case("April 31st")]
    fn garbage_is_invalid(raw: &str) {
        assert_eq!(format_event_date_str(Some(raw)), "Invalid Date");
    }

    #[test]
    fn long_form_in_eastern_time() {
        let date = Utc.with_ymd_and_hms(2025, 4, 13, 2, 0, 0).unwrap();
        assert_eq!(format_event_date(Some(date)), "April 12, 2025, 10:00 PM EDT");
    }

    #[test]
    fn winter_dates_use_standard_time() {
        let date = Utc.with_ymd_and_hms(2025, 1, 18, 15, 5, 0).unwrap();
        assert_eq!(format_event_date(Some(date)), "January 18, 2025, 10:05 AM EST");
    }

    #[test_case("2025-04-13T02:00:00Z"; "rfc3339")]
    #[test_case("2025-04-13 02:00:00+00"; "sql timestamptz")]
    #[test_case("2025-04-12 22:00:00"; "naive local")]
    fn raw_strings_are_parsed(raw: &str) {
        assert_eq!(
            format_event_date_str(Some(raw)),
            "April 12, 2025, 10:00 PM EDT"
        );
    }

    #[test]
    fn long_form_dates_parse_as_local_midnight() {
        let parsed = parse_date("April 15, 2025", chrono_tz::America::New_York).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 4, 15, 4, 0, 0).unwrap());
    }

    #[test]
    fn other_zones() {
        let formatter = DateFormatter::new(chrono_tz::Europe::London);
        let date = Utc.with_ymd_and_hms(2025, 7, 1, 19, 30, 0).unwrap();
        assert_eq!(formatter.format(Some(date)), "July 1, 2025, 8:30 PM BST");
        assert_eq!(formatter.format_day(Some(date)), "July 1, 2025");
    }
}
