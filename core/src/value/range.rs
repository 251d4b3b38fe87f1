//! Date, time and date-time ranges, as used in range matching.
//!
//! A range is written as `begin-end`, where either side may be omitted
//! to leave that side of the range open.

use super::date::DateKind;
use chrono::NaiveDateTime;

/// Represents a range of dates or times as two optional bounds.
/// `None` means no lower or no upper bound is present.
///
/// # Example
/// ```
/// use dcm_core::value::{DateKind, DateRange};
///
/// let range = DateRange::parse(DateKind::Date, "20230101-");
/// assert!(range.start().is_some());
/// assert!(range.end().is_none());
/// assert_eq!(range.to_string(DateKind::Date), "20230101-");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DateRange {
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
}

impl DateRange {
    /// Constructs a new range from both bounds.
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        DateRange { start, end }
    }

    /// A range covering a single instant, both bounds equal.
    pub fn single(value: NaiveDateTime) -> Self {
        DateRange {
            start: Some(value),
            end: Some(value),
        }
    }

    /// A range with only a lower bound.
    pub fn from_start(start: NaiveDateTime) -> Self {
        DateRange {
            start: Some(start),
            end: None,
        }
    }

    /// A range with only an upper bound.
    pub fn from_end(end: NaiveDateTime) -> Self {
        DateRange {
            start: None,
            end: Some(end),
        }
    }

    /// Returns a reference to the lower bound of the range.
    pub fn start(&self) -> Option<&NaiveDateTime> {
        self.start.as_ref()
    }

    /// Returns a reference to the upper bound of the range.
    pub fn end(&self) -> Option<&NaiveDateTime> {
        self.end.as_ref()
    }

    /// Whether neither bound is present.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Parse a range value.
    ///
    /// The value is split on its first `-`,
    /// skipping the sign of a UTC offset in date-time values.
    /// A side which is empty or fails to parse is left open,
    /// while a value with no separator is a single instant
    /// (parsed leniently, so garbage yields today).
    /// An empty value is fully open.
    pub fn parse(kind: DateKind, text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return DateRange::default();
        }
        match range_separator(kind, text) {
            None => DateRange::single(kind.parse_lenient(text)),
            Some(at) => DateRange {
                start: kind.parse(&text[..at]),
                end: kind.parse(&text[at + 1..]),
            },
        }
    }

    /// Write the range with the canonical layout of the given kind.
    ///
    /// A fully open range is written as the empty string.
    pub fn to_string(&self, kind: DateKind) -> String {
        match (&self.start, &self.end) {
            (None, None) => String::new(),
            (None, Some(end)) => format!("-{}", kind.format(end)),
            (Some(start), None) => format!("{}-", kind.format(start)),
            (Some(start), Some(end)) => {
                format!("{}-{}", kind.format(start), kind.format(end))
            }
        }
    }
}

fn range_separator(kind: DateKind, text: &str) -> Option<usize> {
    text.match_indices('-')
        .map(|(at, _)| at)
        .find(|&at| kind != DateKind::DateTime || !is_utc_offset(text, at))
}

/// Whether the `-` at `at` opens a `-HHMM` offset
/// trailing a date-time with at least an hour component.
fn is_utc_offset(text: &str, at: usize) -> bool {
    let value = text[..at].rsplit('-').next().unwrap_or_default();
    let offset = &text[at + 1..];
    value.len() >= 10
        && offset.len() >= 4
        && offset.as_bytes()[..4].iter().all(u8::is_ascii_digit)
        && (offset.len() == 4 || offset.as_bytes()[4] == b'-')
}

impl From<NaiveDateTime> for DateRange {
    fn from(value: NaiveDateTime) -> Self {
        DateRange::single(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn parse_bounded_and_open_ranges() {
        let r = DateRange::parse(DateKind::Date, "20230101-20231231");
        assert_eq!(r, DateRange::new(Some(day(2023, 1, 1)), Some(day(2023, 12, 31))));

        let r = DateRange::parse(DateKind::Date, "-20231231");
        assert_eq!(r, DateRange::from_end(day(2023, 12, 31)));

        let r = DateRange::parse(DateKind::Date, "20230101-");
        assert_eq!(r, DateRange::from_start(day(2023, 1, 1)));

        let r = DateRange::parse(DateKind::Date, "");
        assert!(r.is_unbounded());
    }

    #[test]
    fn unparsable_side_is_left_open() {
        let r = DateRange::parse(DateKind::Date, "garbage-20231231");
        assert_eq!(r, DateRange::from_end(day(2023, 12, 31)));
    }

    #[test]
    fn single_value_is_both_bounds() {
        let r = DateRange::parse(DateKind::Date, "20230615");
        assert_eq!(r.start(), Some(&day(2023, 6, 15)));
        assert_eq!(r.end(), Some(&day(2023, 6, 15)));
        assert_eq!(r.to_string(DateKind::Date), "20230615-20230615");
    }

    #[test]
    fn negative_utc_offset_is_not_a_separator() {
        let noon = |d: u32| {
            NaiveDate::from_ymd_opt(2023, 6, d)
                .unwrap()
                .and_hms_opt(12, 30, 45)
                .unwrap()
        };

        let r = DateRange::parse(DateKind::DateTime, "20230615123045-0500");
        assert_eq!(r, DateRange::single(noon(15)));

        let r = DateRange::parse(DateKind::DateTime, "20230615123045-0500-20230616123045+0100");
        assert_eq!(r, DateRange::new(Some(noon(15)), Some(noon(16))));

        let r = DateRange::parse(DateKind::DateTime, "20230615123045-0500-");
        assert_eq!(r, DateRange::from_start(noon(15)));

        // a short value before the dash is a year range, not an offset
        let r = DateRange::parse(DateKind::DateTime, "2022-2023");
        assert_eq!(r, DateRange::new(Some(day(2022, 1, 1)), Some(day(2023, 1, 1))));
    }

    #[test]
    fn write_ranges() {
        assert_eq!(DateRange::default().to_string(DateKind::Date), "");
        assert_eq!(
            DateRange::from_end(day(2020, 2, 29)).to_string(DateKind::Date),
            "-20200229"
        );
        assert_eq!(
            DateRange::from_start(day(2020, 2, 29)).to_string(DateKind::Time),
            "000000-"
        );
    }
}
