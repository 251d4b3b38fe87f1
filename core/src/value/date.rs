//! Date and time values in textual form.
//!
//! DA, TM and DT values are parsed against an ordered table of accepted
//! layouts, where the first layout that matches wins.
//! Layouts are written with the tokens `yyyy`, `MM`, `dd`, `HH`, `mm`, `ss`
//! and `f` (one to six fractional second digits);
//! any other character must appear literally.
//! Writing always uses the first layout of the table.

use crate::vr::VR;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt::Write;

/// Accepted layouts of a date (DA) value, canonical first.
pub static DATE_FORMATS: &[&str] = &[
    "yyyyMMdd",
    "yyyy.MM.dd",
    "yyyy/MM/dd",
    "yyyy",
    "yyyyMM",
    "yyyy.MM",
];

/// Accepted layouts of a time (TM) value, canonical first.
pub static TIME_FORMATS: &[&str] = &[
    "HHmmss",
    "HH",
    "HHmm",
    "HHmmssf",
    "HHmmssff",
    "HHmmssfff",
    "HHmmssffff",
    "HHmmssfffff",
    "HHmmssffffff",
    "HHmmss.f",
    "HHmmss.ff",
    "HHmmss.fff",
    "HHmmss.ffff",
    "HHmmss.fffff",
    "HHmmss.ffffff",
    "HH.mm",
    "HH.mm.ss",
    "HH.mm.ss.f",
    "HH.mm.ss.ff",
    "HH.mm.ss.fff",
    "HH.mm.ss.ffff",
    "HH.mm.ss.fffff",
    "HH.mm.ss.ffffff",
    "HH:mm",
    "HH:mm:ss",
    "HH:mm:ss.f",
    "HH:mm:ss.ff",
    "HH:mm:ss.fff",
    "HH:mm:ss.ffff",
    "HH:mm:ss.fffff",
    "HH:mm:ss.ffffff",
];

/// Accepted layouts of a date-time (DT) value, canonical first.
pub static DATE_TIME_FORMATS: &[&str] = &[
    "yyyyMMddHHmmss",
    "yyyyMMddHHmmss.f",
    "yyyyMMddHHmmss.ff",
    "yyyyMMddHHmmss.fff",
    "yyyyMMddHHmmss.ffff",
    "yyyyMMddHHmmss.fffff",
    "yyyyMMddHHmmss.ffffff",
    "yyyyMMddHHmm",
    "yyyyMMddHH",
    "yyyyMMdd",
    "yyyyMM",
    "yyyy",
];

/// The kind of a date-like value, one per date-like VR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateKind {
    /// DA
    Date,
    /// TM
    Time,
    /// DT
    DateTime,
}

impl DateKind {
    /// The kind of values held by the given VR, if it is date-like.
    pub fn from_vr(vr: VR) -> Option<Self> {
        match vr {
            VR::DA => Some(DateKind::Date),
            VR::TM => Some(DateKind::Time),
            VR::DT => Some(DateKind::DateTime),
            _ => None,
        }
    }

    /// The ordered table of accepted layouts.
    pub fn formats(self) -> &'static [&'static str] {
        match self {
            DateKind::Date => DATE_FORMATS,
            DateKind::Time => TIME_FORMATS,
            DateKind::DateTime => DATE_TIME_FORMATS,
        }
    }

    /// The layout used when writing values.
    pub fn canonical_format(self) -> &'static str {
        self.formats()[0]
    }

    /// Parse a value against the accepted layouts, first match wins.
    pub fn parse(self, text: &str) -> Option<NaiveDateTime> {
        let text = text.trim();
        let text = match self {
            DateKind::DateTime => strip_utc_offset(text),
            _ => text,
        };
        parse_with_formats(text, self.formats())
    }

    /// Parse a value, falling back to today (at midnight)
    /// when no layout matches.
    pub fn parse_lenient(self, text: &str) -> NaiveDateTime {
        self.parse(text).unwrap_or_else(today)
    }

    /// Write a value with the canonical layout.
    pub fn format(self, value: &NaiveDateTime) -> String {
        format_with(value, self.canonical_format())
    }
}

/// The current local date at midnight.
pub fn today() -> NaiveDateTime {
    Local::now().date_naive().and_time(NaiveTime::default())
}

/// The earliest representable date, 0001-01-01 at midnight.
/// Values without a date component are placed on this day.
pub fn first_day() -> NaiveDateTime {
    NaiveDate::from_yo_opt(1, 1)
        .unwrap_or_default()
        .and_time(NaiveTime::default())
}

fn strip_utc_offset(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() > 5 {
        let at = bytes.len() - 5;
        if (bytes[at] == b'+' || bytes[at] == b'-')
            && bytes[at + 1..].iter().all(u8::is_ascii_digit)
        {
            return &text[..at];
        }
    }
    text
}

/// Try each layout in order, returning the first successful parse.
pub fn parse_with_formats(text: &str, formats: &[&str]) -> Option<NaiveDateTime> {
    formats.iter().find_map(|f| parse_exact(text, f))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Fraction(usize),
    Literal(u8),
}

fn tokenize(format: &str) -> impl Iterator<Item = Token> + '_ {
    let bytes = format.as_bytes();
    let mut i = 0;
    std::iter::from_fn(move || {
        let rest = bytes.get(i..)?;
        let c = *rest.first()?;
        let run = rest.iter().take_while(|&&b| b == c).count();
        let (token, len) = match (c, run) {
            (b'y', n) if n >= 4 => (Token::Year, 4),
            (b'M', n) if n >= 2 => (Token::Month, 2),
            (b'd', n) if n >= 2 => (Token::Day, 2),
            (b'H', n) if n >= 2 => (Token::Hour, 2),
            (b'm', n) if n >= 2 => (Token::Minute, 2),
            (b's', n) if n >= 2 => (Token::Second, 2),
            (b'f', n) => (Token::Fraction(n.min(9)), n.min(9)),
            (c, _) => (Token::Literal(c), 1),
        };
        i += len;
        Some(token)
    })
}

/// Parse a value which must match the layout exactly.
///
/// Missing date components default to 0001-01-01,
/// missing time components to zero.
pub fn parse_exact(text: &str, format: &str) -> Option<NaiveDateTime> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    let (mut year, mut month, mut day) = (1, 1, 1);
    let (mut hour, mut minute, mut second, mut nanos) = (0, 0, 0, 0);

    let digits = |n: usize, pos: &mut usize| -> Option<u32> {
        let chunk = bytes.get(*pos..*pos + n)?;
        if !chunk.iter().all(u8::is_ascii_digit) {
            return None;
        }
        *pos += n;
        Some(chunk.iter().fold(0, |acc, &b| acc * 10 + u32::from(b - b'0')))
    };

    for token in tokenize(format) {
        match token {
            Token::Year => year = digits(4, &mut pos)? as i32,
            Token::Month => month = digits(2, &mut pos)?,
            Token::Day => day = digits(2, &mut pos)?,
            Token::Hour => hour = digits(2, &mut pos)?,
            Token::Minute => minute = digits(2, &mut pos)?,
            Token::Second => second = digits(2, &mut pos)?,
            Token::Fraction(n) => {
                let f = digits(n, &mut pos)?;
                nanos = f * 10u32.pow(9 - n as u32);
            }
            Token::Literal(c) => {
                if bytes.get(pos) != Some(&c) {
                    return None;
                }
                pos += 1;
            }
        }
    }
    if pos != bytes.len() {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)?;
    Some(date.and_time(time))
}

/// Write a value with the given layout.
pub fn format_with(value: &NaiveDateTime, format: &str) -> String {
    let mut out = String::with_capacity(format.len());
    for token in tokenize(format) {
        // writing to a String never fails
        let _ = match token {
            Token::Year => write!(out, "{:04}", value.year()),
            Token::Month => write!(out, "{:02}", value.month()),
            Token::Day => write!(out, "{:02}", value.day()),
            Token::Hour => write!(out, "{:02}", value.hour()),
            Token::Minute => write!(out, "{:02}", value.minute()),
            Token::Second => write!(out, "{:02}", value.second()),
            Token::Fraction(n) => {
                let nanos = value.nanosecond() % 1_000_000_000;
                let f = nanos / 10u32.pow(9 - n as u32);
                write!(out, "{:0width$}", f, width = n)
            }
            Token::Literal(c) => {
                out.push(char::from(c));
                Ok(())
            }
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, micro: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_micro_opt(h, mi, s, micro)
            .unwrap()
    }

    #[test]
    fn dates_in_every_layout() {
        let kind = DateKind::Date;
        assert_eq!(kind.parse("20230615"), Some(dt(2023, 6, 15, 0, 0, 0, 0)));
        assert_eq!(kind.parse("2023.06.15"), Some(dt(2023, 6, 15, 0, 0, 0, 0)));
        assert_eq!(kind.parse("2023/06/15"), Some(dt(2023, 6, 15, 0, 0, 0, 0)));
        assert_eq!(kind.parse("2023"), Some(dt(2023, 1, 1, 0, 0, 0, 0)));
        assert_eq!(kind.parse("202306"), Some(dt(2023, 6, 1, 0, 0, 0, 0)));
        assert_eq!(kind.parse("2023.06"), Some(dt(2023, 6, 1, 0, 0, 0, 0)));
        assert_eq!(kind.parse("20231345"), None);
        assert_eq!(kind.parse("15/06/2023"), None);
    }

    #[test]
    fn times_without_date_land_on_first_day() {
        let kind = DateKind::Time;
        assert_eq!(kind.parse("101530"), Some(dt(1, 1, 1, 10, 15, 30, 0)));
        assert_eq!(kind.parse("10"), Some(dt(1, 1, 1, 10, 0, 0, 0)));
        assert_eq!(kind.parse("1015"), Some(dt(1, 1, 1, 10, 15, 0, 0)));
        assert_eq!(kind.parse("101530.5"), Some(dt(1, 1, 1, 10, 15, 30, 500_000)));
        assert_eq!(
            kind.parse("101530123456"),
            Some(dt(1, 1, 1, 10, 15, 30, 123_456))
        );
        assert_eq!(kind.parse("10:15:30.25"), Some(dt(1, 1, 1, 10, 15, 30, 250_000)));
        assert_eq!(kind.parse("10.15.30"), Some(dt(1, 1, 1, 10, 15, 30, 0)));
        assert_eq!(kind.parse("25"), None);
        assert_eq!(first_day(), dt(1, 1, 1, 0, 0, 0, 0));
    }

    #[test]
    fn date_times_with_offset() {
        let kind = DateKind::DateTime;
        assert_eq!(
            kind.parse("20230615101530.000250"),
            Some(dt(2023, 6, 15, 10, 15, 30, 250))
        );
        assert_eq!(
            kind.parse("20230615101530+0100"),
            Some(dt(2023, 6, 15, 10, 15, 30, 0))
        );
        assert_eq!(kind.parse("2023"), Some(dt(2023, 1, 1, 0, 0, 0, 0)));
    }

    #[test]
    fn lenient_parse_falls_back_to_today() {
        assert_eq!(DateKind::Date.parse_lenient("garbage"), today());
        assert_eq!(
            DateKind::Date.parse_lenient("19941012"),
            dt(1994, 10, 12, 0, 0, 0, 0)
        );
    }

    #[test]
    fn writes_canonical_layout() {
        let value = dt(2023, 6, 15, 9, 5, 7, 120_000);
        assert_eq!(DateKind::Date.format(&value), "20230615");
        assert_eq!(DateKind::Time.format(&value), "090507");
        assert_eq!(DateKind::DateTime.format(&value), "20230615090507");
        assert_eq!(format_with(&value, "HH:mm:ss.fff"), "09:05:07.120");
    }
}
