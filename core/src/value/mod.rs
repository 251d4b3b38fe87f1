//! Textual values with structured interpretations:
//! dates, times and their ranges.

pub mod date;
pub mod range;

pub use self::date::{first_day, today, DateKind};
pub use self::range::DateRange;
