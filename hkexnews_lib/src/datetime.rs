//! Release-time parsing shared by the listing and search parsers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::markup::strip_whitespace;

/// Parse a rendered release time such as `21/05/2018-16:31`.
///
/// Whitespace anywhere in the text is dropped first; the cell markup wraps
/// the date and time in newlines and indentation. The portal renders Hong
/// Kong local time but the value is taken as UTC.
pub fn parse_published_at(text: &str, format: &str) -> Option<DateTime<Utc>> {
    let compact = strip_whitespace(text);
    NaiveDateTime::parse_from_str(&compact, format)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Start of `date` in UTC, the lower bound a watermark is compared against.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}
