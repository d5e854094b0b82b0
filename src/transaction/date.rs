//! Parsing the calendar dates that clients send in bodies and query strings.

use time::{
    Date, OffsetDateTime, PrimitiveDateTime, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

const DATE_TIME_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Parse a calendar date from `text`.
///
/// Accepts "2024-01-10", an RFC 3339 date-time such as
/// "2024-01-10T12:30:00-03:00", or a date-time without an offset such as
/// "2024-01-10T12:30:00". Date-times are reduced to the date they name in
/// their own offset.
///
/// Returns `None` if `text` is not a valid date in any of these forms.
pub fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();

    Date::parse(text, DATE_FORMAT)
        .ok()
        .or_else(|| OffsetDateTime::parse(text, &Rfc3339).ok().map(|dt| dt.date()))
        .or_else(|| {
            PrimitiveDateTime::parse(text, DATE_TIME_FORMAT)
                .ok()
                .map(|dt| dt.date())
        })
}
