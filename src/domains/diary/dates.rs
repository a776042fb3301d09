//! Date argument parsing.
//!
//! Tool arguments carry naive calendar dates as strict `YYYY-MM-DD`
//! strings. An absent or empty argument means "today" in local time.

use chrono::{Local, NaiveDate};

use super::error::{DiaryError, DiaryResult};

/// Format accepted for date arguments.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Long form used in report headers, e.g. "March 15, 2024".
pub const DISPLAY_FORMAT: &str = "%B %d, %Y";

/// Today's calendar date in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse an optional date argument, defaulting to [`today`].
pub fn parse_date(input: Option<&str>) -> DiaryResult<NaiveDate> {
    parse_date_or(input, today())
}

/// Parse an optional date argument, defaulting to `fallback`.
pub fn parse_date_or(input: Option<&str>, fallback: NaiveDate) -> DiaryResult<NaiveDate> {
    match input {
        None | Some("") => Ok(fallback),
        Some(raw) => {
            if !has_date_shape(raw) {
                return Err(DiaryError::invalid_date(raw));
            }
            NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| DiaryError::invalid_date(raw))
        }
    }
}

/// Exactly four digits, dash, two digits, dash, two digits.
fn has_date_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Render a date the way report headers show it.
pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}
