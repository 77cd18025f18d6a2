//! Best-effort recognition of the publication dates sites and feeds print.

use crate::error::ParseError;
use crate::utils::normalize_whitespace;
use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// `2024-06-10`, `2024/6/10`, `2024.06.10`, `2024年6月10日`, anywhere in the text.
static NUMERIC_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})\s*[-/.年]\s*(\d{1,2})\s*[-/.月]\s*(\d{1,2})").unwrap()
});

/// Leading `Ddd, ` of an RFC 2822 timestamp.
static WEEKDAY_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]{3},\s*").unwrap());

const TEXTUAL_FORMATS: &[&str] = &["%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y"];

/// Parse a date printed on a web page or in a feed.
///
/// Full timestamps keep the calendar date of their own offset.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ParseError> {
    let text = normalize_whitespace(raw);

    if let Ok(dt) = DateTime::parse_from_rfc3339(&text) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(&text) {
        return Ok(dt.date_naive());
    }
    // Feeds often carry a weekday that disagrees with the date; the date wins.
    if let Some(prefix) = WEEKDAY_PREFIX.find(&text) {
        if let Ok(dt) = DateTime::parse_from_rfc2822(&text[prefix.end()..]) {
            return Ok(dt.date_naive());
        }
    }
    if let Some(caps) = NUMERIC_DATE.captures(&text) {
        let ymd = (caps[1].parse(), caps[2].parse(), caps[3].parse());
        if let (Ok(y), Ok(m), Ok(d)) = ymd {
            if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
                return Ok(date);
            }
        }
    }
    for format in TEXTUAL_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&text, format) {
            return Ok(date);
        }
    }

    Err(ParseError::UnparsableDate(text))
}
