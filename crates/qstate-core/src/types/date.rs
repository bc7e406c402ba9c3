//! Date parsing and mask formatting
//!
//! Masks use the `dateformat` vocabulary: `mm` is the month, `MM` the
//! minute. Quoted runs (`'at'`, `"T"`) are copied literally.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Parse a raw date value; offsets are normalised to UTC.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

// Longest tokens first so `yyyy` wins over `yy`.
const TOKENS: &[&str] = &[
    "yyyy", "mmmm", "dddd", "mmm", "ddd", "yy", "mm", "dd", "HH", "hh", "MM", "ss", "TT", "tt",
    "m", "d", "H", "h", "M", "s",
];

/// Render `date` with a `dateformat`-style mask.
pub fn format_date(date: &NaiveDateTime, mask: &str) -> String {
    let mut out = String::with_capacity(mask.len() + 8);
    let mut rest = mask;

    while let Some(c) = rest.chars().next() {
        if c == '\'' || c == '"' {
            let body = &rest[1..];
            match body.find(c) {
                Some(end) => {
                    out.push_str(&body[..end]);
                    rest = &body[end + 1..];
                }
                None => {
                    out.push_str(body);
                    rest = "";
                }
            }
            continue;
        }

        match TOKENS.iter().find(|t| rest.starts_with(**t)) {
            Some(token) => {
                out.push_str(&render_token(date, token));
                rest = &rest[token.len()..];
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    out
}

fn render_token(date: &NaiveDateTime, token: &str) -> String {
    let hour12 = match date.hour() % 12 {
        0 => 12,
        h => h,
    };
    let pm = date.hour() >= 12;

    match token {
        "yyyy" => format!("{:04}", date.year()),
        "yy" => format!("{:02}", date.year().rem_euclid(100)),
        "mmmm" => MONTH_NAMES[date.month0() as usize].to_string(),
        "mmm" => MONTH_NAMES[date.month0() as usize][..3].to_string(),
        "mm" => format!("{:02}", date.month()),
        "m" => date.month().to_string(),
        "dddd" => DAY_NAMES[date.weekday().num_days_from_sunday() as usize].to_string(),
        "ddd" => DAY_NAMES[date.weekday().num_days_from_sunday() as usize][..3].to_string(),
        "dd" => format!("{:02}", date.day()),
        "d" => date.day().to_string(),
        "HH" => format!("{:02}", date.hour()),
        "H" => date.hour().to_string(),
        "hh" => format!("{:02}", hour12),
        "h" => hour12.to_string(),
        "MM" => format!("{:02}", date.minute()),
        "M" => date.minute().to_string(),
        "ss" => format!("{:02}", date.second()),
        "s" => date.second().to_string(),
        "TT" => (if pm { "PM" } else { "AM" }).to_string(),
        "tt" => (if pm { "pm" } else { "am" }).to_string(),
        other => other.to_string(),
    }
}
