//! Field parsers for raw cell values: emails, durations, dates, marks.
//!
//! Pure functions. Loaders call these before rows reach the engine; the
//! engine itself only calls [`email_key`].

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::model::{Mark, SkipReason};

// ---------------------------------------------------------------------------
// Email
// ---------------------------------------------------------------------------

/// Lower-case and trim. Never fails; may return an empty string.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Join key for an email cell. Empty values and values that cannot be an
/// address (no `@`, embedded whitespace) are rejected.
pub fn email_key(raw: &str) -> Result<String, SkipReason> {
    let key = normalize_email(raw);
    if key.is_empty() {
        return Err(SkipReason::MissingEmail);
    }
    if !key.contains('@') || key.chars().any(char::is_whitespace) {
        return Err(SkipReason::InvalidEmail { value: raw.trim().to_string() });
    }
    Ok(key)
}

// ---------------------------------------------------------------------------
// Duration
// ---------------------------------------------------------------------------

fn hms_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+):(\d+):(\d+)$").unwrap())
}

fn ms_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+):(\d+)$").unwrap())
}

fn hours_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:h|hr|hour|hours)").unwrap())
}

fn minutes_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:m|min|mins|minute|minutes)").unwrap()
    })
}

fn any_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+(?:\.\d+)?)").unwrap())
}

fn capture_f64(caps: &regex::Captures<'_>, i: usize) -> f64 {
    caps.get(i).and_then(|m| m.as_str().parse().ok()).unwrap_or(0.0)
}

/// Parse a meeting-export duration cell into minutes.
///
/// Accepts plain numbers (already minutes), `H:MM:SS`, `MM:SS`, and free text
/// with hour/minute units (`1h 30m`, `2 hours`, `90 mins`). As a last resort
/// the first number in the text is taken as minutes. Returns `None` for empty
/// or number-free input.
pub fn parse_duration_minutes(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(v) = s.parse::<f64>() {
        return v.is_finite().then_some(v);
    }

    if let Some(caps) = hms_re().captures(s) {
        let (h, m, sec) = (capture_f64(&caps, 1), capture_f64(&caps, 2), capture_f64(&caps, 3));
        return Some(h * 60.0 + m + sec / 60.0);
    }

    if let Some(caps) = ms_re().captures(s) {
        return Some(capture_f64(&caps, 1) + capture_f64(&caps, 2) / 60.0);
    }

    let hours = hours_re().captures(s).map(|c| capture_f64(&c, 1));
    let minutes = minutes_re().captures(s).map(|c| capture_f64(&c, 1));
    if hours.is_some() || minutes.is_some() {
        return Some(hours.unwrap_or(0.0) * 60.0 + minutes.unwrap_or(0.0));
    }

    any_number_re().captures(s).map(|c| capture_f64(&c, 1))
}

// ---------------------------------------------------------------------------
// Date
// ---------------------------------------------------------------------------

fn ymd_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})$").unwrap())
}

fn dmy_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2})[-/](\d{1,2})[-/](\d{4}|\d{2})$").unwrap())
}

/// Two-digit years: 00–68 → 2000s, 69–99 → 1900s.
fn expand_year(yy: i32) -> i32 {
    if yy < 69 {
        2000 + yy
    } else {
        1900 + yy
    }
}

const TEXT_DATE_FORMATS: &[&str] = &["%d %b %Y", "%d %B %Y", "%d-%b-%Y", "%B %d, %Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// Parse a roster date cell.
///
/// Numeric dates are read day-first (`dd-mm-yyyy`, `dd/mm/yy`), falling back
/// to month-first only when the day-first reading is not a real date.
/// ISO (`yyyy-mm-dd`, `yyyy/mm/dd`), `15 Jan 2025`, `15 January 2025` and
/// date-time stamps are also accepted.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(caps) = ymd_re().captures(s) {
        let y: i32 = caps[1].parse().ok()?;
        let m: u32 = caps[2].parse().ok()?;
        let d: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(y, m, d);
    }

    if let Some(caps) = dmy_re().captures(s) {
        let a: u32 = caps[1].parse().ok()?;
        let b: u32 = caps[2].parse().ok()?;
        let year_str = &caps[3];
        let y: i32 = year_str.parse().ok()?;
        let y = if year_str.len() == 2 { expand_year(y) } else { y };
        return NaiveDate::from_ymd_opt(y, b, a).or_else(|| NaiveDate::from_ymd_opt(y, a, b));
    }

    for fmt in TEXT_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Mark
// ---------------------------------------------------------------------------

/// Read an existing attendance cell. Anything other than yes/no is `None`.
pub fn parse_mark(raw: &str) -> Option<Mark> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(Mark::Y),
        "n" | "no" => Some(Mark::N),
        _ => None,
    }
}
