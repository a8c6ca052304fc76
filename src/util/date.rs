use chrono::{DateTime, Datelike, Local, NaiveDate, SecondsFormat, Utc};

use crate::error::{AppError, Result};

const YMD: &str = "%Y-%m-%d";

/// Anything the calendar helpers accept as a date.
#[derive(Debug, Clone)]
pub enum DateInput {
    Date(NaiveDate),
    Local(DateTime<Local>),
    Text(String),
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<DateTime<Local>> for DateInput {
    fn from(dt: DateTime<Local>) -> Self {
        DateInput::Local(dt)
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(dt: DateTime<Utc>) -> Self {
        DateInput::Local(dt.with_timezone(&Local))
    }
}

impl From<&str> for DateInput {
    fn from(s: &str) -> Self {
        DateInput::Text(s.to_string())
    }
}

impl From<String> for DateInput {
    fn from(s: String) -> Self {
        DateInput::Text(s)
    }
}

impl DateInput {
    /// Calendar date in the local time zone, `None` if the text doesn't parse.
    pub fn to_local_date(&self) -> Option<NaiveDate> {
        match self {
            DateInput::Date(d) => Some(*d),
            DateInput::Local(dt) => Some(dt.date_naive()),
            DateInput::Text(s) => {
                parse_instant(s.trim()).map(|dt| dt.with_timezone(&Local).date_naive())
            }
        }
    }
}

/// Bare `yyyy-MM-dd` is midnight UTC; anything else must be RFC 3339.
fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, YMD) {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn year_of(input: impl Into<DateInput>) -> Option<i32> {
    input.into().to_local_date().map(|d| d.year())
}

/// Zero-based month (January is 0).
pub fn month_of(input: impl Into<DateInput>) -> Option<u32> {
    input.into().to_local_date().map(|d| d.month0())
}

pub fn format_ymd(date: NaiveDate) -> String {
    date.format(YMD).to_string()
}

/// Normalizes a `yyyy-MM-dd` date or an RFC 3339 timestamp into a UTC instant
/// with millisecond precision. Bare dates are taken as midnight UTC; an empty
/// string stays empty so a cleared range clears the filter.
pub fn to_iso8601(raw: &str) -> Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(String::new());
    }

    let instant = parse_instant(raw).ok_or_else(|| AppError::InvalidDate(raw.to_string()))?;

    Ok(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}
