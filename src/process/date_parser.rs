use crate::process::csv::RawRecord;
use chrono::NaiveDate;
use std::fmt;

/// Why a date cell could not be turned into a calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    Empty,
    WrongShape { segments: usize },
    NotANumber { segment: String },
    OutOfRange { year: i32, month: u32, day: u32 },
}

impl fmt::Display for DateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateParseError::Empty => write!(f, "date is empty"),
            DateParseError::WrongShape { segments } => {
                write!(f, "expected YYYY-MM-DD, got {} segment(s)", segments)
            }
            DateParseError::NotANumber { segment } => {
                write!(f, "'{}' is not a number", segment)
            }
            DateParseError::OutOfRange { year, month, day } => {
                write!(f, "{}-{}-{} is not a calendar date", year, month, day)
            }
        }
    }
}

impl std::error::Error for DateParseError {}

/// Parse `"YYYY-MM-DD"` (segments may be unpadded, e.g. `2024-6-1`).
pub fn parse_event_date(raw: &str) -> Result<NaiveDate, DateParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DateParseError::Empty);
    }

    let parts: Vec<&str> = raw.split('-').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(DateParseError::WrongShape {
            segments: parts.len(),
        });
    }

    let number = |s: &str| -> Result<i64, DateParseError> {
        s.parse::<i64>().map_err(|_| DateParseError::NotANumber {
            segment: s.to_string(),
        })
    };
    let (year, month, day) = (number(parts[0])?, number(parts[1])?, number(parts[2])?);

    let out_of_range = || DateParseError::OutOfRange {
        year: year as i32,
        month: month as u32,
        day: day as u32,
    };
    let year = i32::try_from(year).map_err(|_| out_of_range())?;
    let month = u32::try_from(month).map_err(|_| out_of_range())?;
    let day = u32::try_from(day).map_err(|_| out_of_range())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(out_of_range)
}

/// Read `column` from the record and parse it as an event date.
/// A missing column counts as empty.
pub fn normalize(record: &RawRecord, column: &str) -> Result<NaiveDate, DateParseError> {
    parse_event_date(record.get(column).unwrap_or_default())
}
