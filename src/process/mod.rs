// src/process/mod.rs
pub mod csv;
pub mod date_parser;

use crate::classify::{classify, Agenda, Event};
use crate::config::Config;
use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub use self::csv::{parse_csv, RawRecord};
pub use self::date_parser::{normalize, parse_event_date, DateParseError};

/// What to do with a row whose date cell is filled in but unparseable.
/// Rows with an empty date are always skipped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePolicy {
    /// Skip the row and log a warning.
    #[default]
    Drop,
    /// Abort the whole pass.
    Reject,
}

/// Attach a parsed date from `column` to each record.
pub fn stamp_events(records: Vec<RawRecord>, column: &str, policy: DatePolicy) -> Result<Vec<Event>> {
    let total = records.len();
    let mut events = Vec::with_capacity(total);

    for record in records {
        match normalize(&record, column) {
            Ok(date) => events.push(Event::new(date, record)),
            Err(DateParseError::Empty) => {
                let raw = record.get(column).unwrap_or_default();
                warn!(line = record.line(), column, value = raw, "row has no date; skipped");
            }
            Err(e) => {
                let raw = record.get(column).unwrap_or_default();
                match policy {
                    DatePolicy::Drop => {
                        warn!(line = record.line(), column, value = raw, error = %e, "dropping row with bad date");
                    }
                    DatePolicy::Reject => {
                        bail!("line {}: bad {} value '{}': {}", record.line(), column, raw, e);
                    }
                }
            }
        }
    }

    if events.len() < total {
        info!(kept = events.len(), total, "some rows had no usable date");
    }
    Ok(events)
}

/// Everything one render cycle produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub agenda: Agenda,
    pub info: Vec<RawRecord>,
}

/// Parse, date and classify the sheet texts for `today`.
pub fn build_board(
    events_csv: &str,
    info_csv: Option<&str>,
    today: NaiveDate,
    config: &Config,
) -> Result<Board> {
    let records = parse_csv(events_csv);
    let events = stamp_events(records, &config.schema.date, config.date_policy)?;
    let agenda = classify(events, today, &config.classify_options());
    let info = info_csv.map(parse_csv).unwrap_or_default();

    info!(
        events = agenda.len(),
        has_today = agenda.has_today(),
        info = info.len(),
        "board ready"
    );
    Ok(Board { agenda, info })
}
