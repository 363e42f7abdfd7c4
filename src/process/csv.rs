// src/process/csv.rs

use std::collections::BTreeMap;
use tracing::{debug, trace};

/// One data row of a sheet, keyed by the header row's column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line in the source text, kept for diagnostics.
    line: usize,
    fields: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new(line: usize, fields: BTreeMap<String, String>) -> Self {
        Self { line, fields }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Raw cell value, empty string included.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Cell value, treating an empty cell the same as a missing column.
    pub fn non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|v| !v.is_empty())
    }
}

/// Trim whitespace, then drop at most one leading and one trailing `"`.
/// Doubled quotes inside the value are left alone.
pub fn clean_field(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    trimmed.strip_suffix('"').unwrap_or(trimmed)
}

/// Split a line on every comma that has an even number of `"` after it,
/// so commas inside a quoted cell stay put.
pub fn split_fields(line: &str) -> Vec<&str> {
    let mut quotes_after = line.bytes().filter(|&b| b == b'"').count();
    let mut fields = Vec::new();
    let mut start = 0;

    for (i, b) in line.bytes().enumerate() {
        match b {
            b'"' => quotes_after -= 1,
            b',' if quotes_after % 2 == 0 => {
                fields.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(&line[start..]);
    fields
}

/// Parse CSV text whose first line is the header row.
///
/// Blank rows are skipped. Short rows are padded with empty strings and
/// cells past the last header are dropped. Empty input yields no records.
pub fn parse_csv(text: &str) -> Vec<RawRecord> {
    let mut lines = text.split('\n');

    let headers: Vec<String> = match lines.next() {
        Some(h) if !h.trim().is_empty() => split_fields(h)
            .into_iter()
            .map(|name| clean_field(name).to_string())
            .collect(),
        _ => {
            debug!("empty CSV input");
            return Vec::new();
        }
    };

    let mut records = Vec::new();
    for (idx, row) in lines.enumerate() {
        // header is line 1
        let line = idx + 2;
        if row.trim().is_empty() {
            trace!(line, "skipping blank row");
            continue;
        }

        let values = split_fields(row);
        let fields: BTreeMap<String, String> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let value = values.get(i).map(|v| clean_field(v)).unwrap_or_default();
                (name.clone(), value.to_string())
            })
            .collect();
        records.push(RawRecord::new(line, fields));
    }

    debug!(columns = headers.len(), rows = records.len(), "parsed CSV");
    records
}
