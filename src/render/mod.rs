// src/render/mod.rs
pub mod html;
pub mod json;

use crate::classify::{Bucket, Event};
use crate::config::{InfoSchema, SheetSchema};
use crate::process::{Board, RawRecord};
use anyhow::Result;
use chrono::{Locale, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

pub use html::HtmlRenderer;
pub use json::JsonRenderer;

/// Shown in place of the page when a cycle fails.
pub const LOAD_ERROR_MESSAGE: &str = "Error al cargar los datos. Intente más tarde.";
pub const NO_EVENTS_TODAY: &str = "No hay eventos programados para hoy.";

const DISPLAY_LOCALE: Locale = Locale::es_ES;
const LONG_DATE_FORMAT: &str = "%A, %-d de %B de %Y";

const NO_TITLE: &str = "Sin título";
const NO_LOCATION: &str = "No especificada";
const DEFAULT_CATEGORY: &str = "General";
const DEFAULT_ICON: &str = "ℹ️";
const DEFAULT_SECTION: &str = "Aviso";

/// Turns a classified board into some presentation.
pub trait Renderer {
    fn render(&self, board: &Board) -> Result<String>;

    /// Replacement output for a failed cycle.
    fn render_error(&self, message: &str) -> String;
}

pub fn heading(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Today => "Hoy",
        Bucket::ThisWeek => "Esta semana",
        Bucket::NextWeek => "Próxima semana",
        Bucket::Future => "Más adelante",
        Bucket::Past => "Eventos recientes",
    }
}

/// Long Spanish date with the first letter capitalised,
/// e.g. "Miércoles, 12 de junio de 2024".
pub fn long_date(date: NaiveDate) -> String {
    let at_midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    let text = at_midnight
        .format_localized(LONG_DATE_FORMAT, DISPLAY_LOCALE)
        .to_string();
    capitalize_first(&text)
}

pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// An event with its display strings resolved and fallbacks applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventView<'a> {
    pub date: NaiveDate,
    pub display_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<&'a str>,
    pub title: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub category: &'a str,
    pub fields: &'a BTreeMap<String, String>,
}

impl<'a> EventView<'a> {
    pub fn new(event: &'a Event, schema: &SheetSchema) -> Self {
        let record = &event.record;
        Self {
            date: event.date,
            display_date: long_date(event.date),
            time: record.non_empty(&schema.time),
            title: record.non_empty(&schema.title).unwrap_or(NO_TITLE),
            description: record.non_empty(&schema.description).unwrap_or_default(),
            location: record.non_empty(&schema.location).unwrap_or(NO_LOCATION),
            category: record.non_empty(&schema.category).unwrap_or(DEFAULT_CATEGORY),
            fields: record.fields(),
        }
    }

    /// Date line, with " | 🕒 time" when a time is set.
    pub fn date_line(&self) -> String {
        match self.time {
            Some(time) => format!("{} | 🕒 {}", self.display_date, time),
            None => self.display_date.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoView<'a> {
    pub icon: &'a str,
    pub section: &'a str,
    pub content: &'a str,
}

impl<'a> InfoView<'a> {
    pub fn new(record: &'a RawRecord, schema: &InfoSchema) -> Self {
        Self {
            icon: record.non_empty(&schema.icon).unwrap_or(DEFAULT_ICON),
            section: record.non_empty(&schema.section).unwrap_or(DEFAULT_SECTION),
            content: record.non_empty(&schema.content).unwrap_or_default(),
        }
    }
}
