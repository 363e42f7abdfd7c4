// src/config.rs

use crate::classify::{ClassifyOptions, WeekStart};
use crate::process::DatePolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fs, path::Path, time::Duration};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vTP-skmtlp8jQxladB-ZebiaxZ9rBQhG6dhCRFplxuZow-YZtj5llFqyoMmeL4cUuPjR2xdaT0O_Woj/pub?output=csv";
pub const DEFAULT_EVENTS_GID: &str = "2029076722";
pub const DEFAULT_INFO_GID: &str = "1489000987";

/// Column names of an events sheet. Names are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetSchema {
    pub date: String,
    pub time: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub category: String,
}

impl SheetSchema {
    pub fn spanish() -> Self {
        Self {
            date: "Fecha".into(),
            time: "Hora".into(),
            title: "Titulo".into(),
            description: "Descripcion".into(),
            location: "Ubicacion".into(),
            category: "Tipo".into(),
        }
    }

    pub fn english() -> Self {
        Self {
            date: "Date".into(),
            time: "Time".into(),
            title: "Title".into(),
            description: "Description".into(),
            location: "Location".into(),
            category: "Type".into(),
        }
    }
}

impl Default for SheetSchema {
    fn default() -> Self {
        Self::spanish()
    }
}

/// Column names of the informational sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoSchema {
    pub icon: String,
    pub section: String,
    pub content: String,
}

impl Default for InfoSchema {
    fn default() -> Self {
        Self {
            icon: "Icono".into(),
            section: "Seccion".into(),
            content: "Contenido".into(),
        }
    }
}

/// A sheet selector written either as a string or as a bare number.
#[derive(Deserialize)]
#[serde(untagged)]
enum Gid {
    Text(String),
    Number(u64),
}

impl From<Gid> for String {
    fn from(gid: Gid) -> Self {
        match gid {
            Gid::Text(s) => s,
            Gid::Number(n) => n.to_string(),
        }
    }
}

fn gid<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Gid::deserialize(de).map(String::from)
}

fn optional_gid<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Gid>::deserialize(de)?.map(String::from))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    #[serde(deserialize_with = "gid")]
    pub events_gid: String,
    /// `None` skips the informational sheet entirely.
    #[serde(deserialize_with = "optional_gid")]
    pub info_gid: Option<String>,
    pub timeout_secs: u64,
    pub schema: SheetSchema,
    pub info_schema: InfoSchema,
    pub date_policy: DatePolicy,
    pub week_start: WeekStart,
    pub past_limit: usize,
    pub log_level: String,
    pub title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            events_gid: DEFAULT_EVENTS_GID.into(),
            info_gid: Some(DEFAULT_INFO_GID.into()),
            timeout_secs: 15,
            schema: SheetSchema::default(),
            info_schema: InfoSchema::default(),
            date_policy: DatePolicy::default(),
            week_start: WeekStart::default(),
            past_limit: 3,
            log_level: "info".into(),
            title: "Agenda".into(),
        }
    }
}

impl Config {
    /// Read `path` as YAML if given, otherwise start from defaults, then
    /// apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_yaml(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Apply `EVENTBOARD_*` / `LOG_LEVEL` values returned by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("EVENTBOARD_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("EVENTBOARD_EVENTS_GID") {
            self.events_gid = v;
        }
        if let Some(v) = lookup("EVENTBOARD_INFO_GID") {
            self.info_gid = if v.trim().is_empty() { None } else { Some(v) };
        }
        if let Some(v) = lookup("EVENTBOARD_TIMEOUT_SECS") {
            self.timeout_secs = v
                .trim()
                .parse()
                .with_context(|| format!("EVENTBOARD_TIMEOUT_SECS={} is not a number", v))?;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            self.log_level = v;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn classify_options(&self) -> ClassifyOptions {
        ClassifyOptions {
            week_start: self.week_start,
            past_limit: self.past_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_yaml_is_default() -> Result<()> {
        assert_eq!(Config::from_yaml("")?, Config::default());
        Ok(())
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() -> Result<()> {
        let cfg = Config::from_yaml(
            r#"
events_gid: "42"
info_gid: null
week_start: sunday
date_policy: reject
schema:
  date: Date
  title: Title
"#,
        )?;
        assert_eq!(cfg.events_gid, "42");
        assert_eq!(cfg.info_gid, None);
        assert_eq!(cfg.week_start, WeekStart::Sunday);
        assert_eq!(cfg.date_policy, DatePolicy::Reject);
        assert_eq!(cfg.schema.date, "Date");
        assert_eq!(cfg.schema.title, "Title");
        // unspecified schema fields fall back to the Spanish column names
        assert_eq!(cfg.schema.location, "Ubicacion");
        assert_eq!(cfg.past_limit, 3);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        Ok(())
    }

    #[test]
    fn numeric_gids_are_read_as_text() -> Result<()> {
        let cfg = Config::from_yaml("events_gid: 42\ninfo_gid: 1489000987\n")?;
        assert_eq!(cfg.events_gid, "42");
        assert_eq!(cfg.info_gid.as_deref(), Some("1489000987"));

        let cfg = Config::from_yaml("info_gid: ~\n")?;
        assert_eq!(cfg.info_gid, None);
        assert_eq!(cfg.events_gid, DEFAULT_EVENTS_GID);
        Ok(())
    }

    #[test]
    fn unknown_policy_is_an_error() {
        assert!(Config::from_yaml("date_policy: explode").is_err());
    }

    #[test]
    fn overrides_win_over_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "timeout_secs: 5\nevents_gid: \"1\"")?;
        let mut cfg = Config::from_file(file.path())?;

        let env: HashMap<&str, &str> = [
            ("EVENTBOARD_EVENTS_GID", "99"),
            ("EVENTBOARD_INFO_GID", ""),
            ("EVENTBOARD_TIMEOUT_SECS", "30"),
        ]
        .into_iter()
        .collect();
        cfg.apply_overrides(|k| env.get(k).map(|v| v.to_string()))?;

        assert_eq!(cfg.events_gid, "99");
        assert_eq!(cfg.info_gid, None);
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
        Ok(())
    }

    #[test]
    fn bad_timeout_override_fails() {
        let mut cfg = Config::default();
        let result = cfg.apply_overrides(|k| {
            (k == "EVENTBOARD_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Config::from_file(Path::new("/nonexistent/eventboard.yaml")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/eventboard.yaml"));
    }

    #[test]
    fn english_preset() {
        let schema = SheetSchema::english();
        assert_eq!(schema.date, "Date");
        assert_eq!(schema.category, "Type");
    }
}
