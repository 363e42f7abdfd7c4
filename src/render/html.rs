// src/render/html.rs

use super::{heading, EventView, InfoView, Renderer, NO_EVENTS_TODAY};
use crate::classify::{Agenda, Bucket};
use crate::config::{Config, InfoSchema, SheetSchema};
use crate::process::{Board, RawRecord};
use anyhow::Result;
use std::fmt::Write;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f4f5f7; color: #222; }
header { background: #2c3e50; color: #fff; padding: 1rem; text-align: center; }
main { max-width: 60rem; margin: 0 auto; padding: 1rem; }
.tabs { display: flex; gap: .5rem; margin-bottom: 1rem; }
.tab-link { border: 0; padding: .5rem 1rem; cursor: pointer; background: #dfe3e8; }
.tab-link.active { background: #2c3e50; color: #fff; }
.tab-content { display: none; }
.tab-content.active { display: block; }
.event-card, .info-card { background: #fff; border-radius: 6px; padding: .75rem 1rem; margin: .5rem 0; }
.event-date { font-weight: 600; color: #2c3e50; }
.event-meta { font-size: .9rem; color: #555; }
.info-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(16rem, 1fr)); gap: .75rem; }
.error { text-align: center; color: red; }
"#;

const TAB_SCRIPT: &str = r#"
function openTab(evt, tabName) {
  document.querySelectorAll('.tab-content').forEach(function (el) { el.classList.remove('active'); });
  document.querySelectorAll('.tab-link').forEach(function (el) { el.classList.remove('active'); });
  document.getElementById(tabName).classList.add('active');
  evt.currentTarget.classList.add('active');
}
"#;

/// Escape text for element content and double-quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// DOM id of a bucket's container.
pub fn container_id(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Today => "today-events",
        Bucket::ThisWeek => "this-week-events",
        Bucket::NextWeek => "next-week-events",
        Bucket::Future => "future-events",
        Bucket::Past => "past-events",
    }
}

/// Static single-page HTML output.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    title: String,
    schema: SheetSchema,
    info_schema: InfoSchema,
}

impl HtmlRenderer {
    pub fn new(config: &Config) -> Self {
        Self {
            title: config.title.clone(),
            schema: config.schema.clone(),
            info_schema: config.info_schema.clone(),
        }
    }

    pub fn event_card(&self, view: &EventView<'_>) -> String {
        format!(
            r#"<div class="event-card">
  <div class="event-date">{}</div>
  <h3 class="event-title">{}</h3>
  <p class="event-desc">{}</p>
  <div class="event-meta">📍 {} | 🏷️ {}</div>
</div>
"#,
            escape(&view.date_line()),
            escape(view.title),
            escape(view.description),
            escape(view.location),
            escape(view.category),
        )
    }

    pub fn info_card(&self, view: &InfoView<'_>) -> String {
        format!(
            r#"<div class="info-card">
  <h3>{} {}</h3>
  <p>{}</p>
</div>
"#,
            escape(view.icon),
            escape(view.section),
            escape(view.content),
        )
    }

    fn events_section(&self, agenda: &Agenda) -> Result<String> {
        let mut out = String::new();
        for bucket in Bucket::ALL {
            writeln!(out, "<section class=\"bucket\">")?;
            writeln!(out, "<h2>{}</h2>", heading(bucket))?;
            if bucket == Bucket::Today && !agenda.has_today() {
                writeln!(out, "<p id=\"no-today\">{}</p>", NO_EVENTS_TODAY)?;
            }
            writeln!(out, "<div id=\"{}\">", container_id(bucket))?;
            for event in agenda.bucket(bucket) {
                out.push_str(&self.event_card(&EventView::new(event, &self.schema)));
            }
            writeln!(out, "</div>\n</section>")?;
        }
        Ok(out)
    }

    fn info_section(&self, info: &[RawRecord]) -> String {
        info.iter()
            .map(|record| self.info_card(&InfoView::new(record, &self.info_schema)))
            .collect()
    }

    fn page(&self, body: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<header><h1>{title}</h1></header>
<main>
{body}</main>
<script>{script}</script>
</body>
</html>
"#,
            title = escape(&self.title),
            style = STYLE,
            body = body,
            script = TAB_SCRIPT,
        )
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, board: &Board) -> Result<String> {
        let mut body = String::new();
        writeln!(
            body,
            r#"<nav class="tabs">
<button class="tab-link active" onclick="openTab(event, 'eventos')">Eventos</button>
<button class="tab-link" onclick="openTab(event, 'informacion')">Información</button>
</nav>"#
        )?;
        writeln!(body, r#"<div id="eventos" class="tab-content active">"#)?;
        body.push_str(&self.events_section(&board.agenda)?);
        writeln!(body, "</div>")?;
        writeln!(body, r#"<div id="informacion" class="tab-content">"#)?;
        writeln!(body, r#"<div class="info-grid">"#)?;
        body.push_str(&self.info_section(&board.info));
        writeln!(body, "</div>\n</div>")?;
        Ok(self.page(&body))
    }

    fn render_error(&self, message: &str) -> String {
        self.page(&format!("<p class=\"error\">{}</p>\n", escape(message)))
    }
}
