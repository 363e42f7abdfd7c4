use super::{EventView, InfoView, Renderer};
use crate::classify::Bucket;
use crate::config::{Config, InfoSchema, SheetSchema};
use crate::process::Board;
use anyhow::Result;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Bucket-to-events mapping as pretty JSON.
#[derive(Debug, Clone)]
pub struct JsonRenderer {
    schema: SheetSchema,
    info_schema: InfoSchema,
}

#[derive(Serialize)]
struct JsonBoard<'a> {
    #[serde(flatten)]
    buckets: Map<String, Value>,
    has_today: bool,
    info: Vec<InfoView<'a>>,
}

impl JsonRenderer {
    pub fn new(config: &Config) -> Self {
        Self {
            schema: config.schema.clone(),
            info_schema: config.info_schema.clone(),
        }
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, board: &Board) -> Result<String> {
        let mut buckets = Map::new();
        for bucket in Bucket::ALL {
            let views: Vec<EventView<'_>> = board
                .agenda
                .bucket(bucket)
                .iter()
                .map(|e| EventView::new(e, &self.schema))
                .collect();
            buckets.insert(bucket.as_str().to_string(), serde_json::to_value(views)?);
        }

        let out = JsonBoard {
            buckets,
            has_today: board.agenda.has_today(),
            info: board
                .info
                .iter()
                .map(|r| InfoView::new(r, &self.info_schema))
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&out)?)
    }

    fn render_error(&self, message: &str) -> String {
        json!({ "error": message }).to_string()
    }
}
