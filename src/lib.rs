pub mod classify;
pub mod config;
pub mod fetch;
pub mod logging;
pub mod process;
pub mod render;

pub use classify::{classify, Agenda, Bucket, ClassifyOptions, Event, WeekBounds, WeekStart};
pub use config::{Config, InfoSchema, SheetSchema};
pub use fetch::{fetch_board, fetch_sheets, SheetTexts};
pub use process::{build_board, parse_csv, parse_event_date, Board, DatePolicy, RawRecord};
pub use render::{HtmlRenderer, JsonRenderer, Renderer};
