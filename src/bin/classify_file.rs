// src/bin/classify_file.rs
//
// Offline classification of a local CSV export.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use eventboard::{
    build_board, config::Config, logging, parse_event_date, render::EventView, Bucket,
    JsonRenderer, Renderer,
};
use std::{env, fs, path::PathBuf};

const USAGE: &str = "Usage: classify_file <CSV> [--today YYYY-MM-DD] [--config CONFIG.yaml] [--json]";

fn main() -> Result<()> {
    let mut csv_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut today: Option<NaiveDate> = None;
    let mut json = false;

    let mut it = env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--today" => {
                let raw = it.next().context(USAGE)?;
                today = Some(
                    parse_event_date(&raw).with_context(|| format!("--today {}", raw))?,
                );
            }
            "--config" => config_path = Some(PathBuf::from(it.next().context(USAGE)?)),
            flag if flag.starts_with("--") => bail!("unknown flag {}\n{}", flag, USAGE),
            path => csv_path = Some(PathBuf::from(path)),
        }
    }
    let csv_path = csv_path.context(USAGE)?;

    let config = Config::load(config_path.as_deref())?;
    logging::init(&config.log_level);

    let text = fs::read_to_string(&csv_path)
        .with_context(|| format!("reading {}", csv_path.display()))?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let board = build_board(&text, None, today, &config)?;

    if json {
        println!("{}", JsonRenderer::new(&config).render(&board)?);
        return Ok(());
    }

    println!("today: {}", today);
    for bucket in Bucket::ALL {
        let events = board.agenda.bucket(bucket);
        println!("\n[{}] {}", bucket.as_str(), events.len());
        for event in events {
            let view = EventView::new(event, &config.schema);
            println!("  {}  {}", event.date, view.title);
        }
    }
    if !board.agenda.has_today() {
        println!("\n(no events today)");
    }
    Ok(())
}
