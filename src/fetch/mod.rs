// src/fetch/mod.rs

use crate::config::Config;
use crate::process::{build_board, Board};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Raw CSV bodies of one fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetTexts {
    pub events: String,
    pub info: Option<String>,
}

/// `base` with `gid=<gid>` appended to its query.
pub fn sheet_url(base: &str, gid: &str) -> Result<Url> {
    let mut url = Url::parse(base).with_context(|| format!("parsing sheet URL {}", base))?;
    url.query_pairs_mut().append_pair("gid", gid);
    Ok(url)
}

pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("building HTTP client")
}

async fn get_text(client: &Client, url: &Url) -> Result<String> {
    debug!("Fetching text from {}", url);
    let body = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?
        .text()
        .await
        .with_context(|| format!("Reading text from {}", url))?;
    debug!(%url, bytes = body.len(), "fetched");
    Ok(body)
}

/// Fetch the events sheet and, if configured, the info sheet concurrently.
/// Both must succeed; the first failure aborts.
#[instrument(level = "info", skip(config), fields(events_gid = %config.events_gid))]
pub async fn fetch_sheets(config: &Config) -> Result<SheetTexts> {
    let client = build_client(config.timeout())?;
    let events_url = sheet_url(&config.base_url, &config.events_gid)?;

    let texts = match &config.info_gid {
        Some(gid) => {
            let info_url = sheet_url(&config.base_url, gid)?;
            let (events, info) = tokio::try_join!(
                get_text(&client, &events_url),
                get_text(&client, &info_url)
            )?;
            SheetTexts {
                events,
                info: Some(info),
            }
        }
        None => SheetTexts {
            events: get_text(&client, &events_url).await?,
            info: None,
        },
    };
    info!(
        events_bytes = texts.events.len(),
        info_bytes = texts.info.as_ref().map(String::len),
        "sheets fetched"
    );
    Ok(texts)
}

/// One full cycle: fetch, parse, classify.
pub async fn fetch_board(config: &Config, today: NaiveDate) -> Result<Board> {
    let texts = fetch_sheets(config).await?;
    build_board(&texts.events, texts.info.as_deref(), today, config)
}
