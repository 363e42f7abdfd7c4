use anyhow::{bail, Context, Result};
use chrono::Local;
use eventboard::{
    config::Config, fetch_board, logging, render::LOAD_ERROR_MESSAGE, HtmlRenderer, JsonRenderer,
    Renderer,
};
use std::{env, fs, path::PathBuf};
use tracing::{error, info};

const USAGE: &str = "Usage: eventboard [CONFIG.yaml] [--out PATH] [--json]";

struct Args {
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    json: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: env::var_os("EVENTBOARD_CONFIG").map(PathBuf::from),
        out: None,
        json: false,
    };
    let mut it = env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--json" => args.json = true,
            "--out" => {
                let path = it.next().with_context(|| format!("--out needs a path\n{}", USAGE))?;
                args.out = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            flag if flag.starts_with("--") => bail!("unknown flag {}\n{}", flag, USAGE),
            path => args.config = Some(PathBuf::from(path)),
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;
    let config = Config::load(args.config.as_deref())?;

    // ─── logging ─────────────────────────────────────────────────────
    logging::init(&config.log_level);
    info!(config = ?args.config, "startup");

    let renderer: Box<dyn Renderer> = if args.json {
        Box::new(JsonRenderer::new(&config))
    } else {
        Box::new(HtmlRenderer::new(&config))
    };

    // ─── one fetch → classify → render cycle ─────────────────────────
    let today = Local::now().date_naive();
    let (output, outcome) = match fetch_board(&config, today).await {
        Ok(board) => (renderer.render(&board)?, Ok(())),
        Err(e) => {
            error!(error = ?e, "cycle failed; writing error page");
            (renderer.render_error(LOAD_ERROR_MESSAGE), Err(e))
        }
    };

    match &args.out {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), bytes = output.len(), "page written");
        }
        None => print!("{}", output),
    }

    outcome
}
