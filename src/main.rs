use anyhow::Result;
use clap::Parser;
use sidewalk_kml::{
    geo::KmlWriter,
    run,
    select::{FileSelector, FixedSelector, PromptSelector},
    Config,
};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Convert an AWS Sidewalk gateway log into a processed CSV and KML point layers"
)]
struct Args {
    /// Log file (.csv, .txt or any text file); prompts when omitted
    path: Option<PathBuf>,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();

    // ─── 2) pick the input ──────────────────────────────────────────
    let mut selector: Box<dyn FileSelector> = match args.path {
        Some(path) => Box::new(FixedSelector(path)),
        None => Box::new(PromptSelector::stdin()),
    };
    let Some(input) = selector.select()? else {
        info!("No file selected.");
        return Ok(());
    };

    // ─── 3) process + export ────────────────────────────────────────
    let cfg = Config::default();
    match run(&input, &cfg, &KmlWriter) {
        Ok(summary) => {
            info!(summary = %serde_json::to_string(&summary)?, "done");
            Ok(())
        }
        Err(e) => {
            error!("{} failed: {:#}", input.display(), e);
            Err(e)
        }
    }
}
