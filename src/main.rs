use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use lbscrape::{
    info_time, process::process_site, CategorySet, CellMode, HttpFetcher, Result, Settings,
    DEFAULT_SETTINGS_PATH,
};

#[derive(Parser)]
#[command(name = "lbscrape")]
#[command(about = "Scrapes leaderboards into a player x leaderboard CSV", version)]
struct Args {
    /// Path to the settings file
    #[arg(short, long, default_value = DEFAULT_SETTINGS_PATH)]
    settings: PathBuf,

    /// Output ranks (true) or scores (false), overrides RANK_MODE
    #[arg(long)]
    rank_mode: Option<String>,

    /// How many players to take from each leaderboard, overrides RANK_CUTOFF
    #[arg(long)]
    cutoff: Option<usize>,

    /// Where to write the CSV, overrides CSV_FILE_PATH
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let start_time = Local::now();
    let args = Args::parse();

    info_time!("Loading settings from '{}'...", args.settings.display());
    let mut settings = Settings::load(&args.settings)?;
    if let Some(mode) = args.rank_mode.as_deref() {
        settings.mode = CellMode::parse(mode)?;
    }
    if let Some(cutoff) = args.cutoff {
        settings.rank_cutoff = cutoff;
    }
    if let Some(output) = args.output {
        settings.csv_path = output;
    }

    let fetcher = HttpFetcher::new()?;
    let summary = process_site(&fetcher, &settings, &CategorySet::standard()).await?;
    info_time!(
        start_time,
        "Full program time: {} players written, {} skipped",
        summary.written,
        summary.skipped
    );

    Ok(())
}
