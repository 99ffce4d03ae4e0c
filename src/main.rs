use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use anime_lens::data::source::Source;
use anime_lens::stats::table::render_text;
use anime_lens::{AppState, Config, FilterSelection};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Output {
    /// Full dashboard as JSON.
    Json,
    /// Top-rated table as plain text.
    Table,
}

/// Load an anime export and print the aggregated dashboard.
#[derive(Debug, Parser)]
#[command(name = "anime-lens", version, about)]
struct Cli {
    /// JSON config file (sources, column names, year window).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Primary source: URL or path.
    #[arg(long)]
    primary: Option<String>,

    /// Fallback source used when the primary fails.
    #[arg(long)]
    fallback: Option<String>,

    /// Keep only these years (repeatable).
    #[arg(long = "year")]
    years: Vec<i32>,

    /// Keep only titles with one of these genres (repeatable).
    #[arg(long = "genre")]
    genres: Vec<String>,

    /// Keep only titles from one of these studios (repeatable).
    #[arg(long = "studio")]
    studios: Vec<String>,

    #[arg(long, value_enum, default_value_t = Output::Json)]
    output: Output,

    /// Single-line JSON.
    #[arg(long)]
    compact: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()).await {
        log::error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    if let Some(primary) = cli.primary {
        config.sources.primary = primary;
    }
    if let Some(fallback) = cli.fallback {
        config.sources.fallback = fallback;
    }

    let mut state = AppState::new(&config);
    let primary: Source = config.sources.primary_source();
    let fallback: Source = config.sources.fallback_source();
    state.load_dataset(&primary, &fallback).await?;

    state.set_selection(FilterSelection {
        years: cli.years.into_iter().collect(),
        genres: cli.genres.into_iter().collect(),
        studios: cli.studios.into_iter().collect(),
    });

    let dashboard = state.dashboard().context("no dataset loaded")?;
    match cli.output {
        Output::Json => {
            let json = if cli.compact {
                serde_json::to_string(&dashboard)
            } else {
                serde_json::to_string_pretty(&dashboard)
            }
            .context("serializing dashboard")?;
            println!("{json}");
        }
        Output::Table => print!("{}", render_text(&dashboard.leaderboard)),
    }
    Ok(())
}
