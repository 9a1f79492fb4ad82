use bl_replays::{Config, Harvester, run_with_shutdown};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bl-replays")]
#[command(about = "Download BeatLeader replays and store per-note accuracy tables", version)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the leaderboard API
    #[arg(long)]
    api_url: Option<String>,

    /// Root directory for the per-leaderboard folders
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Leaderboards requested per listing page
    #[arg(long)]
    page_size: Option<u32>,

    /// First listing page to fetch (to resume an interrupted run)
    #[arg(long)]
    start_page: Option<u32>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> bl_replays::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_toml_file(path)?,
            None => Config::default(),
        };
        if let Some(url) = self.api_url {
            config.api.base_url = url;
        }
        if let Some(dir) = self.output_dir {
            config.output.root = dir;
        }
        if let Some(size) = self.page_size {
            config.api.page_size = size;
        }
        if let Some(page) = self.start_page {
            config.api.start_page = page;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bl_replays={}", args.log_level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let harvester = match Harvester::new(config) {
        Ok(harvester) => harvester,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match run_with_shutdown(&harvester).await {
        Ok(Some(summary)) => {
            info!(
                leaderboards = summary.leaderboards,
                saved = summary.saved,
                skipped = summary.skipped,
                failed = summary.failed,
                "Done"
            );
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::from(130),
        Err(e) => {
            error!(error = %e, "Harvest aborted");
            ExitCode::FAILURE
        }
    }
}
