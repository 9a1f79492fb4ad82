//! # bl-replays
//!
//! Batch harvester for BeatLeader replays.
//!
//! A run pages through the ranked leaderboards, lists the scores of each
//! leaderboard, downloads the notes section of every score's replay (falling back
//! to the whole file when the ranged slice yields nothing), and stores one
//! `rows x 3` table per score as a NumPy `.npy` file:
//!
//! | column | value |
//! |---|---|
//! | 0 | note id |
//! | 1 | accuracy in `[0, 1]` (good cuts only, everything else `0`) |
//! | 2 | spawn time |
//!
//! Files land in `{root}/{leaderboardId}-{njs}-{songName}/{playerId}-{playerName}.npy`.
//! Existing files are never rewritten, so an interrupted run can simply be started
//! again.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bl_replays::{Config, Harvester};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.output.root = "replays".into();
//!
//!     let harvester = Harvester::new(config)?;
//!     let summary = harvester.run().await?;
//!     println!("saved {} tables", summary.saved);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Leaderboard API client
pub mod api;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Leaderboard walker and replay tasks
pub mod harvester;
/// Note extraction into accuracy tables
pub mod notes;
/// `.npy` array container
pub mod npy;
/// BSOR replay decoding
pub mod replay;
/// Retry logic with exponential backoff
pub mod retry;
/// API shapes and run bookkeeping
pub mod types;
/// Output naming helpers
pub mod utils;

pub use api::ApiClient;
pub use config::{ApiConfig, Config, OutputConfig, RetryConfig};
pub use error::{Error, ReplayError, Result};
pub use harvester::Harvester;
pub use types::{LeaderboardReport, RunSummary, ScoreOutcome, SkipReason};

/// Run a harvest until it finishes or a termination signal arrives.
///
/// Returns `Ok(None)` when interrupted. Tables are written to a `.part` file and
/// only linked to their final name once complete, so an interrupted run leaves no
/// partial table that a later run would skip.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
pub async fn run_with_shutdown(harvester: &Harvester) -> Result<Option<RunSummary>> {
    tokio::select! {
        summary = harvester.run() => summary.map(Some),
        _ = wait_for_signal() => {
            tracing::warn!("Harvest interrupted, stopping");
            Ok(None)
        }
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
