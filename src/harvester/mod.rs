//! Harvest pipeline split into focused submodules.
//!
//! The `Harvester` struct and its methods are organized by stage:
//! - this module - the leaderboard walker (pagination and run totals)
//! - [`leaderboard`] - per-leaderboard score listing and concurrent fan-out
//! - [`replay_task`] - one score: ranged fetch, fallback fetch, decode, save
//!
//! Leaderboards are processed strictly one after another. Only the replays of a
//! single leaderboard are downloaded concurrently, and all of them finish before
//! the next leaderboard starts.

mod leaderboard;
mod replay_task;


use crate::api::ApiClient;
use crate::config::Config;
use crate::error::Result;
use crate::retry::download_with_retry;
use crate::types::RunSummary;
use std::sync::Arc;

/// Walks the ranked leaderboards and stores note tables for their scores
#[derive(Clone, Debug)]
pub struct Harvester {
    pub(crate) client: ApiClient,
    pub(crate) config: Arc<Config>,
}

impl Harvester {
    /// Create a harvester after validating the configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let client = ApiClient::new(&config.api)?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Walk every listing page, starting at the configured page
    ///
    /// Stops after the first page holding fewer leaderboards than the page size.
    /// Listing and score-list requests are retried according to the retry
    /// settings; once those are exhausted, or on a non-retryable error such as an
    /// unexpected JSON shape, the walk stops with that error. Failures of single
    /// replays never stop the walk.
    pub async fn run(&self) -> Result<RunSummary> {
        let page_size = self.client.page_size() as usize;
        let mut page = self.config.api.start_page;
        let mut summary = RunSummary::default();

        tracing::info!(
            base_url = %self.config.api.base_url,
            output = %self.config.output.root.display(),
            start_page = page,
            page_size,
            "Starting leaderboard walk"
        );

        loop {
            let listing = download_with_retry(&self.config.retry, || {
                self.client.fetch_leaderboards_page(page)
            })
            .await?;
            summary.pages += 1;

            for info in &listing.data {
                let report = self.download_leaderboard_scores(&info.id).await?;
                summary.record(&report);
                tracing::info!(
                    leaderboard_id = %info.id,
                    saved = report.saved(),
                    skipped = report.skipped(),
                    failed = report.failed(),
                    "Leaderboard #{} of {}",
                    summary.leaderboards,
                    listing.metadata.total
                );
            }

            if listing.data.len() < page_size {
                break;
            }
            page += 1;
        }

        tracing::info!(
            pages = summary.pages,
            leaderboards = summary.leaderboards,
            saved = summary.saved,
            skipped = summary.skipped,
            failed = summary.failed,
            "Leaderboard walk complete"
        );
        Ok(summary)
    }
}
