//! Per-leaderboard score listing and concurrent replay downloads.

use super::Harvester;
use crate::error::Result;
use crate::retry::download_with_retry;
use crate::types::LeaderboardReport;
use crate::utils::leaderboard_dir_name;
use std::cmp::Reverse;

impl Harvester {
    /// Download the note tables of one leaderboard's listed scores
    ///
    /// Creates `{root}/{id}-{njs}-{song}` if needed, then runs one replay task per
    /// score concurrently (dispatched highest base score first) and waits for all of
    /// them. Task failures are reported in the returned [`LeaderboardReport`], never
    /// as an error; only the score list request itself or creating the directory can
    /// fail this call.
    pub async fn download_leaderboard_scores(
        &self,
        leaderboard_id: &str,
    ) -> Result<LeaderboardReport> {
        let mut listing = download_with_retry(&self.config.retry, || {
            self.client.fetch_leaderboard_scores(leaderboard_id)
        })
        .await?;

        let directory = self.config.output.root.join(leaderboard_dir_name(
            leaderboard_id,
            listing.difficulty.njs,
            &listing.song.name,
        ));
        tokio::fs::create_dir_all(&directory).await?;

        listing.scores.sort_by_key(|score| Reverse(score.base_score));

        tracing::debug!(
            leaderboard_id = %leaderboard_id,
            directory = %directory.display(),
            scores = listing.scores.len(),
            "Downloading leaderboard replays"
        );

        let tasks = listing
            .scores
            .iter()
            .map(|score| self.download_replay(&directory, score));
        let outcomes = futures::future::join_all(tasks).await;

        Ok(LeaderboardReport {
            leaderboard_id: leaderboard_id.to_string(),
            directory,
            outcomes,
        })
    }
}
