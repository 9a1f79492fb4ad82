//! Single-score replay task: fetch, decode, extract, save.

use super::Harvester;
use crate::error::{Error, Result};
use crate::notes;
use crate::replay::{self, NoteEvent};
use crate::types::{Offsets, ScoreOutcome, ScoreRecord, SkipReason};
use crate::utils::score_file_path;
use std::io::ErrorKind;
use std::path::Path;

impl Harvester {
    /// Produce at most one note table for `score` inside `directory`
    ///
    /// Never returns an error: missing replay data and existing files are skips,
    /// and any fetch, decode or write failure is logged and reported as
    /// [`ScoreOutcome::Failed`].
    pub async fn download_replay(&self, directory: &Path, score: &ScoreRecord) -> ScoreOutcome {
        let Some((url, offsets)) = score.replay_location() else {
            return ScoreOutcome::Skipped(SkipReason::NoReplay);
        };

        let path = score_file_path(directory, &score.player, &self.config.output.extension);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(path = %path.display(), "Note table already present");
            return ScoreOutcome::Skipped(SkipReason::AlreadyExists);
        }

        let result = match self.fetch_notes(url, offsets).await {
            Ok(events) => notes::save_notes(&events, &path).await.map_err(Error::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(Some(rows)) => {
                tracing::debug!(path = %path.display(), rows, "Note table saved");
                ScoreOutcome::Saved { path, rows }
            }
            Ok(None) => ScoreOutcome::Skipped(SkipReason::NoNotes),
            Err(Error::Io(e)) if e.kind() == ErrorKind::AlreadyExists => {
                ScoreOutcome::Skipped(SkipReason::AlreadyExists)
            }
            Err(e) => {
                tracing::warn!(
                    player_id = %score.player.id,
                    url = %url,
                    error = %e,
                    "Replay download failed"
                );
                ScoreOutcome::Failed {
                    player_id: score.player.id.clone(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Notes of a replay: ranged notes-section decode first, whole file second
    ///
    /// The whole file is fetched at most once, and only when the ranged decode
    /// produced no events at all. A non-success status on the ranged request counts
    /// as an empty slice; the whole-file request must succeed. If the full decode is empty too, the (empty)
    /// ranged result is returned.
    pub(crate) async fn fetch_notes(&self, url: &str, offsets: &Offsets) -> Result<Vec<NoteEvent>> {
        let mut events = match offsets.notes_range() {
            Some(range) => match self.client.fetch_replay_range(url, &range).await {
                Ok(bytes) => replay::decode_notes(&bytes)?,
                // e.g. 416 for stale offsets
                Err(Error::HttpStatus { status, .. }) => {
                    tracing::debug!(url = %url, status, range = %range, "Ranged request rejected");
                    Vec::new()
                }
                Err(e) => return Err(e),
            },
            None => Vec::new(),
        };

        if events.is_empty() {
            tracing::debug!(url = %url, "Ranged decode found no notes, fetching whole replay");
            let bytes = self.client.fetch_replay(url).await?;
            let full = replay::decode(&bytes)?;
            if !full.notes.is_empty() {
                events = full.notes;
            }
        }

        Ok(events)
    }
}
