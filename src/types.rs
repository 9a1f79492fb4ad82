//! Core types for bl-replays
//!
//! Two groups live here: the JSON shapes returned by the leaderboard API, and the
//! bookkeeping types that carry per-score and per-run results back to the walker.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Paging metadata attached to list responses
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Page size the server applied
    #[serde(default)]
    pub items_per_page: u32,
    /// Page number the server returned
    #[serde(default)]
    pub page: u32,
    /// Total number of items across all pages
    #[serde(default)]
    pub total: u64,
}

/// A page of items plus its metadata
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    /// Paging metadata
    #[serde(default)]
    pub metadata: Metadata,
    /// Items on this page
    pub data: Vec<T>,
}

/// Song reference inside a leaderboard listing
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongInfo {
    /// Map hash
    #[serde(default)]
    pub hash: String,
    /// Display name (present on score-list responses)
    #[serde(default)]
    pub name: String,
}

/// Difficulty metadata of a leaderboard
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Difficulty {
    /// Note jump speed
    #[serde(default)]
    pub njs: f32,
}

/// One entry of the ranked leaderboard listing
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardInfo {
    /// Leaderboard identifier
    pub id: String,
    /// Song reference
    #[serde(default)]
    pub song: SongInfo,
    /// Difficulty metadata
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

/// Player identity attached to a score
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Player identifier
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
}

/// Byte positions of the replay sections
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offsets {
    /// Start of the frames section
    #[serde(default)]
    pub frames: i64,
    /// Start of the notes section (points at the note count)
    pub notes: i64,
    /// Start of the walls section
    pub walls: i64,
    /// Start of the heights section
    #[serde(default)]
    pub heights: i64,
    /// Start of the pauses section
    #[serde(default)]
    pub pauses: i64,
}

impl Offsets {
    /// HTTP `Range` header value covering the notes section
    ///
    /// Returns `None` when the offsets do not describe a valid byte span.
    pub fn notes_range(&self) -> Option<String> {
        if self.notes < 0 || self.walls < self.notes {
            return None;
        }
        Some(format!("bytes={}-{}", self.notes, self.walls))
    }
}

/// One score from a leaderboard's score list
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    /// Who set the score
    pub player: Player,
    /// Unmodified score value
    #[serde(default)]
    pub base_score: i64,
    /// Replay URL, if the replay is stored
    #[serde(default)]
    pub replay: Option<String>,
    /// Section offsets inside the replay
    #[serde(default)]
    pub offsets: Option<Offsets>,
}

impl ScoreRecord {
    /// Replay URL and offsets, if both are present and usable
    pub fn replay_location(&self) -> Option<(&str, &Offsets)> {
        let url = self.replay.as_deref().filter(|u| !u.is_empty())?;
        let offsets = self.offsets.as_ref()?;
        Some((url, offsets))
    }
}

/// Response of the per-leaderboard score list endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardScores {
    /// Song the leaderboard belongs to
    #[serde(default)]
    pub song: SongInfo,
    /// Difficulty metadata
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Requested slice of scores
    #[serde(default)]
    pub scores: Vec<ScoreRecord>,
}

/// Why a score produced no file without being an error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Score has no replay URL or no section offsets
    NoReplay,
    /// Destination file already exists
    AlreadyExists,
    /// Neither the partial nor the full decode produced non-bomb notes
    NoNotes,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoReplay => write!(f, "no replay"),
            SkipReason::AlreadyExists => write!(f, "already exists"),
            SkipReason::NoNotes => write!(f, "no notes"),
        }
    }
}

/// Result of one replay download task
#[derive(Clone, Debug, PartialEq)]
pub enum ScoreOutcome {
    /// Note table written
    Saved {
        /// Written file
        path: PathBuf,
        /// Number of rows in the table
        rows: usize,
    },
    /// Nothing to do for this score
    Skipped(SkipReason),
    /// Fetch or decode failed; the error was logged
    Failed {
        /// Player whose replay failed
        player_id: String,
        /// Error message
        reason: String,
    },
}

/// Outcomes of all score tasks of one leaderboard
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LeaderboardReport {
    /// Leaderboard identifier
    pub leaderboard_id: String,
    /// Directory the tables were written to
    pub directory: PathBuf,
    /// Per-score outcomes, in dispatch order
    pub outcomes: Vec<ScoreOutcome>,
}

impl LeaderboardReport {
    /// Number of files written
    pub fn saved(&self) -> usize {
        self.count(|o| matches!(o, ScoreOutcome::Saved { .. }))
    }

    /// Number of scores skipped
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ScoreOutcome::Skipped(_)))
    }

    /// Number of scores that failed
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ScoreOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&ScoreOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// Totals for a whole run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Listing pages fetched
    pub pages: u32,
    /// Leaderboards processed
    pub leaderboards: u64,
    /// Files written
    pub saved: u64,
    /// Scores skipped
    pub skipped: u64,
    /// Scores that failed
    pub failed: u64,
}

impl RunSummary {
    /// Fold one leaderboard's report into the totals
    pub fn record(&mut self, report: &LeaderboardReport) {
        self.leaderboards += 1;
        self.saved += report.saved() as u64;
        self.skipped += report.skipped() as u64;
        self.failed += report.failed() as u64;
    }
}
