//! Utility functions for output naming

use crate::types::Player;
use std::path::{Path, PathBuf};

/// Strip everything except ASCII letters, digits and spaces
///
/// # Examples
///
/// ```
/// use bl_replays::utils::sanitize_name;
///
/// assert_eq!(sanitize_name("Test/Song!"), "TestSong");
/// assert_eq!(sanitize_name("Ünïcødé 2"), "ncd 2");
/// ```
pub fn sanitize_name(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect()
}

/// Directory name for one leaderboard: `{id}-{njs}-{sanitized song name}`
///
/// The note jump speed uses the shortest float rendering, so `9.0` becomes `9`.
pub fn leaderboard_dir_name(leaderboard_id: &str, njs: f32, song_name: &str) -> String {
    format!("{}-{}-{}", leaderboard_id, njs, sanitize_name(song_name))
}

/// Path of the note table for one player inside a leaderboard directory
pub fn score_file_path(dir: &Path, player: &Player, extension: &str) -> PathBuf {
    dir.join(format!(
        "{}-{}.{}",
        player.id,
        sanitize_name(&player.name),
        extension
    ))
}
