//! Note extraction: decoded note events to a `rows x 3` accuracy table.
//!
//! Each retained note becomes `[note id, accuracy, spawn time]`. Bombs are
//! dropped. Good cuts score `1 - clamp(distance / 0.3, 0, 1)`, every other kind
//! (unknown ones included) scores `0.0`. Row order is decode order.

use crate::npy;
use crate::replay::{NoteEvent, NoteEventType};
use std::path::Path;

/// Cut distance (in replay units) at which a good cut's accuracy reaches zero
pub const MAX_CUT_DISTANCE: f64 = 0.3;

/// Columns per output row
pub const NOTE_COLUMNS: usize = 3;

/// One output row: note id, normalized accuracy, spawn time
pub type NoteRow = [f64; NOTE_COLUMNS];

/// Normalized accuracy of a single note event in `[0, 1]`
pub fn accuracy(note: &NoteEvent) -> f64 {
    match (note.event_type, &note.cut) {
        (NoteEventType::Good, Some(cut)) => {
            let ratio = f64::from(cut.cut_distance_to_center) / MAX_CUT_DISTANCE;
            // NaN distances count as a maximal miss
            1.0 - if ratio.is_nan() { 1.0 } else { ratio.clamp(0.0, 1.0) }
        }
        _ => 0.0,
    }
}

/// Build the output rows for all non-bomb notes, preserving order
pub fn note_rows(notes: &[NoteEvent]) -> Vec<NoteRow> {
    notes
        .iter()
        .filter(|note| note.event_type != NoteEventType::Bomb)
        .map(|note| {
            [
                f64::from(note.note_id),
                accuracy(note),
                f64::from(note.spawn_time),
            ]
        })
        .collect()
}

/// Write the note table for `notes` to `path`.
///
/// Returns the number of rows written, or `None` when no non-bomb notes remain
/// (in which case no file is created). The file is created exclusively; an
/// existing file yields an [`std::io::ErrorKind::AlreadyExists`] error and is left
/// untouched.
pub async fn save_notes(notes: &[NoteEvent], path: &Path) -> std::io::Result<Option<usize>> {
    let rows = note_rows(notes);
    if rows.is_empty() {
        return Ok(None);
    }
    npy::write_new(path, &rows).await?;
    Ok(Some(rows.len()))
}
