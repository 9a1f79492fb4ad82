//! Replay and API payload generators

use serde_json::{Value, json};

const BSOR_MAGIC: u32 = 0x442d_3d69;

/// One note event as it appears in a replay
#[derive(Clone, Copy, Debug)]
pub enum TestNote {
    /// Good cut at the given distance from the note center
    Good { id: i32, spawn: f32, distance: f32 },
    /// Bad cut (wrong saber or direction)
    Bad { id: i32, spawn: f32 },
    /// Missed note
    Miss { id: i32, spawn: f32 },
    /// Bomb
    Bomb { id: i32, spawn: f32 },
}

fn put_i32(out: &mut Vec<u8>, v: i32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_f32(out: &mut Vec<u8>, v: f32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_string(out: &mut Vec<u8>, s: &str) {
    put_i32(out, s.len() as i32);
    out.extend_from_slice(s.as_bytes());
}

fn put_cut(out: &mut Vec<u8>, distance: f32) {
    // speedOK, directionOK, saberTypeOK, wasCutTooSoon
    out.extend_from_slice(&[1, 1, 1, 0]);
    put_f32(out, 3.5);
    for _ in 0..3 {
        put_f32(out, 0.0);
    }
    put_i32(out, 0);
    put_f32(out, 0.01);
    put_f32(out, 2.0);
    for _ in 0..6 {
        put_f32(out, 0.0);
    }
    put_f32(out, distance);
    put_f32(out, 5.0);
    put_f32(out, 1.0);
    put_f32(out, 1.0);
}

fn put_note(out: &mut Vec<u8>, note: &TestNote) {
    let (id, spawn, kind) = match *note {
        TestNote::Good { id, spawn, .. } => (id, spawn, 0),
        TestNote::Bad { id, spawn } => (id, spawn, 1),
        TestNote::Miss { id, spawn } => (id, spawn, 2),
        TestNote::Bomb { id, spawn } => (id, spawn, 3),
    };
    put_i32(out, id);
    put_f32(out, spawn + 0.5);
    put_f32(out, spawn);
    put_i32(out, kind);
    match *note {
        TestNote::Good { distance, .. } => put_cut(out, distance),
        TestNote::Bad { .. } => put_cut(out, 0.1),
        TestNote::Miss { .. } | TestNote::Bomb { .. } => {}
    }
}

/// Notes section bytes as served for a ranged request
pub fn notes_section(notes: &[TestNote]) -> Vec<u8> {
    let mut out = Vec::new();
    put_i32(&mut out, notes.len() as i32);
    for note in notes {
        put_note(&mut out, note);
    }
    out
}

/// A complete replay with an info section, no frames and the given notes
pub fn replay_file(notes: &[TestNote]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&BSOR_MAGIC.to_le_bytes());
    out.push(1);

    out.push(0);
    for s in [
        "0.9.0",
        "1.34.2",
        "1700000000",
        "76561198000000001",
        "Tester",
        "steam",
        "Oculus",
        "Quest 2",
        "Touch",
        "ABCDEF",
        "Song",
        "Mapper",
        "Expert",
    ] {
        put_string(&mut out, s);
    }
    put_i32(&mut out, 500_000);
    for s in ["Standard", "Default", ""] {
        put_string(&mut out, s);
    }
    put_f32(&mut out, 0.6);
    out.push(0);
    for v in [1.75, 0.0, 0.0, 1.0] {
        put_f32(&mut out, v);
    }

    out.push(1);
    put_i32(&mut out, 0);

    out.push(2);
    out.extend_from_slice(&notes_section(notes));

    for section in [3u8, 4, 5] {
        out.push(section);
        put_i32(&mut out, 0);
    }
    out
}

/// One listing page body
pub fn listing_page(page: u32, ids: &[&str], total: u64) -> Value {
    let data: Vec<Value> = ids
        .iter()
        .map(|id| json!({"id": id, "song": {"hash": "HASH"}, "difficulty": {"njs": 16.0}}))
        .collect();
    json!({
        "metadata": {"itemsPerPage": 100, "page": page, "total": total},
        "data": data,
    })
}

/// One score entry; `offsets` is `(notes, walls)`
pub fn score(
    player_id: &str,
    name: &str,
    base_score: i64,
    replay: Option<&str>,
    offsets: Option<(i64, i64)>,
) -> Value {
    let offsets = match offsets {
        Some((notes, walls)) => json!({
            "id": 1,
            "frames": 60,
            "notes": notes,
            "walls": walls,
            "heights": walls + 10,
            "pauses": walls + 20,
        }),
        None => Value::Null,
    };
    json!({
        "id": 1,
        "player": {"id": player_id, "name": name, "country": "NL"},
        "baseScore": base_score,
        "replay": replay,
        "offsets": offsets,
    })
}

/// Score list body of one leaderboard
pub fn score_list(song: &str, njs: f32, scores: Vec<Value>) -> Value {
    json!({
        "id": "ignored",
        "song": {"hash": "HASH", "name": song, "author": "Someone"},
        "difficulty": {"njs": njs, "stars": 7.5},
        "scores": scores,
    })
}
