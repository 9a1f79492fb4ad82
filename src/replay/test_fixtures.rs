//! Encoders for building replay bytes in tests.

use super::decoder::{BSOR_MAGIC, BSOR_VERSION};
use super::{NoteCutInfo, NoteEvent, NoteEventType, Transform};

pub(crate) fn good_cut(note_id: i32, spawn_time: f32, distance: f32) -> NoteEvent {
    NoteEvent {
        note_id,
        event_time: spawn_time + 0.5,
        spawn_time,
        event_type: NoteEventType::Good,
        cut: Some(NoteCutInfo {
            speed_ok: true,
            direction_ok: true,
            saber_type_ok: true,
            saber_speed: 4.0,
            saber_type: 1,
            cut_distance_to_center: distance,
            before_cut_rating: 1.0,
            after_cut_rating: 1.0,
            ..NoteCutInfo::default()
        }),
    }
}

pub(crate) fn bad_cut(note_id: i32, spawn_time: f32) -> NoteEvent {
    NoteEvent {
        event_type: NoteEventType::Bad,
        cut: Some(NoteCutInfo {
            saber_type_ok: false,
            cut_distance_to_center: 0.01,
            ..NoteCutInfo::default()
        }),
        ..good_cut(note_id, spawn_time, 0.0)
    }
}

pub(crate) fn miss(note_id: i32, spawn_time: f32) -> NoteEvent {
    NoteEvent {
        note_id,
        event_time: spawn_time + 0.6,
        spawn_time,
        event_type: NoteEventType::Miss,
        cut: None,
    }
}

pub(crate) fn bomb(note_id: i32, spawn_time: f32) -> NoteEvent {
    NoteEvent {
        event_type: NoteEventType::Bomb,
        ..miss(note_id, spawn_time)
    }
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

fn put_transform(out: &mut Vec<u8>, t: &Transform) {
    for v in [
        t.position.x,
        t.position.y,
        t.position.z,
        t.rotation.x,
        t.rotation.y,
        t.rotation.z,
        t.rotation.w,
    ] {
        put_f32(out, v);
    }
}

fn put_note(out: &mut Vec<u8>, note: &NoteEvent) {
    put_i32(out, note.note_id);
    put_f32(out, note.event_time);
    put_f32(out, note.spawn_time);
    put_i32(out, note.event_type.to_i32());
    if let Some(cut) = &note.cut {
        for b in [
            cut.speed_ok,
            cut.direction_ok,
            cut.saber_type_ok,
            cut.was_cut_too_soon,
        ] {
            out.push(u8::from(b));
        }
        put_f32(out, cut.saber_speed);
        for v in [cut.saber_dir.x, cut.saber_dir.y, cut.saber_dir.z] {
            put_f32(out, v);
        }
        put_i32(out, cut.saber_type);
        put_f32(out, cut.time_deviation);
        put_f32(out, cut.cut_dir_deviation);
        for v in [
            cut.cut_point.x,
            cut.cut_point.y,
            cut.cut_point.z,
            cut.cut_normal.x,
            cut.cut_normal.y,
            cut.cut_normal.z,
        ] {
            put_f32(out, v);
        }
        put_f32(out, cut.cut_distance_to_center);
        put_f32(out, cut.cut_angle);
        put_f32(out, cut.before_cut_rating);
        put_f32(out, cut.after_cut_rating);
    }
}

/// Note count followed by the encoded notes, as served for a ranged request
pub(crate) fn notes_section(notes: &[NoteEvent]) -> Vec<u8> {
    let mut out = Vec::new();
    put_i32(&mut out, notes.len() as i32);
    for note in notes {
        put_note(&mut out, note);
    }
    out
}

/// Builds a complete replay file
pub(crate) struct ReplayBuilder {
    player_id: String,
    player_name: String,
    frames: usize,
    notes: Vec<NoteEvent>,
    walls: usize,
    heights: usize,
    pauses: usize,
    controller_offsets: bool,
    user_data: Vec<(String, Vec<u8>)>,
}

impl ReplayBuilder {
    pub(crate) fn new() -> Self {
        Self {
            player_id: "1".to_string(),
            player_name: "Player".to_string(),
            frames: 0,
            notes: Vec::new(),
            walls: 0,
            heights: 0,
            pauses: 0,
            controller_offsets: false,
            user_data: Vec::new(),
        }
    }

    pub(crate) fn player(mut self, id: &str, name: &str) -> Self {
        self.player_id = id.to_string();
        self.player_name = name.to_string();
        self
    }

    pub(crate) fn frames(mut self, count: usize) -> Self {
        self.frames = count;
        self
    }

    pub(crate) fn notes(mut self, notes: Vec<NoteEvent>) -> Self {
        self.notes = notes;
        self
    }

    pub(crate) fn walls(mut self, count: usize) -> Self {
        self.walls = count;
        self
    }

    pub(crate) fn heights(mut self, count: usize) -> Self {
        self.heights = count;
        self
    }

    pub(crate) fn pauses(mut self, count: usize) -> Self {
        self.pauses = count;
        self
    }

    pub(crate) fn controller_offsets(mut self) -> Self {
        self.controller_offsets = true;
        self
    }

    pub(crate) fn user_data(mut self, key: &str, bytes: Vec<u8>) -> Self {
        self.user_data.push((key.to_string(), bytes));
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&BSOR_MAGIC.to_le_bytes());
        out.push(BSOR_VERSION);

        out.push(0);
        for s in [
            "0.9.0",
            "1.34.2",
            "1700000000",
            self.player_id.as_str(),
            self.player_name.as_str(),
            "steam",
            "Oculus",
            "Quest 2",
            "Touch",
            "ABCDEF0123",
            "Some Song",
            "Some Mapper",
            "ExpertPlus",
        ] {
            put_string(&mut out, s);
        }
        put_i32(&mut out, 987_654);
        for s in ["Standard", "Default", ""] {
            put_string(&mut out, s);
        }
        put_f32(&mut out, 0.6);
        out.push(0);
        put_f32(&mut out, 1.7);
        put_f32(&mut out, 0.0);
        put_f32(&mut out, 0.0);
        put_f32(&mut out, 0.0);

        out.push(1);
        put_i32(&mut out, self.frames as i32);
        for i in 0..self.frames {
            put_f32(&mut out, i as f32 / 90.0);
            put_i32(&mut out, 90);
            for _ in 0..3 {
                put_transform(&mut out, &Transform::default());
            }
        }

        out.push(2);
        out.extend_from_slice(&notes_section(&self.notes));

        out.push(3);
        put_i32(&mut out, self.walls as i32);
        for i in 0..self.walls {
            put_i32(&mut out, i as i32);
            put_f32(&mut out, 0.9);
            put_f32(&mut out, i as f32);
            put_f32(&mut out, i as f32 - 1.0);
        }

        out.push(4);
        put_i32(&mut out, self.heights as i32);
        for i in 0..self.heights {
            put_f32(&mut out, 1.7);
            put_f32(&mut out, i as f32);
        }

        out.push(5);
        put_i32(&mut out, self.pauses as i32);
        for i in 0..self.pauses {
            out.extend_from_slice(&(1000i64 * (i as i64 + 1)).to_le_bytes());
            put_f32(&mut out, i as f32);
        }

        if self.controller_offsets {
            out.push(6);
            put_transform(&mut out, &Transform::default());
            put_transform(&mut out, &Transform::default());
        }

        if !self.user_data.is_empty() {
            out.push(7);
            put_i32(&mut out, self.user_data.len() as i32);
            for (key, bytes) in &self.user_data {
                put_string(&mut out, key);
                put_i32(&mut out, bytes.len() as i32);
                out.extend_from_slice(bytes);
            }
        }

        out
    }
}
