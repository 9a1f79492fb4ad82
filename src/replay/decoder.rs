//! BSOR binary layout and decoders.
//!
//! ## Layout
//!
//! All values are little-endian.
//!
//! - 4 bytes: magic `0x442d3d69`
//! - 1 byte: format version (`1`)
//! - sections, each a 1-byte id followed by its body:
//!   - `0` info: 13 strings, `i32` score, 3 strings, `f32` jump distance, `bool` left
//!     handed, `f32` height, `f32` start time, `f32` fail time, `f32` speed
//!   - `1` frames: `i32` count, then `f32` time, `i32` fps, head/left/right transforms
//!   - `2` notes: `i32` count, then `i32` id, `f32` event time, `f32` spawn time,
//!     `i32` event type, and a cut info block for good/bad cuts
//!   - `3` walls: `i32` count, then `i32` id, `f32` energy, `f32` time, `f32` spawn time
//!   - `4` heights: `i32` count, then `f32` height, `f32` time
//!   - `5` pauses: `i32` count, then `i64` duration, `f32` time
//!   - `6` controller offsets: left and right transforms
//!   - `7` user data: `i32` count, then string key, `i32` length, raw bytes
//!
//! Strings are an `i32` byte length followed by UTF-8. A transform is a `vec3`
//! position followed by a `quat` rotation.

use super::reader::ByteReader;
use super::{
    AutomaticHeight, ControllerOffsets, Frame, NoteCutInfo, NoteEvent, NoteEventType, Pause,
    Replay, ReplayInfo, UserData, WallEvent,
};
use crate::error::ReplayError;

type Result<T> = std::result::Result<T, ReplayError>;

/// First four bytes of every replay
pub const BSOR_MAGIC: u32 = 0x442d3d69;

/// The only format version in circulation
pub const BSOR_VERSION: u8 = 1;

const SECTION_INFO: u8 = 0;
const SECTION_FRAMES: u8 = 1;
const SECTION_NOTES: u8 = 2;
const SECTION_WALLS: u8 = 3;
const SECTION_HEIGHTS: u8 = 4;
const SECTION_PAUSES: u8 = 5;
const SECTION_CONTROLLER_OFFSETS: u8 = 6;
const SECTION_USER_DATA: u8 = 7;

/// Smallest encoded note (a miss or bomb without cut info)
const MIN_NOTE_SIZE: usize = 4 + 4 + 4 + 4;

/// Decode the notes section from a ranged slice of a replay.
///
/// The slice is expected to start at the note count, as produced by requesting
/// `bytes={offsets.notes}-{offsets.walls}`. Bytes after the last note are ignored.
///
/// Returns an empty list when the slice is empty or starts with the replay magic
/// (the server ignored the range and sent the whole file), so callers can fall back
/// to [`decode`].
pub fn decode_notes(data: &[u8]) -> Result<Vec<NoteEvent>> {
    if data.is_empty() || starts_with_magic(data) {
        return Ok(Vec::new());
    }
    read_notes(&mut ByteReader::new(data))
}

/// Decode a complete replay file.
pub fn decode(data: &[u8]) -> Result<Replay> {
    let mut reader = ByteReader::new(data);

    let magic = reader.read_u32()?;
    if magic != BSOR_MAGIC {
        return Err(ReplayError::BadMagic { found: magic });
    }
    let version = reader.read_u8()?;
    if version != BSOR_VERSION {
        return Err(ReplayError::UnsupportedVersion(version));
    }

    let mut replay = Replay {
        version,
        ..Replay::default()
    };

    while !reader.is_empty() {
        let offset = reader.position();
        match reader.read_u8()? {
            SECTION_INFO => replay.info = read_info(&mut reader)?,
            SECTION_FRAMES => replay.frames = read_frames(&mut reader)?,
            SECTION_NOTES => replay.notes = read_notes(&mut reader)?,
            SECTION_WALLS => replay.walls = read_walls(&mut reader)?,
            SECTION_HEIGHTS => replay.heights = read_heights(&mut reader)?,
            SECTION_PAUSES => replay.pauses = read_pauses(&mut reader)?,
            SECTION_CONTROLLER_OFFSETS => {
                replay.controller_offsets = Some(ControllerOffsets {
                    left: reader.read_transform()?,
                    right: reader.read_transform()?,
                });
            }
            SECTION_USER_DATA => replay.user_data = read_user_data(&mut reader)?,
            id => return Err(ReplayError::UnknownSection { id, offset }),
        }
    }

    Ok(replay)
}

fn starts_with_magic(data: &[u8]) -> bool {
    data.get(..4) == Some(BSOR_MAGIC.to_le_bytes().as_slice())
}

/// Capacity hint that cannot be inflated by a corrupt count
fn capacity(count: usize, reader: &ByteReader<'_>, min_size: usize) -> usize {
    count.min(reader.remaining() / min_size)
}

fn read_info(reader: &mut ByteReader<'_>) -> Result<ReplayInfo> {
    Ok(ReplayInfo {
        version: reader.read_string()?,
        game_version: reader.read_string()?,
        timestamp: reader.read_string()?,
        player_id: reader.read_string()?,
        player_name: reader.read_string()?,
        platform: reader.read_string()?,
        tracking_system: reader.read_string()?,
        hmd: reader.read_string()?,
        controller: reader.read_string()?,
        hash: reader.read_string()?,
        song_name: reader.read_string()?,
        mapper: reader.read_string()?,
        difficulty: reader.read_string()?,
        score: reader.read_i32()?,
        mode: reader.read_string()?,
        environment: reader.read_string()?,
        modifiers: reader.read_string()?,
        jump_distance: reader.read_f32()?,
        left_handed: reader.read_bool()?,
        height: reader.read_f32()?,
        start_time: reader.read_f32()?,
        fail_time: reader.read_f32()?,
        speed: reader.read_f32()?,
    })
}

fn read_frames(reader: &mut ByteReader<'_>) -> Result<Vec<Frame>> {
    let count = reader.read_count("frames")?;
    let mut frames = Vec::with_capacity(capacity(count, reader, 4 + 4 + 3 * 28));
    for _ in 0..count {
        frames.push(Frame {
            time: reader.read_f32()?,
            fps: reader.read_i32()?,
            head: reader.read_transform()?,
            left_hand: reader.read_transform()?,
            right_hand: reader.read_transform()?,
        });
    }
    Ok(frames)
}

fn read_notes(reader: &mut ByteReader<'_>) -> Result<Vec<NoteEvent>> {
    let count = reader.read_count("notes")?;
    let mut notes = Vec::with_capacity(capacity(count, reader, MIN_NOTE_SIZE));
    for _ in 0..count {
        notes.push(read_note(reader)?);
    }
    Ok(notes)
}

fn read_note(reader: &mut ByteReader<'_>) -> Result<NoteEvent> {
    let note_id = reader.read_i32()?;
    let event_time = reader.read_f32()?;
    let spawn_time = reader.read_f32()?;
    let event_type = NoteEventType::from_i32(reader.read_i32()?);
    let cut = if event_type.has_cut_info() {
        Some(read_cut_info(reader)?)
    } else {
        None
    };

    Ok(NoteEvent {
        note_id,
        event_time,
        spawn_time,
        event_type,
        cut,
    })
}

fn read_cut_info(reader: &mut ByteReader<'_>) -> Result<NoteCutInfo> {
    Ok(NoteCutInfo {
        speed_ok: reader.read_bool()?,
        direction_ok: reader.read_bool()?,
        saber_type_ok: reader.read_bool()?,
        was_cut_too_soon: reader.read_bool()?,
        saber_speed: reader.read_f32()?,
        saber_dir: reader.read_vector3()?,
        saber_type: reader.read_i32()?,
        time_deviation: reader.read_f32()?,
        cut_dir_deviation: reader.read_f32()?,
        cut_point: reader.read_vector3()?,
        cut_normal: reader.read_vector3()?,
        cut_distance_to_center: reader.read_f32()?,
        cut_angle: reader.read_f32()?,
        before_cut_rating: reader.read_f32()?,
        after_cut_rating: reader.read_f32()?,
    })
}

fn read_walls(reader: &mut ByteReader<'_>) -> Result<Vec<WallEvent>> {
    let count = reader.read_count("walls")?;
    let mut walls = Vec::with_capacity(capacity(count, reader, 16));
    for _ in 0..count {
        walls.push(WallEvent {
            wall_id: reader.read_i32()?,
            energy: reader.read_f32()?,
            time: reader.read_f32()?,
            spawn_time: reader.read_f32()?,
        });
    }
    Ok(walls)
}

fn read_heights(reader: &mut ByteReader<'_>) -> Result<Vec<AutomaticHeight>> {
    let count = reader.read_count("heights")?;
    let mut heights = Vec::with_capacity(capacity(count, reader, 8));
    for _ in 0..count {
        heights.push(AutomaticHeight {
            height: reader.read_f32()?,
            time: reader.read_f32()?,
        });
    }
    Ok(heights)
}

fn read_pauses(reader: &mut ByteReader<'_>) -> Result<Vec<Pause>> {
    let count = reader.read_count("pauses")?;
    let mut pauses = Vec::with_capacity(capacity(count, reader, 12));
    for _ in 0..count {
        pauses.push(Pause {
            duration: reader.read_i64()?,
            time: reader.read_f32()?,
        });
    }
    Ok(pauses)
}

fn read_user_data(reader: &mut ByteReader<'_>) -> Result<Vec<UserData>> {
    let count = reader.read_count("user data")?;
    let mut entries = Vec::with_capacity(capacity(count, reader, 8));
    for _ in 0..count {
        let key = reader.read_string()?;
        let len = reader.read_count("user data byte")?;
        let bytes = reader.take(len)?.to_vec();
        entries.push(UserData { key, bytes });
    }
    Ok(entries)
}
