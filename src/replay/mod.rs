//! BSOR replay decoding
//!
//! A replay is a little-endian binary stream: a magic number and version byte,
//! followed by tagged sections (info, frames, notes, walls, heights, pauses and two
//! optional trailing sections). See [`decoder`] for the byte layout.
//!
//! Two entry points exist:
//! - [`decode_notes`] decodes a buffer that starts at the notes section's count, as
//!   returned by a ranged request built from the score's offsets
//! - [`decode`] decodes a complete replay file

pub mod decoder;
mod reader;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use decoder::{BSOR_MAGIC, BSOR_VERSION, decode, decode_notes};

/// Kind of interaction recorded for a note
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoteEventType {
    /// Correct cut
    Good,
    /// Wrong saber or wrong direction
    Bad,
    /// Note passed without a cut
    Miss,
    /// A bomb was hit
    Bomb,
    /// Wire value outside the known kinds; carries no cut info
    Other(i32),
}

impl NoteEventType {
    /// Wire value of this kind
    pub fn to_i32(self) -> i32 {
        match self {
            NoteEventType::Good => 0,
            NoteEventType::Bad => 1,
            NoteEventType::Miss => 2,
            NoteEventType::Bomb => 3,
            NoteEventType::Other(value) => value,
        }
    }

    /// Parse the wire value; unknown values become [`NoteEventType::Other`]
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => NoteEventType::Good,
            1 => NoteEventType::Bad,
            2 => NoteEventType::Miss,
            3 => NoteEventType::Bomb,
            other => NoteEventType::Other(other),
        }
    }

    /// Whether events of this kind carry a [`NoteCutInfo`]
    pub fn has_cut_info(self) -> bool {
        matches!(self, NoteEventType::Good | NoteEventType::Bad)
    }
}

/// 3-D vector in game units
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

/// Rotation quaternion
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Quaternion {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
    /// Scalar component
    pub w: f32,
}

/// Position and rotation of a tracked device
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    /// Device position
    pub position: Vector3,
    /// Device rotation
    pub rotation: Quaternion,
}

/// Details of a saber cut
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NoteCutInfo {
    /// Saber moved fast enough
    pub speed_ok: bool,
    /// Cut followed the note's arrow
    pub direction_ok: bool,
    /// Note was cut with the matching saber color
    pub saber_type_ok: bool,
    /// Note was cut before it was allowed to be
    pub was_cut_too_soon: bool,
    /// Saber speed at the cut
    pub saber_speed: f32,
    /// Saber movement direction at the cut
    pub saber_dir: Vector3,
    /// Which saber cut the note (0 left, 1 right)
    pub saber_type: i32,
    /// Offset from the note's ideal hit time
    pub time_deviation: f32,
    /// Angle between the cut and the arrow direction
    pub cut_dir_deviation: f32,
    /// Where the blade intersected the note
    pub cut_point: Vector3,
    /// Normal of the cut plane
    pub cut_normal: Vector3,
    /// Distance from the blade's swing plane to the note's center
    pub cut_distance_to_center: f32,
    /// Angle of the cut plane
    pub cut_angle: f32,
    /// Swing rating before the cut
    pub before_cut_rating: f32,
    /// Swing rating after the cut
    pub after_cut_rating: f32,
}

/// One recorded note interaction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteEvent {
    /// Encoded note identifier (line, layer, color, direction)
    pub note_id: i32,
    /// Time of the interaction
    pub event_time: f32,
    /// Time the note spawned
    pub spawn_time: f32,
    /// Interaction kind
    pub event_type: NoteEventType,
    /// Present exactly when `event_type` is good or bad
    pub cut: Option<NoteCutInfo>,
}

/// Header section of a replay
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReplayInfo {
    /// Recording mod version
    pub version: String,
    /// Game version
    pub game_version: String,
    /// Unix timestamp of the play, as text
    pub timestamp: String,
    /// Player identifier
    pub player_id: String,
    /// Player display name
    pub player_name: String,
    /// Store platform (e.g., "steam", "oculus")
    pub platform: String,
    /// Tracking system name
    pub tracking_system: String,
    /// Headset model
    pub hmd: String,
    /// Controller model
    pub controller: String,
    /// Map hash
    pub hash: String,
    /// Song name
    pub song_name: String,
    /// Map author
    pub mapper: String,
    /// Difficulty name
    pub difficulty: String,
    /// Final score
    pub score: i32,
    /// Characteristic (e.g., "Standard")
    pub mode: String,
    /// Environment name
    pub environment: String,
    /// Comma-separated modifier codes
    pub modifiers: String,
    /// Note jump distance
    pub jump_distance: f32,
    /// Left-handed mode enabled
    pub left_handed: bool,
    /// Player height
    pub height: f32,
    /// Practice start time
    pub start_time: f32,
    /// Time of failure, `0` if the map was passed
    pub fail_time: f32,
    /// Practice speed multiplier
    pub speed: f32,
}

/// Tracking sample
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frame {
    /// Song time of the sample
    pub time: f32,
    /// Frame rate at the sample
    pub fps: i32,
    /// Headset pose
    pub head: Transform,
    /// Left controller pose
    pub left_hand: Transform,
    /// Right controller pose
    pub right_hand: Transform,
}

/// One recorded wall interaction
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WallEvent {
    /// Encoded wall identifier
    pub wall_id: i32,
    /// Player energy after the hit
    pub energy: f32,
    /// Time of the interaction
    pub time: f32,
    /// Time the wall spawned
    pub spawn_time: f32,
}

/// Automatic player height change
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AutomaticHeight {
    /// New height
    pub height: f32,
    /// Time of the change
    pub time: f32,
}

/// A pause during the play
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pause {
    /// Pause length as recorded by the game
    pub duration: i64,
    /// Song time at which the game was paused
    pub time: f32,
}

/// Controller offsets applied by the player's settings
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControllerOffsets {
    /// Left controller offset
    pub left: Transform,
    /// Right controller offset
    pub right: Transform,
}

/// Opaque key/value blob written by mods
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserData {
    /// Entry key
    pub key: String,
    /// Raw entry contents
    pub bytes: Vec<u8>,
}

/// A fully decoded replay
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Replay {
    /// Format version byte
    pub version: u8,
    /// Header section
    pub info: ReplayInfo,
    /// Tracking samples
    pub frames: Vec<Frame>,
    /// Note interactions in recording order
    pub notes: Vec<NoteEvent>,
    /// Wall interactions
    pub walls: Vec<WallEvent>,
    /// Automatic height changes
    pub heights: Vec<AutomaticHeight>,
    /// Pauses
    pub pauses: Vec<Pause>,
    /// Controller offsets, if recorded
    pub controller_offsets: Option<ControllerOffsets>,
    /// Mod user data entries
    pub user_data: Vec<UserData>,
}
