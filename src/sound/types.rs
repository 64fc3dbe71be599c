// types.rs - Host-facing sound snapshot types

//! Types describing the sounds the host engine is currently playing.
//!
//! The overlay never talks to an audio backend directly. The host hands it
//! plain snapshots of each playing sound once per tick; these are the only
//! fields the caption pipeline needs.

use serde::Deserialize;

/// Resource path prefix stripped from every sound location.
pub const SOUND_PATH_PREFIX: &str = "sounds/";

/// File extension stripped from every sound location.
pub const SOUND_FILE_EXTENSION: &str = ".ogg";

/// World-space position or direction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// Origin; also the host's sentinel for "no position".
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    pub fn distance_to(&self, other: &Vec3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Mixer category a sound is played under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCategory {
    #[default]
    Sound,
    Ambient,
    Weather,
    Entity,
    Music,
}

impl SoundCategory {
    pub fn is_music(self) -> bool {
        self == SoundCategory::Music
    }
}

/// One currently-playing sound, as reported by the host
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SoundInstance {
    /// Asset path, e.g. `sounds/walk/grass3.ogg`
    pub path: String,
    #[serde(default)]
    pub category: SoundCategory,
    /// World position; `None` or zero means non-positional
    #[serde(default)]
    pub position: Option<Vec3>,
    /// Playback volume (0.0-1.0)
    pub volume: f32,
    /// Distance at which the sound becomes inaudible
    pub range: f32,
    /// Liveness flag; stopped handles are skipped
    #[serde(default = "default_playing")]
    pub playing: bool,
}

fn default_playing() -> bool {
    true
}

impl SoundInstance {
    /// Create a playing, non-positional sound
    pub fn new(path: &str, volume: f32, range: f32) -> Self {
        Self {
            path: path.to_string(),
            category: SoundCategory::Sound,
            position: None,
            volume,
            range,
            playing: true,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_category(mut self, category: SoundCategory) -> Self {
        self.category = category;
        self
    }

    pub fn stopped(mut self) -> Self {
        self.playing = false;
        self
    }

    /// Position if the sound is positional, treating the zero vector as absent
    pub fn world_position(&self) -> Option<Vec3> {
        self.position.filter(|p| !p.is_zero())
    }
}

/// Listener state needed to classify and place sounds
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct PlayerContext {
    pub position: Vec3,
    /// Facing in radians, clockwise from +Z toward +X seen from above
    pub yaw: f32,
}

impl PlayerContext {
    pub const fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }
}
