//! Core caption types.
//!
//! `Channel` is an immutable value copied out of the channel directory.
//! `PerceivedSound` is the classifier's per-tick output and `Caption` is
//! the aggregated entry the engine keeps alive between ticks.

use std::fmt;

use serde::Deserialize;

use crate::sound::Vec3;

/// Milliseconds on the host's monotonic clock
pub type Millis = u64;

/// Priority given to sounds whose channel is not listed in any guide
pub const DEFAULT_PRIORITY: i32 = 1;

/// A group of sound ids competing for a single caption slot.
///
/// Lower `priority` values are more urgent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Channel {
    /// Shared caption text for the channel; `None` until resolved
    #[serde(default, rename = "name")]
    pub display_name: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

impl Default for Channel {
    fn default() -> Self {
        Self {
            display_name: None,
            priority: DEFAULT_PRIORITY,
            tags: Vec::new(),
        }
    }
}

impl Channel {
    pub fn new(display_name: Option<&str>, priority: i32) -> Self {
        Self {
            display_name: display_name.map(str::to_string),
            priority,
            tags: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Copy of this channel named after `sound_name` if it has no name yet
    pub fn resolved(&self, sound_name: &str) -> Channel {
        let mut channel = self.clone();
        if channel.display_name.is_none() {
            channel.display_name = Some(sound_name.to_string());
        }
        channel
    }

    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("")
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Whether a sound on `self` should take over a slot held by `current`
    pub fn outranks(&self, audibility: f32, current: &Channel, current_audibility: f32) -> bool {
        self.priority < current.priority
            || (self.priority == current.priority && audibility > current_audibility)
    }
}

/// Coarse urgency of a caption, chosen by a sigil on its localized name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlertLevel {
    /// `~` prefix: background ambience
    Environmental,
    #[default]
    Normal,
    /// `+` prefix
    Notice,
    /// `!` prefix
    Warning,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Environmental => "environmental",
            AlertLevel::Normal => "normal",
            AlertLevel::Notice => "notice",
            AlertLevel::Warning => "warning",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified sound ready for aggregation
#[derive(Debug, Clone, PartialEq)]
pub struct PerceivedSound {
    /// Normalized sound id, e.g. `walk/grass`
    pub id: String,
    pub display_name: String,
    /// Resolved channel; always carries a display name
    pub channel: Channel,
    pub alert_level: AlertLevel,
    /// Ease-of-hearing score in [0, 1]
    pub audibility: f32,
    /// `None` for non-positional sounds
    pub world_position: Option<Vec3>,
    pub heard_at: Millis,
}

/// One aggregated caption row
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub display_name: String,
    pub channel: Channel,
    pub alert_level: AlertLevel,
    pub audibility: f32,
    pub world_position: Option<Vec3>,
    pub last_heard_at: Millis,
}

impl Caption {
    /// Seconds since the caption was last refreshed; never negative
    pub fn age(&self, now: Millis) -> f64 {
        now.saturating_sub(self.last_heard_at) as f64 / 1000.0
    }

    /// Whether `sound` belongs to this caption's slot, by name or channel
    pub fn matches(&self, sound: &PerceivedSound) -> bool {
        self.display_name == sound.display_name || self.channel.name() == sound.channel.name()
    }

    /// Replace the shown content with `sound`'s
    pub fn take_content(&mut self, sound: &PerceivedSound) {
        self.display_name = sound.display_name.clone();
        self.channel = sound.channel.clone();
        self.alert_level = sound.alert_level;
        self.audibility = sound.audibility;
        self.world_position = sound.world_position;
    }
}

impl From<PerceivedSound> for Caption {
    fn from(sound: PerceivedSound) -> Self {
        Self {
            display_name: sound.display_name,
            channel: sound.channel,
            alert_level: sound.alert_level,
            audibility: sound.audibility,
            world_position: sound.world_position,
            last_heard_at: sound.heard_at,
        }
    }
}
