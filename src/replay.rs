//! Recorded sound sessions
//!
//! A replay is a JSON document listing what the host reported on each
//! frame: the player, the snapshot of playing sounds and any start
//! notifications. The `captions` binary feeds it through an [`Overlay`]
//! to preview the caption feed without a running game.
//!
//! ```json
//! { "frames": [
//!     { "time_ms": 0,
//!       "player": { "position": { "x": 0, "y": 0, "z": 0 }, "yaw": 0 },
//!       "sounds": [ { "path": "sounds/door.ogg", "volume": 1, "range": 16 } ] }
//! ] }
//! ```
//!
//! [`Overlay`]: crate::overlay::Overlay

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::captions::Millis;
use crate::sound::{PlayerContext, SoundInstance};

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("cannot read replay {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed replay: {0}")]
    Json(#[from] serde_json::Error),
    #[error("frame {index} goes back in time ({time_ms} ms after {previous_ms} ms)")]
    TimeReversed {
        index: usize,
        time_ms: Millis,
        previous_ms: Millis,
    },
}

/// One recorded host frame
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayFrame {
    pub time_ms: Millis,
    /// Absent while the host is still loading
    #[serde(default)]
    pub player: Option<PlayerContext>,
    /// Snapshot of playing sounds
    #[serde(default)]
    pub sounds: Vec<SoundInstance>,
    /// Sounds reported as started since the previous frame
    #[serde(default)]
    pub started: Vec<SoundInstance>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Replay {
    pub frames: Vec<ReplayFrame>,
}

impl Replay {
    pub fn parse(content: &str) -> Result<Self, ReplayError> {
        let replay: Replay = serde_json::from_str(content)?;
        replay.validate()?;
        Ok(replay)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Frame times must never decrease
    fn validate(&self) -> Result<(), ReplayError> {
        for (index, pair) in self.frames.windows(2).enumerate() {
            if pair[1].time_ms < pair[0].time_ms {
                return Err(ReplayError::TimeReversed {
                    index: index + 1,
                    time_ms: pair[1].time_ms,
                    previous_ms: pair[0].time_ms,
                });
            }
        }
        Ok(())
    }

    pub fn duration_ms(&self) -> Millis {
        self.frames.last().map(|f| f.time_ms).unwrap_or(0)
    }
}
