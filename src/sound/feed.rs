//! Sound feed - the host capability the overlay polls once per tick.
//!
//! The host exposes its set of currently-playing sounds through this trait.
//! The overlay only ever sees a snapshot; sounds that start and stop between
//! two polls are missed unless the host also reports them through
//! `Overlay::notify_started`.

use super::types::SoundInstance;

/// Source of currently-playing sounds
pub trait SoundFeed {
    /// Snapshot of the sounds playing right now, in the host's own order
    fn active_sounds(&self) -> Vec<SoundInstance>;
}

impl SoundFeed for [SoundInstance] {
    fn active_sounds(&self) -> Vec<SoundInstance> {
        self.to_vec()
    }
}

impl SoundFeed for Vec<SoundInstance> {
    fn active_sounds(&self) -> Vec<SoundInstance> {
        self.clone()
    }
}

/// Feed that never reports anything (host not ready, menus, etc.)
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentFeed;

impl SoundFeed for SilentFeed {
    fn active_sounds(&self) -> Vec<SoundInstance> {
        Vec::new()
    }
}
