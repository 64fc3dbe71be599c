//! Sound snapshot interface for the caption overlay
//!
//! This module describes what the overlay needs to know about the host's
//! audio: which sounds are playing, where, how loud and how far they carry.
//!
//! # Architecture
//!
//! - `SoundInstance` is one playing sound as reported by the host
//! - `PlayerContext` carries the listener position and facing
//! - `SoundFeed` trait is the polling capability the host implements

pub mod feed;
pub mod types;

pub use feed::{SilentFeed, SoundFeed};
pub use types::{
    PlayerContext, SoundCategory, SoundInstance, Vec3, SOUND_FILE_EXTENSION, SOUND_PATH_PREFIX,
};
