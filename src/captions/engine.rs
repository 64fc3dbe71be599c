//! Caption aggregation engine
//!
//! Keeps the set of live captions. Each tick the classified sounds are
//! folded in one by one, then captions not heard for longer than the
//! configured duration are swept out.
//!
//! A sound joins an existing caption when either its display name or its
//! channel name matches; the first such caption wins. Joining always resets
//! the caption's age. The shown content is only replaced when the new sound
//! is on a more urgent channel, or on an equally urgent one and strictly
//! louder. Captions keep their insertion order so rows stay put on screen.
//!
//! The set is unbounded; the projector decides how many rows fit.

use super::types::{Caption, Millis, PerceivedSound};

/// What happened to a sound fed into the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Appended as a new caption at this index
    Added(usize),
    /// Took over the caption at this index
    Replaced(usize),
    /// Only refreshed the caption at this index
    Refreshed(usize),
}

/// Owner of the live caption set
#[derive(Debug, Clone)]
pub struct CaptionEngine {
    captions: Vec<Caption>,
    /// Seconds a caption survives without being heard
    duration: f64,
}

impl CaptionEngine {
    pub fn new(duration: f64) -> Self {
        Self {
            captions: Vec::new(),
            duration: duration.max(0.0),
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration.max(0.0);
    }

    /// Fold one tick's sounds in, then drop expired captions
    pub fn sync<I>(&mut self, sounds: I, now: Millis)
    where
        I: IntoIterator<Item = PerceivedSound>,
    {
        for sound in sounds {
            self.ingest(sound);
        }
        self.sweep(now);
    }

    /// Merge a single sound into the set
    pub fn ingest(&mut self, sound: PerceivedSound) -> Admission {
        if let Some(index) = self.captions.iter().position(|c| c.matches(&sound)) {
            let caption = &mut self.captions[index];
            caption.last_heard_at = caption.last_heard_at.max(sound.heard_at);

            if sound
                .channel
                .outranks(sound.audibility, &caption.channel, caption.audibility)
            {
                log::debug!(
                    "[CAPTION] '{}' replaced by '{}' in channel '{}'",
                    caption.display_name,
                    sound.display_name,
                    sound.channel.name()
                );
                caption.take_content(&sound);
                return Admission::Replaced(index);
            }
            return Admission::Refreshed(index);
        }

        log::debug!(
            "[CAPTION] New caption: '{}' in channel '{}' ({}, audibility {:.2})",
            sound.display_name,
            sound.channel.name(),
            sound.alert_level,
            sound.audibility
        );
        self.captions.push(Caption::from(sound));
        Admission::Added(self.captions.len() - 1)
    }

    /// Remove every caption older than the duration; returns how many went
    pub fn sweep(&mut self, now: Millis) -> usize {
        let duration = self.duration;
        let before = self.captions.len();
        self.captions.retain(|caption| {
            let keep = caption.age(now) <= duration;
            if !keep {
                log::debug!("[CAPTION] Expired: '{}'", caption.display_name);
            }
            keep
        });
        before - self.captions.len()
    }

    /// Live captions in insertion order
    pub fn captions(&self) -> &[Caption] {
        &self.captions
    }

    pub fn len(&self) -> usize {
        self.captions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captions.is_empty()
    }

    pub fn clear(&mut self) {
        self.captions.clear();
    }
}

impl Default for CaptionEngine {
    fn default() -> Self {
        Self::new(4.0)
    }
}
