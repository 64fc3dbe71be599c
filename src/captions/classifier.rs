//! Sound classifier
//!
//! Turns one raw [`SoundInstance`] into a [`PerceivedSound`] or rejects it.
//! Rejection is ordinary control flow: most sounds in a busy scene are
//! music, out of range or too quiet to be worth a caption.

use crate::resource::{ChannelDirectory, Localizer};
use crate::sound::{PlayerContext, SoundInstance, SOUND_FILE_EXTENSION, SOUND_PATH_PREFIX};

use super::types::{AlertLevel, Millis, PerceivedSound};

/// Sounds quieter than this are never captioned
pub const AUDIBILITY_THRESHOLD: f32 = 0.1;

/// Namespace of caption names in the string bank
pub const CAPTION_KEY_PREFIX: &str = "captions:";

/// Why a sound produced no caption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No player yet (host still loading)
    NoPlayer,
    Music,
    /// Localized name is empty
    Silenced,
    OutOfRange,
    Inaudible,
    /// Channel carries a tag the user chose to hide
    IgnoredTag,
}

/// Normalize an asset path into a sound id.
///
/// `sounds/walk/grass_03.ogg` becomes `walk/grass`: the directory prefix
/// and extension are removed, then trailing digits and `_` separators, so
/// numbered variants of one sound share an id.
pub fn normalize_sound_id(path: &str) -> &str {
    let id = path.strip_prefix(SOUND_PATH_PREFIX).unwrap_or(path);
    let id = id.strip_suffix(SOUND_FILE_EXTENSION).unwrap_or(id);
    id.trim_end_matches(|c: char| c.is_ascii_digit() || c == '_')
}

/// Split leading alert sigils off a localized name.
///
/// Checked in order `!`, `+`, `~`, `?`; each one present is consumed.
/// `?` only strips itself and leaves the level alone.
pub fn parse_alert_sigils(name: &str) -> (AlertLevel, &str) {
    let mut level = AlertLevel::Normal;
    let mut rest = name;

    if let Some(r) = rest.strip_prefix('!') {
        level = AlertLevel::Warning;
        rest = r;
    }
    if let Some(r) = rest.strip_prefix('+') {
        level = AlertLevel::Notice;
        rest = r;
    }
    if let Some(r) = rest.strip_prefix('~') {
        level = AlertLevel::Environmental;
        rest = r;
    }
    if let Some(r) = rest.strip_prefix('?') {
        rest = r;
    }

    (level, rest)
}

/// Distance-attenuated loudness in [0, 1].
///
/// A zero `range` only admits sounds at zero distance, which keep their
/// full volume.
pub fn audibility(distance: f32, range: f32, volume: f32) -> f32 {
    let falloff = if range > 0.0 {
        1.0 - distance / range
    } else {
        1.0
    };
    (falloff * volume).clamp(0.0, 1.0)
}

/// Classifier bound to the lookups it needs for one tick
pub struct Classifier<'a> {
    localizer: &'a dyn Localizer,
    channels: &'a ChannelDirectory,
    ignored_tags: &'a [String],
}

impl<'a> Classifier<'a> {
    pub fn new(
        localizer: &'a dyn Localizer,
        channels: &'a ChannelDirectory,
        ignored_tags: &'a [String],
    ) -> Self {
        Self {
            localizer,
            channels,
            ignored_tags,
        }
    }

    /// Classify one sound heard at `now`
    pub fn classify(
        &self,
        sound: &SoundInstance,
        player: Option<&PlayerContext>,
        now: Millis,
    ) -> Result<PerceivedSound, Rejection> {
        let player = player.ok_or(Rejection::NoPlayer)?;

        if sound.category.is_music() {
            return Err(Rejection::Music);
        }

        let id = normalize_sound_id(&sound.path);

        let key = format!("{}{}", CAPTION_KEY_PREFIX, id);
        let resolved = self.localizer.resolve(&key).unwrap_or_else(|| id.to_string());
        let (alert_level, name) = parse_alert_sigils(&resolved);
        if name.is_empty() {
            return Err(Rejection::Silenced);
        }

        let world_position = sound.world_position();
        let distance = world_position
            .map(|pos| player.position.distance_to(&pos))
            .unwrap_or(0.0);

        if !sound.range.is_finite() || distance.is_nan() || distance > sound.range {
            return Err(Rejection::OutOfRange);
        }

        let audibility = audibility(distance, sound.range, sound.volume);
        if audibility.is_nan() || audibility < AUDIBILITY_THRESHOLD {
            return Err(Rejection::Inaudible);
        }

        let channel = self.channels.lookup(id).resolved(name);
        if self.ignored_tags.iter().any(|tag| channel.has_tag(tag)) {
            return Err(Rejection::IgnoredTag);
        }

        Ok(PerceivedSound {
            id: id.to_string(),
            display_name: name.to_string(),
            channel,
            alert_level,
            audibility,
            world_position,
            heard_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captions::types::{Channel, DEFAULT_PRIORITY};
    use crate::resource::ChannelTable;
    use crate::sound::{SoundCategory, Vec3};
    use proptest::prelude::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn player() -> PlayerContext {
        PlayerContext::new(Vec3::ZERO, 0.0)
    }

    fn no_strings() -> HashMap<String, String> {
        HashMap::new()
    }

    fn lang(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn channels(entries: &[(&str, Channel)]) -> ChannelDirectory {
        let table: ChannelTable = entries
            .iter()
            .map(|(k, c)| (k.to_string(), c.clone()))
            .collect();
        ChannelDirectory::from_table(table)
    }

    #[rstest]
    #[case("sounds/footstep_grass_03.ogg", "footstep_grass")]
    #[case("sounds/footstep_grass_7.ogg", "footstep_grass")]
    #[case("sounds/ambient/rain_1.ogg", "ambient/rain")]
    #[case("sounds/walk/grass3.ogg", "walk/grass")]
    #[case("sounds/door.ogg", "door")]
    #[case("effect/bell.wav", "effect/bell.wav")]
    #[case("footstep_grass", "footstep_grass")]
    fn test_normalize_sound_id(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(normalize_sound_id(path), expected);
    }

    #[rstest]
    #[case("!Creeper hissing", AlertLevel::Warning, "Creeper hissing")]
    #[case("+Chest opens", AlertLevel::Notice, "Chest opens")]
    #[case("~Wind", AlertLevel::Environmental, "Wind")]
    #[case("?Click", AlertLevel::Normal, "Click")]
    #[case("Door", AlertLevel::Normal, "Door")]
    #[case("!?Alarm", AlertLevel::Warning, "Alarm")]
    #[case("a!b", AlertLevel::Normal, "a!b")]
    fn test_parse_alert_sigils(
        #[case] name: &str,
        #[case] level: AlertLevel,
        #[case] rest: &str,
    ) {
        assert_eq!(parse_alert_sigils(name), (level, rest));
    }

    #[test]
    fn test_rejects_without_player() {
        let dir = channels(&[]);
        let strings = no_strings();
        let c = Classifier::new(&strings, &dir, &[]);
        let sound = SoundInstance::new("sounds/door.ogg", 1.0, 10.0);
        assert_eq!(c.classify(&sound, None, 0), Err(Rejection::NoPlayer));
    }

    #[test]
    fn test_rejects_music_even_when_loud_and_close() {
        let dir = channels(&[]);
        let strings = no_strings();
        let c = Classifier::new(&strings, &dir, &[]);
        let sound =
            SoundInstance::new("sounds/door.ogg", 1.0, 100.0).with_category(SoundCategory::Music);
        assert_eq!(
            c.classify(&sound, Some(&player()), 0),
            Err(Rejection::Music)
        );
    }

    #[test]
    fn test_empty_translation_silences() {
        let dir = channels(&[]);
        let l = lang(&[("captions:tick", "")]);
        let c = Classifier::new(&l, &dir, &[]);
        let sound = SoundInstance::new("sounds/tick2.ogg", 1.0, 10.0);
        assert_eq!(
            c.classify(&sound, Some(&player()), 0),
            Err(Rejection::Silenced)
        );
    }

    #[rstest]
    #[case("")]
    #[case("!")]
    #[case("+~")]
    #[case("?")]
    fn test_blank_names_silence(#[case] localized: &str) {
        let dir = channels(&[]);
        let l = lang(&[("captions:door", localized)]);
        let c = Classifier::new(&l, &dir, &[]);
        let sound = SoundInstance::new("sounds/door.ogg", 1.0, 10.0);
        assert_eq!(
            c.classify(&sound, Some(&player()), 0),
            Err(Rejection::Silenced)
        );
    }

    #[test]
    fn test_non_finite_range_is_out_of_range() {
        let dir = channels(&[]);
        let strings = no_strings();
        let c = Classifier::new(&strings, &dir, &[]);
        for range in [f32::NAN, f32::INFINITY] {
            let sound =
                SoundInstance::new("sounds/door.ogg", 1.0, range).at(Vec3::new(1000.0, 0.0, 0.0));
            assert_eq!(
                c.classify(&sound, Some(&player()), 0),
                Err(Rejection::OutOfRange)
            );
        }
    }

    #[test]
    fn test_nan_volume_is_inaudible() {
        let dir = channels(&[]);
        let strings = no_strings();
        let c = Classifier::new(&strings, &dir, &[]);
        let sound = SoundInstance::new("sounds/door.ogg", f32::NAN, 10.0);
        assert_eq!(
            c.classify(&sound, Some(&player()), 0),
            Err(Rejection::Inaudible)
        );
    }

    #[test]
    fn test_out_of_range() {
        let dir = channels(&[]);
        let strings = no_strings();
        let c = Classifier::new(&strings, &dir, &[]);
        let sound = SoundInstance::new("sounds/door.ogg", 1.0, 10.0).at(Vec3::new(10.5, 0.0, 0.0));
        assert_eq!(
            c.classify(&sound, Some(&player()), 0),
            Err(Rejection::OutOfRange)
        );
    }

    #[test]
    fn test_inaudible() {
        let dir = channels(&[]);
        let strings = no_strings();
        let c = Classifier::new(&strings, &dir, &[]);
        // (1 - 9.5/10) * 1.0 = 0.05
        let sound = SoundInstance::new("sounds/door.ogg", 1.0, 10.0).at(Vec3::new(0.0, 0.0, 9.5));
        assert_eq!(
            c.classify(&sound, Some(&player()), 0),
            Err(Rejection::Inaudible)
        );
    }

    #[test]
    fn test_rain_scenario() {
        let dir = channels(&[]);
        let strings = no_strings();
        let c = Classifier::new(&strings, &dir, &[]);
        let sound =
            SoundInstance::new("sounds/ambient/rain_1.ogg", 0.8, 10.0).at(Vec3::new(2.0, 0.0, 0.0));

        let perceived = c.classify(&sound, Some(&player()), 1234).unwrap();
        assert_eq!(perceived.id, "ambient/rain");
        assert_eq!(perceived.display_name, "ambient/rain");
        assert_eq!(perceived.alert_level, AlertLevel::Normal);
        assert!((perceived.audibility - 0.64).abs() < 1e-6);
        assert_eq!(perceived.world_position, Some(Vec3::new(2.0, 0.0, 0.0)));
        assert_eq!(perceived.heard_at, 1234);
        assert_eq!(perceived.channel.name(), "ambient/rain");
        assert_eq!(perceived.channel.priority, DEFAULT_PRIORITY);
    }

    #[test]
    fn test_zero_position_is_non_directional() {
        let dir = channels(&[]);
        let strings = no_strings();
        let c = Classifier::new(&strings, &dir, &[]);
        let far_player = PlayerContext::new(Vec3::new(500.0, 0.0, 500.0), 0.0);
        let sound = SoundInstance::new("sounds/ui/click.ogg", 0.5, 1.0).at(Vec3::ZERO);

        let perceived = c.classify(&sound, Some(&far_player), 0).unwrap();
        assert!(perceived.world_position.is_none());
        assert_eq!(perceived.audibility, 0.5);
    }

    #[test]
    fn test_localized_name_and_channel() {
        let dir = channels(&[("walk/grass", Channel::new(Some("Footsteps"), 4))]);
        let l = lang(&[("captions:walk/grass", "~Grass rustles")]);
        let c = Classifier::new(&l, &dir, &[]);
        let sound = SoundInstance::new("sounds/walk/grass4.ogg", 1.0, 10.0);

        let perceived = c.classify(&sound, Some(&player()), 0).unwrap();
        assert_eq!(perceived.display_name, "Grass rustles");
        assert_eq!(perceived.alert_level, AlertLevel::Environmental);
        assert_eq!(perceived.channel, Channel::new(Some("Footsteps"), 4));
    }

    #[test]
    fn test_ignored_tag() {
        let dir = channels(&[(
            "walk/grass",
            Channel::new(None, 4).with_tags(&["footsteps"]),
        )]);
        let ignored = vec!["footsteps".to_string()];
        let strings = no_strings();
        let c = Classifier::new(&strings, &dir, &ignored);
        let sound = SoundInstance::new("sounds/walk/grass1.ogg", 1.0, 10.0);
        assert_eq!(
            c.classify(&sound, Some(&player()), 0),
            Err(Rejection::IgnoredTag)
        );

        let strings = no_strings();
        let c = Classifier::new(&strings, &dir, &[]);
        assert!(c.classify(&sound, Some(&player()), 0).is_ok());
    }

    #[test]
    fn test_zero_range_ambient() {
        assert_eq!(audibility(0.0, 0.0, 0.7), 0.7);
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(
            id in "[a-m_]{0,10}[a-m](/[a-m_]{0,10}[a-m])?",
            digits in "[0-9]{0,3}",
        ) {
            let path = format!("sounds/{}{}.ogg", id, digits);
            let once = normalize_sound_id(&path);
            prop_assert_eq!(normalize_sound_id(once), once);
        }

        #[test]
        fn prop_audibility_non_increasing_in_distance(
            a in 0.0f32..100.0,
            b in 0.0f32..100.0,
            range in 0.1f32..100.0,
            volume in 0.0f32..1.0,
        ) {
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(audibility(near, range, volume) >= audibility(far, range, volume));
        }

        #[test]
        fn prop_beyond_range_always_rejected(extra in 0.01f32..50.0, range in 0.5f32..50.0) {
            let dir = ChannelDirectory::from_table(ChannelTable::new());
            let strings = no_strings();
            let c = Classifier::new(&strings, &dir, &[]);
            let sound = SoundInstance::new("sounds/door.ogg", 1.0, range)
                .at(Vec3::new(range + extra, 0.0, 0.0));
            prop_assert_eq!(c.classify(&sound, Some(&player()), 0), Err(Rejection::OutOfRange));
        }
    }
}
