//! Caption overlay context
//!
//! One `Overlay` is built at startup and driven by the host once per frame:
//! `tick` polls the sound feed and updates the caption set, `render` paints
//! it. Everything the pipeline needs (settings, channel directory, caption
//! names, the engine itself) lives here rather than in globals.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::captions::{Caption, CaptionEngine, Classifier, Millis, PerceivedSound};
use crate::config::{load_config_or_default, CaptionsConfig};
use crate::graphics::{DrawCommand, DrawSurface, RenderProjector, TextMeasure, Viewport};
use crate::resource::{ChannelDirectory, ChannelError, Localizer};
use crate::sound::{PlayerContext, SoundFeed, SoundInstance};

pub struct Overlay {
    config: CaptionsConfig,
    config_dir: Option<PathBuf>,
    channels: Arc<ChannelDirectory>,
    strings: Box<dyn Localizer>,
    engine: CaptionEngine,
    /// Sounds reported through `notify_started` since the last tick
    pending: Vec<SoundInstance>,
}

impl Overlay {
    pub fn new(
        config: CaptionsConfig,
        channels: Arc<ChannelDirectory>,
        strings: Box<dyn Localizer>,
    ) -> Self {
        let engine = CaptionEngine::new(config.duration as f64);
        Self {
            config,
            config_dir: None,
            channels,
            strings,
            engine,
            pending: Vec::new(),
        }
    }

    /// Remember where the settings live so `reload_config` can re-read them
    pub fn with_config_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.config_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn config(&self) -> &CaptionsConfig {
        &self.config
    }

    pub fn channels(&self) -> &Arc<ChannelDirectory> {
        &self.channels
    }

    pub fn captions(&self) -> &[Caption] {
        self.engine.captions()
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Host callback for a sound that just started playing
    pub fn notify_started(&mut self, sound: SoundInstance) {
        if self.config.enabled {
            self.pending.push(sound);
        }
    }

    /// Classify everything heard this tick without touching the caption set
    pub fn classify_tick(
        &mut self,
        feed: &dyn SoundFeed,
        player: Option<&PlayerContext>,
        now: Millis,
    ) -> Vec<PerceivedSound> {
        let classifier = Classifier::new(
            self.strings.as_ref(),
            &self.channels,
            &self.config.ignored_tags,
        );

        let polled = feed.active_sounds();
        self.pending
            .drain(..)
            .chain(polled.into_iter().filter(|s| s.playing))
            .filter_map(|sound| match classifier.classify(&sound, player, now) {
                Ok(perceived) => Some(perceived),
                Err(reason) => {
                    log::trace!("Ignoring {}: {:?}", sound.path, reason);
                    None
                }
            })
            .collect()
    }

    /// Poll the feed and update the caption set
    pub fn tick(&mut self, feed: &dyn SoundFeed, player: Option<&PlayerContext>, now: Millis) {
        if !self.config.enabled {
            self.pending.clear();
            return;
        }
        let heard = self.classify_tick(feed, player, now);
        self.engine.sync(heard, now);
    }

    /// Draw commands for the current caption set
    pub fn frame(
        &self,
        metrics: &dyn TextMeasure,
        viewport: Viewport,
        player: Option<&PlayerContext>,
        now: Millis,
    ) -> Vec<DrawCommand> {
        if !self.config.enabled {
            return Vec::new();
        }
        RenderProjector::new(&self.config, metrics, viewport).project(
            self.engine.captions(),
            player,
            now,
        )
    }

    /// Paint the current caption set onto `surface`
    pub fn render(
        &self,
        surface: &mut dyn DrawSurface,
        metrics: &dyn TextMeasure,
        viewport: Viewport,
        player: Option<&PlayerContext>,
        now: Millis,
    ) {
        let commands = self.frame(metrics, viewport, player, now);
        surface.submit(&commands);
    }

    /// Swap in new settings
    pub fn set_config(&mut self, config: CaptionsConfig) {
        self.engine.set_duration(config.duration as f64);
        if !config.enabled {
            self.engine.clear();
            self.pending.clear();
        }
        self.config = config;
    }

    /// Re-read settings from the config directory, if one was given
    pub fn reload_config(&mut self) {
        if let Some(dir) = &self.config_dir {
            let config = load_config_or_default(dir);
            self.set_config(config);
        }
    }

    /// Rebuild the channel directory from disk
    pub fn reload_channels(&self) -> Result<usize, ChannelError> {
        self.channels.reload()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captions::{AlertLevel, Channel};
    use crate::graphics::{Color, CommandRecorder, FixedAdvance};
    use crate::resource::{ChannelTable, StringBank};
    use crate::sound::{SilentFeed, Vec3};

    fn overlay(table: ChannelTable, lang: &str) -> Overlay {
        let mut strings = StringBank::new();
        strings.load_table_from_string("en", lang);
        Overlay::new(
            CaptionsConfig::default(),
            Arc::new(ChannelDirectory::from_table(table)),
            Box::new(strings),
        )
    }

    fn player() -> PlayerContext {
        PlayerContext::new(Vec3::ZERO, 0.0)
    }

    #[test]
    fn test_tick_creates_caption() {
        let mut o = overlay(ChannelTable::new(), "");
        let feed = vec![SoundInstance::new("sounds/ambient/rain_1.ogg", 0.8, 10.0)
            .at(Vec3::new(0.0, 0.0, 2.0))];

        o.tick(&feed, Some(&player()), 0);
        assert_eq!(o.captions().len(), 1);
        assert_eq!(o.captions()[0].display_name, "ambient/rain");
    }

    #[test]
    fn test_stopped_sounds_are_ignored() {
        let mut o = overlay(ChannelTable::new(), "");
        let feed = vec![SoundInstance::new("sounds/door.ogg", 1.0, 10.0).stopped()];
        o.tick(&feed, Some(&player()), 0);
        assert!(o.captions().is_empty());
    }

    #[test]
    fn test_no_player_no_captions() {
        let mut o = overlay(ChannelTable::new(), "");
        let feed = vec![SoundInstance::new("sounds/door.ogg", 1.0, 10.0)];
        o.tick(&feed, None, 0);
        assert!(o.captions().is_empty());
    }

    #[test]
    fn test_notified_sound_is_captioned_once_stopped() {
        let mut o = overlay(ChannelTable::new(), "");
        o.notify_started(SoundInstance::new("sounds/click.ogg", 1.0, 10.0));
        o.tick(&SilentFeed, Some(&player()), 0);
        assert_eq!(o.captions().len(), 1);

        // Pending queue was drained
        o.tick(&SilentFeed, Some(&player()), 100);
        assert_eq!(o.captions()[0].last_heard_at, 0);
    }

    #[test]
    fn test_warning_channel_wins_same_tick() {
        let mut table = ChannelTable::new();
        table.insert("alarm".to_string(), Channel::new(Some("Danger"), 0));
        table.insert("hum".to_string(), Channel::new(Some("Danger"), 5));
        let mut o = overlay(table, "captions:alarm = !Alarm\ncaptions:hum = Hum");

        let feed = vec![
            SoundInstance::new("sounds/hum.ogg", 1.0, 10.0),
            SoundInstance::new("sounds/alarm.ogg", 0.5, 10.0),
        ];
        o.tick(&feed, Some(&player()), 0);

        assert_eq!(o.captions().len(), 1);
        assert_eq!(o.captions()[0].alert_level, AlertLevel::Warning);

        let frame = o.frame(&FixedAdvance::default(), Viewport::new(800.0, 600.0), None, 0);
        let text_color = frame.iter().find_map(|c| match c {
            DrawCommand::Text { color, .. } => Some(*color),
            _ => None,
        });
        assert_eq!(text_color, Some(o.config().warning_color));
    }

    #[test]
    fn test_disabled_overlay_is_inert() {
        let mut o = overlay(ChannelTable::new(), "");
        o.set_config(CaptionsConfig {
            enabled: false,
            ..CaptionsConfig::default()
        });
        let feed = vec![SoundInstance::new("sounds/door.ogg", 1.0, 10.0)];
        o.notify_started(SoundInstance::new("sounds/bell.ogg", 1.0, 10.0));
        o.tick(&feed, Some(&player()), 0);
        assert!(o.captions().is_empty());

        let mut surface = CommandRecorder::new();
        o.render(
            &mut surface,
            &FixedAdvance::default(),
            Viewport::new(800.0, 600.0),
            None,
            0,
        );
        assert_eq!(surface.frames(), 1);
        assert!(surface.last_frame().is_empty());
    }

    #[test]
    fn test_reload_config_updates_duration() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("captions.cfg"), "duration = 1\n").unwrap();

        let mut o = overlay(ChannelTable::new(), "").with_config_dir(dir.path());
        let feed = vec![SoundInstance::new("sounds/door.ogg", 1.0, 10.0)];
        o.tick(&feed, Some(&player()), 0);
        o.tick(&SilentFeed, Some(&player()), 2000);
        assert_eq!(o.captions().len(), 1);

        o.reload_config();
        assert_eq!(o.config().duration, 1.0);
        o.tick(&SilentFeed, Some(&player()), 2001);
        assert!(o.captions().is_empty());
    }

    #[test]
    fn test_render_submits_rows() {
        let mut o = overlay(ChannelTable::new(), "captions:door = Door");
        let feed = vec![SoundInstance::new("sounds/door.ogg", 1.0, 10.0)];
        o.tick(&feed, Some(&player()), 0);

        let mut surface = CommandRecorder::new();
        o.render(
            &mut surface,
            &FixedAdvance::default(),
            Viewport::new(800.0, 600.0),
            Some(&player()),
            0,
        );
        let text = surface.last_frame().iter().find_map(|c| match c {
            DrawCommand::Text { text, color, .. } => Some((text.clone(), *color)),
            _ => None,
        });
        assert_eq!(text, Some(("Door".to_string(), Color::WHITE)));
    }
}
