use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::graphics::draw::Color;
use crate::resource::propfile::{PropertyError, PropertyFile};

/// File name of the settings file inside the config directory
pub const CONFIG_FILE_NAME: &str = "captions.cfg";

/// User-tunable overlay settings
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionsConfig {
    pub enabled: bool,
    /// Decorate warnings/notices with symbols as well as color
    pub show_symbols: bool,
    /// Warnings use a bright background with dark text
    pub inverted_warnings: bool,
    /// Seconds a caption persists after the sound stops
    pub duration: f32,
    /// Seconds over which a caption fades out before removal
    pub fade_duration: f32,
    pub max_captions: u32,
    pub position: Anchor,
    /// Box width in pixels
    pub width: u32,
    /// Row height in pixels
    pub height: u32,
    /// Gap between the box and the screen edges
    pub padding: f32,
    pub font: String,
    pub font_size: f32,
    pub background_opacity: f32,
    pub text_opacity: f32,
    pub warning_color: Color,
    pub notice_color: Color,
    /// Channel tags whose sounds are never captioned
    pub ignored_tags: Vec<String>,
}

/// Screen area the caption box is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    LeftTop,
    CenterTop,
    RightTop,
    LeftMiddle,
    CenterMiddle,
    RightMiddle,
    LeftBottom,
    CenterBottom,
    RightBottom,
}

impl Anchor {
    pub const ALL: [Anchor; 9] = [
        Anchor::LeftTop,
        Anchor::CenterTop,
        Anchor::RightTop,
        Anchor::LeftMiddle,
        Anchor::CenterMiddle,
        Anchor::RightMiddle,
        Anchor::LeftBottom,
        Anchor::CenterBottom,
        Anchor::RightBottom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Anchor::LeftTop => "LeftTop",
            Anchor::CenterTop => "CenterTop",
            Anchor::RightTop => "RightTop",
            Anchor::LeftMiddle => "LeftMiddle",
            Anchor::CenterMiddle => "CenterMiddle",
            Anchor::RightMiddle => "RightMiddle",
            Anchor::LeftBottom => "LeftBottom",
            Anchor::CenterBottom => "CenterBottom",
            Anchor::RightBottom => "RightBottom",
        }
    }

    /// Rows stack upward from the bottom edge
    pub fn is_bottom(&self) -> bool {
        matches!(
            self,
            Anchor::LeftBottom | Anchor::CenterBottom | Anchor::RightBottom
        )
    }

    pub fn is_top(&self) -> bool {
        matches!(self, Anchor::LeftTop | Anchor::CenterTop | Anchor::RightTop)
    }

    pub fn is_left(&self) -> bool {
        matches!(
            self,
            Anchor::LeftTop | Anchor::LeftMiddle | Anchor::LeftBottom
        )
    }

    pub fn is_right(&self) -> bool {
        matches!(
            self,
            Anchor::RightTop | Anchor::RightMiddle | Anchor::RightBottom
        )
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Anchor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        Anchor::ALL
            .into_iter()
            .find(|a| a.as_str().to_lowercase() == wanted)
            .ok_or_else(|| ConfigError::Invalid {
                key: "position".to_string(),
                value: s.to_string(),
            })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for '{key}': {value}")]
    Invalid { key: String, value: String },
    #[error(transparent)]
    Property(#[from] PropertyError),
}

impl Default for CaptionsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            show_symbols: false,
            inverted_warnings: false,
            duration: 4.0,
            fade_duration: 1.0,
            max_captions: 10,
            position: Anchor::RightBottom,
            width: 300,
            height: 34,
            padding: 16.0,
            font: "Lora".to_string(),
            font_size: 28.0,
            background_opacity: 0.75,
            text_opacity: 1.0,
            warning_color: Color::rgb(1.0, 0.635, 0.27),
            notice_color: Color::rgb(0.3, 1.0, 0.8),
            ignored_tags: Vec::new(),
        }
    }
}

fn parse_key<T: FromStr>(props: &PropertyFile, key: &str, slot: &mut T) -> Result<(), ConfigError> {
    if let Some(raw) = props.get(key) {
        *slot = raw.parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value: raw.to_string(),
        })?;
    }
    Ok(())
}

fn clamp_f32(key: &str, value: &mut f32, min: f32, max: f32) {
    if *value < min || *value > max || value.is_nan() {
        let clamped = if value.is_nan() { min } else { value.clamp(min, max) };
        log::warn!("{} = {} out of range [{}, {}], using {}", key, value, min, max, clamped);
        *value = clamped;
    }
}

fn clamp_u32(key: &str, value: &mut u32, min: u32, max: u32) {
    if *value < min || *value > max {
        let clamped = (*value).clamp(min, max);
        log::warn!("{} = {} out of range [{}, {}], using {}", key, value, min, max, clamped);
        *value = clamped;
    }
}

/// Parse a comma separated tag list; blanks are dropped
pub fn parse_tag_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

impl CaptionsConfig {
    /// Build a config from property file entries over the defaults
    pub fn from_properties(props: &PropertyFile) -> Result<Self, ConfigError> {
        let mut cfg = CaptionsConfig::default();
        let mut warning = [cfg.warning_color.r, cfg.warning_color.g, cfg.warning_color.b];
        let mut notice = [cfg.notice_color.r, cfg.notice_color.g, cfg.notice_color.b];

        parse_key(props, "enabled", &mut cfg.enabled)?;
        parse_key(props, "show_symbols", &mut cfg.show_symbols)?;
        parse_key(props, "inverted_warnings", &mut cfg.inverted_warnings)?;
        parse_key(props, "duration", &mut cfg.duration)?;
        parse_key(props, "fade_duration", &mut cfg.fade_duration)?;
        parse_key(props, "max_captions", &mut cfg.max_captions)?;
        parse_key(props, "position", &mut cfg.position)?;
        parse_key(props, "width", &mut cfg.width)?;
        parse_key(props, "height", &mut cfg.height)?;
        parse_key(props, "padding", &mut cfg.padding)?;
        parse_key(props, "font", &mut cfg.font)?;
        parse_key(props, "font_size", &mut cfg.font_size)?;
        parse_key(props, "background_opacity", &mut cfg.background_opacity)?;
        parse_key(props, "text_opacity", &mut cfg.text_opacity)?;
        parse_key(props, "warning_red", &mut warning[0])?;
        parse_key(props, "warning_green", &mut warning[1])?;
        parse_key(props, "warning_blue", &mut warning[2])?;
        parse_key(props, "notice_red", &mut notice[0])?;
        parse_key(props, "notice_green", &mut notice[1])?;
        parse_key(props, "notice_blue", &mut notice[2])?;
        if let Some(tags) = props.get("ignored_tags") {
            cfg.ignored_tags = parse_tag_list(tags);
        }

        for (key, _) in props.iter() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                log::warn!("Unknown config key '{}' ignored", key);
            }
        }

        for (name, value) in ["warning_red", "warning_green", "warning_blue"]
            .iter()
            .zip(warning.iter_mut())
            .chain(
                ["notice_red", "notice_green", "notice_blue"]
                    .iter()
                    .zip(notice.iter_mut()),
            )
        {
            clamp_f32(name, value, 0.0, 1.0);
        }
        cfg.warning_color = Color::rgb(warning[0], warning[1], warning[2]);
        cfg.notice_color = Color::rgb(notice[0], notice[1], notice[2]);

        cfg.clamp_ranges();
        Ok(cfg)
    }

    /// Force every numeric setting into its supported range
    pub fn clamp_ranges(&mut self) {
        clamp_f32("duration", &mut self.duration, 0.0, 10.0);
        clamp_f32("fade_duration", &mut self.fade_duration, 0.0, 4.0);
        clamp_u32("max_captions", &mut self.max_captions, 1, 30);
        clamp_u32("width", &mut self.width, 256, 512);
        clamp_u32("height", &mut self.height, 16, 64);
        clamp_f32("padding", &mut self.padding, 0.0, 64.0);
        clamp_f32("font_size", &mut self.font_size, 8.0, 64.0);
        clamp_f32("background_opacity", &mut self.background_opacity, 0.0, 1.0);
        clamp_f32("text_opacity", &mut self.text_opacity, 0.0, 1.0);
    }

    /// Property file form of this config
    pub fn to_properties(&self) -> PropertyFile {
        let mut props = PropertyFile::default();
        props.set("enabled", self.enabled);
        props.set("show_symbols", self.show_symbols);
        props.set("inverted_warnings", self.inverted_warnings);
        props.set("duration", self.duration);
        props.set("fade_duration", self.fade_duration);
        props.set("max_captions", self.max_captions);
        props.set("position", self.position);
        props.set("width", self.width);
        props.set("height", self.height);
        props.set("padding", self.padding);
        props.set("font", &self.font);
        props.set("font_size", self.font_size);
        props.set("background_opacity", self.background_opacity);
        props.set("text_opacity", self.text_opacity);
        props.set("warning_red", self.warning_color.r);
        props.set("warning_green", self.warning_color.g);
        props.set("warning_blue", self.warning_color.b);
        props.set("notice_red", self.notice_color.r);
        props.set("notice_green", self.notice_color.g);
        props.set("notice_blue", self.notice_color.b);
        props.set("ignored_tags", self.ignored_tags.join(","));
        props
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        self.to_properties().save(path)?;
        Ok(())
    }
}

const KNOWN_KEYS: &[&str] = &[
    "enabled",
    "show_symbols",
    "inverted_warnings",
    "duration",
    "fade_duration",
    "max_captions",
    "position",
    "width",
    "height",
    "padding",
    "font",
    "font_size",
    "background_opacity",
    "text_opacity",
    "warning_red",
    "warning_green",
    "warning_blue",
    "notice_red",
    "notice_green",
    "notice_blue",
    "ignored_tags",
];

/// Path of the settings file inside `config_dir`
pub fn config_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load `captions.cfg` from `config_dir`.
///
/// A missing file yields the defaults, which are written back so the user
/// has something to edit.
pub fn load_config(config_dir: &Path) -> Result<CaptionsConfig, ConfigError> {
    let path = config_path(config_dir);
    match PropertyFile::load(&path) {
        Ok(props) => CaptionsConfig::from_properties(&props),
        Err(PropertyError::FileNotFound) => {
            let cfg = CaptionsConfig::default();
            if let Err(e) = cfg.save(&path) {
                log::warn!("Could not write default config to {}: {}", path.display(), e);
            } else {
                log::info!("Wrote default config to {}", path.display());
            }
            Ok(cfg)
        }
        Err(e) => Err(e.into()),
    }
}

/// Load the config, falling back to defaults on any failure
pub fn load_config_or_default(config_dir: &Path) -> CaptionsConfig {
    match load_config(config_dir) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("Could not load config, using defaults.");
            log::error!("{}", e);
            CaptionsConfig::default()
        }
    }
}
