use crate::config::{Anchor, CaptionsConfig};
use crate::graphics::Viewport;
use anyhow::{Context, Result};
use clap::Parser;

/// Sound captions overlay - replay a recorded session as captions
#[derive(Parser, Debug)]
#[command(name = "captions")]
#[command(version)]
#[command(about = "Replays recorded game sounds through the caption overlay", long_about = None)]
pub struct Cli {
    /// Recorded session to replay (JSON)
    #[arg(value_name = "REPLAY")]
    pub replay: String,

    /// Configuration directory holding captions.cfg
    #[arg(short, long, value_name = "CONFIGDIR")]
    pub configdir: Option<String>,

    /// Content directory holding channelguides/ and lang/
    #[arg(short = 'C', long, value_name = "CONTENTDIR")]
    pub contentdir: Option<String>,

    /// Caption language (e.g. en, de)
    #[arg(short, long, value_name = "LANG", default_value = "en")]
    pub lang: String,

    /// Screen resolution used for layout (e.g. 1280x720)
    #[arg(short, long, value_name = "WIDTHxHEIGHT", default_value = "1280x720")]
    pub res: String,

    /// Seconds a caption persists after the sound stops
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f32>,

    /// Seconds over which captions fade out
    #[arg(long, value_name = "SECONDS")]
    pub fade: Option<f32>,

    /// Maximum number of caption rows
    #[arg(long = "max-captions", value_name = "COUNT")]
    pub max_captions: Option<u32>,

    /// Screen area to anchor captions to (e.g. RightBottom, LeftTop)
    #[arg(short, long, value_name = "AREA")]
    pub position: Option<String>,

    /// Draw warnings as dark text on a bright background
    #[arg(long = "inverted-warnings")]
    pub inverted_warnings: bool,

    /// Add symbols to warnings and notices
    #[arg(long)]
    pub symbols: bool,

    /// Disable the overlay
    #[arg(long)]
    pub disable: bool,

    /// Log verbosity (0 = nothing .. 6 = everything)
    #[arg(long = "loglevel", value_name = "LEVEL", default_value_t = 3)]
    pub log_level: i32,
}

impl Cli {
    /// Merge CLI arguments into the config
    pub fn merge_into_config(&self, mut cfg: CaptionsConfig) -> Result<CaptionsConfig> {
        if let Some(duration) = self.duration {
            cfg.duration = duration;
        }

        if let Some(fade) = self.fade {
            cfg.fade_duration = fade;
        }

        if let Some(max) = self.max_captions {
            cfg.max_captions = max;
        }

        if let Some(ref position) = self.position {
            cfg.position = position
                .parse::<Anchor>()
                .context("Invalid caption position")?;
        }

        if self.inverted_warnings {
            cfg.inverted_warnings = true;
        }

        if self.symbols {
            cfg.show_symbols = true;
        }

        if self.disable {
            cfg.enabled = false;
        }

        cfg.clamp_ranges();
        Ok(cfg)
    }

    pub fn viewport(&self) -> Result<Viewport> {
        parse_resolution(&self.res).context("Invalid resolution format")
    }
}

/// Parse a resolution string in the format "WIDTHxHEIGHT"
pub fn parse_resolution(s: &str) -> Result<Viewport> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        anyhow::bail!("Resolution must be in WIDTHxHEIGHT format");
    }

    let width: u32 = parts[0].parse().context("Invalid width value")?;
    let height: u32 = parts[1].parse().context("Invalid height value")?;

    if width == 0 || height == 0 {
        anyhow::bail!("Resolution values must be positive");
    }

    Ok(Viewport::new(width as f32, height as f32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["captions", "session.json"]).unwrap();
        assert_eq!(cli.replay, "session.json");
        assert_eq!(cli.lang, "en");
        assert_eq!(cli.log_level, 3);
        assert_eq!(cli.viewport().unwrap(), Viewport::new(1280.0, 720.0));
    }

    #[test]
    fn test_missing_replay_is_error() {
        assert!(Cli::try_parse_from(["captions"]).is_err());
    }

    #[test]
    fn test_merge_overrides() {
        let cli = Cli::try_parse_from([
            "captions",
            "s.json",
            "--duration",
            "6",
            "--fade",
            "2",
            "--max-captions",
            "5",
            "--position",
            "lefttop",
            "--inverted-warnings",
            "--symbols",
        ])
        .unwrap();
        let cfg = cli.merge_into_config(CaptionsConfig::default()).unwrap();
        assert_eq!(cfg.duration, 6.0);
        assert_eq!(cfg.fade_duration, 2.0);
        assert_eq!(cfg.max_captions, 5);
        assert_eq!(cfg.position, Anchor::LeftTop);
        assert!(cfg.inverted_warnings);
        assert!(cfg.show_symbols);
        assert!(cfg.enabled);
    }

    #[test]
    fn test_merge_clamps_and_disables() {
        let cli = Cli::try_parse_from(["captions", "s.json", "--max-captions", "100", "--disable"])
            .unwrap();
        let cfg = cli.merge_into_config(CaptionsConfig::default()).unwrap();
        assert_eq!(cfg.max_captions, 30);
        assert!(!cfg.enabled);
    }

    #[test]
    fn test_merge_bad_position() {
        let cli = Cli::try_parse_from(["captions", "s.json", "--position", "nowhere"]).unwrap();
        assert!(cli.merge_into_config(CaptionsConfig::default()).is_err());
    }

    #[test]
    fn test_parse_resolution() {
        assert_eq!(parse_resolution("640x480").unwrap(), Viewport::new(640.0, 480.0));
        assert!(parse_resolution("640-480").is_err());
        assert!(parse_resolution("0x480").is_err());
        assert!(parse_resolution("abcxdef").is_err());
    }
}
