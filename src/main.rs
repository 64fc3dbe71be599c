use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use captions_rust::config::{load_config_or_default, CaptionsConfig};
use captions_rust::graphics::{DrawCommand, DrawSurface, FixedAdvance};
use captions_rust::logging::{self, LogLevel};
use captions_rust::overlay::Overlay;
use captions_rust::replay::Replay;
use captions_rust::resource::{ChannelDirectory, StringBank, CHANNEL_GUIDE_DIR};
use captions_rust::Cli;

/// Writes each frame's draw commands to stdout
struct PrintSurface {
    time_ms: u64,
}

impl DrawSurface for PrintSurface {
    fn submit(&mut self, commands: &[DrawCommand]) {
        if commands.is_empty() {
            return;
        }
        println!("[{:>8} ms]", self.time_ms);
        for command in commands {
            println!("  {}", command);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(LogLevel::from_i32(cli.log_level));
    log::info!("Sound captions replay starting");

    let base = match &cli.configdir {
        Some(dir) => load_config_or_default(Path::new(dir)),
        None => CaptionsConfig::default(),
    };
    let config = cli.merge_into_config(base)?;
    let viewport = cli.viewport()?;

    let content = PathBuf::from(cli.contentdir.as_deref().unwrap_or("."));
    let channels = ChannelDirectory::load(content.join(CHANNEL_GUIDE_DIR))
        .context("Failed to load channel guides")?;

    let mut strings = StringBank::with_language(&cli.lang);
    let lang_dir = content.join("lang");
    if lang_dir.is_dir() {
        let count = strings
            .load_dir(&lang_dir)
            .with_context(|| format!("Failed to read {}", lang_dir.display()))?;
        log::info!("Loaded {} caption languages", count);
    } else {
        log::warn!("No lang directory under {}; using sound paths as names", content.display());
    }

    let replay = Replay::load(&cli.replay)
        .with_context(|| format!("Failed to load replay {}", cli.replay))?;
    log::info!(
        "Replaying {} frames ({} ms)",
        replay.frames.len(),
        replay.duration_ms()
    );

    let mut overlay = Overlay::new(config, Arc::new(channels), Box::new(strings));
    if let Some(dir) = &cli.configdir {
        overlay = overlay.with_config_dir(dir);
    }

    let metrics = FixedAdvance::default();
    let mut surface = PrintSurface { time_ms: 0 };
    for frame in replay.frames {
        for sound in frame.started {
            overlay.notify_started(sound);
        }
        overlay.tick(&frame.sounds, frame.player.as_ref(), frame.time_ms);

        surface.time_ms = frame.time_ms;
        overlay.render(
            &mut surface,
            &metrics,
            viewport,
            frame.player.as_ref(),
            frame.time_ms,
        );
    }

    log::info!("Replay finished");
    Ok(())
}
