//! Render projector
//!
//! Turns the live caption list into one frame of draw commands. Stateless:
//! the same captions, player and time always give the same frame.
//!
//! Each row is a background box, a border, the centered caption text and an
//! optional direction glyph. Rows stack away from the anchored screen edge;
//! captions beyond `max_captions` are not drawn but stay in the engine.

use std::f32::consts::{PI, TAU};

use crate::captions::{AlertLevel, Caption, Millis};
use crate::config::CaptionsConfig;
use crate::sound::{PlayerContext, Vec3};

use super::draw::{Color, DrawCommand, FontSpec, Point, Rect, TextMeasure, Viewport};

/// Sounds closer than this get no direction glyph
pub const NEAR_FIELD_DISTANCE: f32 = 1.5;

/// Text color of inverted warnings
const INVERTED_TEXT: Color = Color::rgb(0.08, 0.08, 0.08);

const BORDER_GREY: f32 = 0.25;

/// Which side of the player's facing a sound is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Direction glyph drawn at the edge of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Mildly off axis, or turning back toward behind
    Single(Side),
    /// Strongly off axis
    Double(Side),
    /// Roughly behind the player
    Behind,
}

/// Signed angle from the player's facing to `target`, in (-PI, PI].
///
/// Positive is clockwise seen from above (to the right), negative to the
/// left. Height difference is ignored.
pub fn heading_offset(player: &PlayerContext, target: &Vec3) -> f32 {
    let dx = target.x - player.position.x;
    let dz = target.z - player.position.z;
    let heading = dx.atan2(dz);
    let mut offset = (heading - player.yaw).rem_euclid(TAU);
    if offset > PI {
        offset -= TAU;
    }
    offset
}

/// Bucket a heading offset into a glyph.
///
/// The circle is split into twelfths: within one twelfth of dead ahead no
/// glyph is shown, then single, double and single chevrons, and a behind
/// marker past five twelfths.
pub fn indicator_for_offset(offset: f32) -> Option<Indicator> {
    let twelfths = offset / TAU * 12.0;
    let side = if twelfths >= 0.0 { Side::Right } else { Side::Left };
    let magnitude = twelfths.abs();

    if magnitude <= 1.0 {
        None
    } else if magnitude <= 2.0 {
        Some(Indicator::Single(side))
    } else if magnitude <= 4.0 {
        Some(Indicator::Double(side))
    } else if magnitude <= 5.0 {
        Some(Indicator::Single(side))
    } else {
        Some(Indicator::Behind)
    }
}

/// Glyph for a caption, if it is positional and far enough away
pub fn direction_indicator(caption: &Caption, player: &PlayerContext) -> Option<Indicator> {
    let position = caption.world_position?;
    if player.position.distance_to(&position) < NEAR_FIELD_DISTANCE {
        return None;
    }
    indicator_for_offset(heading_offset(player, &position))
}

/// Opacity multiplier: 1 until `duration - fade`, reaching 0 at `duration`
pub fn fade_factor(age: f64, duration: f64, fade: f64) -> f32 {
    if fade <= 0.0 {
        return if age <= duration { 1.0 } else { 0.0 };
    }
    let f = 1.0 - (age - duration + fade) / fade;
    f.clamp(0.0, 1.0) as f32
}

/// Color intensity in [0.5, 1] for live rows, driven by fade and loudness
pub fn brightness(fade: f32, audibility: f32) -> f32 {
    (fade * audibility.max(1.0) / 2.0 + 0.5).clamp(0.0, 1.0)
}

/// Resolved colors for one row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowStyle {
    pub background: Color,
    pub border: Color,
    pub text: Color,
}

/// Colors for a caption of `level` at the given fade and brightness
pub fn row_style(level: AlertLevel, fade: f32, bright: f32, config: &CaptionsConfig) -> RowStyle {
    let bg_alpha = config.background_opacity * fade;
    let text_alpha = config.text_opacity * fade;

    let (background, text) = match level {
        AlertLevel::Warning if config.inverted_warnings => (
            config.warning_color.scaled(bright).with_alpha(bg_alpha),
            INVERTED_TEXT.with_alpha(text_alpha),
        ),
        AlertLevel::Warning => (
            Color::BLACK.with_alpha(bg_alpha),
            config.warning_color.scaled(bright).with_alpha(text_alpha),
        ),
        AlertLevel::Notice => (
            Color::BLACK.with_alpha(bg_alpha),
            config.notice_color.scaled(bright).with_alpha(text_alpha),
        ),
        AlertLevel::Environmental | AlertLevel::Normal => (
            Color::BLACK.with_alpha(bg_alpha),
            Color::WHITE.scaled(bright).with_alpha(text_alpha),
        ),
    };

    RowStyle {
        background,
        border: Color::rgb(BORDER_GREY, BORDER_GREY, BORDER_GREY)
            .with_alpha((0.5 + bright * 0.5) * fade),
        text,
    }
}

/// Caption text, decorated when symbols are enabled
pub fn caption_label(caption: &Caption, show_symbols: bool) -> String {
    match caption.alert_level {
        AlertLevel::Warning if show_symbols => format!("! {} !", caption.display_name),
        AlertLevel::Notice if show_symbols => format!("+ {} +", caption.display_name),
        _ => caption.display_name.clone(),
    }
}

/// Per-frame projector bound to the current settings and screen
pub struct RenderProjector<'a> {
    config: &'a CaptionsConfig,
    metrics: &'a dyn TextMeasure,
    viewport: Viewport,
    font: FontSpec,
}

impl<'a> RenderProjector<'a> {
    pub fn new(config: &'a CaptionsConfig, metrics: &'a dyn TextMeasure, viewport: Viewport) -> Self {
        Self {
            config,
            metrics,
            viewport,
            font: FontSpec::new(&config.font, config.font_size),
        }
    }

    fn row_width(&self) -> f32 {
        self.config.width as f32
    }

    fn row_height(&self) -> f32 {
        self.config.height as f32
    }

    /// Screen rectangle of row `index` (0 is nearest the anchored edge)
    pub fn row_rect(&self, index: usize) -> Rect {
        let cfg = self.config;
        let (w, h) = (self.row_width(), self.row_height());
        let pad = cfg.padding;

        let x = if cfg.position.is_left() {
            pad
        } else if cfg.position.is_right() {
            self.viewport.width - w - pad
        } else {
            (self.viewport.width - w) / 2.0
        };

        let i = index as f32;
        let y = if cfg.position.is_bottom() {
            self.viewport.height - pad - (i + 1.0) * h
        } else if cfg.position.is_top() {
            pad + i * h
        } else {
            (self.viewport.height - cfg.max_captions as f32 * h) / 2.0 + i * h
        };

        Rect::new(x, y, w, h)
    }

    /// Draw commands for every visible caption, in row order
    pub fn project(
        &self,
        captions: &[Caption],
        player: Option<&PlayerContext>,
        now: Millis,
    ) -> Vec<DrawCommand> {
        let mut commands = Vec::new();
        let visible = captions.len().min(self.config.max_captions as usize);

        for (index, caption) in captions.iter().take(visible).enumerate() {
            self.project_row(&mut commands, index, caption, player, now);
        }
        commands
    }

    fn project_row(
        &self,
        out: &mut Vec<DrawCommand>,
        index: usize,
        caption: &Caption,
        player: Option<&PlayerContext>,
        now: Millis,
    ) {
        let cfg = self.config;
        let rect = self.row_rect(index);
        let fade = fade_factor(
            caption.age(now),
            cfg.duration as f64,
            cfg.fade_duration as f64,
        );
        let bright = brightness(fade, caption.audibility);
        let style = row_style(caption.alert_level, fade, bright, cfg);

        out.push(DrawCommand::FillRect {
            rect,
            color: style.background,
        });
        out.push(DrawCommand::StrokeRect {
            rect,
            color: style.border,
            line_width: 1.0,
        });

        let text = caption_label(caption, cfg.show_symbols);
        let width = self.metrics.text_width(&self.font, &text);
        out.push(DrawCommand::Text {
            origin: Point::new(
                rect.x + (rect.width - width) / 2.0,
                rect.y + (rect.height - self.font.size) / 2.0,
            ),
            text,
            width,
            font: self.font.clone(),
            color: style.text,
        });

        if let Some(indicator) = player.and_then(|p| direction_indicator(caption, p)) {
            push_indicator(out, rect, indicator, style.text);
        }
    }
}

/// Chevron pointing outward, its tip `inset` pixels in from the row's edge
fn chevron(rect: Rect, side: Side, inset: f32, color: Color) -> DrawCommand {
    let cy = rect.y + rect.height / 2.0;
    let half = rect.height * 0.38;
    let depth = rect.height * 0.44;
    let (tip, base) = match side {
        Side::Right => {
            let tip = rect.right() - inset;
            (tip, tip - depth)
        }
        Side::Left => {
            let tip = rect.x + inset;
            (tip, tip + depth)
        }
    };
    DrawCommand::Triangle {
        points: [
            Point::new(tip, cy),
            Point::new(base, cy - half),
            Point::new(base, cy + half),
        ],
        color,
    }
}

fn push_indicator(out: &mut Vec<DrawCommand>, rect: Rect, indicator: Indicator, color: Color) {
    let outer = rect.height * 0.25;
    let inner = rect.height * 0.6;
    match indicator {
        Indicator::Single(side) => out.push(chevron(rect, side, inner, color)),
        Indicator::Double(side) => {
            out.push(chevron(rect, side, outer, color));
            out.push(chevron(rect, side, inner, color));
        }
        Indicator::Behind => {
            let cy = rect.y + rect.height / 2.0;
            let radius = rect.height * 0.15;
            let inset = rect.height * 0.5;
            out.push(DrawCommand::Circle {
                center: Point::new(rect.x + inset, cy),
                radius,
                color,
            });
            out.push(DrawCommand::Circle {
                center: Point::new(rect.right() - inset, cy),
                radius,
                color,
            });
        }
    }
}
