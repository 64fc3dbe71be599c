//! Draw primitives handed to the host's 2D surface.

use std::fmt;

/// RGBA color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// RGB scaled by `factor`, alpha untouched
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            r: (self.r * factor).clamp(0.0, 1.0),
            g: (self.g * factor).clamp(0.0, 1.0),
            b: (self.b * factor).clamp(0.0, 1.0),
            a: self.a,
        }
    }
}

/// 2D point in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Screen size the overlay is laid out against.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Font selection for text runs.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f32,
}

impl FontSpec {
    pub fn new(family: &str, size: f32) -> Self {
        Self {
            family: family.to_string(),
            size,
        }
    }
}

/// Draw command variants.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        line_width: f32,
    },
    Text {
        origin: Point,
        text: String,
        width: f32,
        font: FontSpec,
        color: Color,
    },
    Triangle {
        points: [Point; 3],
        color: Color,
    },
    Circle {
        center: Point,
        radius: f32,
        color: Color,
    },
}

impl fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawCommand::FillRect { rect, color } => write!(
                f,
                "fill   ({:.0},{:.0} {:.0}x{:.0}) a={:.2}",
                rect.x, rect.y, rect.width, rect.height, color.a
            ),
            DrawCommand::StrokeRect { rect, .. } => write!(
                f,
                "stroke ({:.0},{:.0} {:.0}x{:.0})",
                rect.x, rect.y, rect.width, rect.height
            ),
            DrawCommand::Text {
                origin, text, color, ..
            } => write!(
                f,
                "text   ({:.0},{:.0}) \"{}\" rgb=({:.2},{:.2},{:.2})",
                origin.x, origin.y, text, color.r, color.g, color.b
            ),
            DrawCommand::Triangle { points, .. } => write!(
                f,
                "tri    ({:.0},{:.0}) ({:.0},{:.0}) ({:.0},{:.0})",
                points[0].x, points[0].y, points[1].x, points[1].y, points[2].x, points[2].y
            ),
            DrawCommand::Circle { center, radius, .. } => {
                write!(f, "circle ({:.0},{:.0}) r={:.0}", center.x, center.y, radius)
            }
        }
    }
}

/// Text measurement provided by the host's font renderer.
pub trait TextMeasure {
    /// Width in pixels of `text` set in `font`
    fn text_width(&self, font: &FontSpec, text: &str) -> f32;
}

/// Destination for a frame's draw commands.
pub trait DrawSurface {
    fn submit(&mut self, commands: &[DrawCommand]);
}

/// Approximate metrics: every character is `advance * size` wide.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvance {
    pub advance: f32,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self { advance: 0.5 }
    }
}

impl TextMeasure for FixedAdvance {
    fn text_width(&self, font: &FontSpec, text: &str) -> f32 {
        text.chars().count() as f32 * font.size * self.advance
    }
}

/// Surface that keeps the last submitted frame.
#[derive(Debug, Default, Clone)]
pub struct CommandRecorder {
    frames: usize,
    last: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last
    }
}

impl DrawSurface for CommandRecorder {
    fn submit(&mut self, commands: &[DrawCommand]) {
        self.frames += 1;
        self.last = commands.to_vec();
    }
}
