//!
//! Caption overlay drawing: primitives and the per-frame projector.

pub mod draw;
pub mod projector;

pub use draw::{
    Color, CommandRecorder, DrawCommand, DrawSurface, FixedAdvance, FontSpec, Point, Rect,
    TextMeasure, Viewport,
};
pub use projector::{Indicator, RenderProjector, Side, NEAR_FIELD_DISTANCE};
