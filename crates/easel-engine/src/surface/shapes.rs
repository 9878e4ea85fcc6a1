//! Shape descriptors.
//!
//! Plain values built by the caller for one draw call; the renderer never
//! keeps them.

use crate::coords::Vec2;
use crate::paint::Color;
use crate::text::FontSpec;

/// Rectangle centered on `center`, world space.
///
/// Drawn only if `fill` or `stroke` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub center: Vec2,
    pub size: Vec2,
    /// Radians. When `None` the rectangle stays axis-aligned on screen even
    /// under a rotated camera.
    pub rotation: Option<f32>,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    /// Stroke width in pixels.
    pub line_width: f32,
}

impl Default for Rectangle {
    fn default() -> Self {
        Self {
            center: Vec2::zero(),
            size: Vec2::zero(),
            rotation: None,
            fill: None,
            stroke: None,
            line_width: 1.0,
        }
    }
}

impl Rectangle {
    /// Filled, unrotated rectangle.
    pub fn filled(center: Vec2, size: Vec2, color: Color) -> Self {
        Self { center, size, fill: Some(color), ..Self::default() }
    }
}

/// Square with side `size`; sugar over [`Rectangle`].
#[derive(Debug, Clone, PartialEq)]
pub struct Square {
    pub center: Vec2,
    pub size: f32,
    pub rotation: Option<f32>,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub line_width: f32,
}

impl Default for Square {
    fn default() -> Self {
        Self {
            center: Vec2::zero(),
            size: 0.0,
            rotation: None,
            fill: None,
            stroke: None,
            line_width: 1.0,
        }
    }
}

impl From<&Square> for Rectangle {
    fn from(sq: &Square) -> Self {
        Rectangle {
            center: sq.center,
            size: Vec2::splat(sq.size),
            rotation: sq.rotation,
            fill: sq.fill,
            stroke: sq.stroke,
            line_width: sq.line_width,
        }
    }
}

/// Independent line segment of a [`PathPoints::Segments`] path.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
}

impl Segment {
    #[inline]
    pub const fn new(from: Vec2, to: Vec2) -> Self {
        Self { from, to }
    }
}

/// The two accepted path representations.
#[derive(Debug, Clone, PartialEq)]
pub enum PathPoints {
    /// One connected polyline through every point.
    Points(Vec<Vec2>),
    /// Disconnected segments, each stroked on its own.
    Segments(Vec<Segment>),
}

/// Stroked path, world space. Skipped when `points` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub points: Option<PathPoints>,
    /// Defaults to black.
    pub color: Option<Color>,
    pub width: f32,
}

impl Default for Path {
    fn default() -> Self {
        Self { points: None, color: None, width: 1.0 }
    }
}

impl Path {
    pub fn polyline(points: Vec<Vec2>, color: Color, width: f32) -> Self {
        Self { points: Some(PathPoints::Points(points)), color: Some(color), width }
    }

    pub fn segments(segments: Vec<Segment>, color: Color, width: f32) -> Self {
        Self { points: Some(PathPoints::Segments(segments)), color: Some(color), width }
    }
}

/// Single segment in screen space (the camera does not apply).
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub from: Vec2,
    pub to: Vec2,
    /// Defaults to black.
    pub color: Option<Color>,
    pub width: f32,
}

impl Default for Line {
    fn default() -> Self {
        Self { from: Vec2::zero(), to: Vec2::zero(), color: None, width: 1.0 }
    }
}

/// Whole-buffer fill. `None` uses the renderer's default background.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Background {
    pub color: Option<Color>,
}

/// Patch for the text state used by subsequent `text` calls.
///
/// Applied in order: `color`, `font` (replaces the whole font), then `family`
/// and `size` on top of the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStyle {
    pub color: Option<Color>,
    pub font: Option<FontSpec>,
    pub family: Option<String>,
    pub size: Option<f32>,
}

/// Text drawn with its top-left corner at `pivot`, screen space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    pub text: String,
    pub pivot: Vec2,
}

impl Text {
    pub fn new(text: impl Into<String>, pivot: Vec2) -> Self {
        Self { text: text.into(), pivot }
    }
}

/// Buffer resize request. Ignored unless both `pivot` and `size` are set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResizeOptions {
    /// Top-left of the visible surface inside its target.
    pub pivot: Option<Vec2>,
    /// Buffer size in pixels.
    pub size: Option<Vec2>,
    /// Also move/resize the visible target.
    pub place_target: bool,
}

impl ResizeOptions {
    pub fn new(pivot: Vec2, size: Vec2) -> Self {
        Self { pivot: Some(pivot), size: Some(size), place_target: false }
    }
}
