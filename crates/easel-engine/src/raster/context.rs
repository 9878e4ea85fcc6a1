use crate::coords::{Rect, Vec2, Viewport};
use crate::paint::Color;
use crate::text::FontSpec;
use crate::transform::AffineTransform;

/// Primitive operations of a raster surface.
///
/// Coordinates are buffer pixels. Implementations must treat invalid geometry
/// (empty or non-finite) as a no-op, never as a panic.
pub trait RasterContext {
    /// Current buffer size.
    fn size(&self) -> Viewport;

    /// Reallocates the buffer. Previous contents are discarded.
    fn set_size(&mut self, size: Viewport);

    /// Fills the whole buffer, ignoring any transform.
    fn clear(&mut self, color: Color);

    /// Fills `rect` mapped through `transform`.
    fn fill_rect(&mut self, rect: Rect, color: Color, transform: &AffineTransform);

    /// Strokes the outline of `rect` mapped through `transform`.
    ///
    /// The stroke width is in the transform's input units.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32, transform: &AffineTransform);

    /// Strokes one connected polyline through `points`. Fewer than two points draw nothing.
    fn stroke_polyline(&mut self, points: &[Vec2], color: Color, width: f32);

    /// Draws `text` with its top-left corner at `origin`.
    fn fill_text(&mut self, text: &str, origin: Vec2, color: Color, font: &FontSpec);

    /// Toggles antialiasing for subsequent operations.
    fn set_smoothing(&mut self, enabled: bool);
}
