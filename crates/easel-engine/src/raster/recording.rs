use crate::coords::{Rect, Vec2, Viewport};
use crate::paint::Color;
use crate::text::FontSpec;
use crate::transform::AffineTransform;

use super::{RasterContext, DEFAULT_SIZE};

/// One recorded raster call.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterOp {
    SetSize(Viewport),
    Clear(Color),
    FillRect { rect: Rect, color: Color, transform: AffineTransform },
    StrokeRect { rect: Rect, color: Color, width: f32, transform: AffineTransform },
    Polyline { points: Vec<Vec2>, color: Color, width: f32 },
    Text { text: String, origin: Vec2, color: Color, font: FontSpec },
    Smoothing(bool),
}

/// Context that records every call instead of rasterizing.
#[derive(Debug, Clone)]
pub struct RecordingContext {
    size: Viewport,
    smoothing: bool,
    ops: Vec<RasterOp>,
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}

impl RecordingContext {
    pub fn new(size: Viewport) -> Self {
        Self { size, smoothing: true, ops: Vec::new() }
    }

    /// Calls recorded so far, in issue order.
    #[inline]
    pub fn ops(&self) -> &[RasterOp] {
        &self.ops
    }

    /// Drains the recording.
    pub fn take_ops(&mut self) -> Vec<RasterOp> {
        std::mem::take(&mut self.ops)
    }

    #[inline]
    pub fn smoothing(&self) -> bool {
        self.smoothing
    }

    /// Every polyline stroked so far, flattened into its individual segments.
    pub fn segments(&self) -> Vec<(Vec2, Vec2)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                RasterOp::Polyline { points, .. } => Some(points),
                _ => None,
            })
            .flat_map(|points| points.windows(2).map(|w| (w[0], w[1])))
            .collect()
    }
}

impl RasterContext for RecordingContext {
    fn size(&self) -> Viewport {
        self.size
    }

    fn set_size(&mut self, size: Viewport) {
        self.size = size;
        self.ops.push(RasterOp::SetSize(size));
    }

    fn clear(&mut self, color: Color) {
        self.ops.push(RasterOp::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, transform: &AffineTransform) {
        self.ops.push(RasterOp::FillRect { rect, color, transform: *transform });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32, transform: &AffineTransform) {
        self.ops.push(RasterOp::StrokeRect { rect, color, width, transform: *transform });
    }

    fn stroke_polyline(&mut self, points: &[Vec2], color: Color, width: f32) {
        self.ops.push(RasterOp::Polyline { points: points.to_vec(), color, width });
    }

    fn fill_text(&mut self, text: &str, origin: Vec2, color: Color, font: &FontSpec) {
        self.ops.push(RasterOp::Text {
            text: text.to_string(),
            origin,
            color,
            font: font.clone(),
        });
    }

    fn set_smoothing(&mut self, enabled: bool) {
        self.smoothing = enabled;
        self.ops.push(RasterOp::Smoothing(enabled));
    }
}
