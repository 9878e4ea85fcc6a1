/// Raster buffer size in pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Rounds a float extent to whole pixels. Negative and non-finite values become 0.
    pub fn from_extent(w: f32, h: f32) -> Self {
        fn px(v: f32) -> u32 {
            if v.is_finite() && v > 0.0 { v.round() as u32 } else { 0 }
        }
        Self::new(px(w), px(h))
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}
