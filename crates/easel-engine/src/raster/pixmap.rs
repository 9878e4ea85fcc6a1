use tiny_skia::{Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::coords::{Rect, Vec2, Viewport};
use crate::paint::Color;
use crate::text::{FontSpec, FontSystem};
use crate::transform::AffineTransform;

use super::{RasterContext, DEFAULT_SIZE};

/// CPU raster surface backed by a `tiny_skia::Pixmap`.
///
/// Pixels are premultiplied RGBA8. A zero-sized buffer holds no pixmap and
/// every draw call becomes a no-op until the next non-empty resize.
pub struct PixmapContext {
    pixmap: Option<Pixmap>,
    size: Viewport,
    anti_alias: bool,
    fonts: FontSystem,
}

impl Default for PixmapContext {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}

impl PixmapContext {
    pub fn new(size: Viewport) -> Self {
        Self {
            pixmap: Pixmap::new(size.width, size.height),
            size,
            anti_alias: true,
            fonts: FontSystem::new(),
        }
    }

    /// Fonts available to `fill_text`.
    #[inline]
    pub fn fonts(&self) -> &FontSystem {
        &self.fonts
    }

    #[inline]
    pub fn fonts_mut(&mut self) -> &mut FontSystem {
        &mut self.fonts
    }

    /// Premultiplied RGBA8 rows, `4 * width` bytes each. Empty for a zero-sized buffer.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.as_ref().map_or(&[], |p| p.data())
    }

    /// Premultiplied RGBA8 value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let p = self.pixmap.as_ref()?.pixel(x, y)?;
        Some([p.red(), p.green(), p.blue(), p.alpha()])
    }

    fn paint(&self, color: Color) -> Paint<'static> {
        let [r, g, b, a] = color.to_rgba8();
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = self.anti_alias;
        paint
    }

    fn blend_coverage(pixmap: &mut Pixmap, x0: i32, y0: i32, w: usize, coverage: &[u8], color: Color) {
        let (pw, ph) = (pixmap.width() as i32, pixmap.height() as i32);
        let data = pixmap.data_mut();

        for (i, &cov) in coverage.iter().enumerate() {
            if cov == 0 {
                continue;
            }
            let x = x0 + (i % w) as i32;
            let y = y0 + (i / w) as i32;
            if x < 0 || y < 0 || x >= pw || y >= ph {
                continue;
            }

            let k = cov as f32 / 255.0;
            let src = [color.r * k, color.g * k, color.b * k, color.a * k];
            let idx = ((y * pw + x) * 4) as usize;
            let inv = 1.0 - src[3];
            for (c, s) in src.iter().enumerate() {
                let dst = data[idx + c] as f32 / 255.0;
                data[idx + c] = ((s + dst * inv).clamp(0.0, 1.0) * 255.0).round() as u8;
            }
        }
    }
}

fn to_skia(t: &AffineTransform) -> Transform {
    Transform::from_row(t.a, t.b, t.c, t.d, t.tx, t.ty)
}

fn to_skia_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    let r = rect.normalized();
    tiny_skia::Rect::from_xywh(r.origin.x, r.origin.y, r.size.x, r.size.y)
}

impl RasterContext for PixmapContext {
    fn size(&self) -> Viewport {
        self.size
    }

    fn set_size(&mut self, size: Viewport) {
        self.size = size;
        self.pixmap = Pixmap::new(size.width, size.height);
    }

    fn clear(&mut self, color: Color) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            let [r, g, b, a] = color.to_rgba8();
            pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, transform: &AffineTransform) {
        let Some(rect) = to_skia_rect(rect) else { return };
        let paint = self.paint(color);
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill_rect(rect, &paint, to_skia(transform), None);
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32, transform: &AffineTransform) {
        let Some(rect) = to_skia_rect(rect) else { return };
        let path = PathBuilder::from_rect(rect);
        let paint = self.paint(color);
        let stroke = Stroke { width, ..Stroke::default() };
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.stroke_path(&path, &paint, &stroke, to_skia(transform), None);
        }
    }

    fn stroke_polyline(&mut self, points: &[Vec2], color: Color, width: f32) {
        let [first, rest @ ..] = points else { return };
        if rest.is_empty() {
            return;
        }

        let mut pb = PathBuilder::new();
        pb.move_to(first.x, first.y);
        for p in rest {
            pb.line_to(p.x, p.y);
        }
        let Some(path) = pb.finish() else { return };

        let paint = self.paint(color);
        let stroke = Stroke { width, ..Stroke::default() };
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    fn fill_text(&mut self, text: &str, origin: Vec2, color: Color, font: &FontSpec) {
        use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

        let Some(pixmap) = self.pixmap.as_mut() else { return };
        let Some(face) = self.fonts.resolve(font).and_then(|id| self.fonts.get(id)) else {
            log::debug!("fill_text: no font loaded for {font}");
            return;
        };

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings {
            x: origin.x,
            y: origin.y,
            ..LayoutSettings::default()
        });
        layout.append(&[face], &TextStyle::new(text, font.size, 0));

        for g in layout.glyphs() {
            if g.width == 0 || g.height == 0 {
                continue;
            }
            let (_, coverage) = face.rasterize_config(g.key);
            Self::blend_coverage(pixmap, g.x.round() as i32, g.y.round() as i32, g.width, &coverage, color);
        }
    }

    fn set_smoothing(&mut self, enabled: bool) {
        self.anti_alias = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];

    fn ctx(w: u32, h: u32) -> PixmapContext {
        let mut ctx = PixmapContext::new(Viewport::new(w, h));
        ctx.set_smoothing(false);
        ctx
    }

    #[test]
    fn starts_at_default_size_and_transparent() {
        let ctx = PixmapContext::default();
        assert_eq!(ctx.size(), Viewport::new(300, 150));
        assert_eq!(ctx.pixels().len(), 300 * 150 * 4);
        assert_eq!(ctx.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut ctx = ctx(4, 4);
        ctx.clear(Color::RAYWHITE);
        assert!(ctx.pixels().chunks(4).all(|p| p == [0xfa, 0xfa, 0xfa, 0xff]));
    }

    #[test]
    fn fill_rect_respects_transform() {
        let mut ctx = ctx(20, 20);
        let t = AffineTransform::from_translation(10.0, 10.0);
        ctx.fill_rect(Rect::from_center_size(Vec2::zero(), Vec2::new(4.0, 4.0)), Color::rgb(255, 0, 0), &t);

        assert_eq!(ctx.pixel(10, 10), Some(RED));
        assert_eq!(ctx.pixel(8, 8), Some(RED));
        assert_eq!(ctx.pixel(12, 12), Some([0, 0, 0, 0]));
        assert_eq!(ctx.pixel(2, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn stroke_polyline_marks_pixels_on_the_line() {
        let mut ctx = ctx(10, 10);
        ctx.stroke_polyline(&[Vec2::new(0.0, 5.0), Vec2::new(10.0, 5.0)], Color::rgb(255, 0, 0), 2.0);
        assert_eq!(ctx.pixel(5, 4), Some(RED));
        assert_eq!(ctx.pixel(5, 5), Some(RED));
        assert_eq!(ctx.pixel(5, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn single_point_polyline_draws_nothing() {
        let mut ctx = ctx(4, 4);
        ctx.stroke_polyline(&[Vec2::new(1.0, 1.0)], Color::BLACK, 3.0);
        assert!(ctx.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn resize_to_zero_disables_drawing() {
        let mut ctx = ctx(4, 4);
        ctx.set_size(Viewport::new(0, 4));
        ctx.clear(Color::BLACK);
        ctx.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK, &AffineTransform::identity());
        assert!(ctx.pixels().is_empty());

        ctx.set_size(Viewport::new(2, 2));
        assert_eq!(ctx.pixels().len(), 16);
    }

    #[test]
    fn text_without_fonts_is_a_no_op() {
        let mut ctx = ctx(8, 8);
        ctx.fill_text("hello", Vec2::zero(), Color::BLACK, &FontSpec::default());
        assert!(ctx.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn coverage_blend_is_source_over() {
        let mut pixmap = Pixmap::new(2, 1).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(0, 0, 255, 255));
        PixmapContext::blend_coverage(&mut pixmap, 0, 0, 2, &[255, 0], Color::rgb(255, 0, 0));
        assert_eq!(&pixmap.data()[0..4], &RED);
        assert_eq!(&pixmap.data()[4..8], &[0, 0, 255, 255]);
    }
}
