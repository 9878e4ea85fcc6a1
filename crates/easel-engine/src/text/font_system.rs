use std::fmt;

use crate::coords::Vec2;

use super::FontSpec;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Owns the loaded fonts, each registered under a family name.
///
/// Fonts are immutable after loading. The first font loaded is the fallback
/// for families that match nothing.
#[derive(Default)]
pub struct FontSystem {
    fonts: Vec<(String, fontdue::Font)>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Parses a TrueType or OpenType font from raw bytes and registers it as `family`.
    pub fn load_font(&mut self, family: &str, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push((family.to_string(), font));
        log::debug!("loaded font {family:?} as {id:?}");
        Ok(id)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Finds the font for the first family in `spec` that is registered
    /// (ASCII case-insensitive), else the fallback font.
    pub fn resolve(&self, spec: &FontSpec) -> Option<FontId> {
        spec.families()
            .find_map(|want| {
                self.fonts
                    .iter()
                    .position(|(name, _)| name.eq_ignore_ascii_case(want))
            })
            .or(if self.fonts.is_empty() { None } else { Some(0) })
            .map(FontId)
    }

    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0).map(|(_, font)| font)
    }

    /// Computes the `(width, height)` of `text` laid out on one line.
    ///
    /// Without any font loaded the height is `1.2 * size` and the width is 0.
    #[must_use]
    pub fn measure_text(&self, text: &str, spec: &FontSpec) -> Vec2 {
        use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

        let Some(font) = self.resolve(spec).and_then(|id| self.get(id)) else {
            return Vec2::new(0.0, spec.size * 1.2);
        };

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[font], &TextStyle::new(text, spec.size, 0));

        let glyphs = layout.glyphs();
        if glyphs.is_empty() {
            return Vec2::new(0.0, spec.size * 1.2);
        }

        // Pen position after each glyph, not the bitmap edge, so trailing
        // spaces count toward the width.
        let w = glyphs.iter().map(|g| {
            let m = font.metrics_indexed(g.key.glyph_index, spec.size);
            (g.x - m.xmin as f32 + m.advance_width).max(0.0)
        }).fold(0.0f32, f32::max);
        let h = glyphs.iter().map(|g| g.y + g.height as f32).fold(spec.size, f32::max);
        Vec2::new(w, h)
    }
}
