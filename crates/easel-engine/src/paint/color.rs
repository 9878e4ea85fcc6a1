/// Premultiplied RGBA color, channels in `[0, 1]`.
///
/// Invariant:
/// - `rgb` components are multiplied by `a` (premultiplied alpha).
///
/// Channels are sRGB-encoded; the CPU rasterizer writes them to the buffer
/// unchanged.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    /// Fallback color for primitives drawn with an invalid paint (`#80f`).
    pub const ERROR: Color = Color::opaque_u8(0x88, 0x00, 0xff);
    /// Default background (`#fafafa`).
    pub const RAYWHITE: Color = Color::opaque_u8(0xfa, 0xfa, 0xfa);
    pub const BLACK: Color = Color::opaque_u8(0, 0, 0);
    pub const WHITE: Color = Color::opaque_u8(0xff, 0xff, 0xff);
    pub const LIGHT_STEEL_BLUE: Color = Color::opaque_u8(0xb0, 0xc4, 0xde);
    pub const INDIAN_RED: Color = Color::opaque_u8(0xcd, 0x5c, 0x5c);

    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    #[inline]
    const fn opaque_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Creates a premultiplied color from straight sRGB bytes (`0`–`255`).
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Opaque color from bytes.
    #[inline]
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_srgb_u8(r, g, b, 255)
    }

    /// Color from bytes with alpha in `[0, 1]`.
    #[inline]
    pub fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::from_straight(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a)
    }

    /// Opaque color from a `0xRRGGBB` literal.
    #[inline]
    pub fn hex(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Opaque color from a short `0xRGB` literal; each nibble is doubled (`0x80f` → `#8800ff`).
    #[inline]
    pub fn hex3(rgb: u16) -> Self {
        let nibble = |shift: u16| ((rgb >> shift) & 0xf) as u8 * 0x11;
        Self::rgb(nibble(8), nibble(4), nibble(0))
    }

    /// Opaque color from hue (degrees), saturation and lightness (percent).
    pub fn hsl(h: f32, s: f32, l: f32) -> Self {
        Self::hsla(h, s, l, 1.0)
    }

    /// [`hsl`](Self::hsl) with alpha in `[0, 1]`.
    pub fn hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        let h = h.rem_euclid(360.0);
        let s = (s / 100.0).clamp(0.0, 1.0);
        let l = (l / 100.0).clamp(0.0, 1.0);

        // CSS Color 4 hsl-to-rgb.
        let k = |n: f32| (n + h / 30.0).rem_euclid(12.0);
        let amp = s * l.min(1.0 - l);
        let f = |n: f32| l - amp * (k(n) - 3.0).min(9.0 - k(n)).clamp(-1.0, 1.0);

        Self::from_straight(f(0.0), f(8.0), f(4.0), a)
    }

    /// Creates a premultiplied color from premultiplied components.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a premultiplied color from straight alpha components.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: (r.clamp(0.0, 1.0)) * a,
            g: (g.clamp(0.0, 1.0)) * a,
            b: (b.clamp(0.0, 1.0)) * a,
            a,
        }
    }

    /// Returns a straight-alpha representation.
    ///
    /// For `a == 0`, RGB is returned as 0.
    #[inline]
    pub fn to_straight(self) -> (f32, f32, f32, f32) {
        if self.a <= 0.0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let inv = 1.0 / self.a;
            (self.r * inv, self.g * inv, self.b * inv, self.a)
        }
    }

    /// Straight-alpha bytes, as raster backends expect them.
    pub fn to_rgba8(self) -> [u8; 4] {
        let (r, g, b, a) = self.to_straight();
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [byte(r), byte(g), byte(b), byte(a)]
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}
