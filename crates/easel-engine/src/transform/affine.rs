use crate::coords::Vec2;

use super::TransformError;

/// 2×3 affine matrix `[[a, c, tx], [b, d, ty]]`.
///
/// Mutators compose on the right (`self = self ∘ other`): the most recently
/// composed primitive is the first one applied to an input point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AffineTransform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    #[inline]
    pub const fn new(a: f32, b: f32, c: f32, d: f32, tx: f32, ty: f32) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    #[inline]
    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    #[inline]
    pub const fn from_translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    #[inline]
    pub const fn from_scale(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Counter-clockwise in a +Y-up frame, clockwise on a +Y-down raster.
    #[inline]
    pub fn from_rotation(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Returns `self ∘ other` without mutating either operand.
    #[must_use]
    pub fn then(&self, other: &AffineTransform) -> AffineTransform {
        let (s, o) = (self, other);
        AffineTransform {
            a: s.a * o.a + s.c * o.b,
            b: s.b * o.a + s.d * o.b,
            c: s.a * o.c + s.c * o.d,
            d: s.b * o.c + s.d * o.d,
            tx: s.a * o.tx + s.c * o.ty + s.tx,
            ty: s.b * o.tx + s.d * o.ty + s.ty,
        }
    }

    /// `self = self ∘ other`.
    ///
    /// The product is built from a snapshot of both operands before any field
    /// is written, so `t.multiply(&t)` squares the transform.
    pub fn multiply(&mut self, other: &AffineTransform) -> &mut Self {
        *self = self.then(other);
        self
    }

    pub fn translate(&mut self, tx: f32, ty: f32) -> &mut Self {
        self.multiply(&Self::from_translation(tx, ty))
    }

    pub fn scale(&mut self, sx: f32, sy: f32) -> &mut Self {
        self.multiply(&Self::from_scale(sx, sy))
    }

    pub fn rotate(&mut self, angle: f32) -> &mut Self {
        self.multiply(&Self::from_rotation(angle))
    }

    #[inline]
    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Returns the matrix inverse.
    ///
    /// Only an exactly-zero determinant is rejected; nearly singular matrices
    /// invert to very large coefficients.
    pub fn inverse(&self) -> Result<AffineTransform, TransformError> {
        let det = self.determinant();
        if det == 0.0 {
            return Err(TransformError::NotInvertible { determinant: det });
        }

        let inv = 1.0 / det;
        Ok(AffineTransform {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            tx: (self.c * self.ty - self.d * self.tx) * inv,
            ty: (self.b * self.tx - self.a * self.ty) * inv,
        })
    }

    /// Replaces the transform with its inverse. Left untouched on error.
    pub fn invert(&mut self) -> Result<&mut Self, TransformError> {
        *self = self.inverse()?;
        Ok(self)
    }

    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    /// Offsets `angle` by the rotation baked into the transform.
    #[inline]
    pub fn transform_angle(&self, angle: f32) -> f32 {
        angle + self.angle()
    }

    /// Rotation component, `atan2(b, a)`.
    #[inline]
    pub fn angle(&self) -> f32 {
        self.b.atan2(self.a)
    }

    /// Effective scale along each axis regardless of rotation.
    #[inline]
    pub fn scale_of(&self) -> Vec2 {
        Vec2::new(
            (self.a * self.a + self.c * self.c).sqrt(),
            (self.b * self.b + self.d * self.d).sqrt(),
        )
    }

    #[inline]
    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.tx, self.ty)
    }

    pub fn approx_eq(&self, other: &AffineTransform, eps: f32) -> bool {
        [
            self.a - other.a,
            self.b - other.b,
            self.c - other.c,
            self.d - other.d,
            self.tx - other.tx,
            self.ty - other.ty,
        ]
        .iter()
        .all(|d| d.abs() <= eps)
    }
}
