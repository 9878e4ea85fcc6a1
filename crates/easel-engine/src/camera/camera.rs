use crate::coords::Vec2;
use crate::transform::{AffineTransform, TransformError};

/// Declarative 2D camera.
///
/// Holds absolute rotation, scale and position and owns the transform derived
/// from them. Every setter rebuilds the transform from scratch, so setting the
/// same value twice is a no-op and no external code can desync the two.
///
/// A world point `p` lands on screen at `offset + S·R·(p + pos)`:
/// - `pos` shifts the world before projection (world units)
/// - `rotation` in radians, clockwise on a +Y-down raster
/// - `scale` converts world units to pixels per axis
/// - `offset` moves the projected origin (pixels), e.g. to the viewport center
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    rotation: f32,
    scale: Vec2,
    pos: Vec2,
    offset: Vec2,
    view: AffineTransform,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Self {
            rotation: 0.0,
            scale: Vec2::one(),
            pos: Vec2::zero(),
            offset: Vec2::zero(),
            view: AffineTransform::identity(),
        }
    }

    pub fn set_rotation(&mut self, radians: f32) -> &mut Self {
        self.rotation = radians;
        self.rebuild()
    }

    pub fn set_scale(&mut self, scale: Vec2) -> &mut Self {
        self.scale = scale;
        self.rebuild()
    }

    pub fn set_pos(&mut self, pos: Vec2) -> &mut Self {
        self.pos = pos;
        self.rebuild()
    }

    pub fn set_offset(&mut self, offset: Vec2) -> &mut Self {
        self.offset = offset;
        self.rebuild()
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    #[inline]
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Snapshot of the world-to-screen transform, ready for `Renderer::set_camera`.
    #[inline]
    pub fn view_matrix_2d(&self) -> AffineTransform {
        self.view
    }

    #[inline]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        self.view.transform_point(world)
    }

    /// Fails when either scale axis is zero.
    pub fn screen_to_world(&self, screen: Vec2) -> Result<Vec2, TransformError> {
        Ok(self.view.inverse()?.transform_point(screen))
    }

    fn rebuild(&mut self) -> &mut Self {
        let mut view = AffineTransform::from_translation(self.offset.x, self.offset.y);
        view.scale(self.scale.x, self.scale.y)
            .rotate(self.rotation)
            .translate(self.pos.x, self.pos.y);
        self.view = view;
        self
    }
}
