//! 2D affine transforms.
//!
//! An [`AffineTransform`] maps the input space of a camera (world units) onto
//! raster pixels. Composition is right-multiplication: `a.multiply(&b)` makes
//! `b` act first on a point, then `a`.

mod affine;
mod error;

pub use affine::AffineTransform;
pub use error::TransformError;
