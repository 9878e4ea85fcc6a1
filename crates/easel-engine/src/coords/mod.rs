//! Geometry value types shared by the transform, camera and renderer.
//!
//! Screen space:
//! - pixels of the raster buffer
//! - origin top-left
//! - +X right, +Y down
//!
//! World space is whatever the active camera maps onto screen space.

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
