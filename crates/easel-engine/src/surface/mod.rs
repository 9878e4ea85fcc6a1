//! Drawing surface.
//!
//! [`Renderer`] turns shape descriptors into raster calls and drives the frame
//! loop. Primitives fall in two groups:
//!
//! | primitive | space |
//! |-----------|-------|
//! | `rectangle`, `square`, `path` | world (mapped through the active camera) |
//! | `line`, `text`, `background` | screen (buffer pixels, camera ignored) |
//!
//! Descriptors with missing required fields are skipped silently, and draw
//! calls never fail, so one bad call cannot stop a running loop.

mod renderer;
pub mod shapes;
mod target;

pub use renderer::{FrameCallback, Renderer, RendererInfo, RendererOptions, DEFAULT_BACKGROUND};
pub use shapes::{
    Background, Line, Path, PathPoints, Rectangle, ResizeOptions, Segment, Square, Text, TextStyle,
};
pub use target::{DetachedTarget, SharedPlacement, SurfaceTarget};
