//! Raster backends.
//!
//! A [`RasterContext`] is the immediate-mode surface the renderer draws into.
//! There is no ambient transform: every call that needs one takes it as an
//! argument, so a primitive can never leak its transform into the next.
//!
//! Backends:
//! - [`PixmapContext`]: CPU rasterizer (`tiny-skia` shapes, `fontdue` glyphs)
//! - [`RecordingContext`]: records calls, for tests and headless runs

mod context;
mod pixmap;
mod recording;

pub use context::RasterContext;
pub use pixmap::PixmapContext;
pub use recording::{RasterOp, RecordingContext};

use crate::coords::Viewport;

/// Buffer size a fresh context starts with, before any resize.
pub const DEFAULT_SIZE: Viewport = Viewport::new(300, 150);
