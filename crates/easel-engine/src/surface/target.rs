use std::cell::Cell;
use std::rc::Rc;

use crate::coords::{Rect, Viewport};

/// The element hosting a renderer's visible surface (a window, a widget).
pub trait SurfaceTarget {
    /// A renderer attached its raster buffer of `size` pixels to this target.
    fn attach(&mut self, size: Viewport);

    /// Requests that the visible surface be moved/resized to `placement`.
    fn place(&mut self, placement: Rect);
}

/// Target that hosts nothing; placement requests are only logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedTarget;

impl SurfaceTarget for DetachedTarget {
    fn attach(&mut self, size: Viewport) {
        log::debug!("renderer attached without a target ({}x{})", size.width, size.height);
    }

    fn place(&mut self, placement: Rect) {
        log::debug!("placement {placement:?} ignored by detached target");
    }
}

/// Target that parks the latest placement request for its owner to apply.
///
/// Clones share one slot, so the window runtime keeps a clone and drains it
/// after each frame.
#[derive(Debug, Default, Clone)]
pub struct SharedPlacement {
    slot: Rc<Cell<Option<Rect>>>,
}

impl SharedPlacement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the latest unapplied placement.
    pub fn take(&self) -> Option<Rect> {
        self.slot.take()
    }
}

impl SurfaceTarget for SharedPlacement {
    fn attach(&mut self, _size: Viewport) {}

    fn place(&mut self, placement: Rect) {
        self.slot.set(Some(placement));
    }
}
