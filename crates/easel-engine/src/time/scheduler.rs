/// Opaque ticket for one requested frame.
///
/// Handles are never reused by a scheduler, so a cancelled or already
/// delivered handle can be told apart from the pending one.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FrameHandle(pub u64);

/// Host primitive that calls back once per display refresh.
///
/// `request_frame` asks for one callback at the next refresh; the host later
/// delivers the returned handle to `Renderer::on_frame`. `cancel_frame` must
/// tolerate handles that already fired or were never issued.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Scheduler driven by hand: the caller decides when a refresh happens.
///
/// Used headless and in tests.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next: u64,
    pending: Option<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The outstanding request, if any.
    #[inline]
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Removes and returns the outstanding request, i.e. "the refresh happened".
    #[inline]
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    /// Total `request_frame` calls so far.
    #[inline]
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Total `cancel_frame` calls that hit the outstanding request.
    #[inline]
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique() {
        let mut s = ManualScheduler::new();
        let a = s.request_frame();
        let b = s.request_frame();
        assert_ne!(a, b);
        assert_eq!(s.pending(), Some(b));
    }

    #[test]
    fn cancelling_stale_handle_is_harmless() {
        let mut s = ManualScheduler::new();
        let a = s.request_frame();
        assert_eq!(s.take_pending(), Some(a));
        s.cancel_frame(a);
        assert_eq!(s.cancelled(), 0);

        let b = s.request_frame();
        s.cancel_frame(b);
        assert_eq!(s.pending(), None);
        assert_eq!(s.cancelled(), 1);
    }
}
