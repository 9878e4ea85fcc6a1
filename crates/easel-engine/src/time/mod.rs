//! Time subsystem.
//!
//! Provides frame timing and frame scheduling without coupling to the runtime.
//! Intended usage:
//! - one `FrameClock` per render loop
//! - call `tick(now)` once per delivered frame to obtain `FrameTime`
//! - a `FrameScheduler` stands in for the host's display-refresh callback

mod frame_clock;
mod scheduler;

pub use frame_clock::{FrameClock, FrameTime};
pub use scheduler::{FrameHandle, FrameScheduler, ManualScheduler};
