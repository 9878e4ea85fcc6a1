use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds (clamped).
    pub dt: f32,

    /// Monotonic timestamp of the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Timestamps are passed in by the caller so the host decides what "now" is
/// (the display refresh time) and tests can step time deterministically.
///
/// Delta time is clamped so a long pause (debugger, suspended window) shows up
/// as one bounded step instead of a jump.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Longest step reported by a default clock.
    pub const DEFAULT_DT_MAX: Duration = Duration::from_millis(100);

    /// Creates a clock starting at `start` with clamps `[0, 100 ms]`.
    pub fn new(start: Instant) -> Self {
        Self::with_clamps(start, Duration::ZERO, Self::DEFAULT_DT_MAX)
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(start: Instant, dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: start,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the baseline and the frame counter.
    ///
    /// Called when a loop (re)starts so the first frame does not report the idle gap.
    pub fn reset(&mut self, now: Instant) {
        self.last = now;
        self.frame_index = 0;
    }

    /// Advances the clock to `now` and returns a new `FrameTime`.
    ///
    /// A `now` earlier than the previous tick yields the minimum step.
    pub fn tick(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self
            .frame_index
            .wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn reports_elapsed_time() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(t0);
        let ft = clock.tick(t0 + ms(16));
        assert!((ft.dt - 0.016).abs() < 1e-6);
        assert_eq!(ft.frame_index, 0);
        assert_eq!(clock.tick(t0 + ms(32)).frame_index, 1);
    }

    #[test]
    fn clamps_long_pauses_to_a_tenth_of_a_second() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(t0);
        let ft = clock.tick(t0 + Duration::from_secs(5));
        assert!((ft.dt - 0.1).abs() < 1e-6);
    }

    #[test]
    fn time_going_backwards_gives_minimum_step() {
        let t0 = Instant::now();
        let mut clock = FrameClock::with_clamps(t0 + ms(10), ms(1), ms(50));
        assert!((clock.tick(t0).dt - 0.001).abs() < 1e-6);
    }

    #[test]
    fn reset_moves_baseline_and_counter() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(t0);
        clock.tick(t0 + ms(20));
        clock.reset(t0 + Duration::from_secs(60));
        let ft = clock.tick(t0 + Duration::from_secs(60) + ms(8));
        assert!((ft.dt - 0.008).abs() < 1e-6);
        assert_eq!(ft.frame_index, 0);
    }
}
