//! Frame timing utilities.
//!
//! `Time` is produced once per frame by the application runner and passed
//! into every callback via `AppContext`.  The runner owns the `TimeClock`
//! that produces snapshots.

use std::time::Instant;

/// Largest delta a single frame may report, in seconds.
const MAX_DELTA: f32 = 0.1;

/// A snapshot of timing information for the current frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Time {
    /// Seconds elapsed since the previous frame, clamped to 0.1.
    pub delta: f32,
    /// Total seconds elapsed since the application started.
    pub elapsed: f64,
    /// Number of frames rendered so far (starts at 0 for the first frame).
    pub frame_count: u64,
    /// Instantaneous frames-per-second derived from `delta`.
    pub fps: f32,
}

// ─── Clock (lives in the runner) ───────────────────────────────────────────

/// Stateful timer that accumulates time and produces [`Time`] snapshots.
pub struct TimeClock {
    start:       Instant,
    last_tick:   Instant,
    frame_count: u64,
}

impl TimeClock {
    /// Create a new clock, starting the epoch now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start:       now,
            last_tick:   now,
            frame_count: 0,
        }
    }

    /// Return the current [`Time`] snapshot without advancing the clock.
    ///
    /// Callbacks off the hot frame path (`setup`, `on_resize`) still get
    /// valid timing data without bumping the frame counter.
    pub fn peek(&self) -> Time {
        self.snapshot(Instant::now())
    }

    /// Advance by one frame.  Returns the [`Time`] snapshot for this frame.
    pub fn tick(&mut self) -> Time {
        let now  = Instant::now();
        let time = self.snapshot(now);
        self.last_tick    = now;
        self.frame_count += 1;
        time
    }

    fn snapshot(&self, now: Instant) -> Time {
        let delta   = (now - self.last_tick).as_secs_f32().min(MAX_DELTA);
        let elapsed = (now - self.start).as_secs_f64();
        let fps     = if delta > 0.0 { 1.0 / delta } else { 0.0 };
        Time { delta, elapsed, frame_count: self.frame_count, fps }
    }
}

impl Default for TimeClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_advances_frame_count() {
        let mut clock = TimeClock::new();
        assert_eq!(clock.tick().frame_count, 0);
        assert_eq!(clock.tick().frame_count, 1);
        assert_eq!(clock.peek().frame_count, 2);
    }

    #[test]
    fn delta_is_clamped() {
        let clock = TimeClock::new();
        assert!(clock.peek().delta <= MAX_DELTA);
    }
}
