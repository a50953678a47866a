use std::time::{Duration, Instant};

/// Real-time snapshot of a single host frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Real time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp of the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    /// Frame delta in milliseconds, the unit every clock in this crate uses.
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.dt as f64 * 1000.0
    }
}

/// Frame clock producing `FrameTime` snapshots for the frame host.
///
/// Delta time is clamped so that a debugger pause or a stalled host cannot hand
/// the gameplay clock a multi-second jump in a single frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps (0.1 ms .. 250 ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the clock baseline without touching the frame counter.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Number of frames produced so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_index
    }

    /// Advances the clock by the real time since the last tick.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last);
        self.last = now;
        self.emit(dt, now)
    }

    /// Advances the clock by an explicit delta instead of reading the wall clock.
    ///
    /// Used by deterministic hosts and tests; the same clamps apply.
    pub fn tick_with(&mut self, dt: Duration) -> FrameTime {
        let now = self.last + dt;
        self.last = now;
        self.emit(dt, now)
    }

    fn emit(&mut self, dt: Duration, now: Instant) -> FrameTime {
        let dt = dt.clamp(self.dt_min, self.dt_max);

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn tick_with_reports_delta_in_ms() {
        let mut clock = FrameClock::new();
        let ft = clock.tick_with(Duration::from_millis(16));
        assert!(approx(ft.elapsed_ms(), 16.0));
    }

    #[test]
    fn frame_index_increments() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick_with(Duration::from_millis(1)).frame_index, 0);
        assert_eq!(clock.tick_with(Duration::from_millis(1)).frame_index, 1);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn long_stall_is_clamped_to_max() {
        let mut clock = FrameClock::new();
        let ft = clock.tick_with(Duration::from_secs(5));
        assert!(approx(ft.elapsed_ms(), 250.0));
    }

    #[test]
    fn zero_delta_is_clamped_to_min() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(100));
        let ft = clock.tick_with(Duration::ZERO);
        assert!(approx(ft.elapsed_ms(), 1.0));
    }
}
