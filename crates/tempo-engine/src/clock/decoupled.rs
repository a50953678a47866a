use std::fmt;

use super::contract::{AdjustableClock, Clock, FrameBasedClock, SourceClockHandle};
use super::error::ClockError;

/// Real time over which frames are counted before the FPS figure refreshes.
const FPS_WINDOW_MS: f64 = 1000.0;

/// Frame-based adjustable clock that tracks an optional source clock.
///
/// Starts unbound: with no source it runs on the host's real elapsed time.
/// Once bound it forwards start/stop/seek to the source and follows the
/// source's position each frame.
///
/// When the source refuses a position (a lead-in before the track starts, or a
/// track that has already ended) the clock keeps running on its own, retrying
/// the source every frame until it accepts. When a running source stops by
/// itself, this clock stops with it.
pub struct DecoupledClock {
    source: Option<SourceClockHandle>,

    current: f64,
    /// Rate used while unbound.
    rate: f64,
    running: bool,

    /// The source refused our position; we advance without it.
    ahead_of_source: bool,

    elapsed: f64,
    fps: f64,
    fps_window_ms: f64,
    fps_frames: u32,
}

impl DecoupledClock {
    pub fn new() -> Self {
        Self {
            source: None,
            current: 0.0,
            rate: 1.0,
            running: false,
            ahead_of_source: false,
            elapsed: 0.0,
            fps: 0.0,
            fps_window_ms: 0.0,
            fps_frames: 0,
        }
    }

    /// The current binding, if any.
    pub fn source(&self) -> Option<&SourceClockHandle> {
        self.source.as_ref()
    }

    /// Returns `true` while the clock is advancing without its source.
    pub fn is_ahead_of_source(&self) -> bool {
        self.ahead_of_source
    }

    /// Rebinds the clock. The current time is kept; a running clock brings
    /// the new source to that time and starts it.
    pub fn change_source(&mut self, source: Option<SourceClockHandle>) {
        self.source = source;
        self.ahead_of_source = false;

        if !self.running {
            return;
        }

        if let Some(source) = &self.source {
            let mut source = source.borrow_mut();
            if source.seek(self.current) {
                source.start();
            } else {
                source.stop();
            }
            self.ahead_of_source = !source.is_running();
        }
    }

    fn tally_frame(&mut self, real_elapsed_ms: f64) {
        self.fps_window_ms += real_elapsed_ms;
        self.fps_frames += 1;

        if self.fps_window_ms >= FPS_WINDOW_MS {
            self.fps = self.fps_frames as f64 * 1000.0 / self.fps_window_ms;
            self.fps_window_ms = 0.0;
            self.fps_frames = 0;
        }
    }
}

impl Default for DecoupledClock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DecoupledClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoupledClock")
            .field("bound", &self.source.is_some())
            .field("current", &self.current)
            .field("running", &self.running)
            .field("ahead_of_source", &self.ahead_of_source)
            .field("elapsed", &self.elapsed)
            .finish()
    }
}

impl Clock for DecoupledClock {
    fn current_time(&self) -> f64 {
        self.current
    }

    fn rate(&self) -> f64 {
        match &self.source {
            Some(source) => source.borrow().rate(),
            None => self.rate,
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

impl AdjustableClock for DecoupledClock {
    fn start(&mut self) {
        if let Some(source) = &self.source {
            let mut source = source.borrow_mut();
            if !self.ahead_of_source && !source.is_running() {
                // The source may have been swapped in at its own position.
                if source.seek(self.current) {
                    source.start();
                    // An exhausted source refuses to start.
                    self.ahead_of_source = !source.is_running();
                } else {
                    self.ahead_of_source = true;
                }
            }
        }

        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;

        if let Some(source) = &self.source {
            source.borrow_mut().stop();
        }
    }

    fn seek(&mut self, position: f64) -> bool {
        if let Some(source) = &self.source {
            let mut source = source.borrow_mut();

            if source.seek(position) {
                self.ahead_of_source = false;
                if self.running && !source.is_running() {
                    source.start();
                    self.ahead_of_source = !source.is_running();
                }
            } else {
                // A clamped source must not drag us back to its boundary.
                source.stop();
                self.ahead_of_source = true;
            }
        }

        self.current = position;
        true
    }

    fn set_rate(&mut self, rate: f64) -> Result<(), ClockError> {
        match &self.source {
            Some(source) => source.borrow_mut().set_rate(rate),
            None => {
                self.rate = rate;
                Ok(())
            }
        }
    }

    fn reset_speed_adjustments(&mut self) -> Result<(), ClockError> {
        match &self.source {
            Some(source) => source.borrow_mut().reset_speed_adjustments(),
            None => {
                self.rate = 1.0;
                Ok(())
            }
        }
    }
}

impl FrameBasedClock for DecoupledClock {
    fn elapsed_frame_time(&self) -> f64 {
        self.elapsed
    }

    fn frames_per_second(&self) -> f64 {
        self.fps
    }

    fn process_frame(&mut self, real_elapsed_ms: f64) {
        self.tally_frame(real_elapsed_ms);

        let last = self.current;

        if self.running {
            match &self.source {
                None => self.current += real_elapsed_ms * self.rate,
                Some(source) => {
                    let mut source = source.borrow_mut();

                    if source.is_running() {
                        self.current = source.current_time();
                    } else if self.ahead_of_source {
                        self.current += real_elapsed_ms * source.rate();
                        if source.seek(self.current) {
                            source.start();
                            self.ahead_of_source = !source.is_running();
                        }
                    } else {
                        log::debug!("source clock stopped at {:.2}ms", source.current_time());
                        self.current = source.current_time();
                        self.running = false;
                    }
                }
            }
        }

        self.elapsed = self.current - last;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::clock::ManualClock;

    fn bound(track: &Rc<RefCell<ManualClock>>) -> DecoupledClock {
        let handle: SourceClockHandle = track.clone();
        let mut clock = DecoupledClock::new();
        clock.change_source(Some(handle));
        clock
    }

    // ── unbound ───────────────────────────────────────────────────────────

    #[test]
    fn unbound_clock_runs_on_real_time() {
        let mut clock = DecoupledClock::new();
        clock.start();
        clock.process_frame(16.0);
        clock.process_frame(16.0);
        assert_eq!(clock.current_time(), 32.0);
        assert_eq!(clock.elapsed_frame_time(), 16.0);
    }

    #[test]
    fn stopped_clock_reports_zero_elapsed() {
        let mut clock = DecoupledClock::new();
        clock.seek(100.0);
        clock.process_frame(16.0);
        assert_eq!(clock.current_time(), 100.0);
        assert_eq!(clock.elapsed_frame_time(), 0.0);
    }

    // ── bound ─────────────────────────────────────────────────────────────

    #[test]
    fn bound_clock_follows_source() {
        let track = Rc::new(RefCell::new(ManualClock::new()));
        let mut clock = bound(&track);

        clock.start();
        assert!(track.borrow().is_running());

        track.borrow_mut().advance(20.0);
        clock.process_frame(20.0);
        assert_eq!(clock.current_time(), 20.0);
        assert_eq!(clock.time_info().elapsed, 20.0);
    }

    #[test]
    fn stop_and_seek_are_forwarded() {
        let track = Rc::new(RefCell::new(ManualClock::new()));
        let mut clock = bound(&track);

        clock.start();
        clock.stop();
        assert!(!track.borrow().is_running());

        assert!(clock.seek(750.0));
        assert_eq!(track.borrow().current_time(), 750.0);
        assert_eq!(clock.current_time(), 750.0);
    }

    #[test]
    fn stops_when_source_is_exhausted() {
        let track = Rc::new(RefCell::new(ManualClock::with_length(100.0)));
        let mut clock = bound(&track);
        clock.seek(90.0);
        clock.start();

        track.borrow_mut().advance(30.0);
        clock.process_frame(30.0);

        assert!(!clock.is_running());
        assert_eq!(clock.current_time(), 100.0);
    }

    #[test]
    fn lead_in_runs_ahead_then_hands_over_to_source() {
        let track = Rc::new(RefCell::new(ManualClock::new()));
        let mut clock = bound(&track);

        clock.seek(-100.0);
        assert!(clock.is_ahead_of_source());
        assert_eq!(clock.current_time(), -100.0);

        clock.start();
        assert!(!track.borrow().is_running());

        clock.process_frame(60.0);
        assert_eq!(clock.current_time(), -40.0);
        assert!(!track.borrow().is_running());

        clock.process_frame(60.0);
        assert_eq!(clock.current_time(), 20.0);
        assert!(track.borrow().is_running());
        assert!(!clock.is_ahead_of_source());

        track.borrow_mut().advance(16.0);
        clock.process_frame(16.0);
        assert_eq!(clock.current_time(), 36.0);
    }

    #[test]
    fn rate_mirrors_source() {
        let track = Rc::new(RefCell::new(ManualClock::new()));
        let mut clock = bound(&track);
        clock.set_rate(1.5).unwrap();
        assert_eq!(track.borrow().rate(), 1.5);
        assert_eq!(clock.rate(), 1.5);
    }

    #[test]
    fn change_source_while_running_brings_new_source_along() {
        let first = Rc::new(RefCell::new(ManualClock::new()));
        let second = Rc::new(RefCell::new(ManualClock::new()));
        let mut clock = bound(&first);
        clock.seek(300.0);
        clock.start();

        let handle: SourceClockHandle = second.clone();
        clock.change_source(Some(handle));
        assert_eq!(second.borrow().current_time(), 300.0);
        assert!(second.borrow().is_running());
    }

    #[test]
    fn start_brings_source_swapped_in_while_stopped_to_current_time() {
        let first = Rc::new(RefCell::new(ManualClock::new()));
        let second = Rc::new(RefCell::new(ManualClock::new()));
        let mut clock = bound(&first);
        clock.seek(500.0);

        let handle: SourceClockHandle = second.clone();
        clock.change_source(Some(handle));
        assert_eq!(second.borrow().current_time(), 0.0);

        clock.start();
        assert_eq!(second.borrow().current_time(), 500.0);
        assert!(second.borrow().is_running());

        second.borrow_mut().advance(16.0);
        clock.process_frame(16.0);
        assert_eq!(clock.current_time(), 516.0);
    }

    #[test]
    fn start_at_refused_position_runs_ahead_of_source() {
        let track = Rc::new(RefCell::new(ManualClock::new()));
        let mut clock = DecoupledClock::new();
        clock.seek(-50.0);

        let handle: SourceClockHandle = track.clone();
        clock.change_source(Some(handle));
        clock.start();

        assert!(clock.is_ahead_of_source());
        assert!(!track.borrow().is_running());
        clock.process_frame(20.0);
        assert_eq!(clock.current_time(), -30.0);
    }

    // ── frame timing ──────────────────────────────────────────────────────

    #[test]
    fn fps_refreshes_after_one_second_of_frames() {
        let mut clock = DecoupledClock::new();
        assert_eq!(clock.frames_per_second(), 0.0);

        for _ in 0..40 {
            clock.process_frame(25.0);
        }
        assert!((clock.frames_per_second() - 40.0).abs() < 1e-9);
    }
}
