use std::time::Instant;

use super::contract::{AdjustableClock, Clock};
use super::error::ClockError;

/// Real-time source clock backed by [`Instant`].
///
/// Time accumulates while running, scaled by the rate. Changing the rate
/// re-anchors the clock so past time is not rescaled.
#[derive(Debug, Clone)]
pub struct StopwatchClock {
    /// Time at the last anchor, in milliseconds.
    anchored: f64,
    /// Set while running.
    anchor: Option<Instant>,
    rate: f64,
}

impl StopwatchClock {
    pub fn new() -> Self {
        Self {
            anchored: 0.0,
            anchor: None,
            rate: 1.0,
        }
    }

    fn reanchor(&mut self) {
        self.anchored = self.current_time();
        if self.anchor.is_some() {
            self.anchor = Some(Instant::now());
        }
    }
}

impl Default for StopwatchClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StopwatchClock {
    fn current_time(&self) -> f64 {
        match self.anchor {
            Some(at) => self.anchored + at.elapsed().as_secs_f64() * 1000.0 * self.rate,
            None => self.anchored,
        }
    }

    fn rate(&self) -> f64 {
        self.rate
    }

    fn is_running(&self) -> bool {
        self.anchor.is_some()
    }
}

impl AdjustableClock for StopwatchClock {
    fn start(&mut self) {
        if self.anchor.is_none() {
            self.anchor = Some(Instant::now());
        }
    }

    fn stop(&mut self) {
        self.anchored = self.current_time();
        self.anchor = None;
    }

    fn seek(&mut self, position: f64) -> bool {
        self.anchored = position;
        if self.anchor.is_some() {
            self.anchor = Some(Instant::now());
        }
        true
    }

    fn set_rate(&mut self, rate: f64) -> Result<(), ClockError> {
        self.reanchor();
        self.rate = rate;
        Ok(())
    }

    fn reset_speed_adjustments(&mut self) -> Result<(), ClockError> {
        self.set_rate(1.0)
    }
}
