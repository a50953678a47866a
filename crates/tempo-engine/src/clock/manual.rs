use super::contract::{AdjustableClock, Clock};
use super::error::ClockError;

/// Deterministic source clock whose time only moves through [`advance`].
///
/// Models a track: it may have a `length`, refuses seeks outside
/// `[0, length]`, and stops by itself once it runs off the end.
///
/// [`advance`]: ManualClock::advance
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: f64,
    rate: f64,
    running: bool,
    length: Option<f64>,
}

impl ManualClock {
    /// An unbounded clock at time zero.
    pub fn new() -> Self {
        Self {
            current: 0.0,
            rate: 1.0,
            running: false,
            length: None,
        }
    }

    /// A clock that exhausts after `length` milliseconds.
    pub fn with_length(length: f64) -> Self {
        Self {
            length: Some(length.max(0.0)),
            ..Self::new()
        }
    }

    pub fn length(&self) -> Option<f64> {
        self.length
    }

    /// Returns `true` once the clock has reached its end.
    pub fn is_exhausted(&self) -> bool {
        self.length.is_some_and(|len| self.current >= len)
    }

    /// Advances the clock by `real_ms` of host time, scaled by the rate.
    ///
    /// Does nothing while stopped.
    pub fn advance(&mut self, real_ms: f64) {
        if !self.running {
            return;
        }

        self.current += real_ms * self.rate;

        if let Some(len) = self.length {
            if self.current >= len {
                self.current = len;
                self.running = false;
                log::trace!("manual clock exhausted at {len:.2}ms");
            }
        }

        if self.current < 0.0 {
            self.current = 0.0;
            self.running = false;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn current_time(&self) -> f64 {
        self.current
    }

    fn rate(&self) -> f64 {
        self.rate
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

impl AdjustableClock for ManualClock {
    fn start(&mut self) {
        // An exhausted track cannot be started until it is seeked back.
        if !self.is_exhausted() {
            self.running = true;
        }
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn seek(&mut self, position: f64) -> bool {
        let upper = self.length.unwrap_or(f64::INFINITY);
        self.current = position.clamp(0.0, upper);
        self.current == position
    }

    fn set_rate(&mut self, rate: f64) -> Result<(), ClockError> {
        self.rate = rate;
        Ok(())
    }

    fn reset_speed_adjustments(&mut self) -> Result<(), ClockError> {
        self.rate = 1.0;
        Ok(())
    }
}
