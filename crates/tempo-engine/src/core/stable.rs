use crate::clock::GameplayClock;

use super::app::{AppControl, TimingConsumer};

/// Consumer that keeps its own notion of current and elapsed time.
///
/// It ignores the clock's reported elapsed time and derives elapsed from the
/// difference between the times it has observed, so its first frame always
/// reports zero elapsed.
#[derive(Debug, Default, Clone)]
pub struct FrameStableTime {
    current: Option<f64>,
    elapsed: f64,
    frames: u64,
}

impl FrameStableTime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last observed gameplay time; `None` before the first frame.
    pub fn current_time(&self) -> Option<f64> {
        self.current
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl TimingConsumer for FrameStableTime {
    fn update(&mut self, clock: &dyn GameplayClock) -> AppControl {
        let now = clock.current_time();

        self.elapsed = match self.current {
            Some(previous) => now - previous,
            None => 0.0,
        };
        self.current = Some(now);
        self.frames += 1;

        AppControl::Continue
    }
}
