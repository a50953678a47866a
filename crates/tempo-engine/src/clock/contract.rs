use std::cell::RefCell;
use std::rc::Rc;

use super::error::ClockError;

/// Read-only view of a clock.
pub trait Clock {
    /// Current time in milliseconds.
    fn current_time(&self) -> f64;

    /// Playback rate relative to real time.
    fn rate(&self) -> f64;

    fn is_running(&self) -> bool;
}

/// A clock that can be started, stopped, seeked and re-rated.
pub trait AdjustableClock: Clock {
    fn start(&mut self);

    fn stop(&mut self);

    /// Moves the clock to `position`.
    ///
    /// Returns `false` when the clock refuses the position (for example a
    /// track seeked past its end). A refusing clock may still clamp.
    fn seek(&mut self, position: f64) -> bool;

    fn set_rate(&mut self, rate: f64) -> Result<(), ClockError>;

    /// Restores the clock's rate to its natural value.
    fn reset_speed_adjustments(&mut self) -> Result<(), ClockError>;
}

/// Time values of one processed frame.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameTimeInfo {
    /// Clock time at the end of the frame, in milliseconds.
    pub current: f64,
    /// Clock time that passed during the frame, in milliseconds.
    pub elapsed: f64,
}

/// A clock whose time only moves when a frame is processed.
pub trait FrameBasedClock: Clock {
    fn elapsed_frame_time(&self) -> f64;

    fn frames_per_second(&self) -> f64;

    fn time_info(&self) -> FrameTimeInfo {
        FrameTimeInfo {
            current: self.current_time(),
            elapsed: self.elapsed_frame_time(),
        }
    }

    /// Advances the clock by one host frame that took `real_elapsed_ms`.
    fn process_frame(&mut self, real_elapsed_ms: f64);
}

/// The surface handed to downstream timing consumers.
pub trait GameplayClock: FrameBasedClock {
    fn is_paused(&self) -> bool;

    /// Baseline time used when gameplay is reset.
    fn start_time(&self) -> f64;

    /// Gameplay rate with every non-gameplay multiplier divided back out.
    fn true_gameplay_rate(&self) -> f64;
}

/// Shared handle to an externally owned source clock.
///
/// Single-threaded by construction: the frame host is the only thread that
/// ever touches gameplay time.
pub type SourceClockHandle = Rc<RefCell<dyn AdjustableClock>>;

/// Returns `true` if both handles refer to the same source clock.
///
/// Compares data pointers only; vtable pointers of the same type may differ
/// between codegen units.
pub fn same_source(a: &SourceClockHandle, b: &SourceClockHandle) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}
