use std::fmt;

use super::adjustments::{true_gameplay_rate, RateAdjustments};
use super::contract::{
    AdjustableClock,
    Clock,
    FrameBasedClock,
    FrameTimeInfo,
    GameplayClock,
    SourceClockHandle,
};
use super::decoupled::DecoupledClock;
use super::error::ClockError;

/// Construction-time settings of a [`GameplayClockController`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GameplayClockConfig {
    /// Whether platform/user/beatmap offsets should be layered on top of the
    /// source. Recorded for the offset layer; the controller itself applies none.
    pub apply_offsets: bool,

    /// Initial baseline used by [`GameplayClockController::reset`].
    pub start_time: f64,
}

impl Default for GameplayClockConfig {
    fn default() -> Self {
        Self {
            apply_offsets: true,
            start_time: 0.0,
        }
    }
}

/// Single authority over gameplay time.
///
/// Wraps an externally owned source clock (usually the track) in an owned
/// [`DecoupledClock`] and exposes pausable, seekable, frame-stable time to
/// downstream consumers.
///
/// # Frame contract
///
/// The host drives the controller once per frame, in this order:
///
/// 1. [`update`](Self::update) processes the owned clock,
/// 2. consumers read time through `&dyn GameplayClock`,
/// 3. [`update_after_children`](Self::update_after_children) runs a start
///    deferred by [`start`](Self::start).
///
/// # Pause state
///
/// `is_paused` has a single mutator, [`set_paused`](Self::set_paused). A
/// transition to paused stops the owned clock; a transition to unpaused starts
/// it directly unless `start` has already scheduled the deferred start.
pub struct GameplayClockController {
    source_clock: SourceClockHandle,
    gameplay_clock: DecoupledClock,

    is_paused: bool,
    start_time: f64,
    apply_offsets: bool,

    /// Set by `start`, drained by `update_after_children`.
    start_pending: bool,

    non_gameplay_adjustments: RateAdjustments,

    seek_listeners: Vec<Box<dyn FnMut()>>,
    paused_listeners: Vec<Box<dyn FnMut(bool)>>,
}

impl GameplayClockController {
    /// Creates a paused controller over `source_clock`.
    ///
    /// The owned clock stays unbound until the first `start`/`reset` (or an
    /// explicit `change_source`).
    pub fn new(source_clock: SourceClockHandle, config: GameplayClockConfig) -> Self {
        Self {
            source_clock,
            gameplay_clock: DecoupledClock::new(),
            is_paused: true,
            start_time: config.start_time,
            apply_offsets: config.apply_offsets,
            start_pending: false,
            non_gameplay_adjustments: RateAdjustments::new(),
            seek_listeners: Vec::new(),
            paused_listeners: Vec::new(),
        }
    }

    // ── control ───────────────────────────────────────────────────────────

    /// Unpauses gameplay.
    ///
    /// If the owned clock is not running, it is first seeked to its own time so
    /// the source catches up with any drift it picked up while stopping, and
    /// the actual start is deferred to [`update_after_children`]. Consumers
    /// therefore see one frame at exactly the start time before time moves.
    ///
    /// [`update_after_children`]: Self::update_after_children
    ///
    /// The pause flag flips first; because the deferred start is already
    /// registered at that point, the pause transition does not start the clock
    /// itself. Paused listeners therefore fire before the seek listeners.
    pub fn start(&mut self) {
        self.ensure_source_clock_set();

        let deferred = !self.gameplay_clock.is_running() && !self.start_pending;
        if deferred {
            self.start_pending = true;
        }

        self.set_paused(false);

        if deferred {
            self.seek(self.gameplay_clock.current_time());
            log::debug!("gameplay clock start deferred to end of frame");
        }
    }

    /// Pauses gameplay. Stopping the owned clock follows from the pause transition.
    pub fn stop(&mut self) {
        self.set_paused(true);
    }

    /// Moves gameplay time to `time`, then notifies seek listeners.
    pub fn seek(&mut self, time: f64) {
        log::debug!("seeking gameplay clock to {time:.2}ms");

        self.gameplay_clock.seek(time);

        for listener in &mut self.seek_listeners {
            listener();
        }
    }

    /// Returns gameplay to the start time.
    ///
    /// `time`, when given, becomes the new start time. The pause state is left
    /// untouched: the clock restarts only if it was unpaused or `start_clock`
    /// is set.
    pub fn reset(&mut self, time: Option<f64>, start_clock: bool) {
        self.gameplay_clock.stop();

        self.ensure_source_clock_set();

        if let Some(time) = time {
            self.start_time = time;
        }

        log::debug!(
            "resetting gameplay clock to {:.2}ms (paused: {}, start: {start_clock})",
            self.start_time,
            self.is_paused,
        );

        self.seek(self.start_time);

        if !self.is_paused || start_clock {
            self.start();
        }
    }

    /// Replaces the source clock and rebinds the owned clock to it.
    pub fn change_source(&mut self, clock: SourceClockHandle) {
        log::debug!("changing gameplay clock source");
        self.source_clock = clock.clone();
        self.gameplay_clock.change_source(Some(clock));
    }

    /// The only write path of the pause flag.
    ///
    /// Listeners and the clock transition run only when the value changes.
    pub fn set_paused(&mut self, paused: bool) {
        if self.is_paused == paused {
            return;
        }

        self.is_paused = paused;
        self.apply_pause_transition(paused);

        for listener in &mut self.paused_listeners {
            listener(paused);
        }
    }

    fn apply_pause_transition(&mut self, paused: bool) {
        if paused {
            self.start_pending = false;
            self.gameplay_clock.stop();
            log::debug!("gameplay clock paused at {:.2}ms", self.gameplay_clock.current_time());
        } else if !self.start_pending {
            self.gameplay_clock.start();
            log::debug!("gameplay clock resumed at {:.2}ms", self.gameplay_clock.current_time());
        }
    }

    fn ensure_source_clock_set(&mut self) {
        if self.gameplay_clock.source().is_none() {
            self.gameplay_clock.change_source(Some(self.source_clock.clone()));
        }
    }

    // ── frame hooks ───────────────────────────────────────────────────────

    /// Processes the owned clock for a host frame that took `real_elapsed_ms`.
    pub fn update(&mut self, real_elapsed_ms: f64) {
        self.gameplay_clock.process_frame(real_elapsed_ms);

        log::trace!(
            "gameplay frame: current {:.2}ms, elapsed {:.2}ms",
            self.gameplay_clock.current_time(),
            self.gameplay_clock.elapsed_frame_time(),
        );
    }

    /// Runs the start deferred by [`start`](Self::start), if still wanted.
    pub fn update_after_children(&mut self) {
        if std::mem::take(&mut self.start_pending) && !self.is_paused {
            self.gameplay_clock.start();
            log::debug!("gameplay clock started at {:.2}ms", self.gameplay_clock.current_time());
        }
    }

    // ── observers ─────────────────────────────────────────────────────────

    /// Registers a callback fired after every seek.
    pub fn on_seek(&mut self, listener: impl FnMut() + 'static) {
        self.seek_listeners.push(Box::new(listener));
    }

    /// Registers a callback fired with the new value on every pause transition.
    pub fn on_paused_changed(&mut self, listener: impl FnMut(bool) + 'static) {
        self.paused_listeners.push(Box::new(listener));
    }

    // ── state ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    #[inline]
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Returns `true` while a deferred start waits for the end of the frame.
    #[inline]
    pub fn is_start_pending(&self) -> bool {
        self.start_pending
    }

    #[inline]
    pub fn applies_offsets(&self) -> bool {
        self.apply_offsets
    }

    pub fn source_clock(&self) -> &SourceClockHandle {
        &self.source_clock
    }

    /// The owned adjustable clock.
    pub fn gameplay_clock(&self) -> &DecoupledClock {
        &self.gameplay_clock
    }

    pub fn non_gameplay_adjustments(&self) -> &RateAdjustments {
        &self.non_gameplay_adjustments
    }

    pub fn non_gameplay_adjustments_mut(&mut self) -> &mut RateAdjustments {
        &mut self.non_gameplay_adjustments
    }

    /// [`rate`](Clock::rate) with every non-gameplay adjustment divided out.
    pub fn true_gameplay_rate(&self) -> f64 {
        true_gameplay_rate(self.gameplay_clock.rate(), self.non_gameplay_adjustments.iter())
    }
}

impl fmt::Debug for GameplayClockController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameplayClockController")
            .field("gameplay_clock", &self.gameplay_clock)
            .field("is_paused", &self.is_paused)
            .field("start_time", &self.start_time)
            .field("start_pending", &self.start_pending)
            .field("apply_offsets", &self.apply_offsets)
            .finish_non_exhaustive()
    }
}

impl Clock for GameplayClockController {
    fn current_time(&self) -> f64 {
        self.gameplay_clock.current_time()
    }

    fn rate(&self) -> f64 {
        self.gameplay_clock.rate()
    }

    fn is_running(&self) -> bool {
        self.gameplay_clock.is_running()
    }
}

impl FrameBasedClock for GameplayClockController {
    fn elapsed_frame_time(&self) -> f64 {
        self.gameplay_clock.elapsed_frame_time()
    }

    fn frames_per_second(&self) -> f64 {
        self.gameplay_clock.frames_per_second()
    }

    fn time_info(&self) -> FrameTimeInfo {
        self.gameplay_clock.time_info()
    }

    /// No-op: the host advances the owned clock through
    /// [`GameplayClockController::update`], and a second entry point would
    /// process the same frame twice.
    fn process_frame(&mut self, _real_elapsed_ms: f64) {}
}

impl AdjustableClock for GameplayClockController {
    fn start(&mut self) {
        GameplayClockController::start(self);
    }

    fn stop(&mut self) {
        GameplayClockController::stop(self);
    }

    fn seek(&mut self, position: f64) -> bool {
        GameplayClockController::seek(self, position);
        true
    }

    fn set_rate(&mut self, _rate: f64) -> Result<(), ClockError> {
        log::warn!("rejected direct rate change on gameplay clock");
        Err(ClockError::unsupported("set_rate"))
    }

    fn reset_speed_adjustments(&mut self) -> Result<(), ClockError> {
        log::warn!("rejected speed adjustment reset on gameplay clock");
        Err(ClockError::unsupported("reset_speed_adjustments"))
    }
}

impl GameplayClock for GameplayClockController {
    fn is_paused(&self) -> bool {
        self.is_paused
    }

    fn start_time(&self) -> f64 {
        self.start_time
    }

    fn true_gameplay_rate(&self) -> f64 {
        GameplayClockController::true_gameplay_rate(self)
    }
}
