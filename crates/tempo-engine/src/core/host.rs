use crate::clock::GameplayClockController;
use crate::time::{FrameClock, FrameTime};

use super::app::{AppControl, TimingConsumer};

/// Headless frame host.
///
/// Each frame runs in a fixed order:
/// 1. the controller processes its owned clock,
/// 2. every consumer updates, in slice order,
/// 3. the controller runs actions deferred to the end of the frame.
#[derive(Debug, Default)]
pub struct FrameHost {
    clock: FrameClock,
    last: Option<FrameTime>,
}

impl FrameHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a preconfigured frame clock (custom clamps).
    pub fn with_clock(clock: FrameClock) -> Self {
        Self { clock, last: None }
    }

    /// Timing of the most recently run frame.
    pub fn last_frame(&self) -> Option<FrameTime> {
        self.last
    }

    pub fn frame_clock_mut(&mut self) -> &mut FrameClock {
        &mut self.clock
    }

    /// Runs one frame timed by the wall clock.
    pub fn tick(
        &mut self,
        controller: &mut GameplayClockController,
        consumers: &mut [&mut dyn TimingConsumer],
    ) -> AppControl {
        let time = self.clock.tick();
        self.run_frame(time, controller, consumers)
    }

    /// Runs one frame with explicit timing.
    pub fn run_frame(
        &mut self,
        time: FrameTime,
        controller: &mut GameplayClockController,
        consumers: &mut [&mut dyn TimingConsumer],
    ) -> AppControl {
        self.last = Some(time);

        controller.update(time.elapsed_ms());

        // Every consumer sees the frame even if an earlier one asked to exit.
        let mut control = AppControl::Continue;
        for consumer in consumers.iter_mut() {
            if consumer.update(&*controller) == AppControl::Exit {
                control = AppControl::Exit;
            }
        }

        controller.update_after_children();

        if control == AppControl::Exit {
            log::debug!("consumer requested exit at frame {}", time.frame_index);
        }

        control
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use crate::clock::{
        Clock,
        GameplayClock,
        GameplayClockConfig,
        ManualClock,
        SourceClockHandle,
    };
    use crate::core::FrameStableTime;

    fn setup(start_time: f64) -> (Rc<RefCell<ManualClock>>, GameplayClockController) {
        let track = Rc::new(RefCell::new(ManualClock::new()));
        let handle: SourceClockHandle = track.clone();
        let controller = GameplayClockController::new(
            handle,
            GameplayClockConfig { start_time, ..GameplayClockConfig::default() },
        );
        (track, controller)
    }

    fn step(
        host: &mut FrameHost,
        track: &Rc<RefCell<ManualClock>>,
        controller: &mut GameplayClockController,
        consumers: &mut [&mut dyn TimingConsumer],
    ) -> AppControl {
        let time = host.frame_clock_mut().tick_with(Duration::from_millis(16));
        track.borrow_mut().advance(time.elapsed_ms());
        host.run_frame(time, controller, consumers)
    }

    #[test]
    fn consumer_sees_exact_start_time_then_correct_elapsed() {
        let (track, mut controller) = setup(2000.0);
        let mut host = FrameHost::new();
        let mut stable = FrameStableTime::new();

        controller.reset(None, true);

        step(&mut host, &track, &mut controller, &mut [&mut stable]);
        assert_eq!(stable.current_time(), Some(2000.0));
        assert_eq!(stable.elapsed(), 0.0);

        step(&mut host, &track, &mut controller, &mut [&mut stable]);
        assert!((stable.current_time().unwrap() - 2016.0).abs() < 1e-3);
        assert!((stable.elapsed() - 16.0).abs() < 1e-3);
    }

    #[test]
    fn deferred_start_runs_after_consumers() {
        let (track, mut controller) = setup(0.0);
        let mut host = FrameHost::new();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let record = seen.clone();
        let mut probe = move |clock: &dyn GameplayClock| {
            record.borrow_mut().push(clock.is_running());
            AppControl::Continue
        };

        controller.start();
        step(&mut host, &track, &mut controller, &mut [&mut probe]);
        assert!(controller.is_running());
        step(&mut host, &track, &mut controller, &mut [&mut probe]);

        assert_eq!(*seen.borrow(), vec![false, true]);
    }

    #[test]
    fn exit_is_reported_after_all_consumers_ran() {
        let (track, mut controller) = setup(0.0);
        let mut host = FrameHost::new();
        let mut quitter = |_: &dyn GameplayClock| AppControl::Exit;
        let mut stable = FrameStableTime::new();

        let control = step(&mut host, &track, &mut controller, &mut [&mut quitter, &mut stable]);
        assert_eq!(control, AppControl::Exit);
        assert_eq!(stable.frames(), 1);
        assert_eq!(host.last_frame().map(|f| f.frame_index), Some(0));
    }

    #[test]
    fn paused_gameplay_holds_time_across_frames() {
        let (track, mut controller) = setup(0.0);
        let mut host = FrameHost::new();
        let mut stable = FrameStableTime::new();

        controller.reset(Some(750.0), true);
        step(&mut host, &track, &mut controller, &mut [&mut stable]);
        step(&mut host, &track, &mut controller, &mut [&mut stable]);
        controller.stop();

        let frozen = controller.current_time();
        for _ in 0..3 {
            step(&mut host, &track, &mut controller, &mut [&mut stable]);
        }
        assert_eq!(controller.current_time(), frozen);
        assert_eq!(stable.elapsed(), 0.0);
        assert!(!track.borrow().is_running());
    }
}
