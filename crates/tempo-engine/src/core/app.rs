use crate::clock::GameplayClock;

/// Control directive returned by consumer callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// A downstream component that reads gameplay time once per frame.
///
/// Consumers get a read-only view; the only way to affect time is through
/// the controller's own API, outside of the update pass.
pub trait TimingConsumer {
    /// Called once per host frame, after the gameplay clock was processed and
    /// before deferred clock actions run.
    fn update(&mut self, clock: &dyn GameplayClock) -> AppControl;
}

impl<F> TimingConsumer for F
where
    F: FnMut(&dyn GameplayClock) -> AppControl,
{
    fn update(&mut self, clock: &dyn GameplayClock) -> AppControl {
        self(clock)
    }
}
