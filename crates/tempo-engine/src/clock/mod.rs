//! Clock subsystem.
//!
//! Gameplay time flows one way:
//!
//! ```text
//! source clock (track, stopwatch)  →  DecoupledClock  →  GameplayClockController  →  consumers
//! ```
//!
//! - [`Clock`], [`AdjustableClock`], [`FrameBasedClock`] and [`GameplayClock`]
//!   are capability traits, narrowest first. Consumers only ever receive a
//!   `&dyn GameplayClock`, which has no mutators at all.
//! - [`GameplayClockController`] is the single writer of gameplay time.
//! - Times are in milliseconds.

mod adjustments;
mod contract;
mod decoupled;
mod error;
mod gameplay;
mod manual;
mod stopwatch;

pub use adjustments::{true_gameplay_rate, RateAdjustment, RateAdjustments, ZERO_RATE_TOLERANCE};
pub use contract::{
    same_source,
    AdjustableClock,
    Clock,
    FrameBasedClock,
    FrameTimeInfo,
    GameplayClock,
    SourceClockHandle,
};
pub use decoupled::DecoupledClock;
pub use error::ClockError;
pub use gameplay::{GameplayClockConfig, GameplayClockController};
pub use manual::ManualClock;
pub use stopwatch::StopwatchClock;
