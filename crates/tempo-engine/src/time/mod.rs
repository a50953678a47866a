//! Host frame timing.
//!
//! Real-time deltas for the frame host, independent of gameplay time.
//! Intended usage:
//! - one `FrameClock` per frame host
//! - call `tick()` once per host frame (or `tick_with()` for deterministic stepping)

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
