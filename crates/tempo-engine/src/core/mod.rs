//! Core host-facing contracts.
//!
//! Defines the interface between the frame host and the components that
//! consume gameplay time, and the host loop that enforces per-frame ordering.

mod app;
mod host;
mod stable;

pub use app::{AppControl, TimingConsumer};
pub use host::FrameHost;
pub use stable::FrameStableTime;
