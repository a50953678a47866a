//! Tempo engine crate.
//!
//! This crate owns gameplay timing: the clock contracts, the concrete clocks,
//! the gameplay clock controller, and the headless frame host that drives them.

pub mod clock;
pub mod core;
pub mod time;

pub mod logging;
