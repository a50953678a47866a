use std::env::VarError;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Session script for the headless studio run.
///
/// Every field can be overridden through a `TEMPO_*` environment variable.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Frames to run before exiting (`TEMPO_FRAMES`).
    pub frames: u64,
    /// Target real time per frame (`TEMPO_FRAME_MS`).
    pub frame_interval: Duration,
    /// Gameplay start time in ms (`TEMPO_START_MS`).
    pub start_time: f64,
    /// Seek target applied a quarter of the way through the run (`TEMPO_SEEK_MS`).
    pub seek_to: f64,
    /// Practice-mode slowdown applied to the track (`TEMPO_PRACTICE_RATE`).
    pub practice_rate: f64,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            frames: 240,
            frame_interval: Duration::from_millis(16),
            start_time: 0.0,
            seek_to: 10_000.0,
            practice_rate: 0.75,
        }
    }
}

impl StudioConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            frames: env_or("TEMPO_FRAMES", defaults.frames)?,
            frame_interval: Duration::from_millis(env_or(
                "TEMPO_FRAME_MS",
                defaults.frame_interval.as_millis() as u64,
            )?),
            start_time: env_or("TEMPO_START_MS", defaults.start_time)?,
            seek_to: env_or("TEMPO_SEEK_MS", defaults.seek_to)?,
            practice_rate: env_or("TEMPO_PRACTICE_RATE", defaults.practice_rate)?,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        Err(VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("unreadable value for {key}")),
    }
}
