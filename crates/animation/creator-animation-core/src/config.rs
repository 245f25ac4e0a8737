//! Timeline-wide configuration shared by the store, the evaluator and playback.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Global fps/duration/canvas configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Frames per second of the composition.
    pub fps: u32,
    /// Composition length in seconds.
    pub duration: f32,
    /// Canvas size in pixels (width, height).
    pub size: (i32, i32),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 60,
            duration: 5.0,
            size: (1280, 720),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.fps == 0 {
            return Err(CoreError::InvalidFps);
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(CoreError::validation(
                "duration",
                "must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// Number of frames in one playback cycle (never less than one).
    pub fn total_frames(&self) -> i32 {
        ((self.fps as f32 * self.duration).round() as i32).max(1)
    }

    /// Wall-clock length of one frame in milliseconds.
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.fps.max(1) as f64
    }
}
