//! Error taxonomy for the animation core.
//!
//! - `Validation` / `Json`: malformed input rejected at the boundary.
//! - `EmptyTrack` / `NonMonotonicOffsets` / `InvalidSpring`: evaluation of a
//!   single property failed.
//! - `Entity`: an evaluation error scoped to the entity that produced it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum CoreError {
    #[error("keyframe track is empty")]
    EmptyTrack,

    #[error("keyframe offsets must be non-decreasing (index {index}: {offset} after {previous})")]
    NonMonotonicOffsets {
        index: usize,
        previous: f32,
        offset: f32,
    },

    #[error("invalid spring (mass={mass}, damping={damping}, stiffness={stiffness})")]
    InvalidSpring {
        mass: f32,
        damping: f32,
        stiffness: f32,
    },

    #[error("fps must be greater than zero")]
    InvalidFps,

    #[error("validation failed at '{path}': {reason}")]
    Validation { path: String, reason: String },

    #[error("json error: {0}")]
    Json(String),

    #[error("entity '{id}': {source}")]
    Entity {
        id: String,
        #[source]
        source: Box<CoreError>,
    },

    #[error("entity '{0}' not found")]
    EntityNotFound(String),
}

impl CoreError {
    pub(crate) fn validation(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::Validation {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Attach the id of the entity whose evaluation failed.
    pub fn for_entity(self, id: &str) -> Self {
        CoreError::Entity {
            id: id.to_string(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Json(e.to_string())
    }
}
