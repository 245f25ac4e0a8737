use creator_animation_core::CoreError;
use thiserror::Error;

/// Failures raised by a rendering backend while building or drawing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("font '{0}' is not loaded")]
    MissingFont(String),

    #[error("failed to build artifact for '{id}': {reason}")]
    Build { id: String, reason: String },

    #[error("draw failed: {0}")]
    Draw(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Releasing a cached artifact failed. Logged, never fatal.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("failed to release artifact: {0}")]
pub struct ReleaseError(pub String);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DependencyError {
    #[error("font '{name}' is unavailable: {reason}")]
    FontUnavailable { name: String, reason: String },
}
