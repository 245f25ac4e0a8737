//! Creator Render Core
//!
//! Glue between the animation core and a rendering backend:
//! - `cache`: entity-keyed build artifacts with an explicit release contract
//! - `dependencies`: font discovery and loading
//! - `drawer`: back-to-front draw of a resolved frame under a single-draw lock
//! - `backend` / `scheduler`: the resolve boundary and host frame callbacks
//! - `playback`: store events, frame ticks and redraw scheduling

pub mod backend;
pub mod cache;
pub mod dependencies;
pub mod drawer;
pub mod error;
pub mod playback;
pub mod scheduler;

pub use backend::{LocalBackend, ResolveBackend, ResolveRequest, ResolveResponse, Transport};
pub use cache::{Artifact, ArtifactCache, Lookup};
pub use dependencies::{
    required_fonts, Dependencies, DependencyService, FontLoader, FontSource, PrepareReport,
};
pub use drawer::{DrawGuard, DrawLock, DrawReport, Drawer, Renderer};
pub use error::{DependencyError, ReleaseError, RenderError};
pub use playback::{PlaybackService, PlaybackState};
pub use scheduler::{FrameHandle, FramePurpose, FrameScheduler, QueuedScheduler};
