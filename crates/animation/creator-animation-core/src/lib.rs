//! Creator Animation Core (engine-agnostic)
//!
//! Turns a declarative, keyframe-driven scene into the static per-frame scene a
//! renderer consumes. The crate owns the data model (keyframes, animated values,
//! entities, the wire `Timeline`), the interpolation engine, the frame evaluator
//! and the editing-state store that hosts mutate copy-on-write.

pub mod config;
pub mod entity;
pub mod error;
pub mod ids;
pub mod interp;
pub mod keyframe;
pub mod paint;
pub mod resolve;
pub mod store;
pub mod time;
pub mod timeline;
pub mod value;

// Re-exports for consumers (drawers, wasm bindings)
pub use config::Config;
pub use entity::{
    validate_entities, AnimatedEllipseEntity, AnimatedEntity, AnimatedRectEntity,
    AnimatedStaggeredTextEntity, AnimatedStaggeredTextLetter, AnimatedTextEntity, AnimationData,
    BuildKey, Cache, EllipseEntity, EntityKind, RectEntity, ResolvedEntity, StaggeredTextEntity,
    StaggeredTextLetter, TextEntity,
};
pub use error::CoreError;
pub use interp::{EasingFunction, InterpolationMode, SpringProperties};
pub use keyframe::{Keyframe, Keyframes};
pub use paint::{Color, FillStyle, Paint, PaintStyle, StrokeStyle, TextAlign, TextPaint};
pub use resolve::{resolve, resolve_frame, EntityFailure, ResolvedFrame};
pub use store::{SceneStore, StoreEvent};
pub use time::{frame_to_timestamp, timestamp_to_frame};
pub use timeline::{resolve_frame_json, resolve_timeline_json, RenderState, Timeline};
pub use value::{AnimatedNumber, AnimatedTransform, AnimatedVec2, AnimatedVec3, Transform};
