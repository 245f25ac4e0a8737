//! Frame evaluator: animated scene + frame -> resolved (static) scene.
//!
//! - `global_time = frame / fps`, `local_time = global_time - animation_data.offset`.
//! - Entities that are hidden or outside `[0, duration)` in local time are excluded.
//! - Each entity is evaluated in isolation: a failing entity is logged, reported
//!   in [`ResolvedFrame::failures`] and excluded, its siblings still resolve.
//! - Output keeps scene-list order. Consumers draw in reverse
//!   ([`ResolvedFrame::draw_order`]): the last entity is furthest back.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::entity::{AnimatedEntity, ResolvedEntity};
use crate::error::CoreError;
use crate::time::frame_to_timestamp;

/// An entity excluded from a frame because its evaluation failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityFailure {
    pub id: String,
    pub error: CoreError,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolvedFrame {
    pub frame: i32,
    /// Scene time in seconds.
    pub time: f32,
    pub entities: Vec<ResolvedEntity>,
    pub failures: Vec<EntityFailure>,
}

impl ResolvedFrame {
    /// Back-to-front iteration: reverse of scene order.
    pub fn draw_order(&self) -> impl Iterator<Item = &ResolvedEntity> {
        self.entities.iter().rev()
    }

    /// True when every resolved entity reports a valid build cache.
    pub fn is_cached(&self) -> bool {
        self.entities.iter().all(|e| e.cache().valid)
    }

    pub fn get(&self, id: &str) -> Option<&ResolvedEntity> {
        self.entities.iter().find(|e| e.id() == id)
    }
}

/// Resolve one entity at a scene time. `Ok(None)` means outside its window.
pub fn resolve_entity(
    entity: &AnimatedEntity,
    global_time: f32,
) -> Result<Option<ResolvedEntity>, CoreError> {
    let anim = entity.animation_data();
    let local_time = anim.local_time(global_time);
    if !anim.is_active(local_time) {
        return Ok(None);
    }
    entity
        .evaluate(local_time)
        .map(Some)
        .map_err(|e| e.for_entity(entity.id()))
}

/// Resolve the scene at `frame`, collecting per-entity failures.
pub fn resolve_frame(
    scene: &[AnimatedEntity],
    frame: i32,
    fps: u32,
) -> Result<ResolvedFrame, CoreError> {
    if fps == 0 {
        return Err(CoreError::InvalidFps);
    }
    let time = frame_to_timestamp(frame, fps);
    let mut out = ResolvedFrame {
        frame,
        time,
        entities: Vec::with_capacity(scene.len()),
        failures: Vec::new(),
    };

    for entity in scene {
        match resolve_entity(entity, time) {
            Ok(Some(resolved)) => out.entities.push(resolved),
            Ok(None) => {}
            Err(error) => {
                warn!("excluding entity from frame {frame}: {error}");
                out.failures.push(EntityFailure {
                    id: entity.id().to_string(),
                    error,
                });
            }
        }
    }

    Ok(out)
}

/// Resolve the scene at `frame`, returning only the visible resolved entities.
pub fn resolve(
    scene: &[AnimatedEntity],
    frame: i32,
    fps: u32,
) -> Result<Vec<ResolvedEntity>, CoreError> {
    resolve_frame(scene, frame, fps).map(|f| f.entities)
}
