//! Wire format of a scene sent across the resolve boundary:
//! `{ entities, render_state: { curr_frame }, fps, size: [w, h], duration }`.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::entity::{validate_entities, AnimatedEntity};
use crate::error::CoreError;
use crate::resolve::{resolve_frame, ResolvedFrame};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderState {
    pub curr_frame: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub entities: Vec<AnimatedEntity>,
    pub render_state: RenderState,
    pub fps: u32,
    pub size: (i32, i32),
    pub duration: f32,
}

impl Timeline {
    pub fn new(config: Config, entities: Vec<AnimatedEntity>, render_state: RenderState) -> Self {
        Self {
            entities,
            render_state,
            fps: config.fps,
            size: config.size,
            duration: config.duration,
        }
    }

    pub fn config(&self) -> Config {
        Config {
            fps: self.fps,
            duration: self.duration,
            size: self.size,
        }
    }

    /// Reject malformed input before anything is evaluated.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.config().validate()?;
        validate_entities(&self.entities)
    }

    /// Parse and validate; never returns a partially valid timeline.
    pub fn from_json(s: &str) -> Result<Timeline, CoreError> {
        let timeline: Timeline = serde_json::from_str(s)?;
        timeline.validate()?;
        Ok(timeline)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Resolve the scene at the current frame.
    pub fn calculate(&self) -> Result<ResolvedFrame, CoreError> {
        resolve_frame(&self.entities, self.render_state.curr_frame, self.fps)
    }
}

/// JSON in, JSON out: parse a timeline and return the resolved entities at its
/// current frame as a JSON array.
pub fn resolve_timeline_json(timeline_json: &str) -> Result<String, CoreError> {
    let timeline = Timeline::from_json(timeline_json)?;
    let frame = timeline.calculate()?;
    Ok(serde_json::to_string(&frame.entities)?)
}

/// Like [`resolve_timeline_json`] but returns the whole [`ResolvedFrame`]:
/// `{ frame, time, entities, failures }`.
pub fn resolve_frame_json(timeline_json: &str) -> Result<String, CoreError> {
    let timeline = Timeline::from_json(timeline_json)?;
    let frame = timeline.calculate()?;
    Ok(serde_json::to_string(&frame)?)
}
