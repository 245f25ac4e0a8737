//! Keyframes and single-track evaluation.
//!
//! Model:
//! - A track is an ordered list of keyframes with offsets in seconds relative
//!   to the owning entity's animation window.
//! - Times before the first / after the last keyframe clamp to that keyframe.
//! - Inside the track, the bracketing pair `k_i.offset <= t < k_{i+1}.offset`
//!   is blended with the interpolation mode of `k_i` (Linear when unset).
//!
//! Ordering by offset is a caller invariant. Evaluation rejects unsorted
//! tracks instead of guessing; the editing layer keeps tracks sorted via
//! [`Keyframes::sort`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::ids::new_keyframe_id;
use crate::interp::functions::lerp_f32;
use crate::interp::InterpolationMode;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub id: String,
    pub value: f32,
    /// Time in seconds relative to the entity's animation window.
    pub offset: f32,
    /// Interpolation of the segment leaving this keyframe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpolation: Option<InterpolationMode>,
}

impl Keyframe {
    /// New keyframe with a fresh id and default (linear) interpolation.
    pub fn new(value: f32, offset: f32) -> Self {
        Self {
            id: new_keyframe_id(),
            value,
            offset,
            interpolation: None,
        }
    }

    pub fn with_interpolation(mut self, mode: InterpolationMode) -> Self {
        self.interpolation = Some(mode);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Keyframes {
    pub values: Vec<Keyframe>,
}

impl Keyframes {
    pub fn new(values: Vec<Keyframe>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stable sort by offset.
    pub fn sort(&mut self) {
        self.values.sort_by(|a, b| a.offset.total_cmp(&b.offset));
    }

    /// Check the evaluation preconditions: non-empty, finite, non-decreasing offsets.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.values.is_empty() {
            return Err(CoreError::EmptyTrack);
        }
        let mut previous = f32::NEG_INFINITY;
        for (index, k) in self.values.iter().enumerate() {
            if !k.offset.is_finite() || !k.value.is_finite() {
                return Err(CoreError::validation(
                    format!("keyframes.values[{index}]"),
                    "value and offset must be finite",
                ));
            }
            if k.offset < previous {
                return Err(CoreError::NonMonotonicOffsets {
                    index,
                    previous,
                    offset: k.offset,
                });
            }
            previous = k.offset;
        }
        Ok(())
    }

    /// Evaluate the track at local time `t` (seconds).
    pub fn evaluate(&self, t: f32) -> Result<f32, CoreError> {
        self.validate()?;
        if t.is_nan() {
            return Err(CoreError::validation("t", "evaluation time is NaN"));
        }
        let points = &self.values;
        let n = points.len();
        let first = &points[0];
        let last = &points[n - 1];
        if n == 1 || t <= first.offset {
            return Ok(first.value);
        }
        if t >= last.offset {
            return Ok(last.value);
        }

        let i = find_segment(points, t);
        let left = &points[i];
        let right = &points[i + 1];
        let span = right.offset - left.offset;
        if span <= 0.0 {
            return Ok(left.value);
        }
        let p = ((t - left.offset) / span).clamp(0.0, 1.0);
        let mode = left.interpolation.unwrap_or_default();
        let progress = mode.progress(p, span)?;
        Ok(lerp_f32(left.value, right.value, progress))
    }
}

/// Index `i` of the segment with `points[i].offset <= t < points[i + 1].offset`.
/// Caller guarantees `first.offset < t < last.offset` on a sorted track.
fn find_segment(points: &[Keyframe], t: f32) -> usize {
    // First keyframe strictly after t; its predecessor opens the segment.
    let upper = points.partition_point(|k| k.offset <= t);
    upper.saturating_sub(1).min(points.len() - 2)
}
