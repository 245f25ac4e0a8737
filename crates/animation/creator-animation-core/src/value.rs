//! Animatable values: one keyframe track per scalar component.
//!
//! `evaluate(t)` is a pure function of the tracks and `t`; vector axes and the
//! four transform parts evaluate independently.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::keyframe::{Keyframe, Keyframes};

/// A single animatable scalar track.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimatedNumber {
    pub keyframes: Keyframes,
}

impl AnimatedNumber {
    /// Static value: one keyframe at offset 0.
    pub fn constant(value: f32) -> Self {
        Self {
            keyframes: Keyframes::new(vec![Keyframe::new(value, 0.0)]),
        }
    }

    pub fn from_keyframes(values: Vec<Keyframe>) -> Self {
        Self {
            keyframes: Keyframes::new(values),
        }
    }

    pub fn evaluate(&self, t: f32) -> Result<f32, CoreError> {
        self.keyframes.evaluate(t)
    }

    pub fn sort_keyframes(&mut self) {
        self.keyframes.sort();
    }
}

/// Two independent axis tracks. The array length is part of the type, so a
/// partially populated vector cannot be constructed or deserialized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimatedVec2 {
    pub keyframes: [AnimatedNumber; 2],
}

impl AnimatedVec2 {
    pub fn new(x: AnimatedNumber, y: AnimatedNumber) -> Self {
        Self { keyframes: [x, y] }
    }

    pub fn constant(x: f32, y: f32) -> Self {
        Self::new(AnimatedNumber::constant(x), AnimatedNumber::constant(y))
    }

    pub fn evaluate(&self, t: f32) -> Result<(f32, f32), CoreError> {
        let [x, y] = &self.keyframes;
        Ok((
            x.evaluate(t).map_err(|e| axis_error(e, "x"))?,
            y.evaluate(t).map_err(|e| axis_error(e, "y"))?,
        ))
    }

    pub fn sort_keyframes(&mut self) {
        self.keyframes.iter_mut().for_each(AnimatedNumber::sort_keyframes);
    }
}

/// Three independent axis tracks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimatedVec3 {
    pub keyframes: [AnimatedNumber; 3],
}

impl AnimatedVec3 {
    pub fn new(x: AnimatedNumber, y: AnimatedNumber, z: AnimatedNumber) -> Self {
        Self {
            keyframes: [x, y, z],
        }
    }

    pub fn constant(x: f32, y: f32, z: f32) -> Self {
        Self::new(
            AnimatedNumber::constant(x),
            AnimatedNumber::constant(y),
            AnimatedNumber::constant(z),
        )
    }

    pub fn evaluate(&self, t: f32) -> Result<(f32, f32, f32), CoreError> {
        let [x, y, z] = &self.keyframes;
        Ok((
            x.evaluate(t).map_err(|e| axis_error(e, "x"))?,
            y.evaluate(t).map_err(|e| axis_error(e, "y"))?,
            z.evaluate(t).map_err(|e| axis_error(e, "z"))?,
        ))
    }

    pub fn sort_keyframes(&mut self) {
        self.keyframes.iter_mut().for_each(AnimatedNumber::sort_keyframes);
    }
}

// Structural errors keep their kind; only validation paths gain the axis prefix.
fn axis_error(e: CoreError, axis: &str) -> CoreError {
    match e {
        CoreError::Validation { path, reason } => CoreError::Validation {
            path: format!("{axis}.{path}"),
            reason,
        },
        other => other,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimatedTransform {
    pub translate: AnimatedVec2,
    pub skew: AnimatedVec2,
    pub rotate: AnimatedVec3,
    pub scale: AnimatedVec2,
}

/// Static transform produced by evaluating an [`AnimatedTransform`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translate: (f32, f32),
    pub skew: (f32, f32),
    pub rotate: (f32, f32, f32),
    pub scale: (f32, f32),
}

impl Default for AnimatedTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AnimatedTransform {
    /// No translation, skew or rotation; unit scale.
    pub fn identity() -> Self {
        Self::constant((0.0, 0.0), (1.0, 1.0), (0.0, 0.0, 0.0), (0.0, 0.0))
    }

    pub fn constant(
        translate: (f32, f32),
        scale: (f32, f32),
        rotate: (f32, f32, f32),
        skew: (f32, f32),
    ) -> Self {
        Self {
            translate: AnimatedVec2::constant(translate.0, translate.1),
            skew: AnimatedVec2::constant(skew.0, skew.1),
            rotate: AnimatedVec3::constant(rotate.0, rotate.1, rotate.2),
            scale: AnimatedVec2::constant(scale.0, scale.1),
        }
    }

    pub fn evaluate(&self, t: f32) -> Result<Transform, CoreError> {
        Ok(Transform {
            translate: self.translate.evaluate(t)?,
            skew: self.skew.evaluate(t)?,
            rotate: self.rotate.evaluate(t)?,
            scale: self.scale.evaluate(t)?,
        })
    }

    pub fn sort_keyframes(&mut self) {
        self.translate.sort_keyframes();
        self.skew.sort_keyframes();
        self.rotate.sort_keyframes();
        self.scale.sort_keyframes();
    }
}
