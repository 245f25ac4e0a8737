//! Interpolation modes attached to keyframes.
//!
//! A mode on keyframe `k_i` governs the segment leaving it (`k_i -> k_{i+1}`).
//! Keyframes without a mode interpolate linearly.

pub mod functions;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Spring parameters for a damped harmonic oscillator driven from 0 to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringProperties {
    pub mass: f32,
    pub damping: f32,
    pub stiffness: f32,
}

impl SpringProperties {
    pub fn validate(&self) -> Result<(), CoreError> {
        let finite =
            self.mass.is_finite() && self.damping.is_finite() && self.stiffness.is_finite();
        if !finite || self.mass <= 0.0 || self.stiffness <= 0.0 || self.damping < 0.0 {
            return Err(CoreError::InvalidSpring {
                mass: self.mass,
                damping: self.damping,
                stiffness: self.stiffness,
            });
        }
        Ok(())
    }

    /// Damping ratio; `< 1` overshoots, `== 1` is critical, `> 1` is overdamped.
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }
}

/// Named closed-form easing curves. All satisfy `f(0) = 0` and `f(1) = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EasingFunction {
    QuintOut,
    QuintIn,
    QuintInOut,
    CircOut,
    CircIn,
    CircInOut,
    CubicOut,
    CubicIn,
    CubicInOut,
    ExpoOut,
    ExpoIn,
    ExpoInOut,
    QuadOut,
    QuadIn,
    QuadInOut,
    QuartOut,
    QuartIn,
    QuartInOut,
}

impl EasingFunction {
    pub const ALL: [EasingFunction; 18] = [
        EasingFunction::QuintOut,
        EasingFunction::QuintIn,
        EasingFunction::QuintInOut,
        EasingFunction::CircOut,
        EasingFunction::CircIn,
        EasingFunction::CircInOut,
        EasingFunction::CubicOut,
        EasingFunction::CubicIn,
        EasingFunction::CubicInOut,
        EasingFunction::ExpoOut,
        EasingFunction::ExpoIn,
        EasingFunction::ExpoInOut,
        EasingFunction::QuadOut,
        EasingFunction::QuadIn,
        EasingFunction::QuadInOut,
        EasingFunction::QuartOut,
        EasingFunction::QuartIn,
        EasingFunction::QuartInOut,
    ];

    /// Map linear progress `t` in [0,1] to eased progress.
    pub fn ease(self, t: f32) -> f32 {
        use simple_easing::*;
        match self {
            EasingFunction::QuintOut => quint_out(t),
            EasingFunction::QuintIn => quint_in(t),
            EasingFunction::QuintInOut => quint_in_out(t),
            EasingFunction::CircOut => circ_out(t),
            EasingFunction::CircIn => circ_in(t),
            EasingFunction::CircInOut => circ_in_out(t),
            EasingFunction::CubicOut => cubic_out(t),
            EasingFunction::CubicIn => cubic_in(t),
            EasingFunction::CubicInOut => cubic_in_out(t),
            EasingFunction::ExpoOut => expo_out(t),
            EasingFunction::ExpoIn => expo_in(t),
            EasingFunction::ExpoInOut => expo_in_out(t),
            EasingFunction::QuadOut => quad_out(t),
            EasingFunction::QuadIn => quad_in(t),
            EasingFunction::QuadInOut => quad_in_out(t),
            EasingFunction::QuartOut => quart_out(t),
            EasingFunction::QuartIn => quart_in(t),
            EasingFunction::QuartInOut => quart_in_out(t),
        }
    }
}

/// Interpolation mode of the segment leaving a keyframe.
///
/// Wire shape: `{ "type": "Linear" }`,
/// `{ "type": "EasingFunction", "easing_function": "QuintOut" }`,
/// `{ "type": "Spring", "mass": 1, "damping": 20, "stiffness": 200 }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InterpolationMode {
    #[default]
    Linear,
    EasingFunction { easing_function: EasingFunction },
    Spring(SpringProperties),
}

impl InterpolationMode {
    pub fn easing(kind: EasingFunction) -> Self {
        InterpolationMode::EasingFunction {
            easing_function: kind,
        }
    }

    pub fn spring(mass: f32, damping: f32, stiffness: f32) -> Self {
        InterpolationMode::Spring(SpringProperties {
            mass,
            damping,
            stiffness,
        })
    }

    /// Result progress for local progress `p` over a segment lasting
    /// `segment_duration` seconds.
    pub fn progress(&self, p: f32, segment_duration: f32) -> Result<f32, CoreError> {
        let p = p.clamp(0.0, 1.0);
        match self {
            InterpolationMode::Linear => Ok(p),
            InterpolationMode::EasingFunction { easing_function } => Ok(easing_function.ease(p)),
            InterpolationMode::Spring(spring) => {
                spring.validate()?;
                Ok(functions::spring_progress(spring, p, segment_duration))
            }
        }
    }
}
