//! Interpolation helpers:
//! - lerp_f32 (value blend)
//! - spring_progress (closed-form damped harmonic oscillator)
//!
//! Named easing curves come from `simple_easing`, see [`EasingFunction::ease`].
//!
//! [`EasingFunction::ease`]: super::EasingFunction::ease

use super::SpringProperties;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Spring progress at local progress `p` of a segment lasting `segment_duration` seconds.
///
/// The oscillator starts at rest at 0 and is pulled towards 1; it is sampled at
/// `p * segment_duration` seconds of simulated time. Underdamped springs overshoot.
/// `p == 0` and `p == 1` are pinned to 0 and 1 so both segment ends are exact.
pub fn spring_progress(spring: &SpringProperties, p: f32, segment_duration: f32) -> f32 {
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }
    let t = (p * segment_duration.max(0.0)) as f64;
    let m = spring.mass as f64;
    let c = spring.damping as f64;
    let k = spring.stiffness as f64;

    let w0 = (k / m).sqrt();
    let zeta = c / (2.0 * (k * m).sqrt());

    let progress = if (zeta - 1.0).abs() < 1e-6 {
        // Critically damped
        1.0 - (-w0 * t).exp() * (1.0 + w0 * t)
    } else if zeta < 1.0 {
        // Underdamped
        let wd = w0 * (1.0 - zeta * zeta).sqrt();
        let envelope = (-zeta * w0 * t).exp();
        1.0 - envelope * ((wd * t).cos() + (zeta * w0 / wd) * (wd * t).sin())
    } else {
        // Overdamped: x(t) = c1 e^(r1 t) + c2 e^(r2 t), x(0) = -1, x'(0) = 0
        let root = (zeta * zeta - 1.0).sqrt();
        let r1 = -w0 * (zeta - root);
        let r2 = -w0 * (zeta + root);
        let c1 = r2 / (r1 - r2);
        let c2 = -r1 / (r1 - r2);
        1.0 + c1 * (r1 * t).exp() + c2 * (r2 * t).exp()
    };
    progress as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::EasingFunction;

    #[test]
    fn easing_curves_are_pinned_at_both_ends() {
        for kind in EasingFunction::ALL {
            assert!(kind.ease(0.0).abs() < 1e-6, "{kind:?} f(0)");
            assert!((kind.ease(1.0) - 1.0).abs() < 1e-6, "{kind:?} f(1)");
        }
    }

    #[test]
    fn in_out_curves_pass_through_midpoint() {
        for kind in [
            EasingFunction::QuadInOut,
            EasingFunction::CubicInOut,
            EasingFunction::QuartInOut,
            EasingFunction::QuintInOut,
            EasingFunction::CircInOut,
            EasingFunction::ExpoInOut,
        ] {
            assert!((kind.ease(0.5) - 0.5).abs() < 1e-4, "{kind:?}");
        }
    }

    #[test]
    fn spring_regimes_start_at_zero_and_head_to_one() {
        let under = SpringProperties {
            mass: 1.0,
            damping: 10.0,
            stiffness: 100.0,
        };
        let critical = SpringProperties {
            mass: 1.0,
            damping: 20.0,
            stiffness: 100.0,
        };
        let over = SpringProperties {
            mass: 1.0,
            damping: 60.0,
            stiffness: 100.0,
        };
        for spring in [under, critical, over] {
            assert!(spring_progress(&spring, 0.001, 1.0).abs() < 0.01);
        }
        assert!((spring_progress(&critical, 0.99, 2.0) - 1.0).abs() < 0.01);
        assert!((spring_progress(&over, 0.99, 4.0) - 1.0).abs() < 0.05);
    }

    #[test]
    fn underdamped_spring_overshoots() {
        let spring = SpringProperties {
            mass: 1.0,
            damping: 2.0,
            stiffness: 100.0,
        };
        let peak = (1..100)
            .map(|i| spring_progress(&spring, i as f32 / 100.0, 1.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0, "peak={peak}");
    }
}
