//! Interpolation between two recorded samples.
//!
//! All scalar channels are interpolated linearly. Heading takes the shortest
//! arc: the raw difference is wrapped into (−π, π] first, so 179° → −179°
//! passes through 180° rather than sweeping back through 0°.

use crate::types::{AgentState, TrailPoint, TrajectorySample};
use std::f64::consts::{PI, TAU};

/// Types that can be blended between two values by a factor `alpha`.
pub trait Interpolate {
    fn lerp(&self, other: &Self, alpha: f64) -> Self;
}

impl Interpolate for f64 {
    fn lerp(&self, other: &Self, alpha: f64) -> Self {
        lerp(*self, *other, alpha)
    }
}

impl Interpolate for TrailPoint {
    fn lerp(&self, other: &Self, alpha: f64) -> Self {
        TrailPoint {
            x: lerp(self.x, other.x, alpha),
            y: lerp(self.y, other.y, alpha),
        }
    }
}

/// `a + (b − a)·alpha`
pub fn lerp(a: f64, b: f64, alpha: f64) -> f64 {
    a + (b - a) * alpha
}

/// Wrap an angle difference into (−π, π].
///
/// Values already in range come back untouched; anything else is reduced in
/// one step, so the cost does not grow with the magnitude. Non-finite input
/// is returned as is.
pub fn wrap_angle(diff: f64) -> f64 {
    if !diff.is_finite() || (diff > -PI && diff <= PI) {
        return diff;
    }
    let wrapped = (diff + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        PI
    } else {
        wrapped
    }
}

/// Shortest-arc interpolation from heading `a` to heading `b`.
///
/// The result is not re-normalised and may leave [−π, π] slightly.
pub fn lerp_angle(a: f64, b: f64, alpha: f64) -> f64 {
    a + wrap_angle(b - a) * alpha
}

/// Build the continuous state between `prev` and `next`.
pub fn interpolate(
    prev: &TrajectorySample,
    next: &TrajectorySample,
    alpha: f64,
    cumulative_reward: f64,
) -> AgentState {
    AgentState {
        x: lerp(prev.x, next.x, alpha),
        y: lerp(prev.y, next.y, alpha),
        heading: lerp_angle(prev.heading, next.heading, alpha),
        speed: lerp(prev.speed, next.speed, alpha),
        steering: lerp(prev.steering, next.steering, alpha),
        throttle: lerp(prev.throttle, next.throttle, alpha),
        reward: lerp(prev.reward, next.reward, alpha),
        cumulative_reward,
    }
}
