//! Kinematic car model.
//!
//! Per step of `dt` seconds:
//! - speed  += (throttle·accel − friction·speed)·dt, clamped to [0, max_speed]
//! - heading += steering·max_steering·dt, wrapped to [−π, π)
//! - position advances along the *new* heading at the *new* speed

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Physical constants of the car.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CarParams {
    /// m/s
    pub max_speed: f64,
    /// Yaw rate at full steering lock (rad/s)
    pub max_steering: f64,
    /// m/s² at full throttle
    pub acceleration: f64,
    /// Linear drag coefficient (1/s)
    pub friction: f64,
}

impl Default for CarParams {
    fn default() -> Self {
        Self {
            max_speed: 20.0,
            max_steering: 1.0,
            acceleration: 5.0,
            friction: 1.0,
        }
    }
}

/// True car state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub pos: Point2<f64>,
    pub heading: f64,
    pub speed: f64,
}

impl Car {
    /// Car at rest at `pos`, facing `heading`.
    pub fn at_rest(pos: Point2<f64>, heading: f64) -> Self {
        Self {
            pos,
            heading,
            speed: 0.0,
        }
    }

    /// Apply one control step. Commands are clipped to their valid ranges.
    pub fn step(&mut self, params: &CarParams, steering: f64, throttle: f64, dt: f64) {
        let steering = steering.clamp(-1.0, 1.0);
        let throttle = throttle.clamp(0.0, 1.0);

        let accel = throttle * params.acceleration;
        self.speed = (self.speed + (accel - params.friction * self.speed) * dt)
            .clamp(0.0, params.max_speed);

        self.heading = wrap_heading(self.heading + steering * params.max_steering * dt);

        self.pos += self.velocity() * dt;
    }

    pub fn velocity(&self) -> Vector2<f64> {
        Vector2::new(self.heading.cos(), self.heading.sin()) * self.speed
    }
}

/// Wrap a heading into [−π, π).
pub fn wrap_heading(h: f64) -> f64 {
    (h + PI).rem_euclid(TAU) - PI
}
