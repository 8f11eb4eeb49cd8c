//! Driver policies standing in for trained agents.
//!
//! Both drivers chase a look-ahead point on the centerline (pure pursuit)
//! and ease off the throttle in proportion to the heading error. They differ
//! in gains and in how much seeded action noise they carry, which gives the
//! two recorded laps distinct racing lines and lap times.

use crate::{car::Car, scenarios::Track};
use playback_core::{interp::wrap_angle, AgentKind};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Tunables of a pursuit driver.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DriverParams {
    /// Centerline points to look ahead of the closest one
    pub lookahead: usize,
    /// Steering command per radian of heading error
    pub steer_gain: f64,
    /// Speed the driver aims for on a straight (m/s)
    pub target_speed: f64,
    /// Fraction of target speed shed per radian of heading error
    pub corner_slowdown: f64,
    /// Throttle command per m/s of speed deficit
    pub throttle_gain: f64,
    /// Amplitude of uniform noise added to steering
    pub steering_noise: f64,
    /// Amplitude of uniform noise added to throttle
    pub throttle_noise: f64,
}

impl DriverParams {
    /// Defaults for each agent paradigm.
    pub fn for_kind(kind: AgentKind) -> Self {
        match kind {
            // Crisp and fast, little jitter
            AgentKind::Rl => Self {
                lookahead: 6,
                steer_gain: 2.5,
                target_speed: 4.8,
                corner_slowdown: 0.6,
                throttle_gain: 1.5,
                steering_noise: 0.05,
                throttle_noise: 0.05,
            },
            // Smoother line, noisier actions
            AgentKind::Es => Self {
                lookahead: 9,
                steer_gain: 1.8,
                target_speed: 4.2,
                corner_slowdown: 0.4,
                throttle_gain: 1.0,
                steering_noise: 0.15,
                throttle_noise: 0.1,
            },
        }
    }
}

/// A seeded pursuit driver.
pub struct Driver {
    pub params: DriverParams,
    rng: ChaCha8Rng,
}

impl Driver {
    pub fn new(params: DriverParams, seed: u64) -> Self {
        Self {
            params,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Choose `(steering, throttle)` for the current car state.
    pub fn act(&mut self, car: &Car, track: &Track) -> (f64, f64) {
        let p = &self.params;
        let closest = track.closest(&car.pos);
        let target = track.point(closest.index + p.lookahead);

        let to_target = target - car.pos;
        let desired = to_target.y.atan2(to_target.x);
        let heading_error = wrap_angle(desired - car.heading);

        let steering = p.steer_gain * heading_error
            + (self.rng.gen::<f64>() * 2.0 - 1.0) * p.steering_noise;

        let wanted = p.target_speed * (1.0 - p.corner_slowdown * heading_error.abs()).max(0.3);
        let throttle = p.throttle_gain * (wanted - car.speed) / p.target_speed.max(1e-6)
            + 0.5
            + (self.rng.gen::<f64>() * 2.0 - 1.0) * p.throttle_noise;

        (steering.clamp(-1.0, 1.0), throttle.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::TrackKind;
    use nalgebra::Point2;

    #[test]
    fn steers_toward_track() {
        let track = Track::build(TrackKind::Oval);
        let params = DriverParams {
            steering_noise: 0.0,
            throttle_noise: 0.0,
            ..DriverParams::for_kind(AgentKind::Rl)
        };
        let mut driver = Driver::new(params, 1);

        // Below the bottom straight, pointing along +x: must steer left (+).
        let car = Car::at_rest(Point2::new(20.0, -3.0), 0.0);
        let (steering, throttle) = driver.act(&car, &track);
        assert!(steering > 0.0, "steering {steering}");
        assert!(throttle > 0.0);

        // Above it: steer right (−).
        let car = Car::at_rest(Point2::new(20.0, 3.0), 0.0);
        let (steering, _) = driver.act(&car, &track);
        assert!(steering < 0.0, "steering {steering}");
    }

    #[test]
    fn same_seed_same_actions() {
        let track = Track::build(TrackKind::Figure8);
        let car = Car::at_rest(Point2::new(60.0, 30.0), 1.0);
        let mut a = Driver::new(DriverParams::for_kind(AgentKind::Es), 7);
        let mut b = Driver::new(DriverParams::for_kind(AgentKind::Es), 7);
        for _ in 0..10 {
            assert_eq!(a.act(&car, &track), b.act(&car, &track));
        }
    }
}
