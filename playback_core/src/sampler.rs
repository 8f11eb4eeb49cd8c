//! Keyframe lookup: which two recorded samples bracket a query time.

use crate::{
    interp::interpolate,
    reward::cumulative_reward_at,
    trajectory::Trajectory,
    types::{AgentState, TrajectorySample},
};

/// The bracketing pair for a query time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe<'a> {
    /// Index of `prev` in the trajectory
    pub index: usize,
    pub prev: &'a TrajectorySample,
    pub next: &'a TrajectorySample,
    /// Position between `prev` and `next`, in [0, 1]
    pub alpha: f64,
}

/// Locate the samples bracketing `t`.
///
/// `t` is clamped to the recorded range first, so queries past the end return
/// the last sample with `alpha = 0` and never extrapolate. `prev` is the
/// rightmost sample with `prev.t <= t`; among equal timestamps the later one
/// wins. Returns `None` for an empty trajectory.
pub fn sample(trajectory: &Trajectory, t: f64) -> Option<Keyframe<'_>> {
    let samples = trajectory.samples();
    let first = samples.first()?;
    let last = samples.last()?;

    // NaN collapses to the lower bound through f64::max.
    let t = t.max(0.0).max(first.t).min(last.t);

    // Timestamps are sorted, so the predicate is partitioned.
    let index = samples.partition_point(|s| s.t <= t).saturating_sub(1);
    let prev = &samples[index];
    let next = &samples[(index + 1).min(samples.len() - 1)];

    let span = next.t - prev.t;
    let alpha = if span > 0.0 { (t - prev.t) / span } else { 0.0 };

    Some(Keyframe {
        index,
        prev,
        next,
        alpha,
    })
}

/// Full agent state at time `t`: interpolated sample + cumulative reward.
pub fn state_at(trajectory: &Trajectory, t: f64) -> Option<AgentState> {
    let key = sample(trajectory, t)?;
    let cumulative = cumulative_reward_at(trajectory, &key);
    Some(interpolate(key.prev, key.next, key.alpha, cumulative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn at(t: f64, x: f64, reward: f64) -> TrajectorySample {
        TrajectorySample {
            t,
            x,
            reward,
            ..Default::default()
        }
    }

    fn three_step() -> Trajectory {
        Trajectory::new(vec![at(0.0, 0.0, 1.0), at(1.0, 10.0, 2.0), at(2.0, 20.0, 3.0)]).unwrap()
    }

    #[test]
    fn empty_trajectory_has_no_keyframe() {
        let traj = Trajectory::default();
        assert!(sample(&traj, 0.0).is_none());
        assert!(state_at(&traj, 3.0).is_none());
    }

    #[test]
    fn midpoint_between_samples() {
        let traj = three_step();
        let key = sample(&traj, 1.5).unwrap();
        assert_eq!(key.index, 1);
        assert_abs_diff_eq!(key.prev.t, 1.0);
        assert_abs_diff_eq!(key.next.t, 2.0);
        assert_abs_diff_eq!(key.alpha, 0.5);

        let state = state_at(&traj, 1.5).unwrap();
        assert_abs_diff_eq!(state.x, 15.0);
        assert_abs_diff_eq!(state.cumulative_reward, 4.5);
    }

    #[test]
    fn past_the_end_returns_last_sample_verbatim() {
        let traj = three_step();
        for t in [2.0, 2.5, 100.0, f64::INFINITY] {
            let key = sample(&traj, t).unwrap();
            assert_eq!(key.index, 2);
            assert_eq!(key.prev, key.next);
            assert_eq!(key.alpha, 0.0);
            assert_eq!(*key.prev, traj.samples()[2]);
        }
    }

    #[test]
    fn before_start_clamps_to_first() {
        let traj = three_step();
        for t in [-5.0, f64::NAN] {
            let key = sample(&traj, t).unwrap();
            assert_eq!(key.index, 0);
            assert_eq!(key.alpha, 0.0);
        }

        // First sample recorded after t = 0: hold it rather than extrapolate.
        let late = Trajectory::new(vec![at(0.5, 1.0, 0.0), at(1.5, 2.0, 0.0)]).unwrap();
        let key = sample(&late, 0.0).unwrap();
        assert_eq!(key.index, 0);
        assert_eq!(key.alpha, 0.0);
    }

    #[test]
    fn exact_keyframe_hit() {
        let traj = three_step();
        let key = sample(&traj, 1.0).unwrap();
        assert_eq!(key.index, 1);
        assert_eq!(key.alpha, 0.0);
    }

    #[test]
    fn duplicate_timestamps_resolve_to_later_sample() {
        let traj = Trajectory::new(vec![
            at(0.0, 0.0, 0.0),
            at(1.0, 5.0, 0.0),
            at(1.0, 7.0, 0.0),
            at(2.0, 9.0, 0.0),
        ])
        .unwrap();
        let key = sample(&traj, 1.0).unwrap();
        assert_eq!(key.index, 2);
        assert_abs_diff_eq!(key.prev.x, 7.0);

        // Duplicate final timestamps: the very last sample is returned.
        let tail = Trajectory::new(vec![at(0.0, 0.0, 0.0), at(1.0, 1.0, 0.0), at(1.0, 2.0, 0.0)])
            .unwrap();
        let key = sample(&tail, 5.0).unwrap();
        assert_eq!(key.index, 2);
        assert_eq!(key.alpha, 0.0);
    }

    #[test]
    fn single_sample() {
        let traj = Trajectory::new(vec![at(0.0, 3.0, 1.0)]).unwrap();
        let state = state_at(&traj, 10.0).unwrap();
        assert_abs_diff_eq!(state.x, 3.0);
        assert_abs_diff_eq!(state.cumulative_reward, 1.0);
    }

    #[test]
    fn huge_heading_jump_samples_in_range() {
        let traj = Trajectory::new(vec![
            TrajectorySample::default(),
            TrajectorySample {
                t: 1.0,
                heading: 1e17,
                ..Default::default()
            },
        ])
        .unwrap();
        let state = state_at(&traj, 0.5).unwrap();
        assert!(state.heading.is_finite());
        assert!(state.heading.abs() <= std::f64::consts::PI);
    }

    #[test]
    fn repeated_queries_are_bit_identical() {
        let traj = three_step();
        let first = state_at(&traj, 1.37).unwrap();
        let _ = state_at(&traj, 0.2);
        let _ = state_at(&traj, 1.99);
        let again = state_at(&traj, 1.37).unwrap();
        assert_eq!(first.x.to_bits(), again.x.to_bits());
        assert_eq!(
            first.cumulative_reward.to_bits(),
            again.cumulative_reward.to_bits()
        );
    }
}
