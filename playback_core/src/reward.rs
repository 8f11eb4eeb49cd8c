//! Cumulative reward up to a query time.
//!
//! With bracketing index `i` and factor `alpha`, the cumulative reward is the
//! reward of every sample up to and including `i`, plus the reward of the
//! next sample weighted by `alpha`. The value is continuous at keyframes and
//! equals the trajectory total once the last sample is reached.
//!
//! Nothing is carried between calls: the result is a pure function of
//! `(trajectory, t)`, read off the prefix sums built at load time, so seeking
//! backwards yields exactly what playing forward to the same time yields.

use crate::{
    sampler::{sample, Keyframe},
    trajectory::Trajectory,
};

/// Cumulative reward at time `t` (0 for an empty trajectory).
pub fn cumulative_reward(trajectory: &Trajectory, t: f64) -> f64 {
    sample(trajectory, t).map_or(0.0, |key| cumulative_reward_at(trajectory, &key))
}

/// Cumulative reward for an already located keyframe of `trajectory`.
pub fn cumulative_reward_at(trajectory: &Trajectory, key: &Keyframe<'_>) -> f64 {
    trajectory.reward_through(key.index) + key.next.reward * key.alpha
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrajectorySample;
    use approx::assert_abs_diff_eq;

    fn rewards(values: &[f64]) -> Trajectory {
        Trajectory::new(
            values
                .iter()
                .enumerate()
                .map(|(i, &reward)| TrajectorySample {
                    t: i as f64 * 0.1,
                    reward,
                    ..Default::default()
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn worked_example() {
        let traj = rewards(&[1.0, 2.0, 3.0]);
        assert_abs_diff_eq!(cumulative_reward(&traj, 0.15), 4.5, epsilon = 1e-9);
        assert_abs_diff_eq!(cumulative_reward(&traj, 0.0), 1.0);
        assert_abs_diff_eq!(cumulative_reward(&traj, 5.0), 6.0);
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(cumulative_reward(&Trajectory::default(), 1.0), 0.0);
    }

    #[test]
    fn non_decreasing_for_non_negative_rewards() {
        let traj = rewards(&[0.0, 0.5, 2.0, 0.0, 0.0, 1.25, 3.0, 0.1]);
        let mut last = f64::NEG_INFINITY;
        for step in 0..=1000 {
            let t = step as f64 * 0.001;
            let c = cumulative_reward(&traj, t);
            assert!(c >= last, "dropped at t={t}: {last} -> {c}");
            last = c;
        }
    }

    #[test]
    fn continuous_across_keyframes() {
        let traj = rewards(&[1.0, 2.0, 3.0, 4.0]);
        let before = cumulative_reward(&traj, 0.2 - 1e-9);
        let at = cumulative_reward(&traj, 0.2);
        assert_abs_diff_eq!(before, at, epsilon = 1e-6);
    }

    #[test]
    fn seeking_back_matches_forward_play() {
        let traj = rewards(&[0.3, -0.2, 0.7, 0.1, 0.9]);
        let forward: Vec<u64> = (0..40)
            .map(|i| cumulative_reward(&traj, i as f64 * 0.011).to_bits())
            .collect();
        let backward: Vec<u64> = (0..40)
            .rev()
            .map(|i| cumulative_reward(&traj, i as f64 * 0.011).to_bits())
            .collect();
        let backward: Vec<u64> = backward.into_iter().rev().collect();
        assert_eq!(forward, backward);
    }
}
