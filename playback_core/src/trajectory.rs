//! Validated trajectories and the recorded race-log layout.
//!
//! A [`Trajectory`] is checked once when it is built (or deserialized) and is
//! read-only afterwards. The reward prefix sums are computed at the same time
//! so cumulative-reward queries never depend on earlier queries.

use crate::{error::TrajectoryError, types::TrajectorySample};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Trajectory
// ---------------------------------------------------------------------------

/// Ordered, immutable sequence of samples for one agent.
///
/// Timestamps are finite, non-negative and non-decreasing. Duplicate
/// timestamps are accepted; the sampler resolves them toward the later
/// sample.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TrajectorySample>", into = "Vec<TrajectorySample>")]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
    /// `reward_prefix[i]` = sum of `samples[0..=i].reward`
    reward_prefix: Vec<f64>,
}

impl Trajectory {
    /// Validate `samples` and build the reward prefix sums.
    pub fn new(samples: Vec<TrajectorySample>) -> Result<Self, TrajectoryError> {
        let mut prev_t: Option<f64> = None;
        for (index, s) in samples.iter().enumerate() {
            if !s.t.is_finite() {
                return Err(TrajectoryError::NonFiniteTime { index });
            }
            if s.t < 0.0 {
                return Err(TrajectoryError::NegativeTime { index, t: s.t });
            }
            if let Some(prev) = prev_t {
                if s.t < prev {
                    return Err(TrajectoryError::NonMonotonicTime {
                        index,
                        prev,
                        next: s.t,
                    });
                }
            }
            prev_t = Some(s.t);
        }

        let reward_prefix = samples
            .iter()
            .scan(0.0, |acc, s| {
                *acc += s.reward;
                Some(*acc)
            })
            .collect();

        Ok(Self {
            samples,
            reward_prefix,
        })
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&TrajectorySample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }

    /// Timestamp of the last sample (0 when empty).
    pub fn duration(&self) -> f64 {
        self.last().map_or(0.0, |s| s.t)
    }

    /// Sum of rewards of `samples[0..=index]`.
    pub fn reward_through(&self, index: usize) -> f64 {
        self.reward_prefix.get(index).copied().unwrap_or(0.0)
    }

    /// Sum of all per-step rewards.
    pub fn total_reward(&self) -> f64 {
        self.reward_prefix.last().copied().unwrap_or(0.0)
    }
}

impl TryFrom<Vec<TrajectorySample>> for Trajectory {
    type Error = TrajectoryError;

    fn try_from(samples: Vec<TrajectorySample>) -> Result<Self, Self::Error> {
        Self::new(samples)
    }
}

impl From<Trajectory> for Vec<TrajectorySample> {
    fn from(trajectory: Trajectory) -> Self {
        trajectory.samples
    }
}

// ---------------------------------------------------------------------------
// Race log
// ---------------------------------------------------------------------------

/// Learning paradigm of the agent that produced a log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    /// Gradient-based reinforcement learning
    #[serde(rename = "RL")]
    Rl,
    /// Evolution strategies
    #[serde(rename = "ES")]
    Es,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentKind::Rl => write!(f, "RL"),
            AgentKind::Es => write!(f, "ES"),
        }
    }
}

/// Episode-level information recorded alongside a trajectory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaceMetadata {
    pub agent_type: AgentKind,
    pub algorithm: String,
    #[serde(default)]
    pub track_name: String,
    /// Track centerline in world coordinates
    pub track_points: Vec<[f64; 2]>,
    /// Episode length in seconds (`steps * dt`)
    pub total_time: f64,
    pub total_reward: f64,
}

/// One recorded episode: metadata + trajectory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaceLog {
    pub metadata: RaceMetadata,
    pub trajectory: Trajectory,
}

impl RaceLog {
    /// Playback length of this log.
    ///
    /// The recorded total time covers the final step interval, so it can be
    /// one `dt` longer than the last sample timestamp.
    pub fn duration(&self) -> f64 {
        self.metadata.total_time.max(self.trajectory.duration())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn at(t: f64, reward: f64) -> TrajectorySample {
        TrajectorySample {
            t,
            reward,
            ..Default::default()
        }
    }

    #[test]
    fn prefix_sums_accumulate_rewards() {
        let traj = Trajectory::new(vec![at(0.0, 1.0), at(1.0, 2.0), at(2.0, 3.0)]).unwrap();
        assert_abs_diff_eq!(traj.reward_through(0), 1.0);
        assert_abs_diff_eq!(traj.reward_through(1), 3.0);
        assert_abs_diff_eq!(traj.total_reward(), 6.0);
        assert_abs_diff_eq!(traj.duration(), 2.0);
    }

    #[test]
    fn rejects_time_going_backwards() {
        let err = Trajectory::new(vec![at(0.0, 0.0), at(2.0, 0.0), at(1.0, 0.0)]).unwrap_err();
        assert_eq!(
            err,
            TrajectoryError::NonMonotonicTime {
                index: 2,
                prev: 2.0,
                next: 1.0
            }
        );
    }

    #[test]
    fn rejects_bad_timestamps() {
        assert_eq!(
            Trajectory::new(vec![at(-0.5, 0.0)]).unwrap_err(),
            TrajectoryError::NegativeTime { index: 0, t: -0.5 }
        );
        assert_eq!(
            Trajectory::new(vec![at(0.0, 0.0), at(f64::NAN, 0.0)]).unwrap_err(),
            TrajectoryError::NonFiniteTime { index: 1 }
        );
    }

    #[test]
    fn accepts_duplicates_and_empty() {
        assert!(Trajectory::new(vec![at(0.0, 0.0), at(0.0, 1.0), at(1.0, 0.0)]).is_ok());
        let empty = Trajectory::new(Vec::new()).unwrap();
        assert!(empty.is_empty());
        assert_abs_diff_eq!(empty.duration(), 0.0);
        assert_abs_diff_eq!(empty.total_reward(), 0.0);
    }

    #[test]
    fn deserialize_validates() {
        let good = r#"{
            "metadata": {
                "agent_type": "ES",
                "algorithm": "OpenAI-ES",
                "track_points": [[0.0, 0.0], [50.0, 0.0]],
                "total_time": 0.2,
                "total_reward": 0.5
            },
            "trajectory": [
                {"t": 0.0, "x": 0.0, "y": 0.0, "heading": 0.0, "speed": 0.0,
                 "steering": 0.0, "throttle": 1.0, "reward": 0.25},
                {"t": 0.1, "x": 0.05, "y": 0.0, "heading": 0.0, "speed": 0.5,
                 "steering": 0.0, "throttle": 1.0, "reward": 0.25}
            ]
        }"#;
        let log: RaceLog = serde_json::from_str(good).unwrap();
        assert_eq!(log.metadata.agent_type, AgentKind::Es);
        assert_eq!(log.trajectory.len(), 2);
        assert_abs_diff_eq!(log.duration(), 0.2);

        let bad = r#"[
            {"t": 1.0, "x": 0.0, "y": 0.0, "heading": 0.0, "speed": 0.0,
             "steering": 0.0, "throttle": 0.0, "reward": 0.0},
            {"t": 0.5, "x": 0.0, "y": 0.0, "heading": 0.0, "speed": 0.0,
             "steering": 0.0, "throttle": 0.0, "reward": 0.0}
        ]"#;
        assert!(serde_json::from_str::<Trajectory>(bad).is_err());
    }
}
