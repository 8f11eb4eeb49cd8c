//! Fundamental types used across the entire workspace.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

// ---------------------------------------------------------------------------
// Recorded data
// ---------------------------------------------------------------------------

/// One recorded step of an agent trajectory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    /// Simulation time of the step (seconds)
    pub t: f64,
    pub x: f64,
    pub y: f64,
    /// Heading in radians
    pub heading: f64,
    /// Forward speed (m/s)
    pub speed: f64,
    /// Steering command in [-1, 1]
    pub steering: f64,
    /// Throttle command in [0, 1]
    pub throttle: f64,
    /// Per-step reward
    pub reward: f64,
}

impl TrajectorySample {
    pub fn position(&self) -> TrailPoint {
        TrailPoint { x: self.x, y: self.y }
    }
}

// ---------------------------------------------------------------------------
// Derived state
// ---------------------------------------------------------------------------

/// Continuous agent state reconstructed at a query time.
///
/// Always derived from scratch from the trajectory; never updated in place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub speed: f64,
    pub steering: f64,
    pub throttle: f64,
    /// Interpolated per-step reward
    pub reward: f64,
    /// Reward integrated from the start of the trajectory up to the query time
    pub cumulative_reward: f64,
}

impl AgentState {
    pub fn position(&self) -> TrailPoint {
        TrailPoint { x: self.x, y: self.y }
    }
}

/// A single entry of a position trail.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub x: f64,
    pub y: f64,
}

// ---------------------------------------------------------------------------
// Agent slots
// ---------------------------------------------------------------------------

/// Which of the two replayed agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgentId {
    A,
    B,
}

impl AgentId {
    pub const ALL: [AgentId; 2] = [AgentId::A, AgentId::B];
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentId::A => write!(f, "A"),
            AgentId::B => write!(f, "B"),
        }
    }
}

/// One value per agent, indexable by [`AgentId`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentSlots<T> {
    pub a: T,
    pub b: T,
}

impl<T> AgentSlots<T> {
    pub fn new(a: T, b: T) -> Self {
        Self { a, b }
    }

    /// Build both slots from a per-agent constructor.
    pub fn from_fn(mut f: impl FnMut(AgentId) -> T) -> Self {
        Self {
            a: f(AgentId::A),
            b: f(AgentId::B),
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> AgentSlots<U> {
        AgentSlots {
            a: f(&self.a),
            b: f(&self.b),
        }
    }

    /// Iterate `(agent, value)` pairs in `A`, `B` order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &T)> {
        [(AgentId::A, &self.a), (AgentId::B, &self.b)].into_iter()
    }
}

impl<T> Index<AgentId> for AgentSlots<T> {
    type Output = T;

    fn index(&self, agent: AgentId) -> &T {
        match agent {
            AgentId::A => &self.a,
            AgentId::B => &self.b,
        }
    }
}

impl<T> IndexMut<AgentId> for AgentSlots<T> {
    fn index_mut(&mut self, agent: AgentId) -> &mut T {
        match agent {
            AgentId::A => &mut self.a,
            AgentId::B => &mut self.b,
        }
    }
}
