//! Bounded position history per agent, for fading-path rendering.

use crate::types::{AgentId, AgentSlots, TrailPoint};
use std::collections::VecDeque;

/// Number of points kept per agent unless configured otherwise.
pub const DEFAULT_TRAIL_CAPACITY: usize = 80;

/// Ring buffer of the most recent positions, oldest first.
#[derive(Clone, Debug)]
pub struct TrailBuffer {
    points: VecDeque<TrailPoint>,
    capacity: usize,
}

impl TrailBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a point, evicting the oldest one once full.
    pub fn append(&mut self, point: TrailPoint) {
        if self.capacity == 0 {
            return;
        }
        while self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrailPoint> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<TrailPoint> {
        self.points.iter().copied().collect()
    }
}

impl Default for TrailBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_TRAIL_CAPACITY)
    }
}

/// One trail per agent.
#[derive(Clone, Debug, Default)]
pub struct Trails {
    buffers: AgentSlots<TrailBuffer>,
}

impl Trails {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffers: AgentSlots::from_fn(|_| TrailBuffer::new(capacity)),
        }
    }

    pub fn append(&mut self, agent: AgentId, point: TrailPoint) {
        self.buffers[agent].append(point);
    }

    pub fn get(&self, agent: AgentId) -> &TrailBuffer {
        &self.buffers[agent]
    }

    /// Drop the history of both agents.
    pub fn clear(&mut self) {
        for agent in AgentId::ALL {
            self.buffers[agent].clear();
        }
    }

    pub fn to_vecs(&self) -> AgentSlots<Vec<TrailPoint>> {
        self.buffers.map(TrailBuffer::to_vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(i: usize) -> TrailPoint {
        TrailPoint {
            x: i as f64,
            y: -(i as f64),
        }
    }

    #[test]
    fn keeps_most_recent_in_order() {
        let mut trail = TrailBuffer::default();
        for i in 0..200 {
            trail.append(pt(i));
        }
        assert_eq!(trail.len(), 80);
        let expected: Vec<_> = (120..200).map(pt).collect();
        assert_eq!(trail.to_vec(), expected);
    }

    #[test]
    fn below_capacity_keeps_everything() {
        let mut trail = TrailBuffer::new(5);
        for i in 0..3 {
            trail.append(pt(i));
        }
        assert_eq!(trail.to_vec(), vec![pt(0), pt(1), pt(2)]);
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut trail = TrailBuffer::new(0);
        trail.append(pt(1));
        assert!(trail.is_empty());
    }

    #[test]
    fn agents_are_independent() {
        let mut trails = Trails::new(3);
        trails.append(AgentId::A, pt(1));
        trails.append(AgentId::A, pt(2));
        trails.append(AgentId::B, pt(9));
        assert_eq!(trails.get(AgentId::A).len(), 2);
        assert_eq!(trails.get(AgentId::B).to_vec(), vec![pt(9)]);

        trails.clear();
        assert!(trails.get(AgentId::A).is_empty());
        assert!(trails.get(AgentId::B).is_empty());
    }
}
