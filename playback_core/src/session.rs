//! Playback session: the clock, both agents' logs and their trails.
//!
//! # Per time change
//! 1. The clock moves (tick / frame / seek / reset / load)
//! 2. Trails are cleared if the time jumped (wrap, seek, reset, load)
//! 3. Both agents are sampled at the same `current_time`
//! 4. On a forward tick, each sampled position is appended to that agent's
//!    trail; after a jump the trails stay empty until the next tick
//!
//! Renderers read the result through [`PlaybackSession::snapshot`].

use crate::{
    clock::{
        FrameRequest, FrameScheduler, ManualScheduler, PlaybackClock, PlaybackSpeed,
        PlaybackState, TickOutcome,
    },
    sampler::state_at,
    trail::{Trails, DEFAULT_TRAIL_CAPACITY},
    trajectory::RaceLog,
    types::{AgentId, AgentSlots, AgentState, TrailPoint},
};
use serde::Serialize;
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Configuration for a playback session.
#[derive(Clone, Debug)]
pub struct PlaybackConfig {
    /// Positions kept per agent trail
    pub trail_capacity: usize,
    /// Speed of a new session
    pub initial_speed: PlaybackSpeed,
    /// Whether a new session loops at the end
    pub loop_playback: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            trail_capacity: DEFAULT_TRAIL_CAPACITY,
            initial_speed: PlaybackSpeed::X1,
            loop_playback: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    pub playback: PlaybackState,
    /// `None` for an absent or empty agent
    pub agents: AgentSlots<Option<AgentState>>,
    /// Oldest point first
    pub trails: AgentSlots<Vec<TrailPoint>>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Two agents replayed in lockstep on one clock.
pub struct PlaybackSession<S: FrameScheduler = ManualScheduler> {
    clock: PlaybackClock<S>,
    logs: AgentSlots<Option<RaceLog>>,
    trails: Trails,
    states: AgentSlots<Option<AgentState>>,
}

impl PlaybackSession<ManualScheduler> {
    /// Session driven by an in-process [`ManualScheduler`].
    pub fn manual(config: PlaybackConfig) -> Self {
        Self::new(config, ManualScheduler::new())
    }
}

impl<S: FrameScheduler> PlaybackSession<S> {
    /// Empty session: no agents, `max_time = 0`.
    pub fn new(config: PlaybackConfig, scheduler: S) -> Self {
        Self {
            clock: PlaybackClock::new(
                scheduler,
                0.0,
                config.initial_speed,
                config.loop_playback,
            ),
            logs: AgentSlots::default(),
            trails: Trails::new(config.trail_capacity),
            states: AgentSlots::default(),
        }
    }

    /// Replace both agents' data and start a fresh session.
    ///
    /// Stops playback, rewinds to 0, clears trails, then samples the new data
    /// at time 0.
    pub fn load(&mut self, a: Option<RaceLog>, b: Option<RaceLog>) {
        self.logs = AgentSlots::new(a, b);
        let max_time = self
            .logs
            .iter()
            .filter_map(|(_, log)| log.as_ref().map(RaceLog::duration))
            .fold(0.0, f64::max);

        self.clock.reload(max_time);
        self.trails.clear();

        for (agent, log) in self.logs.iter() {
            match log {
                Some(log) => info!(
                    %agent,
                    kind = %log.metadata.agent_type,
                    samples = log.trajectory.len(),
                    duration = log.duration(),
                    "agent loaded"
                ),
                None => debug!(%agent, "agent slot empty"),
            }
        }
        self.resample();
    }

    pub fn log(&self, agent: AgentId) -> Option<&RaceLog> {
        self.logs[agent].as_ref()
    }

    /// State of `agent` at an arbitrary time, without touching the session.
    pub fn state_at(&self, agent: AgentId, t: f64) -> Option<AgentState> {
        self.logs[agent]
            .as_ref()
            .and_then(|log| state_at(&log.trajectory, t))
    }

    /// Cached state of `agent` at the current time.
    pub fn agent_state(&self, agent: AgentId) -> Option<AgentState> {
        self.states[agent]
    }

    pub fn trails(&self) -> &Trails {
        &self.trails
    }

    pub fn playback(&self) -> PlaybackState {
        self.clock.state()
    }

    pub fn clock(&self) -> &PlaybackClock<S> {
        &self.clock
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.clock.scheduler_mut()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            playback: self.clock.state(),
            agents: self.states.clone(),
            trails: self.trails.to_vecs(),
        }
    }

    // -- controls -----------------------------------------------------------

    pub fn play(&mut self) {
        self.clock.play();
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    /// Rewind to 0 and clear trails; keeps playing if it was.
    pub fn reset(&mut self) {
        self.clock.reset();
        self.trails.clear();
        self.resample();
    }

    /// Jump to `t` (clamped) and clear trails; keeps the play state.
    pub fn seek(&mut self, t: f64) {
        self.clock.seek(t);
        self.trails.clear();
        self.resample();
    }

    pub fn set_speed(&mut self, speed: PlaybackSpeed) {
        self.clock.set_speed(speed);
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.clock.set_loop(looping);
    }

    /// Advance by `wall_delta_ms` of real time.
    pub fn tick(&mut self, wall_delta_ms: f64) -> TickOutcome {
        let outcome = self.clock.tick(wall_delta_ms);
        self.apply(outcome);
        outcome
    }

    /// Deliver a scheduled frame at wall time `timestamp_ms`.
    pub fn on_frame(&mut self, request: FrameRequest, timestamp_ms: f64) -> TickOutcome {
        let outcome = self.clock.on_frame(request, timestamp_ms);
        self.apply(outcome);
        outcome
    }

    /// Tear down, cancelling any scheduled frame; returns the scheduler.
    pub fn dispose(self) -> S {
        self.clock.dispose()
    }

    fn apply(&mut self, outcome: TickOutcome) {
        match outcome {
            TickOutcome::Idle => {}
            TickOutcome::Advanced | TickOutcome::Finished => {
                self.resample();
                for agent in AgentId::ALL {
                    if let Some(state) = self.states[agent] {
                        self.trails.append(agent, state.position());
                    }
                }
            }
            TickOutcome::Wrapped => {
                self.trails.clear();
                self.resample();
            }
        }
    }

    /// Sample both agents at the current time.
    fn resample(&mut self) {
        let t = self.clock.current_time();
        for agent in AgentId::ALL {
            self.states[agent] = self.logs[agent]
                .as_ref()
                .and_then(|log| state_at(&log.trajectory, t));
        }
    }
}
