//! `playback_core` — Lockstep replay of two recorded agent trajectories.
//!
//! # Module layout
//! - [`types`]      — Samples, derived agent state, trail points, agent slots
//! - [`error`]      — Load-boundary validation errors
//! - [`trajectory`] — Validated trajectory + reward prefix sums, race logs
//! - [`sampler`]    — Keyframe lookup (bracketing pair + alpha)
//! - [`interp`]     — Linear / angle-aware interpolation
//! - [`reward`]     — Cumulative reward integration
//! - [`trail`]      — Bounded per-agent position history
//! - [`clock`]      — Playback clock state machine + frame scheduling
//! - [`session`]    — Clock + trajectories + trails, snapshot for renderers
//! - [`transform`]  — Uniform fit of world points into a viewport

pub mod clock;
pub mod error;
pub mod interp;
pub mod reward;
pub mod sampler;
pub mod session;
pub mod trail;
pub mod trajectory;
pub mod transform;
pub mod types;

pub use clock::{
    format_time, FrameRequest, FrameScheduler, ManualScheduler, PlaybackClock, PlaybackSpeed,
    PlaybackState, TickOutcome,
};
pub use error::{InvalidSpeed, TrajectoryError};
pub use sampler::{sample, state_at, Keyframe};
pub use session::{PlaybackConfig, PlaybackSession, PlaybackSnapshot};
pub use trail::{TrailBuffer, Trails};
pub use trajectory::{AgentKind, RaceLog, RaceMetadata, Trajectory};
pub use transform::{fit, ViewTransform};
pub use types::{AgentId, AgentSlots, AgentState, TrailPoint, TrajectorySample};
