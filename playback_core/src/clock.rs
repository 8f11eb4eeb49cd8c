//! Playback clock: the shared virtual time driving both agents.
//!
//! # State machine
//! ```text
//!            play()                 tick() reaches max_time, loop off
//! Stopped ───────────► Playing ─────────────────────────────────► Stopped
//!    ▲                   │  │
//!    └───── pause() ─────┘  └─ tick() reaches max_time, loop on: time → 0
//! ```
//!
//! `reset()` and `seek()` move the time without touching the play state.
//!
//! # Frame scheduling
//! The clock never reads a wall clock itself. An external driver (render
//! loop, timer, test) implements [`FrameScheduler`]; while playing the clock
//! keeps exactly one outstanding [`FrameRequest`] and only accepts a frame that
//! carries it. Pausing cancels the request before returning, so a late frame
//! from the driver cannot move the time after `pause()`.

use crate::error::InvalidSpeed;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Speed
// ---------------------------------------------------------------------------

/// Supported playback multipliers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum PlaybackSpeed {
    #[default]
    X1,
    X2,
    X5,
    X10,
}

impl PlaybackSpeed {
    pub const ALL: [PlaybackSpeed; 4] = [
        PlaybackSpeed::X1,
        PlaybackSpeed::X2,
        PlaybackSpeed::X5,
        PlaybackSpeed::X10,
    ];

    /// Simulated seconds per wall-clock second.
    pub fn multiplier(self) -> f64 {
        u32::from(self) as f64
    }

    /// Next faster speed (saturates at ×10).
    pub fn faster(self) -> Self {
        match self {
            PlaybackSpeed::X1 => PlaybackSpeed::X2,
            PlaybackSpeed::X2 => PlaybackSpeed::X5,
            PlaybackSpeed::X5 | PlaybackSpeed::X10 => PlaybackSpeed::X10,
        }
    }

    /// Next slower speed (saturates at ×1).
    pub fn slower(self) -> Self {
        match self {
            PlaybackSpeed::X10 => PlaybackSpeed::X5,
            PlaybackSpeed::X5 => PlaybackSpeed::X2,
            PlaybackSpeed::X2 | PlaybackSpeed::X1 => PlaybackSpeed::X1,
        }
    }
}

impl From<PlaybackSpeed> for u32 {
    fn from(speed: PlaybackSpeed) -> Self {
        match speed {
            PlaybackSpeed::X1 => 1,
            PlaybackSpeed::X2 => 2,
            PlaybackSpeed::X5 => 5,
            PlaybackSpeed::X10 => 10,
        }
    }
}

impl TryFrom<u32> for PlaybackSpeed {
    type Error = InvalidSpeed;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PlaybackSpeed::X1),
            2 => Ok(PlaybackSpeed::X2),
            5 => Ok(PlaybackSpeed::X5),
            10 => Ok(PlaybackSpeed::X10),
            other => Err(InvalidSpeed(other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Frame scheduling
// ---------------------------------------------------------------------------

/// Handle for one scheduled frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// Source of frame callbacks (animation frame, timer, manual driver).
pub trait FrameScheduler {
    /// Ask for one future frame callback.
    fn request_frame(&mut self) -> FrameRequest;

    /// Withdraw a request. Must take effect before returning.
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// In-process scheduler: the driver pulls due requests with [`take_due`].
///
/// [`take_due`]: ManualScheduler::take_due
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Option<FrameRequest>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the outstanding request, if any, for delivery.
    pub fn take_due(&mut self) -> Option<FrameRequest> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id += 1;
        let request = FrameRequest(self.next_id);
        self.pending = Some(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Observable clock fields, as handed to a UI.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub current_time: f64,
    pub speed: PlaybackSpeed,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub max_time: f64,
}

/// What a tick did to the time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing, a stale frame, or a zero-length step: nothing changed
    Idle,
    /// Time moved forward
    Advanced,
    /// Reached the end with looping on: time is back at 0
    Wrapped,
    /// Reached the end with looping off: time is `max_time`, now stopped
    Finished,
}

/// The playback state machine (see module docs).
#[derive(Debug)]
pub struct PlaybackClock<S: FrameScheduler = ManualScheduler> {
    state: PlaybackState,
    /// Timestamp of the previous accepted frame; `None` right after `play()`
    last_frame_ms: Option<f64>,
    pending: Option<FrameRequest>,
    scheduler: S,
}

impl<S: FrameScheduler> PlaybackClock<S> {
    pub fn new(scheduler: S, max_time: f64, speed: PlaybackSpeed, looping: bool) -> Self {
        Self {
            state: PlaybackState {
                is_playing: false,
                current_time: 0.0,
                speed,
                looping,
                max_time: sanitize_max_time(max_time),
            },
            last_frame_ms: None,
            pending: None,
            scheduler,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_time(&self) -> f64 {
        self.state.current_time
    }

    pub fn max_time(&self) -> f64 {
        self.state.max_time
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn pending_frame(&self) -> Option<FrameRequest> {
        self.pending
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Start playing. A clock with nothing to play (`max_time == 0`) stays
    /// stopped.
    pub fn play(&mut self) {
        if self.state.is_playing {
            return;
        }
        if self.state.max_time <= 0.0 {
            debug!("play ignored: nothing to play");
            return;
        }
        self.state.is_playing = true;
        // The first frame after resuming must not count the paused interval.
        self.last_frame_ms = None;
        self.pending = Some(self.scheduler.request_frame());
        debug!(t = self.state.current_time, "playback started");
    }

    /// Stop playing and withdraw the scheduled frame.
    pub fn pause(&mut self) {
        if !self.state.is_playing {
            return;
        }
        self.state.is_playing = false;
        self.cancel_pending();
        debug!(t = self.state.current_time, "playback paused");
    }

    /// Back to time 0; play state unchanged.
    pub fn reset(&mut self) {
        self.state.current_time = 0.0;
    }

    /// Jump to `t`, clamped into `[0, max_time]`; play state unchanged.
    pub fn seek(&mut self, t: f64) {
        self.state.current_time = t.max(0.0).min(self.state.max_time);
        trace!(t = self.state.current_time, "seek");
    }

    pub fn set_speed(&mut self, speed: PlaybackSpeed) {
        self.state.speed = speed;
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.state.looping = looping;
    }

    /// Start a fresh session over data lasting `max_time`: stopped, at 0.
    /// Speed and loop settings carry over.
    pub fn reload(&mut self, max_time: f64) {
        self.state.is_playing = false;
        self.cancel_pending();
        self.last_frame_ms = None;
        self.state.current_time = 0.0;
        self.state.max_time = sanitize_max_time(max_time);
        debug!(max_time = self.state.max_time, "clock reloaded");
    }

    /// Advance by `wall_delta_ms` of real time, scaled by the speed.
    ///
    /// Only meaningful while playing. Negative or non-finite deltas count
    /// as zero.
    pub fn tick(&mut self, wall_delta_ms: f64) -> TickOutcome {
        if !self.state.is_playing {
            return TickOutcome::Idle;
        }
        let wall_delta_ms = if wall_delta_ms.is_finite() {
            wall_delta_ms.max(0.0)
        } else {
            0.0
        };
        let sim_delta = wall_delta_ms / 1000.0 * self.state.speed.multiplier();
        let t = self.state.current_time + sim_delta;

        if t >= self.state.max_time {
            if self.state.looping {
                self.state.current_time = 0.0;
                debug!("playback wrapped to start");
                TickOutcome::Wrapped
            } else {
                self.state.current_time = self.state.max_time;
                self.state.is_playing = false;
                self.cancel_pending();
                debug!(t = self.state.max_time, "playback finished");
                TickOutcome::Finished
            }
        } else if t == self.state.current_time {
            TickOutcome::Idle
        } else {
            self.state.current_time = t;
            trace!(t, "tick");
            TickOutcome::Advanced
        }
    }

    /// Frame callback from the scheduler at wall time `timestamp_ms`.
    ///
    /// Frames that do not carry the outstanding request (cancelled, stale or
    /// duplicated) are rejected without touching any state.
    pub fn on_frame(&mut self, request: FrameRequest, timestamp_ms: f64) -> TickOutcome {
        if !self.state.is_playing || self.pending != Some(request) {
            trace!(?request, "stale frame dropped");
            return TickOutcome::Idle;
        }
        self.pending = None;

        let delta = self.last_frame_ms.map_or(0.0, |last| timestamp_ms - last);
        self.last_frame_ms = Some(timestamp_ms);

        let outcome = self.tick(delta);
        if self.state.is_playing {
            self.pending = Some(self.scheduler.request_frame());
        }
        outcome
    }

    /// Tear the clock down, cancelling any scheduled frame, and hand the
    /// scheduler back.
    pub fn dispose(mut self) -> S {
        self.state.is_playing = false;
        self.cancel_pending();
        self.scheduler
    }

    fn cancel_pending(&mut self) {
        if let Some(request) = self.pending.take() {
            self.scheduler.cancel_frame(request);
        }
    }
}

fn sanitize_max_time(max_time: f64) -> f64 {
    if max_time.is_finite() {
        max_time.max(0.0)
    } else {
        0.0
    }
}

/// Format seconds as `m:ss.s` for progress readouts.
pub fn format_time(t: f64) -> String {
    let t = t.max(0.0);
    let mins = (t / 60.0).floor();
    let secs = t - mins * 60.0;
    format!("{}:{:04.1}", mins as u64, secs)
}
