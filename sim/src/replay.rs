//! Race recording: drive one agent around a track and export its log.

use crate::{
    car::{Car, CarParams},
    driver::{Driver, DriverParams},
    scenarios::{Track, TrackKind},
};
use playback_core::{AgentKind, RaceLog, RaceMetadata, Trajectory, TrajectorySample};
use serde::{Deserialize, Serialize};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::debug;

/// Reward for a step that ends off the track.
pub const OFF_TRACK_PENALTY: f64 = -10.0;
/// Scale on the velocity component along the track.
pub const PROGRESS_WEIGHT: f64 = 0.1;
/// Penalty per unit of absolute steering.
pub const STEERING_PENALTY: f64 = 0.05;
/// Fraction of speed kept after leaving the track.
pub const OFF_TRACK_SPEED_KEEP: f64 = 0.2;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Configuration for a recorded race.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RaceConfig {
    /// Integration step (s); also the log's sample spacing
    pub sim_dt: f64,
    /// Hard cap on episode length
    pub max_steps: usize,
    pub track: TrackKind,
    /// Base seed; each agent kind derives its own driver seed from it
    pub seed: u64,
    /// Episode ends once this many laps are complete
    pub laps: u32,
    pub car: CarParams,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            sim_dt: 0.1,
            max_steps: 1200,
            track: TrackKind::Oval,
            seed: 42,
            laps: 1,
            car: CarParams::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Recording
// ---------------------------------------------------------------------------

/// Label recorded in the log metadata for each agent kind.
pub fn algorithm_name(kind: AgentKind) -> &'static str {
    match kind {
        AgentKind::Rl => "PPO",
        AgentKind::Es => "OpenAI-ES",
    }
}

fn driver_seed(kind: AgentKind, seed: u64) -> u64 {
    match kind {
        AgentKind::Rl => seed,
        AgentKind::Es => seed.wrapping_add(1),
    }
}

/// Lap crossing: the closest centerline index jumps from the last quarter of
/// the loop into the first.
fn crossed_start(prev: usize, next: usize, len: usize) -> bool {
    let quarter = len / 4;
    prev >= len - quarter && next < quarter
}

/// Per-step reward and whether the step left the track.
fn step_reward(car: &Car, track: &Track, steering: f64) -> (f64, bool) {
    let closest = track.closest(&car.pos);
    if track.is_off_track(closest.distance) {
        return (OFF_TRACK_PENALTY, true);
    }
    let progress = car.velocity().dot(&track.tangent(closest.index));
    (
        progress * PROGRESS_WEIGHT - STEERING_PENALTY * steering.abs(),
        false,
    )
}

/// Simulate one episode for `kind` and return its race log.
pub fn record_race(kind: AgentKind, config: &RaceConfig) -> anyhow::Result<RaceLog> {
    let track = Track::build(config.track);
    anyhow::ensure!(!track.is_empty(), "track '{}' has no points", config.track.name());
    anyhow::ensure!(
        config.sim_dt.is_finite() && config.sim_dt > 0.0,
        "sim_dt must be positive, got {}",
        config.sim_dt
    );

    let (start, heading) = track.start_pose();
    let mut car = Car::at_rest(start, heading);
    let mut driver = Driver::new(DriverParams::for_kind(kind), driver_seed(kind, config.seed));

    let dt = config.sim_dt;
    let mut samples = Vec::with_capacity(config.max_steps);
    let mut prev_index = track.closest(&car.pos).index;
    let mut laps = 0;
    let mut total_reward = 0.0;

    for step in 0..config.max_steps {
        let (steering, throttle) = driver.act(&car, &track);
        car.step(&config.car, steering, throttle, dt);

        let (reward, off_track) = step_reward(&car, &track, steering);
        if off_track {
            car.speed *= OFF_TRACK_SPEED_KEEP;
        }
        total_reward += reward;

        samples.push(TrajectorySample {
            t: step as f64 * dt,
            x: car.pos.x,
            y: car.pos.y,
            heading: car.heading,
            speed: car.speed,
            steering,
            throttle,
            reward,
        });

        let index = track.closest(&car.pos).index;
        if crossed_start(prev_index, index, track.len()) {
            laps += 1;
        }
        prev_index = index;
        if laps >= config.laps {
            break;
        }
    }

    let total_time = samples.len() as f64 * dt;
    debug!(
        agent = %kind,
        track = config.track.name(),
        steps = samples.len(),
        laps,
        total_reward,
        "race recorded"
    );

    Ok(RaceLog {
        metadata: RaceMetadata {
            agent_type: kind,
            algorithm: algorithm_name(kind).to_string(),
            track_name: config.track.name().to_string(),
            track_points: track.points(),
            total_time,
            total_reward,
        },
        trajectory: Trajectory::new(samples)?,
    })
}

/// Record both agents on the same track with the same config.
pub fn record_pair(config: &RaceConfig) -> anyhow::Result<(RaceLog, RaceLog)> {
    Ok((
        record_race(AgentKind::Rl, config)?,
        record_race(AgentKind::Es, config)?,
    ))
}

/// Save a race log to a pretty-printed JSON file.
pub fn save_race_log(log: &RaceLog, path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, log)?;
    Ok(())
}

/// Load a race log from a JSON file.
///
/// The trajectory is validated on the way in; a log with decreasing or
/// non-finite timestamps is rejected.
pub fn load_race_log(path: &Path) -> anyhow::Result<RaceLog> {
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let log: RaceLog = serde_json::from_reader(reader)
        .map_err(|e| anyhow::anyhow!("invalid race log {}: {e}", path.display()))?;
    debug!(
        path = %path.display(),
        agent = %log.metadata.agent_type,
        samples = log.trajectory.len(),
        "race log loaded"
    );
    Ok(log)
}
