//! `racereplay` CLI: record both agents' race logs, replay them headless.

use anyhow::Result;
use clap::{Parser, Subcommand};
use playback_core::{
    fit, format_time, AgentId, PlaybackConfig, PlaybackSession, PlaybackSnapshot, PlaybackSpeed,
    RaceLog, TickOutcome, ViewTransform,
};
use sim::replay::{load_race_log, record_pair, save_race_log, RaceConfig};
use sim::scenarios::TrackKind;
use std::path::{Path, PathBuf};

/// Viewport used for the screen coordinates in the readout.
const VIEW_WIDTH: f64 = 800.0;
const VIEW_HEIGHT: f64 = 600.0;
const VIEW_PADDING: f64 = 40.0;

#[derive(Parser)]
#[command(name = "racereplay", about = "Dual-agent race log playback")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record one race per agent and write both logs as JSON.
    Generate {
        #[arg(long, value_enum, default_value = "oval")]
        track: TrackKind,
        /// Random seed for reproducibility
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Laps per episode
        #[arg(long, default_value_t = 1)]
        laps: u32,
        #[arg(long, default_value = "rl_race.json")]
        rl_out: PathBuf,
        #[arg(long, default_value = "es_race.json")]
        es_out: PathBuf,
    },
    /// Replay both agents in lockstep without a display.
    ///
    /// Races are recorded on the fly unless saved logs are given; with only
    /// one log the other agent is left out.
    Play {
        #[arg(long, value_enum, default_value = "oval")]
        track: TrackKind,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 1)]
        laps: u32,
        /// Saved RL race log to replay instead of recording
        #[arg(long)]
        rl_log: Option<PathBuf>,
        /// Saved ES race log to replay instead of recording
        #[arg(long)]
        es_log: Option<PathBuf>,
        /// Playback multiplier: 1, 2, 5 or 10
        #[arg(long, default_value = "1", value_parser = parse_speed)]
        speed: PlaybackSpeed,
        /// Stop at the end instead of wrapping to the start
        #[arg(long)]
        no_loop: bool,
        /// Start at this race time (s)
        #[arg(long)]
        seek: Option<f64>,
        /// Frames delivered per wall-clock second
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        /// Wall-clock seconds to simulate
        #[arg(long, default_value_t = 30.0)]
        wall_seconds: f64,
        /// Print a readout every N frames
        #[arg(long, default_value_t = 60)]
        log_every: u64,
        /// Write the printed snapshots to a JSON file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn parse_speed(s: &str) -> Result<PlaybackSpeed, String> {
    let value: u32 = s.parse().map_err(|e| format!("{e}"))?;
    PlaybackSpeed::try_from(value).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            track,
            seed,
            laps,
            rl_out,
            es_out,
        } => {
            let config = race_config(track, seed, laps);
            run_generate(&config, &rl_out, &es_out)?;
        }
        Commands::Play {
            track,
            seed,
            laps,
            rl_log,
            es_log,
            speed,
            no_loop,
            seek,
            fps,
            wall_seconds,
            log_every,
            output,
        } => {
            let (rl, es) = if rl_log.is_some() || es_log.is_some() {
                (
                    rl_log.as_deref().map(load_race_log).transpose()?,
                    es_log.as_deref().map(load_race_log).transpose()?,
                )
            } else {
                let (rl, es) = record_pair(&race_config(track, seed, laps))?;
                (Some(rl), Some(es))
            };
            let options = PlayOptions {
                speed,
                looping: !no_loop,
                seek,
                fps,
                wall_seconds,
                log_every: log_every.max(1),
            };
            run_play(rl, es, &options, output.as_deref())?;
        }
    }

    Ok(())
}

fn race_config(track: TrackKind, seed: u64, laps: u32) -> RaceConfig {
    RaceConfig {
        track,
        seed,
        laps,
        ..Default::default()
    }
}

fn describe(log: &RaceLog) -> String {
    format!(
        "{} ({}): {} samples, {}, reward {:.2}",
        log.metadata.agent_type,
        log.metadata.algorithm,
        log.trajectory.len(),
        format_time(log.metadata.total_time),
        log.metadata.total_reward,
    )
}

fn run_generate(config: &RaceConfig, rl_out: &Path, es_out: &Path) -> Result<()> {
    println!(
        "Recording races on '{}' (seed={}, laps={})...",
        config.track.name(),
        config.seed,
        config.laps
    );
    let (rl, es) = record_pair(config)?;
    println!("  {}", describe(&rl));
    println!("  {}", describe(&es));

    save_race_log(&rl, rl_out)?;
    println!("RL log saved to {}", rl_out.display());
    save_race_log(&es, es_out)?;
    println!("ES log saved to {}", es_out.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Headless playback
// ---------------------------------------------------------------------------

struct PlayOptions {
    speed: PlaybackSpeed,
    looping: bool,
    seek: Option<f64>,
    fps: f64,
    wall_seconds: f64,
    log_every: u64,
}

fn run_play(
    rl: Option<RaceLog>,
    es: Option<RaceLog>,
    options: &PlayOptions,
    output_path: Option<&Path>,
) -> Result<()> {
    anyhow::ensure!(
        options.fps.is_finite() && options.fps > 0.0,
        "--fps must be positive, got {}",
        options.fps
    );

    for log in rl.iter().chain(es.iter()) {
        println!("  {}", describe(log));
    }
    let track_points = rl
        .iter()
        .chain(es.iter())
        .map(|log| log.metadata.track_points.as_slice())
        .find(|points| !points.is_empty())
        .unwrap_or(&[]);
    let view = fit(track_points, VIEW_WIDTH, VIEW_HEIGHT, VIEW_PADDING);

    let mut session = PlaybackSession::manual(PlaybackConfig {
        initial_speed: options.speed,
        loop_playback: options.looping,
        ..Default::default()
    });
    session.load(rl, es);
    if let Some(t) = options.seek {
        session.seek(t);
    }
    session.play();

    let frame_ms = 1000.0 / options.fps;
    let end_ms = options.wall_seconds.max(0.0) * 1000.0;
    let mut now_ms = 0.0;
    let mut frame = 0u64;
    let mut wraps = 0u32;
    let mut recorded: Vec<PlaybackSnapshot> = Vec::new();

    println!(
        "Playing at x{} (loop={}) for {:.1}s of wall time...",
        u32::from(options.speed),
        options.looping,
        options.wall_seconds
    );

    while now_ms <= end_ms {
        let Some(request) = session.scheduler_mut().take_due() else {
            break;
        };
        let outcome = session.on_frame(request, now_ms);
        if outcome == TickOutcome::Wrapped {
            wraps += 1;
        }

        if frame % options.log_every == 0 || outcome == TickOutcome::Finished {
            let snapshot = session.snapshot();
            println!("{}", readout(&snapshot, &view));
            if output_path.is_some() {
                recorded.push(snapshot);
            }
        }
        if outcome == TickOutcome::Finished {
            break;
        }

        frame += 1;
        now_ms += frame_ms;
    }

    let state = session.playback();
    println!(
        "Playback done: {} frames, {} wraps, stopped at {} / {}",
        frame,
        wraps,
        format_time(state.current_time),
        format_time(state.max_time),
    );
    session.dispose();

    if let Some(opath) = output_path {
        std::fs::write(opath, serde_json::to_string_pretty(&recorded)?)?;
        println!("Snapshots saved to {}", opath.display());
    }

    Ok(())
}

/// One progress line: time, then each agent's position on screen and reward.
fn readout(snapshot: &PlaybackSnapshot, view: &ViewTransform) -> String {
    let mut line = format!(
        "[{} / {}]",
        format_time(snapshot.playback.current_time),
        format_time(snapshot.playback.max_time)
    );
    for agent in AgentId::ALL {
        match snapshot.agents[agent] {
            Some(state) => {
                let (sx, sy) = view.to_screen(state.x, state.y);
                line.push_str(&format!(
                    "  {agent}: ({sx:6.1}, {sy:6.1}) px {:5.2} m/s reward {:7.2}",
                    state.speed, state.cumulative_reward
                ));
            }
            None => line.push_str(&format!("  {agent}: -")),
        }
    }
    line
}
