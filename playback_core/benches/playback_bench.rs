use criterion::{black_box, criterion_group, criterion_main, Criterion};
use playback_core::{
    sample, state_at, AgentKind, PlaybackConfig, PlaybackSession, RaceLog, RaceMetadata,
    Trajectory, TrajectorySample,
};

fn make_trajectory(n: usize) -> Trajectory {
    let samples = (0..n)
        .map(|i| {
            let t = i as f64 * 0.1;
            let angle = t * 0.05;
            // Tangent direction, wrapped into (-π, π] so headings cross the seam.
            let tangent = angle + std::f64::consts::FRAC_PI_2;
            TrajectorySample {
                t,
                x: 40.0 * angle.cos(),
                y: 25.0 * angle.sin(),
                heading: tangent.sin().atan2(tangent.cos()),
                speed: 12.0,
                steering: 0.1,
                throttle: 0.8,
                reward: 0.12,
            }
        })
        .collect();
    Trajectory::new(samples).unwrap()
}

fn make_log(kind: AgentKind, n: usize) -> RaceLog {
    let trajectory = make_trajectory(n);
    RaceLog {
        metadata: RaceMetadata {
            agent_type: kind,
            algorithm: "bench".into(),
            track_name: "oval".into(),
            track_points: Vec::new(),
            total_time: n as f64 * 0.1,
            total_reward: trajectory.total_reward(),
        },
        trajectory,
    }
}

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");

    for n in [10_000, 100_000, 1_000_000] {
        let traj = make_trajectory(n);
        let end = traj.duration();
        group.bench_function(format!("{n}_samples"), |b| {
            let mut t = 0.0;
            b.iter(|| {
                t = (t + 0.0173) % end;
                black_box(sample(&traj, black_box(t)));
            });
        });
        group.bench_function(format!("{n}_samples_state"), |b| {
            let mut t = 0.0;
            b.iter(|| {
                t = (t + 0.0173) % end;
                black_box(state_at(&traj, black_box(t)));
            });
        });
    }

    group.finish();
}

fn bench_session(c: &mut Criterion) {
    let mut session = PlaybackSession::manual(PlaybackConfig::default());
    session.load(
        Some(make_log(AgentKind::Rl, 100_000)),
        Some(make_log(AgentKind::Es, 80_000)),
    );
    session.play();

    c.bench_function("session_tick_60fps", |b| {
        b.iter(|| {
            black_box(session.tick(black_box(16.6)));
        });
    });
}

criterion_group!(benches, bench_sampling, bench_session);
criterion_main!(benches);
