//! Nova Strike entry point
//!
//! Headless demo driver: runs scripted autopilot sessions through the
//! simulation at a fixed 60 Hz and prints the resulting leaderboard. Useful
//! for smoke-testing balance changes without a renderer attached.

use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;

use nova_strike::HighScores;
use nova_strike::sim::{Mode, TickInput, World, tick};

const VIEW: Vec2 = Vec2::new(960.0, 540.0);
const DT: f32 = 1.0 / 60.0;
const SESSION_SECS: f32 = 90.0;
const SESSIONS: u64 = 3;

fn main() {
    env_logger::init();

    let seed = env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

    log::info!("Nova Strike (headless) starting, seed {seed}");

    let mut board = HighScores::new();
    for run in 0..SESSIONS {
        let (score, survived) = autopilot_session(seed.wrapping_add(run), SESSION_SECS);
        let rank = board.add_score(score, survived);
        match rank {
            Some(rank) => println!("run {} scored {score} in {survived:.1}s (rank {rank})", run + 1),
            None => println!("run {} scored {score} in {survived:.1}s", run + 1),
        }
    }

    println!("\n=== Leaderboard ===");
    for (i, entry) in board.entries.iter().enumerate() {
        println!(
            "{:>2}. {:>8}  {:>6.1}s",
            i + 1,
            entry.score,
            entry.survived_secs
        );
    }
}

/// Run one scripted session; returns the final score and seconds survived
fn autopilot_session(seed: u64, max_secs: f32) -> (u64, f32) {
    let mut world = World::new(seed);
    let start = TickInput {
        start: true,
        ..Default::default()
    };
    tick(&mut world, &start, VIEW, DT);

    let mut t = 0.0f32;
    while t < max_secs && world.mode == Mode::Playing {
        let input = autopilot_input(&world, t);
        tick(&mut world, &input, VIEW, DT);
        t += DT;
    }

    if world.mode == Mode::GameOver {
        log::info!("autopilot down at {t:.1}s, score {}", world.score);
    } else {
        log::info!("autopilot survived {max_secs:.0}s, score {}", world.score);
    }
    (world.score, world.elapsed)
}

/// Aim at the nearest enemy, weave around mid-screen, always firing
fn autopilot_input(world: &World, t: f32) -> TickInput {
    let center = world.ship.center();
    let nearest = world.enemies.iter().map(|e| e.center()).min_by(|a, b| {
        a.distance_squared(center)
            .partial_cmp(&b.distance_squared(center))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let aim = nearest.unwrap_or(center + nova_strike::UP * 100.0);

    let anchor = VIEW * 0.5 + Vec2::new((t * 0.6).sin(), (t * 0.8).cos()) * 140.0;
    let mut movement = (anchor - center) * 0.02;
    if let Some(threat) = nearest {
        // Sidestep anything closing in
        let away = center - threat;
        if away.length() < 140.0 {
            movement += away.normalize_or_zero() * 1.5;
        }
    }

    TickInput {
        movement,
        aim: Some(aim),
        fire: true,
        ..Default::default()
    }
}
