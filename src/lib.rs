//! Nova Strike - simulation core for a neon arcade space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, tick loop)
//! - `settings`: Display/accessibility preferences surfaced to the renderer
//! - `highscores`: Session leaderboard
//!
//! The host owns the frame loop: once per display refresh it builds a
//! [`sim::TickInput`] from its input devices and calls [`sim::tick`] with the
//! current viewport size and frame delta. Rendering reads the [`sim::World`]
//! between ticks; nothing in here draws, plays audio, or touches storage.

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest delta accepted per tick; frame hitches are clamped to this
    pub const MAX_TICK_DT: f32 = 1.0 / 30.0;
    /// Motion time scale while slow-mo is active
    pub const SLOWMO_SCALE: f32 = 0.6;

    /// Ship dimensions and handling
    pub const SHIP_SIZE: f32 = 28.0;
    pub const SHIP_SPEED: f32 = 260.0;
    /// Bullet spawn offset from ship center, as a fraction of ship width
    pub const SHIP_NOSE_OFFSET: f32 = 0.52;
    /// Minimum time between shots while fire is held
    pub const FIRE_COOLDOWN: f32 = 0.15;

    /// Bullet defaults
    pub const BULLET_SPEED: f32 = 1000.0;
    pub const BULLET_RADIUS: f32 = 4.0;
    /// Fan half-angle (radians) for spread shots
    pub const SPREAD_ANGLE: f32 = 0.18;
    /// Chance per second for a live bullet to go homing while the effect runs
    pub const HOMING_CONVERT_RATE: f32 = 3.0;
    /// Steering lerp rate (per second) toward the nearest enemy
    pub const HOMING_TURN_RATE: f32 = 6.0;

    /// Beam (laser power-up) shape and damage
    pub const BEAM_WIDTH: f32 = 26.0;
    pub const BEAM_LIFE: f32 = 0.12;
    pub const BEAM_DPS: f32 = 30.0;
    /// How far behind the beam origin targets still count as covered
    pub const BEAM_BACK_TOLERANCE: f32 = 8.0;

    /// Regular spawn pacing: interval shrinks with session time
    pub const SPAWN_INTERVAL_START: f32 = 1.7;
    pub const SPAWN_INTERVAL_MIN: f32 = 0.6;
    pub const SPAWN_RAMP: f32 = 0.0045;
    /// Spawn interval multiplier while a boss is on screen
    pub const BOSS_SPAWN_THROTTLE: f32 = 1.8;
    /// Seconds between boss arrivals
    pub const BOSS_INTERVAL: f32 = 45.0;
    /// Meteor shower cadence: idle gap, active length, per-meteor sub-interval
    pub const SHOWER_IDLE: f32 = 25.0;
    pub const SHOWER_DURATION: f32 = 8.0;
    pub const SHOWER_SPAWN_INTERVAL: f32 = 0.35;
    /// How far outside the viewport enemies spawn
    pub const SPAWN_EDGE_OFFSET: f32 = 40.0;
    /// Aim jitter around the ship for fresh enemy headings
    pub const SPAWN_AIM_JITTER: f32 = 40.0;
    /// Enemies further out than this margin are despawned
    pub const DESPAWN_MARGIN: f32 = 80.0;

    /// Score orb behavior
    pub const ORB_VALUE: u32 = 5;
    pub const ORB_VALUE_BOSS: u32 = 10;
    /// Uncollected orbs evaporate after this long
    pub const ORB_LIFE: f32 = 12.0;
    pub const ORB_PICKUP_RADIUS: f32 = 40.0;
    pub const ORB_MAGNET_ACCEL: f32 = 900.0;
    pub const ORB_MAX_SPEED: f32 = 520.0;
    pub const ORB_DRAG: f32 = 0.98;

    /// Power-up drops
    pub const POWERUP_RADIUS: f32 = 12.0;
    pub const POWERUP_LIFE: f32 = 9.0;
    pub const POWERUP_PICKUP_RADIUS: f32 = 36.0;
    pub const POWERUP_DROP_CHANCE: f64 = 0.12;

    /// Combo multiplier tuning
    pub const COMBO_MAX: f32 = 5.0;
    pub const COMBO_STEP: f32 = 0.25;
    /// Seconds without a kill before the multiplier starts to decay
    pub const COMBO_IDLE: f32 = 2.5;
    pub const COMBO_DECAY_RATE: f32 = 1.5;

    /// Theme rotation: hold time, then crossfade length
    pub const THEME_HOLD: f32 = 35.0;
    pub const THEME_FADE: f32 = 4.0;

    /// Gravity wells seeded per run
    pub const WELL_COUNT: usize = 2;

    /// Particle cap; oldest particles are evicted past this
    pub const MAX_PARTICLES: usize = 768;
    pub const PARTICLE_DRAG: f32 = 0.98;
    /// Geometric screen-shake falloff per tick
    pub const SHAKE_DECAY: f32 = 0.9;
    /// Thruster particle emission rates (particles/sec)
    pub const THRUST_RATE_MOVING: f32 = 26.0;
    pub const THRUST_RATE_IDLE: f32 = 6.0;
}

/// Screen-space "up" (the viewport is y-down)
pub const UP: Vec2 = Vec2::NEG_Y;

/// Linear interpolation for scalars
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Normalize `v`, falling back to [`UP`] when the input has no direction
#[inline]
pub fn dir_or_up(v: Vec2) -> Vec2 {
    let d = v.normalize_or_zero();
    if d == Vec2::ZERO { UP } else { d }
}
