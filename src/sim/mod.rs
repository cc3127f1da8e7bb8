//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clamped variable timestep, no wall-clock reads
//! - Seeded RNG only
//! - Stable iteration order (by Vec index)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod collision;
pub mod spawn;
pub mod state;
pub mod theme;
pub mod tick;

pub use aabb::Aabb;
pub use collision::{beam_covers, circle_hits_aabb, within_radius};
pub use spawn::Spawner;
pub use state::{
    Beam, Bullet, Combo, Effect, Effects, Enemy, EnemyKind, GravityWell, Mode, Particle, PowerUp,
    ScoreOrb, Ship, World,
};
pub use theme::{BlendedTheme, Theme, ThemeState, themes};
pub use tick::{TickInput, tick};
