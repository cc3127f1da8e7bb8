//! Maps (visual themes) and the crossfade scheduler
//!
//! A theme bundles the renderer's palette with the two parameters the
//! spawner cares about. Exactly one theme dominates at a time; every 35
//! seconds the scheduler starts a 4 second linear crossfade into the
//! pre-picked next theme. Only indices and blend progress are state; the
//! table itself is static.

use glam::Vec4;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{THEME_FADE, THEME_HOLD};
use crate::lerp;

/// A named immutable parameter record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub sky_top: Vec4,
    pub sky_bottom: Vec4,
    pub accent: Vec4,
    pub glow: Vec4,
    /// Probability a regular spawn is a UFO instead of an asteroid
    pub ufo_chance: f32,
    /// Multiplier on fresh enemy speeds
    pub enemy_speed: f32,
}

static THEMES: [Theme; 5] = [
    Theme {
        name: "Deep Field",
        sky_top: Vec4::new(0.02, 0.03, 0.08, 1.0),
        sky_bottom: Vec4::new(0.05, 0.07, 0.16, 1.0),
        accent: Vec4::new(0.35, 0.80, 1.00, 1.0),
        glow: Vec4::new(0.20, 0.55, 0.95, 1.0),
        ufo_chance: 0.12,
        enemy_speed: 0.9,
    },
    Theme {
        name: "Ember Nebula",
        sky_top: Vec4::new(0.09, 0.02, 0.03, 1.0),
        sky_bottom: Vec4::new(0.20, 0.06, 0.04, 1.0),
        accent: Vec4::new(1.00, 0.55, 0.25, 1.0),
        glow: Vec4::new(0.95, 0.30, 0.15, 1.0),
        ufo_chance: 0.18,
        enemy_speed: 1.0,
    },
    Theme {
        name: "Ion Storm",
        sky_top: Vec4::new(0.05, 0.02, 0.10, 1.0),
        sky_bottom: Vec4::new(0.12, 0.05, 0.24, 1.0),
        accent: Vec4::new(0.75, 0.45, 1.00, 1.0),
        glow: Vec4::new(0.55, 0.25, 0.95, 1.0),
        ufo_chance: 0.35,
        enemy_speed: 1.1,
    },
    Theme {
        name: "Viridian Drift",
        sky_top: Vec4::new(0.01, 0.06, 0.04, 1.0),
        sky_bottom: Vec4::new(0.04, 0.14, 0.09, 1.0),
        accent: Vec4::new(0.40, 1.00, 0.60, 1.0),
        glow: Vec4::new(0.20, 0.85, 0.45, 1.0),
        ufo_chance: 0.22,
        enemy_speed: 1.15,
    },
    Theme {
        name: "Pale Expanse",
        sky_top: Vec4::new(0.80, 0.82, 0.88, 1.0),
        sky_bottom: Vec4::new(0.92, 0.93, 0.96, 1.0),
        accent: Vec4::new(0.10, 0.15, 0.30, 1.0),
        glow: Vec4::new(0.25, 0.30, 0.50, 1.0),
        ufo_chance: 0.10,
        enemy_speed: 1.3,
    },
];

/// Full roster, index-stable
pub fn themes() -> &'static [Theme] {
    &THEMES
}

/// Gameplay and palette parameters after crossfade blending
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendedTheme {
    pub sky_top: Vec4,
    pub sky_bottom: Vec4,
    pub accent: Vec4,
    pub glow: Vec4,
    pub ufo_chance: f32,
    pub enemy_speed: f32,
}

/// Crossfade scheduler state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeState {
    pub current: usize,
    /// Already chosen before the fade starts, so it can be previewed
    pub next: usize,
    /// Fade progress in [0, 1], meaningful only while transitioning
    pub blend: f32,
    pub transitioning: bool,
    /// Seconds the current theme has been dominant
    pub hold: f32,
}

impl Default for ThemeState {
    fn default() -> Self {
        Self {
            current: 0,
            next: 1,
            blend: 0.0,
            transitioning: false,
            hold: 0.0,
        }
    }
}

/// One draw, never equal to `current`
fn pick_next(rng: &mut impl Rng, current: usize) -> usize {
    (current + 1 + rng.random_range(0..THEMES.len() - 1)) % THEMES.len()
}

impl ThemeState {
    /// Advance hold/fade timers; commits the fade when blend reaches 1
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        if self.transitioning {
            self.blend += dt / THEME_FADE;
            if self.blend >= 1.0 {
                self.current = self.next;
                self.next = pick_next(rng, self.current);
                self.blend = 0.0;
                self.transitioning = false;
                self.hold = 0.0;
                log::info!("map shift complete: {}", THEMES[self.current].name);
            }
        } else {
            self.hold += dt;
            if self.hold >= THEME_HOLD {
                self.transitioning = true;
                self.blend = 0.0;
                log::debug!(
                    "map shift started: {} -> {}",
                    THEMES[self.current].name,
                    THEMES[self.next].name
                );
            }
        }
    }

    /// Manual map switch: step the current index now, cancel any fade
    pub fn force_step(&mut self, step: i32, rng: &mut impl Rng) {
        let count = THEMES.len() as i32;
        self.current = (self.current as i32 + step).rem_euclid(count) as usize;
        self.next = pick_next(rng, self.current);
        self.blend = 0.0;
        self.transitioning = false;
        self.hold = 0.0;
        log::info!("map forced: {}", THEMES[self.current].name);
    }

    /// 0 outside a transition, fade progress during one
    #[inline]
    pub fn blend_factor(&self) -> f32 {
        if self.transitioning { self.blend.clamp(0.0, 1.0) } else { 0.0 }
    }

    /// Interpolated parameters between current and next
    pub fn blended(&self) -> BlendedTheme {
        let a = &THEMES[self.current];
        let b = &THEMES[self.next];
        let t = self.blend_factor();
        BlendedTheme {
            sky_top: a.sky_top.lerp(b.sky_top, t),
            sky_bottom: a.sky_bottom.lerp(b.sky_bottom, t),
            accent: a.accent.lerp(b.accent, t),
            glow: a.glow.lerp(b.glow, t),
            ufo_chance: lerp(a.ufo_chance, b.ufo_chance, t),
            enemy_speed: lerp(a.enemy_speed, b.enemy_speed, t),
        }
    }

    /// Name of whichever side of the fade currently dominates
    pub fn dominant_name(&self) -> &'static str {
        if self.blend_factor() < 0.5 {
            THEMES[self.current].name
        } else {
            THEMES[self.next].name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_hold_then_transition() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ts = ThemeState::default();
        for _ in 0..349 {
            ts.update(0.1, &mut rng);
        }
        assert!(!ts.transitioning);
        ts.update(0.2, &mut rng);
        assert!(ts.transitioning);
    }

    #[test]
    fn test_commit_lands_on_preselected_next() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut ts = ThemeState::default();
        let expected = ts.next;
        ts.hold = THEME_HOLD;
        ts.update(0.01, &mut rng);
        assert!(ts.transitioning);
        // Run the full fade
        for _ in 0..500 {
            ts.update(0.01, &mut rng);
        }
        assert!(!ts.transitioning);
        assert_eq!(ts.current, expected);
        assert_ne!(ts.next, ts.current);
        assert_eq!(ts.hold, 0.0);
    }

    #[test]
    fn test_force_step_wraps_and_cancels() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ts = ThemeState::default();
        ts.transitioning = true;
        ts.blend = 0.7;
        ts.force_step(-1, &mut rng);
        assert_eq!(ts.current, themes().len() - 1);
        assert!(!ts.transitioning);
        assert_eq!(ts.blend_factor(), 0.0);
        assert_ne!(ts.next, ts.current);
        ts.force_step(1, &mut rng);
        assert_eq!(ts.current, 0);
    }

    #[test]
    fn test_blended_matches_current_when_idle() {
        let ts = ThemeState::default();
        let b = ts.blended();
        let cur = &themes()[0];
        assert_eq!(b.ufo_chance, cur.ufo_chance);
        assert_eq!(b.enemy_speed, cur.enemy_speed);
        assert_eq!(b.accent, cur.accent);
    }

    #[test]
    fn test_dominant_name_flips_mid_fade() {
        let mut ts = ThemeState::default();
        ts.transitioning = true;
        ts.blend = 0.3;
        assert_eq!(ts.dominant_name(), themes()[ts.current].name);
        ts.blend = 0.8;
        assert_eq!(ts.dominant_name(), themes()[ts.next].name);
    }

    #[test]
    fn test_pick_next_never_repeats_current() {
        let mut rng = Pcg32::seed_from_u64(77);
        for current in 0..themes().len() {
            for _ in 0..50 {
                assert_ne!(pick_next(&mut rng, current), current);
            }
        }
    }
}
