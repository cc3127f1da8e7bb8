//! Simulation state and core entity types
//!
//! Everything the renderer snapshots between ticks lives here. All gameplay
//! randomness flows through the world-owned generator so a run is
//! reproducible from its seed.

use glam::{Vec2, Vec4};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::spawn::{self, Spawner};
use super::theme::ThemeState;
use crate::consts::*;
use crate::lerp;
use crate::settings::Settings;

/// Session mode; pause is tracked separately and never changes the mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Idle, waiting for the start command
    #[default]
    Menu,
    /// Simulation active
    Playing,
    /// Run ended, waiting for the restart command
    GameOver,
}

/// The six timed status effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Shield,
    SlowMo,
    Magnet,
    Homing,
    Spread,
    Laser,
}

impl Effect {
    pub const ALL: [Effect; 6] = [
        Effect::Shield,
        Effect::SlowMo,
        Effect::Magnet,
        Effect::Homing,
        Effect::Spread,
        Effect::Laser,
    ];

    /// Countdown granted on pickup
    pub fn duration(self) -> f32 {
        match self {
            Effect::Shield => 8.0,
            Effect::SlowMo => 6.0,
            Effect::Magnet => 10.0,
            Effect::Homing => 10.0,
            Effect::Spread => 10.0,
            Effect::Laser => 6.0,
        }
    }
}

/// One countdown slot per effect kind, decremented uniformly
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Effects {
    remaining: [f32; 6],
    /// True while an unspent shield is held
    pub has_shield: bool,
}

impl Effects {
    #[inline]
    pub fn is_active(&self, effect: Effect) -> bool {
        self.remaining[effect as usize] > 0.0
    }

    #[inline]
    pub fn remaining(&self, effect: Effect) -> f32 {
        self.remaining[effect as usize]
    }

    /// Pickup: the countdown resets to the full duration, it never stacks
    pub fn activate(&mut self, effect: Effect) {
        self.remaining[effect as usize] = effect.duration();
        if effect == Effect::Shield {
            self.has_shield = true;
        }
    }

    /// Spend the shield early (it absorbed a hit)
    pub fn consume_shield(&mut self) {
        self.remaining[Effect::Shield as usize] = 0.0;
        self.has_shield = false;
    }

    /// Count down; slow-mo runs on real time, the rest on game time
    pub fn decay(&mut self, real_dt: f32, game_dt: f32) {
        for effect in Effect::ALL {
            let dt = if effect == Effect::SlowMo { real_dt } else { game_dt };
            let slot = &mut self.remaining[effect as usize];
            *slot = (*slot - dt).max(0.0);
        }
        if !self.is_active(Effect::Shield) {
            self.has_shield = false;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Score multiplier that builds on kills and bleeds back toward 1 when idle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combo {
    pub multiplier: f32,
    /// Seconds since the last kill
    pub idle: f32,
}

impl Default for Combo {
    fn default() -> Self {
        Self { multiplier: 1.0, idle: 0.0 }
    }
}

impl Combo {
    pub fn on_kill(&mut self) {
        self.idle = 0.0;
        self.multiplier = (self.multiplier + COMBO_STEP).min(COMBO_MAX);
    }

    pub fn decay(&mut self, dt: f32) {
        self.idle += dt;
        if self.idle > COMBO_IDLE {
            self.multiplier = (self.multiplier - COMBO_DECAY_RATE * dt).max(1.0);
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    /// Top-left corner in viewport space
    pub pos: Vec2,
    pub size: Vec2,
    /// Movement speed in units/sec
    pub speed: f32,
    /// Seconds until the next shot is allowed
    pub fire_cooldown: f32,
}

impl Default for Ship {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::splat(SHIP_SIZE),
            speed: SHIP_SPEED,
            fire_cooldown: 0.0,
        }
    }
}

impl Ship {
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Muzzle position for a given (normalized) aim direction
    pub fn nose(&self, dir: Vec2) -> Vec2 {
        self.center() + dir * (self.size.x * SHIP_NOSE_OFFSET)
    }
}

/// A projectile fired by the ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    /// Center position
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    /// Normalized heading
    pub dir: Vec2,
    /// Homing bullets steer toward the nearest enemy each tick
    pub homing: bool,
}

/// Enemy variants; only the rocky kinds carry an irregular hull outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    Asteroid { radii: Vec<f32> },
    Ufo,
    BossUfo,
    BossGolem { radii: Vec<f32> },
}

impl EnemyKind {
    pub fn is_boss(&self) -> bool {
        matches!(self, EnemyKind::BossUfo | EnemyKind::BossGolem { .. })
    }

    /// Base score before the combo multiplier
    pub fn score_value(&self) -> u32 {
        match self {
            EnemyKind::Asteroid { .. } => 15,
            EnemyKind::Ufo => 25,
            EnemyKind::BossUfo => 150,
            EnemyKind::BossGolem { .. } => 200,
        }
    }
}

/// A hostile entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Top-left corner in viewport space
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Drops to 0 through bullet hits (−1 each) or beam damage (continuous)
    pub hp: f32,
    pub rotation: f32,
    /// Radians/sec added to rotation each tick
    pub spin: f32,
    pub kind: EnemyKind,
}

impl Enemy {
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn is_boss(&self) -> bool {
        self.kind.is_boss()
    }
}

/// A cosmetic spark; never affects gameplay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub age: f32,
    /// Lifetime in seconds; pruned when age passes this
    pub life: f32,
    pub size_start: f32,
    pub size_end: f32,
    /// RGBA, linearly blended over the particle's life
    pub color_start: Vec4,
    pub color_end: Vec4,
    /// Additive-blend hint for the renderer
    pub additive: bool,
}

impl Particle {
    #[inline]
    fn t(&self) -> f32 {
        if self.life > 0.0 {
            (self.age / self.life).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Current render size
    pub fn size(&self) -> f32 {
        lerp(self.size_start, self.size_end, self.t())
    }

    /// Current render color
    pub fn color(&self) -> Vec4 {
        self.color_start.lerp(self.color_end, self.t())
    }
}

/// A floating pickup granting one timed effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    /// Center position
    pub pos: Vec2,
    pub radius: f32,
    pub kind: Effect,
    /// Seconds until it blinks out uncollected
    pub ttl: f32,
}

/// Score debris scattered by a kill, collected by flying near it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreOrb {
    pub pos: Vec2,
    pub vel: Vec2,
    pub value: u32,
    pub age: f32,
}

/// Ambient hazard that pulls enemies toward it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GravityWell {
    pub pos: Vec2,
    /// Influence radius; pull fades linearly to zero at the rim
    pub radius: f32,
    /// Peak acceleration at the center, units/sec²
    pub strength: f32,
    pub drift: Vec2,
}

/// Transient laser damage volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beam {
    pub origin: Vec2,
    /// Normalized heading
    pub dir: Vec2,
    pub width: f32,
    pub ttl: f32,
}

fn detached_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete simulation state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Live generator; call [`World::reseed`] after deserializing a snapshot
    #[serde(skip, default = "detached_rng")]
    pub rng: Pcg32,
    pub mode: Mode,
    /// Freezes the playing update entirely without leaving `Playing`
    pub paused: bool,
    /// Viewport size the host supplied on the most recent tick
    pub view: Vec2,
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    /// Cosmetic only, so snapshots skip it
    #[serde(skip)]
    pub particles: Vec<Particle>,
    pub powerups: Vec<PowerUp>,
    pub orbs: Vec<ScoreOrb>,
    pub wells: Vec<GravityWell>,
    pub beams: Vec<Beam>,
    pub effects: Effects,
    pub combo: Combo,
    pub theme: ThemeState,
    pub spawner: Spawner,
    pub settings: Settings,
    pub score: u64,
    /// Seconds of gameplay this run; drives the difficulty ramp
    pub elapsed: f32,
    /// Raw shake magnitude in [0, 1]; renderer scales it via settings
    pub screen_shake: f32,
    /// Fractional carry for thruster particle emission
    pub thrust_carry: f32,
}

impl World {
    /// Fresh world in menu mode with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            mode: Mode::Menu,
            paused: false,
            view: Vec2::new(960.0, 540.0),
            ship: Ship::default(),
            bullets: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
            powerups: Vec::new(),
            orbs: Vec::new(),
            wells: Vec::new(),
            beams: Vec::new(),
            effects: Effects::default(),
            combo: Combo::default(),
            theme: ThemeState::default(),
            spawner: Spawner::default(),
            settings: Settings::default(),
            score: 0,
            elapsed: 0.0,
            screen_shake: 0.0,
            thrust_carry: 0.0,
        }
    }

    /// Restore the generator from the stored seed (after deserialization)
    pub fn reseed(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
    }

    /// Start or restart a run: center the ship, clear every population,
    /// rewind all timers, seed fresh gravity wells
    pub fn reset_run(&mut self) {
        self.ship = Ship::default();
        self.ship.pos = ((self.view - self.ship.size) * 0.5).max(Vec2::ZERO);
        self.bullets.clear();
        self.enemies.clear();
        self.particles.clear();
        self.powerups.clear();
        self.orbs.clear();
        self.beams.clear();
        self.effects.clear();
        self.combo = Combo::default();
        self.theme = ThemeState::default();
        self.spawner = Spawner::default();
        self.score = 0;
        self.elapsed = 0.0;
        self.screen_shake = 0.0;
        self.thrust_carry = 0.0;
        self.paused = false;
        spawn::seed_wells(self);
        self.mode = Mode::Playing;
        log::info!("run started (seed {})", self.seed);
    }

    /// True while any boss variant is on the field
    pub fn boss_alive(&self) -> bool {
        self.enemies.iter().any(|e| e.is_boss())
    }

    /// Push a particle, evicting the oldest once over the cap
    pub fn push_particle(&mut self, particle: Particle) {
        if self.particles.len() >= MAX_PARTICLES {
            self.particles.remove(0);
        }
        self.particles.push(particle);
    }

    /// Add screen shake, capped at full amplitude
    pub fn add_shake(&mut self, amount: f32) {
        self.screen_shake = (self.screen_shake + amount).min(1.0);
    }

    /// Shake amplitude after the user's settings are applied
    pub fn shake_amplitude(&self) -> f32 {
        self.screen_shake * self.settings.effective_screen_shake()
    }

    /// Random point inside the viewport, inset from the edges
    pub fn random_interior_point(&mut self, inset: f32) -> Vec2 {
        let max = (self.view - Vec2::splat(inset)).max(Vec2::splat(inset));
        Vec2::new(
            self.rng.random_range(inset..=max.x.max(inset + 1.0)),
            self.rng.random_range(inset..=max.y.max(inset + 1.0)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_activation_resets_never_stacks() {
        let mut effects = Effects::default();
        effects.activate(Effect::Shield);
        assert!((effects.remaining(Effect::Shield) - 8.0).abs() < 1e-6);
        effects.decay(3.0, 3.0);
        effects.activate(Effect::Shield);
        // Back to the full 8s, not 8 + 5
        assert!((effects.remaining(Effect::Shield) - 8.0).abs() < 1e-6);
        assert!(effects.has_shield);
    }

    #[test]
    fn test_effect_decay_clamps_at_zero() {
        let mut effects = Effects::default();
        effects.activate(Effect::Laser);
        effects.decay(100.0, 100.0);
        assert_eq!(effects.remaining(Effect::Laser), 0.0);
        assert!(!effects.is_active(Effect::Laser));
    }

    #[test]
    fn test_shield_flag_clears_when_timer_expires() {
        let mut effects = Effects::default();
        effects.activate(Effect::Shield);
        assert!(effects.has_shield);
        effects.decay(8.5, 8.5);
        assert!(!effects.has_shield);
    }

    #[test]
    fn test_slowmo_decays_on_real_time() {
        let mut effects = Effects::default();
        effects.activate(Effect::SlowMo);
        effects.activate(Effect::Magnet);
        // Real dt 1.0, game dt 0.6
        effects.decay(1.0, 0.6);
        assert!((effects.remaining(Effect::SlowMo) - 5.0).abs() < 1e-5);
        assert!((effects.remaining(Effect::Magnet) - 9.4).abs() < 1e-5);
    }

    #[test]
    fn test_combo_caps_and_floors() {
        let mut combo = Combo::default();
        for _ in 0..100 {
            combo.on_kill();
        }
        assert_eq!(combo.multiplier, 5.0);
        for _ in 0..10_000 {
            combo.decay(0.1);
        }
        assert_eq!(combo.multiplier, 1.0);
    }

    #[test]
    fn test_combo_holds_during_grace_window() {
        let mut combo = Combo::default();
        combo.on_kill();
        let before = combo.multiplier;
        combo.decay(2.0);
        assert_eq!(combo.multiplier, before);
        combo.decay(1.0);
        assert!(combo.multiplier < before);
    }

    #[test]
    fn test_particle_interpolation() {
        let p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            age: 0.5,
            life: 1.0,
            size_start: 10.0,
            size_end: 0.0,
            color_start: Vec4::new(1.0, 1.0, 1.0, 1.0),
            color_end: Vec4::new(1.0, 1.0, 1.0, 0.0),
            additive: true,
        };
        assert!((p.size() - 5.0).abs() < 1e-6);
        assert!((p.color().w - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_world_snapshot_round_trip() {
        let world = World::new(7);
        let json = serde_json::to_string(&world).unwrap();
        let mut restored: World = serde_json::from_str(&json).unwrap();
        restored.reseed();
        assert_eq!(restored.seed, 7);
        assert_eq!(restored.mode, Mode::Menu);
        assert_eq!(restored.score, world.score);
        // Reseeded generator matches a fresh one
        let mut a = restored.rng;
        let mut b = World::new(7).rng;
        assert_eq!(a.random::<u64>(), b.random::<u64>());
    }

    #[test]
    fn test_boss_detection() {
        let mut world = World::new(1);
        assert!(!world.boss_alive());
        world.enemies.push(Enemy {
            pos: Vec2::ZERO,
            size: Vec2::splat(150.0),
            vel: Vec2::ZERO,
            hp: 50.0,
            rotation: 0.0,
            spin: 0.0,
            kind: EnemyKind::BossUfo,
        });
        assert!(world.boss_alive());
    }

    #[test]
    fn test_particle_cap_evicts_oldest() {
        let mut world = World::new(1);
        for i in 0..(MAX_PARTICLES + 10) {
            world.push_particle(Particle {
                pos: Vec2::splat(i as f32),
                vel: Vec2::ZERO,
                age: 0.0,
                life: 1.0,
                size_start: 1.0,
                size_end: 0.0,
                color_start: Vec4::ONE,
                color_end: Vec4::ZERO,
                additive: false,
            });
        }
        assert_eq!(world.particles.len(), MAX_PARTICLES);
        // The first ten were evicted
        assert_eq!(world.particles[0].pos, Vec2::splat(10.0));
    }
}
