//! Enemy production: regular waves, boss arrivals, meteor showers
//!
//! All three run on accumulator timers owned by [`Spawner`]. Regular spawns
//! pace off a session-time difficulty ramp and defer entirely to a live
//! boss; the meteor shower runs on its own idle/active cycle regardless of
//! what else is on the field.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Enemy, EnemyKind, GravityWell, World};
use crate::consts::*;
use crate::dir_or_up;

/// Timer state for every spawn source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spawner {
    /// Regular-enemy accumulator
    pub spawn_acc: f32,
    /// Counts up toward the next boss arrival
    pub boss_timer: f32,
    /// Idle time since the last meteor shower ended
    pub shower_idle: f32,
    /// Remaining shower time; 0 when inactive
    pub shower_left: f32,
    /// Sub-interval accumulator while a shower runs
    pub shower_acc: f32,
}

/// Advance every spawn timer by `dt` and emit whatever comes due.
/// Order: regular wave, then boss, then meteor shower.
pub fn advance(world: &mut World, dt: f32) {
    // Regular enemies. The accumulator keeps draining while a boss holds the
    // field, so no spawn burst lands the moment the boss dies.
    let boss_alive = world.boss_alive();
    let mut interval = (SPAWN_INTERVAL_START - world.elapsed * SPAWN_RAMP).max(SPAWN_INTERVAL_MIN);
    if boss_alive {
        interval *= BOSS_SPAWN_THROTTLE;
    }
    world.spawner.spawn_acc += dt;
    while world.spawner.spawn_acc >= interval {
        world.spawner.spawn_acc -= interval;
        if !boss_alive {
            spawn_regular(world);
        }
    }

    // Boss arrival
    world.spawner.boss_timer += dt;
    if world.spawner.boss_timer >= BOSS_INTERVAL && !world.boss_alive() {
        world.spawner.boss_timer = 0.0;
        spawn_boss(world);
    }

    // Meteor shower
    if world.spawner.shower_left > 0.0 {
        world.spawner.shower_left -= dt;
        world.spawner.shower_acc += dt;
        while world.spawner.shower_acc >= SHOWER_SPAWN_INTERVAL {
            world.spawner.shower_acc -= SHOWER_SPAWN_INTERVAL;
            spawn_meteor(world);
        }
        if world.spawner.shower_left <= 0.0 {
            world.spawner.shower_left = 0.0;
            world.spawner.shower_idle = 0.0;
        }
    } else {
        world.spawner.shower_idle += dt;
        if world.spawner.shower_idle >= SHOWER_IDLE {
            world.spawner.shower_left = SHOWER_DURATION;
            world.spawner.shower_acc = 0.0;
            log::info!("meteor shower inbound");
        }
    }
}

/// Randomized hull outline for the rocky kinds.
/// Always at least 8 vertices with strictly positive radii.
pub fn irregular_radii(rng: &mut impl Rng, base: f32) -> Vec<f32> {
    let base = base.max(4.0);
    let count = rng.random_range(8..=11);
    (0..count)
        .map(|_| (base * rng.random_range(0.72..=1.0)).max(1.0))
        .collect()
}

/// Top-left spawn position putting a box of `size` just outside a random edge
fn edge_spawn_point(world: &mut World, size: Vec2) -> Vec2 {
    let view = world.view;
    match world.rng.random_range(0..4u8) {
        // Top
        0 => Vec2::new(
            world.rng.random_range(0.0..=(view.x - size.x).max(1.0)),
            -size.y - SPAWN_EDGE_OFFSET,
        ),
        // Bottom
        1 => Vec2::new(
            world.rng.random_range(0.0..=(view.x - size.x).max(1.0)),
            view.y + SPAWN_EDGE_OFFSET,
        ),
        // Left
        2 => Vec2::new(
            -size.x - SPAWN_EDGE_OFFSET,
            world.rng.random_range(0.0..=(view.y - size.y).max(1.0)),
        ),
        // Right
        _ => Vec2::new(
            view.x + SPAWN_EDGE_OFFSET,
            world.rng.random_range(0.0..=(view.y - size.y).max(1.0)),
        ),
    }
}

/// One rank-and-file enemy from a random edge, aimed near the ship
pub fn spawn_regular(world: &mut World) {
    let blended = world.theme.blended();
    let is_ufo = world
        .rng
        .random_bool((blended.ufo_chance as f64).clamp(0.0, 1.0));

    let (size, hp, spin, kind) = if is_ufo {
        (Vec2::new(46.0, 26.0), 2.0, 0.0, EnemyKind::Ufo)
    } else {
        let side = world.rng.random_range(26.0..=54.0f32);
        let radii = irregular_radii(&mut world.rng, side * 0.5);
        let hp = world.rng.random_range(2..=3u32) as f32;
        let spin = world.rng.random_range(-1.2..=1.2f32);
        (Vec2::splat(side), hp, spin, EnemyKind::Asteroid { radii })
    };

    let pos = edge_spawn_point(world, size);
    let ship_center = world.ship.center();
    let jitter = Vec2::new(
        world.rng.random_range(-SPAWN_AIM_JITTER..=SPAWN_AIM_JITTER),
        world.rng.random_range(-SPAWN_AIM_JITTER..=SPAWN_AIM_JITTER),
    );
    let dir = dir_or_up(ship_center + jitter - (pos + size * 0.5));
    let speed = world.rng.random_range(70.0..=130.0f32) * blended.enemy_speed;

    world.enemies.push(Enemy {
        pos,
        size,
        vel: dir * speed,
        hp,
        rotation: 0.0,
        spin,
        kind,
    });
}

/// One boss from above the top edge, 50/50 mothership or golem
pub fn spawn_boss(world: &mut World) {
    let blended = world.theme.blended();
    let (size, hp, spin, kind) = if world.rng.random_bool(0.5) {
        (Vec2::new(150.0, 80.0), 50.0, 0.0, EnemyKind::BossUfo)
    } else {
        let radii = irregular_radii(&mut world.rng, 65.0);
        let spin = world.rng.random_range(-0.5..=0.5f32);
        (Vec2::splat(130.0), 60.0, spin, EnemyKind::BossGolem { radii })
    };

    let view = world.view;
    let x = (view.x - size.x) * 0.5 + world.rng.random_range(-120.0..=120.0f32);
    let pos = Vec2::new(x, -size.y - SPAWN_EDGE_OFFSET);
    let dir = dir_or_up(world.ship.center() - (pos + size * 0.5));
    let speed = world.rng.random_range(38.0..=50.0f32) * blended.enemy_speed;

    log::info!(
        "boss inbound: {}",
        match kind {
            EnemyKind::BossUfo => "mothership",
            _ => "golem",
        }
    );

    world.enemies.push(Enemy {
        pos,
        size,
        vel: dir * speed,
        hp,
        rotation: 0.0,
        spin,
        kind,
    });
}

/// One small fast rock falling in from the top during a shower
pub fn spawn_meteor(world: &mut World) {
    let side = world.rng.random_range(14.0..=22.0f32);
    let radii = irregular_radii(&mut world.rng, side * 0.5);
    let x = world.rng.random_range(0.0..=(world.view.x - side).max(1.0));
    let vel = Vec2::new(
        world.rng.random_range(-60.0..=60.0f32),
        world.rng.random_range(260.0..=360.0f32),
    );
    let spin = world.rng.random_range(-3.0..=3.0f32);

    world.enemies.push(Enemy {
        pos: Vec2::new(x, -side - SPAWN_EDGE_OFFSET * 0.5),
        size: Vec2::splat(side),
        vel,
        hp: 1.0,
        rotation: 0.0,
        spin,
        kind: EnemyKind::Asteroid { radii },
    });
}

/// Fresh ambient wells for a new run
pub fn seed_wells(world: &mut World) {
    world.wells.clear();
    for _ in 0..WELL_COUNT {
        let pos = world.random_interior_point(120.0);
        let radius = world.rng.random_range(110.0..=170.0f32);
        let strength = world.rng.random_range(90.0..=150.0f32);
        let angle = world.rng.random_range(0.0..std::f32::consts::TAU);
        let drift = Vec2::from_angle(angle) * world.rng.random_range(8.0..=16.0f32);
        world.wells.push(GravityWell {
            pos,
            radius,
            strength,
            drift,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::aabb::Aabb;
    use crate::sim::state::Mode;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing_world(seed: u64) -> World {
        let mut world = World::new(seed);
        world.reset_run();
        assert_eq!(world.mode, Mode::Playing);
        world
    }

    #[test]
    fn test_irregular_radii_never_degenerate() {
        let mut rng = Pcg32::seed_from_u64(5);
        for base in [-10.0, 0.0, 0.001, 30.0] {
            let radii = irregular_radii(&mut rng, base);
            assert!(radii.len() >= 8);
            assert!(radii.iter().all(|&r| r > 0.0));
        }
    }

    #[test]
    fn test_regular_spawn_starts_outside_and_flies_in() {
        let mut world = playing_world(11);
        for _ in 0..20 {
            spawn_regular(&mut world);
        }
        let viewport = Aabb::new(Vec2::ZERO, world.view);
        for enemy in &world.enemies {
            assert!(!enemy.aabb().overlaps(&viewport), "spawned inside view");
            // Heading carries it toward the playfield
            let to_center = viewport.center() - enemy.center();
            assert!(enemy.vel.dot(to_center) > 0.0);
            assert!(enemy.hp >= 2.0);
        }
    }

    #[test]
    fn test_asteroids_carry_hulls_ufos_do_not() {
        let mut world = playing_world(2);
        for _ in 0..40 {
            spawn_regular(&mut world);
        }
        let mut saw_asteroid = false;
        for enemy in &world.enemies {
            match &enemy.kind {
                EnemyKind::Asteroid { radii } => {
                    saw_asteroid = true;
                    assert!(radii.len() >= 8);
                }
                EnemyKind::Ufo => assert_eq!(enemy.spin, 0.0),
                other => panic!("unexpected kind {other:?}"),
            }
        }
        assert!(saw_asteroid);
    }

    #[test]
    fn test_boss_variants_both_occur() {
        let mut world = playing_world(4);
        let mut ufos = 0;
        let mut golems = 0;
        for _ in 0..40 {
            spawn_boss(&mut world);
        }
        for enemy in &world.enemies {
            match &enemy.kind {
                EnemyKind::BossUfo => {
                    ufos += 1;
                    assert_eq!(enemy.hp, 50.0);
                }
                EnemyKind::BossGolem { radii } => {
                    golems += 1;
                    assert_eq!(enemy.hp, 60.0);
                    assert!(radii.len() >= 8);
                }
                other => panic!("unexpected kind {other:?}"),
            }
        }
        assert!(ufos > 0 && golems > 0);
    }

    #[test]
    fn test_meteors_are_fast_one_hit_rocks() {
        let mut world = playing_world(8);
        for _ in 0..10 {
            spawn_meteor(&mut world);
        }
        for enemy in &world.enemies {
            assert_eq!(enemy.hp, 1.0);
            assert!(enemy.vel.y >= 260.0);
            assert!(enemy.pos.y < 0.0);
            assert!(matches!(enemy.kind, EnemyKind::Asteroid { .. }));
        }
    }

    #[test]
    fn test_boss_timer_fires_at_interval() {
        let mut world = playing_world(13);
        // Keep the shower out of the way
        world.spawner.shower_idle = -1000.0;
        world.spawner.boss_timer = BOSS_INTERVAL - 0.05;
        advance(&mut world, 0.1);
        assert!(world.boss_alive());
        assert_eq!(world.spawner.boss_timer, 0.0);
    }

    #[test]
    fn test_regular_spawns_suppressed_while_boss_alive() {
        let mut world = playing_world(21);
        world.spawner.shower_idle = -1000.0;
        world.spawner.boss_timer = BOSS_INTERVAL;
        advance(&mut world, 0.01);
        assert!(world.boss_alive());
        let count = world.enemies.len();
        // Plenty of accumulator crossings, none of them emit
        for _ in 0..300 {
            advance(&mut world, 0.1);
        }
        assert_eq!(world.enemies.len(), count);
    }

    #[test]
    fn test_shower_cycle() {
        let mut world = playing_world(6);
        // No bosses or themes in the way; showers only need their own timers
        world.spawner.shower_idle = SHOWER_IDLE - 0.05;
        advance(&mut world, 0.1);
        assert!(world.spawner.shower_left > 0.0);
        let before = world.enemies.len();
        advance(&mut world, SHOWER_SPAWN_INTERVAL * 3.0);
        assert!(world.enemies.len() >= before + 3);
    }

    #[test]
    fn test_seed_wells() {
        let mut world = playing_world(30);
        assert_eq!(world.wells.len(), WELL_COUNT);
        for well in &world.wells {
            assert!(well.radius >= 110.0 && well.radius <= 170.0);
            assert!(well.strength > 0.0);
            assert!(well.drift.length() > 0.0);
            assert!(Aabb::new(Vec2::ZERO, world.view).contains(well.pos));
        }
    }
}
