//! Per-frame simulation tick
//!
//! The orchestrator half of the game loop. The host calls [`tick`] once per
//! display refresh with an input snapshot, the drawable size, and the frame
//! delta; everything else in the crate is driven from here. Substep order
//! inside a tick is load-bearing: collision steps see the positions the
//! integration steps just wrote.

use std::f32::consts::TAU;

use glam::{Vec2, Vec4};
use rand::Rng;

use super::aabb::Aabb;
use super::collision::{beam_covers, circle_hits_aabb, within_radius};
use super::spawn;
use super::state::{Beam, Bullet, Effect, Mode, Particle, PowerUp, ScoreOrb, World};
use crate::consts::*;
use crate::{UP, dir_or_up};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement intent; clamped to unit length before use
    pub movement: Vec2,
    /// Aim point in viewport coordinates, if the host knows one
    pub aim: Option<Vec2>,
    /// Fire command (holding is fine, shots are cooldown-gated)
    pub fire: bool,
    /// Start/restart from menu or game over
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Map-switch pulses
    pub map_next: bool,
    pub map_prev: bool,
    /// Display toggles
    pub toggle_hud: bool,
    pub toggle_contrast: bool,
    pub toggle_reduced_motion: bool,
}

/// Advance the world by one frame
pub fn tick(world: &mut World, input: &TickInput, view: Vec2, dt: f32) {
    world.view = view;

    // Display toggles are honored in every mode
    if input.toggle_hud {
        world.settings.show_hud = !world.settings.show_hud;
    }
    if input.toggle_contrast {
        world.settings.high_contrast = !world.settings.high_contrast;
    }
    if input.toggle_reduced_motion {
        world.settings.reduced_motion = !world.settings.reduced_motion;
    }

    match world.mode {
        Mode::Menu | Mode::GameOver => {
            if input.start {
                world.reset_run();
            }
            return;
        }
        Mode::Playing => {}
    }

    // Pause toggle resolves before the freeze check so unpausing works
    if input.pause {
        world.paused = !world.paused;
        log::debug!("paused: {}", world.paused);
    }
    if world.paused {
        return;
    }

    let real_dt = dt.clamp(0.0, MAX_TICK_DT);
    let game_dt = if world.effects.is_active(Effect::SlowMo) {
        real_dt * SLOWMO_SCALE
    } else {
        real_dt
    };
    world.elapsed += game_dt;

    // Ship movement and firing
    ship_update(world, input, game_dt);

    // Map rotation
    if input.map_next {
        world.theme.force_step(1, &mut world.rng);
    }
    if input.map_prev {
        world.theme.force_step(-1, &mut world.rng);
    }
    world.theme.update(game_dt, &mut world.rng);

    // Combo decay
    world.combo.decay(game_dt);

    // Spawners: regular wave, boss, meteor shower
    spawn::advance(world, game_dt);

    // Well drift
    drift_wells(world, game_dt);

    // Enemy integration (well pull, velocity, spin)
    integrate_enemies(world, game_dt);

    // Bullet integration (homing steer)
    integrate_bullets(world, game_dt);

    // Beam damage window
    update_beams(world, game_dt);

    // Bullet impacts
    resolve_bullet_hits(world);

    // Off-screen pruning
    prune_offscreen(world);

    // Score orbs
    update_orbs(world, game_dt);

    // Power-up pickups and expiry
    update_powerups(world, game_dt);

    // Effect countdowns; slow-mo burns on real time
    world.effects.decay(real_dt, game_dt);

    // Particles
    update_particles(world, game_dt);

    // Thruster trail and shake decay
    emit_thrust(world, input, game_dt);
    world.screen_shake *= SHAKE_DECAY;
    if world.screen_shake < 0.01 {
        world.screen_shake = 0.0;
    }

    // Hull contact last; may end the run
    resolve_ship_contact(world);
}

fn ship_update(world: &mut World, input: &TickInput, dt: f32) {
    let movement = input.movement.clamp_length_max(1.0);
    let limit = (world.view - world.ship.size).max(Vec2::ZERO);
    world.ship.pos = (world.ship.pos + movement * world.ship.speed * dt).clamp(Vec2::ZERO, limit);

    world.ship.fire_cooldown = (world.ship.fire_cooldown - dt).max(0.0);
    if input.fire && world.ship.fire_cooldown <= 0.0 {
        world.ship.fire_cooldown = FIRE_COOLDOWN;
        let aim = match input.aim {
            Some(point) => dir_or_up(point - world.ship.center()),
            None => UP,
        };
        fire(world, aim);
    }
}

/// Resolve one trigger pull into bullets or a beam, plus muzzle flash
fn fire(world: &mut World, dir: Vec2) {
    let origin = world.ship.nose(dir);

    if world.effects.is_active(Effect::Laser) {
        world.beams.push(Beam {
            origin,
            dir,
            width: BEAM_WIDTH,
            ttl: BEAM_LIFE,
        });
    } else {
        let homing = world.effects.is_active(Effect::Homing);
        let angles: &[f32] = if world.effects.is_active(Effect::Spread) {
            &[-SPREAD_ANGLE, 0.0, SPREAD_ANGLE]
        } else {
            &[0.0]
        };
        for &angle in angles {
            world.bullets.push(Bullet {
                pos: origin,
                radius: BULLET_RADIUS,
                speed: BULLET_SPEED,
                dir: Vec2::from_angle(angle).rotate(dir),
                homing,
            });
        }
    }

    muzzle_flash(world, origin, dir);
}

fn muzzle_flash(world: &mut World, origin: Vec2, dir: Vec2) {
    for _ in 0..4 {
        let scatter = Vec2::new(
            world.rng.random_range(-40.0..=40.0f32),
            world.rng.random_range(-40.0..=40.0f32),
        );
        let particle = Particle {
            pos: origin,
            vel: dir * world.rng.random_range(120.0..=220.0f32) + scatter,
            age: 0.0,
            life: world.rng.random_range(0.08..=0.16f32),
            size_start: world.rng.random_range(3.0..=5.0f32),
            size_end: 0.5,
            color_start: Vec4::new(1.0, 0.85, 0.4, 1.0),
            color_end: Vec4::new(1.0, 0.45, 0.1, 0.0),
            additive: true,
        };
        world.push_particle(particle);
    }
}

fn drift_wells(world: &mut World, dt: f32) {
    let view = world.view;
    for well in &mut world.wells {
        well.pos += well.drift * dt;
        // Reflect at the margins so wells never wander off
        if well.pos.x < 0.0 || well.pos.x > view.x {
            well.drift.x = -well.drift.x;
        }
        if well.pos.y < 0.0 || well.pos.y > view.y {
            well.drift.y = -well.drift.y;
        }
        well.pos = well.pos.clamp(Vec2::ZERO, view);
    }
}

fn integrate_enemies(world: &mut World, dt: f32) {
    for enemy in &mut world.enemies {
        let center = enemy.pos + enemy.size * 0.5;
        for well in &world.wells {
            let to_well = well.pos - center;
            let dist = to_well.length();
            if dist > 1.0 && dist < well.radius {
                let falloff = 1.0 - dist / well.radius;
                enemy.vel += to_well / dist * well.strength * falloff * dt;
            }
        }
        enemy.pos += enemy.vel * dt;
        enemy.rotation += enemy.spin * dt;
    }
}

fn integrate_bullets(world: &mut World, dt: f32) {
    let homing_active = world.effects.is_active(Effect::Homing);
    let convert_chance = (f64::from(HOMING_CONVERT_RATE) * f64::from(dt)).min(1.0);
    let centers: Vec<Vec2> = world.enemies.iter().map(|e| e.center()).collect();

    for bullet in &mut world.bullets {
        if homing_active && !bullet.homing && world.rng.random_bool(convert_chance) {
            bullet.homing = true;
        }

        if bullet.homing && !centers.is_empty() {
            let nearest = centers.iter().copied().min_by(|a, b| {
                a.distance_squared(bullet.pos)
                    .partial_cmp(&b.distance_squared(bullet.pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            if let Some(target) = nearest {
                let desired = (target - bullet.pos).normalize_or_zero();
                if desired != Vec2::ZERO {
                    let t = (HOMING_TURN_RATE * dt).min(1.0);
                    let steered = bullet.dir.lerp(desired, t).normalize_or_zero();
                    if steered != Vec2::ZERO {
                        bullet.dir = steered;
                    }
                }
            }
        }

        bullet.pos += bullet.dir * bullet.speed * dt;
    }
}

fn update_beams(world: &mut World, dt: f32) {
    for beam in &mut world.beams {
        beam.ttl -= dt;
    }

    // Damage sweep before expired beams drop, so the final partial tick
    // still burns
    for b in 0..world.beams.len() {
        let (origin, dir, width) = {
            let beam = &world.beams[b];
            (beam.origin, beam.dir, beam.width)
        };
        let mut e = 0;
        while e < world.enemies.len() {
            if beam_covers(origin, dir, width, BEAM_BACK_TOLERANCE, world.enemies[e].center()) {
                world.enemies[e].hp -= BEAM_DPS * dt;
                if world.enemies[e].hp <= 0.0 {
                    destroy_enemy(world, e);
                    continue;
                }
            }
            e += 1;
        }
    }

    world.beams.retain(|beam| beam.ttl > 0.0);
}

fn resolve_bullet_hits(world: &mut World) {
    let mut b = 0;
    while b < world.bullets.len() {
        let (pos, radius) = (world.bullets[b].pos, world.bullets[b].radius);
        let mut hit = None;
        for (e, enemy) in world.enemies.iter_mut().enumerate() {
            if circle_hits_aabb(pos, radius, &enemy.aabb()) {
                enemy.hp -= 1.0;
                hit = Some(e);
                break; // one enemy per bullet, then the bullet is spent
            }
        }
        match hit {
            Some(e) => {
                world.bullets.remove(b);
                if world.enemies[e].hp <= 0.0 {
                    destroy_enemy(world, e);
                }
            }
            None => b += 1,
        }
    }
}

/// Remove an enemy, paying out score, orbs, particles, shake, maybe a drop
fn destroy_enemy(world: &mut World, idx: usize) {
    let enemy = world.enemies.remove(idx);
    let center = enemy.pos + enemy.size * 0.5;
    let boss = enemy.is_boss();

    let points = (enemy.kind.score_value() as f32 * world.combo.multiplier) as u64;
    world.score += points;
    world.combo.on_kill();

    let (count, value) = if boss {
        (world.rng.random_range(8..=12u32), ORB_VALUE_BOSS)
    } else {
        (world.rng.random_range(2..=4u32), ORB_VALUE)
    };
    for _ in 0..count {
        let angle = world.rng.random_range(0.0..TAU);
        let speed = world.rng.random_range(40.0..=120.0f32);
        world.orbs.push(ScoreOrb {
            pos: center,
            vel: Vec2::from_angle(angle) * speed,
            value,
            age: 0.0,
        });
    }

    if boss || world.rng.random_bool(POWERUP_DROP_CHANCE) {
        let kind = Effect::ALL[world.rng.random_range(0..Effect::ALL.len())];
        world.powerups.push(PowerUp {
            pos: center,
            radius: POWERUP_RADIUS,
            kind,
            ttl: POWERUP_LIFE,
        });
    }

    explosion(world, center, enemy.size.x.max(enemy.size.y), boss);
    world.add_shake(if boss { 0.8 } else { 0.25 });
    if boss {
        log::info!("boss down, +{points}");
    }
}

fn explosion(world: &mut World, center: Vec2, size: f32, boss: bool) {
    let accent = world.theme.blended().accent;
    let count = if boss {
        42
    } else {
        ((size * 0.45) as usize).clamp(10, 26)
    };
    let boost = if boss { 1.6 } else { 1.0 };

    for _ in 0..count {
        let angle = world.rng.random_range(0.0..TAU);
        let speed = world.rng.random_range(60.0..=260.0f32) * boost;
        let color = if world.rng.random_bool(0.5) {
            Vec4::new(1.0, 0.6, 0.2, 1.0)
        } else {
            accent
        };
        let particle = Particle {
            pos: center,
            vel: Vec2::from_angle(angle) * speed,
            age: 0.0,
            life: world.rng.random_range(0.35..=0.8f32),
            size_start: world.rng.random_range(2.5..=6.0f32) * boost,
            size_end: 0.4,
            color_start: color,
            color_end: Vec4::new(color.x, color.y, color.z, 0.0),
            additive: true,
        };
        world.push_particle(particle);
    }
}

fn prune_offscreen(world: &mut World) {
    let view_rect = Aabb::new(Vec2::ZERO, world.view);
    world
        .bullets
        .retain(|b| view_rect.expand(b.radius).contains(b.pos));
    let margin_rect = view_rect.expand(DESPAWN_MARGIN);
    world.enemies.retain(|e| e.aabb().overlaps(&margin_rect));
}

fn update_orbs(world: &mut World, dt: f32) {
    let ship_center = world.ship.center();
    let magnet = world.effects.is_active(Effect::Magnet);

    for orb in &mut world.orbs {
        if magnet {
            let to_ship = dir_or_up(ship_center - orb.pos);
            orb.vel += to_ship * ORB_MAGNET_ACCEL * dt;
        }
        orb.vel *= ORB_DRAG;
        orb.vel = orb.vel.clamp_length_max(ORB_MAX_SPEED);
        orb.pos += orb.vel * dt;
        orb.age += dt;
    }

    let mut collected = 0u64;
    world.orbs.retain(|orb| {
        if within_radius(orb.pos, ship_center, ORB_PICKUP_RADIUS) {
            collected += u64::from(orb.value);
            false
        } else {
            orb.age <= ORB_LIFE
        }
    });
    if collected > 0 {
        world.score += collected;
    }
}

fn update_powerups(world: &mut World, dt: f32) {
    let ship_center = world.ship.center();
    let mut picked = Vec::new();
    world.powerups.retain_mut(|p| {
        p.ttl -= dt;
        if within_radius(p.pos, ship_center, POWERUP_PICKUP_RADIUS) {
            picked.push((p.kind, p.pos));
            false
        } else {
            p.ttl > 0.0
        }
    });
    for (kind, pos) in picked {
        world.effects.activate(kind);
        log::debug!("power-up: {kind:?}");
        pickup_sparkle(world, pos);
    }
}

fn pickup_sparkle(world: &mut World, pos: Vec2) {
    let glow = world.theme.blended().glow;
    for _ in 0..6 {
        let angle = world.rng.random_range(0.0..TAU);
        let particle = Particle {
            pos,
            vel: Vec2::from_angle(angle) * world.rng.random_range(50.0..=110.0f32),
            age: 0.0,
            life: world.rng.random_range(0.25..=0.5f32),
            size_start: world.rng.random_range(2.0..=3.5f32),
            size_end: 0.3,
            color_start: glow,
            color_end: Vec4::new(glow.x, glow.y, glow.z, 0.0),
            additive: true,
        };
        world.push_particle(particle);
    }
}

fn update_particles(world: &mut World, dt: f32) {
    for particle in &mut world.particles {
        particle.age += dt;
        particle.pos += particle.vel * dt;
        particle.vel *= PARTICLE_DRAG;
    }
    world.particles.retain(|p| p.age <= p.life);
}

fn emit_thrust(world: &mut World, input: &TickInput, dt: f32) {
    let movement = input.movement.clamp_length_max(1.0);
    let moving = movement.length_squared() > 0.01;
    let rate = if moving {
        THRUST_RATE_MOVING
    } else {
        THRUST_RATE_IDLE
    };
    world.thrust_carry += rate * dt;

    let center = world.ship.center();
    let exhaust = if moving {
        -movement.normalize_or_zero()
    } else {
        Vec2::Y
    };

    while world.thrust_carry >= 1.0 {
        world.thrust_carry -= 1.0;
        let jitter = Vec2::new(
            world.rng.random_range(-3.0..=3.0f32),
            world.rng.random_range(-3.0..=3.0f32),
        );
        let particle = Particle {
            pos: center + exhaust * (world.ship.size.y * 0.5) + jitter,
            vel: exhaust * world.rng.random_range(40.0..=90.0f32) + jitter * 6.0,
            age: 0.0,
            life: world.rng.random_range(0.2..=0.45f32),
            size_start: world.rng.random_range(1.5..=3.0f32),
            size_end: 0.3,
            color_start: Vec4::new(0.45, 0.8, 1.0, 0.9),
            color_end: Vec4::new(0.2, 0.4, 1.0, 0.0),
            additive: true,
        };
        world.push_particle(particle);
    }
}

fn resolve_ship_contact(world: &mut World) {
    let mut e = 0;
    while e < world.enemies.len() {
        if world.enemies[e].aabb().overlaps(&world.ship.aabb()) {
            if world.effects.has_shield {
                world.effects.consume_shield();
                world.add_shake(0.35);
                destroy_enemy(world, e);
                continue;
            }
            world.mode = Mode::GameOver;
            world.add_shake(1.0);
            log::info!("run over: score {}", world.score);
            return;
        }
        e += 1;
    }
}
