//! Saucer field
//!
//! From level 3 on, a saucer crosses the screen every so often. It flies
//! horizontally, drifts up or down on an alternating schedule, and takes
//! jittered shots at the ship. Its `iq` (1 or 2) makes it smaller, faster
//! firing and more accurate.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::wrap_entity;
use super::entity::{Entity, EntityId, EntityIds, PhysicsRecord, sample_range};
use super::events::{ExplosionKind, GameEvent, GameEvents, HitCause, SaucerHitInfo};
use super::weapon::{Weapon, WeaponSpec};
use crate::audio::SoundCue;
use crate::tuning::SaucerTuning;
use crate::{Viewport, direction_to_heading};

/// A live saucer
#[derive(Debug, Clone)]
pub struct Saucer {
    entity: Entity,
    iq: u8,
    weapon: Weapon,
    aim_threshold: f32,
    /// Vertical drift on or off for the current phase
    drifting: bool,
    /// Seconds left in the current drift phase
    phase_remaining: f32,
    /// Vertical direction used by the next drifting phase
    drift_dir: f32,
    /// Length of the next phase beyond the fixed pause
    drift_duration: f32,
}

impl Saucer {
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    pub fn iq(&self) -> u8 {
        self.iq
    }

    pub fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    /// Sprite scale; smarter saucers are smaller
    pub fn scale(&self) -> f32 {
        1.0 / self.iq as f32
    }

    pub fn projectiles(&self) -> impl Iterator<Item = &Entity> {
        self.weapon.projectiles()
    }

    pub fn aim_threshold(&self) -> f32 {
        self.aim_threshold
    }

    fn roll_drift(&mut self, rng: &mut Pcg32, tuning: &SaucerTuning) {
        self.drift_duration = sample_range(rng, tuning.min_drift, tuning.max_drift);
        self.drift_dir = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    }

    fn update_drift(&mut self, dt: f32, rng: &mut Pcg32, tuning: &SaucerTuning) {
        self.phase_remaining -= dt;
        if self.phase_remaining > 0.0 {
            return;
        }

        self.drifting = !self.drifting;
        self.entity.physics.direction.y = if self.drifting { self.drift_dir } else { 0.0 };
        self.phase_remaining = tuning.move_y_delay + self.drift_duration;
        self.roll_drift(rng, tuning);
    }

    /// Hold fire and drop live shots
    pub fn hold_fire(&mut self) {
        self.weapon.stop_firing();
        self.weapon.clear_all();
    }

    fn tick(
        &mut self,
        dt: f32,
        viewport: &Viewport,
        target: Option<Vec2>,
        rng: &mut Pcg32,
        tuning: &SaucerTuning,
    ) {
        self.update_drift(dt, rng, tuning);
        self.entity.tick(dt);
        wrap_entity(&mut self.entity, viewport);

        match target {
            Some(target) => {
                let t = self.aim_threshold;
                let jittered = if t > 0.0 {
                    Vec2::new(
                        rng.random_range(target.x - t..target.x + t),
                        rng.random_range(target.y - t..target.y + t),
                    )
                } else {
                    target
                };
                let look = jittered - self.entity.position;
                if look.length_squared() > f32::EPSILON {
                    self.weapon.set_aim(direction_to_heading(look));
                }
                self.weapon.start_firing();
            }
            None => self.hold_fire(),
        }

        self.weapon.update(dt, self.entity.position, viewport);
    }
}

#[derive(Debug, Clone)]
pub struct SaucerField {
    rng: Pcg32,
    ids: EntityIds,
    saucer: Option<Saucer>,
    tuning: SaucerTuning,
    max_lives: u32,
    level: u32,
    /// Seconds until the next saucer; `None` while no spawn is queued
    spawn_countdown: Option<f32>,
}

impl SaucerField {
    pub fn new(tuning: &SaucerTuning, max_lives: u32, level: u32, rng: Pcg32) -> Self {
        let mut field = Self {
            rng,
            ids: EntityIds::default(),
            saucer: None,
            tuning: tuning.clone(),
            max_lives,
            level,
            spawn_countdown: None,
        };
        field.queue_spawn();
        field
    }

    pub fn saucer(&self) -> Option<&Saucer> {
        self.saucer.as_ref()
    }

    pub fn saucer_mut(&mut self) -> Option<&mut Saucer> {
        self.saucer.as_mut()
    }

    pub fn spawn_countdown(&self) -> Option<f32> {
        self.spawn_countdown
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Restart the spawn timer if the level allows saucers
    pub fn queue_spawn(&mut self) {
        self.spawn_countdown = if self.level > self.tuning.level_gate {
            Some(sample_range(
                &mut self.rng,
                self.tuning.min_spawn_delay,
                self.tuning.max_spawn_delay,
            ))
        } else {
            None
        };
    }

    /// Back to `level` with no saucer
    pub fn reset(&mut self, level: u32, out: &mut Vec<GameEvent>) {
        self.destroy(out);
        self.level = level;
        self.queue_spawn();
    }

    /// Fly the saucer, or count down to the next one.
    ///
    /// `target` is the ship position while it is ready; `None` makes the
    /// saucer hold fire.
    pub fn tick(&mut self, dt: f32, viewport: &Viewport, target: Option<Vec2>, out: &mut Vec<GameEvent>) {
        if let Some(saucer) = self.saucer.as_mut() {
            saucer.tick(dt, viewport, target, &mut self.rng, &self.tuning);
            return;
        }

        if let Some(remaining) = self.spawn_countdown {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.spawn_countdown = None;
                self.spawn(viewport, out);
            } else {
                self.spawn_countdown = Some(remaining);
            }
        }
    }

    /// Launch a saucer from the left or right edge
    pub fn spawn(&mut self, viewport: &Viewport, out: &mut Vec<GameEvent>) -> EntityId {
        let iq: u8 = if self.rng.random_bool(0.5) { 2 } else { 1 };
        let dir_x = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let x = if dir_x > 0.0 { 0.0 } else { viewport.width };
        let y = sample_range(&mut self.rng, viewport.height / 4.0, viewport.height * 0.75);

        let scale = 1.0 / iq as f32;
        let iq_f = iq as f32;
        let physics = PhysicsRecord::new(self.tuning.radius * scale, self.tuning.speed, Vec2::new(dir_x, 0.0));
        let id = self.ids.next_id();
        let entity = Entity::new(id, Vec2::new(x, y), self.max_lives, physics);

        let weapon = Weapon::new(WeaponSpec {
            cadence: self.tuning.shoot_delay / iq_f,
            lifetime: self.tuning.bullet_lifetime,
            speed: self.tuning.bullet_speed,
            muzzle_offset: physics.radius / 2.0,
            radius: self.tuning.bullet_radius,
        });

        let mut saucer = Saucer {
            entity,
            iq,
            weapon,
            aim_threshold: self.tuning.aim_threshold / iq_f,
            drifting: false,
            phase_remaining: self.tuning.move_y_delay,
            drift_dir: 1.0,
            drift_duration: 0.0,
        };
        saucer.roll_drift(&mut self.rng, &self.tuning);
        self.saucer = Some(saucer);

        out.push(GameEvent::Sound(SoundCue::Ufo { iq }));
        out.push(GameEvent::SaucerSpawned { iq });
        log::info!("Saucer spawned (iq {iq}) at ({x:.0}, {y:.0})");
        id
    }

    /// Remove the saucer, silencing it and dropping its shots. No-op when none is live.
    pub fn destroy(&mut self, out: &mut Vec<GameEvent>) -> Option<Saucer> {
        let mut saucer = self.saucer.take()?;
        saucer.hold_fire();
        out.push(GameEvent::StopSound(SoundCue::Ufo { iq: saucer.iq }));
        Some(saucer)
    }

    /// Remove one saucer projectile by id
    pub fn destroy_projectile(&mut self, id: EntityId) -> bool {
        match self.saucer.as_mut() {
            Some(saucer) => saucer.weapon.destroy_one(id),
            None => false,
        }
    }
}

impl GameEvents for SaucerField {
    fn on_saucer_hit(&mut self, _hit: &SaucerHitInfo, out: &mut Vec<GameEvent>) {
        if let Some(saucer) = self.destroy(out) {
            out.push(GameEvent::Explosion {
                position: saucer.entity.position,
                kind: ExplosionKind::Saucer,
            });
            out.push(GameEvent::Sound(SoundCue::Bang { tier: 2 }));
            log::info!("Saucer destroyed (iq {})", saucer.iq);
            self.queue_spawn();
        }
    }

    fn on_player_hit(&mut self, cause: HitCause, _out: &mut Vec<GameEvent>) {
        if let HitCause::SaucerShot(id) = cause {
            self.destroy_projectile(id);
        }
        if let Some(saucer) = self.saucer.as_mut() {
            saucer.hold_fire();
        }
    }

    fn on_level_complete(&mut self, level: u32, _out: &mut Vec<GameEvent>) {
        self.level = level;
        self.queue_spawn();
    }

    fn on_game_over(&mut self, out: &mut Vec<GameEvent>) {
        self.destroy(out);
        self.spawn_countdown = None;
    }
}
