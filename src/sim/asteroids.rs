//! Asteroid field
//!
//! Owns the live rocks of the current wave. Rocks trickle in from the screen
//! edges on a randomized countdown until the wave's spawn target is met. A
//! hit on a rock bigger than the smallest tier replaces it with two smaller
//! rocks flying off in a V at ±45° from the parent's heading.

use std::f32::consts::{FRAC_PI_4, TAU};

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::wrap_entity;
use super::entity::{Entity, EntityId, EntityIds, PhysicsRecord, sample_range};
use super::events::{AsteroidHitInfo, ExplosionKind, GameEvent, GameEvents};
use crate::audio::SoundCue;
use crate::tuning::AsteroidTuning;
use crate::{Viewport, direction_to_heading, heading_to_direction};

#[derive(Debug, Clone)]
pub struct AsteroidField {
    rng: Pcg32,
    ids: EntityIds,
    asteroids: Vec<Entity>,
    tuning: AsteroidTuning,
    max_lives: u32,
    level: u32,
    /// Rocks spawned so far this wave (children of splits don't count)
    spawned: u32,
    /// Rocks to spawn this wave
    target: u32,
    /// Seconds until the next spawn
    spawn_countdown: f32,
}

impl AsteroidField {
    pub fn new(tuning: &AsteroidTuning, max_lives: u32, level: u32, rng: Pcg32) -> Self {
        let mut field = Self {
            rng,
            ids: EntityIds::default(),
            asteroids: Vec::new(),
            tuning: tuning.clone(),
            max_lives: max_lives.max(1),
            level,
            spawned: 0,
            target: 0,
            spawn_countdown: 0.0,
        };
        field.reset(level);
        field
    }

    /// Start a fresh wave for `level`
    pub fn reset(&mut self, level: u32) {
        self.asteroids.clear();
        self.level = level;
        self.spawned = 0;
        self.target = self.tuning.base_count + level;
        self.spawn_countdown = self.draw_spawn_delay();
    }

    pub fn asteroids(&self) -> &[Entity] {
        &self.asteroids
    }

    pub fn asteroids_mut(&mut self) -> &mut [Entity] {
        &mut self.asteroids
    }

    pub fn len(&self) -> usize {
        self.asteroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asteroids.is_empty()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    /// Every rock of the wave has spawned and none is left
    pub fn wave_complete(&self) -> bool {
        self.spawned >= self.target && self.asteroids.is_empty()
    }

    /// Collision radius for a tier
    pub fn radius_for(&self, lives: u32) -> f32 {
        self.tuning.radius * lives as f32 / self.max_lives as f32
    }

    fn draw_spawn_delay(&mut self) -> f32 {
        sample_range(
            &mut self.rng,
            self.tuning.min_spawn_delay,
            self.tuning.max_spawn_delay,
        )
    }

    /// Move every rock and run the spawn countdown while `spawning` is on
    pub fn tick(&mut self, dt: f32, viewport: &Viewport, spawning: bool) {
        for asteroid in &mut self.asteroids {
            asteroid.tick(dt);
            wrap_entity(asteroid, viewport);
        }

        if spawning && self.spawned < self.target {
            self.spawn_countdown -= dt;
            if self.spawn_countdown <= 0.0 {
                self.spawn(viewport);
                self.spawn_countdown = self.draw_spawn_delay();
            }
        }
    }

    /// Spawn a full-size rock on a random screen edge
    pub fn spawn(&mut self, viewport: &Viewport) -> EntityId {
        let along: f32 = self.rng.random();
        let position = match self.rng.random_range(0..4u8) {
            0 => Vec2::new(along * viewport.width, 0.0),
            1 => Vec2::new(viewport.width, along * viewport.height),
            2 => Vec2::new(along * viewport.width, viewport.height),
            _ => Vec2::new(0.0, along * viewport.height),
        };
        let heading = self.rng.random_range(0.0..TAU);
        let speed = sample_range(&mut self.rng, self.tuning.min_speed, self.tuning.max_speed);

        let lives = self.max_lives;
        let physics = PhysicsRecord::new(self.radius_for(lives), speed, heading_to_direction(heading));
        let id = self.ids.next_id();
        let asteroid = Entity::new(id, position, lives, physics)
            .with_rotation(heading)
            .with_ready_delay(self.tuning.ready_delay)
            .with_random_spin(self.tuning.spin_rate, &mut self.rng);

        self.asteroids.push(asteroid);
        self.spawned += 1;
        log::debug!(
            "Asteroid {} spawned ({}/{}) at {:?}",
            id.0,
            self.spawned,
            self.target,
            position
        );
        id
    }

    /// Two children one tier down, headed ±45° off the parent's velocity
    pub fn split(&mut self, parent: &Entity) -> [Entity; 2] {
        let lives = parent.lives.saturating_sub(1);
        let heading_source = if parent.physics.velocity.length_squared() > 0.0 {
            parent.physics.velocity
        } else {
            parent.physics.direction
        };
        let heading = direction_to_heading(heading_source);
        let radius = self.radius_for(lives);

        [FRAC_PI_4, -FRAC_PI_4].map(|offset| {
            let factor = sample_range(
                &mut self.rng,
                self.tuning.split_min_factor,
                self.tuning.split_max_factor,
            );
            let child_heading = heading + offset;
            let physics = PhysicsRecord::new(
                radius,
                parent.physics.speed * factor,
                heading_to_direction(child_heading),
            );
            Entity::new(self.ids.next_id(), parent.position, lives, physics)
                .with_rotation(child_heading)
                .with_ready_delay(self.tuning.ready_delay)
                .with_random_spin(self.tuning.spin_rate, &mut self.rng)
        })
    }

    /// Remove a rock after a hit, splitting it when it has tiers left.
    ///
    /// Returns the removed rock, or `None` if the id is no longer live.
    pub fn destroy(&mut self, id: EntityId, out: &mut Vec<GameEvent>) -> Option<Entity> {
        let index = self.asteroids.iter().position(|a| a.id == id)?;
        let parent = self.asteroids.remove(index);

        out.push(GameEvent::Sound(SoundCue::Bang {
            tier: parent.lives.saturating_sub(1) as u8,
        }));
        out.push(GameEvent::Explosion {
            position: parent.position,
            kind: ExplosionKind::Asteroid,
        });

        if parent.lives > 1 {
            let children = self.split(&parent);
            self.asteroids.extend(children);
        }
        Some(parent)
    }

    /// Drop every rock without touching the wave counters
    pub fn clear(&mut self) {
        self.asteroids.clear();
    }
}

impl GameEvents for AsteroidField {
    fn on_asteroid_hit(&mut self, hit: &AsteroidHitInfo, out: &mut Vec<GameEvent>) {
        if self.destroy(hit.asteroid, out).is_none() {
            log::warn!("Asteroid {} already gone", hit.asteroid.0);
        }
    }

    fn on_level_complete(&mut self, level: u32, _out: &mut Vec<GameEvent>) {
        self.reset(level);
    }

    fn on_game_over(&mut self, _out: &mut Vec<GameEvent>) {
        self.asteroids.clear();
        self.spawned = 0;
    }
}
