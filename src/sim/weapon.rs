//! Projectile weapon
//!
//! A weapon owns a cadence timer and the queue of its live projectiles. It
//! does not care who wields it: the ship and the saucer both carry one and
//! feed it an origin and an aim angle each tick.
//!
//! Timing is accumulator based. While firing, a shot is due immediately and
//! then every `cadence` seconds. Each projectile carries its own age and
//! expires individually, so removing one out of order (a hit) never shifts
//! the expiry of the others.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::wrap_entity;
use super::entity::{Entity, EntityId, EntityIds, PhysicsRecord};
use crate::{Viewport, heading_to_direction};

/// Slack for float drift when comparing accumulated time against the cadence
const TIME_EPSILON: f32 = 1e-4;
/// Floor on the cadence so a bad config can't spin the spawn loop
const MIN_CADENCE: f32 = 1e-3;

/// Static weapon parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    /// Seconds between shots while firing
    pub cadence: f32,
    /// Seconds a projectile lives
    pub lifetime: f32,
    /// Projectile speed in px/s
    pub speed: f32,
    /// Spawn distance from the wielder along the aim
    pub muzzle_offset: f32,
    /// Projectile collision radius
    pub radius: f32,
}

/// A live projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub entity: Entity,
    /// Seconds since spawn
    pub age: f32,
}

/// What a single [`Weapon::update`] did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VolleyReport {
    pub fired: u32,
    pub expired: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    spec: WeaponSpec,
    firing: bool,
    /// Seconds until the next shot; `None` while the cadence timer is off
    next_shot_in: Option<f32>,
    /// Aim used for the next spawn (radians)
    aim: f32,
    /// Spawn order, oldest first
    projectiles: VecDeque<Projectile>,
    ids: EntityIds,
}

impl Weapon {
    pub fn new(spec: WeaponSpec) -> Self {
        Self {
            spec,
            firing: false,
            next_shot_in: None,
            aim: 0.0,
            projectiles: VecDeque::new(),
            ids: EntityIds::default(),
        }
    }

    pub fn spec(&self) -> &WeaponSpec {
        &self.spec
    }

    pub fn is_firing(&self) -> bool {
        self.firing
    }

    /// Begin firing. Idempotent: an already running cadence is left alone.
    pub fn start_firing(&mut self) {
        if self.firing {
            return;
        }
        self.firing = true;
        self.next_shot_in = Some(0.0);
    }

    /// Stop firing and cancel the cadence timer. Live projectiles stay.
    pub fn stop_firing(&mut self) {
        self.firing = false;
        self.next_shot_in = None;
    }

    pub fn set_firing(&mut self, firing: bool) {
        if firing {
            self.start_firing();
        } else {
            self.stop_firing();
        }
    }

    /// Aim for future spawns; projectiles already in flight keep their heading
    pub fn set_aim(&mut self, rotation: f32) {
        self.aim = rotation;
    }

    pub fn aim(&self) -> f32 {
        self.aim
    }

    pub fn projectiles(&self) -> impl Iterator<Item = &Entity> {
        self.projectiles.iter().map(|p| &p.entity)
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    /// Remove one projectile by id. Unknown ids are a no-op returning false.
    pub fn destroy_one(&mut self, id: EntityId) -> bool {
        match self.projectiles.iter().position(|p| p.entity.id == id) {
            Some(index) => {
                self.projectiles.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop every live projectile
    pub fn clear_all(&mut self) {
        self.projectiles.clear();
    }

    /// Advance live projectiles, retire expired ones, then fire whatever the
    /// cadence says is due.
    pub fn update(&mut self, dt: f32, origin: Vec2, viewport: &Viewport) -> VolleyReport {
        let mut report = VolleyReport::default();

        for projectile in self.projectiles.iter_mut() {
            projectile.entity.tick(dt);
            projectile.age += dt;
            wrap_entity(&mut projectile.entity, viewport);
        }

        let lifetime = self.spec.lifetime;
        let before = self.projectiles.len();
        self.projectiles.retain(|p| p.age < lifetime);
        report.expired = (before - self.projectiles.len()) as u32;

        if self.firing {
            let cadence = self.spec.cadence.max(MIN_CADENCE);
            let mut until_next = self.next_shot_in.unwrap_or(0.0) - dt;
            while until_next <= TIME_EPSILON {
                // A shot that fell due partway through the tick has already aged
                self.spawn(origin, (-until_next).max(0.0), viewport);
                report.fired += 1;
                until_next += cadence;
            }
            self.next_shot_in = Some(until_next);
        }

        report
    }

    fn spawn(&mut self, origin: Vec2, age: f32, viewport: &Viewport) {
        let direction = heading_to_direction(self.aim);
        let physics = PhysicsRecord::new(self.spec.radius, self.spec.speed, direction);
        let mut entity = Entity::new(
            self.ids.next_id(),
            origin + direction * self.spec.muzzle_offset,
            1,
            physics,
        )
        .with_rotation(self.aim);
        // The muzzle can poke past the edge when the wielder sits on it
        wrap_entity(&mut entity, viewport);
        self.projectiles.push_back(Projectile { entity, age });
    }
}
