//! Entities and their physics records
//!
//! Every moving thing in the game (ship, rocks, saucer, projectiles) is an
//! [`Entity`]. Kinematics are deliberately simple: velocity is rebuilt from
//! `direction * speed` each tick rather than integrated.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Identity of an entity within its owning collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Monotonic id source, one per owning collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// Per-entity kinematic parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsRecord {
    /// Collision radius, also the screen-wrap margin
    pub radius: f32,
    pub speed: f32,
    /// Heading; not renormalized, small magnitude drift is tolerated
    pub direction: Vec2,
    /// Always `direction * speed`
    pub velocity: Vec2,
}

impl PhysicsRecord {
    pub fn new(radius: f32, speed: f32, direction: Vec2) -> Self {
        Self {
            radius,
            speed,
            direction,
            velocity: direction * speed,
        }
    }

    /// Replace all kinematic parameters and rebuild velocity
    pub fn set_kinematics(&mut self, radius: f32, speed: f32, direction: Vec2) {
        self.radius = radius;
        self.speed = speed;
        self.direction = direction;
        self.refresh_velocity();
    }

    #[inline]
    pub fn refresh_velocity(&mut self) {
        self.velocity = self.direction * self.speed;
    }
}

/// A simulated actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub position: Vec2,
    /// Radians, 0 = facing up the screen
    pub rotation: f32,
    /// Rocks: size tier 1-3. Ship and saucer: hit points.
    pub lives: u32,
    /// Collision checks skip entities that are not ready
    pub ready: bool,
    /// Read by the renderer; hidden entities are also excluded from collisions
    pub visible: bool,
    /// Seconds of spawn protection left
    pub ready_delay: f32,
    /// Spin in radians per second (sign included)
    pub spin: f32,
    pub physics: PhysicsRecord,
}

impl Entity {
    pub fn new(id: EntityId, position: Vec2, lives: u32, physics: PhysicsRecord) -> Self {
        Self {
            id,
            position,
            rotation: 0.0,
            lives,
            ready: true,
            visible: true,
            ready_delay: 0.0,
            spin: 0.0,
            physics,
        }
    }

    /// Start with spawn protection for `seconds`
    pub fn with_ready_delay(mut self, seconds: f32) -> Self {
        self.ready_delay = seconds;
        self.ready = seconds <= 0.0;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sample a spin rate in `[base, 2 * base)` with a random sign
    pub fn with_random_spin(mut self, base: f32, rng: &mut impl Rng) -> Self {
        let rate = if base > 0.0 {
            rng.random_range(base..base * 2.0)
        } else {
            0.0
        };
        let sign = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
        self.spin = rate * sign;
        self
    }

    /// Count down spawn protection
    pub fn advance_readiness(&mut self, dt: f32) {
        if !self.ready {
            self.ready_delay -= dt;
            if self.ready_delay <= 0.0 {
                self.ready_delay = 0.0;
                self.ready = true;
            }
        }
    }

    /// Free-flight update: readiness, velocity rebuild, move, spin
    pub fn tick(&mut self, dt: f32) {
        self.advance_readiness(dt);
        self.physics.refresh_velocity();
        self.position += self.physics.velocity * dt;
        self.rotation += self.spin * dt;
    }

    /// Ready and visible, i.e. eligible for collision checks
    #[inline]
    pub fn is_collidable(&self) -> bool {
        self.ready && self.visible
    }
}

/// Sample `[min, max)`, falling back to `min` for an empty range
pub(crate) fn sample_range(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}
