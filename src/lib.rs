//! Asteroid Arcade - simulation core for a classic asteroids arcade game
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (entities, weapons, fields, collisions, game state)
//! - `audio`: Named audio cues emitted by the simulation
//! - `tuning`: Data-driven game balance
//! - `settings`: Run settings loaded from JSON

pub mod audio;
pub mod error;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::SettingsError;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Hit points for the ship and the saucer, and the asteroid size tier count
    pub const MAX_LIVES: u32 = 3;

    /// Points per asteroid hit, indexed by `lives - 1`
    pub const ASTEROID_POINTS: [u64; 3] = [100, 50, 20];
    /// Points per saucer kill, indexed by `iq - 1`
    pub const SAUCER_POINTS: [u64; 2] = [200, 1000];

    /// Score needed for each extra ship
    pub const EXTRA_LIFE_INTERVAL: u64 = 10_000;
    /// Seconds the game-over state is held before the next round starts
    pub const GAME_OVER_COOLDOWN: f32 = 3.0;

    /// Ship defaults
    pub const PLAYER_RADIUS: f32 = 32.0;
    pub const PLAYER_ACCELERATION: f32 = 360.0; // px/s²
    pub const PLAYER_FRICTION: f32 = 0.6; // fraction of thrust shed per second
    pub const PLAYER_SPAWN_DELAY: f32 = 1.0;
    pub const PLAYER_EXPLOSION_DURATION: f32 = 1.5;
    pub const PLAYER_SHOOT_DELAY: f32 = 0.2;
    pub const PLAYER_MUZZLE_OFFSET: f32 = 16.0;

    /// Projectile defaults
    pub const BULLET_RADIUS: f32 = 2.0;
    pub const BULLET_SPEED: f32 = 480.0;
    pub const BULLET_LIFETIME: f32 = 1.0;

    /// Asteroid defaults
    pub const ASTEROID_RADIUS: f32 = 50.0;
    pub const ASTEROID_MIN_SPEED: f32 = 33.0;
    pub const ASTEROID_MAX_SPEED: f32 = 117.0;
    /// Split children move at parent speed times a factor in [1 + 0.1, 1.5)
    pub const ASTEROID_SPLIT_MIN_FACTOR: f32 = 1.1;
    pub const ASTEROID_SPLIT_MAX_FACTOR: f32 = 1.5;
    pub const ASTEROID_SPIN_RATE: f32 = 1.047; // rad/s, doubled at most
    pub const ASTEROID_READY_DELAY: f32 = 0.2;
    pub const ASTEROID_MIN_SPAWN_DELAY: f32 = 0.1;
    pub const ASTEROID_MAX_SPAWN_DELAY: f32 = 1.0;
    pub const ASTEROIDS_PER_WAVE: u32 = 1;

    /// Saucer defaults
    pub const SAUCER_RADIUS: f32 = 40.0;
    pub const SAUCER_SPEED: f32 = 144.0;
    pub const SAUCER_SHOOT_DELAY: f32 = 1.0;
    pub const SAUCER_AIM_THRESHOLD: f32 = 128.0;
    pub const SAUCER_BULLET_SPEED_FACTOR: f32 = 0.7;
    pub const SAUCER_BULLET_LIFETIME_FACTOR: f32 = 2.0;
    pub const SAUCER_MOVE_Y_DELAY: f32 = 1.8;
    pub const SAUCER_MIN_DRIFT: f32 = 0.08;
    pub const SAUCER_MAX_DRIFT: f32 = 0.8;
    pub const SAUCER_MIN_SPAWN_DELAY: f32 = 8.0;
    pub const SAUCER_MAX_SPAWN_DELAY: f32 = 48.0;
    /// Saucers appear once the level is above this
    pub const SAUCER_LEVEL_GATE: u32 = 2;

    /// Ambient beat pacing
    pub const WAVE_DURATION: f32 = 120.0;
    pub const WAVE_HEAD_START: f32 = 20.0;
    pub const WAVE_INCREMENTAL_RATE: f32 = 6.0;
    pub const WAVE_QUADRATIC_RATE: f32 = 5.0;
    pub const WAVE_INITIAL_INTERVAL: f32 = 0.1;
}

/// Playfield size in pixels. Origin is the top-left corner, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit direction for a rotation (0 = up the screen, clockwise positive)
#[inline]
pub fn heading_to_direction(rotation: f32) -> Vec2 {
    Vec2::new(rotation.sin(), -rotation.cos())
}

/// Rotation that points along `dir` (inverse of [`heading_to_direction`])
#[inline]
pub fn direction_to_heading(dir: Vec2) -> f32 {
    dir.x.atan2(-dir.y)
}
