//! Data-driven game balance
//!
//! Every knob the simulation reads lives here so a run can be rebalanced from
//! a settings file without touching code. Defaults come from [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Ship handling and gun
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub radius: f32,
    /// Thrust gained per second while the thrust input is held (px/s²)
    pub acceleration: f32,
    /// Fraction of thrust shed per second while coasting
    pub friction: f32,
    /// Invisible wait before the ship becomes controllable again
    pub spawn_delay: f32,
    /// How long the explosion plays before the respawn wait starts
    pub explosion_duration: f32,
    pub shoot_delay: f32,
    pub muzzle_offset: f32,
    pub bullet_speed: f32,
    pub bullet_lifetime: f32,
    pub bullet_radius: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: PLAYER_RADIUS,
            acceleration: PLAYER_ACCELERATION,
            friction: PLAYER_FRICTION,
            spawn_delay: PLAYER_SPAWN_DELAY,
            explosion_duration: PLAYER_EXPLOSION_DURATION,
            shoot_delay: PLAYER_SHOOT_DELAY,
            muzzle_offset: PLAYER_MUZZLE_OFFSET,
            bullet_speed: BULLET_SPEED,
            bullet_lifetime: BULLET_LIFETIME,
            bullet_radius: BULLET_RADIUS,
        }
    }
}

/// Asteroid field pacing and rock behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidTuning {
    /// Collision radius of a full-size rock; smaller tiers scale down linearly
    pub radius: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub split_min_factor: f32,
    pub split_max_factor: f32,
    pub spin_rate: f32,
    pub ready_delay: f32,
    pub min_spawn_delay: f32,
    pub max_spawn_delay: f32,
    /// Rocks per wave before the level bonus (`base + level`)
    pub base_count: u32,
}

impl Default for AsteroidTuning {
    fn default() -> Self {
        Self {
            radius: ASTEROID_RADIUS,
            min_speed: ASTEROID_MIN_SPEED,
            max_speed: ASTEROID_MAX_SPEED,
            split_min_factor: ASTEROID_SPLIT_MIN_FACTOR,
            split_max_factor: ASTEROID_SPLIT_MAX_FACTOR,
            spin_rate: ASTEROID_SPIN_RATE,
            ready_delay: ASTEROID_READY_DELAY,
            min_spawn_delay: ASTEROID_MIN_SPAWN_DELAY,
            max_spawn_delay: ASTEROID_MAX_SPAWN_DELAY,
            base_count: ASTEROIDS_PER_WAVE,
        }
    }
}

/// Saucer spawning, flight path and gun
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SaucerTuning {
    pub radius: f32,
    pub speed: f32,
    /// Fire cadence for a saucer of iq 1 (divided by iq)
    pub shoot_delay: f32,
    /// Aim jitter for a saucer of iq 1 (divided by iq)
    pub aim_threshold: f32,
    pub bullet_speed: f32,
    pub bullet_lifetime: f32,
    pub bullet_radius: f32,
    /// Pause folded into every drift phase
    pub move_y_delay: f32,
    pub min_drift: f32,
    pub max_drift: f32,
    pub min_spawn_delay: f32,
    pub max_spawn_delay: f32,
    pub level_gate: u32,
}

impl Default for SaucerTuning {
    fn default() -> Self {
        Self {
            radius: SAUCER_RADIUS,
            speed: SAUCER_SPEED,
            shoot_delay: SAUCER_SHOOT_DELAY,
            aim_threshold: SAUCER_AIM_THRESHOLD,
            bullet_speed: BULLET_SPEED * SAUCER_BULLET_SPEED_FACTOR,
            bullet_lifetime: BULLET_LIFETIME * SAUCER_BULLET_LIFETIME_FACTOR,
            bullet_radius: BULLET_RADIUS,
            move_y_delay: SAUCER_MOVE_Y_DELAY,
            min_drift: SAUCER_MIN_DRIFT,
            max_drift: SAUCER_MAX_DRIFT,
            min_spawn_delay: SAUCER_MIN_SPAWN_DELAY,
            max_spawn_delay: SAUCER_MAX_SPAWN_DELAY,
            level_gate: SAUCER_LEVEL_GATE,
        }
    }
}

/// Ambient beat pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TempoTuning {
    /// Seconds until the beat reaches full tempo
    pub wave_duration: f32,
    /// Seconds of wave progress already counted when a level starts
    pub head_start: f32,
    pub incremental_rate: f32,
    pub quadratic_rate: f32,
    pub initial_interval: f32,
}

impl Default for TempoTuning {
    fn default() -> Self {
        Self {
            wave_duration: WAVE_DURATION,
            head_start: WAVE_HEAD_START,
            incremental_rate: WAVE_INCREMENTAL_RATE,
            quadratic_rate: WAVE_QUADRATIC_RATE,
            initial_interval: WAVE_INITIAL_INTERVAL,
        }
    }
}

/// Complete balance sheet for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub max_lives: u32,
    pub extra_life_interval: u64,
    pub game_over_cooldown: f32,
    pub player: PlayerTuning,
    pub asteroids: AsteroidTuning,
    pub saucer: SaucerTuning,
    pub tempo: TempoTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_lives: MAX_LIVES,
            extra_life_interval: EXTRA_LIFE_INTERVAL,
            game_over_cooldown: GAME_OVER_COOLDOWN,
            player: PlayerTuning::default(),
            asteroids: AsteroidTuning::default(),
            saucer: SaucerTuning::default(),
            tempo: TempoTuning::default(),
        }
    }
}
