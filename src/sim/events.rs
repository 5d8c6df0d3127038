//! Game events
//!
//! Two flows live here. [`GameEvent`]s leave the simulation through the return
//! value of `tick` and feed the audio, effects and HUD collaborators.
//! [`Notification`]s stay inside: the orchestrator fans each one out to its
//! subsystems through the [`GameEvents`] capability trait.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use crate::audio::SoundCue;

/// Which explosion visual to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionKind {
    Asteroid,
    Saucer,
    Ship,
}

/// Event emitted to external collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Start a sound cue
    Sound(SoundCue),
    /// Stop a looping sound cue
    StopSound(SoundCue),
    /// Fire-and-forget explosion visual
    Explosion { position: Vec2, kind: ExplosionKind },
    /// A rock was shot and removed; `tier` is its size before the hit and
    /// `split` tells whether two children replaced it
    AsteroidDestroyed {
        tier: u32,
        points: u64,
        position: Vec2,
        split: bool,
    },
    SaucerSpawned { iq: u8 },
    SaucerDestroyed { iq: u8, points: u64 },
    PlayerHit { lives_left: u32 },
    ExtraLife { lives: u32 },
    ScoreChanged { score: u64 },
    LevelComplete { level: u32 },
    GameOver { final_score: u64, level: u32 },
    /// Game-over hold elapsed; spawning resumes
    RoundResumed,
}

/// A player projectile struck a rock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsteroidHitInfo {
    pub asteroid: EntityId,
    pub projectile: EntityId,
    /// Rock tier before the hit
    pub lives: u32,
    pub position: Vec2,
    pub points: u64,
}

/// A player projectile struck the saucer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaucerHitInfo {
    pub projectile: EntityId,
    pub iq: u8,
    pub position: Vec2,
    pub points: u64,
}

/// What struck the ship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitCause {
    Asteroid(EntityId),
    SaucerShot(EntityId),
    SaucerBody,
}

/// Internal notification fanned out by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification {
    AsteroidHit(AsteroidHitInfo),
    SaucerHit(SaucerHitInfo),
    PlayerHit(HitCause),
    LevelComplete { level: u32 },
    GameOver,
}

/// Capability interface implemented by each subsystem.
///
/// Every hook defaults to a no-op so a subsystem only spells out the
/// notifications it reacts to.
pub trait GameEvents {
    fn on_asteroid_hit(&mut self, _hit: &AsteroidHitInfo, _out: &mut Vec<GameEvent>) {}
    fn on_saucer_hit(&mut self, _hit: &SaucerHitInfo, _out: &mut Vec<GameEvent>) {}
    fn on_player_hit(&mut self, _cause: HitCause, _out: &mut Vec<GameEvent>) {}
    fn on_level_complete(&mut self, _level: u32, _out: &mut Vec<GameEvent>) {}
    fn on_game_over(&mut self, _out: &mut Vec<GameEvent>) {}
}

/// Route a notification to the matching hook
pub fn deliver(target: &mut dyn GameEvents, note: &Notification, out: &mut Vec<GameEvent>) {
    match note {
        Notification::AsteroidHit(hit) => target.on_asteroid_hit(hit, out),
        Notification::SaucerHit(hit) => target.on_saucer_hit(hit, out),
        Notification::PlayerHit(cause) => target.on_player_hit(*cause, out),
        Notification::LevelComplete { level } => target.on_level_complete(*level, out),
        Notification::GameOver => target.on_game_over(out),
    }
}
