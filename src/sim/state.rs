//! Game state
//!
//! Everything the orchestrator owns between ticks. Subsystems own their
//! entities; the orchestrator alone owns score, level, and the game-over hold.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::asteroids::AsteroidField;
use super::player::PlayerController;
use super::saucer::SaucerField;
use super::tempo::Tempo;
use crate::consts::{ASTEROID_POINTS, SAUCER_POINTS};
use crate::{Settings, Tuning, Viewport};

/// PCG stream for the asteroid field
pub const ASTEROID_STREAM: u64 = 1;
/// PCG stream for the saucer field
pub const SAUCER_STREAM: u64 = 2;

/// RNG seed and stream for one subsystem
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64, stream: u64) -> Self {
        Self { seed, stream }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }
}

/// Points for shooting a rock, indexed by its tier before the hit
pub fn asteroid_points(lives: u32) -> u64 {
    lives
        .checked_sub(1)
        .and_then(|i| ASTEROID_POINTS.get(i as usize))
        .copied()
        .unwrap_or(0)
}

/// Points for shooting a saucer of the given iq
pub fn saucer_points(iq: u8) -> u64 {
    iq.checked_sub(1)
        .and_then(|i| SAUCER_POINTS.get(i as usize))
        .copied()
        .unwrap_or(0)
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Non-decreasing until game over
    pub score: u64,
    /// Current level (1-based)
    pub level: u32,
    /// Score already converted into extra ships
    pub extra_life_accumulator: u64,
    /// Set while the post-game-over hold runs
    pub game_over: bool,
    /// Seconds left in the game-over hold
    pub game_over_timer: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: PlayerController,
    pub asteroids: AsteroidField,
    pub saucers: SaucerField,
    pub tempo: Tempo,
    pub tuning: Tuning,
    /// Playfield size as of the last tick
    pub viewport: Viewport,
}

impl GameState {
    /// Create a new game with default tuning
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        Self::with_tuning(seed, viewport, Tuning::default())
    }

    pub fn with_tuning(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        let level = 1;
        let player = PlayerController::new(&tuning.player, tuning.max_lives, &viewport);
        let asteroids = AsteroidField::new(
            &tuning.asteroids,
            tuning.max_lives,
            level,
            RngState::new(seed, ASTEROID_STREAM).to_rng(),
        );
        let saucers = SaucerField::new(
            &tuning.saucer,
            tuning.max_lives,
            level,
            RngState::new(seed, SAUCER_STREAM).to_rng(),
        );
        let tempo = Tempo::new(&tuning.tempo);

        log::info!("New game (seed {seed}, {}x{})", viewport.width, viewport.height);

        Self {
            seed,
            score: 0,
            level,
            extra_life_accumulator: 0,
            game_over: false,
            game_over_timer: 0.0,
            time_ticks: 0,
            player,
            asteroids,
            saucers,
            tempo,
            tuning,
            viewport,
        }
    }

    /// Build from loaded settings; `seed` is used when the settings leave it unset
    pub fn from_settings(settings: &Settings, seed: u64) -> Self {
        Self::with_tuning(
            settings.seed.unwrap_or(seed),
            settings.viewport,
            settings.tuning.clone(),
        )
    }

    pub fn lives(&self) -> u32 {
        self.player.lives()
    }

    /// Where the saucer should aim, if the ship is in play
    pub fn player_target(&self) -> Option<Vec2> {
        self.player
            .is_ready()
            .then(|| self.player.ship().position)
    }
}
