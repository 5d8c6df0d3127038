//! Asteroid Arcade headless driver
//!
//! Runs the simulation without a window: a scripted autopilot flies the ship
//! at 60 Hz, cues go to a logging cue player, and a summary is printed at
//! the end.
//!
//! Usage: `asteroid-arcade [settings.json] [frames]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::f32::consts::TAU;
    use std::time::{SystemTime, UNIX_EPOCH};

    use asteroid_arcade::audio::{CuePlayer, LogCuePlayer};
    use asteroid_arcade::sim::{Aim, GameEvent, GameState, TickContext, TickInput, tick};
    use asteroid_arcade::{Settings, SettingsError};

    /// Simulation rate
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Two minutes of play unless told otherwise
    pub const DEFAULT_FRAMES: u64 = 60 * 120;

    /// Headless game instance
    pub struct Driver {
        state: GameState,
        ctx: TickContext,
        cues: LogCuePlayer,
        frame: u64,
        games_over: u32,
        best_score: u64,
        max_level: u32,
    }

    impl Driver {
        pub fn new(settings: &Settings) -> Self {
            let clock_seed = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default();
            let state = GameState::from_settings(settings, clock_seed);
            log::info!("Seed {}", state.seed);

            Self {
                ctx: TickContext::new(settings.viewport),
                state,
                cues: LogCuePlayer::new(),
                frame: 0,
                games_over: 0,
                best_score: 0,
                max_level: 1,
            }
        }

        /// Spin the aim, keep the trigger down, and pulse the thruster
        fn autopilot(&self) -> TickInput {
            let t = self.frame as f32 * FRAME_DT;
            TickInput {
                aim: Aim::Angle((t * 0.8) % TAU),
                fire: true,
                thrust: (t % 4.0) < 0.5,
            }
        }

        fn route(&mut self, events: Vec<GameEvent>) {
            for event in events {
                match event {
                    GameEvent::Sound(cue) => self.cues.play(cue),
                    GameEvent::StopSound(cue) => self.cues.stop(cue),
                    GameEvent::ScoreChanged { score } => {
                        self.best_score = self.best_score.max(score);
                    }
                    GameEvent::LevelComplete { level } => {
                        self.max_level = self.max_level.max(level);
                    }
                    GameEvent::GameOver { final_score, level } => {
                        self.games_over += 1;
                        println!("Game over: {final_score} points on level {level}");
                    }
                    other => log::debug!("{other:?}"),
                }
            }
        }

        pub fn run(&mut self, frames: u64) {
            for _ in 0..frames {
                let input = self.autopilot();
                let events = tick(&mut self.state, &input, &self.ctx, FRAME_DT);
                self.route(events);
                self.frame += 1;
            }
        }

        pub fn print_summary(&self) {
            let seconds = self.frame as f32 * FRAME_DT;
            println!("--- {} frames ({seconds:.1}s) ---", self.frame);
            println!("score      {}", self.state.score);
            println!("best score {}", self.best_score);
            println!("level      {} (max {})", self.state.level, self.max_level);
            println!("lives      {}", self.state.lives());
            println!("games over {}", self.games_over);
            println!("cues       {}", self.cues.played);
        }
    }

    pub fn load_settings(path: Option<String>) -> Result<Settings, SettingsError> {
        match path {
            Some(path) => Settings::load(path),
            None => Ok(Settings::default()),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), asteroid_arcade::SettingsError> {
    env_logger::init();
    log::info!("Asteroid Arcade (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = headless::load_settings(args.next())?;
    let frames = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(headless::DEFAULT_FRAMES);

    let mut driver = headless::Driver::new(&settings);
    driver.run(frames);
    driver.print_summary();
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is a library on wasm; hosts drive `sim::tick` themselves
}
