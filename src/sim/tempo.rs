//! Ambient beat pacing
//!
//! The two-note heartbeat speeds up as a level wears on. Progress through the
//! wave is `elapsed / wave_duration` clamped to 1; beat time accumulates at a
//! rate proportional to that progress and fires once it passes a threshold
//! that grows more slowly, so the gap between beats shrinks.

use serde::{Deserialize, Serialize};

use crate::audio::SoundCue;
use crate::tuning::TempoTuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tempo {
    tuning: TempoTuning,
    /// Seconds since the level started, including the head start
    elapsed: f32,
    /// Beat accumulator, reset on every beat
    wave_time: f32,
    /// `elapsed / wave_duration`, clamped to `[0, 1]`
    wave_time_normalized: f32,
    /// Alternates the two beat cues
    lower_beat: bool,
}

impl Tempo {
    pub fn new(tuning: &TempoTuning) -> Self {
        let mut tempo = Self {
            tuning: tuning.clone(),
            elapsed: 0.0,
            wave_time: 0.0,
            wave_time_normalized: 0.0,
            lower_beat: false,
        };
        tempo.reset();
        tempo
    }

    /// Start pacing a new level
    pub fn reset(&mut self) {
        self.elapsed = self.tuning.head_start;
        self.wave_time = 0.0;
        self.wave_time_normalized = self.progress();
        self.lower_beat = false;
    }

    fn progress(&self) -> f32 {
        if self.tuning.wave_duration > 0.0 {
            (self.elapsed / self.tuning.wave_duration).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    pub fn wave_time_normalized(&self) -> f32 {
        self.wave_time_normalized
    }

    /// Accumulated beat time beyond the threshold that fires a beat
    pub fn threshold(&self) -> f32 {
        self.tuning.initial_interval * (self.wave_time_normalized + 1.0) * self.tuning.quadratic_rate
    }

    /// Advance by `dt`; returns the beat cue when one is due
    pub fn update(&mut self, dt: f32) -> Option<SoundCue> {
        self.elapsed += dt;
        self.wave_time_normalized = self.progress();

        if self.wave_time > self.threshold() {
            self.wave_time = 0.0;
            let index = if self.lower_beat { 1 } else { 0 };
            self.lower_beat = !self.lower_beat;
            return Some(SoundCue::Beat { index });
        }

        self.wave_time += self.wave_time_normalized * self.tuning.incremental_rate * dt;
        None
    }
}
