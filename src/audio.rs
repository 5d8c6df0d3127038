//! Audio cues
//!
//! The simulation never plays sound itself. It emits named cues and leaves
//! playback, looping and mixing to whatever implements [`CuePlayer`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Player projectile fired
    Fire,
    /// Ship thruster (looping while thrust is held)
    Thrust,
    /// Something blew up; `tier` is 0 for the smallest rock, 2 for the largest
    Bang { tier: u8 },
    /// Extra ship awarded
    ExtraShip,
    /// Saucer engine (looping while the saucer is alive)
    Ufo { iq: u8 },
    /// Ambient beat, alternating between the two pitches
    Beat { index: u8 },
}

impl SoundCue {
    /// Clip key used by the audio collaborator
    pub fn name(&self) -> String {
        match self {
            SoundCue::Fire => "fire".to_string(),
            SoundCue::Thrust => "thrust".to_string(),
            SoundCue::Bang { tier } => format!("bang{tier}"),
            SoundCue::ExtraShip => "extraShip".to_string(),
            SoundCue::Ufo { iq } => format!("ufo{iq}"),
            SoundCue::Beat { index } => format!("beat{index}"),
        }
    }

    /// Parse a clip key back into a cue
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fire" => return Some(SoundCue::Fire),
            "thrust" => return Some(SoundCue::Thrust),
            "extraShip" => return Some(SoundCue::ExtraShip),
            _ => {}
        }

        let n = name.chars().last()?.to_digit(10)? as u8;
        // The trailing digit is ASCII, so this slice stays on a char boundary
        let prefix = &name[..name.len() - 1];
        match (prefix, n) {
            ("bang", 0..=2) => Some(SoundCue::Bang { tier: n }),
            ("ufo", 1..=2) => Some(SoundCue::Ufo { iq: n }),
            ("beat", 0..=1) => Some(SoundCue::Beat { index: n }),
            _ => None,
        }
    }

    /// Whether the clip loops until explicitly stopped
    pub fn is_looping(&self) -> bool {
        matches!(self, SoundCue::Thrust | SoundCue::Ufo { .. })
    }
}

impl fmt::Display for SoundCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Playback seam implemented by the audio collaborator
pub trait CuePlayer {
    fn play(&mut self, cue: SoundCue);
    fn stop(&mut self, cue: SoundCue);

    /// Play a cue by clip key.
    ///
    /// An unknown key is a programming error: it trips a debug assertion in
    /// development builds and is ignored in release builds.
    fn play_named(&mut self, name: &str) {
        match SoundCue::from_name(name) {
            Some(cue) => self.play(cue),
            None => debug_assert!(false, "unknown audio cue `{name}`"),
        }
    }
}

/// Cue player that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogCuePlayer {
    pub played: usize,
    looping: Vec<SoundCue>,
}

impl LogCuePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looping cues currently running
    pub fn active_loops(&self) -> &[SoundCue] {
        &self.looping
    }
}

impl CuePlayer for LogCuePlayer {
    fn play(&mut self, cue: SoundCue) {
        self.played += 1;
        if cue.is_looping() {
            if self.looping.contains(&cue) {
                return;
            }
            self.looping.push(cue);
        }
        log::trace!("play {cue}");
    }

    fn stop(&mut self, cue: SoundCue) {
        self.looping.retain(|c| *c != cue);
        log::trace!("stop {cue}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_names() {
        assert_eq!(SoundCue::Fire.name(), "fire");
        assert_eq!(SoundCue::Bang { tier: 2 }.name(), "bang2");
        assert_eq!(SoundCue::ExtraShip.name(), "extraShip");
        assert_eq!(SoundCue::Ufo { iq: 1 }.name(), "ufo1");
        assert_eq!(SoundCue::Beat { index: 0 }.name(), "beat0");
    }

    #[test]
    fn test_from_name_inverts_name() {
        let cues = [
            SoundCue::Fire,
            SoundCue::Thrust,
            SoundCue::Bang { tier: 0 },
            SoundCue::Bang { tier: 2 },
            SoundCue::ExtraShip,
            SoundCue::Ufo { iq: 2 },
            SoundCue::Beat { index: 1 },
        ];
        for cue in cues {
            assert_eq!(SoundCue::from_name(&cue.name()), Some(cue));
        }
        assert_eq!(SoundCue::from_name("bang7"), None);
        assert_eq!(SoundCue::from_name(""), None);
        assert_eq!(SoundCue::from_name("laser"), None);
    }

    #[test]
    fn test_loops_are_not_stacked() {
        let mut player = LogCuePlayer::new();
        player.play(SoundCue::Thrust);
        player.play(SoundCue::Thrust);
        assert_eq!(player.active_loops(), &[SoundCue::Thrust]);
        player.stop(SoundCue::Thrust);
        assert!(player.active_loops().is_empty());
        // Stopping twice is harmless
        player.stop(SoundCue::Thrust);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "unknown audio cue")]
    fn test_unknown_named_cue_asserts_in_debug() {
        let mut player = LogCuePlayer::new();
        player.play_named("kaboom");
    }
}
