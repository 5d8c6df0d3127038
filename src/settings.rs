//! Run settings
//!
//! Read from a JSON file by the binary. Every field is optional; anything
//! left out falls back to the defaults in [`Tuning`] and [`Viewport`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::tuning::Tuning;
use crate::Viewport;

/// Settings for a single run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed; `None` lets the driver pick one
    pub seed: Option<u64>,
    /// Initial playfield size (the driver may resize between ticks)
    pub viewport: Viewport,
    /// Game balance
    pub tuning: Tuning,
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty JSON (useful for dumping the defaults)
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return Err(SettingsError::invalid("viewport", "must have a positive size"));
        }

        let t = &self.tuning;
        if t.max_lives == 0 {
            return Err(SettingsError::invalid("tuning.max_lives", "must be at least 1"));
        }
        if t.extra_life_interval == 0 {
            return Err(SettingsError::invalid(
                "tuning.extra_life_interval",
                "must be positive",
            ));
        }

        positive("tuning.game_over_cooldown", t.game_over_cooldown)?;
        positive("tuning.player.shoot_delay", t.player.shoot_delay)?;
        positive("tuning.player.bullet_lifetime", t.player.bullet_lifetime)?;
        positive("tuning.player.explosion_duration", t.player.explosion_duration)?;
        positive("tuning.saucer.shoot_delay", t.saucer.shoot_delay)?;
        positive("tuning.saucer.bullet_lifetime", t.saucer.bullet_lifetime)?;
        positive("tuning.tempo.wave_duration", t.tempo.wave_duration)?;
        positive("tuning.asteroids.radius", t.asteroids.radius)?;

        ordered(
            "tuning.asteroids.spawn_delay",
            t.asteroids.min_spawn_delay,
            t.asteroids.max_spawn_delay,
        )?;
        ordered(
            "tuning.asteroids.speed",
            t.asteroids.min_speed,
            t.asteroids.max_speed,
        )?;
        ordered(
            "tuning.asteroids.split_factor",
            t.asteroids.split_min_factor,
            t.asteroids.split_max_factor,
        )?;
        ordered(
            "tuning.saucer.spawn_delay",
            t.saucer.min_spawn_delay,
            t.saucer.max_spawn_delay,
        )?;
        ordered("tuning.saucer.drift", t.saucer.min_drift, t.saucer.max_drift)?;

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::invalid(field, format!("must be positive, got {value}")))
    }
}

/// Sampling uses half-open ranges, so the pair must be strictly increasing
fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), SettingsError> {
    if min >= 0.0 && min < max {
        Ok(())
    } else {
        Err(SettingsError::invalid(
            field,
            format!("expected 0 <= min < max, got [{min}, {max})"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings.seed, None);
        assert_eq!(settings.tuning.max_lives, 3);
        assert_eq!(settings.viewport, Viewport::default());
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{ "seed": 7, "tuning": { "player": { "shoot_delay": 0.1 } } }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert!((settings.tuning.player.shoot_delay - 0.1).abs() < 1e-6);
        // Untouched siblings keep their defaults
        assert!((settings.tuning.player.bullet_speed - crate::consts::BULLET_SPEED).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_bad_ranges() {
        let json = r#"{ "tuning": { "saucer": { "min_spawn_delay": 50.0, "max_spawn_delay": 8.0 } } }"#;
        let err = Settings::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid { field: "tuning.saucer.spawn_delay", .. }
        ));

        let json = r#"{ "viewport": { "width": 0.0, "height": 600.0 } }"#;
        assert!(matches!(
            Settings::from_json(json),
            Err(SettingsError::Invalid { field: "viewport", .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Settings::from_json("{ seed: "),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }

    #[test]
    fn test_defaults_round_trip_through_json() {
        let json = Settings::default().to_json().unwrap();
        let back = Settings::from_json(&json).unwrap();
        assert_eq!(back.tuning.extra_life_interval, 10_000);
    }
}
