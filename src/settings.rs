//! Session settings
//!
//! Loaded from an optional JSON file; anything missing takes the reference
//! value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{Arena, CollisionRule, PlatformSpec, Rect, Wander};

/// Everything needed to start a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub arena: Arena,
    /// Tick period (milliseconds)
    pub tick_ms: u32,
    /// Delay before platforms take their first stride
    pub platform_start_delay_ms: u32,
    pub wander: Wander,
    /// Run seed for reproducibility
    pub seed: u64,
    pub collision_rule: CollisionRule,
    /// Result screen divides the raw score by this
    pub score_divisor: u64,
    /// Player start rect
    pub player: Rect,
    /// Platforms, registered in this order
    pub platforms: Vec<PlatformSpec>,
    /// Headless driver gives up after this many ticks
    pub demo_max_ticks: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena: Arena::default(),
            tick_ms: TICK_MS,
            platform_start_delay_ms: PLATFORM_START_DELAY_MS,
            wander: Wander::default(),
            seed: 0x5EED,
            collision_rule: CollisionRule::default(),
            score_divisor: SCORE_DIVISOR,
            player: Rect::new(PLAYER_START_X, PLAYER_START_Y, PLAYER_SIZE, PLAYER_SIZE),
            platforms: reference_platforms(),
            demo_max_ticks: 30_000,
        }
    }
}

/// The four platforms of the reference layout
pub fn reference_platforms() -> Vec<PlatformSpec> {
    vec![
        PlatformSpec::new(150, 150, 100, 30),
        PlatformSpec::new(300, 300, 30, 100),
        PlatformSpec::new(500, 300, 30, 100),
        PlatformSpec::new(300, 550, 100, 30),
    ]
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read {}: {e}; using default settings", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings in {}: {e}; using default settings", path.display());
                Self::default()
            }
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Vector;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 42, "arena": { "height": 730 } }"#).unwrap();
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.arena.height, 730);
        assert_eq!(settings.arena.width, ARENA_WIDTH);
        assert_eq!(settings.tick_ms, TICK_MS);
        assert_eq!(settings.platforms.len(), 4);
    }

    #[test]
    fn test_platform_vector_parses() {
        let json = r#"{
            "collision_rule": "Terminated",
            "platforms": [{ "x": 150, "y": 150, "width": 50, "height": 50, "vector": "Right" }]
        }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.collision_rule, CollisionRule::Terminated);
        assert_eq!(settings.platforms[0].vector, Some(Vector::Right));
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings::default().with_seed(7);
        let back = Settings::from_json(&settings.to_json()).unwrap();
        assert_eq!(back.seed, 7);
        assert_eq!(back.platforms, settings.platforms);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load(Path::new("/nonexistent/square-dodge.json"));
        assert_eq!(settings.seed, Settings::default().seed);
    }
}
