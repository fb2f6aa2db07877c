//! Game settings and tuning
//!
//! Native builds read `speedy_sums.json` from the working directory, browser
//! builds read LocalStorage. Every field has a default, so a partial file is
//! fine and a missing one means "all defaults".

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Column speed at session start (units per frame)
    pub base_speed: f32,
    /// Seconds of play per +1 unit/frame of column speed
    pub speed_time_divisor: f32,
    /// Seconds of play per difficulty level
    pub difficulty_period_secs: f32,
    /// Feedback dot lifetime
    pub feedback_duration_ms: f32,
    /// Car movement per frame while a key is held
    pub player_speed: f32,
    /// Lane divider scroll speed (units per second)
    pub highway_speed: f32,
    pub starting_lives: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: BASE_SPEED,
            speed_time_divisor: SPEED_TIME_DIVISOR,
            difficulty_period_secs: DIFFICULTY_PERIOD_SECS,
            feedback_duration_ms: FEEDBACK_DURATION_MS,
            player_speed: PLAYER_SPEED,
            highway_speed: HIGHWAY_SPEED,
            starting_lives: STARTING_LIVES,
        }
    }
}

impl Tuning {
    /// Column speed after `elapsed_secs` of play
    pub fn game_speed(&self, elapsed_secs: f32) -> f32 {
        self.base_speed + elapsed_secs / self.speed_time_divisor.max(f32::EPSILON)
    }

    /// Difficulty level after `elapsed_secs` of play (starts at 1)
    pub fn difficulty(&self, elapsed_secs: f32) -> u32 {
        let period = self.difficulty_period_secs.max(f32::EPSILON);
        1 + (elapsed_secs.max(0.0) / period).floor() as u32
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tuning: Tuning,
    /// Frame cap for the native loop
    pub target_fps: u32,
    /// User record file (native only)
    pub users_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            target_fps: TARGET_FPS,
            users_path: "users.json".to_string(),
        }
    }
}

impl Settings {
    /// Settings file name / LocalStorage key
    pub const FILE_NAME: &'static str = "speedy_sums.json";
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "speedy_sums_settings";

    /// Parse settings JSON, falling back to defaults on bad input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                Self::default()
            }
        }
    }

    /// Frame budget for the native loop
    pub fn frame_duration(&self) -> std::time::Duration {
        std::time::Duration::from_micros(1_000_000 / self.target_fps.max(1) as u64)
    }

    /// Load settings from the working directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::fs::read_to_string(Self::FILE_NAME) {
            Ok(json) => {
                log::info!("Loaded settings from {}", Self::FILE_NAME);
                Self::from_json(&json)
            }
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }
}
