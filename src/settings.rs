//! Game configuration
//!
//! Loaded from JSON by the drivers; anything missing falls back to defaults.

use serde::{Deserialize, Serialize};

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};

/// How the boost input re-arms the boost timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BoostTrigger {
    /// Only the press transition (released -> held) re-arms
    #[default]
    Edge,
    /// Every tick the input is held re-arms
    Level,
}

impl BoostTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoostTrigger::Edge => "edge",
            BoostTrigger::Level => "level",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "edge" | "press" => Some(BoostTrigger::Edge),
            "level" | "hold" => Some(BoostTrigger::Level),
            _ => None,
        }
    }
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Play-field width in canvas pixels
    pub field_width: f32,
    /// Play-field height in canvas pixels
    pub field_height: f32,
    /// Boost input semantics
    pub boost_trigger: BoostTrigger,
    /// Fixed RNG seed (None = seeded by the driver from the clock)
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            boost_trigger: BoostTrigger::Edge,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Config for a field of the given size, other values default
    pub fn with_field(width: f32, height: f32) -> Self {
        Self {
            field_width: width,
            field_height: height,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse `json`, logging and falling back to defaults on failure
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(config)) => {
                log::info!("Loaded game config");
                config
            }
            Some(Err(e)) => {
                log::warn!("Invalid game config ({e}), using defaults");
                Self::default()
            }
            None => {
                log::info!("Using default game config");
                Self::default()
            }
        }
    }
}
