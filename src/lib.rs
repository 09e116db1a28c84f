//! Snack Dash - a falling-snack dodge-and-collect arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, power timers)
//! - `platform`: Frame clock and input mapping shared by the drivers
//! - `settings`: Data-driven game configuration

pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{BoostTrigger, GameConfig};

/// Game configuration constants
pub mod consts {
    /// Default play-field dimensions (canvas pixels)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// Minimum gap between the player and the field edge
    pub const FIELD_MARGIN: f32 = 8.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 48.0;
    /// Pixels per tick at 1x speed
    pub const PLAYER_SPEED: f32 = 4.0;
    /// Player spawns this far above the bottom edge
    pub const PLAYER_START_OFFSET_Y: f32 = 80.0;
    pub const START_LIVES: u8 = 3;

    /// Spawn cadence (ms)
    pub const SPAWN_INTERVAL_START: f32 = 900.0;
    pub const SPAWN_INTERVAL_MIN: f32 = 400.0;
    /// Interval shrink per ms while the score sits on a multiple of 100
    pub const SPAWN_RAMP_RATE: f32 = 0.2;
    pub const SPAWN_RAMP_STEP: u32 = 100;

    /// Spawn roll thresholds: [0, 0.6) snack, [0.6, 0.85) obstacle, rest power item
    pub const SNACK_CHANCE: f32 = 0.6;
    pub const OBSTACLE_CHANCE: f32 = 0.85;
    /// Independent chance of a bonus boost item per spawn
    pub const BOOST_ITEM_CHANCE: f64 = 0.08;

    pub const SNACK_SIZE: f32 = 40.0;
    pub const SNACK_SCORE: u32 = 10;
    pub const SNACK_MIN_SPEED: f32 = 1.2;
    pub const SNACK_MAX_SPEED: f32 = 2.8;

    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const OBSTACLE_HEIGHT: f32 = 40.0;
    pub const OBSTACLE_SPAWN_Y: f32 = -60.0;
    pub const OBSTACLE_MIN_SPEED: f32 = 2.0;
    pub const OBSTACLE_MAX_SPEED: f32 = 3.5;

    pub const POWER_ITEM_SIZE: f32 = 36.0;
    pub const POWER_ITEM_SPEED: f32 = 1.5;
    pub const BOOST_ITEM_SPEED: f32 = 2.0;

    /// Difficulty multipliers applied per point of score
    pub const SNACK_SPEEDUP_PER_POINT: f32 = 0.0005;
    pub const OBSTACLE_SPEEDUP_PER_POINT: f32 = 0.0006;

    /// Entities are culled once their top edge passes H + margin
    pub const SNACK_CULL_MARGIN: f32 = 50.0;
    pub const OBSTACLE_CULL_MARGIN: f32 = 100.0;
    pub const POWER_ITEM_CULL_MARGIN: f32 = 50.0;

    /// Power meter
    pub const POWER_MAX: f32 = 30.0;
    pub const POWER_PER_SNACK: f32 = 8.0;
    /// Meter units lost per ms while the shield is down
    pub const POWER_DECAY_RATE: f32 = 0.002;

    /// Effect durations (ms)
    pub const SHIELD_DURATION_MS: f32 = 6000.0;
    pub const BOOST_DURATION_MS: f32 = 3000.0;
    pub const SLOW_DURATION_MS: f32 = 4000.0;

    pub const BOOST_MULTIPLIER: f32 = 1.8;
    pub const SLOW_FACTOR: f32 = 0.5;
}
