//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay free of host
//! dependencies:
//! - Delta time comes from the caller
//! - Randomness comes from an injected RNG
//! - Deferred effects run on the state's own clock
//! - No rendering, audio or DOM access

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::{Rect, rects_overlap};
pub use spawn::{SpawnKind, roll_spawn_kind, spawn_wave};
pub use state::{
    BoostSource, BoostState, GameEvent, GameState, Hud, Obstacle, Player, PowerItem, PowerKind,
    RenderSnapshot, RunState, ShieldState, Snack, SpriteKind, SpriteView, DEFAULT_SEED,
};
pub use tick::{TickInput, TickOutcome, sanitize_dt, tick};
pub use timers::{DeferredEffect, ScheduledTask, Scheduler};
