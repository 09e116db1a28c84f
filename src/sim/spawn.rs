//! Entity spawning
//!
//! One roll per spawn interval picks a snack, obstacle or power item; a
//! separate low-odds roll may add a boost item alongside it.

use rand::Rng;

use super::collision::Rect;
use super::state::{GameState, Obstacle, PowerItem, PowerKind, Snack};
use crate::consts::*;

/// Result of the primary spawn roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Snack,
    Obstacle,
    PowerItem,
}

impl SpawnKind {
    /// Map a uniform roll in [0, 1) to a spawn kind (60 / 25 / 15)
    pub fn from_roll(r: f32) -> Self {
        if r < SNACK_CHANCE {
            SpawnKind::Snack
        } else if r < OBSTACLE_CHANCE {
            SpawnKind::Obstacle
        } else {
            SpawnKind::PowerItem
        }
    }
}

/// Draw the primary spawn kind from `rng`
pub fn roll_spawn_kind<R: Rng + ?Sized>(rng: &mut R) -> SpawnKind {
    SpawnKind::from_roll(rng.random::<f32>())
}

/// Accumulate `dt_ms` toward the next spawn and spawn when the interval is
/// exceeded. Returns true if anything spawned.
pub fn spawn_wave<R: Rng>(state: &mut GameState<R>, dt_ms: f32) -> bool {
    state.run.spawn_timer += dt_ms;
    if state.run.spawn_timer <= state.run.spawn_interval {
        return false;
    }
    state.run.spawn_timer = 0.0;
    spawn_entities(state);
    true
}

/// Spawn the primary entity plus the occasional boost item
pub fn spawn_entities<R: Rng>(state: &mut GameState<R>) {
    let width = state.config.field_width;
    let kind = roll_spawn_kind(&mut state.rng);
    let x = 40.0 + state.rng.random::<f32>() * (width - 80.0);

    match kind {
        SpawnKind::Snack => {
            let vy = state.rng.random_range(SNACK_MIN_SPEED..SNACK_MAX_SPEED);
            let id = state.next_entity_id();
            state.snacks.push(Snack {
                id,
                rect: Rect::new(x, -SNACK_SIZE, SNACK_SIZE, SNACK_SIZE),
                vy,
                value: SNACK_SCORE,
            });
        }
        SpawnKind::Obstacle => {
            let vy = state
                .rng
                .random_range(OBSTACLE_MIN_SPEED..OBSTACLE_MAX_SPEED);
            let id = state.next_entity_id();
            state.obstacles.push(Obstacle {
                id,
                rect: Rect::new(x, OBSTACLE_SPAWN_Y, OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
                vy,
            });
        }
        SpawnKind::PowerItem => {
            let kind = if state.rng.random_bool(0.5) {
                PowerKind::Shield
            } else {
                PowerKind::Slow
            };
            let id = state.next_entity_id();
            state.power_items.push(PowerItem {
                id,
                kind,
                rect: Rect::new(x, -POWER_ITEM_SIZE, POWER_ITEM_SIZE, POWER_ITEM_SIZE),
                vy: POWER_ITEM_SPEED,
            });
        }
    }

    if state.rng.random_bool(BOOST_ITEM_CHANCE) {
        let x = 20.0 + state.rng.random::<f32>() * (width - 40.0);
        let id = state.next_entity_id();
        state.power_items.push(PowerItem {
            id,
            kind: PowerKind::Boost,
            rect: Rect::new(x, -POWER_ITEM_SIZE, POWER_ITEM_SIZE, POWER_ITEM_SIZE),
            vy: BOOST_ITEM_SPEED,
        });
    }
}
