//! Variable timestep simulation tick
//!
//! Core game loop that advances the simulation by one host frame.

use glam::Vec2;
use rand::Rng;

use super::spawn::spawn_wave;
use super::state::{BoostSource, GameEvent, GameState, Hud, PowerKind};
use super::timers::DeferredEffect;
use crate::consts::*;
use crate::settings::BoostTrigger;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Horizontal intent: -1 left, 0 none, 1 right
    pub dx: i8,
    /// Vertical intent: -1 up, 0 none, 1 down
    pub dy: i8,
    /// Boost key currently held
    pub boost_held: bool,
    /// Touch position in field coordinates; the player centres on it
    pub pointer: Option<Vec2>,
}

impl TickInput {
    pub fn new(dx: i8, dy: i8) -> Self {
        Self {
            dx,
            dy,
            ..Default::default()
        }
    }

    /// Per-axis intent, each component in {-1, 0, 1}
    pub fn direction(&self) -> Vec2 {
        Vec2::new(self.dx.signum() as f32, self.dy.signum() as f32)
    }
}

/// What a tick produced for the HUD and any event listeners
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub events: Vec<GameEvent>,
    pub hud: Hud,
}

impl TickOutcome {
    pub fn has(&self, event: &GameEvent) -> bool {
        self.events.contains(event)
    }
}

/// Clamp a host-supplied frame delta to a usable value
#[inline]
pub fn sanitize_dt(dt_ms: f32) -> f32 {
    if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 }
}

/// Advance the game state by `dt_ms` milliseconds
pub fn tick<R: Rng>(state: &mut GameState<R>, input: &TickInput, dt_ms: f32) -> TickOutcome {
    let mut events = Vec::new();
    let mut dt = sanitize_dt(dt_ms);

    if state.run.running && state.fresh_start {
        // First frame of a run: no catch-up
        state.fresh_start = false;
        dt = 0.0;
    }

    run_deferred(state, dt, &mut events);

    if !state.run.running {
        return finish(state, events);
    }

    apply_boost_input(state, input, &mut events);
    apply_movement(state, input);
    spawn_wave(state, dt);
    advance_entities(state);

    resolve_snacks(state, &mut events);
    resolve_obstacles(state, &mut events);
    if !state.run.running {
        // Ended this tick
        return finish(state, events);
    }
    resolve_power_items(state, &mut events);

    update_power_meter(state, dt, &mut events);
    update_boost(state, dt, &mut events);

    // Small difficulty ramp
    if state.run.score > 0 && state.run.score % SPAWN_RAMP_STEP == 0 {
        state.run.spawn_interval =
            (state.run.spawn_interval - SPAWN_RAMP_RATE * dt).max(SPAWN_INTERVAL_MIN);
    }

    finish(state, events)
}

fn finish<R: Rng>(state: &GameState<R>, events: Vec<GameEvent>) -> TickOutcome {
    TickOutcome {
        events,
        hud: state.hud(),
    }
}

/// Fire due deferred tasks belonging to the current run; stale ones are dropped
fn run_deferred<R: Rng>(state: &mut GameState<R>, dt: f32, events: &mut Vec<GameEvent>) {
    for task in state.timers.advance(dt) {
        if task.run_id != state.run.run_id {
            log::debug!("Skipping stale task {} from run {}", task.id, task.run_id);
            continue;
        }
        match task.effect {
            DeferredEffect::RestoreObstacleSpeed {
                obstacle_ids,
                factor,
            } => {
                let mut restored = 0;
                for obstacle in state
                    .obstacles
                    .iter_mut()
                    .filter(|o| obstacle_ids.contains(&o.id))
                {
                    obstacle.vy /= factor;
                    restored += 1;
                }
                log::debug!(
                    "Slow expired at {:.0}ms, restored {restored} obstacles",
                    state.timers.now_ms()
                );
                events.push(GameEvent::SlowExpired { restored });
            }
        }
    }
}

fn apply_boost_input<R: Rng>(state: &mut GameState<R>, input: &TickInput, events: &mut Vec<GameEvent>) {
    let pressed = input.boost_held && !state.boost_was_held;
    let released = !input.boost_held && state.boost_was_held;
    state.boost_was_held = input.boost_held;

    let rearm = match state.config.boost_trigger {
        BoostTrigger::Edge => pressed,
        BoostTrigger::Level => input.boost_held,
    };

    if rearm {
        if state.activate_boost(BoostSource::Key) {
            events.push(GameEvent::BoostStarted);
        }
    } else if released && state.boost.active && state.boost.source == Some(BoostSource::Key) {
        state.deactivate_boost();
        events.push(GameEvent::BoostEnded);
    }
}

fn apply_movement<R: Rng>(state: &mut GameState<R>, input: &TickInput) {
    if let Some(target) = input.pointer {
        state.player.rect.pos = target - state.player.rect.size / 2.0;
    }

    let multiplier = if state.boost.active { BOOST_MULTIPLIER } else { 1.0 };
    let speed = state.player.speed * multiplier;
    state.player.rect.pos += input.direction() * speed;
    state.clamp_player();
}

fn advance_entities<R: Rng>(state: &mut GameState<R>) {
    let score = state.run.score as f32;
    let snack_scale = 1.0 + score * SNACK_SPEEDUP_PER_POINT;
    let obstacle_scale = 1.0 + score * OBSTACLE_SPEEDUP_PER_POINT;

    for snack in &mut state.snacks {
        snack.rect.pos.y += snack.vy * snack_scale;
    }
    for obstacle in &mut state.obstacles {
        obstacle.rect.pos.y += obstacle.vy * obstacle_scale;
    }
    for item in &mut state.power_items {
        item.rect.pos.y += item.vy;
    }
}

fn resolve_snacks<R: Rng>(state: &mut GameState<R>, events: &mut Vec<GameEvent>) {
    let player = state.player.rect;
    let cull_y = state.config.field_height + SNACK_CULL_MARGIN;
    let mut gained = 0;
    let mut collected = 0;

    state.snacks.retain(|snack| {
        if player.overlaps(&snack.rect) {
            gained += snack.value;
            collected += 1;
            events.push(GameEvent::SnackCollected { value: snack.value });
            false
        } else {
            snack.rect.pos.y <= cull_y
        }
    });

    if collected > 0 {
        state.run.score = state.run.score.saturating_add(gained);
        state.power = (state.power + POWER_PER_SNACK * collected as f32).min(POWER_MAX);
    }
}

fn resolve_obstacles<R: Rng>(state: &mut GameState<R>, events: &mut Vec<GameEvent>) {
    let player = state.player.rect;
    let cull_y = state.config.field_height + OBSTACLE_CULL_MARGIN;

    let mut i = 0;
    while i < state.obstacles.len() {
        let rect = state.obstacles[i].rect;
        if player.overlaps(&rect) {
            state.obstacles.remove(i);
            if state.shield.active {
                state.deactivate_shield();
                log::debug!("Shield absorbed an obstacle");
                events.push(GameEvent::ShieldAbsorbed);
            } else {
                state.run.lives = state.run.lives.saturating_sub(1);
                events.push(GameEvent::ObstacleHit {
                    lives_left: state.run.lives,
                });
                if state.run.lives == 0 {
                    if state.end() {
                        events.push(GameEvent::GameOver {
                            score: state.run.score,
                        });
                    }
                    return;
                }
            }
        } else if rect.pos.y > cull_y {
            state.obstacles.remove(i);
        } else {
            i += 1;
        }
    }
}

fn resolve_power_items<R: Rng>(state: &mut GameState<R>, events: &mut Vec<GameEvent>) {
    let player = state.player.rect;
    let cull_y = state.config.field_height + POWER_ITEM_CULL_MARGIN;

    let mut picked = Vec::new();
    state.power_items.retain(|item| {
        if player.overlaps(&item.rect) {
            picked.push(item.kind);
            false
        } else {
            item.rect.pos.y <= cull_y
        }
    });

    for kind in picked {
        events.push(GameEvent::PowerPickup(kind));
        match kind {
            PowerKind::Shield => {
                if state.activate_shield() {
                    events.push(GameEvent::ShieldActivated);
                }
            }
            PowerKind::Slow => slow_obstacles(state),
            PowerKind::Boost => {
                if state.activate_boost(BoostSource::Pickup) {
                    events.push(GameEvent::BoostStarted);
                }
            }
        }
    }
}

/// Halve every present obstacle's speed and queue the restore
fn slow_obstacles<R: Rng>(state: &mut GameState<R>) {
    let mut obstacle_ids = Vec::with_capacity(state.obstacles.len());
    for obstacle in &mut state.obstacles {
        obstacle.vy *= SLOW_FACTOR;
        obstacle_ids.push(obstacle.id);
    }
    if obstacle_ids.is_empty() {
        log::debug!("Slow picked up with no obstacles on the field");
        return;
    }

    log::debug!("Slowed {} obstacles", obstacle_ids.len());
    state.timers.schedule(
        state.run.run_id,
        SLOW_DURATION_MS,
        DeferredEffect::RestoreObstacleSpeed {
            obstacle_ids,
            factor: SLOW_FACTOR,
        },
    );
}

/// Power meter decay, shield auto-activation and shield expiry
fn update_power_meter<R: Rng>(state: &mut GameState<R>, dt: f32, events: &mut Vec<GameEvent>) {
    if state.power >= POWER_MAX && !state.shield.active {
        state.activate_shield();
        log::debug!("Power meter full, shield up");
        events.push(GameEvent::ShieldActivated);
    }

    if state.shield.active {
        state.shield.timer_ms += dt;
        if state.shield.timer_ms > SHIELD_DURATION_MS {
            state.deactivate_shield();
            log::debug!("Shield expired");
            events.push(GameEvent::ShieldExpired);
        }
    } else {
        state.power = (state.power - dt * POWER_DECAY_RATE).max(0.0);
    }
}

fn update_boost<R: Rng>(state: &mut GameState<R>, dt: f32, events: &mut Vec<GameEvent>) {
    if !state.boost.active {
        return;
    }
    state.boost.timer_ms += dt;
    if state.boost.timer_ms > BOOST_DURATION_MS {
        state.deactivate_boost();
        events.push(GameEvent::BoostEnded);
    }
}
