//! Game state and core simulation types
//!
//! Everything a run mutates lives in [`GameState`]; the renderer and HUD read
//! it through [`RenderSnapshot`] and [`Hud`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::tick::{TickInput, TickOutcome, tick};
use super::timers::Scheduler;
use crate::consts::*;
use crate::settings::GameConfig;

/// Seed used when the config doesn't pin one
pub const DEFAULT_SEED: u64 = 0x5eed_5acc;

/// The player's sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    /// Pixels per tick before boost
    pub speed: f32,
}

impl Player {
    /// Player at the start position for a field of the given size
    pub fn spawn(field_width: f32, field_height: f32) -> Self {
        Self {
            rect: Rect::new(
                (field_width - PLAYER_SIZE) / 2.0,
                field_height - PLAYER_START_OFFSET_Y,
                PLAYER_SIZE,
                PLAYER_SIZE,
            ),
            speed: PLAYER_SPEED,
        }
    }
}

/// A falling snack worth points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snack {
    pub id: u32,
    pub rect: Rect,
    pub vy: f32,
    pub value: u32,
}

/// A falling hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub rect: Rect,
    pub vy: f32,
}

/// Power item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerKind {
    Shield,
    Slow,
    Boost,
}

/// A falling power item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerItem {
    pub id: u32,
    pub kind: PowerKind,
    pub rect: Rect,
    pub vy: f32,
}

/// Shield flag plus time spent active (ms)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShieldState {
    pub active: bool,
    pub timer_ms: f32,
}

/// What turned the boost on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoostSource {
    Pickup,
    Key,
}

/// Boost flag plus time spent active (ms)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoostState {
    pub active: bool,
    pub timer_ms: f32,
    pub source: Option<BoostSource>,
}

/// Score, lives and spawn pacing for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub score: u32,
    pub lives: u8,
    /// Current ms between spawns
    pub spawn_interval: f32,
    /// Ms accumulated toward the next spawn
    pub spawn_timer: f32,
    pub running: bool,
    /// Bumped by every `start()`; tags deferred tasks
    pub run_id: u32,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            score: 0,
            lives: START_LIVES,
            spawn_interval: SPAWN_INTERVAL_START,
            spawn_timer: 0.0,
            running: false,
            run_id: 0,
        }
    }
}

/// Things that happened during a tick, for audio/HUD/overlay layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SnackCollected { value: u32 },
    ObstacleHit { lives_left: u8 },
    ShieldAbsorbed,
    PowerPickup(PowerKind),
    ShieldActivated,
    ShieldExpired,
    BoostStarted,
    BoostEnded,
    /// A slow window closed; `restored` obstacles got their speed back
    SlowExpired { restored: usize },
    GameOver { score: u32 },
}

/// Values shown in the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u32,
    pub lives: u8,
    /// Power meter, floored
    pub power: u32,
    pub running: bool,
}

/// Sprite discriminator for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpriteKind {
    Player,
    Snack,
    Obstacle,
    Shield,
    Slow,
    Boost,
}

impl From<PowerKind> for SpriteKind {
    fn from(kind: PowerKind) -> Self {
        match kind {
            PowerKind::Shield => SpriteKind::Shield,
            PowerKind::Slow => SpriteKind::Slow,
            PowerKind::Boost => SpriteKind::Boost,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteView {
    pub kind: SpriteKind,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl SpriteView {
    fn new(kind: SpriteKind, rect: &Rect) -> Self {
        Self {
            kind,
            x: rect.pos.x,
            y: rect.pos.y,
            w: rect.size.x,
            h: rect.size.y,
        }
    }
}

/// Read-only view of everything the renderer draws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub player: SpriteView,
    pub snacks: Vec<SpriteView>,
    pub obstacles: Vec<SpriteView>,
    pub power_items: Vec<SpriteView>,
    pub shield_active: bool,
    pub boost_active: bool,
}

/// Complete game state
///
/// Generic over the random source so tests can drive spawning with a
/// deterministic or scripted RNG.
#[derive(Debug, Clone)]
pub struct GameState<R = Pcg32> {
    pub config: GameConfig,
    pub player: Player,
    /// Collectibles (spawn order)
    pub snacks: Vec<Snack>,
    pub obstacles: Vec<Obstacle>,
    pub power_items: Vec<PowerItem>,
    /// Power meter, 0..=POWER_MAX
    pub power: f32,
    pub shield: ShieldState,
    pub boost: BoostState,
    pub run: RunState,
    /// Deferred effects (slow restoration)
    pub timers: Scheduler,
    pub(crate) rng: R,
    /// Next advance treats dt as 0
    pub(crate) fresh_start: bool,
    /// Boost input level seen on the previous tick
    pub(crate) boost_was_held: bool,
    next_id: u32,
}

impl GameState<Pcg32> {
    /// New state seeded from the config (or [`DEFAULT_SEED`])
    pub fn new(config: GameConfig) -> Self {
        let seed = config.seed.unwrap_or(DEFAULT_SEED);
        Self::seeded(config, seed)
    }

    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> GameState<R> {
    /// New state drawing randomness from `rng`
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        let player = Player::spawn(config.field_width, config.field_height);
        let mut state = Self {
            config,
            player,
            snacks: Vec::new(),
            obstacles: Vec::new(),
            power_items: Vec::new(),
            power: 0.0,
            shield: ShieldState::default(),
            boost: BoostState::default(),
            run: RunState::default(),
            timers: Scheduler::new(),
            rng,
            fresh_start: true,
            boost_was_held: false,
            next_id: 1,
        };
        state.clamp_player();
        state
    }

    /// Step the simulation by `dt_ms` with this tick's input
    pub fn advance(&mut self, dt_ms: f32, input: &TickInput) -> TickOutcome {
        tick(self, input, dt_ms)
    }

    /// Reinitialize entities and run state. Does not start the run.
    pub fn reset(&mut self) {
        self.snacks.clear();
        self.obstacles.clear();
        self.power_items.clear();
        self.power = 0.0;
        self.shield = ShieldState::default();
        self.boost = BoostState::default();
        self.run = RunState {
            run_id: self.run.run_id,
            ..RunState::default()
        };
        self.player = Player::spawn(self.config.field_width, self.config.field_height);
        self.clamp_player();
        self.timers.clear();
        self.fresh_start = true;
        self.boost_was_held = false;
        log::debug!("Game state reset");
    }

    /// Begin a new run; the next advance uses dt = 0
    pub fn start(&mut self) {
        if self.run.running {
            return;
        }
        self.run.run_id = self.run.run_id.wrapping_add(1);
        self.run.running = true;
        self.fresh_start = true;
        log::info!("Run {} started", self.run.run_id);
    }

    /// Stop the run. Returns true only on the running -> ended transition.
    pub fn end(&mut self) -> bool {
        if !self.run.running {
            return false;
        }
        self.run.running = false;
        let dropped = self.timers.cancel_run(self.run.run_id);
        log::info!(
            "Run {} ended with score {} ({} pending effects dropped)",
            self.run.run_id,
            self.run.score,
            dropped
        );
        true
    }

    pub fn is_running(&self) -> bool {
        self.run.running
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Allowed range for the player's top-left corner
    pub fn player_bounds(&self) -> (Vec2, Vec2) {
        let size = self.player.rect.size;
        let min = Vec2::splat(FIELD_MARGIN);
        let max = Vec2::new(
            self.config.field_width - size.x - FIELD_MARGIN,
            self.config.field_height - size.y - FIELD_MARGIN,
        );
        (min, max)
    }

    /// Pull the player back inside the field margins
    pub fn clamp_player(&mut self) {
        let (min, max) = self.player_bounds();
        // Upper bound first so a field smaller than the player pins to the margin
        self.player.rect.pos = self.player.rect.pos.min(max).max(min);
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.run.score,
            lives: self.run.lives,
            power: self.power.floor() as u32,
            running: self.run.running,
        }
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            player: SpriteView::new(SpriteKind::Player, &self.player.rect),
            snacks: self
                .snacks
                .iter()
                .map(|s| SpriteView::new(SpriteKind::Snack, &s.rect))
                .collect(),
            obstacles: self
                .obstacles
                .iter()
                .map(|o| SpriteView::new(SpriteKind::Obstacle, &o.rect))
                .collect(),
            power_items: self
                .power_items
                .iter()
                .map(|p| SpriteView::new(p.kind.into(), &p.rect))
                .collect(),
            shield_active: self.shield.active,
            boost_active: self.boost.active,
        }
    }

    /// Turn the shield on with a fresh window. Returns true if it was off.
    pub(crate) fn activate_shield(&mut self) -> bool {
        let was_active = self.shield.active;
        self.shield.active = true;
        self.shield.timer_ms = 0.0;
        self.power = POWER_MAX;
        !was_active
    }

    pub(crate) fn deactivate_shield(&mut self) {
        self.shield = ShieldState::default();
        self.power = 0.0;
    }

    /// Turn boost on with a fresh timer. Returns true if it was off.
    /// A running pickup boost stays owned by the pickup when the key re-arms it.
    pub(crate) fn activate_boost(&mut self, source: BoostSource) -> bool {
        let was_active = self.boost.active;
        let source = match self.boost.source {
            Some(BoostSource::Pickup) if was_active => BoostSource::Pickup,
            _ => source,
        };
        self.boost = BoostState {
            active: true,
            timer_ms: 0.0,
            source: Some(source),
        };
        !was_active
    }

    pub(crate) fn deactivate_boost(&mut self) {
        self.boost = BoostState::default();
    }
}
