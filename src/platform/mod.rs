//! Platform glue shared by the web and native drivers
//!
//! Handles the host-facing pieces that are still pure logic:
//! - Frame timestamps to simulation deltas
//! - Key names to tick input
//! - Client (CSS pixel) positions to field coordinates

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::TickInput;

/// Turns animation-frame timestamps into millisecond deltas
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous timestamp; the next frame reports 0
    pub fn restart(&mut self) {
        self.last = None;
    }

    /// Delta since the previous timestamp (0 on the first frame or if the
    /// host clock went backwards)
    pub fn delta(&mut self, timestamp_ms: f64) -> f32 {
        let dt = match self.last {
            Some(last) if timestamp_ms.is_finite() => (timestamp_ms - last).max(0.0) as f32,
            _ => 0.0,
        };
        if timestamp_ms.is_finite() {
            self.last = Some(timestamp_ms);
        }
        dt
    }
}

/// Keyboard keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    Left,
    Right,
    Up,
    Down,
    Boost,
}

impl GameKey {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key_name(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(GameKey::Left),
            "ArrowRight" | "d" | "D" => Some(GameKey::Right),
            "ArrowUp" | "w" | "W" => Some(GameKey::Up),
            "ArrowDown" | "s" | "S" => Some(GameKey::Down),
            " " | "Spacebar" => Some(GameKey::Boost),
            _ => None,
        }
    }
}

/// Currently held keys plus any pending touch target
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<GameKey>,
    pointer: Option<Vec2>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a keydown; returns true if the key is one the game uses
    pub fn key_down(&mut self, key: &str) -> bool {
        match GameKey::from_key_name(key) {
            Some(k) => {
                self.held.insert(k);
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        match GameKey::from_key_name(key) {
            Some(k) => {
                self.held.remove(&k);
                true
            }
            None => false,
        }
    }

    pub fn is_held(&self, key: GameKey) -> bool {
        self.held.contains(&key)
    }

    /// Touch moved to `pos` (field coordinates)
    pub fn set_pointer(&mut self, pos: Vec2) {
        self.pointer = Some(pos);
    }

    /// Drop everything (window blur, new run)
    pub fn clear(&mut self) {
        self.held.clear();
        self.pointer = None;
    }

    fn axis(&self, neg: GameKey, pos: GameKey) -> i8 {
        self.is_held(pos) as i8 - self.is_held(neg) as i8
    }

    /// Build this frame's input. The touch target is consumed.
    pub fn take_input(&mut self) -> TickInput {
        TickInput {
            dx: self.axis(GameKey::Left, GameKey::Right),
            dy: self.axis(GameKey::Up, GameKey::Down),
            boost_held: self.is_held(GameKey::Boost),
            pointer: self.pointer.take(),
        }
    }
}

/// Scale a position relative to the canvas's on-screen box into field
/// coordinates (the canvas may be CSS-scaled)
pub fn canvas_to_field(client: Vec2, display_size: Vec2, field_size: Vec2) -> Vec2 {
    if display_size.x <= 0.0 || display_size.y <= 0.0 {
        return client;
    }
    client * (field_size / display_size)
}

/// CSS size that fits the canvas to the window while keeping its aspect ratio
pub fn fit_display_size(field_size: Vec2, window_width: f32) -> Vec2 {
    let ratio = field_size.x / field_size.y;
    let width = (window_width - 40.0).clamp(1.0, 900.0);
    Vec2::new(width, (width / ratio).round())
}
