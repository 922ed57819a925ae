use serde::{Deserialize, Serialize};

use wordsmith_core::geometry::Rect;

use crate::config::PhysicsConfig;
use crate::level::Level;

/// Gravity acceleration (units/tick^2, downward).
pub const GRAVITY: f32 = 0.5;
/// Horizontal move speed.
pub const MOVE_SPEED: f32 = 5.0;
/// Jump initial velocity (applied upward).
pub const JUMP_VELOCITY: f32 = 12.0;
/// Horizontal velocity multiplier when no direction is held.
pub const FRICTION: f32 = 0.8;
/// Player width for AABB collision.
pub const PLAYER_WIDTH: f32 = 30.0;
/// Player height for AABB collision.
pub const PLAYER_HEIGHT: f32 = 40.0;
/// A falling player whose top is less than this far below an obstacle's top stomps it.
pub const STOMP_TOLERANCE: f32 = 5.0;
/// Upward speed after a stomp.
pub const STOMP_BOUNCE: f32 = 8.0;

/// State of the player character.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerState {
    /// Top-left corner of the bounding box.
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    pub grounded: bool,
}

impl PlayerState {
    pub fn new(spawn: (f32, f32), cfg: &PhysicsConfig) -> Self {
        Self {
            x: spawn.0,
            y: spawn.1,
            vx: 0.0,
            vy: 0.0,
            width: cfg.player_width,
            height: cfg.player_height,
            grounded: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Move back to the spawn point with zero velocity.
    pub fn respawn(&mut self, spawn: (f32, f32)) {
        self.x = spawn.0;
        self.y = spawn.1;
        self.vx = 0.0;
        self.vy = 0.0;
    }

    /// Whether landing on `target` from the current state counts as a stomp.
    pub fn is_stomping(&self, target: &Rect, cfg: &PhysicsConfig) -> bool {
        self.vy > 0.0 && self.y < target.y + cfg.stomp_tolerance
    }

    /// Fixed upward kick after a stomp.
    pub fn bounce(&mut self, cfg: &PhysicsConfig) {
        self.vy = -cfg.stomp_bounce;
    }

    /// Whether the player dropped below the bottom of the level.
    pub fn fell_out(&self, level: &Level) -> bool {
        self.y > level.height()
    }
}

/// Held controls for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Advance the player one tick: control, jump, gravity, integration,
/// horizontal clamp and platform landing.
pub fn tick_player(
    player: &mut PlayerState,
    input: &PlayerInput,
    level: &Level,
    cfg: &PhysicsConfig,
) {
    // Left wins when both directions are held.
    if input.left {
        player.vx = -cfg.move_speed;
    } else if input.right {
        player.vx = cfg.move_speed;
    } else {
        player.vx *= cfg.friction;
    }

    if input.jump && player.grounded {
        player.vy = -cfg.jump_velocity;
        player.grounded = false;
    }

    // Gravity applies even while grounded; grounding is re-derived below.
    player.vy += cfg.gravity;

    player.x += player.vx;
    player.y += player.vy;

    let max_x = level.width() - player.width;
    player.x = player.x.clamp(0.0, max_x);

    land_on_platforms(player, level);
}

/// Top-only platform resolution. Side and bottom contacts pass through.
pub(crate) fn land_on_platforms(player: &mut PlayerState, level: &Level) {
    player.grounded = false;
    for platform in level.platforms().values() {
        let top = platform.rect.y;
        if player.rect().overlaps(&platform.rect) && player.vy > 0.0 && player.y < top {
            player.y = top - player.height;
            player.vy = 0.0;
            player.grounded = true;
        }
    }
}
