use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::physics::{
    FRICTION, GRAVITY, JUMP_VELOCITY, MOVE_SPEED, PLAYER_HEIGHT, PLAYER_WIDTH, STOMP_BOUNCE,
    STOMP_TOLERANCE,
};

/// Environment variable naming the TOML tuning file.
pub const CONFIG_ENV: &str = "WORDSMITH_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/wordsmith.toml";
/// Fastest tick rate the driver accepts.
pub const MAX_TICK_RATE_HZ: f32 = 1000.0;

/// Top-level tuning configuration. Level layout is fixed and not part of it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WordsmithConfig {
    pub physics: PhysicsConfig,
    pub session: SessionConfig,
    pub messages: MessageConfig,
}

/// Per-tick physics parameters. All velocities are in units per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub move_speed: f32,
    pub jump_velocity: f32,
    /// Multiplier applied to horizontal velocity when no direction is held.
    pub friction: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// How far below an obstacle's top the player's top may be and still stomp.
    pub stomp_tolerance: f32,
    /// Upward speed given to the player after a stomp.
    pub stomp_bounce: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            move_speed: MOVE_SPEED,
            jump_velocity: JUMP_VELOCITY,
            friction: FRICTION,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            stomp_tolerance: STOMP_TOLERANCE,
            stomp_bounce: STOMP_BOUNCE,
        }
    }
}

/// Session-level parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub lives: u8,
    pub item_count: usize,
    pub obstacle_count: usize,
    pub tick_rate_hz: f32,
    /// Fixed seed for reproducible sessions. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lives: 3,
            item_count: 20,
            obstacle_count: 3,
            tick_rate_hz: 60.0,
            seed: None,
        }
    }
}

/// When the self-doubt roll is made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfDoubtTrigger {
    /// One roll per item collected.
    #[default]
    OnCollect,
    /// One roll every tick.
    EveryTick,
}

/// Probabilities and durations for the speech callouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    pub self_doubt_trigger: SelfDoubtTrigger,
    pub self_doubt_chance: f32,
    pub self_doubt_ticks: u32,
    pub obstacle_speech_chance: f32,
    pub obstacle_speech_ticks: u32,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            self_doubt_trigger: SelfDoubtTrigger::OnCollect,
            self_doubt_chance: 0.15,
            self_doubt_ticks: 180,
            obstacle_speech_chance: 0.005,
            obstacle_speech_ticks: 120,
        }
    }
}

impl WordsmithConfig {
    /// Load config from the file named by `WORDSMITH_CONFIG`, or
    /// `config/wordsmith.toml`. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<WordsmithConfig>(&content) {
                Ok(cfg) => cfg.validated(),
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {e}, using defaults", path.display());
                    WordsmithConfig::default()
                },
            },
            Err(_) => {
                tracing::debug!("No config at {}, using defaults", path.display());
                WordsmithConfig::default()
            },
        }
    }
}

/// Replace `*value` with `default` unless `valid` accepts it.
fn check<T: Copy + std::fmt::Debug>(field: &str, value: &mut T, default: T, valid: fn(T) -> bool) {
    if !valid(*value) {
        tracing::warn!(
            field,
            value = ?*value,
            default = ?default,
            "Invalid config value, using default"
        );
        *value = default;
    }
}

fn non_negative(v: f32) -> bool {
    v.is_finite() && v >= 0.0
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

fn probability(v: f32) -> bool {
    v.is_finite() && (0.0..=1.0).contains(&v)
}

fn tick_rate(v: f32) -> bool {
    positive(v) && v <= MAX_TICK_RATE_HZ
}

impl WordsmithConfig {
    /// Validate configuration, logging a warning and falling back to the
    /// default for every out-of-range value.
    pub fn validated(mut self) -> Self {
        let d = PhysicsConfig::default();
        let p = &mut self.physics;
        check("physics.gravity", &mut p.gravity, d.gravity, non_negative);
        check("physics.move_speed", &mut p.move_speed, d.move_speed, non_negative);
        check("physics.jump_velocity", &mut p.jump_velocity, d.jump_velocity, non_negative);
        // A factor outside [0, 1] would flip or grow the velocity.
        check("physics.friction", &mut p.friction, d.friction, probability);
        check("physics.player_width", &mut p.player_width, d.player_width, positive);
        check("physics.player_height", &mut p.player_height, d.player_height, positive);
        check("physics.stomp_tolerance", &mut p.stomp_tolerance, d.stomp_tolerance, non_negative);
        check("physics.stomp_bounce", &mut p.stomp_bounce, d.stomp_bounce, non_negative);

        let d = SessionConfig::default();
        let s = &mut self.session;
        check("session.lives", &mut s.lives, d.lives, |lives| lives > 0);
        check("session.tick_rate_hz", &mut s.tick_rate_hz, d.tick_rate_hz, tick_rate);

        let d = MessageConfig::default();
        let m = &mut self.messages;
        check(
            "messages.self_doubt_chance",
            &mut m.self_doubt_chance,
            d.self_doubt_chance,
            probability,
        );
        check(
            "messages.obstacle_speech_chance",
            &mut m.obstacle_speech_chance,
            d.obstacle_speech_chance,
            probability,
        );
        self
    }
}
