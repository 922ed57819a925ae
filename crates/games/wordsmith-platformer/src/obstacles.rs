use serde::{Deserialize, Serialize};

use wordsmith_core::arena::{Arena, Id};
use wordsmith_core::geometry::Rect;
use wordsmith_core::random::RandomSource;

use crate::config::MessageConfig;
use crate::level::{Level, PlatformId};
use crate::messages::{AGENT_MESSAGES, Callout};

pub const OBSTACLE_SIZE: f32 = 25.0;
/// Obstacles spawn this far left of their platform's right edge.
pub const OBSTACLE_INSET: f32 = 40.0;
/// Patrol speed is drawn uniformly from `[-MAX_PATROL_SPEED, MAX_PATROL_SPEED)`.
const MAX_PATROL_SPEED: f32 = 1.0;

/// A patrolling agent. Defeated for good once stomped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Obstacle {
    pub rect: Rect,
    pub vx: f32,
    /// Platform whose span bounds the patrol.
    pub platform: PlatformId,
    pub defeated: bool,
    pub message: String,
    pub speech: Callout,
}

pub type ObstacleId = Id<Obstacle>;

impl Obstacle {
    /// Advance along the platform, reversing at either edge of `span`.
    pub fn patrol(&mut self, span: &Rect) {
        self.rect.x += self.vx;
        if self.rect.x <= span.x || self.rect.right() >= span.right() {
            self.vx = -self.vx;
        }
    }

    /// Maybe start talking, then count the speech timer down.
    /// Returns `true` when a new message was revealed this tick.
    pub fn update_speech(&mut self, rng: &mut dyn RandomSource, cfg: &MessageConfig) -> bool {
        let mut spoke = false;
        if !self.speech.visible && rng.chance(cfg.obstacle_speech_chance) {
            self.speech.show(cfg.obstacle_speech_ticks);
            spoke = self.speech.visible;
        }
        self.speech.tick();
        spoke
    }
}

/// Place `count` obstacles near the right end of random eligible platforms,
/// each with a random patrol speed and catchphrase.
pub fn generate_obstacles(
    level: &Level,
    count: usize,
    rng: &mut dyn RandomSource,
) -> Arena<Obstacle> {
    let eligible = level.eligible_platforms();
    let mut obstacles = Arena::with_capacity(count);
    for _ in 0..count {
        let platform_id = eligible[rng.index(eligible.len())];
        let Some(platform) = level.platform(platform_id) else {
            continue;
        };
        let vx = rng.range(-MAX_PATROL_SPEED, MAX_PATROL_SPEED);
        let message = AGENT_MESSAGES[rng.index(AGENT_MESSAGES.len())];
        obstacles.push(Obstacle {
            rect: Rect::new(
                platform.rect.right() - OBSTACLE_INSET,
                platform.rect.y - OBSTACLE_SIZE,
                OBSTACLE_SIZE,
                OBSTACLE_SIZE,
            ),
            vx,
            platform: platform_id,
            defeated: false,
            message: message.to_string(),
            speech: Callout::default(),
        });
    }
    obstacles
}
