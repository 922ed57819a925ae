use std::collections::HashSet;

use wordsmith_platformer::physics::PlayerInput;

/// Key identifiers that move the player left.
pub const LEFT_KEYS: &[&str] = &["arrowleft", "a"];
/// Key identifiers that move the player right.
pub const RIGHT_KEYS: &[&str] = &["arrowright", "d"];
/// Key identifiers that jump.
pub const JUMP_KEYS: &[&str] = &["arrowup", "w", " "];

/// Held-key state, updated from host key events and sampled once per tick.
///
/// Identifiers are lower-cased on the way in, so `"ArrowLeft"` and
/// `"arrowleft"` refer to the same key.
#[derive(Debug, Default)]
pub struct InputState {
    keys_down: HashSet<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a key as held. Repeats are idempotent.
    pub fn on_key_down(&mut self, code: &str) {
        self.keys_down.insert(code.to_lowercase());
    }

    pub fn on_key_up(&mut self, code: &str) {
        self.keys_down.remove(&code.to_lowercase());
    }

    pub fn is_key_down(&self, code: &str) -> bool {
        self.keys_down.contains(&code.to_lowercase())
    }

    fn any_down(&self, codes: &[&str]) -> bool {
        codes.iter().any(|c| self.keys_down.contains(*c))
    }

    /// Release everything, e.g. after a restart.
    pub fn clear(&mut self) {
        self.keys_down.clear();
    }

    /// Snapshot the held keys as simulation input.
    pub fn player_input(&self) -> PlayerInput {
        PlayerInput {
            left: self.any_down(LEFT_KEYS),
            right: self.any_down(RIGHT_KEYS),
            jump: self.any_down(JUMP_KEYS),
        }
    }
}
