use wordsmith_platformer::messages::{GAME_OVER_TEXT, VICTORY_TEXT};
use wordsmith_platformer::{GameEvent, WordsmithGame};

/// The two on-screen counters plus the end-of-session panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudState {
    pub words_collected: usize,
    pub words_total: usize,
    pub lives: u8,
    /// Shown once the session ends, cleared by restart.
    pub end_message: Option<&'static str>,
}

impl HudState {
    pub fn new(game: &WordsmithGame) -> Self {
        let mut hud = Self {
            words_collected: 0,
            words_total: 0,
            lives: 0,
            end_message: None,
        };
        hud.sync(game);
        hud
    }

    /// Re-read every field from the session.
    pub fn sync(&mut self, game: &WordsmithGame) {
        let state = game.state();
        self.words_collected = state.session.items_collected;
        self.words_total = state.items.len();
        self.lives = state.session.lives;
        self.end_message = game.end_message();
    }

    /// Fold a tick's events into the counters.
    pub fn apply_events(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::ItemCollected {
                    collected, total, ..
                } => {
                    self.words_collected = *collected;
                    self.words_total = *total;
                },
                GameEvent::LifeLost { lives, .. } => self.lives = *lives,
                GameEvent::GameOver => self.end_message = Some(GAME_OVER_TEXT),
                GameEvent::Victory => self.end_message = Some(VICTORY_TEXT),
                _ => {},
            }
        }
    }

    pub fn words_label(&self) -> String {
        format!("Words: {}/{}", self.words_collected, self.words_total)
    }

    pub fn lives_label(&self) -> String {
        format!("Lives: {}", self.lives)
    }
}
