use serde::{Deserialize, Serialize};

/// Doubts the author voices while collecting words.
pub const SELF_DOUBT_MESSAGES: &[&str] = &[
    "Can I really write this?",
    "Maybe I'm not good enough...",
    "What if nobody likes my story?",
    "Am I just fooling myself?",
    "These words feel so empty...",
    "I should probably give up...",
];

/// Corporate speak the patrolling agents spout.
pub const AGENT_MESSAGES: &[&str] = &[
    "We'll circle back on this",
    "Have you tried reworking it all?",
    "Let's take this offline",
    "We need to pivot your approach",
    "This isn't scalable",
    "We should ideate on this",
];

/// End-panel text when the last life is lost.
pub const GAME_OVER_TEXT: &str = "The story remains unfinished...";
/// End-panel text when the player walks through the unlocked door.
pub const VICTORY_TEXT: &str =
    "Congratulations! You found your confidence and completed your book!";

/// A timed speech callout: visible while its countdown runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callout {
    pub visible: bool,
    pub timer: u32,
}

impl Callout {
    pub fn show(&mut self, ticks: u32) {
        self.visible = ticks > 0;
        self.timer = ticks;
    }

    /// Count down one tick, hiding the callout when the timer runs out.
    pub fn tick(&mut self) {
        if !self.visible {
            return;
        }
        self.timer = self.timer.saturating_sub(1);
        if self.timer == 0 {
            self.visible = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callout_counts_down_and_hides() {
        let mut callout = Callout::default();
        callout.show(3);
        assert!(callout.visible);
        callout.tick();
        callout.tick();
        assert!(callout.visible);
        assert_eq!(callout.timer, 1);
        callout.tick();
        assert!(!callout.visible);
        assert_eq!(callout.timer, 0);
    }

    #[test]
    fn hidden_callout_tick_is_noop() {
        let mut callout = Callout::default();
        callout.tick();
        assert_eq!(callout, Callout::default());
    }

    #[test]
    fn zero_duration_never_shows() {
        let mut callout = Callout::default();
        callout.show(0);
        assert!(!callout.visible);
    }

    #[test]
    fn message_lists_are_not_empty() {
        assert_eq!(SELF_DOUBT_MESSAGES.len(), 6);
        assert_eq!(AGENT_MESSAGES.len(), 6);
    }
}
