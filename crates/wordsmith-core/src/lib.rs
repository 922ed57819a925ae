pub mod arena;
pub mod game_trait;
pub mod geometry;
pub mod random;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game_trait::Game;
    use crate::random::RandomSource;

    /// Random source that replays a fixed cycle of samples.
    ///
    /// Values are clamped into `[0, 1)` so scripted sequences can use `1.0`
    /// to mean "as high as possible".
    pub struct ScriptedRandom {
        values: Vec<f32>,
        cursor: usize,
    }

    impl ScriptedRandom {
        pub fn new(values: &[f32]) -> Self {
            assert!(!values.is_empty(), "ScriptedRandom needs at least one value");
            Self {
                values: values.to_vec(),
                cursor: 0,
            }
        }

        /// A source that always returns the same sample.
        pub fn constant(value: f32) -> Self {
            Self::new(&[value])
        }

        /// Number of samples drawn so far.
        pub fn draws(&self) -> usize {
            self.cursor
        }
    }

    impl RandomSource for ScriptedRandom {
        fn next_f32(&mut self) -> f32 {
            let v = self.values[self.cursor % self.values.len()];
            self.cursor += 1;
            v.clamp(0.0, 1.0 - f32::EPSILON)
        }
    }

    /// Run N game ticks with the given input, returning all accumulated events.
    pub fn run_game_ticks<G: Game>(game: &mut G, input: &G::Input, n: usize) -> Vec<G::Event> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(input));
        }
        all_events
    }

    /// Assert that the game's serialized state differs from `before`.
    pub fn assert_game_state_changed<G: Game>(game: &G, before: &[u8]) {
        let after = game.serialize_state();
        assert_ne!(
            before,
            &after[..],
            "Game state should have changed after operation"
        );
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Generic checks every `Game` implementation must pass. Game crates
    // call them from their own #[cfg(test)] modules.

    /// After restart(), serialize_state() must return non-empty bytes.
    pub fn contract_restart_creates_state<G: Game>(game: &mut G) {
        game.restart();
        assert!(
            !game.serialize_state().is_empty(),
            "serialize_state() must return non-empty bytes after restart"
        );
        assert!(
            !game.is_session_over(),
            "a freshly restarted session must not be over"
        );
    }

    /// update() must advance the simulation.
    pub fn contract_update_advances_state<G: Game>(game: &mut G, input: &G::Input) {
        let before = game.serialize_state();
        game.update(input);
        assert_game_state_changed(game, &before);
    }

    /// pause() must freeze state, resume() must unfreeze it.
    pub fn contract_pause_stops_updates<G: Game>(game: &mut G, input: &G::Input) {
        game.pause();
        let before = game.serialize_state();
        game.update(input);
        let during_pause = game.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");

        game.resume();
        game.update(input);
        let after_resume = game.serialize_state();
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }

    /// serialize_state → apply_state must be stable after one roundtrip.
    pub fn contract_state_roundtrip_preserves<G: Game>(game: &mut G) {
        let state_a = game.serialize_state();
        game.apply_state(&state_a);
        let state_b = game.serialize_state();
        assert_eq!(
            state_a, state_b,
            "State must be stable after serialize→apply→serialize roundtrip"
        );
    }

    /// Garbage snapshot bytes must be ignored, not applied.
    pub fn contract_garbage_state_ignored<G: Game>(game: &mut G) {
        let before = game.serialize_state();
        game.apply_state(&[0xFF, 0xFE, 0x00, 0x01, 0xAB, 0xCD]);
        assert_eq!(
            before,
            game.serialize_state(),
            "Garbage state must leave the game unchanged"
        );
    }

    /// Once over, the session must stay over (and frozen) until restart.
    pub fn contract_terminal_is_sticky<G: Game>(game: &mut G, input: &G::Input, ticks: usize) {
        assert!(game.is_session_over(), "precondition: session must be over");
        let before = game.serialize_state();
        run_game_ticks(game, input, ticks);
        assert!(game.is_session_over(), "terminal phase must persist");
        assert_eq!(
            before,
            game.serialize_state(),
            "no simulation may run after the session is over"
        );
        game.restart();
        assert!(!game.is_session_over(), "restart must leave the terminal phase");
    }
}

#[cfg(test)]
mod tests {
    use super::random::RandomSource;
    use super::test_helpers::ScriptedRandom;

    #[test]
    fn scripted_random_cycles() {
        let mut rng = ScriptedRandom::new(&[0.1, 0.2]);
        assert_eq!(rng.next_f32(), 0.1);
        assert_eq!(rng.next_f32(), 0.2);
        assert_eq!(rng.next_f32(), 0.1);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn scripted_random_clamps_to_unit_interval() {
        let mut rng = ScriptedRandom::new(&[1.0, -3.0]);
        assert!(rng.next_f32() < 1.0);
        assert_eq!(rng.next_f32(), 0.0);
        assert_eq!(rng.index(4), 3);
    }
}
