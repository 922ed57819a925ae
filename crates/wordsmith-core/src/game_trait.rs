use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Core trait for a single-screen, frame-driven game session.
///
/// The driver owns input sampling, rendering, and frame pacing;
/// the game only handles its own simulation and session lifecycle.
pub trait Game {
    /// Per-tick input snapshot consumed by `update`.
    type Input;
    /// Events emitted by `update` (collection, life loss, session end).
    type Event;

    /// Descriptive metadata for title bars and logs.
    fn metadata(&self) -> GameMetadata;

    /// Simulation tick rate in Hz. One tick runs per display frame.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Reinitialize the whole session: fresh entities, fresh randomized
    /// placements, full lives.
    fn restart(&mut self);

    /// Advance the simulation by one tick. Returns the events produced.
    fn update(&mut self, input: &Self::Input) -> Vec<Self::Event>;

    /// Serialize the full session state as a snapshot.
    fn serialize_state(&self) -> Vec<u8>;

    /// Replace the session state with a previously taken snapshot.
    fn apply_state(&mut self, state: &[u8]);

    /// Freeze the simulation. `update` becomes a no-op until `resume`.
    fn pause(&mut self);

    /// Unfreeze the simulation.
    fn resume(&mut self);

    /// Whether the session has reached a terminal phase.
    fn is_session_over(&self) -> bool;
}

/// Game metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub estimated_session_duration: Duration,
}

/// Generates the snapshot and pause methods that are identical across games:
/// `serialize_state`, `apply_state`, `pause`, `resume`.
///
/// Requires the implementing struct to have `state: $StateType` and `paused: bool` fields.
#[macro_export]
macro_rules! game_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            rmp_serde::to_vec(&self.state).expect("game state serialization must succeed")
        }

        fn apply_state(&mut self, state: &[u8]) {
            if let Ok(s) = rmp_serde::from_slice::<$StateType>(state) {
                self.state = s;
            }
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }
    };
}
