use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio_util::sync::CancellationToken;

use wordsmith_core::game_trait::Game;
use wordsmith_platformer::{GameEvent, WordsmithGame};

use crate::error::ClientError;
use crate::hud::HudState;
use crate::input::InputState;
use crate::render::{draw_hud, sync_scene};
use crate::scene::Scene;
use crate::theme::Theme;

/// Events queued by the host and consumed at tick boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    KeyDown(String),
    KeyUp(String),
    Restart,
    Quit,
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Quit,
    Cancelled,
    /// Every host event sender was dropped.
    Disconnected,
}

/// Display surface that receives one finished scene per frame.
pub trait FrameSink {
    fn present(&mut self, scene: &Scene) -> Result<(), ClientError>;
}

/// A session plus everything the host needs to drive and draw it.
pub struct Client {
    game: WordsmithGame,
    input: InputState,
    scene: Scene,
    hud: HudState,
    theme: Theme,
}

impl Client {
    pub fn new(game: WordsmithGame, theme: Theme) -> Self {
        let hud = HudState::new(&game);
        let mut client = Self {
            game,
            input: InputState::new(),
            scene: Scene::new(),
            hud,
            theme,
        };
        client.redraw();
        client
    }

    pub fn game(&self) -> &WordsmithGame {
        &self.game
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn hud(&self) -> &HudState {
        &self.hud
    }

    /// Apply a host event. Returns `false` when the host asked to quit.
    pub fn handle_event(&mut self, event: HostEvent) -> bool {
        match event {
            HostEvent::KeyDown(code) => self.input.on_key_down(&code),
            HostEvent::KeyUp(code) => self.input.on_key_up(&code),
            HostEvent::Restart => {
                self.game.restart();
                self.input.clear();
                self.hud.sync(&self.game);
                self.redraw();
            },
            HostEvent::Quit => return false,
        }
        true
    }

    /// One frame: sample input, run one tick, rebuild the scene.
    pub fn step_frame(&mut self) -> Vec<GameEvent> {
        let input = self.input.player_input();
        let events = self.game.update(&input);
        self.hud.apply_events(&events);
        self.redraw();
        events
    }

    fn redraw(&mut self) {
        sync_scene(&mut self.scene, &self.game, &self.theme);
        draw_hud(&mut self.scene, &self.hud, self.game.level(), &self.theme);
    }
}

/// Drive the client at the game's tick rate until quit, cancellation, or
/// the host event channel closes.
pub async fn run_game_loop<S: FrameSink>(
    client: &mut Client,
    sink: &mut S,
    mut host_rx: mpsc::UnboundedReceiver<HostEvent>,
    cancel: CancellationToken,
) -> Result<LoopExit, ClientError> {
    let tick_interval = Duration::from_secs_f32(1.0 / client.game.tick_rate());
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    tracing::info!(tick_rate = client.game.tick_rate(), "Game loop started");

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(LoopExit::Cancelled),
            _ = interval.tick() => {
                loop {
                    match host_rx.try_recv() {
                        Ok(event) => {
                            if !client.handle_event(event) {
                                return Ok(LoopExit::Quit);
                            }
                        },
                        Err(TryRecvError::Empty) => break,
                        Err(TryRecvError::Disconnected) => return Ok(LoopExit::Disconnected),
                    }
                }

                for event in client.step_frame() {
                    tracing::trace!(?event, "Game event");
                }
                if let Err(e) = sink.present(&client.scene) {
                    tracing::error!(error = %e, "Failed to present frame");
                    return Err(e);
                }
            }
        }
    }
}
