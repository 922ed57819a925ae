pub mod config;
pub mod items;
pub mod level;
pub mod messages;
pub mod obstacles;
pub mod physics;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use wordsmith_core::arena::Arena;
use wordsmith_core::game_boilerplate;
use wordsmith_core::game_trait::{Game, GameMetadata};
use wordsmith_core::geometry::Rect;
use wordsmith_core::random::{RandomSource, SeededRandom};

use config::{MessageConfig, SelfDoubtTrigger, WordsmithConfig};
use items::{Item, ItemId, generate_items, widest_item};
use level::{Level, LevelError, LevelLayout};
use messages::{Callout, GAME_OVER_TEXT, SELF_DOUBT_MESSAGES, VICTORY_TEXT};
use obstacles::{OBSTACLE_INSET, Obstacle, ObstacleId, generate_obstacles};
use physics::{PlayerInput, PlayerState, tick_player};

/// Session phase. Exactly one holds at any time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Running,
    GameOver,
    Victory,
}

/// The exit. Unlocks once every item is collected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub rect: Rect,
    pub unlocked: bool,
}

/// Session-wide counters, phase and the author's self-doubt callout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: Phase,
    pub lives: u8,
    pub items_collected: usize,
    pub self_doubt: Callout,
    pub self_doubt_text: String,
    /// Ticks simulated since the last restart.
    pub tick: u64,
}

/// Everything that changes during a session. Serializable as a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordsmithState {
    pub player: PlayerState,
    pub items: Arena<Item>,
    pub obstacles: Arena<Obstacle>,
    pub door: Door,
    pub session: SessionState,
}

/// Why a life was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeLossCause {
    Fell,
    Obstacle,
}

/// Events emitted by a tick, in the order they happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ItemCollected {
        item: ItemId,
        word: String,
        collected: usize,
        total: usize,
    },
    DoorUnlocked,
    LifeLost {
        cause: LifeLossCause,
        lives: u8,
    },
    ObstacleDefeated {
        obstacle: ObstacleId,
    },
    SelfDoubt {
        text: String,
    },
    ObstacleSpoke {
        obstacle: ObstacleId,
    },
    GameOver,
    Victory,
}

/// The word-collecting platformer.
pub struct WordsmithGame {
    config: WordsmithConfig,
    level: Level,
    state: WordsmithState,
    rng: Box<dyn RandomSource>,
    paused: bool,
}

impl WordsmithGame {
    /// Create a session on the standard level. Uses the configured seed, or
    /// OS entropy when none is set.
    pub fn new(config: WordsmithConfig) -> Result<Self, LevelError> {
        let rng: Box<dyn RandomSource> = match config.session.seed {
            Some(seed) => Box::new(SeededRandom::from_seed(seed)),
            None => Box::new(SeededRandom::from_entropy()),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(
        config: WordsmithConfig,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, LevelError> {
        Self::with_layout(config, LevelLayout::standard(), rng)
    }

    /// Create a session on an arbitrary layout. Fails if the layout cannot
    /// host the generated items and obstacles. Out-of-range tuning values
    /// are replaced with their defaults.
    pub fn with_layout(
        config: WordsmithConfig,
        layout: LevelLayout,
        mut rng: Box<dyn RandomSource>,
    ) -> Result<Self, LevelError> {
        let config = config.validated();
        let min_span = widest_item().max(OBSTACLE_INSET);
        let level = Level::new(layout, min_span, config.physics.player_width)?;
        let state = fresh_state(&config, &level, rng.as_mut());
        let game = Self {
            config,
            level,
            state,
            rng,
            paused: false,
        };
        game.log_session_start();
        Ok(game)
    }

    pub fn state(&self) -> &WordsmithState {
        &self.state
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn phase(&self) -> Phase {
        self.state.session.phase
    }

    /// End-panel text for a finished session.
    pub fn end_message(&self) -> Option<&'static str> {
        match self.state.session.phase {
            Phase::Running => None,
            Phase::GameOver => Some(GAME_OVER_TEXT),
            Phase::Victory => Some(VICTORY_TEXT),
        }
    }

    fn log_session_start(&self) {
        tracing::info!(
            items = self.state.items.len(),
            obstacles = self.state.obstacles.len(),
            lives = self.state.session.lives,
            "Session started"
        );
    }
}

/// Build a brand-new session: new player, newly randomized items and
/// obstacles, full lives, locked door.
fn fresh_state(
    config: &WordsmithConfig,
    level: &Level,
    rng: &mut dyn RandomSource,
) -> WordsmithState {
    let items = generate_items(level, config.session.item_count, rng);
    let obstacles = generate_obstacles(level, config.session.obstacle_count, rng);
    WordsmithState {
        player: PlayerState::new(level.spawn(), &config.physics),
        door: Door {
            rect: level.door(),
            // An item-less session has nothing left to collect.
            unlocked: items.is_empty(),
        },
        items,
        obstacles,
        session: SessionState {
            phase: Phase::Running,
            lives: config.session.lives,
            items_collected: 0,
            self_doubt: Callout::default(),
            self_doubt_text: String::new(),
            tick: 0,
        },
    }
}

/// Take a life. Returns `true` when that was the last one.
fn lose_life(
    player: &mut PlayerState,
    session: &mut SessionState,
    spawn: (f32, f32),
    cause: LifeLossCause,
    events: &mut Vec<GameEvent>,
) -> bool {
    session.lives = session.lives.saturating_sub(1);
    events.push(GameEvent::LifeLost {
        cause,
        lives: session.lives,
    });
    if session.lives == 0 {
        session.phase = Phase::GameOver;
        events.push(GameEvent::GameOver);
        tracing::info!(tick = session.tick, ?cause, "Game over");
        return true;
    }
    tracing::debug!(lives = session.lives, ?cause, "Life lost, respawning");
    player.respawn(spawn);
    false
}

fn roll_self_doubt(
    session: &mut SessionState,
    rng: &mut dyn RandomSource,
    cfg: &MessageConfig,
    events: &mut Vec<GameEvent>,
) {
    if session.self_doubt.visible || !rng.chance(cfg.self_doubt_chance) {
        return;
    }
    let text = SELF_DOUBT_MESSAGES[rng.index(SELF_DOUBT_MESSAGES.len())];
    session.self_doubt.show(cfg.self_doubt_ticks);
    session.self_doubt_text = text.to_string();
    events.push(GameEvent::SelfDoubt {
        text: text.to_string(),
    });
}

impl Game for WordsmithGame {
    type Input = PlayerInput;
    type Event = GameEvent;

    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Wordsmith".to_string(),
            description: "Collect every word, dodge the agents, and finish your book.".to_string(),
            estimated_session_duration: Duration::from_secs(180),
        }
    }

    fn tick_rate(&self) -> f32 {
        self.config.session.tick_rate_hz
    }

    fn restart(&mut self) {
        self.state = fresh_state(&self.config, &self.level, self.rng.as_mut());
        self.paused = false;
        self.log_session_start();
    }

    fn update(&mut self, input: &PlayerInput) -> Vec<GameEvent> {
        if self.paused || self.state.session.phase != Phase::Running {
            return Vec::new();
        }

        let Self {
            config,
            level,
            state,
            rng,
            ..
        } = self;
        let rng: &mut dyn RandomSource = rng.as_mut();
        let spawn = level.spawn();
        let mut events = Vec::new();
        state.session.tick += 1;

        tick_player(&mut state.player, input, level, &config.physics);

        if state.player.fell_out(level)
            && lose_life(
                &mut state.player,
                &mut state.session,
                spawn,
                LifeLossCause::Fell,
                &mut events,
            )
        {
            return events;
        }

        // Item collection. The counter mirrors the flags even if they were
        // set from outside.
        let total = state.items.len();
        state.session.items_collected = state.items.values().filter(|i| i.collected).count();
        let player_rect = state.player.rect();
        for (id, item) in state.items.iter_mut() {
            if item.collected || !player_rect.overlaps(&item.rect) {
                continue;
            }
            item.collected = true;
            state.session.items_collected += 1;
            events.push(GameEvent::ItemCollected {
                item: id,
                word: item.word.clone(),
                collected: state.session.items_collected,
                total,
            });
            if config.messages.self_doubt_trigger == SelfDoubtTrigger::OnCollect {
                roll_self_doubt(&mut state.session, rng, &config.messages, &mut events);
            }
        }
        if !state.door.unlocked && state.session.items_collected == total {
            state.door.unlocked = true;
            events.push(GameEvent::DoorUnlocked);
            tracing::debug!(tick = state.session.tick, "Door unlocked");
        }
        if config.messages.self_doubt_trigger == SelfDoubtTrigger::EveryTick {
            roll_self_doubt(&mut state.session, rng, &config.messages, &mut events);
        }

        // Obstacles: patrol, chatter, then contact with the player.
        for (id, obstacle) in state.obstacles.iter_mut() {
            if obstacle.defeated {
                continue;
            }
            if let Some(platform) = level.platform(obstacle.platform) {
                obstacle.patrol(&platform.rect);
            }
            if obstacle.update_speech(rng, &config.messages) {
                events.push(GameEvent::ObstacleSpoke { obstacle: id });
            }

            if !state.player.rect().overlaps(&obstacle.rect) {
                continue;
            }
            if state.player.is_stomping(&obstacle.rect, &config.physics) {
                obstacle.defeated = true;
                state.player.bounce(&config.physics);
                events.push(GameEvent::ObstacleDefeated { obstacle: id });
                tracing::debug!(obstacle = %id, "Obstacle stomped");
            } else if lose_life(
                &mut state.player,
                &mut state.session,
                spawn,
                LifeLossCause::Obstacle,
                &mut events,
            ) {
                return events;
            }
        }

        if state.door.unlocked && state.player.rect().overlaps(&state.door.rect) {
            state.session.phase = Phase::Victory;
            events.push(GameEvent::Victory);
            tracing::info!(tick = state.session.tick, lives = state.session.lives, "Victory");
            return events;
        }

        state.session.self_doubt.tick();

        events
    }

    game_boilerplate!(state_type: WordsmithState);

    fn is_session_over(&self) -> bool {
        self.state.session.phase != Phase::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordsmith_core::test_helpers::{self, ScriptedRandom, run_game_ticks};

    fn seeded_config(seed: u64) -> WordsmithConfig {
        let mut config = WordsmithConfig::default();
        config.session.seed = Some(seed);
        config
    }

    fn game() -> WordsmithGame {
        WordsmithGame::new(seeded_config(42)).unwrap()
    }

    /// A session with every obstacle out of the way and no chatter.
    fn quiet_game() -> WordsmithGame {
        let mut config = seeded_config(42);
        config.messages.self_doubt_chance = 0.0;
        config.messages.obstacle_speech_chance = 0.0;
        let mut game = WordsmithGame::new(config).unwrap();
        for (_, o) in game.state.obstacles.iter_mut() {
            o.defeated = true;
        }
        game
    }

    /// Move obstacle 0 to a fixed mid-air spot, standing still, and revive it.
    fn pin_first_obstacle(game: &mut WordsmithGame, x: f32, y: f32) -> ObstacleId {
        let (id, o) = game.state.obstacles.iter_mut().next().unwrap();
        o.rect.x = x;
        o.rect.y = y;
        o.vx = 0.0;
        o.defeated = false;
        id
    }

    fn idle() -> PlayerInput {
        PlayerInput::default()
    }

    #[test]
    fn restart_creates_full_session() {
        let game = game();
        assert_eq!(game.phase(), Phase::Running);
        assert_eq!(game.state.session.lives, 3);
        assert_eq!(game.state.session.items_collected, 0);
        assert!(!game.state.door.unlocked);
        assert_eq!(game.state.items.len(), 20);
        assert_eq!(game.state.obstacles.len(), 3);
        assert_eq!((game.state.player.x, game.state.player.y), (50.0, 300.0));
        assert!(game.end_message().is_none());
    }

    #[test]
    fn idle_player_settles_on_ground() {
        let mut game = quiet_game();
        let events = run_game_ticks(&mut game, &idle(), 120);
        assert!(events.is_empty(), "unexpected events: {events:?}");
        assert!(game.state.player.grounded);
        assert_eq!(game.state.player.y, 340.0);
        assert_eq!(game.state.session.lives, 3);
    }

    #[test]
    fn falling_off_screen_costs_a_life_and_respawns() {
        let mut game = quiet_game();
        game.state.player.y = 401.0;
        let events = game.update(&idle());
        assert_eq!(
            events,
            vec![GameEvent::LifeLost {
                cause: LifeLossCause::Fell,
                lives: 2
            }]
        );
        assert_eq!(game.state.session.lives, 2);
        assert_eq!(game.phase(), Phase::Running);
        let p = &game.state.player;
        assert_eq!((p.x, p.y, p.vx, p.vy), (50.0, 300.0, 0.0, 0.0));
    }

    #[test]
    fn falling_with_last_life_is_game_over() {
        let mut game = quiet_game();
        game.state.session.lives = 1;
        game.state.player.y = 450.0;
        let events = game.update(&idle());
        assert_eq!(game.state.session.lives, 0);
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.end_message(), Some("The story remains unfinished..."));
        assert!(events.contains(&GameEvent::GameOver));
        assert!(!events.contains(&GameEvent::Victory));
        assert!(game.is_session_over());
    }

    #[test]
    fn overlapping_an_item_collects_it() {
        let mut game = quiet_game();
        let (target, rect) = game
            .state
            .items
            .iter()
            .map(|(id, i)| (id, i.rect))
            .next()
            .unwrap();
        game.state.player.x = rect.x;
        game.state.player.y = rect.y;

        let events = game.update(&idle());

        assert!(game.state.items.get(target).unwrap().collected);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::ItemCollected { item, word, total: 20, .. }
                if *item == target && word == "the"
        )));
        let flagged = game.state.items.values().filter(|i| i.collected).count();
        assert!(flagged >= 1);
        assert_eq!(game.state.session.items_collected, flagged);
    }

    #[test]
    fn collection_event_reports_count_of_flagged_items() {
        let mut game = quiet_game();
        let first = game.state.items.values().next().unwrap().rect;
        // Flagged outside the tick, as a restored snapshot would be.
        let (_, last) = game.state.items.iter_mut().last().unwrap();
        last.collected = true;
        game.state.player.x = first.x;
        game.state.player.y = first.y;

        let events = game.update(&idle());

        let reported = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ItemCollected { collected, .. } => Some(*collected),
                _ => None,
            })
            .last()
            .unwrap();
        assert!(reported >= 2);
        assert_eq!(reported, game.state.session.items_collected);
    }

    #[test]
    fn collected_item_is_not_counted_twice() {
        let mut game = quiet_game();
        let rect = game.state.items.values().next().unwrap().rect;
        game.state.player.x = rect.x;
        game.state.player.y = rect.y;
        game.update(&idle());
        let after_first = game.state.session.items_collected;
        for _ in 0..30 {
            let events = game.update(&idle());
            assert!(
                !events
                    .iter()
                    .any(|e| matches!(e, GameEvent::ItemCollected { .. }))
            );
        }
        assert_eq!(game.state.session.items_collected, after_first);
    }

    #[test]
    fn door_unlocks_once_all_items_are_collected() {
        let mut game = quiet_game();
        assert!(!game.state.door.unlocked);
        for (_, item) in game.state.items.iter_mut() {
            item.collected = true;
        }
        let events = game.update(&idle());
        assert!(game.state.door.unlocked);
        assert_eq!(game.state.session.items_collected, 20);
        assert_eq!(
            events.iter().filter(|e| **e == GameEvent::DoorUnlocked).count(),
            1
        );

        // Never re-locks.
        for _ in 0..30 {
            let events = game.update(&idle());
            assert!(!events.contains(&GameEvent::DoorUnlocked));
            assert!(game.state.door.unlocked);
        }
    }

    #[test]
    fn door_stays_locked_with_one_item_left() {
        let mut game = quiet_game();
        for (_, item) in game.state.items.iter_mut().skip(1) {
            item.collected = true;
        }
        game.update(&idle());
        assert!(!game.state.door.unlocked);
        assert_eq!(game.state.session.items_collected, 19);
    }

    #[test]
    fn unlocked_door_triggers_victory() {
        let mut game = quiet_game();
        game.state.door.unlocked = true;
        game.state.player.x = 725.0;
        game.state.player.y = 340.0;
        let events = game.update(&idle());
        assert_eq!(game.phase(), Phase::Victory);
        assert!(events.contains(&GameEvent::Victory));
        assert_eq!(
            game.end_message(),
            Some("Congratulations! You found your confidence and completed your book!")
        );
    }

    #[test]
    fn locked_door_is_ignored() {
        let mut game = quiet_game();
        game.state.player.x = 725.0;
        game.state.player.y = 340.0;
        run_game_ticks(&mut game, &idle(), 10);
        assert_eq!(game.phase(), Phase::Running);
    }

    #[test]
    fn stomping_defeats_obstacle_and_bounces() {
        let mut game = quiet_game();
        let id = pin_first_obstacle(&mut game, 400.0, 200.0);
        game.state.player.x = 398.0;
        game.state.player.y = 170.0;
        game.state.player.vy = 2.0;

        let events = game.update(&idle());

        assert!(game.state.obstacles.get(id).unwrap().defeated);
        assert!(events.contains(&GameEvent::ObstacleDefeated { obstacle: id }));
        assert_eq!(game.state.player.vy, -8.0);
        assert_eq!(game.state.session.lives, 3);
    }

    #[test]
    fn side_contact_with_obstacle_costs_a_life() {
        let mut game = quiet_game();
        let id = pin_first_obstacle(&mut game, 400.0, 200.0);
        game.state.player.x = 390.0;
        game.state.player.y = 210.0;

        let events = game.update(&idle());

        assert!(!game.state.obstacles.get(id).unwrap().defeated);
        assert!(events.contains(&GameEvent::LifeLost {
            cause: LifeLossCause::Obstacle,
            lives: 2
        }));
        assert_eq!((game.state.player.x, game.state.player.y), (50.0, 300.0));
    }

    #[test]
    fn rising_into_obstacle_is_damage_not_stomp() {
        let mut game = quiet_game();
        let id = pin_first_obstacle(&mut game, 400.0, 200.0);
        game.state.player.x = 398.0;
        game.state.player.y = 190.0;
        game.state.player.vy = -4.0;

        game.update(&idle());

        assert!(!game.state.obstacles.get(id).unwrap().defeated);
        assert_eq!(game.state.session.lives, 2);
    }

    #[test]
    fn defeated_obstacle_is_harmless_and_stays_defeated() {
        let mut game = quiet_game();
        let id = pin_first_obstacle(&mut game, 400.0, 200.0);
        game.state.obstacles.get_mut(id).unwrap().defeated = true;
        game.state.player.x = 390.0;
        game.state.player.y = 210.0;
        for _ in 0..10 {
            game.update(&idle());
            assert!(game.state.obstacles.get(id).unwrap().defeated);
        }
        assert_eq!(game.state.session.lives, 3);
    }

    #[test]
    fn obstacle_damage_with_last_life_is_game_over() {
        let mut game = quiet_game();
        pin_first_obstacle(&mut game, 400.0, 200.0);
        game.state.session.lives = 1;
        game.state.player.x = 390.0;
        game.state.player.y = 210.0;
        let events = game.update(&idle());
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(events.last(), Some(&GameEvent::GameOver));
    }

    #[test]
    fn only_one_terminal_transition_per_tick() {
        // Last life lost to an obstacle while also standing in the open door.
        let mut game = quiet_game();
        game.state.door.unlocked = true;
        game.state.session.lives = 1;
        pin_first_obstacle(&mut game, 730.0, 350.0);
        game.state.player.x = 725.0;
        game.state.player.y = 340.0;

        let events = game.update(&idle());

        assert_eq!(game.phase(), Phase::GameOver);
        assert!(events.contains(&GameEvent::GameOver));
        assert!(!events.contains(&GameEvent::Victory));
    }

    #[test]
    fn terminal_phase_is_sticky_until_restart() {
        let mut game = quiet_game();
        game.state.session.lives = 1;
        game.state.player.y = 450.0;
        game.update(&idle());
        test_helpers::contract_terminal_is_sticky(
            &mut game,
            &PlayerInput {
                right: true,
                jump: true,
                ..Default::default()
            },
            50,
        );
        assert_eq!(game.phase(), Phase::Running);
    }

    #[test]
    fn restart_regenerates_content() {
        let mut game = game();
        let rects_before: Vec<Rect> = game.state.items.values().map(|i| i.rect).collect();
        let obstacles_before: Vec<(Rect, f32)> =
            game.state.obstacles.values().map(|o| (o.rect, o.vx)).collect();

        game.state.session.lives = 1;
        game.state.player.y = 450.0;
        game.update(&idle());
        assert_eq!(game.phase(), Phase::GameOver);

        game.restart();

        let rects_after: Vec<Rect> = game.state.items.values().map(|i| i.rect).collect();
        let obstacles_after: Vec<(Rect, f32)> =
            game.state.obstacles.values().map(|o| (o.rect, o.vx)).collect();
        assert_ne!(rects_before, rects_after, "items must be re-placed");
        assert_ne!(obstacles_before, obstacles_after, "obstacles must be re-rolled");
        assert_eq!(game.phase(), Phase::Running);
        assert_eq!(game.state.session.lives, 3);
        assert_eq!(game.state.session.items_collected, 0);
        assert!(!game.state.door.unlocked);
        assert!(game.state.items.values().all(|i| !i.collected));
        assert!(game.state.obstacles.values().all(|o| !o.defeated));
        assert_eq!(game.state.session.tick, 0);
    }

    #[test]
    fn self_doubt_rolls_on_collect() {
        let mut config = seeded_config(42);
        config.messages.self_doubt_chance = 1.0;
        config.messages.obstacle_speech_chance = 0.0;
        let mut game = WordsmithGame::new(config).unwrap();
        for (_, o) in game.state.obstacles.iter_mut() {
            o.defeated = true;
        }

        // No collection, no doubt.
        game.update(&idle());
        assert!(!game.state.session.self_doubt.visible);

        let rect = game.state.items.values().next().unwrap().rect;
        game.state.player.x = rect.x;
        game.state.player.y = rect.y;
        let events = game.update(&idle());

        let doubt = &game.state.session;
        assert!(doubt.self_doubt.visible);
        assert_eq!(doubt.self_doubt.timer, 179, "counted down at end of tick");
        assert!(SELF_DOUBT_MESSAGES.contains(&doubt.self_doubt_text.as_str()));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::SelfDoubt { .. }))
                .count(),
            1,
            "a visible message blocks further rolls"
        );
    }

    #[test]
    fn self_doubt_every_tick_trigger() {
        let mut config = seeded_config(42);
        config.messages.self_doubt_trigger = SelfDoubtTrigger::EveryTick;
        config.messages.self_doubt_chance = 1.0;
        config.messages.self_doubt_ticks = 3;
        config.messages.obstacle_speech_chance = 0.0;
        let mut game = WordsmithGame::new(config).unwrap();
        for (_, o) in game.state.obstacles.iter_mut() {
            o.defeated = true;
        }

        let events = game.update(&idle());
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::SelfDoubt { .. }))
        );
        assert!(game.state.session.self_doubt.visible);

        // Shown for three ticks in total, then a fresh roll on the next one.
        game.update(&idle());
        game.update(&idle());
        assert!(!game.state.session.self_doubt.visible);
        let events = game.update(&idle());
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::SelfDoubt { .. }))
        );
    }

    #[test]
    fn obstacles_chatter_when_roll_succeeds() {
        let mut config = seeded_config(42);
        config.messages.obstacle_speech_chance = 1.0;
        let mut game = WordsmithGame::new(config).unwrap();
        let events = game.update(&idle());
        let spoke = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ObstacleSpoke { .. }))
            .count();
        assert_eq!(spoke, 3);
        assert!(game.state.obstacles.values().all(|o| o.speech.visible));
    }

    #[test]
    fn scripted_rng_drives_placement() {
        let rng = Box::new(ScriptedRandom::constant(0.0));
        let game = WordsmithGame::with_rng(WordsmithConfig::default(), rng).unwrap();
        let first_platform = game.level.eligible_platforms()[0];
        assert!(game.state.obstacles.values().all(|o| o.platform == first_platform));
        assert!(game.state.items.values().all(|i| i.rect.x == 150.0));
    }

    #[test]
    fn layout_without_eligible_platform_fails_fast() {
        let mut layout = LevelLayout::standard();
        layout.platforms.truncate(1);
        let result = WordsmithGame::with_layout(
            WordsmithConfig::default(),
            layout,
            Box::new(SeededRandom::from_seed(1)),
        );
        assert!(matches!(result, Err(LevelError::NoEligiblePlatform { .. })));
    }

    #[test]
    fn empty_item_set_starts_unlocked() {
        let mut config = seeded_config(1);
        config.session.item_count = 0;
        let game = WordsmithGame::new(config).unwrap();
        assert!(game.state.door.unlocked);
    }

    #[test]
    fn invalid_tuning_is_replaced_at_construction() {
        let mut config = seeded_config(1);
        config.session.lives = 0;
        config.session.tick_rate_hz = 0.0;
        config.physics.friction = 1.5;
        let mut game = WordsmithGame::new(config).unwrap();

        assert_eq!(game.state.session.lives, 3);
        assert_eq!(game.tick_rate(), 60.0);
        assert_eq!(game.phase(), Phase::Running);

        game.state.player.vx = 10.0;
        game.state.player.grounded = true;
        game.update(&idle());
        assert!(game.state.player.vx > 0.0 && game.state.player.vx < 10.0);
    }

    #[test]
    fn metadata_and_tick_rate() {
        let game = game();
        assert_eq!(game.metadata().name, "Wordsmith");
        assert_eq!(game.tick_rate(), 60.0);
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================

    #[test]
    fn contract_restart_creates_state() {
        let mut game = game();
        test_helpers::contract_restart_creates_state(&mut game);
    }

    #[test]
    fn contract_update_advances_state() {
        let mut game = game();
        test_helpers::contract_update_advances_state(&mut game, &idle());
    }

    #[test]
    fn contract_pause_stops_updates() {
        let mut game = game();
        test_helpers::contract_pause_stops_updates(&mut game, &idle());
    }

    #[test]
    fn contract_state_roundtrip_preserves() {
        let mut game = game();
        run_game_ticks(&mut game, &idle(), 30);
        test_helpers::contract_state_roundtrip_preserves(&mut game);
    }

    #[test]
    fn contract_garbage_state_ignored() {
        let mut game = game();
        test_helpers::contract_garbage_state_ignored(&mut game);
    }

    #[test]
    fn truncated_state_is_ignored() {
        let mut game = game();
        let state = game.serialize_state();
        game.apply_state(&state[..state.len() / 2]);
        assert_eq!(game.state.items.len(), 20);
    }

    // ================================================================
    // Property-based tests (proptest)
    // ================================================================

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn input_from_bits(bits: u8) -> PlayerInput {
            PlayerInput {
                left: bits & 1 != 0,
                right: bits & 2 != 0,
                jump: bits & 4 != 0,
            }
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn session_invariants_hold(
                seed in 0u64..500,
                moves in proptest::collection::vec(0u8..8, 50..400)
            ) {
                let mut game = WordsmithGame::new(seeded_config(seed)).unwrap();
                let total = game.state.items.len();

                for &bits in &moves {
                    let collected_before: Vec<bool> =
                        game.state.items.values().map(|i| i.collected).collect();
                    let defeated_before: Vec<bool> =
                        game.state.obstacles.values().map(|o| o.defeated).collect();
                    let unlocked_before = game.state.door.unlocked;
                    let phase_before = game.phase();

                    let events = game.update(&input_from_bits(bits));

                    let terminal_events = events
                        .iter()
                        .filter(|e| matches!(e, GameEvent::GameOver | GameEvent::Victory))
                        .count();
                    prop_assert!(terminal_events <= 1);

                    if phase_before != Phase::Running {
                        prop_assert_eq!(game.phase(), phase_before);
                        prop_assert!(events.is_empty());
                    }

                    prop_assert!(game.state.session.lives <= 3);
                    if game.state.session.lives == 0 {
                        prop_assert_eq!(game.phase(), Phase::GameOver);
                    }

                    let flagged = game.state.items.values().filter(|i| i.collected).count();
                    prop_assert_eq!(game.state.session.items_collected, flagged);
                    prop_assert_eq!(game.state.door.unlocked, flagged == total);
                    prop_assert!(!unlocked_before || game.state.door.unlocked);

                    for (before, item) in collected_before.iter().zip(game.state.items.values()) {
                        prop_assert!(!before || item.collected);
                    }
                    for (before, o) in defeated_before.iter().zip(game.state.obstacles.values()) {
                        prop_assert!(!before || o.defeated);
                    }
                }
            }
        }
    }
}
