//! Headless full-game sessions: the bot plays a run start to finish.

use serde::{Deserialize, Serialize};

use warren_core::{GameLoop, GameState, NewGameConfig, SimConfig, TickResult};

use crate::autopilot::AutoPilot;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub setup: NewGameConfig,
    /// Hard turn bound so a pathological map cannot spin forever.
    pub max_turns: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            setup: NewGameConfig::default(),
            max_turns: 2000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Victory,
    Died,
    TurnLimit,
}

/// End-of-run report for one unattended game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub seed: u64,
    pub outcome: Outcome,
    pub turns: u64,
    pub kills: u32,
    pub damage_dealt: i64,
    pub damage_taken: i64,
    pub items_used: u32,
    pub times_hexed: u32,
    pub shots_dodged: u32,
}

/// Play one full game unattended and report how it went.
pub fn run_session(config: &SessionConfig) -> SessionResult {
    let state = GameState::new_game(config.setup.clone(), SimConfig::default());
    run_session_from(state, config.max_turns)
}

/// Same, but over a caller-built state (custom config snapshots, loaded
/// saves, test arenas).
pub fn run_session_from(mut state: GameState, max_turns: u64) -> SessionResult {
    state.autoplay = true;
    let mut game = GameLoop::new(state);
    let mut pilot = AutoPilot::new();

    let outcome = loop {
        if game.state().turn >= max_turns {
            break Outcome::TurnLimit;
        }
        match pilot.tick(&mut game) {
            TickResult::PlayerDied => break Outcome::Died,
            TickResult::Victory => break Outcome::Victory,
            _ => {}
        }
    };

    let state = game.state();
    SessionResult {
        seed: state.setup.seed,
        outcome,
        turns: state.turn,
        kills: state.metrics.kills,
        damage_dealt: state.metrics.damage_dealt,
        damage_taken: state.metrics.damage_taken,
        items_used: state.metrics.items_used,
        times_hexed: state.metrics.times_hexed,
        shots_dodged: state.metrics.shots_dodged,
    }
}
