//! Drives the game loop from planner decisions.

use warren_core::action::Command;
use warren_core::{GameLoop, GamePhase, Pos, TickResult};

use crate::planner::{self, Action, Decision};

/// Consumed ticks without movement before the cached intent is thrown
/// away and re-derived from scratch.
pub const STALL_REPLAN_TICKS: u32 = 12;

/// Tick-at-a-time autoplay driver: plans, logs decision changes sparsely,
/// executes, and watches for stalls. Not re-entrant: one tick finishes
/// before the next may start, same as manual play.
#[derive(Debug, Default)]
pub struct AutoPilot {
    last_reason: Option<String>,
    /// Upcoming tiles of the current plan, for rendering.
    pub preview: Vec<Pos>,
    stalled_ticks: u32,
}

impl AutoPilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan and execute one tick.
    pub fn tick(&mut self, game: &mut GameLoop) -> TickResult {
        if game.state().phase != GamePhase::Playing {
            return game.autoplay_tick(Command::Wait);
        }

        let decision: Decision = planner::choose_action(game.state());
        if decision.dodged_shot {
            game.state_mut().metrics.shots_dodged += 1;
        }
        if self.last_reason.as_deref() != Some(decision.reason.as_str()) {
            game.state_mut()
                .log
                .push(format!("Auto: {}", decision.reason));
            self.last_reason = Some(decision.reason.clone());
        }
        self.preview.clone_from(&decision.preview);

        let command = match decision.action {
            Action::Move(dir) => Command::Move(dir),
            Action::Wait => Command::Wait,
        };
        let turn_before = game.state().turn;
        let pos_before = game.state().player.pos;
        let result = game.autoplay_tick(command);

        let consumed = game.state().turn != turn_before;
        if consumed {
            if game.state().player.pos == pos_before {
                self.stalled_ticks += 1;
                if self.stalled_ticks >= STALL_REPLAN_TICKS {
                    self.last_reason = None;
                    self.preview.clear();
                    self.stalled_ticks = 0;
                    game.state_mut().log.push("Auto: replan (no progress)");
                }
            } else {
                self.stalled_ticks = 0;
            }
        }
        result
    }
}
