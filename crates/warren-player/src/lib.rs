//! warren-player: the autoplay "bot".
//!
//! A priority-ordered decision policy over the core's visible state, grid
//! BFS pathfinding, and an autopilot that drives [`warren_core::GameLoop`]
//! one tick at a time. The planner only ever reads what the player could
//! see: visible and explored tiles plus the inventory.

pub mod autopilot;
pub mod pathfind;
pub mod planner;
pub mod session;

pub use autopilot::AutoPilot;
pub use planner::{Action, Decision, choose_action};
pub use session::{Outcome, SessionConfig, SessionResult, run_session};
