//! The command boundary: normalized discrete player intents.
//!
//! An input decoder (out of scope here) translates raw key events into
//! these commands and feeds them to [`crate::GameLoop::tick`] one at a
//! time. No raw key codes cross into the core.

use serde::{Deserialize, Serialize};

/// One player intent per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Step (or attack, when the target tile holds a living enemy).
    Move(Direction),
    /// Pass the turn.
    Wait,
    /// Drink a potion.
    UseItem,
    TogglePause,
    ToggleAutoplay,
    Save,
    Load,
    Restart,
    Quit,
}

/// The four movement directions. Movement is strictly orthogonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    /// Direction for a unit step, if the delta is one.
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Direction> {
        match (dx, dy) {
            (0, -1) => Some(Direction::North),
            (0, 1) => Some(Direction::South),
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_round_trip() {
        for dir in Direction::ALL {
            let (dx, dy) = dir.delta();
            assert_eq!(Direction::from_delta(dx, dy), Some(dir));
        }
        assert_eq!(Direction::from_delta(1, 1), None);
        assert_eq!(Direction::from_delta(0, 0), None);
    }
}
