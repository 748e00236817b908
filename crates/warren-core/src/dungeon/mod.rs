//! Dungeon map: tiles, doors, rooms and the two generators.

mod caves;
mod grid;
mod rect;
mod rooms;
mod tile;
mod vision;

pub use grid::Grid;
pub use rect::Rect;
pub use tile::{Door, DoorState, Tile};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::rng::GameRng;

/// Which generator produced a map.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum MapKind {
    /// Organic caves carved by a drunkard's walk.
    Caves,
    /// Rectangular rooms joined by L-corridors with doors.
    #[default]
    Rooms,
}

/// Generate a map. Deterministic for a given RNG state.
///
/// Both generators finish with a flood-fill pass that reverts floor
/// unreachable from the start tile, so every walkable tile is reachable
/// from the spawn. Generation never fails: the rooms generator falls back
/// to a single central hall if placement keeps rejecting.
pub fn generate(rng: &mut GameRng, width: i32, height: i32, kind: MapKind) -> Grid {
    match kind {
        MapKind::Caves => caves::generate(rng, width, height),
        MapKind::Rooms => rooms::generate(rng, width, height),
    }
}
