//! Floor loot.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::pos::Pos;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Heals a fixed amount on use.
    Potion,
    /// Permanent unlock credit for locked doors.
    Key,
}

impl ItemKind {
    pub const fn glyph(self) -> char {
        match self {
            ItemKind::Potion => '!',
            ItemKind::Key => 'k',
        }
    }
}

/// An item lying on the floor; removed from the run's list on pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub pos: Pos,
    pub kind: ItemKind,
}

/// The player's carried item counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub potions: u32,
    pub keys: u32,
}

impl Inventory {
    pub fn add(&mut self, kind: ItemKind) {
        match kind {
            ItemKind::Potion => self.potions += 1,
            ItemKind::Key => self.keys += 1,
        }
    }

    pub fn has_key(&self) -> bool {
        self.keys > 0
    }
}
