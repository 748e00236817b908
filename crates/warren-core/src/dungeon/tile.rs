//! Map tiles and doors.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::pos::Pos;

/// A single map cell. Walls are the default; generators carve floor.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Tile {
    pub walkable: bool,
}

impl Tile {
    pub const fn wall() -> Self {
        Self { walkable: false }
    }

    pub const fn floor() -> Self {
        Self { walkable: true }
    }
}

bitflags! {
    /// Door state flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DoorState: u8 {
        const OPEN = 0x01;
        const CLOSED = 0x02;
        const LOCKED = 0x04;
    }
}

// Manual serde impl for DoorState
impl Serialize for DoorState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DoorState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(DoorState::from_bits_truncate(bits))
    }
}

/// A door sitting on a floor tile. Closed doors (locked or not) block
/// movement and sight until opened.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Door {
    pub pos: Pos,
    pub state: DoorState,
}

impl Door {
    /// A freshly placed door: closed and unlocked.
    pub fn closed(pos: Pos) -> Self {
        Self {
            pos,
            state: DoorState::CLOSED,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.contains(DoorState::OPEN)
    }

    pub fn is_locked(&self) -> bool {
        self.state.contains(DoorState::LOCKED)
    }

    /// Open the door (clears the closed bit; a locked door stays flagged
    /// locked for display but no longer blocks).
    pub fn open(&mut self) {
        self.state.remove(DoorState::CLOSED);
        self.state.insert(DoorState::OPEN);
    }

    pub fn lock(&mut self) {
        self.state.remove(DoorState::OPEN);
        self.state.insert(DoorState::CLOSED | DoorState::LOCKED);
    }
}
