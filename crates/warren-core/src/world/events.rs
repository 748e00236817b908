//! Side-channel notifications for the renderer.
//!
//! The core appends; the renderer drains each frame. Purely observational:
//! nothing in the simulation reads these back.

use serde::{Deserialize, Serialize};

use crate::monster::Role;
use crate::pos::Pos;

/// A floating damage number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageEvent {
    pub pos: Pos,
    pub amount: i32,
    pub attacker: Role,
    pub defender: Role,
    /// Turn the hit landed on, for renderer-side expiry.
    pub turn: u64,
}

/// A corpse silhouette left where an entity died.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpseMarker {
    pub pos: Pos,
    pub role: Role,
}

/// The two render queues, plus one-frame hit flashes.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    damage: Vec<DamageEvent>,
    corpses: Vec<CorpseMarker>,
    flashes: Vec<Pos>,
}

impl EventQueue {
    pub fn push_damage(&mut self, event: DamageEvent) {
        self.flashes.push(event.pos);
        self.damage.push(event);
    }

    pub fn push_corpse(&mut self, marker: CorpseMarker) {
        self.corpses.push(marker);
    }

    pub fn drain_damage(&mut self) -> Vec<DamageEvent> {
        std::mem::take(&mut self.damage)
    }

    pub fn drain_corpses(&mut self) -> Vec<CorpseMarker> {
        std::mem::take(&mut self.corpses)
    }

    pub fn drain_flashes(&mut self) -> Vec<Pos> {
        std::mem::take(&mut self.flashes)
    }

    pub fn clear(&mut self) {
        self.damage.clear();
        self.corpses.clear();
        self.flashes.clear();
    }
}
