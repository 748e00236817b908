//! Enemy roles and spawn tables.

pub mod ai;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::rng::GameRng;

/// Role identity for every entity on the map. The player is the
/// distinguished singleton; the rest are enemy roles, each with its own
/// behavior policy (see [`ai`]).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Role {
    Player,
    /// Melee rusher.
    Goblin,
    /// Ranged: aims, then shoots for double damage.
    Archer,
    /// Support: shields the most wounded ally.
    Priest,
    /// Bruiser: regenerates at end of turn.
    Troll,
    /// Caster: frenzies allies or hexes the player.
    Shaman,
}

impl Role {
    /// All spawnable enemy roles, in spawn-table order.
    pub const ENEMIES: [Role; 5] = [
        Role::Goblin,
        Role::Archer,
        Role::Priest,
        Role::Troll,
        Role::Shaman,
    ];

    pub const fn glyph(self) -> char {
        match self {
            Role::Player => '@',
            Role::Goblin => 'g',
            Role::Archer => 'a',
            Role::Priest => 'p',
            Role::Troll => 'T',
            Role::Shaman => 's',
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Role::Player => "Player",
            Role::Goblin => "Goblin",
            Role::Archer => "Archer",
            Role::Priest => "Priest",
            Role::Troll => "Troll",
            Role::Shaman => "Shaman",
        }
    }

    /// Elite roles get tier stat bonuses and scare the autopilot.
    pub const fn is_elite(self) -> bool {
        matches!(self, Role::Troll | Role::Shaman)
    }

    /// Target priority for the autopilot: lower is killed first.
    pub const fn threat_priority(self) -> u8 {
        match self {
            Role::Shaman => 0,
            Role::Priest => 1,
            Role::Archer => 2,
            Role::Troll => 3,
            Role::Goblin => 4,
            Role::Player => u8::MAX,
        }
    }
}

/// Baseline stats for one enemy role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleStats {
    pub role: Role,
    pub hp: i32,
    pub power: i32,
    pub weight: u32,
}

/// Per-role stat table, config-overridable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTable {
    entries: [RoleStats; 5],
}

impl Default for RoleTable {
    fn default() -> Self {
        Self {
            entries: [
                RoleStats { role: Role::Goblin, hp: 8, power: 3, weight: 4 },
                RoleStats { role: Role::Archer, hp: 6, power: 2, weight: 2 },
                RoleStats { role: Role::Priest, hp: 7, power: 2, weight: 2 },
                RoleStats { role: Role::Troll, hp: 14, power: 5, weight: 2 },
                RoleStats { role: Role::Shaman, hp: 9, power: 3, weight: 2 },
            ],
        }
    }
}

impl RoleTable {
    pub fn stats(&self, role: Role) -> Option<&RoleStats> {
        self.entries.iter().find(|s| s.role == role)
    }

    pub fn stats_mut(&mut self, role: Role) -> Option<&mut RoleStats> {
        self.entries.iter_mut().find(|s| s.role == role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleStats> {
        self.entries.iter()
    }

    /// Weighted random pick across the table. Roles with zero weight never
    /// spawn; a degenerate all-zero table falls back to the first entry.
    pub fn pick_weighted(&self, rng: &mut GameRng) -> RoleStats {
        let total: u32 = self.entries.iter().map(|s| s.weight).sum();
        if total == 0 {
            return self.entries[0];
        }
        let mut roll = rng.rn2(total);
        for stats in &self.entries {
            if roll < stats.weight {
                return *stats;
            }
            roll -= stats.weight;
        }
        self.entries[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_matches_roster() {
        let table = RoleTable::default();
        assert_eq!(table.stats(Role::Goblin).unwrap().hp, 8);
        assert_eq!(table.stats(Role::Troll).unwrap().power, 5);
        assert!(table.stats(Role::Player).is_none());
    }

    #[test]
    fn test_weighted_pick_respects_zero_weight() {
        let mut table = RoleTable::default();
        for role in Role::ENEMIES {
            if role != Role::Archer {
                table.stats_mut(role).unwrap().weight = 0;
            }
        }
        let mut rng = GameRng::new(11);
        for _ in 0..50 {
            assert_eq!(table.pick_weighted(&mut rng).role, Role::Archer);
        }
    }

    #[test]
    fn test_weighted_pick_covers_all_roles() {
        let table = RoleTable::default();
        let mut rng = GameRng::new(5);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(table.pick_weighted(&mut rng).role);
        }
        for role in Role::ENEMIES {
            assert!(seen.contains(&role), "{role} never picked");
        }
    }

    #[test]
    fn test_threat_priority_order() {
        assert!(Role::Shaman.threat_priority() < Role::Priest.threat_priority());
        assert!(Role::Priest.threat_priority() < Role::Archer.threat_priority());
        assert!(Role::Archer.threat_priority() < Role::Troll.threat_priority());
        assert!(Role::Troll.threat_priority() < Role::Goblin.threat_priority());
    }
}
