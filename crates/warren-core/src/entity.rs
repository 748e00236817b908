//! Entities: the player and enemies share one shape.

use serde::{Deserialize, Serialize};

use crate::effects::EffectSet;
use crate::monster::Role;
use crate::pos::Pos;

/// A creature on the map. Invariant: `0 <= hp <= max_hp`; an entity with
/// `hp <= 0` is dead and excluded from every spatial query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub pos: Pos,
    pub role: Role,
    pub hp: i32,
    pub max_hp: i32,
    pub power: i32,
    #[serde(default)]
    pub effects: EffectSet,
}

impl Entity {
    pub fn new(role: Role, hp: i32, power: i32) -> Self {
        Self {
            pos: Pos::default(),
            role,
            hp,
            max_hp: hp,
            power,
            effects: EffectSet::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_wounded(&self) -> bool {
        self.hp < self.max_hp
    }

    /// Heal up to max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount).min(self.max_hp);
        self.hp - before
    }

    pub fn glyph(&self) -> char {
        self.role.glyph()
    }

    pub fn name(&self) -> &'static str {
        self.role.display_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heal_clamps_to_max() {
        let mut e = Entity::new(Role::Goblin, 8, 3);
        e.hp = 5;
        assert_eq!(e.heal(8), 3);
        assert_eq!(e.hp, 8);
        assert_eq!(e.heal(1), 0);
    }

    #[test]
    fn test_death_at_zero() {
        let mut e = Entity::new(Role::Goblin, 8, 3);
        e.hp = 0;
        assert!(!e.is_alive());
    }
}
