//! Damage math.
//!
//! `base = max(0, power + frenzy - hex)`, doubled by an active aim,
//! rounded to the nearest integer. The defender's shield pool absorbs
//! before hit points.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// What one resolved attack did to the defender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    /// Damage before shield absorption.
    pub raw: i32,
    /// Portion soaked by the defender's shield pool.
    pub absorbed: i32,
    /// Portion subtracted from hit points.
    pub dealt: i32,
    /// Defender's hp reached zero.
    pub killed: bool,
}

/// Damage an attacker would do right now, before the defender's shield.
/// Never negative.
pub fn raw_damage(attacker: &Entity) -> i32 {
    let base = (attacker.power + attacker.effects.attack_modifier()).max(0);
    let mult = attacker.effects.aim_multiplier().unwrap_or(1.0);
    ((base as f64 * mult).round() as i32).max(0)
}

/// Apply `raw` damage to the defender: shield first, hp for the rest.
pub fn apply_damage(defender: &mut Entity, raw: i32) -> AttackOutcome {
    let absorbed = defender.effects.absorb(raw);
    let dealt = raw - absorbed;
    defender.hp -= dealt;
    AttackOutcome {
        raw,
        absorbed,
        dealt,
        killed: defender.hp <= 0,
    }
}

/// Resolve one attack in full.
pub fn resolve_attack(attacker: &Entity, defender: &mut Entity) -> AttackOutcome {
    apply_damage(defender, raw_damage(attacker))
}
