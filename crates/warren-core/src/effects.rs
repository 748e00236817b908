//! Timed status effects.
//!
//! Effects are a closed set of tagged variants, each carrying only its own
//! parameters. Durations tick down exactly once per owning entity's turn;
//! an effect whose duration reaches zero is removed.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// A status effect and its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Temporary absorbing pool consumed before hit points.
    Shield { pool: i32 },
    /// Attack penalty.
    Hex { penalty: i32 },
    /// Attack bonus.
    Frenzy { bonus: i32 },
    /// Next-attack damage multiplier (ranged telegraph).
    Aim { multiplier: f64 },
    /// Post-shot cooldown gate; no combat effect of its own.
    AimCooldown,
}

impl Effect {
    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::Shield { .. } => EffectKind::Shield,
            Effect::Hex { .. } => EffectKind::Hex,
            Effect::Frenzy { .. } => EffectKind::Frenzy,
            Effect::Aim { .. } => EffectKind::Aim,
            Effect::AimCooldown => EffectKind::AimCooldown,
        }
    }
}

/// Discriminant for lookups.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum EffectKind {
    Shield,
    Hex,
    Frenzy,
    Aim,
    AimCooldown,
}

/// An effect with its remaining duration in turns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub effect: Effect,
    pub turns_left: i32,
}

/// The set of effects on one entity. At most one effect per kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectSet {
    active: Vec<ActiveEffect>,
}

impl EffectSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: EffectKind) -> Option<&ActiveEffect> {
        self.active.iter().find(|e| e.effect.kind() == kind)
    }

    pub fn has(&self, kind: EffectKind) -> bool {
        self.get(kind).is_some()
    }

    /// Apply an effect for `turns`. An existing effect of the same kind is
    /// replaced outright, except Shield, whose pool accumulates while the
    /// duration refreshes.
    pub fn apply(&mut self, effect: Effect, turns: i32) {
        let effect = match (effect, self.get(effect.kind())) {
            (
                Effect::Shield { pool },
                Some(ActiveEffect {
                    effect: Effect::Shield { pool: existing },
                    ..
                }),
            ) => Effect::Shield {
                pool: pool + existing,
            },
            (e, _) => e,
        };
        self.remove(effect.kind());
        self.active.push(ActiveEffect {
            effect,
            turns_left: turns,
        });
    }

    pub fn remove(&mut self, kind: EffectKind) {
        self.active.retain(|e| e.effect.kind() != kind);
    }

    /// Tick every duration down by one and drop expired effects.
    pub fn decay(&mut self) {
        for e in &mut self.active {
            e.turns_left -= 1;
        }
        self.active.retain(|e| e.turns_left > 0);
    }

    /// Net attack modifier: frenzy bonus minus hex penalty.
    pub fn attack_modifier(&self) -> i32 {
        let mut modifier = 0;
        for e in &self.active {
            match e.effect {
                Effect::Frenzy { bonus } => modifier += bonus,
                Effect::Hex { penalty } => modifier -= penalty.abs(),
                _ => {}
            }
        }
        modifier
    }

    /// Damage multiplier from an active aim, if any.
    pub fn aim_multiplier(&self) -> Option<f64> {
        self.active.iter().find_map(|e| match e.effect {
            Effect::Aim { multiplier } => Some(multiplier),
            _ => None,
        })
    }

    /// Absorb incoming damage into the shield pool. Returns the amount
    /// absorbed; the drained shield stays in place until its duration runs
    /// out.
    pub fn absorb(&mut self, damage: i32) -> i32 {
        for e in &mut self.active {
            if let Effect::Shield { pool } = &mut e.effect {
                let absorbed = damage.min(*pool).max(0);
                *pool -= absorbed;
                return absorbed;
            }
        }
        0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.active.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
