//! Difficulty tiers, new-game settings and behavior overrides.
//!
//! Overrides are a name-keyed table merged over the built-in role
//! defaults. The merged [`SimConfig`] snapshot is carried inside the game
//! state and may only be swapped between ticks, never during one.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use thiserror::Error;

use crate::consts::{
    DEFAULT_ENEMY_COUNT, DEFAULT_HEIGHT, DEFAULT_WIDTH, FOV_RADIUS, MAX_HEIGHT, MAX_WIDTH,
    MIN_HEIGHT, MIN_WIDTH,
};
use crate::dungeon::MapKind;
use crate::monster::{Role, RoleTable};

/// Difficulty scalar. Pure data: more enemies, stronger elites, more
/// aggressive casters.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
    Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    #[default]
    Normal,
    Hard,
    Nightmare,
}

impl Tier {
    /// Scale the requested enemy count.
    pub fn scale_enemy_count(self, count: u32) -> u32 {
        match self {
            Tier::Normal => count,
            Tier::Hard => (count as f64 * 1.25).ceil() as u32,
            Tier::Nightmare => (count as f64 * 1.5).ceil() as u32,
        }
    }

    /// Extra power for elite roles.
    pub fn elite_power_bonus(self) -> i32 {
        if self >= Tier::Hard { 1 } else { 0 }
    }

    /// Turns an archer stays on cooldown after shooting.
    pub fn archer_cooldown(self) -> i32 {
        if self >= Tier::Nightmare { 1 } else { 2 }
    }

    /// Nearby allies a shaman needs before it buffs instead of hexing.
    pub fn caster_ally_threshold(self) -> usize {
        if self >= Tier::Nightmare { 1 } else { 2 }
    }

    /// Troll end-of-turn regeneration.
    pub fn bruiser_regen(self) -> i32 {
        if self >= Tier::Nightmare { 2 } else { 1 }
    }

    /// Extra potions seeded on harder tiers.
    pub fn bonus_potions(self) -> u32 {
        if self >= Tier::Hard { 1 } else { 0 }
    }
}

/// Settings for starting a run (the menu screen's fields, as data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameConfig {
    pub seed: u64,
    pub width: i32,
    pub height: i32,
    pub enemy_count: u32,
    pub tier: Tier,
    pub map_kind: MapKind,
}

impl Default for NewGameConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            enemy_count: DEFAULT_ENEMY_COUNT,
            tier: Tier::Normal,
            map_kind: MapKind::Rooms,
        }
    }
}

impl NewGameConfig {
    /// Clamp dimensions to the supported range.
    pub fn sanitized(mut self) -> Self {
        self.width = self.width.clamp(MIN_WIDTH, MAX_WIDTH);
        self.height = self.height.clamp(MIN_HEIGHT, MAX_HEIGHT);
        self
    }
}

/// Per-role stat override; absent fields keep the built-in default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleOverride {
    pub hp: Option<i32>,
    pub power: Option<i32>,
    pub weight: Option<u32>,
}

/// A behavior override table, typically loaded from JSON. Unknown role
/// names are ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overrides {
    #[serde(default)]
    pub roles: HashMap<String, RoleOverride>,
    #[serde(default)]
    pub fov_radius: Option<i32>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed override table: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Overrides {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// The merged, immutable-per-tick configuration snapshot the simulation
/// reads from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub fov_radius: i32,
    pub roles: RoleTable,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fov_radius: FOV_RADIUS,
            roles: RoleTable::default(),
        }
    }
}

impl SimConfig {
    /// Merge an override table over the built-in defaults.
    pub fn with_overrides(overrides: &Overrides) -> Self {
        let mut config = Self::default();
        for role in Role::ENEMIES {
            let Some(over) = overrides.roles.get(role.display_name()) else {
                continue;
            };
            if let Some(stats) = config.roles.stats_mut(role) {
                if let Some(hp) = over.hp {
                    stats.hp = hp.max(1);
                }
                if let Some(power) = over.power {
                    stats.power = power.max(0);
                }
                if let Some(weight) = over.weight {
                    stats.weight = weight;
                }
            }
        }
        if let Some(radius) = overrides.fov_radius {
            config.fov_radius = radius.clamp(2, 20);
        }
        config
    }
}
