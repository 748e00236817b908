//! Core game constants.

/// Default map dimensions.
pub const DEFAULT_WIDTH: i32 = 40;
pub const DEFAULT_HEIGHT: i32 = 20;

/// Map size limits accepted by the generator.
pub const MIN_WIDTH: i32 = 20;
pub const MAX_WIDTH: i32 = 120;
pub const MIN_HEIGHT: i32 = 10;
pub const MAX_HEIGHT: i32 = 60;

/// Default player field-of-view radius (config-overridable).
pub const FOV_RADIUS: i32 = 8;

/// Sight range used by enemy pursuit and ranged attacks.
pub const ENEMY_SIGHT_RANGE: i32 = 12;

/// Player starting stats.
pub const PLAYER_HP: i32 = 20;
pub const PLAYER_POWER: i32 = 5;

/// Healing granted by one potion.
pub const POTION_HEAL: i32 = 8;

/// Default enemy count before tier scaling.
pub const DEFAULT_ENEMY_COUNT: u32 = 8;

/// Fraction of the map the cave walk tries to turn into floor.
pub const CAVE_FLOOR_FRACTION: f64 = 0.45;

/// Message log capacity.
pub const LOG_CAPACITY: usize = 1000;
