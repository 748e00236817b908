//! Run-scoped support: configuration, logging, renderer events, metrics,
//! persistence.

pub mod config;
pub mod events;
pub mod log;
pub mod metrics;
pub mod save;

pub use config::{ConfigError, NewGameConfig, Overrides, RoleOverride, SimConfig, Tier};
pub use events::{CorpseMarker, DamageEvent, EventQueue};
pub use log::{MessageLog, TurnDigest};
pub use metrics::RunMetrics;
