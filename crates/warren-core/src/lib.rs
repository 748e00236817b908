//! warren-core: simulation core for the warren dungeon crawler.
//!
//! This crate contains the full game model: procedural dungeon
//! generation, visibility, entities and status effects, combat, enemy
//! behavior and the turn engine. No terminal or input dependencies.
//! Frontends (and the autoplay bot in `warren-player`) drive it through
//! [`GameLoop::tick`] and read the public state back out.

pub mod action;
pub mod combat;
pub mod dungeon;
pub mod effects;
pub mod entity;
pub mod items;
pub mod monster;
pub mod world;

mod consts;
mod gameloop;
mod pos;
mod rng;

pub use consts::*;
pub use gameloop::{GameLoop, GamePhase, GameState, TickResult};
pub use pos::Pos;
pub use rng::GameRng;
pub use world::config::{NewGameConfig, Overrides, SimConfig, Tier};
