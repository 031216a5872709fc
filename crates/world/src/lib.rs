//! World state: entities, actors, monsters, live stats and item drops.
//!
//! # Invariants
//! - All state mutations flow through explicit operations and are logged.
//! - Randomness only comes from the world's seeded stream, so a seed plus a
//!   sequence of operations fully determines every roll.
//! - Game data (monster tables, item lists) is reached through provider
//!   traits; this crate never loads content on its own initiative.

pub mod actor;
pub mod data;
mod error;
pub mod item;
pub mod monster;
pub mod stats;
pub mod world;

pub use actor::{Actor, AnimState, Faction};
pub use data::{DataError, MonsterData, MonsterDataProvider, MonsterTable};
pub use error::WorldError;
pub use item::{BaseItemTable, Item, ItemDrop, ItemFactory, ItemFilter, ItemId};
pub use monster::Monster;
pub use stats::{ActorStats, BaseStats, LiveActorStats, ToHit};
pub use world::{EntityData, World, WorldEvent};
