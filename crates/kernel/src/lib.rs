//! World Kernel: world state, deterministic spawn planning, fixed-step simulation.
//!
//! # Invariants
//! - Entity ids are unique within a world.
//! - Entities are only created by the planner and only removed by [`step`].
//! - Given the same world and `dt`, [`step`] produces the same next world on every client.

pub mod planner;
pub mod roster;
pub mod step;
pub mod world;

pub use planner::{SpawnCounts, SpawnPlanner};
pub use roster::Roster;
pub use step::step;
pub use world::{Entity, RemovalCause, WorldError, WorldEvent, WorldState};
