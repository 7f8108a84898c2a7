//! Shared identifiers, entity kinds and configuration used by every battletanks crate.

pub mod config;
pub mod types;

pub use config::{ConfigError, EngineConfig, SessionConfig, SimConfig};
pub use types::{EntityId, EntityKind};
