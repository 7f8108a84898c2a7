use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for an entity within one world.
///
/// Users are keyed by display name, foes and food by spawn index
/// (`foe3`, `food0`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn user(name: &str) -> Self {
        Self(name.to_owned())
    }

    pub fn foe(index: usize) -> Self {
        Self(format!("foe{index}"))
    }

    pub fn food(index: usize) -> Self {
        Self(format!("food{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed set of simulated actor kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    User,
    Foe,
    Food,
}

impl EntityKind {
    /// Tag used when deriving per-entity sub-seeds (`::user::`, `::foe::`, `::food::`).
    pub fn tag(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Foe => "foe",
            Self::Food => "food",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
