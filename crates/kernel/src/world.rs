use battletanks_common::{EntityId, EntityKind};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Errors from mutating a [`WorldState`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error("entity id {0} already present in world")]
    DuplicateId(EntityId),
}

/// Why an entity left the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalCause {
    /// A user ran into this foe or food.
    Eaten { by: EntityId },
    /// A user whose health dropped to zero or below.
    Died,
}

/// An event record produced by every change to the world.
///
/// Renderers and hosts drain the log to learn what happened during a step
/// without diffing entity lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// Entity placed by the spawn planner.
    Spawned { id: EntityId, kind: EntityKind },
    /// Two footprints overlapped and swapped velocities.
    Collided { a: EntityId, b: EntityId },
    /// Entity removed during a step.
    Removed {
        id: EntityId,
        kind: EntityKind,
        cause: RemovalCause,
    },
    /// Simulation advanced one fixed step.
    Stepped { tick: u64 },
}

/// One simulated actor.
///
/// Positions live on the ground plane: `position.x` is world x and
/// `position.y` is world z. Height is a rendering concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: DVec2,
    pub velocity: DVec2,
    /// Only users carry health; foes and food are simply present or gone.
    pub health: Option<i32>,
    /// Cosmetic color in `[0, 1)`, fixed at spawn.
    pub hue: f64,
}

impl Entity {
    pub fn is_user(&self) -> bool {
        self.kind == EntityKind::User
    }

    pub fn is_dead(&self) -> bool {
        self.is_user() && self.health.is_some_and(|h| h <= 0)
    }
}

/// The simulated world for one session.
///
/// Entities are kept in spawn order; that order drives collision pairing and is
/// part of the determinism contract, so storage is a `Vec` rather than a map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldState {
    entities: Vec<Entity>,
    session_seed_hex: String,
    level_label: String,
    tick: u64,
    /// Append-only event log, drained by the host.
    #[serde(skip)]
    event_log: Vec<WorldEvent>,
}

impl WorldState {
    /// Create an empty world tagged with the seed digest and label that produced it.
    pub fn new(session_seed_hex: impl Into<String>, level_label: impl Into<String>) -> Self {
        Self {
            session_seed_hex: session_seed_hex.into(),
            level_label: level_label.into(),
            ..Default::default()
        }
    }

    pub fn session_seed_hex(&self) -> &str {
        &self.session_seed_hex
    }

    /// The seed word the session was started with.
    pub fn level_label(&self) -> &str {
        &self.level_label
    }

    /// Number of completed steps.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id.as_str() == id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.iter().any(|e| &e.id == id)
    }

    /// Append an entity, rejecting ids already in the world.
    pub fn insert(&mut self, entity: Entity) -> Result<(), WorldError> {
        if self.contains(&entity.id) {
            return Err(WorldError::DuplicateId(entity.id));
        }
        self.event_log.push(WorldEvent::Spawned {
            id: entity.id.clone(),
            kind: entity.kind,
        });
        self.entities.push(entity);
        Ok(())
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    pub(crate) fn entities_mut(&mut self) -> &mut Vec<Entity> {
        &mut self.entities
    }

    pub(crate) fn record(&mut self, event: WorldEvent) {
        self.event_log.push(event);
    }

    pub(crate) fn advance_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Deterministic digest of the simulated state, for comparing clients.
    ///
    /// Covers the tick and every entity's id, kind, health and exact float bits
    /// in world order. The event log is not included.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        for e in &self.entities {
            mix(&mut h, e.id.as_str().as_bytes());
            mix(&mut h, &[e.kind as u8]);
            mix(&mut h, &e.position.x.to_bits().to_le_bytes());
            mix(&mut h, &e.position.y.to_bits().to_le_bytes());
            mix(&mut h, &e.velocity.x.to_bits().to_le_bytes());
            mix(&mut h, &e.velocity.y.to_bits().to_le_bytes());
            mix(&mut h, &e.health.unwrap_or(i32::MIN).to_le_bytes());
            mix(&mut h, &e.hue.to_bits().to_le_bytes());
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(index: usize, x: f64) -> Entity {
        Entity {
            id: EntityId::food(index),
            kind: EntityKind::Food,
            position: DVec2::new(x, 0.0),
            velocity: DVec2::ZERO,
            health: None,
            hue: 0.5,
        }
    }

    #[test]
    fn world_starts_empty() {
        let w = WorldState::new("abc", "test");
        assert_eq!(w.tick(), 0);
        assert!(w.is_empty());
        assert_eq!(w.session_seed_hex(), "abc");
        assert_eq!(w.level_label(), "test");
    }

    #[test]
    fn insert_keeps_order_and_logs() {
        let mut w = WorldState::default();
        w.insert(food(0, 1.0)).unwrap();
        w.insert(food(1, 2.0)).unwrap();
        let ids: Vec<&str> = w.entities().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["food0", "food1"]);
        assert_eq!(w.events().len(), 2);
        assert_eq!(w.count(EntityKind::Food), 2);
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut w = WorldState::default();
        w.insert(food(0, 1.0)).unwrap();
        let err = w.insert(food(0, 5.0)).unwrap_err();
        assert_eq!(err, WorldError::DuplicateId(EntityId::food(0)));
        assert_eq!(w.len(), 1);
        assert_eq!(w.get("food0").unwrap().position.x, 1.0);
    }

    #[test]
    fn drain_events_clears_log() {
        let mut w = WorldState::default();
        w.insert(food(0, 0.0)).unwrap();
        assert_eq!(w.drain_events().len(), 1);
        assert!(w.events().is_empty());
    }

    #[test]
    fn dead_only_applies_to_users() {
        let mut user = food(0, 0.0);
        user.kind = EntityKind::User;
        user.health = Some(0);
        assert!(user.is_dead());
        let mut f = food(1, 0.0);
        f.health = Some(-4);
        assert!(!f.is_dead());
    }

    #[test]
    fn state_hash_tracks_float_bits() {
        let mut a = WorldState::default();
        let mut b = WorldState::default();
        a.insert(food(0, 1.0)).unwrap();
        b.insert(food(0, 1.0)).unwrap();
        assert_eq!(a.state_hash(), b.state_hash());

        let mut c = WorldState::default();
        c.insert(food(0, 1.0 + f64::EPSILON)).unwrap();
        assert_ne!(a.state_hash(), c.state_hash());
    }
}
