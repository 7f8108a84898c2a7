use battletanks_common::{EntityId, EntityKind};
use battletanks_seed::{Mulberry32, SeedHex};
use glam::DVec2;

use crate::roster::Roster;
use crate::world::{Entity, WorldState};

/// Spread of spawn positions: `(r - 0.5) * 80` lands in `[-40, 40)`.
pub const SPAWN_AMPLITUDE: f64 = 80.0;
/// Velocity factor for users and foes, applied before the amplitude.
pub const MOVER_SPEED_FACTOR: f64 = 0.7;
/// Food drifts slower than everything else.
pub const FOOD_SPEED_FACTOR: f64 = 0.4;
pub const INITIAL_HEALTH: i32 = 3;

const FOE_RATIO: f64 = 1.0;
const FOOD_RATIO: f64 = 0.8;
const MIN_FOES: usize = 4;
const MIN_FOOD: usize = 4;

/// How many of each kind a session spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnCounts {
    pub players: usize,
    pub foes: usize,
    pub food: usize,
}

impl SpawnCounts {
    /// Counts for a roster of `roster_len` names.
    ///
    /// `players` is floored at 1 for the ratio math only; an empty roster
    /// still spawns no users.
    pub fn for_roster(roster_len: usize) -> Self {
        let players = roster_len.max(1);
        let foes = ((players as f64 * FOE_RATIO).floor() as usize).max(MIN_FOES);
        let food = ((players as f64 * FOOD_RATIO).floor() as usize).max(MIN_FOOD);
        Self {
            players,
            foes,
            food,
        }
    }
}

/// Builds the initial world of a session from `(room, seed word, roster)`.
///
/// Every entity draws from its own mulberry32 stream keyed by
/// `session digest :: kind :: name-or-index`, always in the order
/// x, z, velocity x, velocity z, hue. Changing one roster name therefore
/// never moves anyone else.
pub struct SpawnPlanner;

impl SpawnPlanner {
    pub fn plan(room_id: &str, seed_word: &str, roster: &Roster) -> WorldState {
        let _span = tracing::info_span!("spawn_plan", room = room_id, seed = seed_word).entered();

        let session = SeedHex::for_session(room_id, seed_word);
        let counts = SpawnCounts::for_roster(roster.len());
        let mut world = WorldState::new(session.as_str(), seed_word);

        tracing::info!(
            players = counts.players,
            foes = counts.foes,
            food = counts.food,
            seed = %session,
            "planning session"
        );

        let names = roster.names();
        if !names.is_empty() {
            for i in 0..counts.players {
                let name = &names[i % names.len()];
                let entity = spawn_entity(
                    &session,
                    EntityKind::User,
                    name,
                    EntityId::user(name),
                    MOVER_SPEED_FACTOR,
                );
                place(&mut world, entity);
            }
        }
        for i in 0..counts.foes {
            let entity = spawn_entity(
                &session,
                EntityKind::Foe,
                &i.to_string(),
                EntityId::foe(i),
                MOVER_SPEED_FACTOR,
            );
            place(&mut world, entity);
        }
        for i in 0..counts.food {
            let entity = spawn_entity(
                &session,
                EntityKind::Food,
                &i.to_string(),
                EntityId::food(i),
                FOOD_SPEED_FACTOR,
            );
            place(&mut world, entity);
        }

        tracing::info!(total = world.len(), "spawn complete");
        world
    }
}

fn spawn_entity(
    session: &SeedHex,
    kind: EntityKind,
    key: &str,
    id: EntityId,
    speed_factor: f64,
) -> Entity {
    let mut rng = Mulberry32::from_hex(&session.sub_seed(kind, key));
    // Draw order is fixed: x, z, vx, vz, hue.
    let x = rng.centered(SPAWN_AMPLITUDE);
    let z = rng.centered(SPAWN_AMPLITUDE);
    let vx = rng.centered(speed_factor) * SPAWN_AMPLITUDE;
    let vz = rng.centered(speed_factor) * SPAWN_AMPLITUDE;
    let hue = rng.next_f64();
    Entity {
        id,
        kind,
        position: DVec2::new(x, z),
        velocity: DVec2::new(vx, vz),
        health: (kind == EntityKind::User).then_some(INITIAL_HEALTH),
        hue,
    }
}

fn place(world: &mut WorldState, entity: Entity) {
    tracing::debug!(
        kind = %entity.kind,
        id = %entity.id,
        x = entity.position.x,
        z = entity.position.y,
        "spawned"
    );
    if let Err(err) = world.insert(entity) {
        tracing::warn!(%err, "skipping entity");
    }
}
