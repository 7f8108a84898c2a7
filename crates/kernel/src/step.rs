use battletanks_common::{EntityKind, SimConfig};

use crate::world::{Entity, RemovalCause, WorldEvent, WorldState};

/// Advance the world by one fixed step of `dt` seconds.
///
/// Phases run in this order, and the order is part of the result:
/// 1. integrate positions,
/// 2. resolve overlapping pairs `(i, j)`, `i < j`, in world order,
/// 3. clamp to the arena and reflect velocity,
/// 4. remove users whose health reached zero.
///
/// An empty world only advances its tick.
pub fn step(world: &mut WorldState, dt: f64, config: &SimConfig) {
    integrate(world.entities_mut(), dt);

    let events = resolve_collisions(world.entities_mut(), config.footprint * 0.5);
    for event in events {
        world.record(event);
    }

    reflect_at_bounds(world.entities_mut(), config.half_extent);

    let events = sweep_dead(world.entities_mut());
    for event in events {
        world.record(event);
    }

    let tick = world.advance_tick();
    world.record(WorldEvent::Stepped { tick });
}

fn integrate(entities: &mut [Entity], dt: f64) {
    for e in entities {
        e.position += e.velocity * dt;
    }
}

/// Inclusive overlap of two square footprints, matching a box-vs-box test
/// where touching faces count as contact.
fn overlaps(a: &Entity, b: &Entity, half: f64) -> bool {
    let (a_min, a_max) = (a.position - half, a.position + half);
    let (b_min, b_max) = (b.position - half, b.position + half);
    !(b_max.x < a_min.x || b_min.x > a_max.x || b_max.y < a_min.y || b_min.y > a_max.y)
}

fn adjust_health(entity: &mut Entity, delta: i32) {
    if let Some(health) = entity.health.as_mut() {
        *health += delta;
    }
}

/// Pairwise collision pass.
///
/// Removed entities are marked and skipped for the rest of the pass, then
/// compacted once at the end. When the earlier entity of a pair is removed the
/// pass moves straight on to the next `i`; when the later one is removed the
/// inner loop carries on with the next `j`. This visits exactly the pairs an
/// in-place removal would.
fn resolve_collisions(entities: &mut Vec<Entity>, half: f64) -> Vec<WorldEvent> {
    let n = entities.len();
    let mut removed = vec![false; n];
    let mut events = Vec::new();

    'outer: for i in 0..n {
        if removed[i] {
            continue;
        }
        for j in (i + 1)..n {
            if removed[j] || !overlaps(&entities[i], &entities[j], half) {
                continue;
            }

            let (head, tail) = entities.split_at_mut(j);
            let (a, b) = (&mut head[i], &mut tail[0]);
            std::mem::swap(&mut a.velocity, &mut b.velocity);
            tracing::trace!(a = %a.id, b = %b.id, "collision");
            events.push(WorldEvent::Collided {
                a: a.id.clone(),
                b: b.id.clone(),
            });

            match (a.kind, b.kind) {
                (EntityKind::User, EntityKind::Foe) => {
                    adjust_health(a, -2);
                    removed[j] = true;
                    events.push(eaten(b, a));
                }
                (EntityKind::Foe, EntityKind::User) => {
                    adjust_health(b, -2);
                    removed[i] = true;
                    events.push(eaten(a, b));
                    continue 'outer;
                }
                (EntityKind::User, EntityKind::Food) => {
                    adjust_health(a, 1);
                    removed[j] = true;
                    events.push(eaten(b, a));
                }
                (EntityKind::Food, EntityKind::User) => {
                    adjust_health(b, 1);
                    removed[i] = true;
                    events.push(eaten(a, b));
                    continue 'outer;
                }
                (EntityKind::User, EntityKind::User) => {
                    adjust_health(a, -1);
                    adjust_health(b, -1);
                }
                _ => {}
            }
        }
    }

    if removed.iter().any(|r| *r) {
        let mut index = 0;
        entities.retain(|_| {
            let keep = !removed[index];
            index += 1;
            keep
        });
    }
    events
}

fn eaten(victim: &Entity, by: &Entity) -> WorldEvent {
    tracing::debug!(id = %victim.id, by = %by.id, "eaten");
    WorldEvent::Removed {
        id: victim.id.clone(),
        kind: victim.kind,
        cause: RemovalCause::Eaten { by: by.id.clone() },
    }
}

/// Clamp into `[-half_extent, half_extent]` and invert the velocity component
/// on each axis that was out of bounds.
///
/// The inversion is unconditional: an entity past the wall that is already
/// heading inward (after a swap this step) ends up heading outward again and
/// is clamped on the next step.
fn reflect_at_bounds(entities: &mut [Entity], half_extent: f64) {
    for e in entities {
        if e.position.x > half_extent {
            e.position.x = half_extent;
            e.velocity.x = -e.velocity.x;
        } else if e.position.x < -half_extent {
            e.position.x = -half_extent;
            e.velocity.x = -e.velocity.x;
        }
        if e.position.y > half_extent {
            e.position.y = half_extent;
            e.velocity.y = -e.velocity.y;
        } else if e.position.y < -half_extent {
            e.position.y = -half_extent;
            e.velocity.y = -e.velocity.y;
        }
    }
}

fn sweep_dead(entities: &mut Vec<Entity>) -> Vec<WorldEvent> {
    let mut events = Vec::new();
    entities.retain(|e| {
        if e.is_dead() {
            tracing::debug!(id = %e.id, health = ?e.health, "user died");
            events.push(WorldEvent::Removed {
                id: e.id.clone(),
                kind: e.kind,
                cause: RemovalCause::Died,
            });
            false
        } else {
            true
        }
    });
    events
}
