use battletanks_common::EntityKind;
use battletanks_kernel::{RemovalCause, WorldEvent, WorldState};
use std::fmt::Write as _;
use std::io::Write;

use crate::tint::Tint;

/// Errors a renderer may report back to the host.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("render backend error: {0}")]
    Backend(String),
}

/// Renderer-agnostic sink. The host calls it after every simulation step.
///
/// The renderer gets a read-only view of the world plus the events the step
/// produced. Errors are reported, but the simulation never depends on them.
pub trait Renderer {
    fn render(&mut self, world: &WorldState, events: &[WorldEvent]) -> Result<(), RenderError>;
}

/// Human-readable dump of a world: header line plus one line per entity.
pub fn describe(world: &WorldState) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "=== World (label={:?}, tick={}, seed={:.16}) ===",
        world.level_label(),
        world.tick(),
        world.session_seed_hex()
    );
    let _ = writeln!(
        out,
        "Entities: {} (users={}, foes={}, food={}) hash={:#018x}",
        world.len(),
        world.count(EntityKind::User),
        world.count(EntityKind::Foe),
        world.count(EntityKind::Food),
        world.state_hash()
    );
    for e in world.entities() {
        let tint = Tint::for_entity(e);
        let health = e.health.map(|h| format!(" hp={h}")).unwrap_or_default();
        let _ = writeln!(
            out,
            "  {:<4} {:<12} pos=({:.2}, {:.2}) vel=({:.2}, {:.2}) hsl=({:.2}, {:.2}, {:.2}){}",
            e.kind.tag(),
            e.id.as_str(),
            e.position.x,
            e.position.y,
            e.velocity.x,
            e.velocity.y,
            tint.hue,
            tint.saturation,
            tint.lightness,
            health
        );
    }
    out
}

/// Text renderer writing to any `io::Write`.
///
/// Prints removals as they happen and a full dump every `every` ticks
/// (`0` disables dumps).
#[derive(Debug)]
pub struct DebugTextRenderer<W> {
    out: W,
    every: u64,
}

impl<W: Write> DebugTextRenderer<W> {
    pub fn new(out: W, every: u64) -> Self {
        Self { out, every }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for DebugTextRenderer<W> {
    fn render(&mut self, world: &WorldState, events: &[WorldEvent]) -> Result<(), RenderError> {
        for event in events {
            if let WorldEvent::Removed { id, kind, cause } = event {
                match cause {
                    RemovalCause::Eaten { by } => {
                        writeln!(self.out, "[tick {}] {by} ate {kind} {id}", world.tick())?
                    }
                    RemovalCause::Died => writeln!(self.out, "[tick {}] {id} died", world.tick())?,
                }
            }
        }
        if self.every > 0 && world.tick() % self.every == 0 {
            self.out.write_all(describe(world).as_bytes())?;
        }
        Ok(())
    }
}
