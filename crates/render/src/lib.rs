//! Rendering Adapter: the sink the simulation hands each new world to.
//!
//! # Invariants
//! - Renderers read world state; they never mutate it.
//! - A failing renderer cannot affect the simulation; callers log and move on.
//!
//! 3D scene management lives with the host. This crate holds the trait, the
//! health-to-color mapping every renderer shares, and a text renderer used by
//! the CLI and tests.

mod renderer;
mod tint;

pub use renderer::{DebugTextRenderer, RenderError, Renderer, describe};
pub use tint::Tint;
