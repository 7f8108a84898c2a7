//! Session lifecycle: recognizes start commands, snapshots the roster, builds a
//! fresh world and keeps it stepping in phase with the shared clock.
//!
//! # Invariants
//! - A new world replaces the old one in a single assignment.
//! - Only the newest start (by generation) is ever installed.
//! - Steps run one at a time, in order, with the same fixed `dt`.

mod command;
mod controller;
mod source;

pub use command::{ChatLine, StartCommand, parse_start_command};
pub use controller::{PendingStart, SessionController, SessionState};
pub use source::{CommandSource, RosterSource, SourceError, StaticRoster};
