//! Clock synchronization: lets independently started clients agree on "now".
//!
//! # Invariants
//! - A failed probe never changes the current offset.
//! - `now()` is the local clock plus the last successful offset (0 until one succeeds).

mod source;
mod sync;

#[cfg(feature = "http-probe")]
mod http;

#[cfg(feature = "http-probe")]
pub use http::HttpDateSource;
pub use source::{ClockError, LocalClock, ManualClock, ReferenceSource, SystemClock};
pub use sync::ClockSync;
