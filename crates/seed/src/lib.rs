//! Seed derivation and deterministic random streams.
//!
//! # Invariants
//! - Every value here is a pure function of its input text or integer seed.
//! - Output is bit-identical to the browser clients: SHA-256 hex digests,
//!   first 32 bits as the integer seed, mulberry32 as the generator.

pub mod hash;
pub mod rng;

pub use hash::{SeedError, SeedHex, digest, to_int32};
pub use rng::Mulberry32;
