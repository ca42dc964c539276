//! topkit: bounded heavy-hitter counters with a compact binary codec.
//!
//! A table tracks at most `maxsize` keys with approximate counts, evicting
//! the current minimum when a new key arrives at a full table. Two stores
//! implement the same contract: [`store::ArrayTopK`] and [`store::ListTopK`].
//! See `DESIGN.md` for internal architecture and invariants.

pub mod builder;
pub mod codec;
pub mod ds;
pub mod error;
pub mod store;
pub mod traits;

#[cfg(feature = "concurrency")]
pub mod concurrent;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
