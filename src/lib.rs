//! linear-hashtable: a string-keyed hash table that resizes one bucket at
//! a time.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: amortized O(1) `put`/`get`/`delete` with no stop-the-world
//!   rehash. Growth and shrinkage are spread across operations so the
//!   worst single insert costs one chain scan plus one bucket's worth of
//!   redistribution.
//! - Layers:
//!   - `Digest`: narrow hashing capability (`&str -> u64`) injected at
//!     construction; seeded xxh3 by default.
//!   - `LinearHash<V, H>`: the linear-hashing engine. Buckets are chains of
//!     arena keys; a split pointer and a modulus decide which buckets use
//!     the doubled address space.
//!   - `LinearProbe<V, H>`: open-addressing sibling with tombstones and
//!     whole-table rebuilds, for comparison.
//!   - `Config` / `ProbeConfig`: builders that floor small settings and
//!     reject unusable ones with `ConfigError`.
//!
//! Constraints
//! - Single-threaded and synchronous. Wrap the table in a `Mutex` for
//!   shared use.
//! - Keys are `String`; lookups take `&str`.
//! - Missing keys are not errors: `get`/`delete` return `Option`.
//! - The digest must be deterministic for the table's lifetime. A poor
//!   digest (even a constant) keeps every key reachable; it only makes
//!   chains long.
//!
//! Geometry invariants (`LinearHash`)
//! - `capacity == modulus + split_pointer` and `split_pointer < modulus`.
//! - Every entry sits in the bucket its stored digest addresses under the
//!   current geometry.
//! - Deleting everything that was inserted returns the table to its
//!   construction geometry.
//!
//! Reentrancy
//! - The digest is the only caller code the tables run. A debug-only guard
//!   on each public method panics if the digest re-enters the same table.

pub mod config;
pub mod digest;
pub mod linear_hash;
#[cfg(test)]
mod linear_hash_proptest;
pub mod linear_probe;
mod reentrancy;
pub mod stats;

// Public surface
pub use config::{Config, ConfigError, ProbeConfig};
pub use digest::{BuildHasherDigest, Digest, XxDigest};
pub use linear_hash::LinearHash;
pub use linear_probe::LinearProbe;
pub use stats::{ChainSummary, Stats};
