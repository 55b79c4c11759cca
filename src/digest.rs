//! Pluggable key hashing.

use core::hash::BuildHasher;
use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Maps a key to a 64-bit digest.
///
/// Implementations must be deterministic for the lifetime of a table:
/// entries are placed by their digest at insertion time, and a digest that
/// changes afterwards strands them in buckets the address function no
/// longer points at. Distribution quality is the implementor's concern; a
/// poor digest degrades speed, never correctness.
pub trait Digest {
    fn digest(&self, key: &str) -> u64;
}

impl<F> Digest for F
where
    F: Fn(&str) -> u64,
{
    #[inline]
    fn digest(&self, key: &str) -> u64 {
        self(key)
    }
}

/// Default digest: xxh3-64 over the key bytes with an explicit seed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct XxDigest {
    seed: u64,
}

impl XxDigest {
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl Digest for XxDigest {
    #[inline]
    fn digest(&self, key: &str) -> u64 {
        xxh3_64_with_seed(key.as_bytes(), self.seed)
    }
}

/// Adapts any [`BuildHasher`] (for example `std`'s `RandomState`) into a
/// [`Digest`]. The builder is captured once, so per-table randomness stays
/// fixed for the table's lifetime.
#[derive(Clone, Debug, Default)]
pub struct BuildHasherDigest<S>(pub S);

impl<S: BuildHasher> Digest for BuildHasherDigest<S> {
    #[inline]
    fn digest(&self, key: &str) -> u64 {
        self.0.hash_one(key)
    }
}
