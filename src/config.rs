//! Construction options for both table flavours.

use crate::digest::{Digest, XxDigest};
use crate::linear_hash::LinearHash;
use crate::linear_probe::LinearProbe;

/// Smallest bucket count a linear hash table starts with (and shrinks back to).
pub const MIN_CAPACITY: usize = 2;
/// Largest accepted initial capacity. Addressing computes `2 * modulus` and
/// the modulus can double once more, so this keeps both in range.
pub const MAX_CAPACITY: usize = usize::MAX / 4;
/// Smallest accepted split threshold.
pub const MIN_CHAIN_LENGTH: usize = 2;

pub const DEFAULT_CAPACITY: usize = 16;
pub const DEFAULT_MAX_CHAIN_LENGTH: usize = 8;
pub const DEFAULT_LOAD_FACTOR: f64 = 0.5;

/// Errors returned when building a table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A table needs at least one bucket.
    #[error("initial capacity must be positive")]
    ZeroCapacity,
    /// A zero threshold would split on every insert.
    #[error("max chain length must be positive")]
    ZeroChainLength,
    /// Capacity too large for the address arithmetic.
    #[error("initial capacity {requested} exceeds maximum {max}")]
    CapacityOverflow {
        /// Capacity asked for.
        requested: usize,
        /// Largest accepted capacity.
        max: usize,
    },
    /// Load factor outside `(0, 1)`.
    #[error("load factor must be in (0, 1), got {0}")]
    InvalidLoadFactor(f64),
}

fn checked_capacity(requested: usize) -> Result<usize, ConfigError> {
    match requested {
        0 => Err(ConfigError::ZeroCapacity),
        n if n > MAX_CAPACITY => Err(ConfigError::CapacityOverflow {
            requested: n,
            max: MAX_CAPACITY,
        }),
        n => Ok(n.max(MIN_CAPACITY)),
    }
}

/// Builder for [`LinearHash`].
///
/// ```
/// use linear_hashtable::Config;
///
/// let mut table = Config::new()
///     .initial_capacity(6)
///     .max_chain_length(4)
///     .seed(0x5eed)
///     .build()
///     .unwrap();
/// table.put("k", 1);
/// assert_eq!(table.get("k"), Some(&1));
/// ```
#[derive(Clone, Debug)]
pub struct Config<H = XxDigest> {
    initial_capacity: usize,
    max_chain_length: usize,
    digest: H,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the default xxh3 digest.
    pub fn seed(mut self, seed: u64) -> Self {
        self.digest = XxDigest::with_seed(seed);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            max_chain_length: DEFAULT_MAX_CHAIN_LENGTH,
            digest: XxDigest::default(),
        }
    }
}

impl<H: Digest> Config<H> {
    /// Bucket count the table starts with. Positive values below
    /// [`MIN_CAPACITY`] are raised to it.
    pub fn initial_capacity(mut self, n: usize) -> Self {
        self.initial_capacity = n;
        self
    }

    /// A chain longer than this after an insert triggers one split.
    /// Positive values below [`MIN_CHAIN_LENGTH`] are raised to it.
    pub fn max_chain_length(mut self, n: usize) -> Self {
        self.max_chain_length = n;
        self
    }

    /// Replace the digest, changing the table's digest type.
    pub fn digest<H2: Digest>(self, digest: H2) -> Config<H2> {
        Config {
            initial_capacity: self.initial_capacity,
            max_chain_length: self.max_chain_length,
            digest,
        }
    }

    pub fn build<V>(self) -> Result<LinearHash<V, H>, ConfigError> {
        let capacity = checked_capacity(self.initial_capacity)?;
        let max_chain = match self.max_chain_length {
            0 => return Err(ConfigError::ZeroChainLength),
            n => n.max(MIN_CHAIN_LENGTH),
        };
        Ok(LinearHash::from_parts(capacity, max_chain, self.digest))
    }
}

/// Builder for [`LinearProbe`].
#[derive(Clone, Debug)]
pub struct ProbeConfig<H = XxDigest> {
    initial_capacity: usize,
    load_factor: f64,
    digest: H,
}

impl ProbeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.digest = XxDigest::with_seed(seed);
        self
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
            digest: XxDigest::default(),
        }
    }
}

impl<H: Digest> ProbeConfig<H> {
    pub fn initial_capacity(mut self, n: usize) -> Self {
        self.initial_capacity = n;
        self
    }

    /// Fraction of slots (live plus tombstoned) allowed before the table
    /// grows by `1 / load_factor`.
    pub fn load_factor(mut self, factor: f64) -> Self {
        self.load_factor = factor;
        self
    }

    pub fn digest<H2: Digest>(self, digest: H2) -> ProbeConfig<H2> {
        ProbeConfig {
            initial_capacity: self.initial_capacity,
            load_factor: self.load_factor,
            digest,
        }
    }

    pub fn build<V>(self) -> Result<LinearProbe<V, H>, ConfigError> {
        let capacity = checked_capacity(self.initial_capacity)?;
        // Written as a negated range test so NaN is rejected too.
        if !(self.load_factor > 0.0 && self.load_factor < 1.0) {
            return Err(ConfigError::InvalidLoadFactor(self.load_factor));
        }
        Ok(LinearProbe::from_parts(capacity, self.load_factor, self.digest))
    }
}
