//! LinearHash: incrementally resizing chained hash table.
//!
//! Geometry is described by three numbers: the modulus `n`, the split
//! pointer `p` and the bucket count, which is always `n + p`. Buckets
//! `[0, p)` and `[n, n + p)` have already been split this growth round and
//! are addressed with `hash % 2n`; buckets `[p, n)` still use `hash % n`.
//! Growth splits exactly one bucket per overflowing insert, and a full
//! round of `n` splits doubles the modulus.
//!
//! Entries live in a slot arena and buckets hold arena keys in insertion
//! order, so redistribution moves keys between buckets without touching
//! the entries themselves. Each entry keeps its digest; the caller's
//! [`Digest`] runs once per operation and never during a split.

use crate::config::{DEFAULT_CAPACITY, DEFAULT_MAX_CHAIN_LENGTH, MAX_CAPACITY, MIN_CAPACITY};
use crate::digest::{Digest, XxDigest};
use crate::reentrancy::DebugReentrancy;
use crate::stats::Stats;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    struct EntryKey;
}

#[derive(Debug)]
struct Entry<V> {
    key: String,
    value: V,
    hash: u64,
}

/// Chained hash table keyed by `String` that grows and shrinks one bucket
/// at a time.
///
/// ```
/// use linear_hashtable::LinearHash;
///
/// let mut t = LinearHash::with_capacity(6);
/// for i in 0..100 {
///     t.put(i.to_string(), format!("value {i}"));
/// }
/// assert_eq!(t.get("42").map(String::as_str), Some("value 42"));
/// assert_eq!(t.delete("42"), Some("value 42".to_string()));
/// assert_eq!(t.len(), 99);
/// ```
#[derive(Debug)]
pub struct LinearHash<V, H = XxDigest> {
    digest: H,
    slots: SlotMap<EntryKey, Entry<V>>,
    buckets: Vec<Vec<EntryKey>>,
    modulus: usize,
    split_pointer: usize,
    // Bucket count at construction; unsplit never goes below it.
    min_capacity: usize,
    max_chain_length: usize,
    reentrancy: DebugReentrancy,
}

impl<V> LinearHash<V> {
    /// Empty table with the default geometry and the unseeded xxh3 digest.
    pub fn new() -> Self {
        Self::from_parts(DEFAULT_CAPACITY, DEFAULT_MAX_CHAIN_LENGTH, XxDigest::default())
    }

    /// Like [`Config::build`](crate::Config::build) with only the capacity
    /// set, except that out-of-range capacities are clamped instead of
    /// rejected.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_parts(
            capacity.clamp(MIN_CAPACITY, MAX_CAPACITY),
            DEFAULT_MAX_CHAIN_LENGTH,
            XxDigest::default(),
        )
    }
}

impl<V> Default for LinearHash<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, H: Digest> LinearHash<V, H> {
    /// Default geometry with a caller-supplied digest.
    pub fn with_digest(digest: H) -> Self {
        Self::from_parts(DEFAULT_CAPACITY, DEFAULT_MAX_CHAIN_LENGTH, digest)
    }

    /// `capacity` and `max_chain_length` are already validated.
    pub(crate) fn from_parts(capacity: usize, max_chain_length: usize, digest: H) -> Self {
        debug_assert!(capacity >= MIN_CAPACITY);
        let mut buckets = Vec::with_capacity(capacity);
        buckets.resize_with(capacity, Vec::new);
        Self {
            digest,
            slots: SlotMap::with_key(),
            buckets,
            modulus: capacity,
            split_pointer: 0,
            min_capacity: capacity,
            max_chain_length,
            reentrancy: DebugReentrancy::new(),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current number of buckets (`modulus + split_pointer`).
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Insert or overwrite. Returns the previous value when `key` was
    /// already present; in that case the table shape does not change.
    pub fn put(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        let hash = self.hash_of(&key);
        let bucket = self.bucket_for(hash);

        if let Some((_, ek)) = self.find_in(bucket, hash, &key) {
            return Some(core::mem::replace(&mut self.slots[ek].value, value));
        }

        let ek = self.slots.insert(Entry { key, value, hash });
        let chain = &mut self.buckets[bucket];
        chain.push(ek);
        if chain.len() > self.max_chain_length {
            self.split();
        }
        None
    }

    /// Borrow the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        let hash = self.hash_of(key);
        let (_, ek) = self.find_in(self.bucket_for(hash), hash, key)?;
        self.slots.get(ek).map(|e| &e.value)
    }

    /// Mutably borrow the value under `key`; the table shape is untouched.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let hash = self.hash_of(key);
        let (_, ek) = self.find_in(self.bucket_for(hash), hash, key)?;
        self.slots.get_mut(ek).map(|e| &mut e.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        let hash = self.hash_of(key);
        self.find_in(self.bucket_for(hash), hash, key).is_some()
    }

    /// Remove `key`, returning its value. A successful removal reclaims any
    /// empty buckets at the tail of the table.
    pub fn delete(&mut self, key: &str) -> Option<V> {
        let hash = self.hash_of(key);
        let bucket = self.bucket_for(hash);
        let (pos, ek) = self.find_in(bucket, hash, key)?;

        // Vec::remove keeps the remaining chain in insertion order.
        self.buckets[bucket].remove(pos);
        let entry = self.slots.remove(ek)?;
        self.unsplit();
        Some(entry.value)
    }

    /// Drop every entry and return to the construction-time geometry.
    pub fn clear(&mut self) {
        let _g = self.reentrancy.enter();
        self.slots.clear();
        self.buckets.truncate(self.min_capacity);
        self.buckets.iter_mut().for_each(Vec::clear);
        self.modulus = self.min_capacity;
        self.split_pointer = 0;
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(capacity = self.min_capacity, "linear hash cleared");
        }
    }

    /// Snapshot of the table geometry and per-bucket chain lengths.
    pub fn stats(&self) -> Stats {
        let _g = self.reentrancy.enter();
        Stats {
            modulus: self.modulus,
            capacity: self.buckets.len(),
            size: self.slots.len(),
            split_pointer: self.split_pointer,
            max_chain_length: self.max_chain_length,
            chain_lengths: self.buckets.iter().map(Vec::len).collect(),
        }
    }

    /// Iterate live entries in arbitrary order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            it: self.slots.iter(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Run the caller's digest. This is the only place caller code runs, so
    /// the reentrancy guard covers exactly this call.
    fn hash_of(&self, key: &str) -> u64 {
        let _g = self.reentrancy.enter();
        self.digest.digest(key)
    }

    /// Dual-modulus address: `hash % 2n`, folded back into the low half
    /// when that bucket has not been split off yet.
    fn bucket_for(&self, hash: u64) -> usize {
        let n = self.modulus as u64;
        let idx = hash % (2 * n);
        let idx = if idx < n + self.split_pointer as u64 {
            idx
        } else {
            idx - n
        };
        idx as usize
    }

    fn find_in(&self, bucket: usize, hash: u64, key: &str) -> Option<(usize, EntryKey)> {
        self.buckets[bucket]
            .iter()
            .position(|&ek| {
                self.slots
                    .get(ek)
                    .is_some_and(|e| e.hash == hash && e.key == key)
            })
            .map(|pos| (pos, self.buckets[bucket][pos]))
    }

    /// Add one bucket and redistribute the chain at the split pointer.
    fn split(&mut self) {
        let from = self.split_pointer;
        self.buckets.push(Vec::new());
        self.split_pointer += 1;
        let wrapped = self.split_pointer == self.modulus;
        if wrapped {
            self.modulus *= 2;
            self.split_pointer = 0;
        }

        // Geometry is final before any entry moves, so `bucket_for` already
        // sees the new bucket. Entries land either back in `from` or in the
        // new tail bucket, in their original relative order.
        let chain = core::mem::take(&mut self.buckets[from]);
        for ek in chain {
            let to = self.bucket_for(self.slots[ek].hash);
            self.buckets[to].push(ek);
        }

        if tracing::enabled!(tracing::Level::TRACE) {
            tracing::trace!(
                bucket = from,
                modulus = self.modulus,
                split_pointer = self.split_pointer,
                capacity = self.buckets.len(),
                wrapped,
                "linear hash split"
            );
        }
    }

    /// Reclaim empty buckets from the tail, undoing splits one at a time.
    ///
    /// An empty tail bucket holds nothing to merge back, so each step is
    /// O(1). Reclaiming the whole empty tail (rather than one bucket) is
    /// what brings an emptied table back to its construction geometry
    /// regardless of deletion order.
    fn unsplit(&mut self) {
        while self.buckets.len() > self.min_capacity
            && self.buckets.last().is_some_and(Vec::is_empty)
        {
            self.buckets.pop();
            // Inverse of the wrap in `split`: (2n, 0) goes back to (n, n - 1).
            let wrapped = self.split_pointer == 0;
            if wrapped {
                self.modulus /= 2;
                self.split_pointer = self.modulus - 1;
            } else {
                self.split_pointer -= 1;
            }

            if tracing::enabled!(tracing::Level::TRACE) {
                tracing::trace!(
                    modulus = self.modulus,
                    split_pointer = self.split_pointer,
                    capacity = self.buckets.len(),
                    wrapped,
                    "linear hash unsplit"
                );
            }
        }
    }

    /// Panics unless geometry and placement invariants hold.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert!(self.modulus >= self.min_capacity);
        assert!(self.split_pointer < self.modulus);
        assert_eq!(self.buckets.len(), self.modulus + self.split_pointer);
        assert!(self.buckets.len() >= self.min_capacity);
        let mut seen = 0;
        for (b, chain) in self.buckets.iter().enumerate() {
            for &ek in chain {
                let e = &self.slots[ek];
                assert_eq!(self.digest.digest(&e.key), e.hash, "stale digest");
                assert_eq!(self.bucket_for(e.hash), b, "key {:?} stranded", e.key);
                seen += 1;
            }
        }
        assert_eq!(seen, self.slots.len());
    }

    #[cfg(test)]
    pub(crate) fn geometry(&self) -> (usize, usize, usize) {
        (self.modulus, self.split_pointer, self.buckets.len())
    }

    #[cfg(test)]
    fn chain_keys(&self, bucket: usize) -> Vec<&str> {
        self.buckets[bucket]
            .iter()
            .map(|&ek| self.slots[ek].key.as_str())
            .collect()
    }
}

impl<S: Into<String>, V> FromIterator<(S, V)> for LinearHash<V> {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        let mut t = LinearHash::new();
        t.extend(iter);
        t
    }
}

impl<S: Into<String>, V, H: Digest> Extend<(S, V)> for LinearHash<V, H> {
    fn extend<I: IntoIterator<Item = (S, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

/// Iterator over `(key, value)` pairs of a [`LinearHash`].
pub struct Iter<'a, V> {
    it: slotmap::basic::Iter<'a, EntryKey, Entry<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (e.key.as_str(), &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a, V, H: Digest> IntoIterator for &'a LinearHash<V, H> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
