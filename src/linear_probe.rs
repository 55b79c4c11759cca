//! LinearProbe: open-addressing table with tombstones and whole-table resize.
//!
//! Simpler sibling of [`LinearHash`](crate::LinearHash): one flat slot
//! array, collisions resolved by scanning forward. Deletion leaves a
//! tombstone so later probes keep walking past it. When live entries plus
//! tombstones would exceed `capacity * load_factor` the table is rebuilt at
//! `capacity / load_factor` slots, which also drops every tombstone.

use crate::config::{DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, MAX_CAPACITY, MIN_CAPACITY};
use crate::digest::{Digest, XxDigest};
use crate::reentrancy::DebugReentrancy;

#[derive(Debug)]
enum Slot<V> {
    Empty,
    Tombstone,
    Occupied { key: String, value: V, hash: u64 },
}

enum Probe {
    Found(usize),
    // First tombstone on the probe path, else the empty slot that ended it.
    Vacant(usize),
    Full,
}

#[derive(Debug)]
pub struct LinearProbe<V, H = XxDigest> {
    digest: H,
    slots: Vec<Slot<V>>,
    live: usize,
    tombstones: usize,
    load_factor: f64,
    reentrancy: DebugReentrancy,
}

fn empty_slots<V>(n: usize) -> Vec<Slot<V>> {
    let mut slots = Vec::with_capacity(n);
    slots.resize_with(n, || Slot::Empty);
    slots
}

impl<V> LinearProbe<V> {
    /// Empty table with the default capacity and load factor.
    pub fn new() -> Self {
        Self::from_parts(DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, XxDigest::default())
    }

    /// Empty table with `capacity` slots, clamped to the accepted range.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_parts(
            capacity.clamp(MIN_CAPACITY, MAX_CAPACITY),
            DEFAULT_LOAD_FACTOR,
            XxDigest::default(),
        )
    }
}

impl<V> Default for LinearProbe<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, H: Digest> LinearProbe<V, H> {
    pub(crate) fn from_parts(capacity: usize, load_factor: f64, digest: H) -> Self {
        Self {
            digest,
            slots: empty_slots(capacity),
            live: 0,
            tombstones: 0,
            load_factor,
            reentrancy: DebugReentrancy::new(),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Deleted slots not yet reclaimed by a rebuild.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Insert or overwrite, returning the previous value for an existing
    /// key. May rebuild the whole slot array first.
    pub fn put(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        let hash = self.hash_of(&key);

        if let Probe::Found(idx) = self.probe(hash, &key) {
            if let Slot::Occupied { value: old, .. } = &mut self.slots[idx] {
                return Some(core::mem::replace(old, value));
            }
        }

        loop {
            match self.probe(hash, &key) {
                Probe::Vacant(idx) if !self.needs_rebuild() => {
                    if matches!(self.slots[idx], Slot::Tombstone) {
                        self.tombstones -= 1;
                    }
                    self.slots[idx] = Slot::Occupied { key, value, hash };
                    self.live += 1;
                    return None;
                }
                _ => self.rebuild(),
            }
        }
    }

    /// Borrow the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        let hash = self.hash_of(key);
        match self.probe(hash, key) {
            Probe::Found(idx) => match &self.slots[idx] {
                Slot::Occupied { value, .. } => Some(value),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove `key`, leaving a tombstone in its slot.
    pub fn delete(&mut self, key: &str) -> Option<V> {
        let hash = self.hash_of(key);
        let Probe::Found(idx) = self.probe(hash, key) else {
            return None;
        };
        match core::mem::replace(&mut self.slots[idx], Slot::Tombstone) {
            Slot::Occupied { value, .. } => {
                self.live -= 1;
                self.tombstones += 1;
                Some(value)
            }
            other => {
                self.slots[idx] = other;
                None
            }
        }
    }

    /// Iterate live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.slots.iter().filter_map(|s| match s {
            Slot::Occupied { key, value, .. } => Some((key.as_str(), value)),
            _ => None,
        })
    }

    fn hash_of(&self, key: &str) -> u64 {
        let _g = self.reentrancy.enter();
        self.digest.digest(key)
    }

    fn home(&self, hash: u64) -> usize {
        (hash % self.slots.len() as u64) as usize
    }

    fn probe(&self, hash: u64, key: &str) -> Probe {
        let cap = self.slots.len();
        let start = self.home(hash);
        let mut first_free = None;
        for i in 0..cap {
            let idx = (start + i) % cap;
            match &self.slots[idx] {
                Slot::Empty => return Probe::Vacant(first_free.unwrap_or(idx)),
                Slot::Tombstone => {
                    first_free.get_or_insert(idx);
                }
                Slot::Occupied { key: k, hash: h, .. } => {
                    if *h == hash && k == key {
                        return Probe::Found(idx);
                    }
                }
            }
        }
        first_free.map_or(Probe::Full, Probe::Vacant)
    }

    fn needs_rebuild(&self) -> bool {
        (self.live + self.tombstones + 1) as f64 > self.slots.len() as f64 * self.load_factor
    }

    /// Reinsert live entries into a fresh slot array. Grows by
    /// `1 / load_factor` unless tombstones outnumber live entries, in which
    /// case the size is kept and only the tombstones go.
    fn rebuild(&mut self) {
        let old_cap = self.slots.len();
        let new_cap = if self.tombstones > self.live {
            old_cap
        } else {
            ((old_cap as f64 / self.load_factor).ceil() as usize).max(old_cap + 1)
        };

        // new_cap > live, so the forward scan below always meets an empty slot.
        debug_assert!(new_cap > self.live);
        let old = core::mem::replace(&mut self.slots, empty_slots(new_cap));
        self.tombstones = 0;
        for slot in old {
            if let Slot::Occupied { key, value, hash } = slot {
                let mut idx = self.home(hash);
                while !matches!(self.slots[idx], Slot::Empty) {
                    idx = (idx + 1) % new_cap;
                }
                self.slots[idx] = Slot::Occupied { key, value, hash };
            }
        }

        if tracing::enabled!(tracing::Level::TRACE) {
            tracing::trace!(
                from = old_cap,
                to = new_cap,
                live = self.live,
                "linear probe rebuild"
            );
        }
    }
}
