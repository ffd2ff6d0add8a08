//! Attack maps and the cache that remembers them.
//!
//! An [`AttackMap`] is the set of points one side's pseudo moves land on. Check
//! tests during legality filtering ask for the same map many times over, so
//! [`AttackCache`] keeps recent maps keyed by the board's Zobrist key mixed with
//! the attacker's key.
//!
//! Features:
//! - Bucket count rounded up to a power of two
//! - Direct-mapped, one entry per bucket, newest entry wins
//! - Stats: probes, hits, stores

use crate::engine::{NUM_SQUARES, Sq};
use std::fmt;

// =====================
// Attack Map
// =====================

/// Set of board points, one bit per square.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AttackMap(u128);

impl AttackMap {
    pub const EMPTY: AttackMap = AttackMap(0);

    pub fn insert(&mut self, s: Sq) {
        debug_assert!(s < NUM_SQUARES);
        self.0 |= 1u128 << s;
    }

    pub fn contains(&self, s: Sq) -> bool {
        s < NUM_SQUARES && self.0 & (1u128 << s) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Sq> + '_ {
        (0..NUM_SQUARES).filter(move |&s| self.contains(s))
    }
}

impl FromIterator<Sq> for AttackMap {
    fn from_iter<I: IntoIterator<Item = Sq>>(iter: I) -> Self {
        let mut map = AttackMap::EMPTY;
        for s in iter {
            map.insert(s);
        }
        map
    }
}

impl fmt::Debug for AttackMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// =====================
// Cache
// =====================

#[derive(Clone, Copy, Debug, Default)]
struct CacheEntry {
    key: u64,
    map: AttackMap,
    filled: bool,
}

#[derive(Clone, Debug)]
pub struct AttackCache {
    buckets: Vec<CacheEntry>,
    mask: usize, // buckets.len() - 1

    // Stats
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

impl AttackCache {
    /// A cache with at least `buckets` entries (rounded up to a power of two, minimum 1).
    pub fn new_buckets(buckets: usize) -> Self {
        let count = buckets.max(1).next_power_of_two();
        AttackCache {
            buckets: vec![CacheEntry::default(); count],
            mask: count - 1,
            probes: 0,
            hits: 0,
            stores: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    fn index_of(&self, key: u64) -> usize {
        // xor-fold to reduce clustering
        let folded = key ^ (key >> 32) ^ (key >> 16);
        (folded as usize) & self.mask
    }

    pub fn probe(&mut self, key: u64) -> Option<AttackMap> {
        self.probes = self.probes.wrapping_add(1);
        let entry = self.buckets[self.index_of(key)];
        if !entry.filled || entry.key != key {
            return None;
        }
        self.hits = self.hits.wrapping_add(1);
        Some(entry.map)
    }

    /// Overwrites whatever the bucket held.
    pub fn store(&mut self, key: u64, map: AttackMap) {
        self.stores = self.stores.wrapping_add(1);
        let idx = self.index_of(key);
        self.buckets[idx] = CacheEntry {
            key,
            map,
            filled: true,
        };
    }

    /// Empty every bucket and reset the counters.
    pub fn clear(&mut self) {
        self.buckets.fill(CacheEntry::default());
        self.probes = 0;
        self.hits = 0;
        self.stores = 0;
    }

    pub fn stats(&self) -> String {
        format!(
            "attack cache: buckets={} probes={} hits={} stores={} hit_rate={:.2}%",
            self.buckets.len(),
            self.probes,
            self.hits,
            self.stores,
            if self.probes == 0 {
                0.0
            } else {
                (self.hits as f64 / self.probes as f64) * 100.0
            }
        )
    }
}
