//! Open-addressing hash map with linear probing, lazy tombstone deletion and
//! threshold-triggered growth.
//!
//! Every entry lives directly in the backing table. A removed entry is only
//! marked inactive: its slot keeps extending the probe chain of keys that
//! hashed into the same run, and is reclaimed the next time the table grows.
//! Only an empty slot ends a probe chain.

use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, BuildHasherDefault, Hash, Hasher};

pub const DEFAULT_INITIAL_CAPACITY: usize = 8;
pub const DEFAULT_LOAD_FACTOR: f64 = 0.7;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a over the bytes a key feeds to [`Hasher::write`].
///
/// Unlike `RandomState` it is unseeded, so slot placement is identical from
/// one run to the next.
#[derive(Debug, Clone, Copy)]
pub struct FnvHasher(u64);

impl Default for FnvHasher {
    fn default() -> Self {
        FnvHasher(FNV_OFFSET_BASIS)
    }
}

impl Hasher for FnvHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= u64::from(b);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

pub type FnvBuildHasher = BuildHasherDefault<FnvHasher>;

/// Minimal key/value contract the index and document store are written against.
pub trait KeyValueStore<K, V> {
    /// Insert `value` under `key`, overwriting any live value already there.
    fn set(&mut self, key: K, value: V);

    fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Logically delete `key`. Returns whether a live entry was removed.
    fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sizing knobs for [`OpenAddressingMap`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub initial_capacity: usize,
    /// Maximum ratio of occupied slots to capacity, strictly between 0 and 1.
    pub load_factor: f64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { initial_capacity: DEFAULT_INITIAL_CAPACITY, load_factor: DEFAULT_LOAD_FACTOR }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(SearchError::invalid("initial capacity must be at least 1"));
        }
        if !(self.load_factor > 0.0 && self.load_factor < 1.0) {
            return Err(SearchError::invalid(format!(
                "load factor must be in (0, 1), got {}",
                self.load_factor
            )));
        }
        Ok(())
    }
}

struct Entry<K, V> {
    key: K,
    value: V,
    is_active: bool,
}

pub struct OpenAddressingMap<K, V, S = FnvBuildHasher> {
    table: Vec<Option<Entry<K, V>>>,
    /// live entries
    len: usize,
    /// live entries plus tombstones
    occupied: usize,
    load_factor: f64,
    hash_builder: S,
}

impl<K, V> OpenAddressingMap<K, V, FnvBuildHasher> {
    pub fn new() -> Self {
        Self::from_parts(StoreConfig::default(), FnvBuildHasher::default())
    }

    pub fn with_config(config: StoreConfig) -> Result<Self> {
        Self::with_config_and_hasher(config, FnvBuildHasher::default())
    }
}

impl<K, V, S> OpenAddressingMap<K, V, S> {
    pub fn with_config_and_hasher(config: StoreConfig, hash_builder: S) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, hash_builder))
    }

    fn from_parts(config: StoreConfig, hash_builder: S) -> Self {
        Self {
            table: empty_table(config.initial_capacity),
            len: 0,
            occupied: 0,
            load_factor: config.load_factor,
            hash_builder,
        }
    }

    pub fn capacity(&self) -> usize {
        self.table.len()
    }

    /// Current ratio of occupied slots (tombstones included) to capacity.
    pub fn load_factor(&self) -> f64 {
        self.occupied as f64 / self.table.len() as f64
    }

    pub fn load_factor_threshold(&self) -> f64 {
        self.load_factor
    }

    /// Live entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.table
            .iter()
            .flatten()
            .filter(|e| e.is_active)
            .map(|e| (&e.key, &e.value))
    }

    fn exceeds_threshold(&self, occupied: usize, capacity: usize) -> bool {
        occupied as f64 > capacity as f64 * self.load_factor
    }
}

impl<K, V, S> OpenAddressingMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn home_slot<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        (self.hash_builder.hash_one(key) % self.table.len() as u64) as usize
    }

    /// Slot holding the live entry for `key`, if any.
    fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let capacity = self.table.len();
        let mut idx = self.home_slot(key);
        for _ in 0..capacity {
            match &self.table[idx] {
                None => return None,
                Some(e) if e.is_active && e.key.borrow() == key => return Some(idx),
                Some(_) => idx = (idx + 1) % capacity,
            }
        }
        None
    }

    /// First empty slot on `key`'s probe chain.
    fn vacant_slot(&self, key: &K) -> usize {
        let capacity = self.table.len();
        let mut idx = self.home_slot(key);
        for _ in 0..capacity {
            if self.table[idx].is_none() {
                return idx;
            }
            idx = (idx + 1) % capacity;
        }
        panic!(
            "open-addressing table saturated: {} of {} slots occupied",
            self.occupied, capacity
        );
    }

    /// Grow before writing a new key if that write would cross the threshold.
    fn reserve_one(&mut self) {
        let capacity = self.table.len();
        if !self.exceeds_threshold(self.occupied + 1, capacity) {
            return;
        }
        let mut new_capacity = capacity * 2;
        while self.exceeds_threshold(self.len + 1, new_capacity) {
            new_capacity *= 2;
        }
        self.resize(new_capacity);
    }

    fn resize(&mut self, new_capacity: usize) {
        let old = std::mem::replace(&mut self.table, empty_table(new_capacity));
        let tombstones = self.occupied - self.len;
        self.len = 0;
        self.occupied = 0;
        for entry in old.into_iter().flatten().filter(|e| e.is_active) {
            let idx = self.vacant_slot(&entry.key);
            self.table[idx] = Some(entry);
            self.len += 1;
        }
        self.occupied = self.len;
        tracing::debug!(capacity = new_capacity, len = self.len, tombstones, "store resized");
    }
}

impl<K, V, S> KeyValueStore<K, V> for OpenAddressingMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn set(&mut self, key: K, value: V) {
        if let Some(idx) = self.find(&key) {
            if let Some(entry) = self.table[idx].as_mut() {
                entry.value = value;
            }
            return;
        }
        self.reserve_one();
        let idx = self.vacant_slot(&key);
        self.table[idx] = Some(Entry { key, value, is_active: true });
        self.len += 1;
        self.occupied += 1;
    }

    fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.find(key)?;
        self.table[idx].as_ref().map(|e| &e.value)
    }

    fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.find(key)?;
        self.table[idx].as_mut().map(|e| &mut e.value)
    }

    fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(idx) = self.find(key) else { return false };
        if let Some(entry) = self.table[idx].as_mut() {
            entry.is_active = false;
            self.len -= 1;
        }
        true
    }

    fn len(&self) -> usize {
        self.len
    }
}

impl<K, V> Default for OpenAddressingMap<K, V, FnvBuildHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for OpenAddressingMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

fn empty_table<K, V>(capacity: usize) -> Vec<Option<Entry<K, V>>> {
    (0..capacity).map(|_| None).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sends every key to slot 0 so each insert extends one probe chain.
    #[derive(Default, Clone)]
    struct Collide;

    struct ZeroHasher;

    impl Hasher for ZeroHasher {
        fn write(&mut self, _: &[u8]) {}
        fn finish(&self) -> u64 {
            0
        }
    }

    impl BuildHasher for Collide {
        type Hasher = ZeroHasher;
        fn build_hasher(&self) -> ZeroHasher {
            ZeroHasher
        }
    }

    fn colliding(capacity: usize) -> OpenAddressingMap<String, u32, Collide> {
        let config = StoreConfig { initial_capacity: capacity, ..StoreConfig::default() };
        OpenAddressingMap::with_config_and_hasher(config, Collide).unwrap()
    }

    #[test]
    fn fnv1a_known_vectors() {
        let h = FnvHasher::default();
        assert_eq!(h.finish(), 0xcbf29ce484222325);
        let mut h = FnvHasher::default();
        h.write(b"a");
        assert_eq!(h.finish(), 0xaf63dc4c8601ec8c);
        let mut h = FnvHasher::default();
        h.write(b"foobar");
        assert_eq!(h.finish(), 0x85944171f73967e8);
    }

    #[test]
    fn get_on_empty_store_is_absent() {
        let m: OpenAddressingMap<String, u32> = OpenAddressingMap::new();
        assert_eq!(m.get("missing"), None);
        assert!(!m.contains("missing"));
        assert!(m.is_empty());
        assert_eq!(m.capacity(), DEFAULT_INITIAL_CAPACITY);
    }

    #[test]
    fn overwrite_keeps_size() {
        let mut m = OpenAddressingMap::new();
        m.set("k".to_string(), 1);
        m.set("k".to_string(), 2);
        assert_eq!(m.get("k"), Some(&2));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn load_factor_never_exceeds_threshold() {
        let mut m = OpenAddressingMap::new();
        for i in 0..500u32 {
            m.set(format!("key{i}"), i);
            assert!(m.len() as f64 <= m.capacity() as f64 * m.load_factor_threshold());
            for j in 0..=i {
                assert_eq!(m.get(format!("key{j}").as_str()), Some(&j), "lost key{j} after {i}");
            }
        }
    }

    #[test]
    fn growth_doubles_capacity() {
        let mut m = OpenAddressingMap::new();
        for i in 0..5u32 {
            m.set(i, i);
        }
        assert_eq!(m.capacity(), 8);
        m.set(5, 5);
        assert_eq!(m.capacity(), 16);
        assert_eq!(m.len(), 6);
    }

    #[test]
    fn colliding_keys_survive_resize() {
        let mut m = colliding(2);
        for i in 0..20u32 {
            m.set(format!("k{i}"), i);
        }
        assert!(m.capacity() > 2);
        for i in 0..20u32 {
            assert_eq!(m.get(format!("k{i}").as_str()), Some(&i));
        }
    }

    #[test]
    fn tombstone_does_not_break_probe_chain() {
        let mut m = colliding(8);
        m.set("a".to_string(), 1);
        m.set("b".to_string(), 2);
        m.set("c".to_string(), 3);
        assert!(m.remove("b"));
        assert!(!m.contains("b"));
        assert_eq!(m.get("c"), Some(&3));
        assert_eq!(m.len(), 2);
        assert!(!m.remove("b"));
    }

    #[test]
    fn reinsert_after_remove() {
        let mut m = colliding(8);
        m.set("a".to_string(), 1);
        m.remove("a");
        m.set("a".to_string(), 7);
        assert_eq!(m.get("a"), Some(&7));
        assert_eq!(m.len(), 1);
        // the tombstone still counts against the threshold
        assert!((m.load_factor() - 2.0 / 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn resize_drops_tombstones() {
        let mut m = OpenAddressingMap::new();
        for i in 0..5u32 {
            m.set(i, i);
        }
        for i in 0..4u32 {
            m.remove(&i);
        }
        m.set(100, 100);
        assert_eq!(m.capacity(), 16);
        assert_eq!(m.len(), 2);
        assert!((m.load_factor() - 2.0 / 16.0).abs() < f64::EPSILON);
        assert_eq!(m.get(&4), Some(&4));
        assert_eq!(m.get(&100), Some(&100));
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut m: OpenAddressingMap<String, Vec<u32>> = OpenAddressingMap::new();
        m.set("rust".into(), Vec::new());
        m.get_mut("rust").unwrap().push(3);
        m.get_mut("rust").unwrap().push(4);
        assert_eq!(m.get("rust").map(Vec::as_slice), Some(&[3, 4][..]));
    }

    #[test]
    fn capacity_one_grows_before_first_insert() {
        let config = StoreConfig { initial_capacity: 1, load_factor: 0.7 };
        let mut m = OpenAddressingMap::with_config(config).unwrap();
        m.set(1u32, "one");
        assert_eq!(m.capacity(), 2);
        assert_eq!(m.get(&1), Some(&"one"));
    }

    #[test]
    fn low_threshold_doubles_until_insert_fits() {
        let config = StoreConfig { initial_capacity: 1, load_factor: 0.3 };
        let mut m = OpenAddressingMap::with_config(config).unwrap();
        m.set(7u32, 7u32);
        assert_eq!(m.capacity(), 4);
        assert_eq!(m.get(&7), Some(&7));
    }

    #[test]
    fn rejects_bad_config() {
        let zero = StoreConfig { initial_capacity: 0, load_factor: 0.7 };
        assert!(OpenAddressingMap::<u32, u32>::with_config(zero).is_err());
        for lf in [0.0, 1.0, 1.5, -0.1, f64::NAN] {
            let c = StoreConfig { initial_capacity: 8, load_factor: lf };
            assert!(matches!(c.validate(), Err(SearchError::InvalidArgument(_))), "{lf}");
        }
    }

    #[test]
    fn debug_lists_live_entries_only() {
        let mut m = OpenAddressingMap::new();
        m.set(1u32, "x");
        m.set(2u32, "y");
        m.remove(&2);
        assert_eq!(format!("{m:?}"), r#"{1: "x"}"#);
    }
}
