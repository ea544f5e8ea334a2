use core::fmt::Debug;

use crate::config::TableConfig;
use crate::error::TableError;
use crate::hash_code::HashCode;
use crate::hash_table::Entry;
use crate::hash_table::HashTable;
use crate::snapshot::BucketSnapshot;

/// A hash set implemented using the chained [`HashTable`] as the underlying
/// storage.
///
/// `HashSet<K>` stores keys where `K` implements [`HashCode`] `+ Eq`, with the
/// same bucket placement, growth and introspection as [`HashMap`].
///
/// [`HashMap`]: crate::HashMap
#[derive(Clone)]
pub struct HashSet<K> {
    table: HashTable<K>,
}

impl<K> PartialEq for HashSet<K>
where
    K: HashCode + Eq,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|k| other.contains(k))
    }
}

impl<K> Eq for HashSet<K> where K: HashCode + Eq {}

impl<K> Debug for HashSet<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K> HashSet<K> {
    /// Creates an empty set with 7 buckets and a 0.75 load factor ceiling.
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// Creates an empty set with `capacity` buckets (at least 3).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
        }
    }

    /// Creates an empty set from `config`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashSet;
    /// use chain_hash::TableConfig;
    ///
    /// let mut set = HashSet::with_config(TableConfig::new().with_initial_capacity(31).with_growth(false));
    /// set.extend(0..100);
    /// assert_eq!(set.capacity(), 31);
    /// assert_eq!(set.max_chain_length(), 4);
    /// ```
    pub fn with_config(config: TableConfig) -> Self {
        Self {
            table: HashTable::with_config(config),
        }
    }

    /// Returns the number of keys in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no keys.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of buckets.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Returns the load factor ceiling.
    pub fn threshold(&self) -> f64 {
        self.table.threshold()
    }

    /// Sets the load factor ceiling. Values outside `[0.5, 0.95]` are clamped.
    pub fn set_threshold(&mut self, threshold: f64) {
        self.table.set_threshold(threshold);
    }

    /// Removes all keys. The bucket count is kept.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the keys in bucket order.
    pub fn iter(&self) -> crate::hash_table::Iter<'_, K> {
        self.table.iter()
    }

    /// Length of the longest chain.
    pub fn max_chain_length(&self) -> usize {
        self.table.max_chain_length()
    }

    /// Mean chain length over all buckets.
    pub fn avg_chain_length(&self) -> f64 {
        self.table.avg_chain_length()
    }

    /// Returns the underlying chained table.
    pub fn raw_table(&self) -> &HashTable<K> {
        &self.table
    }
}

impl<K> HashSet<K>
where
    K: HashCode + Eq,
{
    /// Adds `key` to the set, growing first if the load factor is above the
    /// threshold.
    ///
    /// Returns `false` if the key was already present; the stored key is left
    /// untouched in that case.
    ///
    /// # Panics
    ///
    /// Panics if a rehash loses track of keys. See [`try_insert`].
    ///
    /// [`try_insert`]: HashSet::try_insert
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashSet;
    /// #
    /// let mut set = HashSet::new();
    /// assert!(set.insert(4));
    /// assert!(!set.insert(4));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K) -> bool {
        match self.try_insert(key) {
            Ok(inserted) => inserted,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`insert`], but returns the rehash failure instead of panicking.
    ///
    /// [`insert`]: HashSet::insert
    pub fn try_insert(&mut self, key: K) -> Result<bool, TableError> {
        let hash = key.hash_code();
        match self.table.try_entry(hash, |k| k == &key)? {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(entry) => {
                entry.insert(key);
                Ok(true)
            }
        }
    }

    /// Returns `true` if the set contains `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Returns the stored key equal to `key`.
    pub fn get(&self, key: &K) -> Option<&K> {
        self.table.find(key.hash_code(), |k| k == key)
    }

    /// Removes `key`. Returns `true` if it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        self.take(key).is_some()
    }

    /// Removes and returns the stored key equal to `key`.
    pub fn take(&mut self, key: &K) -> Option<K> {
        self.table.remove(key.hash_code(), |k| k == key)
    }

    /// Number of key comparisons a lookup of `key` performs: the position of
    /// `key` in its chain, or the chain length if it is absent.
    pub fn comparisons(&self, key: &K) -> usize {
        self.table.comparisons(key.hash_code(), |k| k == key)
    }
}

impl<K> HashSet<K>
where
    K: Clone,
{
    /// Returns a deep copy of the bucket array with unit values.
    pub fn bucket_snapshot(&self) -> BucketSnapshot<K, ()> {
        BucketSnapshot::new(self.table.snapshot_with(|k| (k.clone(), ())))
    }
}

impl<K> Default for HashSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> FromIterator<K> for HashSet<K>
where
    K: HashCode + Eq,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K> Extend<K> for HashSet<K>
where
    K: HashCode + Eq,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for k in iter {
            self.insert(k);
        }
    }
}

impl<'a, K> IntoIterator for &'a HashSet<K> {
    type Item = &'a K;
    type IntoIter = crate::hash_table::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
