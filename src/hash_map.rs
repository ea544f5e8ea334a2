use core::fmt::Debug;

use crate::config::TableConfig;
use crate::error::TableError;
use crate::hash_code::HashCode;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::snapshot::BucketSnapshot;

/// A hash map implemented using the chained [`HashTable`] as the underlying
/// storage.
///
/// `HashMap<K, V>` stores key-value pairs where keys implement
/// [`HashCode`] `+ Eq`. A key lives in bucket `hash_code mod capacity`; keys
/// sharing a bucket are chained. The bucket count starts at the configured
/// capacity (7 by default) and grows to the next prime above twice its size
/// whenever a `put` finds the load factor above the threshold.
///
/// The map is single-owner: wrap it in a lock, or shard over several maps, to
/// share it between threads.
#[derive(Clone)]
pub struct HashMap<K, V> {
    table: HashTable<(K, V)>,
}

impl<K, V> Debug for HashMap<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> HashMap<K, V> {
    /// Creates an empty map with 7 buckets and a 0.75 load factor ceiling.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// #
    /// let map: HashMap<i32, String> = HashMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 7);
    /// ```
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// Creates an empty map with `capacity` buckets (at least 3).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// #
    /// let map: HashMap<i32, String> = HashMap::with_capacity(79);
    /// assert_eq!(map.capacity(), 79);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
        }
    }

    /// Creates an empty map from `config`.
    pub fn with_config(config: TableConfig) -> Self {
        Self {
            table: HashTable::with_config(config),
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.put(1, "a");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of buckets.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns `len / capacity`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map = HashMap::with_capacity(4);
    /// map.put(1, ());
    /// assert_eq!(map.load_factor(), 0.25);
    /// ```
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Returns the load factor ceiling.
    pub fn threshold(&self) -> f64 {
        self.table.threshold()
    }

    /// Sets the load factor ceiling. Values outside `[0.5, 0.95]` are clamped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map: HashMap<u8, u8> = HashMap::new();
    /// map.set_threshold(0.2);
    /// assert_eq!(map.threshold(), 0.5);
    /// ```
    pub fn set_threshold(&mut self, threshold: f64) {
        self.table.set_threshold(threshold);
    }

    /// Removes all entries. The bucket count is kept.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over `(&K, &V)` in bucket order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.table.iter(),
        }
    }

    /// Removes and yields every entry. The bucket count is kept.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
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
    pub fn raw_table(&self) -> &HashTable<(K, V)> {
        &self.table
    }
}

impl<K, V> HashMap<K, V>
where
    K: HashCode + Eq,
{
    /// Stores `value` under `key`.
    ///
    /// If the load factor is above the threshold the map first rehashes into
    /// `next_prime(capacity * 2)` buckets. An existing entry for `key` has its
    /// value replaced and the old value returned; otherwise the entry is
    /// appended to its chain and `None` is returned.
    ///
    /// # Panics
    ///
    /// Panics if a rehash loses track of entries. See [`try_put`].
    ///
    /// [`try_put`]: HashMap::try_put
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// assert_eq!(map.put(37, "a"), None);
    /// assert_eq!(map.put(37, "b"), Some("a"));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        match self.try_put(key, value) {
            Ok(old) => old,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`put`], but returns the rehash failure instead of panicking.
    ///
    /// After an error the map is empty and must be discarded.
    ///
    /// [`put`]: HashMap::put
    pub fn try_put(&mut self, key: K, value: V) -> Result<Option<V>, TableError> {
        let hash = key.hash_code();
        match self.table.try_entry(hash, |(k, _)| k == &key)? {
            TableEntry::Occupied(mut entry) => {
                let old_value = core::mem::replace(&mut entry.get_mut().1, value);
                Ok(Some(old_value))
            }
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                Ok(None)
            }
        }
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// Scans only the chain `key` maps to. Never rehashes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.put(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.table
            .find(key.hash_code(), |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.table
            .find_mut(key.hash_code(), |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns `true` if the map holds an entry for `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes the entry for `key` and returns its value.
    ///
    /// The rest of the chain keeps its order. Never rehashes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.put(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// assert!(map.is_empty());
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes the entry for `key` and returns the stored key and value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.table.remove(key.hash_code(), |(k, _)| k == key)
    }

    /// Gets the entry for `key` for in-place manipulation.
    ///
    /// Like [`put`], this grows the map first when its load factor is above
    /// the threshold.
    ///
    /// [`put`]: HashMap::put
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// #
    /// let mut counts = HashMap::new();
    /// for word in ["a", "b", "a"] {
    ///     *counts.entry(word).or_insert(0) += 1;
    /// }
    /// assert_eq!(counts.get(&"a"), Some(&2));
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let hash = key.hash_code();
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }

    /// Number of key comparisons a lookup of `key` performs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map = HashMap::with_capacity(7);
    /// map.put(1001, ());
    /// map.put(1008, ());
    /// assert_eq!(map.comparisons(&1008), 2);
    /// assert_eq!(map.comparisons(&1015), 2);
    /// assert_eq!(map.comparisons(&1002), 0);
    /// ```
    pub fn comparisons(&self, key: &K) -> usize {
        self.table.comparisons(key.hash_code(), |(k, _)| k == key)
    }
}

impl<K, V> HashMap<K, V>
where
    K: Clone,
    V: Clone,
{
    /// Returns a deep copy of the bucket array.
    ///
    /// The snapshot owns clones of every entry; mutating the map afterwards
    /// does not change it.
    pub fn bucket_snapshot(&self) -> BucketSnapshot<K, V> {
        BucketSnapshot::new(self.table.snapshot_with(|(k, v)| (k.clone(), v.clone())))
    }
}

impl<K, V> Default for HashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for HashMap<K, V>
where
    K: HashCode + Eq,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V> Extend<(K, V)> for HashMap<K, V>
where
    K: HashCode + Eq,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a HashMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A view into a single entry in the map, which may be vacant or occupied.
pub enum Entry<'a, K, V> {
    /// A vacant entry
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Calls `f` on the value if the entry is occupied.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns the key of this entry.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Inserts `V::default()` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(V::default)
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K, V> {
    entry: crate::hash_table::VacantEntry<'a, (K, V)>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Appends the entry to its chain and returns a mutable reference to the
    /// value.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.entry.insert((self.key, value)).1
    }
}

/// A view into an occupied entry in the map.
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::hash_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        &self.entry.get().0
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference to its value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Replaces the value, returning the old one.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Removes the entry from its chain and returns the value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Removes the entry from its chain and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove()
    }
}

/// Iterator over the entries of a [`HashMap`].
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Iterator over the keys of a [`HashMap`].
pub struct Keys<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Iterator over the values of a [`HashMap`].
pub struct Values<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Draining iterator over the entries of a [`HashMap`].
pub struct Drain<'a, K, V> {
    inner: crate::hash_table::Drain<'a, (K, V)>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
