use alloc::vec::Vec;
use core::fmt::Debug;

use crate::config::TableConfig;
use crate::config::clamp_threshold;
use crate::error::TableError;
use crate::hash_code::index_for;

/// Returns `true` if `n` is prime. Trial division by odd divisors up to
/// `√n`.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }

    let mut divisor = 3usize;
    while let Some(square) = divisor.checked_mul(divisor) {
        if square > n {
            break;
        }
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

/// Returns the smallest prime `>= n`, or 2 for any `n <= 2`.
///
/// # Examples
///
/// ```rust
/// use chain_hash::hash_table::next_prime;
///
/// assert_eq!(next_prime(14), 17);
/// assert_eq!(next_prime(17), 17);
/// ```
pub fn next_prime(n: usize) -> usize {
    if n <= 2 {
        return 2;
    }

    let mut candidate = if n % 2 == 0 { n + 1 } else { n };
    while !is_prime(candidate) {
        candidate += 2;
    }
    candidate
}

/// A stored value together with the hash code it was inserted under. Keeping
/// the hash lets a rehash place the value without asking the caller to hash it
/// again.
#[derive(Clone, Debug)]
struct Slot<V> {
    hash: i64,
    value: V,
}

/// One collision chain. New slots are appended at the tail; removal splices
/// and keeps the order of the rest.
type Chain<V> = Vec<Slot<V>>;

fn empty_buckets<V>(capacity: usize) -> Vec<Chain<V>> {
    (0..capacity).map(|_| Vec::new()).collect()
}

/// Moves every slot of `chains` into a fresh array of `new_capacity` chains,
/// then checks that exactly `expected` slots arrived.
fn redistribute<V>(
    chains: Vec<Chain<V>>,
    new_capacity: usize,
    expected: usize,
) -> Result<Vec<Chain<V>>, TableError> {
    let mut buckets = empty_buckets(new_capacity);

    for chain in chains {
        for slot in chain {
            let idx = index_for(slot.hash, new_capacity);
            buckets[idx].push(slot);
        }
    }

    let found: usize = buckets.iter().map(Vec::len).sum();
    if found != expected {
        log::error!("rehash to {new_capacity} buckets lost entries: {found} of {expected}");
        return Err(TableError::RehashCountMismatch { expected, found });
    }

    Ok(buckets)
}

/// Chain-length statistics for a table.
///
/// Available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq)]
pub struct ChainStats {
    /// Number of values currently in the table
    pub populated: usize,
    /// Number of buckets
    pub capacity: usize,
    /// Buckets whose chain is empty
    pub empty_buckets: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// Mean chain length over all buckets (equal to the load factor)
    pub avg_chain_length: f64,
    /// Mean chain length over the non-empty buckets
    pub avg_occupied_chain_length: f64,
    /// Load factor ceiling that triggers a rehash
    pub threshold: f64,
}

#[cfg(any(test, feature = "stats"))]
impl ChainStats {
    /// Pretty-print the statistics.
    pub fn print(&self) {
        println!("=== Chained Hash Table Statistics ===");
        println!(
            "Population: {} in {} buckets ({:.2}% load, rehash above {:.2}%)",
            self.populated,
            self.capacity,
            self.avg_chain_length * 100.0,
            self.threshold * 100.0
        );
        println!(
            "Empty buckets: {} ({:.2}%)",
            self.empty_buckets,
            if self.capacity == 0 {
                0.0
            } else {
                self.empty_buckets as f64 / self.capacity as f64 * 100.0
            }
        );
        println!(
            "Chains: longest {}, average {:.2}, average non-empty {:.2}",
            self.longest_chain, self.avg_chain_length, self.avg_occupied_chain_length
        );
    }
}

/// A hash table resolving collisions by separate chaining.
///
/// `HashTable<V>` stores values of type `V` in `capacity` chains. Like the
/// raw tables of other hashing crates it does not know how to hash or compare
/// its values: every operation takes the value's integer hash code and an
/// equality predicate. [`HashMap`] and [`HashSet`] wrap it with a key-based
/// interface.
///
/// The bucket of a value is `hash mod capacity` (see [`index_for`]). When an
/// insertion finds the load factor above the configured threshold, the table
/// first grows to `next_prime(capacity * 2)` buckets and moves every value to
/// its new chain.
///
/// [`HashMap`]: crate::HashMap
/// [`HashSet`]: crate::HashSet
///
/// ## Example
///
/// ```rust
/// use chain_hash::HashCode;
/// use chain_hash::hash_table::Entry;
/// use chain_hash::hash_table::HashTable;
///
/// #[derive(Debug, PartialEq)]
/// struct Student {
///     id: u32,
///     name: String,
/// }
///
/// let mut table = HashTable::new();
/// let hash = 1008u32.hash_code();
///
/// match table.entry(hash, |s: &Student| s.id == 1008) {
///     Entry::Vacant(entry) => {
///         entry.insert(Student {
///             id: 1008,
///             name: "Binh".to_string(),
///         });
///     }
///     Entry::Occupied(_) => {
///         println!("Student already exists");
///     }
/// }
/// assert_eq!(table.find(hash, |s| s.id == 1008).map(|s| s.name.as_str()), Some("Binh"));
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    buckets: Vec<Chain<V>>,
    populated: usize,
    threshold: f64,
    growth: bool,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field("populated", &self.populated)
            .field("capacity", &self.capacity())
            .field("threshold", &self.threshold)
            .field("growth", &self.growth)
            .field("chains", &self.chain_lengths())
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with the default configuration: 7 buckets and a
    /// 0.75 load factor ceiling.
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// Creates an empty table with `capacity` buckets.
    ///
    /// Capacities below 3 are raised to 3.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(31);
    /// assert_eq!(table.capacity(), 31);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(TableConfig::new().with_initial_capacity(capacity))
    }

    /// Creates an empty table from `config`.
    pub fn with_config(config: TableConfig) -> Self {
        Self {
            buckets: empty_buckets(config.initial_capacity()),
            populated: 0,
            threshold: config.threshold(),
            growth: config.growth(),
        }
    }

    /// Returns `true` if the table contains no values.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of values in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns the number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.populated as f64 / self.capacity() as f64
    }

    /// Returns the load factor ceiling above which an insertion rehashes.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Sets the load factor ceiling, clamped into `[0.5, 0.95]`.
    ///
    /// Takes effect on the next insertion; it never rehashes by itself.
    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = clamp_threshold(threshold);
    }

    /// Returns `false` if the table was configured never to rehash.
    pub fn growth_enabled(&self) -> bool {
        self.growth
    }

    /// Removes all values, keeping the bucket count.
    pub fn clear(&mut self) {
        for chain in &mut self.buckets {
            chain.clear();
        }
        self.populated = 0;
    }

    /// Returns an iterator over all values, bucket by bucket and in chain
    /// order within a bucket. The order is not otherwise meaningful.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            chains: self.buckets.iter(),
            current: Default::default(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator that removes and yields all values.
    ///
    /// The bucket count is kept. Values not consumed before the iterator is
    /// dropped are dropped with it.
    pub fn drain(&mut self) -> Drain<'_, V> {
        Drain {
            table: self,
            bucket_index: 0,
        }
    }

    /// Returns a reference to the value matching `eq` in the chain for `hash`.
    pub fn find(&self, hash: i64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        self.chain_for(hash)
            .iter()
            .find(|slot| eq(&slot.value))
            .map(|slot| &slot.value)
    }

    /// Returns a mutable reference to the value matching `eq` in the chain
    /// for `hash`.
    ///
    /// The caller must not change the value in a way that changes its hash
    /// code or its equality with other values.
    pub fn find_mut(&mut self, hash: i64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let idx = index_for(hash, self.capacity());
        self.buckets[idx]
            .iter_mut()
            .find(|slot| eq(&slot.value))
            .map(|slot| &mut slot.value)
    }

    /// Removes and returns the value matching `eq` in the chain for `hash`.
    ///
    /// The remaining values of that chain keep their order. Never rehashes.
    pub fn remove(&mut self, hash: i64, eq: impl Fn(&V) -> bool) -> Option<V> {
        let idx = index_for(hash, self.capacity());
        let chain = &mut self.buckets[idx];
        let pos = chain.iter().position(|slot| eq(&slot.value))?;
        self.populated -= 1;
        Some(chain.remove(pos).value)
    }

    /// Counts the equality checks a lookup for `hash`/`eq` performs: the
    /// position of the match plus one, or the whole chain length on a miss.
    pub fn comparisons(&self, hash: i64, eq: impl Fn(&V) -> bool) -> usize {
        let chain = self.chain_for(hash);
        match chain.iter().position(|slot| eq(&slot.value)) {
            Some(pos) => pos + 1,
            None => chain.len(),
        }
    }

    /// Gets the entry for `hash`/`eq`, growing the table first if its load
    /// factor is above the threshold.
    ///
    /// # Panics
    ///
    /// Panics if the growth rehash fails its entry-count check. The table can
    /// no longer be trusted at that point; use [`try_entry`] to receive the
    /// error instead.
    ///
    /// [`try_entry`]: HashTable::try_entry
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::Entry;
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(7, |&n: &i64| n == 7).or_insert(7);
    ///
    /// match table.entry(7, |&n| n == 7) {
    ///     Entry::Occupied(entry) => assert_eq!(*entry.get(), 7),
    ///     Entry::Vacant(_) => unreachable!(),
    /// }
    /// ```
    pub fn entry(&mut self, hash: i64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        match self.try_entry(hash, eq) {
            Ok(entry) => entry,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`entry`], but returns the rehash failure instead of panicking.
    ///
    /// After an error the table is left empty with its previous bucket count.
    ///
    /// [`entry`]: HashTable::entry
    pub fn try_entry(
        &mut self,
        hash: i64,
        eq: impl Fn(&V) -> bool,
    ) -> Result<Entry<'_, V>, TableError> {
        self.maybe_grow()?;
        Ok(self.entry_impl(hash, eq))
    }

    fn entry_impl(&mut self, hash: i64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        let bucket = index_for(hash, self.capacity());
        match self.buckets[bucket]
            .iter()
            .position(|slot| eq(&slot.value))
        {
            Some(index) => Entry::Occupied(OccupiedEntry {
                table: self,
                bucket,
                index,
            }),
            None => Entry::Vacant(VacantEntry {
                table: self,
                bucket,
                hash,
            }),
        }
    }

    fn chain_for(&self, hash: i64) -> &[Slot<V>] {
        &self.buckets[index_for(hash, self.capacity())]
    }

    #[inline]
    fn maybe_grow(&mut self) -> Result<(), TableError> {
        if self.growth && self.load_factor() > self.threshold {
            self.grow()
        } else {
            Ok(())
        }
    }

    #[cold]
    fn grow(&mut self) -> Result<(), TableError> {
        let target = self.capacity().saturating_mul(2);
        self.rehash(next_prime(target))
    }

    fn rehash(&mut self, new_capacity: usize) -> Result<(), TableError> {
        debug_assert!(new_capacity >= 1);

        let old_capacity = self.capacity();
        log::debug!(
            "rehashing {} entries from {old_capacity} to {new_capacity} buckets",
            self.populated
        );

        let old = core::mem::take(&mut self.buckets);
        match redistribute(old, new_capacity, self.populated) {
            Ok(buckets) => {
                self.buckets = buckets;
                Ok(())
            }
            Err(err) => {
                self.buckets = empty_buckets(old_capacity);
                self.populated = 0;
                Err(err)
            }
        }
    }

    /// Returns the length of every chain, indexed by bucket.
    pub fn chain_lengths(&self) -> Vec<usize> {
        self.buckets.iter().map(Vec::len).collect()
    }

    /// Returns the length of the longest chain.
    pub fn max_chain_length(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Returns the mean chain length over all buckets.
    pub fn avg_chain_length(&self) -> f64 {
        self.populated as f64 / self.capacity() as f64
    }

    /// Copies the bucket array through `f`, one inner vector per bucket in
    /// chain order. The result shares nothing with the table.
    pub fn snapshot_with<T>(&self, mut f: impl FnMut(&V) -> T) -> Vec<Vec<T>> {
        self.buckets
            .iter()
            .map(|chain| chain.iter().map(|slot| f(&slot.value)).collect())
            .collect()
    }

    /// Returns a histogram of chain lengths: index `n` counts the buckets
    /// holding exactly `n` values.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> Vec<usize> {
        let mut hist = alloc::vec![0usize; self.max_chain_length() + 1];
        for chain in &self.buckets {
            hist[chain.len()] += 1;
        }
        hist
    }

    /// Returns chain-length statistics for the current table state.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_stats(&self) -> ChainStats {
        let empty_buckets = self.buckets.iter().filter(|chain| chain.is_empty()).count();
        let occupied = self.capacity() - empty_buckets;

        ChainStats {
            populated: self.populated,
            capacity: self.capacity(),
            empty_buckets,
            longest_chain: self.max_chain_length(),
            avg_chain_length: self.avg_chain_length(),
            avg_occupied_chain_length: if occupied == 0 {
                0.0
            } else {
                self.populated as f64 / occupied as f64
            },
            threshold: self.threshold,
        }
    }

    /// Pretty-prints the chain-length histogram horizontally using stdout.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn print_chain_histogram(&self) {
        let hist = self.chain_histogram();
        let max = hist.iter().copied().max().unwrap_or(0);
        if self.populated == 0 {
            println!("chain histogram: empty");
            return;
        }

        let max_bar = 60usize;
        println!(
            "chain histogram ({} entries, {} buckets):",
            self.populated,
            self.capacity()
        );
        for (len, &count) in hist.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max.max(1));
            println!("{:>3} | {} ({})", len, "█".repeat(width), count);
        }
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// A vacant entry - no value in the chain matched
    Vacant(VacantEntry<'a, V>),
    /// An occupied entry - a value in the chain matched
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value in the entry.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Calls `f` on the value if the entry is occupied.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Inserts `V::default()` if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }
}

/// A view into a vacant entry. Inserting appends to the tail of the chain.
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    bucket: usize,
    hash: i64,
}

impl<'a, V> VacantEntry<'a, V> {
    /// The bucket index the value will be chained in.
    pub fn bucket(&self) -> usize {
        self.bucket
    }

    /// Appends `value` to the chain and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        let table = self.table;
        table.populated += 1;
        let chain = &mut table.buckets[self.bucket];
        chain.push(Slot {
            hash: self.hash,
            value,
        });
        let last = chain.len() - 1;
        &mut chain[last].value
    }
}

/// A view into an occupied entry.
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    bucket: usize,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// The bucket index holding the value.
    pub fn bucket(&self) -> usize {
        self.bucket
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.table.buckets[self.bucket][self.index].value
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.table.buckets[self.bucket][self.index].value
    }

    /// Converts the entry into a mutable reference bound to the table.
    pub fn into_mut(self) -> &'a mut V {
        let table = self.table;
        &mut table.buckets[self.bucket][self.index].value
    }

    /// Replaces the value, returning the old one.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Unlinks the value from its chain and returns it.
    pub fn remove(self) -> V {
        self.table.populated -= 1;
        self.table.buckets[self.bucket].remove(self.index).value
    }
}

/// Iterator over the values of a [`HashTable`].
pub struct Iter<'a, V> {
    chains: core::slice::Iter<'a, Chain<V>>,
    current: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(slot) = self.current.next() {
                self.remaining -= 1;
                return Some(&slot.value);
            }
            self.current = self.chains.next()?.iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// Draining iterator over the values of a [`HashTable`].
pub struct Drain<'a, V> {
    table: &'a mut HashTable<V>,
    bucket_index: usize,
}

impl<V> Drop for Drain<'_, V> {
    fn drop(&mut self) {
        self.table.clear();
    }
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        while self.bucket_index < self.table.buckets.len() {
            if let Some(slot) = self.table.buckets[self.bucket_index].pop() {
                self.table.populated -= 1;
                return Some(slot.value);
            }
            self.bucket_index += 1;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.populated, Some(self.table.populated))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::hash_code::HashCode;

    #[derive(Debug, PartialEq, Eq, Clone)]
    struct Item {
        key: u64,
        value: i32,
    }

    fn hash_key(key: u64) -> i64 {
        key.hash_code()
    }

    fn insert_item(table: &mut HashTable<Item>, key: u64, value: i32) {
        match table.entry(hash_key(key), |v| v.key == key) {
            Entry::Vacant(v) => {
                v.insert(Item { key, value });
            }
            Entry::Occupied(_) => panic!("unexpected occupied for {key}: {table:#?}"),
        }
    }

    #[test]
    fn prime_search() {
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(is_prime(3));
        assert!(!is_prime(9));
        assert!(!is_prime(25));
        assert!(is_prime(79));
        assert!(!is_prime(91));
        assert!(is_prime(7919));

        assert_eq!(next_prime(0), 2);
        assert_eq!(next_prime(1), 2);
        assert_eq!(next_prime(2), 2);
        assert_eq!(next_prime(3), 3);
        assert_eq!(next_prime(4), 5);
        assert_eq!(next_prime(14), 17);
        assert_eq!(next_prime(34), 37);
        assert_eq!(next_prime(74), 79);
        assert_eq!(next_prime(90), 97);
        assert_eq!(next_prime(7908), 7919);
    }

    #[test]
    fn insert_and_find() {
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..32u64 {
            insert_item(&mut table, k, (k as i32) * 2);
            assert_eq!(
                table.find(hash_key(k), |v| v.key == k),
                Some(&Item {
                    key: k,
                    value: (k as i32) * 2
                }),
                "{:#?}",
                table
            );
        }
        assert_eq!(table.len(), 32);
        for k in 0..32u64 {
            assert_eq!(
                table.find(hash_key(k), |v| v.key == k).map(|v| v.value),
                Some((k as i32) * 2)
            );
        }

        assert!(table.find(hash_key(999), |v| v.key == 999).is_none());
    }

    #[test]
    fn duplicate_entry_is_occupied() {
        let mut table: HashTable<Item> = HashTable::new();
        let k = 42u64;
        let hash = hash_key(k);

        insert_item(&mut table, k, 7);

        match table.entry(hash, |v| v.key == k) {
            Entry::Occupied(mut occ) => {
                let prev = occ.insert(Item { key: k, value: 11 });
                assert_eq!(prev.value, 7);
            }
            Entry::Vacant(_) => panic!("should be occupied: {k} in {table:#?}"),
        }
        assert_eq!(table.len(), 1);
        assert_eq!(table.find(hash, |v| v.key == k).unwrap().value, 11);
    }

    #[test]
    fn find_mut_and_modify() {
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..5u64 {
            insert_item(&mut table, k, 1);
        }

        for k in 0..5u64 {
            if let Some(v) = table.find_mut(hash_key(k), |v| v.key == k) {
                v.value += 9;
            }
        }
        for k in 0..5u64 {
            assert_eq!(table.find(hash_key(k), |v| v.key == k).unwrap().value, 10);
        }
        assert!(table.find_mut(hash_key(77), |v| v.key == 77).is_none());
    }

    #[test]
    fn remove_items() {
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..8u64 {
            insert_item(&mut table, k, k as i32);
        }
        assert_eq!(table.len(), 8);
        for k in [0u64, 3, 7] {
            let removed = table.remove(hash_key(k), |v| v.key == k).expect("should remove");
            assert_eq!(removed.key, k);
            assert!(table.find(hash_key(k), |v| v.key == k).is_none());
        }
        assert_eq!(table.len(), 5);

        assert!(table.remove(hash_key(1000), |v| v.key == 1000).is_none());
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn remove_never_shrinks() {
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..40u64 {
            insert_item(&mut table, k, 0);
        }
        let capacity = table.capacity();
        for k in 0..40u64 {
            table.remove(hash_key(k), |v| v.key == k);
        }
        assert!(table.is_empty());
        assert_eq!(table.capacity(), capacity);
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn insert_many() {
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..20000u64 {
            insert_item(&mut table, k, k as i32);
        }
        assert_eq!(table.len(), 20000);
        assert!(table.load_factor() <= 2.0 * table.threshold());
        assert!(is_prime(table.capacity()));
        for k in 0..20000u64 {
            assert_eq!(
                table.find(hash_key(k), |v| v.key == k).map(|v| v.value),
                Some(k as i32)
            );
        }
    }

    #[test]
    fn growth_checks_before_placing() {
        let mut table: HashTable<Item> = HashTable::new();
        assert_eq!(table.capacity(), 7);

        for k in 0..6u64 {
            insert_item(&mut table, k, 0);
        }
        // 5/7 was below 0.75 when the sixth value went in.
        assert_eq!(table.capacity(), 7);

        insert_item(&mut table, 6, 0);
        assert_eq!(table.capacity(), 17);
        assert_eq!(table.len(), 7);
        for k in 0..7u64 {
            assert!(table.find(hash_key(k), |v| v.key == k).is_some());
        }
    }

    #[test]
    fn capacity_follows_prime_doubling() {
        let mut table: HashTable<Item> = HashTable::new();
        let mut seen = vec![table.capacity()];
        for k in 0..200u64 {
            insert_item(&mut table, k, 0);
            if *seen.last().unwrap() != table.capacity() {
                seen.push(table.capacity());
            }
        }
        assert_eq!(seen, vec![7, 17, 37, 79, 163, 331]);
    }

    #[test]
    fn threshold_changes_growth_point() {
        let mut table: HashTable<Item> = HashTable::new();
        table.set_threshold(5.0);
        assert_eq!(table.threshold(), 0.95);

        for k in 0..8u64 {
            insert_item(&mut table, k, 0);
        }
        // 7/7 exceeded 0.95 on the eighth insertion.
        assert_eq!(table.capacity(), 17);

        let mut table: HashTable<Item> = HashTable::new();
        table.set_threshold(0.0);
        assert_eq!(table.threshold(), 0.5);
        for k in 0..5u64 {
            insert_item(&mut table, k, 0);
        }
        // 4/7 exceeded 0.5 on the fifth insertion.
        assert_eq!(table.capacity(), 17);
    }

    #[test]
    fn update_also_checks_growth() {
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..6u64 {
            insert_item(&mut table, k, 0);
        }
        assert_eq!(table.capacity(), 7);

        table
            .entry(hash_key(3), |v| v.key == 3)
            .and_modify(|v| v.value = 30);
        assert_eq!(table.capacity(), 17);
        assert_eq!(table.len(), 6);
        assert_eq!(table.find(hash_key(3), |v| v.key == 3).unwrap().value, 30);
    }

    #[test]
    fn fixed_capacity_never_grows() {
        let mut table: HashTable<Item> =
            HashTable::with_config(TableConfig::new().with_initial_capacity(5).with_growth(false));
        assert!(!table.growth_enabled());
        for k in 0..100u64 {
            insert_item(&mut table, k, 0);
        }
        assert_eq!(table.capacity(), 5);
        assert_eq!(table.chain_lengths(), vec![20; 5]);
        assert_eq!(table.max_chain_length(), 20);
        assert_eq!(table.avg_chain_length(), 20.0);
    }

    #[test]
    fn explicit_collision() {
        let mut table: HashTable<Item> = HashTable::with_capacity(7);
        for k in [1001u64, 1008, 1015] {
            insert_item(&mut table, k, k as i32);
        }
        insert_item(&mut table, 1003, 0);

        assert_eq!(table.chain_lengths(), vec![3, 0, 1, 0, 0, 0, 0]);
        assert_eq!(table.comparisons(hash_key(1001), |v| v.key == 1001), 1);
        assert_eq!(table.comparisons(hash_key(1015), |v| v.key == 1015), 3);
        assert_eq!(table.comparisons(hash_key(1022), |v| v.key == 1022), 3);
        assert_eq!(table.comparisons(hash_key(1002), |v| v.key == 1002), 0);

        table.remove(hash_key(1008), |v| v.key == 1008);
        let keys = table.snapshot_with(|v| v.key);
        assert_eq!(keys[0], vec![1001, 1015]);
        assert_eq!(keys[2], vec![1003]);
    }

    #[test]
    fn negative_hashes() {
        let mut table: HashTable<i64> = HashTable::new();
        for k in -20i64..0 {
            table.entry(k, |&v| v == k).or_insert(k);
        }
        assert_eq!(table.len(), 20);
        for k in -20i64..0 {
            assert_eq!(table.find(k, |&v| v == k), Some(&k));
        }
    }

    #[test]
    fn iter_and_drain() {
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..10u64 {
            insert_item(&mut table, k, k as i32);
        }
        let iter = table.iter();
        assert_eq!(iter.len(), 10);
        let mut seen: Vec<u64> = iter.map(|v| v.key).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());

        let capacity = table.capacity();
        let mut drained: Vec<u64> = table.drain().map(|v| v.key).collect();
        drained.sort_unstable();
        assert_eq!(drained, (0..10).collect::<Vec<_>>());
        assert!(table.is_empty());
        assert_eq!(table.capacity(), capacity);
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn dropped_drain_empties_table() {
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..10u64 {
            insert_item(&mut table, k, 0);
        }
        let first = table.drain().next();
        assert!(first.is_some());
        assert!(table.is_empty());
        assert_eq!(table.chain_lengths().iter().sum::<usize>(), 0);
    }

    fn hash_string_key(key: &str) -> i64 {
        key.hash_code()
    }

    #[test]
    fn insert_and_find_string_keys() {
        let mut table: HashTable<(String, i32)> = HashTable::new();
        let keys = ["apple", "banana", "cherry", "date", "elderberry"];
        for (i, key) in keys.iter().enumerate() {
            table
                .entry(hash_string_key(key), |(k, _)| k == key)
                .or_insert((key.to_string(), i as i32));
        }
        assert_eq!(table.len(), keys.len());
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(
                table.find(hash_string_key(key), |(k, _)| k == key),
                Some(&(key.to_string(), i as i32))
            );
        }
        assert!(table.find(hash_string_key("fig"), |(k, _)| k == "fig").is_none());

        assert_eq!(
            table.remove(hash_string_key("banana"), |(k, _)| k == "banana"),
            Some(("banana".to_string(), 1))
        );
        assert_eq!(table.len(), keys.len() - 1);
    }

    #[test]
    fn entry_or_insert_with_and_default() {
        let mut table: HashTable<u64> = HashTable::new();
        let mut calls = 0;
        for _ in 0..3 {
            table.entry(5, |&v| v == 5).or_insert_with(|| {
                calls += 1;
                5
            });
        }
        assert_eq!(calls, 1);
        assert_eq!(table.len(), 1);

        let v = table.entry(0, |&v| v == 0).or_default();
        assert_eq!(*v, 0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn entry_into_mut_and_remove() {
        let mut table: HashTable<Item> = HashTable::new();
        insert_item(&mut table, 9, 1);
        match table.entry(hash_key(9), |v| v.key == 9) {
            Entry::Occupied(occ) => {
                assert_eq!(occ.bucket(), 2);
                occ.into_mut().value = 99;
            }
            Entry::Vacant(_) => unreachable!(),
        }
        assert_eq!(table.find(hash_key(9), |v| v.key == 9).unwrap().value, 99);

        match table.entry(hash_key(9), |v| v.key == 9) {
            Entry::Occupied(occ) => assert_eq!(occ.remove().value, 99),
            Entry::Vacant(_) => unreachable!(),
        }
        assert!(table.is_empty());
    }

    #[test]
    fn redistribute_reports_lost_entries() {
        let chains: Vec<Chain<u8>> = vec![
            vec![Slot { hash: 0, value: 0 }, Slot { hash: 3, value: 3 }],
            vec![Slot { hash: 1, value: 1 }],
            vec![],
        ];

        let err = redistribute(chains.clone(), 7, 4).unwrap_err();
        assert_eq!(
            err,
            TableError::RehashCountMismatch {
                expected: 4,
                found: 3
            }
        );

        let buckets = redistribute(chains, 7, 3).unwrap();
        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].len(), 1);
        assert_eq!(buckets[1].len(), 1);
        assert_eq!(buckets[3].len(), 1);
    }

    #[test]
    fn snapshot_is_detached() {
        let mut table: HashTable<Item> = HashTable::new();
        insert_item(&mut table, 1, 1);
        let snapshot = table.snapshot_with(Clone::clone);
        table.find_mut(hash_key(1), |v| v.key == 1).unwrap().value = 2;
        table.clear();
        assert_eq!(snapshot[1], vec![Item { key: 1, value: 1 }]);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..30u64 {
            insert_item(&mut table, k, 0);
        }
        let capacity = table.capacity();
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.capacity(), capacity);
        assert_eq!(table.max_chain_length(), 0);
    }

    #[test]
    fn test_clone() {
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..20u64 {
            insert_item(&mut table, k, k as i32);
        }
        let mut cloned = table.clone();
        assert_eq!(cloned.len(), table.len());
        assert_eq!(cloned.capacity(), table.capacity());
        assert_eq!(cloned.chain_lengths(), table.chain_lengths());

        cloned.remove(hash_key(3), |v| v.key == 3);
        assert!(table.find(hash_key(3), |v| v.key == 3).is_some());
        assert_eq!(table.len(), 20);
    }

    #[test]
    fn chain_stats_and_histogram() {
        let mut table: HashTable<Item> =
            HashTable::with_config(TableConfig::new().with_initial_capacity(79).with_growth(false));
        let mut rng = SmallRng::seed_from_u64(20250926);
        let mut inserted = 0;
        while inserted < 1000 {
            let k = rng.random_range(1000..=9999u64);
            if table.find(hash_key(k), |v| v.key == k).is_none() {
                insert_item(&mut table, k, 0);
                inserted += 1;
            }
        }

        let stats = table.chain_stats();
        assert_eq!(stats.populated, 1000);
        assert_eq!(stats.capacity, 79);
        assert!((stats.avg_chain_length - 1000.0 / 79.0).abs() < 1e-9);
        assert!(stats.longest_chain < 3 * 13);

        let hist = table.chain_histogram();
        assert_eq!(hist.iter().sum::<usize>(), 79);
        assert_eq!(
            hist.iter().enumerate().map(|(len, n)| len * n).sum::<usize>(),
            1000
        );
        assert_eq!(hist.len(), stats.longest_chain + 1);
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn histogram_output() {
        let mut table: HashTable<Item> = HashTable::new();
        table.print_chain_histogram();
        for k in 0..500u64 {
            insert_item(&mut table, k * 3, 0);
        }
        table.print_chain_histogram();
        table.chain_stats().print();
    }

    #[test]
    fn debug_output_lists_chains() {
        let mut table: HashTable<u8> = HashTable::with_capacity(3);
        table.entry(4, |&v| v == 4).or_insert(4);
        let out = format!("{table:?}");
        assert!(out.contains("populated: 1"), "{out}");
        assert!(out.contains("chains: [0, 1, 0]"), "{out}");
    }

    #[test]
    fn string_key_type_check() {
        let key = String::from("k");
        let mut table: HashTable<String> = HashTable::new();
        table
            .entry(key.hash_code(), |s| s == &key)
            .or_insert(key.clone());
        assert!(table.find(key.hash_code(), |s| s == "k").is_some());
    }
}
