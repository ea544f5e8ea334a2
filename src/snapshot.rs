use alloc::vec::Vec;
use core::fmt;

/// A detached copy of a table's bucket array.
///
/// Index `i` holds the `(key, value)` pairs chained in bucket `i`, in chain
/// order. The snapshot owns clones of every key and value, so later changes to
/// the table never show up here, and nothing in it can be used to reach back
/// into the table.
///
/// # Examples
///
/// ```rust
/// use chain_hash::HashMap;
///
/// let mut map = HashMap::with_capacity(7);
/// map.put(1001, "An");
/// map.put(1008, "Binh");
/// map.put(1003, "Dung");
///
/// let snapshot = map.bucket_snapshot();
/// map.clear();
///
/// assert_eq!(snapshot.bucket(0), &[(1001, "An"), (1008, "Binh")]);
/// assert_eq!(snapshot.bucket(2), &[(1003, "Dung")]);
/// assert_eq!(snapshot.len(), 3);
/// assert_eq!(snapshot.max_chain_length(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSnapshot<K, V> {
    buckets: Vec<Vec<(K, V)>>,
}

impl<K, V> BucketSnapshot<K, V> {
    pub(crate) fn new(buckets: Vec<Vec<(K, V)>>) -> Self {
        Self { buckets }
    }

    /// Number of buckets captured.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of entries across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Returns `true` if every bucket is empty.
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// The chain captured for `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.capacity()`.
    pub fn bucket(&self, index: usize) -> &[(K, V)] {
        &self.buckets[index]
    }

    /// Iterates over the buckets in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[(K, V)]> + '_ {
        self.buckets.iter().map(Vec::as_slice)
    }

    /// Chain length per bucket.
    pub fn chain_lengths(&self) -> Vec<usize> {
        self.buckets.iter().map(Vec::len).collect()
    }

    /// Length of the longest chain, 0 for an empty snapshot.
    pub fn max_chain_length(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Mean chain length over all buckets.
    pub fn avg_chain_length(&self) -> f64 {
        if self.buckets.is_empty() {
            return 0.0;
        }
        self.len() as f64 / self.capacity() as f64
    }

    /// Number of buckets with an empty chain.
    pub fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|chain| chain.is_empty()).count()
    }
}

impl<'a, K, V> IntoIterator for &'a BucketSnapshot<K, V> {
    type Item = &'a [(K, V)];
    type IntoIter = core::iter::Map<
        core::slice::Iter<'a, Vec<(K, V)>>,
        fn(&'a Vec<(K, V)>) -> &'a [(K, V)],
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets
            .iter()
            .map(Vec::as_slice as fn(&'a Vec<(K, V)>) -> &'a [(K, V)])
    }
}

/// Renders one line per bucket: `Bucket[i]: k -> k -> null`, or
/// `Bucket[i]: (empty)`. Values are left out.
impl<K: fmt::Display, V> fmt::Display for BucketSnapshot<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, chain) in self.buckets.iter().enumerate() {
            write!(f, "Bucket[{index}]: ")?;
            if chain.is_empty() {
                writeln!(f, "(empty)")?;
                continue;
            }
            for (key, _) in chain {
                write!(f, "{key} -> ")?;
            }
            writeln!(f, "null")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    fn sample() -> BucketSnapshot<u32, char> {
        BucketSnapshot::new(vec![
            vec![(1001, 'a'), (1008, 'b'), (1015, 'c')],
            vec![],
            vec![(1003, 'd')],
        ])
    }

    #[test]
    fn statistics() {
        let snapshot = sample();
        assert_eq!(snapshot.capacity(), 3);
        assert_eq!(snapshot.len(), 4);
        assert!(!snapshot.is_empty());
        assert_eq!(snapshot.chain_lengths(), vec![3, 0, 1]);
        assert_eq!(snapshot.max_chain_length(), 3);
        assert!((snapshot.avg_chain_length() - 4.0 / 3.0).abs() < 1e-12);
        assert_eq!(snapshot.empty_buckets(), 1);
    }

    #[test]
    fn empty_snapshot() {
        let snapshot: BucketSnapshot<u32, ()> = BucketSnapshot::new(vec![vec![], vec![]]);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.len(), 0);
        assert_eq!(snapshot.max_chain_length(), 0);
        assert_eq!(snapshot.avg_chain_length(), 0.0);

        let none: BucketSnapshot<u32, ()> = BucketSnapshot::new(vec![]);
        assert_eq!(none.avg_chain_length(), 0.0);
    }

    #[test]
    fn iterates_buckets_in_order() {
        let snapshot = sample();
        let lens: Vec<usize> = snapshot.iter().map(<[_]>::len).collect();
        assert_eq!(lens, vec![3, 0, 1]);

        let mut keys = Vec::new();
        for chain in &snapshot {
            keys.extend(chain.iter().map(|(k, _)| *k));
        }
        assert_eq!(keys, vec![1001, 1008, 1015, 1003]);
        assert_eq!(snapshot.bucket(2), &[(1003, 'd')]);
    }

    #[test]
    fn renders_chains() {
        let rendered = sample().to_string();
        assert_eq!(
            rendered,
            "Bucket[0]: 1001 -> 1008 -> 1015 -> null\n\
             Bucket[1]: (empty)\n\
             Bucket[2]: 1003 -> null\n"
        );
    }
}
