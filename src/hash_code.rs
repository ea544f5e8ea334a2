use core::hash::BuildHasher;
use core::hash::Hash;
use core::ops::Deref;

use foldhash::fast::FixedState;

/// Seed for the fixed string/structural hasher. Changing it changes every
/// bucket placement of non-integer keys.
const STRUCTURAL_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

#[inline]
fn structural_hash<T: Hash + ?Sized>(value: &T) -> i64 {
    FixedState::with_seed(STRUCTURAL_SEED).hash_one(value) as i64
}

/// Deterministic integer hash code extraction for table keys.
///
/// Integers hash to themselves, so `index_for` degenerates to the plain
/// division method on the key. Strings and other structured keys go through a
/// fixed-seed `foldhash` hasher, which is stable for the lifetime of the
/// process and across processes built from the same crate version.
///
/// Hash codes may be negative; [`index_for`] folds them into range.
///
/// Keys equal under `Eq` must produce equal hash codes.
pub trait HashCode {
    /// Returns the hash code of `self`.
    fn hash_code(&self) -> i64;
}

macro_rules! identity_hash_code {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HashCode for $ty {
                #[inline]
                fn hash_code(&self) -> i64 {
                    *self as i64
                }
            }
        )*
    };
}

identity_hash_code!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, i128, u128);

impl HashCode for bool {
    #[inline]
    fn hash_code(&self) -> i64 {
        *self as i64
    }
}

impl HashCode for char {
    #[inline]
    fn hash_code(&self) -> i64 {
        *self as i64
    }
}

impl HashCode for str {
    #[inline]
    fn hash_code(&self) -> i64 {
        structural_hash(self)
    }
}

impl HashCode for String {
    #[inline]
    fn hash_code(&self) -> i64 {
        self.as_str().hash_code()
    }
}

impl<T: HashCode + ?Sized> HashCode for &T {
    #[inline]
    fn hash_code(&self) -> i64 {
        (**self).hash_code()
    }
}

impl<T: HashCode + ?Sized> HashCode for Box<T> {
    #[inline]
    fn hash_code(&self) -> i64 {
        (**self).hash_code()
    }
}

/// Key wrapper that derives its hash code from the wrapped value's [`Hash`]
/// implementation.
///
/// Use it for tuples, vectors or your own `#[derive(Hash)]` types.
///
/// # Examples
///
/// ```rust
/// use chain_hash::HashMap;
/// use chain_hash::Structural;
///
/// let mut map = HashMap::new();
/// map.put(Structural((3, "west")), 1);
/// assert_eq!(map.get(&Structural((3, "west"))), Some(&1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Structural<T>(pub T);

impl<T> Structural<T> {
    /// Unwraps the key.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Structural<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: Hash> HashCode for Structural<T> {
    #[inline]
    fn hash_code(&self) -> i64 {
        structural_hash(&self.0)
    }
}

impl<T: core::fmt::Display> core::fmt::Display for Structural<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

/// Maps a hash code onto a bucket index with the division method.
///
/// The remainder is folded into `[0, capacity)` by adding `capacity` when it
/// is negative, so negative hash codes still land in a valid bucket.
///
/// # Panics
///
/// Panics if `capacity` is zero.
///
/// # Examples
///
/// ```rust
/// use chain_hash::index_for;
///
/// assert_eq!(index_for(1008, 7), 0);
/// assert_eq!(index_for(-1, 7), 6);
/// ```
#[inline]
pub fn index_for(hash: i64, capacity: usize) -> usize {
    assert!(capacity > 0, "bucket count must be non-zero");
    let modulus = capacity as i128;
    let idx = hash as i128 % modulus;
    if idx < 0 {
        (idx + modulus) as usize
    } else {
        idx as usize
    }
}
