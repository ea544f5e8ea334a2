#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

extern crate alloc;

/// Construction parameters: initial bucket count, load factor ceiling and
/// growth policy.
pub mod config;

/// The error type for the one failure a table can report.
pub mod error;

/// Integer hash code extraction and the division-method bucket index.
pub mod hash_code;

/// A HashMap implementation using separate chaining.
///
/// This module provides a `HashMap` that wraps the chained `HashTable` and
/// provides a key-value map interface over keys implementing `HashCode`.
pub mod hash_map;

/// A hash set implementation using separate chaining.
pub mod hash_set;

/// The raw chained table, addressed by hash code and equality predicate.
pub mod hash_table;

/// Detached, read-only copies of a table's bucket array.
pub mod snapshot;

pub use config::TableConfig;
pub use error::TableError;
pub use hash_code::HashCode;
pub use hash_code::Structural;
pub use hash_code::index_for;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use snapshot::BucketSnapshot;
