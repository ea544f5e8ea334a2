use thiserror::Error;

/// Errors raised by the chained tables.
///
/// Lookups and removals of absent keys are not errors; they return `None`.
/// The only failure a table can report is a broken internal invariant, after
/// which its contents must not be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Redistributing the entries into a new bucket array did not account for
    /// every entry that was stored before the rehash.
    #[error("rehash size mismatch: expected {expected} entries, redistributed {found}")]
    RehashCountMismatch {
        /// Entry count before the rehash started.
        expected: usize,
        /// Entry count found in the new bucket array.
        found: usize,
    },
}
