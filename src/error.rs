use std::collections::TryReserveError;

/// Errors returned when the bucket array cannot be sized or grown
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The requested bucket count has no power of two that fits in `usize`
    #[error("[HashTable] capacity overflow: cannot size a table past {0} buckets")]
    CapacityOverflow(usize),
    /// The bucket array could not be allocated
    #[error("[HashTable] bucket allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
}

/// Returned by [`HashTable::try_insert`](crate::HashTable::try_insert) when the table could
/// not grow. Carries the pair that was not inserted, so the caller can retry or keep it.
#[derive(thiserror::Error, Debug)]
#[error("[HashTable] insert of {key:?} failed")]
pub struct InsertError<V> {
    /// Why the table could not grow
    #[source]
    pub source: TableError,
    /// The key that was not inserted
    pub key: String,
    /// The value that was not inserted
    pub value: V,
}

impl<V> InsertError<V> {
    /// Hands back the key and value
    #[must_use]
    pub fn into_pair(self) -> (String, V) {
        (self.key, self.value)
    }
}
