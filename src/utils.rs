//! Utility functions and traits for `HashTable`

use crate::HashTable;

/// Extension trait for tables that provides additional utility methods
pub trait TableExtensions<V> {
    /// Returns the keys of the table as a Vec
    fn keys(&self) -> Vec<String>;

    /// Returns the values of the table as a Vec
    fn values(&self) -> Vec<V>
    where
        V: Clone;
}

impl<V> TableExtensions<V> for HashTable<V> {
    fn keys(&self) -> Vec<String> {
        self.iter().map(|(k, _)| k.to_owned()).collect()
    }

    fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.iter().map(|(_, v)| v.clone()).collect()
    }
}
