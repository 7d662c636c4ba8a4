use std::{
    collections::TryReserveError,
    fmt,
    iter::{self, FusedIterator},
    mem, slice,
};

use log::{debug, trace};

use crate::{
    error::{InsertError, TableError},
    fnv::fnv1a,
    stats::ChainStats,
};

/// Number of buckets in a table created with [`HashTable::new`]
pub const DEFAULT_CAPACITY: usize = 16;

/// Growth threshold as a percentage of entries per bucket (0.75)
const DEFAULT_LOAD_FACTOR_THRESHOLD: usize = 75;

/// A bucket: the head of a chain, `None` when nothing hashed here
type Link<V> = Option<Box<Node<V>>>;

/// One entry of a chain
#[derive(Debug)]
struct Node<V> {
    /// The key, owned by the table
    key: String,
    /// The value associated with the key
    value: V,
    /// The next node of the same bucket
    next: Link<V>,
}

/// A hash table mapping owned string keys to values, resolving collisions by chaining.
///
/// Keys are hashed with 32-bit FNV-1a and the bucket is picked by masking the hash with
/// `capacity - 1`; the capacity is always a power of two. Once the number of entries
/// reaches 75% of the bucket count, the next insertion doubles the bucket array and
/// relinks every node into it.
///
/// Inserting a key that is already present replaces its value and hands the old one back.
///
/// Note: This implementation is not thread-safe. Wrap it in a lock to share it.
pub struct HashTable<V> {
    /// One chain head per bucket, `buckets.len()` is the capacity
    buckets: Vec<Link<V>>,
    /// Number of live entries across all chains
    size: usize,
    /// Threshold for load factor before growing - stored as percentage (0-100)
    load_factor_threshold: usize,
}

/// Maps `key` to a bucket of a table with `capacity` buckets.
///
/// `capacity` is a power of two, so the mask is the same as `hash % capacity`.
fn bucket_index(key: &str, capacity: usize) -> usize {
    (fnv1a(key.as_bytes()) as usize) & capacity.saturating_sub(1)
}

/// Allocates `capacity` empty buckets, aborting on allocation failure like `Vec` does
fn empty_buckets<V>(capacity: usize) -> Vec<Link<V>> {
    iter::repeat_with(|| None).take(capacity).collect()
}

/// Allocates `capacity` empty buckets, reporting allocation failure to the caller
fn try_empty_buckets<V>(capacity: usize) -> Result<Vec<Link<V>>, TryReserveError> {
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(capacity)?;
    buckets.resize_with(capacity, || None);
    Ok(buckets)
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty `HashTable` with 16 buckets
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty `HashTable` with at least `capacity` buckets.
    ///
    /// The bucket count is rounded up to the next power of two, and is at least 1.
    ///
    /// # Panics
    ///
    /// Panics if no power of two `usize` is large enough for `capacity`, or if the bucket
    /// array cannot be allocated. Use [`try_with_capacity`](Self::try_with_capacity) to get
    /// an error instead.
    #[must_use]
    #[allow(clippy::panic)]
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(table) => table,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates an empty `HashTable` with at least `capacity` buckets, rounded up to the
    /// next power of two.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::CapacityOverflow`] if the rounded bucket count does not fit in
    /// `usize`, and [`TableError::Alloc`] if the bucket array cannot be allocated.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TableError> {
        let capacity = capacity
            .max(1)
            .checked_next_power_of_two()
            .ok_or(TableError::CapacityOverflow(capacity))?;

        Ok(Self {
            buckets: try_empty_buckets(capacity)?,
            size: 0,
            load_factor_threshold: DEFAULT_LOAD_FACTOR_THRESHOLD,
        })
    }

    /// Inserts a key-value pair.
    ///
    /// Grows the table first if it is at or above its load factor threshold. If the key
    /// was already present its value is replaced and the previous value is returned.
    pub fn insert<K: Into<String>>(&mut self, key: K, value: V) -> Option<V> {
        if self.needs_growth() {
            self.grow();
        }

        self.link(key.into(), value)
    }

    /// Like [`insert`](Self::insert), but reports a failed growth instead of aborting.
    ///
    /// # Errors
    ///
    /// Fails with [`TableError::CapacityOverflow`] if the bucket count cannot be doubled and
    /// with [`TableError::Alloc`] if the grown bucket array cannot be allocated. The table
    /// is left untouched and the [`InsertError`] hands the key and value back.
    pub fn try_insert<K: Into<String>>(
        &mut self,
        key: K,
        value: V,
    ) -> Result<Option<V>, InsertError<V>> {
        let key = key.into();
        let grown = if self.needs_growth() { self.try_grow() } else { Ok(()) };
        if let Err(source) = grown {
            return Err(InsertError { source, key, value });
        }

        Ok(self.link(key, value))
    }

    /// Puts the pair into its chain without checking the load factor
    fn link(&mut self, key: String, value: V) -> Option<V> {
        let mut slot = self.bucket_mut(&key);

        loop {
            match slot {
                Some(node) if node.key == key => {
                    return Some(mem::replace(&mut node.value, value));
                }
                Some(node) => slot = &mut node.next,
                None => break,
            }
        }

        *slot = Some(Box::new(Node { key, value, next: None }));
        self.size = self.size.saturating_add(1);
        None
    }

    /// The bucket `key` hashes to
    #[allow(clippy::indexing_slicing)]
    fn bucket(&self, key: &str) -> &Link<V> {
        // The capacity is a non-zero power of two, so the masked index is in bounds.
        &self.buckets[bucket_index(key, self.buckets.len())]
    }

    /// The bucket `key` hashes to, mutably
    #[allow(clippy::indexing_slicing)]
    fn bucket_mut(&mut self, key: &str) -> &mut Link<V> {
        let index = bucket_index(key, self.buckets.len());
        &mut self.buckets[index]
    }

    /// Retrieves the value stored under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.find(key).map(|node| &node.value)
    }

    /// Walks the chain `key` hashes to
    fn find(&self, key: &str) -> Option<&Node<V>> {
        let mut link = self.bucket(key).as_deref();

        while let Some(node) = link {
            if node.key == key {
                return Some(node);
            }
            link = node.next.as_deref();
        }

        None
    }

    /// Gets a mutable reference to the value stored under `key`
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let mut link = self.bucket_mut(key).as_deref_mut();

        while let Some(node) = link {
            if node.key == key {
                return Some(&mut node.value);
            }
            link = node.next.as_deref_mut();
        }

        None
    }

    /// Returns true if `key` is present
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Removes `key` from the table, returning its value.
    ///
    /// Works wherever the key sits in its chain, head included. Removing a missing key
    /// leaves the table unchanged and returns `None`.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let mut slot = self.bucket_mut(key);

        loop {
            match slot {
                None => return None,
                Some(node) if node.key == key => break,
                Some(node) => slot = &mut node.next,
            }
        }

        let mut removed = slot.take()?;
        *slot = removed.next.take();
        self.size = self.size.saturating_sub(1);
        trace!("removed {key:?}, {} entries left", self.size);

        Some(removed.value)
    }

    /// Returns the number of elements in the hash table
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the hash table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of buckets, always a power of two
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the current load factor of the hash table
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.buckets.len() as f64
    }

    /// Provide a way to configure the load factor threshold, in percent
    pub fn set_load_factor_threshold(&mut self, threshold: usize) {
        self.load_factor_threshold = threshold.clamp(1, 95); // Keep within reasonable range
    }

    /// Removes every entry, keeping the bucket array
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            // Unlink one node at a time so dropping a long chain does not recurse.
            let mut link = bucket.take();
            while let Some(mut node) = link {
                link = node.next.take();
            }
        }
        self.size = 0;
    }

    /// Returns an iterator over the key-value pairs, in bucket order
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { buckets: self.buckets.iter(), chain: None, remaining: self.size }
    }

    /// Renders every bucket and its chain, for debugging
    #[must_use]
    pub fn dump(&self) -> Dump<'_, V> {
        Dump { table: self }
    }

    /// Takes a snapshot of how entries are spread over the buckets
    #[must_use]
    pub fn chain_stats(&self) -> ChainStats {
        ChainStats::from_chain_lengths(self.capacity(), self.size, self.chain_lengths())
    }

    /// Length of every chain, in bucket order
    fn chain_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(|bucket| {
            iter::successors(bucket.as_deref(), |node| node.next.as_deref()).count()
        })
    }

    /// Whether the next insertion has to grow the table first
    fn needs_growth(&self) -> bool {
        self.size.saturating_mul(100)
            >= self.buckets.len().saturating_mul(self.load_factor_threshold)
    }

    /// Doubles the bucket count; if it cannot double, chains just get longer
    fn grow(&mut self) {
        let Some(new_capacity) = self.buckets.len().checked_mul(2) else {
            debug!("cannot grow past {} buckets", self.buckets.len());
            return;
        };
        self.rehash_into(empty_buckets(new_capacity));
    }

    /// Doubles the bucket count with fallible allocation
    fn try_grow(&mut self) -> Result<(), TableError> {
        let capacity = self.buckets.len();
        let new_capacity = capacity
            .checked_mul(2)
            .ok_or(TableError::CapacityOverflow(capacity))?;
        self.rehash_into(try_empty_buckets(new_capacity)?);
        Ok(())
    }

    /// Swaps in `buckets` and moves every node of every old bucket into it.
    ///
    /// Nodes are relinked, never reallocated. Each one lands at the head of its new chain.
    fn rehash_into(&mut self, buckets: Vec<Link<V>>) {
        let old = mem::replace(&mut self.buckets, buckets);
        debug!(
            "growing hash table from {} to {} buckets, {} entries",
            old.len(),
            self.buckets.len(),
            self.size
        );

        for mut link in old {
            while let Some(mut node) = link {
                link = node.next.take();
                let head = self.bucket_mut(&node.key);
                node.next = head.take();
                *head = Some(node);
            }
        }
    }
}

impl<V> Drop for HashTable<V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<V: Clone> Clone for HashTable<V> {
    fn clone(&self) -> Self {
        let mut buckets = Vec::with_capacity(self.buckets.len());

        for bucket in &self.buckets {
            let mut head: Link<V> = None;
            let mut tail = &mut head;
            let mut link = bucket.as_deref();
            while let Some(node) = link {
                let copy = Node { key: node.key.clone(), value: node.value.clone(), next: None };
                tail = &mut tail.insert(Box::new(copy)).next;
                link = node.next.as_deref();
            }
            buckets.push(head);
        }

        Self { buckets, size: self.size, load_factor_threshold: self.load_factor_threshold }
    }
}

impl<V: fmt::Debug> fmt::Debug for HashTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>, V> Extend<(K, V)> for HashTable<V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for HashTable<V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the key-value pairs of the hash table
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// Buckets not visited yet
    buckets: slice::Iter<'a, Link<V>>,
    /// Next node of the chain being walked
    chain: Option<&'a Node<V>>,
    /// Entries not yielded yet
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.chain {
                self.chain = node.next.as_deref();
                self.remaining = self.remaining.saturating_sub(1);
                return Some((node.key.as_str(), &node.value));
            }
            self.chain = self.buckets.next()?.as_deref();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

/// Debug rendering of a table's buckets, returned by [`HashTable::dump`].
///
/// One line per bucket, chains joined with `->`, empty buckets as `{}`:
///
/// ```text
/// {
///     {},
///     {alice, 1}->{dave, 4},
/// }
/// ```
///
/// The layout is meant for eyes, not for parsing.
#[derive(Debug)]
pub struct Dump<'a, V> {
    /// The table being rendered
    table: &'a HashTable<V>,
}

impl<V: fmt::Display> fmt::Display for Dump<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{")?;
        for bucket in &self.table.buckets {
            f.write_str("\t")?;
            match bucket.as_deref() {
                None => f.write_str("{}")?,
                Some(head) => {
                    write!(f, "{{{}, {}}}", head.key, head.value)?;
                    let rest = iter::successors(head.next.as_deref(), |node| node.next.as_deref());
                    for node in rest {
                        write!(f, "->{{{}, {}}}", node.key, node.value)?;
                    }
                }
            }
            writeln!(f, ",")?;
        }
        f.write_str("}")
    }
}


#[cfg(test)]
mod proptests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;

    /// A table operation over a small key space, so that keys repeat and chains form
    #[derive(Debug, Clone)]
    enum Op {
        /// Insert `value` under key number `.0`
        Insert(u8, i64),
        /// Remove key number `.0`
        Remove(u8),
        /// Look up key number `.0`
        Get(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0u8..64, any::<i64>()).prop_map(|(k, v)| Op::Insert(k, v)),
            1 => (0u8..64).prop_map(Op::Remove),
            1 => (0u8..64).prop_map(Op::Get),
        ]
    }

    proptest! {
        #[test]
        fn prop_behaves_like_std_hashmap(ops in proptest::collection::vec(op(), 1..300)) {
            let mut table = HashTable::new();
            let mut model: HashMap<String, i64> = HashMap::new();

            for op in ops {
                match op {
                    Op::Insert(k, v) => {
                        let key = format!("k{k}");
                        let capacity = table.capacity();
                        prop_assert_eq!(table.insert(key.clone(), v), model.insert(key, v));
                        let grown = table.capacity();
                        prop_assert!(grown == capacity || grown == capacity * 2);
                    }
                    Op::Remove(k) => {
                        let key = format!("k{k}");
                        prop_assert_eq!(table.remove(&key), model.remove(&key));
                        prop_assert_eq!(table.get(&key), None);
                    }
                    Op::Get(k) => {
                        let key = format!("k{k}");
                        prop_assert_eq!(table.get(&key), model.get(&key));
                    }
                }
                prop_assert_eq!(table.len(), model.len());
            }

            assert_chains_consistent(&table);
            for (key, value) in &model {
                prop_assert_eq!(table.get(key), Some(value));
            }
        }

        #[test]
        fn prop_all_keys_survive_growth(
            keys in proptest::collection::hash_set("[a-z0-9]{1,12}", 1..200)
        ) {
            let mut table = HashTable::new();
            for (i, key) in keys.iter().enumerate() {
                table.insert(key.as_str(), i);
            }

            prop_assert_eq!(table.len(), keys.len());
            prop_assert!(table.capacity().is_power_of_two());
            prop_assert!(table.len() * 4 <= table.capacity() * 3 + 4);
            for (i, key) in keys.iter().enumerate() {
                prop_assert_eq!(table.get(key), Some(&i));
            }
        }
    }

    /// Same check as in `tests`, duplicated so this module stands alone
    fn assert_chains_consistent<V>(table: &HashTable<V>) {
        let capacity = table.capacity();
        for (index, bucket) in table.buckets.iter().enumerate() {
            for node in iter::successors(bucket.as_deref(), |node| node.next.as_deref()) {
                assert_eq!(bucket_index(&node.key, capacity), index);
            }
        }
    }
}
