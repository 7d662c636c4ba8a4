//! # Chained Hash Table
//!
//! A Rust implementation of a hash table that resolves collisions by separate chaining.
//!
//! Keys are owned strings hashed with 32-bit FNV-1a. Each bucket heads a singly linked
//! chain of entries, the bucket count is always a power of two (16 to start with), and the
//! table doubles once it is three quarters full, relinking every entry into the new buckets
//! without reallocating it.
//!
//! ## Basic Usage
//!
//! ```rust
//! use chainmap::HashTable;
//!
//! // Create a new table
//! let mut table = HashTable::new();
//!
//! // Insert values
//! table.insert("apple", 1);
//! table.insert("banana", 2);
//!
//! // Retrieve values
//! assert_eq!(table.get("apple"), Some(&1));
//!
//! // Inserting an existing key replaces its value
//! assert_eq!(table.insert("apple", 10), Some(1));
//! assert_eq!(table.get("apple"), Some(&10));
//!
//! // Remove values
//! assert_eq!(table.remove("apple"), Some(10));
//! assert_eq!(table.get("apple"), None);
//! ```
//!
//! ## Debugging
//!
//! ```rust
//! use chainmap::HashTable;
//!
//! let mut table = HashTable::with_capacity(4);
//! table.insert("bob", 2);
//!
//! // One line per bucket
//! assert_eq!(table.dump().to_string(), "{\n\t{bob, 2},\n\t{},\n\t{},\n\t{},\n}");
//! println!("{}", table.chain_stats());
//! ```

/// Error returned by fallible insertion
mod error;
/// FNV-1a hash function and hasher
pub mod fnv;
/// Module implementing the chained hash table
mod hash_table;
/// Chain length statistics
mod stats;
/// Utility functions and traits for the table
mod utils;

pub use error::{InsertError, TableError};
pub use fnv::fnv1a;
pub use hash_table::{DEFAULT_CAPACITY, Dump, HashTable, Iter};
pub use stats::{CHAIN_STATS_VECTLEN, ChainStats};
pub use utils::TableExtensions;
