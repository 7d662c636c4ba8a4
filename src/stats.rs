//! Chain occupancy statistics for [`HashTable`](crate::HashTable)

use std::fmt;

/// Number of histogram slots; the last one also counts every longer chain
pub const CHAIN_STATS_VECTLEN: usize = 16;

/// Snapshot of how a table's entries are spread over its buckets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStats {
    /// Number of buckets
    pub capacity: usize,
    /// Number of entries
    pub len: usize,
    /// Buckets holding at least one entry
    pub used_buckets: usize,
    /// Length of the longest chain
    pub max_chain_len: usize,
    /// `histogram[n]` is the number of buckets whose chain has `n` entries
    pub histogram: [usize; CHAIN_STATS_VECTLEN],
}

impl ChainStats {
    /// Builds the snapshot from the length of every chain
    pub(crate) fn from_chain_lengths(
        capacity: usize,
        len: usize,
        chain_lengths: impl IntoIterator<Item = usize>,
    ) -> Self {
        let mut stats = Self {
            capacity,
            len,
            used_buckets: 0,
            max_chain_len: 0,
            histogram: [0; CHAIN_STATS_VECTLEN],
        };

        for chain_len in chain_lengths {
            if chain_len > 0 {
                stats.used_buckets = stats.used_buckets.saturating_add(1);
            }
            stats.max_chain_len = stats.max_chain_len.max(chain_len);
            let slot = chain_len.min(CHAIN_STATS_VECTLEN.saturating_sub(1));
            if let Some(count) = stats.histogram.get_mut(slot) {
                *count = count.saturating_add(1);
            }
        }

        stats
    }

    /// Average chain length over the buckets that hold something
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn avg_chain_len(&self) -> f64 {
        if self.used_buckets == 0 {
            return 0.0;
        }
        self.len as f64 / self.used_buckets as f64
    }
}

impl fmt::Display for ChainStats {
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.len == 0 {
            return writeln!(f, "Hash table stats: no stats available for empty tables");
        }

        writeln!(f, "Hash table stats:")?;
        writeln!(f, " table size: {}", self.capacity)?;
        writeln!(f, " number of elements: {}", self.len)?;
        writeln!(
            f,
            " different slots: {}, max chain length: {}",
            self.used_buckets, self.max_chain_len
        )?;
        writeln!(f, " avg chain length: {:.2}", self.avg_chain_len())?;
        writeln!(f, " Chain length distribution:")?;
        for (chain_len, &count) in self.histogram.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let share = count as f64 * 100.0 / self.capacity as f64;
            writeln!(f, "   {chain_len}: {count} ({share:.2}%)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::HashTable;

    #[test]
    fn test_empty_table_stats() {
        let table: HashTable<u8> = HashTable::new();
        let stats = table.chain_stats();

        assert_eq!(stats.capacity, 16);
        assert_eq!(stats.used_buckets, 0);
        assert_eq!(stats.max_chain_len, 0);
        assert_eq!(stats.histogram[0], 16);
        assert!(stats.avg_chain_len().abs() < f64::EPSILON);
        assert!(stats.to_string().contains("no stats available"));
    }

    #[test]
    fn test_stats_with_collisions() {
        let mut table = HashTable::new();
        // alice, judy and peggy share a bucket when there are 16 of them
        table.insert("alice", 1);
        table.insert("judy", 2);
        table.insert("peggy", 3);
        table.insert("bob", 4);

        let stats = table.chain_stats();
        assert_eq!(stats.len, 4);
        assert_eq!(stats.used_buckets, 2);
        assert_eq!(stats.max_chain_len, 3);
        assert_eq!(stats.histogram[0], 14);
        assert_eq!(stats.histogram[1], 1);
        assert_eq!(stats.histogram[3], 1);
        assert!((stats.avg_chain_len() - 2.0).abs() < f64::EPSILON);

        let report = stats.to_string();
        assert!(report.contains("max chain length: 3"));
        assert!(report.contains("3: 1 (6.25%)"));
    }

    #[test]
    fn test_histogram_sums_to_capacity() {
        let mut table = HashTable::new();
        for i in 0..500 {
            table.insert(format!("entry-{i}"), i);
        }

        let stats = table.chain_stats();
        assert_eq!(stats.histogram.iter().sum::<usize>(), stats.capacity);
        assert_eq!(stats.capacity, table.capacity());
    }
}
