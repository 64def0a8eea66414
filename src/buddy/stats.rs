//! Statistics and debugging for buddy allocator
//!
//! Provides a snapshot of arena usage and failure reporting.

use alloc::vec::Vec;

use super::buddy_block::block_size;

/// Buddy arena statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuddyStats {
    pub capacity: usize,
    pub used: usize,
    /// Units held by free blocks across every order.
    pub free_units: usize,
    /// Number of free blocks, indexed by order.
    pub free_blocks_by_order: Vec<usize>,
}

impl BuddyStats {
    /// Build statistics from per-order free-list lengths.
    pub fn from_free_lists<'a, I>(capacity: usize, used: usize, lists: I) -> Self
    where
        I: IntoIterator<Item = &'a [usize]>,
    {
        let free_blocks_by_order: Vec<usize> = lists.into_iter().map(<[usize]>::len).collect();
        let free_units = free_blocks_by_order
            .iter()
            .enumerate()
            .map(|(order, &count)| count * block_size(order))
            .sum();

        Self {
            capacity,
            used,
            free_units,
            free_blocks_by_order,
        }
    }

    /// Whether free and used units account for the whole arena.
    pub fn is_balanced(&self) -> bool {
        self.free_units + self.used == self.capacity
    }
}

/// Detailed arena statistics reporter
pub struct MemoryStatsReporter;

impl MemoryStatsReporter {
    /// Print detailed allocation failure statistics
    #[allow(unused_variables)]
    pub fn print_alloc_failure_stats(stats: &BuddyStats, request_size: usize) {
        #[cfg(feature = "log")]
        use log::error;
        error!("========================================");
        error!("Request: {} units", request_size);
        error!("  Capacity: {} units", stats.capacity);
        error!("  Used: {} units", stats.used);
        error!("  Free: {} units", stats.free_units);
        error!("  Free blocks by order:");

        for (order, &count) in stats.free_blocks_by_order.iter().enumerate().rev() {
            if count > 0 {
                error!(
                    "    Order {}: {} blocks ({} units each, {} units total)",
                    order,
                    count,
                    block_size(order),
                    count * block_size(order)
                );
            }
        }
        error!("========================================");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_stats_from_free_lists() {
        let lists: Vec<Vec<usize>> = vec![vec![1], vec![2], vec![4], vec![]];
        let stats = BuddyStats::from_free_lists(8, 1, lists.iter().map(Vec::as_slice));
        assert_eq!(stats.free_blocks_by_order, vec![1, 1, 1, 0]);
        assert_eq!(stats.free_units, 7);
        assert!(stats.is_balanced());
    }
}
