//! Growable buddy allocator over an index-addressed arena
//!
//! The arena is a range of `capacity` units. Free space is tracked as one
//! ascending list of block offsets per order; allocation splits blocks down
//! to the requested order and deallocation merges buddies back up.

use alloc::vec::Vec;

use crate::{sorted, AllocError, AllocResult, Percent};

#[cfg(feature = "log")]
use log::{debug, info, trace, warn};

use super::{
    buddy_block::{block_size, floor_order, order_of, BuddyBlock, MIN_CAPACITY},
    options::BuddyAllocatorOptions,
    stats::BuddyStats,
};

#[cfg(feature = "tracking")]
use super::stats::MemoryStatsReporter;

/// A successful allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    /// Arena offset of the first unit of the block.
    pub index: usize,
    /// Whether the arena had to grow to satisfy the request.
    pub grew: bool,
}

/// Buddy allocator handing out arena offsets
pub struct BuddyAllocator {
    capacity: usize,
    max_order: usize,
    max_order_fixed: bool,
    used: usize,
    /// Free block offsets for each order, ascending
    free_lists: Vec<Vec<usize>>,
}

impl BuddyAllocator {
    /// Create an allocator whose whole capacity is free.
    ///
    /// The capacity is rounded up to a multiple of the largest block size.
    pub fn new(options: BuddyAllocatorOptions) -> Self {
        let max_order = options.max_order();
        let top_size = block_size(max_order);
        let capacity = options.capacity().max(top_size).next_multiple_of(top_size);

        let mut allocator = Self {
            capacity,
            max_order,
            max_order_fixed: options.is_max_order_fixed(),
            used: 0,
            free_lists: (0..=max_order).map(|_| Vec::new()).collect(),
        };
        allocator.fill_top_order();
        allocator
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn available(&self) -> usize {
        self.capacity - self.used
    }

    pub fn max_order(&self) -> usize {
        self.max_order
    }

    pub fn is_max_order_fixed(&self) -> bool {
        self.max_order_fixed
    }

    /// Fraction of the arena currently allocated.
    pub fn efficiency(&self) -> Percent {
        Percent::from_decimal(self.used as f64 / self.capacity as f64)
    }

    /// Free block offsets of the given order, ascending.
    pub fn free_blocks(&self, order: usize) -> &[usize] {
        self.free_lists.get(order).map_or(&[], Vec::as_slice)
    }

    pub fn stats(&self) -> BuddyStats {
        BuddyStats::from_free_lists(
            self.capacity,
            self.used,
            self.free_lists.iter().map(Vec::as_slice),
        )
    }

    /// Allocate a block able to hold `size` units.
    ///
    /// With an elastic maximum order the arena grows as needed, which is
    /// reported through [`Allocation::grew`]. With a fixed maximum order a
    /// request above it fails with [`AllocError::OrderTooLarge`].
    pub fn allocate(&mut self, size: usize) -> AllocResult<Allocation> {
        let required_order = order_of(size);
        let mut grew = false;

        if required_order > self.max_order {
            if self.max_order_fixed {
                warn!(
                    "buddy allocator: required order {} exceeds fixed max order {}",
                    required_order, self.max_order
                );
                return Err(AllocError::OrderTooLarge);
            }

            while required_order > self.max_order {
                self.grow()?;
                grew = true;
            }
        }

        if let Some(index) = self.take_block(required_order) {
            return Ok(Allocation { index, grew });
        }

        // Out of blocks at every usable order: grow once and retry once.
        match self.grow().map(|()| self.take_block(required_order)) {
            Ok(Some(index)) => Ok(Allocation { index, grew: true }),
            Ok(None) | Err(_) => {
                #[cfg(feature = "tracking")]
                MemoryStatsReporter::print_alloc_failure_stats(&self.stats(), size);
                Err(AllocError::NoMemory)
            }
        }
    }

    /// Release the block at `index` that was allocated for `size` units.
    ///
    /// Fails for an index outside the arena, an index misaligned for the
    /// block size, or a block sharing any unit with a free block. Every check
    /// runs before anything is modified. Any other `size` different from the
    /// one used to allocate is not detected.
    pub fn free(&mut self, index: usize, size: usize) -> AllocResult {
        if index >= self.capacity {
            warn!(
                "buddy allocator: free of index {} outside capacity {}",
                index, self.capacity
            );
            return Err(AllocError::OutOfRange);
        }

        let required_order = order_of(size);
        if required_order > self.max_order {
            warn!(
                "buddy allocator: free of order {} above max order {}",
                required_order, self.max_order
            );
            return Err(AllocError::OrderTooLarge);
        }
        if index % block_size(required_order) != 0 {
            warn!(
                "buddy allocator: index {} is not aligned for order {}",
                index, required_order
            );
            return Err(AllocError::Misaligned);
        }

        let mut block = BuddyBlock::new(required_order, index);
        if self.overlaps_free(block) {
            warn!("buddy allocator: double free detected at index {}", index);
            return Err(AllocError::DoubleFree);
        }

        // No free unit lies inside the block, so all of it is counted in `used`.
        self.used -= block.size();

        while block.order < self.max_order {
            if !block.is_lower_half() {
                break;
            }

            let buddy_index = block.buddy_index();
            let list = &mut self.free_lists[block.order];
            match sorted::galloping_search(list, buddy_index) {
                (position, true) => {
                    list.remove(position);
                    block = BuddyBlock::new(block.order + 1, block.index.min(buddy_index));
                }
                (_, false) => break,
            }
        }

        trace!(
            "buddy allocator: freed index {} as order {} block at {}",
            index,
            block.order,
            block.index
        );
        self.insert_free(block);
        Ok(())
    }

    /// Mark every unit free again without walking individual allocations.
    pub fn clear_all(&mut self) {
        self.used = 0;
        for list in &mut self.free_lists {
            list.clear();
        }
        self.fill_top_order();
        debug!("buddy allocator: cleared {} units", self.capacity);
    }

    /// Log the current free lists, largest order first.
    pub fn print_free_lists(&self) {
        info!("========== Buddy Allocator Free Lists ==========");
        info!(
            "Capacity: {} units, used: {} ({})",
            self.capacity,
            self.used,
            self.efficiency()
        );
        for order in (0..=self.max_order).rev() {
            let list = &self.free_lists[order];
            if !list.is_empty() {
                info!(
                    "  Order {}: {} blocks at {:?}",
                    order,
                    list.len(),
                    list.as_slice()
                );
            }
        }
        info!("================================================");
    }

    /// Pop a block of at least `required_order` and split it down.
    ///
    /// The popped block is the last entry of its list, so the most recently
    /// inserted block is handed out first.
    fn take_block(&mut self, required_order: usize) -> Option<usize> {
        let order = (required_order..=self.max_order)
            .find(|&order| !self.free_lists[order].is_empty())?;
        let index = self.free_lists[order].pop()?;

        let mut block = BuddyBlock::new(order, index);
        while block.order > required_order {
            let upper = block.split();
            self.insert_free(upper);
        }

        self.used += block.size();
        Some(block.index)
    }

    /// Whether any free block shares a unit with `block`.
    fn overlaps_free(&self, block: BuddyBlock) -> bool {
        self.free_lists.iter().enumerate().any(|(order, list)| {
            if order >= block.order {
                // The only block of this order that could contain `block`.
                let start = block.index & !(block_size(order) - 1);
                sorted::galloping_search(list, start).1
            } else {
                let (position, _) = sorted::galloping_search(list, block.index);
                list.get(position)
                    .is_some_and(|&free| free < block.index + block.size())
            }
        })
    }

    /// Append one top-order block at the end of the arena.
    fn grow(&mut self) -> AllocResult {
        let offset = self.capacity;
        let size = block_size(self.max_order).max(MIN_CAPACITY);
        self.capacity = match offset.checked_add(size) {
            Some(capacity) => capacity,
            None => {
                warn!(
                    "buddy allocator: cannot grow capacity {} by {} units",
                    offset, size
                );
                return Err(AllocError::NoMemory);
            }
        };

        if !self.max_order_fixed {
            // Largest order that still divides the capacity, so every
            // top-order block stays aligned to its size.
            let order = floor_order(self.capacity).min(self.capacity.trailing_zeros() as usize);
            self.max_order = self.max_order.max(order);
            if self.free_lists.len() <= self.max_order {
                self.free_lists.resize_with(self.max_order + 1, Vec::new);
            }
        }

        debug!(
            "buddy allocator: grew by {} units to {} (max order {})",
            size, self.capacity, self.max_order
        );
        self.insert_free(BuddyBlock::new(order_of(size), offset));
        Ok(())
    }

    fn insert_free(&mut self, block: BuddyBlock) {
        sorted::ordered_insert(&mut self.free_lists[block.order], block.index, false);
    }

    fn fill_top_order(&mut self) {
        let step = block_size(self.max_order);
        let top = &mut self.free_lists[self.max_order];
        top.extend((0..self.capacity).step_by(step));
    }
}

impl Default for BuddyAllocator {
    fn default() -> Self {
        Self::new(BuddyAllocatorOptions::default())
    }
}
