//! Construction options for the buddy allocator

use super::buddy_block::{
    DEFAULT_CAPACITY, DEFAULT_MAX_ORDER, MAX_CAPACITY, MAX_ORDER, MIN_CAPACITY, MIN_MAX_ORDER,
};

/// Configuration for [`BuddyAllocator`](super::BuddyAllocator).
///
/// `max_order` sets the largest block size (`2^max_order` units). Unless it
/// was fixed with [`with_max_order`](Self::with_max_order), the allocator
/// recomputes it every time the arena grows. Values are only set through
/// the builder methods, which keep them within their bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuddyAllocatorOptions {
    capacity: usize,
    max_order: usize,
    max_order_fixed: bool,
}

impl BuddyAllocatorOptions {
    pub const fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_order: DEFAULT_MAX_ORDER,
            max_order_fixed: false,
        }
    }

    /// Initial arena capacity, between [`MIN_CAPACITY`] and [`MAX_CAPACITY`]
    /// units.
    pub const fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.capacity = if capacity < MIN_CAPACITY {
            MIN_CAPACITY
        } else if capacity > MAX_CAPACITY {
            MAX_CAPACITY
        } else {
            capacity
        };
        self
    }

    /// Fix the maximum order, between [`MIN_MAX_ORDER`] and [`MAX_ORDER`].
    ///
    /// Allocations that need a larger block then fail instead of growing
    /// the arena.
    pub const fn with_max_order(mut self, order: usize) -> Self {
        self.max_order = if order < MIN_MAX_ORDER {
            MIN_MAX_ORDER
        } else if order > MAX_ORDER {
            MAX_ORDER
        } else {
            order
        };
        self.max_order_fixed = true;
        self
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub const fn max_order(&self) -> usize {
        self.max_order
    }

    pub const fn is_max_order_fixed(&self) -> bool {
        self.max_order_fixed
    }
}

impl Default for BuddyAllocatorOptions {
    fn default() -> Self {
        Self::new()
    }
}
