//! Buddy arena allocator module
//!
//! This module provides a growable buddy system with:
//! - Sorted per-order free lists for buddy lookup
//! - Elastic or fixed maximum order
//! - Usage statistics and debugging

pub mod buddy_allocator;
pub mod buddy_block;
pub mod options;
pub mod stats;

pub use buddy_allocator::{Allocation, BuddyAllocator};
pub use buddy_block::{
    block_size, order_of, BuddyBlock, DEFAULT_CAPACITY, DEFAULT_MAX_ORDER, MAX_CAPACITY,
    MAX_ORDER, MIN_CAPACITY, MIN_MAX_ORDER,
};
pub use options::BuddyAllocatorOptions;
pub use stats::{BuddyStats, MemoryStatsReporter};
