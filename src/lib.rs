//! Index-addressed buddy allocator and pointer-free linked list
//!
//! This crate implements an arena memory-management layer, featuring:
//! - Sorted-sequence helpers (binary and galloping search, ordered insert)
//! - A power-of-two buddy allocator over a growable, index-addressed arena
//! - A doubly-linked list whose nodes live in parallel arrays and are
//!   addressed by slot indices leased from a private buddy allocator
//!
//! Nothing here hands out native pointers: every block is an offset into the
//! arena and every list node is addressed through a typed handle.

#![no_std]

extern crate alloc;

use core::fmt;

// Logging support - conditionally import log crate
#[cfg(feature = "log")]
extern crate log;

// Stub macros when log is disabled - these become no-ops
#[cfg(not(feature = "log"))]
macro_rules! error {
    ($($arg:tt)*) => {};
}
#[cfg(not(feature = "log"))]
macro_rules! warn {
    ($($arg:tt)*) => {};
}
#[cfg(not(feature = "log"))]
macro_rules! info {
    ($($arg:tt)*) => {};
}
#[cfg(not(feature = "log"))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}
#[cfg(not(feature = "log"))]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// The error type used for arena allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// The request needs a block larger than a fixed maximum order allows.
    OrderTooLarge,
    /// The index lies outside the arena.
    OutOfRange,
    /// The index is not aligned to the block size implied by the size.
    Misaligned,
    /// Deallocate a block that is already free.
    DoubleFree,
    /// No free block even after growing the arena.
    NoMemory,
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrderTooLarge => f.write_str("requested size exceeds the fixed maximum order"),
            Self::OutOfRange => f.write_str("index is outside the arena"),
            Self::Misaligned => f.write_str("index is not aligned to its block size"),
            Self::DoubleFree => f.write_str("block is already free"),
            Self::NoMemory => f.write_str("no free block available"),
        }
    }
}

/// A [`Result`] type with [`AllocError`] as the error type.
pub type AllocResult<T = ()> = Result<T, AllocError>;

pub mod sorted;

pub mod percent;
pub use percent::Percent;

pub mod buddy;
pub use buddy::{Allocation, BuddyAllocator, BuddyAllocatorOptions, BuddyStats};

pub mod list;
pub use list::{IndexedLinkedList, ListError, ListId, ListResult, NodeHandle, NodeRef, SlotIndex};
