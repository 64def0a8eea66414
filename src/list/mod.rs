//! Index-addressed linked list module
//!
//! A doubly-linked list whose nodes live in parallel arrays and whose slots
//! are leased from a private buddy allocator.

use core::fmt;

use crate::AllocError;

pub mod indexed_list;
pub mod node;

pub use indexed_list::{IndexedLinkedList, Iter, DEFAULT_INITIAL_SIZE};
pub use node::{ListId, NodeHandle, NodeRef, SlotIndex};

/// The error type used for list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    /// The handle belongs to another list.
    ForeignHandle,
    /// The handle's node has been removed.
    StaleHandle,
    /// Leasing a slot from the allocator failed.
    Alloc(AllocError),
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignHandle => f.write_str("handle belongs to another list"),
            Self::StaleHandle => f.write_str("handle refers to a removed node"),
            Self::Alloc(err) => write!(f, "slot allocation failed: {}", err),
        }
    }
}

impl From<AllocError> for ListError {
    fn from(err: AllocError) -> Self {
        Self::Alloc(err)
    }
}

/// A [`Result`] type with [`ListError`] as the error type.
pub type ListResult<T = ()> = Result<T, ListError>;
