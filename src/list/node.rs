//! Node handles for the indexed linked list
//!
//! Nodes are addressed by 1-based slot indices; slot 0 is the null
//! sentinel and never names a node, so a missing link is `None`.

use core::num::NonZeroUsize;
use core::sync::atomic::{AtomicUsize, Ordering};

static NEXT_LIST_ID: AtomicUsize = AtomicUsize::new(1);

/// Identity of one list instance, used to reject foreign handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListId(usize);

impl ListId {
    pub(crate) fn next() -> Self {
        Self(NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// 1-based position of a node in the list's backing arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotIndex(NonZeroUsize);

impl SlotIndex {
    /// Returns `None` for the null sentinel.
    pub const fn new(slot: usize) -> Option<Self> {
        match NonZeroUsize::new(slot) {
            Some(slot) => Some(Self(slot)),
            None => None,
        }
    }

    /// Slot for the allocator's 0-based arena offset.
    pub(crate) fn from_offset(offset: usize) -> Self {
        Self(NonZeroUsize::MIN.saturating_add(offset))
    }

    /// The allocator's arena offset for this slot.
    pub(crate) const fn offset(self) -> usize {
        self.0.get() - 1
    }

    pub const fn get(self) -> usize {
        self.0.get()
    }
}

/// Copyable key addressing a live node.
///
/// A key stays valid until its node is removed; after that the slot's
/// generation moves on and the key is reported as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub(crate) list: ListId,
    pub(crate) slot: SlotIndex,
    pub(crate) generation: u32,
}

impl NodeRef {
    pub fn list(&self) -> ListId {
        self.list
    }

    pub fn slot(&self) -> SlotIndex {
        self.slot
    }
}

/// Snapshot of a node taken when it was queried or removed.
///
/// The links are those at snapshot time and are not refreshed by later
/// list operations.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeHandle<T> {
    value: T,
    node: NodeRef,
    next: Option<SlotIndex>,
    previous: Option<SlotIndex>,
}

impl<T> NodeHandle<T> {
    pub(crate) fn new(
        value: T,
        node: NodeRef,
        next: Option<SlotIndex>,
        previous: Option<SlotIndex>,
    ) -> Self {
        Self {
            value,
            node,
            next,
            previous,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// Key for further operations relative to this node.
    pub fn node_ref(&self) -> NodeRef {
        self.node
    }

    pub fn slot(&self) -> SlotIndex {
        self.node.slot
    }

    pub fn next_slot(&self) -> Option<SlotIndex> {
        self.next
    }

    pub fn previous_slot(&self) -> Option<SlotIndex> {
        self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_index_sentinel() {
        assert_eq!(SlotIndex::new(0), None);
        assert_eq!(SlotIndex::new(3).map(SlotIndex::get), Some(3));
        assert_eq!(core::mem::size_of::<Option<SlotIndex>>(), core::mem::size_of::<usize>());
    }

    #[test]
    fn test_slot_offset_shift() {
        let slot = SlotIndex::from_offset(0);
        assert_eq!(slot.get(), 1);
        assert_eq!(slot.offset(), 0);
        assert_eq!(SlotIndex::from_offset(41).get(), 42);
    }

    #[test]
    fn test_list_ids_are_unique() {
        let first = ListId::next();
        let second = ListId::next();
        assert_ne!(first, second);
    }
}
