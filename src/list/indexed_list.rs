//! Doubly-linked list over buddy-leased slots
//!
//! Node links and values live in two parallel arrays. Each node occupies one
//! slot leased from a private [`BuddyAllocator`]; the allocator's offset is
//! shifted by one so slot 0 stays free as the null sentinel. When the
//! allocator grows its arena, both arrays are resized to match.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

#[cfg(feature = "log")]
use log::{debug, error, warn};

use super::{
    node::{ListId, NodeHandle, NodeRef, SlotIndex},
    ListError, ListResult,
};
use crate::{
    buddy::{BuddyAllocator, BuddyAllocatorOptions},
    Percent,
};

/// Backing-array size used by [`IndexedLinkedList::new`].
pub const DEFAULT_INITIAL_SIZE: usize = 16;

/// Links of one node slot
#[derive(Debug, Clone, Copy, Default)]
struct NodeSlot {
    next: Option<SlotIndex>,
    previous: Option<SlotIndex>,
    /// Bumped every time the slot is released
    generation: u32,
}

/// Doubly-linked list addressed by slot indices instead of pointers
///
/// Nodes are referred to through [`NodeRef`] keys. A key carries the slot
/// and its generation, so operations resolve it in O(1) and reject keys
/// whose node has since been removed.
pub struct IndexedLinkedList<T> {
    id: ListId,
    head: Option<SlotIndex>,
    tail: Option<SlotIndex>,
    len: usize,
    /// Slot 0 is never used
    nodes: Vec<NodeSlot>,
    /// Slot 0 is never used
    values: Vec<Option<T>>,
    memory: BuddyAllocator,
}

impl<T> IndexedLinkedList<T> {
    pub fn new() -> Self {
        Self::with_initial_size(DEFAULT_INITIAL_SIZE)
    }

    /// Create an empty list sized for at least `initial_size` nodes.
    pub fn with_initial_size(initial_size: usize) -> Self {
        let memory = BuddyAllocator::new(
            BuddyAllocatorOptions::new()
                .with_initial_capacity(initial_size.max(DEFAULT_INITIAL_SIZE)),
        );
        let slots = memory.capacity() + 1;
        let mut values = Vec::with_capacity(slots);
        values.resize_with(slots, || None);

        Self {
            id: ListId::next(),
            head: None,
            tail: None,
            len: 0,
            nodes: vec![NodeSlot::default(); slots],
            values,
            memory,
        }
    }

    pub fn id(&self) -> ListId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots the backing arena can hold without growing.
    pub fn capacity(&self) -> usize {
        self.memory.capacity()
    }

    /// Share of leased slots in the backing arena.
    pub fn efficiency(&self) -> Percent {
        self.memory.efficiency()
    }

    /// Add `value` after the current tail.
    pub fn append(&mut self, value: T) -> ListResult<NodeRef> {
        let slot = self.lease_slot(value)?;
        self.node_mut(slot).previous = self.tail;
        match self.tail {
            Some(tail) => self.node_mut(tail).next = Some(slot),
            None => self.head = Some(slot),
        }

        self.tail = Some(slot);
        self.len += 1;
        Ok(self.node_ref(slot))
    }

    /// Add `value` before the current head.
    pub fn prepend(&mut self, value: T) -> ListResult<NodeRef> {
        let slot = self.lease_slot(value)?;
        self.node_mut(slot).next = self.head;
        match self.head {
            Some(head) => self.node_mut(head).previous = Some(slot),
            None => self.tail = Some(slot),
        }

        self.head = Some(slot);
        self.len += 1;
        Ok(self.node_ref(slot))
    }

    /// Insert `value` right after the node `at`.
    pub fn insert_next(&mut self, at: NodeRef, value: T) -> ListResult<NodeRef> {
        let at = self.resolve(at)?;
        let slot = self.lease_slot(value)?;
        let next = self.node(at).next;

        let node = self.node_mut(slot);
        node.previous = Some(at);
        node.next = next;
        match next {
            Some(next) => self.node_mut(next).previous = Some(slot),
            None => self.tail = Some(slot),
        }
        self.node_mut(at).next = Some(slot);

        self.len += 1;
        Ok(self.node_ref(slot))
    }

    /// Insert `value` right before the node `at`.
    pub fn insert_previous(&mut self, at: NodeRef, value: T) -> ListResult<NodeRef> {
        let at = self.resolve(at)?;
        let slot = self.lease_slot(value)?;
        let previous = self.node(at).previous;

        let node = self.node_mut(slot);
        node.next = Some(at);
        node.previous = previous;
        match previous {
            Some(previous) => self.node_mut(previous).next = Some(slot),
            None => self.head = Some(slot),
        }
        self.node_mut(at).previous = Some(slot);

        self.len += 1;
        Ok(self.node_ref(slot))
    }

    /// Remove the first node, returning a snapshot that owns its value.
    pub fn pop_head(&mut self) -> Option<NodeHandle<T>> {
        let head = self.head?;
        self.detach(head)
    }

    /// Remove the last node, returning a snapshot that owns its value.
    pub fn pop_tail(&mut self) -> Option<NodeHandle<T>> {
        let tail = self.tail?;
        self.detach(tail)
    }

    /// Remove the node `at` and return its value.
    pub fn remove(&mut self, at: NodeRef) -> ListResult<T> {
        let slot = self.resolve(at)?;
        self.detach(slot)
            .map(NodeHandle::into_value)
            .ok_or(ListError::StaleHandle)
    }

    pub fn get(&self, at: NodeRef) -> ListResult<&T> {
        let slot = self.resolve(at)?;
        self.values[slot.get()]
            .as_ref()
            .ok_or(ListError::StaleHandle)
    }

    pub fn get_mut(&mut self, at: NodeRef) -> ListResult<&mut T> {
        let slot = self.resolve(at)?;
        self.values[slot.get()]
            .as_mut()
            .ok_or(ListError::StaleHandle)
    }

    /// Drop every node and hand all slots back to the allocator at once.
    ///
    /// Keys to the dropped nodes become stale.
    pub fn clear(&mut self) {
        let mut current = self.head;
        while let Some(slot) = current {
            let node = self.node_mut(slot);
            current = node.next;
            *node = NodeSlot {
                generation: node.generation.wrapping_add(1),
                ..NodeSlot::default()
            };
            self.values[slot.get()] = None;
        }

        self.head = None;
        self.tail = None;
        self.len = 0;
        self.memory.clear_all();
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    /// Check that `at` names a live node of this list.
    fn resolve(&self, at: NodeRef) -> ListResult<SlotIndex> {
        if at.list != self.id {
            warn!("list {:?}: handle from list {:?} rejected", self.id, at.list);
            return Err(ListError::ForeignHandle);
        }

        let slot = at.slot;
        let live = matches!(self.values.get(slot.get()), Some(Some(_)))
            && self.node(slot).generation == at.generation;
        if !live {
            warn!("list {:?}: stale handle for slot {}", self.id, slot.get());
            return Err(ListError::StaleHandle);
        }
        Ok(slot)
    }

    /// Lease a slot from the allocator and store `value` in it.
    fn lease_slot(&mut self, value: T) -> ListResult<SlotIndex> {
        let allocation = self.memory.allocate(1)?;
        let slot = SlotIndex::from_offset(allocation.index);
        if allocation.grew || slot.get() >= self.nodes.len() {
            self.resize_backing();
        }

        let node = self.node_mut(slot);
        node.next = None;
        node.previous = None;
        self.values[slot.get()] = Some(value);
        Ok(slot)
    }

    /// Return `slot` to the allocator, taking its value out.
    fn release_slot(&mut self, slot: SlotIndex) -> Option<T> {
        let node = self.node_mut(slot);
        node.next = None;
        node.previous = None;
        node.generation = node.generation.wrapping_add(1);

        if let Err(_err) = self.memory.free(slot.offset(), 1) {
            error!(
                "list {:?}: failed to release slot {}: {}",
                self.id,
                slot.get(),
                _err
            );
        }
        self.values[slot.get()].take()
    }

    /// Unlink `slot` from the chain and release it.
    fn detach(&mut self, slot: SlotIndex) -> Option<NodeHandle<T>> {
        let NodeSlot { next, previous, .. } = *self.node(slot);
        let node_ref = self.node_ref(slot);

        match previous {
            Some(previous) => self.node_mut(previous).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).previous = previous,
            None => self.tail = previous,
        }
        self.len -= 1;

        let value = self.release_slot(slot)?;
        Some(NodeHandle::new(value, node_ref, next, previous))
    }

    fn resize_backing(&mut self) {
        let slots = self.memory.capacity() + 1;
        debug!(
            "list {:?}: resizing backing arrays from {} to {} slots",
            self.id,
            self.nodes.len(),
            slots
        );
        self.nodes.resize(slots, NodeSlot::default());
        self.values.resize_with(slots, || None);
    }

    fn node(&self, slot: SlotIndex) -> &NodeSlot {
        &self.nodes[slot.get()]
    }

    fn node_mut(&mut self, slot: SlotIndex) -> &mut NodeSlot {
        &mut self.nodes[slot.get()]
    }

    fn node_ref(&self, slot: SlotIndex) -> NodeRef {
        NodeRef {
            list: self.id,
            slot,
            generation: self.node(slot).generation,
        }
    }
}

impl<T: Clone> IndexedLinkedList<T> {
    pub fn head(&self) -> Option<NodeHandle<T>> {
        self.snapshot(self.head?)
    }

    pub fn tail(&self) -> Option<NodeHandle<T>> {
        self.snapshot(self.tail?)
    }

    /// Snapshot of the node following `at`, if any.
    pub fn next(&self, at: NodeRef) -> ListResult<Option<NodeHandle<T>>> {
        let slot = self.resolve(at)?;
        Ok(self.node(slot).next.and_then(|next| self.snapshot(next)))
    }

    /// Snapshot of the node preceding `at`, if any.
    pub fn previous(&self, at: NodeRef) -> ListResult<Option<NodeHandle<T>>> {
        let slot = self.resolve(at)?;
        Ok(self
            .node(slot)
            .previous
            .and_then(|previous| self.snapshot(previous)))
    }

    fn snapshot(&self, slot: SlotIndex) -> Option<NodeHandle<T>> {
        let value = self.values.get(slot.get())?.as_ref()?.clone();
        let node = self.node(slot);
        Some(NodeHandle::new(
            value,
            self.node_ref(slot),
            node.next,
            node.previous,
        ))
    }
}

impl<T> Default for IndexedLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for IndexedLinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a IndexedLinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the values of an [`IndexedLinkedList`], head to tail
pub struct Iter<'a, T> {
    list: &'a IndexedLinkedList<T>,
    front: Option<SlotIndex>,
    back: Option<SlotIndex>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.front?;
        self.front = self.list.node(slot).next;
        self.remaining -= 1;
        self.list.values[slot.get()].as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.back?;
        self.back = self.list.node(slot).previous;
        self.remaining -= 1;
        self.list.values[slot.get()].as_ref()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
