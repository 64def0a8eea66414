//! Buddy block metadata
//!
//! Represents a block of the arena in the buddy system with order and
//! offset information, plus the order arithmetic shared by the allocator.

/// Smallest maximum order accepted by the options (blocks of 8 units).
pub const MIN_MAX_ORDER: usize = 3;

/// Smallest arena capacity, and the smallest block appended on growth.
pub const MIN_CAPACITY: usize = 1 << MIN_MAX_ORDER;

/// Largest maximum order accepted by the options.
pub const MAX_ORDER: usize = usize::BITS as usize - 2;

/// Largest initial arena capacity accepted by the options.
pub const MAX_CAPACITY: usize = 1 << MAX_ORDER;

/// Maximum order used when none is configured.
pub const DEFAULT_MAX_ORDER: usize = 10;

/// Arena capacity used when none is configured.
pub const DEFAULT_CAPACITY: usize = 1 << DEFAULT_MAX_ORDER;

/// Smallest order whose block size can hold `size` units.
///
/// Exact for powers of two. A `size` of zero is a caller error and maps to
/// order 0.
#[inline]
pub const fn order_of(size: usize) -> usize {
    if size <= 1 {
        0
    } else {
        (usize::BITS - (size - 1).leading_zeros()) as usize
    }
}

/// Order of the largest power of two not exceeding `size` (`size > 0`).
#[inline]
pub(crate) const fn floor_order(size: usize) -> usize {
    (usize::BITS - 1 - size.leading_zeros()) as usize
}

/// Number of arena units in a block of the given order.
#[inline]
pub const fn block_size(order: usize) -> usize {
    1 << order
}

/// Buddy block metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuddyBlock {
    pub order: usize,
    pub index: usize,
}

impl BuddyBlock {
    /// Create a new buddy block
    pub const fn new(order: usize, index: usize) -> Self {
        Self { order, index }
    }

    pub const fn size(&self) -> usize {
        block_size(self.order)
    }

    /// Offset of the other half of this block's parent.
    pub const fn buddy_index(&self) -> usize {
        self.index ^ block_size(self.order)
    }

    /// Whether this block is the lower half of a block one order up.
    pub const fn is_lower_half(&self) -> bool {
        self.index % block_size(self.order + 1) == 0
    }

    /// Halve the block in place, returning the upper half.
    pub fn split(&mut self) -> BuddyBlock {
        debug_assert!(self.order > 0, "cannot split an order-0 block");
        self.order -= 1;
        BuddyBlock::new(self.order, self.index + block_size(self.order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_of() {
        assert_eq!(order_of(0), 0);
        assert_eq!(order_of(1), 0);
        assert_eq!(order_of(2), 1);
        assert_eq!(order_of(3), 2);
        assert_eq!(order_of(4), 2);
        assert_eq!(order_of(5), 3);
        assert_eq!(order_of(1024), 10);
        assert_eq!(order_of(1025), 11);
    }

    #[test]
    fn test_floor_order() {
        assert_eq!(floor_order(1), 0);
        assert_eq!(floor_order(8), 3);
        assert_eq!(floor_order(3072), 11);
        assert_eq!(floor_order(4096), 12);
    }

    #[test]
    fn test_buddy_index() {
        assert_eq!(BuddyBlock::new(0, 0).buddy_index(), 1);
        assert_eq!(BuddyBlock::new(0, 1).buddy_index(), 0);
        assert_eq!(BuddyBlock::new(2, 8).buddy_index(), 12);
        assert_eq!(BuddyBlock::new(2, 12).buddy_index(), 8);
        assert!(BuddyBlock::new(2, 8).is_lower_half());
        assert!(!BuddyBlock::new(2, 12).is_lower_half());
    }

    #[test]
    fn test_split() {
        let mut block = BuddyBlock::new(3, 16);
        let upper = block.split();
        assert_eq!(block, BuddyBlock::new(2, 16));
        assert_eq!(upper, BuddyBlock::new(2, 20));
        assert_eq!(upper.size(), 4);
    }
}
