//! Search and insertion over ascending integer sequences
//!
//! These helpers keep the buddy free lists ordered. Every function assumes
//! its input slice is sorted in ascending order; results are unspecified
//! otherwise.

use alloc::vec::Vec;
use core::cmp::Ordering;

/// Sequences shorter than this are searched with a plain binary search.
pub const GALLOP_THRESHOLD: usize = 64;

/// Integer types the sorted-sequence algorithms operate on.
pub trait Sortable: Copy + Ord {}

macro_rules! impl_sortable {
    ($($ty:ty),* $(,)?) => {
        $(impl Sortable for $ty {})*
    };
}

impl_sortable!(u8, i8, u16, i16, u32, i32, u64, i64, u128, i128, usize, isize);

/// Binary search for `target`.
///
/// Returns `(index, true)` with the index of the first occurrence when the
/// target is present, or `(index, false)` with the position where it would
/// be inserted to keep the sequence sorted.
pub fn exact_search<T: Sortable>(seq: &[T], target: T) -> (usize, bool) {
    exact_search_by(seq, |probe| probe.cmp(&target))
}

/// Binary search driven by a comparator.
///
/// `compare` orders a probed element relative to the target: `Less` when
/// the element is below it.
pub fn exact_search_by<T, F>(seq: &[T], mut compare: F) -> (usize, bool)
where
    F: FnMut(&T) -> Ordering,
{
    let mut low = 0;
    let mut high = seq.len();
    while low < high {
        let mid = low + (high - low) / 2;
        if compare(&seq[mid]) == Ordering::Less {
            low = mid + 1;
        } else {
            high = mid;
        }
    }

    let found = low < seq.len() && compare(&seq[low]) == Ordering::Equal;
    (low, found)
}

/// Galloping (exponential) search for `target`.
///
/// Gives the same answer as [`exact_search`], but brackets the target with
/// doubling spans first, which is cheaper when the target sits near the
/// front of a long sequence.
pub fn galloping_search<T: Sortable>(seq: &[T], target: T) -> (usize, bool) {
    galloping_search_by(seq, |probe| probe.cmp(&target))
}

/// Galloping search driven by a comparator, see [`exact_search_by`].
pub fn galloping_search_by<T, F>(seq: &[T], mut compare: F) -> (usize, bool)
where
    F: FnMut(&T) -> Ordering,
{
    if seq.len() < GALLOP_THRESHOLD {
        return exact_search_by(seq, compare);
    }

    let mut lower: usize = 0;
    let mut span = GALLOP_THRESHOLD;
    loop {
        let probe = match lower.checked_add(span) {
            Some(probe) if probe < seq.len() => probe,
            _ => {
                let (index, found) = exact_search_by(&seq[lower..], &mut compare);
                return (lower + index, found);
            }
        };

        if compare(&seq[probe]) == Ordering::Less {
            // Everything up to and including `probe` is below the target.
            lower = probe;
            span = span.saturating_mul(2);
            continue;
        }

        let (index, found) = exact_search_by(&seq[lower..=probe], &mut compare);
        return (lower + index, found);
    }
}

/// Insert `value` keeping `seq` sorted.
///
/// When `allow_duplicates` is false and the value is already present the
/// sequence is left untouched. Returns whether the value was inserted.
pub fn ordered_insert<T: Sortable>(seq: &mut Vec<T>, value: T, allow_duplicates: bool) -> bool {
    let (index, found) = galloping_search(seq.as_slice(), value);
    if found && !allow_duplicates {
        return false;
    }

    seq.insert(index, value);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::cell::Cell;

    #[test]
    fn test_exact_search_table() {
        let seq = [1u32, 3, 5, 7, 9];
        assert_eq!(exact_search(&seq, 5), (2, true));
        assert_eq!(exact_search(&seq, 0), (0, false));
        assert_eq!(exact_search(&seq, 10), (5, false));
        assert_eq!(exact_search(&seq, 4), (2, false));
        assert_eq!(exact_search::<u32>(&[], 4), (0, false));
    }

    #[test]
    fn test_exact_search_returns_first_duplicate() {
        let seq = [1i64, 2, 2, 2, 2, 3];
        assert_eq!(exact_search(&seq, 2), (1, true));

        let all_same = [4u8; 9];
        assert_eq!(exact_search(&all_same, 4), (0, true));
    }

    #[test]
    fn test_galloping_matches_exact() {
        let seq: Vec<usize> = (0..1000).map(|i| i * 3).collect();
        for target in 0..3005 {
            assert_eq!(
                galloping_search(&seq, target),
                exact_search(&seq, target),
                "target {}",
                target
            );
        }
    }

    #[test]
    fn test_galloping_duplicates_across_span_boundary() {
        let mut seq = vec![0u32; 50];
        seq.extend(core::iter::repeat(7).take(200));
        seq.extend(core::iter::repeat(9).take(10));
        assert_eq!(galloping_search(&seq, 7), (50, true));
        assert_eq!(galloping_search(&seq, 9), (250, true));
        assert_eq!(galloping_search(&seq, 8), (250, false));
        assert_eq!(galloping_search(&seq, 10), (260, false));
    }

    #[test]
    fn test_galloping_short_sequence_same_comparisons() {
        let seq: Vec<u16> = (0..63).map(|i| i * 2).collect();
        for target in 0..130u16 {
            let exact_count = Cell::new(0);
            let gallop_count = Cell::new(0);
            let exact = exact_search_by(&seq, |probe| {
                exact_count.set(exact_count.get() + 1);
                probe.cmp(&target)
            });
            let gallop = galloping_search_by(&seq, |probe| {
                gallop_count.set(gallop_count.get() + 1);
                probe.cmp(&target)
            });
            assert_eq!(exact, gallop);
            assert_eq!(exact_count.get(), gallop_count.get());
        }
    }

    #[test]
    fn test_galloping_is_cheap_near_front() {
        let seq: Vec<u32> = (0..1 << 16).collect();
        let count = Cell::new(0);
        let result = galloping_search_by(&seq, |probe| {
            count.set(count.get() + 1);
            probe.cmp(&10)
        });
        assert_eq!(result, (10, true));
        // One probe at the first span edge plus a search over 65 elements.
        assert!(count.get() <= 9, "took {} comparisons", count.get());
    }

    #[test]
    fn test_ordered_insert() {
        let mut seq = vec![2u64, 4, 6];
        assert!(ordered_insert(&mut seq, 5, false));
        assert_eq!(seq, vec![2, 4, 5, 6]);

        assert!(!ordered_insert(&mut seq, 4, false));
        assert_eq!(seq.len(), 4);

        assert!(ordered_insert(&mut seq, 4, true));
        assert_eq!(seq, vec![2, 4, 4, 5, 6]);

        assert!(ordered_insert(&mut seq, 0, false));
        assert!(ordered_insert(&mut seq, 100, false));
        assert_eq!(seq, vec![0, 2, 4, 4, 5, 6, 100]);
    }

    #[test]
    fn test_ordered_insert_long_sequence() {
        let mut seq: Vec<i32> = (0..200).map(|i| i * 2).collect();
        assert!(ordered_insert(&mut seq, 151, false));
        assert_eq!(seq.len(), 201);
        assert!(seq.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(exact_search(&seq, 151), (76, true));
    }
}
