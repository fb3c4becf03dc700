//! Merge operations on ascending, duplicate-free slices.

use std::cmp::Ordering;

/// Return the elements of `a` which are not in `b`.
///
/// Both inputs must be sorted ascending with no duplicates, the output is
/// too. Runs in O(a + b).
pub fn difference<T: Ord + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    debug_assert!(is_sorted_set(a));
    debug_assert!(is_sorted_set(b));

    let mut result = Vec::with_capacity(a.len());
    let mut b = b.iter().peekable();

    for item in a {
        loop {
            match b.peek().map(|x| (*x).cmp(item)) {
                Some(Ordering::Less) => { b.next(); }
                Some(Ordering::Equal) => break,
                Some(Ordering::Greater) | None => {
                    result.push(item.clone());
                    break;
                }
            }
        }
    }

    result
}

/// Returns true if the slice is strictly ascending.
pub fn is_sorted_set<T: Ord>(items: &[T]) -> bool {
    items.windows(2).all(|w| w[0] < w[1])
}
