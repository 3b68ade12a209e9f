//! Element level primitives: swapping, rotation and the two insertion point searches.
//!
//! The crate internal functions assume valid indices and panic on out of bounds access like
//! slice indexing does. The public functions validate their arguments first and report
//! broken preconditions as [`BlockError`].

use std::ops::Range;

use crate::{
    error::{BlockError, check_index, check_range},
    metrics::Metrics,
};

/// Exchange `slice[i]` and `slice[j]`
pub(crate) fn swap_elements<T, M: Metrics>(slice: &mut [T], i: usize, j: usize, metrics: &mut M) {
    slice.swap(i, j);
    metrics.add_assignments(3);
}

/// Reverse `slice[range]` in place
fn reverse_span<T, M: Metrics>(slice: &mut [T], range: Range<usize>, metrics: &mut M) {
    let span = &mut slice[range];
    span.reverse();
    metrics.add_assignments(3 * (span.len() / 2) as u64);
}

/// Rotate `slice[range]` right by `amount` positions, `amount` is reduced modulo the span length
pub(crate) fn rotate_right_by<T, M: Metrics>(
    slice: &mut [T],
    range: Range<usize>,
    amount: usize,
    metrics: &mut M,
) {
    let len = range.len();
    if len < 2 {
        return;
    }

    let amount = amount % len;
    if amount == 0 {
        return;
    }

    // Classic three reversal rotation
    let split = range.start + amount;
    reverse_span(slice, range.clone(), metrics);
    reverse_span(slice, range.start..split, metrics);
    reverse_span(slice, split..range.end, metrics);
}

/// Rotate `slice[range]` left by `amount` positions, `amount` is reduced modulo the span length
pub(crate) fn rotate_left_by<T, M: Metrics>(
    slice: &mut [T],
    range: Range<usize>,
    amount: usize,
    metrics: &mut M,
) {
    let len = range.len();
    if len < 2 {
        return;
    }

    rotate_right_by(slice, range, len - amount % len, metrics);
}

/// Reduce a signed rotation `amount` to the equivalent right rotation in `0..len`
pub(crate) fn normalize_rotation(amount: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    // Widen to avoid overflow for lengths beyond `isize::MAX`
    (amount as i128).rem_euclid(len as i128) as usize
}

/// Returns the leftmost index in `range` whose element is not less than `value`, or
/// `range.end` if there is none
pub(crate) fn search_first<T: Ord, M: Metrics>(
    slice: &[T],
    range: Range<usize>,
    value: &T,
    metrics: &mut M,
) -> usize {
    let (mut low, mut high) = (range.start, range.end);

    while low < high {
        let middle = low + (high - low) / 2;
        if metrics.less(&slice[middle], value) {
            low = middle + 1;
        } else {
            high = middle;
        }
    }

    low
}

/// Returns the leftmost index in `range` whose element is greater than `value`, or
/// `range.end` if there is none. Inserting at this index places `value` after all of its equal
/// peers.
pub(crate) fn search_last<T: Ord, M: Metrics>(
    slice: &[T],
    range: Range<usize>,
    value: &T,
    metrics: &mut M,
) -> usize {
    let (mut low, mut high) = (range.start, range.end);

    while low < high {
        let middle = low + (high - low) / 2;
        if metrics.less(value, &slice[middle]) {
            high = middle;
        } else {
            low = middle + 1;
        }
    }

    low
}

/// Exchange the elements at `i` and `j`
pub fn swap<T, M: Metrics>(
    slice: &mut [T],
    i: usize,
    j: usize,
    metrics: &mut M,
) -> Result<(), BlockError> {
    check_index(i, slice.len())?;
    check_index(j, slice.len())?;

    if i != j {
        swap_elements(slice, i, j, metrics);
    }

    Ok(())
}

/// Rotate `slice[range]` right by `amount`, a negative `amount` rotates left
pub fn rotate_right<T, M: Metrics>(
    slice: &mut [T],
    range: Range<usize>,
    amount: isize,
    metrics: &mut M,
) -> Result<(), BlockError> {
    check_range(&range, slice.len())?;

    let amount = normalize_rotation(amount, range.len());
    rotate_right_by(slice, range, amount, metrics);

    Ok(())
}

/// Returns the leftmost index in the sorted `slice[range]` whose element is `>= value`, or
/// `range.end`
pub fn binary_search_first_element<T: Ord, M: Metrics>(
    slice: &[T],
    range: Range<usize>,
    value: &T,
    metrics: &mut M,
) -> Result<usize, BlockError> {
    check_range(&range, slice.len())?;

    Ok(search_first(slice, range, value, metrics))
}

/// Returns the leftmost index in the sorted `slice[range]` whose element is `> value`, or
/// `range.end`
pub fn binary_search_last_element<T: Ord, M: Metrics>(
    slice: &[T],
    range: Range<usize>,
    value: &T,
    metrics: &mut M,
) -> Result<usize, BlockError> {
    check_range(&range, slice.len())?;

    Ok(search_last(slice, range, value, metrics))
}

#[cfg(test)]
mod tests {
    use rand::Rng as _;

    use super::*;
    use crate::metrics::{NoMetrics, SortMetrics};

    #[test]
    fn rotation() {
        let mut values = [1, 2, 3, 4, 5];
        rotate_right(&mut values, 0..5, 2, &mut NoMetrics).unwrap();
        assert_eq!(values, [4, 5, 1, 2, 3]);

        rotate_right(&mut values, 0..5, -2, &mut NoMetrics).unwrap();
        assert_eq!(values, [1, 2, 3, 4, 5]);

        rotate_right(&mut values, 1..4, 7, &mut NoMetrics).unwrap();
        assert_eq!(values, [1, 4, 2, 3, 5]);
    }

    #[test]
    fn degenerate_rotation() {
        let mut metrics = SortMetrics::default();
        let mut values = [1, 2, 3];

        rotate_right(&mut values, 1..1, 5, &mut metrics).unwrap();
        rotate_right(&mut values, 2..3, 1, &mut metrics).unwrap();
        rotate_right(&mut values, 0..3, -3, &mut metrics).unwrap();

        assert_eq!(values, [1, 2, 3]);
        assert_eq!(metrics, SortMetrics::default());
    }

    #[test]
    fn rotation_inverse() {
        let mut rng = crate::test::test_rng();

        for _ in 0..crate::test::DEFAULT_RUNS {
            let original: Vec<u32> = (0..rng.random_range(0..40)).collect();
            let start = rng.random_range(0..=original.len());
            let end = rng.random_range(start..=original.len());
            let amount = rng.random_range(-100..100i64) as isize;

            let mut values = original.clone();
            rotate_right(&mut values, start..end, amount, &mut NoMetrics).unwrap();
            assert_eq!(values[..start], original[..start]);
            assert_eq!(values[end..], original[end..]);

            rotate_right(&mut values, start..end, -amount, &mut NoMetrics).unwrap();
            assert_eq!(values, original);
        }
    }

    #[test]
    fn rotation_matches_std() {
        let mut rng = crate::test::test_rng();

        for _ in 0..crate::test::DEFAULT_RUNS {
            let mut values: Vec<u32> = (0..rng.random_range(1..40)).collect();
            let mut expected = values.clone();
            let amount = rng.random_range(0..values.len());

            rotate_right(&mut values, 0..expected.len(), amount as isize, &mut NoMetrics).unwrap();
            expected.rotate_right(amount);
            assert_eq!(values, expected);
        }
    }

    #[test]
    fn rotation_rejects_invalid_ranges() {
        let mut values = [1, 2, 3];
        assert_eq!(
            rotate_right(&mut values, 1..4, 1, &mut NoMetrics),
            Err(BlockError::InvalidRange {
                start: 1,
                end: 4,
                len: 3
            })
        );
    }

    #[test]
    fn swapping() {
        let mut metrics = SortMetrics::default();
        let mut values = [1, 2, 3];

        swap(&mut values, 0, 2, &mut metrics).unwrap();
        assert_eq!(values, [3, 2, 1]);
        assert_eq!(metrics.assignments, 3);

        assert_eq!(
            swap(&mut values, 0, 3, &mut metrics),
            Err(BlockError::IndexOutOfBounds { index: 3, len: 3 })
        );
    }

    #[test]
    fn searches() {
        let values = [1, 2, 2, 2, 4, 6];
        let search = |value, range: Range<usize>| {
            (
                binary_search_first_element(&values, range.clone(), &value, &mut NoMetrics)
                    .unwrap(),
                binary_search_last_element(&values, range, &value, &mut NoMetrics).unwrap(),
            )
        };

        assert_eq!(search(2, 0..6), (1, 4));
        assert_eq!(search(0, 0..6), (0, 0));
        assert_eq!(search(7, 0..6), (6, 6));
        assert_eq!(search(6, 0..6), (5, 6));
        assert_eq!(search(3, 0..6), (4, 4));

        // Single element and empty ranges
        assert_eq!(search(2, 2..3), (2, 3));
        assert_eq!(search(5, 4..5), (5, 5));
        assert_eq!(search(5, 3..3), (3, 3));
    }

    #[test]
    fn searches_match_partition_point() {
        let mut rng = crate::test::test_rng();

        for _ in 0..crate::test::DEFAULT_RUNS {
            let mut values: Vec<u32> = (0..rng.random_range(0..50))
                .map(|_| rng.random_range(0..10))
                .collect();
            values.sort();
            let value = rng.random_range(0..12);

            assert_eq!(
                binary_search_first_element(&values, 0..values.len(), &value, &mut NoMetrics),
                Ok(values.partition_point(|element| *element < value))
            );
            assert_eq!(
                binary_search_last_element(&values, 0..values.len(), &value, &mut NoMetrics),
                Ok(values.partition_point(|element| *element <= value))
            );
        }
    }
}
