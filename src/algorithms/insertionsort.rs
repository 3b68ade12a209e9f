//! Multiple insertion sort implementations, used as the leaf sort of the block sort

use super::primitives::{search_last, swap_elements};
use crate::metrics::Metrics;

/// The default `BINARY` parameter for `InsertionSort`
pub const DEFAULT_BINARY: bool = false;

/// The insertion [`super::Sort`]
pub struct InsertionSort<const BINARY: bool = DEFAULT_BINARY>;

impl<const BINARY: bool> super::Sort for InsertionSort<BINARY> {
    const IS_STABLE: bool = true;

    fn display() -> String {
        if BINARY {
            "binary-insertionsort"
        } else {
            "insertionsort"
        }
        .to_string()
    }

    fn sort_counted<T: Ord, M: Metrics>(slice: &mut [T], metrics: &mut M) {
        if slice.len() < 2 {
            return;
        }

        if BINARY {
            binary_insertion_sort_with_partition(slice, 1, metrics);
        } else {
            insertion_sort_with_partition(slice, 1, metrics);
        }
    }
}

/// Sort slice using insertion sort, assuming that `slice[0..partition]` is already in order
fn insertion_sort_with_partition<T: Ord, M: Metrics>(
    slice: &mut [T],
    partition_point: usize,
    metrics: &mut M,
) {
    assert!(
        (0..slice.len()).contains(&partition_point),
        "Partition point needs to be in bounds"
    );

    for i in partition_point..slice.len() {
        for j in (0..i).rev() {
            if metrics.less(&slice[j + 1], &slice[j]) {
                swap_elements(slice, j + 1, j, metrics);
            } else {
                break;
            }
        }
    }
}

/// Sort slice using binary insertion sort, assuming that `slice[0..partition]` is already in order
fn binary_insertion_sort_with_partition<T: Ord, M: Metrics>(
    slice: &mut [T],
    partition_point: usize,
    metrics: &mut M,
) {
    assert!(
        (0..slice.len()).contains(&partition_point),
        "Partition point needs to be in bounds"
    );

    for i in partition_point..slice.len() {
        // Behind all equal elements for stability
        let j = search_last(slice, 0..i, &slice[i], metrics);

        if j < i {
            slice[j..=i].rotate_right(1);
            metrics.add_assignments((i - j + 1) as u64);
        }
    }
}
