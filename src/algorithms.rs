//! The sorting algorithms and the in place merging machinery of the block sort

pub mod block_sort;
pub mod blocks;
pub mod insertionsort;
pub mod merging;
pub mod primitives;

use crate::metrics::Metrics;

/// A sorting algorithm
pub trait Sort {
    /// Whether the sort is stable
    const IS_STABLE: bool;

    /// String representation of this sort
    fn display() -> String;

    /// Sort `slice`, recording comparisons and assignments in `metrics`
    fn sort_counted<T: Ord, M: Metrics>(slice: &mut [T], metrics: &mut M);
}

/// The default `STABLE` parameter for [`StdSort`]
pub const DEFAULT_STABLE: bool = true;

/// The sorts of [`std`], only comparisons are counted
pub struct StdSort<const STABLE: bool = DEFAULT_STABLE>;

impl<const STABLE: bool> Sort for StdSort<STABLE> {
    const IS_STABLE: bool = STABLE;

    fn display() -> String {
        if STABLE { "std" } else { "std-unstable" }.to_string()
    }

    fn sort_counted<T: Ord, M: Metrics>(slice: &mut [T], metrics: &mut M) {
        let compare = |a: &T, b: &T| {
            metrics.add_compares(1);
            a.cmp(b)
        };

        if STABLE {
            slice.sort_by(compare);
        } else {
            slice.sort_unstable_by(compare);
        }
    }
}
