//! Merging by repeated rotation, without any extra memory.
//!
//! The three strategies differ only in how the next rotation boundary is found.

use std::ops::Range;

use super::BlockMergingMethod;
use crate::{
    algorithms::primitives::{
        binary_search_first_element, binary_search_last_element, rotate_left_by, rotate_right_by,
        search_last,
    },
    error::BlockError,
    metrics::Metrics,
};

/// Merges left to right, finding both ends of each rotation by binary search
#[derive(Debug, Clone, Copy)]
pub struct RotationBinary;

impl BlockMergingMethod for RotationBinary {
    const IS_STABLE: bool = true;

    fn display() -> String {
        "rotation-binary".to_string()
    }

    fn merge<T: Ord, M: Metrics>(
        slice: &mut [T],
        block1: Range<usize>,
        block2: Range<usize>,
        metrics: &mut M,
    ) -> Result<usize, BlockError> {
        super::check_adjacent(slice.len(), &block1, &block2)?;

        let (mut start, mut mid, end) = (block1.start, block2.start, block2.end);
        let mut result = end;

        while start < mid && mid < end {
            // First left element belonging after the head of the right run
            let span_start = binary_search_last_element(slice, start..mid, &slice[mid], metrics)?;
            if span_start == mid {
                break;
            }

            // Right elements belonging before `slice[span_start]`, the head is one of them
            let span_end =
                binary_search_first_element(slice, mid + 1..end, &slice[span_start], metrics)?;
            let moved = span_end - mid;

            rotate_right_by(slice, span_start..span_end, moved, metrics);
            if span_end == end {
                result = span_start + moved;
            }

            start = span_start + moved;
            mid = span_end;
        }

        Ok(result)
    }
}

/// Merges right to left, finding rotation boundaries by linear scans
#[derive(Debug, Clone, Copy)]
pub struct RotationRightToLeft;

impl BlockMergingMethod for RotationRightToLeft {
    const IS_STABLE: bool = true;

    fn display() -> String {
        "rotation-right-to-left".to_string()
    }

    fn merge<T: Ord, M: Metrics>(
        slice: &mut [T],
        block1: Range<usize>,
        block2: Range<usize>,
        metrics: &mut M,
    ) -> Result<usize, BlockError> {
        super::check_adjacent(slice.len(), &block1, &block2)?;

        Ok(merge_right_to_left(
            slice,
            block1.start,
            block2.start,
            block2.end,
            metrics,
        ))
    }
}

/// Finds the first rotation boundary by binary search and all following boundaries like
/// [`RotationRightToLeft`]
#[derive(Debug, Clone, Copy)]
pub struct RotationHybrid;

impl BlockMergingMethod for RotationHybrid {
    const IS_STABLE: bool = true;

    fn display() -> String {
        "rotation-hybrid".to_string()
    }

    fn merge<T: Ord, M: Metrics>(
        slice: &mut [T],
        block1: Range<usize>,
        block2: Range<usize>,
        metrics: &mut M,
    ) -> Result<usize, BlockError> {
        super::check_adjacent(slice.len(), &block1, &block2)?;

        let (start, mut mid, mut end) = (block1.start, block2.start, block2.end);

        if start < mid && mid < end && metrics.less(&slice[end - 1], &slice[mid - 1]) {
            // Left suffix greater than the last right element, `slice[mid - 1]` is part of it
            let span_start = search_last(slice, start..mid - 1, &slice[end - 1], metrics);
            let moved = mid - span_start;

            rotate_left_by(slice, span_start..end, moved, metrics);
            end -= moved;
            mid = span_start;
        }

        Ok(merge_right_to_left(slice, start, mid, end, metrics))
    }
}

/// Merge `start..mid` and `mid..end` from the right.
///
/// Either the last right element is not less than the last left element and is already in
/// place, or the left suffix greater than it is rotated past the remainder of the right run.
fn merge_right_to_left<T: Ord, M: Metrics>(
    slice: &mut [T],
    start: usize,
    mut mid: usize,
    mut end: usize,
    metrics: &mut M,
) -> usize {
    // Until it is placed, the initial last right element stays at `end - 1`
    let mut result = None;

    while start < mid && mid < end {
        if !metrics.less(&slice[end - 1], &slice[mid - 1]) {
            result.get_or_insert(end);
            end -= 1;
            continue;
        }

        let mut span_start = mid - 1;
        while span_start > start && metrics.less(&slice[end - 1], &slice[span_start - 1]) {
            span_start -= 1;
        }

        let moved = mid - span_start;
        rotate_left_by(slice, span_start..end, moved, metrics);
        end -= moved;
        mid = span_start;
    }

    result.unwrap_or(end)
}
