//! Moving whole blocks, together with their descriptors

use std::ops::Range;

use super::{Block, is_contiguous, relayout};
use crate::{
    algorithms::primitives::{
        normalize_rotation, rotate_left_by, rotate_right, rotate_right_by, swap,
    },
    error::{BlockError, check_index, check_range},
    metrics::Metrics,
};

/// Checks that the spans of `blocks[range]` lie within a slice of length `len` and follow each
/// other without gaps
fn check_spans(blocks: &[Block], range: Range<usize>, len: usize) -> Result<(), BlockError> {
    let blocks = &blocks[range];
    let (Some(first), Some(last)) = (blocks.first(), blocks.last()) else {
        return Ok(());
    };
    check_range(&(first.start..last.end), len)?;

    match blocks.windows(2).find(|pair| pair[0].end != pair[1].start) {
        Some(pair) => Err(BlockError::NotAdjacent {
            first: pair[0].range(),
            second: pair[1].range(),
        }),
        None => Ok(()),
    }
}

/// Exchange the blocks at positions `first` and `second` of `blocks`, moving their elements.
///
/// If the widths differ, every block in between shifts by the difference and its descriptor is
/// updated accordingly.
pub fn swap_blocks<T, M: Metrics>(
    slice: &mut [T],
    blocks: &mut [Block],
    first: usize,
    second: usize,
    metrics: &mut M,
) -> Result<(), BlockError> {
    check_index(first, blocks.len())?;
    check_index(second, blocks.len())?;

    let (i, j) = (first.min(second), first.max(second));
    if i == j {
        return Ok(());
    }
    check_spans(blocks, i..j + 1, slice.len())?;

    let (left, right) = (blocks[i], blocks[j]);
    let (left_len, right_len) = (left.len(), right.len());

    // Swap the common head
    for offset in 0..left_len.min(right_len) {
        swap(slice, left.start + offset, right.start + offset, metrics)?;
    }

    // Move the tail of the wider block into place
    match left_len.cmp(&right_len) {
        std::cmp::Ordering::Equal => {}
        std::cmp::Ordering::Less => rotate_right_by(
            slice,
            left.start + left_len..right.end,
            right_len - left_len,
            metrics,
        ),
        std::cmp::Ordering::Greater => rotate_left_by(
            slice,
            left.start + right_len..right.end,
            left_len - right_len,
            metrics,
        ),
    }

    blocks.swap(i, j);
    relayout(&mut blocks[i..=j], left.start);

    debug_assert!(is_contiguous(&blocks[i..=j]));
    Ok(())
}

/// Rotate the blocks `blocks[range]` right by `count` positions, a negative `count` rotates
/// left.
///
/// The elements are rotated by the summed width of the blocks wrapping around, after which every
/// descriptor in `range` is reassigned to its new span.
pub fn rotate_blocks_right<T, M: Metrics>(
    slice: &mut [T],
    blocks: &mut [Block],
    range: Range<usize>,
    count: isize,
    metrics: &mut M,
) -> Result<(), BlockError> {
    check_range(&range, blocks.len())?;
    check_spans(blocks, range.clone(), slice.len())?;

    let shift = normalize_rotation(count, range.len());
    if shift == 0 {
        return Ok(());
    }

    let span = blocks[range.start].start..blocks[range.end - 1].end;
    let amount: usize = blocks[range.end - shift..range.end]
        .iter()
        .map(Block::len)
        .sum();

    let amount = isize::try_from(amount).map_err(|_| BlockError::InvalidRange {
        start: span.start,
        end: span.end,
        len: slice.len(),
    })?;

    rotate_right(slice, span.clone(), amount, metrics)?;
    blocks[range.clone()].rotate_right(shift);
    relayout(&mut blocks[range.clone()], span.start);

    debug_assert!(is_contiguous(&blocks[range]));
    Ok(())
}
