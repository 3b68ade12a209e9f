//! contains structs implementing [`BlockMergingMethod`], which implement various strategies
//! for merging two sorted runs in place.

pub mod auxiliary;
pub mod rotation;
pub mod table;

use std::ops::Range;

use crate::{
    error::{BlockError, check_range},
    metrics::Metrics,
};

pub use auxiliary::AuxiliaryQueue;
pub use rotation::{RotationBinary, RotationHybrid, RotationRightToLeft};
pub use table::Table;

/// Specifies ways to merge two sorted runs without a buffer for the larger one
pub trait BlockMergingMethod {
    /// Whether the merging method is stable
    const IS_STABLE: bool;

    /// String representation of this merging method
    fn display() -> String;

    /// Merge the sorted runs `slice[block1]` and `slice[block2]` into one sorted run occupying
    /// the same positions, `block1` ending before `block2` starts.
    ///
    /// Returns the position one past where the element initially at `block2.end - 1` ends up,
    /// or `block2.end` if `block2` is empty.
    fn merge<T: Ord, M: Metrics>(
        slice: &mut [T],
        block1: Range<usize>,
        block2: Range<usize>,
        metrics: &mut M,
    ) -> Result<usize, BlockError>;
}

/// Check that `block1` and `block2` lie in a slice of length `len` and `block1` ends before
/// `block2` starts
pub(crate) fn check_ordered(
    len: usize,
    block1: &Range<usize>,
    block2: &Range<usize>,
) -> Result<(), BlockError> {
    check_range(block1, len)?;
    check_range(block2, len)?;

    if block1.end <= block2.start {
        Ok(())
    } else {
        Err(BlockError::Overlapping {
            first: block1.clone(),
            second: block2.clone(),
        })
    }
}

/// Like [`check_ordered`], but additionally requires `block2` to start where `block1` ends
pub(crate) fn check_adjacent(
    len: usize,
    block1: &Range<usize>,
    block2: &Range<usize>,
) -> Result<(), BlockError> {
    check_ordered(len, block1, block2)?;

    if block1.end == block2.start {
        Ok(())
    } else {
        Err(BlockError::NotAdjacent {
            first: block1.clone(),
            second: block2.clone(),
        })
    }
}

/// Two runs viewed as one contiguous sequence, the positions of the first run followed by
/// those of the second
#[derive(Debug, Clone, Copy)]
pub(crate) struct SplitSpan {
    first_start: usize,
    first_len: usize,
    second_start: usize,
    len: usize,
}

impl SplitSpan {
    pub(crate) fn new(block1: &Range<usize>, block2: &Range<usize>) -> Self {
        Self {
            first_start: block1.start,
            first_len: block1.len(),
            second_start: block2.start,
            len: block1.len() + block2.len(),
        }
    }

    /// Number of elements in the first run
    pub(crate) fn first_len(&self) -> usize {
        self.first_len
    }

    /// Total number of elements
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// The slice position of the virtual `index`
    pub(crate) fn position(&self, index: usize) -> usize {
        debug_assert!(index < self.len);

        if index < self.first_len {
            self.first_start + index
        } else {
            self.second_start + index - self.first_len
        }
    }
}
