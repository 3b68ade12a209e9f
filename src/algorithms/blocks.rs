//! Block descriptors and the layouts used to cut a pair of sorted runs into blocks

pub mod movement;

use std::ops::Range;

use crate::error::{BlockError, check_range};

/// Which of the two merged runs a block was cut from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Cut from the left run, keyed by its first element
    A,
    /// Cut from the right run, keyed by its last element
    B,
}

/// A sorted span `start..end` of the merged slice.
///
/// The key of an A block is its least element, the key of a B block its greatest. On equal
/// keys an A block is ordered before a B block, which keeps equal elements of the left run in
/// front of those of the right run. The key is addressed through the block position, so it
/// follows the block whenever its span is moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub start: usize,
    pub end: usize,
}

impl Block {
    /// An A block spanning `range`
    pub fn a(range: Range<usize>) -> Self {
        Self {
            kind: BlockKind::A,
            start: range.start,
            end: range.end,
        }
    }

    /// A B block spanning `range`
    pub fn b(range: Range<usize>) -> Self {
        Self {
            kind: BlockKind::B,
            start: range.start,
            end: range.end,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The position of the key element
    pub fn key_index(&self) -> usize {
        match self.kind {
            BlockKind::A => self.start,
            BlockKind::B => self.end - 1,
        }
    }

    /// The key element of this block within `slice`
    pub fn key<'a, T>(&self, slice: &'a [T]) -> &'a T {
        &slice[self.key_index()]
    }
}

/// Returns whether `blocks` are non-empty spans, each starting where the previous one ends
pub fn is_contiguous(blocks: &[Block]) -> bool {
    blocks.iter().all(|block| block.start < block.end)
        && blocks.windows(2).all(|pair| pair[0].end == pair[1].start)
}

/// Reassign the spans of `blocks` back to back from `start`, keeping their lengths
pub(crate) fn relayout(blocks: &mut [Block], mut start: usize) {
    for block in blocks {
        let len = block.len();
        block.start = start;
        block.end = start + len;
        start += len;
    }
}

/// A policy for cutting the runs `start..mid` and `mid..end` into blocks
pub trait BlockLayout {
    /// Whether all blocks except the last B block have the same size
    const UNIFORM: bool;

    /// String representation of this layout
    fn display() -> String;

    /// The split point a full sort of `len` elements should use
    fn split_point(len: usize, block_size: usize) -> usize;

    /// Cut `range` of `slice` into A blocks before `mid` and B blocks from `mid`
    fn create<T>(
        slice: &[T],
        range: Range<usize>,
        mid: usize,
        block_size: usize,
    ) -> Result<Vec<Block>, BlockError>;
}

/// Checks shared by every layout
fn check_layout<T>(
    slice: &[T],
    range: &Range<usize>,
    mid: usize,
    block_size: usize,
) -> Result<(), BlockError> {
    check_range(range, slice.len())?;

    if block_size == 0 {
        return Err(BlockError::ZeroBlockSize);
    }

    if !(range.start..=range.end).contains(&mid) {
        return Err(BlockError::MidpointOutOfRange {
            mid,
            start: range.start,
            end: range.end,
        });
    }

    Ok(())
}

/// Full sized B blocks from `mid`, the last one holding the remainder
fn push_b_blocks(blocks: &mut Vec<Block>, mid: usize, end: usize, block_size: usize) {
    blocks.extend(
        (mid..end)
            .step_by(block_size)
            .map(|start| Block::b(start..std::cmp::min(start + block_size, end))),
    );
}

/// Every A block is full sized, which requires `mid - start` to be a multiple of the block size
#[derive(Debug, Clone, Copy)]
pub struct A0Full;

impl BlockLayout for A0Full {
    const UNIFORM: bool = true;

    fn display() -> String {
        "a0-full".to_string()
    }

    fn split_point(len: usize, block_size: usize) -> usize {
        let block_size = std::cmp::max(block_size, 1);
        let blocks = std::cmp::max(len / 2 / block_size, 1);

        std::cmp::min(blocks * block_size, len)
    }

    fn create<T>(
        slice: &[T],
        range: Range<usize>,
        mid: usize,
        block_size: usize,
    ) -> Result<Vec<Block>, BlockError> {
        check_layout(slice, &range, mid, block_size)?;

        if (mid - range.start) % block_size != 0 {
            return Err(BlockError::MisalignedMidpoint {
                mid,
                start: range.start,
                block_size,
            });
        }

        let mut blocks = Vec::with_capacity(range.len().div_ceil(block_size));
        blocks.extend(
            (range.start..mid)
                .step_by(block_size)
                .map(|start| Block::a(start..start + block_size)),
        );
        push_b_blocks(&mut blocks, mid, range.end, block_size);

        Ok(blocks)
    }
}

/// The first A block holds the remainder of the left run, so any midpoint is accepted
#[derive(Debug, Clone, Copy)]
pub struct Symmetric;

impl BlockLayout for Symmetric {
    const UNIFORM: bool = false;

    fn display() -> String {
        "symmetric".to_string()
    }

    fn split_point(len: usize, _block_size: usize) -> usize {
        len / 2
    }

    fn create<T>(
        slice: &[T],
        range: Range<usize>,
        mid: usize,
        block_size: usize,
    ) -> Result<Vec<Block>, BlockError> {
        check_layout(slice, &range, mid, block_size)?;

        let mut blocks = Vec::with_capacity(range.len().div_ceil(block_size) + 1);

        if mid > range.start {
            let first_len = match (mid - range.start) % block_size {
                0 => block_size,
                remainder => remainder,
            };
            let first_end = range.start + first_len;

            blocks.push(Block::a(range.start..first_end));
            blocks.extend(
                (first_end..mid)
                    .step_by(block_size)
                    .map(|start| Block::a(start..start + block_size)),
            );
        }
        push_b_blocks(&mut blocks, mid, range.end, block_size);

        Ok(blocks)
    }
}
