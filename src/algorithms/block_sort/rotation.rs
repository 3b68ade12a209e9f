//! Block sorting by rotating runs of A blocks to the right, past the B blocks they follow

use super::{BlockSortingMethod, b_before_a, partition_point, prepare};
use crate::{
    algorithms::blocks::{Block, movement::rotate_blocks_right},
    error::BlockError,
    metrics::Metrics,
};

/// Finds both ends of every rotated run by binary search over the keys
#[derive(Debug, Clone, Copy)]
pub struct Binary;

impl BlockSortingMethod for Binary {
    const REQUIRES_UNIFORM_BLOCKS: bool = false;

    fn display() -> String {
        "binary".to_string()
    }

    fn sort_blocks<T: Ord, M: Metrics>(
        slice: &mut [T],
        blocks: &mut [Block],
        metrics: &mut M,
    ) -> Result<(), BlockError> {
        let Some(a_count) = prepare(slice, blocks, metrics)? else {
            return Ok(());
        };

        let (mut mid, mut hi) = (a_count, blocks.len());
        while let Some(next) = binary_step(slice, blocks, mid, hi, metrics)? {
            (mid, hi) = next;
        }

        Ok(())
    }
}

/// Walks the blocks from the right, comparing one pair of keys at a time
#[derive(Debug, Clone, Copy)]
pub struct RightToLeft;

impl BlockSortingMethod for RightToLeft {
    const REQUIRES_UNIFORM_BLOCKS: bool = false;

    fn display() -> String {
        "right-to-left".to_string()
    }

    fn sort_blocks<T: Ord, M: Metrics>(
        slice: &mut [T],
        blocks: &mut [Block],
        metrics: &mut M,
    ) -> Result<(), BlockError> {
        let Some(a_count) = prepare(slice, blocks, metrics)? else {
            return Ok(());
        };

        let count = blocks.len();
        right_to_left(slice, blocks, a_count, count, metrics)
    }
}

/// Like [`Binary`] for the first rotation, like [`RightToLeft`] afterwards
#[derive(Debug, Clone, Copy)]
pub struct Hybrid;

impl BlockSortingMethod for Hybrid {
    const REQUIRES_UNIFORM_BLOCKS: bool = false;

    fn display() -> String {
        "hybrid".to_string()
    }

    fn sort_blocks<T: Ord, M: Metrics>(
        slice: &mut [T],
        blocks: &mut [Block],
        metrics: &mut M,
    ) -> Result<(), BlockError> {
        let Some(a_count) = prepare(slice, blocks, metrics)? else {
            return Ok(());
        };

        let count = blocks.len();
        match binary_step(slice, blocks, a_count, count, metrics)? {
            Some((mid, hi)) => right_to_left(slice, blocks, mid, hi, metrics),
            None => Ok(()),
        }
    }
}

/// Place the B blocks behind the last of the A blocks `0..mid`, considering only the B blocks
/// `mid..hi`.
///
/// Returns the remaining A and B boundaries, or `None` if every block is in place.
fn binary_step<T: Ord, M: Metrics>(
    slice: &mut [T],
    blocks: &mut [Block],
    mid: usize,
    hi: usize,
    metrics: &mut M,
) -> Result<Option<(usize, usize)>, BlockError> {
    if mid == 0 || mid == hi {
        return Ok(None);
    }

    // B blocks from `boundary` on stay behind every remaining A block
    let last_a = blocks[mid - 1];
    let boundary = partition_point(mid..hi, |index| {
        !b_before_a(slice, blocks[index], last_a, metrics)
    });
    if boundary == mid {
        return Ok(None);
    }

    // A blocks from `run_start` on, `last_a` included, belong behind `predecessor`
    let predecessor = blocks[boundary - 1];
    let run_start = partition_point(0..mid - 1, |index| {
        b_before_a(slice, predecessor, blocks[index], metrics)
    });

    let moved = mid - run_start;
    rotate_blocks_right(
        slice,
        blocks,
        run_start..boundary,
        -(moved as isize),
        metrics,
    )?;

    Ok(Some((run_start, boundary - moved)))
}

/// Sort the A blocks `0..mid` and the B blocks `mid..hi` from the right by linear scans
fn right_to_left<T: Ord, M: Metrics>(
    slice: &mut [T],
    blocks: &mut [Block],
    mut mid: usize,
    mut hi: usize,
    metrics: &mut M,
) -> Result<(), BlockError> {
    while 0 < mid && mid < hi {
        let last_b = blocks[hi - 1];

        if !b_before_a(slice, last_b, blocks[mid - 1], metrics) {
            hi -= 1;
            continue;
        }

        let mut run_start = mid - 1;
        while run_start > 0 && b_before_a(slice, last_b, blocks[run_start - 1], metrics) {
            run_start -= 1;
        }

        let moved = mid - run_start;
        rotate_blocks_right(slice, blocks, run_start..hi, -(moved as isize), metrics)?;
        hi -= moved;
        mid = run_start;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        algorithms::blocks::{A0Full, BlockLayout as _, Symmetric},
        metrics::NoMetrics,
    };

    fn sorted_with<S: BlockSortingMethod>(
        values: &[u32],
        mid: usize,
        block_size: usize,
    ) -> (Vec<u32>, Vec<Block>) {
        let mut values = values.to_vec();
        let mut blocks = A0Full::create(&values, 0..values.len(), mid, block_size).unwrap();

        S::sort_blocks(&mut values, &mut blocks, &mut NoMetrics).unwrap();
        (values, blocks)
    }

    #[test]
    fn scenario() {
        let values = [5, 3, 1, 4, 2];

        for (sorted, blocks) in [
            sorted_with::<Binary>(&values, 2, 2),
            sorted_with::<RightToLeft>(&values, 2, 2),
            sorted_with::<Hybrid>(&values, 2, 2),
            sorted_with::<super::super::Table>(&values, 2, 2),
        ] {
            assert_eq!(sorted, [1, 4, 2, 5, 3]);
            assert_eq!(blocks, [Block::b(0..2), Block::b(2..3), Block::a(3..5)]);
        }
    }

    #[test]
    fn interleaved_keys() {
        let values = [1, 3, 5, 7, 2, 4, 6, 8];

        for (sorted, blocks) in [
            sorted_with::<Binary>(&values, 4, 2),
            sorted_with::<RightToLeft>(&values, 4, 2),
            sorted_with::<Hybrid>(&values, 4, 2),
            sorted_with::<super::super::Table>(&values, 4, 2),
        ] {
            assert_eq!(sorted, [1, 3, 2, 4, 5, 7, 6, 8]);
            assert_eq!(
                blocks,
                [
                    Block::a(0..2),
                    Block::b(2..4),
                    Block::a(4..6),
                    Block::b(6..8)
                ]
            );
        }
    }

    #[test]
    fn equal_keys_keep_a_first() {
        let values = [2, 2, 3, 3, 1, 2];

        for (sorted, blocks) in [
            sorted_with::<Binary>(&values, 4, 2),
            sorted_with::<RightToLeft>(&values, 4, 2),
            sorted_with::<Hybrid>(&values, 4, 2),
            sorted_with::<super::super::Table>(&values, 4, 2),
        ] {
            assert_eq!(sorted, [2, 2, 1, 2, 3, 3]);
            assert_eq!(blocks, [Block::a(0..2), Block::b(2..4), Block::a(4..6)]);
        }
    }

    #[test]
    fn rejects_unordered_kinds() {
        let mut values = [1, 2, 3, 4];
        let mut blocks = [Block::b(0..2), Block::a(2..4)];

        assert_eq!(
            Hybrid::sort_blocks(&mut values, &mut blocks, &mut NoMetrics),
            Err(BlockError::UnorderedBlockKinds { index: 1 })
        );
    }

    #[test]
    fn partial_first_block() {
        let mut values = [6, 7, 8, 1, 2, 3, 9];
        let mut blocks = Symmetric::create(&values, 0..7, 3, 2).unwrap();

        RightToLeft::sort_blocks(&mut values, &mut blocks, &mut NoMetrics).unwrap();
        assert_eq!(values, [1, 2, 6, 7, 8, 3, 9]);
        assert_eq!(
            blocks,
            [
                Block::b(0..2),
                Block::a(2..3),
                Block::a(3..5),
                Block::b(5..7)
            ]
        );
    }

    #[test]
    fn random_blocks() {
        crate::test::test_block_sorting_method::<Binary>();
        crate::test::test_block_sorting_method::<RightToLeft>();
        crate::test::test_block_sorting_method::<Hybrid>();
    }
}
