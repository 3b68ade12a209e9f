//! The block sort: ordering block descriptors by key and sweeping the blocks together with a
//! [`BlockMergingMethod`]

pub mod rotation;
pub mod table;

use std::{marker::PhantomData, ops::Range};

use super::{
    Sort,
    blocks::{Block, BlockKind, BlockLayout, movement::rotate_blocks_right},
    merging::BlockMergingMethod,
};
use crate::{
    error::{BlockError, check_range},
    metrics::Metrics,
};

pub use rotation::{Binary, Hybrid, RightToLeft};
pub use table::Table;

/// The default [`BlockSortingMethod`] to use
pub type DefaultBlockSortingMethod = Hybrid;

/// The default [`BlockMergingMethod`] to use
pub type DefaultMergingMethod = super::merging::RotationHybrid;

/// The default [`SweepMethod`] to use
pub type DefaultSweepMethod = RightToLeftSweep;

/// The default [`BlockLayout`] to use
pub type DefaultBlockLayout = super::blocks::A0Full;

/// The default insertion sort to use
pub type DefaultInsertionSort = super::insertionsort::InsertionSort;

/// The default `INSERTION_THRESHOLD` to use
pub const DEFAULT_INSERTION_THRESHOLD: usize = 16;

/// Specifies ways to order a descriptor sequence of A blocks followed by B blocks by key
pub trait BlockSortingMethod {
    /// Whether every block except the last one has to share the same length
    const REQUIRES_UNIFORM_BLOCKS: bool;

    /// String representation of this block sorting method
    fn display() -> String;

    /// Reorder `blocks` and the spans they describe into ascending key order.
    ///
    /// A B block is moved in front of an A block only if its key is strictly less, the A blocks
    /// keep their relative order and so do the B blocks.
    fn sort_blocks<T: Ord, M: Metrics>(
        slice: &mut [T],
        blocks: &mut [Block],
        metrics: &mut M,
    ) -> Result<(), BlockError>;
}

/// Specifies how the block sorted runs are merged into a single run
pub trait SweepMethod {
    /// String representation of this sweep method
    fn display() -> String;

    /// Merge the spans of the contiguous `blocks` into one sorted run
    fn sweep<G: BlockMergingMethod, T: Ord, M: Metrics>(
        slice: &mut [T],
        blocks: &[Block],
        metrics: &mut M,
    ) -> Result<(), BlockError>;
}

/// Merges every block into the already merged suffix, from the right
#[derive(Debug, Clone, Copy)]
pub struct RightToLeftSweep;

impl SweepMethod for RightToLeftSweep {
    fn display() -> String {
        "right-to-left".to_string()
    }

    fn sweep<G: BlockMergingMethod, T: Ord, M: Metrics>(
        slice: &mut [T],
        blocks: &[Block],
        metrics: &mut M,
    ) -> Result<(), BlockError> {
        let Some((last, rest)) = blocks.split_last() else {
            return Ok(());
        };

        for block in rest.iter().rev() {
            G::merge(slice, block.range(), block.end..last.end, metrics)?;
        }

        Ok(())
    }
}

/// Merges adjacent pairs of runs, doubling the run length with every pass
#[derive(Debug, Clone, Copy)]
pub struct PairwiseSweep;

impl SweepMethod for PairwiseSweep {
    fn display() -> String {
        "pairwise".to_string()
    }

    fn sweep<G: BlockMergingMethod, T: Ord, M: Metrics>(
        slice: &mut [T],
        blocks: &[Block],
        metrics: &mut M,
    ) -> Result<(), BlockError> {
        let mut runs: Vec<Range<usize>> = blocks.iter().map(Block::range).collect();

        while runs.len() > 1 {
            let mut merged = Vec::with_capacity(runs.len().div_ceil(2));

            for pair in runs.chunks(2) {
                match pair {
                    [left, right] => {
                        G::merge(slice, left.clone(), right.clone(), metrics)?;
                        merged.push(left.start..right.end);
                    }
                    // An odd run out is carried into the next pass unchanged
                    _ => merged.push(pair[0].clone()),
                }
            }

            runs = merged;
        }

        Ok(())
    }
}

/// Block sort `blocks` with `S`, then merge the blocks into one sorted run with `G`, sweeping
/// as specified by `W`
pub fn sort_and_merge_blocks<
    S: BlockSortingMethod,
    G: BlockMergingMethod,
    W: SweepMethod,
    T: Ord,
    M: Metrics,
>(
    slice: &mut [T],
    blocks: &mut [Block],
    metrics: &mut M,
) -> Result<(), BlockError> {
    S::sort_blocks(slice, blocks, metrics)?;

    log::trace!(
        "merging {count} blocks ({a_count} A) with {merge} using a {sweep} sweep",
        count = blocks.len(),
        a_count = blocks.iter().filter(|block| block.kind == BlockKind::A).count(),
        merge = G::display(),
        sweep = W::display(),
    );

    W::sweep::<G, T, M>(slice, blocks, metrics)
}

/// Counted comparison of the keys of `b` and `a`, whether `b` belongs in front of `a`
pub(crate) fn b_before_a<T: Ord, M: Metrics>(
    slice: &[T],
    b: Block,
    a: Block,
    metrics: &mut M,
) -> bool {
    metrics.less(b.key(slice), a.key(slice))
}

/// The leftmost index in `range` for which the monotone `predicate` holds, or `range.end`
pub(crate) fn partition_point(
    range: Range<usize>,
    mut predicate: impl FnMut(usize) -> bool,
) -> usize {
    let (mut low, mut high) = (range.start, range.end);

    while low < high {
        let middle = low + (high - low) / 2;
        if predicate(middle) {
            high = middle;
        } else {
            low = middle + 1;
        }
    }

    low
}

/// Validate that `blocks` are non-empty, contiguous spans of `slice` with all A blocks in front
/// of all B blocks, returning the number of A blocks
pub(crate) fn check_blocks(len: usize, blocks: &[Block]) -> Result<usize, BlockError> {
    let (Some(first), Some(last)) = (blocks.first(), blocks.last()) else {
        return Ok(0);
    };
    check_range(&(first.start..last.end), len)?;

    if let Some(block) = blocks.iter().find(|block| block.start >= block.end) {
        return Err(BlockError::InvalidRange {
            start: block.start,
            end: block.end,
            len,
        });
    }

    if let Some(pair) = blocks.windows(2).find(|pair| pair[0].end != pair[1].start) {
        return Err(BlockError::NotAdjacent {
            first: pair[0].range(),
            second: pair[1].range(),
        });
    }

    let a_count = blocks
        .iter()
        .position(|block| block.kind == BlockKind::B)
        .unwrap_or(blocks.len());

    match blocks[a_count..]
        .iter()
        .position(|block| block.kind == BlockKind::A)
    {
        Some(offset) => Err(BlockError::UnorderedBlockKinds {
            index: a_count + offset,
        }),
        None => Ok(a_count),
    }
}

/// Validate that every block but the last has the length of the first one, the last one being
/// at most as long
pub(crate) fn check_uniform(blocks: &[Block]) -> Result<(), BlockError> {
    let Some((last, rest)) = blocks.split_last() else {
        return Ok(());
    };
    let expected = blocks[0].len();

    let offending = rest
        .iter()
        .enumerate()
        .find(|(_, block)| block.len() != expected)
        .or(Some((rest.len(), last)).filter(|(_, block)| block.len() > expected));

    match offending {
        Some((index, block)) => Err(BlockError::NonUniformBlocks {
            index,
            len: block.len(),
            expected,
        }),
        None => Ok(()),
    }
}

/// The checks and shortcuts shared by every [`BlockSortingMethod`].
///
/// Returns the number of A blocks if there is work left, or `None` if the blocks already are in
/// order. If every B block belongs in front of every A block, this is done with one rotation.
pub(crate) fn prepare<T: Ord, M: Metrics>(
    slice: &mut [T],
    blocks: &mut [Block],
    metrics: &mut M,
) -> Result<Option<usize>, BlockError> {
    let a_count = check_blocks(slice.len(), blocks)?;
    let count = blocks.len();

    if a_count == 0 || a_count == count {
        return Ok(None);
    }

    // The least B key is not less than the greatest A key
    if !b_before_a(slice, blocks[a_count], blocks[a_count - 1], metrics) {
        return Ok(None);
    }

    // The greatest B key is less than the least A key
    if b_before_a(slice, blocks[count - 1], blocks[0], metrics) {
        rotate_blocks_right(slice, blocks, 0..count, -(a_count as isize), metrics)?;
        return Ok(None);
    }

    Ok(Some(a_count))
}

/// A top-down block merge sort [`Sort`].
///
/// Both halves are sorted recursively and then merged in place by cutting them into blocks of
/// `floor(sqrt(len))` elements, block sorting with `S` and merging the blocks with `G` as the
/// sweep `W` dictates. Runs of at most `INSERTION_THRESHOLD` elements are sorted with `I`.
pub struct BlockSort<
    S: BlockSortingMethod = DefaultBlockSortingMethod,
    G: BlockMergingMethod = DefaultMergingMethod,
    W: SweepMethod = DefaultSweepMethod,
    L: BlockLayout = DefaultBlockLayout,
    I: Sort = DefaultInsertionSort,
    const INSERTION_THRESHOLD: usize = DEFAULT_INSERTION_THRESHOLD,
>(
    PhantomData<S>,
    PhantomData<G>,
    PhantomData<W>,
    PhantomData<L>,
    PhantomData<I>,
);

impl<
    S: BlockSortingMethod,
    G: BlockMergingMethod,
    W: SweepMethod,
    L: BlockLayout,
    I: Sort,
    const INSERTION_THRESHOLD: usize,
> Sort for BlockSort<S, G, W, L, I, INSERTION_THRESHOLD>
{
    const IS_STABLE: bool = G::IS_STABLE && I::IS_STABLE;

    fn display() -> String {
        format!(
            "blocksort (block-sort: {}, merge: {}, sweep: {}, layout: {}, leaf: {}, threshold: {INSERTION_THRESHOLD})",
            S::display(),
            G::display(),
            W::display(),
            L::display(),
            I::display(),
        )
    }

    fn sort_counted<T: Ord, M: Metrics>(slice: &mut [T], metrics: &mut M) {
        if let Err(error) = Self::try_sort(slice, metrics) {
            panic!("{} failed: {error}", Self::display());
        }
    }
}

impl<
    S: BlockSortingMethod,
    G: BlockMergingMethod,
    W: SweepMethod,
    L: BlockLayout,
    I: Sort,
    const INSERTION_THRESHOLD: usize,
> BlockSort<S, G, W, L, I, INSERTION_THRESHOLD>
{
    /// Whether the strategy combination can sort, see [`BlockSortingMethod::REQUIRES_UNIFORM_BLOCKS`]
    pub const IS_VALID: bool = !S::REQUIRES_UNIFORM_BLOCKS || L::UNIFORM;

    /// Sort `slice`, failing if the strategies reject the blocks they are handed
    pub fn try_sort<T: Ord, M: Metrics>(slice: &mut [T], metrics: &mut M) -> Result<(), BlockError> {
        let len = slice.len();
        if len < 2 {
            return Ok(());
        }

        if len <= INSERTION_THRESHOLD {
            I::sort_counted(slice, metrics);
            return Ok(());
        }

        let block_size = len.isqrt();
        let mid = L::split_point(len, block_size);

        let (left, right) = slice.split_at_mut(mid);
        Self::try_sort(left, metrics)?;
        Self::try_sort(right, metrics)?;

        if !metrics.less(&slice[mid], &slice[mid - 1]) {
            return Ok(());
        }

        let mut blocks = L::create(slice, 0..len, mid, block_size)?;
        sort_and_merge_blocks::<S, G, W, T, M>(slice, &mut blocks, metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        algorithms::{
            blocks::{A0Full, Symmetric},
            merging::{AuxiliaryQueue, RotationBinary, RotationRightToLeft},
        },
        metrics::NoMetrics,
    };

    const RUNS: usize = 10;
    const TEST_SIZE: usize = 2_000;

    #[test]
    fn block_checks() {
        let scattered = [Block::a(0..2), Block::b(2..3), Block::a(3..5)];
        assert_eq!(
            check_blocks(5, &scattered),
            Err(BlockError::UnorderedBlockKinds { index: 2 })
        );

        let gap = [Block::a(0..2), Block::b(3..5)];
        assert_eq!(
            check_blocks(5, &gap),
            Err(BlockError::NotAdjacent {
                first: 0..2,
                second: 3..5
            })
        );

        let valid = [Block::a(0..2), Block::a(2..4), Block::b(4..5)];
        assert_eq!(check_blocks(5, &valid), Ok(2));
        assert!(check_blocks(4, &valid).is_err());
        assert_eq!(check_uniform(&valid), Ok(()));

        let partial_first = [Block::a(0..1), Block::a(1..3), Block::b(3..5)];
        assert_eq!(
            check_uniform(&partial_first),
            Err(BlockError::NonUniformBlocks {
                index: 1,
                len: 2,
                expected: 1
            })
        );

        let long_last = [Block::a(0..2), Block::b(2..5)];
        assert_eq!(
            check_uniform(&long_last),
            Err(BlockError::NonUniformBlocks {
                index: 1,
                len: 3,
                expected: 2
            })
        );
    }

    #[test]
    fn pairwise_carries_odd_run() {
        let mut values = [7, 8, 1, 9, 2, 3, 0];
        let blocks = [
            Block::a(0..2),
            Block::a(2..4),
            Block::b(4..6),
            Block::b(6..7),
        ];

        PairwiseSweep::sweep::<RotationBinary, _, _>(&mut values, &blocks, &mut NoMetrics)
            .unwrap();
        assert_eq!(values, [0, 1, 2, 3, 7, 8, 9]);

        let mut values = [4, 1, 2, 0, 3];
        let blocks = [Block::a(0..1), Block::a(1..3), Block::b(3..5)];
        RightToLeftSweep::sweep::<AuxiliaryQueue, _, _>(&mut values, &blocks, &mut NoMetrics)
            .unwrap();
        assert_eq!(values, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn sorts_scenario() {
        let mut values = [5, 3, 1, 4, 2];
        BlockSort::<Binary, RotationRightToLeft, PairwiseSweep, A0Full, DefaultInsertionSort, 1>::sort_counted(
            &mut values,
            &mut NoMetrics,
        );
        assert_eq!(values, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn validity() {
        assert!(BlockSort::<Table, RotationBinary, RightToLeftSweep, A0Full>::IS_VALID);
        assert!(!BlockSort::<Table, RotationBinary, RightToLeftSweep, Symmetric>::IS_VALID);
        assert!(BlockSort::<Hybrid, RotationBinary, RightToLeftSweep, Symmetric>::IS_VALID);

        let mut values: Vec<u32> = (0..100).rev().collect();
        assert!(matches!(
            BlockSort::<Table, RotationBinary, RightToLeftSweep, Symmetric>::try_sort(
                &mut values,
                &mut NoMetrics
            ),
            Err(BlockError::NonUniformBlocks { .. })
        ));
    }

    #[test]
    fn strategies_agree() {
        crate::test::test_block_sorting_methods_agree();
    }

    macro_rules! test_block_sort_variants {
        ($($name:ident: $sort:ty),* $(,)?) => {
            $(
                mod $name {
                    use super::*;

                    #[test]
                    fn empty() {
                        crate::test::test_empty::<$sort>();
                    }

                    #[test]
                    fn random() {
                        crate::test::test_random_sorted::<RUNS, TEST_SIZE, $sort>();
                    }

                    #[test]
                    fn random_stable() {
                        crate::test::test_random_stable_sorted::<RUNS, TEST_SIZE, $sort>();
                    }

                    #[test]
                    fn compositions() {
                        crate::test::test_compositions_sorted::<$sort>();
                    }

                    #[test]
                    fn inconsistent_order() {
                        crate::test::test_inconsistent_order::<$sort>();
                    }
                }
            )*
        };
    }

    test_block_sort_variants! {
        defaults: BlockSort,
        binary_rotation_binary: BlockSort<Binary, RotationBinary, RightToLeftSweep, A0Full>,
        binary_auxiliary_pairwise: BlockSort<Binary, AuxiliaryQueue, PairwiseSweep, Symmetric>,
        right_to_left_table: BlockSort<RightToLeft, crate::algorithms::merging::Table, RightToLeftSweep, Symmetric>,
        right_to_left_right_to_left: BlockSort<RightToLeft, RotationRightToLeft, PairwiseSweep, A0Full>,
        hybrid_auxiliary: BlockSort<Hybrid, AuxiliaryQueue, RightToLeftSweep, A0Full>,
        hybrid_binary_pairwise: BlockSort<Hybrid, RotationBinary, PairwiseSweep, Symmetric>,
        table_hybrid: BlockSort<Table, crate::algorithms::merging::RotationHybrid, RightToLeftSweep, A0Full>,
        table_table_pairwise: BlockSort<Table, crate::algorithms::merging::Table, PairwiseSweep, A0Full>,
        binary_insertion_leaves: BlockSort<
            Binary,
            RotationBinary,
            RightToLeftSweep,
            A0Full,
            crate::algorithms::insertionsort::InsertionSort<true>,
            4,
        >,
        no_leaves: BlockSort<Hybrid, AuxiliaryQueue, PairwiseSweep, Symmetric, DefaultInsertionSort, 0>,
    }
}
