//! Block sorting by swapping blocks, tracking the displaced blocks of the less frequent kind

use std::collections::VecDeque;

use super::{BlockSortingMethod, b_before_a, check_uniform, prepare};
use crate::{
    algorithms::{
        blocks::{Block, movement::swap_blocks},
        merging::table::retarget,
    },
    error::BlockError,
    metrics::Metrics,
};

/// Orders the blocks like [`crate::algorithms::merging::Table`] orders elements, with
/// [`swap_blocks`] as the swap and descriptor indices in the table
#[derive(Debug, Clone, Copy)]
pub struct Table;

impl BlockSortingMethod for Table {
    const REQUIRES_UNIFORM_BLOCKS: bool = true;

    fn display() -> String {
        "table".to_string()
    }

    fn sort_blocks<T: Ord, M: Metrics>(
        slice: &mut [T],
        blocks: &mut [Block],
        metrics: &mut M,
    ) -> Result<(), BlockError> {
        check_uniform(blocks)?;

        let Some(a_count) = prepare(slice, blocks, metrics)? else {
            return Ok(());
        };

        if a_count <= blocks.len() - a_count {
            sort_lower(slice, blocks, a_count, metrics)
        } else {
            sort_upper(slice, blocks, a_count, metrics)
        }
    }
}

/// Place the blocks from the left, the A blocks being the minority
fn sort_lower<T: Ord, M: Metrics>(
    slice: &mut [T],
    blocks: &mut [Block],
    a_count: usize,
    metrics: &mut M,
) -> Result<(), BlockError> {
    let count = blocks.len();

    // Pending A blocks occupy exactly `dest..majority`
    let mut table: VecDeque<usize> = (0..a_count).collect();
    let (mut dest, mut majority) = (0, a_count);

    while majority < count {
        let Some(&next) = table.front() else {
            break;
        };

        if b_before_a(slice, blocks[majority], blocks[next], metrics) {
            swap_blocks(slice, blocks, dest, majority, metrics)?;
            retarget(&mut table, dest, majority);
            majority += 1;
        } else {
            table.pop_front();
            if next != dest {
                swap_blocks(slice, blocks, dest, next, metrics)?;
                retarget(&mut table, dest, next);
            }
        }

        dest += 1;
    }

    while let Some(next) = table.pop_front() {
        if next != dest {
            swap_blocks(slice, blocks, dest, next, metrics)?;
            retarget(&mut table, dest, next);
        }
        dest += 1;
    }

    Ok(())
}

/// Place the blocks from the right, the B blocks being the minority
fn sort_upper<T: Ord, M: Metrics>(
    slice: &mut [T],
    blocks: &mut [Block],
    a_count: usize,
    metrics: &mut M,
) -> Result<(), BlockError> {
    // Exclusive cursors, pending B blocks occupy exactly `majority..dest`
    let mut table: VecDeque<usize> = (a_count..blocks.len()).rev().collect();
    let (mut dest, mut majority) = (blocks.len(), a_count);

    while majority > 0 {
        let Some(&next) = table.front() else {
            break;
        };

        if b_before_a(slice, blocks[next], blocks[majority - 1], metrics) {
            swap_blocks(slice, blocks, dest - 1, majority - 1, metrics)?;
            retarget(&mut table, dest - 1, majority - 1);
            majority -= 1;
        } else {
            table.pop_front();
            if next != dest - 1 {
                swap_blocks(slice, blocks, dest - 1, next, metrics)?;
                retarget(&mut table, dest - 1, next);
            }
        }

        dest -= 1;
    }

    while let Some(next) = table.pop_front() {
        if next != dest - 1 {
            swap_blocks(slice, blocks, dest - 1, next, metrics)?;
            retarget(&mut table, dest - 1, next);
        }
        dest -= 1;
    }

    Ok(())
}
