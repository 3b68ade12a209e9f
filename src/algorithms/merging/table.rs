//! Merging by swaps, tracking the displaced elements of the shorter run in a position table

use std::{collections::VecDeque, ops::Range};

use super::{BlockMergingMethod, SplitSpan};
use crate::{algorithms::primitives::swap_elements, error::BlockError, metrics::Metrics};

/// A [`BlockMergingMethod`] moving elements exclusively by swaps.
///
/// Instead of buffering elements, the table records the current position of every pending
/// element of the shorter run in merge order. Whenever a swap displaces one of them, its entry
/// is updated. The runs need not be adjacent.
#[derive(Debug, Clone, Copy)]
pub struct Table;

impl BlockMergingMethod for Table {
    const IS_STABLE: bool = true;

    fn display() -> String {
        "table".to_string()
    }

    fn merge<T: Ord, M: Metrics>(
        slice: &mut [T],
        block1: Range<usize>,
        block2: Range<usize>,
        metrics: &mut M,
    ) -> Result<usize, BlockError> {
        super::check_ordered(slice.len(), &block1, &block2)?;

        if block1.is_empty() || block2.is_empty() {
            return Ok(block2.end);
        }

        let span = SplitSpan::new(&block1, &block2);
        let result = if block1.len() <= block2.len() {
            merge_lower(slice, span, metrics)
        } else {
            merge_upper(slice, span, metrics)
        };

        Ok(result)
    }
}

/// Point the table entry currently at `from` to `to`
pub(crate) fn retarget(table: &mut VecDeque<usize>, from: usize, to: usize) {
    if let Some(entry) = table.iter_mut().find(|entry| **entry == from) {
        *entry = to;
    }
}

/// Merge from the left with the first run being the shorter one
fn merge_lower<T: Ord, M: Metrics>(slice: &mut [T], span: SplitSpan, metrics: &mut M) -> usize {
    let (first_len, len) = (span.first_len(), span.len());
    let mut result = span.position(len - 1) + 1;

    // Pending elements of the first run occupy exactly `dest..majority`
    let mut table: VecDeque<usize> = (0..first_len).collect();
    let (mut dest, mut majority) = (0, first_len);

    while majority < len {
        let Some(&next) = table.front() else {
            break;
        };

        if metrics.less(&slice[span.position(majority)], &slice[span.position(next)]) {
            swap_elements(slice, span.position(dest), span.position(majority), metrics);
            retarget(&mut table, dest, majority);

            if majority == len - 1 {
                result = span.position(dest) + 1;
            }
            majority += 1;
        } else {
            table.pop_front();
            if next != dest {
                swap_elements(slice, span.position(dest), span.position(next), metrics);
                retarget(&mut table, dest, next);
            }
        }

        dest += 1;
    }

    // The second run is exhausted, place the rest of the first run in table order
    while let Some(next) = table.pop_front() {
        if next != dest {
            swap_elements(slice, span.position(dest), span.position(next), metrics);
            retarget(&mut table, dest, next);
        }
        dest += 1;
    }

    result
}

/// Merge from the right with the second run being the shorter one
fn merge_upper<T: Ord, M: Metrics>(slice: &mut [T], span: SplitSpan, metrics: &mut M) -> usize {
    let (first_len, len) = (span.first_len(), span.len());
    let mut result = None;

    // Exclusive cursors, pending elements of the second run occupy exactly `majority..dest`
    let mut table: VecDeque<usize> = (first_len..len).rev().collect();
    let (mut dest, mut majority) = (len, first_len);

    while majority > 0 {
        let Some(&next) = table.front() else {
            break;
        };

        if metrics.less(&slice[span.position(next)], &slice[span.position(majority - 1)]) {
            swap_elements(
                slice,
                span.position(dest - 1),
                span.position(majority - 1),
                metrics,
            );
            retarget(&mut table, dest - 1, majority - 1);
            majority -= 1;
        } else {
            result.get_or_insert(span.position(dest - 1) + 1);

            table.pop_front();
            if next != dest - 1 {
                swap_elements(slice, span.position(dest - 1), span.position(next), metrics);
                retarget(&mut table, dest - 1, next);
            }
        }

        dest -= 1;
    }

    // The first run is exhausted
    while let Some(next) = table.pop_front() {
        result.get_or_insert(span.position(dest - 1) + 1);

        if next != dest - 1 {
            swap_elements(slice, span.position(dest - 1), span.position(next), metrics);
            retarget(&mut table, dest - 1, next);
        }
        dest -= 1;
    }

    result.unwrap_or(span.position(len - 1) + 1)
}
