//! Merging with a queue holding the displaced elements of the shorter run

use std::{collections::VecDeque, ops::Range, ptr};

use super::{BlockMergingMethod, SplitSpan};
use crate::{error::BlockError, metrics::Metrics};

/// A [`BlockMergingMethod`] moving elements into their final position in a single pass.
///
/// Elements of the shorter run that are about to be overwritten are moved into a FIFO queue,
/// so the extra memory is bounded by the length of the shorter run. The runs need not be
/// adjacent, elements in between them are left untouched.
#[derive(Debug, Clone, Copy)]
pub struct AuxiliaryQueue;

impl BlockMergingMethod for AuxiliaryQueue {
    const IS_STABLE: bool = true;

    fn display() -> String {
        "auxiliary-queue".to_string()
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

/// Owns the displaced elements while a merge is in progress.
///
/// Every queued element belongs to exactly one vacant virtual position in `vacant`. If a
/// comparison panics, dropping the guard moves the queued elements back into these positions,
/// leaving the slice a permutation of its initial content.
struct DisplacedQueue<T> {
    base: *mut T,
    span: SplitSpan,
    queue: VecDeque<T>,
    vacant: [Range<usize>; 2],
}

impl<T> DisplacedQueue<T> {
    fn new(slice: &mut [T], span: SplitSpan, capacity: usize) -> Self {
        Self {
            base: slice.as_mut_ptr(),
            span,
            queue: VecDeque::with_capacity(capacity),
            vacant: [0..0, 0..0],
        }
    }

    /// Pointer to the element at the virtual `index`
    fn at(&self, index: usize) -> *mut T {
        // SAFETY: every virtual index maps into the slice `base` was taken from
        unsafe { self.base.add(self.span.position(index)) }
    }

    /// The least (or for merging from the right, greatest) pending element of the shorter
    /// run, which is the queue head or, with an empty queue, the element at `index`
    fn candidate(&self, index: usize) -> &T {
        match self.queue.front() {
            Some(front) => front,
            // SAFETY: with an empty queue there are no vacant positions, so `index` holds an
            // initialized element
            None => unsafe { &*self.at(index) },
        }
    }

    /// Move the element at the virtual `index` to the back of the queue, vacating `index`
    ///
    /// # Safety
    ///
    /// `index` must hold an initialized element and the caller has to mark it vacant before
    /// anything can panic.
    unsafe fn push(&mut self, index: usize) {
        debug_assert!(self.queue.len() < self.queue.capacity());

        // SAFETY: guaranteed by the caller
        let element = unsafe { ptr::read(self.at(index)) };
        self.queue.push_back(element);
    }

    /// Move the element at `from` into the vacant position `to`
    ///
    /// # Safety
    ///
    /// `from` must hold an initialized element and `to` must be vacant, afterwards `from` is
    /// vacant.
    unsafe fn transfer(&self, from: usize, to: usize) {
        // SAFETY: guaranteed by the caller, distinct virtual indices map to distinct positions
        unsafe { ptr::copy_nonoverlapping(self.at(from), self.at(to), 1) };
    }
}

impl<T> Drop for DisplacedQueue<T> {
    fn drop(&mut self) {
        let vacant = self.vacant.clone();

        for index in vacant.into_iter().flatten() {
            let Some(element) = self.queue.pop_front() else {
                break;
            };

            // SAFETY: `index` is vacant, see the type invariant
            unsafe { ptr::write(self.at(index), element) };
        }
    }
}

/// Merge from the left with the first run being the shorter one
fn merge_lower<T: Ord, M: Metrics>(slice: &mut [T], span: SplitSpan, metrics: &mut M) -> usize {
    let (first_len, len) = (span.first_len(), span.len());
    let mut result = span.position(len - 1) + 1;

    let mut guard = DisplacedQueue::new(slice, span, first_len);
    // Elements of the first run not yet moved are at `minority..first_len`, the second run
    // continues at `majority`. Vacant is everything in `dest..majority` outside of these.
    let (mut dest, mut minority, mut majority) = (0, 0, first_len);

    while majority < len && (minority < first_len || !guard.queue.is_empty()) {
        // SAFETY: `majority` was not consumed yet
        let majority_first = metrics.less(unsafe { &*guard.at(majority) }, guard.candidate(minority));
        let mut assignments = 0;

        if majority_first {
            if dest == minority && minority < first_len {
                // SAFETY: `dest` holds a not yet moved element of the first run, it is
                // refilled right away
                unsafe { guard.push(dest) };
                minority += 1;
                assignments += 1;
            }

            // SAFETY: `dest` was vacated above or already was vacant
            unsafe { guard.transfer(majority, dest) };
            assignments += 1;

            if majority == len - 1 {
                result = span.position(dest) + 1;
            }
            majority += 1;
        } else {
            match guard.queue.pop_front() {
                // Without displaced elements the next one of the first run is at `dest`
                None => minority += 1,
                Some(element) => {
                    if dest == minority && minority < first_len {
                        // SAFETY: as above, `dest` is refilled right away
                        unsafe { guard.push(dest) };
                        minority += 1;
                        assignments += 1;
                    }

                    // SAFETY: `dest` is vacant
                    unsafe { ptr::write(guard.at(dest), element) };
                    assignments += 1;
                }
            }
        }

        dest += 1;
        guard.vacant = [dest..minority, dest.max(first_len)..majority];
        metrics.add_assignments(assignments);
    }

    if majority == len {
        // The second run is exhausted, shift the untouched tail of the first run to the end
        // and fill the gap in front of it from the queue
        let shift = len - first_len;
        for index in (minority..first_len).rev() {
            // SAFETY: the target is vacant or was moved from in an earlier iteration
            unsafe { guard.transfer(index, index + shift) };
        }

        let mut assignments = (first_len - minority) as u64;
        let mut target = dest;
        while let Some(element) = guard.queue.pop_front() {
            // SAFETY: `dest..minority + shift` is vacant after the shift
            unsafe { ptr::write(guard.at(target), element) };
            target += 1;
            assignments += 1;
        }

        guard.vacant = [0..0, 0..0];
        metrics.add_assignments(assignments);
    }

    debug_assert!(guard.queue.is_empty());
    result
}

/// Merge from the right with the second run being the shorter one
fn merge_upper<T: Ord, M: Metrics>(slice: &mut [T], span: SplitSpan, metrics: &mut M) -> usize {
    let (first_len, len) = (span.first_len(), span.len());
    let mut result = None;

    let mut guard = DisplacedQueue::new(slice, span, len - first_len);
    // Exclusive cursors from the right: elements of the second run not yet moved are at
    // `first_len..minority`, the first run continues below `majority`. Vacant is everything in
    // `majority..dest` outside of these.
    let (mut dest, mut minority, mut majority) = (len, len, first_len);

    while majority > 0 && (minority > first_len || !guard.queue.is_empty()) {
        // SAFETY: `majority - 1` was not consumed yet
        let majority_last =
            metrics.less(guard.candidate(minority - 1), unsafe { &*guard.at(majority - 1) });
        let mut assignments = 0;

        if majority_last {
            if dest == minority && minority > first_len {
                // SAFETY: `dest - 1` holds a not yet moved element of the second run, it is
                // refilled right away
                unsafe { guard.push(dest - 1) };
                minority -= 1;
                assignments += 1;
            }

            // SAFETY: `dest - 1` was vacated above or already was vacant
            unsafe { guard.transfer(majority - 1, dest - 1) };
            assignments += 1;
            majority -= 1;
        } else {
            // The first placed element of the second run is its initial last one
            result.get_or_insert(span.position(dest - 1) + 1);

            match guard.queue.pop_front() {
                None => minority -= 1,
                Some(element) => {
                    if dest == minority && minority > first_len {
                        // SAFETY: as above, `dest - 1` is refilled right away
                        unsafe { guard.push(dest - 1) };
                        minority -= 1;
                        assignments += 1;
                    }

                    // SAFETY: `dest - 1` is vacant
                    unsafe { ptr::write(guard.at(dest - 1), element) };
                    assignments += 1;
                }
            }
        }

        dest -= 1;
        guard.vacant = [majority..dest.min(first_len), minority..dest];
        metrics.add_assignments(assignments);
    }

    if majority == 0 {
        // The first run is exhausted. The queue head is the greatest pending element, the
        // untouched head of the second run holds the least ones.
        if result.is_none() {
            let last = if guard.queue.is_empty() {
                minority - 1 - first_len
            } else {
                dest - 1
            };
            result = Some(span.position(last) + 1);
        }

        for index in first_len..minority {
            // SAFETY: the target is vacant or was moved from in an earlier iteration
            unsafe { guard.transfer(index, index - first_len) };
        }

        let mut assignments = (minority - first_len) as u64;
        let mut target = dest;
        while let Some(element) = guard.queue.pop_front() {
            target -= 1;
            // SAFETY: `minority - first_len..dest` is vacant after the shift
            unsafe { ptr::write(guard.at(target), element) };
            assignments += 1;
        }

        guard.vacant = [0..0, 0..0];
        metrics.add_assignments(assignments);
    }

    debug_assert!(guard.queue.is_empty());
    result.unwrap_or(span.position(len - 1) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::NoMetrics;

    #[test]
    fn shorter_first_run() {
        let mut values = [3, 8, 1, 2, 4, 9];

        assert_eq!(
            AuxiliaryQueue::merge(&mut values, 0..2, 2..6, &mut NoMetrics),
            Ok(6)
        );
        assert_eq!(values, [1, 2, 3, 4, 8, 9]);
    }

    #[test]
    fn shorter_second_run() {
        let mut values = [1, 4, 6, 7, 8, 2, 5];

        assert_eq!(
            AuxiliaryQueue::merge(&mut values, 0..5, 5..7, &mut NoMetrics),
            Ok(4)
        );
        assert_eq!(values, [1, 2, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn split_runs_keep_the_gap() {
        let mut values = [5, 6, 0, 0, 1, 7];

        assert_eq!(
            AuxiliaryQueue::merge(&mut values, 0..2, 4..6, &mut NoMetrics),
            Ok(6)
        );
        assert_eq!(values, [1, 5, 0, 0, 6, 7]);
    }

    #[test]
    fn drops_every_element_once() {
        let mut values: Vec<std::rc::Rc<u32>> = [2, 3, 7, 1, 4, 5, 6, 8]
            .into_iter()
            .map(std::rc::Rc::new)
            .collect();
        let witnesses = values.clone();

        AuxiliaryQueue::merge(&mut values, 0..3, 3..8, &mut NoMetrics).unwrap();
        AuxiliaryQueue::merge(&mut values, 0..6, 6..8, &mut NoMetrics).unwrap();
        assert!(values.is_sorted());

        drop(values);
        assert!(
            witnesses
                .iter()
                .all(|witness| std::rc::Rc::strong_count(witness) == 1)
        );
    }

    #[test]
    fn panicking_comparison_keeps_permutation() {
        crate::test::test_panic_safe_merging_method::<AuxiliaryQueue>();
    }
}
