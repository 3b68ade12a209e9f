//! Errors raised when a primitive or strategy is called with arguments breaking its
//! preconditions

/// A violated precondition of a block primitive, merge or block sort
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    #[error("index {index} is out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("range {start}..{end} is not valid for length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },
    #[error("runs {first:?} and {second:?} are not adjacent")]
    NotAdjacent {
        first: std::ops::Range<usize>,
        second: std::ops::Range<usize>,
    },
    #[error("run {first:?} does not end before run {second:?} starts")]
    Overlapping {
        first: std::ops::Range<usize>,
        second: std::ops::Range<usize>,
    },
    #[error("block size must be positive")]
    ZeroBlockSize,
    #[error("midpoint {mid} lies outside of {start}..{end}")]
    MidpointOutOfRange { mid: usize, start: usize, end: usize },
    #[error("midpoint {mid} is not aligned to block size {block_size} from {start}")]
    MisalignedMidpoint {
        mid: usize,
        start: usize,
        block_size: usize,
    },
    #[error("block {index} is an A block following a B block")]
    UnorderedBlockKinds { index: usize },
    #[error("block {index} has length {len}, expected {expected}")]
    NonUniformBlocks {
        index: usize,
        len: usize,
        expected: usize,
    },
}

/// Check that `index` addresses an element of a sequence of length `len`
pub fn check_index(index: usize, len: usize) -> Result<(), BlockError> {
    if index < len {
        Ok(())
    } else {
        Err(BlockError::IndexOutOfBounds { index, len })
    }
}

/// Check that `range` is a (possibly empty) subrange of `0..len`
pub fn check_range(range: &std::ops::Range<usize>, len: usize) -> Result<(), BlockError> {
    if range.start <= range.end && range.end <= len {
        Ok(())
    } else {
        Err(BlockError::InvalidRange {
            start: range.start,
            end: range.end,
            len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges() {
        assert_eq!(check_range(&(0..0), 0), Ok(()));
        assert_eq!(check_range(&(2..5), 5), Ok(()));
        assert_eq!(
            check_range(&(2..6), 5),
            Err(BlockError::InvalidRange {
                start: 2,
                end: 6,
                len: 5
            })
        );
        let reversed = std::ops::Range { start: 3, end: 1 };
        assert!(check_range(&reversed, 5).is_err());
    }

    #[test]
    fn indices() {
        assert_eq!(check_index(0, 1), Ok(()));
        assert_eq!(
            check_index(1, 1),
            Err(BlockError::IndexOutOfBounds { index: 1, len: 1 })
        );
    }
}
