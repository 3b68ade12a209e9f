//! Comparison and assignment counting, threaded through every primitive

/// A sink for the operation counts of a sort
pub trait Metrics {
    /// Record `count` element comparisons
    fn add_compares(&mut self, count: u64);

    /// Record `count` element assignments
    fn add_assignments(&mut self, count: u64);

    /// Counted `a < b`
    fn less<T: Ord>(&mut self, a: &T, b: &T) -> bool {
        self.add_compares(1);
        a < b
    }
}

/// Accumulates comparison and assignment counts
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SortMetrics {
    pub compares: u64,
    pub assignments: u64,
}

impl Metrics for SortMetrics {
    fn add_compares(&mut self, count: u64) {
        self.compares += count;
    }

    fn add_assignments(&mut self, count: u64) {
        self.assignments += count;
    }
}

impl std::ops::AddAssign for SortMetrics {
    fn add_assign(&mut self, other: Self) {
        self.compares += other.compares;
        self.assignments += other.assignments;
    }
}

impl std::fmt::Display for SortMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "compares: {}, assignments: {}",
            self.compares, self.assignments
        )
    }
}

/// Counts nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMetrics;

impl Metrics for NoMetrics {
    fn add_compares(&mut self, _count: u64) {}

    fn add_assignments(&mut self, _count: u64) {}
}

/// Gives the experiment runner a uniform view on both sinks
pub trait Report: Metrics + Default {
    /// The counts so far, if any are collected
    fn report(&self) -> Option<SortMetrics>;
}

impl Report for SortMetrics {
    fn report(&self) -> Option<SortMetrics> {
        Some(*self)
    }
}

impl Report for NoMetrics {
    fn report(&self) -> Option<SortMetrics> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_comparisons() {
        let mut metrics = SortMetrics::default();
        assert!(metrics.less(&1, &2));
        assert!(!metrics.less(&2, &2));
        metrics.add_assignments(3);

        assert_eq!(
            metrics,
            SortMetrics {
                compares: 2,
                assignments: 3
            }
        );
    }

    #[test]
    fn null_sink_keeps_results() {
        let mut metrics = NoMetrics;
        assert!(metrics.less(&1, &2));
        assert!(!metrics.less(&3, &2));
        assert_eq!(metrics.report(), None);
    }
}
