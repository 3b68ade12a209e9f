//! Command line input handling

use crate::{
    algorithms::{
        Sort,
        block_sort::{DefaultMergingMethod, DefaultSweepMethod},
    },
    metrics::Metrics,
};

/// Command line arguments
#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct Args {
    /// The sorting algorithm to run
    #[arg()]
    pub algorithm: Algorithm,
    /// The data distribution to sort
    #[arg()]
    pub data: DataType,
    /// The element type of the sorted slices
    #[arg(long, default_value_t = Element::U64)]
    pub element: Element,
    /// The block merging method of the block sort
    #[arg(long, default_value_t = MergingMethod::RotationHybrid)]
    pub merge: MergingMethod,
    /// The block sorting method of the block sort
    #[arg(long, default_value_t = BlockSortingMethod::Hybrid)]
    pub block_sort: BlockSortingMethod,
    /// The order in which the block sort merges its blocks
    #[arg(long, default_value_t = Sweep::RightToLeft)]
    pub sweep: Sweep,
    /// The block layout of the block sort
    #[arg(long, default_value_t = Layout::A0Full)]
    pub layout: Layout,
    /// Use the unstable std sort
    #[arg(long)]
    pub unstable: bool,
    /// Use binary insertion sort, also for the leaves of the block sort
    #[arg(long)]
    pub binary: bool,
    /// The number of runs to do
    #[arg(short, long, default_value_t = 1_000)]
    pub runs: usize,
    /// The size of the slices to sort
    #[arg(short, long, default_value_t = 1_000_000)]
    pub size: usize,
    /// Seed for the rng
    #[arg(long)]
    pub seed: Option<u64>,
    /// The output file to write the samples to
    pub output: Option<std::path::PathBuf>,
}

/// Writes the name clap knows a value by
macro_rules! display_value_enum {
    ($($name:ty),* $(,)?) => {
        $(
            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    match clap::ValueEnum::to_possible_value(self) {
                        Some(value) => f.write_str(value.get_name()),
                        None => Ok(()),
                    }
                }
            }
        )*
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Algorithm {
    /// The default sort in [`std`]
    Std,
    /// Insertionsort
    Insertionsort,
    /// Top-down block merge sort
    Blocksort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DataType {
    /// A random permutation
    Permutation,
    /// Uniformly distributed values
    Uniform,
    /// One repeated value
    Identical,
    /// A handful of distinct values
    FewDistinct,
    /// One value with about 2% outliers
    FewDifferent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Element {
    U32,
    U64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MergingMethod {
    RotationBinary,
    RotationRightToLeft,
    RotationHybrid,
    AuxiliaryQueue,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BlockSortingMethod {
    Binary,
    RightToLeft,
    Hybrid,
    /// Needs uniform blocks, so only the `a0-full` layout
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Sweep {
    RightToLeft,
    Pairwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Layout {
    #[value(name = "a0-full")]
    A0Full,
    Symmetric,
}

display_value_enum!(
    Algorithm,
    DataType,
    Element,
    MergingMethod,
    BlockSortingMethod,
    Sweep,
    Layout,
);

/// Dynamically "match" on a type
#[macro_export]
macro_rules! with_match_type {
    (
        type $t:ident = match ($value:expr) {
            $(
                $pattern:pat => $t_value:ty
            ),*
            $(,)?
        }

        $code:block
    ) => {
        match $value {
            $(
                $pattern => {
                    type $t = $t_value;

                    $code
                }
            ),*
        }
    };
}

/// Dynamically "match" on a const generic value
macro_rules! with_match_const {
    (
        const $t:ident: $t_type:ty = match ($value:expr) {
            $(
                $pattern:pat => $t_value:expr
            ),*
            $(,)?
        }

        $code:block
    ) => {
        match $value {
            $(
                $pattern => {
                    const $t: $t_type = $t_value;

                    $code
                }
            ),*
        }
    };
}

/// Dynamically "match" on the element type and data distribution of the arguments
#[macro_export]
macro_rules! with_data_type {
    ($args:expr; $t:ident, $d:ident => $code:block) => {{
        use $crate::cli::{DataType, Element};

        $crate::with_match_type! {
            type $t = match ($args.element) {
                Element::U32 => u32,
                Element::U64 => u64,
            }

            {
                $crate::with_match_type! {
                    type $d = match ($args.data) {
                        DataType::Permutation => $crate::data::PermutationData<$t>,
                        DataType::Uniform => $crate::data::UniformData<$t>,
                        DataType::Identical => $crate::data::IdenticalData<$t>,
                        DataType::FewDistinct => $crate::data::FewDistinctData<$t>,
                        DataType::FewDifferent => $crate::data::FewDifferentData<$t>,
                    }

                    $code
                }
            }
        }
    }};
}

macro_rules! with_merging_method {
    ($value:expr => $t:ident, $code:block) => {
        with_match_type! {
            type $t = match ($value) {
                MergingMethod::RotationBinary => crate::algorithms::merging::RotationBinary,
                MergingMethod::RotationRightToLeft => crate::algorithms::merging::RotationRightToLeft,
                MergingMethod::RotationHybrid => crate::algorithms::merging::RotationHybrid,
                MergingMethod::AuxiliaryQueue => crate::algorithms::merging::AuxiliaryQueue,
                MergingMethod::Table => crate::algorithms::merging::Table,
            }

            $code
        }
    };
}

macro_rules! with_block_sorting_method {
    ($value:expr => $t:ident, $code:block) => {
        with_match_type! {
            type $t = match ($value) {
                BlockSortingMethod::Binary => crate::algorithms::block_sort::Binary,
                BlockSortingMethod::RightToLeft => crate::algorithms::block_sort::RightToLeft,
                BlockSortingMethod::Hybrid => crate::algorithms::block_sort::Hybrid,
                BlockSortingMethod::Table => crate::algorithms::block_sort::Table,
            }

            $code
        }
    };
}

macro_rules! with_sweep {
    ($value:expr => $t:ident, $code:block) => {
        with_match_type! {
            type $t = match ($value) {
                Sweep::RightToLeft => crate::algorithms::block_sort::RightToLeftSweep,
                Sweep::Pairwise => crate::algorithms::block_sort::PairwiseSweep,
            }

            $code
        }
    };
}

macro_rules! with_layout {
    ($value:expr => $t:ident, $code:block) => {
        with_match_type! {
            type $t = match ($value) {
                Layout::A0Full => crate::algorithms::blocks::A0Full,
                Layout::Symmetric => crate::algorithms::blocks::Symmetric,
            }

            $code
        }
    };
}

macro_rules! with_sort_type {
    ($args:expr => $t:ident, $code:block) => {
        match $args.algorithm {
            Algorithm::Std => with_match_const! {
                const STABLE: bool = match ($args.unstable) {
                    true => false,
                    false => true,
                }

                {
                    type $t = crate::algorithms::StdSort<STABLE>;

                    $code
                }
            },
            Algorithm::Insertionsort => with_match_const! {
                const BINARY: bool = match ($args.binary) {
                    true => true,
                    false => false,
                }

                {
                    type $t = crate::algorithms::insertionsort::InsertionSort<BINARY>;

                    $code
                }
            },
            Algorithm::Blocksort => with_match_const! {
                const BINARY: bool = match ($args.binary) {
                    true => true,
                    false => false,
                }

                {
                    with_block_sorting_method! { $args.block_sort => Sorting, {
                        with_merging_method! { $args.merge => Merging, {
                            with_sweep! { $args.sweep => Sweeping, {
                                with_layout! { $args.layout => Blocks, {
                                    type $t = crate::algorithms::block_sort::BlockSort<
                                        Sorting,
                                        Merging,
                                        Sweeping,
                                        Blocks,
                                        crate::algorithms::insertionsort::InsertionSort<BINARY>,
                                    >;

                                    $code
                                }}
                            }}
                        }}
                    }}
                }
            },
        }
    };
}

/// A sort chosen on the command line
pub struct Sorter<T, M> {
    /// The full name of the sort including its strategies
    pub name: String,
    /// Whether the sort is stable
    pub is_stable: bool,
    /// Sort a slice, counting into the metrics
    pub sort: fn(&mut [T], &mut M),
}

impl Args {
    /// Reject strategy combinations the block sort cannot run
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.algorithm != Algorithm::Blocksort {
            return Ok(());
        }

        let valid = with_block_sorting_method! { self.block_sort => Sorting, {
            with_layout! { self.layout => Blocks, {
                type Checked = crate::algorithms::block_sort::BlockSort<
                    Sorting,
                    DefaultMergingMethod,
                    DefaultSweepMethod,
                    Blocks,
                >;

                Checked::IS_VALID
            }}
        }};

        if !valid {
            anyhow::bail!(
                "block sorting method `{}` requires uniform blocks, which layout `{}` does not produce",
                self.block_sort,
                self.layout,
            );
        }

        Ok(())
    }

    /// The sort selected by the arguments
    pub fn sorter<T: Ord, M: Metrics>(&self) -> Sorter<T, M> {
        with_sort_type! { self => S, {
            Sorter {
                name: S::display(),
                is_stable: S::IS_STABLE,
                sort: S::sort_counted::<T, M>,
            }
        }}
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;
    use crate::metrics::{NoMetrics, SortMetrics};

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("block-sort-experiments").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn defaults() {
        let args = parse(&["blocksort", "permutation"]);

        assert_eq!(args.element, Element::U64);
        assert_eq!(args.merge, MergingMethod::RotationHybrid);
        assert_eq!(args.block_sort, BlockSortingMethod::Hybrid);
        assert_eq!(args.sweep, Sweep::RightToLeft);
        assert_eq!(args.layout, Layout::A0Full);
        assert_eq!(args.runs, 1_000);
        assert!(args.output.is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn value_names() {
        let args = parse(&[
            "blocksort",
            "few-distinct",
            "--merge",
            "auxiliary-queue",
            "--block-sort",
            "right-to-left",
            "--sweep",
            "pairwise",
            "--layout",
            "symmetric",
            "-r",
            "5",
            "-s",
            "100",
            "samples.csv",
        ]);

        assert_eq!(args.data, DataType::FewDistinct);
        assert_eq!(args.merge, MergingMethod::AuxiliaryQueue);
        assert_eq!(args.block_sort, BlockSortingMethod::RightToLeft);
        assert_eq!(args.sweep, Sweep::Pairwise);
        assert_eq!(args.layout, Layout::Symmetric);
        assert_eq!((args.runs, args.size), (5, 100));
        assert_eq!(args.output, Some(std::path::PathBuf::from("samples.csv")));

        assert_eq!(Layout::A0Full.to_string(), "a0-full");
        assert_eq!(MergingMethod::RotationRightToLeft.to_string(), "rotation-right-to-left");
    }

    #[test]
    fn rejects_table_on_symmetric_blocks() {
        let args = parse(&["blocksort", "uniform", "--block-sort", "table", "--layout", "symmetric"]);
        assert!(args.validate().is_err());

        let args = parse(&["blocksort", "uniform", "--block-sort", "table"]);
        assert!(args.validate().is_ok());

        // Only the block sort has blocks
        let args = parse(&["std", "uniform", "--block-sort", "table", "--layout", "symmetric"]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn selected_sorts_sort() {
        for args in [
            vec!["std", "uniform"],
            vec!["std", "uniform", "--unstable"],
            vec!["insertionsort", "uniform", "--binary"],
            vec!["blocksort", "uniform", "--merge", "table", "--sweep", "pairwise"],
            vec!["blocksort", "uniform", "--block-sort", "table", "--binary"],
        ] {
            let args = parse(&args);
            let sorter = args.sorter::<u32, SortMetrics>();

            let mut values: Vec<u32> = (0..500).rev().collect();
            let mut metrics = SortMetrics::default();
            (sorter.sort)(&mut values, &mut metrics);

            assert!(values.is_sorted(), "{} did not sort", sorter.name);
            assert!(metrics.compares > 0);
        }

        let sorter = parse(&["std", "uniform", "--unstable"]).sorter::<u32, NoMetrics>();
        assert!(!sorter.is_stable);
        assert_eq!(sorter.name, "std-unstable");
    }
}
