//! Input generation for the experiments

use std::{fmt, marker::PhantomData};

use rand::{Rng as _, distr::Distribution as _, rngs::StdRng, seq::SliceRandom as _};

/// The share of outliers in [`FewDifferentData`]
const OUTLIER_PROBABILITY: f64 = 0.02;

/// A trait for generalizing sorting data creation
pub trait Data<T: Sized + Ord + fmt::Debug> {
    /// Initialize a vector of the given size
    fn initialize(size: usize, rng: &mut StdRng) -> Vec<T>;
}

/// A random permutation of `0..size`
#[derive(Debug)]
pub struct PermutationData<T>(PhantomData<T>);

/// Values drawn uniformly from the whole domain of the type
#[derive(Debug)]
pub struct UniformData<T>(PhantomData<T>);

/// A single random value repeated
#[derive(Debug)]
pub struct IdenticalData<T>(PhantomData<T>);

/// Geometrically distributed values, so only a handful of them are distinct
#[derive(Debug)]
pub struct FewDistinctData<T>(PhantomData<T>);

/// A single random value with a few random outliers
#[derive(Debug)]
pub struct FewDifferentData<T>(PhantomData<T>);

macro_rules! impl_for_integers {
    ($($type:ty),*) => {
        $(
            impl_for_integers!(@single $type);
        )*
    };
    (@single $type:ty) => {
        impl Data<$type> for PermutationData<$type> {
            fn initialize(size: usize, rng: &mut StdRng) -> Vec<$type> {
                let mut values: Vec<$type> = (0..size).map(|value| value as $type).collect();
                values.shuffle(rng);
                values
            }
        }

        impl Data<$type> for UniformData<$type> {
            fn initialize(size: usize, rng: &mut StdRng) -> Vec<$type> {
                (0..size).map(|_| rng.random()).collect()
            }
        }

        impl Data<$type> for IdenticalData<$type> {
            fn initialize(size: usize, rng: &mut StdRng) -> Vec<$type> {
                vec![rng.random(); size]
            }
        }

        impl Data<$type> for FewDistinctData<$type> {
            fn initialize(size: usize, rng: &mut StdRng) -> Vec<$type> {
                rand_distr::StandardGeometric
                    .sample_iter(rng)
                    .take(size)
                    .map(|value| value as $type)
                    .collect()
            }
        }

        impl Data<$type> for FewDifferentData<$type> {
            fn initialize(size: usize, rng: &mut StdRng) -> Vec<$type> {
                let majority: $type = rng.random();

                (0..size)
                    .map(|_| {
                        if rng.random_bool(OUTLIER_PROBABILITY) {
                            rng.random()
                        } else {
                            majority
                        }
                    })
                    .collect()
            }
        }
    }
}

// Implement the Data trait for the element types of the experiments
impl_for_integers!(u32, u64);

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;

    use super::*;

    const SIZE: usize = 1_000;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(crate::test::TEST_SEED)
    }

    #[test]
    fn permutation() {
        let mut values = PermutationData::<u32>::initialize(SIZE, &mut rng());
        assert!(!values.is_sorted());

        values.sort();
        assert!(values.iter().copied().eq(0..SIZE as u32));
    }

    #[test]
    fn identical() {
        let values = IdenticalData::<u64>::initialize(SIZE, &mut rng());
        assert_eq!(values.len(), SIZE);
        assert!(values.iter().all(|value| *value == values[0]));
    }

    #[test]
    fn few_distinct() {
        let mut values = FewDistinctData::<u64>::initialize(SIZE, &mut rng());
        values.sort();
        values.dedup();
        assert!(values.len() > 1);
        assert!(values.len() < 30);
    }

    #[test]
    fn few_different() {
        let values = FewDifferentData::<u32>::initialize(SIZE, &mut rng());
        let majority = values.iter().filter(|value| **value == values[0]).count();

        // The first element might be an outlier itself
        let common = majority.max(SIZE - majority);
        assert!(common > SIZE * 9 / 10);
        assert!(common < SIZE);
    }

    #[test]
    fn uniform() {
        let values = UniformData::<u64>::initialize(SIZE, &mut rng());
        assert_eq!(values.len(), SIZE);
        assert!(values.iter().any(|value| *value > u64::MAX / 2));
    }
}
