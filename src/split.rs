//! Train/eval partitioning driven by an explicitly seeded RNG.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::debug;

use crate::config::validate_ratio;
use crate::dataset::Dataset;
use crate::error::Result;

/// Two disjoint datasets whose union is the dataset they were cut from.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Dataset,
    pub eval: Dataset,
}

/// Index where the training part ends: `floor(ratio * n)`.
pub fn cut_index(n: usize, ratio: f64) -> usize {
    // Truncation toward zero is the intended rounding.
    ((ratio * n as f64) as usize).min(n)
}

/// Shuffles the full index permutation of `dataset` with `rng`, then assigns
/// the first `cut_index(n, ratio)` permuted samples to training and the rest
/// to evaluation.
///
/// # Errors
///
/// Returns `InvalidConfig` if `ratio` is not strictly between 0 and 1.
pub fn split_with_rng<R: Rng + ?Sized>(dataset: Dataset, ratio: f64, rng: &mut R) -> Result<Split> {
    validate_ratio(ratio)?;

    let n = dataset.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    let cut = cut_index(n, ratio);

    // Move each sample out exactly once; no cloning, no overlap.
    let mut slots: Vec<_> = dataset.into_samples().into_iter().map(Some).collect();
    let mut take = |indices: &[usize]| {
        indices
            .iter()
            .filter_map(|&i| slots[i].take())
            .collect::<Vec<_>>()
    };
    let train = take(&order[..cut]);
    let eval = take(&order[cut..]);
    debug!(total = n, train = train.len(), eval = eval.len(), "split dataset");

    Ok(Split {
        train: Dataset::from_valid(train),
        eval: Dataset::from_valid(eval),
    })
}

/// Same as [`split_with_rng`] with a `Xoshiro256PlusPlus` seeded from `seed`.
pub fn split_with_seed(dataset: Dataset, ratio: f64, seed: u64) -> Result<Split> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    split_with_rng(dataset, ratio, &mut rng)
}
