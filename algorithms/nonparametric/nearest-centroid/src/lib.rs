use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

use croprec_helpers::{DataPoint, Distance, Float, L2Dist};
use ndarray::{Array1, ArrayView1};
use tracing::debug;

/// Errors that can occur when training or querying a nearest-centroid model.
#[derive(Debug, Clone, PartialEq)]
pub enum CentroidError {
    /// Cannot classify against a table with no centroids
    EmptyModel,
    /// A feature vector does not have the arity the model was trained with
    MismatchedDimensions { expected: usize, actual: usize },
    /// Invalid distance comparison (likely due to NaN values in data)
    InvalidDistance,
}

impl Display for CentroidError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CentroidError::EmptyModel => {
                write!(f, "Cannot classify against a model with no centroids")
            }
            CentroidError::MismatchedDimensions { expected, actual } => write!(
                f,
                "Feature vector has {} values but the model expects {}",
                actual, expected
            ),
            CentroidError::InvalidDistance => write!(
                f,
                "Invalid distance comparison (likely due to NaN values in data)"
            ),
        }
    }
}

impl Error for CentroidError {}

/// One mean feature vector per class label.
///
/// Centroids are kept in ascending label order. That order is the tie-break
/// used by [`NearestCentroid::predict`]: when two centroids are at exactly the
/// same distance, the one with the smaller label wins.
#[derive(Debug, Clone, PartialEq)]
pub struct CentroidTable<L, F>
where
    L: Clone + Ord + Hash + Debug,
    F: Float,
{
    centroids: BTreeMap<L, Array1<F>>,
    n_features: usize,
}

impl<L, F> CentroidTable<L, F>
where
    L: Clone + Ord + Hash + Debug,
    F: Float,
{
    /// Computes the per-label arithmetic mean of every feature column.
    ///
    /// Labels that do not occur in `data` get no centroid. An empty `data`
    /// produces an empty table, which can be built but not classified against.
    ///
    /// # Errors
    ///
    /// Returns `CentroidError::MismatchedDimensions` if the points do not all
    /// share the arity of the first one.
    pub fn train(data: &[DataPoint<L, F>]) -> Result<Self, CentroidError> {
        let n_features = data.first().map_or(0, DataPoint::arity);

        // label -> (running sum, count)
        let mut sums: BTreeMap<L, (Array1<F>, usize)> = BTreeMap::new();
        for dp in data {
            if dp.arity() != n_features {
                return Err(CentroidError::MismatchedDimensions {
                    expected: n_features,
                    actual: dp.arity(),
                });
            }
            let entry = sums
                .entry(dp.label.clone())
                .or_insert_with(|| (Array1::zeros(n_features), 0));
            entry.0 += &dp.features;
            entry.1 += 1;
        }

        let centroids = sums
            .into_iter()
            .map(|(label, (sum, count))| {
                // count >= 1 for every entry
                let n = F::from_usize(count).unwrap_or_else(F::one);
                debug!(label = ?label, samples = count, "computed centroid");
                (label, sum / n)
            })
            .collect();

        Ok(Self {
            centroids,
            n_features,
        })
    }

    /// The centroid for `label`, if that label was seen during training.
    pub fn get(&self, label: &L) -> Option<ArrayView1<'_, F>> {
        self.centroids.get(label).map(|c| c.view())
    }

    /// Iterates over `(label, centroid)` pairs in ascending label order.
    pub fn iter(&self) -> impl Iterator<Item = (&L, ArrayView1<'_, F>)> {
        self.centroids.iter().map(|(l, c)| (l, c.view()))
    }

    /// Labels that have a centroid, in ascending order.
    pub fn labels(&self) -> impl Iterator<Item = &L> {
        self.centroids.keys()
    }

    pub fn contains(&self, label: &L) -> bool {
        self.centroids.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.centroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }

    /// Feature arity of the training data (0 for an empty table).
    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

/// A nearest-centroid classifier.
///
/// Predicts the label of the centroid closest to a query point under the
/// distance metric `D`.
///
/// # Type Parameters
///
/// * `L`: The type of the label (e.g., `String`).
/// * `F`: The float type for the features (e.g., `f64`).
/// * `D`: The distance metric, which must implement `Distance`.
#[derive(Debug, Clone)]
pub struct NearestCentroid<L, F, D>
where
    L: Clone + Ord + Hash + Debug,
    F: Float,
    D: Distance<F>,
{
    table: CentroidTable<L, F>,
    distance: D,
}

impl<L, F, D> NearestCentroid<L, F, D>
where
    L: Clone + Ord + Hash + Debug,
    F: Float,
    D: Distance<F>,
{
    pub fn new(table: CentroidTable<L, F>, distance: D) -> Self {
        Self { table, distance }
    }

    /// Trains a table from `data` and wraps it with `distance`.
    pub fn fit(data: &[DataPoint<L, F>], distance: D) -> Result<Self, CentroidError> {
        Ok(Self::new(CentroidTable::train(data)?, distance))
    }

    pub fn table(&self) -> &CentroidTable<L, F> {
        &self.table
    }

    pub fn into_table(self) -> CentroidTable<L, F> {
        self.table
    }

    /// Finds the nearest centroid and returns its label with the true distance.
    ///
    /// # Errors
    ///
    /// Returns `CentroidError::EmptyModel` if the table has no centroids,
    /// `CentroidError::MismatchedDimensions` if `features` has the wrong arity
    /// and `CentroidError::InvalidDistance` if a distance is NaN.
    pub fn nearest(&self, features: ArrayView1<F>) -> Result<(&L, F), CentroidError> {
        let (label, rdist) = nearest_in(&self.table, features, &self.distance)?;
        Ok((label, self.distance.rdist_to_dist(rdist)))
    }

    /// Predicts the label for a new, unseen data point.
    pub fn predict(&self, features: ArrayView1<F>) -> Result<L, CentroidError> {
        self.nearest(features).map(|(label, _)| label.clone())
    }
}

/// Builds a centroid table from labeled training points.
pub fn train<L, F>(data: &[DataPoint<L, F>]) -> Result<CentroidTable<L, F>, CentroidError>
where
    L: Clone + Ord + Hash + Debug,
    F: Float,
{
    CentroidTable::train(data)
}

/// Classifies `features` against `table` using Euclidean distance.
pub fn classify<L, F>(table: &CentroidTable<L, F>, features: ArrayView1<F>) -> Result<L, CentroidError>
where
    L: Clone + Ord + Hash + Debug,
    F: Float,
{
    nearest_label(table, features, &L2Dist)
}

/// Classifies `features` against `table` under an arbitrary metric.
pub fn nearest_label<L, F, D>(
    table: &CentroidTable<L, F>,
    features: ArrayView1<F>,
    distance: &D,
) -> Result<L, CentroidError>
where
    L: Clone + Ord + Hash + Debug,
    F: Float,
    D: Distance<F>,
{
    nearest_in(table, features, distance).map(|(label, _)| label.clone())
}

// Scans centroids in ascending label order and returns the closest one with its
// relative distance.
fn nearest_in<'a, L, F, D>(
    table: &'a CentroidTable<L, F>,
    features: ArrayView1<F>,
    distance: &D,
) -> Result<(&'a L, F), CentroidError>
where
    L: Clone + Ord + Hash + Debug,
    F: Float,
    D: Distance<F>,
{
    if table.is_empty() {
        return Err(CentroidError::EmptyModel);
    }
    if features.len() != table.n_features() {
        return Err(CentroidError::MismatchedDimensions {
            expected: table.n_features(),
            actual: features.len(),
        });
    }

    let mut best: Option<(&'a L, F)> = None;
    for (label, centroid) in table.iter() {
        let d = distance.rdistance(features, centroid);
        if d.is_nan() {
            return Err(CentroidError::InvalidDistance);
        }
        // Strict comparison: on an exact tie the earlier (smaller) label is kept.
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((label, d)),
        }
    }
    best.ok_or(CentroidError::EmptyModel)
}
