//! Nearest-centroid crop recommendation.
//!
//! The pipeline loads a CSV of soil and climate measurements, splits it into
//! training and evaluation sets with an explicitly seeded RNG, computes one
//! mean feature vector per crop, classifies held-out samples by Euclidean
//! distance to the nearest centroid and writes a JSON summary of the run.

pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluate;
pub mod persist;
pub mod pipeline;
pub mod split;

pub use config::PipelineConfig;
pub use croprec_helpers::{DataPoint, Distance, Float, L2Dist};
pub use dataset::{Dataset, Sample, load};
pub use error::{PipelineError, Result};
pub use evaluate::{Evaluation, EvaluationResult, evaluate};
pub use nearest_centroid::{CentroidError, CentroidTable, NearestCentroid, classify, train};
pub use persist::{load_summary, save_summary};
pub use pipeline::{recommend, run, train_full};
pub use split::{Split, split_with_rng, split_with_seed};
