//! Run configuration with documented defaults.

use std::path::PathBuf;

use crate::error::{PipelineError, Result};

/// Dataset read when no path is given.
pub const DEFAULT_DATASET_PATH: &str = "Crop_recommendation.csv";
/// Where the run summary is written when no path is given.
pub const DEFAULT_OUTPUT_PATH: &str = "models/model_info.json";
/// Fraction of the shuffled dataset used for training.
pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;

/// Everything a pipeline run needs to know up front.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub dataset_path: PathBuf,
    pub output_path: PathBuf,
    /// Seed for the train/eval shuffle. `None` draws one from OS entropy.
    pub seed: Option<u64>,
    pub train_ratio: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            seed: None,
            train_ratio: DEFAULT_TRAIN_RATIO,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        validate_ratio(self.train_ratio)
    }
}

pub(crate) fn validate_ratio(ratio: f64) -> Result<()> {
    if ratio > 0.0 && ratio < 1.0 {
        Ok(())
    } else {
        Err(PipelineError::InvalidConfig(format!(
            "train ratio must lie strictly between 0 and 1, got {}",
            ratio
        )))
    }
}
