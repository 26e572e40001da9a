//! Error taxonomy for the crop recommendation pipeline.

use std::path::PathBuf;

use nearest_centroid::CentroidError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Every way a pipeline run can fail. Stages propagate these unchanged.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("dataset not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// `row` counts data rows from 1; row 0 is the header.
    #[error("row {row}, column '{column}': {message}")]
    Parse {
        row: usize,
        column: String,
        message: String,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Model(#[from] CentroidError),

    #[error("cannot compute accuracy on an empty evaluation set")]
    EmptyEvalSet,

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed summary {}: {source}", path.display())]
    Summary {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PipelineError {
    /// Stable short name of the error kind, used when reporting a failed run.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::NotFound { .. } => "NotFoundError",
            PipelineError::Parse { .. } => "ParseError",
            PipelineError::Io { .. } => "IoError",
            PipelineError::InvalidDataset(_) => "InvalidDatasetError",
            PipelineError::InvalidConfig(_) => "ConfigError",
            PipelineError::Model(CentroidError::EmptyModel) => "EmptyModelError",
            PipelineError::Model(CentroidError::MismatchedDimensions { .. }) => {
                "DimensionError"
            }
            PipelineError::Model(CentroidError::InvalidDistance) => "DistanceError",
            PipelineError::EmptyEvalSet => "EmptyEvalSetError",
            PipelineError::Write { .. } => "WriteError",
            PipelineError::Summary { .. } => "SummaryError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(PipelineError::EmptyEvalSet.kind(), "EmptyEvalSetError");
        assert_eq!(
            PipelineError::from(CentroidError::EmptyModel).kind(),
            "EmptyModelError"
        );
        let err = PipelineError::Parse {
            row: 3,
            column: "ph".into(),
            message: "invalid float literal".into(),
        };
        assert_eq!(err.kind(), "ParseError");
        assert_eq!(
            err.to_string(),
            "row 3, column 'ph': invalid float literal"
        );
    }

    #[test]
    fn test_model_error_is_transparent() {
        let err = PipelineError::from(CentroidError::EmptyModel);
        assert_eq!(err.to_string(), CentroidError::EmptyModel.to_string());
    }
}
