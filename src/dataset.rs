//! Loading agronomic measurements from CSV into typed samples.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use croprec_helpers::DataPoint;
use ndarray::Array1;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};

/// Numeric columns, in feature-vector order.
pub const FEATURE_COLUMNS: [&str; N_FEATURES] =
    ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"];
pub const LABEL_COLUMN: &str = "label";
pub const N_FEATURES: usize = 7;

/// One labeled observation: seven measurements and a crop name.
pub type Sample = DataPoint<String, f64>;

/// An ordered collection of samples that all carry [`N_FEATURES`] values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    /// Wraps `samples`, checking that every one has exactly seven features.
    pub fn new(samples: Vec<Sample>) -> Result<Self> {
        if let Some((i, bad)) = samples
            .iter()
            .enumerate()
            .find(|(_, s)| s.arity() != N_FEATURES)
        {
            return Err(PipelineError::InvalidDataset(format!(
                "sample {} has {} features, expected {}",
                i,
                bad.arity(),
                N_FEATURES
            )));
        }
        Ok(Self { samples })
    }

    // Subsets of a valid dataset are valid by construction.
    pub(crate) fn from_valid(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Loads a dataset from the CSV file at `path`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the file does not exist, `Parse` if any numeric field is
    /// missing or malformed (the whole load is aborted), `Io` for any other
    /// read failure.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => PipelineError::NotFound {
                path: path.to_path_buf(),
            },
            _ => PipelineError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let dataset = Self::from_reader(file).map_err(|e| match e {
            PipelineError::Io { source, .. } => PipelineError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        info!(
            path = %path.display(),
            samples = dataset.len(),
            labels = dataset.labels().len(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Parses CSV content with a header row from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers().map_err(csv_io_error)?.clone();
        let column_index = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| PipelineError::Parse {
                    row: 0,
                    column: name.to_string(),
                    message: format!(
                        "missing column; available columns: {:?}",
                        headers.iter().collect::<Vec<_>>()
                    ),
                })
        };

        let mut feature_idx = [0usize; N_FEATURES];
        for (slot, name) in feature_idx.iter_mut().zip(FEATURE_COLUMNS) {
            *slot = column_index(name)?;
        }
        let label_idx = column_index(LABEL_COLUMN)?;
        debug!(?feature_idx, label_idx, "resolved header columns");

        let mut samples = Vec::new();
        for (i, result) in reader.records().enumerate() {
            let row = i + 1;
            let record = result.map_err(|e| {
                if e.is_io_error() {
                    csv_io_error(e)
                } else {
                    PipelineError::Parse {
                        row,
                        column: "<record>".to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

            let mut features = Array1::zeros(N_FEATURES);
            for (j, (&idx, name)) in feature_idx.iter().zip(FEATURE_COLUMNS).enumerate() {
                features[j] = parse_field(record.get(idx), row, name)?;
            }
            let label = record.get(label_idx).ok_or_else(|| PipelineError::Parse {
                row,
                column: LABEL_COLUMN.to_string(),
                message: "missing value".to_string(),
            })?;

            samples.push(DataPoint::new(features, label.to_string()));
        }

        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Distinct labels in ascending order.
    pub fn labels(&self) -> BTreeSet<String> {
        self.samples.iter().map(|s| s.label.clone()).collect()
    }
}

/// Loads a dataset from `path`. See [`Dataset::load`].
pub fn load<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    Dataset::load(path)
}

fn parse_field(value: Option<&str>, row: usize, column: &str) -> Result<f64> {
    let parse_error = |message: String| PipelineError::Parse {
        row,
        column: column.to_string(),
        message,
    };
    let raw = value.ok_or_else(|| parse_error("missing value".to_string()))?;
    let parsed = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| parse_error(format!("cannot parse {:?} as a number: {}", raw, e)))?;
    if !parsed.is_finite() {
        return Err(parse_error(format!("{:?} is not a finite number", raw)));
    }
    Ok(parsed)
}

// The caller substitutes the real path; in-memory readers have none.
fn csv_io_error(e: csv::Error) -> PipelineError {
    PipelineError::Io {
        path: Default::default(),
        source: io::Error::from(e),
    }
}
