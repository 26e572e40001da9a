//! Accuracy of a centroid table on held-out samples.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::hash::Hash;

use croprec_helpers::DataPoint;
use nearest_centroid::{CentroidTable, classify};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Correct/total counts for one true label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelTally {
    pub correct: usize,
    pub total: usize,
}

impl LabelTally {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// Outcome of classifying every sample of an evaluation set.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<L: Ord> {
    correct: usize,
    total: usize,
    per_label: BTreeMap<L, LabelTally>,
}

impl<L: Ord> Evaluation<L> {
    /// Fraction of exact matches. Only [`evaluate`] builds an `Evaluation`,
    /// and it rejects empty sets, so `total` is at least 1.
    pub fn accuracy(&self) -> f64 {
        self.correct as f64 / self.total as f64
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Tallies keyed by true label.
    pub fn per_label(&self) -> &BTreeMap<L, LabelTally> {
        &self.per_label
    }
}

/// Classifies each sample of `eval` against `table` and tallies the matches.
///
/// # Errors
///
/// `EmptyEvalSet` if `eval` is empty; any classification error is propagated
/// unchanged.
pub fn evaluate<L>(table: &CentroidTable<L, f64>, eval: &[DataPoint<L, f64>]) -> Result<Evaluation<L>>
where
    L: Clone + Ord + Hash + Debug,
{
    if eval.is_empty() {
        return Err(PipelineError::EmptyEvalSet);
    }

    let mut per_label: BTreeMap<L, LabelTally> = BTreeMap::new();
    let mut correct = 0;
    for sample in eval {
        let predicted = classify(table, sample.features.view())?;
        let tally = per_label.entry(sample.label.clone()).or_default();
        tally.total += 1;
        if predicted == sample.label {
            tally.correct += 1;
            correct += 1;
        }
    }

    Ok(Evaluation {
        correct,
        total: eval.len(),
        per_label,
    })
}

/// The persisted summary of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Distinct labels of the full dataset, sorted. Labels that had no
    /// training samples are listed too, even though they can never be predicted.
    pub crops: Vec<String>,
    pub accuracy: f64,
    pub total_samples: usize,
    pub train_samples: usize,
    pub test_samples: usize,
}

impl EvaluationResult {
    pub fn new(
        crops: BTreeSet<String>,
        evaluation: &Evaluation<String>,
        total_samples: usize,
        train_samples: usize,
    ) -> Self {
        Self {
            crops: crops.into_iter().collect(),
            accuracy: evaluation.accuracy(),
            total_samples,
            train_samples,
            test_samples: evaluation.total(),
        }
    }
}
