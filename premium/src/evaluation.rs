// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::data::Dataset;
use crate::errors::EvaluationError;
use crate::metrics::{MeanAbsoluteError, R2Score, RegressionMetric};
use crate::pipeline::FittedPipeline;

/// Held-out scores of a fitted pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub mae: f64,
    pub r2: f64,
    pub n_samples: usize,
}

/// Splits `dataset` into `(train, test)` after a seeded shuffle of the rows.
///
/// The first `ceil(n_rows * test_ratio)` shuffled rows form the test split,
/// the remaining rows the training split. The same seed and input always give
/// the same partition.
///
/// # Errors
/// - `EvaluationError::InvalidRatio` unless `0 < test_ratio < 1`.
/// - `EvaluationError::InsufficientRows` when either split would be empty.
pub fn train_test_split(
    dataset: &Dataset,
    test_ratio: f64,
    seed: u64,
) -> Result<(Dataset, Dataset), EvaluationError> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(EvaluationError::InvalidRatio(test_ratio));
    }
    let n_rows = dataset.n_rows();
    let n_test = (n_rows as f64 * test_ratio).ceil() as usize;
    if n_test == 0 || n_test >= n_rows {
        return Err(EvaluationError::InsufficientRows { n_rows });
    }

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let (test_indices, train_indices) = indices.split_at(n_test);
    debug!("Split data: train_size={}, test_size={}", train_indices.len(), test_indices.len());

    Ok((dataset.select(train_indices), dataset.select(test_indices)))
}

/// Scores `pipeline` on `dataset`, which must carry the pipeline's target
/// column.
pub fn evaluate(pipeline: &FittedPipeline, dataset: &Dataset) -> Result<Evaluation, EvaluationError> {
    let actuals = dataset.target(pipeline.target())?;
    let predictions = pipeline.predict_dataset(dataset)?;

    let evaluation = Evaluation {
        mae: MeanAbsoluteError.calculate(&predictions, &actuals)?,
        r2: R2Score.calculate(&predictions, &actuals)?,
        n_samples: actuals.len(),
    };
    info!(
        "Evaluated on {} rows: MAE = {:.4}, R2 = {:.4}",
        evaluation.n_samples, evaluation.mae, evaluation.r2
    );
    Ok(evaluation)
}
