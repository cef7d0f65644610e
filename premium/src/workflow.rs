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

//! The three stages of the insurance workflow.
//!
//! Each stage reads what the previous one wrote to disk, so they can run in
//! separate processes. A stage whose input file does not exist logs an error
//! and returns `Ok(None)`; failures after the input was found are returned as
//! `WorkflowError`.

use log::{error, info};
use ndarray::Array1;

use crate::cleaning::{CleaningReport, clean};
use crate::config::WorkflowConfig;
use crate::data::{Record, load_dataset, write_dataset};
use crate::errors::WorkflowError;
use crate::evaluation::{Evaluation, evaluate, train_test_split};
use crate::pipeline::FittedPipeline;

/// Outcome of [`run_training`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub n_train: usize,
    pub n_test: usize,
    pub evaluation: Evaluation,
    pub intercept: f64,
    pub coefficients: Vec<(String, f64)>,
}

/// Loads the raw data, cleans it and writes the cleaned table.
pub fn run_cleaning(config: &WorkflowConfig) -> Result<Option<CleaningReport>, WorkflowError> {
    let Some(dataset) = load_dataset(config.raw_data_path()) else {
        return Ok(None);
    };

    let (cleaned, report) = clean(dataset);
    write_dataset(&cleaned, config.cleaned_data_path())?;
    info!("Cleaned data saved to {:?}", config.cleaned_data_path());

    Ok(Some(report))
}

/// Fits the configured pipeline on a training split of the cleaned data,
/// scores it on the held-out split and saves it.
pub fn run_training(config: &WorkflowConfig) -> Result<Option<TrainingReport>, WorkflowError> {
    let Some(dataset) = load_dataset(config.cleaned_data_path()) else {
        return Ok(None);
    };

    let (train, test) = train_test_split(&dataset, config.test_ratio(), config.seed())?;
    info!("Training on {} rows. Testing on {} rows", train.n_rows(), test.n_rows());

    let fitted = config.pipeline().fit(&train)?;
    let evaluation = evaluate(&fitted, &test)?;
    fitted.save(config.model_path())?;

    Ok(Some(TrainingReport {
        n_train: train.n_rows(),
        n_test: test.n_rows(),
        evaluation,
        intercept: fitted.intercept(),
        coefficients: fitted.coefficients()?,
    }))
}

/// Loads the saved pipeline and estimates the target for each record.
pub fn run_inference(
    config: &WorkflowConfig,
    records: &[Record],
) -> Result<Option<Array1<f64>>, WorkflowError> {
    let model_path = config.model_path();
    if !model_path.exists() {
        let pickled = config.pickled_model_path();
        if pickled.exists() {
            error!(
                "Model not found at {:?}; {:?} is a pickled model and cannot be read, \
                 run training to write the JSON model",
                model_path, pickled
            );
        } else {
            error!("Model not found at {:?}; run training first", model_path);
        }
        return Ok(None);
    }

    let pipeline = FittedPipeline::load(model_path)?;
    Ok(Some(pipeline.predict(records)?))
}
