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

use std::path::Path;

use log::info;
use ndarray::Array1;

use crate::algorithms::LinearRegression;
use crate::data::{Dataset, Record};
use crate::errors::{PersistenceError, PipelineError};
use crate::persistence;
use crate::preprocessing::FeatureTransformer;

#[derive(Debug, Clone, Default)]
pub struct PipelineBuilder {
    numeric: Vec<String>,
    categorical: Vec<String>,
    target: Option<String>,
}

impl PipelineBuilder {
    /// Columns parsed as numbers and standardized.
    pub fn numeric<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Columns one-hot encoded over their observed categories.
    pub fn categorical<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn target(mut self, column: impl Into<String>) -> Self {
        self.target = Some(column.into());
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline { numeric: self.numeric, categorical: self.categorical, target: self.target }
    }
}

/// An unfitted pipeline: the feature declaration and the target column.
///
/// Fitting consumes it and yields a [`FittedPipeline`]; only the fitted value
/// can predict.
#[derive(Debug, Clone)]
pub struct Pipeline {
    numeric: Vec<String>,
    categorical: Vec<String>,
    target: Option<String>,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Fits the feature transformer and the regression model on `dataset`.
    ///
    /// # Parameters
    /// - `dataset`: Training rows holding every declared feature column and
    ///   the target column.
    ///
    /// # Returns
    /// The fitted pipeline, or a `PipelineError` when the target is missing
    /// or doubles as a feature, a feature or target value is missing or not
    /// numeric, or the least squares solve fails.
    pub fn fit(self, dataset: &Dataset) -> Result<FittedPipeline, PipelineError> {
        let target = self.target.ok_or(PipelineError::MissingTarget)?;
        if self.numeric.iter().chain(&self.categorical).any(|column| *column == target) {
            return Err(PipelineError::TargetIsFeature(target));
        }

        let mut transformer = FeatureTransformer::new(self.numeric, self.categorical)?;
        let y = dataset.target(&target)?;
        let x = transformer.fit_transform(&dataset.records())?;

        let mut model = LinearRegression::new().build();
        model.fit(&x, &y)?;
        info!("Fitted pipeline on {} rows with {} features", x.nrows(), x.ncols());

        Ok(FittedPipeline { target, transformer, model })
    }
}

/// A pipeline with learned transformer statistics and model coefficients.
///
/// Prediction borrows the pipeline immutably and is deterministic: the same
/// records always give the same estimates.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedPipeline {
    target: String,
    transformer: FeatureTransformer,
    model: LinearRegression,
}

impl FittedPipeline {
    // Consistency between the transformer width and the coefficients is
    // checked by the caller.
    pub(crate) fn from_parts(
        target: String,
        transformer: FeatureTransformer,
        model: LinearRegression,
    ) -> Self {
        FittedPipeline { target, transformer, model }
    }

    /// Estimates the target for each record, in order.
    pub fn predict(&self, records: &[Record]) -> Result<Array1<f64>, PipelineError> {
        let x = self.transformer.transform(records)?;
        Ok(self.model.predict(&x)?)
    }

    /// Estimates the target for every row of `dataset`. A target column in
    /// the dataset is ignored.
    pub fn predict_dataset(&self, dataset: &Dataset) -> Result<Array1<f64>, PipelineError> {
        self.predict(&dataset.records())
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn feature_names(&self) -> Result<Vec<String>, PipelineError> {
        Ok(self.transformer.feature_names()?)
    }

    /// Learned weights paired with the feature they apply to.
    pub fn coefficients(&self) -> Result<Vec<(String, f64)>, PipelineError> {
        let names = self.feature_names()?;
        let weights = self.model.coefficients()?;
        Ok(names.into_iter().zip(weights.iter().copied()).collect())
    }

    pub fn intercept(&self) -> f64 {
        self.model.intercept()
    }

    pub fn transformer(&self) -> &FeatureTransformer {
        &self.transformer
    }

    pub fn model(&self) -> &LinearRegression {
        &self.model
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PersistenceError> {
        persistence::save_pipeline(self, path)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        persistence::load_pipeline(path)
    }
}
