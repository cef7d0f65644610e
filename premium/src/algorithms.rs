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

use ndarray::{Array1, Array2, Axis};

use crate::errors::ModelError;
use crate::linalg::pinv_solve;
use crate::metrics::{R2Score, RegressionMetric};

pub struct LinearRegressionBuilder {
    fit_intercept: bool,
}

impl LinearRegressionBuilder {
    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn build(self) -> LinearRegression {
        LinearRegression { weights: None, bias: 0.0, fit_intercept: self.fit_intercept }
    }
}

/// Ordinary least squares regression, solved in closed form.
///
/// `fit` centers the features and target (when fitting an intercept) and
/// solves the normal equations through a pseudo-inverse, so collinear
/// features or fewer rows than features produce the minimum-norm coefficient
/// vector rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    weights: Option<Array1<f64>>,
    bias: f64,
    fit_intercept: bool,
}

impl LinearRegression {
    pub fn new() -> LinearRegressionBuilder {
        LinearRegressionBuilder { fit_intercept: true }
    }

    /// Rebuilds a fitted model from stored coefficients and intercept.
    pub fn from_params(weights: Array1<f64>, bias: f64) -> Result<Self, ModelError> {
        if weights.iter().any(|w| !w.is_finite()) || !bias.is_finite() {
            return Err(ModelError::InvalidNumericValue);
        }
        Ok(LinearRegression { weights: Some(weights), bias, fit_intercept: true })
    }

    /// Fits the model to the given data.
    ///
    /// # Arguments
    /// - `x`: The input features as a 2D array, one row per sample.
    /// - `y`: The target values as a 1D array.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        if x.nrows() == 0 || y.is_empty() {
            return Err(ModelError::EmptyInput);
        }
        if x.nrows() != y.len() {
            return Err(ModelError::DimensionMismatch { expected: x.nrows(), actual: y.len() });
        }
        if x.iter().any(|v| !v.is_finite()) || y.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidNumericValue);
        }

        let (weights, bias) = if self.fit_intercept {
            let x_mean = x.mean_axis(Axis(0)).ok_or(ModelError::EmptyInput)?;
            let y_mean = y.mean().ok_or(ModelError::EmptyInput)?;
            let x_centered = x - &x_mean;
            let y_centered = y - y_mean;

            let weights =
                pinv_solve(&x_centered.t().dot(&x_centered), &x_centered.t().dot(&y_centered))?;
            let bias = y_mean - weights.dot(&x_mean);
            (weights, bias)
        } else {
            (pinv_solve(&x.t().dot(x), &x.t().dot(y))?, 0.0)
        };

        if !bias.is_finite() {
            return Err(ModelError::NumericalInstability);
        }
        self.weights = Some(weights);
        self.bias = bias;
        Ok(())
    }

    /// Predicts `x · w + b` for every row of `x`.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let weights = self.coefficients()?;
        if x.ncols() != weights.len() {
            return Err(ModelError::DimensionMismatch { expected: weights.len(), actual: x.ncols() });
        }
        Ok(self.predict_linear(x, weights))
    }

    /// R² of the predictions for `x` against `y`.
    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64, ModelError> {
        if x.nrows() != y.len() {
            return Err(ModelError::DimensionMismatch { expected: x.nrows(), actual: y.len() });
        }
        let predictions = self.predict(x)?;
        Ok(R2Score.calculate(&predictions, y)?)
    }

    pub fn coefficients(&self) -> Result<&Array1<f64>, ModelError> {
        self.weights.as_ref().ok_or(ModelError::NotFitted)
    }

    pub fn intercept(&self) -> f64 {
        self.bias
    }

    pub fn is_fitted(&self) -> bool {
        self.weights.is_some()
    }

    #[inline(always)]
    fn predict_linear(&self, x: &Array2<f64>, weights: &Array1<f64>) -> Array1<f64> {
        x.dot(weights) + self.bias
    }
}
