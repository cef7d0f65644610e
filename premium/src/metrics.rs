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

use ndarray::Array1;

use crate::errors::MetricError;

pub trait RegressionMetric {
    fn calculate(&self, predictions: &Array1<f64>, actuals: &Array1<f64>)
    -> Result<f64, MetricError>;
}

fn validate(predictions: &Array1<f64>, actuals: &Array1<f64>) -> Result<(), MetricError> {
    if predictions.is_empty() || actuals.is_empty() {
        return Err(MetricError::EmptyInput);
    }

    if predictions.len() != actuals.len() {
        return Err(MetricError::DimensionMismatch {
            expected: predictions.len(),
            actual: actuals.len(),
        });
    }

    if predictions.iter().any(|&v| !v.is_finite()) || actuals.iter().any(|&v| !v.is_finite()) {
        return Err(MetricError::InvalidNumericValue);
    }
    Ok(())
}

/// Average of `|actual - predicted|`.
pub struct MeanAbsoluteError;

impl RegressionMetric for MeanAbsoluteError {
    fn calculate(
        &self,
        predictions: &Array1<f64>,
        actuals: &Array1<f64>,
    ) -> Result<f64, MetricError> {
        validate(predictions, actuals)?;
        let diff = predictions - actuals;
        diff.mapv(f64::abs).mean().ok_or(MetricError::EmptyInput)
    }
}

/// Coefficient of determination, `1 - SS_res / SS_tot` around the mean of the
/// actual values.
///
/// When the actual values have no variance the score is 1.0 for a perfect fit
/// and 0.0 otherwise.
pub struct R2Score;

impl RegressionMetric for R2Score {
    fn calculate(
        &self,
        predictions: &Array1<f64>,
        actuals: &Array1<f64>,
    ) -> Result<f64, MetricError> {
        validate(predictions, actuals)?;
        let mean = actuals.mean().ok_or(MetricError::EmptyInput)?;
        let ss_res = (actuals - predictions).mapv(|r| r * r).sum();
        let ss_tot = actuals.mapv(|y| (y - mean) * (y - mean)).sum();

        if ss_tot == 0.0 {
            return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
        }
        Ok(1.0 - ss_res / ss_tot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, array};

    #[test]
    fn test_mae_empty_input() {
        let metric = MeanAbsoluteError;
        let predictions: Array1<f64> = Array1::zeros(0);
        let actuals = array![1.0];
        let result = metric.calculate(&predictions, &actuals);
        assert!(matches!(result, Err(MetricError::EmptyInput)));
    }

    #[test]
    fn test_mae_dimension_mismatch() {
        let metric = MeanAbsoluteError;
        let predictions = array![1.0, 2.0];
        let actuals = array![1.0, 2.0, 3.0];
        let result = metric.calculate(&predictions, &actuals);
        assert!(matches!(result, Err(MetricError::DimensionMismatch { expected: 2, actual: 3 })));
    }

    #[test]
    fn test_mae_invalid_numeric_value() {
        let metric = MeanAbsoluteError;
        let predictions = array![1.0, f64::NAN];
        let actuals = array![1.0, 2.0];
        let result = metric.calculate(&predictions, &actuals);
        assert!(matches!(result, Err(MetricError::InvalidNumericValue)));
    }

    #[test]
    fn test_mae_valid_computation() {
        let metric = MeanAbsoluteError;
        let predictions = array![1.0, 2.0, 3.0];
        let actuals = array![1.5, 1.0, 3.0];
        let mae = metric.calculate(&predictions, &actuals).unwrap();
        assert!((mae - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_r2_perfect_fit() {
        let metric = R2Score;
        let actuals = array![1.0, 2.0, 3.0];
        let r2 = metric.calculate(&actuals.clone(), &actuals).unwrap();
        assert!((r2 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_r2_mean_predictor_is_zero() {
        let metric = R2Score;
        let predictions = array![2.0, 2.0, 2.0];
        let actuals = array![1.0, 2.0, 3.0];
        let r2 = metric.calculate(&predictions, &actuals).unwrap();
        assert!(r2.abs() < 1e-12);
    }

    #[test]
    fn test_r2_valid_computation() {
        let metric = R2Score;
        let predictions = array![2.5, 0.0, 2.0, 8.0];
        let actuals = array![3.0, -0.5, 2.0, 7.0];
        let r2 = metric.calculate(&predictions, &actuals).unwrap();
        assert!((r2 - 0.948_608_137_044_967_9).abs() < 1e-9);
    }

    #[test]
    fn test_r2_constant_actuals() {
        let metric = R2Score;
        let actuals = array![4.0, 4.0];
        assert_eq!(metric.calculate(&array![4.0, 4.0], &actuals).unwrap(), 1.0);
        assert_eq!(metric.calculate(&array![3.0, 5.0], &actuals).unwrap(), 0.0);
    }
}
