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

use crate::errors::PreprocessingError;

/// Standardizes columns to zero mean and unit variance.
///
/// Statistics are learned by [`StandardScaler::fit`] and replayed unchanged by
/// [`StandardScaler::transform`]. The standard deviation is the population one
/// (ddof = 0). A constant column gets a standard deviation of 1, so its
/// training values map to 0 rather than NaN.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    std: Option<Array1<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        StandardScaler { mean: None, std: None }
    }

    /// Rebuilds a fitted scaler from stored statistics.
    pub fn from_params(mean: Array1<f64>, std: Array1<f64>) -> Result<Self, PreprocessingError> {
        if mean.len() != std.len() {
            return Err(PreprocessingError::DimensionMismatch {
                expected: mean.len(),
                actual: std.len(),
            });
        }
        Ok(StandardScaler { mean: Some(mean), std: Some(std) })
    }

    pub fn fit(&mut self, x: &Array2<f64>) -> Result<(), PreprocessingError> {
        if x.nrows() == 0 {
            return Err(PreprocessingError::EmptyInput);
        }
        let mean = x.mean_axis(Axis(0)).ok_or(PreprocessingError::EmptyInput)?;
        let std = x.std_axis(Axis(0), 0.0);
        self.mean = Some(mean);
        self.std = Some(std.mapv(|s| if s == 0.0 || !s.is_finite() { 1.0 } else { s }));
        Ok(())
    }

    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, PreprocessingError> {
        let (mean, std) = self.params()?;
        if x.ncols() != mean.len() {
            return Err(PreprocessingError::DimensionMismatch {
                expected: mean.len(),
                actual: x.ncols(),
            });
        }
        Ok((x - mean) / std)
    }

    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>, PreprocessingError> {
        self.fit(x)?;
        self.transform(x)
    }

    /// Returns the learned `(mean, std)` pair.
    pub fn params(&self) -> Result<(&Array1<f64>, &Array1<f64>), PreprocessingError> {
        match (&self.mean, &self.std) {
            (Some(mean), Some(std)) => Ok((mean, std)),
            _ => Err(PreprocessingError::NotFitted),
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.mean.is_some() && self.std.is_some()
    }
}
