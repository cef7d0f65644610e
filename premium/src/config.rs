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

use std::path::{Path, PathBuf};

use crate::pipeline::Pipeline;

/// Paths and column roles shared by the cleaning, training and inference
/// stages.
///
/// `WorkflowConfig::default()` describes the insurance layout: raw data in
/// `data/insurance.csv`, cleaned data in `data/insurance_cleaned.csv` and the
/// model in `models/insurance_model.json`, all relative to the working
/// directory.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowConfig {
    raw_data_path: PathBuf,
    cleaned_data_path: PathBuf,
    model_path: PathBuf,
    numeric_columns: Vec<String>,
    categorical_columns: Vec<String>,
    target_column: String,
    test_ratio: f64,
    seed: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        WorkflowConfig::new(
            "data/insurance.csv",
            "data/insurance_cleaned.csv",
            "models/insurance_model.json",
        )
    }
}

impl WorkflowConfig {
    pub fn new<P: Into<PathBuf>>(raw_data_path: P, cleaned_data_path: P, model_path: P) -> Self {
        WorkflowConfig {
            raw_data_path: raw_data_path.into(),
            cleaned_data_path: cleaned_data_path.into(),
            model_path: model_path.into(),
            numeric_columns: ["age", "bmi", "children"].map(String::from).to_vec(),
            categorical_columns: ["sex", "smoker", "region"].map(String::from).to_vec(),
            target_column: "charges".to_string(),
            test_ratio: 0.2,
            seed: 42,
        }
    }

    /// Resolves the three default file names under `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let defaults = WorkflowConfig::default();
        WorkflowConfig::new(
            dir.join(defaults.raw_data_path),
            dir.join(defaults.cleaned_data_path),
            dir.join(defaults.model_path),
        )
    }

    pub fn with_raw_data_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.raw_data_path = path.into();
        self
    }

    pub fn with_cleaned_data_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.cleaned_data_path = path.into();
        self
    }

    pub fn with_model_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn with_numeric_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categorical_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_target_column(mut self, column: impl Into<String>) -> Self {
        self.target_column = column.into();
        self
    }

    /// Fraction of rows held out for evaluation, kept strictly inside (0, 1).
    pub fn with_test_ratio(mut self, ratio: f64) -> Self {
        self.test_ratio = ratio.clamp(0.01, 0.99);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn raw_data_path(&self) -> &Path {
        &self.raw_data_path
    }

    pub fn cleaned_data_path(&self) -> &Path {
        &self.cleaned_data_path
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Where a pickled model of the same name would sit. Such files are not
    /// readable here; the model is stored as JSON at [`Self::model_path`].
    pub fn pickled_model_path(&self) -> PathBuf {
        self.model_path.with_extension("pkl")
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    pub fn categorical_columns(&self) -> &[String] {
        &self.categorical_columns
    }

    pub fn target_column(&self) -> &str {
        &self.target_column
    }

    pub fn test_ratio(&self) -> f64 {
        self.test_ratio
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// An unfitted pipeline over the configured columns.
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::builder()
            .numeric(self.numeric_columns.iter().cloned())
            .categorical(self.categorical_columns.iter().cloned())
            .target(self.target_column.clone())
            .build()
    }
}
