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

use thiserror::Error;

use crate::data::{CsvError, DataError};

#[derive(Error, Debug)]
pub enum PreprocessingError {
    #[error("Transformer has not been fitted")]
    NotFitted,

    #[error("Input is empty")]
    EmptyInput,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Vocabulary of categorical column {column} is not sorted and distinct")]
    InvalidVocabulary { column: usize },

    #[error("Column '{0}' is declared more than once")]
    DuplicateColumn(String),

    #[error("Missing value for column '{column}' in record {row}")]
    MissingValue { column: String, row: usize },

    #[error("Invalid numeric value '{value}' for column '{column}' in record {row}")]
    InvalidNumeric { column: String, value: String, row: usize },
}

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model has not been fitted")]
    NotFitted,

    #[error("Input is empty")]
    EmptyInput,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Input contains NaN or infinite values")]
    InvalidNumericValue,

    #[error("Numerical instability detected while solving least squares")]
    NumericalInstability,

    #[error("Metric error: {0}")]
    Metric(#[from] MetricError),
}

#[derive(Error, Debug)]
pub enum MetricError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Input contains NaN or infinite values")]
    InvalidNumericValue,
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Pipeline has no target column")]
    MissingTarget,

    #[error("Target column '{0}' is also declared as a feature")]
    TargetIsFeature(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Preprocessing error: {0}")]
    Preprocessing(#[from] PreprocessingError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Unsupported model format version {found}, expected {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Saved pipeline is inconsistent: {0}")]
    Corrupt(String),
}

#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("Test ratio must lie strictly between 0 and 1, got {0}")]
    InvalidRatio(f64),

    #[error("Cannot split {n_rows} rows into non-empty train and test sets")]
    InsufficientRows { n_rows: usize },

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Metric error: {0}")]
    Metric(#[from] MetricError),
}

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}
