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

//! Versioned JSON storage for fitted pipelines.
//!
//! The file holds everything prediction needs (scaler statistics, category
//! vocabularies, model coefficients) and nothing from the training data.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::info;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::algorithms::LinearRegression;
use crate::errors::PersistenceError;
use crate::pipeline::FittedPipeline;
use crate::preprocessing::{FeatureTransformer, OneHotEncoder, StandardScaler};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    pub format_version: u32,
    pub target: String,
    pub transformer: TransformerState,
    pub model: ModelState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerState {
    pub numeric: Vec<NumericColumnState>,
    pub categorical: Vec<CategoricalColumnState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericColumnState {
    pub name: String,
    pub mean: f64,
    pub std: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalColumnState {
    pub name: String,
    pub vocabulary: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelState {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl PipelineState {
    /// Captures the learned state of a fitted pipeline.
    pub fn capture(pipeline: &FittedPipeline) -> Result<Self, PersistenceError> {
        let transformer = pipeline.transformer();
        let (mean, std) = transformer.scaler().params().map_err(corrupt)?;
        let vocabularies = transformer.encoder().categories().map_err(corrupt)?;
        let coefficients = pipeline.model().coefficients().map_err(corrupt)?;

        let numeric = transformer
            .numeric_columns()
            .iter()
            .zip(mean.iter().zip(std.iter()))
            .map(|(name, (&mean, &std))| NumericColumnState { name: name.clone(), mean, std })
            .collect();
        let categorical = transformer
            .categorical_columns()
            .iter()
            .zip(vocabularies)
            .map(|(name, vocabulary)| CategoricalColumnState {
                name: name.clone(),
                vocabulary: vocabulary.clone(),
            })
            .collect();

        Ok(PipelineState {
            format_version: FORMAT_VERSION,
            target: pipeline.target().to_string(),
            transformer: TransformerState { numeric, categorical },
            model: ModelState {
                intercept: pipeline.intercept(),
                coefficients: coefficients.to_vec(),
            },
        })
    }

    /// Rebuilds a fitted pipeline, rejecting state that could not have come
    /// from a fit.
    pub fn restore(self) -> Result<FittedPipeline, PersistenceError> {
        if self.format_version != FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: self.format_version,
                supported: FORMAT_VERSION,
            });
        }

        let TransformerState { numeric, categorical } = self.transformer;
        if let Some(column) =
            numeric.iter().find(|c| !c.mean.is_finite() || !c.std.is_finite() || c.std <= 0.0)
        {
            return Err(PersistenceError::Corrupt(format!(
                "column '{}' has mean {} and std {}",
                column.name, column.mean, column.std
            )));
        }
        if numeric.iter().map(|c| &c.name).chain(categorical.iter().map(|c| &c.name)).any(|name| {
            *name == self.target
        }) {
            return Err(PersistenceError::Corrupt(format!(
                "target '{}' is also a feature",
                self.target
            )));
        }

        let expected = numeric.len() + categorical.iter().map(|c| c.vocabulary.len()).sum::<usize>();
        if self.model.coefficients.len() != expected {
            return Err(PersistenceError::Corrupt(format!(
                "{} coefficients for {} features",
                self.model.coefficients.len(),
                expected
            )));
        }

        let scaler = StandardScaler::from_params(
            numeric.iter().map(|c| c.mean).collect(),
            numeric.iter().map(|c| c.std).collect(),
        )
        .map_err(corrupt)?;
        let (categorical_names, vocabularies): (Vec<String>, Vec<Vec<String>>) =
            categorical.into_iter().map(|c| (c.name, c.vocabulary)).unzip();
        let encoder = OneHotEncoder::from_categories(vocabularies).map_err(corrupt)?;
        let transformer = FeatureTransformer::from_fitted(
            numeric.into_iter().map(|c| c.name).collect(),
            categorical_names,
            scaler,
            encoder,
        )
        .map_err(corrupt)?;

        let model = LinearRegression::from_params(
            Array1::from_vec(self.model.coefficients),
            self.model.intercept,
        )
        .map_err(corrupt)?;

        Ok(FittedPipeline::from_parts(self.target, transformer, model))
    }
}

fn corrupt<E: std::fmt::Display>(error: E) -> PersistenceError {
    PersistenceError::Corrupt(error.to_string())
}

/// Writes the pipeline as pretty-printed JSON, creating parent directories.
pub fn save_pipeline<P: AsRef<Path>>(
    pipeline: &FittedPipeline,
    path: P,
) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    let state = PipelineState::capture(pipeline)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &state)?;
    writer.flush()?;

    info!("Model saved to {}", path.display());
    Ok(())
}

/// Reads a pipeline written by [`save_pipeline`].
///
/// The format version is checked before the rest of the document is
/// interpreted, so a file from a newer layout reports
/// `PersistenceError::UnsupportedVersion` rather than a parse error.
pub fn load_pipeline<P: AsRef<Path>>(path: P) -> Result<FittedPipeline, PersistenceError> {
    let path = path.as_ref();
    let document: serde_json::Value = serde_json::from_reader(BufReader::new(File::open(path)?))?;

    let found = document
        .get("format_version")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| PersistenceError::Corrupt("missing format_version".into()))?;
    if found != u64::from(FORMAT_VERSION) {
        return Err(PersistenceError::UnsupportedVersion {
            found: u32::try_from(found).unwrap_or(u32::MAX),
            supported: FORMAT_VERSION,
        });
    }

    let pipeline = serde_json::from_value::<PipelineState>(document)?.restore()?;
    info!("Model loaded from {}", path.display());
    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Dataset, Record};
    use crate::pipeline::Pipeline;
    use tempfile::tempdir;

    fn fitted_pipeline() -> FittedPipeline {
        let columns = ["age", "sex", "bmi", "children", "smoker", "region", "charges"];
        let rows = [
            ["19", "female", "27.9", "0", "yes", "southwest", "16884.924"],
            ["18", "male", "33.77", "1", "no", "southeast", "1725.5523"],
            ["28", "male", "33", "3", "no", "southeast", "4449.462"],
            ["33", "male", "22.705", "0", "no", "northwest", "21984.47061"],
            ["32", "male", "28.88", "0", "no", "northwest", "3866.8552"],
            ["31", "female", "25.74", "0", "no", "southeast", "3756.6216"],
            ["46", "female", "33.44", "1", "no", "southeast", "8240.5896"],
        ];
        let dataset = Dataset::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter().map(|row| row.iter().map(|v| Some(v.to_string())).collect()).collect(),
        )
        .unwrap();
        Pipeline::builder()
            .numeric(["age", "bmi", "children"])
            .categorical(["sex", "smoker", "region"])
            .target("charges")
            .build()
            .fit(&dataset)
            .unwrap()
    }

    fn queries() -> Vec<Record> {
        ["southwest", "northwest", "northcentral"]
            .iter()
            .map(|region| {
                Record::new()
                    .with("age", 30)
                    .with("sex", "male")
                    .with("bmi", 30.5)
                    .with("children", 0)
                    .with("smoker", "yes")
                    .with("region", region)
            })
            .collect()
    }

    #[test]
    fn test_round_trip_predicts_identically() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("models").join("insurance_model.json");
        let fitted = fitted_pipeline();

        save_pipeline(&fitted, &path).unwrap();
        let loaded = load_pipeline(&path).unwrap();

        assert_eq!(loaded, fitted);
        assert_eq!(loaded.predict(&queries()).unwrap(), fitted.predict(&queries()).unwrap());
    }

    #[test]
    fn test_saved_state_has_no_training_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        fitted_pipeline().save(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let state: PipelineState = serde_json::from_str(&text).unwrap();

        assert_eq!(state.format_version, FORMAT_VERSION);
        assert_eq!(state.target, "charges");
        assert_eq!(state.transformer.numeric.len(), 3);
        assert_eq!(state.transformer.categorical[2].vocabulary, vec![
            "northwest",
            "southeast",
            "southwest"
        ]);
        assert_eq!(state.model.coefficients.len(), 10);
        assert!(!text.contains("16884.924"));
    }

    #[test]
    fn test_unsupported_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut state = PipelineState::capture(&fitted_pipeline()).unwrap();
        state.format_version = 2;
        fs::write(&path, serde_json::to_string(&state).unwrap()).unwrap();

        let result = load_pipeline(&path);

        assert!(matches!(
            result,
            Err(PersistenceError::UnsupportedVersion { found: 2, supported: FORMAT_VERSION })
        ));
    }

    #[test]
    fn test_coefficient_count_mismatch_is_corrupt() {
        let mut state = PipelineState::capture(&fitted_pipeline()).unwrap();
        state.model.coefficients.pop();
        assert!(matches!(state.restore(), Err(PersistenceError::Corrupt(_))));
    }

    #[test]
    fn test_zero_std_is_corrupt() {
        let mut state = PipelineState::capture(&fitted_pipeline()).unwrap();
        state.transformer.numeric[1].std = 0.0;
        assert!(matches!(state.restore(), Err(PersistenceError::Corrupt(_))));
    }

    #[test]
    fn test_unsorted_vocabulary_is_corrupt() {
        let mut state = PipelineState::capture(&fitted_pipeline()).unwrap();
        state.transformer.categorical[0].vocabulary.reverse();
        assert!(matches!(state.restore(), Err(PersistenceError::Corrupt(_))));
    }

    #[test]
    fn test_malformed_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_pipeline(&path), Err(PersistenceError::Serde(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = load_pipeline(dir.path().join("absent.json"));
        assert!(matches!(result, Err(PersistenceError::Io(_))));
    }
}
