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

use std::collections::HashSet;

use ndarray::{Array2, s};

use super::encoders::OneHotEncoder;
use super::scalers::StandardScaler;
use crate::data::Record;
use crate::errors::PreprocessingError;

/// Maps raw records to feature vectors.
///
/// Numeric columns are standardized and come first, in declared order. Each
/// categorical column follows, in declared order, as one indicator per
/// vocabulary entry. The same learned state is used for training rows and for
/// records scored later, so both sides see identical encodings.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTransformer {
    numeric: Vec<String>,
    categorical: Vec<String>,
    scaler: StandardScaler,
    encoder: OneHotEncoder,
}

impl FeatureTransformer {
    /// Creates an unfitted transformer. Column names must be distinct across
    /// both lists.
    pub fn new(numeric: Vec<String>, categorical: Vec<String>) -> Result<Self, PreprocessingError> {
        let mut seen = HashSet::new();
        for column in numeric.iter().chain(&categorical) {
            if !seen.insert(column.as_str()) {
                return Err(PreprocessingError::DuplicateColumn(column.clone()));
            }
        }
        Ok(FeatureTransformer {
            numeric,
            categorical,
            scaler: StandardScaler::new(),
            encoder: OneHotEncoder::new(),
        })
    }

    /// Rebuilds a fitted transformer from already-fitted parts.
    pub fn from_fitted(
        numeric: Vec<String>,
        categorical: Vec<String>,
        scaler: StandardScaler,
        encoder: OneHotEncoder,
    ) -> Result<Self, PreprocessingError> {
        let (mean, _) = scaler.params()?;
        if mean.len() != numeric.len() {
            return Err(PreprocessingError::DimensionMismatch {
                expected: numeric.len(),
                actual: mean.len(),
            });
        }
        let n_vocabularies = encoder.categories()?.len();
        if n_vocabularies != categorical.len() {
            return Err(PreprocessingError::DimensionMismatch {
                expected: categorical.len(),
                actual: n_vocabularies,
            });
        }
        let mut transformer = FeatureTransformer::new(numeric, categorical)?;
        transformer.scaler = scaler;
        transformer.encoder = encoder;
        Ok(transformer)
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric
    }

    pub fn categorical_columns(&self) -> &[String] {
        &self.categorical
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    pub fn is_fitted(&self) -> bool {
        self.scaler.is_fitted() && self.encoder.categories().is_ok()
    }

    pub fn fit(&mut self, records: &[Record]) -> Result<(), PreprocessingError> {
        if records.is_empty() {
            return Err(PreprocessingError::EmptyInput);
        }
        let numeric = self.numeric_matrix(records)?;
        let categorical = self.categorical_rows(records)?;

        let mut columns: Vec<Vec<&str>> =
            vec![Vec::with_capacity(records.len()); self.categorical.len()];
        for row in &categorical {
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(*value);
            }
        }

        self.scaler.fit(&numeric)?;
        self.encoder.fit(&columns)?;
        Ok(())
    }

    /// Encodes records into a matrix of shape `(records.len(), n_features())`.
    pub fn transform(&self, records: &[Record]) -> Result<Array2<f64>, PreprocessingError> {
        let n_numeric = self.numeric.len();
        let width = self.n_features()?;

        let scaled = self.scaler.transform(&self.numeric_matrix(records)?)?;
        let indicators = self.encoder.transform(&self.categorical_rows(records)?)?;

        let mut out = Array2::zeros((records.len(), width));
        out.slice_mut(s![.., ..n_numeric]).assign(&scaled);
        out.slice_mut(s![.., n_numeric..]).assign(&indicators);
        Ok(out)
    }

    pub fn fit_transform(&mut self, records: &[Record]) -> Result<Array2<f64>, PreprocessingError> {
        self.fit(records)?;
        self.transform(records)
    }

    pub fn n_features(&self) -> Result<usize, PreprocessingError> {
        Ok(self.numeric.len() + self.encoder.n_features()?)
    }

    /// Output column names: numeric names as-is, indicators as `column_category`.
    pub fn feature_names(&self) -> Result<Vec<String>, PreprocessingError> {
        let mut names = self.numeric.clone();
        for (column, vocabulary) in self.categorical.iter().zip(self.encoder.categories()?) {
            names.extend(vocabulary.iter().map(|category| format!("{}_{}", column, category)));
        }
        Ok(names)
    }

    fn numeric_matrix(&self, records: &[Record]) -> Result<Array2<f64>, PreprocessingError> {
        let mut out = Array2::zeros((records.len(), self.numeric.len()));
        for (i, record) in records.iter().enumerate() {
            for (j, column) in self.numeric.iter().enumerate() {
                let raw = record.get(column).ok_or_else(|| PreprocessingError::MissingValue {
                    column: column.clone(),
                    row: i + 1,
                })?;
                let value = raw.trim().parse::<f64>().ok().filter(|v| v.is_finite()).ok_or_else(
                    || PreprocessingError::InvalidNumeric {
                        column: column.clone(),
                        value: raw.to_string(),
                        row: i + 1,
                    },
                )?;
                out[[i, j]] = value;
            }
        }
        Ok(out)
    }

    fn categorical_rows<'a>(
        &self,
        records: &'a [Record],
    ) -> Result<Vec<Vec<&'a str>>, PreprocessingError> {
        records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                self.categorical
                    .iter()
                    .map(|column| {
                        record.get(column).ok_or_else(|| PreprocessingError::MissingValue {
                            column: column.clone(),
                            row: i + 1,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Axis, array};

    fn insurance_transformer() -> FeatureTransformer {
        FeatureTransformer::new(
            vec!["age".into(), "bmi".into(), "children".into()],
            vec!["sex".into(), "smoker".into(), "region".into()],
        )
        .unwrap()
    }

    fn person(age: u32, sex: &str, bmi: f64, children: u32, smoker: &str, region: &str) -> Record {
        Record::new()
            .with("age", age)
            .with("sex", sex)
            .with("bmi", bmi)
            .with("children", children)
            .with("smoker", smoker)
            .with("region", region)
    }

    fn training_records() -> Vec<Record> {
        vec![
            person(19, "female", 27.9, 0, "yes", "southwest"),
            person(18, "male", 33.77, 1, "no", "southeast"),
            person(28, "male", 33.0, 3, "no", "southeast"),
            person(33, "male", 22.705, 0, "no", "northwest"),
            person(32, "male", 28.88, 0, "no", "northwest"),
            person(31, "female", 25.74, 0, "no", "southeast"),
        ]
    }

    #[test]
    fn test_feature_names_and_width() {
        let mut transformer = insurance_transformer();
        transformer.fit(&training_records()).unwrap();

        assert_eq!(transformer.feature_names().unwrap(), vec![
            "age",
            "bmi",
            "children",
            "sex_female",
            "sex_male",
            "smoker_no",
            "smoker_yes",
            "region_northwest",
            "region_southeast",
            "region_southwest",
        ]);
        assert_eq!(transformer.n_features().unwrap(), 10);
    }

    #[test]
    fn test_numeric_columns_are_standardized() {
        let mut transformer = insurance_transformer();
        let x = transformer.fit_transform(&training_records()).unwrap();
        let numeric = x.slice(s![.., ..3]);

        let mean = numeric.mean_axis(Axis(0)).unwrap();
        let std = numeric.std_axis(Axis(0), 0.0);
        for &m in mean.iter() {
            assert!(m.abs() < 1e-10, "Mean should be ~0, got {}", m);
        }
        for &s in std.iter() {
            assert!((s - 1.0).abs() < 1e-10, "Std should be ~1, got {}", s);
        }
    }

    #[test]
    fn test_indicator_block_has_one_hot_per_column() {
        let mut transformer = insurance_transformer();
        let x = transformer.fit_transform(&training_records()).unwrap();

        assert_eq!(x.row(0).slice(s![3..]), array![1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        for row in x.rows() {
            assert_eq!(row.slice(s![3..]).sum(), 3.0);
        }
    }

    #[test]
    fn test_unseen_region_encodes_to_zero() {
        let mut transformer = insurance_transformer();
        transformer.fit(&training_records()).unwrap();

        let x = transformer.transform(&[person(30, "male", 30.5, 0, "yes", "northcentral")]).unwrap();

        assert_eq!(x.row(0).slice(s![7..]), array![0.0, 0.0, 0.0]);
        assert_eq!(x.row(0).slice(s![3..7]), array![0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_transform_is_deterministic() {
        let mut transformer = insurance_transformer();
        transformer.fit(&training_records()).unwrap();
        let record = [person(45, "female", 31.2, 2, "no", "northwest")];
        assert_eq!(transformer.transform(&record).unwrap(), transformer.transform(&record).unwrap());
    }

    #[test]
    fn test_missing_value_is_reported() {
        let mut transformer = insurance_transformer();
        transformer.fit(&training_records()).unwrap();
        let incomplete = Record::new().with("age", 30).with("bmi", 30.5).with("children", 0);

        let result = transformer.transform(&[incomplete]);

        assert!(matches!(
            result,
            Err(PreprocessingError::MissingValue { column, row: 1 }) if column == "sex"
        ));
    }

    #[test]
    fn test_invalid_numeric_is_reported() {
        let mut transformer = insurance_transformer();
        let mut records = training_records();
        records[1].set("bmi", "heavy");

        let result = transformer.fit(&records);

        assert!(matches!(
            result,
            Err(PreprocessingError::InvalidNumeric { column, row: 2, .. }) if column == "bmi"
        ));
    }

    #[test]
    fn test_not_fitted() {
        let transformer = insurance_transformer();
        let result = transformer.transform(&training_records());
        assert!(matches!(result, Err(PreprocessingError::NotFitted)));
    }

    #[test]
    fn test_duplicate_declaration() {
        let result = FeatureTransformer::new(vec!["age".into()], vec!["age".into()]);
        assert!(matches!(result, Err(PreprocessingError::DuplicateColumn(name)) if name == "age"));
    }

    #[test]
    fn test_empty_fit() {
        let mut transformer = insurance_transformer();
        assert!(matches!(transformer.fit(&[]), Err(PreprocessingError::EmptyInput)));
    }
}
