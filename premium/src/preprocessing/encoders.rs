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

use std::collections::BTreeSet;

use log::debug;
use ndarray::Array2;

use crate::errors::PreprocessingError;

/// One-hot (indicator) encoder over several categorical columns.
///
/// Every observed category gets its own indicator column; no baseline
/// category is dropped. Vocabularies are sorted, which fixes the output
/// column order. A value outside the learned vocabulary encodes as all zeros
/// for its column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OneHotEncoder {
    categories: Option<Vec<Vec<String>>>,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        OneHotEncoder { categories: None }
    }

    /// Rebuilds a fitted encoder from stored vocabularies, which must be
    /// strictly increasing.
    pub fn from_categories(categories: Vec<Vec<String>>) -> Result<Self, PreprocessingError> {
        for (column, vocabulary) in categories.iter().enumerate() {
            if vocabulary.windows(2).any(|pair| pair[0] >= pair[1]) {
                return Err(PreprocessingError::InvalidVocabulary { column });
            }
        }
        Ok(OneHotEncoder { categories: Some(categories) })
    }

    /// Learns one vocabulary per column.
    ///
    /// # Parameters
    /// - `columns`: The values of each categorical column, one `Vec` per column.
    pub fn fit(&mut self, columns: &[Vec<&str>]) -> Result<(), PreprocessingError> {
        if columns.iter().any(|values| values.is_empty()) {
            return Err(PreprocessingError::EmptyInput);
        }
        let categories = columns
            .iter()
            .map(|values| {
                let distinct: BTreeSet<&str> = values.iter().copied().collect();
                distinct.into_iter().map(str::to_string).collect()
            })
            .collect();
        self.categories = Some(categories);
        Ok(())
    }

    /// Encodes rows of categorical values into an indicator matrix of shape
    /// `(rows.len(), n_features())`.
    pub fn transform(&self, rows: &[Vec<&str>]) -> Result<Array2<f64>, PreprocessingError> {
        let categories = self.categories()?;
        let width = self.n_features()?;
        let mut out = Array2::zeros((rows.len(), width));

        for (i, row) in rows.iter().enumerate() {
            if row.len() != categories.len() {
                return Err(PreprocessingError::DimensionMismatch {
                    expected: categories.len(),
                    actual: row.len(),
                });
            }
            let mut offset = 0;
            for (value, vocabulary) in row.iter().zip(categories) {
                match vocabulary.binary_search_by(|c| c.as_str().cmp(*value)) {
                    Ok(pos) => out[[i, offset + pos]] = 1.0,
                    Err(_) => debug!("Unseen category '{}' encoded as all zeros", value),
                }
                offset += vocabulary.len();
            }
        }
        Ok(out)
    }

    pub fn categories(&self) -> Result<&[Vec<String>], PreprocessingError> {
        self.categories.as_deref().ok_or(PreprocessingError::NotFitted)
    }

    pub fn n_features(&self) -> Result<usize, PreprocessingError> {
        Ok(self.categories()?.iter().map(Vec::len).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn fitted() -> OneHotEncoder {
        let mut encoder = OneHotEncoder::new();
        encoder
            .fit(&[vec!["male", "female", "male"], vec!["southwest", "southeast", "northwest"]])
            .unwrap();
        encoder
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let encoder = fitted();
        let categories = encoder.categories().unwrap();
        assert_eq!(categories[0], vec!["female", "male"]);
        assert_eq!(categories[1], vec!["northwest", "southeast", "southwest"]);
        assert_eq!(encoder.n_features().unwrap(), 5);
    }

    #[test]
    fn test_transform_sets_one_indicator_per_column() {
        let encoder = fitted();
        let out = encoder.transform(&[vec!["male", "southeast"], vec!["female", "northwest"]]).unwrap();
        assert_eq!(out, array![[0.0, 1.0, 0.0, 1.0, 0.0], [1.0, 0.0, 1.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_unseen_category_is_all_zero() {
        let encoder = fitted();
        let out = encoder.transform(&[vec!["male", "northcentral"]]).unwrap();
        assert_eq!(out, array![[0.0, 1.0, 0.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_single_category_keeps_one_indicator() {
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&[vec!["yes", "yes"]]).unwrap();
        assert_eq!(encoder.n_features().unwrap(), 1);
        assert_eq!(encoder.transform(&[vec!["yes"], vec!["no"]]).unwrap(), array![[1.0], [0.0]]);
    }

    #[test]
    fn test_from_categories_rejects_unsorted() {
        let result = OneHotEncoder::from_categories(vec![
            vec!["no".into(), "yes".into()],
            vec!["southwest".into(), "northeast".into()],
        ]);
        assert!(matches!(result, Err(PreprocessingError::InvalidVocabulary { column: 1 })));
    }

    #[test]
    fn test_not_fitted() {
        let encoder = OneHotEncoder::new();
        assert!(matches!(encoder.transform(&[vec!["a"]]), Err(PreprocessingError::NotFitted)));
    }

    #[test]
    fn test_row_width_mismatch() {
        let encoder = fitted();
        let result = encoder.transform(&[vec!["male"]]);
        assert!(matches!(
            result,
            Err(PreprocessingError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }
}
