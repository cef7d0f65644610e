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

pub mod csv;
pub mod error;

pub use csv::{load_dataset, read_dataset, write_dataset};
pub use error::{CsvError, DataError};

use std::fmt;

use ndarray::Array1;

/// A single table cell. `None` marks a missing value (an empty CSV field).
pub type Cell = Option<String>;

/// An in-memory table of raw string cells with a fixed, ordered header.
///
/// `Dataset` keeps values exactly as read from disk; numeric parsing happens
/// later, in the feature transformer or in [`Dataset::target`]. Every row is
/// guaranteed to be as wide as the header.
///
/// # Notes
/// - Row order is significant: the cleaner keeps first occurrences and the
///   train/test split shuffles row indices, both relying on a stable order.
/// - Column names are unique; [`Dataset::new`] does not check this, the CSV
///   reader does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Creates a dataset from a header and rows of cells.
    ///
    /// # Parameters
    /// - `columns`: The column names, in order.
    /// - `rows`: The rows, each holding one cell per column.
    ///
    /// # Returns
    /// A `Result` containing the dataset, or `DataError::InconsistentColumns`
    /// if a row width differs from the header width. Rows are numbered from 1.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, DataError> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(DataError::InconsistentColumns {
                    row: i + 1,
                    actual: row.len(),
                    expected: columns.len(),
                });
            }
        }
        Ok(Dataset { columns, rows })
    }

    // Callers guarantee every row is as wide as `columns`.
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Dataset { columns, rows }
    }

    /// Builds a dataset with the given header from records.
    ///
    /// A record field that is not in `columns` is ignored; a column the record
    /// does not carry becomes a missing cell.
    pub fn from_records(columns: Vec<String>, records: &[Record]) -> Self {
        let rows = records
            .iter()
            .map(|record| {
                columns.iter().map(|column| record.get(column).map(str::to_string)).collect()
            })
            .collect();
        Dataset { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Cell>>) {
        (self.columns, self.rows)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Returns `(n_rows, n_cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns the cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Result<Vec<Option<&str>>, DataError> {
        let idx = self.column_index(name).ok_or_else(|| DataError::UnknownColumn(name.into()))?;
        Ok(self.rows.iter().map(|row| row[idx].as_deref()).collect())
    }

    /// Returns a new dataset holding the rows at `indices`, in that order.
    ///
    /// # Panics
    /// Panics if an index is out of bounds, like slice indexing does.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// Converts every row into a [`Record`]. Missing cells are left out of the
    /// record.
    pub fn records(&self) -> Vec<Record> {
        self.rows
            .iter()
            .map(|row| {
                let mut record = Record::new();
                for (column, cell) in self.columns.iter().zip(row) {
                    if let Some(value) = cell {
                        record.set(column, value);
                    }
                }
                record
            })
            .collect()
    }

    /// Parses a column as the regression target.
    ///
    /// # Parameters
    /// - `name`: The target column name.
    ///
    /// # Returns
    /// A `Result` containing an `Array1<f64>` of length `n_rows`, or a
    /// `DataError` naming the first missing or unparseable value (rows
    /// numbered from 1).
    pub fn target(&self, name: &str) -> Result<Array1<f64>, DataError> {
        let cells = self.column(name)?;
        let mut values = Vec::with_capacity(cells.len());
        for (i, cell) in cells.into_iter().enumerate() {
            let raw = cell
                .ok_or_else(|| DataError::MissingTarget { column: name.into(), row: i + 1 })?;
            let value = raw.trim().parse::<f64>().map_err(|e| DataError::InvalidTarget {
                column: name.into(),
                value: raw.to_string(),
                row: i + 1,
                source: e,
            })?;
            values.push(value);
        }
        Ok(Array1::from_vec(values))
    }
}

/// One raw input row: column name to string value, in insertion order.
///
/// Records are what callers hand to a fitted pipeline at inference time. The
/// values stay untyped; `"30"` and `"male"` are both plain strings until the
/// feature transformer interprets them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Record { fields: Vec::new() }
    }

    /// Sets a field and returns the record, for fluent construction.
    pub fn with(mut self, column: &str, value: impl ToString) -> Self {
        self.set(column, value);
        self
    }

    /// Sets a field, replacing an existing value for the same column.
    pub fn set(&mut self, column: &str, value: impl ToString) {
        let value = value.to_string();
        match self.fields.iter_mut().find(|(name, _)| name == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column.to_string(), value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.iter().find(|(name, _)| name == column).map(|(_, value)| value.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> =
            self.fields.iter().map(|(name, value)| format!("{}={}", name, value)).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn cells(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| if v.is_empty() { None } else { Some(v.to_string()) }).collect()
    }

    fn sample() -> Dataset {
        Dataset::new(
            vec!["age".into(), "sex".into(), "charges".into()],
            vec![cells(&["19", "female", "16884.92"]), cells(&["18", "", "1725.55"])],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let result = Dataset::new(vec!["a".into(), "b".into()], vec![cells(&["1", "2"]), cells(&["3"])]);
        assert!(matches!(
            result,
            Err(DataError::InconsistentColumns { row: 2, actual: 1, expected: 2 })
        ));
    }

    #[test]
    fn test_shape_and_column() {
        let ds = sample();
        assert_eq!(ds.shape(), (2, 3));
        assert_eq!(ds.column("sex").unwrap(), vec![Some("female"), None]);
        assert!(matches!(ds.column("bmi"), Err(DataError::UnknownColumn(name)) if name == "bmi"));
    }

    #[test]
    fn test_select_keeps_given_order() {
        let ds = sample();
        let picked = ds.select(&[1, 0]);
        assert_eq!(picked.column("age").unwrap(), vec![Some("18"), Some("19")]);
    }

    #[test]
    fn test_records_skip_missing_cells() {
        let records = sample().records();
        assert_eq!(records[0].get("sex"), Some("female"));
        assert_eq!(records[1].get("sex"), None);
        assert_eq!(records[1].get("age"), Some("18"));
    }

    #[test]
    fn test_from_records_round_trip() {
        let ds = sample();
        let rebuilt = Dataset::from_records(ds.columns().to_vec(), &ds.records());
        assert_eq!(rebuilt, ds);
    }

    #[test]
    fn test_target_parses_floats() {
        let target = sample().target("charges").unwrap();
        assert_eq!(target, array![16884.92, 1725.55]);
    }

    #[test]
    fn test_target_reports_bad_values() {
        let ds = Dataset::new(vec!["y".into()], vec![cells(&["1.5"]), cells(&["oops"]), cells(&[""])])
            .unwrap();
        assert!(matches!(ds.target("y"), Err(DataError::InvalidTarget { row: 2, .. })));

        let ds = Dataset::new(vec!["y".into()], vec![cells(&["1.5"]), cells(&[""])]).unwrap();
        assert!(matches!(ds.target("y"), Err(DataError::MissingTarget { row: 2, .. })));
    }

    #[test]
    fn test_record_set_replaces_and_displays_in_order() {
        let mut record = Record::new().with("age", 30).with("sex", "male");
        record.set("age", 31);
        assert_eq!(record.get("age"), Some("31"));
        assert_eq!(record.len(), 2);
        assert_eq!(record.to_string(), "{age=31, sex=male}");
    }
}
