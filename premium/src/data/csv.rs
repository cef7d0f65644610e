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
use std::fs::{self, File};
use std::path::Path;

use log::{debug, error, info};

use super::error::CsvError;
use super::{Cell, Dataset};

/// Field values read as a missing cell, besides the empty field.
pub const NA_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn to_cell(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() || NA_TOKENS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Reads a headed CSV file into a [`Dataset`]. Empty fields and the markers in
/// [`NA_TOKENS`] become missing cells.
pub fn read_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset, CsvError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(file);

    let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
        return Err(CsvError::EmptyFile);
    }
    let mut seen = HashSet::new();
    for column in &columns {
        if !seen.insert(column.as_str()) {
            return Err(CsvError::DuplicateColumn(column.clone()));
        }
    }

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() != columns.len() {
            return Err(CsvError::InconsistentColumns {
                row: i + 1,
                actual: record.len(),
                expected: columns.len(),
            });
        }
        rows.push(record.iter().map(to_cell).collect());
    }
    debug!("Parsed {} rows from {:?}", rows.len(), path);

    Ok(Dataset { columns, rows })
}

/// Loads a dataset, reporting problems instead of returning them.
///
/// A missing file or malformed content is logged and yields `None`; the caller
/// treats that as "no data" and stops gracefully. On success the shape is
/// logged.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Option<Dataset> {
    let path = path.as_ref();
    if !path.exists() {
        error!("The file {:?} was not found", path);
        return None;
    }
    match read_dataset(path) {
        Ok(dataset) => {
            let (n_rows, n_cols) = dataset.shape();
            info!("Data loaded from {:?}, shape: ({}, {})", path, n_rows, n_cols);
            Some(dataset)
        }
        Err(e) => {
            error!("Error loading {:?}: {}", path, e);
            None
        }
    }
}

/// Writes a dataset with its header row. Missing cells are written as empty
/// fields. Parent directories are created when needed.
pub fn write_dataset<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<(), CsvError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(dataset.columns())?;
    for row in dataset.rows() {
        wtr.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }
    wtr.flush()?;
    debug!("Wrote {} rows to {:?}", dataset.n_rows(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes()).expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_read_headers_and_rows() {
        let temp_file = create_temp_csv(
            "age,sex,bmi,children,smoker,region,charges\n\
             19,female,27.9,0,yes,southwest,16884.924\n\
             18,male,33.77,1,no,southeast,1725.5523\n",
        );

        let ds = read_dataset(temp_file.path()).expect("Failed to load CSV");

        assert_eq!(ds.shape(), (2, 7));
        assert_eq!(ds.columns()[6], "charges");
        assert_eq!(ds.column("region").unwrap(), vec![Some("southwest"), Some("southeast")]);
    }

    #[test]
    fn test_read_empty_fields_are_missing() {
        let temp_file = create_temp_csv("age,sex\n19,\n,male\n");
        let ds = read_dataset(temp_file.path()).expect("Failed to load CSV");
        assert_eq!(ds.column("sex").unwrap(), vec![None, Some("male")]);
        assert_eq!(ds.column("age").unwrap(), vec![Some("19"), None]);
    }

    #[test]
    fn test_read_na_markers_are_missing() {
        let temp_file = create_temp_csv("age,bmi,region\n56,NA,southeast\nnan,N/A,NULL\n19,27.9,#N/A\n");

        let ds = read_dataset(temp_file.path()).expect("Failed to load CSV");

        assert_eq!(ds.column("age").unwrap(), vec![Some("56"), None, Some("19")]);
        assert_eq!(ds.column("bmi").unwrap(), vec![None, None, Some("27.9")]);
        assert_eq!(ds.column("region").unwrap(), vec![Some("southeast"), None, None]);
    }

    #[test]
    fn test_na_like_words_are_kept() {
        let temp_file = create_temp_csv("region\nNAN\nnorthcentral\nNa\n");
        let ds = read_dataset(temp_file.path()).expect("Failed to load CSV");
        assert_eq!(ds.column("region").unwrap(), vec![Some("NAN"), Some("northcentral"), Some("Na")]);
    }

    #[test]
    fn test_read_empty_file() {
        let temp_file = create_temp_csv("");
        let result = read_dataset(temp_file.path());
        assert!(matches!(result, Err(CsvError::EmptyFile)), "Unexpected result: {:?}", result);
    }

    #[test]
    fn test_read_inconsistent_column_count() {
        let temp_file = create_temp_csv("a,b\n1,2\n3,4,5\n");
        let result = read_dataset(temp_file.path());
        assert!(matches!(
            result,
            Err(CsvError::InconsistentColumns { row: 2, actual: 3, expected: 2 })
        ));
    }

    #[test]
    fn test_read_duplicate_header() {
        let temp_file = create_temp_csv("a,a\n1,2\n");
        let result = read_dataset(temp_file.path());
        assert!(matches!(result, Err(CsvError::DuplicateColumn(name)) if name == "a"));
    }

    #[test]
    fn test_load_missing_file_is_absent() {
        let dir = tempdir().unwrap();
        assert!(load_dataset(dir.path().join("nonexistent.csv")).is_none());
    }

    #[test]
    fn test_load_malformed_file_is_absent() {
        let temp_file = create_temp_csv("a,b\n1,2\n3\n");
        assert!(load_dataset(temp_file.path()).is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let ds = Dataset::new(
            vec!["age".into(), "sex".into()],
            vec![vec![Some("19".into()), None], vec![Some("18".into()), Some("male".into())]],
        )
        .unwrap();

        write_dataset(&ds, &path).expect("Failed to write CSV");
        let loaded = read_dataset(&path).expect("Failed to read CSV back");

        assert_eq!(loaded, ds);
    }
}
