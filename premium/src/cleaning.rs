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

use log::{info, warn};

use crate::data::{Cell, Dataset};

/// Value written into every missing cell, numeric and categorical columns alike.
pub const MISSING_FILL_VALUE: &str = "0";

/// Counts collected while cleaning, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleaningReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns: usize,
    pub duplicates_removed: usize,
    pub missing_filled: usize,
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Missing,
    Number(u64),
    Text(&'a str),
}

fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| !v.is_nan())
}

// A column compares by value when every present cell in it parses as a number,
// so `27` and `27.0` are the same cell there.
fn numeric_columns(rows: &[Vec<Cell>]) -> Vec<bool> {
    let width = rows.first().map_or(0, Vec::len);
    (0..width)
        .map(|j| rows.iter().all(|row| row[j].as_deref().is_none_or(|v| parse_number(v).is_some())))
        .collect()
}

fn row_key<'a>(row: &'a [Cell], numeric: &[bool]) -> Vec<CellKey<'a>> {
    row.iter()
        .zip(numeric)
        .map(|(cell, &is_numeric)| match cell.as_deref() {
            None => CellKey::Missing,
            Some(value) => match parse_number(value).filter(|_| is_numeric) {
                // -0.0 and 0.0 are equal
                Some(number) => CellKey::Number((number + 0.0).to_bits()),
                None => CellKey::Text(value),
            },
        })
        .collect()
}

fn drop_duplicates(rows: Vec<Vec<Cell>>) -> (Vec<Vec<Cell>>, usize) {
    let before = rows.len();
    let numeric = numeric_columns(&rows);
    let mut seen = HashSet::with_capacity(before);
    let keep: Vec<bool> = rows.iter().map(|row| seen.insert(row_key(row, &numeric))).collect();
    drop(seen);

    let unique: Vec<Vec<Cell>> =
        rows.into_iter().zip(keep).filter_map(|(row, kept)| kept.then_some(row)).collect();
    let removed = before - unique.len();
    (unique, removed)
}

/// Drops exact-duplicate rows, keeping the first occurrence in order, then
/// fills each remaining missing cell with [`MISSING_FILL_VALUE`].
///
/// Two missing cells compare equal when looking for duplicates. In a column
/// whose present cells all parse as numbers, cells compare by value, so `27`
/// and `27.0` match; other columns compare text exactly. Filling can
/// turn two distinct rows into equal ones, so those are dropped as well; the
/// output never holds duplicates or missing cells and cleaning it again is a
/// no-op.
pub fn clean(dataset: Dataset) -> (Dataset, CleaningReport) {
    let rows_before = dataset.n_rows();
    let (columns, rows) = dataset.into_parts();

    let (mut rows, mut duplicates_removed) = drop_duplicates(rows);
    if duplicates_removed > 0 {
        warn!("Found {} duplicate rows, removing them", duplicates_removed);
    }

    let mut missing_filled = 0;
    for cell in rows.iter_mut().flatten() {
        if cell.is_none() {
            *cell = Some(MISSING_FILL_VALUE.to_string());
            missing_filled += 1;
        }
    }
    if missing_filled > 0 {
        warn!("Found {} missing values, filling with {}", missing_filled, MISSING_FILL_VALUE);
        let (filled, collapsed) = drop_duplicates(rows);
        if collapsed > 0 {
            warn!("Filling produced {} more duplicate rows, removing them", collapsed);
        }
        rows = filled;
        duplicates_removed += collapsed;
    } else {
        info!("No missing values found");
    }

    let report = CleaningReport {
        rows_before,
        rows_after: rows.len(),
        columns: columns.len(),
        duplicates_removed,
        missing_filled,
    };
    info!("Final shape: ({}, {})", report.rows_after, report.columns);

    (Dataset::from_parts(columns, rows), report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| if v.is_empty() { None } else { Some(v.to_string()) }).collect()
    }

    fn dirty() -> Dataset {
        Dataset::new(
            vec!["age".into(), "sex".into(), "charges".into()],
            vec![
                row(&["19", "female", "16884.92"]),
                row(&["18", "", "1725.55"]),
                row(&["19", "female", "16884.92"]),
                row(&["18", "", "1725.55"]),
                row(&["", "male", "4449.46"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_clean_removes_duplicates_in_order() {
        let (cleaned, report) = clean(dirty());

        assert_eq!(report.rows_before, 5);
        assert_eq!(report.rows_after, 3);
        assert_eq!(report.duplicates_removed, 2);
        assert_eq!(cleaned.column("charges").unwrap(), vec![
            Some("16884.92"),
            Some("1725.55"),
            Some("4449.46")
        ]);
    }

    #[test]
    fn test_clean_fills_missing_with_zero() {
        let (cleaned, report) = clean(dirty());

        assert_eq!(report.missing_filled, 2);
        assert_eq!(cleaned.column("sex").unwrap(), vec![Some("female"), Some("0"), Some("male")]);
        assert_eq!(cleaned.column("age").unwrap(), vec![Some("19"), Some("18"), Some("0")]);
        assert!(cleaned.rows().iter().flatten().all(|cell| cell.is_some()));
    }

    #[test]
    fn test_clean_is_idempotent() {
        let (once, _) = clean(dirty());
        let (twice, report) = clean(once.clone());

        assert_eq!(twice, once);
        assert_eq!(report.duplicates_removed, 0);
        assert_eq!(report.missing_filled, 0);
    }

    #[test]
    fn test_clean_drops_duplicates_created_by_filling() {
        let ds = Dataset::new(
            vec!["age".into(), "children".into()],
            vec![row(&["18", ""]), row(&["18", "0"]), row(&["20", "1"])],
        )
        .unwrap();

        let (cleaned, report) = clean(ds);

        assert_eq!(report.missing_filled, 1);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(cleaned.column("age").unwrap(), vec![Some("18"), Some("20")]);
        let (again, _) = clean(cleaned.clone());
        assert_eq!(again, cleaned);
    }

    #[test]
    fn test_clean_matches_numbers_by_value() {
        let ds = Dataset::new(
            vec!["age".into(), "bmi".into(), "sex".into()],
            vec![
                row(&["57", "27.0", "male"]),
                row(&["57", "27", "male"]),
                row(&["57.0", "27.00", "male"]),
                row(&["57", "27", "female"]),
            ],
        )
        .unwrap();

        let (cleaned, report) = clean(ds);

        assert_eq!(report.duplicates_removed, 2);
        assert_eq!(cleaned.column("bmi").unwrap(), vec![Some("27.0"), Some("27")]);
        assert_eq!(cleaned.column("sex").unwrap(), vec![Some("male"), Some("female")]);
    }

    #[test]
    fn test_clean_compares_text_columns_exactly() {
        let ds = Dataset::new(
            vec!["code".into()],
            vec![row(&["01"]), row(&["1"]), row(&["abc"]), row(&["1"])],
        )
        .unwrap();

        let (cleaned, report) = clean(ds);

        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(cleaned.column("code").unwrap(), vec![Some("01"), Some("1"), Some("abc")]);
    }

    #[test]
    fn test_clean_empty_dataset() {
        let ds = Dataset::new(vec!["a".into()], Vec::new()).unwrap();
        let (cleaned, report) = clean(ds);
        assert!(cleaned.is_empty());
        assert_eq!(report.rows_after, 0);
    }
}
