use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error("Inconsistent column count: row {row} has {actual} columns, expected {expected}")]
    InconsistentColumns { row: usize, actual: usize, expected: usize },

    #[error("Missing target value in column '{column}' at row {row}")]
    MissingTarget { column: String, row: usize },

    #[error("Invalid target value '{value}' in column '{column}' at row {row}: {source}")]
    InvalidTarget { column: String, value: String, row: usize, source: std::num::ParseFloatError },
}

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("Failed to open file: {0}")]
    FileOpen(#[from] std::io::Error),

    #[error("CSV file is empty")]
    EmptyFile,

    #[error("Duplicate column name '{0}' in header")]
    DuplicateColumn(String),

    #[error("Inconsistent column count: row {row} has {actual} columns, expected {expected}")]
    InconsistentColumns { row: usize, actual: usize, expected: usize },

    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),
}
