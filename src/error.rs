use std::io;

use thiserror::Error;

/// Failures raised while reading, parsing or installing a tile layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("layout contains no rows")]
    Empty,

    #[error("row {row}, column {col}: `{token}` is not an integer tile code")]
    NotAnInteger {
        row: usize,
        col: usize,
        token: String,
    },

    #[error("row {row}, column {col}: unknown tile code {value}")]
    InvalidCode { row: usize, col: usize, value: i64 },

    #[error("row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("layout is {}x{}, expected {}x{}", .found.0, .found.1, .expected.0, .expected.1)]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("cell ({row}, {col}) is outside the grid")]
    OutOfBounds { row: usize, col: usize },
}
