//! Error types for scoring matrix validation

use thiserror::Error;

/// Structural problems in a scoring matrix. All fatal: no partial matrix is
/// usable by the simulation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatrixError {
    #[error("scoring matrix is empty")]
    Empty,

    #[error("scoring matrix is not square: row {row} has {len} entries, expected {expected}")]
    NotSquare { row: usize, len: usize, expected: usize },

    #[error("scoring matrix entry [{row}][{col}] is negative ({value})")]
    NegativeEntry { row: usize, col: usize, value: i64 },

    #[error("scoring matrix diagonal entry [{row}][{row}] must be zero, got {value}")]
    NonZeroDiagonal { row: usize, value: i64 },

    #[error("scoring matrix entry [{row}][{col}] exceeds the point limit ({value})")]
    EntryTooLarge { row: usize, col: usize, value: i64 },

    #[error("scoring matrix row {row} total {total} exceeds the point limit")]
    RowSumTooLarge { row: usize, total: u64 },
}
