//! Scoring matrix: pairwise points between archetypes
//!
//! The matrix is the only external input to a simulation. Row `i` lists how
//! many points archetype `i` earns against every opponent archetype in a
//! canonical encounter; the row sum is archetype `i`'s base point total.

use serde::{Deserialize, Serialize};

use crate::error::MatrixError;

/// Upper bound on any single entry and on any row's point total.
///
/// Capping row totals at half of `u32::MAX` keeps every pair total inside a
/// single distribution, and the combined draw range of a two-sided match, in
/// `u32` arithmetic.
pub const MAX_BASE_POINTS: u32 = u32::MAX / 2;

/// Validated `n_arch x n_arch` scoring table.
///
/// Guaranteed square, non-negative, zero-diagonal, with every row total at
/// most [`MAX_BASE_POINTS`]. Built once at the start of a run and never
/// mutated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoringMatrix {
    n_arch: usize,
    rows: Vec<Vec<u32>>,
}

impl ScoringMatrix {
    /// Build a scoring matrix from raw signed rows, validating structure.
    ///
    /// # Arguments
    /// * `rows` - One row per archetype, `rows[i][j]` = points archetype `i`
    ///   earns against archetype `j`
    ///
    /// # Errors
    /// * [`MatrixError::Empty`] if no rows are given
    /// * [`MatrixError::NotSquare`] if any row length differs from the row count
    /// * [`MatrixError::NegativeEntry`] if any entry is below zero
    /// * [`MatrixError::NonZeroDiagonal`] if any `rows[i][i]` is non-zero
    /// * [`MatrixError::EntryTooLarge`] / [`MatrixError::RowSumTooLarge`] if
    ///   an entry or a row total exceeds [`MAX_BASE_POINTS`]
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, MatrixError> {
        let n_arch = rows.len();
        if n_arch == 0 {
            return Err(MatrixError::Empty);
        }

        let mut checked = Vec::with_capacity(n_arch);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_arch {
                return Err(MatrixError::NotSquare {
                    row: i,
                    len: row.len(),
                    expected: n_arch,
                });
            }

            let mut total = 0u64;
            let mut checked_row = Vec::with_capacity(n_arch);
            for (j, value) in row.into_iter().enumerate() {
                if value < 0 {
                    return Err(MatrixError::NegativeEntry { row: i, col: j, value });
                }
                if i == j && value != 0 {
                    return Err(MatrixError::NonZeroDiagonal { row: i, value });
                }
                if value > i64::from(MAX_BASE_POINTS) {
                    return Err(MatrixError::EntryTooLarge { row: i, col: j, value });
                }
                total += value as u64;
                checked_row.push(value as u32);
            }
            if total > u64::from(MAX_BASE_POINTS) {
                return Err(MatrixError::RowSumTooLarge { row: i, total });
            }
            checked.push(checked_row);
        }

        Ok(Self { n_arch, rows: checked })
    }

    /// Number of archetypes (matrix dimension).
    pub fn n_archetypes(&self) -> usize {
        self.n_arch
    }

    /// Scoring row for one archetype.
    pub fn row(&self, archetype: usize) -> &[u32] {
        &self.rows[archetype]
    }

    /// Base point total of one archetype (its row sum).
    pub fn base_points(&self, archetype: usize) -> u32 {
        self.rows[archetype].iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_matrix() {
        let matrix = ScoringMatrix::from_rows(vec![
            vec![0, 10, 5],
            vec![5, 0, 10],
            vec![10, 5, 0],
        ])
        .unwrap();

        assert_eq!(matrix.n_archetypes(), 3);
        assert_eq!(matrix.row(1), &[5, 0, 10]);
        assert_eq!(matrix.base_points(0), 15);
        assert_eq!(matrix.base_points(2), 15);
    }

    #[test]
    fn test_empty_matrix_rejected() {
        let err = ScoringMatrix::from_rows(vec![]).unwrap_err();
        assert!(matches!(err, MatrixError::Empty));
    }

    #[test]
    fn test_non_square_rejected() {
        let err = ScoringMatrix::from_rows(vec![vec![0, 1], vec![1, 0, 2]]).unwrap_err();
        assert!(matches!(err, MatrixError::NotSquare { row: 1, len: 3, expected: 2 }));
    }

    #[test]
    fn test_negative_entry_rejected() {
        let err = ScoringMatrix::from_rows(vec![vec![0, -3], vec![1, 0]]).unwrap_err();
        assert!(matches!(err, MatrixError::NegativeEntry { row: 0, col: 1, value: -3 }));
    }

    #[test]
    fn test_non_zero_diagonal_rejected() {
        let err = ScoringMatrix::from_rows(vec![vec![0, 1], vec![1, 7]]).unwrap_err();
        assert!(matches!(err, MatrixError::NonZeroDiagonal { row: 1, value: 7 }));
    }

    #[test]
    fn test_oversized_entry_rejected_not_truncated() {
        // 2^32 used to wrap to 0 on the u32 cast; it must be an error, never
        // a silently zeroed distribution.
        let err =
            ScoringMatrix::from_rows(vec![vec![0, 4_294_967_296], vec![1, 0]]).unwrap_err();
        assert!(matches!(
            err,
            MatrixError::EntryTooLarge { row: 0, col: 1, value: 4_294_967_296 }
        ));
    }

    #[test]
    fn test_oversized_row_sum_rejected() {
        // Each entry fits, but the row total would overflow pair arithmetic.
        let err = ScoringMatrix::from_rows(vec![
            vec![0, 2_000_000_000, 2_000_000_000],
            vec![1, 0, 1],
            vec![1, 1, 0],
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            MatrixError::RowSumTooLarge { row: 0, total: 4_000_000_000 }
        ));
    }

    #[test]
    fn test_row_sum_at_point_limit_accepted() {
        let limit = i64::from(MAX_BASE_POINTS);
        let matrix = ScoringMatrix::from_rows(vec![vec![0, limit], vec![1, 0]]).unwrap();
        assert_eq!(matrix.base_points(0), MAX_BASE_POINTS);
        assert_eq!(matrix.row(0), &[0, MAX_BASE_POINTS]);
    }
}
