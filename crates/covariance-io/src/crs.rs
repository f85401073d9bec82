//! Compressed Row Storage sparse matrix.
//!
//! Layout follows the classic CRS convention: the non-zeros of row `r` are
//! `cols[rows[r]..rows[r + 1]]` with matching `values`.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{JacobianIoError, Result};

/// Sparse matrix in CRS format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrsMatrix {
    pub num_rows: usize,
    pub num_cols: usize,
    /// Row offsets, `num_rows + 1` entries.
    pub rows: Vec<usize>,
    /// Column index of each non-zero.
    pub cols: Vec<usize>,
    /// Value of each non-zero, parallel to `cols`.
    pub values: Vec<f64>,
}

impl Default for CrsMatrix {
    fn default() -> Self {
        Self {
            num_rows: 0,
            num_cols: 0,
            rows: vec![0],
            cols: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl CrsMatrix {
    /// Matrix of the given shape with no non-zeros.
    pub fn empty(num_rows: usize, num_cols: usize) -> Result<Self> {
        let num_offsets = offset_count(num_rows)?;
        Ok(Self {
            num_rows,
            num_cols,
            rows: vec![0; num_offsets],
            cols: Vec::new(),
            values: Vec::new(),
        })
    }

    /// Number of stored non-zeros.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Checks every CRS invariant.
    ///
    /// - `rows.len() == num_rows + 1`, `rows[0] == 0`, offsets non-decreasing;
    /// - `rows[num_rows] == cols.len() == values.len()`;
    /// - every column index lies in `[0, num_cols)`.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(JacobianIoError::InvalidStructure(msg));

        let num_offsets = offset_count(self.num_rows)?;
        if self.rows.len() != num_offsets {
            return invalid(format!(
                "expected {} row offsets, got {}",
                num_offsets,
                self.rows.len()
            ));
        }
        if self.cols.len() != self.values.len() {
            return invalid(format!(
                "{} column indices but {} values",
                self.cols.len(),
                self.values.len()
            ));
        }
        if self.rows[0] != 0 {
            return invalid(format!("first row offset is {}, expected 0", self.rows[0]));
        }
        if let Some(r) = self.rows.windows(2).position(|w| w[1] < w[0]) {
            return invalid(format!(
                "row offsets decrease at row {}: {} > {}",
                r,
                self.rows[r],
                self.rows[r + 1]
            ));
        }
        let last = self.rows[self.num_rows];
        if last != self.nnz() {
            return invalid(format!(
                "last row offset {} != non-zero count {}",
                last,
                self.nnz()
            ));
        }
        if let Some((k, &c)) = self
            .cols
            .iter()
            .enumerate()
            .find(|&(_, &c)| c >= self.num_cols)
        {
            return invalid(format!(
                "column index {} at non-zero {} out of range for {} columns",
                c, k, self.num_cols
            ));
        }
        Ok(())
    }

    /// Iterates `(col, value)` pairs of row `r`.
    ///
    /// Panics if `r >= num_rows` or the offsets are inconsistent.
    pub fn row(&self, r: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.rows[r]..self.rows[r + 1];
        self.cols[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Iterates all non-zeros as `(row, col, value)` triplets.
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.num_rows).flat_map(move |r| self.row(r).map(move |(c, v)| (r, c, v)))
    }

    /// Dense copy, duplicate entries are summed.
    pub fn to_dense(&self) -> Result<DMatrix<f64>> {
        self.validate()?;
        let mut dense = DMatrix::<f64>::zeros(self.num_rows, self.num_cols);
        for (r, c, v) in self.triplets() {
            dense[(r, c)] += v;
        }
        Ok(dense)
    }
}

fn offset_count(num_rows: usize) -> Result<usize> {
    num_rows.checked_add(1).ok_or_else(|| {
        JacobianIoError::InvalidStructure(format!("{num_rows} rows leave no room for offsets"))
    })
}
