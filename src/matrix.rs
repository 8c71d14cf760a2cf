//! Dense row-major matrix storage for count tables and posterior draws
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::impl_display;
use crate::misc::vec_to_string;
use std::ops::{Index, IndexMut};

/// A dense `n_rows × n_cols` matrix of `f64` stored contiguously in
/// row-major order.
///
/// # Example
///
/// ```rust
/// # use ldagibbs::matrix::Matrix;
/// let mut mat = Matrix::new(2, 3, 0.5);
/// mat[(1, 2)] += 1.0;
///
/// assert_eq!(mat.row(1), &[0.5, 0.5, 1.5]);
/// assert_eq!(mat.col(2), vec![0.5, 1.5]);
/// assert_eq!(mat.row_sums(), vec![1.5, 2.5]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct Matrix {
    n_rows: usize,
    n_cols: usize,
    values: Vec<f64>,
}

impl Matrix {
    /// Create a matrix with every entry set to `fill`
    pub fn new(n_rows: usize, n_cols: usize, fill: f64) -> Self {
        Matrix {
            n_rows,
            n_cols,
            values: vec![fill; n_rows * n_cols],
        }
    }

    /// Create a matrix from row-major values
    ///
    /// Returns `None` if `values` does not hold exactly `n_rows * n_cols`
    /// entries.
    pub fn from_row_major(
        n_rows: usize,
        n_cols: usize,
        values: Vec<f64>,
    ) -> Option<Self> {
        if values.len() == n_rows * n_cols {
            Some(Matrix {
                n_rows,
                n_cols,
                values,
            })
        } else {
            None
        }
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// The underlying row-major storage
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn row(&self, r: usize) -> &[f64] {
        let start = r * self.n_cols;
        &self.values[start..start + self.n_cols]
    }

    #[inline]
    pub fn row_mut(&mut self, r: usize) -> &mut [f64] {
        let start = r * self.n_cols;
        &mut self.values[start..start + self.n_cols]
    }

    /// Copy of column `c`
    pub fn col(&self, c: usize) -> Vec<f64> {
        self.values
            .iter()
            .skip(c)
            .step_by(self.n_cols)
            .copied()
            .collect()
    }

    /// Overwrite column `c` with `xs`
    ///
    /// # Panics
    ///
    /// If `xs` does not have `n_rows` entries
    pub fn set_col(&mut self, c: usize, xs: &[f64]) {
        assert_eq!(xs.len(), self.n_rows);
        xs.iter().enumerate().for_each(|(r, &x)| self[(r, c)] = x);
    }

    pub fn row_sums(&self) -> Vec<f64> {
        (0..self.n_rows).map(|r| self.row(r).iter().sum()).collect()
    }

    pub fn col_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.n_cols];
        self.values
            .chunks_exact(self.n_cols.max(1))
            .for_each(|row| {
                sums.iter_mut().zip(row).for_each(|(s, x)| *s += x);
            });
        sums
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    #[inline]
    fn index(&self, (r, c): (usize, usize)) -> &f64 {
        &self.values[r * self.n_cols + c]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut f64 {
        &mut self.values[r * self.n_cols + c]
    }
}

impl From<&Matrix> for String {
    fn from(mat: &Matrix) -> String {
        format!(
            "Matrix({} × {}; {})",
            mat.n_rows,
            mat.n_cols,
            vec_to_string(&mat.values, 6)
        )
    }
}

impl_display!(Matrix);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_basic_impls;

    test_basic_impls!(Matrix::new(2, 2, 1.0));

    fn counting() -> Matrix {
        Matrix::from_row_major(2, 3, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0])
            .unwrap()
    }

    #[test]
    fn from_row_major_rejects_wrong_length() {
        assert!(Matrix::from_row_major(2, 3, vec![0.0; 5]).is_none());
    }

    #[test]
    fn index_is_row_major() {
        let mat = counting();
        assert_eq!(mat[(0, 2)], 2.0);
        assert_eq!(mat[(1, 0)], 3.0);
        assert_eq!(mat.row(1), &[3.0, 4.0, 5.0]);
        assert_eq!(mat.col(1), vec![1.0, 4.0]);
    }

    #[test]
    fn set_col_overwrites_only_that_column() {
        let mut mat = counting();
        mat.set_col(1, &[-1.0, -2.0]);
        assert_eq!(mat.values(), &[0.0, -1.0, 2.0, 3.0, -2.0, 5.0]);
    }

    #[test]
    fn row_and_col_sums() {
        let mat = counting();
        assert_eq!(mat.row_sums(), vec![3.0, 12.0]);
        assert_eq!(mat.col_sums(), vec![3.0, 5.0, 7.0]);
    }

    #[test]
    fn col_sums_of_empty_columns() {
        let mat = Matrix::new(3, 0, 1.0);
        assert!(mat.col_sums().is_empty());
    }

    #[test]
    fn display() {
        let mat = Matrix::new(1, 2, 0.5);
        assert_eq!(format!("{}", mat), "Matrix(1 × 2; [0.5, 0.5])");
    }
}
