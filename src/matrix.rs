//! Dense matrix storage and the vector primitives used by the network.
//!
//! Every operation here is pure: inputs are borrowed, results are freshly
//! allocated. Shape problems surface as [`Error::DimensionMismatch`] instead of
//! being truncated or padded.

use crate::{Error, Result};

/// Owned, row-major matrix of `f64`.
///
/// Row `i` occupies `data[i * cols..(i + 1) * cols]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build a matrix by calling `f(row, col)` in row-major order.
    ///
    /// The call order is part of the contract: seeded initializers rely on it.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { rows, cols, data }
    }

    /// Copy per-row vectors into contiguous storage.
    ///
    /// Fails if the rows are ragged. An empty slice yields an empty matrix.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(Error::mismatch("Matrix::from_rows", cols, row.len()));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Panics if `(row, col)` is out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(col < self.cols, "col {col} out of bounds ({})", self.cols);
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let start = row * self.cols;
        &mut self.data[start..start + self.cols]
    }

    /// Flat row-major view of all entries.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Returns a new matrix with rows and columns swapped.
    ///
    /// A matrix without rows transposes to the 0×0 matrix.
    pub fn transpose(&self) -> Matrix {
        if self.rows == 0 {
            return Matrix::default();
        }
        let mut out = Matrix::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.data[c * self.rows + r] = self.data[r * self.cols + c];
            }
        }
        out
    }
}

/// `M · v`: one dot product per row of `m`.
///
/// A matrix with zero rows yields an empty vector without inspecting `v`.
pub fn matrix_vector_multiply(m: &Matrix, v: &[f64]) -> Result<Vec<f64>> {
    if m.rows() == 0 {
        return Ok(Vec::new());
    }
    if m.cols() != v.len() {
        return Err(Error::mismatch("matrix_vector_multiply", m.cols(), v.len()));
    }

    Ok((0..m.rows())
        .map(|r| m.row(r).iter().zip(v).map(|(w, x)| w * x).sum())
        .collect())
}

pub fn add_vectors(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    zip_with("add_vectors", a, b, |x, y| x + y)
}

/// `a - b`, element-wise.
pub fn subtract_vectors(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    zip_with("subtract_vectors", a, b, |x, y| x - y)
}

/// Hadamard product.
pub fn elementwise_multiply(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    zip_with("elementwise_multiply", a, b, |x, y| x * y)
}

#[inline]
fn zip_with<F>(op: &'static str, a: &[f64], b: &[f64], f: F) -> Result<Vec<f64>>
where
    F: Fn(f64, f64) -> f64,
{
    if a.len() != b.len() {
        return Err(Error::mismatch(op, a.len(), b.len()));
    }
    Ok(a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix {
        Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                op: "Matrix::from_rows",
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn multiply_computes_row_dot_products() {
        let out = matrix_vector_multiply(&sample(), &[1.0, 0.0, -1.0]).unwrap();
        assert_eq!(out, vec![-2.0, -2.0]);
    }

    #[test]
    fn multiply_rejects_wrong_vector_length() {
        let err = matrix_vector_multiply(&sample(), &[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn multiply_with_zero_rows_skips_column_check() {
        let empty = Matrix::zeros(0, 5);
        assert!(matrix_vector_multiply(&empty, &[1.0]).unwrap().is_empty());
    }

    #[test]
    fn transpose_swaps_shape_and_round_trips() {
        let m = sample();
        let t = m.transpose();
        assert_eq!((t.rows(), t.cols()), (3, 2));
        assert_eq!(t.row(0), &[1.0, 4.0]);
        assert_eq!(t.row(2), &[3.0, 6.0]);
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn transpose_of_empty_is_empty() {
        assert!(Matrix::default().transpose().is_empty());
        let t = Matrix::zeros(0, 4).transpose();
        assert_eq!((t.rows(), t.cols()), (0, 0));
        assert!(matrix_vector_multiply(&t, &[]).unwrap().is_empty());
    }

    #[test]
    fn elementwise_ops_require_equal_lengths() {
        assert_eq!(add_vectors(&[1.0, 2.0], &[3.0, 4.0]).unwrap(), vec![4.0, 6.0]);
        assert_eq!(
            subtract_vectors(&[1.0, 2.0], &[3.0, 5.0]).unwrap(),
            vec![-2.0, -3.0]
        );
        assert_eq!(
            elementwise_multiply(&[2.0, 3.0], &[4.0, 0.5]).unwrap(),
            vec![8.0, 1.5]
        );

        assert!(add_vectors(&[1.0], &[1.0, 2.0]).is_err());
        assert!(subtract_vectors(&[1.0, 2.0], &[]).is_err());
        assert!(elementwise_multiply(&[], &[0.0]).is_err());
    }

    #[test]
    fn from_fn_fills_row_major() {
        let mut calls = Vec::new();
        let m = Matrix::from_fn(2, 2, |r, c| {
            calls.push((r, c));
            (r * 10 + c) as f64
        });
        assert_eq!(calls, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(m.as_slice(), &[0.0, 1.0, 10.0, 11.0]);
    }
}
