//! Right-hand-side containers for [`solve`](crate::solve).
//!
//! A right-hand side knows how to lay itself out as the `n × k` column block a
//! linear solver consumes, and how to rebuild its own shape from the solved
//! block. A single vector is one column; a list of vectors and a matrix are
//! `k` columns.

use crate::arity::{Fixed, FixedVector};
use crate::element_op::ElementOp;
use crate::matrix::{Matrix, MatrixMut};
use crate::scalar::Scalar;
use crate::vector::Vector;
use crate::{LinalgError, Result};

/// A container of right-hand-side columns for `A · X = B`.
pub trait RightHandSide<T: Scalar> {
    /// Solved value, shaped like `Self`.
    type Solution;

    /// Copy `B` into a fresh row-major `n × k` matrix (column `j` is the
    /// `j`-th right-hand side).
    ///
    /// # Errors
    /// Returns [`LinalgError::ShapeMismatch`] if the columns do not all have
    /// the same length.
    fn to_matrix(&self) -> Result<MatrixMut<T>>;

    /// Rebuild the solution from the solved `n × k` block.
    fn extract_solution(&self, solved: MatrixMut<T>) -> Self::Solution;

    /// Whether this is a batch with no right-hand sides at all.
    ///
    /// An empty batch carries no column length, so it solves against a
    /// system of any size.
    fn is_empty_batch(&self) -> bool {
        false
    }
}

impl<T: Scalar> RightHandSide<T> for Vector<T> {
    type Solution = Vector<T>;

    fn to_matrix(&self) -> Result<MatrixMut<T>> {
        MatrixMut::from_vec(self.len(), 1, self.to_vec())
    }

    fn extract_solution(&self, solved: MatrixMut<T>) -> Vector<T> {
        Vector::from_vec(solved.into_vec())
    }
}

impl<T: Scalar> RightHandSide<T> for [Vector<T>] {
    type Solution = Vec<Vector<T>>;

    fn to_matrix(&self) -> Result<MatrixMut<T>> {
        let k = self.len();
        let n = self.first().map_or(0, Vector::len);
        if let Some(bad) = self.iter().find(|v| v.len() != n) {
            return Err(LinalgError::ShapeMismatch(vec![n], vec![bad.len()]));
        }
        let mut out = MatrixMut::zeros(n, k);
        for (j, v) in self.iter().enumerate() {
            for (i, x) in v.iter().enumerate() {
                out.set(i, j, x);
            }
        }
        Ok(out)
    }

    /// Columns of one shared solved buffer; no per-column copy.
    fn extract_solution(&self, solved: MatrixMut<T>) -> Vec<Vector<T>> {
        let k = solved.cols();
        let solved = solved.freeze();
        (0..k).map(|j| solved.col(j)).collect()
    }

    fn is_empty_batch(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Scalar> RightHandSide<T> for Vec<Vector<T>> {
    type Solution = Vec<Vector<T>>;

    fn to_matrix(&self) -> Result<MatrixMut<T>> {
        self.as_slice().to_matrix()
    }

    fn extract_solution(&self, solved: MatrixMut<T>) -> Vec<Vector<T>> {
        self.as_slice().extract_solution(solved)
    }

    fn is_empty_batch(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Scalar, Op: ElementOp> RightHandSide<T> for Matrix<T, Op> {
    type Solution = Matrix<T>;

    fn to_matrix(&self) -> Result<MatrixMut<T>> {
        Ok(self.thaw())
    }

    fn extract_solution(&self, solved: MatrixMut<T>) -> Matrix<T> {
        solved.freeze()
    }
}

impl<T: Scalar, const N: usize> RightHandSide<T> for [T; N] {
    type Solution = [T; N];

    fn to_matrix(&self) -> Result<MatrixMut<T>> {
        MatrixMut::from_vec(N, 1, self.to_vec())
    }

    fn extract_solution(&self, solved: MatrixMut<T>) -> [T; N] {
        <[T; N]>::construct(|i| solved[(i, 0)])
    }
}

impl<T: Scalar, const N: usize> RightHandSide<T> for Fixed<T, N> {
    type Solution = Fixed<T, N>;

    fn to_matrix(&self) -> Result<MatrixMut<T>> {
        self.as_vector().to_matrix()
    }

    fn extract_solution(&self, solved: MatrixMut<T>) -> Fixed<T, N> {
        Fixed::construct(|i| solved[(i, 0)])
    }
}
