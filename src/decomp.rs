//! Safe decompositions over the native factorization boundary.
//!
//! Every entry point follows the same sequence: thaw the inputs into fresh
//! compact buffers, allocate outputs, call the backend, check its status, and
//! only then freeze and return the results. Caller values are never written.
//!
//! The plain functions ([`svd`], [`inv`], [`solve`], ...) use
//! [`ActiveBackend`]; each has a `*_with_backend::<B>` twin for any
//! [`LapackBackend`].
//!
//! Conditioning is not checked. A nearly singular matrix passes straight
//! through `getrf`/`gesv` and yields whatever the kernel produced; only an
//! exact zero pivot is reported as an error.

use crate::element_op::ElementOp;
use crate::lapack::{ActiveBackend, LapackBackend, Layout, Status, SvdJob};
use crate::matrix::{Matrix, MatrixMut};
use crate::rhs::RightHandSide;
use crate::scalar::Scalar;
use crate::vector::{Vector, VectorMut};
use crate::{LinalgError, Result};

/// Result of a singular value decomposition, `A = U · diag(s) · Vt`.
#[derive(Debug, Clone)]
pub struct Svd<T: Scalar> {
    /// `rows × rows` unitary left factor.
    pub u: Matrix<T>,
    /// `min(rows, cols)` singular values, non-negative and descending.
    pub s: Vector<T::Real>,
    /// `cols × cols` unitary right factor, already conjugate-transposed.
    pub vt: Matrix<T>,
}

impl<T: Scalar> Svd<T> {
    /// `U · diag(s) · Vt`, the matrix this decomposition came from.
    pub fn reconstruct(&self) -> Matrix<T> {
        let (m, n) = (self.u.rows(), self.vt.cols());
        let k = self.s.len();
        Matrix::from_fn(m, n, |i, j| {
            (0..k).fold(T::zero(), |acc, l| {
                acc + self.u.get(i, l) * T::from_real(self.s[l]) * self.vt.get(l, j)
            })
        })
    }
}

fn check_status(routine: &'static str, status: Status) -> Result<()> {
    if status == 0 {
        return Ok(());
    }
    tracing::debug!(routine, status, "native routine reported failure");
    Err(LinalgError::DecompositionFailed { routine, status })
}

fn require_square<Op: ElementOp, T>(a: &Matrix<T, Op>) -> Result<usize> {
    if !a.is_square() {
        return Err(LinalgError::NonSquare {
            rows: a.rows(),
            cols: a.cols(),
        });
    }
    Ok(a.rows())
}

// ============================================================================
// SVD
// ============================================================================

/// Full singular value decomposition using [`ActiveBackend`].
///
/// # Errors
/// Returns [`LinalgError::DecompositionFailed`] if the backend does not converge.
///
/// # Example
/// ```
/// use strided_linalg::{svd, Matrix};
///
/// let a = Matrix::from_rows(&[[0.0_f64, 1.0], [1.0, 0.0]]);
/// let f = svd(&a).unwrap();
/// assert!(f.s.iter().all(|s| (s - 1.0).abs() < 1e-14));
/// ```
pub fn svd<T: Scalar, Op: ElementOp>(a: &Matrix<T, Op>) -> Result<Svd<T>>
where
    ActiveBackend: LapackBackend<T>,
{
    svd_with_backend::<ActiveBackend, T, Op>(a)
}

/// [`svd`] with an explicit backend.
pub fn svd_with_backend<B, T, Op>(a: &Matrix<T, Op>) -> Result<Svd<T>>
where
    B: LapackBackend<T>,
    T: Scalar,
    Op: ElementOp,
{
    let (m, n) = (a.rows(), a.cols());
    let _span = tracing::debug_span!("svd", rows = m, cols = n).entered();

    if m.min(n) == 0 {
        return Ok(Svd {
            u: Matrix::identity(m),
            s: Vector::from_vec(Vec::new()),
            vt: Matrix::identity(n),
        });
    }

    let mut work = a.thaw();
    let mut s = VectorMut::zeros(m.min(n));
    let mut u = MatrixMut::zeros(m, m);
    let mut vt = MatrixMut::zeros(n, n);
    let (lda, ldu, ldvt) = (work.ld(), u.ld(), vt.ld());

    let status = B::gesdd(
        Layout::RowMajor,
        SvdJob::All,
        m,
        n,
        work.as_mut_slice(),
        lda,
        s.as_mut_slice(),
        u.as_mut_slice(),
        ldu,
        vt.as_mut_slice(),
        ldvt,
    );
    check_status("gesdd", status)?;

    Ok(Svd {
        u: u.freeze(),
        s: s.freeze(),
        vt: vt.freeze(),
    })
}

/// Singular values only, descending.
pub fn singular_values<T: Scalar, Op: ElementOp>(a: &Matrix<T, Op>) -> Result<Vector<T::Real>>
where
    ActiveBackend: LapackBackend<T>,
{
    singular_values_with_backend::<ActiveBackend, T, Op>(a)
}

/// [`singular_values`] with an explicit backend.
pub fn singular_values_with_backend<B, T, Op>(a: &Matrix<T, Op>) -> Result<Vector<T::Real>>
where
    B: LapackBackend<T>,
    T: Scalar,
    Op: ElementOp,
{
    let (m, n) = (a.rows(), a.cols());
    let _span = tracing::debug_span!("singular_values", rows = m, cols = n).entered();

    if m.min(n) == 0 {
        return Ok(Vector::from_vec(Vec::new()));
    }

    let mut work = a.thaw();
    let mut s = VectorMut::zeros(m.min(n));
    let lda = work.ld();
    let status = B::gesdd(
        Layout::RowMajor,
        SvdJob::None,
        m,
        n,
        work.as_mut_slice(),
        lda,
        s.as_mut_slice(),
        &mut [],
        1,
        &mut [],
        1,
    );
    check_status("gesdd", status)?;
    Ok(s.freeze())
}

// ============================================================================
// Inverse and determinant
// ============================================================================

/// Matrix inverse via LU factorization using [`ActiveBackend`].
///
/// # Errors
/// - [`LinalgError::NonSquare`] if `a` is not square.
/// - [`LinalgError::DecompositionFailed`] if `getrf` or `getri` reports a
///   nonzero status (for example an exactly singular matrix). Ill-conditioned
///   matrices are not detected.
pub fn inv<T: Scalar, Op: ElementOp>(a: &Matrix<T, Op>) -> Result<Matrix<T>>
where
    ActiveBackend: LapackBackend<T>,
{
    inv_with_backend::<ActiveBackend, T, Op>(a)
}

/// [`inv`] with an explicit backend.
pub fn inv_with_backend<B, T, Op>(a: &Matrix<T, Op>) -> Result<Matrix<T>>
where
    B: LapackBackend<T>,
    T: Scalar,
    Op: ElementOp,
{
    let n = require_square(a)?;
    let _span = tracing::debug_span!("inv", n).entered();

    if n == 0 {
        return Ok(Matrix::zeros(0, 0));
    }

    let mut work = a.thaw();
    let lda = work.ld();
    let mut ipiv = vec![0i32; n];

    let status = B::getrf(Layout::RowMajor, n, n, work.as_mut_slice(), lda, &mut ipiv);
    check_status("getrf", status)?;
    let status = B::getri(Layout::RowMajor, n, work.as_mut_slice(), lda, &ipiv);
    check_status("getri", status)?;

    Ok(work.freeze())
}

/// Determinant from the LU factors using [`ActiveBackend`].
///
/// An exactly singular matrix (zero pivot) has determinant zero.
pub fn det<T: Scalar, Op: ElementOp>(a: &Matrix<T, Op>) -> Result<T>
where
    ActiveBackend: LapackBackend<T>,
{
    det_with_backend::<ActiveBackend, T, Op>(a)
}

/// [`det`] with an explicit backend.
pub fn det_with_backend<B, T, Op>(a: &Matrix<T, Op>) -> Result<T>
where
    B: LapackBackend<T>,
    T: Scalar,
    Op: ElementOp,
{
    let n = require_square(a)?;
    let _span = tracing::debug_span!("det", n).entered();

    if n == 0 {
        return Ok(T::one());
    }

    let mut work = a.thaw();
    let lda = work.ld();
    let mut ipiv = vec![0i32; n];
    let status = B::getrf(Layout::RowMajor, n, n, work.as_mut_slice(), lda, &mut ipiv);
    if status > 0 {
        return Ok(T::zero());
    }
    check_status("getrf", status)?;

    let mut det = T::one();
    for (i, &p) in ipiv.iter().enumerate() {
        det = det * work.get(i, i);
        if p as usize != i + 1 {
            det = -det;
        }
    }
    Ok(det)
}

// ============================================================================
// Linear solve
// ============================================================================

/// Solve `A · X = B` using [`ActiveBackend`].
///
/// `b` may be any [`RightHandSide`]: a single [`Vector`], a list of vectors, a
/// [`Matrix`] whose columns are the right-hand sides, or a fixed array. The
/// solution has the same shape as `b`.
///
/// # Errors
/// - [`LinalgError::NonSquare`] if `a` is not square.
/// - [`LinalgError::RhsRowMismatch`] if `b` does not have `a.rows()` rows.
///   This is checked before the backend is called.
/// - [`LinalgError::DecompositionFailed`] if `gesv` reports a nonzero status.
///
/// Nearly singular systems are not diagnosed: the result is whatever the
/// kernel produced.
pub fn solve<T, Op, R>(a: &Matrix<T, Op>, b: &R) -> Result<R::Solution>
where
    T: Scalar,
    Op: ElementOp,
    R: RightHandSide<T> + ?Sized,
    ActiveBackend: LapackBackend<T>,
{
    solve_with_backend::<ActiveBackend, T, Op, R>(a, b)
}

/// [`solve`] with an explicit backend.
pub fn solve_with_backend<B, T, Op, R>(a: &Matrix<T, Op>, b: &R) -> Result<R::Solution>
where
    B: LapackBackend<T>,
    T: Scalar,
    Op: ElementOp,
    R: RightHandSide<T> + ?Sized,
{
    let n = require_square(a)?;
    let mut x = b.to_matrix()?;
    let nrhs = x.cols();
    let _span = tracing::debug_span!("solve", n, nrhs).entered();

    if x.rows() != n && !b.is_empty_batch() {
        return Err(LinalgError::RhsRowMismatch {
            expected: n,
            found: x.rows(),
        });
    }
    if n == 0 || nrhs == 0 {
        let solved = MatrixMut::zeros(n, nrhs);
        return Ok(b.extract_solution(solved));
    }

    let mut work = a.thaw();
    let (lda, ldb) = (work.ld(), x.ld());
    let mut ipiv = vec![0i32; n];

    let status = B::gesv(
        Layout::RowMajor,
        n,
        nrhs,
        work.as_mut_slice(),
        lda,
        &mut ipiv,
        x.as_mut_slice(),
        ldb,
    );
    check_status("gesv", status)?;

    Ok(b.extract_solution(x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lapack::NaiveBackend;
    use approx::assert_relative_eq;

    #[test]
    fn test_det() {
        let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]);
        assert_relative_eq!(det(&a).unwrap(), -2.0, epsilon = 1e-12);
        assert_relative_eq!(det(&a.t()).unwrap(), -2.0, epsilon = 1e-12);
        let singular = Matrix::from_rows(&[[1.0, 2.0], [2.0, 4.0]]);
        assert_eq!(det(&singular).unwrap(), 0.0);
        assert_eq!(det(&Matrix::<f64>::zeros(0, 0)).unwrap(), 1.0);
    }

    #[test]
    fn test_non_square() {
        let a = Matrix::<f64>::zeros(2, 3);
        assert_eq!(
            inv(&a).unwrap_err(),
            LinalgError::NonSquare { rows: 2, cols: 3 }
        );
        let b = Vector::from_vec(vec![1.0, 2.0]);
        assert!(matches!(
            solve(&a, &b),
            Err(LinalgError::NonSquare { .. })
        ));
    }

    #[test]
    fn test_empty_inputs() {
        let e = Matrix::<f64>::zeros(0, 0);
        assert_eq!(inv(&e).unwrap().shape(), [0, 0]);

        let wide = Matrix::<f64>::zeros(0, 3);
        let f = svd(&wide).unwrap();
        assert!(f.s.is_empty());
        assert_eq!(f.u.shape(), [0, 0]);
        assert_eq!(f.vt, Matrix::identity(3));

        let a = Matrix::<f64>::identity(2);
        let none: Vec<Vector<f64>> = Vec::new();
        assert!(solve(&a, &none).unwrap().is_empty());
        let zero_cols = Matrix::<f64>::zeros(2, 0);
        assert_eq!(solve(&a, &zero_cols).unwrap().shape(), [2, 0]);
    }

    #[test]
    fn test_empty_matrix_rhs_row_mismatch() {
        let a = Matrix::<f64>::identity(2);
        let b = Matrix::<f64>::zeros(0, 0);
        assert_eq!(
            solve(&a, &b).unwrap_err(),
            LinalgError::RhsRowMismatch {
                expected: 2,
                found: 0
            }
        );
        let v = Vector::<f64>::from_vec(Vec::new());
        assert!(matches!(
            solve(&a, &v),
            Err(LinalgError::RhsRowMismatch { expected: 2, found: 0 })
        ));
    }

    #[test]
    fn test_singular_values_only() {
        let a = Matrix::from_rows(&[[0.0, 2.0], [3.0, 0.0], [0.0, 0.0]]);
        let s = singular_values_with_backend::<NaiveBackend, _, _>(&a).unwrap();
        assert_relative_eq!(s[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(s[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reconstruct() {
        let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let f = svd_with_backend::<NaiveBackend, _, _>(&a).unwrap();
        let r = f.reconstruct();
        for i in 0..2 {
            for j in 0..3 {
                assert_relative_eq!(r.get(i, j), a.get(i, j), epsilon = 1e-12);
            }
        }
    }
}
