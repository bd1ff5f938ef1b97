//! Native factorization boundary.
//!
//! This module defines the [`LapackBackend`] trait, marker structs for each
//! backend, and the [`ActiveBackend`] type alias that serves as the single point
//! of backend selection based on Cargo features.
//!
//! The trait mirrors the LAPACKE calling convention: static functions working in
//! place on caller-allocated buffers, an explicit layout and leading dimension,
//! 1-based `i32` pivot indices, and an `i32` status where `0` is success, a
//! positive value is a numerical failure (zero pivot, no convergence) and a
//! negative value `-i` flags the `i`-th argument as illegal.

mod naive;

#[cfg(feature = "faer")]
mod faer_backend;

#[cfg(feature = "lapack")]
mod lapacke_backend;

use crate::scalar::Scalar;

/// Status code returned by every native routine.
pub type Status = i32;

/// Memory layout of a matrix buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Element `(i, j)` at `i * ld + j`.
    RowMajor,
    /// Element `(i, j)` at `i + j * ld`.
    ColMajor,
}

impl Layout {
    /// Buffer position of element `(i, j)` given leading dimension `ld`.
    #[inline(always)]
    pub fn index(self, i: usize, j: usize, ld: usize) -> usize {
        match self {
            Layout::RowMajor => i * ld + j,
            Layout::ColMajor => i + j * ld,
        }
    }

    /// Smallest legal leading dimension for a `rows × cols` matrix.
    #[inline]
    pub fn min_ld(self, rows: usize, cols: usize) -> usize {
        match self {
            Layout::RowMajor => cols.max(1),
            Layout::ColMajor => rows.max(1),
        }
    }
}

/// Which singular vectors `gesdd` computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvdJob {
    /// Full `U` (m × m) and `Vᴴ` (n × n).
    All,
    /// Singular values only; `u` and `vt` are not touched.
    None,
}

impl SvdJob {
    /// LAPACK `jobz` character.
    pub fn to_char(self) -> u8 {
        match self {
            SvdJob::All => b'A',
            SvdJob::None => b'N',
        }
    }
}

/// Dense factorization routines in LAPACK form.
///
/// Implementations are provided by each backend module (faer, lapacke, naive).
/// External code can implement this trait (e.g. an instrumented or failing
/// backend) and pass it to the `*_with_backend` entry points such as
/// [`solve_with_backend`](crate::solve_with_backend).
#[allow(clippy::too_many_arguments)]
pub trait LapackBackend<T: Scalar> {
    /// Singular value decomposition `A = U · diag(s) · Vᴴ`.
    ///
    /// - `a`: `m × n` input, contents destroyed
    /// - `s`: `min(m, n)` singular values, descending
    /// - `u`: `m × m` left singular vectors (job [`SvdJob::All`])
    /// - `vt`: `n × n` conjugate-transposed right singular vectors
    ///
    /// Returns `> 0` if the iteration did not converge.
    fn gesdd(
        layout: Layout,
        job: SvdJob,
        m: usize,
        n: usize,
        a: &mut [T],
        lda: usize,
        s: &mut [T::Real],
        u: &mut [T],
        ldu: usize,
        vt: &mut [T],
        ldvt: usize,
    ) -> Status;

    /// LU factorization with partial pivoting, `A = P · L · U`.
    ///
    /// `a` is overwritten with `L` (unit diagonal, not stored) and `U`.
    /// Returns `i > 0` if `U(i-1, i-1)` is exactly zero; the factorization is
    /// still completed.
    fn getrf(layout: Layout, m: usize, n: usize, a: &mut [T], lda: usize, ipiv: &mut [i32])
        -> Status;

    /// Inverse from the factors produced by [`getrf`](Self::getrf).
    ///
    /// Returns `i > 0` if `U(i-1, i-1)` is exactly zero.
    fn getri(layout: Layout, n: usize, a: &mut [T], lda: usize, ipiv: &[i32]) -> Status;

    /// Solve `A · X = B` in place: `a` receives the LU factors, `b` the solution.
    fn gesv(
        layout: Layout,
        n: usize,
        nrhs: usize,
        a: &mut [T],
        lda: usize,
        ipiv: &mut [i32],
        b: &mut [T],
        ldb: usize,
    ) -> Status;
}

// ---------------------------------------------------------------------------
// Marker structs
// ---------------------------------------------------------------------------

/// Backend built on [`faer`]'s SVD and partial-pivot LU (every [`Scalar`]).
#[cfg(feature = "faer")]
#[derive(Debug, Clone, Copy, Default)]
pub struct FaerBackend;

/// Backend forwarding to LAPACKE (`f32`, `f64`, `Complex32`, `Complex64`).
#[cfg(feature = "lapack")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LapackeBackend;

/// Fallback backend using explicit loops (no external library), available
/// for every [`Scalar`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveBackend;

// ---------------------------------------------------------------------------
// ActiveBackend type alias -- the SINGLE point of backend selection
// ---------------------------------------------------------------------------

/// The active factorization backend, selected by Cargo features.
///
/// - `faer` (default, without `lapack`) -> [`FaerBackend`]
/// - `lapack` (without `faer`) -> [`LapackeBackend`]
/// - no backend feature -> [`NaiveBackend`]
/// - both -> [`NaiveBackend`] (placeholder; `compile_error!` fires first)
#[cfg(all(feature = "faer", not(feature = "lapack")))]
pub type ActiveBackend = FaerBackend;

#[cfg(all(feature = "lapack", not(feature = "faer")))]
pub type ActiveBackend = LapackeBackend;

#[cfg(any(
    not(any(feature = "faer", feature = "lapack")),
    all(feature = "faer", feature = "lapack")
))]
pub type ActiveBackend = NaiveBackend;

/// Required buffer length for a `rows × cols` matrix with leading dimension
/// `ld`, or `None` if `ld` is too small for the layout.
pub(crate) fn required_len(layout: Layout, rows: usize, cols: usize, ld: usize) -> Option<usize> {
    if ld < layout.min_ld(rows, cols) {
        return None;
    }
    if rows == 0 || cols == 0 {
        return Some(0);
    }
    Some(match layout {
        Layout::RowMajor => (rows - 1) * ld + cols,
        Layout::ColMajor => (cols - 1) * ld + rows,
    })
}

/// Whether every 1-based pivot in `ipiv[..n]` names a row of an `n × n` matrix.
pub(crate) fn pivots_in_range(ipiv: &[i32], n: usize) -> bool {
    ipiv.len() >= n
        && ipiv[..n]
            .iter()
            .all(|&p| p >= 1 && usize::try_from(p).is_ok_and(|p| p <= n))
}

/// Whether `buf` can hold a `rows × cols` matrix with leading dimension `ld`.
#[inline]
pub(crate) fn fits(layout: Layout, rows: usize, cols: usize, buf: usize, ld: usize) -> bool {
    required_len(layout, rows, cols, ld).is_some_and(|need| buf >= need)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_index() {
        assert_eq!(Layout::RowMajor.index(1, 2, 5), 7);
        assert_eq!(Layout::ColMajor.index(1, 2, 5), 11);
    }

    #[test]
    fn test_required_len() {
        assert_eq!(required_len(Layout::RowMajor, 3, 4, 4), Some(12));
        assert_eq!(required_len(Layout::RowMajor, 3, 4, 6), Some(16));
        assert_eq!(required_len(Layout::RowMajor, 3, 4, 3), None);
        assert_eq!(required_len(Layout::ColMajor, 3, 4, 3), Some(12));
        assert_eq!(required_len(Layout::RowMajor, 0, 4, 4), Some(0));
        assert_eq!(required_len(Layout::RowMajor, 0, 0, 0), None);
    }

    #[test]
    fn test_pivots_in_range() {
        assert!(pivots_in_range(&[2, 2, 3], 3));
        assert!(pivots_in_range(&[], 0));
        assert!(!pivots_in_range(&[0, 2], 2));
        assert!(!pivots_in_range(&[1, -1], 2));
        assert!(!pivots_in_range(&[1, 3], 2));
        assert!(!pivots_in_range(&[1], 2));
    }

    #[test]
    fn test_svd_job_char() {
        assert_eq!(SvdJob::All.to_char(), b'A');
        assert_eq!(SvdJob::None.to_char(), b'N');
    }
}
