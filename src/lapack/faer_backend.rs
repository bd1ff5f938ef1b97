//! faer-backed factorization routines.
//!
//! Inputs are copied into column-major [`faer::Mat`] values, factored with
//! faer's SVD and partial-pivot LU, and written back in the caller's layout.
//! Pivots come back in LAPACK form (1-based, applied as sequential row swaps),
//! so factors produced here can be consumed by any other backend.

use super::{fits, pivots_in_range, FaerBackend, LapackBackend, Layout, Status, SvdJob};
use crate::element_op::ElementOpApply;
use crate::scalar::Scalar;
use faer::linalg::triangular_solve::{
    solve_unit_lower_triangular_in_place, solve_upper_triangular_in_place,
};
use faer::{Mat, Par};
use faer_traits::ComplexField;
use num_traits::{Float, One, Zero};

/// Copy a `rows × cols` matrix out of a LAPACK-style buffer.
fn load<T: Copy>(layout: Layout, rows: usize, cols: usize, a: &[T], ld: usize) -> Mat<T> {
    Mat::from_fn(rows, cols, |i, j| a[layout.index(i, j, ld)])
}

/// Write `x` back into a LAPACK-style buffer.
fn store<T: Copy>(layout: Layout, x: &Mat<T>, a: &mut [T], ld: usize) {
    for i in 0..x.nrows() {
        for j in 0..x.ncols() {
            a[layout.index(i, j, ld)] = x[(i, j)];
        }
    }
}

fn all_finite<T: Scalar>(a: &Mat<T>) -> bool {
    (0..a.ncols()).all(|j| (0..a.nrows()).all(|i| Scalar::modulus(a[(i, j)]).is_finite()))
}

/// Final row order after applying the swaps in `ipiv[..n]` to `0..n`.
fn swapped_rows(ipiv: &[i32], n: usize) -> Vec<usize> {
    let mut rows: Vec<usize> = (0..n).collect();
    for (i, &p) in ipiv[..n].iter().enumerate() {
        rows.swap(i, (p - 1) as usize);
    }
    rows
}

/// `x <- U⁻¹ · L⁻¹ · x` for packed square LU factors.
fn lu_solve_in_place<T: Scalar + ComplexField>(factors: &Mat<T>, x: &mut Mat<T>) {
    solve_unit_lower_triangular_in_place(factors.as_ref(), x.as_mut(), Par::Seq);
    solve_upper_triangular_in_place(factors.as_ref(), x.as_mut(), Par::Seq);
}

impl<T: Scalar + ComplexField> LapackBackend<T> for FaerBackend {
    fn gesdd(
        layout: Layout,
        job: SvdJob,
        m: usize,
        n: usize,
        a: &mut [T],
        lda: usize,
        s: &mut [<T as Scalar>::Real],
        u: &mut [T],
        ldu: usize,
        vt: &mut [T],
        ldvt: usize,
    ) -> Status {
        if !fits(layout, m, n, a.len(), lda) {
            return -6;
        }
        if s.len() < m.min(n) {
            return -7;
        }
        if job == SvdJob::All {
            if !fits(layout, m, m, u.len(), ldu) {
                return -9;
            }
            if !fits(layout, n, n, vt.len(), ldvt) {
                return -11;
            }
        }
        if m == 0 || n == 0 {
            return 0;
        }

        let mat = load(layout, m, n, a, lda);
        if !all_finite(&mat) {
            return 1;
        }
        let Ok(svd) = mat.as_ref().svd() else {
            return 1;
        };

        let sigma = svd.S().column_vector();
        for k in 0..m.min(n) {
            s[k] = Scalar::real(sigma[k]);
        }
        if job == SvdJob::None {
            return 0;
        }

        let left = svd.U();
        for i in 0..m {
            for k in 0..m {
                u[layout.index(i, k, ldu)] = left[(i, k)];
            }
        }
        // Vᴴ[k][j] = conj(V[j][k])
        let right = svd.V();
        for k in 0..n {
            for j in 0..n {
                vt[layout.index(k, j, ldvt)] = ElementOpApply::conj(right[(j, k)]);
            }
        }
        0
    }

    fn getrf(
        layout: Layout,
        m: usize,
        n: usize,
        a: &mut [T],
        lda: usize,
        ipiv: &mut [i32],
    ) -> Status {
        if !fits(layout, m, n, a.len(), lda) {
            return -5;
        }
        let k = m.min(n);
        if ipiv.len() < k {
            return -6;
        }
        if k == 0 {
            return 0;
        }
        if i32::try_from(m).is_err() {
            return -2;
        }

        let mat = load(layout, m, n, a, lda);
        let lu = mat.as_ref().partial_piv_lu();
        let (lower, upper) = (lu.L(), lu.U());
        for i in 0..m {
            for j in 0..n {
                a[layout.index(i, j, lda)] = if i > j { lower[(i, j)] } else { upper[(i, j)] };
            }
        }

        // faer reports row i of P·A as row fwd[i] of A. Replay that as the
        // sequence of swaps LAPACK records: step i brings fwd[i] up to row i.
        let (fwd, _) = lu.P().arrays();
        let mut rows: Vec<usize> = (0..m).collect();
        let mut pos: Vec<usize> = (0..m).collect();
        for i in 0..k {
            let p = pos[fwd[i]];
            ipiv[i] = (p + 1) as i32;
            if p != i {
                let (ri, rp) = (rows[i], rows[p]);
                rows.swap(i, p);
                pos[ri] = p;
                pos[rp] = i;
            }
        }

        let zero = <T as Zero>::zero();
        match (0..k).find(|&d| upper[(d, d)] == zero) {
            Some(d) => (d + 1) as Status,
            None => 0,
        }
    }

    fn getri(layout: Layout, n: usize, a: &mut [T], lda: usize, ipiv: &[i32]) -> Status {
        if !fits(layout, n, n, a.len(), lda) {
            return -4;
        }
        if !pivots_in_range(ipiv, n) {
            return -5;
        }
        let zero = <T as Zero>::zero();
        if let Some(d) = (0..n).find(|&d| a[layout.index(d, d, lda)] == zero) {
            return (d + 1) as Status;
        }
        if n == 0 {
            return 0;
        }

        // A⁻¹ solves L·U·X = P·I.
        let rows = swapped_rows(ipiv, n);
        let one = <T as One>::one();
        let mut x = Mat::from_fn(n, n, |i, j| if rows[i] == j { one } else { zero });
        let factors = load(layout, n, n, a, lda);
        lu_solve_in_place(&factors, &mut x);
        store(layout, &x, a, lda);
        0
    }

    fn gesv(
        layout: Layout,
        n: usize,
        nrhs: usize,
        a: &mut [T],
        lda: usize,
        ipiv: &mut [i32],
        b: &mut [T],
        ldb: usize,
    ) -> Status {
        if !fits(layout, n, n, a.len(), lda) {
            return -5;
        }
        if ipiv.len() < n {
            return -6;
        }
        if !fits(layout, n, nrhs, b.len(), ldb) {
            return -8;
        }
        let info = <Self as LapackBackend<T>>::getrf(layout, n, n, a, lda, ipiv);
        if info != 0 {
            return info;
        }
        if n == 0 || nrhs == 0 {
            return 0;
        }

        let rows = swapped_rows(ipiv, n);
        let mut x = Mat::from_fn(n, nrhs, |i, j| b[layout.index(rows[i], j, ldb)]);
        let factors = load(layout, n, n, a, lda);
        lu_solve_in_place(&factors, &mut x);
        store(layout, &x, b, ldb);
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lapack::NaiveBackend;
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    #[test]
    fn test_getrf_matches_lapack_pivots() {
        let mut a = vec![1.0, 2.0, 3.0, 4.0];
        let mut ipiv = [0; 2];
        let info =
            <FaerBackend as LapackBackend<f64>>::getrf(Layout::RowMajor, 2, 2, &mut a, 2, &mut ipiv);
        assert_eq!(info, 0);
        assert_eq!(ipiv, [2, 2]);
        assert_relative_eq!(a[0], 3.0);
        assert_relative_eq!(a[1], 4.0);
        assert_relative_eq!(a[2], 1.0 / 3.0, epsilon = 1e-15);
        assert_relative_eq!(a[3], 2.0 - 4.0 / 3.0, epsilon = 1e-15);
    }

    #[test]
    fn test_factors_interoperate_with_naive_getri() {
        // Needs two swaps, so the pivot translation is exercised.
        let a0 = vec![0.0, 1.0, 2.0, 1.0, 0.0, 3.0, 4.0, -3.0, 8.0];
        let mut a = a0.clone();
        let mut ipiv = [0; 3];
        let info =
            <FaerBackend as LapackBackend<f64>>::getrf(Layout::RowMajor, 3, 3, &mut a, 3, &mut ipiv);
        assert_eq!(info, 0);

        let mut via_naive = a.clone();
        let mut via_faer = a;
        assert_eq!(
            <NaiveBackend as LapackBackend<f64>>::getri(Layout::RowMajor, 3, &mut via_naive, 3, &ipiv),
            0
        );
        assert_eq!(
            <FaerBackend as LapackBackend<f64>>::getri(Layout::RowMajor, 3, &mut via_faer, 3, &ipiv),
            0
        );
        for i in 0..3 {
            for j in 0..3 {
                let prod: f64 = (0..3).map(|k| a0[i * 3 + k] * via_faer[k * 3 + j]).sum();
                assert_relative_eq!(prod, if i == j { 1.0 } else { 0.0 }, epsilon = 1e-12);
                assert_relative_eq!(via_faer[i * 3 + j], via_naive[i * 3 + j], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_getrf_reports_zero_pivot() {
        let mut a = vec![1.0, 2.0, 2.0, 4.0];
        let mut ipiv = [0; 2];
        let info =
            <FaerBackend as LapackBackend<f64>>::getrf(Layout::RowMajor, 2, 2, &mut a, 2, &mut ipiv);
        assert_eq!(info, 2);
    }

    #[test]
    fn test_getri_rejects_bad_pivots() {
        let mut a = vec![1.0, 0.0, 0.0, 1.0];
        let info =
            <FaerBackend as LapackBackend<f64>>::getri(Layout::RowMajor, 2, &mut a, 2, &[0, 2]);
        assert_eq!(info, -5);
    }

    #[test]
    fn test_gesv_col_major() {
        // A = [[2,1],[1,3]] stored column-major, B = [3,5]
        let mut a = vec![2.0, 1.0, 1.0, 3.0];
        let mut b = vec![3.0, 5.0];
        let mut ipiv = [0; 2];
        let info = <FaerBackend as LapackBackend<f64>>::gesv(
            Layout::ColMajor,
            2,
            1,
            &mut a,
            2,
            &mut ipiv,
            &mut b,
            2,
        );
        assert_eq!(info, 0);
        assert_relative_eq!(b[0], 0.8, epsilon = 1e-14);
        assert_relative_eq!(b[1], 1.4, epsilon = 1e-14);
    }

    #[test]
    fn test_gesdd_complex_reconstructs() {
        let a0 = vec![
            Complex64::new(1.0, 1.0),
            Complex64::new(0.0, 2.0),
            Complex64::new(3.0, 0.0),
            Complex64::new(-1.0, 0.5),
            Complex64::new(2.0, -1.0),
            Complex64::new(0.0, 0.0),
        ];
        let mut a = a0.clone();
        let mut s = [0.0; 2];
        let mut u = vec![Complex64::new(0.0, 0.0); 4];
        let mut vt = vec![Complex64::new(0.0, 0.0); 9];
        let info = <FaerBackend as LapackBackend<Complex64>>::gesdd(
            Layout::RowMajor,
            SvdJob::All,
            2,
            3,
            &mut a,
            3,
            &mut s,
            &mut u,
            2,
            &mut vt,
            3,
        );
        assert_eq!(info, 0);
        assert!(s[0] >= s[1] && s[1] >= 0.0);
        for i in 0..2 {
            for j in 0..3 {
                let r: Complex64 = (0..2).map(|k| u[i * 2 + k] * s[k] * vt[k * 3 + j]).sum();
                assert_relative_eq!(r.re, a0[i * 3 + j].re, epsilon = 1e-12);
                assert_relative_eq!(r.im, a0[i * 3 + j].im, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_gesdd_non_finite_fails() {
        let mut a = vec![f64::NAN, 1.0, 1.0, 1.0];
        let mut s = [0.0; 2];
        let info = <FaerBackend as LapackBackend<f64>>::gesdd(
            Layout::RowMajor,
            SvdJob::None,
            2,
            2,
            &mut a,
            2,
            &mut s,
            &mut [],
            1,
            &mut [],
            1,
        );
        assert_eq!(info, 1);
    }
}
