//! Pure-Rust implementation of the factorization routines.
//!
//! - LU: row-oriented Doolittle elimination with partial pivoting on the
//!   largest modulus in the column.
//! - Inverse: solve `A · X = I` against the LU factors.
//! - SVD: one-sided Jacobi on the columns of `A` (or `Aᴴ` when `A` is wide),
//!   then Gram-Schmidt completion of the left factor to a full unitary basis.
//!
//! These are reference-grade kernels: O(n³) with no blocking, meant for small
//! systems, tests, and builds without a LAPACK library.

use super::{fits, pivots_in_range, LapackBackend, Layout, NaiveBackend, Status, SvdJob};
use crate::scalar::Scalar;
use num_traits::{Float, One, Zero};
use std::cmp::Ordering;

/// Jacobi sweeps before giving up with status 1.
const MAX_SWEEPS: usize = 64;

impl<T: Scalar> LapackBackend<T> for NaiveBackend {
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
        jacobi_svd(layout, job, m, n, a, lda, s, u, ldu, vt, ldvt)
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
        if ipiv.len() < m.min(n) {
            return -6;
        }
        lu_factor(layout, m, n, a, lda, ipiv)
    }

    fn getri(layout: Layout, n: usize, a: &mut [T], lda: usize, ipiv: &[i32]) -> Status {
        if !fits(layout, n, n, a.len(), lda) {
            return -4;
        }
        if !pivots_in_range(ipiv, n) {
            return -5;
        }
        if let Some(k) = (0..n).find(|&k| a[layout.index(k, k, lda)] == T::zero()) {
            return (k + 1) as Status;
        }

        let mut x = vec![T::zero(); n * n];
        for i in 0..n {
            x[layout.index(i, i, n.max(1))] = T::one();
        }
        lu_solve(layout, n, n, a, lda, ipiv, &mut x, n.max(1));
        for i in 0..n {
            for j in 0..n {
                a[layout.index(i, j, lda)] = x[layout.index(i, j, n.max(1))];
            }
        }
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
        let info = lu_factor(layout, n, n, a, lda, ipiv);
        if info != 0 {
            return info;
        }
        lu_solve(layout, n, nrhs, a, lda, ipiv, b, ldb);
        0
    }
}

// ============================================================================
// LU
// ============================================================================

fn lu_factor<T: Scalar>(
    layout: Layout,
    m: usize,
    n: usize,
    a: &mut [T],
    lda: usize,
    ipiv: &mut [i32],
) -> Status {
    let at = |i: usize, j: usize| layout.index(i, j, lda);
    let mut info: Status = 0;

    for k in 0..m.min(n) {
        let mut p = k;
        let mut best = a[at(k, k)].modulus();
        for i in k + 1..m {
            let v = a[at(i, k)].modulus();
            if v > best {
                best = v;
                p = i;
            }
        }
        ipiv[k] = (p + 1) as i32;

        if a[at(p, k)] == T::zero() {
            if info == 0 {
                info = (k + 1) as Status;
            }
            continue;
        }

        if p != k {
            for j in 0..n {
                a.swap(at(k, j), at(p, j));
            }
        }

        let pivot = a[at(k, k)];
        for i in k + 1..m {
            let l = a[at(i, k)] / pivot;
            a[at(i, k)] = l;
            if l == T::zero() {
                continue;
            }
            for j in k + 1..n {
                let ukj = a[at(k, j)];
                a[at(i, j)] = a[at(i, j)] - l * ukj;
            }
        }
    }
    info
}

/// Solve `A · X = B` from LU factors; `b` is `n × nrhs`.
#[allow(clippy::too_many_arguments)]
fn lu_solve<T: Scalar>(
    layout: Layout,
    n: usize,
    nrhs: usize,
    a: &[T],
    lda: usize,
    ipiv: &[i32],
    b: &mut [T],
    ldb: usize,
) {
    let at = |i: usize, j: usize| layout.index(i, j, lda);
    let bt = |i: usize, j: usize| layout.index(i, j, ldb);

    for k in 0..n {
        let p = (ipiv[k] - 1) as usize;
        if p != k {
            for j in 0..nrhs {
                b.swap(bt(k, j), bt(p, j));
            }
        }
    }

    for j in 0..nrhs {
        // L · y = P · b, unit diagonal
        for i in 0..n {
            let mut acc = b[bt(i, j)];
            for k in 0..i {
                acc = acc - a[at(i, k)] * b[bt(k, j)];
            }
            b[bt(i, j)] = acc;
        }
        // U · x = y
        for i in (0..n).rev() {
            let mut acc = b[bt(i, j)];
            for k in i + 1..n {
                acc = acc - a[at(i, k)] * b[bt(k, j)];
            }
            b[bt(i, j)] = acc / a[at(i, i)];
        }
    }
}

// ============================================================================
// SVD
// ============================================================================

/// `Σ conj(xₖ) · yₖ`
fn inner<T: Scalar>(x: &[T], y: &[T]) -> T {
    x.iter()
        .zip(y)
        .fold(T::zero(), |acc, (&xk, &yk)| acc + xk.conj() * yk)
}

fn norm_sqr<T: Scalar>(x: &[T]) -> T::Real {
    x.iter()
        .fold(T::Real::zero(), |acc, &xk| acc + xk.modulus_sqr())
}

/// Rotate columns `i < j`: `(cᵢ, cⱼ) <- (c·cᵢ - s·cⱼ, s·cᵢ + c·cⱼ)`.
fn rotate<T: Scalar>(cols: &mut [Vec<T>], i: usize, j: usize, c: T, s: T) {
    let (left, right) = cols.split_at_mut(j);
    for (xi, xj) in left[i].iter_mut().zip(right[0].iter_mut()) {
        let (a, b) = (*xi, *xj);
        *xi = c * a - s * b;
        *xj = s * a + c * b;
    }
}

#[allow(clippy::too_many_arguments)]
fn jacobi_svd<T: Scalar>(
    layout: Layout,
    job: SvdJob,
    m: usize,
    n: usize,
    a: &[T],
    lda: usize,
    s: &mut [T::Real],
    u: &mut [T],
    ldu: usize,
    vt: &mut [T],
    ldvt: usize,
) -> Status {
    if m == 0 || n == 0 {
        return 0;
    }

    // Work on the tall orientation: W = A (m >= n) or W = Aᴴ (m < n), p >= q.
    let tall = m >= n;
    let (p, q) = if tall { (m, n) } else { (n, m) };
    let mut w: Vec<Vec<T>> = (0..q)
        .map(|c| {
            (0..p)
                .map(|r| {
                    if tall {
                        a[layout.index(r, c, lda)]
                    } else {
                        a[layout.index(c, r, lda)].conj()
                    }
                })
                .collect()
        })
        .collect();
    let mut v: Vec<Vec<T>> = (0..q)
        .map(|c| (0..q).map(|r| if r == c { T::one() } else { T::zero() }).collect())
        .collect();

    let zero = T::Real::zero();
    let one = T::Real::one();
    let two = one + one;
    let eps = T::Real::epsilon();

    // Scale to unit max-abs entry so the squared column norms neither
    // overflow nor go subnormal; σ is scaled back at the end.
    let mut amax = zero;
    for x in w.iter().flatten() {
        let v = x.modulus();
        if !v.is_finite() {
            return 1;
        }
        if v > amax {
            amax = v;
        }
    }
    if amax == zero {
        amax = one;
    }
    let scale = T::from_real(amax);
    for x in w.iter_mut().flatten() {
        *x = *x / scale;
    }

    // Rounding in wᵢᴴwⱼ grows with the column length.
    let tol = eps * num_traits::cast::<usize, T::Real>(p).unwrap_or(one);

    let mut converged = false;
    for _ in 0..MAX_SWEEPS {
        let mut rotated = false;
        for i in 0..q {
            for j in i + 1..q {
                let alpha = norm_sqr(&w[i]);
                let beta = norm_sqr(&w[j]);
                let gamma = inner(&w[i], &w[j]);
                let g = gamma.modulus();
                if g == zero || g <= tol * alpha.sqrt() * beta.sqrt() {
                    continue;
                }
                rotated = true;

                // Make wᵢᴴwⱼ real and positive by rephasing column j.
                let phase = (gamma / T::from_real(g)).conj();
                for x in w[j].iter_mut().chain(v[j].iter_mut()) {
                    *x = *x * phase;
                }

                let zeta = (beta - alpha) / (two * g);
                let sign = if zeta < zero { -one } else { one };
                let t = sign / (zeta.abs() + one.hypot(zeta));
                let c = one / one.hypot(t);
                let sn = c * t;
                rotate(&mut w, i, j, T::from_real(c), T::from_real(sn));
                rotate(&mut v, i, j, T::from_real(c), T::from_real(sn));
            }
        }
        if !rotated {
            converged = true;
            break;
        }
    }
    if !converged {
        return 1;
    }

    let sigma: Vec<T::Real> = w.iter().map(|col| norm_sqr(col).sqrt()).collect();
    let mut order: Vec<usize> = (0..q).collect();
    order.sort_by(|&x, &y| sigma[y].partial_cmp(&sigma[x]).unwrap_or(Ordering::Equal));
    for (dst, &src) in order.iter().enumerate() {
        s[dst] = sigma[src] * amax;
    }
    if job == SvdJob::None {
        return 0;
    }

    // Left vectors wₖ/σₖ, re-orthogonalized. A column swamped by rounding
    // (σₖ ≈ 0) is replaced by a fresh basis vector; its σₖ makes the choice
    // irrelevant to the product.
    let half = one / two;
    let mut left: Vec<Vec<T>> = Vec::with_capacity(p);
    for &src in &order {
        let mut cand: Vec<T> = if sigma[src] > zero {
            let inv = T::from_real(one / sigma[src]);
            w[src].iter().map(|&x| x * inv).collect()
        } else {
            vec![T::zero(); p]
        };
        let norm = orthogonalize(&left, &mut cand);
        let col = if norm > half {
            normalized(cand, norm)
        } else {
            match next_basis_vector(&left, p) {
                Some(col) => col,
                None => return 1,
            }
        };
        left.push(col);
    }
    while left.len() < p {
        match next_basis_vector(&left, p) {
            Some(col) => left.push(col),
            None => return 1,
        }
    }

    let right: Vec<&Vec<T>> = order.iter().map(|&src| &v[src]).collect();
    if tall {
        // A = W·Vᴴ: U = left, Vᴴ[k][j] = conj(V[j][k])
        for i in 0..m {
            for k in 0..m {
                u[layout.index(i, k, ldu)] = left[k][i];
            }
        }
        for k in 0..n {
            for j in 0..n {
                vt[layout.index(k, j, ldvt)] = right[k][j].conj();
            }
        }
    } else {
        // Aᴴ = U_b·Σ·V_bᴴ, so A = V_b·Σ·U_bᴴ
        for i in 0..m {
            for k in 0..m {
                u[layout.index(i, k, ldu)] = right[k][i];
            }
        }
        for k in 0..n {
            for j in 0..n {
                vt[layout.index(k, j, ldvt)] = left[k][j].conj();
            }
        }
    }
    0
}

/// Remove the components of `v` along `basis` (two passes) and return the
/// norm of what is left.
fn orthogonalize<T: Scalar>(basis: &[Vec<T>], v: &mut [T]) -> T::Real {
    for _ in 0..2 {
        for b in basis {
            let proj = inner(b, v);
            for (x, &bk) in v.iter_mut().zip(b) {
                *x = *x - bk * proj;
            }
        }
    }
    norm_sqr(v).sqrt()
}

fn normalized<T: Scalar>(v: Vec<T>, norm: T::Real) -> Vec<T> {
    let inv = T::from_real(T::Real::one() / norm);
    v.into_iter().map(|x| x * inv).collect()
}

/// Unit vector orthogonal to `basis`: the standard basis vector with the
/// largest residual after projection.
fn next_basis_vector<T: Scalar>(basis: &[Vec<T>], dim: usize) -> Option<Vec<T>> {
    let mut best: Option<(T::Real, Vec<T>)> = None;
    for e in 0..dim {
        let mut cand = vec![T::zero(); dim];
        cand[e] = T::one();
        let norm = orthogonalize(basis, &mut cand);
        if best.as_ref().map_or(true, |(top, _)| norm > *top) {
            best = Some((norm, cand));
        }
    }
    match best {
        Some((norm, cand)) if norm > T::Real::zero() => Some(normalized(cand, norm)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use num_complex::Complex64;

    fn lu(a: &mut [f64], n: usize, ipiv: &mut [i32]) -> Status {
        <NaiveBackend as LapackBackend<f64>>::getrf(Layout::RowMajor, n, n, a, n, ipiv)
    }

    #[test]
    fn test_getrf_pivots() {
        let mut a = vec![1.0, 2.0, 3.0, 4.0];
        let mut ipiv = [0; 2];
        assert_eq!(lu(&mut a, 2, &mut ipiv), 0);
        assert_eq!(ipiv, [2, 2]);
        // P·A = [[3,4],[1,2]] = [[1,0],[1/3,1]]·[[3,4],[0,2/3]]
        assert_abs_diff_eq!(a[0], 3.0);
        assert_abs_diff_eq!(a[1], 4.0);
        assert_abs_diff_eq!(a[2], 1.0 / 3.0, epsilon = 1e-15);
        assert_abs_diff_eq!(a[3], 2.0 / 3.0, epsilon = 1e-15);
    }

    #[test]
    fn test_getrf_reports_first_zero_pivot() {
        let mut a = vec![1.0, 2.0, 2.0, 4.0];
        let mut ipiv = [0; 2];
        assert_eq!(lu(&mut a, 2, &mut ipiv), 2);

        let mut z = vec![0.0; 9];
        let mut ipiv = [0; 3];
        assert_eq!(lu(&mut z, 3, &mut ipiv), 1);
    }

    #[test]
    fn test_illegal_arguments() {
        let mut a = vec![0.0; 3];
        let mut ipiv = [0; 2];
        assert_eq!(lu(&mut a, 2, &mut ipiv), -5);
        let mut a = vec![0.0; 4];
        let mut short = [0; 1];
        assert_eq!(lu(&mut a, 2, &mut short), -6);
    }

    #[test]
    fn test_gesv_col_major() {
        // A = [[2,1],[1,3]] stored column-major, B = [3,5]
        let mut a = vec![2.0, 1.0, 1.0, 3.0];
        let mut b = vec![3.0, 5.0];
        let mut ipiv = [0; 2];
        let info = <NaiveBackend as LapackBackend<f64>>::gesv(
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
        assert_abs_diff_eq!(b[0], 0.8, epsilon = 1e-14);
        assert_abs_diff_eq!(b[1], 1.4, epsilon = 1e-14);
    }

    #[test]
    fn test_getri_singular() {
        let mut a = vec![1.0, 2.0, 2.0, 4.0];
        let mut ipiv = [0; 2];
        assert_eq!(lu(&mut a, 2, &mut ipiv), 2);
        let info =
            <NaiveBackend as LapackBackend<f64>>::getri(Layout::RowMajor, 2, &mut a, 2, &ipiv);
        assert_eq!(info, 2);
    }

    #[test]
    fn test_getri_rejects_bad_pivots() {
        for ipiv in [[0, 2], [1, -3], [1, 3]] {
            let mut a = vec![1.0, 0.0, 0.0, 1.0];
            let info =
                <NaiveBackend as LapackBackend<f64>>::getri(Layout::RowMajor, 2, &mut a, 2, &ipiv);
            assert_eq!(info, -5);
            assert_eq!(a, vec![1.0, 0.0, 0.0, 1.0]);
        }
    }

    fn svd_2x2(a: [f64; 4]) -> (Status, [f64; 2], [f64; 4], [f64; 4]) {
        let mut work = a.to_vec();
        let mut s = [0.0; 2];
        let mut u = [0.0; 4];
        let mut vt = [0.0; 4];
        let info = <NaiveBackend as LapackBackend<f64>>::gesdd(
            Layout::RowMajor,
            SvdJob::All,
            2,
            2,
            &mut work,
            2,
            &mut s,
            &mut u,
            2,
            &mut vt,
            2,
        );
        (info, s, u, vt)
    }

    #[test]
    fn test_gesdd_extreme_scales() {
        let sigma = [5.464985704219043, 2.0 / 5.464985704219043];
        for scale in [1e160, 1e-160, 1e300] {
            let a = [scale, 2.0 * scale, 3.0 * scale, 4.0 * scale];
            let (info, s, u, vt) = svd_2x2(a);
            assert_eq!(info, 0);
            for k in 0..2 {
                assert_relative_eq!(s[k], sigma[k] * scale, max_relative = 1e-12);
            }
            for i in 0..2 {
                for j in 0..2 {
                    let r: f64 = (0..2).map(|k| u[i * 2 + k] * s[k] * vt[k * 2 + j]).sum();
                    assert_relative_eq!(r, a[i * 2 + j], max_relative = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_gesdd_infinite_entry_fails() {
        let (info, ..) = svd_2x2([f64::INFINITY, 1.0, 1.0, 1.0]);
        assert_eq!(info, 1);
    }

    #[test]
    fn test_gesdd_values_only() {
        let mut a = vec![3.0, 0.0, 0.0, 0.0, -2.0, 0.0];
        let mut s = [0.0; 2];
        let info = <NaiveBackend as LapackBackend<f64>>::gesdd(
            Layout::RowMajor,
            SvdJob::None,
            2,
            3,
            &mut a,
            3,
            &mut s,
            &mut [],
            1,
            &mut [],
            1,
        );
        assert_eq!(info, 0);
        assert_abs_diff_eq!(s[0], 3.0, epsilon = 1e-14);
        assert_abs_diff_eq!(s[1], 2.0, epsilon = 1e-14);
    }

    #[test]
    fn test_gesdd_nan_does_not_converge() {
        let mut a = vec![f64::NAN, 1.0, 1.0, 1.0];
        let mut s = [0.0; 2];
        let mut u = [0.0; 4];
        let mut vt = [0.0; 4];
        let info = <NaiveBackend as LapackBackend<f64>>::gesdd(
            Layout::RowMajor,
            SvdJob::All,
            2,
            2,
            &mut a,
            2,
            &mut s,
            &mut u,
            2,
            &mut vt,
            2,
        );
        assert_eq!(info, 1);
    }

    #[test]
    fn test_basis_completion_complex() {
        let h = 0.5f64.sqrt();
        let mut basis = vec![vec![
            Complex64::new(h, 0.0),
            Complex64::new(0.0, h),
            Complex64::zero(),
        ]];
        while basis.len() < 3 {
            let next = next_basis_vector(&basis, 3).unwrap();
            basis.push(next);
        }
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                let d = inner(&basis[i], &basis[j]);
                assert_abs_diff_eq!(d.re, expected, epsilon = 1e-12);
                assert_abs_diff_eq!(d.im, 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_gesdd_rank_one() {
        // [[1,2],[2,4],[3,6]] = [1,2,3]ᵀ·[1,2]
        let mut a = vec![1.0, 2.0, 2.0, 4.0, 3.0, 6.0];
        let mut s = [0.0; 2];
        let mut u = [0.0; 9];
        let mut vt = [0.0; 4];
        let info = <NaiveBackend as LapackBackend<f64>>::gesdd(
            Layout::RowMajor,
            SvdJob::All,
            3,
            2,
            &mut a,
            2,
            &mut s,
            &mut u,
            3,
            &mut vt,
            2,
        );
        assert_eq!(info, 0);
        assert_abs_diff_eq!(s[0], 14.0f64.sqrt() * 5.0f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(s[1], 0.0, epsilon = 1e-12);
        // Columns of U stay orthonormal even though σ₁ = 0.
        for i in 0..3 {
            for j in 0..3 {
                let d: f64 = (0..3).map(|k| u[k * 3 + i] * u[k * 3 + j]).sum();
                assert_abs_diff_eq!(d, if i == j { 1.0 } else { 0.0 }, epsilon = 1e-12);
            }
        }
    }
}
