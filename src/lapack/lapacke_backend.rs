//! LAPACKE-backed factorization routines.
//!
//! Dimensions are converted to LAPACK's `i32`; a value that does not fit is
//! reported as an illegal argument (negative status at its position) without
//! calling into the library. Buffer sizes are checked the same way, since
//! LAPACKE trusts the pointers it is given.

use super::{fits, pivots_in_range, LapackBackend, LapackeBackend, Layout, Status, SvdJob};
use num_complex::{Complex32, Complex64};

fn to_lapacke(layout: Layout) -> ::lapacke::Layout {
    match layout {
        Layout::RowMajor => ::lapacke::Layout::RowMajor,
        Layout::ColMajor => ::lapacke::Layout::ColumnMajor,
    }
}

macro_rules! lapack_int {
    ($value:expr, $position:expr) => {
        match i32::try_from($value) {
            Ok(v) => v,
            Err(_) => return -($position),
        }
    };
}

macro_rules! impl_lapacke_backend {
    ($t:ty, $gesdd:ident, $getrf:ident, $getri:ident, $gesv:ident) => {
        impl LapackBackend<$t> for LapackeBackend {
            fn gesdd(
                layout: Layout,
                job: SvdJob,
                m: usize,
                n: usize,
                a: &mut [$t],
                lda: usize,
                s: &mut [<$t as crate::Scalar>::Real],
                u: &mut [$t],
                ldu: usize,
                vt: &mut [$t],
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
                let m = lapack_int!(m, 3);
                let n = lapack_int!(n, 4);
                let lda = lapack_int!(lda, 6);
                let ldu = lapack_int!(ldu.max(1), 9);
                let ldvt = lapack_int!(ldvt.max(1), 11);
                // SAFETY: every buffer was checked above to cover the extent
                // LAPACKE addresses for these dimensions and leading dimensions.
                unsafe {
                    ::lapacke::$gesdd(
                        to_lapacke(layout),
                        job.to_char(),
                        m,
                        n,
                        a,
                        lda,
                        s,
                        u,
                        ldu,
                        vt,
                        ldvt,
                    )
                }
            }

            fn getrf(
                layout: Layout,
                m: usize,
                n: usize,
                a: &mut [$t],
                lda: usize,
                ipiv: &mut [i32],
            ) -> Status {
                if !fits(layout, m, n, a.len(), lda) {
                    return -5;
                }
                if ipiv.len() < m.min(n) {
                    return -6;
                }
                let m = lapack_int!(m, 2);
                let n = lapack_int!(n, 3);
                let lda = lapack_int!(lda, 5);
                // SAFETY: buffer extents checked above.
                unsafe { ::lapacke::$getrf(to_lapacke(layout), m, n, a, lda, ipiv) }
            }

            fn getri(layout: Layout, n: usize, a: &mut [$t], lda: usize, ipiv: &[i32]) -> Status {
                if !fits(layout, n, n, a.len(), lda) {
                    return -4;
                }
                if !pivots_in_range(ipiv, n) {
                    return -5;
                }
                let n = lapack_int!(n, 2);
                let lda = lapack_int!(lda, 4);
                // SAFETY: buffer extents and pivot rows checked above.
                unsafe { ::lapacke::$getri(to_lapacke(layout), n, a, lda, ipiv) }
            }

            fn gesv(
                layout: Layout,
                n: usize,
                nrhs: usize,
                a: &mut [$t],
                lda: usize,
                ipiv: &mut [i32],
                b: &mut [$t],
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
                let n = lapack_int!(n, 2);
                let nrhs = lapack_int!(nrhs, 3);
                let lda = lapack_int!(lda, 5);
                let ldb = lapack_int!(ldb, 8);
                // SAFETY: buffer extents checked above.
                unsafe { ::lapacke::$gesv(to_lapacke(layout), n, nrhs, a, lda, ipiv, b, ldb) }
            }
        }
    };
}

impl_lapacke_backend!(f32, sgesdd, sgetrf, sgetri, sgesv);
impl_lapacke_backend!(f64, dgesdd, dgetrf, dgetri, dgesv);
impl_lapacke_backend!(Complex32, cgesdd, cgetrf, cgetri, cgesv);
impl_lapacke_backend!(Complex64, zgesdd, zgetrf, zgetri, zgesv);
