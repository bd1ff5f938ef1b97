//! Scalar type bounds for strided storage and the factorization layer.

use crate::element_op::ElementOpApply;
use num_complex::Complex;
use num_traits::{Float, Num};

/// Element types accepted by the decomposition layer.
///
/// Covers the four LAPACK precisions: `f32`, `f64`, `Complex32` and `Complex64`.
/// `Real` is the matching real type, used for singular values and pivot
/// magnitudes.
pub trait Scalar:
    ElementOpApply
    + Num
    + std::ops::Neg<Output = Self>
    + std::fmt::Debug
    + Send
    + Sync
    + 'static
{
    /// The real counterpart of this scalar.
    type Real: RealScalar;

    /// Embed a real value.
    fn from_real(re: Self::Real) -> Self;

    /// Real part.
    fn real(self) -> Self::Real;

    /// Absolute value (complex modulus).
    fn modulus(self) -> Self::Real;

    /// Squared modulus, avoiding the square root.
    fn modulus_sqr(self) -> Self::Real;
}

/// Real scalars: their own real counterpart, with the full `Float` toolbox.
pub trait RealScalar: Scalar<Real = Self> + Float {}

macro_rules! impl_scalar_real {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                type Real = $t;

                #[inline(always)]
                fn from_real(re: $t) -> Self { re }
                #[inline(always)]
                fn real(self) -> $t { self }
                #[inline(always)]
                fn modulus(self) -> $t { self.abs() }
                #[inline(always)]
                fn modulus_sqr(self) -> $t { self * self }
            }

            impl RealScalar for $t {}
        )*
    };
}

impl_scalar_real!(f32, f64);

macro_rules! impl_scalar_complex {
    ($($r:ty),*) => {
        $(
            impl Scalar for Complex<$r> {
                type Real = $r;

                #[inline(always)]
                fn from_real(re: $r) -> Self { Complex::new(re, 0.0) }
                #[inline(always)]
                fn real(self) -> $r { self.re }
                #[inline(always)]
                fn modulus(self) -> $r { self.norm() }
                #[inline(always)]
                fn modulus_sqr(self) -> $r { self.norm_sqr() }
            }
        )*
    };
}

impl_scalar_complex!(f32, f64);
