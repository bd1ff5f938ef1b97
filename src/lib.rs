//! Strided vectors and matrices with safe wrappers around LAPACK-style
//! factorizations.
//!
//! The crate has three layers:
//!
//! - an arity-indexed vector protocol ([`FixedVector`]): any fixed-length
//!   storage that can `construct` itself from N supplied elements and `inspect`
//!   them in order gets `map`, `zip_with`, `fold`, `slice`, `concat` and friends
//!   for free;
//! - a strided storage model: immutable [`Vector`] / [`Matrix`] values backed by
//!   a shared buffer, and uniquely owned [`VectorMut`] / [`MatrixMut`] values
//!   that become immutable through a one-way `freeze`;
//! - a decomposition layer ([`svd`], [`inv`], [`solve`]) that thaws its inputs
//!   into fresh buffers, hands them to a [`LapackBackend`], and wraps the result.
//!
//! # Core Types
//!
//! - [`Vector`] / [`VectorMut`]: strided 1-D storage (offset, stride, length)
//! - [`Matrix`] / [`MatrixMut`]: row-major 2-D storage with a leading dimension
//! - [`StridedView`] / [`StridedViewMut`]: borrowed const-rank views
//! - [`ElementOp`] ([`Identity`], [`Conj`]): lazy element operations on matrices
//! - [`RightHandSide`]: pluggable right-hand-side containers for [`solve`]
//!
//! # Example
//!
//! ```rust
//! use strided_linalg::{inv, solve, Matrix, Vector};
//!
//! let a = Matrix::from_rows(&[[4.0_f64, 0.0], [0.0, 9.0]]);
//! let b = Vector::from_vec(vec![8.0, 18.0]);
//!
//! let x = solve(&a, &b).unwrap();
//! assert_eq!(x.to_vec(), vec![2.0, 2.0]);
//!
//! let a_inv = inv(&a).unwrap();
//! assert!((a_inv.get(1, 1) - 1.0 / 9.0).abs() < 1e-15);
//! ```
//!
//! # Backends
//!
//! The default `faer` feature routes every decomposition through faer
//! (`FaerBackend`). With `lapack` instead (`--no-default-features --features
//! lapack`) they go through LAPACKE (`LapackeBackend`), and with neither the
//! loop-based [`NaiveBackend`] is active. Each public operation also has a
//! `*_with_backend` variant that takes the backend as a type parameter.

#[cfg(all(feature = "faer", feature = "lapack"))]
compile_error!("Features `faer` and `lapack` are mutually exclusive. Use one or the other.");

pub mod arity;
pub mod decomp;
mod element_op;
pub mod lapack;
mod matrix;
mod rhs;
mod scalar;
pub mod vector;
pub mod view;

// ============================================================================
// Vector protocol
// ============================================================================
pub use arity::{Boxed, Fixed, FixedVector, Packed};

// ============================================================================
// Element operations and scalars
// ============================================================================
pub use element_op::{Conj, ElementOp, ElementOpApply, Identity};
pub use scalar::{RealScalar, Scalar};

// ============================================================================
// Storage and views
// ============================================================================
pub use matrix::{matmul, matvec, Matrix, MatrixMut};
pub use vector::{Vector, VectorMut};
pub use view::{SliceIndex, StridedIter, StridedRange, StridedView, StridedViewMut};

// ============================================================================
// Decompositions
// ============================================================================
pub use decomp::{
    det, det_with_backend, inv, inv_with_backend, singular_values,
    singular_values_with_backend, solve, solve_with_backend, svd, svd_with_backend, Svd,
};
pub use lapack::{ActiveBackend, LapackBackend, Layout, NaiveBackend, SvdJob};
pub use rhs::RightHandSide;

#[cfg(feature = "faer")]
pub use lapack::FaerBackend;
#[cfg(feature = "lapack")]
pub use lapack::LapackeBackend;

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during strided storage and decomposition operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinalgError {
    /// Shapes are incompatible for the operation.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// Matrix is not square when a square matrix was required.
    #[error("non-square matrix: rows={rows}, cols={cols}")]
    NonSquare { rows: usize, cols: usize },

    /// Right-hand side row count does not match the system dimension.
    #[error("right-hand side has {found} rows, system has {expected}")]
    RhsRowMismatch { expected: usize, found: usize },

    /// A slice range falls outside the dimension it slices.
    #[error("slice {start}..{end} (step {step}) out of bounds for length {len}")]
    SliceOutOfBounds {
        start: usize,
        end: usize,
        step: isize,
        len: usize,
    },

    /// Zero stride is not allowed for the specified dimension.
    #[error("invalid stride 0 for dim {dim}")]
    ZeroStride { dim: usize },

    /// A view would reach outside its backing buffer.
    #[error("view reaches outside its buffer")]
    OutOfBounds,

    /// A native factorization routine reported a nonzero status.
    #[error("{routine} failed with status {status}")]
    DecompositionFailed { routine: &'static str, status: i32 },
}

/// Result type for strided storage and decomposition operations.
pub type Result<T> = std::result::Result<T, LinalgError>;
