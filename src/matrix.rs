//! Strided 2-D storage.
//!
//! [`Matrix`] is an immutable window `(buffer, offset, rows, cols, row_stride,
//! col_stride)` over a shared `Arc<[T]>`, tagged with a lazy [`ElementOp`].
//! Transpose and conjugate are zero-copy: the first swaps the strides, the
//! second flips the element operation at the type level.
//!
//! [`MatrixMut`] is uniquely owned, compact and row-major, with leading
//! dimension equal to its column count. It is the only layout handed to the
//! factorization backends.

use crate::element_op::{ElementOp, ElementOpApply, Identity};
use crate::scalar::Scalar;
use crate::vector::Vector;
use crate::view::{resolve_slice, validate_bounds, SliceIndex, StridedView, StridedViewMut};
use crate::{LinalgError, Result};
use num_traits::Zero;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::sync::Arc;

/// Immutable strided matrix over a shared buffer.
///
/// # Type Parameters
/// - `T`: Element type
/// - `Op`: Element operation applied lazily on every read (default: Identity)
///
/// # Example
/// ```
/// use num_complex::Complex64;
/// use strided_linalg::Matrix;
///
/// let i = Complex64::i();
/// let a = Matrix::from_rows(&[[i, 2.0 * i], [Complex64::new(3.0, 0.0), -i]]);
///
/// // Hermitian adjoint: no copy, reads are conjugated and transposed.
/// let ah = a.h();
/// assert_eq!(ah.get(1, 0), -2.0 * i);
/// assert_eq!(ah.get(0, 1), Complex64::new(3.0, 0.0));
/// ```
pub struct Matrix<T, Op: ElementOp = Identity> {
    data: Arc<[T]>,
    offset: usize,
    rows: usize,
    cols: usize,
    row_stride: isize,
    col_stride: isize,
    _op: PhantomData<Op>,
}

impl<T, Op: ElementOp> Clone for Matrix<T, Op> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            offset: self.offset,
            rows: self.rows,
            cols: self.cols,
            row_stride: self.row_stride,
            col_stride: self.col_stride,
            _op: PhantomData,
        }
    }
}

impl<T> Matrix<T> {
    /// Create a strided view over `data`.
    ///
    /// # Errors
    /// Returns an error if any element would fall outside `data`, or a stride
    /// is zero on a dimension longer than one.
    pub fn new(
        data: Arc<[T]>,
        offset: usize,
        [rows, cols]: [usize; 2],
        [row_stride, col_stride]: [isize; 2],
    ) -> Result<Self> {
        let [row_stride, col_stride] =
            validate_bounds(data.len(), &[rows, cols], &[row_stride, col_stride], offset)?;
        Ok(Self {
            data,
            offset,
            rows,
            cols,
            row_stride,
            col_stride,
            _op: PhantomData,
        })
    }

    /// Take ownership of a row-major buffer.
    ///
    /// # Errors
    /// Returns [`LinalgError::ShapeMismatch`] if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(LinalgError::ShapeMismatch(vec![rows, cols], vec![data.len()]));
        }
        Ok(Self::compact(data.into(), rows, cols))
    }

    /// Build a compact matrix from `f(i, j)`.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let data: Vec<T> = (0..rows * cols).map(|k| f(k / cols, k % cols)).collect();
        Self::compact(data.into(), rows, cols)
    }

    fn compact(data: Arc<[T]>, rows: usize, cols: usize) -> Self {
        Self {
            data,
            offset: 0,
            rows,
            cols,
            row_stride: cols.max(1) as isize,
            col_stride: 1,
            _op: PhantomData,
        }
    }

    /// Zero-copy view of row `i` as a vector.
    ///
    /// # Panics
    /// Panics if `i >= rows`.
    pub fn row(&self, i: usize) -> Vector<T> {
        assert!(i < self.rows, "row index out of bounds");
        Vector::from_parts(
            Arc::clone(&self.data),
            self.index_of(i, 0),
            self.col_stride,
            self.cols,
        )
    }

    /// Zero-copy view of column `j` as a vector.
    ///
    /// # Panics
    /// Panics if `j >= cols`.
    pub fn col(&self, j: usize) -> Vector<T> {
        assert!(j < self.cols, "column index out of bounds");
        Vector::from_parts(
            Arc::clone(&self.data),
            self.index_of(0, j),
            self.row_stride,
            self.rows,
        )
    }
}

impl<T: Copy> Matrix<T> {
    /// Copy a list of fixed-width rows.
    pub fn from_rows<const C: usize>(rows: &[[T; C]]) -> Self {
        let data: Vec<T> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Self::compact(data.into(), rows.len(), C)
    }
}

impl<T: Scalar> Matrix<T> {
    /// All-zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_fn(rows, cols, |_, _| T::zero())
    }

    /// `n × n` identity.
    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| if i == j { T::one() } else { T::zero() })
    }

    /// `rows × cols` matrix with `diag` on the main diagonal.
    ///
    /// # Errors
    /// Returns [`LinalgError::ShapeMismatch`] if `diag` is not `min(rows, cols)` long.
    pub fn from_diag(rows: usize, cols: usize, diag: &Vector<T>) -> Result<Self> {
        let k = rows.min(cols);
        if diag.len() != k {
            return Err(LinalgError::ShapeMismatch(vec![k], vec![diag.len()]));
        }
        Ok(Self::from_fn(rows, cols, |i, j| {
            if i == j {
                diag[i]
            } else {
                T::zero()
            }
        }))
    }
}

impl<T, Op: ElementOp> Matrix<T, Op> {
    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `[rows, cols]`.
    #[inline]
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    #[inline]
    pub fn row_stride(&self) -> isize {
        self.row_stride
    }

    #[inline]
    pub fn col_stride(&self) -> isize {
        self.col_stride
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether both matrices are windows onto the same allocation.
    pub fn shares_buffer<Op2: ElementOp>(&self, other: &Matrix<T, Op2>) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Leading dimension if this matrix can be passed to a row-major BLAS or
    /// LAPACK routine as-is: unit column stride, rows that do not overlap, and
    /// no pending element operation.
    pub fn leading_dimension(&self) -> Option<usize> {
        if !Op::IS_IDENTITY {
            return None;
        }
        let unit_cols = self.col_stride == 1 || self.cols <= 1;
        let ld = if self.rows <= 1 {
            self.cols.max(1) as isize
        } else {
            self.row_stride
        };
        if unit_cols && ld >= self.cols.max(1) as isize {
            Some(ld as usize)
        } else {
            None
        }
    }

    #[inline]
    fn index_of(&self, i: usize, j: usize) -> usize {
        (self.offset as isize + i as isize * self.row_stride + j as isize * self.col_stride) as usize
    }

    /// Borrow as a 2-D strided view carrying the same element operation.
    pub fn view(&self) -> StridedView<'_, T, 2, Op> {
        // SAFETY: the layout was validated against this buffer when the matrix
        // (or the matrix it was derived from) was built.
        unsafe {
            StridedView::new_unchecked(
                &self.data,
                [self.rows, self.cols],
                [self.row_stride, self.col_stride],
                self.offset,
            )
        }
    }

    /// Zero-copy transpose.
    pub fn t(&self) -> Matrix<T, Op> {
        Matrix {
            data: Arc::clone(&self.data),
            offset: self.offset,
            rows: self.cols,
            cols: self.rows,
            row_stride: self.col_stride,
            col_stride: self.row_stride,
            _op: PhantomData,
        }
    }

    /// Zero-copy complex conjugate.
    pub fn conj(&self) -> Matrix<T, Op::ComposeConj> {
        Matrix {
            data: Arc::clone(&self.data),
            offset: self.offset,
            rows: self.rows,
            cols: self.cols,
            row_stride: self.row_stride,
            col_stride: self.col_stride,
            _op: PhantomData,
        }
    }

    /// Zero-copy conjugate transpose.
    pub fn h(&self) -> Matrix<T, Op::ComposeConj> {
        self.t().conj()
    }

    /// Zero-copy sub-matrix.
    ///
    /// # Errors
    /// Returns [`LinalgError::SliceOutOfBounds`] if either range leaves its
    /// dimension.
    pub fn slice<I0: SliceIndex, I1: SliceIndex>(&self, rows: I0, cols: I1) -> Result<Matrix<T, Op>> {
        let (start0, len0, step0) = resolve_slice(&rows, 0, self.rows)?;
        let (start1, len1, step1) = resolve_slice(&cols, 1, self.cols)?;
        let offset = if len0 == 0 || len1 == 0 {
            self.offset
        } else {
            self.index_of(start0, start1)
        };
        Ok(Matrix {
            data: Arc::clone(&self.data),
            offset,
            rows: len0,
            cols: len1,
            row_stride: self.row_stride * step0,
            col_stride: self.col_stride * step1,
            _op: PhantomData,
        })
    }
}

impl<T: ElementOpApply, Op: ElementOp> Matrix<T, Op> {
    /// Element `(i, j)` with the element operation applied.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        assert!(i < self.rows && j < self.cols, "index out of bounds");
        Op::apply(self.data[self.index_of(i, j)])
    }

    /// Row-major copy of the visible elements.
    pub fn to_vec(&self) -> Vec<T> {
        self.view().iter().collect()
    }

    /// Copy into nested rows.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        (0..self.rows)
            .map(|i| (0..self.cols).map(|j| self.get(i, j)).collect())
            .collect()
    }

    /// Deep copy into a fresh compact row-major buffer, materializing the
    /// element operation and any transposition.
    pub fn thaw(&self) -> MatrixMut<T> {
        let data = match self.leading_dimension() {
            Some(ld) if self.rows > 0 && self.cols > 0 => {
                let mut data = Vec::with_capacity(self.rows * self.cols);
                for i in 0..self.rows {
                    let start = self.offset + i * ld;
                    data.extend_from_slice(&self.data[start..start + self.cols]);
                }
                data
            }
            _ => self.to_vec(),
        };
        MatrixMut {
            data,
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl<T: ElementOpApply + PartialEq, Op: ElementOp, Op2: ElementOp> PartialEq<Matrix<T, Op2>>
    for Matrix<T, Op>
{
    fn eq(&self, other: &Matrix<T, Op2>) -> bool {
        self.shape() == other.shape()
            && (0..self.rows).all(|i| (0..self.cols).all(|j| self.get(i, j) == other.get(i, j)))
    }
}

impl<T: ElementOpApply + fmt::Debug, Op: ElementOp> fmt::Debug for Matrix<T, Op> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.to_rows()).finish()
    }
}

// ============================================================================
// MatrixMut
// ============================================================================

/// Uniquely owned, compact, row-major matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixMut<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> MatrixMut<T> {
    /// Take ownership of a row-major buffer.
    ///
    /// # Errors
    /// Returns [`LinalgError::ShapeMismatch`] if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(LinalgError::ShapeMismatch(vec![rows, cols], vec![data.len()]));
        }
        Ok(Self { data, rows, cols })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major leading dimension, always at least one.
    #[inline]
    pub fn ld(&self) -> usize {
        self.cols.max(1)
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        self[(i, j)] = value;
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Borrow as a 2-D strided view.
    pub fn view(&self) -> StridedView<'_, T, 2> {
        // SAFETY: compact row-major layout of rows * cols elements.
        unsafe {
            StridedView::new_unchecked(
                &self.data,
                [self.rows, self.cols],
                [self.cols.max(1) as isize, 1],
                0,
            )
        }
    }

    /// Borrow as a mutable 2-D strided view.
    pub fn view_mut(&mut self) -> StridedViewMut<'_, T, 2> {
        let size = [self.rows, self.cols];
        let strides = [self.cols.max(1) as isize, 1];
        match StridedViewMut::new(&mut self.data, size, strides, 0) {
            Ok(view) => view,
            Err(_) => unreachable!("compact layout is always in bounds"),
        }
    }

    /// Give up write access and share the buffer.
    pub fn freeze(self) -> Matrix<T> {
        Matrix::compact(self.data.into(), self.rows, self.cols)
    }

    /// Unwrap the row-major buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Clone + Zero> MatrixMut<T> {
    /// All-zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![T::zero(); rows * cols],
            rows,
            cols,
        }
    }
}

impl<T: Scalar> MatrixMut<T> {
    /// `n × n` identity.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = T::one();
        }
        m
    }
}

impl<T: Copy> MatrixMut<T> {
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self[(i, j)]
    }
}

impl<T> Index<(usize, usize)> for MatrixMut<T> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        assert!(i < self.rows && j < self.cols, "index out of bounds");
        &self.data[i * self.cols + j]
    }
}

impl<T> IndexMut<(usize, usize)> for MatrixMut<T> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        assert!(i < self.rows && j < self.cols, "index out of bounds");
        &mut self.data[i * self.cols + j]
    }
}

// ============================================================================
// Products
// ============================================================================

/// `C = alpha * A * B + beta * C` over arbitrary strided views.
///
/// Element operations on `A` and `B` are applied on read.
pub(crate) fn gemm_into<T, OpA, OpB>(
    alpha: T,
    a: &StridedView<'_, T, 2, OpA>,
    b: &StridedView<'_, T, 2, OpB>,
    beta: T,
    c: &mut StridedViewMut<'_, T, 2>,
) -> Result<()>
where
    T: Scalar,
    OpA: ElementOp,
    OpB: ElementOp,
{
    let (m, k) = (a.nrows(), a.ncols());
    let n = b.ncols();
    if b.nrows() != k {
        return Err(LinalgError::ShapeMismatch(
            vec![m, k],
            vec![b.nrows(), b.ncols()],
        ));
    }
    if *c.size() != [m, n] {
        return Err(LinalgError::ShapeMismatch(vec![m, n], c.size().to_vec()));
    }

    for i in 0..m {
        for j in 0..n {
            let mut acc = T::zero();
            for l in 0..k {
                acc = acc + a.get([i, l]) * b.get([l, j]);
            }
            let prev = if beta == T::zero() {
                T::zero()
            } else {
                beta * c.get([i, j])
            };
            c.set([i, j], alpha * acc + prev);
        }
    }
    Ok(())
}

/// Matrix product `A * B`, honouring transposes and conjugates on either side.
///
/// # Errors
/// Returns [`LinalgError::ShapeMismatch`] if `a.cols() != b.rows()`.
pub fn matmul<T, OpA, OpB>(a: &Matrix<T, OpA>, b: &Matrix<T, OpB>) -> Result<Matrix<T>>
where
    T: Scalar,
    OpA: ElementOp,
    OpB: ElementOp,
{
    let mut out = MatrixMut::zeros(a.rows(), b.cols());
    gemm_into(T::one(), &a.view(), &b.view(), T::zero(), &mut out.view_mut())?;
    Ok(out.freeze())
}

/// Matrix-vector product `A * x`.
///
/// # Errors
/// Returns [`LinalgError::ShapeMismatch`] if `a.cols() != x.len()`.
pub fn matvec<T, Op>(a: &Matrix<T, Op>, x: &Vector<T>) -> Result<Vector<T>>
where
    T: Scalar,
    Op: ElementOp,
{
    let x_view = x.view();
    let x_col: StridedView<'_, T, 2> =
        StridedView::new(x_view.data(), [x.len(), 1], [x.stride(), 1], x.offset())?;
    let mut out = MatrixMut::zeros(a.rows(), 1);
    gemm_into(T::one(), &a.view(), &x_col, T::zero(), &mut out.view_mut())?;
    Ok(Vector::from_vec(out.into_vec()))
}
