//! Borrowed strided views with lazy element operations.
//!
//! [`StridedView`] and [`StridedViewMut`] are the borrowed windows through
//! which the owned storage types ([`Vector`](crate::Vector),
//! [`Matrix`](crate::Matrix) and their mutable counterparts) are read and
//! written.
//!
//! Key features:
//! - Zero-copy views over contiguous memory
//! - Const-generic rank for type safety
//! - Negative and non-unit strides (reversed and sub-sampled views)
//! - Bounds-checked slicing: an out-of-range slice is an error, never a panic

use crate::element_op::{ElementOp, ElementOpApply, Identity};
use crate::{LinalgError, Result};
use std::marker::PhantomData;
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

/// An immutable strided view over a contiguous buffer.
///
/// # Type Parameters
/// - `'a`: Lifetime of the underlying data
/// - `T`: Element type
/// - `N`: Number of dimensions (const generic)
/// - `Op`: Element operation applied lazily on access (default: Identity)
///
/// # Example
/// ```
/// use strided_linalg::{StridedView, Identity};
///
/// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
/// let view: StridedView<'_, f64, 2, Identity> =
///     StridedView::new(&data, [2, 3], [3, 1], 0).unwrap();
/// assert_eq!(view.get([1, 2]), 6.0);
/// assert_eq!(view.t().get([2, 1]), 6.0);
/// ```
#[derive(Debug)]
pub struct StridedView<'a, T, const N: usize, Op: ElementOp = Identity> {
    data: &'a [T],
    size: [usize; N],
    strides: [isize; N],
    offset: usize,
    _op: PhantomData<Op>,
}

impl<T, const N: usize, Op: ElementOp> Clone for StridedView<'_, T, N, Op> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const N: usize, Op: ElementOp> Copy for StridedView<'_, T, N, Op> {}

/// A mutable strided view over a contiguous buffer.
///
/// Mutable views never carry a lazy element operation: writes always land on
/// the stored value.
#[derive(Debug)]
pub struct StridedViewMut<'a, T, const N: usize> {
    data: &'a mut [T],
    size: [usize; N],
    strides: [isize; N],
    offset: usize,
}

impl<'a, T, const N: usize, Op: ElementOp> StridedView<'a, T, N, Op> {
    /// Create a new strided view.
    ///
    /// # Arguments
    /// - `data`: The underlying contiguous data
    /// - `size`: Size of each dimension
    /// - `strides`: Stride for each dimension (in elements, can be negative)
    /// - `offset`: Starting offset into the data
    ///
    /// # Errors
    /// Returns an error if the view would access out-of-bounds memory or a
    /// stride is zero on a dimension longer than one.
    pub fn new(
        data: &'a [T],
        size: [usize; N],
        strides: [isize; N],
        offset: usize,
    ) -> Result<Self> {
        let strides = validate_bounds(data.len(), &size, &strides, offset)?;
        Ok(Self {
            data,
            size,
            strides,
            offset,
            _op: PhantomData,
        })
    }

    /// Create a view without bounds checking.
    ///
    /// # Safety
    /// The caller must ensure that all possible index combinations stay within bounds.
    pub unsafe fn new_unchecked(
        data: &'a [T],
        size: [usize; N],
        strides: [isize; N],
        offset: usize,
    ) -> Self {
        Self {
            data,
            size,
            strides,
            offset,
            _op: PhantomData,
        }
    }

    /// Returns the size of each dimension.
    #[inline]
    pub fn size(&self) -> &[usize; N] {
        &self.size
    }

    /// Returns the stride for each dimension.
    #[inline]
    pub fn strides(&self) -> &[isize; N] {
        &self.strides
    }

    /// Returns the starting offset.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.size.iter().product()
    }

    /// Returns true if the view is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.contains(&0)
    }

    /// Returns a reference to the underlying data.
    #[inline]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    #[inline]
    fn linear_index(&self, indices: &[usize; N]) -> usize {
        linear_index(self.offset, &self.strides, indices)
    }

    /// Apply complex conjugate to all elements (lazily).
    #[inline]
    pub fn conj(self) -> StridedView<'a, T, N, Op::ComposeConj> {
        StridedView {
            data: self.data,
            size: self.size,
            strides: self.strides,
            offset: self.offset,
            _op: PhantomData,
        }
    }
}

impl<'a, T: ElementOpApply, const N: usize, Op: ElementOp> StridedView<'a, T, N, Op> {
    /// Get an element at the given index, with the element operation applied.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    #[inline]
    pub fn get(&self, indices: [usize; N]) -> T {
        for i in 0..N {
            assert!(indices[i] < self.size[i], "index out of bounds");
        }
        Op::apply(self.data[self.linear_index(&indices)])
    }

    /// Returns an iterator over the elements in row-major order.
    pub fn iter(&self) -> StridedIter<'a, T, N, Op> {
        StridedIter {
            data: self.data,
            size: self.size,
            strides: self.strides,
            offset: self.offset,
            indices: [0; N],
            exhausted: self.is_empty(),
            _op: PhantomData,
        }
    }
}

// 1D-specific operations
impl<'a, T, Op: ElementOp> StridedView<'a, T, 1, Op> {
    /// Slice the view along its single dimension.
    pub fn slice<I: SliceIndex>(&self, index: I) -> Result<StridedView<'a, T, 1, Op>> {
        let (start, len, step) = resolve_slice(&index, 0, self.size[0])?;
        Ok(StridedView {
            data: self.data,
            size: [len],
            strides: [self.strides[0] * step],
            offset: shifted_offset(self.offset, start, self.strides[0], len),
            _op: PhantomData,
        })
    }
}

// 2D-specific operations
impl<'a, T, Op: ElementOp> StridedView<'a, T, 2, Op> {
    /// Transpose a 2D view (swap dimensions).
    ///
    /// This is a zero-copy operation that just swaps size and strides.
    #[inline]
    pub fn t(self) -> StridedView<'a, T, 2, Op> {
        StridedView {
            data: self.data,
            size: [self.size[1], self.size[0]],
            strides: [self.strides[1], self.strides[0]],
            offset: self.offset,
            _op: PhantomData,
        }
    }

    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.size[0]
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.size[1]
    }

    /// Slice the view along both dimensions.
    pub fn slice<I0: SliceIndex, I1: SliceIndex>(
        &self,
        idx0: I0,
        idx1: I1,
    ) -> Result<StridedView<'a, T, 2, Op>> {
        let (start0, len0, step0) = resolve_slice(&idx0, 0, self.size[0])?;
        let (start1, len1, step1) = resolve_slice(&idx1, 1, self.size[1])?;
        let offset = if len0 == 0 || len1 == 0 {
            self.offset
        } else {
            shifted_offset(
                shifted_offset(self.offset, start0, self.strides[0], len0),
                start1,
                self.strides[1],
                len1,
            )
        };

        Ok(StridedView {
            data: self.data,
            size: [len0, len1],
            strides: [self.strides[0] * step0, self.strides[1] * step1],
            offset,
            _op: PhantomData,
        })
    }

    /// Select a single row as a 1D view.
    ///
    /// # Panics
    /// Panics if `row` is out of bounds.
    pub fn row(&self, row: usize) -> StridedView<'a, T, 1, Op> {
        assert!(row < self.size[0], "row index out of bounds");
        StridedView {
            data: self.data,
            size: [self.size[1]],
            strides: [self.strides[1]],
            offset: (self.offset as isize + row as isize * self.strides[0]) as usize,
            _op: PhantomData,
        }
    }

    /// Select a single column as a 1D view.
    ///
    /// # Panics
    /// Panics if `col` is out of bounds.
    pub fn col(&self, col: usize) -> StridedView<'a, T, 1, Op> {
        assert!(col < self.size[1], "column index out of bounds");
        StridedView {
            data: self.data,
            size: [self.size[0]],
            strides: [self.strides[0]],
            offset: (self.offset as isize + col as isize * self.strides[1]) as usize,
            _op: PhantomData,
        }
    }
}

// ============================================================================
// Mutable views
// ============================================================================

impl<'a, T, const N: usize> StridedViewMut<'a, T, N> {
    /// Create a new mutable strided view.
    pub fn new(
        data: &'a mut [T],
        size: [usize; N],
        strides: [isize; N],
        offset: usize,
    ) -> Result<Self> {
        let strides = validate_bounds(data.len(), &size, &strides, offset)?;
        Ok(Self {
            data,
            size,
            strides,
            offset,
        })
    }

    /// Returns the size of each dimension.
    #[inline]
    pub fn size(&self) -> &[usize; N] {
        &self.size
    }

    /// Returns the stride for each dimension.
    #[inline]
    pub fn strides(&self) -> &[isize; N] {
        &self.strides
    }

    /// Returns the total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.size.iter().product()
    }

    /// Returns true if the view is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.contains(&0)
    }

    #[inline]
    fn linear_index(&self, indices: &[usize; N]) -> usize {
        linear_index(self.offset, &self.strides, indices)
    }

    /// Set an element at the given index.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    #[inline]
    pub fn set(&mut self, indices: [usize; N], value: T) {
        *self.get_mut(indices) = value;
    }

    /// Get a mutable reference to an element at the given index.
    #[inline]
    pub fn get_mut(&mut self, indices: [usize; N]) -> &mut T {
        for i in 0..N {
            assert!(indices[i] < self.size[i], "index out of bounds");
        }
        let idx = self.linear_index(&indices);
        &mut self.data[idx]
    }
}

impl<'a, T: Copy, const N: usize> StridedViewMut<'a, T, N> {
    /// Get an element at the given index.
    #[inline]
    pub fn get(&self, indices: [usize; N]) -> T {
        for i in 0..N {
            assert!(indices[i] < self.size[i], "index out of bounds");
        }
        self.data[self.linear_index(&indices)]
    }

    /// Overwrite every element with `value`.
    pub fn fill(&mut self, value: T) {
        let size = self.size;
        let mut indices = [0usize; N];
        if size.contains(&0) {
            return;
        }
        loop {
            self.set(indices, value);
            if !advance_row_major(&mut indices, &size) {
                break;
            }
        }
    }
}

impl<'a, T> StridedViewMut<'a, T, 1> {
    /// Slice the view along its single dimension.
    pub fn slice_mut<I: SliceIndex>(&mut self, index: I) -> Result<StridedViewMut<'_, T, 1>> {
        let (start, len, step) = resolve_slice(&index, 0, self.size[0])?;
        Ok(StridedViewMut {
            offset: shifted_offset(self.offset, start, self.strides[0], len),
            data: &mut *self.data,
            size: [len],
            strides: [self.strides[0] * step],
        })
    }
}

impl<'a, T> StridedViewMut<'a, T, 2> {
    /// Slice the view along both dimensions.
    pub fn slice_mut<I0: SliceIndex, I1: SliceIndex>(
        &mut self,
        idx0: I0,
        idx1: I1,
    ) -> Result<StridedViewMut<'_, T, 2>> {
        let (start0, len0, step0) = resolve_slice(&idx0, 0, self.size[0])?;
        let (start1, len1, step1) = resolve_slice(&idx1, 1, self.size[1])?;
        let offset = if len0 == 0 || len1 == 0 {
            self.offset
        } else {
            shifted_offset(
                shifted_offset(self.offset, start0, self.strides[0], len0),
                start1,
                self.strides[1],
                len1,
            )
        };

        Ok(StridedViewMut {
            data: &mut *self.data,
            size: [len0, len1],
            strides: [self.strides[0] * step0, self.strides[1] * step1],
            offset,
        })
    }

    /// Select a single row as a mutable 1D view.
    ///
    /// # Panics
    /// Panics if `row` is out of bounds.
    pub fn row_mut(&mut self, row: usize) -> StridedViewMut<'_, T, 1> {
        assert!(row < self.size[0], "row index out of bounds");
        StridedViewMut {
            offset: (self.offset as isize + row as isize * self.strides[0]) as usize,
            data: &mut *self.data,
            size: [self.size[1]],
            strides: [self.strides[1]],
        }
    }
}

// ============================================================================
// Slicing support
// ============================================================================

/// Trait for types that can be used as slice indices.
///
/// This is similar to Julia's `SliceIndex = Union{RangeIndex, Colon}`.
pub trait SliceIndex {
    /// Convert to a range given the dimension size.
    ///
    /// Returns `None` if the bounds cannot be expressed as a half-open
    /// range (an inclusive end of `usize::MAX`).
    fn to_range(&self, dim_size: usize) -> Option<Range<usize>>;

    /// The step size (1 for regular ranges, can be other values for strided ranges).
    fn step(&self) -> isize {
        1
    }
}

impl SliceIndex for RangeFull {
    fn to_range(&self, dim_size: usize) -> Option<Range<usize>> {
        Some(0..dim_size)
    }
}

impl SliceIndex for Range<usize> {
    fn to_range(&self, _dim_size: usize) -> Option<Range<usize>> {
        Some(self.clone())
    }
}

impl SliceIndex for RangeFrom<usize> {
    fn to_range(&self, dim_size: usize) -> Option<Range<usize>> {
        Some(self.start..dim_size)
    }
}

impl SliceIndex for RangeTo<usize> {
    fn to_range(&self, _dim_size: usize) -> Option<Range<usize>> {
        Some(0..self.end)
    }
}

impl SliceIndex for RangeInclusive<usize> {
    fn to_range(&self, _dim_size: usize) -> Option<Range<usize>> {
        Some(*self.start()..self.end().checked_add(1)?)
    }
}

impl SliceIndex for RangeToInclusive<usize> {
    fn to_range(&self, _dim_size: usize) -> Option<Range<usize>> {
        Some(0..self.end.checked_add(1)?)
    }
}

/// A strided range: `start`, `start + step`, ... stopping before `end`.
///
/// A negative `step` walks backwards, so `StridedRange::new(4, 0, -2)` selects
/// indices 4 and 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StridedRange {
    pub start: usize,
    pub end: usize,
    pub step: isize,
}

impl StridedRange {
    pub fn new(start: usize, end: usize, step: isize) -> Self {
        Self { start, end, step }
    }
}

impl SliceIndex for StridedRange {
    fn to_range(&self, _dim_size: usize) -> Option<Range<usize>> {
        Some(self.start..self.end)
    }

    fn step(&self) -> isize {
        self.step
    }
}

/// Resolve a slice index against dimension `axis`, of length `dim`.
///
/// Returns `(start, len, step)`. Every selected index is checked to lie in
/// `0..dim`.
pub(crate) fn resolve_slice<I: SliceIndex>(
    index: &I,
    axis: usize,
    dim: usize,
) -> Result<(usize, usize, isize)> {
    let step = index.step();
    if step == 0 {
        return Err(LinalgError::ZeroStride { dim: axis });
    }
    let range = index.to_range(dim).ok_or(LinalgError::SliceOutOfBounds {
        start: 0,
        end: usize::MAX,
        step,
        len: dim,
    })?;
    let out_of_bounds = || LinalgError::SliceOutOfBounds {
        start: range.start,
        end: range.end,
        step,
        len: dim,
    };

    if step > 0 && (range.start > range.end || range.end > dim) {
        return Err(out_of_bounds());
    }

    let len = compute_slice_len(range.start, range.end, step);
    if len > 0 && range.start >= dim {
        return Err(out_of_bounds());
    }
    Ok((range.start, len, step))
}

fn compute_slice_len(start: usize, end: usize, step: isize) -> usize {
    if step > 0 {
        end.saturating_sub(start).div_ceil(step as usize)
    } else {
        start.saturating_sub(end).div_ceil(step.unsigned_abs())
    }
}

/// Offset of element `start` along a dimension; unchanged for empty slices.
#[inline]
fn shifted_offset(offset: usize, start: usize, stride: isize, len: usize) -> usize {
    if len == 0 {
        offset
    } else {
        (offset as isize + start as isize * stride) as usize
    }
}

// ============================================================================
// Iterator support
// ============================================================================

/// Iterator over elements of a [`StridedView`] in row-major order.
pub struct StridedIter<'a, T, const N: usize, Op: ElementOp> {
    data: &'a [T],
    size: [usize; N],
    strides: [isize; N],
    offset: usize,
    indices: [usize; N],
    exhausted: bool,
    _op: PhantomData<Op>,
}

impl<'a, T: ElementOpApply, const N: usize, Op: ElementOp> Iterator for StridedIter<'a, T, N, Op> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let idx = linear_index(self.offset, &self.strides, &self.indices);
        let value = Op::apply(self.data[idx]);

        if !advance_row_major(&mut self.indices, &self.size) {
            self.exhausted = true;
        }

        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.exhausted {
            return (0, Some(0));
        }

        let total: usize = self.size.iter().product();
        let mut done = 0usize;
        let mut multiplier = 1usize;
        for i in (0..N).rev() {
            done += self.indices[i] * multiplier;
            multiplier *= self.size[i];
        }

        let remaining = total.saturating_sub(done);
        (remaining, Some(remaining))
    }
}

impl<'a, T: ElementOpApply, const N: usize, Op: ElementOp> ExactSizeIterator
    for StridedIter<'a, T, N, Op>
{
}

// ============================================================================
// Helper functions
// ============================================================================

#[inline]
fn linear_index<const N: usize>(offset: usize, strides: &[isize; N], indices: &[usize; N]) -> usize {
    let mut idx = offset as isize;
    for i in 0..N {
        idx += indices[i] as isize * strides[i];
    }
    idx as usize
}

/// Step a multi-index in row-major order (last index fastest).
///
/// Returns `false` once the index wraps past the last element.
#[inline]
pub(crate) fn advance_row_major<const N: usize>(indices: &mut [usize; N], size: &[usize; N]) -> bool {
    for i in (0..N).rev() {
        indices[i] += 1;
        if indices[i] < size[i] {
            return true;
        }
        indices[i] = 0;
    }
    false
}

/// Check that every element of the view lies inside `data_len`.
///
/// Returns the strides with every zero replaced by 1. A zero stride only
/// passes the check on a dimension that is never stepped along (length one,
/// or an empty view), where any stride addresses the same elements.
pub(crate) fn validate_bounds<const N: usize>(
    data_len: usize,
    size: &[usize; N],
    strides: &[isize; N],
    offset: usize,
) -> Result<[isize; N]> {
    let normalized = strides.map(|s| if s == 0 { 1 } else { s });
    if size.contains(&0) {
        // Empty view, nothing is ever read
        return Ok(normalized);
    }

    let mut min_offset = offset as isize;
    let mut max_offset = offset as isize;

    for i in 0..N {
        if size[i] == 1 {
            continue;
        }
        let stride = strides[i];
        if stride == 0 {
            return Err(LinalgError::ZeroStride { dim: i });
        }
        let end = stride
            .checked_mul((size[i] - 1) as isize)
            .ok_or(LinalgError::OutOfBounds)?;
        if end >= 0 {
            max_offset = max_offset.checked_add(end).ok_or(LinalgError::OutOfBounds)?;
        } else {
            min_offset = min_offset.checked_add(end).ok_or(LinalgError::OutOfBounds)?;
        }
    }

    if min_offset < 0 || max_offset as usize >= data_len {
        return Err(LinalgError::OutOfBounds);
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element_op::Conj;
    use num_complex::Complex64;

    #[test]
    fn test_new_view() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let view: StridedView<'_, f64, 2> = StridedView::new(&data, [2, 3], [3, 1], 0).unwrap();
        assert_eq!(view.size(), &[2, 3]);
        assert_eq!(view.len(), 6);
        assert!(!view.is_empty());
    }

    #[test]
    fn test_new_view_out_of_bounds() {
        let data = vec![1.0; 6];
        let result: Result<StridedView<'_, f64, 2>> = StridedView::new(&data, [2, 3], [3, 1], 1);
        assert_eq!(result.unwrap_err(), LinalgError::OutOfBounds);
    }

    #[test]
    fn test_zero_stride_rejected() {
        let data = vec![1.0; 6];
        let result: Result<StridedView<'_, f64, 1>> = StridedView::new(&data, [3], [0], 0);
        assert_eq!(result.unwrap_err(), LinalgError::ZeroStride { dim: 0 });
    }

    #[test]
    fn test_negative_stride() {
        let data = vec![1.0, 2.0, 3.0, 4.0];
        let view: StridedView<'_, f64, 1> = StridedView::new(&data, [4], [-1], 3).unwrap();
        assert_eq!(view.iter().collect::<Vec<_>>(), vec![4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_transpose_2d() {
        let data: Vec<f64> = (0..6).map(|x| x as f64).collect();
        let view: StridedView<'_, f64, 2> = StridedView::new(&data, [2, 3], [3, 1], 0).unwrap();
        let t = view.t();
        assert_eq!(t.size(), &[3, 2]);
        assert_eq!(t.get([2, 1]), view.get([1, 2]));
    }

    #[test]
    fn test_conj() {
        let data = vec![Complex64::new(1.0, 2.0), Complex64::new(3.0, -4.0)];
        let view: StridedView<'_, Complex64, 1> = StridedView::new(&data, [2], [1], 0).unwrap();
        let conj: StridedView<'_, Complex64, 1, Conj> = view.conj();
        assert_eq!(conj.get([0]), Complex64::new(1.0, -2.0));
        assert_eq!(conj.conj().get([1]), Complex64::new(3.0, -4.0));
    }

    #[test]
    fn test_slice_1d_strided() {
        let data: Vec<f64> = (0..10).map(|x| x as f64).collect();
        let view: StridedView<'_, f64, 1> = StridedView::new(&data, [10], [1], 0).unwrap();

        let every_other = view.slice(StridedRange::new(1, 10, 2)).unwrap();
        assert_eq!(every_other.iter().collect::<Vec<_>>(), vec![1.0, 3.0, 5.0, 7.0, 9.0]);

        let backwards = view.slice(StridedRange::new(8, 0, -3)).unwrap();
        assert_eq!(backwards.iter().collect::<Vec<_>>(), vec![8.0, 5.0, 2.0]);
    }

    #[test]
    fn test_slice_out_of_bounds() {
        let data = vec![0.0; 4];
        let view: StridedView<'_, f64, 1> = StridedView::new(&data, [4], [1], 0).unwrap();
        assert!(matches!(
            view.slice(2..5),
            Err(LinalgError::SliceOutOfBounds { len: 4, .. })
        ));
        assert!(view.slice(StridedRange::new(4, 0, -1)).is_err());
        assert!(view.slice(4..4).unwrap().is_empty());
    }

    #[test]
    fn test_slice_2d() {
        let data: Vec<f64> = (0..12).map(|x| x as f64).collect();
        let view: StridedView<'_, f64, 2> = StridedView::new(&data, [3, 4], [4, 1], 0).unwrap();
        let sub = view.slice(1..3, 1..=2).unwrap();
        assert_eq!(sub.size(), &[2, 2]);
        assert_eq!(sub.get([0, 0]), 5.0);
        assert_eq!(sub.get([1, 1]), 10.0);
    }

    #[test]
    fn test_row_col() {
        let data: Vec<f64> = (0..6).map(|x| x as f64).collect();
        let view: StridedView<'_, f64, 2> = StridedView::new(&data, [2, 3], [3, 1], 0).unwrap();
        assert_eq!(view.row(1).iter().collect::<Vec<_>>(), vec![3.0, 4.0, 5.0]);
        assert_eq!(view.col(2).iter().collect::<Vec<_>>(), vec![2.0, 5.0]);
    }

    #[test]
    fn test_iter_size_hint() {
        let data: Vec<f64> = (0..6).map(|x| x as f64).collect();
        let view: StridedView<'_, f64, 2> = StridedView::new(&data, [2, 3], [3, 1], 0).unwrap();
        let mut iter = view.iter();
        assert_eq!(iter.len(), 6);
        iter.next();
        iter.next();
        assert_eq!(iter.len(), 4);
    }

    #[test]
    fn test_mutable_slice_and_fill() {
        let mut data = vec![0.0; 9];
        {
            let mut view = StridedViewMut::new(&mut data, [3, 3], [3, 1], 0).unwrap();
            let mut corner = view.slice_mut(1.., 1..).unwrap();
            corner.fill(7.0);
            view.row_mut(0).set([2], 1.0);
        }
        assert_eq!(data, vec![0.0, 0.0, 1.0, 0.0, 7.0, 7.0, 0.0, 7.0, 7.0]);
    }
}
