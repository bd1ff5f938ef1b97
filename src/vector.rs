//! Strided 1-D storage.
//!
//! - [`Vector`]: immutable `(buffer, offset, stride, length)` over a shared
//!   `Arc<[T]>`. Cloning a `Vector` clones the `Arc`, never the elements.
//! - [`VectorMut`]: uniquely owned, compact, writable storage. It becomes a
//!   `Vector` through [`VectorMut::freeze`], which consumes it.
//!
//! A deep copy goes the other way: [`Vector::thaw`] copies the visible
//! elements into a fresh `VectorMut`.

use crate::scalar::Scalar;
use crate::view::{resolve_slice, validate_bounds, SliceIndex, StridedView, StridedViewMut};
use crate::{LinalgError, Result};
use num_traits::{Float, Zero};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::sync::Arc;

/// Immutable strided vector over a shared buffer.
///
/// # Example
/// ```
/// use strided_linalg::{StridedRange, Vector};
///
/// let v = Vector::from_vec(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
/// let odd = v.slice(StridedRange::new(1, 6, 2)).unwrap();
/// assert_eq!(odd.to_vec(), vec![1.0, 3.0, 5.0]);
/// assert!(odd.shares_buffer(&v));
/// ```
pub struct Vector<T> {
    data: Arc<[T]>,
    offset: usize,
    stride: isize,
    len: usize,
}

impl<T> Clone for Vector<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            offset: self.offset,
            stride: self.stride,
            len: self.len,
        }
    }
}

impl<T> Vector<T> {
    /// Create a view over `data`.
    ///
    /// # Errors
    /// Returns an error if any of the `len` elements would fall outside `data`,
    /// or if `stride` is zero while `len > 1`.
    pub fn new(data: Arc<[T]>, offset: usize, stride: isize, len: usize) -> Result<Self> {
        let [stride] = validate_bounds(data.len(), &[len], &[stride], offset)?;
        Ok(Self {
            data,
            offset,
            stride,
            len,
        })
    }

    /// Take ownership of `data` as a compact vector.
    pub fn from_vec(data: Vec<T>) -> Self {
        let len = data.len();
        Self {
            data: data.into(),
            offset: 0,
            stride: 1,
            len,
        }
    }

    /// Build a compact vector of `len` elements from `f(i)`.
    pub fn from_fn(len: usize, f: impl FnMut(usize) -> T) -> Self {
        Self::from_vec((0..len).map(f).collect())
    }

    /// Parts already validated by the caller (sub-views of a checked view).
    pub(crate) fn from_parts(data: Arc<[T]>, offset: usize, stride: isize, len: usize) -> Self {
        debug_assert!(validate_bounds(data.len(), &[len], &[stride], offset).is_ok());
        Self {
            data,
            offset,
            stride,
            len,
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the vector has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Distance between consecutive elements in the backing buffer.
    #[inline]
    pub fn stride(&self) -> isize {
        self.stride
    }

    /// Position of element 0 in the backing buffer.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether both vectors are windows onto the same allocation.
    pub fn shares_buffer(&self, other: &Vector<T>) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    #[inline]
    fn index_of(&self, i: usize) -> usize {
        (self.offset as isize + i as isize * self.stride) as usize
    }

    /// Borrow as a 1-D strided view.
    pub fn view(&self) -> StridedView<'_, T, 1> {
        // SAFETY: offset/stride/len were validated against this buffer when the
        // vector was built, and the buffer is immutable.
        unsafe { StridedView::new_unchecked(&self.data, [self.len], [self.stride], self.offset) }
    }

    /// Zero-copy sub-vector.
    ///
    /// # Errors
    /// Returns [`LinalgError::SliceOutOfBounds`] if the range leaves `0..len`.
    pub fn slice<I: SliceIndex>(&self, index: I) -> Result<Vector<T>> {
        let (start, len, step) = resolve_slice(&index, 0, self.len)?;
        let offset = if len == 0 {
            self.offset
        } else {
            self.index_of(start)
        };
        Ok(Vector::from_parts(
            Arc::clone(&self.data),
            offset,
            self.stride * step,
            len,
        ))
    }

    /// Zero-copy view of the elements in reverse order.
    pub fn reversed(&self) -> Vector<T> {
        if self.len == 0 {
            return self.clone();
        }
        Vector::from_parts(
            Arc::clone(&self.data),
            self.index_of(self.len - 1),
            -self.stride,
            self.len,
        )
    }
}

impl<T: Copy> Vector<T> {
    /// Element `i`.
    ///
    /// # Panics
    /// Panics if `i >= len`.
    #[inline]
    pub fn get(&self, i: usize) -> T {
        self[i]
    }

    /// Iterate the visible elements in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = T> + '_ {
        (0..self.len).map(move |i| self.data[self.index_of(i)])
    }

    /// Copy the visible elements into a `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Deep copy into a fresh, uniquely owned, compact buffer.
    pub fn thaw(&self) -> VectorMut<T> {
        VectorMut::from_vec(self.to_vec())
    }

    /// Apply `f` to every element.
    pub fn map<U>(&self, f: impl FnMut(T) -> U) -> Vector<U> {
        Vector::from_vec(self.iter().map(f).collect())
    }

    /// Combine two equal-length vectors element-wise.
    pub fn zip_with<U: Copy, V>(
        &self,
        other: &Vector<U>,
        mut f: impl FnMut(T, U) -> V,
    ) -> Result<Vector<V>> {
        if self.len != other.len {
            return Err(LinalgError::ShapeMismatch(vec![self.len], vec![other.len]));
        }
        Ok(Vector::from_vec(
            self.iter().zip(other.iter()).map(|(x, y)| f(x, y)).collect(),
        ))
    }
}

impl<T: Scalar> Vector<T> {
    /// Bilinear dot product `Σ xᵢ·yᵢ`.
    pub fn dot(&self, other: &Vector<T>) -> Result<T> {
        if self.len != other.len {
            return Err(LinalgError::ShapeMismatch(vec![self.len], vec![other.len]));
        }
        Ok(self
            .iter()
            .zip(other.iter())
            .fold(T::zero(), |acc, (x, y)| acc + x * y))
    }

    /// Euclidean norm.
    pub fn norm(&self) -> T::Real {
        self.iter()
            .fold(T::Real::zero(), |acc, x| acc + x.modulus_sqr())
            .sqrt()
    }

    /// Multiply every element by `alpha`.
    pub fn scale(&self, alpha: T) -> Vector<T> {
        self.map(|x| alpha * x)
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        assert!(i < self.len, "index out of bounds");
        &self.data[self.index_of(i)]
    }
}

impl<T: PartialEq> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && (0..self.len).all(|i| self[i] == other[i])
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries((0..self.len).map(|i| &self[i])).finish()
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(data: Vec<T>) -> Self {
        Vector::from_vec(data)
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Vector::from_vec(iter.into_iter().collect())
    }
}

// ============================================================================
// VectorMut
// ============================================================================

/// Uniquely owned, writable, compact vector.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorMut<T> {
    data: Vec<T>,
}

impl<T> VectorMut<T> {
    /// Take ownership of `data`.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the vector has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Set element `i`.
    #[inline]
    pub fn set(&mut self, i: usize, value: T) {
        self.data[i] = value;
    }

    /// The elements as a contiguous slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The elements as a contiguous mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Borrow as a 1-D strided view.
    pub fn view(&self) -> StridedView<'_, T, 1> {
        // SAFETY: compact layout, len elements at stride 1 from offset 0.
        unsafe { StridedView::new_unchecked(&self.data, [self.data.len()], [1], 0) }
    }

    /// Borrow as a mutable 1-D strided view.
    pub fn view_mut(&mut self) -> StridedViewMut<'_, T, 1> {
        let len = self.data.len();
        match StridedViewMut::new(&mut self.data, [len], [1], 0) {
            Ok(view) => view,
            Err(_) => unreachable!("compact layout is always in bounds"),
        }
    }

    /// Give up write access and share the buffer.
    ///
    /// The conversion is one-way: the `VectorMut` is consumed.
    pub fn freeze(self) -> Vector<T> {
        Vector::from_vec(self.data)
    }

    /// Unwrap the owned buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Clone + Zero> VectorMut<T> {
    /// A vector of `len` zeros.
    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![T::zero(); len],
        }
    }
}

impl<T: Copy> VectorMut<T> {
    /// Element `i`.
    #[inline]
    pub fn get(&self, i: usize) -> T {
        self.data[i]
    }
}

impl<T> Index<usize> for VectorMut<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T> IndexMut<usize> for VectorMut<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}
