//! Arity-indexed fixed-length vector protocol.
//!
//! A storage type joins the protocol by implementing [`FixedVector`], i.e. two
//! primitives:
//!
//! - `construct`: build a value from a supplier called once per position
//!   `0..N`, in order;
//! - `inspect`: feed the N elements, in order, to a consumer threading an
//!   accumulator.
//!
//! Everything else in this module ([`map`], [`zip_with`], [`fold`], [`slice`],
//! [`concat`], [`convert`], ...) is written once over those two primitives and
//! works for every implementation, including conversions between different
//! storages of the same arity.
//!
//! Arity is part of the type, so `[f64; 3]` and [`Packed<f64, 3>`] agree on N
//! at compile time. Runtime sources of elements (an iterator, a [`Vector`]) are
//! checked: an iterator that yields the wrong number of elements panics, a
//! vector of the wrong length is rejected with an error.
//!
//! # Example
//! ```
//! use strided_linalg::arity::{self, Packed};
//!
//! let v = [1.0f64, 2.0, 3.0];
//! let doubled: Packed<f64, 3> = arity::map(&v, |x: f64| x * 2.0);
//! assert_eq!(arity::to_array(&doubled), [2.0, 4.0, 6.0]);
//!
//! let tail: [f64; 2] = arity::slice(&doubled, 1);
//! assert_eq!(tail, [4.0, 6.0]);
//! ```

use crate::scalar::Scalar;
use crate::vector::Vector;
use crate::{LinalgError, Result};
use std::marker::PhantomData;
use std::mem::size_of;

/// Fixed-length vector of exactly `N` elements of type `T`.
pub trait FixedVector<T, const N: usize>: Sized {
    /// Build a value by calling `supply(i)` for `i` in `0..N`, in order.
    fn construct<F: FnMut(usize) -> T>(supply: F) -> Self;

    /// Fold the elements in order, starting from `init`.
    fn inspect<R, F: FnMut(R, T) -> R>(&self, init: R, consume: F) -> R;
}

// ============================================================================
// Storages
// ============================================================================

impl<T: Copy, const N: usize> FixedVector<T, N> for [T; N] {
    #[inline]
    fn construct<F: FnMut(usize) -> T>(supply: F) -> Self {
        std::array::from_fn(supply)
    }

    #[inline]
    fn inspect<R, F: FnMut(R, T) -> R>(&self, init: R, consume: F) -> R {
        self.iter().copied().fold(init, consume)
    }
}

/// Heap-allocated storage of exactly `N` elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Boxed<T, const N: usize>(Box<[T]>);

impl<T, const N: usize> Boxed<T, N> {
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }
}

impl<T: Copy, const N: usize> FixedVector<T, N> for Boxed<T, N> {
    fn construct<F: FnMut(usize) -> T>(supply: F) -> Self {
        Boxed((0..N).map(supply).collect())
    }

    fn inspect<R, F: FnMut(R, T) -> R>(&self, init: R, consume: F) -> R {
        self.0.iter().copied().fold(init, consume)
    }
}

/// Byte-packed storage for plain-old-data elements.
///
/// Elements are stored as their raw bytes with no alignment requirement and
/// decoded on every read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packed<T, const N: usize> {
    bytes: Box<[u8]>,
    _elem: PhantomData<T>,
}

impl<T, const N: usize> Packed<T, N> {
    /// The packed representation, `N * size_of::<T>()` bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl<T: bytemuck::Pod, const N: usize> FixedVector<T, N> for Packed<T, N> {
    fn construct<F: FnMut(usize) -> T>(mut supply: F) -> Self {
        let mut bytes = Vec::with_capacity(N * size_of::<T>());
        for i in 0..N {
            bytes.extend_from_slice(bytemuck::bytes_of(&supply(i)));
        }
        Packed {
            bytes: bytes.into_boxed_slice(),
            _elem: PhantomData,
        }
    }

    fn inspect<R, F: FnMut(R, T) -> R>(&self, init: R, consume: F) -> R {
        if size_of::<T>() == 0 {
            return (0..N).map(|_| T::zeroed()).fold(init, consume);
        }
        self.bytes
            .chunks_exact(size_of::<T>())
            .map(bytemuck::pod_read_unaligned::<T>)
            .fold(init, consume)
    }
}

/// A strided [`Vector`] whose length is checked to be `N`.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixed<T, const N: usize>(Vector<T>);

impl<T, const N: usize> Fixed<T, N> {
    /// Adopt `vector` if it holds exactly `N` elements.
    ///
    /// # Errors
    /// Returns [`LinalgError::ShapeMismatch`] otherwise.
    pub fn try_from_vector(vector: Vector<T>) -> Result<Self> {
        if vector.len() != N {
            return Err(LinalgError::ShapeMismatch(vec![N], vec![vector.len()]));
        }
        Ok(Fixed(vector))
    }

    pub fn as_vector(&self) -> &Vector<T> {
        &self.0
    }

    pub fn into_vector(self) -> Vector<T> {
        self.0
    }
}

impl<T: Copy, const N: usize> FixedVector<T, N> for Fixed<T, N> {
    fn construct<F: FnMut(usize) -> T>(supply: F) -> Self {
        Fixed(Vector::from_fn(N, supply))
    }

    fn inspect<R, F: FnMut(R, T) -> R>(&self, init: R, consume: F) -> R {
        self.0.iter().fold(init, consume)
    }
}

// ============================================================================
// Derived operations
// ============================================================================

/// Build from an iterator that must yield exactly `N` elements.
///
/// # Panics
/// Panics if the iterator yields fewer or more than `N` elements.
pub fn from_iter_exact<V, T, I, const N: usize>(iter: I) -> V
where
    V: FixedVector<T, N>,
    I: IntoIterator<Item = T>,
{
    let mut iter = iter.into_iter();
    let v = V::construct(|i| match iter.next() {
        Some(x) => x,
        None => panic!("arity mismatch: iterator ended after {i} of {N} elements"),
    });
    assert!(
        iter.next().is_none(),
        "arity mismatch: iterator yielded more than {N} elements"
    );
    v
}

/// Copy the elements into a `Vec` of length `N`.
pub fn to_vec<V, T, const N: usize>(v: &V) -> Vec<T>
where
    V: FixedVector<T, N>,
{
    let out = v.inspect(Vec::with_capacity(N), |mut acc, x| {
        acc.push(x);
        acc
    });
    assert_eq!(out.len(), N, "arity mismatch: inspect visited {} elements", out.len());
    out
}

/// Copy the elements into an array.
pub fn to_array<V, T, const N: usize>(v: &V) -> [T; N]
where
    V: FixedVector<T, N>,
    T: Copy,
{
    let xs = to_vec(v);
    std::array::from_fn(|i| xs[i])
}

/// Re-encode into another storage of the same arity.
pub fn convert<V, W, T, const N: usize>(v: &V) -> W
where
    V: FixedVector<T, N>,
    W: FixedVector<T, N>,
    T: Copy,
{
    let xs = to_array(v);
    W::construct(|i| xs[i])
}

/// `N` copies of `x`.
pub fn replicate<V, T, const N: usize>(x: T) -> V
where
    V: FixedVector<T, N>,
    T: Copy,
{
    V::construct(|_| x)
}

pub fn map<V, W, T, U, const N: usize>(v: &V, mut f: impl FnMut(T) -> U) -> W
where
    V: FixedVector<T, N>,
    W: FixedVector<U, N>,
    T: Copy,
{
    let xs = to_array(v);
    W::construct(|i| f(xs[i]))
}

pub fn zip_with<A, B, C, T, U, R, const N: usize>(a: &A, b: &B, mut f: impl FnMut(T, U) -> R) -> C
where
    A: FixedVector<T, N>,
    B: FixedVector<U, N>,
    C: FixedVector<R, N>,
    T: Copy,
    U: Copy,
{
    let xs = to_array(a);
    let ys = to_array(b);
    C::construct(|i| f(xs[i], ys[i]))
}

/// Left fold over the elements.
#[inline]
pub fn fold<V, T, R, const N: usize>(v: &V, init: R, f: impl FnMut(R, T) -> R) -> R
where
    V: FixedVector<T, N>,
{
    v.inspect(init, f)
}

pub fn sum<V, T, const N: usize>(v: &V) -> T
where
    V: FixedVector<T, N>,
    T: Scalar,
{
    v.inspect(T::zero(), |acc, x| acc + x)
}

/// Bilinear dot product `Σ aᵢ·bᵢ`.
pub fn dot<A, B, T, const N: usize>(a: &A, b: &B) -> T
where
    A: FixedVector<T, N>,
    B: FixedVector<T, N>,
    T: Scalar,
{
    let ys = to_array(b);
    let (acc, _) = a.inspect((T::zero(), 0usize), |(acc, i), x| (acc + x * ys[i], i + 1));
    acc
}

/// Elements in reverse order.
pub fn reverse<V, T, const N: usize>(v: &V) -> V
where
    V: FixedVector<T, N>,
    T: Copy,
{
    let xs = to_array(v);
    V::construct(|i| xs[N - 1 - i])
}

/// The `K` elements starting at `start`.
///
/// # Panics
/// Panics if `start + K > N`.
pub fn slice<V, W, T, const N: usize, const K: usize>(v: &V, start: usize) -> W
where
    V: FixedVector<T, N>,
    W: FixedVector<T, K>,
    T: Copy,
{
    assert!(
        start.checked_add(K).is_some_and(|end| end <= N),
        "slice {start}..{start}+{K} out of bounds for arity {N}"
    );
    let xs = to_array(v);
    W::construct(|i| xs[start + i])
}

/// Concatenate an `N`-vector and an `M`-vector into a `K`-vector.
///
/// # Panics
/// Panics if `K != N + M`.
pub fn concat<A, B, C, T, const N: usize, const M: usize, const K: usize>(a: &A, b: &B) -> C
where
    A: FixedVector<T, N>,
    B: FixedVector<T, M>,
    C: FixedVector<T, K>,
    T: Copy,
{
    assert_eq!(K, N + M, "concat of arities {N} and {M} cannot produce arity {K}");
    let xs = to_array(a);
    let ys = to_array(b);
    C::construct(|i| if i < N { xs[i] } else { ys[i - N] })
}

/// Element-wise equality across storages.
pub fn eq<A, B, T, const N: usize>(a: &A, b: &B) -> bool
where
    A: FixedVector<T, N>,
    B: FixedVector<T, N>,
    T: Copy + PartialEq,
{
    to_array(a) == to_array(b)
}
