//! Element-wise operations applied lazily to matrix views.
//!
//! A matrix view carries its element operation at the type level, so a
//! conjugated view costs nothing until an element is read. Transposition is not
//! an element operation here: it is a stride swap on the view itself
//! (see [`Matrix::t`](crate::Matrix::t)).
//!
//! The two operations form a group of order two under composition:
//! ```text
//!   ∘    | Id   | Conj
//! -------|------|------
//!   Id   | Id   | Conj
//!   Conj | Conj | Id
//! ```

/// Trait for element-wise operations applied to strided views.
pub trait ElementOp: Copy + Default + Send + Sync + 'static {
    /// Apply the operation to a value.
    fn apply<T: ElementOpApply>(value: T) -> T;

    /// Compose with Conj: Self ∘ Conj
    type ComposeConj: ElementOp;

    /// Whether reading through this operation changes element values.
    const IS_IDENTITY: bool;
}

/// Trait for scalars that support the element operations.
pub trait ElementOpApply: Copy {
    /// Complex conjugate (identity for real scalars).
    fn conj(self) -> Self;
}

macro_rules! impl_element_op_apply_real {
    ($($t:ty),*) => {
        $(
            impl ElementOpApply for $t {
                #[inline(always)]
                fn conj(self) -> Self { self }
            }
        )*
    };
}

impl_element_op_apply_real!(f32, f64, i32, i64);

impl<T: Copy + num_traits::Num + std::ops::Neg<Output = T>> ElementOpApply
    for num_complex::Complex<T>
{
    #[inline(always)]
    fn conj(self) -> Self {
        num_complex::Complex::conj(&self)
    }
}

/// Identity operation: f(x) = x
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

/// Complex conjugate operation: f(x) = conj(x)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Conj;

impl ElementOp for Identity {
    #[inline(always)]
    fn apply<T: ElementOpApply>(value: T) -> T {
        value
    }

    type ComposeConj = Conj;
    const IS_IDENTITY: bool = true;
}

impl ElementOp for Conj {
    #[inline(always)]
    fn apply<T: ElementOpApply>(value: T) -> T {
        value.conj()
    }

    type ComposeConj = Identity; // conj(conj(x)) = x
    const IS_IDENTITY: bool = false;
}
