//! Fallible element copying
//!
//! `Clone` cannot report failure except by panicking. Element types whose
//! copies can fail with a value-level error implement [`TryClone`]; the
//! stack's fallible copy operations (`try_clone`, `try_clone_from`,
//! `try_push_cloned`) route that error into
//! [`StackError::ElementOperation`](crate::StackError::ElementOperation)
//! after rolling back.

use core::convert::Infallible;
use std::error::Error as StdError;

/// Copy that may fail with a recoverable error
pub trait TryClone: Sized {
    /// Error produced by a failed copy
    type Error: StdError + Send + Sync + 'static;

    /// Attempt to produce an independent copy of `self`
    fn try_clone(&self) -> Result<Self, Self::Error>;
}

macro_rules! impl_infallible_try_clone {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TryClone for $ty {
                type Error = Infallible;

                #[inline]
                fn try_clone(&self) -> Result<Self, Self::Error> {
                    Ok(self.clone())
                }
            }
        )*
    };
}

impl_infallible_try_clone!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
    String, (),
);

impl<T: TryClone> TryClone for Box<T> {
    type Error = T::Error;

    fn try_clone(&self) -> Result<Self, Self::Error> {
        (**self).try_clone().map(Box::new)
    }
}

impl<T: TryClone> TryClone for Option<T> {
    type Error = T::Error;

    fn try_clone(&self) -> Result<Self, Self::Error> {
        self.as_ref().map(TryClone::try_clone).transpose()
    }
}
