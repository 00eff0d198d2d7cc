//! Truthiness
//!
//! [`any`] and [`all`] reduce a sequence by truthiness: `false`, zero, NaN,
//! the empty string and `None` are falsy, everything else is truthy.
//! Collections are truthy even when empty, like arrays in a boolean context.

/// Values with a truthiness
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl Truthy for str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Truthy> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthy::is_truthy)
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

impl<T> Truthy for Vec<T> {
    fn is_truthy(&self) -> bool {
        true
    }
}

impl<T> Truthy for [T] {
    fn is_truthy(&self) -> bool {
        true
    }
}

macro_rules! impl_truthy_int {
    ($($t:ty),*) => {
        $(impl Truthy for $t {
            fn is_truthy(&self) -> bool {
                *self != 0
            }
        })*
    };
}

impl_truthy_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_truthy_float {
    ($($t:ty),*) => {
        $(impl Truthy for $t {
            fn is_truthy(&self) -> bool {
                *self != 0.0 && !self.is_nan()
            }
        })*
    };
}

impl_truthy_float!(f32, f64);

/// True if at least one value is truthy. False for an empty sequence.
pub fn any<I>(values: I) -> bool
where
    I: IntoIterator,
    I::Item: Truthy,
{
    values.into_iter().any(|value| value.is_truthy())
}

/// True if every value is truthy. True for an empty sequence.
pub fn all<I>(values: I) -> bool
where
    I: IntoIterator,
    I::Item: Truthy,
{
    values.into_iter().all(|value| value.is_truthy())
}
