//! Element capability traits.

use crate::error::ElementError;

/// Fallible copy construction.
///
/// Implemented by element types whose copies may fail (for example because
/// copying acquires an external resource). Containers use it for copy
/// construction, copy assignment, and the copying transfer strategy. On
/// failure the source is left untouched and no partial copy escapes.
pub trait TryClone: Sized {
    /// Produce an independent copy of `self`.
    fn try_clone(&self) -> Result<Self, ElementError>;
}

macro_rules! try_clone_via_clone {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TryClone for $ty {
                #[inline]
                fn try_clone(&self) -> Result<Self, ElementError> {
                    Ok(self.clone())
                }
            }
        )*
    };
}

try_clone_via_clone!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, (),
    String,
);

impl<T: TryClone> TryClone for Option<T> {
    fn try_clone(&self) -> Result<Self, ElementError> {
        match self {
            Some(v) => v.try_clone().map(Some),
            None => Ok(None),
        }
    }
}

impl<T: TryClone> TryClone for Box<T> {
    fn try_clone(&self) -> Result<Self, ElementError> {
        (**self).try_clone().map(Box::new)
    }
}

impl<A: TryClone, B: TryClone> TryClone for (A, B) {
    fn try_clone(&self) -> Result<Self, ElementError> {
        Ok((self.0.try_clone()?, self.1.try_clone()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Refuses;

    impl TryClone for Refuses {
        fn try_clone(&self) -> Result<Self, ElementError> {
            Err(ElementError::copy("refused"))
        }
    }

    #[test]
    fn primitives_copy_infallibly() {
        assert_eq!(42u32.try_clone(), Ok(42));
        assert_eq!(String::from("abc").try_clone().unwrap(), "abc");
    }

    #[test]
    fn option_propagates_inner_failure() {
        let none: Option<Refuses> = None;
        assert!(none.try_clone().unwrap().is_none());
        assert!(Some(Refuses).try_clone().is_err());
    }

    #[test]
    fn pair_fails_if_either_half_fails() {
        let pair = (1i64, Refuses);
        assert_eq!(
            pair.try_clone().err(),
            Some(ElementError::CopyFailed {
                reason: "refused".into()
            })
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn clone_backed_impls_are_exact(s in ".*", v in any::<Option<i64>>()) {
                prop_assert_eq!(s.try_clone().unwrap(), s.clone());
                prop_assert_eq!(v.try_clone().unwrap(), v);
                let boxed = Box::new((v, s.clone()));
                prop_assert_eq!(boxed.try_clone().unwrap(), boxed);
            }
        }
    }
}
