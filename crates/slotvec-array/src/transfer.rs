//! Element transfer strategies used when a [`GrowableArray`] reallocates.
//!
//! Reallocation builds the new block while the old block is still
//! authoritative, so a failure can be rolled back by throwing the new
//! block away. The policy decides how values get into the new block and
//! what "throwing away" and "committing" mean for them:
//!
//! | Policy | `transfer` | `abandon` (rollback) | `release_source` (commit) |
//! |---|---|---|---|
//! | [`Relocate`] | bitwise move, cannot fail | nothing (old block still owns the values) | nothing (values now live in the new block) |
//! | [`Duplicate`] | `TryClone` each value | drop the copies | drop the originals |
//!
//! Rust moves never fail, so [`Relocate`] is the default and is always
//! correct. [`Duplicate`] is the copy-based alternative for element types
//! whose values must be rebuilt rather than relocated; it keeps every
//! original untouched until the whole new block is complete.
//!
//! [`GrowableArray`]: crate::GrowableArray

#![allow(unsafe_code)]

use std::ptr;

use slotvec_core::{ElementError, TryClone};

/// How values are moved from an old storage block into a new one.
///
/// # Safety
///
/// Implementations must uphold the contracts documented on each method;
/// the array relies on them to never double-drop or read uninitialised
/// memory.
pub unsafe trait TransferPolicy<T> {
    /// Place `count` values read from `src` into the uninitialised slots
    /// starting at `dst`.
    ///
    /// On `Err`, no value remains constructed in `dst` and the source
    /// values are untouched.
    ///
    /// # Safety
    ///
    /// `src` must point to `count` live values, `dst` to `count`
    /// uninitialised slots, and the two ranges must not overlap.
    unsafe fn transfer(src: *const T, dst: *mut T, count: usize) -> Result<(), ElementError>;

    /// Roll back a successful [`transfer`](Self::transfer) of `count`
    /// values into `dst`; the source stays authoritative.
    ///
    /// # Safety
    ///
    /// `dst` must hold exactly the `count` values produced by `transfer`,
    /// and they must not be used afterwards.
    unsafe fn abandon(dst: *mut T, count: usize);

    /// Retire `count` source values once their transfer has been committed.
    ///
    /// # Safety
    ///
    /// `src` must be the source of a committed `transfer` of `count`
    /// values, and must not be used afterwards.
    unsafe fn release_source(src: *mut T, count: usize);
}

/// Transfer by bitwise move. Works for every `T` and cannot fail.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Relocate;

// SAFETY: a non-overlapping bitwise copy hands ownership of the values to
// whichever block is kept; exactly one of the two blocks is ever treated as
// owning them, so nothing is dropped twice.
unsafe impl<T> TransferPolicy<T> for Relocate {
    #[inline]
    unsafe fn transfer(src: *const T, dst: *mut T, count: usize) -> Result<(), ElementError> {
        // SAFETY: forwarded from the caller's contract.
        unsafe { ptr::copy_nonoverlapping(src, dst, count) };
        Ok(())
    }

    #[inline]
    unsafe fn abandon(_dst: *mut T, _count: usize) {}

    #[inline]
    unsafe fn release_source(_src: *mut T, _count: usize) {}
}

/// Transfer by fallible copy through [`TryClone`].
///
/// A failed copy drops the copies already made and reports the error; the
/// originals are never touched until the caller commits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Duplicate;

// SAFETY: every value written to `dst` is a fresh, independently owned copy;
// rollback drops exactly those copies and commit drops exactly the originals.
unsafe impl<T: TryClone> TransferPolicy<T> for Duplicate {
    unsafe fn transfer(src: *const T, dst: *mut T, count: usize) -> Result<(), ElementError> {
        for i in 0..count {
            // SAFETY: i < count, so `src.add(i)` is a live value.
            let copied = unsafe { (*src.add(i)).try_clone() };
            match copied {
                // SAFETY: i < count, so `dst.add(i)` is an uninitialised slot.
                Ok(value) => unsafe { dst.add(i).write(value) },
                Err(e) => {
                    // SAFETY: slots [0, i) were written above.
                    unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(dst, i)) };
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    unsafe fn abandon(dst: *mut T, count: usize) {
        // SAFETY: forwarded from the caller's contract.
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(dst, count)) };
    }

    unsafe fn release_source(src: *mut T, count: usize) {
        // SAFETY: forwarded from the caller's contract.
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(src, count)) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::mem::MaybeUninit;
    use std::rc::Rc;

    /// Copies succeed while the shared budget lasts.
    struct Budgeted {
        budget: Rc<Cell<usize>>,
        witness: Rc<()>,
    }

    impl TryClone for Budgeted {
        fn try_clone(&self) -> Result<Self, ElementError> {
            if self.budget.get() == 0 {
                return Err(ElementError::copy("budget exhausted"));
            }
            self.budget.set(self.budget.get() - 1);
            Ok(Self {
                budget: Rc::clone(&self.budget),
                witness: Rc::clone(&self.witness),
            })
        }
    }

    fn sources(n: usize, budget: usize) -> (Vec<Budgeted>, Rc<()>) {
        let budget = Rc::new(Cell::new(budget));
        let witness = Rc::new(());
        let values = (0..n)
            .map(|_| Budgeted {
                budget: Rc::clone(&budget),
                witness: Rc::clone(&witness),
            })
            .collect();
        (values, witness)
    }

    #[test]
    fn relocate_copies_bits() {
        let src = [1u32, 2, 3];
        let mut dst = [MaybeUninit::<u32>::uninit(); 3];
        // SAFETY: 3 live sources, 3 uninitialised destinations, disjoint.
        unsafe {
            Relocate::transfer(src.as_ptr(), dst.as_mut_ptr().cast::<u32>(), 3).unwrap();
        }
        // SAFETY: all three slots were written by the transfer.
        let out: Vec<u32> = dst.iter().map(|v| unsafe { v.assume_init() }).collect();
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn duplicate_rolls_back_partial_copies() {
        let (values, witness) = sources(4, 2);
        assert_eq!(Rc::strong_count(&witness), 5);
        let mut dst: Vec<MaybeUninit<Budgeted>> = (0..4).map(|_| MaybeUninit::uninit()).collect();
        // SAFETY: 4 live sources, 4 uninitialised destinations, disjoint.
        let result = unsafe {
            <Duplicate as TransferPolicy<Budgeted>>::transfer(
                values.as_ptr(),
                dst.as_mut_ptr().cast::<Budgeted>(),
                4,
            )
        };
        assert_eq!(result, Err(ElementError::copy("budget exhausted")));
        // The two successful copies were dropped again.
        assert_eq!(Rc::strong_count(&witness), 5);
    }

    #[test]
    fn duplicate_abandon_and_release_drop_the_right_side() {
        let (mut values, witness) = sources(2, 10);
        let mut dst: Vec<MaybeUninit<Budgeted>> = (0..2).map(|_| MaybeUninit::uninit()).collect();
        let dst_ptr = dst.as_mut_ptr().cast::<Budgeted>();
        // SAFETY: 2 live sources, 2 uninitialised destinations, disjoint.
        unsafe {
            <Duplicate as TransferPolicy<Budgeted>>::transfer(values.as_ptr(), dst_ptr, 2).unwrap();
        }
        assert_eq!(Rc::strong_count(&witness), 5);

        // SAFETY: dst holds the two copies and is not used afterwards.
        unsafe { <Duplicate as TransferPolicy<Budgeted>>::abandon(dst_ptr, 2) };
        assert_eq!(Rc::strong_count(&witness), 3);

        // SAFETY: the originals are retired; `set_len(0)` stops the Vec
        // from dropping them a second time.
        unsafe {
            <Duplicate as TransferPolicy<Budgeted>>::release_source(values.as_mut_ptr(), 2);
            values.set_len(0);
        }
        assert_eq!(Rc::strong_count(&witness), 1);
    }
}
