//! The growable array.
//!
//! [`GrowableArray`] owns exactly one [`StorageBlock`] and a count of how
//! many of its leading slots hold live values. Everything about value
//! lifetimes happens here: construction into slots, dropping, growth,
//! shifting, and the rollback that keeps the array intact when building a
//! new block fails halfway.
//!
//! # Failure guarantees
//!
//! - Every reallocating operation ([`reserve`], growth in [`try_resize_with`],
//!   [`emplace_back`], [`emplace`]) builds the complete new block before
//!   touching the old one. On error, whatever was built in the new block is
//!   dropped (per the [`TransferPolicy`]), the new block is freed, and the
//!   array is exactly as it was.
//! - In-place [`emplace`] constructs the value before shifting anything, so
//!   a failing constructor leaves the array untouched.
//! - Shifting during in-place insertion and erasure moves values bitwise,
//!   which cannot fail. No stronger guarantee than "valid" is promised for
//!   the shifted range, and none is needed.
//!
//! [`reserve`]: GrowableArray::reserve
//! [`try_resize_with`]: GrowableArray::try_resize_with
//! [`emplace_back`]: GrowableArray::emplace_back
//! [`emplace`]: GrowableArray::emplace

#![allow(unsafe_code)]

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::ptr;
use std::slice::{self, SliceIndex};

use slotvec_core::{ArrayError, ElementError, TryClone};
use slotvec_raw::{GrowthPolicy, StorageBlock};

use crate::transfer::{Relocate, TransferPolicy};

/// A contiguous, growable sequence built directly on raw storage.
///
/// Invariant: `len <= capacity`; slots `[0, len)` hold live values and
/// slots `[len, capacity)` are uninitialised.
///
/// `P` selects how values are carried across a reallocation; see
/// [`crate::transfer`]. The default, [`Relocate`], is correct for every
/// element type.
pub struct GrowableArray<T, P = Relocate> {
    block: StorageBlock<T>,
    len: usize,
    growth: GrowthPolicy,
    _policy: PhantomData<fn() -> P>,
}

impl<T> GrowableArray<T> {
    /// An empty array. Performs no allocation.
    pub const fn new() -> Self {
        Self::with_growth(GrowthPolicy::DOUBLING)
    }

    /// An empty array with room for exactly `capacity` values.
    pub fn with_capacity(capacity: usize) -> Result<Self, ArrayError> {
        Self::with_capacity_and_growth(capacity, GrowthPolicy::DOUBLING)
    }

    /// An array of `len` default values, built with one allocation.
    pub fn with_len(len: usize) -> Result<Self, ArrayError>
    where
        T: Default,
    {
        Self::with_len_and_growth(len, GrowthPolicy::DOUBLING)
    }
}

impl<T, P> GrowableArray<T, P> {
    /// An empty array that grows according to `growth`.
    pub const fn with_growth(growth: GrowthPolicy) -> Self {
        Self {
            block: StorageBlock::new(),
            len: 0,
            growth,
            _policy: PhantomData,
        }
    }

    /// An empty array with room for exactly `capacity` values.
    pub fn with_capacity_and_growth(
        capacity: usize,
        growth: GrowthPolicy,
    ) -> Result<Self, ArrayError> {
        Ok(Self {
            block: StorageBlock::allocate(capacity)?,
            len: 0,
            growth,
            _policy: PhantomData,
        })
    }

    /// An array of `len` default values, built with one allocation.
    pub fn with_len_and_growth(len: usize, growth: GrowthPolicy) -> Result<Self, ArrayError>
    where
        T: Default,
    {
        let mut array = Self::with_capacity_and_growth(len, growth)?;
        while array.len < len {
            // SAFETY: len < capacity, so the slot is in bounds and unused.
            unsafe { array.block.address_at(array.len).write(T::default()) };
            array.len += 1;
        }
        Ok(array)
    }

    /// Number of live values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots reserved.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.block.capacity()
    }

    /// The growth policy used when the array is full.
    pub fn growth(&self) -> GrowthPolicy {
        self.growth
    }

    /// The live values as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the base pointer is non-null and aligned (dangling when
        // unallocated), and [0, len) are live values.
        unsafe { slice::from_raw_parts(self.block.as_ptr(), self.len) }
    }

    /// The live values as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`; `&mut self` guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.block.as_ptr(), self.len) }
    }

    /// Move the contents out in O(1), leaving `self` empty with no storage.
    #[must_use]
    pub fn take(&mut self) -> Self {
        let growth = self.growth;
        mem::replace(self, Self::with_growth(growth))
    }

    /// Replace this array's contents with `source`'s in O(1).
    ///
    /// The previous values are dropped; `source` ends empty with zero
    /// capacity.
    pub fn move_assign(&mut self, source: &mut Self) {
        *self = source.take();
    }

    /// Exchange contents, capacities, and growth policies with `other`.
    ///
    /// Named apart from the slice method so `array.swap(i, j)` still
    /// reaches `<[T]>::swap` through `Deref`.
    #[inline]
    pub fn swap_with(&mut self, other: &mut Self) {
        self.block.swap(&mut other.block);
        mem::swap(&mut self.len, &mut other.len);
        mem::swap(&mut self.growth, &mut other.growth);
    }

    /// Remove and return the last value, or `None` if empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot `len` held the last live value and is now outside
        // the live range, so it is read exactly once.
        Some(unsafe { ptr::read(self.block.address_at(self.len)) })
    }

    /// Drop every value from index `len` onwards. Capacity is unchanged.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let tail = ptr::slice_from_raw_parts_mut(self.block.address_at(len), self.len - len);
        // Shrink first so a panicking destructor cannot cause a double drop.
        self.len = len;
        // SAFETY: the tail held live values and is no longer reachable.
        unsafe { ptr::drop_in_place(tail) };
    }

    /// Drop every value. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Remove the value at `index`, shifting the tail left.
    ///
    /// # Errors
    ///
    /// [`ArrayError::InvalidPosition`] unless `index < len`.
    pub fn remove(&mut self, index: usize) -> Result<T, ArrayError> {
        if index >= self.len {
            return Err(ArrayError::InvalidPosition {
                position: index,
                len: self.len,
            });
        }
        let slot = self.block.address_at(index);
        // SAFETY: index < len, so `slot` is live; the tail [index + 1, len)
        // is moved down by one and the vacated last slot leaves the live
        // range before anything can observe it.
        unsafe {
            let value = ptr::read(slot);
            ptr::copy(slot.add(1), slot, self.len - index - 1);
            self.len -= 1;
            Ok(value)
        }
    }

    /// Drop the value at `index`, shifting the tail left.
    ///
    /// Returns the index of the value that followed the erased one (equal
    /// to the new `len` when the last value was erased).
    ///
    /// # Errors
    ///
    /// [`ArrayError::InvalidPosition`] unless `index < len`.
    pub fn erase(&mut self, index: usize) -> Result<usize, ArrayError> {
        drop(self.remove(index)?);
        Ok(index)
    }
}

impl<T, P: TransferPolicy<T>> GrowableArray<T, P> {
    /// Ensure room for at least `capacity` values.
    ///
    /// Does nothing if the current capacity suffices; otherwise allocates
    /// exactly `capacity` slots and transfers every value. On error the
    /// array is unchanged.
    pub fn reserve(&mut self, capacity: usize) -> Result<(), ArrayError> {
        if capacity <= self.capacity() {
            return Ok(());
        }
        let fresh = StorageBlock::allocate(capacity)?;
        // SAFETY: [0, len) are live; `fresh` has at least `len` empty slots.
        unsafe {
            P::transfer(self.block.as_ptr(), fresh.as_ptr(), self.len)?;
            self.adopt(fresh, self.len);
        }
        Ok(())
    }

    /// Set the length to `new_len`, building new values with `make`.
    ///
    /// Shrinking drops the tail. Growing within capacity builds the new
    /// values in place. Growing beyond capacity reallocates to
    /// `max(new_len, growth.next_capacity(capacity))`, builds the new values
    /// in the new block, and only then retires the old one.
    ///
    /// # Errors
    ///
    /// On any error the array is left exactly as it was.
    pub fn try_resize_with<F>(&mut self, new_len: usize, mut make: F) -> Result<(), ArrayError>
    where
        F: FnMut() -> Result<T, ElementError>,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }

        if new_len <= self.capacity() {
            let old_len = self.len;
            while self.len < new_len {
                match make() {
                    // SAFETY: len < new_len <= capacity; the slot is empty.
                    Ok(value) => unsafe { self.block.address_at(self.len).write(value) },
                    Err(e) => {
                        self.truncate(old_len);
                        return Err(e.into());
                    }
                }
                self.len += 1;
            }
            return Ok(());
        }

        let target = new_len.max(self.growth.next_capacity(self.capacity())?);
        let fresh = StorageBlock::allocate(target)?;
        // SAFETY: [0, len) are live; `fresh` has `target >= len` empty slots.
        unsafe { P::transfer(self.block.as_ptr(), fresh.as_ptr(), self.len)? };

        let mut built = self.len;
        while built < new_len {
            match make() {
                // SAFETY: built < new_len <= target; the slot is empty.
                Ok(value) => unsafe { fresh.address_at(built).write(value) },
                Err(e) => {
                    // SAFETY: [len, built) were written just above and
                    // [0, len) came from the transfer.
                    unsafe {
                        ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                            fresh.address_at(self.len),
                            built - self.len,
                        ));
                        P::abandon(fresh.as_ptr(), self.len);
                    }
                    return Err(e.into());
                }
            }
            built += 1;
        }

        // SAFETY: `fresh` holds the transferred values plus the new tail.
        unsafe { self.adopt(fresh, new_len) };
        Ok(())
    }

    /// Set the length to `new_len`, filling new slots with `T::default()`.
    pub fn resize(&mut self, new_len: usize) -> Result<(), ArrayError>
    where
        T: Default,
    {
        self.try_resize_with(new_len, || Ok(T::default()))
    }

    /// Append the value produced by `make` and return a reference to it.
    ///
    /// When the array is full it grows to `growth.next_capacity(capacity)`
    /// first, and `make` runs only after the existing values have been
    /// transferred to the new block. If `make` fails, the new block is
    /// discarded and the array is exactly as before.
    pub fn emplace_back<F>(&mut self, make: F) -> Result<&mut T, ArrayError>
    where
        F: FnOnce() -> Result<T, ElementError>,
    {
        let index = self.len;
        if self.len < self.capacity() {
            let value = make()?;
            // SAFETY: len < capacity; the slot is empty.
            unsafe { self.block.address_at(index).write(value) };
            self.len += 1;
            return Ok(&mut self.as_mut_slice()[index]);
        }

        let fresh = StorageBlock::allocate(self.growth.next_capacity(self.capacity())?)?;
        // SAFETY: [0, len) are live; `fresh` has more than `len` empty slots.
        unsafe { P::transfer(self.block.as_ptr(), fresh.as_ptr(), self.len)? };

        let value = match make() {
            Ok(value) => value,
            Err(e) => {
                // SAFETY: `fresh` holds exactly the transferred values.
                unsafe { P::abandon(fresh.as_ptr(), self.len) };
                return Err(e.into());
            }
        };

        // SAFETY: slot `index` is the first empty slot of `fresh`; after the
        // write `fresh` holds `index + 1` live values.
        unsafe {
            fresh.address_at(index).write(value);
            self.adopt(fresh, index + 1);
        }
        Ok(&mut self.as_mut_slice()[index])
    }

    /// Append `value` and return a reference to it.
    pub fn push_back(&mut self, value: T) -> Result<&mut T, ArrayError> {
        self.emplace_back(|| Ok(value))
    }

    /// Insert the value produced by `make` at `index`, shifting later values
    /// right. Returns `index`.
    ///
    /// A full array reallocates: the prefix is transferred, the new value
    /// is built directly in its slot of the new block, then the suffix is
    /// transferred. Any failure on that path leaves the array unchanged.
    /// Otherwise the value is built first and only then are the later
    /// values shifted, so a failing `make` leaves the array unchanged too.
    ///
    /// # Errors
    ///
    /// [`ArrayError::InvalidPosition`] unless `index <= len`.
    pub fn emplace<F>(&mut self, index: usize, make: F) -> Result<usize, ArrayError>
    where
        F: FnOnce() -> Result<T, ElementError>,
    {
        if index > self.len {
            return Err(ArrayError::InvalidPosition {
                position: index,
                len: self.len,
            });
        }
        if self.len == self.capacity() {
            return self.emplace_reallocating(index, make);
        }

        let value = make()?;
        let slot = self.block.address_at(index);
        // SAFETY: len < capacity, so [index, len) can move up by one slot;
        // `ptr::copy` handles the overlap. Slot `index` is then free.
        unsafe {
            if index < self.len {
                ptr::copy(slot, slot.add(1), self.len - index);
            }
            slot.write(value);
        }
        self.len += 1;
        Ok(index)
    }

    /// Insert `value` at `index`, shifting later values right. Returns
    /// `index`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<usize, ArrayError> {
        self.emplace(index, || Ok(value))
    }

    fn emplace_reallocating<F>(&mut self, index: usize, make: F) -> Result<usize, ArrayError>
    where
        F: FnOnce() -> Result<T, ElementError>,
    {
        let fresh = StorageBlock::allocate(self.growth.next_capacity(self.capacity())?)?;
        let old = self.block.as_ptr();
        let new = fresh.as_ptr();

        // SAFETY: [0, index) are live in the old block and empty in `fresh`.
        unsafe { P::transfer(old, new, index)? };

        let value = match make() {
            Ok(value) => value,
            Err(e) => {
                // SAFETY: `fresh` holds exactly the transferred prefix.
                unsafe { P::abandon(new, index) };
                return Err(e.into());
            }
        };
        // SAFETY: slot `index` of `fresh` is empty and in bounds
        // (capacity > len >= index).
        unsafe { fresh.address_at(index).write(value) };

        // SAFETY: [index, len) are live in the old block; `fresh` has room
        // for them after the new value.
        let suffix = unsafe {
            P::transfer(
                self.block.address_at(index),
                fresh.address_at(index + 1),
                self.len - index,
            )
        };
        if let Err(e) = suffix {
            // SAFETY: the new value and the prefix are the only live values
            // in `fresh`; the old block is still authoritative.
            unsafe {
                ptr::drop_in_place(fresh.address_at(index));
                P::abandon(new, index);
            }
            return Err(e.into());
        }

        // SAFETY: `fresh` holds all old values plus the new one.
        unsafe { self.adopt(fresh, self.len + 1) };
        Ok(index)
    }

    /// Install `fresh` as the storage block and retire the old values.
    ///
    /// # Safety
    ///
    /// `fresh` must hold `new_len` live values, and the old block's
    /// `self.len` values must have been transferred into it with `P`.
    unsafe fn adopt(&mut self, fresh: StorageBlock<T>, new_len: usize) {
        let old_len = self.len;
        let old = mem::replace(&mut self.block, fresh);
        // The new block is authoritative before the old values are retired,
        // so a panicking destructor cannot cause a double drop.
        self.len = new_len;
        // SAFETY: guaranteed by the caller.
        unsafe { P::release_source(old.as_ptr(), old_len) };
    }
}

impl<T: TryClone, P> GrowableArray<T, P> {
    /// Copy every value into a new array sized to exactly `len`.
    ///
    /// On error the partial copy is dropped and freed.
    pub fn try_clone(&self) -> Result<Self, ArrayError> {
        let mut copy = Self::with_capacity_and_growth(self.len, self.growth)?;
        for value in self.as_slice() {
            let value = value.try_clone()?;
            // SAFETY: copy.len < copy.capacity == self.len.
            unsafe { copy.block.address_at(copy.len).write(value) };
            copy.len += 1;
        }
        Ok(copy)
    }

    /// Make this array a copy of `source`.
    ///
    /// If `source` does not fit in the current capacity, a complete copy is
    /// built first and swapped in: on error this array is untouched.
    /// Otherwise the existing storage is reused: the common prefix is
    /// copy-assigned, then extra values are copied into spare slots or the
    /// surplus tail is dropped. A failure on that path leaves a valid array
    /// holding a mix of old and copied values.
    pub fn assign_from(&mut self, source: &Self) -> Result<(), ArrayError> {
        if source.len > self.capacity() {
            let mut copy = source.try_clone()?;
            copy.growth = self.growth;
            self.swap_with(&mut copy);
            return Ok(());
        }

        let common = self.len.min(source.len);
        for (dst, src) in self.as_mut_slice()[..common]
            .iter_mut()
            .zip(&source.as_slice()[..common])
        {
            *dst = src.try_clone()?;
        }

        if source.len > self.len {
            for value in &source.as_slice()[self.len..] {
                let value = value.try_clone()?;
                // SAFETY: len < source.len <= capacity; the slot is empty.
                unsafe { self.block.address_at(self.len).write(value) };
                self.len += 1;
            }
        } else {
            self.truncate(source.len);
        }
        Ok(())
    }
}

impl<T: TryClone, P> TryClone for GrowableArray<T, P> {
    fn try_clone(&self) -> Result<Self, ElementError> {
        GrowableArray::try_clone(self).map_err(|e| match e {
            ArrayError::ElementConstruction(inner) => inner,
            other => ElementError::copy(other.to_string()),
        })
    }
}

impl<T, P> Drop for GrowableArray<T, P> {
    fn drop(&mut self) {
        // SAFETY: [0, len) are live and dropped exactly once; the block
        // then frees the memory without touching the slots.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.block.as_ptr(),
                self.len,
            ));
        }
    }
}

impl<T, P> Default for GrowableArray<T, P> {
    fn default() -> Self {
        Self::with_growth(GrowthPolicy::DOUBLING)
    }
}

impl<T, P> Deref for GrowableArray<T, P> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, P> DerefMut for GrowableArray<T, P> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, P> AsRef<[T]> for GrowableArray<T, P> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, P, I: SliceIndex<[T]>> Index<I> for GrowableArray<T, P> {
    type Output = I::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, P, I: SliceIndex<[T]>> IndexMut<I> for GrowableArray<T, P> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<'a, T, P> IntoIterator for &'a GrowableArray<T, P> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, P> IntoIterator for &'a mut GrowableArray<T, P> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T: fmt::Debug, P> fmt::Debug for GrowableArray<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq, P, Q> PartialEq<GrowableArray<T, Q>> for GrowableArray<T, P> {
    fn eq(&self, other: &GrowableArray<T, Q>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, P> Eq for GrowableArray<T, P> {}

impl<T: PartialEq, P> PartialEq<[T]> for GrowableArray<T, P> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq, P, const N: usize> PartialEq<[T; N]> for GrowableArray<T, P> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}
