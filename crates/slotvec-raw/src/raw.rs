//! Untyped-lifetime storage blocks.
//!
//! A [`StorageBlock`] owns a fixed-capacity region of uninitialised memory
//! sized for `capacity` values of `T`. It never tracks which slots hold
//! live values: constructing into a slot, dropping a slot, and making sure
//! every constructed value is dropped before the block goes away are all the
//! owner's job. Dropping the block only returns the memory to the global
//! allocator.
//!
//! This is the only module in the crate that contains `unsafe` code.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use slotvec_core::StorageError;

/// Exclusively owned raw storage for `capacity` values of `T`.
///
/// The block is never `Clone`: duplicating it would mean duplicating the
/// values inside, which only the owner knows about. It can be moved
/// ([`StorageBlock::take`]) or swapped ([`StorageBlock::swap`]) in O(1).
///
/// When no memory is held (capacity 0, or a zero-sized `T`) the base
/// pointer is a dangling, well-aligned sentinel that must never be
/// dereferenced.
pub struct StorageBlock<T> {
    /// Base of the region, or `NonNull::dangling()` when nothing is allocated.
    ptr: NonNull<T>,
    /// Number of element slots the region can hold.
    capacity: usize,
    /// The block logically owns `T` values placed in it by its owner.
    _marker: PhantomData<T>,
}

// SAFETY: the block is a unique owner of its region, exactly like `Box<[T]>`.
// Sending or sharing it is as safe as sending or sharing the `T`s it holds.
unsafe impl<T: Send> Send for StorageBlock<T> {}
// SAFETY: see above; `&StorageBlock` only hands out raw pointers.
unsafe impl<T: Sync> Sync for StorageBlock<T> {}

impl<T> StorageBlock<T> {
    /// An empty block. Performs no allocation.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /// Reserve raw storage for `capacity` values of `T`.
    ///
    /// A capacity of zero performs no allocation. For zero-sized `T` no
    /// memory is needed either, but the requested capacity is still
    /// recorded so the owner can address that many slots.
    ///
    /// # Errors
    ///
    /// - [`StorageError::CapacityOverflow`] if `capacity * size_of::<T>()`
    ///   does not fit a valid layout.
    /// - [`StorageError::AllocationFailed`] if the global allocator cannot
    ///   satisfy the request. No retry is attempted.
    pub fn allocate(capacity: usize) -> Result<Self, StorageError> {
        if capacity == 0 {
            return Ok(Self::new());
        }
        let layout = Layout::array::<T>(capacity).map_err(|_| StorageError::CapacityOverflow {
            requested: capacity,
        })?;
        if layout.size() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity,
                _marker: PhantomData,
            });
        }
        // SAFETY: `layout` has non-zero size (checked above).
        let raw = unsafe { alloc::alloc(layout) };
        let ptr = NonNull::new(raw.cast::<T>()).ok_or(StorageError::AllocationFailed {
            requested: capacity,
            bytes: layout.size(),
        })?;
        Ok(Self {
            ptr,
            capacity,
            _marker: PhantomData,
        })
    }

    /// Address of the slot at `offset`.
    ///
    /// `offset == capacity` yields the one-past-the-end address. The bound
    /// is only checked in debug builds; computing the address is always
    /// safe, but reading or writing through it is only valid for
    /// `offset < capacity` and only under the owner's own bookkeeping.
    #[inline]
    pub fn address_at(&self, offset: usize) -> *mut T {
        debug_assert!(
            offset <= self.capacity,
            "offset {offset} past end of block with capacity {}",
            self.capacity
        );
        self.ptr.as_ptr().wrapping_add(offset)
    }

    /// Base address of the block (the dangling sentinel when unallocated).
    #[inline]
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Number of element slots reserved.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether this block holds memory obtained from the allocator.
    pub fn is_allocated(&self) -> bool {
        self.capacity != 0 && mem::size_of::<T>() != 0
    }

    /// Exchange regions and capacities with `other` in O(1).
    ///
    /// No slot contents are touched.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Move the region out, leaving `self` as the empty block.
    #[must_use]
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }
}

impl<T> Default for StorageBlock<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for StorageBlock<T> {
    fn drop(&mut self) {
        if !self.is_allocated() {
            return;
        }
        // The layout was valid when the block was allocated with this
        // exact capacity, so recomputing it cannot fail.
        if let Ok(layout) = Layout::array::<T>(self.capacity) {
            // SAFETY: `ptr` was returned by `alloc::alloc(layout)` for this
            // same layout and has not been freed (ownership is unique).
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), layout) };
        }
    }
}

impl<T> fmt::Debug for StorageBlock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageBlock")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;
    use std::rc::Rc;

    #[test]
    fn zero_capacity_does_not_allocate() {
        let block = StorageBlock::<u64>::allocate(0).unwrap();
        assert_eq!(block.capacity(), 0);
        assert!(!block.is_allocated());
        assert_eq!(block.as_ptr(), NonNull::<u64>::dangling().as_ptr());
    }

    #[test]
    fn allocate_reserves_requested_slots() {
        let block = StorageBlock::<u32>::allocate(16).unwrap();
        assert_eq!(block.capacity(), 16);
        assert!(block.is_allocated());
        for i in 0..16 {
            // SAFETY: i < capacity; slots are written once and read back.
            unsafe {
                block.address_at(i).write(i as u32 * 3);
            }
        }
        // SAFETY: slot 15 was initialised above.
        assert_eq!(unsafe { block.address_at(15).read() }, 45);
    }

    #[test]
    fn address_at_is_contiguous() {
        let block = StorageBlock::<u16>::allocate(4).unwrap();
        let base = block.address_at(0) as usize;
        assert_eq!(block.address_at(1) as usize, base + 2);
        assert_eq!(block.address_at(4) as usize, base + 8);
    }

    #[test]
    fn overflowing_capacity_is_reported() {
        let result = StorageBlock::<u64>::allocate(usize::MAX);
        assert_eq!(
            result.unwrap_err(),
            StorageError::CapacityOverflow {
                requested: usize::MAX
            }
        );
    }

    #[test]
    fn zero_sized_types_record_capacity_without_memory() {
        let block = StorageBlock::<()>::allocate(1_000).unwrap();
        assert_eq!(block.capacity(), 1_000);
        assert!(!block.is_allocated());
    }

    #[test]
    fn swap_exchanges_regions() {
        let mut a = StorageBlock::<u8>::allocate(4).unwrap();
        let mut b = StorageBlock::<u8>::allocate(8).unwrap();
        let (pa, pb) = (a.as_ptr(), b.as_ptr());
        a.swap(&mut b);
        assert_eq!(a.capacity(), 8);
        assert_eq!(b.capacity(), 4);
        assert_eq!(a.as_ptr(), pb);
        assert_eq!(b.as_ptr(), pa);
    }

    #[test]
    fn take_leaves_source_empty() {
        let mut a = StorageBlock::<u8>::allocate(4).unwrap();
        let p = a.as_ptr();
        let b = a.take();
        assert_eq!(b.capacity(), 4);
        assert_eq!(b.as_ptr(), p);
        assert_eq!(a.capacity(), 0);
        assert!(!a.is_allocated());
    }

    #[test]
    fn drop_never_runs_element_destructors() {
        let witness = Rc::new(());
        {
            let block = StorageBlock::<Rc<()>>::allocate(2).unwrap();
            // SAFETY: slot 0 is in bounds and uninitialised.
            unsafe { block.address_at(0).write(Rc::clone(&witness)) };
            assert_eq!(Rc::strong_count(&witness), 2);
            // Owner's responsibility: read the value back out before release.
            // SAFETY: slot 0 was initialised above and is read exactly once.
            let back = unsafe { ptr::read(block.address_at(0)) };
            drop(back);
        }
        assert_eq!(Rc::strong_count(&witness), 1);
    }

    #[test]
    fn block_without_cleanup_leaks_instead_of_dropping() {
        let witness = Rc::new(());
        {
            let block = StorageBlock::<Rc<()>>::allocate(1).unwrap();
            // SAFETY: slot 0 is in bounds and uninitialised.
            unsafe { block.address_at(0).write(Rc::clone(&witness)) };
        }
        // The block released memory only; the clone was never dropped.
        assert_eq!(Rc::strong_count(&witness), 2);
    }
}
