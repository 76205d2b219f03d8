//! Growable contiguous array built on raw storage blocks.
//!
//! [`GrowableArray`] owns one [`StorageBlock`](slotvec_raw::StorageBlock)
//! and tracks how many of its slots hold live values. All element-level
//! work (placement construction, dropping, growth, shifting) happens here,
//! together with the explicit rollback that keeps a reallocating operation
//! from ever leaving the array half-updated.
//!
//! # Transfer policies
//!
//! How values cross into a new block on reallocation is chosen at compile
//! time by the `P` type parameter:
//!
//! - [`Relocate`] (default): bitwise move, infallible, any `T`.
//! - [`Duplicate`]: copy through [`TryClone`](slotvec_core::TryClone),
//!   originals untouched until the new block is complete.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod array;
pub mod transfer;

pub use array::GrowableArray;
pub use transfer::{Duplicate, Relocate, TransferPolicy};
