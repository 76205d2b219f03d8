//! Raw storage primitives for the slotvec container.
//!
//! Separates *owning memory* from *owning values*: a [`StorageBlock`]
//! holds uninitialised slots and knows nothing about which of them are
//! live. The container built on top decides when values are constructed
//! into slots and when they are dropped. This crate is one of two that may
//! contain `unsafe` code (along with `slotvec-array`), and only in
//! [`raw`].
//!
//! # Architecture
//!
//! ```text
//! GrowableArray<T, P> (slotvec-array)
//! ├── StorageBlock<T>   raw region, capacity slots, no lifetime tracking
//! ├── len               how many leading slots hold live values
//! └── GrowthPolicy      next capacity when the block is full
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod config;
pub mod raw;

pub use config::GrowthPolicy;
pub use raw::StorageBlock;
