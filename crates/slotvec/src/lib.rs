//! slotvec: a growable contiguous array built from raw memory primitives.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all slotvec sub-crates. For most users, adding `slotvec` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use slotvec::prelude::*;
//!
//! let mut array = GrowableArray::new();
//! for v in [1, 2, 3] {
//!     array.push_back(v).unwrap();
//! }
//! array.insert(1, 99).unwrap();
//! assert_eq!(array, [1, 99, 2, 3]);
//!
//! array.erase(0).unwrap();
//! array.resize(5).unwrap();
//! assert_eq!(array, [99, 2, 3, 0, 0]);
//!
//! // Constructors may fail; a failed append leaves the array as it was.
//! let err = array.emplace_back(|| Err(ElementError::construction("no")));
//! assert!(err.is_err());
//! assert_eq!(array, [99, 2, 3, 0, 0]);
//!
//! // Out-of-range positions are reported, not panicked on.
//! assert!(matches!(
//!     array.erase(9),
//!     Err(ArrayError::InvalidPosition { position: 9, len: 5 })
//! ));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `slotvec-core` | Error types and the `TryClone` trait |
//! | [`raw`] | `slotvec-raw` | `StorageBlock` and `GrowthPolicy` |
//! | [`array`] | `slotvec-array` | `GrowableArray` and transfer policies |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Error types and element capability traits (`slotvec-core`).
pub use slotvec_core as types;

/// Raw storage blocks and growth configuration (`slotvec-raw`).
///
/// Most users never touch [`raw::StorageBlock`] directly; it is exposed for
/// building other containers on the same primitives.
pub use slotvec_raw as raw;

/// The growable array and its transfer policies (`slotvec-array`).
pub use slotvec_array as array;

/// Common imports for typical slotvec usage.
///
/// ```rust
/// use slotvec::prelude::*;
/// ```
pub mod prelude {
    // Array
    pub use slotvec_array::{Duplicate, GrowableArray, Relocate, TransferPolicy};

    // Configuration
    pub use slotvec_raw::GrowthPolicy;

    // Core types and traits
    pub use slotvec_core::{ArrayError, ConfigError, ElementError, StorageError, TryClone};
}
