//! Core types and traits for the slotvec container workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the error taxonomy shared by the raw storage layer and the growable
//! array, plus the [`TryClone`] capability trait used wherever an element
//! must be copied and the copy is allowed to fail.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod traits;

pub use error::{ArrayError, ConfigError, ElementError, StorageError};
pub use traits::TryClone;
