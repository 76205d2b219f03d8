//! Test utilities for slotvec development.
//!
//! Provides element types that make lifetime bugs observable: every
//! [`Specimen`] is registered with an [`InstanceLedger`] that counts
//! constructions and drops and panics on a double drop, and a
//! [`FailingFactory`] builds specimens until a configured call count, then
//! fails deterministically.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{FailingFactory, InstanceLedger, Specimen};
