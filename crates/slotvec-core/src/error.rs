//! Error types for the slotvec workspace.
//!
//! Organised by layer: raw storage ([`StorageError`]), element
//! construction and copying ([`ElementError`]), growth configuration
//! ([`ConfigError`]), and the array-level operations that wrap all of
//! them ([`ArrayError`]).

use std::error::Error;
use std::fmt;

/// Errors from reserving raw storage for a block of elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// The requested element count does not fit in a valid memory layout
    /// (byte size overflows `isize::MAX`), or a growth computation
    /// overflowed `usize`.
    CapacityOverflow {
        /// Number of element slots requested.
        requested: usize,
    },
    /// The global allocator returned null for a valid layout.
    AllocationFailed {
        /// Number of element slots requested.
        requested: usize,
        /// Size of the rejected allocation in bytes.
        bytes: usize,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow { requested } => {
                write!(f, "capacity overflow: {requested} slots do not fit a valid layout")
            }
            Self::AllocationFailed { requested, bytes } => {
                write!(
                    f,
                    "allocation failed: {requested} slots ({bytes} bytes) could not be reserved"
                )
            }
        }
    }
}

impl Error for StorageError {}

/// Errors raised while building or copying a single element.
///
/// Returned by element constructors passed to `emplace`-style operations
/// and by [`TryClone::try_clone`](crate::TryClone::try_clone).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementError {
    /// Constructing a fresh element failed.
    ConstructionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// Copying an existing element failed.
    CopyFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl ElementError {
    /// Shorthand for [`ElementError::ConstructionFailed`].
    pub fn construction(reason: impl Into<String>) -> Self {
        Self::ConstructionFailed {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ElementError::CopyFailed`].
    pub fn copy(reason: impl Into<String>) -> Self {
        Self::CopyFailed {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ElementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConstructionFailed { reason } => {
                write!(f, "element construction failed: {reason}")
            }
            Self::CopyFailed { reason } => write!(f, "element copy failed: {reason}"),
        }
    }
}

impl Error for ElementError {}

/// Errors from validating a growth configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The growth parameters cannot produce a strictly growing capacity.
    InvalidGrowthPolicy {
        /// Description of the offending parameter.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGrowthPolicy { reason } => write!(f, "invalid growth policy: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Errors from operations on a growable array.
///
/// Every variant leaves the array in a valid state. Reallocating
/// operations additionally guarantee that the array is unchanged when
/// they return an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrayError {
    /// An insertion or erasure position lies outside the permitted range
    /// (`[0, len]` for insertion, `[0, len)` for erasure).
    InvalidPosition {
        /// The rejected position.
        position: usize,
        /// Number of live elements at the time of the call.
        len: usize,
    },
    /// Raw storage for a new capacity could not be reserved.
    Allocation(StorageError),
    /// An element constructor or copy failed.
    ElementConstruction(ElementError),
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPosition { position, len } => {
                write!(f, "invalid position {position} for array of length {len}")
            }
            Self::Allocation(e) => write!(f, "storage allocation failed: {e}"),
            Self::ElementConstruction(e) => write!(f, "element construction failed: {e}"),
        }
    }
}

impl Error for ArrayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Allocation(e) => Some(e),
            Self::ElementConstruction(e) => Some(e),
            Self::InvalidPosition { .. } => None,
        }
    }
}

impl From<StorageError> for ArrayError {
    fn from(e: StorageError) -> Self {
        Self::Allocation(e)
    }
}

impl From<ElementError> for ArrayError {
    fn from(e: ElementError) -> Self {
        Self::ElementConstruction(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_position_display_names_position_and_len() {
        let err = ArrayError::InvalidPosition {
            position: 7,
            len: 3,
        };
        assert_eq!(err.to_string(), "invalid position 7 for array of length 3");
        assert!(err.source().is_none());
    }

    #[test]
    fn storage_error_converts_and_chains() {
        let err: ArrayError = StorageError::CapacityOverflow { requested: 9 }.into();
        assert!(matches!(err, ArrayError::Allocation(_)));
        let source = err.source().unwrap();
        assert!(source.to_string().contains("9 slots"));
    }

    #[test]
    fn element_error_converts_and_chains() {
        let err: ArrayError = ElementError::construction("boom").into();
        assert_eq!(
            err,
            ArrayError::ElementConstruction(ElementError::ConstructionFailed {
                reason: "boom".into()
            })
        );
        assert_eq!(
            err.source().unwrap().to_string(),
            "element construction failed: boom"
        );
    }

    #[test]
    fn copy_failure_display() {
        let err = ElementError::copy("budget exhausted");
        assert_eq!(err.to_string(), "element copy failed: budget exhausted");
    }
}
