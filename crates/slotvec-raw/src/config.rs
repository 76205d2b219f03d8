//! Growth configuration for reallocating containers.

use slotvec_core::{ConfigError, StorageError};

/// How a container picks its next capacity once the current one is full.
///
/// The next capacity is `max(min_capacity, current * factor)`. The default
/// is plain doubling from one slot, giving the capacity sequence
/// 1, 2, 4, 8, … and amortised O(1) appends at up to 2× memory overhead.
/// Validated at construction; immutable afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowthPolicy {
    /// Capacity used when growing an empty container.
    ///
    /// Default: 1. Must be at least 1.
    min_capacity: usize,

    /// Multiplier applied to a full, non-empty container's capacity.
    ///
    /// Default: 2. Must be at least 2 so every growth step makes room for
    /// at least one more element.
    factor: usize,
}

impl GrowthPolicy {
    /// Default capacity for the first allocation.
    pub const DEFAULT_MIN_CAPACITY: usize = 1;

    /// Default growth multiplier.
    pub const DEFAULT_FACTOR: usize = 2;

    /// Doubling from a single slot.
    pub const DOUBLING: Self = Self {
        min_capacity: Self::DEFAULT_MIN_CAPACITY,
        factor: Self::DEFAULT_FACTOR,
    };

    /// Create a validated growth policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidGrowthPolicy`] if `min_capacity` is
    /// zero or `factor` is below 2.
    pub fn new(min_capacity: usize, factor: usize) -> Result<Self, ConfigError> {
        if min_capacity == 0 {
            return Err(ConfigError::InvalidGrowthPolicy {
                reason: "min_capacity must be at least 1".into(),
            });
        }
        if factor < 2 {
            return Err(ConfigError::InvalidGrowthPolicy {
                reason: format!("factor must be at least 2, got {factor}"),
            });
        }
        Ok(Self {
            min_capacity,
            factor,
        })
    }

    /// Capacity used when growing an empty container.
    pub fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    /// Multiplier applied to a full container's capacity.
    pub fn factor(&self) -> usize {
        self.factor
    }

    /// The capacity to grow to from `current`.
    ///
    /// Always strictly greater than `current`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::CapacityOverflow`] if the multiplication
    /// overflows `usize`.
    pub fn next_capacity(&self, current: usize) -> Result<usize, StorageError> {
        let grown = current
            .checked_mul(self.factor)
            .ok_or(StorageError::CapacityOverflow {
                requested: current,
            })?;
        Ok(grown.max(self.min_capacity))
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::DOUBLING
    }
}
