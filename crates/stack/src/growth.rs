//! Capacity growth policy
//!
//! Capacity grows geometrically: `max(1, capacity * factor)`. The floor of one
//! slot keeps a zero-capacity stack (default-constructed or moved-from) from
//! being stuck at zero forever.

use crate::error::{StackError, StackResult};

/// Smallest accepted growth factor
pub const MIN_GROWTH_FACTOR: usize = 2;

/// Default growth factor
pub const DEFAULT_GROWTH_FACTOR: usize = 2;

/// Geometric growth policy for stack storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GrowthPolicy {
    factor: usize,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::doubling()
    }
}

impl GrowthPolicy {
    /// Create a growth policy with the given multiplier
    ///
    /// # Errors
    /// Returns [`StackError::InvalidConfig`] when `factor` is below
    /// [`MIN_GROWTH_FACTOR`].
    pub fn new(factor: usize) -> StackResult<Self> {
        if factor < MIN_GROWTH_FACTOR {
            return Err(StackError::InvalidConfig {
                reason: format!("growth factor must be at least {MIN_GROWTH_FACTOR}, got {factor}"),
            });
        }
        Ok(Self { factor })
    }

    /// The default doubling policy
    #[must_use]
    pub const fn doubling() -> Self {
        Self {
            factor: DEFAULT_GROWTH_FACTOR,
        }
    }

    /// Growth multiplier
    #[inline]
    pub const fn factor(&self) -> usize {
        self.factor
    }

    /// Capacity to allocate when a stack of `current` slots is full
    ///
    /// # Errors
    /// Returns [`StackError::CapacityOverflow`] if the multiplication
    /// overflows `usize`.
    #[inline]
    pub fn next_capacity(&self, current: usize) -> StackResult<usize> {
        if current == 0 {
            return Ok(1);
        }
        current
            .checked_mul(self.factor)
            .ok_or_else(|| StackError::capacity_overflow(current))
    }

    /// Capacity reached after growing from `initial` until `required` fits
    ///
    /// Follows the same sequence `push` walks, so it predicts the capacity
    /// after `required` pushes into a stack that started at `initial`.
    ///
    /// # Errors
    /// Returns [`StackError::CapacityOverflow`] if the sequence overflows.
    pub fn capacity_for(&self, initial: usize, required: usize) -> StackResult<usize> {
        let mut capacity = initial;
        while capacity < required {
            capacity = self.next_capacity(capacity)?;
        }
        Ok(capacity)
    }

    pub(crate) fn validate(&self) -> StackResult<()> {
        Self::new(self.factor).map(|_| ())
    }
}
