//! Stack configuration

use crate::error::StackResult;
use crate::growth::GrowthPolicy;

/// Configuration for [`Stack`](crate::Stack) construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackConfig {
    /// Slots allocated up front (0 defers allocation to the first push)
    pub initial_capacity: usize,

    /// Growth policy applied when the stack is full
    pub growth: GrowthPolicy,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            growth: GrowthPolicy::doubling(),
        }
    }
}

impl StackConfig {
    /// Create a configuration with an initial capacity
    #[must_use]
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            ..Default::default()
        }
    }

    /// Production configuration - fewer reallocations on warm-up
    #[must_use]
    pub fn production() -> Self {
        Self {
            initial_capacity: 16,
            growth: GrowthPolicy::doubling(),
        }
    }

    /// Debug configuration - grows early and often
    #[must_use]
    pub fn debug() -> Self {
        Self {
            initial_capacity: 1,
            growth: GrowthPolicy::doubling(),
        }
    }

    /// Compact configuration - nothing allocated until first push
    #[must_use]
    pub fn compact() -> Self {
        Self::default()
    }

    /// Set the initial capacity
    #[must_use = "builder methods must be chained or built"]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the growth policy
    #[must_use = "builder methods must be chained or built"]
    pub fn with_growth(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    /// Set the growth factor
    ///
    /// # Errors
    /// Returns [`StackError::InvalidConfig`](crate::StackError::InvalidConfig)
    /// when `factor` is below 2.
    pub fn with_growth_factor(mut self, factor: usize) -> StackResult<Self> {
        self.growth = GrowthPolicy::new(factor)?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> StackResult<()> {
        self.growth.validate()
    }
}
