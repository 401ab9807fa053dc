//! Standalone error types for nebula-stack
//!
//! Uses thiserror for clean, idiomatic Rust error definitions.

use core::alloc::Layout;
use std::error::Error as StdError;

use thiserror::Error;

#[cfg(feature = "logging")]
use tracing::warn;

/// Boxed element error carried by [`StackError::ElementOperation`].
pub type BoxedElementError = Box<dyn StdError + Send + Sync + 'static>;

// ============================================================================
// Main Error Type
// ============================================================================

/// Stack operation errors
///
/// Every failing operation leaves the stack exactly as it was before the
/// call, so any of these can be observed and the call retried.
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StackError {
    // --- Access Errors ---
    #[error("cannot {operation} empty stack")]
    Empty { operation: &'static str },

    // --- Allocation Errors ---
    #[error("Stack allocation failed: {size} bytes with {align} byte alignment")]
    AllocationFailed { size: usize, align: usize },

    #[error("Capacity overflow: {requested} slots cannot be allocated")]
    CapacityOverflow { requested: usize },

    // --- Element Errors ---
    #[error("Element {operation} failed: {source}")]
    ElementOperation {
        operation: &'static str,
        #[source]
        source: BoxedElementError,
    },

    // --- Configuration Errors ---
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl StackError {
    /// Check if error is retryable
    ///
    /// All runtime failures roll the stack back, so only configuration errors
    /// are permanent.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidConfig { .. })
    }

    /// Check if the allocator could not satisfy the request
    #[must_use]
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(
            self,
            Self::AllocationFailed { .. } | Self::CapacityOverflow { .. }
        )
    }

    /// Check if this is an empty-stack access error
    #[must_use]
    pub fn is_empty_stack(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    /// Check if an element copy failed
    #[must_use]
    pub fn is_element_failure(&self) -> bool {
        matches!(self, Self::ElementOperation { .. })
    }

    /// Get error code for categorization
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty { .. } => "STACK:EMPTY",
            Self::AllocationFailed { .. } => "STACK:ALLOC:FAILED",
            Self::CapacityOverflow { .. } => "STACK:ALLOC:OVERFLOW",
            Self::ElementOperation { .. } => "STACK:ELEMENT:FAILED",
            Self::InvalidConfig { .. } => "STACK:CONFIG:INVALID",
        }
    }

    // ============================================================================
    // Convenience Constructors
    // ============================================================================

    /// Create empty stack error for the named operation
    pub fn empty(operation: &'static str) -> Self {
        Self::Empty { operation }
    }

    /// Create allocation failed error
    pub fn allocation_failed(size: usize, align: usize) -> Self {
        #[cfg(feature = "logging")]
        warn!(size, align, "stack allocation failed");

        Self::AllocationFailed { size, align }
    }

    /// Create allocation failed error from layout
    pub fn allocation_failed_with_layout(layout: Layout) -> Self {
        Self::allocation_failed(layout.size(), layout.align())
    }

    /// Create capacity overflow error
    pub fn capacity_overflow(requested: usize) -> Self {
        #[cfg(feature = "logging")]
        warn!(requested, "stack capacity overflow");

        Self::CapacityOverflow { requested }
    }

    /// Wrap an element error raised while performing `operation`
    pub fn element<E>(operation: &'static str, source: E) -> Self
    where
        E: Into<BoxedElementError>,
    {
        Self::ElementOperation {
            operation,
            source: source.into(),
        }
    }

    /// Create invalid config error
    pub fn invalid_config(reason: &str) -> Self {
        Self::InvalidConfig {
            reason: reason.to_string(),
        }
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Result type for stack operations
pub type StackResult<T> = core::result::Result<T, StackError>;

/// Generic result type alias
pub type Result<T> = StackResult<T>;
