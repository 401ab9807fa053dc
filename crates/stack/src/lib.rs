//! # nebula-stack
//!
//! Growable, exclusively-owned last-in-first-out stack for the Nebula
//! ecosystem.
//!
//! The stack owns one contiguous block of slots and manages it explicitly:
//! - Geometric growth (`max(1, capacity * factor)`) through a pluggable
//!   [`GrowthPolicy`]
//! - Deep copies staged in separate storage and adopted only on success
//! - Ownership transfer that leaves the source empty and reusable
//! - Allocation through a [`StackAllocator`] so exhaustion is an error value,
//!   not an abort
//!
//! ## Quick Start
//!
//! ```rust
//! use nebula_stack::prelude::*;
//!
//! let mut stack = Stack::with_capacity(2)?;
//! stack.push(1)?;
//! stack.push(2)?;
//! stack.push(3)?; // grows to 4 slots
//!
//! let mut copy = stack.clone();
//! copy.push(9)?;
//!
//! assert_eq!(*copy.top()?, 9);
//! assert_eq!(*stack.top()?, 3);
//!
//! let moved = stack.take();
//! assert_eq!(moved.count(), 3);
//! assert!(stack.is_empty());
//! # Ok::<(), StackError>(())
//! ```
//!
//! ## Failure guarantees
//!
//! Every fallible operation either completes or leaves the stack exactly as
//! it was:
//! - [`StackError::Empty`] from `top`/`pop` on an empty stack
//! - [`StackError::AllocationFailed`] / [`StackError::CapacityOverflow`]
//!   when storage cannot be provided
//! - [`StackError::ElementOperation`] when a [`TryClone`] element copy fails
//!
//! A panic inside `T::clone` unwinds with the same rollback.
//!
//! ## Features
//!
//! - `logging` (default): structured `tracing` events for growth and
//!   allocation failures
//!
//! ## Thread safety
//!
//! A stack has a single owner and no internal synchronization. It is `Send`
//! or `Sync` exactly when its elements and allocator are.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::perf)]
#![warn(clippy::pedantic)]
#![warn(rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
// #[must_use] on fns returning Self/Result documents intent even if type is already must_use
#![allow(clippy::double_must_use)]
#![allow(clippy::return_self_not_must_use)]

// Error types
pub mod error;

// Core modules
pub mod allocator;
mod buffer;
pub mod clone;
pub mod config;
pub mod growth;
pub mod stack;

// Re-export core types for convenience
pub use crate::allocator::{StackAllocator, SystemAllocator};
pub use crate::clone::TryClone;
pub use crate::config::StackConfig;
pub use crate::error::{StackError, StackResult};
pub use crate::growth::GrowthPolicy;
pub use crate::stack::Stack;

// Public API exports
pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    pub use crate::allocator::{StackAllocator, SystemAllocator};
    pub use crate::clone::TryClone;
    pub use crate::config::StackConfig;
    pub use crate::error::{StackError, StackResult};
    pub use crate::growth::GrowthPolicy;
    pub use crate::stack::Stack;
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
