//! Allocator seam for stack storage
//!
//! The stack never calls the global allocator directly. Every block it owns
//! is obtained from a [`StackAllocator`], which keeps allocation failures
//! observable as values and lets callers plug in bounded or instrumented
//! allocators.
//!
//! # Safety
//!
//! `StackAllocator` is an unsafe trait: implementors promise that
//! - a successful `allocate` returns a pointer valid for reads and writes of
//!   `layout.size()` bytes, aligned to `layout.align()`, and not aliased by any
//!   other live allocation
//! - `deallocate` accepts exactly the pointers and layouts it handed out
//! - zero-sized layouts return an aligned dangling pointer and are never freed

use core::alloc::{GlobalAlloc, Layout};
use core::ptr::NonNull;
use std::alloc::System;

use crate::error::{StackError, StackResult};

/// Raw block allocator used by [`Stack`](crate::Stack)
///
/// # Safety
///
/// See the module-level safety contract.
pub unsafe trait StackAllocator {
    /// Allocates an uninitialized block for `layout`
    ///
    /// # Safety
    /// - Returned memory is uninitialized and must be written before read
    /// - The block must be released with [`deallocate`](Self::deallocate)
    ///   using the same layout
    ///
    /// # Errors
    /// - Returns [`StackError::AllocationFailed`] if the block cannot be
    ///   provided
    unsafe fn allocate(&self, layout: Layout) -> StackResult<NonNull<u8>>;

    /// Releases a block previously returned by [`allocate`](Self::allocate)
    ///
    /// # Safety
    /// - `ptr` must have been allocated by this allocator with `layout`
    /// - `ptr` must not be used after this call
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// Wrapper for the system's default allocator
///
/// Zero-sized, so stacks using it carry no extra state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemAllocator;

impl SystemAllocator {
    /// Creates a new `SystemAllocator`
    #[inline]
    pub const fn new() -> Self {
        SystemAllocator
    }
}

unsafe impl StackAllocator for SystemAllocator {
    #[inline]
    unsafe fn allocate(&self, layout: Layout) -> StackResult<NonNull<u8>> {
        if layout.size() == 0 {
            return Ok(dangling_for(layout));
        }

        // SAFETY: layout has non-zero size (checked above).
        let ptr = unsafe { System.alloc(layout) };

        NonNull::new(ptr).ok_or_else(|| StackError::allocation_failed_with_layout(layout))
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() == 0 {
            return;
        }

        // SAFETY: caller guarantees ptr came from `allocate` with this layout.
        unsafe { System.dealloc(ptr.as_ptr(), layout) };
    }
}

// Blanket forwarding so a single instrumented allocator can back several
// stacks by reference.
unsafe impl<A: StackAllocator + ?Sized> StackAllocator for &A {
    #[inline]
    unsafe fn allocate(&self, layout: Layout) -> StackResult<NonNull<u8>> {
        // SAFETY: contract forwarded unchanged.
        unsafe { (**self).allocate(layout) }
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: contract forwarded unchanged.
        unsafe { (**self).deallocate(ptr, layout) }
    }
}

/// Well-aligned dangling pointer for zero-sized requests
#[inline]
pub(crate) fn dangling_for(layout: Layout) -> NonNull<u8> {
    // `align` is a non-zero power of two, so it is a valid non-null address.
    NonNull::new(core::ptr::without_provenance_mut(layout.align())).unwrap_or(NonNull::dangling())
}
