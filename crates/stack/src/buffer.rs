//! Owned raw storage backing a stack
//!
//! # Safety
//!
//! `RawBuffer` owns zero or one block of `capacity` slots of `T`:
//! - The block comes from the buffer's own allocator and goes back to it
//!   exactly once, on drop or [`RawBuffer::release`]
//! - The buffer does not know which slots are initialized; the owning
//!   [`Stack`](crate::Stack) tracks the live prefix and drops it before the
//!   block is released
//! - Zero-capacity buffers and zero-sized `T` never touch the allocator and
//!   hold an aligned dangling pointer

use core::alloc::Layout;
use core::marker::PhantomData;
use core::ptr::{self, NonNull};

use crate::allocator::StackAllocator;
use crate::error::{StackError, StackResult};

pub(crate) struct RawBuffer<T, A: StackAllocator> {
    ptr: NonNull<T>,
    capacity: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

impl<T, A: StackAllocator> RawBuffer<T, A> {
    /// Empty buffer that owns no block
    #[inline]
    pub(crate) const fn new_in(alloc: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            alloc,
            _marker: PhantomData,
        }
    }

    /// Buffer owning a fresh block of `capacity` slots
    pub(crate) fn with_capacity_in(capacity: usize, alloc: A) -> StackResult<Self> {
        let ptr = Self::allocate_block(&alloc, capacity)?;
        Ok(Self {
            ptr,
            capacity,
            alloc,
            _marker: PhantomData,
        })
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Move the first `live` slots into a new block of `new_capacity` slots
    ///
    /// The new block is allocated before anything else happens, so on error
    /// the current block, its contents and `capacity` are untouched.
    ///
    /// # Safety
    /// - `live <= self.capacity()` and `live <= new_capacity`
    /// - Slots `[0, live)` are initialized
    pub(crate) unsafe fn relocate(&mut self, new_capacity: usize, live: usize) -> StackResult<()> {
        debug_assert!(live <= self.capacity && live <= new_capacity);

        let new_ptr = Self::allocate_block(&self.alloc, new_capacity)?;

        // SAFETY: both blocks hold at least `live` slots and are distinct
        // allocations (or dangling with zero-sized copies). Values are moved
        // bitwise, so the old slots become logically uninitialized.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), live);
            self.free_block();
        }

        self.ptr = new_ptr;
        self.capacity = new_capacity;
        Ok(())
    }

    /// Return the block to the allocator, leaving an empty buffer
    ///
    /// Callers must have dropped or moved out any live slots first.
    pub(crate) fn release(&mut self) {
        // SAFETY: ptr/capacity describe the block we own; it is forgotten
        // right after.
        unsafe { self.free_block() };
        self.ptr = NonNull::dangling();
        self.capacity = 0;
    }

    fn layout_for(capacity: usize) -> StackResult<Layout> {
        Layout::array::<T>(capacity).map_err(|_| StackError::capacity_overflow(capacity))
    }

    fn allocate_block(alloc: &A, capacity: usize) -> StackResult<NonNull<T>> {
        if capacity == 0 {
            return Ok(NonNull::dangling());
        }

        let layout = Self::layout_for(capacity)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }

        // SAFETY: layout is non-zero and valid; the block is owned by the
        // returned buffer and released with the same layout.
        let ptr = unsafe { alloc.allocate(layout)? };
        Ok(ptr.cast())
    }

    /// # Safety
    /// The block must not be used afterwards unless `ptr`/`capacity` are reset.
    unsafe fn free_block(&mut self) {
        if self.capacity == 0 {
            return;
        }
        let Ok(layout) = Self::layout_for(self.capacity) else {
            return;
        };
        if layout.size() == 0 {
            return;
        }

        // SAFETY: the block was allocated by `self.alloc` with this layout.
        unsafe { self.alloc.deallocate(self.ptr.cast(), layout) };
    }
}

impl<T, A: StackAllocator> Drop for RawBuffer<T, A> {
    fn drop(&mut self) {
        // SAFETY: the buffer is going away; nothing can observe ptr again.
        unsafe { self.free_block() };
    }
}

// SAFETY: RawBuffer uniquely owns its block, like Box<[T]>.
unsafe impl<T: Send, A: StackAllocator + Send> Send for RawBuffer<T, A> {}

// SAFETY: shared access only hands out shared pointers to T.
unsafe impl<T: Sync, A: StackAllocator + Sync> Sync for RawBuffer<T, A> {}
