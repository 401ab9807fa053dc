//! Shared fixtures for nebula-stack integration tests
//!
//! - [`Tracked`]: element that counts live instances and can be told to fail
//!   its N-th copy, either by panicking (`Clone`) or by returning an error
//!   (`TryClone`)
//! - [`BudgetAllocator`]: allocator that refuses requests once its budget is
//!   spent and counts live blocks

#![allow(dead_code)]

use std::alloc::Layout;
use std::cell::Cell;
use std::ptr::NonNull;

use nebula_stack::{StackAllocator, StackError, StackResult, SystemAllocator, TryClone};

// ---------------------------------------------------------------------------
// Tracked element
// ---------------------------------------------------------------------------

thread_local! {
    static ALIVE: Cell<isize> = const { Cell::new(0) };
    static COPIES: Cell<usize> = const { Cell::new(0) };
    static FAIL_AT: Cell<usize> = const { Cell::new(0) };
}

/// Arm the copy counter: the `fail_at`-th copy from now fails (0 = never).
pub fn arm_copy_failure(fail_at: usize) {
    COPIES.with(|c| c.set(0));
    FAIL_AT.with(|f| f.set(fail_at));
}

pub fn disarm() {
    arm_copy_failure(0);
}

/// Live `Tracked` instances on this thread
pub fn alive() -> isize {
    ALIVE.with(Cell::get)
}

/// Copies attempted since the last `arm_copy_failure`
pub fn copies_attempted() -> usize {
    COPIES.with(Cell::get)
}

fn next_copy_fails() -> bool {
    let attempt = COPIES.with(|c| {
        let n = c.get() + 1;
        c.set(n);
        n
    });
    let fail_at = FAIL_AT.with(Cell::get);
    fail_at != 0 && attempt == fail_at
}

#[derive(Debug, thiserror::Error)]
#[error("copy #{attempt} refused")]
pub struct CopyRefused {
    pub attempt: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Tracked {
    pub value: i32,
}

impl Tracked {
    pub fn new(value: i32) -> Self {
        ALIVE.with(|a| a.set(a.get() + 1));
        Self { value }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        if next_copy_fails() {
            panic!("Tracked: copy #{} panics", copies_attempted());
        }
        Self::new(self.value)
    }
}

impl TryClone for Tracked {
    type Error = CopyRefused;

    fn try_clone(&self) -> Result<Self, Self::Error> {
        if next_copy_fails() {
            return Err(CopyRefused {
                attempt: copies_attempted(),
            });
        }
        Ok(Self::new(self.value))
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        ALIVE.with(|a| a.set(a.get() - 1));
    }
}

// ---------------------------------------------------------------------------
// Budgeted allocator
// ---------------------------------------------------------------------------

/// Allocator with an optional budget of successful allocations
#[derive(Debug, Default)]
pub struct BudgetAllocator {
    remaining: Cell<Option<usize>>,
    live_blocks: Cell<usize>,
    allocations: Cell<usize>,
}

impl BudgetAllocator {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_budget(allocations: usize) -> Self {
        let allocator = Self::default();
        allocator.set_budget(Some(allocations));
        allocator
    }

    pub fn set_budget(&self, allocations: Option<usize>) {
        self.remaining.set(allocations);
    }

    pub fn live_blocks(&self) -> usize {
        self.live_blocks.get()
    }

    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }
}

unsafe impl StackAllocator for BudgetAllocator {
    unsafe fn allocate(&self, layout: Layout) -> StackResult<NonNull<u8>> {
        if let Some(remaining) = self.remaining.get() {
            if remaining == 0 {
                return Err(StackError::allocation_failed_with_layout(layout));
            }
            self.remaining.set(Some(remaining - 1));
        }

        let ptr = unsafe { SystemAllocator.allocate(layout)? };
        self.live_blocks.set(self.live_blocks.get() + 1);
        self.allocations.set(self.allocations.get() + 1);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { SystemAllocator.deallocate(ptr, layout) };
        self.live_blocks.set(self.live_blocks.get() - 1);
    }
}

/// Values of the live elements, bottom first
pub fn values<A: StackAllocator>(stack: &nebula_stack::Stack<Tracked, A>) -> Vec<i32> {
    stack.as_slice().iter().map(|t| t.value).collect()
}
