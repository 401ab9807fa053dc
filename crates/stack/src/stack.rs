//! Growable, exclusively-owned LIFO stack
//!
//! # Safety
//!
//! `Stack` keeps a single invariant over its [`RawBuffer`]:
//! slots `[0, len)` are initialized and `len <= capacity`. Every unsafe
//! block below either relies on it or restores it before returning.
//!
//! ## Failure guarantees
//!
//! - Growth allocates the new block before touching the old one, so a failed
//!   `push` leaves count, capacity and elements untouched
//! - Copies are staged into a separate stack and only adopted on success; a
//!   failing element copy (error or panic) drops the staged stack, which
//!   releases every element copied so far and its block
//! - Ownership transfer never allocates and never fails

use core::fmt;
use core::mem;
use core::ptr;

use crate::allocator::{StackAllocator, SystemAllocator};
use crate::buffer::RawBuffer;
use crate::clone::TryClone;
use crate::config::StackConfig;
use crate::error::{BoxedElementError, StackError, StackResult};
use crate::growth::GrowthPolicy;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

/// Contiguous, growable last-in-first-out stack
///
/// Owns its storage exclusively. A default-constructed or moved-from stack
/// has capacity 0 and allocates on the first push.
///
/// # Examples
///
/// ```
/// use nebula_stack::Stack;
///
/// let mut stack = Stack::with_capacity(2)?;
/// stack.push(1)?;
/// stack.push(2)?;
/// stack.push(3)?;
///
/// assert_eq!(stack.count(), 3);
/// assert_eq!(stack.size(), 4);
/// assert_eq!(stack.pop()?, 3);
/// assert_eq!(*stack.top()?, 2);
/// # Ok::<(), nebula_stack::StackError>(())
/// ```
pub struct Stack<T, A: StackAllocator = SystemAllocator> {
    buf: RawBuffer<T, A>,
    len: usize,
    growth: GrowthPolicy,
}

impl<T> Stack<T> {
    /// Empty stack with capacity 0
    #[inline]
    pub const fn new() -> Self {
        Self::new_in(SystemAllocator::new())
    }

    /// Stack with room for `capacity` elements (0 is promoted to 1)
    pub fn with_capacity(capacity: usize) -> StackResult<Self> {
        Self::with_capacity_in(capacity, SystemAllocator::new())
    }

    /// Stack built from a validated [`StackConfig`]
    pub fn with_config(config: StackConfig) -> StackResult<Self> {
        Self::with_config_in(config, SystemAllocator::new())
    }
}

impl<T, A: StackAllocator> Stack<T, A> {
    /// Empty stack backed by `alloc`
    #[inline]
    pub const fn new_in(alloc: A) -> Self {
        Self {
            buf: RawBuffer::new_in(alloc),
            len: 0,
            growth: GrowthPolicy::doubling(),
        }
    }

    /// Stack backed by `alloc` with room for `capacity` elements
    ///
    /// A requested capacity of 0 is treated as 1.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> StackResult<Self> {
        let capacity = capacity.max(1);

        #[cfg(feature = "logging")]
        debug!(capacity, "creating stack");

        Ok(Self {
            buf: RawBuffer::with_capacity_in(capacity, alloc)?,
            len: 0,
            growth: GrowthPolicy::doubling(),
        })
    }

    /// Stack backed by `alloc`, configured by `config`
    ///
    /// An initial capacity of 0 defers allocation to the first push.
    pub fn with_config_in(config: StackConfig, alloc: A) -> StackResult<Self> {
        config.validate()?;

        Ok(Self {
            buf: RawBuffer::with_capacity_in(config.initial_capacity, alloc)?,
            len: 0,
            growth: config.growth,
        })
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Number of live elements
    #[inline]
    pub fn count(&self) -> usize {
        self.len
    }

    /// Number of allocated slots
    #[inline]
    pub fn size(&self) -> usize {
        self.buf.capacity()
    }

    /// Alias of [`size`](Self::size)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Growth policy applied when the stack is full
    #[inline]
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.growth
    }

    #[inline]
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// Live elements, bottom first
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [0, len) is initialized; ptr is aligned and non-null even
        // when no block is owned.
        unsafe { core::slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    // ------------------------------------------------------------------
    // Top-of-stack access
    // ------------------------------------------------------------------

    /// Reference to the most recently pushed element
    pub fn top(&self) -> StackResult<&T> {
        self.as_slice().last().ok_or(StackError::empty("top"))
    }

    /// Mutable reference to the most recently pushed element
    pub fn top_mut(&mut self) -> StackResult<&mut T> {
        if self.len == 0 {
            return Err(StackError::empty("top"));
        }
        // SAFETY: len > 0, so slot len - 1 is initialized and uniquely
        // borrowed through &mut self.
        Ok(unsafe { &mut *self.buf.as_ptr().add(self.len - 1) })
    }

    /// Copy of the most recently pushed element
    pub fn top_cloned(&self) -> StackResult<T>
    where
        T: Clone,
    {
        self.top().cloned()
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Push `value` on top, growing the storage if it is full
    ///
    /// On error the stack is unchanged and `value` is dropped.
    pub fn push(&mut self, value: T) -> StackResult<()> {
        if self.len == self.buf.capacity() {
            self.grow()?;
        }

        // SAFETY: len < capacity after the check above; the slot is
        // uninitialized.
        unsafe { self.buf.as_ptr().add(self.len).write(value) };
        self.len += 1;
        Ok(())
    }

    /// Push a copy of `value`
    ///
    /// The copy is made before the stack is touched, so a panicking
    /// `clone` leaves it unchanged.
    pub fn push_cloned(&mut self, value: &T) -> StackResult<()>
    where
        T: Clone,
    {
        self.push(value.clone())
    }

    /// Push a fallible copy of `value`
    pub fn try_push_cloned(&mut self, value: &T) -> StackResult<()>
    where
        T: TryClone,
    {
        let copy = value
            .try_clone()
            .map_err(|err| StackError::element("copy", err))?;
        self.push(copy)
    }

    /// Remove and return the most recently pushed element
    pub fn pop(&mut self) -> StackResult<T> {
        if self.len == 0 {
            return Err(StackError::empty("pop"));
        }

        self.len -= 1;
        // SAFETY: slot len was initialized and is now outside the live
        // prefix, so it is read exactly once.
        Ok(unsafe { self.buf.as_ptr().add(self.len).read() })
    }

    /// Push every item of `iter`
    ///
    /// If a push fails, the items pushed by this call are dropped again and
    /// the error is returned. Capacity gained before the failure is kept.
    pub fn try_extend<I>(&mut self, iter: I) -> StackResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        let start = self.len;
        for item in iter {
            if let Err(err) = self.push(item) {
                self.truncate(start);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Drop all elements, keeping the allocated block
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Drop all elements and return the block to the allocator
    ///
    /// The stack stays usable with capacity 0.
    pub fn release(&mut self) {
        self.clear();
        self.buf.release();
    }

    fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let tail = self.len - len;
        // Shrink first so a panicking destructor cannot cause a double drop.
        self.len = len;
        // SAFETY: [len, len + tail) was initialized and is no longer live.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.buf.as_ptr().add(len),
                tail,
            ));
        }
    }

    fn grow(&mut self) -> StackResult<()> {
        let old_capacity = self.buf.capacity();
        let new_capacity = self.growth.next_capacity(old_capacity)?;

        // SAFETY: len == old_capacity <= new_capacity and [0, len) is live.
        unsafe { self.buf.relocate(new_capacity, self.len)? };

        #[cfg(feature = "logging")]
        trace!(
            from = old_capacity,
            to = new_capacity,
            count = self.len,
            "stack grew"
        );

        Ok(())
    }

    // ------------------------------------------------------------------
    // Ownership transfer
    // ------------------------------------------------------------------

    /// Move the contents out, leaving `self` empty with capacity 0
    ///
    /// The returned stack owns the block; `self` keeps a clone of the
    /// allocator and its growth policy and can be pushed to again.
    pub fn take(&mut self) -> Self
    where
        A: Clone,
    {
        let empty = Self {
            buf: RawBuffer::new_in(self.buf.allocator().clone()),
            len: 0,
            growth: self.growth,
        };
        mem::replace(self, empty)
    }

    /// Replace the contents of `self` with those of `source`
    ///
    /// `self`'s previous elements and block are released. `source` is left
    /// empty with capacity 0. Allocator and growth policy travel with the
    /// storage.
    pub fn move_from(&mut self, source: &mut Self) {
        mem::swap(self, source);
        source.release();
    }

    // ------------------------------------------------------------------
    // Copy protocol
    // ------------------------------------------------------------------

    /// Copy every element through `copy` into an independent stack
    ///
    /// The copy has the same capacity and growth policy as `self`. If
    /// `copy` fails or panics on any element, everything copied so far is
    /// dropped, the new block is released and `self` is untouched.
    pub fn try_clone_with<F, E>(&self, mut copy: F) -> StackResult<Self>
    where
        A: Clone,
        F: FnMut(&T) -> Result<T, E>,
        E: Into<BoxedElementError>,
    {
        #[cfg(feature = "logging")]
        debug!(
            count = self.len,
            capacity = self.buf.capacity(),
            "staging stack copy"
        );

        let mut staged = Self {
            buf: RawBuffer::with_capacity_in(self.buf.capacity(), self.buf.allocator().clone())?,
            len: 0,
            growth: self.growth,
        };

        for item in self.as_slice() {
            let value = copy(item).map_err(|err| StackError::element("copy", err))?;
            // SAFETY: staged has the source's capacity, which is at least
            // self.len > staged.len.
            unsafe { staged.buf.as_ptr().add(staged.len).write(value) };
            staged.len += 1;
        }

        Ok(staged)
    }

    /// Fallible deep copy
    pub fn try_clone(&self) -> StackResult<Self>
    where
        A: Clone,
        T: TryClone,
    {
        self.try_clone_with(TryClone::try_clone)
    }

    /// Overwrite `self` with a fallible deep copy of `source`
    ///
    /// On error `self` is exactly as it was before the call.
    pub fn try_clone_from(&mut self, source: &Self) -> StackResult<()>
    where
        A: Clone,
        T: TryClone,
    {
        let staged = source.try_clone()?;
        *self = staged;
        Ok(())
    }
}

impl<T, A: StackAllocator> Drop for Stack<T, A> {
    fn drop(&mut self) {
        // The buffer field releases the block afterwards.
        self.clear();
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies match the source's capacity.
///
/// # Panics
///
/// Panics if the allocator cannot provide the copy's block, like other
/// infallible collection clones. A panic inside `T::clone` propagates after
/// the partial copy has been released.
impl<T: Clone, A: StackAllocator + Clone> Clone for Stack<T, A> {
    fn clone(&self) -> Self {
        match self.try_clone_with(|item| Ok::<T, core::convert::Infallible>(item.clone())) {
            Ok(copy) => copy,
            Err(err) => storage_failed(&err),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        // Stage first: if cloning panics, self is untouched.
        let staged = source.clone();
        *self = staged;
    }
}

impl<T: TryClone, A: StackAllocator + Clone> TryClone for Stack<T, A> {
    type Error = StackError;

    fn try_clone(&self) -> Result<Self, Self::Error> {
        Stack::try_clone(self)
    }
}

#[cold]
#[inline(never)]
fn storage_failed(err: &StackError) -> ! {
    panic!("stack storage unavailable: {err}")
}

impl<T: fmt::Debug, A: StackAllocator> fmt::Debug for Stack<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("count", &self.len)
            .field("capacity", &self.buf.capacity())
            .field("elements", &self.as_slice())
            .finish()
    }
}

impl<T, A1, A2> PartialEq<Stack<T, A2>> for Stack<T, A1>
where
    T: PartialEq,
    A1: StackAllocator,
    A2: StackAllocator,
{
    fn eq(&self, other: &Stack<T, A2>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: StackAllocator> Eq for Stack<T, A> {}

impl<T, A: StackAllocator> Extend<T> for Stack<T, A> {
    /// # Panics
    ///
    /// Panics if growing the storage fails; use
    /// [`Stack::try_extend`] to handle that as an error.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        if let Err(err) = self.try_extend(iter) {
            storage_failed(&err);
        }
    }
}

impl<T> FromIterator<T> for Stack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut stack = Self::new();
        stack.extend(iter);
        stack
    }
}

impl<T> From<Vec<T>> for Stack<T> {
    /// The last element of the vector becomes the top.
    fn from(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }
}
