//! A growable circular buffer used as a FIFO queue.
//!
//! Elements are pushed at the tail and popped from the head of a single
//! block of storage whose live region wraps around the block's physical end.
//! The block is only replaced when no free slot is left, so steady-state
//! queueing never shifts or reallocates. Single-element operations are
//! amortized `O(1)`, bulk operations are `O(k)` in the number of elements
//! moved.
//!
//! Besides the element-level queue operations, the buffer exposes its live
//! and free regions as pairs of slices (`data_views`, `free_views`) for
//! zero-copy bulk access.
//!
//! # Feature Flags
//! The **ringqueue** crate has the following cargo feature flags:
//!
//! - `std`
//!   - Optional, enabled by default
//!   - Use libstd
//!   - Implements `std::io::Read` and `std::io::Write` for `RingBuffer<u8>`
//!
//! Without `std` the crate is `no_std` and only needs `alloc`:
//!
//! ```toml
//! [dependencies]
//! ringqueue = { version = "0.1", default-features = false }
//! ```
//!
//! # Capacity
//!
//! `capacity()` reports the slot count of the current block, which may be
//! larger than what was requested if the allocator rounds up. How the block
//! grows is chosen with the `Growth` type parameter: `Doubling` (default)
//! or `Exact`.
//!
//! Only `Doubling` keeps `push` amortized `O(1)`. `Exact` sizes every new
//! block to fit, so each push into a full buffer reallocates and moves all
//! `len` elements.
//!
//! # Examples
//! ```
//! use ringqueue::RingBuffer;
//!
//! let mut queue = RingBuffer::new(4);
//!
//! queue.push(1);
//! queue.push_many(&[2, 3, 4]);
//! assert_eq!(queue.len(), 4);
//!
//! assert_eq!(queue.pop(), Some(1));
//! queue.push(5);
//!
//! assert_eq!(queue.data_views(), (&[2, 3, 4][..], &[5][..]));
//! assert_eq!(queue.pop_many(10), vec![2, 3, 4, 5]);
//! assert_eq!(queue.pop(), None);
//! ```
//!
//! # Manual views
//! ```
//! use ringqueue::RingBuffer;
//!
//! let mut queue: RingBuffer<u32> = RingBuffer::new(0);
//!
//! queue.ensure_free_space(3);
//! let (first, second) = queue.free_views();
//! for (slot, value) in first.iter_mut().chain(second.iter_mut()).zip(0..3) {
//!     slot.write(value);
//! }
//! unsafe { queue.advance_write(3) };
//!
//! assert_eq!(queue, vec![0, 1, 2]);
//! assert_eq!(queue.advance_read(2), 2);
//! assert_eq!(queue, vec![2]);
//! ```
//!
//! # Thread safety
//!
//! `RingBuffer` has no internal synchronization. Every mutation takes
//! `&mut self`, so sharing one between threads requires an external lock.

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(missing_docs)]

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cmp;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::mem::{self, MaybeUninit};
use core::ops::{Index, IndexMut};
use core::ptr;

use tracing::trace;

pub use odds::IndexRange as RangeArgument;

pub mod error;
mod growth;
mod iter;
mod stream;
mod utils;

pub use error::EndOfData;
pub use growth::{Doubling, Exact, Growth};
pub use iter::{IntoIter, Iter, IterMut};

use utils::{assume_init, assume_init_mut, ring_slices, ring_slices_mut, wrap_add};

/// Allocates a block of at least `slots` uninitialized slots, keeping any
/// extra room the allocator hands back.
fn allocate<T>(slots: usize) -> Box<[MaybeUninit<T>]> {
    let mut block: Vec<MaybeUninit<T>> = Vec::with_capacity(slots);
    let usable = if mem::size_of::<T>() == 0 {
        slots
    } else {
        block.capacity()
    };
    block.resize_with(usable, MaybeUninit::uninit);
    block.into_boxed_slice()
}

/// A growable ring buffer.
///
/// The buffer is a queue: `push` and `push_many` add to the back,
/// `pop`, `pop_many` and `pop_many_into` remove from the front, and
/// iterating goes front to back.
///
/// Storage grows when a write does not fit into the free region; it never
/// shrinks except through `release`.
///
/// # Views
///
/// `data_views`, `data_views_mut` and `free_views` borrow the buffer. No
/// mutating operation can be called while a view is alive, and a view
/// reflects the buffer as it was when the view was taken.
pub struct RingBuffer<T, G: Growth = Doubling> {
    buf: Box<[MaybeUninit<T>]>,
    len: usize,
    read: usize,
    write: usize,
    growth: PhantomData<G>,
}

impl<T, G: Growth> Drop for RingBuffer<T, G> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, G: Growth> Default for RingBuffer<T, G> {
    #[inline]
    fn default() -> Self {
        RingBuffer::with_growth(0)
    }
}

impl<T: Clone, G: Growth> Clone for RingBuffer<T, G> {
    /// Clones the live elements into a block sized to `len()`.
    fn clone(&self) -> Self {
        let mut copy = RingBuffer::with_growth(self.len);
        let (first, second) = self.data_views();
        copy.push_many(first);
        copy.push_many(second);
        copy
    }
}

// Internal bookkeeping.
impl<T, G: Growth> RingBuffer<T, G> {
    #[inline]
    fn wrap_add(&self, index: usize, addend: usize) -> usize {
        wrap_add(index, addend, self.capacity())
    }

    /// Moves the element out of physical slot `off`.
    #[inline]
    unsafe fn buffer_read(&mut self, off: usize) -> T {
        debug_assert!(off < self.capacity());
        self.buf.get_unchecked(off).assume_init_read()
    }

    /// Writes an element into physical slot `off` without dropping what
    /// was there.
    #[inline]
    unsafe fn buffer_write(&mut self, off: usize, value: T) {
        debug_assert!(off < self.capacity());
        self.buf.get_unchecked_mut(off).write(value);
    }

    /// Drops `len` elements starting at physical slot `start`.
    ///
    /// The slots must already be outside the live region, so a panicking
    /// destructor leaks the rest instead of dropping anything twice.
    unsafe fn drop_run(&mut self, start: usize, len: usize) {
        let (first, second) = ring_slices_mut(&mut self.buf, start, len);
        ptr::drop_in_place(assume_init_mut(first));
        ptr::drop_in_place(assume_init_mut(second));
    }

    /// Unlinks up to `n` front elements from the live region and returns
    /// the physical start and length of the unlinked run.
    #[inline]
    fn unlink_front(&mut self, n: usize) -> (usize, usize) {
        let n = cmp::min(n, self.len);
        let start = self.read;
        self.read = self.wrap_add(start, n);
        self.len -= n;
        (start, n)
    }
}

impl<T> RingBuffer<T> {
    /// Creates an empty buffer with room for at least `capacity` elements,
    /// growing by doubling.
    ///
    /// A capacity of 0 allocates nothing until the first write.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringqueue::RingBuffer;
    ///
    /// let queue: RingBuffer<u8> = RingBuffer::new(16);
    /// assert!(queue.capacity() >= 16);
    /// assert_eq!(queue.len(), 0);
    /// ```
    #[inline]
    pub fn new(capacity: usize) -> Self {
        RingBuffer::with_growth(capacity)
    }
}

impl<T, G: Growth> RingBuffer<T, G> {
    /// Creates an empty buffer with room for at least `capacity` elements,
    /// growing according to `G`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringqueue::{Exact, RingBuffer};
    ///
    /// let mut queue: RingBuffer<u8, Exact> = RingBuffer::with_growth(0);
    /// queue.push(1);
    /// assert_eq!(queue.capacity(), 1);
    /// ```
    pub fn with_growth(capacity: usize) -> Self {
        RingBuffer {
            buf: allocate(capacity),
            len: 0,
            read: 0,
            write: 0,
            growth: PhantomData,
        }
    }

    /// Returns the number of elements in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of slots in the current storage block.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns the number of slots that can be written without growing.
    #[inline]
    pub fn free_len(&self) -> usize {
        self.capacity() - self.len
    }

    /// Returns true if the buffer contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the buffer holds elements and every slot is taken.
    ///
    /// An empty buffer is never full, even with zero capacity. A full
    /// buffer still accepts writes; the next one grows the storage.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len != 0 && self.len == self.capacity()
    }

    /// Removes every element, keeping the storage block.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringqueue::RingBuffer;
    ///
    /// let mut queue = RingBuffer::new(4);
    /// queue.push_many(&[1, 2, 3]);
    /// queue.clear();
    /// assert!(queue.is_empty());
    /// assert_eq!(queue.capacity(), 4);
    /// ```
    pub fn clear(&mut self) {
        let (start, len) = (self.read, self.len);
        self.len = 0;
        self.read = 0;
        self.write = 0;
        unsafe { self.drop_run(start, len) }
    }

    /// Removes every element and frees the storage block.
    ///
    /// Afterwards the buffer is equivalent to `RingBuffer::with_growth(0)`.
    /// Calling it again is harmless.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringqueue::RingBuffer;
    ///
    /// let mut queue = RingBuffer::new(4);
    /// queue.push(1);
    /// queue.release();
    /// assert_eq!(queue.capacity(), 0);
    /// assert_eq!(queue.len(), 0);
    /// ```
    pub fn release(&mut self) {
        self.clear();
        let freed = self.capacity();
        self.buf = allocate(0);
        trace!(freed_capacity = freed, "released ring buffer storage");
    }

    /// Returns the live region as two slices which, concatenated, hold the
    /// elements front to back.
    ///
    /// The first slice runs from the front up to the physical end of
    /// storage, the second holds whatever wrapped around to the start.
    /// Either may be empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringqueue::RingBuffer;
    ///
    /// let mut queue = RingBuffer::new(3);
    /// queue.push_many(&[0, 1, 2]);
    /// assert_eq!(queue.data_views(), (&[0, 1, 2][..], &[][..]));
    ///
    /// queue.pop();
    /// queue.push(3);
    /// assert_eq!(queue.data_views(), (&[1, 2][..], &[3][..]));
    /// ```
    #[inline]
    pub fn data_views(&self) -> (&[T], &[T]) {
        let (first, second) = ring_slices(&self.buf, self.read, self.len);
        unsafe { (assume_init(first), assume_init(second)) }
    }

    /// Mutable version of `data_views`.
    #[inline]
    pub fn data_views_mut(&mut self) -> (&mut [T], &mut [T]) {
        let (first, second) = ring_slices_mut(&mut self.buf, self.read, self.len);
        unsafe { (assume_init_mut(first), assume_init_mut(second)) }
    }

    /// Returns the free region as two slices of uninitialized slots,
    /// starting at the slot the next write goes to.
    ///
    /// Slots initialized here become part of the queue through
    /// `advance_write`. Anything written without a matching
    /// `advance_write` is ignored and never dropped.
    #[inline]
    pub fn free_views(&mut self) -> (&mut [MaybeUninit<T>], &mut [MaybeUninit<T>]) {
        let free = self.free_len();
        ring_slices_mut(&mut self.buf, self.write, free)
    }

    /// Returns the elements in the logical `range` as two slices, split the
    /// same way as `data_views`.
    ///
    /// # Panics
    ///
    /// Panics if the start of the range is greater than its end or if the
    /// end is greater than `len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringqueue::RingBuffer;
    ///
    /// let mut queue = RingBuffer::new(4);
    /// queue.push_many(&[0, 1, 2, 3]);
    /// queue.pop();
    /// queue.push(4);
    /// assert_eq!(queue.range_views(1..4), (&[2, 3][..], &[4][..]));
    /// assert_eq!(queue.range_views(..2), (&[1, 2][..], &[][..]));
    /// ```
    pub fn range_views<R>(&self, range: R) -> (&[T], &[T])
    where
        R: RangeArgument<usize>,
    {
        let start = range.start().unwrap_or(0);
        let end = range.end().unwrap_or(self.len);
        assert!(start <= end, "range_views lower bound was too large");
        assert!(end <= self.len, "range_views upper bound was too large");

        let (first, second) = ring_slices(&self.buf, self.wrap_add(self.read, start), end - start);
        unsafe { (assume_init(first), assume_init(second)) }
    }

    /// Makes sure at least `additional` elements can be written without
    /// another reallocation.
    ///
    /// If the free region is too small, a new block is allocated with the
    /// size chosen by `G`, the elements are moved to its start in logical
    /// order and the old block is freed.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringqueue::RingBuffer;
    ///
    /// let mut queue = RingBuffer::new(2);
    /// queue.push_many(&[1, 2]);
    /// queue.ensure_free_space(5);
    /// assert!(queue.free_len() >= 5);
    /// assert_eq!(queue, vec![1, 2]);
    /// ```
    pub fn ensure_free_space(&mut self, additional: usize) {
        if self.free_len() >= additional {
            return;
        }
        let old_capacity = self.capacity();
        let mut block = allocate::<T>(G::grow(self.len, additional, old_capacity));
        debug_assert!(block.len() - self.len >= additional);

        let (first, second) = ring_slices(&self.buf, self.read, self.len);
        unsafe {
            let dst = block.as_mut_ptr();
            ptr::copy_nonoverlapping(first.as_ptr(), dst, first.len());
            ptr::copy_nonoverlapping(second.as_ptr(), dst.add(first.len()), second.len());
        }
        // The old slots were moved out bitwise; dropping a block of
        // `MaybeUninit` runs no destructors.
        self.buf = block;
        self.read = 0;
        self.write = self.len;

        trace!(
            len = self.len,
            old_capacity,
            new_capacity = self.capacity(),
            requested = additional,
            "grew ring buffer storage"
        );
    }

    /// Marks `n` slots at the start of the free region as written.
    ///
    /// Grows the storage first if fewer than `n` slots are free.
    ///
    /// # Safety
    ///
    /// The first `n` slots of the free region must be initialized. The
    /// intended sequence is `ensure_free_space(n)`, writing through
    /// `free_views()`, then `advance_write(n)`; if this call has to grow the
    /// storage itself, the claimed slots cannot have been initialized.
    pub unsafe fn advance_write(&mut self, n: usize) {
        self.ensure_free_space(n);
        self.write = self.wrap_add(self.write, n);
        self.len += n;
    }

    /// Drops up to `n` elements from the front and returns how many were
    /// removed.
    ///
    /// Meant to acknowledge elements consumed through `data_views`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringqueue::RingBuffer;
    ///
    /// let mut queue = RingBuffer::new(4);
    /// queue.push_many(&[1, 2, 3]);
    /// assert_eq!(queue.advance_read(2), 2);
    /// assert_eq!(queue.advance_read(5), 1);
    /// assert!(queue.is_empty());
    /// ```
    pub fn advance_read(&mut self, n: usize) -> usize {
        let (start, n) = self.unlink_front(n);
        unsafe { self.drop_run(start, n) };
        n
    }

    /// Appends an element to the back of the buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringqueue::RingBuffer;
    ///
    /// let mut queue = RingBuffer::new(0);
    /// queue.push(1);
    /// queue.push(2);
    /// assert_eq!(queue.len(), 2);
    /// ```
    pub fn push(&mut self, value: T) {
        self.ensure_free_space(1);
        let write = self.write;
        unsafe { self.buffer_write(write, value) };
        self.write = self.wrap_add(write, 1);
        self.len += 1;
    }

    /// Appends clones of `values` to the back of the buffer, growing it at
    /// most once.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringqueue::RingBuffer;
    ///
    /// let mut queue = RingBuffer::new(2);
    /// queue.push_many(&[1, 2, 3]);
    /// assert_eq!(queue, vec![1, 2, 3]);
    /// ```
    pub fn push_many(&mut self, values: &[T])
    where
        T: Clone,
    {
        let n = values.len();
        self.ensure_free_space(n);

        let (first, second) = self.free_views();
        let (head, rest) = values.split_at(cmp::min(first.len(), n));
        for (slot, value) in first.iter_mut().zip(head) {
            slot.write(value.clone());
        }
        for (slot, value) in second.iter_mut().zip(rest) {
            slot.write(value.clone());
        }

        self.write = self.wrap_add(self.write, n);
        self.len += n;
    }

    /// Removes the front element and returns it, or `None` if the buffer is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringqueue::RingBuffer;
    ///
    /// let mut queue = RingBuffer::new(2);
    /// queue.push(1);
    /// assert_eq!(queue.pop(), Some(1));
    /// assert_eq!(queue.pop(), None);
    /// ```
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let (read, _) = self.unlink_front(1);
        unsafe { Some(self.buffer_read(read)) }
    }

    /// Removes up to `n` elements from the front and returns them in order.
    ///
    /// Returns fewer than `n` elements, possibly none, if the buffer is
    /// shorter; the buffer is empty afterwards in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringqueue::RingBuffer;
    ///
    /// let mut queue = RingBuffer::new(4);
    /// queue.push_many(&[1, 2, 3]);
    /// assert_eq!(queue.pop_many(2), vec![1, 2]);
    /// assert_eq!(queue.pop_many(2), vec![3]);
    /// assert!(queue.pop_many(2).is_empty());
    /// ```
    pub fn pop_many(&mut self, n: usize) -> Vec<T> {
        let (start, n) = self.unlink_front(n);
        let mut popped = Vec::with_capacity(n);

        let (first, second) = ring_slices(&self.buf, start, n);
        unsafe {
            let dst = popped.as_mut_ptr();
            ptr::copy_nonoverlapping(first.as_ptr() as *const T, dst, first.len());
            ptr::copy_nonoverlapping(second.as_ptr() as *const T, dst.add(first.len()), second.len());
            popped.set_len(n);
        }
        popped
    }

    /// Moves up to `n` front elements into the start of `dest` and returns
    /// how many were moved.
    ///
    /// The count is the smallest of `n`, `dest.len()` and `len()`. Values
    /// previously held by the overwritten part of `dest` are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringqueue::RingBuffer;
    ///
    /// let mut queue = RingBuffer::new(4);
    /// queue.push_many(&[1, 2, 3]);
    ///
    /// let mut dest = [0; 2];
    /// assert_eq!(queue.pop_many_into(&mut dest, 5), 2);
    /// assert_eq!(dest, [1, 2]);
    /// assert_eq!(queue, vec![3]);
    /// ```
    pub fn pop_many_into(&mut self, dest: &mut [T], n: usize) -> usize {
        let (start, n) = self.unlink_front(cmp::min(n, dest.len()));

        let (first, second) = ring_slices(&self.buf, start, n);
        for (place, slot) in dest.iter_mut().zip(first.iter().chain(second)) {
            *place = unsafe { slot.assume_init_read() };
        }
        n
    }

    /// Returns a reference to the element at logical `index`, where 0 is
    /// the front.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringqueue::RingBuffer;
    ///
    /// let mut queue = RingBuffer::new(4);
    /// queue.push_many(&[3, 4, 5]);
    /// assert_eq!(queue.get(1), Some(&4));
    /// assert_eq!(queue.get(3), None);
    /// ```
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            let idx = self.wrap_add(self.read, index);
            unsafe { Some(self.buf.get_unchecked(idx).assume_init_ref()) }
        } else {
            None
        }
    }

    /// Returns a mutable reference to the element at logical `index`.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len {
            let idx = self.wrap_add(self.read, index);
            unsafe { Some(self.buf.get_unchecked_mut(idx).assume_init_mut()) }
        } else {
            None
        }
    }

    /// Returns the element `pop` would return next, without removing it.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns the most recently pushed element.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        match self.len {
            0 => None,
            len => self.get(len - 1),
        }
    }

    /// Returns `true` if the buffer contains an element equal to `x`.
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq,
    {
        let (a, b) = self.data_views();
        a.contains(x) || b.contains(x)
    }

    /// Returns a front-to-back iterator.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        let (first, second) = self.data_views();
        Iter::new(first, second)
    }

    /// Returns a front-to-back iterator that returns mutable references.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let (first, second) = self.data_views_mut();
        IterMut::new(first, second)
    }
}

impl<T, G: Growth, H: Growth> PartialEq<RingBuffer<T, H>> for RingBuffer<T, G>
where
    T: PartialEq,
{
    fn eq(&self, other: &RingBuffer<T, H>) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let (sa, sb) = self.data_views();
        let (oa, ob) = other.data_views();
        if sa.len() == oa.len() {
            sa == oa && sb == ob
        } else if sa.len() < oa.len() {
            // Always divisible in three sections, for example:
            // self:  [a b c|d e f]
            // other: [0 1 2 3|4 5]
            // front = 3, mid = 1,
            // [a b c] == [0 1 2] && [d] == [3] && [e f] == [4 5]
            let front = sa.len();
            let mid = oa.len() - front;

            let (oa_front, oa_mid) = oa.split_at(front);
            let (sb_mid, sb_back) = sb.split_at(mid);
            sa == oa_front && sb_mid == oa_mid && sb_back == ob
        } else {
            let front = oa.len();
            let mid = sa.len() - front;

            let (sa_front, sa_mid) = sa.split_at(front);
            let (ob_mid, ob_back) = ob.split_at(mid);
            sa_front == oa && sa_mid == ob_mid && sb == ob_back
        }
    }
}

impl<T: Eq, G: Growth> Eq for RingBuffer<T, G> {}

impl<T, G: Growth> PartialEq<[T]> for RingBuffer<T, G>
where
    T: PartialEq,
{
    fn eq(&self, other: &[T]) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let (a, b) = self.data_views();
        let (oa, ob) = other.split_at(a.len());
        a == oa && b == ob
    }
}

impl<'a, T, G: Growth> PartialEq<&'a [T]> for RingBuffer<T, G>
where
    T: PartialEq,
{
    #[inline]
    fn eq(&self, other: &&'a [T]) -> bool {
        *self == **other
    }
}

impl<T, G: Growth> PartialEq<Vec<T>> for RingBuffer<T, G>
where
    T: PartialEq,
{
    #[inline]
    fn eq(&self, other: &Vec<T>) -> bool {
        *self == other[..]
    }
}

impl<T: PartialOrd, G: Growth> PartialOrd for RingBuffer<T, G> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, G: Growth> Ord for RingBuffer<T, G> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash, G: Growth> Hash for RingBuffer<T, G> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        // Per element: `hash_slice` over two halves is not layout-independent
        // for every hasher.
        self.iter().for_each(|elem| elem.hash(state));
    }
}

impl<T, G: Growth> Index<usize> for RingBuffer<T, G> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        let len = self.len();
        match self.get(index) {
            Some(value) => value,
            None => panic!(
                "index out of bounds: the len is {} but the index is {}",
                len, index
            ),
        }
    }
}

impl<T, G: Growth> IndexMut<usize> for RingBuffer<T, G> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!(
                "index out of bounds: the len is {} but the index is {}",
                len, index
            ),
        }
    }
}

impl<T, G: Growth> FromIterator<T> for RingBuffer<T, G> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut buffer = RingBuffer::with_growth(0);
        buffer.extend(iter);
        buffer
    }
}

impl<T, G: Growth> From<Vec<T>> for RingBuffer<T, G> {
    /// Moves the elements of `values` into a block sized to fit them.
    fn from(values: Vec<T>) -> Self {
        let mut buffer = RingBuffer::with_growth(values.len());
        buffer.extend(values);
        buffer
    }
}

impl<T, G: Growth> Extend<T> for RingBuffer<T, G> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.ensure_free_space(iter.size_hint().0);
        for elt in iter {
            self.push(elt);
        }
    }
}

impl<'a, T: Copy + 'a, G: Growth> Extend<&'a T> for RingBuffer<T, G> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, G: Growth> IntoIterator for RingBuffer<T, G> {
    type Item = T;
    type IntoIter = IntoIter<T, G>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T, G: Growth> IntoIterator for &'a RingBuffer<T, G> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, G: Growth> IntoIterator for &'a mut RingBuffer<T, G> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: fmt::Debug, G: Growth> fmt::Debug for RingBuffer<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::hash_map::DefaultHasher;
    use std::rc::Rc;

    struct DropCounter {
        drops: Rc<Cell<usize>>,
    }

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    fn counters(drops: &Rc<Cell<usize>>, n: usize) -> Vec<DropCounter> {
        (0..n)
            .map(|_| DropCounter {
                drops: drops.clone(),
            })
            .collect()
    }

    fn contents<T: Clone, G: Growth>(buf: &RingBuffer<T, G>) -> Vec<T> {
        let (a, b) = buf.data_views();
        let mut all = a.to_vec();
        all.extend_from_slice(b);
        all
    }

    #[test]
    fn new_allocates_requested_capacity() {
        let buf: RingBuffer<u32> = RingBuffer::new(4);
        assert_eq!(buf.capacity(), 4);
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
        assert_eq!(buf.data_views(), (&[][..], &[][..]));
    }

    #[test]
    fn zero_capacity_allocates_on_first_push() {
        let mut buf = RingBuffer::new(0);
        assert_eq!(buf.capacity(), 0);
        assert!(!buf.is_full());
        buf.push(7);
        assert!(buf.capacity() >= 1);
        assert_eq!(buf, vec![7]);
    }

    #[test]
    fn is_full_needs_elements() {
        let mut buf: RingBuffer<i32> = RingBuffer::new(0);
        assert!(!buf.is_full());

        buf.ensure_free_space(2);
        let cap = buf.capacity();
        assert!(!buf.is_full());
        buf.extend(0..cap as i32);
        assert!(buf.is_full());

        buf.pop();
        assert!(!buf.is_full());
        buf.release();
        assert_eq!(buf.capacity(), 0);
        assert!(!buf.is_full());
    }

    #[test]
    fn full_then_wrap() {
        let mut buf = RingBuffer::new(4);
        for i in 1..=4 {
            buf.push(i);
        }
        assert!(buf.is_full());
        assert_eq!(buf.pop(), Some(1));

        buf.push(5);
        assert_eq!(buf.capacity(), 4);
        assert_eq!(buf.data_views(), (&[2, 3, 4][..], &[5][..]));

        assert_eq!(buf.pop_many(10), vec![2, 3, 4, 5]);
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn wrap_cycles_keep_order() {
        let mut buf = RingBuffer::new(4);
        buf.push_many(&[1, 2, 3, 4]);
        assert_eq!(buf.pop_many(2), vec![1, 2]);
        buf.push_many(&[5, 6]);
        assert_eq!(buf.capacity(), 4);
        assert_eq!(buf.data_views(), (&[3, 4][..], &[5, 6][..]));
        assert_eq!(buf.pop_many(4), vec![3, 4, 5, 6]);

        buf.push_many(&[7, 8, 9]);
        assert_eq!(buf.data_views(), (&[7, 8][..], &[9][..]));
        assert_eq!(contents(&buf), vec![7, 8, 9]);
    }

    #[test]
    fn empty_reads() {
        let mut buf: RingBuffer<i32> = RingBuffer::new(0);
        assert!(buf.pop_many(5).is_empty());
        assert_eq!(buf.pop(), None);
        assert_eq!(buf.advance_read(3), 0);
        let mut dest = [0; 3];
        assert_eq!(buf.pop_many_into(&mut dest, 3), 0);
    }

    #[test]
    fn growth_unwraps_into_new_block() {
        let mut buf = RingBuffer::new(4);
        buf.push_many(&[1, 2, 3, 4]);
        buf.pop_many(2);
        buf.push_many(&[5, 6]);
        assert_eq!(buf.data_views().1, &[5, 6]);

        buf.push(7);
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.data_views(), (&[3, 4, 5, 6, 7][..], &[][..]));
        assert_eq!(buf.pop(), Some(3));
    }

    #[test]
    fn growth_leaves_requested_space() {
        let mut buf = RingBuffer::new(3);
        buf.push_many(&[1, 2, 3]);
        buf.pop();
        buf.push(4);
        buf.ensure_free_space(10);
        assert!(buf.free_len() >= 10);
        assert_eq!(buf, vec![2, 3, 4]);
    }

    #[test]
    fn ensure_free_space_without_need_keeps_layout() {
        let mut buf = RingBuffer::new(4);
        buf.push_many(&[1, 2, 3]);
        buf.pop();
        buf.ensure_free_space(2);
        assert_eq!(buf.capacity(), 4);
        assert_eq!(buf.data_views(), (&[2, 3][..], &[][..]));
    }

    #[test]
    fn exact_growth_fits() {
        let mut buf: RingBuffer<u8, Exact> = RingBuffer::with_growth(0);
        buf.push(1);
        assert_eq!(buf.capacity(), 1);
        buf.push(2);
        assert_eq!(buf.capacity(), 2);
        buf.push_many(&[3, 4, 5]);
        assert_eq!(buf.capacity(), 5);
        assert_eq!(buf, vec![1, 2, 3, 4, 5]);
    }

    fn regrowths<G: Growth>(pushes: u32) -> usize {
        let mut buf: RingBuffer<u32, G> = RingBuffer::with_growth(0);
        let mut count = 0;
        for i in 0..pushes {
            let before = buf.capacity();
            buf.push(i);
            if buf.capacity() != before {
                count += 1;
            }
        }
        count
    }

    #[test]
    fn exact_growth_reallocates_every_push() {
        assert_eq!(regrowths::<Exact>(100), 100);
        // 4, 8, 16, 32, 64, 128
        assert_eq!(regrowths::<Doubling>(100), 6);
    }

    #[test]
    fn push_many_fills_both_free_views() {
        let mut buf = RingBuffer::new(5);
        buf.push_many(&[0, 0, 0, 0]);
        buf.pop_many(3);
        buf.push_many(&[1, 2, 3, 4]);
        assert_eq!(buf.capacity(), 5);
        assert_eq!(buf.data_views(), (&[0, 1][..], &[2, 3, 4][..]));
    }

    #[test]
    fn push_many_empty_slice() {
        let mut buf: RingBuffer<i32> = RingBuffer::new(0);
        buf.push_many(&[]);
        assert_eq!(buf.capacity(), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn free_views_cover_free_region() {
        let mut buf = RingBuffer::new(4);
        buf.push_many(&[1, 2, 3]);
        buf.pop_many(2);
        let (first, second) = buf.free_views();
        assert_eq!((first.len(), second.len()), (1, 2));
    }

    #[test]
    fn manual_write_protocol() {
        let mut buf = RingBuffer::new(4);
        buf.push_many(&[1, 2]);
        buf.pop();

        buf.ensure_free_space(3);
        let (first, second) = buf.free_views();
        assert_eq!((first.len(), second.len()), (2, 1));
        for (slot, value) in first.iter_mut().chain(second.iter_mut()).zip(10..) {
            slot.write(value);
        }
        unsafe { buf.advance_write(3) };

        assert!(buf.is_full());
        assert_eq!(buf, vec![2, 10, 11, 12]);
    }

    #[test]
    fn advance_read_clamps() {
        let mut buf = RingBuffer::new(4);
        buf.push_many(&[1, 2, 3]);
        assert_eq!(buf.advance_read(1), 1);
        assert_eq!(buf.front(), Some(&2));
        assert_eq!(buf.advance_read(10), 2);
        assert!(buf.is_empty());
    }

    #[test]
    fn pop_many_into_clamps_to_destination() {
        let mut buf = RingBuffer::new(4);
        buf.push_many(&[1, 2, 3, 4]);
        buf.pop();
        buf.push(5);

        let mut dest = [0; 3];
        assert_eq!(buf.pop_many_into(&mut dest, 10), 3);
        assert_eq!(dest, [2, 3, 4]);
        assert_eq!(buf.pop_many_into(&mut dest, 0), 0);
        assert_eq!(buf.pop_many_into(&mut dest, 10), 1);
        assert_eq!(dest, [5, 3, 4]);
        assert!(buf.is_empty());
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buf = RingBuffer::new(4);
        buf.push_many(&[1, 2, 3]);
        buf.pop();
        buf.clear();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 4);

        buf.push_many(&[7, 8, 9, 10]);
        assert_eq!(buf.capacity(), 4);
        assert_eq!(buf.data_views(), (&[7, 8, 9, 10][..], &[][..]));
    }

    #[test]
    fn release_frees_storage() {
        let mut buf = RingBuffer::new(4);
        buf.push_many(&[1, 2, 3]);
        buf.release();
        assert_eq!(buf.capacity(), 0);
        assert_eq!(buf.len(), 0);
        buf.release();
        assert_eq!(buf.capacity(), 0);

        buf.push(4);
        assert_eq!(buf, vec![4]);
    }

    #[test]
    fn clone_is_sized_to_len_and_independent() {
        let mut buf = RingBuffer::new(8);
        buf.push_many(&[1, 2, 3, 4]);
        buf.pop();

        let mut copy = buf.clone();
        assert_eq!(copy.capacity(), 3);
        assert_eq!(copy, buf);

        copy.push(5);
        copy.pop();
        buf.push(6);
        assert_eq!(buf, vec![2, 3, 4, 6]);
        assert_eq!(copy, vec![3, 4, 5]);
    }

    #[test]
    fn clone_of_empty() {
        let buf: RingBuffer<i32> = RingBuffer::new(8);
        let copy = buf.clone();
        assert_eq!(copy.capacity(), 0);
        assert!(copy.is_empty());
    }

    #[test]
    fn range_views_follow_logical_order() {
        let mut buf = RingBuffer::new(4);
        buf.push_many(&[0, 1, 2, 3]);
        buf.pop_many(2);
        buf.push_many(&[4, 5]);

        assert_eq!(buf.range_views(..), buf.data_views());
        assert_eq!(buf.range_views(1..3), (&[3][..], &[4][..]));
        assert_eq!(buf.range_views(2..), (&[4, 5][..], &[][..]));
        assert_eq!(buf.range_views(4..), (&[][..], &[][..]));
    }

    #[test]
    #[should_panic(expected = "range_views upper bound was too large")]
    fn range_views_past_end() {
        let mut buf = RingBuffer::new(4);
        buf.push_many(&[0, 1]);
        buf.range_views(..3);
    }

    #[test]
    fn index_and_get() {
        let mut buf = RingBuffer::new(3);
        buf.push_many(&[1, 2, 3]);
        buf.pop();
        buf.push(4);
        assert_eq!(buf[0], 2);
        assert_eq!(buf[2], 4);
        buf[2] = 40;
        assert_eq!(buf.back(), Some(&40));
        assert_eq!(buf.get(3), None);
        *buf.get_mut(0).unwrap() = 20;
        assert_eq!(buf, vec![20, 3, 40]);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn index_out_of_bounds() {
        let buf: RingBuffer<i32> = RingBuffer::new(3);
        let _value = buf[0];
    }

    #[test]
    fn equality_ignores_layout() {
        let mut wrapped = RingBuffer::new(4);
        wrapped.push_many(&[0, 0, 1, 2]);
        wrapped.pop_many(2);
        wrapped.push_many(&[3, 4]);

        let straight: RingBuffer<i32, Exact> = vec![1, 2, 3, 4].into();
        assert_eq!(wrapped, straight);
        assert_eq!(straight, wrapped);
        assert_eq!(wrapped, &[1, 2, 3, 4][..]);

        let mut shorter = straight.clone();
        shorter.pop();
        assert_ne!(wrapped, shorter);
    }

    #[test]
    fn hash_ignores_layout() {
        fn hash_of<G: Growth>(buf: &RingBuffer<i32, G>) -> u64 {
            let mut hasher = DefaultHasher::new();
            buf.hash(&mut hasher);
            hasher.finish()
        }

        let mut wrapped = RingBuffer::new(3);
        wrapped.push_many(&[0, 1, 2]);
        wrapped.pop();
        wrapped.push(3);
        let straight: RingBuffer<i32> = (1..4).collect();
        assert_eq!(hash_of(&wrapped), hash_of(&straight));
    }

    #[test]
    fn ordering() {
        let a: RingBuffer<i32> = (1..4).collect();
        let b: RingBuffer<i32> = (1..5).collect();
        assert!(a < b);
        assert_eq!(a.cmp(&a.clone()), Ordering::Equal);
    }

    #[test]
    fn contains_checks_both_views() {
        let mut buf = RingBuffer::new(3);
        buf.push_many(&[1, 2, 3]);
        buf.pop();
        buf.push(4);
        assert!(buf.contains(&4));
        assert!(buf.contains(&2));
        assert!(!buf.contains(&1));
    }

    #[test]
    fn extend_reserves_once() {
        let mut buf: RingBuffer<i32, Exact> = RingBuffer::with_growth(0);
        buf.extend(0..5);
        assert_eq!(buf.capacity(), 5);
        buf.extend(&[5, 6]);
        assert_eq!(buf, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn debug_lists_elements() {
        let mut buf = RingBuffer::new(2);
        buf.push_many(&[1, 2]);
        buf.pop();
        buf.push(3);
        assert_eq!(format!("{:?}", buf), "[2, 3]");
    }

    #[test]
    fn zero_sized_elements() {
        let mut buf = RingBuffer::new(2);
        buf.push(());
        buf.push_many(&[(), (), ()]);
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.pop_many(3).len(), 3);
        assert_eq!(buf.pop(), Some(()));
        assert_eq!(buf.pop(), None);
    }

    #[test]
    fn drops_every_element_once() {
        let drops = Rc::new(Cell::new(0));
        {
            let mut buf = RingBuffer::new(2);
            buf.extend(counters(&drops, 2));
            drop(buf.pop());
            assert_eq!(drops.get(), 1);

            buf.extend(counters(&drops, 3));
            assert_eq!(drops.get(), 1);

            assert_eq!(buf.advance_read(2), 2);
            assert_eq!(drops.get(), 3);

            drop(buf.pop_many(1));
            assert_eq!(drops.get(), 4);
        }
        assert_eq!(drops.get(), 5);
    }

    #[test]
    fn clear_and_release_drop_elements() {
        let drops = Rc::new(Cell::new(0));
        let mut buf = RingBuffer::new(4);
        buf.extend(counters(&drops, 3));
        buf.clear();
        assert_eq!(drops.get(), 3);

        buf.extend(counters(&drops, 2));
        buf.release();
        assert_eq!(drops.get(), 5);
        drop(buf);
        assert_eq!(drops.get(), 5);
    }

    #[test]
    fn pop_many_into_drops_overwritten_values() {
        let drops = Rc::new(Cell::new(0));
        let mut buf = RingBuffer::new(4);
        buf.extend(counters(&drops, 2));
        let mut dest = counters(&drops, 3);

        assert_eq!(buf.pop_many_into(&mut dest, 3), 2);
        assert_eq!(drops.get(), 2);
        drop(dest);
        assert_eq!(drops.get(), 5);
        drop(buf);
        assert_eq!(drops.get(), 5);
    }
}
