//! Growth policies for `RingBuffer`.

use core::cmp;

/// Smallest block a `Doubling` buffer allocates once it needs storage at all.
const MIN_NON_ZERO_CAPACITY: usize = 4;

/// Tagging trait selecting how `RingBuffer` sizes a replacement block when
/// it runs out of free slots.
pub trait Growth {
    /// Returns the slot count to allocate when a block of `capacity` slots
    /// holding `len` elements cannot take `additional` more.
    ///
    /// The result is never less than `len + additional`.
    ///
    /// # Panics
    ///
    /// Panics if `len + additional` overflows `usize`.
    fn grow(len: usize, additional: usize, capacity: usize) -> usize;
}

/// Growth policy that at least doubles the capacity on every reallocation.
///
/// Keeps `push` amortized `O(1)`. This is the default policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Doubling;

impl Growth for Doubling {
    #[inline]
    fn grow(len: usize, additional: usize, capacity: usize) -> usize {
        let required = required_capacity(len, additional);
        cmp::max(
            cmp::max(required, capacity.saturating_mul(2)),
            MIN_NON_ZERO_CAPACITY,
        )
    }
}

/// Growth policy that allocates exactly the slots that are needed.
///
/// Uses the least memory, at the price of a full copy whenever a push does
/// not fit: pushing one element at a time into a full buffer is `O(len)`, so
/// unlike `Doubling` it has no amortized `O(1)` bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Exact;

impl Growth for Exact {
    #[inline]
    fn grow(len: usize, additional: usize, _capacity: usize) -> usize {
        required_capacity(len, additional)
    }
}

#[inline]
fn required_capacity(len: usize, additional: usize) -> usize {
    match len.checked_add(additional) {
        Some(required) => required,
        None => panic!("capacity overflow"),
    }
}
