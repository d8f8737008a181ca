use core::cmp;
use core::mem::MaybeUninit;
use core::ops::Range;

#[inline]
pub fn wrap_add(index: usize, addend: usize, capacity: usize) -> usize {
    debug_assert!(addend <= capacity);
    if capacity == 0 {
        0
    } else {
        (index + addend) % capacity
    }
}

/// Splits a run of `len` slots starting at physical offset `start` into the
/// part before the end of storage and the part wrapped around to offset 0.
#[inline]
pub fn split_run(start: usize, len: usize, capacity: usize) -> (Range<usize>, Range<usize>) {
    debug_assert!(len <= capacity, "run len={} cap={}", len, capacity);
    debug_assert!(start < capacity || start == 0, "run start={} cap={}", start, capacity);
    let first_end = cmp::min(capacity, start + len);
    let overflow = len - (first_end - start);
    (start..first_end, 0..overflow)
}

#[inline]
pub fn ring_slices<X>(ring: &[X], start: usize, len: usize) -> (&[X], &[X]) {
    let (first, second) = split_run(start, len, ring.len());
    (&ring[first], &ring[second])
}

#[inline]
pub fn ring_slices_mut<X>(ring: &mut [X], start: usize, len: usize) -> (&mut [X], &mut [X]) {
    let (first, second) = split_run(start, len, ring.len());
    let (wrapped, rest) = ring.split_at_mut(start);
    (&mut rest[..first.len()], &mut wrapped[second])
}

/// # Safety
///
/// Every element of `slots` must be initialized.
#[inline]
pub unsafe fn assume_init<T>(slots: &[MaybeUninit<T>]) -> &[T] {
    &*(slots as *const [MaybeUninit<T>] as *const [T])
}

/// # Safety
///
/// Every element of `slots` must be initialized.
#[inline]
pub unsafe fn assume_init_mut<T>(slots: &mut [MaybeUninit<T>]) -> &mut [T] {
    &mut *(slots as *mut [MaybeUninit<T>] as *mut [T])
}
