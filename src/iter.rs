use core::iter::FusedIterator;
use core::slice;

use crate::growth::Growth;
use crate::RingBuffer;

/// `RingBuffer` iterator
#[must_use = "iterator adaptors are lazy and do nothing unless consumed"]
#[derive(Clone)]
pub struct Iter<'a, T: 'a> {
    first: slice::Iter<'a, T>,
    second: slice::Iter<'a, T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(first: &'a [T], second: &'a [T]) -> Self {
        Iter {
            first: first.iter(),
            second: second.iter(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        match self.first.next() {
            Some(elem) => Some(elem),
            None => self.second.next(),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.first.len() + self.second.len();
        (len, Some(len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        match self.second.next_back() {
            Some(elem) => Some(elem),
            None => self.first.next_back(),
        }
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

/// `RingBuffer` mutable iterator
#[must_use = "iterator adaptors are lazy and do nothing unless consumed"]
pub struct IterMut<'a, T: 'a> {
    first: slice::IterMut<'a, T>,
    second: slice::IterMut<'a, T>,
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(first: &'a mut [T], second: &'a mut [T]) -> Self {
        IterMut {
            first: first.iter_mut(),
            second: second.iter_mut(),
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        match self.first.next() {
            Some(elem) => Some(elem),
            None => self.second.next(),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.first.len() + self.second.len();
        (len, Some(len))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a mut T> {
        match self.second.next_back() {
            Some(elem) => Some(elem),
            None => self.first.next_back(),
        }
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

impl<'a, T> FusedIterator for IterMut<'a, T> {}

/// By-value `RingBuffer` iterator
///
/// Pops elements front to back; whatever is left is dropped with the
/// iterator.
#[must_use = "iterator adaptors are lazy and do nothing unless consumed"]
pub struct IntoIter<T, G: Growth> {
    inner: RingBuffer<T, G>,
}

impl<T, G: Growth> IntoIter<T, G> {
    pub(crate) fn new(inner: RingBuffer<T, G>) -> Self {
        IntoIter { inner }
    }
}

impl<T, G: Growth> Iterator for IntoIter<T, G> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.pop()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.inner.len();
        (len, Some(len))
    }
}

impl<T, G: Growth> ExactSizeIterator for IntoIter<T, G> {}

impl<T, G: Growth> FusedIterator for IntoIter<T, G> {}
