//! Error types.

use core::fmt;
#[cfg(feature = "std")]
use std::error::Error;

/// Error value indicating the buffer ran out of elements before a read
/// request was filled.
///
/// Only `RingBuffer::read_into` reports it. The elements that were
/// available have already been moved into the destination.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EndOfData {
    /// Number of elements copied before the buffer ran dry.
    pub copied: usize,
}

const EODERROR: &str = "end of data";

#[cfg(feature = "std")]
impl Error for EndOfData {}

impl fmt::Display for EndOfData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} after {} elements", EODERROR, self.copied)
    }
}

impl fmt::Debug for EndOfData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EndOfData: {} (copied {})", EODERROR, self.copied)
    }
}
