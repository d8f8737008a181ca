//! Reader and writer style access to a `RingBuffer`.

use crate::error::EndOfData;
use crate::growth::Growth;
use crate::RingBuffer;

impl<T, G: Growth> RingBuffer<T, G> {
    /// Fills `dest` from the front of the buffer.
    ///
    /// Returns `Ok(dest.len())` when the buffer held enough elements.
    /// Otherwise everything that was there is moved into the start of
    /// `dest` and `EndOfData` reports how many elements that was.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringqueue::{EndOfData, RingBuffer};
    ///
    /// let mut queue = RingBuffer::new(4);
    /// queue.write_from(&[1, 2, 3]);
    ///
    /// let mut dest = [0; 2];
    /// assert_eq!(queue.read_into(&mut dest), Ok(2));
    /// assert_eq!(queue.read_into(&mut dest), Err(EndOfData { copied: 1 }));
    /// assert_eq!(dest, [3, 2]);
    /// ```
    pub fn read_into(&mut self, dest: &mut [T]) -> Result<usize, EndOfData> {
        let wanted = dest.len();
        let copied = self.pop_many_into(dest, wanted);
        if copied < wanted {
            Err(EndOfData { copied })
        } else {
            Ok(copied)
        }
    }

    /// Appends clones of `src` and returns `src.len()`.
    ///
    /// The buffer grows instead of rejecting data, so this never writes
    /// less than it was given.
    pub fn write_from(&mut self, src: &[T]) -> usize
    where
        T: Clone,
    {
        self.push_many(src);
        src.len()
    }

    /// Alias for `release`. Closing an already closed buffer does nothing.
    #[inline]
    pub fn close(&mut self) {
        self.release();
    }
}

#[cfg(feature = "std")]
mod io_impls {
    use std::io;

    use crate::growth::Growth;
    use crate::RingBuffer;

    /// Reading pops bytes from the front. `Ok(0)` for a non-empty `buf`
    /// means the ring buffer is empty.
    impl<G: Growth> io::Read for RingBuffer<u8, G> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let wanted = buf.len();
            Ok(self.pop_many_into(buf, wanted))
        }
    }

    /// Writes always take the whole input.
    impl<G: Growth> io::Write for RingBuffer<u8, G> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(self.write_from(buf))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
