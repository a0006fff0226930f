//! Append, truncate, and positional insert/remove.
//!
//! Out-of-range positions are reported but not rejected: an insert past the
//! end appends, a remove past the end truncates, and an oversized truncate or
//! remove empties the vector. The returned error tells the caller this
//! happened (see `Error::is_completed`); the vector is always left valid.

use std::ptr;

use hvec_common::{Error, Result};

use crate::vec::HeaderVec;

impl HeaderVec<'_> {
    /// Appends `data` to the end of the vector, allocating it if necessary.
    ///
    /// # Errors
    ///
    /// Fails only if the reservation fails, leaving the vector unchanged.
    pub fn append(&mut self, data: &[u8]) -> Result<()> {
        let header = self.reserve_header(data.len())?;
        let len = header.len();
        unsafe {
            ptr::copy_nonoverlapping(
                data.as_ptr(),
                header.data().as_ptr().add(len),
                data.len(),
            );
        }
        header.set_len(len + data.len());
        Ok(())
    }

    /// Shortens the vector by `amount` bytes, keeping its capacity.
    ///
    /// # Errors
    ///
    /// - `NullBuffer` on an unallocated vector.
    /// - `SizeOutOfRange` if `amount` exceeds the length; the vector is
    ///   emptied.
    pub fn truncate_by(&mut self, amount: usize) -> Result<()> {
        let header = self.header().ok_or_else(|| Error::null_buffer("truncate"))?;
        let len = header.len();
        if amount > len {
            header.set_len(0);
            return Err(Error::size_out_of_range(amount, len));
        }
        header.set_len(len - amount);
        Ok(())
    }

    /// Inserts `data` at byte offset `index`, shifting the tail to the right.
    ///
    /// # Errors
    ///
    /// - Reservation errors, leaving the vector unchanged.
    /// - `IndexOutOfRange` if `index` is past the end. The data is still
    ///   appended at the end.
    pub fn insert(&mut self, index: usize, data: &[u8]) -> Result<()> {
        let header = self.reserve_header(data.len())?;
        let len = header.len();
        let base = header.data().as_ptr();
        if index >= len {
            unsafe { ptr::copy_nonoverlapping(data.as_ptr(), base.add(len), data.len()) };
            header.set_len(len + data.len());
            return if index > len {
                Err(Error::index_out_of_range(index, len))
            } else {
                Ok(())
            };
        }

        unsafe {
            ptr::copy(base.add(index), base.add(index + data.len()), len - index);
            ptr::copy_nonoverlapping(data.as_ptr(), base.add(index), data.len());
        }
        header.set_len(len + data.len());
        Ok(())
    }

    /// Removes `size` bytes starting at byte offset `index`, shifting the tail
    /// to the left. Capacity is kept.
    ///
    /// # Errors
    ///
    /// - `NullBuffer` on an unallocated vector.
    /// - `SizeOutOfRange` if `size` exceeds the length (the vector is emptied),
    ///   or if the range runs past the end (everything from `index` on is
    ///   removed).
    /// - `IndexOutOfRange` if `index` is past the end. The vector is still
    ///   shortened by `size` bytes from the end.
    pub fn remove(&mut self, index: usize, size: usize) -> Result<()> {
        let header = self.header().ok_or_else(|| Error::null_buffer("remove"))?;
        let len = header.len();
        if size > len {
            header.set_len(0);
            return Err(Error::size_out_of_range(size, len));
        }
        if index >= len {
            header.set_len(len - size);
            return if index > len {
                Err(Error::index_out_of_range(index, len))
            } else {
                Ok(())
            };
        }
        if size > len - index {
            header.set_len(index);
            return Err(Error::size_out_of_range(size, len - index));
        }

        let base = header.data().as_ptr();
        unsafe { ptr::copy(base.add(index + size), base.add(index), len - index - size) };
        header.set_len(len - size);
        Ok(())
    }
}
