//! Layout of a header-prefixed block.
//!
//! ```text
//! block (from the allocator)
//! |<------------- DATA_OFFSET ------------->|<------- capacity ------->|
//! | allocator: &dyn ByteAllocator | len | pad |  data[0..len] | spare    |
//! ```
//!
//! The header lives at the very start of the block; the data region begins
//! at `DATA_OFFSET`, which keeps the data aligned to [`MIN_ALIGN`].

use std::ptr::NonNull;

use hvec_alloc::{ByteAllocator, MIN_ALIGN};
use hvec_common::result::verify;
use hvec_common::{Error, Result};

/// Bookkeeping stored ahead of the data bytes.
#[repr(C)]
pub(crate) struct Header<'a> {
    /// Allocator bound at creation, never swapped.
    allocator: &'a dyn ByteAllocator,
    /// Logical size in bytes.
    len: usize,
}

/// Offset of the data region from the start of the block.
pub const DATA_OFFSET: usize = align_up(std::mem::size_of::<Header<'static>>(), MIN_ALIGN);

/// Largest capacity a vector can be asked to grow to, in bytes.
///
/// Rust allocations are limited to `isize::MAX` bytes, header included.
pub const MAX_CAPACITY: usize = isize::MAX as usize - DATA_OFFSET;

/// Pointer to the header of a live block.
///
/// Only valid while the owning `HeaderVec` holds it; every method assumes the
/// block has been initialized by [`HeaderPtr::allocate`] and not released.
#[derive(Clone, Copy)]
pub(crate) struct HeaderPtr<'a>(NonNull<Header<'a>>);

impl<'a> HeaderPtr<'a> {
    /// Allocates a block with room for `capacity` data bytes and an empty
    /// header bound to `allocator`.
    pub(crate) fn allocate(
        capacity: usize,
        allocator: &'a dyn ByteAllocator,
    ) -> Result<HeaderPtr<'a>> {
        verify(capacity <= MAX_CAPACITY, || Error::capacity_overflow(0, capacity))?;
        let size = DATA_OFFSET + capacity;
        let block = allocator
            .allocate(size)
            .ok_or_else(|| Error::allocation_failed(size))?;
        let header = block.cast::<Header<'a>>();
        unsafe { header.write(Header { allocator, len: 0 }) };
        Ok(HeaderPtr(header))
    }

    /// Adopts a block returned by reallocating an existing header block.
    ///
    /// # Safety
    ///
    /// `block` must be the result of `reallocate` on a block previously
    /// initialized by [`HeaderPtr::allocate`].
    #[inline]
    pub(crate) unsafe fn from_block(block: NonNull<u8>) -> HeaderPtr<'a> {
        HeaderPtr(block.cast())
    }

    /// Start of the underlying allocation.
    #[inline]
    pub(crate) fn block(self) -> NonNull<u8> {
        self.0.cast()
    }

    #[inline]
    pub(crate) fn allocator(self) -> &'a dyn ByteAllocator {
        unsafe { (*self.0.as_ptr()).allocator }
    }

    #[inline]
    pub(crate) fn len(self) -> usize {
        unsafe { (*self.0.as_ptr()).len }
    }

    #[inline]
    pub(crate) fn set_len(self, len: usize) {
        unsafe { (*self.0.as_ptr()).len = len }
    }

    /// First byte of the data region.
    #[inline]
    pub(crate) fn data(self) -> NonNull<u8> {
        unsafe { self.block().add(DATA_OFFSET) }
    }

    /// Data bytes available in the block, as reported by its allocator.
    #[inline]
    pub(crate) fn capacity(self) -> usize {
        let usable = unsafe { self.allocator().usable_size(self.block()) };
        usable.saturating_sub(DATA_OFFSET)
    }

    /// Returns the block to its allocator.
    ///
    /// # Safety
    ///
    /// The header must not be used afterwards.
    #[inline]
    pub(crate) unsafe fn release(self) {
        let allocator = self.allocator();
        unsafe { allocator.release(self.block()) }
    }
}

/// Aligns `n` up to the next multiple of `alignment` (a power of two).
#[inline]
pub(crate) const fn align_up(n: usize, alignment: usize) -> usize {
    (n + alignment - 1) & !(alignment - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_offset_alignment() {
        assert!(DATA_OFFSET >= std::mem::size_of::<Header<'static>>());
        assert_eq!(DATA_OFFSET % MIN_ALIGN, 0);
        assert!(std::mem::align_of::<Header<'static>>() <= MIN_ALIGN);
    }

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 16), 0);
        assert_eq!(align_up(1, 16), 16);
        assert_eq!(align_up(16, 16), 16);
        assert_eq!(align_up(24, 16), 32);
    }

    #[test]
    fn test_allocate_rejects_oversized_capacity() {
        let err = HeaderPtr::allocate(MAX_CAPACITY + 1, &hvec_alloc::SizeHintAllocator)
            .err()
            .unwrap();
        assert_eq!(err.status().code(), 2);
    }
}
