//! Bump arena implementing [`ByteAllocator`].
//!
//! The arena owns one fixed region and hands out blocks by advancing a cursor.
//! Only the most recently allocated block can grow in place or be given back;
//! every other release is a no-op, and the memory is reclaimed all at once by
//! [`BumpArena::reset`] or when the arena is dropped.
//!
//! Blocks carry the same size prefix as the [`SizeHintAllocator`], and their
//! usable size is the requested size rounded up to [`MIN_ALIGN`].
//!
//! [`SizeHintAllocator`]: crate::SizeHintAllocator

use std::alloc::{Layout, alloc, dealloc};
use std::cell::Cell;
use std::ptr::NonNull;

use hvec_common::{Error, Result};

use crate::size_hint::{PREFIX, read_hint, write_hint};
use crate::{ByteAllocator, MIN_ALIGN};

/// A fixed-size region carved into blocks by bump allocation.
///
/// Vectors bind to the arena by reference, so the arena cannot be reset or
/// dropped while any of them is alive.
pub struct BumpArena {
    base: NonNull<u8>,
    layout: Layout,
    /// Offset of the next free byte; always a multiple of `MIN_ALIGN`.
    cursor: Cell<usize>,
    /// Offset of the most recently allocated block (past its prefix).
    top: Cell<Option<usize>>,
}

impl BumpArena {
    /// Creates an arena over a freshly allocated region of `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Result<BumpArena> {
        let layout = Layout::from_size_align(capacity.max(MIN_ALIGN), MIN_ALIGN)
            .map_err(|_| Error::allocation_failed(capacity))?;
        let base = NonNull::new(unsafe { alloc(layout) })
            .ok_or_else(|| Error::allocation_failed(capacity))?;
        Ok(BumpArena {
            base,
            layout,
            cursor: Cell::new(0),
            top: Cell::new(None),
        })
    }

    /// Total size of the region, in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.layout.size()
    }

    /// Bytes consumed so far, including block prefixes and padding.
    #[inline]
    pub fn used(&self) -> usize {
        self.cursor.get()
    }

    /// Bytes still available for allocation.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.used()
    }

    /// Forgets every block, making the whole region available again.
    pub fn reset(&mut self) {
        self.cursor.set(0);
        self.top.set(None);
    }

    /// Returns `true` if `block` points into this arena's region.
    pub fn contains(&self, block: NonNull<u8>) -> bool {
        let start = self.base.as_ptr() as usize;
        let addr = block.as_ptr() as usize;
        addr >= start && addr < start + self.capacity()
    }

    #[inline]
    fn offset_of(&self, block: NonNull<u8>) -> usize {
        block.as_ptr() as usize - self.base.as_ptr() as usize
    }

    /// Places a block of `size` bytes at `start`, if it fits.
    fn place(&self, start: usize, size: usize) -> Option<NonNull<u8>> {
        let end = start
            .checked_add(PREFIX)?
            .checked_add(round_up(size, MIN_ALIGN)?)?;
        if end > self.capacity() {
            return None;
        }
        let block = unsafe { write_hint(self.base.add(start), size) };
        self.cursor.set(end);
        self.top.set(Some(start + PREFIX));
        Some(block)
    }
}

unsafe impl ByteAllocator for BumpArena {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        self.place(self.cursor.get(), size)
    }

    unsafe fn reallocate(&self, block: NonNull<u8>, size: usize) -> Option<NonNull<u8>> {
        debug_assert!(self.contains(block));
        let offset = self.offset_of(block);
        if self.top.get() == Some(offset) {
            return self.place(offset - PREFIX, size);
        }

        let old_size = unsafe { self.usable_size(block) };
        let new_block = self.allocate(size)?;
        unsafe {
            std::ptr::copy_nonoverlapping(
                block.as_ptr(),
                new_block.as_ptr(),
                old_size.min(size),
            );
        }
        Some(new_block)
    }

    unsafe fn usable_size(&self, block: NonNull<u8>) -> usize {
        let size = unsafe { read_hint(block) };
        round_up(size, MIN_ALIGN).unwrap_or(size)
    }

    unsafe fn release(&self, block: NonNull<u8>) {
        debug_assert!(self.contains(block));
        let offset = self.offset_of(block);
        if self.top.get() == Some(offset) {
            self.cursor.set(offset - PREFIX);
            self.top.set(None);
        }
    }

    fn name(&self) -> &'static str {
        "bump-arena"
    }
}

impl Drop for BumpArena {
    fn drop(&mut self) {
        unsafe { dealloc(self.base.as_ptr(), self.layout) }
    }
}

impl std::fmt::Debug for BumpArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BumpArena")
            .field("capacity", &self.capacity())
            .field("used", &self.used())
            .finish()
    }
}

#[inline]
fn round_up(n: usize, block_size: usize) -> Option<usize> {
    Some(n.checked_add(block_size - 1)? & !(block_size - 1))
}
