//! Usable-size emulation for allocators that cannot report block sizes.
//!
//! Each block is preceded by a [`MIN_ALIGN`]-sized prefix. The requested size
//! is stored in the `usize` immediately before the pointer handed out, so the
//! returned block keeps the prefix's alignment:
//!
//! ```text
//! raw start                       block
//! |<------ MIN_ALIGN prefix ------>|<------ size bytes ------>|
//! |     (padding)    | size: usize |         data            |
//! ```

use std::alloc::{Layout, alloc, dealloc, realloc};
use std::ptr::NonNull;

use crate::{ByteAllocator, MIN_ALIGN};

/// Bytes reserved ahead of every size-hinted block.
pub(crate) const PREFIX: usize = MIN_ALIGN;

/// Allocator on top of the global Rust allocator, tracking block sizes itself.
///
/// `usable_size` reports exactly the last requested size, which makes capacity
/// growth fully deterministic.
#[derive(Debug, Default, Clone, Copy)]
pub struct SizeHintAllocator;

unsafe impl ByteAllocator for SizeHintAllocator {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        let layout = block_layout(size)?;
        let raw = NonNull::new(unsafe { alloc(layout) })?;
        Some(unsafe { write_hint(raw, size) })
    }

    unsafe fn reallocate(&self, block: NonNull<u8>, size: usize) -> Option<NonNull<u8>> {
        let new_layout = block_layout(size)?;
        unsafe {
            let old_layout = block_layout(read_hint(block))?;
            let raw = block.sub(PREFIX);
            let raw = NonNull::new(realloc(raw.as_ptr(), old_layout, new_layout.size()))?;
            Some(write_hint(raw, size))
        }
    }

    unsafe fn usable_size(&self, block: NonNull<u8>) -> usize {
        unsafe { read_hint(block) }
    }

    unsafe fn release(&self, block: NonNull<u8>) {
        unsafe {
            if let Some(layout) = block_layout(read_hint(block)) {
                dealloc(block.sub(PREFIX).as_ptr(), layout);
            }
        }
    }

    fn name(&self) -> &'static str {
        "size-hint"
    }
}

/// Layout of the raw allocation backing a `size`-byte block, or `None` if the
/// total overflows.
#[inline]
pub(crate) fn block_layout(size: usize) -> Option<Layout> {
    let total = size.checked_add(PREFIX)?;
    Layout::from_size_align(total, MIN_ALIGN).ok()
}

/// Records `size` in the prefix of the raw allocation at `raw` and returns the
/// block pointer past the prefix.
///
/// # Safety
///
/// `raw` must be valid for writes of at least `PREFIX` bytes and aligned to
/// `MIN_ALIGN`.
#[inline]
pub(crate) unsafe fn write_hint(raw: NonNull<u8>, size: usize) -> NonNull<u8> {
    unsafe {
        let block = raw.add(PREFIX);
        block.cast::<usize>().sub(1).write(size);
        block
    }
}

/// Reads the size recorded ahead of `block`.
///
/// # Safety
///
/// `block` must have been produced by [`write_hint`].
#[inline]
pub(crate) unsafe fn read_hint(block: NonNull<u8>) -> usize {
    unsafe { block.cast::<usize>().sub(1).read() }
}
