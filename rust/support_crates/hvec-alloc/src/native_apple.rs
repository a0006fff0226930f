use std::ptr::NonNull;

use crate::ByteAllocator;

/// `true` when this target exposes a native usable-size query.
pub const HAS_NATIVE_USABLE_SIZE: bool = true;

/// Whether the default binding should pick [`NativeAllocator`] over the
/// size-hint shim.
pub const PREFER_NATIVE: bool = true;

/// The C heap, with usable sizes reported by `malloc_size`.
///
/// `malloc_size` rounds up to the zone's size class (16 bytes for tiny
/// allocations), so vectors bound to this allocator often absorb several
/// small appends without reallocating.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeAllocator;

static NATIVE: NativeAllocator = NativeAllocator;

/// Returns the process-wide native allocator instance.
pub fn native_allocator() -> Option<&'static (dyn ByteAllocator + Sync)> {
    Some(&NATIVE)
}

unsafe impl ByteAllocator for NativeAllocator {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        NonNull::new(unsafe { libc::malloc(size.max(1)) }.cast())
    }

    unsafe fn reallocate(&self, block: NonNull<u8>, size: usize) -> Option<NonNull<u8>> {
        NonNull::new(unsafe { libc::realloc(block.as_ptr().cast(), size.max(1)) }.cast())
    }

    unsafe fn usable_size(&self, block: NonNull<u8>) -> usize {
        unsafe { libc::malloc_size(block.as_ptr().cast_const().cast()) }
    }

    unsafe fn release(&self, block: NonNull<u8>) {
        unsafe { libc::free(block.as_ptr().cast()) }
    }

    fn name(&self) -> &'static str {
        "malloc_size"
    }
}
