use std::ptr::NonNull;

use crate::ByteAllocator;

/// `true` when this target exposes a native usable-size query.
pub const HAS_NATIVE_USABLE_SIZE: bool = true;

/// Whether the default binding should pick [`NativeAllocator`] over the
/// size-hint shim.
///
/// glibc's `malloc_usable_size` reports chunk slack that varies with the
/// allocator's internal bin sizes, so capacities would differ between builds
/// linked against different glibc versions. The shim keeps them exact; the
/// native allocator remains available for explicit per-vector binding.
pub const PREFER_NATIVE: bool = false;

/// The C heap, with usable sizes reported by `malloc_usable_size`.
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
        unsafe { libc::malloc_usable_size(block.as_ptr().cast()) }
    }

    unsafe fn release(&self, block: NonNull<u8>) {
        unsafe { libc::free(block.as_ptr().cast()) }
    }

    fn name(&self) -> &'static str {
        "malloc_usable_size"
    }
}
