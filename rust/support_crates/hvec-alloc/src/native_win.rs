use std::ptr::NonNull;

use windows_sys::Win32::System::Memory::{
    GetProcessHeap, HeapAlloc, HeapFree, HeapReAlloc, HeapSize,
};

use crate::ByteAllocator;

/// `true` when this target exposes a native usable-size query.
pub const HAS_NATIVE_USABLE_SIZE: bool = true;

/// Whether the default binding should pick [`NativeAllocator`] over the
/// size-hint shim.
pub const PREFER_NATIVE: bool = true;

/// The default process heap, with usable sizes reported by `HeapSize`.
///
/// <https://learn.microsoft.com/en-us/windows/win32/api/heapapi/nf-heapapi-heapsize>
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeAllocator;

static NATIVE: NativeAllocator = NativeAllocator;

/// Returns the process-wide native allocator instance.
pub fn native_allocator() -> Option<&'static (dyn ByteAllocator + Sync)> {
    Some(&NATIVE)
}

unsafe impl ByteAllocator for NativeAllocator {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        unsafe {
            let heap = GetProcessHeap();
            if heap.is_null() {
                return None;
            }
            NonNull::new(HeapAlloc(heap, 0, size.max(1)).cast())
        }
    }

    unsafe fn reallocate(&self, block: NonNull<u8>, size: usize) -> Option<NonNull<u8>> {
        unsafe {
            let heap = GetProcessHeap();
            if heap.is_null() {
                return None;
            }
            let ptr = HeapReAlloc(heap, 0, block.as_ptr().cast_const().cast(), size.max(1));
            NonNull::new(ptr.cast())
        }
    }

    unsafe fn usable_size(&self, block: NonNull<u8>) -> usize {
        let size = unsafe { HeapSize(GetProcessHeap(), 0, block.as_ptr().cast_const().cast()) };
        // HeapSize signals failure with (SIZE_T)-1.
        if size == usize::MAX { 0 } else { size }
    }

    unsafe fn release(&self, block: NonNull<u8>) {
        unsafe {
            HeapFree(GetProcessHeap(), 0, block.as_ptr().cast_const().cast());
        }
    }

    fn name(&self) -> &'static str {
        "HeapSize"
    }
}
