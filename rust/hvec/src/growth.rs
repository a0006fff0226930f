//! Capacity reservation.
//!
//! Capacity doubles on every growth step, which amortizes reallocation to
//! O(1) per appended byte. Before growing, the allocator's usable size is
//! consulted, so slack the allocator already provided is used up first.

use hvec_alloc::default_allocator;
use hvec_common::{Error, Result};

use crate::header::{DATA_OFFSET, HeaderPtr, MAX_CAPACITY};
use crate::vec::HeaderVec;

impl<'a> HeaderVec<'a> {
    /// Ensures room for at least `additional` more bytes.
    ///
    /// An unallocated vector gets a block with exactly `additional` bytes of
    /// capacity from the default allocator. Otherwise the block is reallocated
    /// only if the current capacity falls short.
    ///
    /// # Errors
    ///
    /// - `CapacityOverflow` if the resulting size exceeds [`MAX_CAPACITY`].
    /// - `AllocationFailed` if the allocator cannot provide the block.
    ///
    /// In both cases the vector is left exactly as it was.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.reserve_header(additional).map(|_| ())
    }

    /// Reserves room and returns the (possibly relocated) header.
    pub(crate) fn reserve_header(&mut self, additional: usize) -> Result<HeaderPtr<'a>> {
        let header = match self.header() {
            Some(header) => header,
            None => {
                let header = HeaderPtr::allocate(additional, default_allocator())?;
                self.set_header(header);
                header
            }
        };

        let len = header.len();
        let needed = len
            .checked_add(additional)
            .filter(|&needed| needed <= MAX_CAPACITY)
            .ok_or_else(|| Error::capacity_overflow(len, additional))?;

        let capacity = header.capacity();
        if needed <= capacity {
            return Ok(header);
        }
        self.grow(header, grown_capacity(capacity, needed))
    }

    #[cold]
    fn grow(&mut self, header: HeaderPtr<'a>, new_capacity: usize) -> Result<HeaderPtr<'a>> {
        let allocator = header.allocator();
        let size = DATA_OFFSET + new_capacity;
        match unsafe { allocator.reallocate(header.block(), size) } {
            Some(block) => {
                let header = unsafe { HeaderPtr::from_block(block) };
                log::trace!(
                    "{} vector grew to {new_capacity} bytes (len {})",
                    allocator.name(),
                    header.len()
                );
                self.set_header(header);
                Ok(header)
            }
            None => {
                log::warn!(
                    "{} allocator failed to grow vector to {size} bytes",
                    allocator.name()
                );
                Err(Error::allocation_failed(size))
            }
        }
    }
}

/// Capacity to grow to from `capacity` so that at least `needed` bytes fit.
///
/// An empty block grows to exactly `needed`; otherwise the capacity doubles
/// until it covers `needed`, saturating at [`MAX_CAPACITY`].
pub(crate) fn grown_capacity(capacity: usize, needed: usize) -> usize {
    debug_assert!(needed <= MAX_CAPACITY);
    if capacity == 0 {
        return needed;
    }
    let mut new_capacity = capacity;
    while new_capacity < needed {
        new_capacity = if new_capacity > MAX_CAPACITY / 2 {
            MAX_CAPACITY
        } else {
            new_capacity * 2
        };
    }
    new_capacity
}

#[cfg(test)]
mod tests {
    use std::ptr::NonNull;

    use hvec_alloc::{BumpArena, ByteAllocator, SizeHintAllocator, TrackingAllocator};

    use super::*;

    /// Fails every reallocation.
    struct NoRealloc;

    unsafe impl ByteAllocator for NoRealloc {
        fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
            SizeHintAllocator.allocate(size)
        }

        unsafe fn reallocate(&self, _block: NonNull<u8>, _size: usize) -> Option<NonNull<u8>> {
            None
        }

        unsafe fn usable_size(&self, block: NonNull<u8>) -> usize {
            unsafe { SizeHintAllocator.usable_size(block) }
        }

        unsafe fn release(&self, block: NonNull<u8>) {
            unsafe { SizeHintAllocator.release(block) }
        }
    }

    #[test]
    fn test_grown_capacity() {
        assert_eq!(grown_capacity(0, 13), 13);
        assert_eq!(grown_capacity(10, 11), 20);
        assert_eq!(grown_capacity(10, 20), 20);
        assert_eq!(grown_capacity(10, 21), 40);
        assert_eq!(grown_capacity(3, 100), 192);
        assert_eq!(grown_capacity(MAX_CAPACITY / 2 + 1, MAX_CAPACITY), MAX_CAPACITY);
        assert_eq!(grown_capacity(MAX_CAPACITY - 1, MAX_CAPACITY), MAX_CAPACITY);
    }

    #[test]
    fn test_reserve_on_sentinel_allocates_exactly() {
        let mut vec = HeaderVec::new();
        vec.reserve(37).unwrap();
        assert!(vec.is_allocated());
        assert_eq!(vec.len(), 0);
        assert!(vec.capacity() >= 37);
        if default_allocator().name() == "size-hint" {
            assert_eq!(vec.capacity(), 37);
        }
    }

    #[test]
    fn test_reserve_fast_path_does_not_reallocate() {
        let tracker = TrackingAllocator::new(&SizeHintAllocator);
        let mut vec = HeaderVec::with_capacity_in(64, &tracker).unwrap();
        vec.append(&[0; 40]).unwrap();
        vec.reserve(24).unwrap();
        vec.reserve(0).unwrap();
        assert_eq!(tracker.stats().reallocations, 0);
        assert_eq!(vec.capacity(), 64);
    }

    #[test]
    fn test_over_provisioned_room_is_used_before_growing() {
        let arena = BumpArena::with_capacity(4096).unwrap();
        let tracker = TrackingAllocator::new(&arena);
        let mut vec = HeaderVec::with_capacity_in(1, &tracker).unwrap();
        // The arena rounds block sizes up to MIN_ALIGN.
        assert_eq!(vec.capacity(), 16);

        vec.append(&[1; 16]).unwrap();
        vec.reserve(0).unwrap();
        assert_eq!(tracker.stats().reallocations, 0);
        assert_eq!(vec.as_slice(), &[1; 16]);

        vec.append(&[2]).unwrap();
        assert_eq!(tracker.stats().reallocations, 1);
        assert_eq!(vec.capacity(), 32);
    }

    #[test]
    fn test_reserve_doubles() {
        let tracker = TrackingAllocator::new(&SizeHintAllocator);
        let mut vec = HeaderVec::with_capacity_in(16, &tracker).unwrap();
        vec.append(&[1; 16]).unwrap();
        vec.reserve(1).unwrap();
        assert_eq!(vec.capacity(), 32);
        vec.reserve(100).unwrap();
        assert_eq!(vec.capacity(), 128);
        assert_eq!(vec.len(), 16);
        assert_eq!(vec.as_slice(), &[1; 16]);
        assert_eq!(tracker.stats().reallocations, 2);
    }

    #[test]
    fn test_reserve_from_zero_capacity_is_exact() {
        let mut vec = HeaderVec::with_capacity_in(0, &SizeHintAllocator).unwrap();
        vec.reserve(5).unwrap();
        assert_eq!(vec.capacity(), 5);
    }

    #[test]
    fn test_reserve_overflow_leaves_vector_unchanged() {
        let mut vec = HeaderVec::with_capacity_in(16, &SizeHintAllocator).unwrap();
        vec.append(&[9; 10]).unwrap();

        let err = vec.reserve(usize::MAX - 5).unwrap_err();
        assert_eq!(err.status().code(), 2);
        let err = vec.reserve(MAX_CAPACITY - 9).unwrap_err();
        assert_eq!(err.status().code(), 2);

        assert_eq!(vec.len(), 10);
        assert_eq!(vec.capacity(), 16);
        assert_eq!(vec.as_slice(), &[9; 10]);
    }

    #[test]
    fn test_reserve_overflow_on_sentinel() {
        let mut vec = HeaderVec::new();
        let err = vec.reserve(usize::MAX).unwrap_err();
        assert_eq!(err.status().code(), 2);
        assert!(!vec.is_allocated());
    }

    #[test]
    fn test_reserve_allocation_failure_leaves_vector_unchanged() {
        let mut vec = HeaderVec::with_capacity_in(8, &NoRealloc).unwrap();
        vec.append(b"12345678").unwrap();
        let ptr = vec.as_ptr();

        let err = vec.reserve(1).unwrap_err();
        assert_eq!(err.status().code(), 1);
        assert!(!err.is_completed());
        assert_eq!(vec.as_ptr(), ptr);
        assert_eq!(vec.capacity(), 8);
        assert_eq!(vec.as_slice(), b"12345678");
    }

    #[test]
    fn test_reserve_huge_request_fails_cleanly() {
        let mut vec = HeaderVec::with_capacity_in(8, &SizeHintAllocator).unwrap();
        vec.append(b"abc").unwrap();
        // Representable, but no allocator can satisfy it.
        let err = vec.reserve(MAX_CAPACITY - 3).unwrap_err();
        assert_eq!(err.status().code(), 1);
        assert_eq!(vec.as_slice(), b"abc");
        assert_eq!(vec.capacity(), 8);
    }
}
