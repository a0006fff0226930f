//! Call-counting wrapper around any [`ByteAllocator`].

use std::cell::Cell;
use std::ptr::NonNull;

use crate::ByteAllocator;

/// Counters accumulated by a [`TrackingAllocator`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AllocationStats {
    pub allocations: u64,
    pub reallocations: u64,
    pub releases: u64,
    pub size_queries: u64,
    /// Allocate or reallocate calls that returned `None`.
    pub failures: u64,
}

/// Forwards every call to an inner allocator and counts it.
///
/// Handy for checking that a growth path does not reallocate, or that every
/// block is released exactly once.
pub struct TrackingAllocator<'a> {
    inner: &'a dyn ByteAllocator,
    stats: Cell<AllocationStats>,
}

impl<'a> TrackingAllocator<'a> {
    pub fn new(inner: &'a dyn ByteAllocator) -> TrackingAllocator<'a> {
        TrackingAllocator {
            inner,
            stats: Cell::new(AllocationStats::default()),
        }
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> AllocationStats {
        self.stats.get()
    }

    /// Number of blocks allocated and not yet released.
    pub fn live_blocks(&self) -> u64 {
        let stats = self.stats.get();
        stats.allocations - stats.releases
    }

    pub fn reset_stats(&self) {
        self.stats.set(AllocationStats::default());
    }

    #[inline]
    fn update(&self, f: impl FnOnce(&mut AllocationStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

unsafe impl ByteAllocator for TrackingAllocator<'_> {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        let block = self.inner.allocate(size);
        match block {
            Some(_) => self.update(|s| s.allocations += 1),
            None => self.update(|s| s.failures += 1),
        }
        block
    }

    unsafe fn reallocate(&self, block: NonNull<u8>, size: usize) -> Option<NonNull<u8>> {
        let new_block = unsafe { self.inner.reallocate(block, size) };
        match new_block {
            Some(_) => self.update(|s| s.reallocations += 1),
            None => self.update(|s| s.failures += 1),
        }
        new_block
    }

    unsafe fn usable_size(&self, block: NonNull<u8>) -> usize {
        self.update(|s| s.size_queries += 1);
        unsafe { self.inner.usable_size(block) }
    }

    unsafe fn release(&self, block: NonNull<u8>) {
        self.update(|s| s.releases += 1);
        unsafe { self.inner.release(block) }
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

impl std::fmt::Debug for TrackingAllocator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackingAllocator")
            .field("inner", &self.inner.name())
            .field("stats", &self.stats.get())
            .finish()
    }
}
