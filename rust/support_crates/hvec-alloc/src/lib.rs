//! Byte allocators for header-prefixed vectors.
//!
//! A vector is bound to exactly one [`ByteAllocator`] for its entire lifetime.
//! Arena or pool strategies plug in by implementing the trait; the growth
//! logic built on top of it only sees raw blocks and their usable size.
//!
//! The usable-size query is what lets a vector avoid reallocating on every
//! growth step. Targets with a native query (`malloc_size` on Apple platforms,
//! `malloc_usable_size` on glibc, `HeapSize` on Windows) expose it through
//! `NativeAllocator`; everywhere else, the [`SizeHintAllocator`] records the
//! requested size in a hidden slot ahead of each block.

use std::ptr::NonNull;

pub mod arena;
pub mod default;
pub mod size_hint;
pub mod tracking;

#[cfg_attr(target_vendor = "apple", path = "native_apple.rs")]
#[cfg_attr(
    all(target_os = "linux", target_env = "gnu"),
    path = "native_linux.rs"
)]
#[cfg_attr(windows, path = "native_win.rs")]
#[cfg_attr(
    not(any(
        target_vendor = "apple",
        all(target_os = "linux", target_env = "gnu"),
        windows
    )),
    path = "native_fallback.rs"
)]
pub mod native;

pub use arena::BumpArena;
pub use default::{default_allocator, platform_allocator, set_default_allocator};
#[cfg(any(
    target_vendor = "apple",
    all(target_os = "linux", target_env = "gnu"),
    windows
))]
pub use native::NativeAllocator;
pub use native::HAS_NATIVE_USABLE_SIZE;
pub use size_hint::SizeHintAllocator;
pub use tracking::{AllocationStats, TrackingAllocator};

/// Minimum alignment of every block handed out by a [`ByteAllocator`].
///
/// Matches the guarantee of the C `malloc` family on mainstream targets.
pub const MIN_ALIGN: usize = 2 * std::mem::size_of::<usize>();

/// Raw block allocator bound to a vector at creation.
///
/// # Safety
///
/// Implementors must guarantee that:
/// - Every returned block is aligned to at least [`MIN_ALIGN`] bytes.
/// - `usable_size` reports no less than the size last requested for the block,
///   and every byte up to the reported size may be read and written.
/// - `reallocate` preserves the first `min(usable_size(block), size)` bytes,
///   and on failure leaves `block` untouched and still valid.
/// - A block is only ever released through the allocator that produced it.
pub unsafe trait ByteAllocator {
    /// Allocates a block of at least `size` usable bytes.
    ///
    /// Returns `None` if the request cannot be satisfied.
    fn allocate(&self, size: usize) -> Option<NonNull<u8>>;

    /// Resizes `block` to at least `size` usable bytes, possibly relocating it.
    ///
    /// # Safety
    ///
    /// `block` must have been returned by this allocator and not yet released.
    /// On success the old pointer must no longer be used.
    unsafe fn reallocate(&self, block: NonNull<u8>, size: usize) -> Option<NonNull<u8>>;

    /// Returns the number of bytes actually usable in `block`.
    ///
    /// # Safety
    ///
    /// `block` must have been returned by this allocator and not yet released.
    unsafe fn usable_size(&self, block: NonNull<u8>) -> usize;

    /// Releases `block`.
    ///
    /// # Safety
    ///
    /// `block` must have been returned by this allocator and not yet released.
    unsafe fn release(&self, block: NonNull<u8>);

    /// Short name used in diagnostics.
    fn name(&self) -> &'static str {
        "custom"
    }
}
