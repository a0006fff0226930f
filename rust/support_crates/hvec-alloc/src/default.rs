//! Process-wide default allocator binding.
//!
//! Vectors created without an explicit allocator (including the lazily
//! allocated empty sentinel) bind to the default. The default is selected on
//! first use and never changes afterwards; [`set_default_allocator`] can
//! override the platform choice only before that happens.

use std::sync::OnceLock;

use hvec_common::{Error, Result};

use crate::{ByteAllocator, SizeHintAllocator, native};

static DEFAULT: OnceLock<&'static (dyn ByteAllocator + Sync)> = OnceLock::new();

static SIZE_HINT: SizeHintAllocator = SizeHintAllocator;

/// Returns the process-wide default allocator, binding it on first use.
pub fn default_allocator() -> &'static (dyn ByteAllocator + Sync) {
    *DEFAULT.get_or_init(|| {
        let allocator = platform_allocator();
        log::debug!("bound default vector allocator: {}", allocator.name());
        allocator
    })
}

/// Binds `allocator` as the process-wide default.
///
/// # Errors
///
/// Fails with `DefaultAlreadyBound` if the default was already set, or was
/// already bound implicitly by a previous [`default_allocator`] call.
pub fn set_default_allocator(allocator: &'static (dyn ByteAllocator + Sync)) -> Result<()> {
    DEFAULT
        .set(allocator)
        .map_err(|_| Error::default_already_bound())?;
    log::debug!("bound default vector allocator: {}", allocator.name());
    Ok(())
}

/// Returns the allocator this platform would bind by default.
///
/// A native usable-size allocator is chosen when the target provides one, the
/// target prefers it, and the `native-usable-size` feature is enabled.
/// Otherwise the size-hint shim is used.
pub fn platform_allocator() -> &'static (dyn ByteAllocator + Sync) {
    if cfg!(feature = "native-usable-size") && native::PREFER_NATIVE {
        if let Some(allocator) = native::native_allocator() {
            return allocator;
        }
    }
    &SIZE_HINT
}
