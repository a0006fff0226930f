use crate::ByteAllocator;

/// `true` when this target exposes a native usable-size query.
pub const HAS_NATIVE_USABLE_SIZE: bool = false;

/// Whether the default binding should pick a native allocator over the
/// size-hint shim. There is none on this target.
pub const PREFER_NATIVE: bool = false;

/// No native usable-size query on this target; the size-hint shim stands in.
pub fn native_allocator() -> Option<&'static (dyn ByteAllocator + Sync)> {
    None
}
