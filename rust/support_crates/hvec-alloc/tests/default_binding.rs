//! Runs in its own process: binding the default is a one-time, process-wide event.

use hvec_alloc::{ByteAllocator, SizeHintAllocator, default_allocator, set_default_allocator};

static CUSTOM: SizeHintAllocator = SizeHintAllocator;

#[test]
fn test_explicit_default_binding() {
    set_default_allocator(&CUSTOM).expect("first binding succeeds");

    let bound = default_allocator();
    assert!(std::ptr::addr_eq(bound, &CUSTOM));
    assert_eq!(bound.name(), "size-hint");

    let err = set_default_allocator(&CUSTOM).unwrap_err();
    assert!(matches!(
        err.kind(),
        hvec_common::ErrorKind::DefaultAlreadyBound
    ));
}
