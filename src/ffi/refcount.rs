//! Reference counting - C API for managed blocks
//!
//! Hot path operations forward straight to the allocator. Null pointers are
//! tolerated; every other pointer must come from `slotrc_alloc` and still be
//! live (double release is not detected).

use crate::allocator;
use core::ptr::NonNull;

/// Allocate a managed block of `size` payload bytes with one owner
///
/// Never returns null: exhaustion aborts the process.
#[no_mangle]
pub extern "C" fn slotrc_alloc(size: usize) -> *mut u8 {
    allocator::alloc(size).as_ptr()
}

/// Record an additional owner
///
/// # Safety
/// - Null-safe (no-op for null pointers)
/// - Otherwise `obj` must be a live block from `slotrc_alloc`
#[no_mangle]
pub extern "C" fn slotrc_retain(obj: *mut u8) {
    if let Some(obj) = NonNull::new(obj) {
        unsafe { allocator::retain(obj) };
    }
}

/// Drop one owner, freeing the block when it was the last
///
/// # Safety
/// - Null-safe (no-op for null pointers)
/// - Otherwise `obj` must be a live block from `slotrc_alloc` and the caller
///   must hold one of its counts
#[no_mangle]
pub extern "C" fn slotrc_release(obj: *mut u8) {
    if let Some(obj) = NonNull::new(obj) {
        unsafe { allocator::release(obj) };
    }
}

/// Current owner count (for debugging/testing); 0 for null
#[no_mangle]
pub extern "C" fn slotrc_refcount(obj: *const u8) -> usize {
    match NonNull::new(obj as *mut u8) {
        Some(obj) => unsafe { allocator::ref_count(obj) },
        None => 0,
    }
}
