//! Reference-counted allocator - header-prefixed heap blocks
//!
//! Design: Every block carries an inline [`RcHeader`] immediately before the
//! payload, so the pointer callers already hold is both the object address
//! and the key to its owner count. No side table.
//!
//! Protocol:
//! 1. `alloc` creates a block with a single owner
//! 2. `retain` records an additional owner
//! 3. `release` drops one owner, freeing the block when the caller is the last one
//!
//! The count never reaches zero: `release` frees when it observes 1.
//! Double-release, use-after-free and missing retains are caller contract
//! violations and are not detected here; [`crate::Rc`] rules them out
//! structurally.

mod header;
mod stats;


pub use header::{RcHeader, BLOCK_ALIGN, HEADER_SIZE};
pub use stats::{stats, AllocatorStats};
pub(crate) use stats::record_storage;

use crate::logging::{log_allocation, log_deallocation, trace};
use core::ptr::NonNull;
use std::alloc::{handle_alloc_error, Layout};

/// Layout of a whole block (header + payload)
///
/// Panics if `size` plus the header cannot be represented as a `Layout`.
#[inline]
fn block_layout(size: usize) -> Layout {
    size.checked_add(HEADER_SIZE)
        .and_then(|total| Layout::from_size_align(total, BLOCK_ALIGN).ok())
        .unwrap_or_else(|| panic!("managed allocation of {} bytes overflows the address space", size))
}

/// Allocate a managed block with room for `size` payload bytes
///
/// The header is initialised with `count = 1`; the returned pointer addresses
/// the payload, which is left uninitialised. Exhaustion is fatal.
pub fn alloc(size: usize) -> NonNull<u8> {
    let layout = block_layout(size);

    let raw = unsafe { std::alloc::alloc(layout) };
    let Some(block) = NonNull::new(raw as *mut RcHeader) else {
        handle_alloc_error(layout);
    };

    let payload = unsafe {
        block.as_ptr().write(RcHeader::new(size));
        RcHeader::payload(block)
    };

    stats::record_alloc(size);
    log_allocation(size, payload.as_ptr());
    payload
}

/// Record an additional owner
///
/// # Safety
/// `payload` must come from [`alloc`] and must not have been freed.
#[inline]
pub unsafe fn retain(payload: NonNull<u8>) {
    let header = RcHeader::from_payload(payload).as_ptr();
    debug_assert!((*header).count >= 1, "retain on a freed block");
    debug_assert!((*header).count < usize::MAX, "refcount overflow");

    (*header).count += 1;

    stats::record_retain();
    trace!(event = "retain", address = ?payload.as_ptr(), count = (*header).count);
}

/// Drop one owner; the block is returned to the system if the caller was the last
///
/// # Safety
/// `payload` must come from [`alloc`], must not have been freed, and the
/// caller must actually hold one of the counted references.
#[inline]
pub unsafe fn release(payload: NonNull<u8>) {
    let header = RcHeader::from_payload(payload);
    let count = (*header.as_ptr()).count;
    debug_assert!(count >= 1, "release on a freed block");

    stats::record_release();

    if count == 1 {
        free_block(header);
    } else {
        (*header.as_ptr()).count = count - 1;
        trace!(event = "release", address = ?payload.as_ptr(), count = count - 1);
    }
}

/// Return header and payload to the system together (cold path)
#[cold]
#[inline(never)]
unsafe fn free_block(header: NonNull<RcHeader>) {
    let size = (*header.as_ptr()).size;
    let payload = RcHeader::payload(header);

    std::alloc::dealloc(header.as_ptr() as *mut u8, block_layout(size));

    stats::record_free(size);
    log_deallocation(payload.as_ptr());
}

/// Current number of owners (for debugging/testing)
///
/// # Safety
/// `payload` must come from [`alloc`] and must not have been freed.
#[inline]
pub unsafe fn ref_count(payload: NonNull<u8>) -> usize {
    (*RcHeader::from_payload(payload).as_ptr()).count
}

/// Payload size requested when the block was allocated
///
/// # Safety
/// `payload` must come from [`alloc`] and must not have been freed.
#[inline]
pub unsafe fn payload_size(payload: NonNull<u8>) -> usize {
    (*RcHeader::from_payload(payload).as_ptr()).size
}
