//! Block header - hidden metadata prefixed before every managed payload
//!
//! Design: Fixed-size, fixed-alignment header so the payload is always
//! reached by a constant offset. Callers only ever see the payload address.

use core::ptr::NonNull;

/// Header size in bytes; the payload starts exactly this far past the block start
pub const HEADER_SIZE: usize = core::mem::size_of::<RcHeader>();

/// Alignment of every block, and therefore of every payload
pub const BLOCK_ALIGN: usize = core::mem::align_of::<RcHeader>();

/// Reference count header (16 bytes)
///
/// `count` is the number of logical owners and stays at 1 or above while the
/// block is live. `size` is the payload size requested at allocation; it is
/// needed to rebuild the `Layout` when the block is returned to the system.
#[repr(C, align(16))]
#[derive(Debug)]
pub struct RcHeader {
    pub count: usize,
    pub size: usize,
}

const _: () = assert!(HEADER_SIZE == 16);

impl RcHeader {
    /// Header for a freshly allocated block with a single owner
    #[inline]
    pub const fn new(size: usize) -> Self {
        Self { count: 1, size }
    }

    /// Get header from payload pointer (header is `HEADER_SIZE` bytes before it)
    ///
    /// # Safety
    /// `payload` must have been returned by [`super::alloc`] and not yet freed.
    #[inline(always)]
    pub unsafe fn from_payload(payload: NonNull<u8>) -> NonNull<RcHeader> {
        NonNull::new_unchecked(payload.as_ptr().sub(HEADER_SIZE) as *mut RcHeader)
    }

    /// Payload address for a block starting at `header`
    ///
    /// # Safety
    /// `header` must point to the start of a block of at least `HEADER_SIZE` bytes.
    #[inline(always)]
    pub unsafe fn payload(header: NonNull<RcHeader>) -> NonNull<u8> {
        NonNull::new_unchecked((header.as_ptr() as *mut u8).add(HEADER_SIZE))
    }
}
