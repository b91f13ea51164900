//! C FFI - Stable ABI for generated code
//!
//! Design: Thin `extern "C"` wrappers with:
//! 1. Managed block lifecycle (alloc, retain, release)
//! 2. Slot buffers behind opaque handles
//! 3. Bit-pattern conversions for NUMBER slots
//! 4. Error propagation via status codes (no unwinding across the boundary)

mod buffer;
mod refcount;

pub use buffer::{
    slotrc_buffer_free, slotrc_buffer_get, slotrc_buffer_length, slotrc_buffer_new,
    slotrc_buffer_push,
};
pub use refcount::{slotrc_alloc, slotrc_refcount, slotrc_release, slotrc_retain};

/// Operation succeeded
pub const SLOTRC_OK: i32 = 0;
/// Null handle or out pointer
pub const SLOTRC_ERR_NULL: i32 = -1;
/// Index outside `0..length`
pub const SLOTRC_ERR_INDEX: i32 = -2;
/// Capacity arithmetic overflowed
pub const SLOTRC_ERR_CAPACITY: i32 = -3;

/// Reinterpret a NUMBER as a slot word
#[no_mangle]
pub extern "C" fn slotrc_f64_to_u64(value: f64) -> u64 {
    crate::slot::f64_to_word(value)
}

/// Reinterpret a slot word as a NUMBER
#[no_mangle]
pub extern "C" fn slotrc_u64_to_f64(bits: u64) -> f64 {
    crate::slot::word_to_f64(bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::ptr;

    #[test]
    fn test_number_conversion() {
        assert_eq!(slotrc_f64_to_u64(1.0), 0x3FF0_0000_0000_0000);
        assert_eq!(slotrc_u64_to_f64(slotrc_f64_to_u64(-7.25)), -7.25);
    }

    #[test]
    fn test_buffer_through_c_api() {
        let buffer = slotrc_buffer_new();
        assert!(!buffer.is_null());

        for i in 0..23 {
            assert_eq!(slotrc_buffer_push(buffer, slotrc_f64_to_u64(i as f64)), SLOTRC_OK);
        }
        assert_eq!(slotrc_buffer_length(buffer), 23.0);

        let mut out = 0u64;
        assert_eq!(slotrc_buffer_get(buffer, 22.0, &mut out), SLOTRC_OK);
        assert_eq!(slotrc_u64_to_f64(out), 22.0);

        out = 0xFFFF;
        assert_eq!(slotrc_buffer_get(buffer, 23.0, &mut out), SLOTRC_ERR_INDEX);
        assert_eq!(slotrc_buffer_get(buffer, -1.0, &mut out), SLOTRC_ERR_INDEX);
        assert_eq!(out, 0xFFFF, "out pointer untouched on failure");

        assert_eq!(slotrc_buffer_get(buffer, 0.0, ptr::null_mut()), SLOTRC_ERR_NULL);
        slotrc_buffer_free(buffer);
    }

    #[test]
    fn test_null_handles() {
        assert_eq!(slotrc_buffer_push(ptr::null_mut(), 1), SLOTRC_ERR_NULL);
        assert_eq!(slotrc_buffer_length(ptr::null()), 0.0);
        let mut out = 0u64;
        assert_eq!(slotrc_buffer_get(ptr::null(), 0.0, &mut out), SLOTRC_ERR_NULL);
        slotrc_buffer_free(ptr::null_mut());

        slotrc_retain(ptr::null_mut());
        slotrc_release(ptr::null_mut());
        assert_eq!(slotrc_refcount(ptr::null()), 0);
    }

    #[test]
    fn test_refcount_through_c_api() {
        let obj = slotrc_alloc(24);
        assert!(!obj.is_null());
        assert_eq!(slotrc_refcount(obj), 1);

        slotrc_retain(obj);
        assert_eq!(slotrc_refcount(obj), 2);

        slotrc_release(obj);
        assert_eq!(slotrc_refcount(obj), 1);
        slotrc_release(obj);
    }
}
