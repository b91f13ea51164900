//! Slot buffers - C API over opaque buffer handles
//!
//! A handle is created by `slotrc_buffer_new` and owned by the caller until
//! `slotrc_buffer_free`. Words are stored verbatim; any retain/release of
//! pointer words is the caller's job at this level.

use super::{SLOTRC_ERR_CAPACITY, SLOTRC_ERR_INDEX, SLOTRC_ERR_NULL, SLOTRC_OK};
use crate::buffer::GrowableSlotBuffer;
use crate::error::BufferError;
use crate::logging::log_ffi_error;
use crate::slot::Word;

/// Create an empty buffer using the runtime's buffer configuration
#[no_mangle]
pub extern "C" fn slotrc_buffer_new() -> *mut GrowableSlotBuffer {
    let buffer = GrowableSlotBuffer::with_config(crate::runtime::buffer_config())
        .unwrap_or_default();
    Box::into_raw(Box::new(buffer))
}

/// Destroy a buffer and its backing storage (null-safe)
#[no_mangle]
pub extern "C" fn slotrc_buffer_free(buffer: *mut GrowableSlotBuffer) {
    if !buffer.is_null() {
        drop(unsafe { Box::from_raw(buffer) });
    }
}

/// Append a word, growing as needed
#[no_mangle]
pub extern "C" fn slotrc_buffer_push(buffer: *mut GrowableSlotBuffer, word: u64) -> i32 {
    let Some(buffer) = (unsafe { buffer.as_mut() }) else {
        return SLOTRC_ERR_NULL;
    };

    match buffer.push(Word(word)) {
        Ok(()) => SLOTRC_OK,
        Err(e) => status(&e, "slotrc_buffer_push"),
    }
}

/// Read the word at `index` into `out`; `out` is left untouched on failure
#[no_mangle]
pub extern "C" fn slotrc_buffer_get(buffer: *const GrowableSlotBuffer, index: f64, out: *mut u64) -> i32 {
    let Some(buffer) = (unsafe { buffer.as_ref() }) else {
        return SLOTRC_ERR_NULL;
    };
    if out.is_null() {
        return SLOTRC_ERR_NULL;
    }

    match buffer.get_at(index) {
        Ok(word) => {
            unsafe { out.write(word.to_bits()) };
            SLOTRC_OK
        }
        Err(e) => status(&e, "slotrc_buffer_get"),
    }
}

/// Script-visible length; 0 for null
#[no_mangle]
pub extern "C" fn slotrc_buffer_length(buffer: *const GrowableSlotBuffer) -> f64 {
    unsafe { buffer.as_ref() }.map_or(0.0, GrowableSlotBuffer::length)
}

fn status(error: &BufferError, function: &str) -> i32 {
    match error {
        BufferError::IndexOutOfRange { .. } => SLOTRC_ERR_INDEX,
        BufferError::CapacityOverflow => {
            log_ffi_error(function, &error.to_string());
            SLOTRC_ERR_CAPACITY
        }
    }
}
