//! slotrc - ownership layer for emulated script runtimes
//!
//! Two pieces, allocator below buffer:
//! - [`allocator`]: heap blocks prefixed with a hidden reference count, with
//!   the alloc/retain/release protocol and its RAII form [`Rc`]
//! - [`buffer`]: a growable sequence of 64-bit slots with bounds-checked
//!   reads, plus the typed [`SlotArray`] built on it
//!
//! Single-threaded by construction: counts are plain integers and handles
//! are neither `Send` nor `Sync`.

pub mod allocator;
pub mod array;
pub mod buffer;
pub mod config;
pub mod error;
pub mod ffi;
pub mod logging;
pub mod refcount;
pub mod runtime;
pub mod slot;

// Re-export core types
pub use allocator::{alloc, release, retain, AllocatorStats};
pub use array::SlotArray;
pub use buffer::{BufferConfig, GrowableSlotBuffer, GrowthPolicy};
pub use config::RuntimeConfig;
pub use error::{BufferError, ConfigError};
pub use refcount::Rc;
pub use slot::{f64_to_word, word_to_f64, Slot, Value, Word};
