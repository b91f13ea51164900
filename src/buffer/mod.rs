//! Growable slot buffer - contiguous 64-bit words with deterministic growth
//!
//! Design: The backing array is a plain heap allocation owned by exactly one
//! buffer; it is never refcounted or shared. Reads hand out copies of words,
//! never addresses, so a reallocation during `push` cannot leave a caller
//! holding a stale pointer. Borrowed views (`as_slice`, `iter`) are tied to
//! `&self` and therefore cannot outlive the next `push`.
//!
//! Lifecycle: Empty -> Populated (first push) -> Destroyed (drop). The buffer
//! never shrinks and has no `clear`.

mod growth;


pub use growth::{BufferConfig, GrowthPolicy, DEFAULT_INCREMENT, DEFAULT_INITIAL_CAPACITY};

use crate::allocator::record_storage;
use crate::error::{BufferError, ConfigError};
use crate::logging::{log_growth, log_index_rejected};
use crate::slot::Word;
use core::fmt;
use core::ptr::NonNull;
use std::alloc::{alloc, dealloc, handle_alloc_error, realloc, Layout};

/// Growable sequence of untyped 64-bit words
pub struct GrowableSlotBuffer {
    data: NonNull<Word>,
    allocated: usize,
    len: usize,
    /// Script-visible mirror of `len`
    length: f64,
    growth: GrowthPolicy,
    growth_events: usize,
}

impl GrowableSlotBuffer {
    /// Empty buffer with the default configuration
    pub fn new() -> Self {
        Self::with_valid_config(BufferConfig::default())
    }

    /// Empty buffer with explicit capacity and growth settings
    pub fn with_config(config: BufferConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: BufferConfig) -> Self {
        let layout = array_layout(config.initial_capacity)
            .unwrap_or_else(|_| panic!("initial capacity {} overflows", config.initial_capacity));

        Self {
            data: allocate(layout),
            allocated: config.initial_capacity,
            len: 0,
            length: 0.0,
            growth: config.growth,
            growth_events: 0,
        }
    }

    /// Append a word, growing the backing storage first if it is full
    ///
    /// Growth may move the storage; only indices remain meaningful across it.
    pub fn push(&mut self, word: Word) -> Result<(), BufferError> {
        if self.len == self.allocated {
            self.grow()?;
        }

        unsafe { self.data.as_ptr().add(self.len).write(word) };
        self.len += 1;
        self.length += 1.0;

        debug_assert!(self.len <= self.allocated);
        Ok(())
    }

    /// Copy of the word at `index`
    pub fn get(&self, index: usize) -> Result<Word, BufferError> {
        if index >= self.len {
            log_index_rejected(index as f64, self.len);
            return Err(BufferError::IndexOutOfRange {
                index: index as f64,
                length: self.len,
            });
        }

        Ok(unsafe { self.data.as_ptr().add(index).read() })
    }

    /// Copy of the word at a script-supplied numeric index
    ///
    /// The index truncates toward zero, then must land in `[0, len)`.
    /// NaN and infinite indices are out of range; `-0.5` reads slot 0.
    pub fn get_at(&self, index: f64) -> Result<Word, BufferError> {
        match checked_index(index, self.len) {
            Some(i) => Ok(unsafe { self.data.as_ptr().add(i).read() }),
            None => {
                log_index_rejected(index, self.len);
                Err(BufferError::IndexOutOfRange { index, length: self.len })
            }
        }
    }

    /// Number of words pushed
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of words pushed, as seen by script code
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Slots available before the next growth
    #[inline]
    pub fn capacity(&self) -> usize {
        self.allocated
    }

    /// Number of reallocations performed so far
    #[inline]
    pub fn growth_events(&self) -> usize {
        self.growth_events
    }

    #[inline]
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.growth
    }

    /// Borrowed view of the pushed words
    #[inline]
    pub fn as_slice(&self) -> &[Word] {
        unsafe { core::slice::from_raw_parts(self.data.as_ptr(), self.len) }
    }

    /// Words in push order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Word> + '_ {
        self.as_slice().iter().copied()
    }

    /// Grow to the next capacity in the policy's sequence (cold path)
    #[cold]
    fn grow(&mut self) -> Result<(), BufferError> {
        let old_capacity = self.allocated;
        let new_capacity = self
            .growth
            .next_capacity(old_capacity)
            .ok_or(BufferError::CapacityOverflow)?;
        let new_layout = array_layout(new_capacity)?;

        self.data = if old_capacity == 0 {
            allocate(new_layout)
        } else {
            let old_layout = array_layout(old_capacity)?;
            let raw = unsafe { realloc(self.data.as_ptr() as *mut u8, old_layout, new_layout.size()) };
            match NonNull::new(raw as *mut Word) {
                Some(ptr) => {
                    record_storage(old_layout.size(), new_layout.size());
                    ptr
                }
                None => handle_alloc_error(new_layout),
            }
        };

        self.allocated = new_capacity;
        self.growth_events += 1;
        log_growth(old_capacity, new_capacity, self.len);
        Ok(())
    }
}

impl Default for GrowableSlotBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for GrowableSlotBuffer {
    fn drop(&mut self) {
        if self.allocated != 0 {
            if let Ok(layout) = array_layout(self.allocated) {
                unsafe { dealloc(self.data.as_ptr() as *mut u8, layout) };
                record_storage(layout.size(), 0);
            }
        }
    }
}

impl fmt::Debug for GrowableSlotBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrowableSlotBuffer")
            .field("len", &self.len)
            .field("capacity", &self.allocated)
            .field("growth", &self.growth)
            .field("words", &self.as_slice())
            .finish()
    }
}

/// Resolve a numeric index against `len`
#[inline]
pub(crate) fn checked_index(index: f64, len: usize) -> Option<usize> {
    if !index.is_finite() {
        return None;
    }

    // Truncate first: (-1, 0) lands on slot 0
    let i = index.trunc();
    if i < 0.0 || i >= len as f64 {
        None
    } else {
        Some(i as usize)
    }
}

#[inline]
fn array_layout(capacity: usize) -> Result<Layout, BufferError> {
    Layout::array::<Word>(capacity).map_err(|_| BufferError::CapacityOverflow)
}

/// Fresh backing storage; zero capacity uses a dangling pointer and no allocation
fn allocate(layout: Layout) -> NonNull<Word> {
    if layout.size() == 0 {
        return NonNull::dangling();
    }

    let raw = unsafe { alloc(layout) };
    match NonNull::new(raw as *mut Word) {
        Some(ptr) => {
            record_storage(0, layout.size());
            ptr
        }
        None => handle_alloc_error(layout),
    }
}
