//! Typed array - a slot buffer whose element type is fixed at compile time
//!
//! Each stored element owns whatever its word encodes: for `Rc<T>` elements
//! the array holds one count per slot, taken on `push` and given back when
//! the array is dropped. Reads return owned copies (numbers by value,
//! handles by retain), never slot addresses.

use crate::buffer::{BufferConfig, GrowableSlotBuffer, GrowthPolicy};
use crate::error::{BufferError, ConfigError};
use crate::slot::Slot;
use core::fmt;
use core::marker::PhantomData;

/// Homogeneous growable array of `T`
pub struct SlotArray<T: Slot> {
    buffer: GrowableSlotBuffer,
    _marker: PhantomData<T>,
}

impl<T: Slot> SlotArray<T> {
    pub fn new() -> Self {
        Self::from_buffer(GrowableSlotBuffer::new())
    }

    pub fn with_config(config: BufferConfig) -> Result<Self, ConfigError> {
        GrowableSlotBuffer::with_config(config).map(Self::from_buffer)
    }

    fn from_buffer(buffer: GrowableSlotBuffer) -> Self {
        Self { buffer, _marker: PhantomData }
    }

    /// Append `value`, moving its ownership into the array
    ///
    /// On failure the value is dropped rather than leaked.
    pub fn push(&mut self, value: T) -> Result<(), BufferError> {
        let word = value.into_word();
        self.buffer.push(word).map_err(|e| {
            drop(unsafe { T::from_word(word) });
            e
        })
    }

    /// Owned copy of the element at `index`
    pub fn get(&self, index: usize) -> Result<T, BufferError> {
        let word = self.buffer.get(index)?;
        Ok(unsafe { T::clone_from_word(word) })
    }

    /// Owned copy of the element at a script-supplied numeric index
    pub fn get_at(&self, index: f64) -> Result<T, BufferError> {
        let word = self.buffer.get_at(index)?;
        Ok(unsafe { T::clone_from_word(word) })
    }

    /// Relative indexing: negative indices count back from the end
    ///
    /// The index truncates toward zero first, so `-0.5` is slot 0 and
    /// `-1.5` is the last element.
    pub fn at(&self, index: f64) -> Result<T, BufferError> {
        let relative = index.trunc();
        let resolved = if relative < 0.0 { self.buffer.length() + relative } else { relative };
        if resolved < 0.0 {
            return Err(BufferError::IndexOutOfRange { index, length: self.len() });
        }
        self.get_at(resolved)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Number of elements, as seen by script code
    #[inline]
    pub fn length(&self) -> f64 {
        self.buffer.length()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    #[inline]
    pub fn growth_events(&self) -> usize {
        self.buffer.growth_events()
    }

    #[inline]
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.buffer.growth_policy()
    }

    /// Owned copies of every element in push order
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.buffer.iter().map(|word| unsafe { T::clone_from_word(word) })
    }
}

impl<T: Slot> Default for SlotArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Slot> Drop for SlotArray<T> {
    fn drop(&mut self) {
        for word in self.buffer.iter() {
            drop(unsafe { T::from_word(word) });
        }
    }
}

/// Appends through [`SlotArray::push`]
///
/// # Panics
///
/// Panics if the buffer capacity overflows. Use `push` to handle
/// [`BufferError::CapacityOverflow`] instead.
impl<T: Slot> Extend<T> for SlotArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            if let Err(e) = self.push(value) {
                panic!("SlotArray::extend: {}", e);
            }
        }
    }
}

/// Collects with the default buffer configuration
///
/// # Panics
///
/// Panics if the buffer capacity overflows, as [`Extend`] does.
impl<T: Slot> FromIterator<T> for SlotArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T: Slot + fmt::Debug> fmt::Debug for SlotArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
