//! Reference counted smart pointer over the managed allocator
//!
//! `Rc<T>` is the scoped form of the retain/release protocol: cloning
//! retains, dropping releases, and the value is dropped in place right
//! before the last owner frees the block. Shared ownership semantics are the
//! same as the raw API (many owners, freed when the last one leaves), but a
//! handle can never be released twice or used after its block is gone.
//!
//! Not `Send`/`Sync`: counts are plain integers.

use crate::allocator::{self, BLOCK_ALIGN};
use core::fmt;
use core::marker::PhantomData;
use core::ops::Deref;
use core::ptr::NonNull;

/// Owning handle to a value stored in a managed block
pub struct Rc<T> {
    ptr: NonNull<T>,
    _marker: PhantomData<T>,
}

impl<T> Rc<T> {
    const ALIGN_FITS_BLOCK: () = assert!(
        core::mem::align_of::<T>() <= BLOCK_ALIGN,
        "managed payloads cannot be aligned beyond the block header"
    );

    /// Move `value` into a fresh block with a single owner
    pub fn new(value: T) -> Self {
        let () = Self::ALIGN_FITS_BLOCK;

        let ptr = allocator::alloc(core::mem::size_of::<T>()).cast::<T>();
        unsafe { ptr.as_ptr().write(value) };

        Self { ptr, _marker: PhantomData }
    }

    /// Number of owners of the underlying block
    #[inline]
    pub fn strong_count(this: &Self) -> usize {
        unsafe { allocator::ref_count(this.ptr.cast()) }
    }

    /// Whether two handles share one block
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        this.ptr == other.ptr
    }

    /// Payload address (valid while any owner remains)
    #[inline]
    pub fn as_ptr(this: &Self) -> *const T {
        this.ptr.as_ptr()
    }

    /// Mutable access when this handle is the sole owner
    #[inline]
    pub fn get_mut(this: &mut Self) -> Option<&mut T> {
        if Self::strong_count(this) == 1 {
            Some(unsafe { this.ptr.as_mut() })
        } else {
            None
        }
    }

    /// Give up the handle without releasing; the count it held travels with the pointer
    #[inline]
    pub fn into_raw(this: Self) -> NonNull<T> {
        let ptr = this.ptr;
        core::mem::forget(this);
        ptr
    }

    /// Adopt one count previously detached with [`Rc::into_raw`]
    ///
    /// # Safety
    /// `ptr` must come from `Rc::<T>::into_raw` (or an equivalent retain) and
    /// the count it represents must not be adopted twice.
    #[inline]
    pub unsafe fn from_raw(ptr: NonNull<T>) -> Self {
        Self { ptr, _marker: PhantomData }
    }
}

impl<T> Clone for Rc<T> {
    #[inline]
    fn clone(&self) -> Self {
        unsafe { allocator::retain(self.ptr.cast()) };
        Self { ptr: self.ptr, _marker: PhantomData }
    }
}

impl<T> Drop for Rc<T> {
    fn drop(&mut self) {
        let payload = self.ptr.cast::<u8>();
        unsafe {
            if allocator::ref_count(payload) == 1 {
                core::ptr::drop_in_place(self.ptr.as_ptr());
            }
            allocator::release(payload);
        }
    }
}

impl<T> Deref for Rc<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        unsafe { self.ptr.as_ref() }
    }
}

impl<T> AsRef<T> for Rc<T> {
    fn as_ref(&self) -> &T {
        self
    }
}

impl<T: fmt::Debug> fmt::Debug for Rc<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<T: fmt::Display> fmt::Display for Rc<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&**self, f)
    }
}

impl<T: PartialEq> PartialEq for Rc<T> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}
