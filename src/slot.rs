//! Slot encoding - 64-bit words and the typed values stored in them
//!
//! Design: The buffer itself stores untagged [`Word`]s. Element types are
//! fixed per array instantiation through [`Slot`], so the numeric and pointer
//! interpretations of a word can never be mixed up by accident:
//! - `f64`: raw IEEE-754 bit pattern (NaN payloads preserved)
//! - `Rc<T>`: payload address of a managed block; the slot owns one count
//! - `Value<T>`: either of the above, NaN-boxed into a single word
//! - `Word`: the raw word, for callers that carry their own type knowledge

use crate::refcount::Rc;
use core::fmt;
use core::mem::ManuallyDrop;
use core::ptr::NonNull;

/// Opaque 64-bit storage unit
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Word(pub u64);

impl Word {
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn from_f64(value: f64) -> Self {
        Self(f64_to_word(value))
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        word_to_f64(self.0)
    }

    /// Word holding an address
    #[inline]
    pub fn from_ptr<T>(ptr: NonNull<T>) -> Self {
        Self(ptr.as_ptr() as usize as u64)
    }

    /// Address held by this word; `None` for the null word
    #[inline]
    pub fn as_ptr<T>(self) -> Option<NonNull<T>> {
        NonNull::new(self.0 as usize as *mut T)
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({:#018x})", self.0)
    }
}

/// Reinterpret a double as its bit pattern
#[inline]
pub fn f64_to_word(value: f64) -> u64 {
    value.to_bits()
}

/// Reinterpret a bit pattern as a double
#[inline]
pub fn word_to_f64(bits: u64) -> f64 {
    f64::from_bits(bits)
}

/// Type that can live in a buffer slot
///
/// A word produced by `into_word` carries whatever ownership `self` had; the
/// holder of the word is responsible for eventually turning it back into a
/// value with `from_word` so that ownership is released.
pub trait Slot: Sized {
    /// Encode, transferring ownership into the word
    fn into_word(self) -> Word;

    /// Decode, taking back the ownership held by the word
    ///
    /// # Safety
    /// `word` must come from `Self::into_word` and must not be decoded with
    /// `from_word` more than once.
    unsafe fn from_word(word: Word) -> Self;

    /// Decode a shared copy, leaving the word's own ownership in place
    ///
    /// # Safety
    /// `word` must come from `Self::into_word` and must still be held.
    unsafe fn clone_from_word(word: Word) -> Self;
}

impl Slot for Word {
    #[inline]
    fn into_word(self) -> Word {
        self
    }

    #[inline]
    unsafe fn from_word(word: Word) -> Self {
        word
    }

    #[inline]
    unsafe fn clone_from_word(word: Word) -> Self {
        word
    }
}

impl Slot for f64 {
    #[inline]
    fn into_word(self) -> Word {
        Word::from_f64(self)
    }

    #[inline]
    unsafe fn from_word(word: Word) -> Self {
        word.as_f64()
    }

    #[inline]
    unsafe fn clone_from_word(word: Word) -> Self {
        word.as_f64()
    }
}

impl<T> Slot for Rc<T> {
    #[inline]
    fn into_word(self) -> Word {
        Word::from_ptr(Rc::into_raw(self))
    }

    #[inline]
    unsafe fn from_word(word: Word) -> Self {
        Rc::from_raw(NonNull::new_unchecked(word.0 as usize as *mut T))
    }

    #[inline]
    unsafe fn clone_from_word(word: Word) -> Self {
        let held = ManuallyDrop::new(Self::from_word(word));
        Rc::clone(&held)
    }
}

// NaN-boxing layout for `Value`:
// - Numbers: their own bits, with every NaN canonicalised to CANONICAL_NAN
// - Objects: OBJECT_TAG in the top 16 bits, payload address in the low 48
const TAG_MASK: u64 = 0xFFFF_0000_0000_0000;
const OBJECT_TAG: u64 = 0xFFFC_0000_0000_0000;
const ADDRESS_MASK: u64 = !TAG_MASK;

/// Tag an object address
///
/// Panics if the address uses any of the top 16 bits (tagged heaps,
/// 57-bit address spaces): the tag would overwrite them.
#[inline]
fn box_address(address: u64) -> Word {
    assert!(
        address & TAG_MASK == 0,
        "object address {:#x} does not fit in 48 bits",
        address
    );
    Word(OBJECT_TAG | address)
}
const CANONICAL_NAN: u64 = 0x7FF8_0000_0000_0000;

/// Number-or-object value for arrays holding mixed content
#[derive(Debug, PartialEq)]
pub enum Value<T> {
    Number(f64),
    Object(Rc<T>),
}

impl<T> Value<T> {
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Object(_) => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&Rc<T>> {
        match self {
            Self::Number(_) => None,
            Self::Object(rc) => Some(rc),
        }
    }

    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }
}

impl<T> Clone for Value<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Number(n) => Self::Number(*n),
            Self::Object(rc) => Self::Object(rc.clone()),
        }
    }
}

impl<T> From<f64> for Value<T> {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl<T> From<Rc<T>> for Value<T> {
    fn from(rc: Rc<T>) -> Self {
        Self::Object(rc)
    }
}

impl<T> Slot for Value<T> {
    fn into_word(self) -> Word {
        match self {
            Self::Number(n) if n.is_nan() => Word(CANONICAL_NAN),
            Self::Number(n) => Word::from_f64(n),
            Self::Object(rc) => {
                let word = box_address(Rc::as_ptr(&rc) as usize as u64);
                let _ = Rc::into_raw(rc);
                word
            }
        }
    }

    unsafe fn from_word(word: Word) -> Self {
        if word.0 & TAG_MASK == OBJECT_TAG {
            Self::Object(Rc::from_word(Word(word.0 & ADDRESS_MASK)))
        } else {
            Self::Number(word.as_f64())
        }
    }

    unsafe fn clone_from_word(word: Word) -> Self {
        if word.0 & TAG_MASK == OBJECT_TAG {
            Self::Object(Rc::clone_from_word(Word(word.0 & ADDRESS_MASK)))
        } else {
            Self::Number(word.as_f64())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_address_low_48_bits() {
        let word = box_address(0x7F00_0000_1000);
        assert_eq!(word.0, 0xFFFC_7F00_0000_1000);
        assert_eq!(word.0 & ADDRESS_MASK, 0x7F00_0000_1000);
    }

    #[test]
    #[should_panic(expected = "does not fit in 48 bits")]
    fn test_box_address_rejects_high_bits() {
        box_address(0xB400_7F00_0000_1000);
    }

    #[test]
    fn test_f64_bits_preserved() {
        for value in [0.0, -0.0, 1.5, f64::MIN_POSITIVE, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(word_to_f64(f64_to_word(value)).to_bits(), value.to_bits());
        }

        // Signalling NaN with a payload survives the raw conversion untouched
        let nan = f64::from_bits(0x7FF0_0000_0000_0BAD);
        assert_eq!(f64_to_word(nan), 0x7FF0_0000_0000_0BAD);
    }

    #[test]
    fn test_known_bit_patterns() {
        assert_eq!(f64_to_word(1.0), 0x3FF0_0000_0000_0000);
        assert_eq!(f64_to_word(-2.0), 0xC000_0000_0000_0000);
        assert_eq!(word_to_f64(0x4045_0000_0000_0000), 42.0);
    }

    #[test]
    fn test_word_pointer_round_trip() {
        let mut target = 5u32;
        let ptr = NonNull::from(&mut target);
        let word = Word::from_ptr(ptr);
        assert_eq!(word.as_ptr::<u32>(), Some(ptr));
        assert_eq!(Word::default().as_ptr::<u32>(), None);
    }

    #[test]
    fn test_rc_word_owns_one_count() {
        let rc = Rc::new(9u16);
        let word = rc.clone().into_word();
        assert_eq!(Rc::strong_count(&rc), 2);

        let shared = unsafe { <Rc<u16> as Slot>::clone_from_word(word) };
        assert_eq!(Rc::strong_count(&rc), 3);
        drop(shared);

        let adopted = unsafe { <Rc<u16> as Slot>::from_word(word) };
        assert!(Rc::ptr_eq(&adopted, &rc));
        drop(adopted);
        assert_eq!(Rc::strong_count(&rc), 1);
    }

    #[test]
    fn test_value_tags_objects_and_numbers() {
        let rc = Rc::new(String::from("boxed"));
        let word = Value::Object(rc.clone()).into_word();
        assert_eq!(word.0 & TAG_MASK, OBJECT_TAG);

        let value: Value<String> = unsafe { Value::from_word(word) };
        assert_eq!(value.as_object().map(|s| s.as_str()), Some("boxed"));
        drop(value);
        assert_eq!(Rc::strong_count(&rc), 1);

        for n in [0.0, -1.25, f64::NEG_INFINITY, f64::MAX] {
            let value: Value<String> = unsafe { Value::from_word(Value::<String>::Number(n).into_word()) };
            assert_eq!(value.as_number(), Some(n));
        }
    }

    #[test]
    fn test_value_nan_is_canonicalised() {
        let negative_nan = f64::from_bits(0xFFFC_0000_0000_1234);
        let word = Value::<u8>::Number(negative_nan).into_word();
        assert_eq!(word.0, CANONICAL_NAN);

        let value: Value<u8> = unsafe { Value::from_word(word) };
        assert!(value.as_number().is_some_and(f64::is_nan));
    }
}
