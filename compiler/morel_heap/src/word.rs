//! Machine words.

use std::fmt;

use morel_rtti::TAG_BITS;

const TAG_MASK: u64 = (1 << TAG_BITS) - 1;

/// One word of the value space.
///
/// A word has no type of its own; the static type of the value it holds
/// decides how to read it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Word(u64);

impl Word {
    pub const ZERO: Word = Word(0);

    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Word(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn from_int(value: i64) -> Self {
        Word(value as u64)
    }

    #[inline]
    pub const fn as_int(self) -> i64 {
        self.0 as i64
    }

    #[inline]
    pub const fn from_char(value: char) -> Self {
        Word(value as u64)
    }

    /// Floats are stored unboxed, as their IEEE bit pattern.
    #[inline]
    pub fn from_float(value: f64) -> Self {
        Word(value.to_bits())
    }

    #[inline]
    pub fn as_float(self) -> f64 {
        f64::from_bits(self.0)
    }

    #[inline]
    pub const fn from_bool(value: bool) -> Self {
        Word(value as u64)
    }

    /// Any nonzero word is true.
    #[inline]
    pub const fn as_bool(self) -> bool {
        self.0 != 0
    }

    /// Reference to the cell at `index`, tagged with `ptag`.
    #[inline]
    pub const fn tagged(index: usize, ptag: u8) -> Self {
        Word(((index as u64) << TAG_BITS) | (ptag as u64 & TAG_MASK))
    }

    /// A constant carrying its secondary tag in the body bits.
    #[inline]
    pub const fn local(ptag: u8, sectag: u64) -> Self {
        Word((sectag << TAG_BITS) | (ptag as u64 & TAG_MASK))
    }

    #[inline]
    pub const fn ptag(self) -> u8 {
        (self.0 & TAG_MASK) as u8
    }

    /// The word with its primary tag removed and shifted down: a cell index
    /// for references, a secondary tag for local constants.
    #[inline]
    pub const fn body_bits(self) -> u64 {
        self.0 >> TAG_BITS
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({:#x})", self.0)
    }
}
