//! The morel value space.
//!
//! Values are 64-bit [`Word`]s. Scalars (ints, chars, floats, enums,
//! constants of discriminated unions) are stored inline; everything else is
//! a tagged reference to a cell of words in a [`Heap`].
//!
//! # Relocation
//!
//! The heap is free to move its storage whenever it allocates. Words stay
//! valid across a move; a [`BodyView`] derived from a word does not. Every
//! move advances the heap's epoch, every view remembers the epoch it was
//! derived at, and reading through a view from an older epoch is fatal.
//! Code that allocates while it traverses a value holds on to words and
//! re-derives its views afterwards.
//!
//! # Tagging
//!
//! A reference word is `(cell index << TAG_BITS) | primary tag`. A local
//! secondary tag lives in the same bits as the cell index, so a constant
//! needs no cell at all. See [`TaggedValue`].

#![warn(clippy::allow_attributes_without_reason)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    reason = "words are reinterpreted between u64, i64 and usize by construction"
)]

mod build;
mod error;
mod heap;
mod tagged;
mod word;

pub use error::HeapError;
pub use heap::{BodyView, Heap, HeapConfig};
pub use tagged::TaggedValue;
pub use word::Word;
