//! Errors from value builders.

/// A builder was asked for a value its type cannot have.
///
/// Only the construction helpers report these. Reading a value that is
/// inconsistent with its type is a fatal metadata error instead.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum HeapError {
    #[error("values of `{0}` cannot be built from functors")]
    NotConstructible(String),
    #[error("`{ctor}` has no functor with ordinal {ordinal}")]
    NoSuchFunctor { ctor: String, ordinal: u32 },
    #[error("functor `{functor}` of `{ctor}` takes {expected} slots, got {found}")]
    SlotCount {
        ctor: String,
        functor: String,
        expected: usize,
        found: usize,
    },
}
