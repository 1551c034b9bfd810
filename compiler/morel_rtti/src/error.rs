//! Load-time descriptor errors.

/// A problem found while building or querying descriptor tables.
///
/// These are ordinary recoverable errors: they surface while a module's
/// descriptors are being registered, before any value is compared.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum RttiError {
    #[error("type constructor `{0}` is declared twice")]
    DuplicateTypeCtor(String),
    #[error("no type constructor with id {0}")]
    UnknownTypeCtor(u32),
    #[error("type constructor `{0}` is already defined")]
    AlreadyDefined(String),
    #[error("builtin type constructor `{0}` cannot be redefined")]
    BuiltinRedefinition(String),
    #[error("type constructor `{0}` was declared but never defined")]
    Undefined(String),
    #[error("type `{0}` has no constructors")]
    EmptyType(String),
    #[error("`{ctor}` mentions type variable {var}, which it does not bind")]
    UnboundTypeVar { ctor: String, var: u16 },
    #[error("functor `{functor}` of `{ctor}` mentions existential variable {var}, which it does not bind")]
    UnboundExistVar {
        ctor: String,
        functor: String,
        var: u16,
    },
    #[error("`{ctor}` expects {expected} type arguments, found {found}")]
    ArityMismatch {
        ctor: String,
        expected: u16,
        found: usize,
    },
    #[error("equivalence type `{0}` expands to itself")]
    EquivalenceCycle(String),
    #[error("functor `{functor}` of `{ctor}` refers to typeclass info {index}, but has only {count}")]
    ExistLocation {
        ctor: String,
        functor: String,
        index: u16,
        count: u16,
    },
    #[error("equivalence type `{0}` cannot carry user-defined equality")]
    UserProcsOnEquivalence(String),
    #[error("`{0}` can only be unified and compared by user-defined procedures, but has none")]
    MissingUserProcs(String),
    #[error("primary tag count must be between 2 and {max}, got {got}")]
    PrimaryTagCount { got: u8, max: u8 },
}
