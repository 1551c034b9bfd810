//! Representation kinds.
//!
//! The kind of a value is a property of its static type, never of the value
//! itself. The set is closed: the engine matches on it exhaustively.

use std::fmt;

/// How values of a type constructor are laid out in memory.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum RepresentationKind {
    // === Algebraic types ===
    /// All constructors are constants; values are small integers.
    Enum,
    /// `Enum` with user-defined equality.
    EnumUserEq,
    /// General discriminated union with primary/secondary tags.
    Du,
    /// `Du` with user-defined equality.
    DuUserEq,
    /// Single constructor with a single argument, stored without a tag.
    NoTag,
    /// `NoTag` with user-defined equality.
    NoTagUserEq,
    /// `NoTag` whose argument type mentions no type variables.
    NoTagGround,
    /// `NoTagGround` with user-defined equality.
    NoTagGroundUserEq,
    /// Type synonym; storage-identical to the target type.
    Equiv,
    /// `Equiv` whose target mentions no type variables.
    EquivGround,
    /// Discriminated union using reserved addresses (unsupported).
    ReservedAddr,
    /// `ReservedAddr` with user-defined equality.
    ReservedAddrUserEq,

    // === Builtin data ===
    Tuple,
    Int,
    Char,
    Float,
    String,
    CPointer,
    StableCPointer,
    /// Mutable reference cell; only identity is defined.
    Reference,
    TypeInfo,
    TypeCtorInfo,
    TypeDesc,
    TypeCtorDesc,
    Func,
    Pred,
    Array,
    Foreign,
    /// The type with no values.
    Void,

    // === Engine-internal pseudo-types ===
    TypeClassInfo,
    BaseTypeClassInfo,
    Subgoal,
    Hp,
    Succip,
    Curfr,
    Maxfr,
    Redofr,
    Redoip,
    Ticket,
    TrailPtr,

    /// Placeholder for a constructor whose representation is not known.
    Unknown,
}

impl RepresentationKind {
    /// Name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Enum => "ENUM",
            Self::EnumUserEq => "ENUM_USEREQ",
            Self::Du => "DU",
            Self::DuUserEq => "DU_USEREQ",
            Self::NoTag => "NOTAG",
            Self::NoTagUserEq => "NOTAG_USEREQ",
            Self::NoTagGround => "NOTAG_GROUND",
            Self::NoTagGroundUserEq => "NOTAG_GROUND_USEREQ",
            Self::Equiv => "EQUIV",
            Self::EquivGround => "EQUIV_GROUND",
            Self::ReservedAddr => "RESERVED_ADDR",
            Self::ReservedAddrUserEq => "RESERVED_ADDR_USEREQ",
            Self::Tuple => "TUPLE",
            Self::Int => "INT",
            Self::Char => "CHAR",
            Self::Float => "FLOAT",
            Self::String => "STRING",
            Self::CPointer => "C_POINTER",
            Self::StableCPointer => "STABLE_C_POINTER",
            Self::Reference => "REFERENCE",
            Self::TypeInfo => "TYPEINFO",
            Self::TypeCtorInfo => "TYPECTORINFO",
            Self::TypeDesc => "TYPEDESC",
            Self::TypeCtorDesc => "TYPECTORDESC",
            Self::Func => "FUNC",
            Self::Pred => "PRED",
            Self::Array => "ARRAY",
            Self::Foreign => "FOREIGN",
            Self::Void => "VOID",
            Self::TypeClassInfo => "TYPECLASSINFO",
            Self::BaseTypeClassInfo => "BASETYPECLASSINFO",
            Self::Subgoal => "SUBGOAL",
            Self::Hp => "HP",
            Self::Succip => "SUCCIP",
            Self::Curfr => "CURFR",
            Self::Maxfr => "MAXFR",
            Self::Redofr => "REDOFR",
            Self::Redoip => "REDOIP",
            Self::Ticket => "TICKET",
            Self::TrailPtr => "TRAIL_PTR",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Does this kind carry a user-defined equality procedure?
    pub const fn has_user_equality(self) -> bool {
        matches!(
            self,
            Self::EnumUserEq
                | Self::DuUserEq
                | Self::NoTagUserEq
                | Self::NoTagGroundUserEq
                | Self::ReservedAddrUserEq
        )
    }

    /// Kinds that never describe user data.
    pub const fn is_engine_internal(self) -> bool {
        matches!(
            self,
            Self::TypeClassInfo
                | Self::BaseTypeClassInfo
                | Self::Subgoal
                | Self::Hp
                | Self::Succip
                | Self::Curfr
                | Self::Maxfr
                | Self::Redofr
                | Self::Redoip
                | Self::Ticket
                | Self::TrailPtr
        )
    }
}

impl fmt::Display for RepresentationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests;
