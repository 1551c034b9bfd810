//! Handles into a [`TypeTable`](crate::TypeTable).

use std::fmt;

/// Index of a type constructor in its table.
///
/// Builtin constructors occupy fixed ids below [`TypeCtorId::FIRST_USER`],
/// registered by every new builder. Ids say nothing about ordering:
/// constructors are ordered by qualified name, see
/// [`compare_type_ctor_info`](crate::compare_type_ctor_info).
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct TypeCtorId(u32);

impl TypeCtorId {
    // === Builtin data types ===
    pub const INT: Self = Self(0);
    pub const CHAR: Self = Self(1);
    pub const FLOAT: Self = Self(2);
    pub const STRING: Self = Self(3);
    pub const C_POINTER: Self = Self(4);
    pub const STABLE_C_POINTER: Self = Self(5);
    pub const VOID: Self = Self(6);
    /// Variable-arity tuple constructor `{}`.
    pub const TUPLE: Self = Self(7);
    /// Variable-arity function type.
    pub const FUNC: Self = Self(8);
    /// Variable-arity predicate type.
    pub const PRED: Self = Self(9);
    pub const TYPE_INFO: Self = Self(10);
    pub const TYPE_CTOR_INFO: Self = Self(11);
    pub const TYPE_DESC: Self = Self(12);
    pub const TYPE_CTOR_DESC: Self = Self(13);
    pub const TYPECLASS_INFO: Self = Self(14);
    pub const BASE_TYPECLASS_INFO: Self = Self(15);
    /// `private_builtin.ref(T)`.
    pub const REFERENCE: Self = Self(16);
    /// `array.array(T)`.
    pub const ARRAY: Self = Self(17);

    // === Engine-internal pseudo-types ===
    pub const HEAP_POINTER: Self = Self(18);
    pub const SUCCIP: Self = Self(19);
    pub const CURFR: Self = Self(20);
    pub const MAXFR: Self = Self(21);
    pub const REDOFR: Self = Self(22);
    pub const REDOIP: Self = Self(23);
    pub const TICKET: Self = Self(24);
    pub const TRAIL_PTR: Self = Self(25);
    pub const SUBGOAL: Self = Self(26);

    /// First id handed out by [`TypeTableBuilder::declare`](crate::TypeTableBuilder::declare).
    pub const FIRST_USER: u32 = 27;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::FIRST_USER
    }
}

impl fmt::Debug for TypeCtorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeCtorId({})", self.0)
    }
}

/// Index of a closure layout in its table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct ClosureId(u32);

impl ClosureId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}
