//! Type infos and pseudo type infos.
//!
//! A [`TypeInfo`] is a fully instantiated type: a constructor applied to
//! argument type infos. A [`PseudoTypeInfo`] is a type as written in a
//! descriptor, which may still mention the enclosing constructor's type
//! parameters or a functor's existentially quantified variables.

use std::fmt;
use std::sync::Arc;

use crate::TypeCtorId;

/// An instantiated type.
///
/// Immutable and cheap to clone; clones share the same node. For
/// fixed-arity constructors the argument count always equals the declared
/// arity; for variable-arity constructors (tuples, `func`, `pred`) it is
/// whatever was recorded at construction.
///
/// Equality here is identity of constructor ids and arguments. Semantic
/// comparison, which looks through equivalence types, is
/// [`compare_type_info`](crate::compare_type_info).
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct TypeInfo(Arc<TypeInfoNode>);

#[derive(Eq, PartialEq, Hash)]
struct TypeInfoNode {
    ctor: TypeCtorId,
    args: Box<[TypeInfo]>,
}

impl TypeInfo {
    /// Build without checking the argument count.
    ///
    /// Public construction goes through [`TypeTable::type_info`](crate::TypeTable::type_info)
    /// or the nullary builtin shorthands below.
    pub(crate) fn from_parts(ctor: TypeCtorId, args: impl Into<Box<[TypeInfo]>>) -> Self {
        TypeInfo(Arc::new(TypeInfoNode {
            ctor,
            args: args.into(),
        }))
    }

    /// Nullary constructor application. Callers guarantee `ctor` has
    /// arity zero.
    pub(crate) fn nullary(ctor: TypeCtorId) -> Self {
        TypeInfo(Arc::new(TypeInfoNode {
            ctor,
            args: Box::new([]),
        }))
    }

    pub fn int() -> Self {
        Self::nullary(TypeCtorId::INT)
    }

    pub fn char() -> Self {
        Self::nullary(TypeCtorId::CHAR)
    }

    pub fn float() -> Self {
        Self::nullary(TypeCtorId::FLOAT)
    }

    pub fn string() -> Self {
        Self::nullary(TypeCtorId::STRING)
    }

    pub fn void() -> Self {
        Self::nullary(TypeCtorId::VOID)
    }

    pub fn c_pointer() -> Self {
        Self::nullary(TypeCtorId::C_POINTER)
    }

    /// The type of type infos themselves.
    pub fn type_info() -> Self {
        Self::nullary(TypeCtorId::TYPE_INFO)
    }

    pub fn type_desc() -> Self {
        Self::nullary(TypeCtorId::TYPE_DESC)
    }

    pub fn type_ctor_info() -> Self {
        Self::nullary(TypeCtorId::TYPE_CTOR_INFO)
    }

    pub fn type_ctor_desc() -> Self {
        Self::nullary(TypeCtorId::TYPE_CTOR_DESC)
    }

    /// Tuple of the given element types. Tuples are variable-arity, so any
    /// length is valid.
    pub fn tuple(elems: impl Into<Box<[TypeInfo]>>) -> Self {
        Self::from_parts(TypeCtorId::TUPLE, elems)
    }

    /// `func` or `pred` type over the given argument types.
    pub fn higher_order(ctor: HigherOrder, args: impl Into<Box<[TypeInfo]>>) -> Self {
        let id = match ctor {
            HigherOrder::Func => TypeCtorId::FUNC,
            HigherOrder::Pred => TypeCtorId::PRED,
        };
        Self::from_parts(id, args)
    }

    #[inline]
    pub fn ctor(&self) -> TypeCtorId {
        self.0.ctor
    }

    /// Argument vector: fixed-arity arguments, or the recorded elements of a
    /// variable-arity type.
    #[inline]
    pub fn args(&self) -> &[TypeInfo] {
        &self.0.args
    }

    /// Same node, not merely equal?
    #[inline]
    pub fn ptr_eq(&self, other: &TypeInfo) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.ctor().raw())?;
        if !self.args().is_empty() {
            f.debug_list().entries(self.args()).finish()?;
        }
        Ok(())
    }
}

/// Which higher-order builtin a closure type uses.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum HigherOrder {
    Func,
    Pred,
}

/// A type as written in a descriptor.
///
/// Variables are 1-based. `Var(n)` is the enclosing constructor's `n`th
/// type parameter; `Exist(n)` is the `n`th existentially quantified
/// variable of the functor whose argument this is.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum PseudoTypeInfo {
    Ground(TypeInfo),
    Var(u16),
    Exist(u16),
    App(TypeCtorId, Box<[PseudoTypeInfo]>),
}

/// A variable a pseudo type info mentions that the caller could not bind.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum UnboundVar {
    Universal(u16),
    Existential(u16),
}

impl PseudoTypeInfo {
    /// Apply `ctor` to `args`, collapsing to `Ground` when no argument
    /// mentions a variable.
    pub fn app(ctor: TypeCtorId, args: Vec<PseudoTypeInfo>) -> Self {
        if args.iter().all(PseudoTypeInfo::is_ground) {
            let ground: Vec<TypeInfo> = args
                .into_iter()
                .filter_map(|arg| match arg {
                    PseudoTypeInfo::Ground(ti) => Some(ti),
                    _ => None,
                })
                .collect();
            PseudoTypeInfo::Ground(TypeInfo::from_parts(ctor, ground))
        } else {
            PseudoTypeInfo::App(ctor, args.into_boxed_slice())
        }
    }

    #[inline]
    pub fn is_ground(&self) -> bool {
        matches!(self, PseudoTypeInfo::Ground(_))
    }

    pub fn as_ground(&self) -> Option<&TypeInfo> {
        match self {
            PseudoTypeInfo::Ground(ti) => Some(ti),
            _ => None,
        }
    }

    /// Does any existential variable occur in this type?
    pub fn mentions_exist(&self) -> bool {
        match self {
            PseudoTypeInfo::Ground(_) | PseudoTypeInfo::Var(_) => false,
            PseudoTypeInfo::Exist(_) => true,
            PseudoTypeInfo::App(_, args) => args.iter().any(PseudoTypeInfo::mentions_exist),
        }
    }

    /// Substitute `params` for universal variables and `exist(n)` for
    /// existential ones.
    ///
    /// Ground types are returned without allocating.
    pub fn instantiate(
        &self,
        params: &[TypeInfo],
        exist: &mut dyn FnMut(u16) -> Option<TypeInfo>,
    ) -> Result<TypeInfo, UnboundVar> {
        match self {
            PseudoTypeInfo::Ground(ti) => Ok(ti.clone()),
            PseudoTypeInfo::Var(n) => usize::from(*n)
                .checked_sub(1)
                .and_then(|i| params.get(i))
                .cloned()
                .ok_or(UnboundVar::Universal(*n)),
            PseudoTypeInfo::Exist(n) => exist(*n).ok_or(UnboundVar::Existential(*n)),
            PseudoTypeInfo::App(ctor, args) => {
                let args = args
                    .iter()
                    .map(|arg| arg.instantiate(params, exist))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(TypeInfo::from_parts(*ctor, args))
            }
        }
    }

    /// [`instantiate`](Self::instantiate) for types with no existential
    /// variables in scope.
    pub fn instantiate_universal(&self, params: &[TypeInfo]) -> Result<TypeInfo, UnboundVar> {
        self.instantiate(params, &mut |_| None)
    }
}

impl From<TypeInfo> for PseudoTypeInfo {
    fn from(ti: TypeInfo) -> Self {
        PseudoTypeInfo::Ground(ti)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
