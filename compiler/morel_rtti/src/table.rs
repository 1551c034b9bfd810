//! The frozen descriptor table.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::{ClosureId, ClosureLayout, RttiError, TypeCtorId, TypeCtorInfo, TypeInfo};

/// Every type constructor and closure layout known to the process.
///
/// Produced by [`TypeTableBuilder::finish`](crate::TypeTableBuilder::finish);
/// read-only from then on, so it can be shared freely between threads.
#[derive(Debug)]
pub struct TypeTable {
    pub(crate) ctors: Vec<TypeCtorInfo>,
    pub(crate) by_name: FxHashMap<(Box<str>, Box<str>, u16), TypeCtorId>,
    pub(crate) closures: Vec<ClosureLayout>,
}

impl TypeTable {
    /// Descriptor for `id`, or `None` if the id is not from this table.
    #[inline]
    pub fn ctor(&self, id: TypeCtorId) -> Option<&TypeCtorInfo> {
        self.ctors.get(id.index())
    }

    /// Find a constructor by module, name and arity.
    pub fn lookup(&self, module: &str, name: &str, arity: u16) -> Option<TypeCtorId> {
        self.by_name
            .get(&(Box::from(module), Box::from(name), arity))
            .copied()
    }

    pub fn closure(&self, id: ClosureId) -> Option<&ClosureLayout> {
        self.closures.get(id.index())
    }

    /// Number of type constructors, builtins included.
    pub fn len(&self) -> usize {
        self.ctors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ctors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeCtorInfo> {
        self.ctors.iter()
    }

    /// Apply `ctor` to `args`, checking the argument count against the
    /// declared arity.
    pub fn type_info(
        &self,
        ctor: TypeCtorId,
        args: Vec<TypeInfo>,
    ) -> Result<TypeInfo, RttiError> {
        let info = self
            .ctor(ctor)
            .ok_or(RttiError::UnknownTypeCtor(ctor.raw()))?;
        if !info.is_variable_arity() && args.len() != usize::from(info.arity) {
            return Err(RttiError::ArityMismatch {
                ctor: info.qualified_name(),
                expected: info.arity,
                found: args.len(),
            });
        }
        Ok(TypeInfo::from_parts(ctor, args))
    }

    /// Human-readable rendering of `ti` using this table's names.
    pub fn display<'a>(&'a self, ti: &'a TypeInfo) -> TypeInfoDisplay<'a> {
        TypeInfoDisplay { table: self, ti }
    }
}

/// [`fmt::Display`] adapter returned by [`TypeTable::display`].
pub struct TypeInfoDisplay<'a> {
    table: &'a TypeTable,
    ti: &'a TypeInfo,
}

impl fmt::Display for TypeInfoDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.table.ctor(self.ti.ctor()) {
            Some(info) => write!(f, "{}.{}", info.module, info.name)?,
            None => write!(f, "<unknown #{}>", self.ti.ctor().raw())?,
        }
        if let Some((first, rest)) = self.ti.args().split_first() {
            write!(f, "({}", self.table.display(first))?;
            for arg in rest {
                write!(f, ", {}", self.table.display(arg))?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}
