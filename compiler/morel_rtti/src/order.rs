//! Ordering of type descriptors.
//!
//! Needed wherever a value carries its own type: existentially typed
//! arguments, `type_info` and `type_desc` values, and type constructor
//! descriptors. The order is stable across modules and processes: it
//! depends on names, never on ids or addresses.

use std::borrow::Cow;
use std::cmp::Ordering;

use morel_diagnostic::{fatal, FatalContext, FatalKind};

use crate::{RepresentationKind, TypeCtorId, TypeCtorInfo, TypeInfo, TypeTable};

/// Order two constructors by module name, then type name, then arity.
pub fn compare_type_ctor_info(a: &TypeCtorInfo, b: &TypeCtorInfo) -> Ordering {
    if a.id == b.id {
        return Ordering::Equal;
    }
    a.module
        .cmp(&b.module)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.arity.cmp(&b.arity))
}

/// Order two type infos.
///
/// Equivalence types are expanded first, so a synonym compares equal to its
/// target. Variable-arity constructors compare their argument counts before
/// their arguments.
///
/// Raises a fatal metadata error for ids not in `table`.
pub fn compare_type_info(table: &TypeTable, x: &TypeInfo, y: &TypeInfo) -> Ordering {
    if x.ptr_eq(y) {
        return Ordering::Equal;
    }
    let x = collapse_equivalences(table, x);
    let y = collapse_equivalences(table, y);

    let x_ctor = ctor_of(table, &x);
    let y_ctor = ctor_of(table, &y);
    let by_ctor = compare_type_ctor_info(x_ctor, y_ctor);
    if by_ctor != Ordering::Equal {
        return by_ctor;
    }

    if x_ctor.is_variable_arity() {
        let by_arity = x.args().len().cmp(&y.args().len());
        if by_arity != Ordering::Equal {
            return by_arity;
        }
    }

    for (xa, ya) in x.args().iter().zip(y.args()) {
        let by_arg = compare_type_info(table, xa, ya);
        if by_arg != Ordering::Equal {
            return by_arg;
        }
    }
    Ordering::Equal
}

/// Do two type infos denote the same type?
pub fn unify_type_info(table: &TypeTable, x: &TypeInfo, y: &TypeInfo) -> bool {
    compare_type_info(table, x, y) == Ordering::Equal
}

/// A type constructor viewed as a value, as `type_ctor_desc` reflects it.
///
/// `arity` is the constructor's arity, except for variable-arity
/// constructors, where it records the arity of the particular instance.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeCtorDesc {
    pub ctor: TypeCtorId,
    pub arity: u16,
}

/// Order two type constructor descriptors: constructor first, then the
/// instance arity of variable-arity constructors.
pub fn compare_type_ctor_desc(table: &TypeTable, x: &TypeCtorDesc, y: &TypeCtorDesc) -> Ordering {
    let x_ctor = lookup(table, x.ctor, "compare_type_ctor_desc");
    let y_ctor = lookup(table, y.ctor, "compare_type_ctor_desc");
    let by_ctor = compare_type_ctor_info(x_ctor, y_ctor);
    if by_ctor != Ordering::Equal || !x_ctor.is_variable_arity() {
        return by_ctor;
    }
    x.arity.cmp(&y.arity)
}

/// Expand `ti` until its head constructor is not an equivalence.
fn collapse_equivalences<'a>(table: &TypeTable, ti: &'a TypeInfo) -> Cow<'a, TypeInfo> {
    let mut current = Cow::Borrowed(ti);
    loop {
        let info = ctor_of(table, &current);
        let Some(target) = info.layout().as_equiv() else {
            return current;
        };
        match target.instantiate_universal(current.args()) {
            Ok(expanded) => current = Cow::Owned(expanded),
            Err(var) => fatal(
                FatalContext::new(FatalKind::Metadata, "compare_type_info")
                    .with_subject(info.qualified_name()),
                format!("equivalence target mentions unbound variable {var:?}"),
            ),
        }
    }
}

fn ctor_of<'t>(table: &'t TypeTable, ti: &TypeInfo) -> &'t TypeCtorInfo {
    lookup(table, ti.ctor(), "compare_type_info")
}

fn lookup<'t>(table: &'t TypeTable, id: TypeCtorId, operation: &'static str) -> &'t TypeCtorInfo {
    match table.ctor(id) {
        Some(info) if info.rep() != RepresentationKind::Unknown => info,
        Some(info) => fatal(
            FatalContext::new(FatalKind::Metadata, operation).with_subject(info.qualified_name()),
            "type constructor has no known representation",
        ),
        None => fatal(
            FatalContext::new(FatalKind::Metadata, operation),
            format!("no type constructor with id {}", id.raw()),
        ),
    }
}
