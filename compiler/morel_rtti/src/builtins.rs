//! Catalogue of builtin type constructors.
//!
//! Every table starts with these at the fixed ids declared on
//! [`TypeCtorId`](crate::TypeCtorId).

use crate::{RepresentationKind as Rep, TypeCtorId as Id};

pub(crate) enum BuiltinArity {
    Fixed(u16),
    Variable,
}

pub(crate) struct Builtin {
    pub id: Id,
    pub module: &'static str,
    pub name: &'static str,
    pub arity: BuiltinArity,
    pub rep: Rep,
}

const fn fixed(id: Id, module: &'static str, name: &'static str, arity: u16, rep: Rep) -> Builtin {
    Builtin {
        id,
        module,
        name,
        arity: BuiltinArity::Fixed(arity),
        rep,
    }
}

const fn variable(id: Id, module: &'static str, name: &'static str, rep: Rep) -> Builtin {
    Builtin {
        id,
        module,
        name,
        arity: BuiltinArity::Variable,
        rep,
    }
}

pub(crate) const BUILTINS: [Builtin; Id::FIRST_USER as usize] = [
    fixed(Id::INT, "builtin", "int", 0, Rep::Int),
    fixed(Id::CHAR, "builtin", "character", 0, Rep::Char),
    fixed(Id::FLOAT, "builtin", "float", 0, Rep::Float),
    fixed(Id::STRING, "builtin", "string", 0, Rep::String),
    fixed(Id::C_POINTER, "builtin", "c_pointer", 0, Rep::CPointer),
    fixed(Id::STABLE_C_POINTER, "builtin", "stable_c_pointer", 0, Rep::StableCPointer),
    fixed(Id::VOID, "builtin", "void", 0, Rep::Void),
    variable(Id::TUPLE, "builtin", "{}", Rep::Tuple),
    variable(Id::FUNC, "builtin", "func", Rep::Func),
    variable(Id::PRED, "builtin", "pred", Rep::Pred),
    fixed(Id::TYPE_INFO, "private_builtin", "type_info", 0, Rep::TypeInfo),
    fixed(Id::TYPE_CTOR_INFO, "private_builtin", "type_ctor_info", 0, Rep::TypeCtorInfo),
    fixed(Id::TYPE_DESC, "type_desc", "type_desc", 0, Rep::TypeDesc),
    fixed(Id::TYPE_CTOR_DESC, "type_desc", "type_ctor_desc", 0, Rep::TypeCtorDesc),
    fixed(Id::TYPECLASS_INFO, "private_builtin", "typeclass_info", 0, Rep::TypeClassInfo),
    fixed(Id::BASE_TYPECLASS_INFO, "private_builtin", "base_typeclass_info", 0, Rep::BaseTypeClassInfo),
    fixed(Id::REFERENCE, "private_builtin", "ref", 1, Rep::Reference),
    fixed(Id::ARRAY, "array", "array", 1, Rep::Array),
    fixed(Id::HEAP_POINTER, "private_builtin", "heap_pointer", 0, Rep::Hp),
    fixed(Id::SUCCIP, "builtin", "succip", 0, Rep::Succip),
    fixed(Id::CURFR, "builtin", "curfr", 0, Rep::Curfr),
    fixed(Id::MAXFR, "builtin", "maxfr", 0, Rep::Maxfr),
    fixed(Id::REDOFR, "builtin", "redofr", 0, Rep::Redofr),
    fixed(Id::REDOIP, "builtin", "redoip", 0, Rep::Redoip),
    fixed(Id::TICKET, "private_builtin", "ticket", 0, Rep::Ticket),
    fixed(Id::TRAIL_PTR, "builtin", "trail_ptr", 0, Rep::TrailPtr),
    fixed(Id::SUBGOAL, "table_builtin", "ml_subgoal", 0, Rep::Subgoal),
];
