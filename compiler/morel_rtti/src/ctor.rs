//! Type constructor descriptors and their layouts.

use bitflags::bitflags;

use crate::{ProcRef, PseudoTypeInfo, RepresentationKind, TypeCtorId, TypeInfo, RTTI_VERSION};

bitflags! {
    /// Properties fixed when a descriptor is built.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeCtorFlags: u8 {
        /// Registered by the runtime itself, not declared by a module.
        const BUILTIN = 1 << 0;
        /// Argument count is recorded per type info (tuples, `func`, `pred`).
        const VARIABLE_ARITY = 1 << 1;
        /// At least one functor has existentially quantified type variables.
        const HAS_EXISTENTIALS = 1 << 2;
    }
}

/// Descriptor of one type constructor.
///
/// Built once when the table is frozen and never mutated.
#[derive(Debug)]
pub struct TypeCtorInfo {
    pub(crate) id: TypeCtorId,
    pub(crate) module: Box<str>,
    pub(crate) name: Box<str>,
    pub(crate) arity: u16,
    pub(crate) flags: TypeCtorFlags,
    pub(crate) version: u8,
    pub(crate) rep: RepresentationKind,
    pub(crate) layout: Layout,
    pub(crate) unify_proc: Option<ProcRef>,
    pub(crate) compare_proc: Option<ProcRef>,
}

impl TypeCtorInfo {
    #[inline]
    pub fn id(&self) -> TypeCtorId {
        self.id
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared arity. Zero for variable-arity constructors.
    #[inline]
    pub fn arity(&self) -> u16 {
        self.arity
    }

    #[inline]
    pub fn flags(&self) -> TypeCtorFlags {
        self.flags
    }

    #[inline]
    pub fn is_variable_arity(&self) -> bool {
        self.flags.contains(TypeCtorFlags::VARIABLE_ARITY)
    }

    /// The representation kind. Constant time; never inspects a value.
    #[inline]
    pub fn rep(&self) -> RepresentationKind {
        self.rep
    }

    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn unify_proc(&self) -> Option<&ProcRef> {
        self.unify_proc.as_ref()
    }

    pub fn compare_proc(&self) -> Option<&ProcRef> {
        self.compare_proc.as_ref()
    }

    /// `module.name/arity`, for diagnostics.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}/{}", self.module, self.name, self.arity)
    }

    /// Is this descriptor usable at all?
    ///
    /// False for placeholder constructors, descriptors stamped with another
    /// layout version, layouts that do not match the representation kind, and
    /// user-equality kinds without an equality procedure.
    pub fn has_valid_representation(&self) -> bool {
        if self.version != RTTI_VERSION {
            return false;
        }
        if self.rep.has_user_equality() && self.unify_proc.is_none() {
            return false;
        }
        match self.rep {
            RepresentationKind::Unknown => false,
            RepresentationKind::Enum | RepresentationKind::EnumUserEq => {
                matches!(self.layout, Layout::Enum(_))
            }
            RepresentationKind::Du | RepresentationKind::DuUserEq => {
                matches!(self.layout, Layout::Du(_))
            }
            RepresentationKind::NoTag
            | RepresentationKind::NoTagUserEq
            | RepresentationKind::NoTagGround
            | RepresentationKind::NoTagGroundUserEq => matches!(self.layout, Layout::NoTag(_)),
            RepresentationKind::Equiv | RepresentationKind::EquivGround => {
                matches!(self.layout, Layout::Equiv(_))
            }
            _ => matches!(self.layout, Layout::None),
        }
    }
}

/// Kind-specific layout information.
#[derive(Debug)]
pub enum Layout {
    /// Builtins and opaque kinds carry no layout.
    None,
    Enum(EnumLayout),
    Du(DuLayout),
    NoTag(NoTagLayout),
    /// Target of an equivalence.
    Equiv(PseudoTypeInfo),
}

impl Layout {
    pub fn as_du(&self) -> Option<&DuLayout> {
        match self {
            Layout::Du(du) => Some(du),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumLayout> {
        match self {
            Layout::Enum(layout) => Some(layout),
            _ => None,
        }
    }

    pub fn as_notag(&self) -> Option<&NoTagLayout> {
        match self {
            Layout::NoTag(notag) => Some(notag),
            _ => None,
        }
    }

    pub fn as_equiv(&self) -> Option<&PseudoTypeInfo> {
        match self {
            Layout::Equiv(target) => Some(target),
            _ => None,
        }
    }
}

/// Constants of an enumeration, in declaration order. A value is its
/// constant's position.
#[derive(Debug)]
pub struct EnumLayout {
    pub(crate) names: Box<[Box<str>]>,
}

impl EnumLayout {
    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.names.iter().map(|name| &**name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// The single functor of a no-tag type.
#[derive(Debug)]
pub struct NoTagLayout {
    pub(crate) functor: Box<str>,
    pub(crate) arg_type: PseudoTypeInfo,
}

impl NoTagLayout {
    pub fn functor(&self) -> &str {
        &self.functor
    }

    pub fn arg_type(&self) -> &PseudoTypeInfo {
        &self.arg_type
    }
}

/// Where the secondary tag of a primary-tag group lives.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SectagLocn {
    /// Only one functor uses this primary tag.
    None,
    /// Packed into the bits above the primary tag; the value has no cell.
    Local,
    /// First word of the value's cell.
    Remote,
    /// A type variable, not a concrete value. Never inspectable.
    Variable,
}

/// Functors of a discriminated union and their tag assignment.
#[derive(Debug)]
pub struct DuLayout {
    pub(crate) ptags: Box<[DuPtagLayout]>,
    pub(crate) functors: Box<[DuFunctorDesc]>,
}

impl DuLayout {
    /// Layout for primary tag `ptag`, if any functor uses it.
    #[inline]
    pub fn ptag_layout(&self, ptag: u8) -> Option<&DuPtagLayout> {
        self.ptags.get(usize::from(ptag))
    }

    /// Functor stored under `sectag` in `ptag_layout`.
    #[inline]
    pub fn functor(&self, ptag_layout: &DuPtagLayout, sectag: u64) -> Option<&DuFunctorDesc> {
        let sectag = usize::try_from(sectag).ok()?;
        let ordinal = *ptag_layout.alternatives.get(sectag)?;
        self.functors.get(ordinal as usize)
    }

    /// Functors in declaration order; index equals ordinal.
    pub fn functors(&self) -> &[DuFunctorDesc] {
        &self.functors
    }

    pub fn ptag_count(&self) -> usize {
        self.ptags.len()
    }
}

/// Secondary-tag scheme of one primary tag.
#[derive(Debug)]
pub struct DuPtagLayout {
    pub(crate) sectag_locn: SectagLocn,
    /// Functor ordinals indexed by secondary tag.
    pub(crate) alternatives: Box<[u32]>,
}

impl DuPtagLayout {
    #[inline]
    pub fn sectag_locn(&self) -> SectagLocn {
        self.sectag_locn
    }

    pub fn alternative_count(&self) -> usize {
        self.alternatives.len()
    }
}

/// One alternative of a discriminated union.
#[derive(Debug)]
pub struct DuFunctorDesc {
    pub(crate) name: Box<str>,
    pub(crate) orig_arity: u16,
    pub(crate) ordinal: u32,
    pub(crate) ptag: u8,
    pub(crate) sectag_locn: SectagLocn,
    pub(crate) sectag: u64,
    pub(crate) arg_types: Box<[PseudoTypeInfo]>,
    pub(crate) exist_info: Option<ExistInfo>,
}

impl DuFunctorDesc {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of value arguments, excluding existential type-info slots.
    #[inline]
    pub fn orig_arity(&self) -> u16 {
        self.orig_arity
    }

    /// Declaration position. Decides the order between alternatives.
    #[inline]
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    #[inline]
    pub fn ptag(&self) -> u8 {
        self.ptag
    }

    #[inline]
    pub fn sectag_locn(&self) -> SectagLocn {
        self.sectag_locn
    }

    #[inline]
    pub fn sectag(&self) -> u64 {
        self.sectag
    }

    pub fn arg_types(&self) -> &[PseudoTypeInfo] {
        &self.arg_types
    }

    pub fn exist_info(&self) -> Option<&ExistInfo> {
        self.exist_info.as_ref()
    }

    /// Does argument `i`'s type need instantiating before use?
    #[inline]
    pub fn arg_type_may_contain_var(&self, i: usize) -> bool {
        self.arg_types.get(i).is_some_and(|pt| !pt.is_ground())
    }

    /// Slot index of the first word after a remote secondary tag.
    #[inline]
    pub fn first_arg_slot(&self) -> usize {
        usize::from(self.sectag_locn == SectagLocn::Remote)
    }

    /// Total cell words this functor occupies: secondary tag, existential
    /// slots and value arguments.
    pub fn cell_size(&self) -> usize {
        let exist = self.exist_info.as_ref().map_or(0, ExistInfo::slot_count);
        self.first_arg_slot() + exist + usize::from(self.orig_arity)
    }
}

/// Existential quantification of a functor.
///
/// Cell layout after any remote secondary tag: `typeinfos_plain` type-info
/// slots, then `tcis` typeclass-info slots, then the value arguments.
#[derive(Debug)]
pub struct ExistInfo {
    pub(crate) typeinfos_plain: u16,
    pub(crate) typeinfos_in_tci: u16,
    pub(crate) tcis: u16,
    pub(crate) typeinfo_locns: Box<[ExistLocn]>,
}

impl ExistInfo {
    pub fn typeinfos_plain(&self) -> u16 {
        self.typeinfos_plain
    }

    pub fn typeinfos_in_tci(&self) -> u16 {
        self.typeinfos_in_tci
    }

    pub fn tcis(&self) -> u16 {
        self.tcis
    }

    /// Where existential variable `n + 1` is stored, for every variable.
    pub fn typeinfo_locns(&self) -> &[ExistLocn] {
        &self.typeinfo_locns
    }

    /// Location of 1-based existential variable `var`.
    pub fn locn(&self, var: u16) -> Option<&ExistLocn> {
        usize::from(var)
            .checked_sub(1)
            .and_then(|i| self.typeinfo_locns.get(i))
    }

    /// Cell slots occupied by existential bookkeeping.
    #[inline]
    pub fn slot_count(&self) -> usize {
        usize::from(self.typeinfos_plain) + usize::from(self.tcis)
    }
}

/// Storage location of one existentially bound type info.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ExistLocn {
    /// Slot number, counted from the first slot after any remote secondary tag.
    pub arg_num: u16,
    /// `None`: the slot holds the type info itself. `Some(k)`: the slot holds
    /// a typeclass info whose word `k` is the type info.
    pub offset_in_tci: Option<u16>,
}

/// Static description of a closure's code and captured arguments.
#[derive(Debug)]
pub struct ClosureLayout {
    pub(crate) proc: ProcRef,
    pub(crate) arg_types: Box<[TypeInfo]>,
}

impl ClosureLayout {
    pub fn proc(&self) -> &ProcRef {
        &self.proc
    }

    /// Types of the hidden (captured) arguments, in order.
    pub fn arg_types(&self) -> &[TypeInfo] {
        &self.arg_types
    }
}
