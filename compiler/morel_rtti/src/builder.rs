//! Load-time construction of descriptor tables.
//!
//! # Tag allocation
//!
//! Discriminated unions get their tags here, never from the caller:
//!
//! - all constants share primary tag 0, told apart by local secondary tags;
//! - every other functor gets a primary tag of its own, in declaration order;
//! - when primary tags run out, the last one is shared by all remaining
//!   functors, told apart by remote secondary tags.
//!
//! A union whose functors are all constants becomes an enum, and a union
//! with a single one-argument functor becomes a no-tag wrapper.

use rustc_hash::FxHashMap;

use crate::builtins::{BuiltinArity, BUILTINS};
use crate::ctor::{
    DuFunctorDesc, DuLayout, DuPtagLayout, EnumLayout, ExistInfo, ExistLocn, Layout, NoTagLayout,
};
use crate::{
    ClosureId, ClosureLayout, ProcRef, PseudoTypeInfo, RepresentationKind as Rep, RttiError,
    SectagLocn, TypeCtorFlags, TypeCtorId, TypeCtorInfo, TypeInfo, TypeTable, MAX_PRIMARY_TAGS,
    RTTI_VERSION,
};

/// How a user-declared type constructor is represented.
#[derive(Clone, Debug)]
pub enum TypeDefinition {
    /// Constants only, in declaration order.
    Enum(Vec<String>),
    /// Discriminated union, functors in declaration order.
    Du(Vec<FunctorSpec>),
    /// Explicit single-functor, single-argument wrapper.
    NoTag { functor: String, arg: PseudoTypeInfo },
    /// Type synonym.
    Equiv(PseudoTypeInfo),
    /// Opaque foreign type; only its user procedures can compare it.
    /// `finish` rejects it without them.
    Foreign,
    /// Union laid out with reserved addresses. Like [`Self::Foreign`], it
    /// needs user procedures.
    ReservedAddr,
    /// Representation not known to the runtime.
    Unknown,
}

/// One functor of a [`TypeDefinition::Du`].
#[derive(Clone, Debug)]
pub struct FunctorSpec {
    name: String,
    args: Vec<PseudoTypeInfo>,
    exist: Option<ExistSpec>,
}

impl FunctorSpec {
    pub fn new(name: impl Into<String>, args: Vec<PseudoTypeInfo>) -> Self {
        FunctorSpec {
            name: name.into(),
            args,
            exist: None,
        }
    }

    /// Quantify existential type variables over this functor.
    #[must_use]
    pub fn existential(mut self, exist: ExistSpec) -> Self {
        self.exist = Some(exist);
        self
    }

    fn is_constant(&self) -> bool {
        self.args.is_empty() && self.exist.is_none()
    }
}

/// Existential variables of a functor.
///
/// Variables `1..=plain` are stored directly as type-info slots. Each
/// constrained variable after that is found inside a typeclass-info slot.
#[derive(Clone, Debug, Default)]
pub struct ExistSpec {
    plain: u16,
    tcis: u16,
    constrained: Vec<(u16, u16)>,
}

impl ExistSpec {
    pub fn plain(count: u16) -> Self {
        ExistSpec {
            plain: count,
            ..ExistSpec::default()
        }
    }

    /// Reserve `count` typeclass-info slots after the plain type infos.
    #[must_use]
    pub fn with_typeclass_infos(mut self, count: u16) -> Self {
        self.tcis = count;
        self
    }

    /// Add a variable whose type info is word `offset` of typeclass info
    /// `tci` (0-based among this functor's typeclass infos).
    #[must_use]
    pub fn constrained(mut self, tci: u16, offset: u16) -> Self {
        self.constrained.push((tci, offset));
        self
    }

    fn var_count(&self) -> u16 {
        self.plain
            .saturating_add(u16::try_from(self.constrained.len()).unwrap_or(u16::MAX))
    }
}

#[derive(Clone, Debug)]
enum Definition {
    Builtin(Rep),
    User(TypeDefinition),
}

#[derive(Debug)]
struct Pending {
    module: Box<str>,
    name: Box<str>,
    arity: u16,
    variable_arity: bool,
    definition: Option<Definition>,
    procs: Option<(ProcRef, Option<ProcRef>)>,
}

impl Pending {
    fn qualified_name(&self) -> String {
        format!("{}.{}/{}", self.module, self.name, self.arity)
    }
}

/// Assembles a [`TypeTable`].
#[derive(Debug)]
pub struct TypeTableBuilder {
    pending: Vec<Pending>,
    by_name: FxHashMap<(Box<str>, Box<str>, u16), TypeCtorId>,
    closures: Vec<ClosureLayout>,
    primary_tags: u8,
}

impl Default for TypeTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTableBuilder {
    /// A builder holding only the builtin constructors.
    pub fn new() -> Self {
        let mut builder = TypeTableBuilder {
            pending: Vec::with_capacity(BUILTINS.len()),
            by_name: FxHashMap::default(),
            closures: Vec::new(),
            primary_tags: MAX_PRIMARY_TAGS,
        };
        for builtin in &BUILTINS {
            let (arity, variable_arity) = match builtin.arity {
                BuiltinArity::Fixed(n) => (n, false),
                BuiltinArity::Variable => (0, true),
            };
            builder.by_name.insert(
                (builtin.module.into(), builtin.name.into(), arity),
                builtin.id,
            );
            builder.pending.push(Pending {
                module: builtin.module.into(),
                name: builtin.name.into(),
                arity,
                variable_arity,
                definition: Some(Definition::Builtin(builtin.rep)),
                procs: None,
            });
        }
        builder
    }

    /// Limit the tag allocator to `count` primary tags.
    pub fn with_primary_tag_count(mut self, count: u8) -> Result<Self, RttiError> {
        if !(2..=MAX_PRIMARY_TAGS).contains(&count) {
            return Err(RttiError::PrimaryTagCount {
                got: count,
                max: MAX_PRIMARY_TAGS,
            });
        }
        self.primary_tags = count;
        Ok(self)
    }

    /// Declare a type constructor. It must be defined before `finish`.
    ///
    /// Declaring first lets a definition refer to its own constructor.
    pub fn declare(
        &mut self,
        module: &str,
        name: &str,
        arity: u16,
    ) -> Result<TypeCtorId, RttiError> {
        let key = (Box::from(module), Box::from(name), arity);
        if self.by_name.contains_key(&key) {
            return Err(RttiError::DuplicateTypeCtor(format!("{module}.{name}/{arity}")));
        }
        let raw = u32::try_from(self.pending.len())
            .map_err(|_| RttiError::UnknownTypeCtor(u32::MAX))?;
        let id = TypeCtorId::from_raw(raw);
        self.by_name.insert(key, id);
        self.pending.push(Pending {
            module: module.into(),
            name: name.into(),
            arity,
            variable_arity: false,
            definition: None,
            procs: None,
        });
        Ok(id)
    }

    pub fn define(&mut self, id: TypeCtorId, definition: TypeDefinition) -> Result<(), RttiError> {
        let pending = self.pending_mut(id)?;
        match pending.definition {
            Some(Definition::Builtin(_)) => {
                Err(RttiError::BuiltinRedefinition(pending.qualified_name()))
            }
            Some(Definition::User(_)) => Err(RttiError::AlreadyDefined(pending.qualified_name())),
            None => {
                pending.definition = Some(Definition::User(definition));
                Ok(())
            }
        }
    }

    /// Attach user-defined equality and, optionally, comparison.
    ///
    /// A comparison procedure cannot exist without an equality procedure.
    /// Builtin constructors accept procedures too: arrays and foreign types
    /// can only be compared through them.
    pub fn set_user_procs(
        &mut self,
        id: TypeCtorId,
        unify: ProcRef,
        compare: Option<ProcRef>,
    ) -> Result<(), RttiError> {
        self.pending_mut(id)?.procs = Some((unify, compare));
        Ok(())
    }

    /// Register the static layout of closures built from `proc`.
    pub fn add_closure_layout(&mut self, proc: ProcRef, arg_types: Vec<TypeInfo>) -> ClosureId {
        let id = ClosureId::from_raw(u32::try_from(self.closures.len()).unwrap_or(u32::MAX));
        self.closures.push(ClosureLayout {
            proc,
            arg_types: arg_types.into_boxed_slice(),
        });
        id
    }

    /// Validate everything and freeze the table.
    pub fn finish(self) -> Result<TypeTable, RttiError> {
        for pending in &self.pending {
            if pending.definition.is_none() {
                return Err(RttiError::Undefined(pending.qualified_name()));
            }
        }
        self.check_definitions()?;
        self.check_equivalence_cycles()?;
        for closure in &self.closures {
            for ti in closure.arg_types.iter() {
                self.check_ground(ti)?;
            }
        }

        let mut ctors = Vec::with_capacity(self.pending.len());
        for (index, pending) in self.pending.iter().enumerate() {
            let id = TypeCtorId::from_raw(u32::try_from(index).unwrap_or(u32::MAX));
            ctors.push(self.build_ctor(id, pending)?);
        }

        tracing::debug!(
            ctors = ctors.len(),
            closures = self.closures.len(),
            "type table frozen"
        );
        Ok(TypeTable {
            ctors,
            by_name: self.by_name,
            closures: self.closures,
        })
    }

    fn pending_mut(&mut self, id: TypeCtorId) -> Result<&mut Pending, RttiError> {
        self.pending
            .get_mut(id.index())
            .ok_or(RttiError::UnknownTypeCtor(id.raw()))
    }

    // === Validation ===

    fn check_definitions(&self) -> Result<(), RttiError> {
        for pending in &self.pending {
            let Some(Definition::User(definition)) = &pending.definition else {
                continue;
            };
            let owner = pending.qualified_name();
            match definition {
                TypeDefinition::Enum(names) if names.is_empty() => {
                    return Err(RttiError::EmptyType(owner));
                }
                TypeDefinition::Du(functors) => {
                    if functors.is_empty() {
                        return Err(RttiError::EmptyType(owner));
                    }
                    for functor in functors {
                        self.check_functor(&owner, pending.arity, functor)?;
                    }
                }
                TypeDefinition::NoTag { arg, .. } => {
                    self.check_pseudo(&owner, pending.arity, "", 0, arg)?;
                }
                TypeDefinition::Equiv(target) => {
                    if pending.procs.is_some() {
                        return Err(RttiError::UserProcsOnEquivalence(owner));
                    }
                    self.check_pseudo(&owner, pending.arity, "", 0, target)?;
                }
                TypeDefinition::Foreign | TypeDefinition::ReservedAddr => {
                    if pending.procs.is_none() {
                        return Err(RttiError::MissingUserProcs(owner));
                    }
                }
                TypeDefinition::Enum(_) | TypeDefinition::Unknown => {}
            }
        }
        Ok(())
    }

    fn check_functor(
        &self,
        owner: &str,
        arity: u16,
        functor: &FunctorSpec,
    ) -> Result<(), RttiError> {
        let exist_vars = functor.exist.as_ref().map_or(0, ExistSpec::var_count);
        if let Some(exist) = &functor.exist {
            for &(tci, _) in &exist.constrained {
                if tci >= exist.tcis {
                    return Err(RttiError::ExistLocation {
                        ctor: owner.to_string(),
                        functor: functor.name.clone(),
                        index: tci,
                        count: exist.tcis,
                    });
                }
            }
        }
        for arg in &functor.args {
            self.check_pseudo(owner, arity, &functor.name, exist_vars, arg)?;
        }
        Ok(())
    }

    fn check_pseudo(
        &self,
        owner: &str,
        arity: u16,
        functor: &str,
        exist_vars: u16,
        pt: &PseudoTypeInfo,
    ) -> Result<(), RttiError> {
        match pt {
            PseudoTypeInfo::Ground(ti) => self.check_ground(ti),
            PseudoTypeInfo::Var(n) => {
                if (1..=arity).contains(n) {
                    Ok(())
                } else {
                    Err(RttiError::UnboundTypeVar {
                        ctor: owner.to_string(),
                        var: *n,
                    })
                }
            }
            PseudoTypeInfo::Exist(n) => {
                if (1..=exist_vars).contains(n) {
                    Ok(())
                } else {
                    Err(RttiError::UnboundExistVar {
                        ctor: owner.to_string(),
                        functor: functor.to_string(),
                        var: *n,
                    })
                }
            }
            PseudoTypeInfo::App(ctor, args) => {
                self.check_arity(*ctor, args.len())?;
                args.iter()
                    .try_for_each(|arg| self.check_pseudo(owner, arity, functor, exist_vars, arg))
            }
        }
    }

    fn check_ground(&self, ti: &TypeInfo) -> Result<(), RttiError> {
        self.check_arity(ti.ctor(), ti.args().len())?;
        ti.args().iter().try_for_each(|arg| self.check_ground(arg))
    }

    fn check_arity(&self, ctor: TypeCtorId, found: usize) -> Result<(), RttiError> {
        let pending = self
            .pending
            .get(ctor.index())
            .ok_or(RttiError::UnknownTypeCtor(ctor.raw()))?;
        if !pending.variable_arity && found != usize::from(pending.arity) {
            return Err(RttiError::ArityMismatch {
                ctor: pending.qualified_name(),
                expected: pending.arity,
                found,
            });
        }
        Ok(())
    }

    fn check_equivalence_cycles(&self) -> Result<(), RttiError> {
        for (start, pending) in self.pending.iter().enumerate() {
            let mut current = self.equiv_head(start);
            let mut steps = 0;
            while let Some(next) = current {
                if next == start {
                    return Err(RttiError::EquivalenceCycle(pending.qualified_name()));
                }
                steps += 1;
                if steps > self.pending.len() {
                    break;
                }
                current = self.equiv_head(next);
            }
        }
        Ok(())
    }

    /// Head constructor an equivalence expands to, if `index` is one.
    fn equiv_head(&self, index: usize) -> Option<usize> {
        match &self.pending.get(index)?.definition {
            Some(Definition::User(TypeDefinition::Equiv(target))) => match target {
                PseudoTypeInfo::Ground(ti) => Some(ti.ctor().index()),
                PseudoTypeInfo::App(ctor, _) => Some(ctor.index()),
                PseudoTypeInfo::Var(_) | PseudoTypeInfo::Exist(_) => None,
            },
            _ => None,
        }
    }

    // === Construction ===

    fn build_ctor(&self, id: TypeCtorId, pending: &Pending) -> Result<TypeCtorInfo, RttiError> {
        let mut flags = TypeCtorFlags::empty();
        if pending.variable_arity {
            flags |= TypeCtorFlags::VARIABLE_ARITY;
        }
        let has_procs = pending.procs.is_some();

        let (rep, layout) = match &pending.definition {
            Some(Definition::Builtin(rep)) => {
                flags |= TypeCtorFlags::BUILTIN;
                (*rep, Layout::None)
            }
            Some(Definition::User(definition)) => {
                self.build_layout(pending, definition, has_procs, &mut flags)
            }
            None => return Err(RttiError::Undefined(pending.qualified_name())),
        };

        let (unify_proc, compare_proc) = match &pending.procs {
            Some((unify, compare)) => (Some(unify.clone()), compare.clone()),
            None => (None, None),
        };

        Ok(TypeCtorInfo {
            id,
            module: pending.module.clone(),
            name: pending.name.clone(),
            arity: pending.arity,
            flags,
            version: RTTI_VERSION,
            rep,
            layout,
            unify_proc,
            compare_proc,
        })
    }

    fn build_layout(
        &self,
        pending: &Pending,
        definition: &TypeDefinition,
        user_eq: bool,
        flags: &mut TypeCtorFlags,
    ) -> (Rep, Layout) {
        match definition {
            TypeDefinition::Enum(names) => enum_layout(names.iter().map(String::as_str), user_eq),
            TypeDefinition::Du(functors) => {
                if functors.iter().all(FunctorSpec::is_constant) {
                    return enum_layout(functors.iter().map(|f| f.name.as_str()), user_eq);
                }
                if let [only] = functors.as_slice() {
                    if let ([arg], None) = (only.args.as_slice(), &only.exist) {
                        return notag_layout(&only.name, arg, user_eq);
                    }
                }
                if functors.iter().any(|f| f.exist.is_some()) {
                    *flags |= TypeCtorFlags::HAS_EXISTENTIALS;
                }
                let rep = if user_eq { Rep::DuUserEq } else { Rep::Du };
                (rep, Layout::Du(self.assign_tags(functors)))
            }
            TypeDefinition::NoTag { functor, arg } => notag_layout(functor, arg, user_eq),
            TypeDefinition::Equiv(target) => {
                let rep = if target.is_ground() {
                    Rep::EquivGround
                } else {
                    Rep::Equiv
                };
                (rep, Layout::Equiv(target.clone()))
            }
            TypeDefinition::Foreign => (Rep::Foreign, Layout::None),
            TypeDefinition::ReservedAddr => {
                // A full pair of procedures orders the type; equality alone
                // marks it as user-defined equality.
                let rep = match &pending.procs {
                    Some((_, Some(_))) => Rep::ReservedAddr,
                    _ => Rep::ReservedAddrUserEq,
                };
                (rep, Layout::None)
            }
            TypeDefinition::Unknown => {
                tracing::debug!(ctor = %pending.qualified_name(), "placeholder representation");
                (Rep::Unknown, Layout::None)
            }
        }
    }

    fn assign_tags(&self, functors: &[FunctorSpec]) -> DuLayout {
        let (constants, others): (Vec<usize>, Vec<usize>) =
            (0..functors.len()).partition(|&i| functors[i].is_constant());

        let mut placement = vec![(0u8, SectagLocn::None, 0u64); functors.len()];
        let mut ptags: Vec<DuPtagLayout> = Vec::new();

        if !constants.is_empty() {
            for (sectag, &i) in (0u64..).zip(&constants) {
                placement[i] = (0, SectagLocn::Local, sectag);
            }
            ptags.push(DuPtagLayout {
                sectag_locn: SectagLocn::Local,
                alternatives: constants.iter().map(|&i| ordinal(i)).collect(),
            });
        }

        let available = usize::from(self.primary_tags) - ptags.len();
        let unshared = if others.len() <= available {
            others.len()
        } else {
            available - 1
        };

        for &i in &others[..unshared] {
            placement[i] = (ptag_number(ptags.len()), SectagLocn::None, 0);
            ptags.push(DuPtagLayout {
                sectag_locn: SectagLocn::None,
                alternatives: Box::new([ordinal(i)]),
            });
        }

        let shared = &others[unshared..];
        if !shared.is_empty() {
            let ptag = ptag_number(ptags.len());
            for (sectag, &i) in (0u64..).zip(shared) {
                placement[i] = (ptag, SectagLocn::Remote, sectag);
            }
            ptags.push(DuPtagLayout {
                sectag_locn: SectagLocn::Remote,
                alternatives: shared.iter().map(|&i| ordinal(i)).collect(),
            });
        }

        let functors = functors
            .iter()
            .zip(placement)
            .enumerate()
            .map(|(i, (spec, (ptag, sectag_locn, sectag)))| DuFunctorDesc {
                name: spec.name.as_str().into(),
                orig_arity: u16::try_from(spec.args.len()).unwrap_or(u16::MAX),
                ordinal: ordinal(i),
                ptag,
                sectag_locn,
                sectag,
                arg_types: spec.args.clone().into_boxed_slice(),
                exist_info: spec.exist.as_ref().map(exist_info),
            })
            .collect();

        DuLayout {
            ptags: ptags.into_boxed_slice(),
            functors,
        }
    }
}

fn enum_layout<'a>(names: impl Iterator<Item = &'a str>, user_eq: bool) -> (Rep, Layout) {
    let rep = if user_eq { Rep::EnumUserEq } else { Rep::Enum };
    let names = names.map(Box::from).collect();
    (rep, Layout::Enum(EnumLayout { names }))
}

fn notag_layout(functor: &str, arg: &PseudoTypeInfo, user_eq: bool) -> (Rep, Layout) {
    let rep = match (arg.is_ground(), user_eq) {
        (true, false) => Rep::NoTagGround,
        (true, true) => Rep::NoTagGroundUserEq,
        (false, false) => Rep::NoTag,
        (false, true) => Rep::NoTagUserEq,
    };
    let layout = NoTagLayout {
        functor: functor.into(),
        arg_type: arg.clone(),
    };
    (rep, Layout::NoTag(layout))
}

fn exist_info(spec: &ExistSpec) -> ExistInfo {
    let plain = (0..spec.plain).map(|slot| ExistLocn {
        arg_num: slot,
        offset_in_tci: None,
    });
    let constrained = spec.constrained.iter().map(|&(tci, offset)| ExistLocn {
        arg_num: spec.plain.saturating_add(tci),
        offset_in_tci: Some(offset),
    });
    ExistInfo {
        typeinfos_plain: spec.plain,
        typeinfos_in_tci: u16::try_from(spec.constrained.len()).unwrap_or(u16::MAX),
        tcis: spec.tcis,
        typeinfo_locns: plain.chain(constrained).collect(),
    }
}

fn ordinal(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

fn ptag_number(index: usize) -> u8 {
    u8::try_from(index).unwrap_or(u8::MAX)
}
