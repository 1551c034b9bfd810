//! The generic traversal.
//!
//! # Design
//!
//! One function, [`Engine::evaluate`], serves all three [`Mode`]s. Each call
//! resolves its type info in a loop: equivalences and no-tag wrappers are
//! storage-transparent, so they only swap the type and go round again.
//! Everything else ends the loop with a verdict, recursing into subterms
//! where the representation has any.
//!
//! The match on [`RepresentationKind`] is exhaustive; adding a kind does not
//! compile until every mode has an answer for it.
//!
//! # Relocation
//!
//! Nested traversals and user procedures may allocate, and allocation may
//! move the heap. The engine therefore keeps the two values as words in a
//! [`Transient`] and reads every field through a view derived on the spot,
//! never through one held across a call.

use std::cmp::Ordering;

use morel_diagnostic::{fatal, FatalContext, FatalKind};
use morel_heap::{Heap, TaggedValue, Word};
use morel_rtti::{
    compare_type_ctor_desc, compare_type_ctor_info, compare_type_info, ClosureLayout,
    DuFunctorDesc, ExistLocn, PseudoTypeInfo, RepresentationKind as Rep, SectagLocn, TypeCtorId,
    TypeCtorInfo, TypeInfo, TypeTable,
};
use morel_stack::ensure_sufficient_stack;

use crate::{CallExit, CallObserver, CallingConvention, Mode, NoopObserver, TypeCtorStats, Verdict};

static NOOP: NoopObserver = NoopObserver;

/// Traversal state for one heap.
///
/// Borrowing the heap mutably keeps traversals on one heap sequential;
/// separate heaps can be traversed concurrently against the same table.
pub struct Engine<'rt> {
    table: &'rt TypeTable,
    heap: &'rt mut Heap,
    calls: &'rt dyn CallingConvention,
    observer: &'rt dyn CallObserver,
    stats: Option<&'rt TypeCtorStats>,
}

/// The two values under comparison, as words.
///
/// Words survive relocation; field reads go through fresh views.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Transient {
    pub(crate) x: Word,
    pub(crate) y: Word,
}

impl Transient {
    #[inline]
    fn fields(self, heap: &Heap, slot: usize) -> Transient {
        Transient {
            x: heap.field(self.x, slot),
            y: heap.field(self.y, slot),
        }
    }
}

enum Step {
    Continue(TypeInfo),
    Done(Verdict),
    DoneByUser(Verdict),
}

impl<'rt> Engine<'rt> {
    pub fn new(
        table: &'rt TypeTable,
        heap: &'rt mut Heap,
        calls: &'rt dyn CallingConvention,
    ) -> Self {
        Engine {
            table,
            heap,
            calls,
            observer: &NOOP,
            stats: None,
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: &'rt dyn CallObserver) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub fn with_stats(mut self, stats: Option<&'rt TypeCtorStats>) -> Self {
        self.stats = stats;
        self
    }

    #[inline]
    pub fn table(&self) -> &'rt TypeTable {
        self.table
    }

    #[inline]
    pub fn heap(&self) -> &Heap {
        &*self.heap
    }

    #[inline]
    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut *self.heap
    }

    #[inline]
    pub(crate) fn calls(&self) -> &'rt dyn CallingConvention {
        self.calls
    }

    // === Entry points ===

    /// Are `x` and `y` equal values of type `ti`?
    pub fn unify(&mut self, ti: &TypeInfo, x: Word, y: Word) -> bool {
        self.evaluate(Mode::Unify, ti, x, y).is_equal()
    }

    /// Order `x` and `y`, using user-defined comparison where the type has
    /// one.
    pub fn compare(&mut self, ti: &TypeInfo, x: Word, y: Word) -> Ordering {
        self.ordering(Mode::Compare, ti, x, y)
    }

    /// Order `x` and `y` by their structural layout alone.
    pub fn compare_representation(&mut self, ti: &TypeInfo, x: Word, y: Word) -> Ordering {
        self.ordering(Mode::CompareRepresentation, ti, x, y)
    }

    fn ordering(&mut self, mode: Mode, ti: &TypeInfo, x: Word, y: Word) -> Ordering {
        match self.evaluate(mode, ti, x, y).ordering() {
            Some(ordering) => ordering,
            None => fatal(
                FatalContext::new(FatalKind::Unreachable, mode.name()),
                "comparison produced an unordered verdict",
            ),
        }
    }

    /// Run one traversal in `mode`.
    pub fn evaluate(&mut self, mode: Mode, ti: &TypeInfo, x: Word, y: Word) -> Verdict {
        ensure_sufficient_stack(|| self.resolve_loop(mode, ti.clone(), Transient { x, y }))
    }

    fn resolve_loop(&mut self, mode: Mode, mut ti: TypeInfo, t: Transient) -> Verdict {
        loop {
            let info = self.ctor_info(mode, &ti);
            if let Some(stats) = self.stats {
                stats.record(mode, info.id());
            }
            let (verdict, via_user_proc) = match self.step(mode, info, &ti, t) {
                Step::Continue(next) => {
                    ti = next;
                    continue;
                }
                Step::Done(verdict) => (verdict, false),
                Step::DoneByUser(verdict) => (verdict, true),
            };
            self.observer.exit(&CallExit {
                mode,
                ctor: info.id(),
                verdict,
                via_user_proc,
            });
            return verdict;
        }
    }

    fn ctor_info(&self, mode: Mode, ti: &TypeInfo) -> &'rt TypeCtorInfo {
        match self.table.ctor(ti.ctor()) {
            Some(info) if info.has_valid_representation() => info,
            Some(info) => fatal(
                FatalContext::new(FatalKind::Metadata, mode.name())
                    .with_subject(info.qualified_name()),
                format!("attempt to {} terms of unknown representation", mode.verb()),
            ),
            None => fatal(
                FatalContext::new(FatalKind::Metadata, mode.name())
                    .with_subject(format!("#{}", ti.ctor().raw())),
                format!("attempt to {} terms of unknown representation", mode.verb()),
            ),
        }
    }

    // === Resolution ===

    fn step(&mut self, mode: Mode, info: &'rt TypeCtorInfo, ti: &TypeInfo, t: Transient) -> Step {
        let structural = mode == Mode::CompareRepresentation;
        match info.rep() {
            Rep::Equiv | Rep::EquivGround => {
                let Some(target) = info.layout().as_equiv() else {
                    layout_mismatch(mode, info);
                };
                Step::Continue(self.instantiate(mode, info, target, ti.args()))
            }
            Rep::NoTag | Rep::NoTagGround => Step::Continue(self.notag_arg(mode, info, ti)),
            Rep::NoTagUserEq | Rep::NoTagGroundUserEq => {
                if structural {
                    Step::Continue(self.notag_arg(mode, info, ti))
                } else {
                    Step::DoneByUser(self.dispatch(mode, info, ti.args(), t))
                }
            }

            Rep::Enum => Step::Done(mode.verdict(t.x.raw().cmp(&t.y.raw()))),
            Rep::EnumUserEq => {
                if structural {
                    Step::Done(mode.verdict(t.x.raw().cmp(&t.y.raw())))
                } else {
                    Step::DoneByUser(self.dispatch(mode, info, ti.args(), t))
                }
            }
            Rep::Du => Step::Done(self.du(mode, info, ti.args(), t)),
            Rep::DuUserEq => {
                if structural {
                    Step::Done(self.du(mode, info, ti.args(), t))
                } else {
                    Step::DoneByUser(self.dispatch(mode, info, ti.args(), t))
                }
            }
            Rep::Tuple => Step::Done(self.tuple(mode, ti.args(), t)),

            Rep::Int => Step::Done(mode.verdict(t.x.as_int().cmp(&t.y.as_int()))),
            Rep::Char | Rep::CPointer | Rep::StableCPointer => {
                Step::Done(mode.verdict(t.x.raw().cmp(&t.y.raw())))
            }
            Rep::Float => Step::Done(float_verdict(mode, t.x.as_float(), t.y.as_float())),
            Rep::String => Step::Done(mode.verdict(self.heap.compare_strings(t.x, t.y))),

            Rep::Reference => {
                if mode.is_unify() {
                    Step::Done(mode.verdict(t.x.raw().cmp(&t.y.raw())))
                } else {
                    fatal(
                        context(FatalKind::NotPermitted, mode, info),
                        "attempt to compare terms of a reference type",
                    )
                }
            }

            Rep::TypeInfo | Rep::TypeDesc => {
                let x = self.heap.load_type_info(t.x, self.table);
                let y = self.heap.load_type_info(t.y, self.table);
                Step::Done(mode.verdict(compare_type_info(self.table, &x, &y)))
            }
            Rep::TypeCtorInfo => {
                let x = self.ctor_by_id(mode, Heap::load_type_ctor_info(t.x));
                let y = self.ctor_by_id(mode, Heap::load_type_ctor_info(t.y));
                Step::Done(mode.verdict(compare_type_ctor_info(x, y)))
            }
            Rep::TypeCtorDesc => {
                let x = self.heap.load_type_ctor_desc(t.x);
                let y = self.heap.load_type_ctor_desc(t.y);
                Step::Done(mode.verdict(compare_type_ctor_desc(self.table, &x, &y)))
            }

            Rep::Func | Rep::Pred => {
                if structural {
                    Step::Done(self.closures(mode, info, t))
                } else {
                    fatal(
                        context(FatalKind::NotPermitted, mode, info),
                        format!("attempt to {} higher-order terms", mode.verb()),
                    )
                }
            }

            Rep::Array | Rep::Foreign | Rep::ReservedAddr | Rep::ReservedAddrUserEq => {
                if structural {
                    let what = match info.rep() {
                        Rep::Array => "arrays",
                        Rep::Foreign => "foreign types",
                        _ => "reserved-address types",
                    };
                    fatal(
                        context(FatalKind::NotImplemented, mode, info),
                        format!("sorry, not implemented: compare_representation for {what}"),
                    )
                }
                Step::DoneByUser(self.dispatch(mode, info, ti.args(), t))
            }

            Rep::Void => fatal(
                context(FatalKind::NotPermitted, mode, info),
                format!("attempt to {} terms of type `void`", mode.verb()),
            ),
            Rep::TypeClassInfo | Rep::BaseTypeClassInfo => fatal(
                context(FatalKind::NotPermitted, mode, info),
                format!("attempt to {} typeclass infos", mode.verb()),
            ),
            Rep::Subgoal
            | Rep::Hp
            | Rep::Succip
            | Rep::Curfr
            | Rep::Maxfr
            | Rep::Redofr
            | Rep::Redoip
            | Rep::Ticket
            | Rep::TrailPtr => fatal(
                context(FatalKind::NotPermitted, mode, info),
                format!("attempt to {} terms of type `{}`", mode.verb(), info.name()),
            ),
            Rep::Unknown => fatal(
                context(FatalKind::Metadata, mode, info),
                format!("attempt to {} terms of unknown representation", mode.verb()),
            ),
        }
    }

    /// Bind `pt` against the arguments of the type being resolved.
    fn instantiate(
        &self,
        mode: Mode,
        info: &TypeCtorInfo,
        pt: &PseudoTypeInfo,
        params: &[TypeInfo],
    ) -> TypeInfo {
        match pt.instantiate_universal(params) {
            Ok(ti) => ti,
            Err(var) => fatal(
                context(FatalKind::Metadata, mode, info),
                format!("type variable {var:?} is not bound by the enclosing type"),
            ),
        }
    }

    fn notag_arg(&self, mode: Mode, info: &TypeCtorInfo, ti: &TypeInfo) -> TypeInfo {
        let Some(notag) = info.layout().as_notag() else {
            layout_mismatch(mode, info);
        };
        self.instantiate(mode, info, notag.arg_type(), ti.args())
    }

    fn ctor_by_id(&self, mode: Mode, id: TypeCtorId) -> &'rt TypeCtorInfo {
        match self.table.ctor(id) {
            Some(info) => info,
            None => fatal(
                FatalContext::new(FatalKind::Metadata, mode.name()),
                format!("no type constructor with id {}", id.raw()),
            ),
        }
    }

    // === Discriminated unions ===

    fn du(
        &mut self,
        mode: Mode,
        info: &'rt TypeCtorInfo,
        params: &[TypeInfo],
        t: Transient,
    ) -> Verdict {
        let Some(du) = info.layout().as_du() else {
            layout_mismatch(mode, info);
        };
        let (x, y) = (TaggedValue::new(t.x), TaggedValue::new(t.y));

        let functor: &'rt DuFunctorDesc = if mode.is_unify() {
            if x.primary_tag() != y.primary_tag() {
                return Verdict::Unequal;
            }
            let (ptag_layout, functor) = x.decode(self.heap, du);
            if ptag_layout.sectag_locn() != SectagLocn::None
                && y.secondary_tag(self.heap, ptag_layout) != functor.sectag()
            {
                return Verdict::Unequal;
            }
            functor
        } else {
            let (_, fx) = x.decode(self.heap, du);
            let (_, fy) = y.decode(self.heap, du);
            if fx.ordinal() != fy.ordinal() {
                return mode.verdict(fx.ordinal().cmp(&fy.ordinal()));
            }
            fx
        };

        if functor.sectag_locn() == SectagLocn::Local {
            return Verdict::Equal;
        }
        let first = functor.first_arg_slot();

        let mut exist_slots = 0;
        if let Some(exist) = functor.exist_info() {
            exist_slots = exist.slot_count();
            for locn in exist.typeinfo_locns() {
                let tx = self.exist_type_info(t.x, first, *locn);
                let ty = self.exist_type_info(t.y, first, *locn);
                let ordering = compare_type_info(self.table, &tx, &ty);
                if ordering != Ordering::Equal {
                    return mode.verdict(ordering);
                }
            }
        }

        for (i, arg_type) in functor.arg_types().iter().enumerate() {
            let arg_ti = self.arg_type_info(mode, info, functor, arg_type, params, t.x);
            let args = t.fields(self.heap, first + exist_slots + i);
            let verdict = self.evaluate(mode, &arg_ti, args.x, args.y);
            if verdict != Verdict::Equal {
                return verdict;
            }
        }
        Verdict::Equal
    }

    /// Type info of an existential variable, read from the value itself.
    fn exist_type_info(&self, value: Word, first: usize, locn: ExistLocn) -> TypeInfo {
        let slot = self.heap.field(value, first + usize::from(locn.arg_num));
        let word = match locn.offset_in_tci {
            None => slot,
            Some(offset) => self.heap.field(slot, usize::from(offset)),
        };
        self.heap.load_type_info(word, self.table)
    }

    fn arg_type_info(
        &self,
        mode: Mode,
        info: &TypeCtorInfo,
        functor: &DuFunctorDesc,
        arg_type: &PseudoTypeInfo,
        params: &[TypeInfo],
        x: Word,
    ) -> TypeInfo {
        let first = functor.first_arg_slot();
        let mut exist = |var: u16| {
            let locn = functor.exist_info()?.locn(var)?;
            Some(self.exist_type_info(x, first, *locn))
        };
        match arg_type.instantiate(params, &mut exist) {
            Ok(ti) => ti,
            Err(var) => fatal(
                context(FatalKind::Metadata, mode, info).with_subject(format!(
                    "{}, functor {}",
                    info.qualified_name(),
                    functor.name()
                )),
                format!("argument type mentions unbound variable {var:?}"),
            ),
        }
    }

    // === Other structured kinds ===

    fn tuple(&mut self, mode: Mode, elems: &[TypeInfo], t: Transient) -> Verdict {
        for (i, elem) in elems.iter().enumerate() {
            let args = t.fields(self.heap, i);
            let verdict = self.evaluate(mode, elem, args.x, args.y);
            if verdict != Verdict::Equal {
                return verdict;
            }
        }
        Verdict::Equal
    }

    /// Closures order by procedure, then by how many arguments they
    /// captured, then by the captured arguments' representations.
    fn closures(&mut self, mode: Mode, info: &TypeCtorInfo, t: Transient) -> Verdict {
        let x_layout = self.closure_layout(mode, info, t.x);
        let y_layout = self.closure_layout(mode, info, t.y);
        let by_proc = x_layout.proc().cmp(y_layout.proc());
        if by_proc != Ordering::Equal {
            return mode.verdict(by_proc);
        }
        let count = self.heap.closure_hidden_count(t.x);
        let by_count = count.cmp(&self.heap.closure_hidden_count(t.y));
        if by_count != Ordering::Equal {
            return mode.verdict(by_count);
        }
        for i in 0..count {
            let Some(arg_type) = x_layout.arg_types().get(i) else {
                fatal(
                    context(FatalKind::Metadata, mode, info),
                    format!("closure captures {count} arguments but its layout describes fewer"),
                );
            };
            let x = self.heap.closure_hidden(t.x, i);
            let y = self.heap.closure_hidden(t.y, i);
            let verdict = self.evaluate(mode, arg_type, x, y);
            if verdict != Verdict::Equal {
                return verdict;
            }
        }
        Verdict::Equal
    }

    fn closure_layout(&self, mode: Mode, info: &TypeCtorInfo, closure: Word) -> &'rt ClosureLayout {
        let id = self.heap.closure_layout(closure);
        match self.table.closure(id) {
            Some(layout) => layout,
            None => fatal(
                context(FatalKind::Metadata, mode, info),
                format!("no closure layout with id {}", id.raw()),
            ),
        }
    }
}

/// Floats follow IEEE: any NaN is unequal to everything, and `compare`
/// reports it as greater.
#[allow(clippy::float_cmp, reason = "IEEE equality is the defined semantics")]
fn float_verdict(mode: Mode, x: f64, y: f64) -> Verdict {
    if mode.is_unify() {
        return if x == y { Verdict::Equal } else { Verdict::Unequal };
    }
    if x < y {
        Verdict::Less
    } else if x == y {
        Verdict::Equal
    } else {
        Verdict::Greater
    }
}

pub(crate) fn context(kind: FatalKind, mode: Mode, info: &TypeCtorInfo) -> FatalContext {
    FatalContext::new(kind, mode.name()).with_subject(info.rep().name())
}

#[cold]
fn layout_mismatch(mode: Mode, info: &TypeCtorInfo) -> ! {
    fatal(
        context(FatalKind::Unreachable, mode, info),
        format!(
            "layout of `{}` does not match its representation",
            info.qualified_name()
        ),
    )
}
