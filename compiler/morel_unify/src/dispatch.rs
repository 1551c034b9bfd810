//! Redirection to user-defined equality and comparison.

use morel_diagnostic::{fatal, FatalKind};
use morel_heap::Word;
use morel_rtti::{ProcRef, TypeCtorInfo, TypeInfo};
use smallvec::SmallVec;

use crate::engine::{context, Transient};
use crate::{Engine, Mode, Verdict};

/// Result words of a user comparison procedure.
const COMPARE_EQUAL: u64 = 0;
const COMPARE_LESS: u64 = 1;
const COMPARE_GREATER: u64 = 2;

impl Engine<'_> {
    /// Hand `x` and `y` to the type's own procedure for `mode`.
    ///
    /// The procedure receives the materialized type infos of `params`
    /// followed by the two values. Its result is taken as is; the
    /// dispatcher never recurses on its own.
    pub(crate) fn dispatch(
        &mut self,
        mode: Mode,
        info: &TypeCtorInfo,
        params: &[TypeInfo],
        t: Transient,
    ) -> Verdict {
        let proc = user_proc(mode, info).clone();

        let mut args: SmallVec<[Word; 6]> = SmallVec::with_capacity(params.len() + 2);
        for param in params {
            let word = self.heap_mut().alloc_type_info(param);
            args.push(word);
        }
        args.push(t.x);
        args.push(t.y);

        tracing::trace!(%proc, mode = mode.name(), ctor = %info.qualified_name(), "calling user procedure");
        let calls = self.calls();
        let result = calls.invoke(self, &proc, &args);

        match mode {
            Mode::Unify => {
                if result.as_bool() {
                    Verdict::Equal
                } else {
                    Verdict::Unequal
                }
            }
            Mode::Compare => match result.raw() {
                COMPARE_EQUAL => Verdict::Equal,
                COMPARE_LESS => Verdict::Less,
                COMPARE_GREATER => Verdict::Greater,
                other => fatal(
                    context(FatalKind::Metadata, mode, info).with_subject(proc.to_string()),
                    format!("comparison procedure returned {other}, not a comparison result"),
                ),
            },
            Mode::CompareRepresentation => never_dispatched(info),
        }
    }
}

fn user_proc(mode: Mode, info: &TypeCtorInfo) -> &ProcRef {
    let found = match mode {
        Mode::Unify => info.unify_proc(),
        Mode::Compare => info.compare_proc(),
        Mode::CompareRepresentation => never_dispatched(info),
    };
    match found {
        Some(proc) => proc,
        None if mode == Mode::Compare && info.unify_proc().is_some() => fatal(
            context(FatalKind::NotPermitted, mode, info),
            format!(
                "attempt to compare values of `{}`, which has user-defined equality but no user-defined comparison",
                info.qualified_name()
            ),
        ),
        None => fatal(
            context(FatalKind::NotImplemented, mode, info),
            format!(
                "sorry, not implemented: {} for `{}` without a user-defined procedure",
                mode.name(),
                info.qualified_name()
            ),
        ),
    }
}

#[cold]
fn never_dispatched(info: &TypeCtorInfo) -> ! {
    fatal(
        context(FatalKind::Unreachable, Mode::CompareRepresentation, info),
        "representation comparison never calls user code",
    )
}
