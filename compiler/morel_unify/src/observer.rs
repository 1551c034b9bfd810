//! Call-exit observers.
//!
//! A profiler or debugger plugs in here instead of patching the engine.
//! Every traversal, nested ones included, reports exactly one exit.

use morel_rtti::TypeCtorId;

use crate::{Mode, Verdict};

/// One finished traversal.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct CallExit {
    pub mode: Mode,
    /// Constructor the traversal resolved to, after looking through
    /// equivalences and no-tag wrappers.
    pub ctor: TypeCtorId,
    pub verdict: Verdict,
    /// Whether a user-defined procedure produced the verdict.
    pub via_user_proc: bool,
}

pub trait CallObserver: Send + Sync {
    fn exit(&self, exit: &CallExit);
}

/// Ignores everything.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoopObserver;

impl CallObserver for NoopObserver {
    #[inline]
    fn exit(&self, _exit: &CallExit) {}
}

/// Emits one `trace` event per exit.
#[derive(Copy, Clone, Default, Debug)]
pub struct TracingObserver;

impl CallObserver for TracingObserver {
    fn exit(&self, exit: &CallExit) {
        tracing::trace!(
            mode = exit.mode.name(),
            ctor = exit.ctor.raw(),
            verdict = ?exit.verdict,
            user = exit.via_user_proc,
            "exit"
        );
    }
}
