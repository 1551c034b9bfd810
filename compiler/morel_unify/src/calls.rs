//! The calling convention user-defined procedures are invoked through.

use std::fmt;
use std::sync::Arc;

use morel_diagnostic::{fatal, FatalContext, FatalKind};
use morel_heap::Word;
use morel_rtti::ProcRef;
use rustc_hash::FxHashMap;

use crate::Engine;

/// Invokes a procedure with an argument list and returns its single result.
///
/// The engine passes the procedure the materialized type infos of the
/// type's arguments, then the two values. Procedures get the engine back so
/// they can re-enter it for their subterms.
pub trait CallingConvention: Send + Sync {
    fn invoke(&self, engine: &mut Engine<'_>, proc: &ProcRef, args: &[Word]) -> Word;
}

/// Native code behind a [`ProcRef`].
pub type UserProc = Arc<dyn Fn(&mut Engine<'_>, &[Word]) -> Word + Send + Sync>;

/// Procedures registered by name.
#[derive(Clone, Default)]
pub struct ProcTable {
    procs: FxHashMap<ProcRef, UserProc>,
}

impl ProcTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `code` under `proc`, replacing any earlier registration.
    pub fn register(
        &mut self,
        proc: ProcRef,
        code: impl Fn(&mut Engine<'_>, &[Word]) -> Word + Send + Sync + 'static,
    ) {
        self.procs.insert(proc, Arc::new(code));
    }

    pub fn get(&self, proc: &ProcRef) -> Option<&UserProc> {
        self.procs.get(proc)
    }

    pub fn len(&self) -> usize {
        self.procs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }
}

impl CallingConvention for ProcTable {
    fn invoke(&self, engine: &mut Engine<'_>, proc: &ProcRef, args: &[Word]) -> Word {
        match self.procs.get(proc) {
            Some(code) => code(engine, args),
            None => fatal(
                FatalContext::new(FatalKind::Metadata, "invoke").with_subject(proc.to_string()),
                "no code is registered for this procedure",
            ),
        }
    }
}

impl fmt::Debug for ProcTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.procs.keys()).finish()
    }
}
