//! A configured runtime: descriptor table, user procedures and options.

use std::sync::Arc;

use morel_heap::{Heap, Word};
use morel_rtti::{ProcRef, TypeTable};

use crate::{
    CallObserver, Engine, NoopObserver, ProcTable, RuntimeOptions, TracingObserver, TypeCtorStats,
};

/// Shared, read-mostly state for any number of engines.
///
/// The runtime is `Sync`: threads share it and bring their own heaps.
pub struct Runtime {
    table: Arc<TypeTable>,
    procs: ProcTable,
    options: RuntimeOptions,
    observer: Box<dyn CallObserver>,
    stats: Option<TypeCtorStats>,
}

impl Runtime {
    pub fn new(table: Arc<TypeTable>) -> Self {
        Self::with_options(table, RuntimeOptions::default())
    }

    pub fn with_options(table: Arc<TypeTable>, options: RuntimeOptions) -> Self {
        let observer: Box<dyn CallObserver> = if options.trace_exits {
            Box::new(TracingObserver)
        } else {
            Box::new(NoopObserver)
        };
        let stats = options.type_ctor_stats.then(TypeCtorStats::new);
        Runtime {
            table,
            procs: ProcTable::new(),
            options,
            observer,
            stats,
        }
    }

    /// Replace the call observer the options selected.
    #[must_use]
    pub fn with_observer(mut self, observer: impl CallObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Provide the code for a procedure named in the table.
    pub fn register_proc(
        &mut self,
        proc: ProcRef,
        code: impl Fn(&mut Engine<'_>, &[Word]) -> Word + Send + Sync + 'static,
    ) {
        self.procs.register(proc, code);
    }

    pub fn table(&self) -> &TypeTable {
        &self.table
    }

    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    pub fn stats(&self) -> Option<&TypeCtorStats> {
        self.stats.as_ref()
    }

    /// A heap configured by this runtime's options.
    pub fn new_heap(&self) -> Heap {
        Heap::with_config(self.options.heap.clone())
    }

    /// An engine over `heap`.
    pub fn engine<'a>(&'a self, heap: &'a mut Heap) -> Engine<'a> {
        Engine::new(&self.table, heap, &self.procs)
            .with_observer(&*self.observer)
            .with_stats(self.stats.as_ref())
    }
}
