//! Per-constructor visit counters.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use morel_rtti::{TypeCtorId, TypeTable};

use crate::Mode;

/// How often each constructor was visited, per mode.
///
/// Every resolution step counts, so an equivalence and its target are both
/// recorded. Shared between threads.
#[derive(Debug, Default)]
pub struct TypeCtorStats {
    counts: Mutex<FxHashMap<(Mode, TypeCtorId), u64>>,
}

/// One line of a [`TypeCtorStats::report`].
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct StatsLine {
    pub mode: Mode,
    pub ctor: String,
    pub count: u64,
}

impl TypeCtorStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record(&self, mode: Mode, ctor: TypeCtorId) {
        *self.counts.lock().entry((mode, ctor)).or_insert(0) += 1;
    }

    pub fn count(&self, mode: Mode, ctor: TypeCtorId) -> u64 {
        self.counts.lock().get(&(mode, ctor)).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.lock().values().sum()
    }

    pub fn reset(&self) {
        self.counts.lock().clear();
    }

    /// Busiest constructors first; ties by mode, then by name.
    pub fn report(&self, table: &TypeTable) -> Vec<StatsLine> {
        let mut lines: Vec<StatsLine> = self
            .counts
            .lock()
            .iter()
            .map(|(&(mode, ctor), &count)| StatsLine {
                mode,
                ctor: table
                    .ctor(ctor)
                    .map_or_else(|| format!("#{}", ctor.raw()), |info| info.qualified_name()),
                count,
            })
            .collect();
        lines.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.mode.cmp(&b.mode))
                .then_with(|| a.ctor.cmp(&b.ctor))
        });
        lines
    }
}
