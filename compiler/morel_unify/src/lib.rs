//! Generic unify and compare for the morel runtime.
//!
//! Any two values of the same type can be unified or ordered knowing only
//! the type's reflected descriptor. Three traversals share one
//! implementation:
//!
//! - [`Engine::unify`]: equality, deferring to user-defined equality;
//! - [`Engine::compare`]: a total order, deferring to user-defined
//!   comparison;
//! - [`Engine::compare_representation`]: the order of the structural
//!   layout, ignoring user-defined procedures.
//!
//! Conditions the runtime treats as bugs or permanent limitations (ordering
//! references, comparing higher-order terms, broken descriptors) are fatal:
//! see [`morel_diagnostic::fatal`].
//!
//! ```text
//! let runtime = Runtime::new(Arc::new(table));
//! let mut heap = runtime.new_heap();
//! let (a, b) = (heap.alloc_string("abc"), heap.alloc_string("abd"));
//! let mut engine = runtime.engine(&mut heap);
//! assert_eq!(engine.compare(&TypeInfo::string(), a, b), Ordering::Less);
//! ```

mod calls;
mod dispatch;
mod engine;
mod mode;
mod observer;
mod options;
mod runtime;
mod stats;

use std::sync::Once;

pub use calls::{CallingConvention, ProcTable, UserProc};
pub use engine::Engine;
pub use mode::{Mode, Verdict};
pub use observer::{CallExit, CallObserver, NoopObserver, TracingObserver};
pub use options::{OptionsError, RuntimeOptions, OPTIONS_ENV};
pub use runtime::Runtime;
pub use stats::{StatsLine, TypeCtorStats};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// For binaries and test harnesses; the library never calls it. Does nothing
/// unless `RUST_LOG` is set, and leaves an already installed global
/// subscriber in place. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let installed = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
            if installed.is_err() {
                tracing::debug!("global subscriber already set; keeping it");
            }
        }
    });
}
