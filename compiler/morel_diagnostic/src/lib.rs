//! Fatal diagnostics for the morel runtime.
//!
//! The unify/compare engine has no recoverable error results. Every condition
//! that stops it (corrupted descriptor metadata, an operation that is
//! permanently unsupported for a representation, a state the engine should
//! never reach) is reported through [`fatal`], which never returns.
//!
//! # Unwinding
//!
//! [`fatal`] writes the diagnostic to stderr, then unwinds with a structured
//! [`Fatal`] payload through `std::panic::resume_unwind`, so the panic hook
//! adds nothing of its own. An embedding application that must not tear down
//! the whole process wraps its outermost entry point in [`catch_fatal`]:
//!
//! ```text
//! match catch_fatal(|| engine.compare(&ty, x, y)) {
//!     Ok(order) => ...,
//!     Err(fatal) => eprintln!("morel: {fatal}"),
//! }
//! ```

mod fatal;

pub use fatal::{catch_fatal, fatal, Fatal, FatalContext, FatalKind};
