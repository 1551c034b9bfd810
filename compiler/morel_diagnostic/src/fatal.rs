//! The fatal-error channel.

use std::borrow::Cow;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Which class of failure a [`Fatal`] belongs to.
///
/// None of these are user-facing errors: they either indicate broken
/// descriptor metadata or an operation the runtime has declared permanently
/// unsupported.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FatalKind {
    /// Invalid or placeholder type descriptors, out-of-range tags, values
    /// inconsistent with their declared representation.
    Metadata,
    /// Operation not permitted for this representation (ordering references,
    /// comparing higher-order terms, non-data pseudo-types).
    NotPermitted,
    /// Acknowledged gap: "sorry, not implemented".
    NotImplemented,
    /// Internal invariant violation in the engine itself.
    Unreachable,
}

impl FatalKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            FatalKind::Metadata => "metadata",
            FatalKind::NotPermitted => "not permitted",
            FatalKind::NotImplemented => "not implemented",
            FatalKind::Unreachable => "unreachable",
        }
    }
}

impl fmt::Display for FatalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a fatal condition was raised.
///
/// `operation` names the attempted operation (`unify`, `compare`,
/// `compare_representation`, `secondary_tag`, ...). `subject` is the
/// representation kind or descriptor involved, when one is known.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct FatalContext {
    pub kind: FatalKind,
    pub operation: Cow<'static, str>,
    pub subject: Option<Cow<'static, str>>,
}

impl FatalContext {
    pub fn new(kind: FatalKind, operation: impl Into<Cow<'static, str>>) -> Self {
        FatalContext {
            kind,
            operation: operation.into(),
            subject: None,
        }
    }

    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<Cow<'static, str>>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

impl fmt::Display for FatalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            Some(subject) => write!(f, "{} [{}, {}]", self.operation, subject, self.kind),
            None => write!(f, "{} [{}]", self.operation, self.kind),
        }
    }
}

/// Payload of a fatal unwind.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("{context}: {message}")]
pub struct Fatal {
    pub context: FatalContext,
    pub message: String,
}

impl Fatal {
    /// The line written to stderr when the diagnostic is raised.
    pub fn report(&self) -> String {
        format!("morel runtime: fatal error: {self}")
    }
}

/// Terminate the current computation with a fatal diagnostic.
///
/// Writes the diagnostic to stderr and the log, then unwinds with a
/// [`Fatal`] payload. The unwind bypasses the panic hook. There is no way to
/// resume the computation that raised it.
#[cold]
#[inline(never)]
pub fn fatal(context: FatalContext, message: impl Into<String>) -> ! {
    let fatal = Fatal {
        context,
        message: message.into(),
    };
    eprintln!("{}", fatal.report());
    tracing::error!(
        kind = %fatal.context.kind,
        operation = %fatal.context.operation,
        "{}",
        fatal.message
    );
    panic::resume_unwind(Box::new(fatal))
}

/// Run `f`, converting a fatal unwind into `Err`.
///
/// Panics that do not carry a [`Fatal`] payload are resumed unchanged.
pub fn catch_fatal<R>(f: impl FnOnce() -> R) -> Result<R, Fatal> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Ok(value),
        Err(payload) => match payload.downcast::<Fatal>() {
            Ok(fatal) => Err(*fatal),
            Err(other) => panic::resume_unwind(other),
        },
    }
}
