//! References to user-defined procedures.

use std::fmt;

/// Identifies one procedure the calling-convention collaborator can invoke.
///
/// Ordering is by module, name, arity, then mode number; closures use it to
/// order their code pointers independently of load addresses.
#[derive(Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ProcRef {
    module: Box<str>,
    name: Box<str>,
    arity: u16,
    mode: u16,
}

impl ProcRef {
    pub fn new(module: impl Into<Box<str>>, name: impl Into<Box<str>>, arity: u16) -> Self {
        ProcRef {
            module: module.into(),
            name: name.into(),
            arity,
            mode: 0,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: u16) -> Self {
        self.mode = mode;
        self
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> u16 {
        self.arity
    }

    pub fn mode(&self) -> u16 {
        self.mode
    }
}

impl fmt::Display for ProcRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}/{}-{}", self.module, self.name, self.arity, self.mode)
    }
}

impl fmt::Debug for ProcRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProcRef({self})")
    }
}
