//! Engine modes and verdicts.

use std::cmp::Ordering;
use std::fmt;

/// Which of the three traversals to run.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Mode {
    /// Equality. Honours user-defined equality.
    Unify,
    /// Three-way ordering. Honours user-defined comparison.
    Compare,
    /// Three-way ordering of the structural layout. Never runs user code.
    CompareRepresentation,
}

impl Mode {
    /// Operation name, as used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Mode::Unify => "unify",
            Mode::Compare => "compare",
            Mode::CompareRepresentation => "compare_representation",
        }
    }

    /// Verb for "attempt to ..." messages.
    pub(crate) const fn verb(self) -> &'static str {
        match self {
            Mode::Unify => "unify",
            Mode::Compare | Mode::CompareRepresentation => "compare",
        }
    }

    #[inline]
    pub const fn is_unify(self) -> bool {
        matches!(self, Mode::Unify)
    }

    /// Verdict for two values already ordered by `ordering`.
    #[inline]
    pub(crate) fn verdict(self, ordering: Ordering) -> Verdict {
        match (self, ordering) {
            (_, Ordering::Equal) => Verdict::Equal,
            (Mode::Unify, _) => Verdict::Unequal,
            (_, Ordering::Less) => Verdict::Less,
            (_, Ordering::Greater) => Verdict::Greater,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one traversal.
///
/// `Unify` produces `Equal` or `Unequal`; the comparison modes produce
/// `Less`, `Equal` or `Greater`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Verdict {
    Equal,
    Less,
    Greater,
    Unequal,
}

impl Verdict {
    #[inline]
    pub fn is_equal(self) -> bool {
        self == Verdict::Equal
    }

    /// The ordering, for verdicts of the comparison modes.
    pub fn ordering(self) -> Option<Ordering> {
        match self {
            Verdict::Equal => Some(Ordering::Equal),
            Verdict::Less => Some(Ordering::Less),
            Verdict::Greater => Some(Ordering::Greater),
            Verdict::Unequal => None,
        }
    }
}

#[cfg(test)]
mod tests;
