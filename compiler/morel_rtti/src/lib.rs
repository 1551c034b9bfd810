//! Reflected type descriptors for the morel runtime.
//!
//! Every type constructor known to a running program is described by one
//! immutable [`TypeCtorInfo`]: its arity, its [`RepresentationKind`], the
//! [`Layout`] matching that kind, and the optional user-defined equality and
//! comparison procedures. A [`TypeInfo`] instantiates a constructor with
//! argument types.
//!
//! # Lifecycle
//!
//! Descriptors are assembled once, at load time, with a
//! [`TypeTableBuilder`]. `finish()` validates them and freezes them into a
//! [`TypeTable`], which is never mutated afterwards and is shared (usually
//! behind an `Arc`) by every engine invocation in the process.
//!
//! ```text
//! let mut b = TypeTableBuilder::new();
//! let list = b.declare("list", "list", 1)?;
//! b.define(list, TypeDefinition::Du(vec![
//!     FunctorSpec::new("[]", vec![]),
//!     FunctorSpec::new("[|]", vec![
//!         PseudoTypeInfo::Var(1),
//!         PseudoTypeInfo::app(list, vec![PseudoTypeInfo::Var(1)]),
//!     ]),
//! ]))?;
//! let table = b.finish()?;
//! ```
//!
//! # Tagging
//!
//! Discriminated-union values are tagged words. The low [`TAG_BITS`] bits
//! hold the primary tag; [`SectagLocn`] says where the secondary tag lives
//! for each primary tag. The builder assigns tags; the value codec in
//! `morel_heap` decodes them.

mod builder;
mod builtins;
mod ctor;
mod error;
mod id;
mod kind;
mod order;
mod proc_ref;
mod table;
mod type_info;

pub use builder::{ExistSpec, FunctorSpec, TypeDefinition, TypeTableBuilder};
pub use ctor::{
    ClosureLayout, DuFunctorDesc, DuLayout, DuPtagLayout, EnumLayout, ExistInfo, ExistLocn,
    Layout, NoTagLayout, SectagLocn, TypeCtorFlags, TypeCtorInfo,
};
pub use error::RttiError;
pub use id::{ClosureId, TypeCtorId};
pub use kind::RepresentationKind;
pub use order::{
    compare_type_ctor_desc, compare_type_ctor_info, compare_type_info, unify_type_info,
    TypeCtorDesc,
};
pub use proc_ref::ProcRef;
pub use table::{TypeInfoDisplay, TypeTable};
pub use type_info::{HigherOrder, PseudoTypeInfo, TypeInfo, UnboundVar};

/// Number of low pointer bits available for the primary tag.
///
/// Fixed by the alignment of a 64-bit word.
pub const TAG_BITS: u32 = 3;

/// Largest number of distinct primary tags.
pub const MAX_PRIMARY_TAGS: u8 = 1 << TAG_BITS;

/// Layout version stamped on every descriptor this crate produces.
///
/// A descriptor carrying any other version is treated as corrupted.
pub const RTTI_VERSION: u8 = 1;
