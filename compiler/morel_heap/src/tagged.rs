//! Decoding of discriminated-union values.
//!
//! Callers resolve equivalences and no-tag wrappers first: these
//! primitives assume the value's type really is laid out as a union.

use morel_diagnostic::{fatal, FatalContext, FatalKind};
use morel_rtti::{DuFunctorDesc, DuLayout, DuPtagLayout, SectagLocn};

use crate::{BodyView, Heap, Word};

/// A discriminated-union value.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct TaggedValue(Word);

impl TaggedValue {
    #[inline]
    pub fn new(word: Word) -> Self {
        TaggedValue(word)
    }

    #[inline]
    pub fn word(self) -> Word {
        self.0
    }

    #[inline]
    pub fn primary_tag(self) -> u8 {
        self.0.ptag()
    }

    /// The cell behind this value. Only meaningful when its primary tag
    /// does not use a local secondary tag.
    #[inline]
    pub fn body(self, heap: &Heap) -> BodyView {
        heap.view(self.0)
    }

    /// Secondary tag under the scheme `ptag_layout` prescribes.
    pub fn secondary_tag(self, heap: &Heap, ptag_layout: &DuPtagLayout) -> u64 {
        match ptag_layout.sectag_locn() {
            SectagLocn::None => 0,
            SectagLocn::Local => self.0.body_bits(),
            SectagLocn::Remote => heap.slot(self.body(heap), 0).raw(),
            SectagLocn::Variable => fatal(
                FatalContext::new(FatalKind::Metadata, "secondary_tag"),
                "attempt to inspect the secondary tag of a type variable",
            ),
        }
    }

    /// Primary-tag layout and functor this value was built from.
    pub fn decode<'t>(
        self,
        heap: &Heap,
        du: &'t DuLayout,
    ) -> (&'t DuPtagLayout, &'t DuFunctorDesc) {
        let ptag = self.primary_tag();
        let Some(ptag_layout) = du.ptag_layout(ptag) else {
            fatal(
                FatalContext::new(FatalKind::Metadata, "secondary_tag"),
                format!("primary tag {ptag} is not used by this type"),
            );
        };
        let sectag = self.secondary_tag(heap, ptag_layout);
        match du.functor(ptag_layout, sectag) {
            Some(functor) => (ptag_layout, functor),
            None => fatal(
                FatalContext::new(FatalKind::Metadata, "secondary_tag"),
                format!("secondary tag {sectag} out of range for primary tag {ptag}"),
            ),
        }
    }
}
